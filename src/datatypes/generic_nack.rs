use crate::datatypes::{CommandId, CommandStatus};
use crate::macros::impl_header_only_pdu;

/// GenericNack is returned when the receiving entity cannot process a PDU at
/// all, for instance an unknown command_id or a malformed length.
///
/// The sequence_number echoes the offending PDU, or 0 when it could not be
/// determined.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericNack {
    /// The reason for the generic_nack
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl GenericNack {
    pub fn new(command_status: CommandStatus, sequence_number: u32) -> Self {
        Self {
            command_status,
            sequence_number,
        }
    }

    pub fn invalid_command_id(sequence_number: u32) -> Self {
        Self::new(CommandStatus::InvalidCommandId, sequence_number)
    }

    pub fn system_error(sequence_number: u32) -> Self {
        Self::new(CommandStatus::SystemError, sequence_number)
    }
}

impl_header_only_pdu!(GenericNack, CommandId::GenericNack);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Decodable, Encodable, PduHeader};
    use std::io::Cursor;

    #[test]
    fn generic_nack_keeps_status() {
        let original = GenericNack::invalid_command_id(456);
        let bytes = original.to_bytes().unwrap();
        assert_eq!(bytes.len(), PduHeader::SIZE);

        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = GenericNack::decode(header, &mut cursor).unwrap();

        assert_eq!(decoded.command_status, CommandStatus::InvalidCommandId);
        assert_eq!(decoded.sequence_number, 456);
    }
}
