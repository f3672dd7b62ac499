use crate::codec::{
    decode_cstring, decode_u8, encode_cstring, CodecError, Decodable, Encodable, PduHeader,
};
use crate::datatypes::interface_version::InterfaceVersion;
use crate::datatypes::numeric_plan_indicator::NumericPlanIndicator;
use crate::datatypes::tlv::{tags, Tlv};
use crate::datatypes::{CommandId, CommandStatus, TypeOfNumber};
use bytes::{Buf, BufMut, BytesMut};
use std::io::Cursor;

// Field limits including the NUL terminator
pub const MAX_SYSTEM_ID_LENGTH: usize = 16;
pub const MAX_PASSWORD_LENGTH: usize = 9;
const MAX_SYSTEM_TYPE_LENGTH: usize = 13;
const MAX_ADDRESS_RANGE_LENGTH: usize = 41;

/// BindTransmitter is used to bind a transmitter ESME to the SMSC.
#[derive(Clone, Debug, PartialEq)]
pub struct BindTransmitter {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// 5.2.1 system_id: identifies the ESME requesting to bind. Up to 15
    ///       characters on the wire.
    pub system_id: String,

    /// 5.2.2 password: up to 8 characters. An empty password is sent as a
    ///       single NUL.
    pub password: String,

    /// 5.2.3 system_type: categorizes the ESME, e.g. "VMS" or "OTA". Empty
    ///       on most carrier links.
    pub system_type: String,

    /// 5.2.4 interface_version: Interface version level supported by the ESME.
    pub interface_version: InterfaceVersion,

    pub addr_ton: TypeOfNumber,
    pub addr_npi: NumericPlanIndicator,

    /// 5.2.7 address_range: SME addresses served by this ESME. Left empty
    ///       for transmitters.
    pub address_range: String,
}

/// bind_transmitter_resp. A rejected bind may come back with no body at all.
#[derive(Clone, Debug, PartialEq)]
pub struct BindTransmitterResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// Identifies the SMSC to the ESME
    pub system_id: String,

    /// Interface version supported by the SMSC, if it sent one
    pub sc_interface_version: Option<Tlv>,
}

impl BindTransmitter {
    pub fn new(
        sequence_number: u32,
        system_id: impl Into<String>,
        password: impl Into<String>,
        system_type: impl Into<String>,
    ) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            system_id: system_id.into(),
            password: password.into(),
            system_type: system_type.into(),
            interface_version: InterfaceVersion::SmppV34,
            addr_ton: TypeOfNumber::Unknown,
            addr_npi: NumericPlanIndicator::Unknown,
            address_range: String::new(),
        }
    }
}

impl Encodable for BindTransmitter {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader {
            command_length: 0,
            command_id: CommandId::BindTransmitter,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        }
        .encode(buf);

        encode_cstring(buf, &self.system_id, MAX_SYSTEM_ID_LENGTH, "system_id")?;
        encode_cstring(buf, &self.password, MAX_PASSWORD_LENGTH, "password")?;
        encode_cstring(buf, &self.system_type, MAX_SYSTEM_TYPE_LENGTH, "system_type")?;
        buf.put_u8(self.interface_version.into());
        buf.put_u8(self.addr_ton.into());
        buf.put_u8(self.addr_npi.into());
        encode_cstring(
            buf,
            &self.address_range,
            MAX_ADDRESS_RANGE_LENGTH,
            "address_range",
        )?;
        Ok(())
    }
}

impl Decodable for BindTransmitter {
    fn command_id() -> CommandId {
        CommandId::BindTransmitter
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let system_id = decode_cstring(buf, MAX_SYSTEM_ID_LENGTH, "system_id")?;
        let password = decode_cstring(buf, MAX_PASSWORD_LENGTH, "password")?;
        let system_type = decode_cstring(buf, MAX_SYSTEM_TYPE_LENGTH, "system_type")?;
        let interface_version = InterfaceVersion::try_from(decode_u8(buf)?).map_err(|e| {
            CodecError::FieldValidation {
                field: "interface_version",
                reason: e.to_string(),
            }
        })?;
        let addr_ton = TypeOfNumber::try_from(decode_u8(buf)?).map_err(|e| {
            CodecError::FieldValidation {
                field: "addr_ton",
                reason: e.to_string(),
            }
        })?;
        let addr_npi = NumericPlanIndicator::try_from(decode_u8(buf)?).map_err(|e| {
            CodecError::FieldValidation {
                field: "addr_npi",
                reason: e.to_string(),
            }
        })?;
        let address_range = decode_cstring(buf, MAX_ADDRESS_RANGE_LENGTH, "address_range")?;

        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            system_id,
            password,
            system_type,
            interface_version,
            addr_ton,
            addr_npi,
            address_range,
        })
    }
}

impl BindTransmitterResponse {
    pub fn new(sequence_number: u32, system_id: impl Into<String>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            system_id: system_id.into(),
            sc_interface_version: Some(Tlv::new(tags::SC_INTERFACE_VERSION, vec![0x34])),
        }
    }

    pub fn error(sequence_number: u32, status: CommandStatus) -> Self {
        Self {
            command_status: status,
            sequence_number,
            system_id: String::new(),
            sc_interface_version: None,
        }
    }
}

impl Encodable for BindTransmitterResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader {
            command_length: 0,
            command_id: CommandId::BindTransmitterResp,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        }
        .encode(buf);

        if self.command_status.is_ok() {
            encode_cstring(buf, &self.system_id, MAX_SYSTEM_ID_LENGTH, "system_id")?;
            if let Some(tlv) = &self.sc_interface_version {
                tlv.encode(buf)?;
            }
        }
        Ok(())
    }
}

impl Decodable for BindTransmitterResponse {
    fn command_id() -> CommandId {
        CommandId::BindTransmitterResp
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let system_id = if buf.has_remaining() {
            decode_cstring(buf, MAX_SYSTEM_ID_LENGTH, "system_id")?
        } else {
            String::new()
        };

        let sc_interface_version = Tlv::decode_all(buf)?
            .into_iter()
            .find(|tlv| tlv.tag == tags::SC_INTERFACE_VERSION);

        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            system_id,
            sc_interface_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_transmitter_to_bytes() {
        let bind = BindTransmitter::new(1, "SMPP3TEST", "secret08", "SUBMIT1");
        let bytes = bind.to_bytes().unwrap();

        let mut expected: Vec<u8> = Vec::new();
        expected.extend_from_slice(&[0, 0, 0, 0]);
        expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x02]);
        expected.extend_from_slice(&[0, 0, 0, 0]);
        expected.extend_from_slice(&[0, 0, 0, 1]);
        expected.extend_from_slice(b"SMPP3TEST\0secret08\0SUBMIT1\0");
        expected.extend_from_slice(&[0x34, 0x00, 0x00, 0x00]);
        let len = expected.len() as u32;
        expected[0..4].copy_from_slice(&len.to_be_bytes());

        assert_eq!(bytes.as_ref(), expected.as_slice());
    }

    #[test]
    fn bind_transmitter_decodes_its_own_encoding() {
        let bind = BindTransmitter::new(9, "gw", "", "");
        let bytes = bind.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        assert_eq!(BindTransmitter::decode(header, &mut cursor).unwrap(), bind);
    }

    #[test]
    fn password_too_long_is_rejected() {
        let bind = BindTransmitter::new(1, "id", "123456789", "");
        assert!(matches!(
            bind.to_bytes(),
            Err(CodecError::FieldValidation {
                field: "password",
                ..
            })
        ));
    }

    #[test]
    fn response_with_interface_version() {
        let resp = BindTransmitterResponse::new(3, "SMSC");
        let bytes = resp.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = BindTransmitterResponse::decode(header, &mut cursor).unwrap();
        assert_eq!(decoded.system_id, "SMSC");
        assert_eq!(
            decoded.sc_interface_version.map(|t| t.value.to_vec()),
            Some(vec![0x34])
        );
    }

    #[test]
    fn rejected_bind_has_empty_body() {
        let resp = BindTransmitterResponse::error(3, CommandStatus::InvalidPassword);
        let bytes = resp.to_bytes().unwrap();
        assert_eq!(bytes.len(), PduHeader::SIZE);

        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = BindTransmitterResponse::decode(header, &mut cursor).unwrap();
        assert_eq!(decoded.command_status, CommandStatus::InvalidPassword);
        assert!(decoded.system_id.is_empty());
    }
}
