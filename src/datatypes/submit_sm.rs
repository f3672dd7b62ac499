use crate::codec::{
    decode_cstring, decode_u8, encode_cstring, CodecError, Decodable, Encodable, PduHeader,
};
use crate::datatypes::numeric_plan_indicator::NumericPlanIndicator;
use crate::datatypes::tlv::Tlv;
use crate::datatypes::{CommandId, CommandStatus, DataCoding, TypeOfNumber};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

// Field limits including the NUL terminator
const MAX_SERVICE_TYPE_LENGTH: usize = 6;
const MAX_ADDRESS_LENGTH: usize = 21;
const MAX_TIME_LENGTH: usize = 17;
const MAX_MESSAGE_ID_LENGTH: usize = 65;

/// Largest payload the sm_length octet can describe
pub const MAX_SHORT_MESSAGE_LENGTH: usize = 254;

/// This operation is used by an ESME to submit a short message to the SMSC for onward transmission
/// to a specified short message entity (SME).
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// 4.1.1 service_type: SMS application service, empty for the SMSC default.
    pub service_type: String,

    pub source_addr_ton: TypeOfNumber,
    pub source_addr_npi: NumericPlanIndicator,

    /// 4.1.4 source_addr: originating address, at most 20 octets.
    pub source_addr: String,

    pub dest_addr_ton: TypeOfNumber,
    pub dest_addr_npi: NumericPlanIndicator,

    /// 4.1.7 destination_addr: recipient MSISDN, at most 20 octets.
    pub destination_addr: String,

    pub esm_class: u8,
    pub protocol_id: u8,
    /// 0 (lowest) to 3 (highest)
    pub priority_flag: u8,

    /// Empty for immediate delivery
    pub schedule_delivery_time: String,
    /// Empty for the SMSC default validity
    pub validity_period: String,

    /// Bit 0: request an SMSC delivery receipt
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: DataCoding,
    pub sm_default_msg_id: u8,

    /// Encoded payload. sm_length is derived from it.
    pub short_message: Bytes,

    pub tlvs: Vec<Tlv>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// Identifier the SMSC assigned to the message. Empty when rejected.
    pub message_id: String,
}

impl SubmitSm {
    /// A submit_sm with every optional field at its default
    pub fn new(
        sequence_number: u32,
        source_addr: impl Into<String>,
        destination_addr: impl Into<String>,
        short_message: impl Into<Bytes>,
    ) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            service_type: String::new(),
            source_addr_ton: TypeOfNumber::Unknown,
            source_addr_npi: NumericPlanIndicator::Unknown,
            source_addr: source_addr.into(),
            dest_addr_ton: TypeOfNumber::Unknown,
            dest_addr_npi: NumericPlanIndicator::Unknown,
            destination_addr: destination_addr.into(),
            esm_class: 0,
            protocol_id: 0,
            priority_flag: 0,
            schedule_delivery_time: String::new(),
            validity_period: String::new(),
            registered_delivery: 0,
            replace_if_present_flag: 0,
            data_coding: DataCoding::default(),
            sm_default_msg_id: 0,
            short_message: short_message.into(),
            tlvs: Vec::new(),
        }
    }

    pub fn find_tlv(&self, tag: u16) -> Option<&Tlv> {
        self.tlvs.iter().find(|tlv| tlv.tag == tag)
    }
}

impl Encodable for SubmitSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        if self.short_message.len() > MAX_SHORT_MESSAGE_LENGTH {
            return Err(CodecError::FieldValidation {
                field: "short_message",
                reason: format!(
                    "{} octets exceeds limit of {MAX_SHORT_MESSAGE_LENGTH}",
                    self.short_message.len()
                ),
            });
        }

        PduHeader {
            command_length: 0,
            command_id: CommandId::SubmitSm,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        }
        .encode(buf);

        encode_cstring(buf, &self.service_type, MAX_SERVICE_TYPE_LENGTH, "service_type")?;
        buf.put_u8(self.source_addr_ton.into());
        buf.put_u8(self.source_addr_npi.into());
        encode_cstring(buf, &self.source_addr, MAX_ADDRESS_LENGTH, "source_addr")?;
        buf.put_u8(self.dest_addr_ton.into());
        buf.put_u8(self.dest_addr_npi.into());
        encode_cstring(
            buf,
            &self.destination_addr,
            MAX_ADDRESS_LENGTH,
            "destination_addr",
        )?;
        buf.put_u8(self.esm_class);
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag);
        encode_cstring(
            buf,
            &self.schedule_delivery_time,
            MAX_TIME_LENGTH,
            "schedule_delivery_time",
        )?;
        encode_cstring(buf, &self.validity_period, MAX_TIME_LENGTH, "validity_period")?;
        buf.put_u8(self.registered_delivery);
        buf.put_u8(self.replace_if_present_flag);
        buf.put_u8(self.data_coding.to_byte());
        buf.put_u8(self.sm_default_msg_id);
        buf.put_u8(self.short_message.len() as u8);
        buf.put_slice(&self.short_message);

        for tlv in &self.tlvs {
            tlv.encode(buf)?;
        }
        Ok(())
    }
}

fn decode_ton(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<TypeOfNumber, CodecError> {
    TypeOfNumber::try_from(decode_u8(buf)?).map_err(|e| CodecError::FieldValidation {
        field,
        reason: e.to_string(),
    })
}

fn decode_npi(
    buf: &mut Cursor<&[u8]>,
    field: &'static str,
) -> Result<NumericPlanIndicator, CodecError> {
    NumericPlanIndicator::try_from(decode_u8(buf)?).map_err(|e| CodecError::FieldValidation {
        field,
        reason: e.to_string(),
    })
}

impl Decodable for SubmitSm {
    fn command_id() -> CommandId {
        CommandId::SubmitSm
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let service_type = decode_cstring(buf, MAX_SERVICE_TYPE_LENGTH, "service_type")?;
        let source_addr_ton = decode_ton(buf, "source_addr_ton")?;
        let source_addr_npi = decode_npi(buf, "source_addr_npi")?;
        let source_addr = decode_cstring(buf, MAX_ADDRESS_LENGTH, "source_addr")?;
        let dest_addr_ton = decode_ton(buf, "dest_addr_ton")?;
        let dest_addr_npi = decode_npi(buf, "dest_addr_npi")?;
        let destination_addr = decode_cstring(buf, MAX_ADDRESS_LENGTH, "destination_addr")?;
        let esm_class = decode_u8(buf)?;
        let protocol_id = decode_u8(buf)?;
        let priority_flag = decode_u8(buf)?;
        let schedule_delivery_time =
            decode_cstring(buf, MAX_TIME_LENGTH, "schedule_delivery_time")?;
        let validity_period = decode_cstring(buf, MAX_TIME_LENGTH, "validity_period")?;
        let registered_delivery = decode_u8(buf)?;
        let replace_if_present_flag = decode_u8(buf)?;
        let data_coding = DataCoding::from_byte(decode_u8(buf)?);
        let sm_default_msg_id = decode_u8(buf)?;

        let sm_length = decode_u8(buf)? as usize;
        if buf.remaining() < sm_length {
            return Err(CodecError::FieldValidation {
                field: "short_message",
                reason: format!(
                    "sm_length {sm_length} exceeds remaining {} octets",
                    buf.remaining()
                ),
            });
        }
        let short_message = buf.copy_to_bytes(sm_length);
        let tlvs = Tlv::decode_all(buf)?;

        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            service_type,
            source_addr_ton,
            source_addr_npi,
            source_addr,
            dest_addr_ton,
            dest_addr_npi,
            destination_addr,
            esm_class,
            protocol_id,
            priority_flag,
            schedule_delivery_time,
            validity_period,
            registered_delivery,
            replace_if_present_flag,
            data_coding,
            sm_default_msg_id,
            short_message,
            tlvs,
        })
    }
}

impl SubmitSmResponse {
    pub fn new(sequence_number: u32, message_id: impl Into<String>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id: message_id.into(),
        }
    }

    pub fn error(sequence_number: u32, status: CommandStatus) -> Self {
        Self {
            command_status: status,
            sequence_number,
            message_id: String::new(),
        }
    }
}

impl Encodable for SubmitSmResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader {
            command_length: 0,
            command_id: CommandId::SubmitSmResp,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        }
        .encode(buf);

        if self.command_status.is_ok() {
            encode_cstring(buf, &self.message_id, MAX_MESSAGE_ID_LENGTH, "message_id")?;
        }
        Ok(())
    }
}

impl Decodable for SubmitSmResponse {
    fn command_id() -> CommandId {
        CommandId::SubmitSmResp
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        // Error responses usually omit the body
        let message_id = if buf.has_remaining() {
            decode_cstring(buf, MAX_MESSAGE_ID_LENGTH, "message_id")?
        } else {
            String::new()
        };

        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::tlv::tags;

    fn sample() -> SubmitSm {
        let mut sm = SubmitSm::new(2, "SENDER", "447700900123", Bytes::from_static(b"hi"));
        sm.source_addr_ton = TypeOfNumber::Alphanumeric;
        sm.dest_addr_ton = TypeOfNumber::International;
        sm.dest_addr_npi = NumericPlanIndicator::Isdn;
        sm.registered_delivery = 1;
        sm.tlvs
            .push(Tlv::cstring(tags::RECEIPTED_MESSAGE_ID, "abc-1"));
        sm
    }

    #[test]
    fn submit_sm_wire_layout() {
        let bytes = sample().to_bytes().unwrap();

        let mut expected: Vec<u8> = vec![0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 2];
        expected.push(0); // service_type
        expected.extend_from_slice(&[0x05, 0x00]);
        expected.extend_from_slice(b"SENDER\0");
        expected.extend_from_slice(&[0x01, 0x01]);
        expected.extend_from_slice(b"447700900123\0");
        expected.extend_from_slice(&[0, 0, 0]); // esm_class, protocol_id, priority
        expected.extend_from_slice(&[0, 0]); // schedule, validity
        expected.extend_from_slice(&[1, 0, 0, 0]);
        expected.extend_from_slice(&[2, b'h', b'i']);
        expected.extend_from_slice(&[0x00, 0x1E, 0x00, 0x06]);
        expected.extend_from_slice(b"abc-1\0");
        let len = expected.len() as u32;
        expected[0..4].copy_from_slice(&len.to_be_bytes());

        assert_eq!(bytes.as_ref(), expected.as_slice());
    }

    #[test]
    fn submit_sm_decodes_tlvs() {
        let original = sample();
        let bytes = original.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = SubmitSm::decode(header, &mut cursor).unwrap();

        assert_eq!(decoded, original);
        assert_eq!(
            decoded
                .find_tlv(tags::RECEIPTED_MESSAGE_ID)
                .and_then(Tlv::as_cstring)
                .as_deref(),
            Some("abc-1")
        );
    }

    #[test]
    fn oversized_message_is_rejected() {
        let sm = SubmitSm::new(1, "a", "b", vec![0u8; MAX_SHORT_MESSAGE_LENGTH + 1]);
        assert!(matches!(
            sm.to_bytes(),
            Err(CodecError::FieldValidation {
                field: "short_message",
                ..
            })
        ));
    }

    #[test]
    fn long_destination_is_rejected() {
        let sm = SubmitSm::new(1, "a", "123456789012345678901", Bytes::new());
        assert!(matches!(
            sm.to_bytes(),
            Err(CodecError::FieldValidation {
                field: "destination_addr",
                ..
            })
        ));
    }

    #[test]
    fn response_without_body() {
        let resp = SubmitSmResponse::error(8, CommandStatus::ThrottlingError);
        let bytes = resp.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = SubmitSmResponse::decode(header, &mut cursor).unwrap();
        assert_eq!(decoded, resp);
    }

    #[test]
    fn response_with_message_id() {
        let resp = SubmitSmResponse::new(8, "0A1B2C");
        let bytes = resp.to_bytes().unwrap();
        assert_eq!(&bytes[16..], b"0A1B2C\0");
    }
}
