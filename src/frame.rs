//! SMPP v3.4 protocol frames
//!
//! A `Frame` is one complete PDU as read from or written to the wire. Only the
//! PDUs a transmitter session exchanges are decoded; anything else is kept as
//! `Unknown` so the caller can answer it with generic_nack.

use crate::codec::{CodecError, Decodable, Encodable, PduHeader, MAX_PDU_SIZE};
use crate::datatypes::{
    BindTransmitter, BindTransmitterResponse, CommandId, EnquireLink, EnquireLinkResponse,
    GenericNack, SubmitSm, SubmitSmResponse, Unbind, UnbindResponse,
};
use bytes::{Buf, Bytes};
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    BindTransmitter(BindTransmitter),
    BindTransmitterResp(BindTransmitterResponse),
    SubmitSm(Box<SubmitSm>),
    SubmitSmResp(SubmitSmResponse),
    EnquireLink(EnquireLink),
    EnquireLinkResp(EnquireLinkResponse),
    Unbind(Unbind),
    UnbindResp(UnbindResponse),
    GenericNack(GenericNack),

    /// Any PDU a transmitter has no use for
    Unknown { header: PduHeader, body: Bytes },
}

impl Frame {
    /// Checks whether `buf` holds a complete PDU and returns its length.
    ///
    /// `CodecError::Incomplete` means more bytes are needed; any other error
    /// means the stream can't be resynchronised.
    pub fn check(buf: &mut Cursor<&[u8]>) -> Result<usize, CodecError> {
        if buf.remaining() < PduHeader::SIZE {
            return Err(CodecError::Incomplete);
        }

        let command_length = u32::from_be_bytes([
            buf.chunk()[0],
            buf.chunk()[1],
            buf.chunk()[2],
            buf.chunk()[3],
        ]);

        if !(PduHeader::SIZE as u32..=MAX_PDU_SIZE).contains(&command_length) {
            return Err(CodecError::InvalidPduLength {
                length: command_length,
                min: PduHeader::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }

        if buf.remaining() < command_length as usize {
            return Err(CodecError::Incomplete);
        }

        Ok(command_length as usize)
    }

    /// Parses exactly one PDU. `pdu` must be the complete PDU as sized by
    /// `check`; the body decoder never sees bytes of the next frame.
    pub fn parse(pdu: &[u8]) -> Result<Frame, CodecError> {
        let mut buf = Cursor::new(pdu);
        let header = PduHeader::decode(&mut buf)?;
        if header.command_length as usize != pdu.len() {
            return Err(CodecError::InvalidPduLength {
                length: header.command_length,
                min: pdu.len() as u32,
                max: pdu.len() as u32,
            });
        }

        let frame = match header.command_id {
            CommandId::BindTransmitter => {
                Frame::BindTransmitter(BindTransmitter::decode(header, &mut buf)?)
            }
            CommandId::BindTransmitterResp => {
                Frame::BindTransmitterResp(BindTransmitterResponse::decode(header, &mut buf)?)
            }
            CommandId::SubmitSm => Frame::SubmitSm(Box::new(SubmitSm::decode(header, &mut buf)?)),
            CommandId::SubmitSmResp => {
                Frame::SubmitSmResp(SubmitSmResponse::decode(header, &mut buf)?)
            }
            CommandId::EnquireLink => Frame::EnquireLink(EnquireLink::decode(header, &mut buf)?),
            CommandId::EnquireLinkResp => {
                Frame::EnquireLinkResp(EnquireLinkResponse::decode(header, &mut buf)?)
            }
            CommandId::Unbind => Frame::Unbind(Unbind::decode(header, &mut buf)?),
            CommandId::UnbindResp => Frame::UnbindResp(UnbindResponse::decode(header, &mut buf)?),
            CommandId::GenericNack => Frame::GenericNack(GenericNack::decode(header, &mut buf)?),
            _ => {
                let body = buf.copy_to_bytes(buf.remaining());
                tracing::warn!(
                    command_id = format_args!("{:#010x}", u32::from(header.command_id)),
                    "unhandled PDU, treating as opaque data"
                );
                Frame::Unknown { header, body }
            }
        };

        Ok(frame)
    }

    pub fn command_id(&self) -> CommandId {
        match self {
            Frame::BindTransmitter(_) => CommandId::BindTransmitter,
            Frame::BindTransmitterResp(_) => CommandId::BindTransmitterResp,
            Frame::SubmitSm(_) => CommandId::SubmitSm,
            Frame::SubmitSmResp(_) => CommandId::SubmitSmResp,
            Frame::EnquireLink(_) => CommandId::EnquireLink,
            Frame::EnquireLinkResp(_) => CommandId::EnquireLinkResp,
            Frame::Unbind(_) => CommandId::Unbind,
            Frame::UnbindResp(_) => CommandId::UnbindResp,
            Frame::GenericNack(_) => CommandId::GenericNack,
            Frame::Unknown { header, .. } => header.command_id,
        }
    }

    pub fn sequence_number(&self) -> u32 {
        match self {
            Frame::BindTransmitter(pdu) => pdu.sequence_number,
            Frame::BindTransmitterResp(pdu) => pdu.sequence_number,
            Frame::SubmitSm(pdu) => pdu.sequence_number,
            Frame::SubmitSmResp(pdu) => pdu.sequence_number,
            Frame::EnquireLink(pdu) => pdu.sequence_number,
            Frame::EnquireLinkResp(pdu) => pdu.sequence_number,
            Frame::Unbind(pdu) => pdu.sequence_number,
            Frame::UnbindResp(pdu) => pdu.sequence_number,
            Frame::GenericNack(pdu) => pdu.sequence_number,
            Frame::Unknown { header, .. } => header.sequence_number,
        }
    }

    pub fn is_response(&self) -> bool {
        self.command_id().is_response()
    }

    /// Serialises the frame for the wire. Unknown frames are written back
    /// verbatim.
    pub fn to_bytes(&self) -> Result<Bytes, CodecError> {
        match self {
            Frame::BindTransmitter(pdu) => pdu.to_bytes(),
            Frame::BindTransmitterResp(pdu) => pdu.to_bytes(),
            Frame::SubmitSm(pdu) => pdu.to_bytes(),
            Frame::SubmitSmResp(pdu) => pdu.to_bytes(),
            Frame::EnquireLink(pdu) => pdu.to_bytes(),
            Frame::EnquireLinkResp(pdu) => pdu.to_bytes(),
            Frame::Unbind(pdu) => pdu.to_bytes(),
            Frame::UnbindResp(pdu) => pdu.to_bytes(),
            Frame::GenericNack(pdu) => pdu.to_bytes(),
            Frame::Unknown { header, body } => {
                let mut buf = bytes::BytesMut::with_capacity(PduHeader::SIZE + body.len());
                PduHeader {
                    command_length: (PduHeader::SIZE + body.len()) as u32,
                    ..header.clone()
                }
                .encode(&mut buf);
                buf.extend_from_slice(body);
                Ok(buf.freeze())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::CommandStatus;

    #[test]
    fn check_reports_length() {
        let bytes = EnquireLink::new(42).to_bytes().unwrap();
        let mut buf = Cursor::new(bytes.as_ref());
        assert_eq!(Frame::check(&mut buf).unwrap(), 16);

        let mut short = Cursor::new(&bytes[..12]);
        assert!(matches!(Frame::check(&mut short), Err(CodecError::Incomplete)));
    }

    #[test]
    fn check_rejects_bad_length() {
        let data = [0u8, 0, 0, 4, 0, 0, 0, 0x15, 0, 0, 0, 0, 0, 0, 0, 1];
        let mut buf = Cursor::new(&data[..]);
        assert!(matches!(
            Frame::check(&mut buf),
            Err(CodecError::InvalidPduLength { length: 4, .. })
        ));
    }

    #[test]
    fn parse_dispatches_on_command_id() {
        let bytes = SubmitSmResponse::new(5, "X1").to_bytes().unwrap();
        let frame = Frame::parse(&bytes).unwrap();
        assert_eq!(frame.command_id(), CommandId::SubmitSmResp);
        assert_eq!(frame.sequence_number(), 5);
        assert!(frame.is_response());
        assert!(matches!(frame, Frame::SubmitSmResp(ref r) if r.message_id == "X1"));
    }

    #[test]
    fn unknown_pdu_is_kept_opaque() {
        let mut data = Vec::new();
        data.extend_from_slice(&20u32.to_be_bytes());
        data.extend_from_slice(&0x0000_0005u32.to_be_bytes()); // deliver_sm
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&9u32.to_be_bytes());
        data.extend_from_slice(&[1, 2, 3, 4]);

        let frame = Frame::parse(&data).unwrap();
        match &frame {
            Frame::Unknown { header, body } => {
                assert_eq!(header.command_id, CommandId::DeliverSm);
                assert_eq!(body.as_ref(), &[1, 2, 3, 4]);
            }
            other => panic!("expected Unknown, got {other:?}"),
        }
        assert_eq!(frame.to_bytes().unwrap().as_ref(), data.as_slice());
    }

    #[test]
    fn trailing_garbage_in_header_only_pdu_fails() {
        let mut data = EnquireLinkResponse::new(3).to_bytes().unwrap().to_vec();
        data.extend_from_slice(&[0xFF, 0xFF]);
        data[0..4].copy_from_slice(&18u32.to_be_bytes());
        assert!(Frame::parse(&data).is_err());
    }

    #[test]
    fn generic_nack_frame() {
        let bytes = GenericNack::new(CommandStatus::InvalidCommandLength, 0)
            .to_bytes()
            .unwrap();
        let frame = Frame::parse(&bytes).unwrap();
        assert!(matches!(
            frame,
            Frame::GenericNack(GenericNack {
                command_status: CommandStatus::InvalidCommandLength,
                sequence_number: 0
            })
        ));
    }
}
