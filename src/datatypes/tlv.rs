use crate::codec::{decode_u16, CodecError};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// Well-known optional parameter tags (SMPP v3.4 Section 5.3.2)
pub mod tags {
    pub const RECEIPTED_MESSAGE_ID: u16 = 0x001E;
    pub const SC_INTERFACE_VERSION: u16 = 0x0210;
}

/// A tagged optional parameter appended to a PDU body.
#[derive(Clone, Debug, PartialEq)]
pub struct Tlv {
    /// The Tag field uniquely identifies the optional parameter.
    pub tag: u16,

    /// The Value field; its length is written on the wire as a u16.
    pub value: Bytes,
}

impl Tlv {
    pub fn new(tag: u16, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    /// A C-Octet string value, NUL terminator included in the length
    pub fn cstring(tag: u16, value: &str) -> Self {
        let mut bytes = BytesMut::with_capacity(value.len() + 1);
        bytes.put_slice(value.as_bytes());
        bytes.put_u8(0);
        Self::new(tag, bytes.freeze())
    }

    /// Reads a C-Octet string value back, tolerating a missing terminator
    pub fn as_cstring(&self) -> Option<String> {
        let end = self
            .value
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.value.len());
        String::from_utf8(self.value[..end].to_vec()).ok()
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let length = u16::try_from(self.value.len()).map_err(|_| {
            CodecError::TlvError(format!(
                "value of tag {:#06x} is {} octets, limit is {}",
                self.tag,
                self.value.len(),
                u16::MAX
            ))
        })?;
        buf.put_u16(self.tag);
        buf.put_u16(length);
        buf.put_slice(&self.value);
        Ok(())
    }

    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let tag = decode_u16(buf)?;
        let length = decode_u16(buf)? as usize;
        if buf.remaining() < length {
            return Err(CodecError::TlvError(format!(
                "tag {tag:#06x} declares {length} octets, {} remain",
                buf.remaining()
            )));
        }
        Ok(Self {
            tag,
            value: buf.copy_to_bytes(length),
        })
    }

    /// Decodes every TLV left in the buffer
    pub fn decode_all(buf: &mut Cursor<&[u8]>) -> Result<Vec<Self>, CodecError> {
        let mut tlvs = Vec::new();
        while buf.has_remaining() {
            if buf.remaining() < 4 {
                return Err(CodecError::TlvError(format!(
                    "{} trailing octets cannot hold a TLV header",
                    buf.remaining()
                )));
            }
            tlvs.push(Self::decode(buf)?);
        }
        Ok(tlvs)
    }
}
