// ABOUTME: Strongly-typed SMPP data_coding values for the character sets the gateway submits
// ABOUTME: Maps between the wire byte and the named coding schemes of SMPP v3.4 Section 5.2.19

use std::fmt;

/// Data coding scheme sent in the submit_sm `data_coding` field.
///
/// Only the schemes the gateway can produce are named; anything else read
/// off the wire is kept as `Custom`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum DataCoding {
    /// SMSC Default Alphabet (GSM 03.38 on most carriers)
    #[default]
    SmscDefault,
    /// IA5 (CCITT T.50)/ASCII
    Ascii,
    /// 8-bit binary
    Binary,
    /// Latin-1 (ISO-8859-1)
    Latin1,
    /// Cyrillic (ISO-8859-5)
    Cyrillic,
    /// UCS-2 (ISO/IEC-10646)
    Ucs2,
    /// Any other value
    Custom(u8),
}

impl DataCoding {
    pub fn from_byte(value: u8) -> Self {
        match value {
            0x00 => DataCoding::SmscDefault,
            0x01 => DataCoding::Ascii,
            0x02 | 0x04 => DataCoding::Binary,
            0x03 => DataCoding::Latin1,
            0x06 => DataCoding::Cyrillic,
            0x08 => DataCoding::Ucs2,
            other => DataCoding::Custom(other),
        }
    }

    pub fn to_byte(&self) -> u8 {
        match self {
            DataCoding::SmscDefault => 0x00,
            DataCoding::Ascii => 0x01,
            DataCoding::Binary => 0x02,
            DataCoding::Latin1 => 0x03,
            DataCoding::Cyrillic => 0x06,
            DataCoding::Ucs2 => 0x08,
            DataCoding::Custom(value) => *value,
        }
    }

    pub fn charset_name(&self) -> &'static str {
        match self {
            DataCoding::SmscDefault => "GSM 7-bit Default",
            DataCoding::Ascii => "ASCII/IA5",
            DataCoding::Binary => "Binary",
            DataCoding::Latin1 => "ISO-8859-1",
            DataCoding::Cyrillic => "ISO-8859-5",
            DataCoding::Ucs2 => "UCS-2",
            DataCoding::Custom(_) => "Custom/Reserved",
        }
    }
}

impl fmt::Display for DataCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.charset_name(), self.to_byte())
    }
}
