// ABOUTME: Text encodings a caller can request for a message body, with the matching data_coding
// ABOUTME: GSM 03.38 (unpacked and packed), ISO-8859-5, Latin-1, UCS-2 and raw UTF-8

use crate::datatypes::DataCoding;
use bytes::Bytes;

const ESCAPE: u8 = 0x1B;
const REPLACEMENT: u8 = b'?';

/// GSM 03.38 default alphabet indexed by septet value. 0x1B is the escape
/// to the extension table and never maps to a character.
const GSM_BASIC: [char; 128] = [
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å', //
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', '\u{1B}', 'Æ', 'æ', 'ß', 'É', //
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', //
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?', //
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', //
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§', //
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', //
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à', //
];

/// Characters reached through the 0x1B escape
fn gsm_extension(c: char) -> Option<u8> {
    let septet = match c {
        '\u{0C}' => 0x0A,
        '^' => 0x14,
        '{' => 0x28,
        '}' => 0x29,
        '\\' => 0x2F,
        '[' => 0x3C,
        '~' => 0x3D,
        ']' => 0x3E,
        '|' => 0x40,
        '€' => 0x65,
        _ => return None,
    };
    Some(septet)
}

fn gsm_basic(c: char) -> Option<u8> {
    if c == '\u{1B}' {
        return None;
    }
    GSM_BASIC.iter().position(|&g| g == c).map(|i| i as u8)
}

/// Text to GSM septets, one per octet, escapes included
fn gsm_septets(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        if let Some(septet) = gsm_basic(c) {
            out.push(septet);
        } else if let Some(septet) = gsm_extension(c) {
            out.push(ESCAPE);
            out.push(septet);
        } else {
            out.push(REPLACEMENT);
        }
    }
    out
}

/// Packs septets eight-into-seven, least significant bits first
fn pack_septets(septets: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(septets.len() * 7 / 8 + 1);
    let mut acc: u16 = 0;
    let mut bits = 0u32;

    for &septet in septets {
        acc |= u16::from(septet & 0x7F) << bits;
        bits += 7;
        while bits >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        out.push(acc as u8);
    }
    out
}

fn iso_8859_5(c: char) -> u8 {
    let cp = c as u32;
    match cp {
        0x00..=0xA0 => cp as u8,
        0xAD => 0xAD,
        0xA7 => 0xFD,
        0x2116 => 0xF0,
        0x0401..=0x040C | 0x040E..=0x044F | 0x0451..=0x045C | 0x045E..=0x045F => {
            (cp - 0x0360) as u8
        }
        _ => REPLACEMENT,
    }
}

fn latin1(c: char) -> u8 {
    u8::try_from(u32::from(c)).unwrap_or(REPLACEMENT)
}

/// Encoding strategy chosen by the request's `text_type` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Gsm7,
    Gsm7Packed,
    Iso88595,
    Latin1,
    Ucs2,
    /// UTF-8 bytes passed through untouched
    Raw,
}

/// Encoded message body plus the data_coding that describes it
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedText {
    pub data_coding: DataCoding,
    pub bytes: Bytes,
}

impl TextEncoding {
    /// Exact, case-sensitive label match. Unknown or empty labels fall back
    /// to `Raw`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "GSM7" => TextEncoding::Gsm7,
            "GSM7Packed" => TextEncoding::Gsm7Packed,
            "ISO88595" => TextEncoding::Iso88595,
            "Latin1" => TextEncoding::Latin1,
            "UCS2" => TextEncoding::Ucs2,
            _ => TextEncoding::Raw,
        }
    }

    pub fn data_coding(&self) -> DataCoding {
        match self {
            TextEncoding::Gsm7 | TextEncoding::Gsm7Packed | TextEncoding::Raw => {
                DataCoding::SmscDefault
            }
            TextEncoding::Iso88595 => DataCoding::Cyrillic,
            TextEncoding::Latin1 => DataCoding::Latin1,
            TextEncoding::Ucs2 => DataCoding::Ucs2,
        }
    }

    pub fn encode(&self, text: &str) -> EncodedText {
        let bytes: Vec<u8> = match self {
            TextEncoding::Gsm7 => gsm_septets(text),
            TextEncoding::Gsm7Packed => pack_septets(&gsm_septets(text)),
            TextEncoding::Iso88595 => text.chars().map(iso_8859_5).collect(),
            TextEncoding::Latin1 => text.chars().map(latin1).collect(),
            TextEncoding::Ucs2 => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            TextEncoding::Raw => text.as_bytes().to_vec(),
        };

        EncodedText {
            data_coding: self.data_coding(),
            bytes: Bytes::from(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_exact() {
        assert_eq!(TextEncoding::from_label("GSM7"), TextEncoding::Gsm7);
        assert_eq!(TextEncoding::from_label("GSM7Packed"), TextEncoding::Gsm7Packed);
        assert_eq!(TextEncoding::from_label("ISO88595"), TextEncoding::Iso88595);
        assert_eq!(TextEncoding::from_label("Latin1"), TextEncoding::Latin1);
        assert_eq!(TextEncoding::from_label("UCS2"), TextEncoding::Ucs2);
        assert_eq!(TextEncoding::from_label("gsm7"), TextEncoding::Raw);
        assert_eq!(TextEncoding::from_label(""), TextEncoding::Raw);
    }

    #[test]
    fn gsm7_packs_published_vector() {
        let encoded = TextEncoding::Gsm7Packed.encode("hello");
        assert_eq!(encoded.bytes.as_ref(), &[0xE8, 0x32, 0x9B, 0xFD, 0x06]);
        assert_eq!(encoded.data_coding, DataCoding::SmscDefault);
    }

    #[test]
    fn gsm7_eight_septets_fill_seven_octets() {
        let encoded = TextEncoding::Gsm7Packed.encode("12345678");
        assert_eq!(
            encoded.bytes.as_ref(),
            &[0x31, 0xD9, 0x8C, 0x56, 0xB3, 0xDD, 0x70]
        );
    }

    #[test]
    fn gsm7_unpacked_uses_escape_table() {
        let encoded = TextEncoding::Gsm7.encode("a€[@");
        assert_eq!(encoded.bytes.as_ref(), &[0x61, 0x1B, 0x65, 0x1B, 0x3C, 0x00]);
    }

    #[test]
    fn gsm7_replaces_unmappable() {
        let encoded = TextEncoding::Gsm7.encode("Я");
        assert_eq!(encoded.bytes.as_ref(), b"?");
    }

    #[test]
    fn cyrillic_maps_to_iso_8859_5() {
        let encoded = TextEncoding::Iso88595.encode("Привет ё№");
        assert_eq!(
            encoded.bytes.as_ref(),
            &[0xBF, 0xE0, 0xD8, 0xD2, 0xD5, 0xE2, 0x20, 0xF1, 0xF0]
        );
        assert_eq!(encoded.data_coding, DataCoding::Cyrillic);
        assert_eq!(TextEncoding::Iso88595.encode("€").bytes.as_ref(), b"?");
    }

    #[test]
    fn latin1_keeps_single_byte_range() {
        let encoded = TextEncoding::Latin1.encode("café€");
        assert_eq!(encoded.bytes.as_ref(), &[0x63, 0x61, 0x66, 0xE9, b'?']);
        assert_eq!(encoded.data_coding.to_byte(), 0x03);
    }

    #[test]
    fn ucs2_is_big_endian() {
        let encoded = TextEncoding::Ucs2.encode("Hi€");
        assert_eq!(encoded.bytes.as_ref(), &[0x00, 0x48, 0x00, 0x69, 0x20, 0xAC]);
        assert_eq!(encoded.data_coding.to_byte(), 0x08);
    }

    #[test]
    fn raw_passes_utf8_through() {
        let encoded = TextEncoding::Raw.encode("héllo");
        assert_eq!(encoded.bytes.as_ref(), "héllo".as_bytes());
        assert_eq!(encoded.data_coding.to_byte(), 0x00);
    }
}
