//! Byte-stream decoding for the loader and encoding for the saver.
//!
//! The format itself is encoding agnostic; callers pick an
//! [`encoding_rs::Encoding`] per load/save call, or pass none and let the
//! loader detect one from the bytes.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::borrow::Cow;

/// Decode `bytes` with the given encoding, or detect one when `encoding`
/// is `None`. Any byte order mark is removed.
pub(crate) fn decode(bytes: &[u8], encoding: Option<&'static Encoding>) -> String {
    let encoding = encoding.unwrap_or_else(|| detect(bytes));
    let (text, ..) = encoding.decode_with_bom_removal(bytes);
    text.into_owned()
}

/// Encode `text` for writing. UTF-8 round-trips without copying.
pub(crate) fn encode<'t>(text: &'t str, encoding: &'static Encoding) -> Cow<'t, [u8]> {
    // encoding_rs's encoders emit UTF-8 for the UTF-16 encodings; write
    // the code units ourselves, with a byte order mark so a later load
    // can detect the encoding again.
    if encoding == encoding_rs::UTF_16LE {
        Cow::Owned(encode_utf16(text, u16::to_le_bytes))
    } else if encoding == encoding_rs::UTF_16BE {
        Cow::Owned(encode_utf16(text, u16::to_be_bytes))
    } else {
        let (bytes, ..) = encoding.encode(text);
        bytes
    }
}

fn encode_utf16(text: &str, to_bytes: fn(u16) -> [u8; 2]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + text.len() * 2);
    out.extend_from_slice(&to_bytes(0xFEFF));
    for unit in text.encode_utf16() {
        out.extend_from_slice(&to_bytes(unit));
    }
    out
}

fn detect(bytes: &[u8]) -> &'static Encoding {
    // Byte order marks are not properly dealt with in chardetng, detect
    // them here; decode_with_bom_removal strips them afterwards
    if bytes.len() >= 2 && bytes[0..2] == [0xFF, 0xFE] {
        encoding_rs::UTF_16LE
    } else if bytes.len() >= 2 && bytes[0..2] == [0xFE, 0xFF] {
        encoding_rs::UTF_16BE
    } else if bytes.len() >= 3 && bytes[0..3] == [0xEF, 0xBB, 0xBF] {
        encoding_rs::UTF_8
    } else {
        let mut detector = EncodingDetector::new();
        let ascii_only = !detector.feed(bytes, true);
        if ascii_only {
            encoding_rs::UTF_8
        } else {
            detector.guess(None, true)
        }
    }
}
