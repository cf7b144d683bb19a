//! ByteRange location and signature extraction.
//!
//! PDF digital signatures use a ByteRange array to specify which portions of
//! the document are covered by the signature. The signature itself is stored
//! in a hex string between the two covered spans and is excluded from the
//! signed bytes:
//!
//! `[offset1, length1, offset2, length2]`
//!
//! A well-formed signed document therefore decomposes into
//! `buf[offset1..offset1+length1]`, the hex envelope (enclosed in `<` and
//! `>`), and `buf[offset2..offset2+length2]` which runs to the end of the
//! file. Anything after `offset2 + length2` was appended after signing.

use lazy_static::lazy_static;
use regex::bytes::Regex;

use crate::error::{Error, Result};
use crate::meta;
use crate::types::{ByteRange, SignatureMeta};

lazy_static! {
    static ref BYTE_RANGE_RE: Regex = Regex::new(r"(\d+)\s+(\d+)\s+(\d+)\s+(\d+)").unwrap();
}

/// A signature extracted from a signed document.
#[derive(Debug, Clone)]
pub struct ExtractedSignature {
    /// The four ByteRange integers
    pub byte_range: ByteRange,
    /// Concatenation of the two covered spans, the integrity hash input
    pub signed_data: Vec<u8>,
    /// Hex-encoded signature envelope with trailing zero padding stripped
    pub signature_hex: String,
    /// Best-effort signer-asserted metadata from the signed region
    pub signature_meta: SignatureMeta,
}

/// Find the last occurrence of `needle` in `haystack`.
fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).rev().find(|&i| haystack[i..].starts_with(needle))
}

/// Locate the ByteRange declaration in a raw buffer.
///
/// The last occurrence of `/ByteRange[` (or the spaced variant
/// `/ByteRange [`) wins: earlier occurrences can be unsigned placeholder
/// text, e.g. in a form field definition, while the actual signed range is
/// the most recently written one.
pub fn get_byte_range(buf: &[u8]) -> Result<ByteRange> {
    let pos = rfind(buf, b"/ByteRange[")
        .or_else(|| rfind(buf, b"/ByteRange ["))
        .ok_or_else(|| Error::Parse("failed to locate ByteRange".to_string()))?;

    let close = buf[pos..]
        .iter()
        .position(|&b| b == b']')
        .map(|i| pos + i)
        .ok_or_else(|| Error::Parse("ByteRange is not terminated".to_string()))?;

    let window = &buf[pos..=close];
    let caps = BYTE_RANGE_RE
        .captures(window)
        .ok_or_else(|| Error::Parse("malformed ByteRange values".to_string()))?;

    let mut values = [0usize; 4];
    for (i, value) in values.iter_mut().enumerate() {
        // Capture groups are all-digit ASCII; only overflow can fail here
        let text = std::str::from_utf8(&caps[i + 1]).map_err(|_| {
            Error::Parse("malformed ByteRange values".to_string())
        })?;
        *value = text
            .parse()
            .map_err(|_| Error::Parse(format!("ByteRange value out of range: {}", text)))?;
    }

    Ok(ByteRange {
        start0: values[0],
        len0: values[1],
        start1: values[2],
        len1: values[3],
    })
}

/// Extract the signed payload and the hex signature envelope from a buffer.
///
/// Fails with [`Error::ByteRangeVerification`] if the buffer extends past the
/// declared end of the signed region, since bytes appended after signing are
/// not covered by the signature.
pub fn extract_signature(buf: &[u8]) -> Result<ExtractedSignature> {
    let byte_range = get_byte_range(buf)?;
    let end = byte_range
        .signed_end()
        .ok_or_else(|| Error::Parse("ByteRange exceeds buffer length".to_string()))?;

    if buf.len() > end {
        return Err(Error::ByteRangeVerification(format!(
            "{} bytes of content after the signed region",
            buf.len() - end
        )));
    }
    if end > buf.len() {
        return Err(Error::Parse("ByteRange exceeds buffer length".to_string()));
    }

    let first_end = byte_range
        .start0
        .checked_add(byte_range.len0)
        .filter(|&e| e <= byte_range.start1)
        .ok_or_else(|| Error::Parse("ByteRange spans overlap".to_string()))?;

    let mut signed_data = Vec::with_capacity(byte_range.len0 + byte_range.len1);
    signed_data.extend_from_slice(&buf[byte_range.start0..first_end]);
    signed_data.extend_from_slice(&buf[byte_range.start1..end]);

    // The envelope sits strictly between the spans, enclosed in < and >
    let hex_start = first_end + 1;
    let hex_end = byte_range.start1.saturating_sub(1);
    if hex_start > hex_end {
        return Err(Error::Parse("no room for a signature envelope".to_string()));
    }

    let mut signature_hex = String::from_utf8_lossy(&buf[hex_start..hex_end]).into_owned();
    // Trailing zero bytes are reservation padding, not signature content
    while signature_hex.ends_with("00") {
        signature_hex.truncate(signature_hex.len() - 2);
    }

    log::debug!(
        "extracted signature: byte range [{} {} {} {}], {} hex chars",
        byte_range.start0,
        byte_range.len0,
        byte_range.start1,
        byte_range.len1,
        signature_hex.len()
    );

    let signature_meta = meta::get_signature_meta(&signed_data);

    Ok(ExtractedSignature {
        byte_range,
        signed_data,
        signature_hex,
        signature_meta,
    })
}
