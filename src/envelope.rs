//! Signature envelope decoding.
//!
//! The hex string recovered from the ByteRange gap carries a DER-encoded
//! CMS/PKCS#7 `ContentInfo`. Signature reservations are frequently
//! over-allocated, so after stripping the unambiguous trailing `00` padding
//! the remaining bytes may still fall short of the outer DER length field.
//! Decoding therefore retries with one additional zero byte per attempt, up
//! to the theoretical maximum padding of a DER length field, instead of
//! accepting arbitrary garbage or recursing without bound.

use cms::cert::CertificateChoices;
use cms::content_info::ContentInfo;
use cms::signed_data::{SignedData, SignerInfo};
use der::asn1::OctetString;
use der::{Decode, Encode};
use lazy_static::lazy_static;
use regex::bytes::Regex;

use crate::error::{Error, Result};
use crate::types::{
    DecodedSignatureMessage, DigestAlgorithm, SubFilter, OID_MESSAGE_DIGEST, OID_SIGNED_DATA,
};

/// Maximum number of zero-byte padding corrections applied while decoding.
/// 255 is the largest value a single-byte DER length field can declare.
pub const MAX_PAD_RETRIES: usize = 255;

lazy_static! {
    static ref SUB_FILTER_RE: Regex = Regex::new(r"/SubFilter\s*/([\w.]*)").unwrap();
}

/// Check the declared `/SubFilter` before any decoding work.
///
/// Fails with [`Error::Parse`] when no SubFilter is present at all and with
/// [`Error::UnsupportedSubFilter`] for signature types the engine cannot
/// interpret (embedded timestamp-only or non-detached forms).
pub fn check_sub_filter(buf: &[u8]) -> Result<SubFilter> {
    let name = SUB_FILTER_RE
        .captures(buf)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::Parse("cannot find SubFilter".to_string()))?;

    SubFilter::from_pdf_name(&name).ok_or(Error::UnsupportedSubFilter(name))
}

/// Decode a hex signature envelope into a structured signature message.
pub fn decode_envelope(signature_hex: &str) -> Result<DecodedSignatureMessage> {
    let mut envelope = hex::decode(signature_hex)
        .map_err(|e| Error::Parse(format!("signature envelope is not valid hex: {}", e)))?;

    // Padding retries apply to the outer ContentInfo only. Once that frame
    // decodes, a wrong content type or broken SignedData is a definitive
    // verdict that no amount of padding can change.
    let mut retries = 0;
    let content_info = loop {
        match ContentInfo::from_der(&envelope) {
            Ok(content_info) => break content_info,
            Err(err) => {
                if retries >= MAX_PAD_RETRIES {
                    log::warn!("envelope still undecodable after {} padding retries", retries);
                    return Err(Error::Parse(format!("invalid signature envelope: {}", err)));
                }
                retries += 1;
                envelope.push(0x00);
            },
        }
    };
    if retries > 0 {
        log::debug!("envelope decoded after {} zero-padding corrections", retries);
    }

    let signed_data = unwrap_signed_data(&content_info)?;
    message_from_signed_data(&signed_data)
}

/// Unwrap the `SignedData` content of a decoded `ContentInfo`.
fn unwrap_signed_data(content_info: &ContentInfo) -> Result<SignedData> {
    if content_info.content_type != OID_SIGNED_DATA {
        return Err(Error::Parse(format!(
            "envelope content type {} is not signed-data",
            content_info.content_type
        )));
    }
    content_info
        .content
        .decode_as::<SignedData>()
        .map_err(|e| Error::Parse(format!("invalid signed-data structure: {}", e)))
}

/// Pull the fields the verification stages need out of a `SignedData`.
fn message_from_signed_data(signed_data: &SignedData) -> Result<DecodedSignatureMessage> {
    let signer_info = signed_data
        .signer_infos
        .0
        .iter()
        .next()
        .ok_or_else(|| Error::Parse("envelope carries no signer info".to_string()))?;

    let certificates = extract_certificates(signed_data)?;
    let digest_algorithm = DigestAlgorithm::from_oid(&signer_info.digest_alg.oid)
        .ok_or_else(|| {
            Error::Parse(format!("unsupported digest algorithm {}", signer_info.digest_alg.oid))
        })?;

    let signed_attrs = signer_info
        .signed_attrs
        .as_ref()
        .ok_or_else(|| Error::Parse("envelope carries no authenticated attributes".to_string()))?;
    // Re-serialize as SET OF: the tag under which the attributes were signed,
    // not the [0] IMPLICIT tag they carry inside the SignerInfo
    let signed_attrs_der = signed_attrs
        .to_der()
        .map_err(|e| Error::Parse(format!("cannot re-encode authenticated attributes: {}", e)))?;

    let message_digest = extract_message_digest(signer_info)?;
    let signature = signer_info.signature.as_bytes().to_vec();

    log::debug!(
        "decoded envelope: {} certificates, {} digest, {}-byte signature",
        certificates.len(),
        digest_algorithm.name(),
        signature.len()
    );

    Ok(DecodedSignatureMessage {
        certificates,
        signature,
        signed_attrs_der,
        message_digest,
        digest_algorithm,
    })
}

fn extract_certificates(signed_data: &SignedData) -> Result<Vec<Vec<u8>>> {
    let set = signed_data
        .certificates
        .as_ref()
        .ok_or_else(|| Error::Parse("envelope carries no certificates".to_string()))?;

    let mut ders = Vec::new();
    for choice in set.0.iter() {
        if let CertificateChoices::Certificate(cert) = choice {
            let der = cert
                .to_der()
                .map_err(|e| Error::Parse(format!("cannot re-encode certificate: {}", e)))?;
            ders.push(der);
        }
    }
    if ders.is_empty() {
        return Err(Error::Parse("envelope carries no certificates".to_string()));
    }
    Ok(ders)
}

fn extract_message_digest(signer_info: &SignerInfo) -> Result<Vec<u8>> {
    let attrs = signer_info
        .signed_attrs
        .as_ref()
        .ok_or_else(|| Error::Parse("envelope carries no authenticated attributes".to_string()))?;

    let attr = attrs
        .iter()
        .find(|attr| attr.oid == OID_MESSAGE_DIGEST)
        .ok_or_else(|| Error::Parse("message-digest attribute missing".to_string()))?;

    let value = attr
        .values
        .iter()
        .next()
        .ok_or_else(|| Error::Parse("message-digest attribute is empty".to_string()))?;
    let octets = value
        .decode_as::<OctetString>()
        .map_err(|e| Error::Parse(format!("malformed message-digest attribute: {}", e)))?;
    Ok(octets.as_bytes().to_vec())
}
