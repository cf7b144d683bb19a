//! Content integrity verification.
//!
//! Two independent cryptographic facts are established here. First, the
//! authenticated-attribute block must be signed by the leaf certificate's
//! public key; without that, the digest the attributes carry proves nothing
//! and the whole verification is rejected outright. Second, the digest of
//! the signed payload is recomputed and compared byte-exactly against the
//! message-digest attribute value.

use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use x509_parser::prelude::*;

use crate::error::{Error, Result};
use crate::types::{DecodedSignatureMessage, DigestAlgorithm};

/// Verify the decoded signature message against the signed payload.
///
/// `leaf_cert_der` is the signer certificate (the chain's leaf). Returns the
/// integrity verdict; fails with [`Error::VerifySignature`] when the
/// authenticated attributes do not validate, which makes any digest
/// comparison meaningless.
pub fn verify_integrity(
    message: &DecodedSignatureMessage,
    signed_payload: &[u8],
    leaf_cert_der: &[u8],
) -> Result<bool> {
    let valid_authenticated_attributes = verify_signed_attrs(
        leaf_cert_der,
        message.digest_algorithm,
        &message.signed_attrs_der,
        &message.signature,
    )?;
    if !valid_authenticated_attributes {
        return Err(Error::VerifySignature(
            "wrong authenticated attributes".to_string(),
        ));
    }

    let computed = message.digest_algorithm.digest(signed_payload);
    let integrity = computed == message.message_digest;
    log::debug!(
        "payload digest {} ({} over {} bytes)",
        if integrity { "matches" } else { "does not match" },
        message.digest_algorithm.name(),
        signed_payload.len()
    );
    Ok(integrity)
}

/// Check that the DER SET of authenticated attributes was signed by the
/// leaf certificate's RSA public key.
fn verify_signed_attrs(
    leaf_cert_der: &[u8],
    algorithm: DigestAlgorithm,
    signed_attrs_der: &[u8],
    signature: &[u8],
) -> Result<bool> {
    let (_, cert) = X509Certificate::from_der(leaf_cert_der)
        .map_err(|e| Error::Parse(format!("malformed signer certificate: {}", e)))?;

    let public_key = RsaPublicKey::from_public_key_der(cert.public_key().raw)
        .map_err(|e| Error::Parse(format!("unsupported signer public key: {}", e)))?;

    let Ok(signature) = Signature::try_from(signature) else {
        return Ok(false);
    };

    let valid = match algorithm {
        DigestAlgorithm::Sha1 => VerifyingKey::<Sha1>::new(public_key)
            .verify(signed_attrs_der, &signature)
            .is_ok(),
        DigestAlgorithm::Sha256 => VerifyingKey::<Sha256>::new(public_key)
            .verify(signed_attrs_der, &signature)
            .is_ok(),
        DigestAlgorithm::Sha384 => VerifyingKey::<Sha384>::new(public_key)
            .verify(signed_attrs_der, &signature)
            .is_ok(),
        DigestAlgorithm::Sha512 => VerifyingKey::<Sha512>::new(public_key)
            .verify(signed_attrs_der, &signature)
            .is_ok(),
    };
    Ok(valid)
}
