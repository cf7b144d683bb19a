//! Error types for the signature verification engine.
//!
//! Verification of untrusted input must never crash the caller, so every
//! error raised during extraction, decoding, or cryptographic checks is
//! caught at the orchestrator boundary and folded into a negative
//! [`VerificationResult`](crate::VerificationResult). The error kind is
//! preserved there for diagnostics.

use serde::Serialize;

/// Result type alias for verification operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while verifying a signed PDF.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input is empty or cannot be treated as a PDF byte buffer
    #[error("PDF expected as a non-empty byte buffer")]
    InputType,

    /// Structural parse failure: ByteRange marker absent or malformed,
    /// SubFilter absent, digest algorithm unrecognized, or the signature
    /// envelope undecodable after the retry budget is exhausted
    #[error("Failed to parse signed document: {0}")]
    Parse(String),

    /// SubFilter is present but names a signature type the engine cannot
    /// interpret
    #[error("SubFilter {0} is not supported")]
    UnsupportedSubFilter(String),

    /// The declared ByteRange does not cover the whole buffer (content was
    /// appended after signing)
    #[error("Failed byte range verification: {0}")]
    ByteRangeVerification(String),

    /// The authenticated attributes do not validate against the signer's
    /// public key
    #[error("Signature verification failed: {0}")]
    VerifySignature(String),
}

impl Error {
    /// Machine-readable kind of this error, carried in negative results.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InputType => ErrorKind::InputType,
            Error::Parse(_) => ErrorKind::Parse,
            Error::UnsupportedSubFilter(_) => ErrorKind::UnsupportedSubFilter,
            Error::ByteRangeVerification(_) => ErrorKind::ByteRangeVerification,
            Error::VerifySignature(_) => ErrorKind::VerifySignature,
        }
    }
}

/// Discriminant of [`Error`], suitable for matching and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Input was not a usable byte buffer
    InputType,
    /// Structural parse failure
    Parse,
    /// Signature type not supported
    UnsupportedSubFilter,
    /// Signed region does not cover the buffer
    ByteRangeVerification,
    /// Authenticated attributes failed to validate
    VerifySignature,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::Parse("failed to locate ByteRange".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Failed to parse"));
        assert!(msg.contains("ByteRange"));

        let err = Error::UnsupportedSubFilter("adbe.pkcs7.sha1".to_string());
        assert!(format!("{}", err).contains("adbe.pkcs7.sha1"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::InputType.kind(), ErrorKind::InputType);
        assert_eq!(Error::Parse(String::new()).kind(), ErrorKind::Parse);
        assert_eq!(
            Error::ByteRangeVerification(String::new()).kind(),
            ErrorKind::ByteRangeVerification
        );
        assert_eq!(
            Error::VerifySignature(String::new()).kind(),
            ErrorKind::VerifySignature
        );
    }

    #[test]
    fn test_error_kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorKind::ByteRangeVerification).unwrap();
        assert_eq!(json, "\"BYTE_RANGE_VERIFICATION\"");
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
