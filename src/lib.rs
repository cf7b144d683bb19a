//! # PDF Verify
//!
//! Verify digital signatures embedded in PDF documents.
//!
//! Given a document buffer, the engine locates the signed byte ranges,
//! decodes the embedded CMS/PKCS#7 signature envelope, and establishes three
//! independent facts:
//!
//! - **Integrity**: the signed bytes have not been altered since signing
//! - **Authenticity**: every link of the certificate chain validates
//! - **Expiry**: no certificate in the chain is outside its validity window
//!
//! ## Supported Signature Types
//!
//! - PKCS#7 detached signatures (adbe.pkcs7.detached)
//! - PAdES signatures (ETSI.CAdES.detached)
//!
//! Signing, encryption, non-detached signature types, and CRL/OCSP
//! revocation checks are out of scope. The top-of-chain certificate is
//! treated as implicitly trusted when its issuer is not part of the
//! envelope; no external trust store is consulted.
//!
//! ## Quick Start
//!
//! ```no_run
//! let pdf = std::fs::read("signed.pdf")?;
//!
//! let result = pdf_verify::verify_pdf(&pdf);
//! println!(
//!     "verified: {} (integrity: {}, authenticity: {}, expired: {})",
//!     result.verified, result.integrity, result.authenticity, result.expired
//! );
//! for cert in &result.meta.certs {
//!     println!("  {}", cert.subject);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! Verification never returns an error: malformed or adversarial input
//! collapses into a `verified: false` result carrying the error kind and
//! message, so a caller handing the engine untrusted bytes always receives
//! a value.
//!
//! ## PDF Specification Reference
//!
//! - ISO 32000-1:2008 Section 12.8 - Digital Signatures
//! - ETSI TS 102 778 - PAdES

#![warn(missing_docs)]

// Error handling
pub mod error;

// Byte-range location and signature extraction
pub mod byterange;

// Signature envelope decoding
pub mod envelope;

// Cryptographic checks
pub mod chain;
pub mod integrity;

// Signer-asserted metadata probes
pub mod meta;

// Data model
pub mod types;

// Orchestration
mod verifier;

pub use byterange::{extract_signature, get_byte_range, ExtractedSignature};
pub use chain::ChainAnalysis;
pub use error::{Error, ErrorKind, Result};
pub use types::{
    ByteRange, CertificateDetails, DecodedSignatureMessage, DigestAlgorithm, SignatureMeta,
    SubFilter, VerificationMeta, VerificationResult,
};
pub use verifier::{get_certificates_info, verify_pdf};
