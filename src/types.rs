//! Data model for signature verification.
//!
//! These types flow strictly forward through the engine: raw buffer → byte
//! range → envelope → decoded message → verdict. None of them is mutated
//! after construction.

use der::asn1::ObjectIdentifier;
use serde::Serialize;

use crate::error::ErrorKind;

/// OID of the CMS message-digest authenticated attribute (1.2.840.113549.1.9.4).
pub(crate) const OID_MESSAGE_DIGEST: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.4");

/// OID of the PKCS#7 signed-data content type (1.2.840.113549.1.7.2).
pub(crate) const OID_SIGNED_DATA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");

const OID_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.14.3.2.26");
const OID_SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");
const OID_SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.2");
const OID_SHA512: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.3");

/// Digest algorithm declared in the signature envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DigestAlgorithm {
    /// SHA-1 (deprecated, but still common in legacy PDFs)
    Sha1,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl DigestAlgorithm {
    /// Resolve a digest algorithm identifier OID, if recognized.
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        match *oid {
            OID_SHA1 => Some(DigestAlgorithm::Sha1),
            OID_SHA256 => Some(DigestAlgorithm::Sha256),
            OID_SHA384 => Some(DigestAlgorithm::Sha384),
            OID_SHA512 => Some(DigestAlgorithm::Sha512),
            _ => None,
        }
    }

    /// Get the name of this algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }

    /// Hash `data` with this algorithm.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        use sha1::Sha1;
        use sha2::{Digest, Sha256, Sha384, Sha512};
        match self {
            DigestAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

/// Detached-signature sub-filter types the engine can interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubFilter {
    /// adbe.pkcs7.detached - PKCS#7 detached signature
    Pkcs7Detached,
    /// ETSI.CAdES.detached - PAdES CAdES signature
    CadesDetached,
}

impl SubFilter {
    /// Parse a PDF name into a supported sub-filter. Matching is trimmed
    /// and ASCII-case-insensitive, as produced by different writers.
    pub fn from_pdf_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("adbe.pkcs7.detached") {
            Some(SubFilter::Pkcs7Detached)
        } else if name.eq_ignore_ascii_case("etsi.cades.detached") {
            Some(SubFilter::CadesDetached)
        } else {
            None
        }
    }

    /// Get the canonical PDF name for this sub-filter.
    pub fn as_pdf_name(&self) -> &'static str {
        match self {
            SubFilter::Pkcs7Detached => "adbe.pkcs7.detached",
            SubFilter::CadesDetached => "ETSI.CAdES.detached",
        }
    }
}

/// Signer-asserted metadata probed from the signed portion of the document.
///
/// Each field is optional and extracted best-effort; absence is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignatureMeta {
    /// Reason for signing (`/Reason`)
    pub reason: Option<String>,
    /// Contact information of the signer (`/ContactInfo`)
    pub contact_info: Option<String>,
    /// Location where the document was signed (`/Location`)
    pub location: Option<String>,
}

/// The four ByteRange integers and derived signed-region geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteRange {
    /// Offset of the first signed span (normally 0)
    pub start0: usize,
    /// Length of the first signed span
    pub len0: usize,
    /// Offset of the second signed span
    pub start1: usize,
    /// Length of the second signed span
    pub len1: usize,
}

impl ByteRange {
    /// End of the signed region; in a well-formed document this equals the
    /// total buffer length. `None` when the declared offsets do not fit in
    /// an address, which only happens for hostile input.
    pub fn signed_end(&self) -> Option<usize> {
        self.start1.checked_add(self.len1)
    }
}

/// The structured signature message decoded from the envelope.
#[derive(Debug, Clone)]
pub struct DecodedSignatureMessage {
    /// DER-encoded certificates carried in the envelope, in envelope order
    pub certificates: Vec<Vec<u8>>,
    /// Raw signature bytes from the signer info
    pub signature: Vec<u8>,
    /// Authenticated attributes re-serialized as a DER SET; these are the
    /// exact bytes covered by the signature
    pub signed_attrs_der: Vec<u8>,
    /// Value of the message-digest authenticated attribute
    pub message_digest: Vec<u8>,
    /// Digest algorithm declared by the signer info
    pub digest_algorithm: DigestAlgorithm,
}

/// Parsed details of one certificate in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateDetails {
    /// Full subject distinguished name
    pub subject: String,
    /// Full issuer distinguished name
    pub issuer: String,
    /// Subject common name, when present
    pub common_name: Option<String>,
    /// Issuer common name, when present
    pub issuer_common_name: Option<String>,
    /// Serial number as a hex string
    pub serial_number: String,
    /// Start of the validity window
    pub not_before: String,
    /// End of the validity window
    pub not_after: String,
    /// Whether this is the signer (leaf) certificate
    pub client_certificate: bool,
}

/// Diagnostic metadata attached to a verification verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationMeta {
    /// Certificate chain details, ordered leaf first
    pub certs: Vec<CertificateDetails>,
    /// Signer-asserted reason/contact/location strings
    pub signature_meta: SignatureMeta,
}

/// Final verdict of a verification call.
///
/// `verified` is true only when the signed bytes are intact, the certificate
/// chain is trustworthy, and no certificate in it has expired. On any
/// internal failure the result collapses to `verified: false` with the
/// originating error kind and message preserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResult {
    /// Combined verdict: `integrity && authenticity && !expired`
    pub verified: bool,
    /// Whether every chain link's signature validates
    pub authenticity: bool,
    /// Whether the recomputed digest matches the signed digest
    pub integrity: bool,
    /// Whether any certificate in the chain is outside its validity window
    pub expired: bool,
    /// Certificate and signer metadata
    pub meta: VerificationMeta,
    /// Error message, present only on failure
    pub message: Option<String>,
    /// Error kind, present only on failure
    pub error: Option<ErrorKind>,
}

impl VerificationResult {
    /// Build the uniform negative result for an internal failure.
    pub(crate) fn failure(err: &crate::error::Error) -> Self {
        VerificationResult {
            verified: false,
            authenticity: false,
            integrity: false,
            expired: false,
            meta: VerificationMeta::default(),
            message: Some(err.to_string()),
            error: Some(err.kind()),
        }
    }
}
