//! Best-effort extraction of signer-asserted metadata.
//!
//! `/Reason`, `/ContactInfo`, and `/Location` are literal-string entries the
//! signer may have written into the signature dictionary. They live inside
//! the signed region, so a plain pattern probe over those bytes is enough;
//! absence of any of them is not an error.

use lazy_static::lazy_static;
use regex::bytes::Regex;

use crate::types::SignatureMeta;

lazy_static! {
    static ref REASON_RE: Regex = Regex::new(r"/Reason\s*\(([\w.\s@,]*)").unwrap();
    static ref CONTACT_INFO_RE: Regex = Regex::new(r"/ContactInfo\s*\(([\w.\s@,]*)").unwrap();
    static ref LOCATION_RE: Regex = Regex::new(r"/Location\s*\(([\w.\s@,]*)").unwrap();
}

fn probe(re: &Regex, data: &[u8]) -> Option<String> {
    re.captures(data)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
}

/// Probe the signed payload for reason, contact, and location strings.
pub fn get_signature_meta(signed_data: &[u8]) -> SignatureMeta {
    SignatureMeta {
        reason: probe(&REASON_RE, signed_data),
        contact_info: probe(&CONTACT_INFO_RE, signed_data),
        location: probe(&LOCATION_RE, signed_data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_present() {
        let data = b"<< /Reason (Approval of terms) /ContactInfo (signer@example.com) \
                     /Location (Berlin) >>";
        let meta = get_signature_meta(data);
        assert_eq!(meta.reason.as_deref(), Some("Approval of terms"));
        assert_eq!(meta.contact_info.as_deref(), Some("signer@example.com"));
        assert_eq!(meta.location.as_deref(), Some("Berlin"));
    }

    #[test]
    fn test_absence_is_not_an_error() {
        let meta = get_signature_meta(b"<< /Type /Sig >>");
        assert_eq!(meta, SignatureMeta::default());
    }

    #[test]
    fn test_independent_fields() {
        let meta = get_signature_meta(b"/Location (Oslo)");
        assert_eq!(meta.reason, None);
        assert_eq!(meta.contact_info, None);
        assert_eq!(meta.location.as_deref(), Some("Oslo"));
    }

    #[test]
    fn test_capture_stops_at_disallowed_characters() {
        // The probe character class matches word characters, dots,
        // whitespace, @ and commas; a closing parenthesis ends the capture
        let meta = get_signature_meta(b"/Reason (I agree) tail");
        assert_eq!(meta.reason.as_deref(), Some("I agree"));
    }
}
