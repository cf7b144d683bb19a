//! Certificate chain ordering, authenticity, and expiry analysis.
//!
//! The envelope carries its certificates as an unordered set. The chain is
//! reconstructed leaf-first by treating issuer/subject identity as a
//! directed graph: the leaf issues no other certificate in the set, and each
//! following certificate is the issuer of the one before it. Disconnected
//! sets, cycles, and ambiguous links are malformed-chain conditions and are
//! surfaced as parse errors rather than resolved by insertion order.

use x509_parser::prelude::*;

use crate::error::{Error, Result};
use crate::types::CertificateDetails;

/// Outcome of analyzing the certificate set of one signature.
#[derive(Debug, Clone)]
pub struct ChainAnalysis {
    /// DER certificates ordered leaf first
    pub certificates: Vec<Vec<u8>>,
    /// Parsed details in the same order
    pub details: Vec<CertificateDetails>,
    /// True when every chain link's signature validates against its issuer
    pub authenticity: bool,
    /// True when any certificate is outside its validity window
    pub expired: bool,
}

fn parse_all<'a>(cert_ders: &'a [Vec<u8>]) -> Result<Vec<X509Certificate<'a>>> {
    let mut certs = Vec::with_capacity(cert_ders.len());
    for der in cert_ders {
        let (_, cert) = X509Certificate::from_der(der)
            .map_err(|e| Error::Parse(format!("malformed certificate: {}", e)))?;
        certs.push(cert);
    }
    Ok(certs)
}

/// Order an issuer/subject adjacency into a single leaf-to-root path.
///
/// `is_issuer_of(i, j)` answers "does certificate `i` vouch for certificate
/// `j`"; self-links are ignored so self-signed roots do not count as issuing
/// anything. The orderings this rejects (no unique leaf, more than one
/// issuer candidate, cycles, leftover certificates) all indicate a malformed
/// chain.
fn sort_order(count: usize, is_issuer_of: impl Fn(usize, usize) -> bool) -> Result<Vec<usize>> {
    if count == 0 {
        return Err(Error::Parse("no certificates in envelope".to_string()));
    }

    let issues_nothing = |i: usize| (0..count).all(|j| i == j || !is_issuer_of(i, j));
    let mut leaves = (0..count).filter(|&i| issues_nothing(i));
    let leaf = leaves
        .next()
        .ok_or_else(|| Error::Parse("malformed certificate chain: no leaf".to_string()))?;
    if leaves.next().is_some() {
        return Err(Error::Parse(
            "malformed certificate chain: ambiguous leaf".to_string(),
        ));
    }

    let mut order = vec![leaf];
    let mut current = leaf;
    loop {
        let mut issuers = (0..count).filter(|&i| i != current && is_issuer_of(i, current));
        let Some(issuer) = issuers.next() else {
            break; // reached a self-issued or absent-issuer top
        };
        if issuers.next().is_some() {
            return Err(Error::Parse(
                "malformed certificate chain: ambiguous issuer".to_string(),
            ));
        }
        if order.contains(&issuer) {
            return Err(Error::Parse("malformed certificate chain: cycle".to_string()));
        }
        order.push(issuer);
        current = issuer;
    }

    if order.len() != count {
        return Err(Error::Parse(
            "malformed certificate chain: disconnected certificates".to_string(),
        ));
    }
    Ok(order)
}

fn details_of(cert: &X509Certificate<'_>, client: bool) -> CertificateDetails {
    let common_name = |name: &X509Name<'_>| {
        name.iter_common_name()
            .next()
            .and_then(|cn| cn.as_str().ok())
            .map(str::to_string)
    };
    CertificateDetails {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        common_name: common_name(cert.subject()),
        issuer_common_name: common_name(cert.issuer()),
        serial_number: cert.raw_serial_as_string(),
        not_before: cert.validity().not_before.to_string(),
        not_after: cert.validity().not_after.to_string(),
        client_certificate: client,
    }
}

/// Parse certificate details in chain order without cryptographic checks.
pub fn certificate_details(cert_ders: &[Vec<u8>]) -> Result<Vec<CertificateDetails>> {
    let certs = parse_all(cert_ders)?;
    let order = sort_order(certs.len(), |i, j| certs[i].subject() == certs[j].issuer())?;
    Ok(order
        .iter()
        .enumerate()
        .map(|(pos, &i)| details_of(&certs[i], pos == 0))
        .collect())
}

/// Sort, authenticate, and expiry-check an unordered certificate set.
pub fn analyze_chain(cert_ders: &[Vec<u8>]) -> Result<ChainAnalysis> {
    let certs = parse_all(cert_ders)?;
    let order = sort_order(certs.len(), |i, j| certs[i].subject() == certs[j].issuer())?;

    // Every adjacent (subject, issuer) pair must validate; a self-signed top
    // is checked against itself, a top whose issuer is absent from the set
    // is treated as an implicit trust anchor.
    let mut authenticity = true;
    for (pos, &idx) in order.iter().enumerate() {
        let cert = &certs[idx];
        let issuer = match order.get(pos + 1) {
            Some(&next) => &certs[next],
            None if cert.issuer() == cert.subject() => cert,
            None => continue,
        };
        if let Err(e) = cert.verify_signature(Some(issuer.public_key())) {
            log::debug!("chain link failed for {}: {}", cert.subject(), e);
            authenticity = false;
        }
    }

    let expired = certs.iter().any(|cert| !cert.validity().is_valid());
    if expired {
        log::debug!("certificate chain contains an expired certificate");
    }

    let certificates = order.iter().map(|&i| cert_ders[i].clone()).collect();
    let details = order
        .iter()
        .enumerate()
        .map(|(pos, &i)| details_of(&certs[i], pos == 0))
        .collect();

    Ok(ChainAnalysis {
        certificates,
        details,
        authenticity,
        expired,
    })
}
