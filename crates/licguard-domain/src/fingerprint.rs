use crate::engine::EvaluationRequest;
use crate::model::LicenseKey;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Compute a stable SHA-256 fingerprint for a request.
///
/// Identity fields:
/// - normalized license keys (sorted, deduplicated)
/// - context
/// - distribution (if present)
/// - attributes (sorted by name)
/// - composed policies as `name@version`, in composition order
/// - default decision
///
/// The request id is not part of the identity.
pub fn fingerprint_for_request(request: &EvaluationRequest) -> String {
    let keys: BTreeSet<LicenseKey> = request.licenses.iter().map(LicenseKey::new).collect();
    let licenses = keys
        .iter()
        .map(LicenseKey::as_str)
        .collect::<Vec<_>>()
        .join(",");
    let attributes = request
        .attributes
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",");
    let policies = request
        .policies
        .iter()
        .map(|p| format!("{}@{}", p.name, p.version))
        .collect::<Vec<_>>()
        .join(",");

    let parts = [
        "licguard.request.v1",
        licenses.as_str(),
        request.context.as_str(),
        request.distribution.as_deref().unwrap_or(""),
        attributes.as_str(),
        policies.as_str(),
        request.default_decision.as_str(),
    ];
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
