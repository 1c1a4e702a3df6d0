use authguard_types::Parameter;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for an endpoint verdict.
///
/// Identity fields:
/// - check_id
/// - code
/// - group path
/// - member name
/// - parameter list (`type name` pairs, comma separated)
pub fn fingerprint_for_endpoint(
    check_id: &str,
    code: &str,
    group: &str,
    member: &str,
    parameters: &[Parameter],
) -> String {
    let signature = parameters
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let canonical = [check_id, code, group, member, signature.as_str()].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
