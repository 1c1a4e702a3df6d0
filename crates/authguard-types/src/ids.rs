//! Stable identifiers for checks and verdict codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_ENDPOINT_POLICY: &str = "auth.endpoint_policy";

// Codes: auth.endpoint_policy
pub const CODE_COMPLIANT: &str = "compliant";
pub const CODE_PUBLIC_NOT_DECLARED: &str = "public_not_declared";
pub const CODE_AUTHENTICATED_ON_PUBLIC: &str = "authenticated_on_public";
pub const CODE_AUTHENTICATION_MISSING: &str = "authentication_missing";
pub const CODE_POLICY_MISMATCH: &str = "policy_mismatch";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
