//! Stable DTOs and IDs used across the authguard workspace.
//!
//! This crate is intentionally boring:
//! - the closed access-policy type shared by config, catalog, and engine
//! - endpoint references and parameters as they appear in reports
//! - the emitted report envelope
//! - stable string IDs and codes

#![forbid(unsafe_code)]

pub mod endpoint;
pub mod ids;
pub mod path;
pub mod policy;
pub mod report;

pub use endpoint::{EndpointRef, Parameter};
pub use path::RepoPath;
pub use policy::AccessPolicy;
pub use report::{
    AuthguardData, AuthguardReport, EndpointResult, ReportSummary, RuntimeError,
    SCHEMA_REPORT_V1, ToolMeta, Verdict,
};
