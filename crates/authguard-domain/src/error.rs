use authguard_types::{AccessPolicy, Parameter};
use std::fmt;
use thiserror::Error;

/// Errors raised by the engine.
///
/// Everything except [`Error::ComplianceFailed`] is raised at setup and never recovered.
/// Compliance failures are collected in full before the single aggregate error is raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("configuration error: no default policy was set")]
    MissingDefaultPolicy,

    #[error("configuration error: there are no configured rules, did you forget to add group or member rules?")]
    NoRulesConfigured,

    #[error("configuration error: no endpoints to validate were given")]
    NoEndpoints,

    #[error("configuration error: could not find any endpoints in scope '{scope}'")]
    NoEndpointsFound { scope: String },

    #[error("configuration error: group '{group}' has no endpoints")]
    UnknownGroup { group: String },

    #[error(
        "configuration error: could not find member '{member}' in group '{group}' with parameters ({}), check configured rules",
        format_parameters(.parameters)
    )]
    AmbiguousOrMissingEndpoint {
        group: String,
        member: String,
        parameters: Vec<Parameter>,
    },

    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    #[error("{0}")]
    ComplianceFailed(FailureReport),
}

impl Error {
    /// True for errors caused by the configuration or the endpoint scope.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingDefaultPolicy
                | Error::NoRulesConfigured
                | Error::NoEndpoints
                | Error::NoEndpointsFound { .. }
                | Error::UnknownGroup { .. }
                | Error::AmbiguousOrMissingEndpoint { .. }
        )
    }
}

fn format_parameters(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Every non-compliant endpoint of a run, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub scope: String,
    pub default_policy: AccessPolicy,
    pub failures: Vec<String>,
}

/// Policy name of a default, or `not set` when it is public or unnamed.
pub fn default_policy_name_display(policy: &AccessPolicy) -> &str {
    policy.policy_name().unwrap_or("not set")
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.failures.len();
        writeln!(
            f,
            "found {count} endpoint(s) not exposing the required access policy"
        )?;
        writeln!(f)?;
        writeln!(f, "Scope under test: {}", self.scope)?;
        writeln!(f, "Configured defaults:")?;
        writeln!(f, " - Default policy: {}", self.default_policy.kind_label())?;
        writeln!(
            f,
            " - Default policy name: {}",
            default_policy_name_display(&self.default_policy)
        )?;
        writeln!(f)?;
        writeln!(f, " --- {count} validation errors described below --- ")?;
        for (index, message) in self.failures.iter().enumerate() {
            writeln!(f, " ({}) {}", index + 1, message)?;
        }
        write!(f, " --- end of validation errors --- ")
    }
}
