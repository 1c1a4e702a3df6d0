//! Expected-versus-declared comparison for one resolved rule.

use crate::fingerprint::fingerprint_for_endpoint;
use crate::inspect::{AnnotationInspector, DeclaredAnnotations};
use crate::model::Endpoint;
use crate::resolve::ResolvedRule;
use authguard_types::AccessPolicy;
use authguard_types::ids;

/// Outcome of checking one endpoint. Immutable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub rule: ResolvedRule,
    /// Authenticated annotations the decision used, or `[Public]` when only that is declared.
    pub actual: Vec<AccessPolicy>,
    pub compliant: bool,
    pub code: &'static str,
    pub message: String,
    pub fingerprint: String,
}

impl Verdict {
    pub fn endpoint(&self) -> &Endpoint {
        &self.rule.endpoint
    }

    pub fn expected(&self) -> &AccessPolicy {
        &self.rule.expected
    }
}

pub struct ComplianceChecker<'a> {
    inspector: &'a dyn AnnotationInspector,
}

impl<'a> ComplianceChecker<'a> {
    pub fn new(inspector: &'a dyn AnnotationInspector) -> Self {
        Self { inspector }
    }

    pub fn check(&self, rule: ResolvedRule) -> Verdict {
        let declared = DeclaredAnnotations::read(self.inspector, &rule.endpoint);
        let candidates = declared.effective_authenticated();

        let code = match &rule.expected {
            // Public needs an explicit declaration and no authenticated annotation on the member.
            AccessPolicy::Public => {
                if declared.member.has_authenticated() {
                    ids::CODE_AUTHENTICATED_ON_PUBLIC
                } else if declared.declares_public() {
                    ids::CODE_COMPLIANT
                } else {
                    ids::CODE_PUBLIC_NOT_DECLARED
                }
            }
            expected @ AccessPolicy::RequireAuthenticated { .. } => {
                if candidates.contains(expected) {
                    ids::CODE_COMPLIANT
                } else if candidates.is_empty() {
                    ids::CODE_AUTHENTICATION_MISSING
                } else {
                    ids::CODE_POLICY_MISMATCH
                }
            }
        };
        let compliant = code == ids::CODE_COMPLIANT;

        let actual = if candidates.is_empty() && declared.declares_public() {
            vec![AccessPolicy::Public]
        } else {
            candidates
        };

        let message = render_message(&rule.endpoint, &rule.expected, &actual, compliant);
        let fingerprint = fingerprint_for_endpoint(
            ids::CHECK_ENDPOINT_POLICY,
            code,
            &rule.endpoint.group.path,
            &rule.endpoint.member,
            &rule.endpoint.parameters,
        );

        Verdict {
            rule,
            actual,
            compliant,
            code,
            message,
            fingerprint,
        }
    }
}

fn render_message(
    endpoint: &Endpoint,
    expected: &AccessPolicy,
    actual: &[AccessPolicy],
    compliant: bool,
) -> String {
    let mut lines = vec![endpoint.to_string()];
    if !compliant {
        let found = if actual.is_empty() {
            "none".to_string()
        } else {
            actual
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        lines.push(format!("  actual: {found}"));
    }
    lines.push(format!("  required: {expected}"));
    lines.join("\n")
}
