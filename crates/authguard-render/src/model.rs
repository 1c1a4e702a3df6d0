#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Fail,
    /// The run aborted before producing verdicts.
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableResult {
    pub compliant: bool,
    pub check_id: String,
    pub code: String,
    /// Multi-line: identity, then `actual` (failures only), then `required`.
    pub message: String,
    /// Catalog file the endpoint was declared in.
    pub path: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderableSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub scope: String,
    /// Kind label of the default policy, e.g. `RequireAuthenticated`.
    pub default_policy: String,
    /// Policy name of the default, or `not set`.
    pub default_policy_name: String,
    pub summary: RenderableSummary,
    pub results: Vec<RenderableResult>,
    pub error: Option<String>,
}

impl RenderableReport {
    pub fn failures(&self) -> impl Iterator<Item = &RenderableResult> {
        self.results.iter().filter(|r| !r.compliant)
    }

    pub fn passes(&self) -> impl Iterator<Item = &RenderableResult> {
        self.results.iter().filter(|r| r.compliant)
    }
}

impl RenderableResult {
    /// First line of the message: the endpoint identity.
    pub fn headline(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}
