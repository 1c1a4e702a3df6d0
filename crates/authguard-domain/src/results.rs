use crate::check::Verdict;
use authguard_types::ReportSummary;

/// All verdicts of one run, ordered by message for stable diffs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidatedResults {
    verdicts: Vec<Verdict>,
}

impl ValidatedResults {
    pub fn new(mut verdicts: Vec<Verdict>) -> Self {
        verdicts.sort_by(|a, b| {
            a.message
                .cmp(&b.message)
                .then_with(|| a.endpoint().id().cmp(&b.endpoint().id()))
        });
        Self { verdicts }
    }

    pub fn all(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn compliant(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| v.compliant)
    }

    pub fn non_compliant(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| !v.compliant)
    }

    pub fn is_compliant(&self) -> bool {
        self.verdicts.iter().all(|v| v.compliant)
    }

    pub fn summary(&self) -> ReportSummary {
        let passed = self.compliant().count() as u32;
        let total = self.verdicts.len() as u32;
        ReportSummary {
            total,
            passed,
            failed: total - passed,
        }
    }
}
