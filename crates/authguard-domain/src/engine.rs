use crate::Error;
use crate::check::ComplianceChecker;
use crate::discover::{Exclusion, remove_endpoints};
use crate::error::{FailureReport, default_policy_name_display};
use crate::inspect::AnnotationInspector;
use crate::model::SharedEndpoint;
use crate::resolve::ResolutionEngine;
use crate::results::ValidatedResults;
use crate::rules::RuleSet;
use authguard_types::AccessPolicy;
use std::cell::OnceCell;
use std::io;

/// One validation run over a working set of endpoints.
///
/// Results are computed on first request and cached; exclusions must be applied before that.
pub struct Validator<'a> {
    scope: String,
    endpoints: Vec<SharedEndpoint>,
    rules: RuleSet,
    inspector: &'a dyn AnnotationInspector,
    excluded: usize,
    results: OnceCell<ValidatedResults>,
}

impl<'a> Validator<'a> {
    pub fn new(
        scope: impl Into<String>,
        endpoints: Vec<SharedEndpoint>,
        rules: RuleSet,
        inspector: &'a dyn AnnotationInspector,
    ) -> Result<Self, Error> {
        if endpoints.is_empty() {
            return Err(Error::NoEndpoints);
        }
        Ok(Self {
            scope: scope.into(),
            endpoints,
            rules,
            inspector,
            excluded: 0,
            results: OnceCell::new(),
        })
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn default_policy(&self) -> &AccessPolicy {
        self.rules.default_policy()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Endpoints still in the working set.
    pub fn endpoints(&self) -> &[SharedEndpoint] {
        &self.endpoints
    }

    /// Total endpoints removed by exclusions so far.
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    /// Drop the endpoints matched by `exclusion` from the working set. Returns how many were removed.
    pub fn exclude(&mut self, exclusion: &Exclusion) -> Result<usize, Error> {
        let matched = exclusion.select(&self.endpoints);
        self.exclude_endpoints(&matched)
    }

    pub fn exclude_endpoints(&mut self, excluded: &[SharedEndpoint]) -> Result<usize, Error> {
        if self.results.get().is_some() {
            return Err(Error::InvalidOperation(
                "exclusions must be applied before results are computed",
            ));
        }
        let removed = remove_endpoints(&mut self.endpoints, excluded);
        self.excluded += removed;
        Ok(removed)
    }

    /// Every verdict, compliant or not. Computed once.
    pub fn results(&self) -> Result<&ValidatedResults, Error> {
        if self.results.get().is_none() {
            let computed = self.compute()?;
            let _ = self.results.set(computed);
        }
        self.results
            .get()
            .ok_or(Error::InvalidOperation("results were not cached"))
    }

    /// Like [`Validator::results`], but any non-compliant endpoint fails the run.
    pub fn validate(&self) -> Result<&ValidatedResults, Error> {
        let results = self.results()?;
        let failures: Vec<String> = results
            .non_compliant()
            .map(|v| v.message.clone())
            .collect();
        if failures.is_empty() {
            return Ok(results);
        }
        Err(Error::ComplianceFailed(FailureReport {
            scope: self.scope.clone(),
            default_policy: self.default_policy().clone(),
            failures,
        }))
    }

    /// Human-readable listing of every verdict.
    pub fn print_results<W: io::Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let results = self.results().map_err(io::Error::other)?;
        let summary = results.summary();
        writeln!(
            out,
            "There are {} endpoints validated; of which {} passed, and {} failed.",
            summary.total, summary.passed, summary.failed
        )?;
        writeln!(out)?;
        writeln!(out, "Scope under test: {}", self.scope)?;
        writeln!(out, "Configured defaults:")?;
        writeln!(out, " - Default policy: {}", self.default_policy().kind_label())?;
        writeln!(
            out,
            " - Default policy name: {}",
            default_policy_name_display(self.default_policy())
        )?;
        writeln!(out)?;
        for verdict in results.all() {
            let status = if verdict.compliant { "Passed" } else { "Failed" };
            writeln!(out, "{status} : {}", verdict.message)?;
        }
        writeln!(out, "- the End - ")
    }

    fn compute(&self) -> Result<ValidatedResults, Error> {
        if self.endpoints.is_empty() {
            return Err(Error::NoEndpoints);
        }
        let mut engine = ResolutionEngine::new(self.endpoints.clone());
        engine.populate_defaults(self.rules.default_policy());
        engine.merge(&self.rules)?;

        let checker = ComplianceChecker::new(self.inspector);
        let verdicts = engine
            .into_resolved()
            .into_iter()
            .map(|rule| checker.check(rule))
            .collect();
        Ok(ValidatedResults::new(verdicts))
    }
}
