//! The endpoint working set: enumeration and exclusion.

use crate::Error;
use crate::model::{Endpoint, EndpointId, SharedEndpoint};
use std::collections::BTreeSet;

/// Supplies the finite, ordered endpoints of a scope (e.g. "all operations of service X").
pub trait EndpointEnumerator {
    /// Human-readable label of the scope, used in errors and reports.
    fn scope(&self) -> &str;

    /// Endpoints in declaration order.
    fn endpoints(&self) -> Vec<SharedEndpoint>;
}

/// Enumerate `enumerator`, failing loudly when the scope yields nothing.
pub fn discover<E: EndpointEnumerator + ?Sized>(
    enumerator: &E,
) -> Result<Vec<SharedEndpoint>, Error> {
    let endpoints = enumerator.endpoints();
    if endpoints.is_empty() {
        return Err(Error::NoEndpointsFound {
            scope: enumerator.scope().to_string(),
        });
    }
    tracing::debug!(
        scope = enumerator.scope(),
        count = endpoints.len(),
        "discovered endpoints"
    );
    Ok(endpoints)
}

/// Selects endpoints to drop from the working set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Exclusion {
    /// Every endpoint whose group path contains the substring.
    GroupPathContains(String),
}

impl Exclusion {
    pub fn matches(&self, endpoint: &Endpoint) -> bool {
        match self {
            Exclusion::GroupPathContains(needle) => endpoint.group.path.contains(needle.as_str()),
        }
    }

    /// The endpoints of `endpoints` matched by this exclusion.
    pub fn select(&self, endpoints: &[SharedEndpoint]) -> Vec<SharedEndpoint> {
        endpoints
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect()
    }
}

/// Remove `excluded` (by identity) from `working`, preserving order. Returns the removed count.
pub fn remove_endpoints(working: &mut Vec<SharedEndpoint>, excluded: &[SharedEndpoint]) -> usize {
    let ids: BTreeSet<EndpointId> = excluded.iter().map(|e| e.id()).collect();
    let before = working.len();
    working.retain(|e| !ids.contains(&e.id()));
    before - working.len()
}
