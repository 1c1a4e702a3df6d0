//! Reading the access annotations actually declared on endpoints.
//!
//! The engine never introspects code itself; whatever knows the declared metadata (a catalog
//! file, a build-time index, a macro registry) implements [`AnnotationInspector`].

use crate::model::{Endpoint, EndpointId};
use authguard_types::AccessPolicy;
use authguard_types::policy::normalize_policy_name;
use std::collections::BTreeMap;

/// Access annotations declared directly on one code element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotations {
    /// Each entry is one "authenticated" annotation with its optional policy name.
    pub authenticated: Vec<Option<String>>,
    /// The element declares itself public.
    pub public: bool,
}

impl Annotations {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn public() -> Self {
        Self {
            authenticated: Vec::new(),
            public: true,
        }
    }

    /// A single authenticated annotation; an empty name reads as no name.
    pub fn authenticated(policy: Option<&str>) -> Self {
        Self::none().with_authenticated(policy)
    }

    pub fn with_authenticated(mut self, policy: Option<&str>) -> Self {
        self.authenticated
            .push(normalize_policy_name(policy.map(str::to_string)));
        self
    }

    pub fn with_public(mut self) -> Self {
        self.public = true;
        self
    }

    pub fn has_authenticated(&self) -> bool {
        !self.authenticated.is_empty()
    }

    pub fn authenticated_policies(&self) -> Vec<AccessPolicy> {
        self.authenticated
            .iter()
            .map(|policy| AccessPolicy::RequireAuthenticated {
                policy: policy.clone(),
            })
            .collect()
    }
}

/// Source of declared annotations for endpoints and their groups. Pure reads.
pub trait AnnotationInspector {
    /// Annotations declared on the member itself.
    fn member_annotations(&self, endpoint: &Endpoint) -> Annotations;

    /// Annotations declared on the endpoint's owning group.
    fn group_annotations(&self, endpoint: &Endpoint) -> Annotations;
}

/// Member and group annotations of one endpoint, read together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeclaredAnnotations {
    pub member: Annotations,
    pub group: Annotations,
}

impl DeclaredAnnotations {
    pub fn read<I: AnnotationInspector + ?Sized>(inspector: &I, endpoint: &Endpoint) -> Self {
        Self {
            member: inspector.member_annotations(endpoint),
            group: inspector.group_annotations(endpoint),
        }
    }

    /// The member's authenticated annotations, or the group's when the member has none.
    ///
    /// The first non-empty source wins; the two sets are never merged.
    pub fn effective_authenticated(&self) -> Vec<AccessPolicy> {
        if self.member.has_authenticated() {
            self.member.authenticated_policies()
        } else {
            self.group.authenticated_policies()
        }
    }

    pub fn declares_public(&self) -> bool {
        self.member.public || self.group.public
    }
}

/// In-memory annotation table keyed by group path and endpoint identity.
#[derive(Clone, Debug, Default)]
pub struct AnnotationTable {
    groups: BTreeMap<String, Annotations>,
    members: BTreeMap<EndpointId, Annotations>,
}

impl AnnotationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_group(&mut self, group_path: impl Into<String>, annotations: Annotations) {
        self.groups.insert(group_path.into(), annotations);
    }

    pub fn set_member(&mut self, endpoint: EndpointId, annotations: Annotations) {
        self.members.insert(endpoint, annotations);
    }
}

impl AnnotationInspector for AnnotationTable {
    fn member_annotations(&self, endpoint: &Endpoint) -> Annotations {
        self.members.get(&endpoint.id()).cloned().unwrap_or_default()
    }

    fn group_annotations(&self, endpoint: &Endpoint) -> Annotations {
        self.groups
            .get(&endpoint.group.path)
            .cloned()
            .unwrap_or_default()
    }
}
