use crate::model::{Endpoint, Group, SharedEndpoint};
use authguard_types::Parameter;
use std::sync::Arc;

pub fn group(path: &str) -> Group {
    let name = path.rsplit('.').next().unwrap_or(path);
    Group::new(name, path)
}

pub fn endpoint(group_path: &str, member: &str) -> SharedEndpoint {
    endpoint_with_params(group_path, member, &[])
}

pub fn endpoint_with_params(
    group_path: &str,
    member: &str,
    params: &[(&str, &str)],
) -> SharedEndpoint {
    let parameters = params
        .iter()
        .map(|(name, ty)| Parameter::new(*name, *ty))
        .collect();
    Arc::new(Endpoint::new(group(group_path), member, parameters))
}
