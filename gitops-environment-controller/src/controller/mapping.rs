use std::sync::Arc;

use gitops_environment_core::resources::crd::v1alpha1::{
    deployment_target::DeploymentTarget, deployment_target_claim::DeploymentTargetClaim,
    environment::Environment,
};
use kube::{runtime::reflector::ObjectRef, Resource};
use log::warn;

/// Maps a DeploymentTargetClaim change to the Environments that reference the
/// claim by name. Returns an empty set rather than an error so the watch
/// machinery is never blocked.
pub fn environments_for_deployment_target_claim(
    claim: &DeploymentTargetClaim,
    environments: &[Arc<Environment>],
) -> Vec<ObjectRef<Environment>> {
    let (claim_name, claim_namespace) = match object_identity(claim) {
        Some(identity) => identity,
        None => return Vec::new(),
    };

    environments
        .iter()
        .filter(|environment| {
            environment.meta().namespace.as_deref() == Some(claim_namespace)
                && environment.deployment_target_claim_name() == Some(claim_name)
        })
        .filter_map(|environment| environment_ref(environment))
        .collect()
}

/// Maps a DeploymentTarget change to the Environments that depend on it
/// through a claim. A target normally binds to a single claim, but both
/// cross-reference conventions (the claim naming the target and the target
/// naming the claim) are honored, so the affected set is computed as a union.
pub fn environments_for_deployment_target(
    target: &DeploymentTarget,
    claims: &[Arc<DeploymentTargetClaim>],
    environments: &[Arc<Environment>],
) -> Vec<ObjectRef<Environment>> {
    let (target_name, target_namespace) = match object_identity(target) {
        Some(identity) => identity,
        None => return Vec::new(),
    };

    let affected_claims = claims
        .iter()
        .filter(|claim| claim.meta().namespace.as_deref() == Some(target_namespace))
        .filter(|claim| claim_references_target(claim, target, target_name))
        .filter_map(|claim| claim.meta().name.as_deref())
        .collect::<Vec<_>>();

    let mut requests = Vec::new();
    for environment in environments {
        if environment.meta().namespace.as_deref() != Some(target_namespace) {
            continue;
        }

        let claim_name = match environment.deployment_target_claim_name() {
            Some(claim_name) => claim_name,
            None => continue,
        };

        if affected_claims.contains(&claim_name) {
            if let Some(request) = environment_ref(environment) {
                if !requests.contains(&request) {
                    requests.push(request);
                }
            }
        }
    }

    requests
}

fn claim_references_target(
    claim: &DeploymentTargetClaim,
    target: &DeploymentTarget,
    target_name: &str,
) -> bool {
    if claim.spec.target_name.as_deref() == Some(target_name) {
        return true;
    }

    match (target.spec.claim_ref.as_deref(), claim.meta().name.as_deref()) {
        (Some(claim_ref), Some(claim_name)) => claim_ref == claim_name,
        _ => false,
    }
}

fn object_identity<T: Resource>(object: &T) -> Option<(&str, &str)> {
    match (
        object.meta().name.as_deref(),
        object.meta().namespace.as_deref(),
    ) {
        (Some(name), Some(namespace)) => Some((name, namespace)),
        _ => {
            warn!("Received a mapped object without a name or namespace, ignoring it");
            None
        }
    }
}

fn environment_ref(environment: &Environment) -> Option<ObjectRef<Environment>> {
    let name = environment.meta().name.as_deref()?;
    let namespace = environment.meta().namespace.as_deref()?;

    Some(ObjectRef::new(name).within(namespace))
}
