use std::{sync::Arc, time::Duration};

use gitops_environment_core::{
    helpers::RequireMetadata,
    kubernetes::operations::{
        create_resource, is_namespace_being_deleted, log_resource_change_event, try_get_resource,
        update_resource, ResourceChangeType,
    },
    resources::crd::v1alpha1::{
        environment::Environment,
        managed_environment::{managed_environment_name, ManagedEnvironment},
    },
};
use kube::{api::PostParams, runtime::controller::Action};
use log::info;

use crate::controller::CONTROLLER_FIELD_MANAGER;

use super::{
    context::ReconcilerContext, desired::generate_desired_managed_environment,
    error::ReconcilerError,
};

const SUCCESS_REQUEUE_SECS: u64 = 60 * 5;

const DEFAULT_ERROR_REQUEUE_SECS: u64 = 10;
const CONFIGURATION_ERROR_REQUEUE_SECS: u64 = 60 * 5;

pub async fn reconcile_environment(
    object: Arc<Environment>,
    context: Arc<ReconcilerContext>,
) -> Result<Action, ReconcilerError> {
    let name = object.require_name_or(ReconcilerError::MissingObjectMetadata)?;
    let namespace = object.require_namespace_or(ReconcilerError::MissingObjectMetadata)?;

    if is_namespace_being_deleted(&context.client, namespace)
        .await
        .map_err(ReconcilerError::KubeApiError)?
    {
        info!("Namespace '{namespace}' is being torn down, skipping reconciliation of '{name}'");
        return Ok(Action::await_change());
    }

    // the watch cache may lag behind the cluster, re-read before converging
    let environment = match try_get_resource::<Environment>(&context.client, name, namespace)
        .await
        .map_err(ReconcilerError::KubeApiError)?
    {
        Some(environment) => environment,
        None => {
            // the owner reference on the ManagedEnvironment takes care of the cleanup
            info!("'{name}' environment no longer exists");
            return Ok(Action::await_change());
        }
    };

    let desired = match generate_desired_managed_environment(&environment, &context.client).await? {
        Some(desired) => desired,
        // nothing to manage yet, a claim or environment change re-triggers us
        None => return Ok(Action::await_change()),
    };

    let current = try_get_resource::<ManagedEnvironment>(
        &context.client,
        &managed_environment_name(name),
        namespace,
    )
    .await
    .map_err(ReconcilerError::KubeApiError)?;

    let post_params = PostParams {
        dry_run: false,
        field_manager: Some(CONTROLLER_FIELD_MANAGER.to_owned()),
    };

    match converge(current, desired) {
        Convergence::Create(managed_environment) => {
            let created = create_resource(&context.client, &managed_environment, &post_params)
                .await
                .map_err(ReconcilerError::KubeApiError)?;
            log_resource_change_event(ResourceChangeType::Created, &created);
        }
        Convergence::Update(managed_environment) => {
            let updated = update_resource(&context.client, &managed_environment, &post_params)
                .await
                .map_err(ReconcilerError::KubeApiError)?;
            log_resource_change_event(ResourceChangeType::Modified, &updated);
        }
        Convergence::Unchanged => {}
    }

    Ok(Action::requeue(Duration::from_secs(SUCCESS_REQUEUE_SECS)))
}

pub fn reconcile_environment_error(
    _object: Arc<Environment>,
    error: &ReconcilerError,
    _context: Arc<ReconcilerContext>,
) -> Action {
    // configuration errors only resolve once the user edits a resource, so
    // there's no point in hammering the API server over them
    Action::requeue(match error {
        ReconcilerError::InvalidEnvironmentConfiguration(_)
        | ReconcilerError::DeploymentTargetNotFound(_)
        | ReconcilerError::CredentialsSecretNotFound(_) => {
            Duration::from_secs(CONFIGURATION_ERROR_REQUEUE_SECS)
        }
        _ => Duration::from_secs(DEFAULT_ERROR_REQUEUE_SECS),
    })
}

#[derive(Clone, Debug)]
pub enum Convergence {
    Create(ManagedEnvironment),
    Update(ManagedEnvironment),
    Unchanged,
}

/// Decides how to converge the stored object towards the desired one. An
/// update keeps every stored field (resource version included) and replaces
/// only the spec, so a racing writer still trips the optimistic-concurrency
/// check.
pub fn converge(current: Option<ManagedEnvironment>, desired: ManagedEnvironment) -> Convergence {
    match current {
        None => Convergence::Create(desired),
        Some(current) if current.spec == desired.spec => Convergence::Unchanged,
        Some(mut current) => {
            current.spec = desired.spec;
            Convergence::Update(current)
        }
    }
}
