use std::sync::Arc;

use futures::StreamExt;
use gitops_environment_core::{
    kubernetes::GetApi,
    resources::crd::v1alpha1::{
        deployment_target::DeploymentTarget, deployment_target_claim::DeploymentTargetClaim,
        environment::Environment, managed_environment::ManagedEnvironment,
    },
};
use kube::runtime::{reflector::Store, watcher::Config, Controller};
use log::{info, warn};

use crate::controller::{
    mapping::{environments_for_deployment_target, environments_for_deployment_target_claim},
    reconciler::{
        context::ReconcilerContext,
        environment::{reconcile_environment, reconcile_environment_error},
    },
};

pub async fn start_environment_controller(
    context: &Arc<ReconcilerContext>,
    environments: Store<Environment>,
    claims: Store<DeploymentTargetClaim>,
) {
    info!("Creating environment controller...");

    let watcher_config = Config::default();
    let claim_mapper_environments = environments.clone();

    let controller = Controller::new(
        context.client.global_api::<Environment>(),
        watcher_config.clone(),
    )
    .owns(
        context.client.global_api::<ManagedEnvironment>(),
        watcher_config.clone(),
    )
    .watches(
        context.client.global_api::<DeploymentTargetClaim>(),
        watcher_config.clone(),
        move |claim| {
            environments_for_deployment_target_claim(&claim, &claim_mapper_environments.state())
        },
    )
    .watches(
        context.client.global_api::<DeploymentTarget>(),
        watcher_config,
        move |target| {
            environments_for_deployment_target(&target, &claims.state(), &environments.state())
        },
    )
    .shutdown_on_signal()
    .run(
        reconcile_environment,
        reconcile_environment_error,
        context.clone(),
    )
    .for_each(|environment| async move {
        match environment {
            Ok(o) => info!("Reconciled environment {:?}", o),
            Err(e) => warn!("Environment reconciliation failed: {:#?}", e),
        }
    });

    info!("Environment controller created!");

    controller.await
}
