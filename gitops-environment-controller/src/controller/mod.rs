use std::{fmt::Debug, sync::Arc};

use futures::{Future, StreamExt};
use gitops_environment_core::{
    kubernetes::GetApi,
    resources::crd::v1alpha1::{
        deployment_target_claim::DeploymentTargetClaim, environment::Environment,
    },
};
use k8s_openapi::serde::de::DeserializeOwned;
use kube::{
    runtime::{
        reflector::{self, Store},
        watcher::{watcher, Config},
        WatchStreamExt,
    },
    Client, Resource,
};
use tokio::join;

use self::{environment::start_environment_controller, reconciler::context::ReconcilerContext};

pub mod environment;
pub mod mapping;
pub mod reconciler;

pub const CONTROLLER_FIELD_MANAGER: &str = "gitops-environment-controller";

pub async fn main_controller(client: Client) {
    let (environment_reflector, environments) = start_store_reflector::<Environment>(&client);
    let (claim_reflector, claims) = start_store_reflector::<DeploymentTargetClaim>(&client);

    let reconciler_context = Arc::new(ReconcilerContext { client });

    let controller = start_environment_controller(&reconciler_context, environments, claims);

    join!(environment_reflector, claim_reflector, controller);
}

/// Maintains a local snapshot of every instance of the watched kind; the
/// event mappers read from it instead of hitting the API server.
fn start_store_reflector<T>(client: &Client) -> (impl Future<Output = ()>, Store<T>)
where
    T: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + Sync + 'static,
{
    let watcher = watcher(client.global_api::<T>(), Config::default());
    let (store, writer) = reflector::store();
    let reflector = reflector::reflector(writer, watcher)
        .applied_objects()
        .for_each(|_| std::future::ready(()));

    (reflector, store)
}
