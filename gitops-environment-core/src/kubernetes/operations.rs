use std::fmt::{Debug, Display};

use k8s_openapi::{
    api::core::v1::Namespace,
    serde::{de::DeserializeOwned, Serialize},
    NamespaceResourceScope,
};
use kube::{
    api::{ListParams, PostParams},
    Client, Resource,
};
use log::info;

use crate::helpers::pretty_type_name;

use super::GetApi;

pub async fn try_get_resource<T>(
    client: &Client,
    name: &str,
    namespace: &str,
) -> Result<Option<T>, kube::Error>
where
    T: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + DeserializeOwned
        + Debug,
{
    match client.namespaced_api::<T>(namespace).get(name).await {
        Ok(resource) => Ok(Some(resource)),
        Err(kube::Error::Api(response)) if response.code == 404 => Ok(None),
        Err(error) => Err(error),
    }
}

pub async fn list_resources<T>(
    client: &Client,
    namespace: &str,
    list_params: &ListParams,
) -> Result<Vec<T>, kube::Error>
where
    T: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + DeserializeOwned
        + Debug,
{
    Ok(client
        .namespaced_api::<T>(namespace)
        .list(list_params)
        .await?
        .items)
}

pub async fn create_resource<T>(
    client: &Client,
    resource: &T,
    post_params: &PostParams,
) -> Result<T, kube::Error>
where
    T: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Serialize
        + Clone
        + DeserializeOwned
        + Debug,
{
    let name = resource.meta().name.as_deref().unwrap_or_default();
    let namespace = resource.meta().namespace.as_deref().unwrap_or_default();

    info!(
        "Creating '{name}' {} resource on the cluster...",
        pretty_type_name::<T>()
    );

    client
        .namespaced_api::<T>(namespace)
        .create(post_params, resource)
        .await
}

/// Replaces the whole object; the resource version carried by `resource`
/// guards against clobbering a concurrent writer.
pub async fn update_resource<T>(
    client: &Client,
    resource: &T,
    post_params: &PostParams,
) -> Result<T, kube::Error>
where
    T: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Serialize
        + Clone
        + DeserializeOwned
        + Debug,
{
    let name = resource.meta().name.as_deref().unwrap_or_default();
    let namespace = resource.meta().namespace.as_deref().unwrap_or_default();

    info!(
        "Updating '{name}' {} resource on the cluster...",
        pretty_type_name::<T>()
    );

    client
        .namespaced_api::<T>(namespace)
        .replace(name, post_params, resource)
        .await
}

pub async fn update_resource_status<T>(
    client: &Client,
    resource: &T,
    post_params: &PostParams,
) -> Result<T, kube::Error>
where
    T: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Serialize
        + Clone
        + DeserializeOwned
        + Debug,
{
    let name = resource.meta().name.as_deref().unwrap_or_default();
    let namespace = resource.meta().namespace.as_deref().unwrap_or_default();

    let data = serde_json::to_vec(resource).map_err(kube::Error::SerdeError)?;

    client
        .namespaced_api::<T>(namespace)
        .replace_status(name, post_params, data)
        .await
}

/// A namespace that no longer exists is reported as being deleted, since
/// there's nothing left to reconcile in it either way.
pub async fn is_namespace_being_deleted(
    client: &Client,
    name: &str,
) -> Result<bool, kube::Error> {
    match client.global_api::<Namespace>().get(name).await {
        Ok(namespace) => Ok(namespace.metadata.deletion_timestamp.is_some()),
        Err(kube::Error::Api(response)) if response.code == 404 => Ok(true),
        Err(error) => Err(error),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceChangeType {
    Created,
    Modified,
}

impl Display for ResourceChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceChangeType::Created => write!(f, "created"),
            ResourceChangeType::Modified => write!(f, "modified"),
        }
    }
}

/// Emits an audit-style record of a write performed against the cluster,
/// including the new value of the object.
pub fn log_resource_change_event<T>(change_type: ResourceChangeType, resource: &T)
where
    T: Resource + Serialize,
{
    let name = resource.meta().name.as_deref().unwrap_or_default();
    let namespace = resource.meta().namespace.as_deref().unwrap_or_default();
    let value = serde_json::to_string(resource)
        .unwrap_or_else(|_| "<unserializable object>".to_owned());

    info!(
        "API resource changed ({change_type}): '{namespace}/{name}' {}: {value}",
        pretty_type_name::<T>()
    );
}
