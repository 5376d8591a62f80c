use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Derived resource holding the resolved, ready-to-use cluster credentials
/// for an Environment. Owned by the Environment it was derived from; the
/// cluster's garbage collector removes it alongside its owner.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[kube(
    group = "environments.gitops.dev",
    version = "v1alpha1",
    kind = "ManagedEnvironment",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ManagedEnvironmentSpec {
    /// API endpoint of the target cluster
    pub api_url: String,
    /// name of the secret holding the cluster connection credentials
    pub cluster_credentials_secret: String,
    /// skip TLS certificate verification when connecting to the target cluster
    #[serde(default)]
    pub allow_insecure_skip_tls_verify: bool,
}

pub fn managed_environment_name(environment_name: &str) -> String {
    format!("managed-environment-{environment_name}")
}

#[cfg(test)]
mod tests {
    use super::managed_environment_name;

    #[test]
    fn managed_environment_name_is_derived_from_the_environment_name() {
        assert_eq!(
            managed_environment_name("staging"),
            "managed-environment-staging"
        );
    }
}
