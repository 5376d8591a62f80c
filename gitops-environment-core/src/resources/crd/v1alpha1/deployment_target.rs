use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[kube(
    group = "environments.gitops.dev",
    version = "v1alpha1",
    kind = "DeploymentTarget",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTargetSpec {
    /// claim this target has been assigned to, if any
    pub claim_ref: Option<String>,
    /// credentials granting access to the target cluster
    pub kubernetes_cluster_credentials: KubernetesClusterCredentials,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesClusterCredentials {
    /// API endpoint of the target cluster
    pub api_url: String,
    /// name of the secret (in the same namespace) holding the cluster connection credentials
    pub cluster_credentials_secret: String,
    /// skip TLS certificate verification when connecting to the target cluster
    #[serde(default)]
    pub allow_insecure_skip_tls_verify: bool,
}
