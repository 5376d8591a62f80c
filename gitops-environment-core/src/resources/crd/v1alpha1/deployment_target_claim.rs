use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[kube(
    group = "environments.gitops.dev",
    version = "v1alpha1",
    kind = "DeploymentTargetClaim",
    namespaced,
    status = "DeploymentTargetClaimStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTargetClaimSpec {
    /// explicitly requested target, if any
    pub target_name: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTargetClaimStatus {
    /// binding phase of the claim
    pub phase: DeploymentTargetClaimPhase,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, JsonSchema)]
pub enum DeploymentTargetClaimPhase {
    #[default]
    Pending,
    Bound,
    Lost,
}

impl DeploymentTargetClaim {
    pub fn is_bound(&self) -> bool {
        self.status
            .as_ref()
            .map(|status| status.phase == DeploymentTargetClaimPhase::Bound)
            .unwrap_or(false)
    }
}
