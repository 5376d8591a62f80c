use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::deployment_target::KubernetesClusterCredentials;

/// Declarative description of a place a deployment engine applies changes to.
/// Cluster access is configured either through a DeploymentTargetClaim
/// reference or through directly embedded credentials, never both.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[kube(
    group = "environments.gitops.dev",
    version = "v1alpha1",
    kind = "Environment",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSpec {
    /// reference to a DeploymentTargetClaim that provides cluster access once bound
    pub deployment_target_claim: Option<DeploymentTargetClaimReference>,
    /// cluster credentials embedded directly in the environment
    pub unstable_configuration_fields: Option<UnstableConfigurationFields>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTargetClaimReference {
    /// name of the claim, resolved in the environment's namespace
    pub claim_name: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnstableConfigurationFields {
    pub kubernetes_cluster_credentials: KubernetesClusterCredentials,
}

/// The environment's cluster-access configuration reduced to a single
/// unambiguous variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnvironmentTarget<'a> {
    Claim(&'a str),
    Credentials(&'a KubernetesClusterCredentials),
    Unconfigured,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvironmentConfigurationError {
    #[error("An Environment cannot have both a DeploymentTargetClaim and cluster credentials set!")]
    AmbiguousTarget,
}

impl Environment {
    pub fn deployment_target_claim_name(&self) -> Option<&str> {
        self.spec
            .deployment_target_claim
            .as_ref()
            .map(|claim| claim.claim_name.as_str())
    }

    /// The serialized shape can't stop users from setting both fields at
    /// once, so the ambiguous state is rejected here instead of picking a
    /// precedence.
    pub fn classify_configuration(
        &self,
    ) -> Result<EnvironmentTarget<'_>, EnvironmentConfigurationError> {
        match (
            self.deployment_target_claim_name(),
            &self.spec.unstable_configuration_fields,
        ) {
            (Some(_), Some(_)) => Err(EnvironmentConfigurationError::AmbiguousTarget),
            (Some(claim_name), None) => Ok(EnvironmentTarget::Claim(claim_name)),
            (None, Some(fields)) => Ok(EnvironmentTarget::Credentials(
                &fields.kubernetes_cluster_credentials,
            )),
            (None, None) => Ok(EnvironmentTarget::Unconfigured),
        }
    }
}
