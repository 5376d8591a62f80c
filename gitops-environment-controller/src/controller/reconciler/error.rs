use gitops_environment_core::resources::crd::v1alpha1::environment::EnvironmentConfigurationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("Object is missing metadata!")]
    MissingObjectMetadata,
    #[error("The Environment resource is invalid! Reason: {}", .0)]
    InvalidEnvironmentConfiguration(EnvironmentConfigurationError),
    #[error("Couldn't access the cluster! Reason: {}", .0)]
    KubeApiError(kube::Error),
    #[error("The '{}' DeploymentTargetClaim referenced by the Environment was not found!", .0)]
    DeploymentTargetClaimNotFound(String),
    #[error("No DeploymentTarget is bound to the '{}' DeploymentTargetClaim!", .0)]
    DeploymentTargetNotFound(String),
    #[error("The '{}' secret referenced by the Environment resource was not found!", .0)]
    CredentialsSecretNotFound(String),
}
