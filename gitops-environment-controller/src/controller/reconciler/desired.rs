use gitops_environment_core::{
    helpers::RequireMetadata,
    kubernetes::operations::{list_resources, try_get_resource},
    resources::crd::v1alpha1::{
        deployment_target::{DeploymentTarget, KubernetesClusterCredentials},
        deployment_target_claim::DeploymentTargetClaim,
        environment::{Environment, EnvironmentTarget},
        managed_environment::{
            managed_environment_name, ManagedEnvironment, ManagedEnvironmentSpec,
        },
    },
};
use k8s_openapi::api::core::v1::Secret;
use kube::{api::ListParams, Client, Resource};
use log::info;

use super::error::ReconcilerError;

/// Resolves the Environment's configured indirection into the desired
/// ManagedEnvironment. `Ok(None)` means there is nothing to manage yet: the
/// claim hasn't reached the Bound phase, or no configuration is present at
/// all. Both are expected states, not failures.
pub async fn generate_desired_managed_environment(
    environment: &Environment,
    client: &Client,
) -> Result<Option<ManagedEnvironment>, ReconcilerError> {
    let namespace = environment.require_namespace_or(ReconcilerError::MissingObjectMetadata)?;

    let details = match environment
        .classify_configuration()
        .map_err(ReconcilerError::InvalidEnvironmentConfiguration)?
    {
        EnvironmentTarget::Claim(claim_name) => {
            info!("Environment is configured with a DeploymentTargetClaim");

            let claim =
                try_get_resource::<DeploymentTargetClaim>(client, claim_name, namespace)
                    .await
                    .map_err(ReconcilerError::KubeApiError)?
                    .ok_or_else(|| {
                        ReconcilerError::DeploymentTargetClaimNotFound(claim_name.to_owned())
                    })?;

            if !claim.is_bound() {
                info!("Waiting until the '{claim_name}' DeploymentTargetClaim reaches the Bound phase");
                return Ok(None);
            }

            let target = find_bound_deployment_target(client, &claim, namespace)
                .await?
                .ok_or_else(|| {
                    ReconcilerError::DeploymentTargetNotFound(claim_name.to_owned())
                })?;

            info!(
                "Using the cluster credentials from the '{}' DeploymentTarget",
                target.metadata.name.as_deref().unwrap_or_default()
            );
            spec_from_deployment_target(&target)
        }
        EnvironmentTarget::Credentials(credentials) => {
            info!("Using the cluster credentials specified in the Environment");
            spec_from_credentials(credentials)
        }
        EnvironmentTarget::Unconfigured => {
            info!("Environment has neither cluster credentials nor a DeploymentTargetClaim configured");
            return Ok(None);
        }
    };

    // A missing secret is a misconfiguration, never something to skip over.
    let secret_name = details.cluster_credentials_secret.as_str();
    if try_get_resource::<Secret>(client, secret_name, namespace)
        .await
        .map_err(ReconcilerError::KubeApiError)?
        .is_none()
    {
        return Err(ReconcilerError::CredentialsSecretNotFound(
            secret_name.to_owned(),
        ));
    }

    Ok(Some(managed_environment_for(environment, details)?))
}

/// A bound claim must have exactly one target assigned to it; the
/// cross-reference may live on either side of the binding.
async fn find_bound_deployment_target(
    client: &Client,
    claim: &DeploymentTargetClaim,
    namespace: &str,
) -> Result<Option<DeploymentTarget>, ReconcilerError> {
    let targets = list_resources::<DeploymentTarget>(client, namespace, &ListParams::default())
        .await
        .map_err(ReconcilerError::KubeApiError)?;

    Ok(targets
        .into_iter()
        .find(|target| deployment_target_matches_claim(target, claim)))
}

pub fn deployment_target_matches_claim(
    target: &DeploymentTarget,
    claim: &DeploymentTargetClaim,
) -> bool {
    let claim_names_target = match (claim.spec.target_name.as_deref(), target.meta().name.as_deref())
    {
        (Some(wanted), Some(target_name)) => wanted == target_name,
        _ => false,
    };
    let target_names_claim = match (target.spec.claim_ref.as_deref(), claim.meta().name.as_deref())
    {
        (Some(claim_ref), Some(claim_name)) => claim_ref == claim_name,
        _ => false,
    };

    claim_names_target || target_names_claim
}

/// Credentials resolved through a claim never skip TLS verification.
pub fn spec_from_deployment_target(target: &DeploymentTarget) -> ManagedEnvironmentSpec {
    let credentials = &target.spec.kubernetes_cluster_credentials;

    ManagedEnvironmentSpec {
        api_url: credentials.api_url.clone(),
        cluster_credentials_secret: credentials.cluster_credentials_secret.clone(),
        allow_insecure_skip_tls_verify: false,
    }
}

pub fn spec_from_credentials(credentials: &KubernetesClusterCredentials) -> ManagedEnvironmentSpec {
    ManagedEnvironmentSpec {
        api_url: credentials.api_url.clone(),
        cluster_credentials_secret: credentials.cluster_credentials_secret.clone(),
        allow_insecure_skip_tls_verify: credentials.allow_insecure_skip_tls_verify,
    }
}

/// Builds the canonical derived object: deterministic name, same namespace,
/// owned by the Environment so the garbage collector cleans it up.
pub fn managed_environment_for(
    environment: &Environment,
    spec: ManagedEnvironmentSpec,
) -> Result<ManagedEnvironment, ReconcilerError> {
    let name = environment.require_name_or(ReconcilerError::MissingObjectMetadata)?;
    let namespace = environment.require_namespace_or(ReconcilerError::MissingObjectMetadata)?;
    let owner_reference = environment
        .controller_owner_ref(&())
        .ok_or(ReconcilerError::MissingObjectMetadata)?;

    let mut managed_environment = ManagedEnvironment::new(&managed_environment_name(name), spec);
    managed_environment.metadata.namespace = Some(namespace.to_owned());
    managed_environment.metadata.owner_references = Some(vec![owner_reference]);

    Ok(managed_environment)
}

#[cfg(test)]
mod tests {
    use gitops_environment_core::resources::crd::v1alpha1::{
        deployment_target::DeploymentTargetSpec,
        deployment_target_claim::DeploymentTargetClaimSpec,
        environment::EnvironmentSpec,
    };

    use super::*;

    fn credentials(skip_tls_verify: bool) -> KubernetesClusterCredentials {
        KubernetesClusterCredentials {
            api_url: "https://api.cluster.local:6443".to_owned(),
            cluster_credentials_secret: "cluster-secret".to_owned(),
            allow_insecure_skip_tls_verify: skip_tls_verify,
        }
    }

    fn target(name: &str, claim_ref: Option<&str>) -> DeploymentTarget {
        DeploymentTarget::new(
            name,
            DeploymentTargetSpec {
                claim_ref: claim_ref.map(str::to_owned),
                kubernetes_cluster_credentials: credentials(true),
            },
        )
    }

    fn claim(name: &str, target_name: Option<&str>) -> DeploymentTargetClaim {
        DeploymentTargetClaim::new(
            name,
            DeploymentTargetClaimSpec {
                target_name: target_name.map(str::to_owned),
            },
        )
    }

    #[test]
    fn target_spec_carries_the_target_credentials_without_skipping_tls_verification() {
        let spec = spec_from_deployment_target(&target("target-1", None));

        assert_eq!(spec.api_url, "https://api.cluster.local:6443");
        assert_eq!(spec.cluster_credentials_secret, "cluster-secret");
        assert!(!spec.allow_insecure_skip_tls_verify);
    }

    #[test]
    fn credentials_spec_carries_the_embedded_credentials_verbatim() {
        let spec = spec_from_credentials(&credentials(true));

        assert_eq!(spec.api_url, "https://api.cluster.local:6443");
        assert_eq!(spec.cluster_credentials_secret, "cluster-secret");
        assert!(spec.allow_insecure_skip_tls_verify);
    }

    #[test]
    fn matching_tolerates_both_cross_reference_conventions() {
        assert!(deployment_target_matches_claim(
            &target("target-1", None),
            &claim("claim-1", Some("target-1")),
        ));
        assert!(deployment_target_matches_claim(
            &target("target-1", Some("claim-1")),
            &claim("claim-1", None),
        ));
        assert!(!deployment_target_matches_claim(
            &target("target-1", None),
            &claim("claim-1", None),
        ));
        assert!(!deployment_target_matches_claim(
            &target("target-1", Some("other-claim")),
            &claim("claim-1", Some("other-target")),
        ));
    }

    #[test]
    fn managed_environment_is_owned_by_the_environment() {
        let mut environment = Environment::new(
            "staging",
            EnvironmentSpec {
                deployment_target_claim: None,
                unstable_configuration_fields: None,
            },
        );
        environment.metadata.namespace = Some("team-a".to_owned());
        environment.metadata.uid = Some("bf73e312-992c-4e20-a4e5-b698b2f2c6b6".to_owned());

        let managed_environment =
            managed_environment_for(&environment, spec_from_credentials(&credentials(false)))
                .unwrap();

        assert_eq!(
            managed_environment.metadata.name.as_deref(),
            Some("managed-environment-staging")
        );
        assert_eq!(
            managed_environment.metadata.namespace.as_deref(),
            Some("team-a")
        );

        let owner = &managed_environment.metadata.owner_references.as_ref().unwrap()[0];
        assert_eq!(owner.kind, "Environment");
        assert_eq!(owner.name, "staging");
        assert_eq!(owner.uid, "bf73e312-992c-4e20-a4e5-b698b2f2c6b6");
    }

    #[test]
    fn managed_environment_requires_environment_identity() {
        let environment = Environment::new(
            "staging",
            EnvironmentSpec {
                deployment_target_claim: None,
                unstable_configuration_fields: None,
            },
        );

        // no namespace and no uid on the environment
        assert!(matches!(
            managed_environment_for(&environment, spec_from_credentials(&credentials(false))),
            Err(ReconcilerError::MissingObjectMetadata)
        ));
    }
}
