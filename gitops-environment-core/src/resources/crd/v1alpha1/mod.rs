pub mod binding;
pub mod deployment_target;
pub mod deployment_target_claim;
pub mod environment;
pub mod managed_environment;
