use chrono::{DateTime, Utc};
use kube::{api::PostParams, Client};

use crate::resources::crd::v1alpha1::binding::{
    BindingCondition, ConditionStatus, SnapshotEnvironmentBinding,
};

use super::operations::update_resource_status;

pub const BINDING_CONDITION_ERROR_OCCURRED: &str = "ErrorOccurred";
pub const BINDING_REASON_ERROR_OCCURRED: &str = "ErrorOccurred";

/// Upserts the condition on the binding's status and persists it through the
/// status subresource.
pub async fn update_binding_status_condition(
    client: &Client,
    binding: &mut SnapshotEnvironmentBinding,
    condition_type: &str,
    status: ConditionStatus,
    reason: &str,
    message: &str,
) -> Result<(), kube::Error> {
    let conditions = &mut binding
        .status
        .get_or_insert_with(Default::default)
        .binding_conditions;

    upsert_binding_condition(conditions, condition_type, status, reason, message, Utc::now());

    update_resource_status(client, binding, &PostParams::default()).await?;

    Ok(())
}

/// Condition types are unique within the list. Reason, message and status are
/// always overwritten, but the transition timestamp only advances when one of
/// them actually differs from the stored value.
pub fn upsert_binding_condition(
    conditions: &mut Vec<BindingCondition>,
    condition_type: &str,
    status: ConditionStatus,
    reason: &str,
    message: &str,
    now: DateTime<Utc>,
) {
    match conditions
        .iter_mut()
        .find(|condition| condition.condition_type == condition_type)
    {
        Some(condition) => {
            let transitioned = condition.message != message
                || condition.reason != reason
                || condition.status != status;

            condition.status = status;
            condition.reason = reason.to_owned();
            condition.message = message.to_owned();

            if transitioned {
                condition.last_transition_time = now;
            }
        }
        None => conditions.push(BindingCondition {
            condition_type: condition_type.to_owned(),
            status,
            reason: reason.to_owned(),
            message: message.to_owned(),
            last_transition_time: now,
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn missing_condition_is_appended() {
        let mut conditions = Vec::new();
        let now = Utc::now();

        upsert_binding_condition(
            &mut conditions,
            BINDING_CONDITION_ERROR_OCCURRED,
            ConditionStatus::True,
            BINDING_REASON_ERROR_OCCURRED,
            "the referenced secret was not found",
            now,
        );

        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].condition_type, BINDING_CONDITION_ERROR_OCCURRED);
        assert_eq!(conditions[0].last_transition_time, now);
    }

    #[test]
    fn identical_upsert_keeps_the_transition_timestamp() {
        let mut conditions = Vec::new();
        let first = Utc::now();
        let second = first + Duration::seconds(30);

        for now in [first, second] {
            upsert_binding_condition(
                &mut conditions,
                BINDING_CONDITION_ERROR_OCCURRED,
                ConditionStatus::True,
                BINDING_REASON_ERROR_OCCURRED,
                "the referenced secret was not found",
                now,
            );
        }

        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].last_transition_time, first);
    }

    #[test]
    fn changed_message_advances_the_transition_timestamp() {
        let mut conditions = Vec::new();
        let first = Utc::now();
        let second = first + Duration::seconds(30);

        upsert_binding_condition(
            &mut conditions,
            BINDING_CONDITION_ERROR_OCCURRED,
            ConditionStatus::True,
            BINDING_REASON_ERROR_OCCURRED,
            "the referenced secret was not found",
            first,
        );
        upsert_binding_condition(
            &mut conditions,
            BINDING_CONDITION_ERROR_OCCURRED,
            ConditionStatus::True,
            BINDING_REASON_ERROR_OCCURRED,
            "the referenced claim was not found",
            second,
        );

        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].message, "the referenced claim was not found");
        assert_eq!(conditions[0].last_transition_time, second);
    }

    #[test]
    fn distinct_condition_types_are_kept_separately() {
        let mut conditions = Vec::new();
        let now = Utc::now();

        upsert_binding_condition(
            &mut conditions,
            BINDING_CONDITION_ERROR_OCCURRED,
            ConditionStatus::True,
            BINDING_REASON_ERROR_OCCURRED,
            "the referenced secret was not found",
            now,
        );
        upsert_binding_condition(
            &mut conditions,
            "Deployed",
            ConditionStatus::False,
            "DeploymentInProgress",
            "the deployment has not completed yet",
            now,
        );

        assert_eq!(conditions.len(), 2);
    }
}
