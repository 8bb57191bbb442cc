//! Retire / void bookkeeping shared by every entity.

use commonlabtest_sdk::{Deactivation, LabRecord, SecurityContext};
use time::OffsetDateTime;

use crate::domain::error::DomainError;

/// Builds the deactivation block for a retire or void request.
pub(super) fn deactivation(
    ctx: &SecurityContext,
    reason: &str,
    at: OffsetDateTime,
) -> Result<Deactivation, DomainError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(DomainError::invalid_argument("A reason is required"));
    }
    Ok(Deactivation {
        by: ctx.subject_id(),
        at,
        reason: reason.to_owned(),
    })
}

/// True when `record` was deactivated by the same user at the same instant as `by`.
pub(super) fn deactivated_with<T: LabRecord>(record: &T, by: &Deactivation) -> bool {
    record
        .deactivation()
        .is_some_and(|d| d.by == by.by && d.at == by.at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonlabtest_sdk::LabTestAttribute;
    use uuid::Uuid;

    #[test]
    fn blank_reason_is_rejected() {
        let ctx = SecurityContext::system(Uuid::new_v4());
        let err = deactivation(&ctx, "   ", OffsetDateTime::UNIX_EPOCH).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument { .. }));
    }

    #[test]
    fn match_requires_same_user_and_instant() {
        let ctx = SecurityContext::system(Uuid::new_v4());
        let at = OffsetDateTime::UNIX_EPOCH;
        let state = deactivation(&ctx, " entered in error ", at).unwrap();
        assert_eq!(state.reason, "entered in error");

        let mut attribute = LabTestAttribute::new(1, "positive");
        attribute.set_deactivation(Some(state.clone()));
        assert!(deactivated_with(&attribute, &state));

        attribute.set_deactivation(Some(Deactivation {
            at: at + time::Duration::seconds(1),
            ..state.clone()
        }));
        assert!(!deactivated_with(&attribute, &state));
    }
}
