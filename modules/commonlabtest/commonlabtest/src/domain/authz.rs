//! Privilege gate run before every service operation.

use commonlabtest_sdk::{Privilege, SecurityContext};
use tracing::warn;

use super::error::DomainError;

/// Decides whether a caller holds a privilege.
///
/// The service calls this before opening a transaction, so a denial never
/// reaches the repository.
pub trait PrivilegeChecker: Send + Sync {
    /// # Errors
    /// Returns `DomainError::NotAuthorized` when the privilege is missing.
    fn check(&self, ctx: &SecurityContext, privilege: Privilege) -> Result<(), DomainError>;
}

/// Checks the privileges carried by the `SecurityContext` itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextPrivilegeChecker;

impl PrivilegeChecker for ContextPrivilegeChecker {
    fn check(&self, ctx: &SecurityContext, privilege: Privilege) -> Result<(), DomainError> {
        if ctx.has_privilege(privilege) {
            return Ok(());
        }
        warn!(subject_id = %ctx.subject_id(), %privilege, "privilege check failed");
        Err(DomainError::not_authorized(privilege))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;
    use uuid::Uuid;

    #[test]
    #[traced_test]
    fn denial_is_logged() {
        let ctx = SecurityContext::builder()
            .subject_id(Uuid::new_v4())
            .grant(Privilege::ViewLabTest)
            .build();

        assert!(ContextPrivilegeChecker.check(&ctx, Privilege::ViewLabTest).is_ok());
        assert!(matches!(
            ContextPrivilegeChecker.check(&ctx, Privilege::DeleteLabTest),
            Err(DomainError::NotAuthorized {
                privilege: Privilege::DeleteLabTest
            })
        ));
        assert!(logs_contain("privilege check failed"));
    }
}
