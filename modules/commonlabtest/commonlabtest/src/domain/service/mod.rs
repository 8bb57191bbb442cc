//! Service façade of the commonlabtest module.
//!
//! Every public operation checks the caller's privilege first, then runs in
//! exactly one database transaction. A transaction that is dropped without
//! being committed is rolled back by the driver.
//!
//! # Errors
//!
//! Operations fail with `DomainError::NotAuthorized` before touching storage
//! when the caller lacks the operation's privilege, with `InvalidArgument`
//! for requests rejected up front (blank reasons, unsaved records, short
//! reference numbers), with `Database` when storage fails or rejects the
//! change, and with `CascadeFailed` when a dependent cannot be purged.
#![allow(clippy::missing_errors_doc)]

use std::sync::Arc;

use commonlabtest_sdk::{LabRecord, Privilege, SecurityContext};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::authz::{ContextPrivilegeChecker, PrivilegeChecker};
use crate::domain::error::DomainError;
use crate::domain::repo::CommonLabTestRepository;
use crate::infra::storage::db::db_err;

mod attribute_types;
mod attributes;
mod lab_test_types;
mod lab_tests;
mod lifecycle;
mod samples;

/// Tunables of the service façade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Shortest reference number accepted by the reference search.
    #[serde(default = "default_min_reference_number_length")]
    pub min_reference_number_length: usize,
}

fn default_min_reference_number_length() -> usize {
    4
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_reference_number_length: default_min_reference_number_length(),
        }
    }
}

pub struct Service<R: CommonLabTestRepository> {
    db: DatabaseConnection,
    repo: Arc<R>,
    checker: Arc<dyn PrivilegeChecker>,
    config: ServiceConfig,
}

impl<R: CommonLabTestRepository> Service<R> {
    /// Creates a service that trusts the privileges carried by each `SecurityContext`.
    #[must_use]
    pub fn new(db: DatabaseConnection, repo: Arc<R>, config: ServiceConfig) -> Self {
        Self {
            db,
            repo,
            checker: Arc::new(ContextPrivilegeChecker),
            config,
        }
    }

    /// Replaces the privilege gate.
    #[must_use]
    pub fn with_privilege_checker(mut self, checker: Arc<dyn PrivilegeChecker>) -> Self {
        self.checker = checker;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn authorize(&self, ctx: &SecurityContext, privilege: Privilege) -> Result<(), DomainError> {
        self.checker.check(ctx, privilege)
    }

    async fn begin(&self) -> Result<DatabaseTransaction, DomainError> {
        self.db.begin().await.map_err(db_err)
    }
}

async fn commit(txn: DatabaseTransaction) -> Result<(), DomainError> {
    txn.commit().await.map_err(db_err)
}

/// Current time, truncated to milliseconds so it survives every storage backend unchanged.
fn now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_millisecond(now.millisecond()).unwrap_or(now)
}

/// Fills in the identity and audit bookkeeping before a save.
///
/// New records get a uuid (when nil) and their creation stamp; persisted
/// records get their change stamp.
fn stamp<T: LabRecord>(ctx: &SecurityContext, record: &mut T, at: OffsetDateTime) {
    if record.uuid().is_nil() {
        record.set_uuid(Uuid::new_v4());
    }
    let is_new = record.id().is_none();
    let audit = record.audit_mut();
    if is_new {
        audit.creator.get_or_insert(ctx.subject_id());
        audit.date_created.get_or_insert(at);
    } else {
        audit.changed_by = Some(ctx.subject_id());
        audit.date_changed = Some(at);
    }
}

/// Id of a record that must already be persisted.
fn persisted_id<T: LabRecord>(record: &T) -> Result<i32, DomainError> {
    record.id().ok_or_else(|| {
        DomainError::invalid_argument(format!("{} {} has not been saved", T::KIND, record.uuid()))
    })
}
