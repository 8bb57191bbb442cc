use commonlabtest_sdk::{
    LabRecord, LabTestFilter, LabTestType, LabTestTypeFilter, Privilege, SecurityContext,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{Service, commit, lifecycle, now, persisted_id, stamp};
use crate::domain::error::DomainError;
use crate::domain::repo::CommonLabTestRepository;

impl<R: CommonLabTestRepository> Service<R> {
    #[instrument(skip(self, ctx))]
    pub async fn get_lab_test_type(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTestType>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTestMetadata)?;
        debug!("Getting lab test type by id");

        let txn = self.begin().await?;
        let found = self.repo.find_lab_test_type(&txn, id).await?;
        commit(txn).await?;
        Ok(found)
    }

    #[instrument(skip(self, ctx), fields(uuid = %uuid))]
    pub async fn get_lab_test_type_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTestType>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTestMetadata)?;
        debug!("Getting lab test type by uuid");

        let txn = self.begin().await?;
        let found = self.repo.find_lab_test_type_by_uuid(&txn, uuid).await?;
        commit(txn).await?;
        Ok(found)
    }

    pub async fn list_all_lab_test_types(
        &self,
        ctx: &SecurityContext,
        include_retired: bool,
    ) -> Result<Vec<LabTestType>, DomainError> {
        self.list_lab_test_types(ctx, &LabTestTypeFilter::default(), include_retired)
            .await
    }

    /// Lists lab test types matching `filter`.
    ///
    /// Storage matches every field but `requires_specimen`, which is applied
    /// here to the candidates it returns.
    #[instrument(skip(self, ctx, filter))]
    pub async fn list_lab_test_types(
        &self,
        ctx: &SecurityContext,
        filter: &LabTestTypeFilter,
        include_retired: bool,
    ) -> Result<Vec<LabTestType>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTestMetadata)?;

        let txn = self.begin().await?;
        let mut types = self
            .repo
            .list_lab_test_types(&txn, filter, include_retired)
            .await?;
        commit(txn).await?;

        if let Some(requires_specimen) = filter.requires_specimen {
            types.retain(|t| t.requires_specimen == requires_specimen);
        }

        debug!("Listed {} lab test types", types.len());
        Ok(types)
    }

    #[instrument(skip(self, ctx, lab_test_type), fields(uuid = %lab_test_type.uuid))]
    pub async fn save_lab_test_type(
        &self,
        ctx: &SecurityContext,
        mut lab_test_type: LabTestType,
    ) -> Result<LabTestType, DomainError> {
        self.authorize(ctx, Privilege::AddLabTestMetadata)?;

        stamp(ctx, &mut lab_test_type, now());
        let txn = self.begin().await?;
        let saved = self.repo.save_lab_test_type(&txn, lab_test_type).await?;
        commit(txn).await?;

        info!(id = ?saved.id, "Saved lab test type");
        Ok(saved)
    }

    #[instrument(skip(self, ctx, lab_test_type), fields(uuid = %lab_test_type.uuid))]
    pub async fn retire_lab_test_type(
        &self,
        ctx: &SecurityContext,
        mut lab_test_type: LabTestType,
        reason: &str,
    ) -> Result<LabTestType, DomainError> {
        self.authorize(ctx, Privilege::PurgeLabTestMetadata)?;
        if !lab_test_type.is_active() {
            return Ok(lab_test_type);
        }

        let at = now();
        lab_test_type.set_deactivation(Some(lifecycle::deactivation(ctx, reason, at)?));
        stamp(ctx, &mut lab_test_type, at);

        let txn = self.begin().await?;
        let saved = self.repo.save_lab_test_type(&txn, lab_test_type).await?;
        commit(txn).await?;

        info!(id = ?saved.id, "Retired lab test type");
        Ok(saved)
    }

    #[instrument(skip(self, ctx, lab_test_type), fields(uuid = %lab_test_type.uuid))]
    pub async fn unretire_lab_test_type(
        &self,
        ctx: &SecurityContext,
        mut lab_test_type: LabTestType,
    ) -> Result<LabTestType, DomainError> {
        self.authorize(ctx, Privilege::PurgeLabTestMetadata)?;
        if lab_test_type.is_active() {
            return Ok(lab_test_type);
        }

        lab_test_type.set_deactivation(None);
        stamp(ctx, &mut lab_test_type, now());

        let txn = self.begin().await?;
        let saved = self.repo.save_lab_test_type(&txn, lab_test_type).await?;
        commit(txn).await?;

        info!(id = ?saved.id, "Unretired lab test type");
        Ok(saved)
    }

    /// Purges a lab test type.
    ///
    /// With `cascade`, every lab test of the type, voided ones included, is
    /// purged first along with its samples and attributes. Without it the
    /// database rejects the purge while such tests exist.
    #[instrument(skip(self, ctx, lab_test_type), fields(uuid = %lab_test_type.uuid))]
    pub async fn delete_lab_test_type(
        &self,
        ctx: &SecurityContext,
        lab_test_type: &LabTestType,
        cascade: bool,
    ) -> Result<(), DomainError> {
        self.authorize(ctx, Privilege::PurgeLabTestMetadata)?;
        let id = persisted_id(lab_test_type)?;

        let txn = self.begin().await?;
        if cascade {
            let dependents = self
                .repo
                .list_lab_tests(&txn, &LabTestFilter::for_lab_test_type(id), true)
                .await?;
            for lab_test in &dependents {
                let test_id = persisted_id(lab_test)?;
                if let Err(e) = self.repo.purge_lab_test(&txn, test_id).await {
                    warn!(lab_test_id = test_id, error = %e, "Cascade delete aborted");
                    return Err(DomainError::cascade_failed(
                        format!("purging lab test {test_id} of lab test type {id}"),
                        &e,
                    ));
                }
            }
            debug!("Purged {} dependent lab tests", dependents.len());
        }
        self.repo.purge_lab_test_type(&txn, id).await?;
        commit(txn).await?;

        info!(id, cascade, "Deleted lab test type");
        Ok(())
    }

    /// `delete_lab_test_type` without cascade.
    pub async fn delete_lab_test_type_only(
        &self,
        ctx: &SecurityContext,
        lab_test_type: &LabTestType,
    ) -> Result<(), DomainError> {
        self.delete_lab_test_type(ctx, lab_test_type, false).await
    }
}
