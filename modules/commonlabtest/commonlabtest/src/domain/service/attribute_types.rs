use commonlabtest_sdk::{
    AttributeFilter, AttributeTypeFilter, LabRecord, LabTestAttributeType, Privilege,
    SecurityContext,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{Service, commit, lifecycle, now, persisted_id, stamp};
use crate::domain::error::DomainError;
use crate::domain::repo::CommonLabTestRepository;

impl<R: CommonLabTestRepository> Service<R> {
    #[instrument(skip(self, ctx))]
    pub async fn get_attribute_type(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTestAttributeType>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTestMetadata)?;
        debug!("Getting attribute type by id");

        let txn = self.begin().await?;
        let found = self.repo.find_attribute_type(&txn, id).await?;
        commit(txn).await?;
        Ok(found)
    }

    #[instrument(skip(self, ctx), fields(uuid = %uuid))]
    pub async fn get_attribute_type_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTestAttributeType>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTestMetadata)?;
        debug!("Getting attribute type by uuid");

        let txn = self.begin().await?;
        let found = self.repo.find_attribute_type_by_uuid(&txn, uuid).await?;
        commit(txn).await?;
        Ok(found)
    }

    pub async fn list_all_attribute_types(
        &self,
        ctx: &SecurityContext,
        include_retired: bool,
    ) -> Result<Vec<LabTestAttributeType>, DomainError> {
        self.list_attribute_types(ctx, &AttributeTypeFilter::default(), include_retired)
            .await
    }

    #[instrument(skip(self, ctx, filter))]
    pub async fn list_attribute_types(
        &self,
        ctx: &SecurityContext,
        filter: &AttributeTypeFilter,
        include_retired: bool,
    ) -> Result<Vec<LabTestAttributeType>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTestMetadata)?;

        let txn = self.begin().await?;
        let types = self
            .repo
            .list_attribute_types(&txn, filter, include_retired)
            .await?;
        commit(txn).await?;

        debug!("Listed {} attribute types", types.len());
        Ok(types)
    }

    #[instrument(skip(self, ctx, attribute_type), fields(uuid = %attribute_type.uuid))]
    pub async fn save_attribute_type(
        &self,
        ctx: &SecurityContext,
        mut attribute_type: LabTestAttributeType,
    ) -> Result<LabTestAttributeType, DomainError> {
        self.authorize(ctx, Privilege::AddLabTestMetadata)?;

        stamp(ctx, &mut attribute_type, now());
        let txn = self.begin().await?;
        let saved = self.repo.save_attribute_type(&txn, attribute_type).await?;
        commit(txn).await?;

        info!(id = ?saved.id, "Saved attribute type");
        Ok(saved)
    }

    #[instrument(skip(self, ctx, attribute_type), fields(uuid = %attribute_type.uuid))]
    pub async fn retire_attribute_type(
        &self,
        ctx: &SecurityContext,
        mut attribute_type: LabTestAttributeType,
        reason: &str,
    ) -> Result<LabTestAttributeType, DomainError> {
        self.authorize(ctx, Privilege::PurgeLabTestMetadata)?;
        if !attribute_type.is_active() {
            return Ok(attribute_type);
        }

        let at = now();
        attribute_type.set_deactivation(Some(lifecycle::deactivation(ctx, reason, at)?));
        stamp(ctx, &mut attribute_type, at);

        let txn = self.begin().await?;
        let saved = self.repo.save_attribute_type(&txn, attribute_type).await?;
        commit(txn).await?;

        info!(id = ?saved.id, "Retired attribute type");
        Ok(saved)
    }

    #[instrument(skip(self, ctx, attribute_type), fields(uuid = %attribute_type.uuid))]
    pub async fn unretire_attribute_type(
        &self,
        ctx: &SecurityContext,
        mut attribute_type: LabTestAttributeType,
    ) -> Result<LabTestAttributeType, DomainError> {
        self.authorize(ctx, Privilege::PurgeLabTestMetadata)?;
        if attribute_type.is_active() {
            return Ok(attribute_type);
        }

        attribute_type.set_deactivation(None);
        stamp(ctx, &mut attribute_type, now());

        let txn = self.begin().await?;
        let saved = self.repo.save_attribute_type(&txn, attribute_type).await?;
        commit(txn).await?;

        info!(id = ?saved.id, "Unretired attribute type");
        Ok(saved)
    }

    /// Purges an attribute type, and with `cascade` every attribute of that type first.
    #[instrument(skip(self, ctx, attribute_type), fields(uuid = %attribute_type.uuid))]
    pub async fn delete_attribute_type(
        &self,
        ctx: &SecurityContext,
        attribute_type: &LabTestAttributeType,
        cascade: bool,
    ) -> Result<(), DomainError> {
        self.authorize(ctx, Privilege::PurgeLabTestMetadata)?;
        let id = persisted_id(attribute_type)?;

        let txn = self.begin().await?;
        if cascade {
            let filter = AttributeFilter {
                attribute_type_id: Some(id),
                ..AttributeFilter::default()
            };
            let dependents = self.repo.list_attributes(&txn, &filter, true).await?;
            for attribute in &dependents {
                let attribute_id = persisted_id(attribute)?;
                if let Err(e) = self.repo.purge_attribute(&txn, attribute_id).await {
                    warn!(attribute_id, error = %e, "Cascade delete aborted");
                    return Err(DomainError::cascade_failed(
                        format!("purging attribute {attribute_id} of attribute type {id}"),
                        &e,
                    ));
                }
            }
            debug!("Purged {} dependent attributes", dependents.len());
        }
        self.repo.purge_attribute_type(&txn, id).await?;
        commit(txn).await?;

        info!(id, cascade, "Deleted attribute type");
        Ok(())
    }

    /// `delete_attribute_type` without cascade.
    pub async fn delete_attribute_type_only(
        &self,
        ctx: &SecurityContext,
        attribute_type: &LabTestAttributeType,
    ) -> Result<(), DomainError> {
        self.delete_attribute_type(ctx, attribute_type, false).await
    }
}
