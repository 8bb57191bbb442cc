use commonlabtest_sdk::{AttributeFilter, LabRecord, LabTestAttribute, Privilege, SecurityContext};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{Service, commit, lifecycle, now, persisted_id, stamp};
use crate::domain::error::DomainError;
use crate::domain::repo::CommonLabTestRepository;

impl<R: CommonLabTestRepository> Service<R> {
    #[instrument(skip(self, ctx))]
    pub async fn get_attribute(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTestAttribute>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTest)?;
        debug!("Getting attribute by id");

        let txn = self.begin().await?;
        let found = self.repo.find_attribute(&txn, id).await?;
        commit(txn).await?;
        Ok(found)
    }

    #[instrument(skip(self, ctx), fields(uuid = %uuid))]
    pub async fn get_attribute_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTestAttribute>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTest)?;
        debug!("Getting attribute by uuid");

        let txn = self.begin().await?;
        let found = self.repo.find_attribute_by_uuid(&txn, uuid).await?;
        commit(txn).await?;
        Ok(found)
    }

    #[instrument(skip(self, ctx, filter))]
    pub async fn list_attributes(
        &self,
        ctx: &SecurityContext,
        filter: &AttributeFilter,
        include_voided: bool,
    ) -> Result<Vec<LabTestAttribute>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTest)?;

        let txn = self.begin().await?;
        let attributes = self
            .repo
            .list_attributes(&txn, filter, include_voided)
            .await?;
        commit(txn).await?;

        debug!("Listed {} attributes", attributes.len());
        Ok(attributes)
    }

    pub async fn list_attributes_by_type(
        &self,
        ctx: &SecurityContext,
        attribute_type_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestAttribute>, DomainError> {
        let filter = AttributeFilter {
            attribute_type_id: Some(attribute_type_id),
            ..AttributeFilter::default()
        };
        self.list_attributes(ctx, &filter, include_voided).await
    }

    pub async fn list_attributes_by_patient(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestAttribute>, DomainError> {
        let filter = AttributeFilter {
            patient_id: Some(patient_id),
            ..AttributeFilter::default()
        };
        self.list_attributes(ctx, &filter, include_voided).await
    }

    pub async fn list_attributes_by_patient_and_type(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        attribute_type_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestAttribute>, DomainError> {
        let filter = AttributeFilter {
            patient_id: Some(patient_id),
            attribute_type_id: Some(attribute_type_id),
            ..AttributeFilter::default()
        };
        self.list_attributes(ctx, &filter, include_voided).await
    }

    #[instrument(skip(self, ctx, attribute), fields(uuid = %attribute.uuid))]
    pub async fn save_attribute(
        &self,
        ctx: &SecurityContext,
        mut attribute: LabTestAttribute,
    ) -> Result<LabTestAttribute, DomainError> {
        self.authorize(ctx, Privilege::AddLabTest)?;

        stamp(ctx, &mut attribute, now());
        let txn = self.begin().await?;
        let saved = self.repo.save_attribute(&txn, attribute).await?;
        commit(txn).await?;

        info!(id = ?saved.id, "Saved attribute");
        Ok(saved)
    }

    /// Saves each attribute in order and returns them as saved.
    #[instrument(skip_all, fields(count = attributes.len()))]
    pub async fn save_attributes(
        &self,
        ctx: &SecurityContext,
        attributes: Vec<LabTestAttribute>,
    ) -> Result<Vec<LabTestAttribute>, DomainError> {
        self.authorize(ctx, Privilege::AddLabTest)?;

        let at = now();
        let txn = self.begin().await?;
        let mut saved = Vec::with_capacity(attributes.len());
        for mut attribute in attributes {
            stamp(ctx, &mut attribute, at);
            saved.push(self.repo.save_attribute(&txn, attribute).await?);
        }
        commit(txn).await?;

        info!("Saved {} attributes", saved.len());
        Ok(saved)
    }

    #[instrument(skip(self, ctx, attribute), fields(uuid = %attribute.uuid))]
    pub async fn void_attribute(
        &self,
        ctx: &SecurityContext,
        mut attribute: LabTestAttribute,
        reason: &str,
    ) -> Result<LabTestAttribute, DomainError> {
        self.authorize(ctx, Privilege::DeleteLabTest)?;
        if !attribute.is_active() {
            return Ok(attribute);
        }

        let at = now();
        attribute.set_deactivation(Some(lifecycle::deactivation(ctx, reason, at)?));
        stamp(ctx, &mut attribute, at);

        let txn = self.begin().await?;
        let saved = self.repo.save_attribute(&txn, attribute).await?;
        commit(txn).await?;

        info!(id = ?saved.id, "Voided attribute");
        Ok(saved)
    }

    #[instrument(skip(self, ctx, attribute), fields(uuid = %attribute.uuid))]
    pub async fn unvoid_attribute(
        &self,
        ctx: &SecurityContext,
        mut attribute: LabTestAttribute,
    ) -> Result<LabTestAttribute, DomainError> {
        self.authorize(ctx, Privilege::DeleteLabTest)?;
        if attribute.is_active() {
            return Ok(attribute);
        }

        attribute.set_deactivation(None);
        stamp(ctx, &mut attribute, now());

        let txn = self.begin().await?;
        let saved = self.repo.save_attribute(&txn, attribute).await?;
        commit(txn).await?;

        info!(id = ?saved.id, "Unvoided attribute");
        Ok(saved)
    }

    #[instrument(skip(self, ctx, attribute), fields(uuid = %attribute.uuid))]
    pub async fn delete_attribute(
        &self,
        ctx: &SecurityContext,
        attribute: &LabTestAttribute,
    ) -> Result<(), DomainError> {
        self.authorize(ctx, Privilege::DeleteLabTest)?;
        let id = persisted_id(attribute)?;

        let txn = self.begin().await?;
        self.repo.purge_attribute(&txn, id).await?;
        commit(txn).await?;

        info!(id, "Deleted attribute");
        Ok(())
    }
}
