use commonlabtest_sdk::{
    LabRecord, LabTestSample, LabTestSampleStatus, Privilege, SampleFilter, SecurityContext,
    SortOrder,
};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{Service, commit, lifecycle, now, persisted_id, stamp};
use crate::domain::error::DomainError;
use crate::domain::repo::CommonLabTestRepository;

impl<R: CommonLabTestRepository> Service<R> {
    #[instrument(skip(self, ctx))]
    pub async fn get_sample(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTestSample>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTest)?;
        debug!("Getting sample by id");

        let txn = self.begin().await?;
        let found = self.repo.find_sample(&txn, id).await?;
        commit(txn).await?;
        Ok(found)
    }

    #[instrument(skip(self, ctx), fields(uuid = %uuid))]
    pub async fn get_sample_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTestSample>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTest)?;
        debug!("Getting sample by uuid");

        let txn = self.begin().await?;
        let found = self.repo.find_sample_by_uuid(&txn, uuid).await?;
        commit(txn).await?;
        Ok(found)
    }

    #[instrument(skip(self, ctx, filter))]
    pub async fn list_samples(
        &self,
        ctx: &SecurityContext,
        filter: &SampleFilter,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTest)?;

        let txn = self.begin().await?;
        let samples = self.repo.list_samples(&txn, filter, include_voided).await?;
        commit(txn).await?;

        debug!("Listed {} samples", samples.len());
        Ok(samples)
    }

    pub async fn list_samples_by_identifiers(
        &self,
        ctx: &SecurityContext,
        sample_identifier: Option<String>,
        order_number: Option<String>,
        reference_number: Option<String>,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, DomainError> {
        let filter = SampleFilter {
            sample_identifier,
            order_number,
            reference_number,
            ..SampleFilter::default()
        };
        self.list_samples(ctx, &filter, include_voided).await
    }

    pub async fn list_samples_by_lab_test(
        &self,
        ctx: &SecurityContext,
        lab_test_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, DomainError> {
        let filter = SampleFilter {
            lab_test_id: Some(lab_test_id),
            ..SampleFilter::default()
        };
        self.list_samples(ctx, &filter, include_voided).await
    }

    pub async fn list_samples_by_collector(
        &self,
        ctx: &SecurityContext,
        collector_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, DomainError> {
        let filter = SampleFilter {
            collector_id: Some(collector_id),
            ..SampleFilter::default()
        };
        self.list_samples(ctx, &filter, include_voided).await
    }

    pub async fn list_samples_by_order(
        &self,
        ctx: &SecurityContext,
        order_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, DomainError> {
        let filter = SampleFilter {
            order_id: Some(order_id),
            ..SampleFilter::default()
        };
        self.list_samples(ctx, &filter, include_voided).await
    }

    pub async fn list_samples_by_status(
        &self,
        ctx: &SecurityContext,
        status: LabTestSampleStatus,
        from: Option<OffsetDateTime>,
        to: Option<OffsetDateTime>,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, DomainError> {
        let filter = SampleFilter {
            status: Some(status),
            from,
            to,
            ..SampleFilter::default()
        };
        self.list_samples(ctx, &filter, include_voided).await
    }

    pub async fn get_earliest_sample(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        status: Option<LabTestSampleStatus>,
    ) -> Result<Option<LabTestSample>, DomainError> {
        self.first_sample(ctx, patient_id, status, SortOrder::Ascending)
            .await
    }

    pub async fn get_latest_sample(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        status: Option<LabTestSampleStatus>,
    ) -> Result<Option<LabTestSample>, DomainError> {
        self.first_sample(ctx, patient_id, status, SortOrder::Descending)
            .await
    }

    #[instrument(skip(self, ctx))]
    async fn first_sample(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        status: Option<LabTestSampleStatus>,
        order: SortOrder,
    ) -> Result<Option<LabTestSample>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTest)?;

        let filter = SampleFilter {
            status,
            ..SampleFilter::for_patient(patient_id)
        };
        let txn = self.begin().await?;
        let samples = self
            .repo
            .find_samples_limited(&txn, &filter, 1, order)
            .await?;
        commit(txn).await?;
        Ok(samples.into_iter().next())
    }

    #[instrument(skip(self, ctx, sample), fields(uuid = %sample.uuid))]
    pub async fn save_sample(
        &self,
        ctx: &SecurityContext,
        mut sample: LabTestSample,
    ) -> Result<LabTestSample, DomainError> {
        self.authorize(ctx, Privilege::AddLabTest)?;

        stamp(ctx, &mut sample, now());
        let txn = self.begin().await?;
        let saved = self.repo.save_sample(&txn, sample).await?;
        commit(txn).await?;

        info!(id = ?saved.id, status = %saved.status, "Saved sample");
        Ok(saved)
    }

    #[instrument(skip(self, ctx, sample), fields(uuid = %sample.uuid))]
    pub async fn void_sample(
        &self,
        ctx: &SecurityContext,
        mut sample: LabTestSample,
        reason: &str,
    ) -> Result<LabTestSample, DomainError> {
        self.authorize(ctx, Privilege::DeleteLabTest)?;
        if !sample.is_active() {
            return Ok(sample);
        }

        let at = now();
        sample.set_deactivation(Some(lifecycle::deactivation(ctx, reason, at)?));
        stamp(ctx, &mut sample, at);

        let txn = self.begin().await?;
        let saved = self.repo.save_sample(&txn, sample).await?;
        commit(txn).await?;

        info!(id = ?saved.id, "Voided sample");
        Ok(saved)
    }

    #[instrument(skip(self, ctx, sample), fields(uuid = %sample.uuid))]
    pub async fn unvoid_sample(
        &self,
        ctx: &SecurityContext,
        mut sample: LabTestSample,
    ) -> Result<LabTestSample, DomainError> {
        self.authorize(ctx, Privilege::DeleteLabTest)?;
        if sample.is_active() {
            return Ok(sample);
        }

        sample.set_deactivation(None);
        stamp(ctx, &mut sample, now());

        let txn = self.begin().await?;
        let saved = self.repo.save_sample(&txn, sample).await?;
        commit(txn).await?;

        info!(id = ?saved.id, "Unvoided sample");
        Ok(saved)
    }

    #[instrument(skip(self, ctx, sample), fields(uuid = %sample.uuid))]
    pub async fn delete_sample(
        &self,
        ctx: &SecurityContext,
        sample: &LabTestSample,
    ) -> Result<(), DomainError> {
        self.authorize(ctx, Privilege::DeleteLabTest)?;
        let id = persisted_id(sample)?;

        let txn = self.begin().await?;
        self.repo.purge_sample(&txn, id).await?;
        commit(txn).await?;

        info!(id, "Deleted sample");
        Ok(())
    }
}
