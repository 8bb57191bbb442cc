use commonlabtest_sdk::{
    AttributeFilter, LabRecord, LabTest, LabTestAttribute, LabTestFilter, LabTestSample,
    Privilege, SecurityContext, SortOrder,
};
use sea_orm::DatabaseTransaction;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{Service, commit, lifecycle, now, persisted_id, stamp};
use crate::domain::error::DomainError;
use crate::domain::repo::CommonLabTestRepository;

impl<R: CommonLabTestRepository> Service<R> {
    #[instrument(skip(self, ctx))]
    pub async fn get_lab_test(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTest>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTest)?;
        debug!("Getting lab test by id");

        let txn = self.begin().await?;
        let found = self.repo.find_lab_test(&txn, id).await?;
        commit(txn).await?;
        Ok(found)
    }

    #[instrument(skip(self, ctx), fields(uuid = %uuid))]
    pub async fn get_lab_test_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTest>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTest)?;
        debug!("Getting lab test by uuid");

        let txn = self.begin().await?;
        let found = self.repo.find_lab_test_by_uuid(&txn, uuid).await?;
        commit(txn).await?;
        Ok(found)
    }

    /// First active lab test ordered during the encounter.
    pub async fn get_lab_test_by_encounter(
        &self,
        ctx: &SecurityContext,
        encounter_id: i32,
    ) -> Result<Option<LabTest>, DomainError> {
        let filter = LabTestFilter {
            encounter_id: Some(encounter_id),
            ..LabTestFilter::default()
        };
        Ok(self.list_lab_tests(ctx, &filter, false).await?.into_iter().next())
    }

    /// First active lab test fulfilling the order.
    pub async fn get_lab_test_by_order(
        &self,
        ctx: &SecurityContext,
        order_id: i32,
    ) -> Result<Option<LabTest>, DomainError> {
        let filter = LabTestFilter {
            order_id: Some(order_id),
            ..LabTestFilter::default()
        };
        Ok(self.list_lab_tests(ctx, &filter, false).await?.into_iter().next())
    }

    #[instrument(skip(self, ctx, filter))]
    pub async fn list_lab_tests(
        &self,
        ctx: &SecurityContext,
        filter: &LabTestFilter,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTest)?;

        let txn = self.begin().await?;
        let tests = self.repo.list_lab_tests(&txn, filter, include_voided).await?;
        commit(txn).await?;

        debug!("Listed {} lab tests", tests.len());
        Ok(tests)
    }

    pub async fn list_lab_tests_by_type(
        &self,
        ctx: &SecurityContext,
        lab_test_type_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, DomainError> {
        let filter = LabTestFilter::for_lab_test_type(lab_test_type_id);
        self.list_lab_tests(ctx, &filter, include_voided).await
    }

    pub async fn list_lab_tests_by_concept(
        &self,
        ctx: &SecurityContext,
        order_concept_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, DomainError> {
        let filter = LabTestFilter {
            order_concept_id: Some(order_concept_id),
            ..LabTestFilter::default()
        };
        self.list_lab_tests(ctx, &filter, include_voided).await
    }

    pub async fn list_lab_tests_by_orderer(
        &self,
        ctx: &SecurityContext,
        orderer_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, DomainError> {
        let filter = LabTestFilter {
            orderer_id: Some(orderer_id),
            ..LabTestFilter::default()
        };
        self.list_lab_tests(ctx, &filter, include_voided).await
    }

    pub async fn list_lab_tests_by_patient(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, DomainError> {
        let filter = LabTestFilter::for_patient(patient_id);
        self.list_lab_tests(ctx, &filter, include_voided).await
    }

    /// Searches lab tests whose lab reference number contains `reference_number`.
    ///
    /// The reference is trimmed; one shorter than `min_reference_number_length`
    /// is rejected before storage is queried. `%` and `_` match literally.
    #[instrument(skip(self, ctx))]
    pub async fn search_lab_tests_by_reference(
        &self,
        ctx: &SecurityContext,
        reference_number: &str,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTest)?;
        let reference_number = reference_number.trim();
        let min = self.config.min_reference_number_length;
        if reference_number.chars().count() < min {
            return Err(DomainError::invalid_argument(format!(
                "Reference number to search should at least be {min} character long."
            )));
        }

        let filter = LabTestFilter {
            reference_number: Some(reference_number.to_owned()),
            ..LabTestFilter::default()
        };
        self.list_lab_tests(ctx, &filter, include_voided).await
    }

    pub async fn get_earliest_lab_test(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
    ) -> Result<Option<LabTest>, DomainError> {
        self.first_lab_test(ctx, patient_id, SortOrder::Ascending)
            .await
    }

    pub async fn get_latest_lab_test(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
    ) -> Result<Option<LabTest>, DomainError> {
        self.first_lab_test(ctx, patient_id, SortOrder::Descending)
            .await
    }

    #[instrument(skip(self, ctx))]
    async fn first_lab_test(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        order: SortOrder,
    ) -> Result<Option<LabTest>, DomainError> {
        self.authorize(ctx, Privilege::ViewLabTest)?;

        let txn = self.begin().await?;
        let tests = self
            .repo
            .find_lab_tests_limited(&txn, &LabTestFilter::for_patient(patient_id), 1, order)
            .await?;
        commit(txn).await?;
        Ok(tests.into_iter().next())
    }

    /// Saves a lab test together with the attributes it carries.
    ///
    /// Attributes without a lab test are linked to the saved test. The
    /// returned test carries the saved attributes.
    #[instrument(skip(self, ctx, lab_test), fields(uuid = %lab_test.uuid))]
    pub async fn save_lab_test(
        &self,
        ctx: &SecurityContext,
        mut lab_test: LabTest,
    ) -> Result<LabTest, DomainError> {
        self.authorize(ctx, Privilege::AddLabTest)?;

        let at = now();
        let attributes = std::mem::take(&mut lab_test.attributes);
        stamp(ctx, &mut lab_test, at);

        let txn = self.begin().await?;
        let mut saved = self.repo.save_lab_test(&txn, lab_test).await?;
        let test_id = persisted_id(&saved)?;
        saved.attributes = self
            .save_owned_attributes(&txn, ctx, test_id, attributes, at)
            .await?;
        commit(txn).await?;

        info!(id = test_id, attributes = saved.attributes.len(), "Saved lab test");
        Ok(saved)
    }

    /// Saves a lab test, its sample and its attributes in one transaction.
    ///
    /// The test is saved first, then the sample, then the attributes the test
    /// carries followed by `attributes`, in order. A sample or attribute
    /// without a lab test is linked to the saved test. The first failure
    /// aborts the whole unit of work.
    #[instrument(skip_all, fields(uuid = %lab_test.uuid, attributes = attributes.len()))]
    pub async fn save_lab_test_with_sample(
        &self,
        ctx: &SecurityContext,
        mut lab_test: LabTest,
        mut sample: LabTestSample,
        attributes: Vec<LabTestAttribute>,
    ) -> Result<LabTest, DomainError> {
        self.authorize(ctx, Privilege::AddLabTest)?;

        let at = now();
        let mut all_attributes = std::mem::take(&mut lab_test.attributes);
        all_attributes.extend(attributes);
        stamp(ctx, &mut lab_test, at);

        let txn = self.begin().await?;
        let mut saved = self.repo.save_lab_test(&txn, lab_test).await?;
        let test_id = persisted_id(&saved)?;

        sample.lab_test_id.get_or_insert(test_id);
        stamp(ctx, &mut sample, at);
        let sample = self.repo.save_sample(&txn, sample).await?;

        saved.attributes = self
            .save_owned_attributes(&txn, ctx, test_id, all_attributes, at)
            .await?;
        commit(txn).await?;

        info!(
            id = test_id,
            sample_id = ?sample.id,
            attributes = saved.attributes.len(),
            "Saved lab test with sample"
        );
        Ok(saved)
    }

    async fn save_owned_attributes(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SecurityContext,
        test_id: i32,
        attributes: Vec<LabTestAttribute>,
        at: OffsetDateTime,
    ) -> Result<Vec<LabTestAttribute>, DomainError> {
        let mut saved = Vec::with_capacity(attributes.len());
        for mut attribute in attributes {
            attribute.lab_test_id.get_or_insert(test_id);
            stamp(ctx, &mut attribute, at);
            saved.push(self.repo.save_attribute(txn, attribute).await?);
        }
        Ok(saved)
    }

    /// Voids the lab test and every active attribute it owns with the same reason.
    #[instrument(skip(self, ctx, lab_test), fields(uuid = %lab_test.uuid))]
    pub async fn void_lab_test(
        &self,
        ctx: &SecurityContext,
        mut lab_test: LabTest,
        reason: &str,
    ) -> Result<LabTest, DomainError> {
        self.authorize(ctx, Privilege::DeleteLabTest)?;
        if !lab_test.is_active() {
            return Ok(lab_test);
        }
        let id = persisted_id(&lab_test)?;

        let at = now();
        let state = lifecycle::deactivation(ctx, reason, at)?;
        lab_test.set_deactivation(Some(state.clone()));
        stamp(ctx, &mut lab_test, at);

        let txn = self.begin().await?;
        let mut saved = self.repo.save_lab_test(&txn, lab_test).await?;
        let attributes = self
            .repo
            .list_attributes(&txn, &owned_by(id), false)
            .await?;
        let voided = attributes.len();
        for mut attribute in attributes {
            attribute.set_deactivation(Some(state.clone()));
            stamp(ctx, &mut attribute, at);
            self.repo.save_attribute(&txn, attribute).await?;
        }
        saved.attributes = self.repo.list_attributes(&txn, &owned_by(id), true).await?;
        commit(txn).await?;

        info!(id, attributes = voided, "Voided lab test");
        Ok(saved)
    }

    /// Unvoids the lab test and the attributes that were voided along with it.
    #[instrument(skip(self, ctx, lab_test), fields(uuid = %lab_test.uuid))]
    pub async fn unvoid_lab_test(
        &self,
        ctx: &SecurityContext,
        mut lab_test: LabTest,
    ) -> Result<LabTest, DomainError> {
        self.authorize(ctx, Privilege::DeleteLabTest)?;
        let Some(state) = lab_test.voided.take() else {
            return Ok(lab_test);
        };
        let id = persisted_id(&lab_test)?;

        let at = now();
        stamp(ctx, &mut lab_test, at);

        let txn = self.begin().await?;
        let mut saved = self.repo.save_lab_test(&txn, lab_test).await?;
        let attributes = self.repo.list_attributes(&txn, &owned_by(id), true).await?;
        let mut restored = 0_usize;
        for mut attribute in attributes {
            if lifecycle::deactivated_with(&attribute, &state) {
                attribute.set_deactivation(None);
                stamp(ctx, &mut attribute, at);
                attribute = self.repo.save_attribute(&txn, attribute).await?;
                restored += 1;
            }
            saved.attributes.push(attribute);
        }
        commit(txn).await?;

        info!(id, attributes = restored, "Unvoided lab test");
        Ok(saved)
    }

    /// Purges the lab test along with the attributes and samples it owns.
    #[instrument(skip(self, ctx, lab_test), fields(uuid = %lab_test.uuid))]
    pub async fn delete_lab_test(
        &self,
        ctx: &SecurityContext,
        lab_test: &LabTest,
    ) -> Result<(), DomainError> {
        self.authorize(ctx, Privilege::DeleteLabTest)?;
        let id = persisted_id(lab_test)?;

        let txn = self.begin().await?;
        self.repo.purge_lab_test(&txn, id).await?;
        commit(txn).await?;

        info!(id, "Deleted lab test");
        Ok(())
    }
}

fn owned_by(lab_test_id: i32) -> AttributeFilter {
    AttributeFilter {
        lab_test_id: Some(lab_test_id),
        ..AttributeFilter::default()
    }
}
