use std::sync::Arc;

use async_trait::async_trait;
use commonlabtest_sdk::{
    AttributeFilter, AttributeTypeFilter, CommonLabTestClientV1, CommonLabTestError, LabTest,
    LabTestAttribute, LabTestAttributeType, LabTestFilter, LabTestSample, LabTestSampleStatus,
    LabTestType, LabTestTypeFilter, SampleFilter, SecurityContext,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::repo::CommonLabTestRepository;
use crate::domain::service::Service;

/// In-process implementation of `CommonLabTestClientV1` backed by the service.
pub struct LocalClient<R: CommonLabTestRepository> {
    service: Arc<Service<R>>,
}

impl<R: CommonLabTestRepository> LocalClient<R> {
    #[must_use]
    pub fn new(service: Arc<Service<R>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<R: CommonLabTestRepository> CommonLabTestClientV1 for LocalClient<R> {
    // Lab test types

    async fn get_lab_test_type(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTestType>, CommonLabTestError> {
        self.service
            .get_lab_test_type(ctx, id)
            .await
            .map_err(Into::into)
    }

    async fn get_lab_test_type_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTestType>, CommonLabTestError> {
        self.service
            .get_lab_test_type_by_uuid(ctx, uuid)
            .await
            .map_err(Into::into)
    }

    async fn list_all_lab_test_types(
        &self,
        ctx: &SecurityContext,
        include_retired: bool,
    ) -> Result<Vec<LabTestType>, CommonLabTestError> {
        self.service
            .list_all_lab_test_types(ctx, include_retired)
            .await
            .map_err(Into::into)
    }

    async fn list_lab_test_types(
        &self,
        ctx: &SecurityContext,
        filter: LabTestTypeFilter,
        include_retired: bool,
    ) -> Result<Vec<LabTestType>, CommonLabTestError> {
        self.service
            .list_lab_test_types(ctx, &filter, include_retired)
            .await
            .map_err(Into::into)
    }

    async fn save_lab_test_type(
        &self,
        ctx: &SecurityContext,
        lab_test_type: LabTestType,
    ) -> Result<LabTestType, CommonLabTestError> {
        self.service
            .save_lab_test_type(ctx, lab_test_type)
            .await
            .map_err(Into::into)
    }

    async fn retire_lab_test_type(
        &self,
        ctx: &SecurityContext,
        lab_test_type: LabTestType,
        reason: &str,
    ) -> Result<LabTestType, CommonLabTestError> {
        self.service
            .retire_lab_test_type(ctx, lab_test_type, reason)
            .await
            .map_err(Into::into)
    }

    async fn unretire_lab_test_type(
        &self,
        ctx: &SecurityContext,
        lab_test_type: LabTestType,
    ) -> Result<LabTestType, CommonLabTestError> {
        self.service
            .unretire_lab_test_type(ctx, lab_test_type)
            .await
            .map_err(Into::into)
    }

    async fn delete_lab_test_type(
        &self,
        ctx: &SecurityContext,
        lab_test_type: &LabTestType,
        cascade: bool,
    ) -> Result<(), CommonLabTestError> {
        self.service
            .delete_lab_test_type(ctx, lab_test_type, cascade)
            .await
            .map_err(Into::into)
    }

    // Attribute types

    async fn get_attribute_type(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTestAttributeType>, CommonLabTestError> {
        self.service
            .get_attribute_type(ctx, id)
            .await
            .map_err(Into::into)
    }

    async fn get_attribute_type_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTestAttributeType>, CommonLabTestError> {
        self.service
            .get_attribute_type_by_uuid(ctx, uuid)
            .await
            .map_err(Into::into)
    }

    async fn list_all_attribute_types(
        &self,
        ctx: &SecurityContext,
        include_retired: bool,
    ) -> Result<Vec<LabTestAttributeType>, CommonLabTestError> {
        self.service
            .list_all_attribute_types(ctx, include_retired)
            .await
            .map_err(Into::into)
    }

    async fn list_attribute_types(
        &self,
        ctx: &SecurityContext,
        filter: AttributeTypeFilter,
        include_retired: bool,
    ) -> Result<Vec<LabTestAttributeType>, CommonLabTestError> {
        self.service
            .list_attribute_types(ctx, &filter, include_retired)
            .await
            .map_err(Into::into)
    }

    async fn save_attribute_type(
        &self,
        ctx: &SecurityContext,
        attribute_type: LabTestAttributeType,
    ) -> Result<LabTestAttributeType, CommonLabTestError> {
        self.service
            .save_attribute_type(ctx, attribute_type)
            .await
            .map_err(Into::into)
    }

    async fn retire_attribute_type(
        &self,
        ctx: &SecurityContext,
        attribute_type: LabTestAttributeType,
        reason: &str,
    ) -> Result<LabTestAttributeType, CommonLabTestError> {
        self.service
            .retire_attribute_type(ctx, attribute_type, reason)
            .await
            .map_err(Into::into)
    }

    async fn unretire_attribute_type(
        &self,
        ctx: &SecurityContext,
        attribute_type: LabTestAttributeType,
    ) -> Result<LabTestAttributeType, CommonLabTestError> {
        self.service
            .unretire_attribute_type(ctx, attribute_type)
            .await
            .map_err(Into::into)
    }

    async fn delete_attribute_type(
        &self,
        ctx: &SecurityContext,
        attribute_type: &LabTestAttributeType,
        cascade: bool,
    ) -> Result<(), CommonLabTestError> {
        self.service
            .delete_attribute_type(ctx, attribute_type, cascade)
            .await
            .map_err(Into::into)
    }

    // Lab tests

    async fn get_lab_test(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTest>, CommonLabTestError> {
        self.service.get_lab_test(ctx, id).await.map_err(Into::into)
    }

    async fn get_lab_test_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTest>, CommonLabTestError> {
        self.service
            .get_lab_test_by_uuid(ctx, uuid)
            .await
            .map_err(Into::into)
    }

    async fn get_lab_test_by_encounter(
        &self,
        ctx: &SecurityContext,
        encounter_id: i32,
    ) -> Result<Option<LabTest>, CommonLabTestError> {
        self.service
            .get_lab_test_by_encounter(ctx, encounter_id)
            .await
            .map_err(Into::into)
    }

    async fn get_lab_test_by_order(
        &self,
        ctx: &SecurityContext,
        order_id: i32,
    ) -> Result<Option<LabTest>, CommonLabTestError> {
        self.service
            .get_lab_test_by_order(ctx, order_id)
            .await
            .map_err(Into::into)
    }

    async fn list_lab_tests(
        &self,
        ctx: &SecurityContext,
        filter: LabTestFilter,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, CommonLabTestError> {
        self.service
            .list_lab_tests(ctx, &filter, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn list_lab_tests_by_type(
        &self,
        ctx: &SecurityContext,
        lab_test_type_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, CommonLabTestError> {
        self.service
            .list_lab_tests_by_type(ctx, lab_test_type_id, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn list_lab_tests_by_concept(
        &self,
        ctx: &SecurityContext,
        order_concept_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, CommonLabTestError> {
        self.service
            .list_lab_tests_by_concept(ctx, order_concept_id, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn list_lab_tests_by_orderer(
        &self,
        ctx: &SecurityContext,
        orderer_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, CommonLabTestError> {
        self.service
            .list_lab_tests_by_orderer(ctx, orderer_id, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn list_lab_tests_by_patient(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, CommonLabTestError> {
        self.service
            .list_lab_tests_by_patient(ctx, patient_id, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn search_lab_tests_by_reference(
        &self,
        ctx: &SecurityContext,
        reference_number: &str,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, CommonLabTestError> {
        self.service
            .search_lab_tests_by_reference(ctx, reference_number, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn get_earliest_lab_test(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
    ) -> Result<Option<LabTest>, CommonLabTestError> {
        self.service
            .get_earliest_lab_test(ctx, patient_id)
            .await
            .map_err(Into::into)
    }

    async fn get_latest_lab_test(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
    ) -> Result<Option<LabTest>, CommonLabTestError> {
        self.service
            .get_latest_lab_test(ctx, patient_id)
            .await
            .map_err(Into::into)
    }

    async fn save_lab_test(
        &self,
        ctx: &SecurityContext,
        lab_test: LabTest,
    ) -> Result<LabTest, CommonLabTestError> {
        self.service
            .save_lab_test(ctx, lab_test)
            .await
            .map_err(Into::into)
    }

    async fn save_lab_test_with_sample(
        &self,
        ctx: &SecurityContext,
        lab_test: LabTest,
        sample: LabTestSample,
        attributes: Vec<LabTestAttribute>,
    ) -> Result<LabTest, CommonLabTestError> {
        self.service
            .save_lab_test_with_sample(ctx, lab_test, sample, attributes)
            .await
            .map_err(Into::into)
    }

    async fn void_lab_test(
        &self,
        ctx: &SecurityContext,
        lab_test: LabTest,
        reason: &str,
    ) -> Result<LabTest, CommonLabTestError> {
        self.service
            .void_lab_test(ctx, lab_test, reason)
            .await
            .map_err(Into::into)
    }

    async fn unvoid_lab_test(
        &self,
        ctx: &SecurityContext,
        lab_test: LabTest,
    ) -> Result<LabTest, CommonLabTestError> {
        self.service
            .unvoid_lab_test(ctx, lab_test)
            .await
            .map_err(Into::into)
    }

    async fn delete_lab_test(
        &self,
        ctx: &SecurityContext,
        lab_test: &LabTest,
    ) -> Result<(), CommonLabTestError> {
        self.service
            .delete_lab_test(ctx, lab_test)
            .await
            .map_err(Into::into)
    }

    // Samples

    async fn get_sample(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTestSample>, CommonLabTestError> {
        self.service.get_sample(ctx, id).await.map_err(Into::into)
    }

    async fn get_sample_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTestSample>, CommonLabTestError> {
        self.service
            .get_sample_by_uuid(ctx, uuid)
            .await
            .map_err(Into::into)
    }

    async fn list_samples(
        &self,
        ctx: &SecurityContext,
        filter: SampleFilter,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, CommonLabTestError> {
        self.service
            .list_samples(ctx, &filter, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn list_samples_by_identifiers(
        &self,
        ctx: &SecurityContext,
        sample_identifier: Option<String>,
        order_number: Option<String>,
        reference_number: Option<String>,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, CommonLabTestError> {
        self.service
            .list_samples_by_identifiers(
                ctx,
                sample_identifier,
                order_number,
                reference_number,
                include_voided,
            )
            .await
            .map_err(Into::into)
    }

    async fn list_samples_by_lab_test(
        &self,
        ctx: &SecurityContext,
        lab_test_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, CommonLabTestError> {
        self.service
            .list_samples_by_lab_test(ctx, lab_test_id, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn list_samples_by_collector(
        &self,
        ctx: &SecurityContext,
        collector_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, CommonLabTestError> {
        self.service
            .list_samples_by_collector(ctx, collector_id, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn list_samples_by_order(
        &self,
        ctx: &SecurityContext,
        order_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, CommonLabTestError> {
        self.service
            .list_samples_by_order(ctx, order_id, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn list_samples_by_status(
        &self,
        ctx: &SecurityContext,
        status: LabTestSampleStatus,
        from: Option<OffsetDateTime>,
        to: Option<OffsetDateTime>,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, CommonLabTestError> {
        self.service
            .list_samples_by_status(ctx, status, from, to, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn get_earliest_sample(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        status: Option<LabTestSampleStatus>,
    ) -> Result<Option<LabTestSample>, CommonLabTestError> {
        self.service
            .get_earliest_sample(ctx, patient_id, status)
            .await
            .map_err(Into::into)
    }

    async fn get_latest_sample(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        status: Option<LabTestSampleStatus>,
    ) -> Result<Option<LabTestSample>, CommonLabTestError> {
        self.service
            .get_latest_sample(ctx, patient_id, status)
            .await
            .map_err(Into::into)
    }

    async fn save_sample(
        &self,
        ctx: &SecurityContext,
        sample: LabTestSample,
    ) -> Result<LabTestSample, CommonLabTestError> {
        self.service
            .save_sample(ctx, sample)
            .await
            .map_err(Into::into)
    }

    async fn void_sample(
        &self,
        ctx: &SecurityContext,
        sample: LabTestSample,
        reason: &str,
    ) -> Result<LabTestSample, CommonLabTestError> {
        self.service
            .void_sample(ctx, sample, reason)
            .await
            .map_err(Into::into)
    }

    async fn unvoid_sample(
        &self,
        ctx: &SecurityContext,
        sample: LabTestSample,
    ) -> Result<LabTestSample, CommonLabTestError> {
        self.service
            .unvoid_sample(ctx, sample)
            .await
            .map_err(Into::into)
    }

    async fn delete_sample(
        &self,
        ctx: &SecurityContext,
        sample: &LabTestSample,
    ) -> Result<(), CommonLabTestError> {
        self.service
            .delete_sample(ctx, sample)
            .await
            .map_err(Into::into)
    }

    // Attributes

    async fn get_attribute(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTestAttribute>, CommonLabTestError> {
        self.service
            .get_attribute(ctx, id)
            .await
            .map_err(Into::into)
    }

    async fn get_attribute_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTestAttribute>, CommonLabTestError> {
        self.service
            .get_attribute_by_uuid(ctx, uuid)
            .await
            .map_err(Into::into)
    }

    async fn list_attributes(
        &self,
        ctx: &SecurityContext,
        filter: AttributeFilter,
        include_voided: bool,
    ) -> Result<Vec<LabTestAttribute>, CommonLabTestError> {
        self.service
            .list_attributes(ctx, &filter, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn list_attributes_by_type(
        &self,
        ctx: &SecurityContext,
        attribute_type_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestAttribute>, CommonLabTestError> {
        self.service
            .list_attributes_by_type(ctx, attribute_type_id, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn list_attributes_by_patient(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestAttribute>, CommonLabTestError> {
        self.service
            .list_attributes_by_patient(ctx, patient_id, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn list_attributes_by_patient_and_type(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        attribute_type_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestAttribute>, CommonLabTestError> {
        self.service
            .list_attributes_by_patient_and_type(ctx, patient_id, attribute_type_id, include_voided)
            .await
            .map_err(Into::into)
    }

    async fn save_attribute(
        &self,
        ctx: &SecurityContext,
        attribute: LabTestAttribute,
    ) -> Result<LabTestAttribute, CommonLabTestError> {
        self.service
            .save_attribute(ctx, attribute)
            .await
            .map_err(Into::into)
    }

    async fn save_attributes(
        &self,
        ctx: &SecurityContext,
        attributes: Vec<LabTestAttribute>,
    ) -> Result<Vec<LabTestAttribute>, CommonLabTestError> {
        self.service
            .save_attributes(ctx, attributes)
            .await
            .map_err(Into::into)
    }

    async fn void_attribute(
        &self,
        ctx: &SecurityContext,
        attribute: LabTestAttribute,
        reason: &str,
    ) -> Result<LabTestAttribute, CommonLabTestError> {
        self.service
            .void_attribute(ctx, attribute, reason)
            .await
            .map_err(Into::into)
    }

    async fn unvoid_attribute(
        &self,
        ctx: &SecurityContext,
        attribute: LabTestAttribute,
    ) -> Result<LabTestAttribute, CommonLabTestError> {
        self.service
            .unvoid_attribute(ctx, attribute)
            .await
            .map_err(Into::into)
    }

    async fn delete_attribute(
        &self,
        ctx: &SecurityContext,
        attribute: &LabTestAttribute,
    ) -> Result<(), CommonLabTestError> {
        self.service
            .delete_attribute(ctx, attribute)
            .await
            .map_err(Into::into)
    }
}
