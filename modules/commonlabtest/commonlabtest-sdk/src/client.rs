use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::CommonLabTestError;
use crate::models::{
    LabTest, LabTestAttribute, LabTestAttributeType, LabTestSample, LabTestSampleStatus,
    LabTestType,
};
use crate::query::{
    AttributeFilter, AttributeTypeFilter, LabTestFilter, LabTestTypeFilter, SampleFilter,
};
use crate::security::SecurityContext;

/// Public API trait for the commonlabtest module that other modules can use.
///
/// Every call carries the caller's `SecurityContext`; the required privilege
/// is checked before anything touches storage. Lookups return `Ok(None)` when
/// the record does not exist.
#[async_trait]
pub trait CommonLabTestClientV1: Send + Sync {
    // Lab test types

    async fn get_lab_test_type(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTestType>, CommonLabTestError>;

    async fn get_lab_test_type_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTestType>, CommonLabTestError>;

    async fn list_all_lab_test_types(
        &self,
        ctx: &SecurityContext,
        include_retired: bool,
    ) -> Result<Vec<LabTestType>, CommonLabTestError>;

    async fn list_lab_test_types(
        &self,
        ctx: &SecurityContext,
        filter: LabTestTypeFilter,
        include_retired: bool,
    ) -> Result<Vec<LabTestType>, CommonLabTestError>;

    async fn save_lab_test_type(
        &self,
        ctx: &SecurityContext,
        lab_test_type: LabTestType,
    ) -> Result<LabTestType, CommonLabTestError>;

    async fn retire_lab_test_type(
        &self,
        ctx: &SecurityContext,
        lab_test_type: LabTestType,
        reason: &str,
    ) -> Result<LabTestType, CommonLabTestError>;

    async fn unretire_lab_test_type(
        &self,
        ctx: &SecurityContext,
        lab_test_type: LabTestType,
    ) -> Result<LabTestType, CommonLabTestError>;

    /// Purges the type. With `cascade`, its lab tests (and their samples and
    /// attributes) are purged first.
    async fn delete_lab_test_type(
        &self,
        ctx: &SecurityContext,
        lab_test_type: &LabTestType,
        cascade: bool,
    ) -> Result<(), CommonLabTestError>;

    /// Purges the type alone; storage rejects it while lab tests still use it.
    async fn delete_lab_test_type_only(
        &self,
        ctx: &SecurityContext,
        lab_test_type: &LabTestType,
    ) -> Result<(), CommonLabTestError> {
        self.delete_lab_test_type(ctx, lab_test_type, false).await
    }

    // Attribute types

    async fn get_attribute_type(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTestAttributeType>, CommonLabTestError>;

    async fn get_attribute_type_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTestAttributeType>, CommonLabTestError>;

    async fn list_all_attribute_types(
        &self,
        ctx: &SecurityContext,
        include_retired: bool,
    ) -> Result<Vec<LabTestAttributeType>, CommonLabTestError>;

    async fn list_attribute_types(
        &self,
        ctx: &SecurityContext,
        filter: AttributeTypeFilter,
        include_retired: bool,
    ) -> Result<Vec<LabTestAttributeType>, CommonLabTestError>;

    async fn save_attribute_type(
        &self,
        ctx: &SecurityContext,
        attribute_type: LabTestAttributeType,
    ) -> Result<LabTestAttributeType, CommonLabTestError>;

    async fn retire_attribute_type(
        &self,
        ctx: &SecurityContext,
        attribute_type: LabTestAttributeType,
        reason: &str,
    ) -> Result<LabTestAttributeType, CommonLabTestError>;

    async fn unretire_attribute_type(
        &self,
        ctx: &SecurityContext,
        attribute_type: LabTestAttributeType,
    ) -> Result<LabTestAttributeType, CommonLabTestError>;

    /// Purges the attribute type. With `cascade`, its attributes are purged first.
    async fn delete_attribute_type(
        &self,
        ctx: &SecurityContext,
        attribute_type: &LabTestAttributeType,
        cascade: bool,
    ) -> Result<(), CommonLabTestError>;

    async fn delete_attribute_type_only(
        &self,
        ctx: &SecurityContext,
        attribute_type: &LabTestAttributeType,
    ) -> Result<(), CommonLabTestError> {
        self.delete_attribute_type(ctx, attribute_type, false).await
    }

    // Lab tests
    //
    // Lab tests are returned with every attribute they own, voided ones included.

    async fn get_lab_test(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTest>, CommonLabTestError>;

    async fn get_lab_test_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTest>, CommonLabTestError>;

    async fn get_lab_test_by_encounter(
        &self,
        ctx: &SecurityContext,
        encounter_id: i32,
    ) -> Result<Option<LabTest>, CommonLabTestError>;

    async fn get_lab_test_by_order(
        &self,
        ctx: &SecurityContext,
        order_id: i32,
    ) -> Result<Option<LabTest>, CommonLabTestError>;

    async fn list_lab_tests(
        &self,
        ctx: &SecurityContext,
        filter: LabTestFilter,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, CommonLabTestError>;

    async fn list_lab_tests_by_type(
        &self,
        ctx: &SecurityContext,
        lab_test_type_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, CommonLabTestError>;

    async fn list_lab_tests_by_concept(
        &self,
        ctx: &SecurityContext,
        order_concept_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, CommonLabTestError>;

    async fn list_lab_tests_by_orderer(
        &self,
        ctx: &SecurityContext,
        orderer_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, CommonLabTestError>;

    async fn list_lab_tests_by_patient(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, CommonLabTestError>;

    /// Rejects references shorter than the configured minimum.
    async fn search_lab_tests_by_reference(
        &self,
        ctx: &SecurityContext,
        reference_number: &str,
        include_voided: bool,
    ) -> Result<Vec<LabTest>, CommonLabTestError>;

    async fn get_earliest_lab_test(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
    ) -> Result<Option<LabTest>, CommonLabTestError>;

    async fn get_latest_lab_test(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
    ) -> Result<Option<LabTest>, CommonLabTestError>;

    /// Saves the lab test and the attributes it carries.
    async fn save_lab_test(
        &self,
        ctx: &SecurityContext,
        lab_test: LabTest,
    ) -> Result<LabTest, CommonLabTestError>;

    /// Saves the test, its sample and its attributes in one unit of work.
    ///
    /// The returned test carries the saved attributes.
    async fn save_lab_test_with_sample(
        &self,
        ctx: &SecurityContext,
        lab_test: LabTest,
        sample: LabTestSample,
        attributes: Vec<LabTestAttribute>,
    ) -> Result<LabTest, CommonLabTestError>;

    /// Voids the test together with its active attributes.
    async fn void_lab_test(
        &self,
        ctx: &SecurityContext,
        lab_test: LabTest,
        reason: &str,
    ) -> Result<LabTest, CommonLabTestError>;

    async fn unvoid_lab_test(
        &self,
        ctx: &SecurityContext,
        lab_test: LabTest,
    ) -> Result<LabTest, CommonLabTestError>;

    /// Purges the lab test with its samples and attributes.
    async fn delete_lab_test(
        &self,
        ctx: &SecurityContext,
        lab_test: &LabTest,
    ) -> Result<(), CommonLabTestError>;

    // Samples

    async fn get_sample(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTestSample>, CommonLabTestError>;

    async fn get_sample_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTestSample>, CommonLabTestError>;

    async fn list_samples(
        &self,
        ctx: &SecurityContext,
        filter: SampleFilter,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, CommonLabTestError>;

    async fn list_samples_by_identifiers(
        &self,
        ctx: &SecurityContext,
        sample_identifier: Option<String>,
        order_number: Option<String>,
        reference_number: Option<String>,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, CommonLabTestError>;

    async fn list_samples_by_lab_test(
        &self,
        ctx: &SecurityContext,
        lab_test_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, CommonLabTestError>;

    async fn list_samples_by_collector(
        &self,
        ctx: &SecurityContext,
        collector_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, CommonLabTestError>;

    async fn list_samples_by_order(
        &self,
        ctx: &SecurityContext,
        order_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, CommonLabTestError>;

    async fn list_samples_by_status(
        &self,
        ctx: &SecurityContext,
        status: LabTestSampleStatus,
        from: Option<OffsetDateTime>,
        to: Option<OffsetDateTime>,
        include_voided: bool,
    ) -> Result<Vec<LabTestSample>, CommonLabTestError>;

    async fn get_earliest_sample(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        status: Option<LabTestSampleStatus>,
    ) -> Result<Option<LabTestSample>, CommonLabTestError>;

    async fn get_latest_sample(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        status: Option<LabTestSampleStatus>,
    ) -> Result<Option<LabTestSample>, CommonLabTestError>;

    async fn save_sample(
        &self,
        ctx: &SecurityContext,
        sample: LabTestSample,
    ) -> Result<LabTestSample, CommonLabTestError>;

    async fn void_sample(
        &self,
        ctx: &SecurityContext,
        sample: LabTestSample,
        reason: &str,
    ) -> Result<LabTestSample, CommonLabTestError>;

    async fn unvoid_sample(
        &self,
        ctx: &SecurityContext,
        sample: LabTestSample,
    ) -> Result<LabTestSample, CommonLabTestError>;

    async fn delete_sample(
        &self,
        ctx: &SecurityContext,
        sample: &LabTestSample,
    ) -> Result<(), CommonLabTestError>;

    // Attributes

    async fn get_attribute(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Option<LabTestAttribute>, CommonLabTestError>;

    async fn get_attribute_by_uuid(
        &self,
        ctx: &SecurityContext,
        uuid: Uuid,
    ) -> Result<Option<LabTestAttribute>, CommonLabTestError>;

    async fn list_attributes(
        &self,
        ctx: &SecurityContext,
        filter: AttributeFilter,
        include_voided: bool,
    ) -> Result<Vec<LabTestAttribute>, CommonLabTestError>;

    async fn list_attributes_by_type(
        &self,
        ctx: &SecurityContext,
        attribute_type_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestAttribute>, CommonLabTestError>;

    async fn list_attributes_by_patient(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestAttribute>, CommonLabTestError>;

    async fn list_attributes_by_patient_and_type(
        &self,
        ctx: &SecurityContext,
        patient_id: i32,
        attribute_type_id: i32,
        include_voided: bool,
    ) -> Result<Vec<LabTestAttribute>, CommonLabTestError>;

    async fn save_attribute(
        &self,
        ctx: &SecurityContext,
        attribute: LabTestAttribute,
    ) -> Result<LabTestAttribute, CommonLabTestError>;

    async fn save_attributes(
        &self,
        ctx: &SecurityContext,
        attributes: Vec<LabTestAttribute>,
    ) -> Result<Vec<LabTestAttribute>, CommonLabTestError>;

    async fn void_attribute(
        &self,
        ctx: &SecurityContext,
        attribute: LabTestAttribute,
        reason: &str,
    ) -> Result<LabTestAttribute, CommonLabTestError>;

    async fn unvoid_attribute(
        &self,
        ctx: &SecurityContext,
        attribute: LabTestAttribute,
    ) -> Result<LabTestAttribute, CommonLabTestError>;

    async fn delete_attribute(
        &self,
        ctx: &SecurityContext,
        attribute: &LabTestAttribute,
    ) -> Result<(), CommonLabTestError>;
}
