use async_trait::async_trait;
use commonlabtest_sdk::{
    AttributeFilter, AttributeTypeFilter, LabTest, LabTestAttribute, LabTestAttributeType,
    LabTestFilter, LabTestSample, LabTestType, LabTestTypeFilter, SampleFilter, SortOrder,
};
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Persistence port for every entity of the module.
///
/// Each method runs on the connection or transaction it is handed, so a
/// service operation can chain several calls inside one unit of work. Lists
/// are ordered by ascending id. Inactive (retired or voided) rows are only
/// returned when `include_inactive` is set. Lab tests are returned with every
/// attribute they own, voided ones included.
#[async_trait]
pub trait CommonLabTestRepository: Send + Sync {
    // Lab test types

    async fn find_lab_test_type<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<Option<LabTestType>, DomainError>;

    async fn find_lab_test_type_by_uuid<C: ConnectionTrait>(
        &self,
        runner: &C,
        uuid: Uuid,
    ) -> Result<Option<LabTestType>, DomainError>;

    /// Matches every filter field except `requires_specimen`.
    async fn list_lab_test_types<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &LabTestTypeFilter,
        include_inactive: bool,
    ) -> Result<Vec<LabTestType>, DomainError>;

    /// Inserts when the id is unset, updates otherwise.
    async fn save_lab_test_type<C: ConnectionTrait>(
        &self,
        runner: &C,
        lab_test_type: LabTestType,
    ) -> Result<LabTestType, DomainError>;

    async fn purge_lab_test_type<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<(), DomainError>;

    // Attribute types

    async fn find_attribute_type<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<Option<LabTestAttributeType>, DomainError>;

    async fn find_attribute_type_by_uuid<C: ConnectionTrait>(
        &self,
        runner: &C,
        uuid: Uuid,
    ) -> Result<Option<LabTestAttributeType>, DomainError>;

    async fn list_attribute_types<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &AttributeTypeFilter,
        include_inactive: bool,
    ) -> Result<Vec<LabTestAttributeType>, DomainError>;

    async fn save_attribute_type<C: ConnectionTrait>(
        &self,
        runner: &C,
        attribute_type: LabTestAttributeType,
    ) -> Result<LabTestAttributeType, DomainError>;

    async fn purge_attribute_type<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<(), DomainError>;

    // Lab tests

    async fn find_lab_test<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<Option<LabTest>, DomainError>;

    async fn find_lab_test_by_uuid<C: ConnectionTrait>(
        &self,
        runner: &C,
        uuid: Uuid,
    ) -> Result<Option<LabTest>, DomainError>;

    async fn list_lab_tests<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &LabTestFilter,
        include_inactive: bool,
    ) -> Result<Vec<LabTest>, DomainError>;

    /// Active lab tests matching `filter`, ordered by creation date.
    async fn find_lab_tests_limited<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &LabTestFilter,
        limit: u64,
        order: SortOrder,
    ) -> Result<Vec<LabTest>, DomainError>;

    /// Writes the lab test row only. The returned test carries no attributes.
    async fn save_lab_test<C: ConnectionTrait>(
        &self,
        runner: &C,
        lab_test: LabTest,
    ) -> Result<LabTest, DomainError>;

    /// Removes the lab test together with the attributes and samples it owns.
    async fn purge_lab_test<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<(), DomainError>;

    // Samples

    async fn find_sample<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<Option<LabTestSample>, DomainError>;

    async fn find_sample_by_uuid<C: ConnectionTrait>(
        &self,
        runner: &C,
        uuid: Uuid,
    ) -> Result<Option<LabTestSample>, DomainError>;

    async fn list_samples<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &SampleFilter,
        include_inactive: bool,
    ) -> Result<Vec<LabTestSample>, DomainError>;

    /// Active samples matching `filter`, ordered by collection date.
    async fn find_samples_limited<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &SampleFilter,
        limit: u64,
        order: SortOrder,
    ) -> Result<Vec<LabTestSample>, DomainError>;

    async fn save_sample<C: ConnectionTrait>(
        &self,
        runner: &C,
        sample: LabTestSample,
    ) -> Result<LabTestSample, DomainError>;

    async fn purge_sample<C: ConnectionTrait>(&self, runner: &C, id: i32)
    -> Result<(), DomainError>;

    // Attributes

    async fn find_attribute<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<Option<LabTestAttribute>, DomainError>;

    async fn find_attribute_by_uuid<C: ConnectionTrait>(
        &self,
        runner: &C,
        uuid: Uuid,
    ) -> Result<Option<LabTestAttribute>, DomainError>;

    async fn list_attributes<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &AttributeFilter,
        include_inactive: bool,
    ) -> Result<Vec<LabTestAttribute>, DomainError>;

    async fn save_attribute<C: ConnectionTrait>(
        &self,
        runner: &C,
        attribute: LabTestAttribute,
    ) -> Result<LabTestAttribute, DomainError>;

    async fn purge_attribute<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<(), DomainError>;
}
