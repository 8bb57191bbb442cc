//! Filters accepted by the list operations.
//!
//! Every field is optional and all set fields are ANDed. Date ranges are
//! inclusive on both ends. `Default` leaves every field unset.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{LabTestGroup, LabTestSampleStatus};

/// Sort direction for limited queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabTestTypeFilter {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub test_group: Option<LabTestGroup>,
    /// Tri-state: `None` keeps every candidate.
    pub requires_specimen: Option<bool>,
    pub reference_concept_id: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeTypeFilter {
    pub name: Option<String>,
    pub datatype_classname: Option<String>,
    pub lab_test_type_id: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabTestFilter {
    pub lab_test_type_id: Option<i32>,
    pub patient_id: Option<i32>,
    pub sample_id: Option<i32>,
    pub order_number: Option<String>,
    pub reference_number: Option<String>,
    pub order_concept_id: Option<i32>,
    pub orderer_id: Option<i32>,
    pub encounter_id: Option<i32>,
    pub order_id: Option<i32>,
    /// Lower bound on the date the test was created.
    pub from: Option<OffsetDateTime>,
    pub to: Option<OffsetDateTime>,
}

impl LabTestFilter {
    #[must_use]
    pub fn for_patient(patient_id: i32) -> Self {
        Self {
            patient_id: Some(patient_id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn for_lab_test_type(lab_test_type_id: i32) -> Self {
        Self {
            lab_test_type_id: Some(lab_test_type_id),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleFilter {
    pub lab_test_id: Option<i32>,
    pub patient_id: Option<i32>,
    pub status: Option<LabTestSampleStatus>,
    pub sample_identifier: Option<String>,
    /// Matched against the order of the sample's lab test.
    pub order_id: Option<i32>,
    /// Matched against the order number of the sample's lab test.
    pub order_number: Option<String>,
    /// Matched against the reference number of the sample's lab test.
    pub reference_number: Option<String>,
    pub specimen_name: Option<String>,
    pub collector_id: Option<i32>,
    /// Lower bound on the collection date.
    pub from: Option<OffsetDateTime>,
    pub to: Option<OffsetDateTime>,
}

impl SampleFilter {
    #[must_use]
    pub fn for_patient(patient_id: i32) -> Self {
        Self {
            patient_id: Some(patient_id),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFilter {
    pub attribute_type_id: Option<i32>,
    pub lab_test_id: Option<i32>,
    /// Matched against the patient of the owning lab test.
    pub patient_id: Option<i32>,
    pub value_reference: Option<String>,
    pub from: Option<OffsetDateTime>,
    pub to: Option<OffsetDateTime>,
}
