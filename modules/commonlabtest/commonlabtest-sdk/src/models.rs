//! Public models for the commonlabtest module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the commonlabtest module and its consumers. Patients, encounters,
//! orders, concepts and providers belong to the host platform and are
//! referenced by their integer ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Who soft-deleted a record, when, and why.
///
/// Metadata is *retired*, transactional data is *voided*; both use this block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deactivation {
    pub by: Uuid,
    pub at: OffsetDateTime,
    pub reason: String,
}

/// Creation and change bookkeeping. Unset fields are filled in on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub creator: Option<Uuid>,
    pub date_created: Option<OffsetDateTime>,
    pub changed_by: Option<Uuid>,
    pub date_changed: Option<OffsetDateTime>,
}

/// Capabilities shared by every entity of the module.
pub trait LabRecord {
    /// Human readable entity name, used in logs and error messages.
    const KIND: &'static str;

    /// Surrogate id, `None` until the record is persisted.
    fn id(&self) -> Option<i32>;

    fn uuid(&self) -> Uuid;

    fn set_uuid(&mut self, uuid: Uuid);

    fn audit(&self) -> &Audit;

    fn audit_mut(&mut self) -> &mut Audit;

    /// Retirement (metadata) or voiding (data) state.
    fn deactivation(&self) -> Option<&Deactivation>;

    fn set_deactivation(&mut self, state: Option<Deactivation>);

    fn is_active(&self) -> bool {
        self.deactivation().is_none()
    }
}

macro_rules! lab_record {
    ($ty:ty, $kind:literal, $state:ident) => {
        impl LabRecord for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> Option<i32> {
                self.id
            }

            fn uuid(&self) -> Uuid {
                self.uuid
            }

            fn set_uuid(&mut self, uuid: Uuid) {
                self.uuid = uuid;
            }

            fn audit(&self) -> &Audit {
                &self.audit
            }

            fn audit_mut(&mut self) -> &mut Audit {
                &mut self.audit
            }

            fn deactivation(&self) -> Option<&Deactivation> {
                self.$state.as_ref()
            }

            fn set_deactivation(&mut self, state: Option<Deactivation>) {
                self.$state = state;
            }
        }
    };
}

/// Department a lab test type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabTestGroup {
    Serology,
    Cardiology,
    Ophthalmology,
    Bacteriology,
    Biochemistry,
    BloodBank,
    Cytology,
    Hematology,
    Immunology,
    Microbiology,
    Radiology,
    Sonology,
    Urinalysis,
    Other,
}

impl LabTestGroup {
    pub const ALL: [Self; 14] = [
        Self::Serology,
        Self::Cardiology,
        Self::Ophthalmology,
        Self::Bacteriology,
        Self::Biochemistry,
        Self::BloodBank,
        Self::Cytology,
        Self::Hematology,
        Self::Immunology,
        Self::Microbiology,
        Self::Radiology,
        Self::Sonology,
        Self::Urinalysis,
        Self::Other,
    ];

    /// Storage code of the group.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Serology => "SEROLOGY",
            Self::Cardiology => "CARDIOLOGY",
            Self::Ophthalmology => "OPHTHALMOLOGY",
            Self::Bacteriology => "BACTERIOLOGY",
            Self::Biochemistry => "BIOCHEMISTRY",
            Self::BloodBank => "BLOOD_BANK",
            Self::Cytology => "CYTOLOGY",
            Self::Hematology => "HEMATOLOGY",
            Self::Immunology => "IMMUNOLOGY",
            Self::Microbiology => "MICROBIOLOGY",
            Self::Radiology => "RADIOLOGY",
            Self::Sonology => "SONOLOGY",
            Self::Urinalysis => "URINALYSIS",
            Self::Other => "OTHER",
        }
    }

    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == code)
    }
}

impl fmt::Display for LabTestGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a specimen is in its handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabTestSampleStatus {
    Collected,
    Received,
    Accepted,
    Rejected,
    Processed,
    Expired,
}

impl LabTestSampleStatus {
    pub const ALL: [Self; 6] = [
        Self::Collected,
        Self::Received,
        Self::Accepted,
        Self::Rejected,
        Self::Processed,
        Self::Expired,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Collected => "COLLECTED",
            Self::Received => "RECEIVED",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Processed => "PROCESSED",
            Self::Expired => "EXPIRED",
        }
    }

    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == code)
    }
}

impl fmt::Display for LabTestSampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A kind of orderable lab test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabTestType {
    pub id: Option<i32>,
    pub uuid: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    pub description: Option<String>,
    pub test_group: LabTestGroup,
    pub requires_specimen: bool,
    /// Concept mapping the test type to a clinical coding system.
    pub reference_concept_id: Option<i32>,
    pub audit: Audit,
    pub retired: Option<Deactivation>,
}

impl LabTestType {
    #[must_use]
    pub fn new(name: impl Into<String>, test_group: LabTestGroup, requires_specimen: bool) -> Self {
        Self {
            id: None,
            uuid: Uuid::new_v4(),
            name: name.into(),
            short_name: None,
            description: None,
            test_group,
            requires_specimen,
            reference_concept_id: None,
            audit: Audit::default(),
            retired: None,
        }
    }

    #[must_use]
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    #[must_use]
    pub fn with_reference_concept(mut self, concept_id: i32) -> Self {
        self.reference_concept_id = Some(concept_id);
        self
    }
}

lab_record!(LabTestType, "LabTestType", retired);

/// Definition of a custom field attachable to a lab test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabTestAttributeType {
    pub id: Option<i32>,
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub lab_test_type_id: Option<i32>,
    /// Datatype that validates and serializes the attribute values.
    pub datatype_classname: String,
    pub datatype_config: Option<String>,
    pub preferred_handler_classname: Option<String>,
    pub handler_config: Option<String>,
    pub min_occurs: i32,
    pub max_occurs: Option<i32>,
    pub sort_weight: Option<f64>,
    pub group_name: Option<String>,
    pub audit: Audit,
    pub retired: Option<Deactivation>,
}

impl LabTestAttributeType {
    #[must_use]
    pub fn new(name: impl Into<String>, datatype_classname: impl Into<String>) -> Self {
        Self {
            id: None,
            uuid: Uuid::new_v4(),
            name: name.into(),
            description: None,
            lab_test_type_id: None,
            datatype_classname: datatype_classname.into(),
            datatype_config: None,
            preferred_handler_classname: None,
            handler_config: None,
            min_occurs: 0,
            max_occurs: None,
            sort_weight: None,
            group_name: None,
            audit: Audit::default(),
            retired: None,
        }
    }

    #[must_use]
    pub fn for_lab_test_type(mut self, lab_test_type_id: i32) -> Self {
        self.lab_test_type_id = Some(lab_test_type_id);
        self
    }
}

lab_record!(LabTestAttributeType, "LabTestAttributeType", retired);

/// One ordered lab test for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabTest {
    pub id: Option<i32>,
    pub uuid: Uuid,
    pub order_id: i32,
    pub order_number: Option<String>,
    pub patient_id: i32,
    pub encounter_id: Option<i32>,
    pub order_concept_id: Option<i32>,
    pub orderer_id: Option<i32>,
    pub lab_test_type_id: i32,
    pub lab_reference_number: Option<String>,
    pub lab_instructions: Option<String>,
    pub result_comments: Option<String>,
    /// Attribute values recorded for this test.
    ///
    /// Filled by the composite save; plain lookups leave it empty.
    pub attributes: Vec<LabTestAttribute>,
    pub audit: Audit,
    pub voided: Option<Deactivation>,
}

impl LabTest {
    #[must_use]
    pub fn new(order_id: i32, patient_id: i32, lab_test_type_id: i32) -> Self {
        Self {
            id: None,
            uuid: Uuid::new_v4(),
            order_id,
            order_number: None,
            patient_id,
            encounter_id: None,
            order_concept_id: None,
            orderer_id: None,
            lab_test_type_id,
            lab_reference_number: None,
            lab_instructions: None,
            result_comments: None,
            attributes: Vec::new(),
            audit: Audit::default(),
            voided: None,
        }
    }

    #[must_use]
    pub fn with_reference_number(mut self, reference: impl Into<String>) -> Self {
        self.lab_reference_number = Some(reference.into());
        self
    }

    #[must_use]
    pub fn created_at(mut self, at: OffsetDateTime) -> Self {
        self.audit.date_created = Some(at);
        self
    }
}

lab_record!(LabTest, "LabTest", voided);

/// A physical specimen collected for lab testing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabTestSample {
    pub id: Option<i32>,
    pub uuid: Uuid,
    pub lab_test_id: Option<i32>,
    pub patient_id: i32,
    pub lab_sample_identifier: Option<String>,
    pub status: LabTestSampleStatus,
    pub specimen_name: Option<String>,
    pub specimen_site: Option<String>,
    pub collector_id: Option<i32>,
    pub collection_date: OffsetDateTime,
    pub received_date: Option<OffsetDateTime>,
    pub comments: Option<String>,
    pub audit: Audit,
    pub voided: Option<Deactivation>,
}

impl LabTestSample {
    #[must_use]
    pub fn new(
        patient_id: i32,
        status: LabTestSampleStatus,
        collection_date: OffsetDateTime,
    ) -> Self {
        Self {
            id: None,
            uuid: Uuid::new_v4(),
            lab_test_id: None,
            patient_id,
            lab_sample_identifier: None,
            status,
            specimen_name: None,
            specimen_site: None,
            collector_id: None,
            collection_date,
            received_date: None,
            comments: None,
            audit: Audit::default(),
            voided: None,
        }
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.lab_sample_identifier = Some(identifier.into());
        self
    }
}

lab_record!(LabTestSample, "LabTestSample", voided);

/// A typed value attached to a lab test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabTestAttribute {
    pub id: Option<i32>,
    pub uuid: Uuid,
    /// Owning lab test; linked on save when missing.
    pub lab_test_id: Option<i32>,
    pub attribute_type_id: i32,
    /// Serialized value, validated by the attribute type's datatype.
    pub value_reference: String,
    pub audit: Audit,
    pub voided: Option<Deactivation>,
}

impl LabTestAttribute {
    #[must_use]
    pub fn new(attribute_type_id: i32, value_reference: impl Into<String>) -> Self {
        Self {
            id: None,
            uuid: Uuid::new_v4(),
            lab_test_id: None,
            attribute_type_id,
            value_reference: value_reference.into(),
            audit: Audit::default(),
            voided: None,
        }
    }

    #[must_use]
    pub fn for_lab_test(mut self, lab_test_id: i32) -> Self {
        self.lab_test_id = Some(lab_test_id);
        self
    }
}

lab_record!(LabTestAttribute, "LabTestAttribute", voided);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_codes_round_trip() {
        for group in LabTestGroup::ALL {
            assert_eq!(LabTestGroup::parse(group.as_str()), Some(group));
        }
        assert_eq!(LabTestGroup::parse("blood_bank"), None);
    }

    #[test]
    fn status_serializes_as_storage_code() {
        let json = serde_json::to_string(&LabTestSampleStatus::Received).unwrap();
        assert_eq!(json, "\"RECEIVED\"");
    }

    #[test]
    fn deactivation_drives_is_active() {
        let mut test_type = LabTestType::new("GeneXpert", LabTestGroup::Bacteriology, true);
        assert!(test_type.is_active());

        test_type.set_deactivation(Some(Deactivation {
            by: Uuid::new_v4(),
            at: OffsetDateTime::UNIX_EPOCH,
            reason: "replaced".to_owned(),
        }));
        assert!(!test_type.is_active());
        assert_eq!(
            test_type.deactivation().map(|d| d.reason.as_str()),
            Some("replaced")
        );
    }
}
