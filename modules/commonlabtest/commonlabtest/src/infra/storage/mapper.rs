//! Conversions between `SeaORM` rows and SDK models.
//!
//! Rows carry the soft-delete state as a flag plus user, date and reason
//! columns; models carry it as `Option<Deactivation>`. Timestamps are written
//! at offset zero.

use commonlabtest_sdk::{
    Audit, Deactivation, LabTest, LabTestAttribute, LabTestAttributeType, LabTestGroup,
    LabTestSample, LabTestSampleStatus, LabTestType,
};
use sea_orm::ActiveValue::{NotSet, Set};
use time::OffsetDateTime;
use uuid::Uuid;

use super::db::utc;
use super::entity::{
    lab_test, lab_test_attribute, lab_test_attribute_type, lab_test_sample, lab_test_type,
};
use crate::domain::error::DomainError;

fn deactivation(
    flag: bool,
    by: Option<Uuid>,
    at: Option<OffsetDateTime>,
    reason: Option<String>,
) -> Option<Deactivation> {
    flag.then(|| Deactivation {
        by: by.unwrap_or_default(),
        at: at.unwrap_or(OffsetDateTime::UNIX_EPOCH),
        reason: reason.unwrap_or_default(),
    })
}

struct DeactivationColumns {
    flag: bool,
    by: Option<Uuid>,
    at: Option<OffsetDateTime>,
    reason: Option<String>,
}

impl From<Option<&Deactivation>> for DeactivationColumns {
    fn from(state: Option<&Deactivation>) -> Self {
        match state {
            Some(d) => Self {
                flag: true,
                by: Some(d.by),
                at: Some(utc(d.at)),
                reason: Some(d.reason.clone()),
            },
            None => Self {
                flag: false,
                by: None,
                at: None,
                reason: None,
            },
        }
    }
}

fn id_value(id: Option<i32>) -> sea_orm::ActiveValue<i32> {
    id.map_or(NotSet, Set)
}

impl TryFrom<lab_test_type::Model> for LabTestType {
    type Error = DomainError;

    fn try_from(m: lab_test_type::Model) -> Result<Self, Self::Error> {
        let test_group = LabTestGroup::parse(&m.test_group).ok_or_else(|| {
            DomainError::database(format!("unknown lab test group '{}'", m.test_group))
        })?;
        Ok(Self {
            id: Some(m.id),
            uuid: m.uuid,
            name: m.name,
            short_name: m.short_name,
            description: m.description,
            test_group,
            requires_specimen: m.requires_specimen,
            reference_concept_id: m.reference_concept_id,
            audit: Audit {
                creator: m.creator,
                date_created: m.date_created,
                changed_by: m.changed_by,
                date_changed: m.date_changed,
            },
            retired: deactivation(m.retired, m.retired_by, m.date_retired, m.retire_reason),
        })
    }
}

impl From<&LabTestType> for lab_test_type::ActiveModel {
    fn from(t: &LabTestType) -> Self {
        let retired = DeactivationColumns::from(t.retired.as_ref());
        Self {
            id: id_value(t.id),
            uuid: Set(t.uuid),
            name: Set(t.name.clone()),
            short_name: Set(t.short_name.clone()),
            description: Set(t.description.clone()),
            test_group: Set(t.test_group.as_str().to_owned()),
            requires_specimen: Set(t.requires_specimen),
            reference_concept_id: Set(t.reference_concept_id),
            creator: Set(t.audit.creator),
            date_created: Set(t.audit.date_created.map(utc)),
            changed_by: Set(t.audit.changed_by),
            date_changed: Set(t.audit.date_changed.map(utc)),
            retired: Set(retired.flag),
            retired_by: Set(retired.by),
            date_retired: Set(retired.at),
            retire_reason: Set(retired.reason),
        }
    }
}

impl From<lab_test_attribute_type::Model> for LabTestAttributeType {
    fn from(m: lab_test_attribute_type::Model) -> Self {
        Self {
            id: Some(m.id),
            uuid: m.uuid,
            name: m.name,
            description: m.description,
            lab_test_type_id: m.lab_test_type_id,
            datatype_classname: m.datatype_classname,
            datatype_config: m.datatype_config,
            preferred_handler_classname: m.preferred_handler_classname,
            handler_config: m.handler_config,
            min_occurs: m.min_occurs,
            max_occurs: m.max_occurs,
            sort_weight: m.sort_weight,
            group_name: m.group_name,
            audit: Audit {
                creator: m.creator,
                date_created: m.date_created,
                changed_by: m.changed_by,
                date_changed: m.date_changed,
            },
            retired: deactivation(m.retired, m.retired_by, m.date_retired, m.retire_reason),
        }
    }
}

impl From<&LabTestAttributeType> for lab_test_attribute_type::ActiveModel {
    fn from(t: &LabTestAttributeType) -> Self {
        let retired = DeactivationColumns::from(t.retired.as_ref());
        Self {
            id: id_value(t.id),
            uuid: Set(t.uuid),
            name: Set(t.name.clone()),
            description: Set(t.description.clone()),
            lab_test_type_id: Set(t.lab_test_type_id),
            datatype_classname: Set(t.datatype_classname.clone()),
            datatype_config: Set(t.datatype_config.clone()),
            preferred_handler_classname: Set(t.preferred_handler_classname.clone()),
            handler_config: Set(t.handler_config.clone()),
            min_occurs: Set(t.min_occurs),
            max_occurs: Set(t.max_occurs),
            sort_weight: Set(t.sort_weight),
            group_name: Set(t.group_name.clone()),
            creator: Set(t.audit.creator),
            date_created: Set(t.audit.date_created.map(utc)),
            changed_by: Set(t.audit.changed_by),
            date_changed: Set(t.audit.date_changed.map(utc)),
            retired: Set(retired.flag),
            retired_by: Set(retired.by),
            date_retired: Set(retired.at),
            retire_reason: Set(retired.reason),
        }
    }
}

impl From<lab_test::Model> for LabTest {
    fn from(m: lab_test::Model) -> Self {
        Self {
            id: Some(m.id),
            uuid: m.uuid,
            order_id: m.order_id,
            order_number: m.order_number,
            patient_id: m.patient_id,
            encounter_id: m.encounter_id,
            order_concept_id: m.order_concept_id,
            orderer_id: m.orderer_id,
            lab_test_type_id: m.lab_test_type_id,
            lab_reference_number: m.lab_reference_number,
            lab_instructions: m.lab_instructions,
            result_comments: m.result_comments,
            attributes: Vec::new(),
            audit: Audit {
                creator: m.creator,
                date_created: m.date_created,
                changed_by: m.changed_by,
                date_changed: m.date_changed,
            },
            voided: deactivation(m.voided, m.voided_by, m.date_voided, m.void_reason),
        }
    }
}

impl From<&LabTest> for lab_test::ActiveModel {
    fn from(t: &LabTest) -> Self {
        let voided = DeactivationColumns::from(t.voided.as_ref());
        Self {
            id: id_value(t.id),
            uuid: Set(t.uuid),
            order_id: Set(t.order_id),
            order_number: Set(t.order_number.clone()),
            patient_id: Set(t.patient_id),
            encounter_id: Set(t.encounter_id),
            order_concept_id: Set(t.order_concept_id),
            orderer_id: Set(t.orderer_id),
            lab_test_type_id: Set(t.lab_test_type_id),
            lab_reference_number: Set(t.lab_reference_number.clone()),
            lab_instructions: Set(t.lab_instructions.clone()),
            result_comments: Set(t.result_comments.clone()),
            creator: Set(t.audit.creator),
            date_created: Set(t.audit.date_created.map(utc)),
            changed_by: Set(t.audit.changed_by),
            date_changed: Set(t.audit.date_changed.map(utc)),
            voided: Set(voided.flag),
            voided_by: Set(voided.by),
            date_voided: Set(voided.at),
            void_reason: Set(voided.reason),
        }
    }
}

impl TryFrom<lab_test_sample::Model> for LabTestSample {
    type Error = DomainError;

    fn try_from(m: lab_test_sample::Model) -> Result<Self, Self::Error> {
        let status = LabTestSampleStatus::parse(&m.status).ok_or_else(|| {
            DomainError::database(format!("unknown sample status '{}'", m.status))
        })?;
        Ok(Self {
            id: Some(m.id),
            uuid: m.uuid,
            lab_test_id: m.lab_test_id,
            patient_id: m.patient_id,
            lab_sample_identifier: m.lab_sample_identifier,
            status,
            specimen_name: m.specimen_name,
            specimen_site: m.specimen_site,
            collector_id: m.collector_id,
            collection_date: m.collection_date,
            received_date: m.received_date,
            comments: m.comments,
            audit: Audit {
                creator: m.creator,
                date_created: m.date_created,
                changed_by: m.changed_by,
                date_changed: m.date_changed,
            },
            voided: deactivation(m.voided, m.voided_by, m.date_voided, m.void_reason),
        })
    }
}

impl From<&LabTestSample> for lab_test_sample::ActiveModel {
    fn from(s: &LabTestSample) -> Self {
        let voided = DeactivationColumns::from(s.voided.as_ref());
        Self {
            id: id_value(s.id),
            uuid: Set(s.uuid),
            lab_test_id: Set(s.lab_test_id),
            patient_id: Set(s.patient_id),
            lab_sample_identifier: Set(s.lab_sample_identifier.clone()),
            status: Set(s.status.as_str().to_owned()),
            specimen_name: Set(s.specimen_name.clone()),
            specimen_site: Set(s.specimen_site.clone()),
            collector_id: Set(s.collector_id),
            collection_date: Set(utc(s.collection_date)),
            received_date: Set(s.received_date.map(utc)),
            comments: Set(s.comments.clone()),
            creator: Set(s.audit.creator),
            date_created: Set(s.audit.date_created.map(utc)),
            changed_by: Set(s.audit.changed_by),
            date_changed: Set(s.audit.date_changed.map(utc)),
            voided: Set(voided.flag),
            voided_by: Set(voided.by),
            date_voided: Set(voided.at),
            void_reason: Set(voided.reason),
        }
    }
}

impl From<lab_test_attribute::Model> for LabTestAttribute {
    fn from(m: lab_test_attribute::Model) -> Self {
        Self {
            id: Some(m.id),
            uuid: m.uuid,
            lab_test_id: Some(m.lab_test_id),
            attribute_type_id: m.attribute_type_id,
            value_reference: m.value_reference,
            audit: Audit {
                creator: m.creator,
                date_created: m.date_created,
                changed_by: m.changed_by,
                date_changed: m.date_changed,
            },
            voided: deactivation(m.voided, m.voided_by, m.date_voided, m.void_reason),
        }
    }
}

impl TryFrom<&LabTestAttribute> for lab_test_attribute::ActiveModel {
    type Error = DomainError;

    fn try_from(a: &LabTestAttribute) -> Result<Self, Self::Error> {
        let lab_test_id = a.lab_test_id.ok_or_else(|| {
            DomainError::invalid_argument(format!(
                "LabTestAttribute {} does not belong to a lab test",
                a.uuid
            ))
        })?;
        let voided = DeactivationColumns::from(a.voided.as_ref());
        Ok(Self {
            id: id_value(a.id),
            uuid: Set(a.uuid),
            lab_test_id: Set(lab_test_id),
            attribute_type_id: Set(a.attribute_type_id),
            value_reference: Set(a.value_reference.clone()),
            creator: Set(a.audit.creator),
            date_created: Set(a.audit.date_created.map(utc)),
            changed_by: Set(a.audit.changed_by),
            date_changed: Set(a.audit.date_changed.map(utc)),
            voided: Set(voided.flag),
            voided_by: Set(voided.by),
            date_voided: Set(voided.at),
            void_reason: Set(voided.reason),
        })
    }
}
