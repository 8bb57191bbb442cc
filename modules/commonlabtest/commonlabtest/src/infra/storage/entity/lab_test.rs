use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_test")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
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
    pub creator: Option<Uuid>,
    pub date_created: Option<TimeDateTimeWithTimeZone>,
    pub changed_by: Option<Uuid>,
    pub date_changed: Option<TimeDateTimeWithTimeZone>,
    pub voided: bool,
    pub voided_by: Option<Uuid>,
    pub date_voided: Option<TimeDateTimeWithTimeZone>,
    pub void_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lab_test_type::Entity",
        from = "Column::LabTestTypeId",
        to = "super::lab_test_type::Column::Id"
    )]
    LabTestType,
    #[sea_orm(has_many = "super::lab_test_sample::Entity")]
    Samples,
    #[sea_orm(has_many = "super::lab_test_attribute::Entity")]
    Attributes,
}

impl Related<super::lab_test_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LabTestType.def()
    }
}

impl Related<super::lab_test_sample::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Samples.def()
    }
}

impl Related<super::lab_test_attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attributes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
