use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_test_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    pub description: Option<String>,
    /// `LabTestGroup` storage code.
    pub test_group: String,
    pub requires_specimen: bool,
    pub reference_concept_id: Option<i32>,
    pub creator: Option<Uuid>,
    pub date_created: Option<TimeDateTimeWithTimeZone>,
    pub changed_by: Option<Uuid>,
    pub date_changed: Option<TimeDateTimeWithTimeZone>,
    pub retired: bool,
    pub retired_by: Option<Uuid>,
    pub date_retired: Option<TimeDateTimeWithTimeZone>,
    pub retire_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lab_test::Entity")]
    LabTests,
    #[sea_orm(has_many = "super::lab_test_attribute_type::Entity")]
    AttributeTypes,
}

impl Related<super::lab_test::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LabTests.def()
    }
}

impl Related<super::lab_test_attribute_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
