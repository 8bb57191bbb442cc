use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_test_attribute_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub lab_test_type_id: Option<i32>,
    pub datatype_classname: String,
    pub datatype_config: Option<String>,
    pub preferred_handler_classname: Option<String>,
    pub handler_config: Option<String>,
    pub min_occurs: i32,
    pub max_occurs: Option<i32>,
    pub sort_weight: Option<f64>,
    pub group_name: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::lab_test_type::Entity",
        from = "Column::LabTestTypeId",
        to = "super::lab_test_type::Column::Id"
    )]
    LabTestType,
    #[sea_orm(has_many = "super::lab_test_attribute::Entity")]
    Attributes,
}

impl Related<super::lab_test_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LabTestType.def()
    }
}

impl Related<super::lab_test_attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attributes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
