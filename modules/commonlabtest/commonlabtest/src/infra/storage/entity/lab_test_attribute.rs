use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_test_attribute")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub lab_test_id: i32,
    pub attribute_type_id: i32,
    #[sea_orm(column_type = "Text")]
    pub value_reference: String,
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
        belongs_to = "super::lab_test::Entity",
        from = "Column::LabTestId",
        to = "super::lab_test::Column::Id"
    )]
    LabTest,
    #[sea_orm(
        belongs_to = "super::lab_test_attribute_type::Entity",
        from = "Column::AttributeTypeId",
        to = "super::lab_test_attribute_type::Column::Id"
    )]
    AttributeType,
}

impl Related<super::lab_test::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LabTest.def()
    }
}

impl Related<super::lab_test_attribute_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
