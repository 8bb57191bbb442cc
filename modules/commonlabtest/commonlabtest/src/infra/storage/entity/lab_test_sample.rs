use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_test_sample")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub lab_test_id: Option<i32>,
    pub patient_id: i32,
    pub lab_sample_identifier: Option<String>,
    /// `LabTestSampleStatus` storage code.
    pub status: String,
    pub specimen_name: Option<String>,
    pub specimen_site: Option<String>,
    pub collector_id: Option<i32>,
    pub collection_date: TimeDateTimeWithTimeZone,
    pub received_date: Option<TimeDateTimeWithTimeZone>,
    pub comments: Option<String>,
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
}

impl Related<super::lab_test::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LabTest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
