#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for commonlabtest integration tests

use std::sync::Arc;

use commonlabtest::{
    LabRecord, LabTest, LabTestAttributeType, LabTestGroup, LabTestType, Migrator, Privilege,
    SeaOrmLabTestRepository, SecurityContext, Service, ServiceConfig,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use time::OffsetDateTime;
use uuid::Uuid;

pub type TestService = Service<SeaOrmLabTestRepository>;

/// Fresh in-memory database with the schema applied.
///
/// One pooled connection only: every connection to `sqlite::memory:` opens its
/// own empty database.
pub async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub async fn create_service() -> Arc<TestService> {
    let db = connect().await;
    Arc::new(Service::new(
        db,
        Arc::new(SeaOrmLabTestRepository::new()),
        ServiceConfig::default(),
    ))
}

pub fn admin() -> SecurityContext {
    SecurityContext::builder()
        .subject_id(Uuid::new_v4())
        .grant_all(Privilege::ALL)
        .build()
}

pub fn granted(privileges: &[Privilege]) -> SecurityContext {
    SecurityContext::builder()
        .subject_id(Uuid::new_v4())
        .grant_all(privileges.iter().copied())
        .build()
}

pub async fn seed_type(
    service: &TestService,
    name: &str,
    group: LabTestGroup,
    requires_specimen: bool,
) -> LabTestType {
    service
        .save_lab_test_type(&admin(), LabTestType::new(name, group, requires_specimen))
        .await
        .unwrap()
}

pub async fn seed_attribute_type(
    service: &TestService,
    name: &str,
    lab_test_type_id: i32,
) -> LabTestAttributeType {
    let attribute_type =
        LabTestAttributeType::new(name, "FreeTextDatatype").for_lab_test_type(lab_test_type_id);
    service
        .save_attribute_type(&admin(), attribute_type)
        .await
        .unwrap()
}

pub async fn seed_test(
    service: &TestService,
    lab_test_type_id: i32,
    patient_id: i32,
    order_id: i32,
    created: OffsetDateTime,
) -> LabTest {
    let lab_test = LabTest {
        order_number: Some(format!("ORD-{order_id}")),
        lab_reference_number: Some(format!("LAB-{order_id:04}")),
        ..LabTest::new(order_id, patient_id, lab_test_type_id).created_at(created)
    };
    service.save_lab_test(&admin(), lab_test).await.unwrap()
}

pub fn ids<T: LabRecord>(records: &[T]) -> Vec<i32> {
    records.iter().filter_map(LabRecord::id).collect()
}
