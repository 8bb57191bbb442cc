use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

// Foreign keys carry no ON DELETE action, so purging a parent with live
// dependents fails unless the caller cascades.

const POSTGRES_UP: &[&str] = &[
    r"CREATE TABLE IF NOT EXISTS lab_test_type (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    short_name VARCHAR(255),
    description TEXT,
    test_group VARCHAR(64) NOT NULL,
    requires_specimen BOOLEAN NOT NULL DEFAULT FALSE,
    reference_concept_id INTEGER,
    creator UUID,
    date_created TIMESTAMPTZ,
    changed_by UUID,
    date_changed TIMESTAMPTZ,
    retired BOOLEAN NOT NULL DEFAULT FALSE,
    retired_by UUID,
    date_retired TIMESTAMPTZ,
    retire_reason VARCHAR(255)
)",
    r"CREATE TABLE IF NOT EXISTS lab_test_attribute_type (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    lab_test_type_id INTEGER REFERENCES lab_test_type(id),
    datatype_classname VARCHAR(255) NOT NULL,
    datatype_config TEXT,
    preferred_handler_classname VARCHAR(255),
    handler_config TEXT,
    min_occurs INTEGER NOT NULL DEFAULT 0,
    max_occurs INTEGER,
    sort_weight DOUBLE PRECISION,
    group_name VARCHAR(255),
    creator UUID,
    date_created TIMESTAMPTZ,
    changed_by UUID,
    date_changed TIMESTAMPTZ,
    retired BOOLEAN NOT NULL DEFAULT FALSE,
    retired_by UUID,
    date_retired TIMESTAMPTZ,
    retire_reason VARCHAR(255)
)",
    r"CREATE TABLE IF NOT EXISTS lab_test (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE,
    order_id INTEGER NOT NULL,
    order_number VARCHAR(255),
    patient_id INTEGER NOT NULL,
    encounter_id INTEGER,
    order_concept_id INTEGER,
    orderer_id INTEGER,
    lab_test_type_id INTEGER NOT NULL REFERENCES lab_test_type(id),
    lab_reference_number VARCHAR(255),
    lab_instructions TEXT,
    result_comments TEXT,
    creator UUID,
    date_created TIMESTAMPTZ,
    changed_by UUID,
    date_changed TIMESTAMPTZ,
    voided BOOLEAN NOT NULL DEFAULT FALSE,
    voided_by UUID,
    date_voided TIMESTAMPTZ,
    void_reason VARCHAR(255)
)",
    r"CREATE TABLE IF NOT EXISTS lab_test_sample (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE,
    lab_test_id INTEGER REFERENCES lab_test(id),
    patient_id INTEGER NOT NULL,
    lab_sample_identifier VARCHAR(255),
    status VARCHAR(32) NOT NULL,
    specimen_name VARCHAR(255),
    specimen_site VARCHAR(255),
    collector_id INTEGER,
    collection_date TIMESTAMPTZ NOT NULL,
    received_date TIMESTAMPTZ,
    comments TEXT,
    creator UUID,
    date_created TIMESTAMPTZ,
    changed_by UUID,
    date_changed TIMESTAMPTZ,
    voided BOOLEAN NOT NULL DEFAULT FALSE,
    voided_by UUID,
    date_voided TIMESTAMPTZ,
    void_reason VARCHAR(255)
)",
    r"CREATE TABLE IF NOT EXISTS lab_test_attribute (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE,
    lab_test_id INTEGER NOT NULL REFERENCES lab_test(id),
    attribute_type_id INTEGER NOT NULL REFERENCES lab_test_attribute_type(id),
    value_reference TEXT NOT NULL,
    creator UUID,
    date_created TIMESTAMPTZ,
    changed_by UUID,
    date_changed TIMESTAMPTZ,
    voided BOOLEAN NOT NULL DEFAULT FALSE,
    voided_by UUID,
    date_voided TIMESTAMPTZ,
    void_reason VARCHAR(255)
)",
    "CREATE INDEX IF NOT EXISTS idx_lab_test_patient ON lab_test(patient_id)",
    "CREATE INDEX IF NOT EXISTS idx_lab_test_reference ON lab_test(lab_reference_number)",
    "CREATE INDEX IF NOT EXISTS idx_lab_test_sample_lab_test ON lab_test_sample(lab_test_id)",
    "CREATE INDEX IF NOT EXISTS idx_lab_test_sample_patient ON lab_test_sample(patient_id)",
    "CREATE INDEX IF NOT EXISTS idx_lab_test_attribute_lab_test ON lab_test_attribute(lab_test_id)",
    "CREATE INDEX IF NOT EXISTS idx_lab_test_attribute_type ON lab_test_attribute(attribute_type_id)",
];

const SQLITE_UP: &[&str] = &[
    r"CREATE TABLE IF NOT EXISTS lab_test_type (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    short_name TEXT,
    description TEXT,
    test_group TEXT NOT NULL,
    requires_specimen INTEGER NOT NULL DEFAULT 0,
    reference_concept_id INTEGER,
    creator TEXT,
    date_created TEXT,
    changed_by TEXT,
    date_changed TEXT,
    retired INTEGER NOT NULL DEFAULT 0,
    retired_by TEXT,
    date_retired TEXT,
    retire_reason TEXT
)",
    r"CREATE TABLE IF NOT EXISTS lab_test_attribute_type (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    description TEXT,
    lab_test_type_id INTEGER REFERENCES lab_test_type(id),
    datatype_classname TEXT NOT NULL,
    datatype_config TEXT,
    preferred_handler_classname TEXT,
    handler_config TEXT,
    min_occurs INTEGER NOT NULL DEFAULT 0,
    max_occurs INTEGER,
    sort_weight REAL,
    group_name TEXT,
    creator TEXT,
    date_created TEXT,
    changed_by TEXT,
    date_changed TEXT,
    retired INTEGER NOT NULL DEFAULT 0,
    retired_by TEXT,
    date_retired TEXT,
    retire_reason TEXT
)",
    r"CREATE TABLE IF NOT EXISTS lab_test (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    order_id INTEGER NOT NULL,
    order_number TEXT,
    patient_id INTEGER NOT NULL,
    encounter_id INTEGER,
    order_concept_id INTEGER,
    orderer_id INTEGER,
    lab_test_type_id INTEGER NOT NULL REFERENCES lab_test_type(id),
    lab_reference_number TEXT,
    lab_instructions TEXT,
    result_comments TEXT,
    creator TEXT,
    date_created TEXT,
    changed_by TEXT,
    date_changed TEXT,
    voided INTEGER NOT NULL DEFAULT 0,
    voided_by TEXT,
    date_voided TEXT,
    void_reason TEXT
)",
    r"CREATE TABLE IF NOT EXISTS lab_test_sample (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    lab_test_id INTEGER REFERENCES lab_test(id),
    patient_id INTEGER NOT NULL,
    lab_sample_identifier TEXT,
    status TEXT NOT NULL,
    specimen_name TEXT,
    specimen_site TEXT,
    collector_id INTEGER,
    collection_date TEXT NOT NULL,
    received_date TEXT,
    comments TEXT,
    creator TEXT,
    date_created TEXT,
    changed_by TEXT,
    date_changed TEXT,
    voided INTEGER NOT NULL DEFAULT 0,
    voided_by TEXT,
    date_voided TEXT,
    void_reason TEXT
)",
    r"CREATE TABLE IF NOT EXISTS lab_test_attribute (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    lab_test_id INTEGER NOT NULL REFERENCES lab_test(id),
    attribute_type_id INTEGER NOT NULL REFERENCES lab_test_attribute_type(id),
    value_reference TEXT NOT NULL,
    creator TEXT,
    date_created TEXT,
    changed_by TEXT,
    date_changed TEXT,
    voided INTEGER NOT NULL DEFAULT 0,
    voided_by TEXT,
    date_voided TEXT,
    void_reason TEXT
)",
    "CREATE INDEX IF NOT EXISTS idx_lab_test_patient ON lab_test(patient_id)",
    "CREATE INDEX IF NOT EXISTS idx_lab_test_reference ON lab_test(lab_reference_number)",
    "CREATE INDEX IF NOT EXISTS idx_lab_test_sample_lab_test ON lab_test_sample(lab_test_id)",
    "CREATE INDEX IF NOT EXISTS idx_lab_test_sample_patient ON lab_test_sample(patient_id)",
    "CREATE INDEX IF NOT EXISTS idx_lab_test_attribute_lab_test ON lab_test_attribute(lab_test_id)",
    "CREATE INDEX IF NOT EXISTS idx_lab_test_attribute_type ON lab_test_attribute(attribute_type_id)",
];

// MySQL has no CREATE INDEX IF NOT EXISTS; indexes are declared inline.
const MYSQL_UP: &[&str] = &[
    r"CREATE TABLE IF NOT EXISTS lab_test_type (
    id INT AUTO_INCREMENT PRIMARY KEY,
    uuid BINARY(16) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    short_name VARCHAR(255),
    description TEXT,
    test_group VARCHAR(64) NOT NULL,
    requires_specimen BOOLEAN NOT NULL DEFAULT FALSE,
    reference_concept_id INT,
    creator BINARY(16),
    date_created TIMESTAMP(6) NULL,
    changed_by BINARY(16),
    date_changed TIMESTAMP(6) NULL,
    retired BOOLEAN NOT NULL DEFAULT FALSE,
    retired_by BINARY(16),
    date_retired TIMESTAMP(6) NULL,
    retire_reason VARCHAR(255)
)",
    r"CREATE TABLE IF NOT EXISTS lab_test_attribute_type (
    id INT AUTO_INCREMENT PRIMARY KEY,
    uuid BINARY(16) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    lab_test_type_id INT,
    datatype_classname VARCHAR(255) NOT NULL,
    datatype_config TEXT,
    preferred_handler_classname VARCHAR(255),
    handler_config TEXT,
    min_occurs INT NOT NULL DEFAULT 0,
    max_occurs INT,
    sort_weight DOUBLE,
    group_name VARCHAR(255),
    creator BINARY(16),
    date_created TIMESTAMP(6) NULL,
    changed_by BINARY(16),
    date_changed TIMESTAMP(6) NULL,
    retired BOOLEAN NOT NULL DEFAULT FALSE,
    retired_by BINARY(16),
    date_retired TIMESTAMP(6) NULL,
    retire_reason VARCHAR(255),
    CONSTRAINT fk_attribute_type_lab_test_type FOREIGN KEY (lab_test_type_id) REFERENCES lab_test_type(id)
)",
    r"CREATE TABLE IF NOT EXISTS lab_test (
    id INT AUTO_INCREMENT PRIMARY KEY,
    uuid BINARY(16) NOT NULL UNIQUE,
    order_id INT NOT NULL,
    order_number VARCHAR(255),
    patient_id INT NOT NULL,
    encounter_id INT,
    order_concept_id INT,
    orderer_id INT,
    lab_test_type_id INT NOT NULL,
    lab_reference_number VARCHAR(255),
    lab_instructions TEXT,
    result_comments TEXT,
    creator BINARY(16),
    date_created TIMESTAMP(6) NULL,
    changed_by BINARY(16),
    date_changed TIMESTAMP(6) NULL,
    voided BOOLEAN NOT NULL DEFAULT FALSE,
    voided_by BINARY(16),
    date_voided TIMESTAMP(6) NULL,
    void_reason VARCHAR(255),
    INDEX idx_lab_test_patient (patient_id),
    INDEX idx_lab_test_reference (lab_reference_number),
    CONSTRAINT fk_lab_test_lab_test_type FOREIGN KEY (lab_test_type_id) REFERENCES lab_test_type(id)
)",
    r"CREATE TABLE IF NOT EXISTS lab_test_sample (
    id INT AUTO_INCREMENT PRIMARY KEY,
    uuid BINARY(16) NOT NULL UNIQUE,
    lab_test_id INT,
    patient_id INT NOT NULL,
    lab_sample_identifier VARCHAR(255),
    status VARCHAR(32) NOT NULL,
    specimen_name VARCHAR(255),
    specimen_site VARCHAR(255),
    collector_id INT,
    collection_date TIMESTAMP(6) NOT NULL,
    received_date TIMESTAMP(6) NULL,
    comments TEXT,
    creator BINARY(16),
    date_created TIMESTAMP(6) NULL,
    changed_by BINARY(16),
    date_changed TIMESTAMP(6) NULL,
    voided BOOLEAN NOT NULL DEFAULT FALSE,
    voided_by BINARY(16),
    date_voided TIMESTAMP(6) NULL,
    void_reason VARCHAR(255),
    INDEX idx_lab_test_sample_patient (patient_id),
    CONSTRAINT fk_sample_lab_test FOREIGN KEY (lab_test_id) REFERENCES lab_test(id)
)",
    r"CREATE TABLE IF NOT EXISTS lab_test_attribute (
    id INT AUTO_INCREMENT PRIMARY KEY,
    uuid BINARY(16) NOT NULL UNIQUE,
    lab_test_id INT NOT NULL,
    attribute_type_id INT NOT NULL,
    value_reference TEXT NOT NULL,
    creator BINARY(16),
    date_created TIMESTAMP(6) NULL,
    changed_by BINARY(16),
    date_changed TIMESTAMP(6) NULL,
    voided BOOLEAN NOT NULL DEFAULT FALSE,
    voided_by BINARY(16),
    date_voided TIMESTAMP(6) NULL,
    void_reason VARCHAR(255),
    CONSTRAINT fk_attribute_lab_test FOREIGN KEY (lab_test_id) REFERENCES lab_test(id),
    CONSTRAINT fk_attribute_attribute_type FOREIGN KEY (attribute_type_id) REFERENCES lab_test_attribute_type(id)
)",
];

const DOWN: &[&str] = &[
    "DROP TABLE IF EXISTS lab_test_attribute",
    "DROP TABLE IF EXISTS lab_test_sample",
    "DROP TABLE IF EXISTS lab_test",
    "DROP TABLE IF EXISTS lab_test_attribute_type",
    "DROP TABLE IF EXISTS lab_test_type",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        let statements = match manager.get_database_backend() {
            DatabaseBackend::Postgres => POSTGRES_UP,
            DatabaseBackend::MySql => MYSQL_UP,
            DatabaseBackend::Sqlite => SQLITE_UP,
        };
        for sql in statements {
            conn.execute_unprepared(sql).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        for sql in DOWN {
            conn.execute_unprepared(sql).await?;
        }
        Ok(())
    }
}
