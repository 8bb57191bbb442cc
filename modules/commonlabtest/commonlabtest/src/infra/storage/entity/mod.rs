//! `SeaORM` entities, one module per table.

pub mod lab_test;
pub mod lab_test_attribute;
pub mod lab_test_attribute_type;
pub mod lab_test_sample;
pub mod lab_test_type;
