//! Common Lab Test SDK
//!
//! This crate provides the public contract of the `commonlabtest` module:
//! - `CommonLabTestClientV1` trait
//! - Model types for lab test types, attribute types, lab tests, samples and attributes
//! - Filter types for the list operations
//! - Privilege constants and the `SecurityContext` every call carries
//! - Error type (`CommonLabTestError`)
//!
//! ## Usage
//!
//! ```ignore
//! use commonlabtest_sdk::{CommonLabTestClientV1, LabTestFilter};
//!
//! let tests = client
//!     .list_lab_tests(&ctx, LabTestFilter::for_patient(patient_id), false)
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod client;
pub mod errors;
pub mod models;
pub mod query;
pub mod security;

pub use client::CommonLabTestClientV1;
pub use errors::CommonLabTestError;
pub use models::{
    Audit, Deactivation, LabRecord, LabTest, LabTestAttribute, LabTestAttributeType,
    LabTestGroup, LabTestSample, LabTestSampleStatus, LabTestType,
};
pub use query::{
    AttributeFilter, AttributeTypeFilter, LabTestFilter, LabTestTypeFilter, SampleFilter,
    SortOrder,
};
pub use security::{Privilege, SecurityContext};
