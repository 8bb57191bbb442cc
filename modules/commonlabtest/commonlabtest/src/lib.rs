//! Common Lab Test module implementation
//!
//! The public API is defined in `commonlabtest-sdk` and re-exported here.
//!
//! ```ignore
//! let db = config.database.connect().await?;
//! Migrator::up(&db, None).await?;
//!
//! let service = Service::new(db, Arc::new(SeaOrmLabTestRepository::new()), config.service);
//! let client: Arc<dyn CommonLabTestClientV1> = Arc::new(LocalClient::new(Arc::new(service)));
//! ```

pub use commonlabtest_sdk::{
    AttributeFilter, AttributeTypeFilter, CommonLabTestClientV1, CommonLabTestError,
    Deactivation, LabRecord, LabTest, LabTestAttribute, LabTestAttributeType, LabTestFilter,
    LabTestGroup, LabTestSample, LabTestSampleStatus, LabTestType, LabTestTypeFilter, Privilege,
    SampleFilter, SecurityContext, SortOrder,
};

pub mod config;
pub mod local_client;
pub mod logging;

#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

pub use config::AppConfig;
pub use domain::service::{Service, ServiceConfig};
pub use infra::storage::SeaOrmLabTestRepository;
pub use infra::storage::migrations::Migrator;
pub use local_client::LocalClient;
pub use logging::init_logging;
