pub mod authz;
pub mod error;
pub mod repo;
pub mod service;
