//! Infrastructure storage layer: `SeaORM` entities, mappers, migrations and
//! the repository implementation.

pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;

mod sea_orm_repo;


pub use sea_orm_repo::SeaOrmLabTestRepository;
