pub mod calculations;
pub mod catalog_search;
pub mod db;
pub mod export;
pub mod models;
pub mod validation;
pub mod wizard;

pub use db::repository::{EstimateRepository, RepositoryError};
pub use models::*;
