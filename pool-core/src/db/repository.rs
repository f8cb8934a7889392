use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    EstimateStatus, HistoryEstimate, NewHistoryEstimate, Product, ProductCategory,
};

#[derive(Debug, Error, PartialEq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[async_trait]
pub trait EstimateRepository: Send + Sync {
    // Saved estimates
    async fn create_estimate(
        &self,
        estimate: NewHistoryEstimate,
    ) -> Result<HistoryEstimate, RepositoryError>;

    async fn get_estimate(&self, id: i64) -> Result<HistoryEstimate, RepositoryError>;

    /// Stores every field except `id` and `created_at`; stamps `updated_at`.
    async fn update_estimate(
        &self,
        estimate: &HistoryEstimate,
    ) -> Result<HistoryEstimate, RepositoryError>;

    async fn delete_estimate(&self, id: i64) -> Result<(), RepositoryError>;

    /// Newest first.
    async fn list_estimates(
        &self,
        status: Option<EstimateStatus>,
    ) -> Result<Vec<HistoryEstimate>, RepositoryError>;

    // Catalog products
    async fn list_products(
        &self,
        category: Option<ProductCategory>,
    ) -> Result<Vec<Product>, RepositoryError>;

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError>;

    /// Returns the number of products removed.
    async fn delete_products(
        &self,
        category: ProductCategory,
    ) -> Result<u64, RepositoryError>;
}
