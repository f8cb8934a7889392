use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pool_core::{
    EstimateRepository, EstimateStatus, HistoryEstimate, NewHistoryEstimate, Product,
    ProductCategory, RepositoryError,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::decimal::{decimal_to_f64, get_decimal, get_optional_decimal};

const ESTIMATE_COLUMNS: &str = "id, name, status, client_info, selection, items, total, author, \
                                created_at, updated_at";

const PRODUCT_COLUMNS: &str = "id, category, name, price, unit, installation_price, kind, \
                               flow_rate, power, manufacturer, length, width, depth, description";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {database_url}"))?;
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_error(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Database(err.to_string())
}

fn to_json<T: Serialize>(
    value: &T,
    column: &str,
) -> Result<String, RepositoryError> {
    serde_json::to_string(value)
        .map_err(|e| RepositoryError::Database(format!("Failed to encode {column}: {e}")))
}

fn from_json<T: DeserializeOwned>(
    row: &SqliteRow,
    column: &str,
) -> Result<T, RepositoryError> {
    let text: String = row.try_get(column).map_err(db_error)?;
    serde_json::from_str(&text)
        .map_err(|e| RepositoryError::Database(format!("Failed to decode {column}: {e}")))
}

fn row_to_estimate(row: &SqliteRow) -> Result<HistoryEstimate, RepositoryError> {
    let status: String = row.try_get("status").map_err(db_error)?;
    let client_info: Option<String> = row.try_get("client_info").map_err(db_error)?;

    Ok(HistoryEstimate {
        id: row.try_get("id").map_err(db_error)?,
        name: row.try_get("name").map_err(db_error)?,
        status: EstimateStatus::parse(&status)
            .ok_or_else(|| RepositoryError::Database(format!("Unknown status '{status}'")))?,
        client_info: match client_info {
            Some(text) => Some(serde_json::from_str(&text).map_err(|e| {
                RepositoryError::Database(format!("Failed to decode client_info: {e}"))
            })?),
            None => None,
        },
        selection: from_json(row, "selection")?,
        items: from_json(row, "items")?,
        total: get_decimal(row, "total")?,
        author: row.try_get("author").map_err(db_error)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {e}")))?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get updated_at: {e}")))?,
    })
}

fn row_to_product(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let category: String = row.try_get("category").map_err(db_error)?;

    Ok(Product {
        id: row.try_get("id").map_err(db_error)?,
        category: ProductCategory::parse(&category)
            .ok_or_else(|| RepositoryError::Database(format!("Unknown category '{category}'")))?,
        name: row.try_get("name").map_err(db_error)?,
        price: get_decimal(row, "price")?,
        unit: row.try_get("unit").map_err(db_error)?,
        installation_price: get_optional_decimal(row, "installation_price")?,
        kind: row.try_get("kind").map_err(db_error)?,
        flow_rate: get_optional_decimal(row, "flow_rate")?,
        power: get_optional_decimal(row, "power")?,
        manufacturer: row.try_get("manufacturer").map_err(db_error)?,
        length: get_optional_decimal(row, "length")?,
        width: get_optional_decimal(row, "width")?,
        depth: get_optional_decimal(row, "depth")?,
        description: row.try_get("description").map_err(db_error)?,
    })
}

#[async_trait]
impl EstimateRepository for SqliteRepository {
    async fn create_estimate(
        &self,
        estimate: NewHistoryEstimate,
    ) -> Result<HistoryEstimate, RepositoryError> {
        let now = Utc::now();
        let client_info = estimate
            .client_info
            .as_ref()
            .map(|c| to_json(c, "client_info"))
            .transpose()?;

        let result = sqlx::query(
            "INSERT INTO estimates (
                name, status, client_info, selection, items, total, author,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&estimate.name)
        .bind(estimate.status.as_str())
        .bind(client_info)
        .bind(to_json(&estimate.selection, "selection")?)
        .bind(to_json(&estimate.items, "items")?)
        .bind(decimal_to_f64(estimate.total))
        .bind(&estimate.author)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        let id = result.last_insert_rowid();
        debug!(id, name = %estimate.name, "Saved estimate");
        self.get_estimate(id).await
    }

    async fn get_estimate(
        &self,
        id: i64,
    ) -> Result<HistoryEstimate, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {ESTIMATE_COLUMNS} FROM estimates WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_estimate(&row)
    }

    async fn update_estimate(
        &self,
        estimate: &HistoryEstimate,
    ) -> Result<HistoryEstimate, RepositoryError> {
        let client_info = estimate
            .client_info
            .as_ref()
            .map(|c| to_json(c, "client_info"))
            .transpose()?;

        let result = sqlx::query(
            "UPDATE estimates SET
                name = ?, status = ?, client_info = ?, selection = ?, items = ?,
                total = ?, author = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&estimate.name)
        .bind(estimate.status.as_str())
        .bind(client_info)
        .bind(to_json(&estimate.selection, "selection")?)
        .bind(to_json(&estimate.items, "items")?)
        .bind(decimal_to_f64(estimate.total))
        .bind(&estimate.author)
        .bind(Utc::now())
        .bind(estimate.id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_estimate(estimate.id).await
    }

    async fn delete_estimate(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM estimates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        debug!(id, "Deleted estimate");
        Ok(())
    }

    async fn list_estimates(
        &self,
        status: Option<EstimateStatus>,
    ) -> Result<Vec<HistoryEstimate>, RepositoryError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {ESTIMATE_COLUMNS} FROM estimates WHERE status = ?
                     ORDER BY created_at DESC, id DESC"
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {ESTIMATE_COLUMNS} FROM estimates ORDER BY created_at DESC, id DESC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_error)?;

        rows.iter().map(row_to_estimate).collect()
    }

    async fn list_products(
        &self,
        category: Option<ProductCategory>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = match category {
            Some(category) => {
                sqlx::query(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = ? ORDER BY rowid"
                ))
                .bind(category.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY rowid"))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(db_error)?;

        rows.iter().map(row_to_product).collect()
    }

    async fn insert_product(
        &self,
        product: &Product,
    ) -> Result<(), RepositoryError> {
        sqlx::query(&format!(
            "INSERT OR REPLACE INTO products ({PRODUCT_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&product.id)
        .bind(product.category.as_str())
        .bind(&product.name)
        .bind(decimal_to_f64(product.price))
        .bind(&product.unit)
        .bind(product.installation_price.map(decimal_to_f64))
        .bind(&product.kind)
        .bind(product.flow_rate.map(decimal_to_f64))
        .bind(product.power.map(decimal_to_f64))
        .bind(&product.manufacturer)
        .bind(product.length.map(decimal_to_f64))
        .bind(product.width.map(decimal_to_f64))
        .bind(product.depth.map(decimal_to_f64))
        .bind(&product.description)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn delete_products(
        &self,
        category: ProductCategory,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE category = ?")
            .bind(category.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }
}
