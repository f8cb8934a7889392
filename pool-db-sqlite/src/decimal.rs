use pool_core::RepositoryError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

fn column_error(
    column: &str,
    err: impl std::fmt::Display,
) -> RepositoryError {
    RepositoryError::Database(format!("Column '{column}': {err}"))
}

/// Reads a money or size column stored as INTEGER or REAL. NULL reads as zero.
pub fn get_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row.try_get_raw(column).map_err(|e| column_error(column, e))?;
    let type_name = value_ref.type_info().name().to_string();

    match type_name.as_str() {
        "INTEGER" => {
            let value: i64 = row.try_get(column).map_err(|e| column_error(column, e))?;
            Ok(Decimal::from(value))
        }
        "REAL" => {
            let value: f64 = row.try_get(column).map_err(|e| column_error(column, e))?;
            Decimal::try_from(value).map_err(|e| column_error(column, e))
        }
        "NULL" => Ok(Decimal::ZERO),
        other => Err(RepositoryError::Database(format!(
            "Unexpected type '{other}' for column '{column}'"
        ))),
    }
}

/// Like [`get_decimal`], but NULL reads as `None`.
pub fn get_optional_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<Decimal>, RepositoryError> {
    let value_ref = row.try_get_raw(column).map_err(|e| column_error(column, e))?;
    if value_ref.is_null() {
        return Ok(None);
    }
    get_decimal(row, column).map(Some)
}

pub fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        sqlx::query(
            "CREATE TABLE prices (
                id INTEGER PRIMARY KEY,
                whole INTEGER,
                fractional REAL,
                missing REAL,
                label TEXT
            )",
        )
        .execute(&pool)
        .await
        .expect("Failed to create test table");
        sqlx::query("INSERT INTO prices VALUES (1, 450000, 1250.5, NULL, 'шт')")
            .execute(&pool)
            .await
            .expect("Failed to insert test row");
        pool
    }

    async fn row(pool: &SqlitePool) -> SqliteRow {
        sqlx::query("SELECT whole, fractional, missing, label FROM prices WHERE id = 1")
            .fetch_one(pool)
            .await
            .expect("Failed to fetch row")
    }

    #[tokio::test]
    async fn reads_integer_and_real_columns() {
        let pool = setup_test_db().await;
        let row = row(&pool).await;

        assert_eq!(get_decimal(&row, "whole"), Ok(dec!(450000)));
        assert_eq!(get_decimal(&row, "fractional"), Ok(dec!(1250.5)));
    }

    #[tokio::test]
    async fn null_is_zero_or_none() {
        let pool = setup_test_db().await;
        let row = row(&pool).await;

        assert_eq!(get_decimal(&row, "missing"), Ok(Decimal::ZERO));
        assert_eq!(get_optional_decimal(&row, "missing"), Ok(None));
        assert_eq!(get_optional_decimal(&row, "whole"), Ok(Some(dec!(450000))));
    }

    #[tokio::test]
    async fn text_and_unknown_columns_are_errors() {
        let pool = setup_test_db().await;
        let row = row(&pool).await;

        assert!(matches!(
            get_decimal(&row, "label"),
            Err(RepositoryError::Database(msg)) if msg.contains("TEXT")
        ));
        assert!(matches!(
            get_optional_decimal(&row, "nope"),
            Err(RepositoryError::Database(msg)) if msg.contains("nope")
        ));
    }

    #[test]
    fn converts_to_f64_for_binding() {
        assert_eq!(decimal_to_f64(dec!(65000)), 65000.0);
        assert_eq!(decimal_to_f64(dec!(-0.5)), -0.5);
        assert_eq!(decimal_to_f64(Decimal::ZERO), 0.0);
    }
}
