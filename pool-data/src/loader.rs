use std::collections::BTreeMap;
use std::io::Read;

use pool_core::{EstimateRepository, Product, ProductCategory, RepositoryError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading a price list.
#[derive(Debug, Error)]
pub enum CatalogLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown category '{category}' for product '{id}'")]
    UnknownCategory { id: String, category: String },

    #[error("Product without id on row {0}")]
    MissingId(usize),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for CatalogLoaderError {
    fn from(err: csv::Error) -> Self {
        CatalogLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the price-list CSV.
///
/// | column               | required | notes                                     |
/// |----------------------|----------|-------------------------------------------|
/// | `id`                 | yes      | stable product id, replaces on reload     |
/// | `category`           | yes      | `bowls`, `filtration`, `heating`, ...     |
/// | `name`               | yes      |                                           |
/// | `price`              | yes      | roubles                                   |
/// | `unit`               | no       |                                           |
/// | `installation_price` | no       | adds an installation line to the estimate |
/// | `kind`               | no       | e.g. `skimmer`, `heat_pump`               |
/// | `flow_rate`          | no       | m³/h, filtration only                     |
/// | `power`              | no       | kW, heating only                          |
/// | `manufacturer`       | no       |                                           |
/// | `length` `width` `depth` | no   | metres, bowls only                        |
/// | `description`        | no       |                                           |
///
/// Empty cells read as missing values.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub id: String,
    pub category: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub installation_price: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub flow_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub power: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub manufacturer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub length: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub width: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub depth: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
}

impl ProductRecord {
    pub fn to_product(&self) -> Result<Product, CatalogLoaderError> {
        let category = ProductCategory::parse(self.category.trim()).ok_or_else(|| {
            CatalogLoaderError::UnknownCategory {
                id: self.id.clone(),
                category: self.category.clone(),
            }
        })?;

        Ok(Product {
            unit: self.unit.clone(),
            installation_price: self.installation_price,
            kind: self.kind.clone(),
            flow_rate: self.flow_rate,
            power: self.power,
            manufacturer: self.manufacturer.clone(),
            length: self.length,
            width: self.width,
            depth: self.depth,
            description: self.description.clone(),
            ..Product::new(self.id.trim(), category, self.name.trim(), self.price)
        })
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Loader for price lists stored as CSV.
///
/// Products go through the `EstimateRepository` trait, so any registered
/// backend can be filled from the same file.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Parse product records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ProductRecord>, CatalogLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ProductRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Load product records into the repository.
    ///
    /// Every category that appears in `records` is replaced as a whole:
    /// its existing products are deleted and the new ones inserted.
    /// Categories absent from the file are left alone, so loading the same
    /// file twice gives the same catalog.
    ///
    /// All rows are validated before anything is deleted.
    pub async fn load<R: EstimateRepository + ?Sized>(
        repo: &R,
        records: &[ProductRecord],
    ) -> Result<usize, CatalogLoaderError> {
        let mut groups: BTreeMap<ProductCategory, Vec<Product>> = BTreeMap::new();

        for (index, record) in records.iter().enumerate() {
            if record.id.trim().is_empty() {
                // Header is line 1.
                return Err(CatalogLoaderError::MissingId(index + 2));
            }
            let product = record.to_product()?;
            groups.entry(product.category).or_default().push(product);
        }

        let mut inserted = 0;
        for (category, products) in groups {
            let removed = repo.delete_products(category).await?;
            debug!(category = category.as_str(), removed, "Cleared category");

            for product in &products {
                repo.insert_product(product).await?;
                inserted += 1;
            }
            info!(
                category = category.as_str(),
                count = products.len(),
                "Loaded catalog category"
            );
        }

        Ok(inserted)
    }
}
