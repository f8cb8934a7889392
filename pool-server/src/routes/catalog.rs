use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use pool_core::catalog_search::{SearchFilters, suggestions};
use pool_core::{Catalog, Product, ProductCategory};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/catalog", get(catalog))
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    /// Free-text search, e.g. `насос для 50 кубов до 100к`.
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub filters: SearchFilters,
    pub results: Vec<Product>,
    pub explanation: String,
    pub suggestions: Vec<String>,
}

/// Products from the database grouped by step. Groups the database has
/// nothing for fall back to the built-in price list.
///
/// With `q` the same products are searched instead and returned as a flat
/// list with the filters read from the query.
async fn catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Response, AppError> {
    let category = match query.category.as_deref().filter(|c| !c.is_empty()) {
        None => None,
        Some(c) => Some(
            ProductCategory::parse(c)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown category '{c}'")))?,
        ),
    };

    let products = state.repo.list_products(category).await?;
    debug!(count = products.len(), "Catalog products loaded");

    let catalog = Catalog::from_products(products);
    let catalog = match category {
        None => catalog.with_fallback(&Catalog::defaults()),
        Some(_) => catalog,
    };

    let Some(text) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(Json(catalog).into_response());
    };

    let products: Vec<Product> = catalog.products().cloned().collect();
    let filters = SearchFilters::parse(text);
    let results = filters.apply(&products);
    debug!(query = text, found = results.len(), "Catalog searched");

    Ok(Json(SearchResponse {
        explanation: filters.explain(results.len()),
        suggestions: suggestions(text, &products),
        filters,
        results,
    })
    .into_response())
}
