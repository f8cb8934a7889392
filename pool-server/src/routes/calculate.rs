use std::collections::BTreeMap;

use axum::routing::post;
use axum::{Json, Router};
use pool_core::calculations::{EstimateSummary, PoolMetrics, WorksEditor, delivery_item};
use pool_core::{EstimateItem, Selection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/calculate", post(calculate))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInput {
    pub distance_km: Decimal,
    #[serde(default)]
    pub address: Option<String>,
}

/// A selection plus the extras entered on the estimate page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimateInput {
    pub selection: Selection,
    pub custom_items: Vec<EstimateItem>,
    pub delivery: Option<DeliveryInput>,
    pub price_overrides: BTreeMap<String, Decimal>,
    /// Refresh auto-calculated works from the current geometry first.
    pub sync_works: bool,
}

impl EstimateInput {
    /// The selection actually priced, with works refreshed when asked.
    pub fn priced_selection(&self) -> Selection {
        let mut selection = self.selection.clone();
        if self.sync_works {
            selection.works = WorksEditor::from_selection(&selection).into_works();
        }
        selection
    }

    pub fn summary(
        &self,
        selection: &Selection,
    ) -> EstimateSummary {
        let delivery = self
            .delivery
            .as_ref()
            .and_then(|d| delivery_item(d.distance_km, d.address.as_deref()));

        EstimateSummary::new(selection)
            .with_custom_items(self.custom_items.clone())
            .with_delivery(delivery)
            .with_price_overrides(self.price_overrides.clone())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTotal {
    pub section: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    pub items: Vec<EstimateItem>,
    pub total: Decimal,
    pub section_totals: Vec<SectionTotal>,
    pub selection: Selection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PoolMetrics>,
}

async fn calculate(Json(input): Json<EstimateInput>) -> Json<CalculateResponse> {
    let selection = input.priced_selection();
    let summary = input.summary(&selection);
    let metrics = selection
        .effective_dimensions()
        .filter(|d| !d.is_empty())
        .map(|d| PoolMetrics::from_dimensions(&d));

    let response = CalculateResponse {
        items: summary.all_items(),
        total: summary.total(),
        section_totals: summary
            .section_totals()
            .into_iter()
            .map(|(section, total)| SectionTotal { section, total })
            .collect(),
        selection,
        metrics,
    };
    debug!(items = response.items.len(), total = %response.total, "Estimate calculated");
    Json(response)
}
