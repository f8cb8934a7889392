//! Estimate totals.
//!
//! The total of an estimate is always the sum of its generated lines, the
//! custom lines added by hand and the delivery line. A price override
//! replaces the unit price of one line; the line total then becomes
//! `max(0, price) × max(0, quantity)` rounded to kopecks.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{max, round_half_up};
use crate::calculations::estimate_items::generate_estimate_items;
use crate::models::{EstimateItem, Selection, group_by_section, sections};

/// Line total after applying a price override, if one exists for the line.
pub fn line_total(
    item: &EstimateItem,
    price_overrides: &BTreeMap<String, Decimal>,
) -> Decimal {
    match price_overrides.get(&item.id) {
        Some(price) => round_half_up(max(*price, Decimal::ZERO) * max(item.quantity, Decimal::ZERO)),
        None => item.total,
    }
}

pub fn calculate_total(
    items: &[EstimateItem],
    price_overrides: &BTreeMap<String, Decimal>,
) -> Decimal {
    items.iter().map(|item| line_total(item, price_overrides)).sum()
}

/// A line typed in by the manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomItem {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub unit: Option<String>,
    pub price: Decimal,
    /// Section the line is shown in; "Дополнительное оборудование" when unset.
    #[serde(default)]
    pub category: Option<String>,
}

/// Partial update of a custom line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomItemUpdate {
    pub name: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub price: Option<Decimal>,
}

/// Custom lines of the estimate being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomItems {
    items: Vec<EstimateItem>,
    next_id: u64,
}

impl CustomItems {
    pub fn from_items(items: Vec<EstimateItem>) -> Self {
        let next_id = items
            .iter()
            .filter_map(|i| i.id.strip_prefix("custom-")?.parse::<u64>().ok())
            .max()
            .map_or(0, |n| n + 1);
        Self { items, next_id }
    }

    pub fn add(
        &mut self,
        item: CustomItem,
    ) -> &EstimateItem {
        let quantity = item.quantity.filter(|q| !q.is_zero()).unwrap_or(Decimal::ONE);
        let id = format!("custom-{}", self.next_id);
        self.next_id += 1;

        self.items.push(EstimateItem {
            id,
            section: item
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| sections::ADDITIONAL.to_string()),
            name: item.name,
            price: item.price,
            quantity,
            unit: item.unit.filter(|u| !u.is_empty()).unwrap_or_else(|| "шт".to_string()),
            total: round_half_up(quantity * item.price),
            kind: None,
            installation_price: None,
        });
        &self.items[self.items.len() - 1]
    }

    pub fn update(
        &mut self,
        id: &str,
        update: CustomItemUpdate,
    ) -> Option<&EstimateItem> {
        let item = self.items.iter_mut().find(|i| i.id == id)?;
        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(unit) = update.unit {
            item.unit = unit;
        }
        if let Some(quantity) = update.quantity {
            item.quantity = quantity;
        }
        if let Some(price) = update.price {
            item.price = price;
        }
        item.total = round_half_up(item.quantity * item.price);
        Some(&*item)
    }

    pub fn remove(
        &mut self,
        id: &str,
    ) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[EstimateItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<EstimateItem> {
        self.items
    }
}

/// Everything that makes up the estimate total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateSummary {
    pub items: Vec<EstimateItem>,
    #[serde(default)]
    pub custom_items: Vec<EstimateItem>,
    #[serde(default)]
    pub delivery: Option<EstimateItem>,
    #[serde(default)]
    pub price_overrides: BTreeMap<String, Decimal>,
}

impl EstimateSummary {
    pub fn new(selection: &Selection) -> Self {
        Self {
            items: generate_estimate_items(selection),
            ..Self::default()
        }
    }

    pub fn with_custom_items(
        mut self,
        custom_items: Vec<EstimateItem>,
    ) -> Self {
        self.custom_items = custom_items;
        self
    }

    pub fn with_delivery(
        mut self,
        delivery: Option<EstimateItem>,
    ) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn with_price_overrides(
        mut self,
        price_overrides: BTreeMap<String, Decimal>,
    ) -> Self {
        self.price_overrides = price_overrides;
        self
    }

    pub fn set_price(
        &mut self,
        id: impl Into<String>,
        price: Decimal,
    ) {
        self.price_overrides.insert(id.into(), price);
    }

    fn raw_items(&self) -> impl Iterator<Item = &EstimateItem> {
        self.items
            .iter()
            .chain(&self.custom_items)
            .chain(self.delivery.as_ref())
    }

    /// Every line in display order with price overrides applied.
    pub fn all_items(&self) -> Vec<EstimateItem> {
        self.raw_items()
            .map(|item| match self.price_overrides.get(&item.id) {
                Some(price) => EstimateItem {
                    price: max(*price, Decimal::ZERO),
                    total: line_total(item, &self.price_overrides),
                    ..item.clone()
                },
                None => item.clone(),
            })
            .collect()
    }

    pub fn total(&self) -> Decimal {
        self.raw_items()
            .map(|item| line_total(item, &self.price_overrides))
            .sum()
    }

    /// Totals per section in first-appearance order.
    pub fn section_totals(&self) -> Vec<(String, Decimal)> {
        let items = self.all_items();
        group_by_section(&items)
            .into_iter()
            .map(|(section, group)| (section.to_string(), group.iter().map(|i| i.total).sum()))
            .collect()
    }
}
