//! Filtration sizing.
//!
//! The whole pool volume has to pass through the filter within the chosen
//! turnover time, so the pump needs at least `⌈V / T⌉` m³/h.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::models::Product;

pub const DEFAULT_TURNOVER_HOURS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnoverOption {
    pub hours: u32,
    pub label: &'static str,
    pub description: &'static str,
}

pub const TURNOVER_OPTIONS: [TurnoverOption; 5] = [
    TurnoverOption {
        hours: 4,
        label: "4 часа",
        description: "Высокая нагрузка (Общественный)",
    },
    TurnoverOption {
        hours: 6,
        label: "6 часов",
        description: "Средняя нагрузка (Частный)",
    },
    TurnoverOption {
        hours: 8,
        label: "8 часов",
        description: "Низкая нагрузка",
    },
    TurnoverOption {
        hours: 12,
        label: "12 часов",
        description: "Эконом",
    },
    TurnoverOption {
        hours: 24,
        label: "24 часа",
        description: "Минимум",
    },
];

pub fn turnover_option(hours: u32) -> Option<&'static TurnoverOption> {
    TURNOVER_OPTIONS.iter().find(|o| o.hours == hours)
}

/// Required pump flow in m³/h; zero for an empty volume or zero turnover.
pub fn required_flow(
    volume: Decimal,
    turnover_hours: u32,
) -> Decimal {
    if volume <= Decimal::ZERO || turnover_hours == 0 {
        return Decimal::ZERO;
    }
    (volume / Decimal::from(turnover_hours)).ceil()
}

/// How well a filtration kit covers the required flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRating {
    /// Flow is at least the required flow.
    Sufficient,
    /// Flow covers at least 80% of the requirement.
    Marginal,
    Insufficient,
    /// The kit has no flow rate or nothing is required.
    Unknown,
}

impl FlowRating {
    pub fn rate(
        flow_rate: Option<Decimal>,
        required: Decimal,
    ) -> Self {
        let Some(flow) = flow_rate else {
            return Self::Unknown;
        };
        if required.is_zero() {
            Self::Unknown
        } else if flow >= required {
            Self::Sufficient
        } else if flow >= required * dec!(0.8) {
            Self::Marginal
        } else {
            Self::Insufficient
        }
    }
}

/// The cheapest kit whose flow covers the requirement.
pub fn recommend(
    options: &[Product],
    required: Decimal,
) -> Option<&Product> {
    options
        .iter()
        .filter(|p| FlowRating::rate(p.flow_rate, required) == FlowRating::Sufficient)
        .min_by_key(|p| p.price)
}
