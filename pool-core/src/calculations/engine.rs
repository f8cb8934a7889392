//! Pool geometry and planning figures shown next to an estimate.
//!
//! | Figure            | Formula                                        |
//! |-------------------|------------------------------------------------|
//! | volume            | L × W × D, one decimal                         |
//! | surface area      | L × W + 2 × (L + W) × D, one decimal           |
//! | heating power     | 0.5 kW per m³, one decimal                     |
//! | labor hours       | 20 h per m³, at least 40                       |
//! | timeline (days)   | 7 + ⌈2 × V⌉ + ⌈1.5 × V⌉                        |
//! | materials         | concrete V + 10%, tiles area + 5%, waterproofing area + 10% |
//!
//! Volume discounts: 3% from 50 m³, 5% from 100 m³, 8% from 200 m³.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::calculations::common::max;
use crate::calculations::filtration::{DEFAULT_TURNOVER_HOURS, required_flow};
use crate::models::Dimensions;

const VOLUME_DISCOUNTS: [(Decimal, Decimal); 3] = [
    (dec!(200), dec!(0.08)),
    (dec!(100), dec!(0.05)),
    (dec!(50), dec!(0.03)),
];

fn round_one(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

pub fn pool_volume(dims: &Dimensions) -> Decimal {
    round_one(dims.volume())
}

/// Bottom plus walls.
pub fn surface_area(dims: &Dimensions) -> Decimal {
    round_one(dims.area() + dims.perimeter() * dims.depth)
}

pub fn required_heating_kw(volume: Decimal) -> Decimal {
    round_one(volume * dec!(0.5))
}

pub fn labor_hours(volume: Decimal) -> Decimal {
    max(volume * dec!(20), dec!(40))
}

pub fn project_timeline_days(volume: Decimal) -> Decimal {
    dec!(7) + (volume * dec!(2)).ceil() + (volume * dec!(1.5)).ceil()
}

/// Share of the subtotal discounted for large pools.
pub fn volume_discount_rate(volume: Decimal) -> Decimal {
    VOLUME_DISCOUNTS
        .iter()
        .find(|(min_volume, _)| volume >= *min_volume)
        .map_or(Decimal::ZERO, |(_, rate)| *rate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialQuantities {
    pub concrete: Decimal,
    pub tiles: Decimal,
    pub waterproofing: Decimal,
}

impl MaterialQuantities {
    pub fn for_dimensions(dims: &Dimensions) -> Self {
        let area = dims.area() + dims.perimeter() * dims.depth;
        Self {
            concrete: round_one(dims.volume() * dec!(1.1)),
            tiles: round_one(area * dec!(1.05)),
            waterproofing: round_one(area * dec!(1.1)),
        }
    }
}

/// Planning figures for one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMetrics {
    pub volume: Decimal,
    pub surface_area: Decimal,
    pub required_flow: Decimal,
    pub required_heating_kw: Decimal,
    pub labor_hours: Decimal,
    pub timeline_days: Decimal,
    pub volume_discount_rate: Decimal,
    pub materials: MaterialQuantities,
}

impl PoolMetrics {
    pub fn from_dimensions(dims: &Dimensions) -> Self {
        let volume = pool_volume(dims);
        Self {
            volume,
            surface_area: surface_area(dims),
            required_flow: required_flow(volume, DEFAULT_TURNOVER_HOURS),
            required_heating_kw: required_heating_kw(volume),
            labor_hours: labor_hours(volume),
            timeline_days: project_timeline_days(volume),
            volume_discount_rate: volume_discount_rate(volume),
            materials: MaterialQuantities::for_dimensions(dims),
        }
    }
}
