//! Delivery cost by distance from the warehouse.
//!
//! | Distance       | Cost                          |
//! |----------------|-------------------------------|
//! | up to 10 km    | 2 000                         |
//! | up to 50 km    | 2 000 + 100 per km over 10    |
//! | up to 100 km   | 6 000 + 80 per km over 50     |
//! | beyond 100 km  | 10 000 + 60 per km over 100   |
//!
//! Costs are rounded to whole roubles.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::round_whole;
use crate::models::{EstimateItem, sections};

/// Delivery cost for `distance_km`; `None` when the distance is not positive.
pub fn delivery_cost(distance_km: Decimal) -> Option<Decimal> {
    if distance_km <= Decimal::ZERO {
        return None;
    }

    let cost = if distance_km <= dec!(10) {
        dec!(2000)
    } else if distance_km <= dec!(50) {
        dec!(2000) + (distance_km - dec!(10)) * dec!(100)
    } else if distance_km <= dec!(100) {
        dec!(6000) + (distance_km - dec!(50)) * dec!(80)
    } else {
        dec!(10000) + (distance_km - dec!(100)) * dec!(60)
    };

    Some(round_whole(cost))
}

pub fn delivery_item(
    distance_km: Decimal,
    address: Option<&str>,
) -> Option<EstimateItem> {
    let cost = delivery_cost(distance_km)?;
    let name = match address.map(str::trim).filter(|a| !a.is_empty()) {
        Some(address) => format!("Доставка: {address} ({} км)", distance_km.normalize()),
        None => format!("Доставка ({} км)", distance_km.normalize()),
    };

    Some(EstimateItem {
        id: "delivery".to_string(),
        section: sections::DELIVERY.to_string(),
        name,
        price: cost,
        quantity: Decimal::ONE,
        unit: "усл".to_string(),
        total: cost,
        kind: None,
        installation_price: None,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn non_positive_distance_has_no_cost() {
        assert_eq!(delivery_cost(dec!(0)), None);
        assert_eq!(delivery_cost(dec!(-3)), None);
    }

    #[test]
    fn tiers() {
        assert_eq!(delivery_cost(dec!(5)), Some(dec!(2000)));
        assert_eq!(delivery_cost(dec!(10)), Some(dec!(2000)));
        assert_eq!(delivery_cost(dec!(30)), Some(dec!(4000)));
        assert_eq!(delivery_cost(dec!(50)), Some(dec!(6000)));
        assert_eq!(delivery_cost(dec!(75)), Some(dec!(8000)));
        assert_eq!(delivery_cost(dec!(100)), Some(dec!(10000)));
        assert_eq!(delivery_cost(dec!(150)), Some(dec!(13000)));
    }

    #[test]
    fn fractional_distance_is_rounded_to_roubles() {
        // 2000 + 2.345 × 100 = 2234.5
        assert_eq!(delivery_cost(dec!(12.345)), Some(dec!(2235)));
    }

    #[test]
    fn delivery_line_names_the_address() {
        let item = delivery_item(dec!(30), Some(" Истра, ул. Лесная, 5 ")).unwrap();

        assert_eq!(item.name, "Доставка: Истра, ул. Лесная, 5 (30 км)");
        assert_eq!(item.section, sections::DELIVERY);
        assert_eq!(item.total, dec!(4000));
        assert!(delivery_item(dec!(0), None).is_none());
    }
}
