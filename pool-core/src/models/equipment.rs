use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A piece of equipment or a kit of them.
///
/// The same shape is used for the filtration kit, the heater, the embedded
/// parts group and every additional option. Kits list their parts in
/// `items`; single products leave it empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Equipment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installation_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<Decimal>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Equipment>,
}

/// Embedded parts whose quantity depends on the pool volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// One skimmer per 25 m³.
    Skimmer,
    /// One return nozzle per 7 m³.
    Nozzle,
}

impl PartKind {
    pub fn volume_per_unit(&self) -> Decimal {
        match self {
            Self::Skimmer => Decimal::from(25),
            Self::Nozzle => Decimal::from(7),
        }
    }
}

impl Equipment {
    pub fn named(
        name: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            ..Self::default()
        }
    }

    /// `price`, then `unit_price`, then zero. A zero `price` counts as unset.
    pub fn unit_price(&self) -> Decimal {
        self.price
            .filter(|p| !p.is_zero())
            .or(self.unit_price)
            .unwrap_or_default()
    }

    /// Quantity as entered, or one when it is missing or zero.
    pub fn quantity_or_one(&self) -> Decimal {
        self.quantity
            .filter(|q| !q.is_zero())
            .unwrap_or(Decimal::ONE)
    }

    /// Installation price when one is set and non-zero.
    pub fn installation(&self) -> Option<Decimal> {
        self.installation_price.filter(|p| !p.is_zero())
    }

    pub fn display_name<'a>(
        &'a self,
        fallback: &'a str,
    ) -> &'a str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.model.as_deref().filter(|m| !m.is_empty()))
            .unwrap_or(fallback)
    }

    pub fn part_kind(&self) -> Option<PartKind> {
        match self.kind.as_deref() {
            Some("skimmer") => Some(PartKind::Skimmer),
            Some("nozzle") => Some(PartKind::Nozzle),
            _ => None,
        }
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn unit_price_prefers_price_then_unit_price() {
        let both = Equipment {
            price: Some(dec!(100)),
            unit_price: Some(dec!(90)),
            ..Equipment::default()
        };
        let zero_price = Equipment {
            price: Some(dec!(0)),
            unit_price: Some(dec!(90)),
            ..Equipment::default()
        };

        assert_eq!(both.unit_price(), dec!(100));
        assert_eq!(zero_price.unit_price(), dec!(90));
        assert_eq!(Equipment::default().unit_price(), dec!(0));
    }

    #[test]
    fn display_name_falls_back_to_model_then_default() {
        let model_only = Equipment {
            model: Some("AquaViva P-350".to_string()),
            ..Equipment::default()
        };

        assert_eq!(model_only.display_name("Фильтрация"), "AquaViva P-350");
        assert_eq!(Equipment::default().display_name("Фильтрация"), "Фильтрация");
    }

    #[test]
    fn part_kind_is_read_from_type() {
        let skimmer: Equipment = serde_json::from_str(r#"{"name": "Скиммер", "type": "skimmer"}"#).unwrap();

        assert_eq!(skimmer.part_kind(), Some(PartKind::Skimmer));
        assert_eq!(Equipment::default().part_kind(), None);
    }

    #[test]
    fn quantity_defaults_to_one() {
        let zero = Equipment {
            quantity: Some(dec!(0)),
            ..Equipment::default()
        };

        assert_eq!(zero.quantity_or_one(), dec!(1));
        assert_eq!(Equipment::default().quantity_or_one(), dec!(1));
    }
}
