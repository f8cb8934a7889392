use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Dimensions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Composite,
    Polypropylene,
    Concrete,
    #[serde(other)]
    Other,
}

impl MaterialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Composite => "composite",
            Self::Polypropylene => "polypropylene",
            Self::Concrete => "concrete",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "composite" => Some(Self::Composite),
            "polypropylene" => Some(Self::Polypropylene),
            "concrete" => Some(Self::Concrete),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Bowl material chosen on the first wizard step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(rename = "id")]
    pub kind: MaterialKind,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price_per_cubic_meter: Option<Decimal>,
}

impl Material {
    pub fn new(
        kind: MaterialKind,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            base_price_per_cubic_meter: None,
        }
    }
}

/// A ready-made composite bowl from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bowl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

impl Bowl {
    /// Bowl geometry, available only when all three sizes are known.
    pub fn dimensions(&self) -> Option<Dimensions> {
        Some(Dimensions {
            length: self.length?,
            width: self.width?,
            depth: self.depth?,
            volume: self.volume,
        })
    }

    /// Explicit volume or the product of the known sizes (missing sizes count as zero).
    pub fn volume(&self) -> Decimal {
        match self.volume {
            Some(volume) if !volume.is_zero() => volume,
            _ => {
                self.length.unwrap_or_default()
                    * self.width.unwrap_or_default()
                    * self.depth.unwrap_or_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn material_kind_round_trips_through_str() {
        for kind in [
            MaterialKind::Composite,
            MaterialKind::Polypropylene,
            MaterialKind::Concrete,
            MaterialKind::Other,
        ] {
            assert_eq!(MaterialKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MaterialKind::parse("granite"), None);
    }

    #[test]
    fn unknown_material_id_deserializes_as_other() {
        let material: Material = serde_json::from_str(r#"{"id": "granite", "name": "Гранит"}"#).unwrap();

        assert_eq!(material.kind, MaterialKind::Other);
    }

    #[test]
    fn bowl_dimensions_require_all_sizes() {
        let bowl = Bowl {
            name: "Compass 8".to_string(),
            length: Some(dec!(8)),
            width: Some(dec!(4)),
            ..Bowl::default()
        };

        assert_eq!(bowl.dimensions(), None);
        assert_eq!(bowl.volume(), dec!(0));
    }

    #[test]
    fn bowl_volume_uses_sizes_when_not_given() {
        let bowl = Bowl {
            name: "Compass 8".to_string(),
            length: Some(dec!(8)),
            width: Some(dec!(4)),
            depth: Some(dec!(1.5)),
            ..Bowl::default()
        };

        assert_eq!(bowl.volume(), dec!(48));
        assert_eq!(bowl.dimensions().map(|d| d.volume()), Some(dec!(48)));
    }
}
