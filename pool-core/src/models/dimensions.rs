use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inner pool dimensions in metres.
///
/// `volume` is only present when the sales manager typed it explicitly;
/// otherwise it is derived from the three sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    #[serde(default)]
    pub length: Decimal,
    #[serde(default)]
    pub width: Decimal,
    #[serde(default)]
    pub depth: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
}

impl Dimensions {
    pub fn new(
        length: Decimal,
        width: Decimal,
        depth: Decimal,
    ) -> Self {
        Self {
            length,
            width,
            depth,
            volume: None,
        }
    }

    /// Explicit volume when set (and non-zero), otherwise `L × W × D`.
    pub fn volume(&self) -> Decimal {
        match self.volume {
            Some(volume) if !volume.is_zero() => volume,
            _ => self.length * self.width * self.depth,
        }
    }

    /// Water surface area, `L × W`.
    pub fn area(&self) -> Decimal {
        self.length * self.width
    }

    pub fn perimeter(&self) -> Decimal {
        (self.length + self.width) * Decimal::TWO
    }

    pub fn is_empty(&self) -> bool {
        self.length.is_zero() && self.width.is_zero() && self.depth.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn volume_is_derived_from_sizes() {
        let dims = Dimensions::new(dec!(8), dec!(4), dec!(1.5));

        assert_eq!(dims.volume(), dec!(48));
    }

    #[test]
    fn explicit_volume_wins() {
        let dims = Dimensions {
            volume: Some(dec!(45)),
            ..Dimensions::new(dec!(8), dec!(4), dec!(1.5))
        };

        assert_eq!(dims.volume(), dec!(45));
    }

    #[test]
    fn zero_explicit_volume_falls_back_to_sizes() {
        let dims = Dimensions {
            volume: Some(dec!(0)),
            ..Dimensions::new(dec!(2), dec!(2), dec!(1))
        };

        assert_eq!(dims.volume(), dec!(4));
    }

    #[test]
    fn area_and_perimeter() {
        let dims = Dimensions::new(dec!(10), dec!(5), dec!(1.6));

        assert_eq!(dims.area(), dec!(50));
        assert_eq!(dims.perimeter(), dec!(30));
    }

    #[test]
    fn deserializes_from_numbers() {
        let dims: Dimensions =
            serde_json::from_str(r#"{"length": 6, "width": 3, "depth": 1.5}"#).unwrap();

        assert_eq!(dims.volume(), dec!(27));
        assert!(!dims.is_empty());
    }
}
