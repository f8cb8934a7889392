use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkCategory {
    Earthworks,
    Foundation,
    Installation,
    Finishing,
    Additional,
}

impl WorkCategory {
    pub const ALL: [WorkCategory; 5] = [
        Self::Earthworks,
        Self::Foundation,
        Self::Installation,
        Self::Finishing,
        Self::Additional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Earthworks => "earthworks",
            Self::Foundation => "foundation",
            Self::Installation => "installation",
            Self::Finishing => "finishing",
            Self::Additional => "additional",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "earthworks" => Some(Self::Earthworks),
            "foundation" => Some(Self::Foundation),
            "installation" => Some(Self::Installation),
            "finishing" => Some(Self::Finishing),
            "additional" => Some(Self::Additional),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Earthworks => "Земляные работы",
            Self::Foundation => "Фундамент",
            Self::Installation => "Монтаж",
            Self::Finishing => "Отделка",
            Self::Additional => "Дополнительно",
        }
    }
}

/// A construction work included in the estimate.
///
/// `manual` is set once the quantity was typed in by hand; such entries are
/// never overwritten by the auto formulas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedWork {
    pub id: String,
    pub name: String,
    pub category: WorkCategory,
    pub unit: String,
    pub quantity: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub manual: bool,
}
