use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Section headings used to group estimate lines.
pub mod sections {
    pub const BOWL: &str = "Чаша бассейна";
    pub const EQUIPMENT: &str = "Оборудование";
    pub const HEATING: &str = "Подогрев";
    pub const ADDITIONAL: &str = "Дополнительное оборудование";
    pub const INSTALLATION: &str = "Монтажные работы";
    pub const CONSTRUCTION: &str = "Строительные работы";
    pub const MATERIALS: &str = "Строительные материалы";
    pub const DELIVERY: &str = "Доставка";
    pub const OTHER: &str = "Прочее";

    /// Display order of the well-known sections.
    pub const ORDER: [&str; 8] = [
        BOWL,
        EQUIPMENT,
        HEATING,
        ADDITIONAL,
        INSTALLATION,
        CONSTRUCTION,
        MATERIALS,
        DELIVERY,
    ];
}

/// One line of an estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateItem {
    pub id: String,
    #[serde(default)]
    pub section: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit: String,
    pub total: Decimal,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_price: Option<Decimal>,
}

impl EstimateItem {
    pub fn section_or_other(&self) -> &str {
        if self.section.is_empty() {
            sections::OTHER
        } else {
            &self.section
        }
    }
}

/// Groups items by section, keeping the order in which sections first appear.
/// Items without a section land in "Прочее".
pub fn group_by_section(items: &[EstimateItem]) -> Vec<(&str, Vec<&EstimateItem>)> {
    let mut groups: Vec<(&str, Vec<&EstimateItem>)> = Vec::new();
    for item in items {
        let section = item.section_or_other();
        match groups.iter_mut().find(|(name, _)| *name == section) {
            Some((_, group)) => group.push(item),
            None => groups.push((section, vec![item])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn item(
        id: &str,
        section: &str,
    ) -> EstimateItem {
        EstimateItem {
            id: id.to_string(),
            section: section.to_string(),
            name: id.to_string(),
            price: dec!(100),
            quantity: dec!(1),
            unit: "шт".to_string(),
            total: dec!(100),
            kind: None,
            installation_price: None,
        }
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let items = vec![
            item("a", sections::EQUIPMENT),
            item("b", sections::BOWL),
            item("c", sections::EQUIPMENT),
            item("d", ""),
        ];

        let groups = group_by_section(&items);
        let names: Vec<_> = groups.iter().map(|(name, group)| (*name, group.len())).collect();

        assert_eq!(
            names,
            vec![(sections::EQUIPMENT, 2), (sections::BOWL, 1), (sections::OTHER, 1)]
        );
    }
}
