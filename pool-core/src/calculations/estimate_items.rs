//! Turns a [`Selection`] into estimate line items.
//!
//! Lines are produced in this order:
//!
//! 1. the bowl: the catalog price of a composite bowl, or for polypropylene
//!    the welded bowl at `volume × base price` (15 000 per m³ by default);
//! 2. the filtration kit;
//! 3. embedded parts, one line per part. Skimmers are counted as ⌈V / 25⌉
//!    and nozzles as ⌈V / 7⌉ when the volume is known;
//! 4. the heater, or each item of a heating kit;
//! 5. additional options;
//! 6. selected works, priced at `total / quantity`;
//! 7. installation of parts, the heater and options that carry an
//!    installation price; an option is installed once whatever its quantity.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::round_half_up;
use crate::models::{Equipment, EstimateItem, MaterialKind, Selection, sections};

const DEFAULT_POLYPROPYLENE_PRICE: Decimal = dec!(15000);

fn line(
    id: impl Into<String>,
    section: &str,
    name: impl Into<String>,
    price: Decimal,
    quantity: Decimal,
    unit: &str,
) -> EstimateItem {
    EstimateItem {
        id: id.into(),
        section: section.to_string(),
        name: name.into(),
        price,
        quantity,
        unit: unit.to_string(),
        total: round_half_up(price * quantity),
        kind: None,
        installation_price: None,
    }
}

/// Quantity of an embedded part, scaled by volume for skimmers and nozzles.
pub fn part_quantity(
    part: &Equipment,
    volume: Decimal,
) -> Decimal {
    match part.part_kind() {
        Some(kind) if volume > Decimal::ZERO => (volume / kind.volume_per_unit()).ceil(),
        _ => part.quantity_or_one(),
    }
}

pub fn generate_estimate_items(selection: &Selection) -> Vec<EstimateItem> {
    let volume = selection.volume();
    let mut items = Vec::new();

    bowl_lines(selection, volume, &mut items);

    if let Some(filtration) = &selection.filtration {
        items.push(line(
            "filtration_main",
            sections::EQUIPMENT,
            filtration.display_name("Фильтрация"),
            filtration.unit_price(),
            Decimal::ONE,
            "шт",
        ));
    }

    if let Some(parts) = &selection.parts {
        if parts.has_items() {
            for (idx, part) in parts.items.iter().enumerate() {
                let mut item = line(
                    format!("part_{idx}"),
                    sections::EQUIPMENT,
                    part.display_name("Деталь"),
                    part.unit_price(),
                    part_quantity(part, volume),
                    "шт",
                );
                item.kind = part.kind.clone();
                item.installation_price = part.installation_price;
                items.push(item);
            }
        } else if let Some(name) = parts.name.as_deref().filter(|n| !n.is_empty()) {
            items.push(line(
                "parts_main",
                sections::EQUIPMENT,
                name,
                parts.price.unwrap_or_default(),
                Decimal::ONE,
                "компл",
            ));
        }
    }

    if let Some(heating) = &selection.heating {
        if heating.has_items() {
            for (idx, heater) in heating.items.iter().enumerate() {
                items.push(line(
                    format!("heat_{idx}"),
                    sections::HEATING,
                    heater.display_name("Нагреватель"),
                    heater.unit_price(),
                    heater.quantity_or_one(),
                    "шт",
                ));
            }
        } else {
            items.push(line(
                "heating_main",
                sections::HEATING,
                heating.display_name("Нагреватель"),
                heating.unit_price(),
                Decimal::ONE,
                "шт",
            ));
        }
    }

    for (idx, option) in selection.additional.iter().enumerate() {
        let mut item = line(
            format!("add_{idx}"),
            sections::ADDITIONAL,
            option.display_name("Оборудование"),
            option.unit_price(),
            option.quantity_or_one(),
            "шт",
        );
        item.installation_price = option.installation_price;
        items.push(item);
    }

    for work in selection.works.values() {
        let quantity = if work.quantity.is_zero() {
            Decimal::ONE
        } else {
            work.quantity
        };
        let unit = if work.unit.is_empty() { "ед" } else { work.unit.as_str() };
        let mut item = line(
            format!("work_{}", work.id),
            sections::CONSTRUCTION,
            work.name.clone(),
            round_half_up(work.total / quantity),
            quantity,
            unit,
        );
        item.total = work.total;
        items.push(item);
    }

    installation_lines(selection, volume, &mut items);

    items
}

fn bowl_lines(
    selection: &Selection,
    volume: Decimal,
    items: &mut Vec<EstimateItem>,
) {
    let kind = selection.material_kind();

    if let Some(bowl) = &selection.bowl {
        if matches!(kind, None | Some(MaterialKind::Composite)) {
            items.push(line(
                "bowl_price",
                sections::BOWL,
                bowl.name.clone(),
                bowl.price,
                Decimal::ONE,
                "шт",
            ));
            return;
        }
    }

    let (Some(material), Some(_)) = (&selection.material, &selection.dimensions) else {
        return;
    };
    if material.kind == MaterialKind::Polypropylene {
        let price = material
            .base_price_per_cubic_meter
            .filter(|p| !p.is_zero())
            .unwrap_or(DEFAULT_POLYPROPYLENE_PRICE);
        items.push(line(
            "bowl_poly_weld",
            sections::BOWL,
            format!("Изготовление чаши из полипропилена ({})", material.name),
            price,
            volume,
            "м³",
        ));
    }
}

fn installation_lines(
    selection: &Selection,
    volume: Decimal,
    items: &mut Vec<EstimateItem>,
) {
    if let Some(parts) = &selection.parts {
        for (idx, part) in parts.items.iter().enumerate() {
            if let Some(price) = part.installation() {
                items.push(line(
                    format!("inst_part_{idx}"),
                    sections::INSTALLATION,
                    format!("Монтаж: {}", part.display_name("Деталь")),
                    price,
                    part_quantity(part, volume),
                    "шт",
                ));
            }
        }
    }

    if let Some(price) = selection.heating.as_ref().and_then(Equipment::installation) {
        items.push(line(
            "inst_heat",
            sections::INSTALLATION,
            "Монтаж нагревателя",
            price,
            Decimal::ONE,
            "шт",
        ));
    }

    for (idx, option) in selection.additional.iter().enumerate() {
        if let Some(price) = option.installation() {
            items.push(line(
                format!("inst_add_{idx}"),
                sections::INSTALLATION,
                format!("Монтаж: {}", option.display_name("Оборудование")),
                price,
                Decimal::ONE,
                "шт",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::calculations::works::calculate_auto_works;
    use crate::models::{Bowl, Dimensions, Material};

    fn part(
        name: &str,
        kind: &str,
        price: Decimal,
        installation: Option<Decimal>,
    ) -> Equipment {
        Equipment {
            name: Some(name.to_string()),
            kind: Some(kind.to_string()),
            price: Some(price),
            installation_price: installation,
            ..Equipment::default()
        }
    }

    fn composite_bowl() -> Bowl {
        Bowl {
            id: Some("compass_8".to_string()),
            name: "Композитная чаша 8×4".to_string(),
            price: dec!(1200000),
            length: Some(dec!(8)),
            width: Some(dec!(4)),
            depth: Some(dec!(1.5)),
            ..Bowl::default()
        }
    }

    fn ids(items: &[EstimateItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn empty_selection_has_no_items() {
        assert!(generate_estimate_items(&Selection::default()).is_empty());
    }

    #[test]
    fn bowl_without_material_counts_as_composite() {
        let selection = Selection {
            bowl: Some(composite_bowl()),
            ..Selection::default()
        };

        let items = generate_estimate_items(&selection);

        assert_eq!(ids(&items), vec!["bowl_price"]);
        assert_eq!(items[0].section, sections::BOWL);
        assert_eq!(items[0].total, dec!(1200000));
    }

    #[test]
    fn polypropylene_bowl_is_priced_by_volume() {
        let selection = Selection {
            material: Some(Material::new(MaterialKind::Polypropylene, "PP 8 мм")),
            dimensions: Some(Dimensions::new(dec!(6), dec!(3), dec!(1.5))),
            ..Selection::default()
        };

        let items = generate_estimate_items(&selection);

        assert_eq!(items[0].id, "bowl_poly_weld");
        assert_eq!(items[0].name, "Изготовление чаши из полипропилена (PP 8 мм)");
        assert_eq!(items[0].quantity, dec!(27));
        assert_eq!(items[0].total, dec!(405000));
    }

    #[test]
    fn polypropylene_uses_material_base_price() {
        let mut material = Material::new(MaterialKind::Polypropylene, "PP");
        material.base_price_per_cubic_meter = Some(dec!(18000));
        let selection = Selection {
            material: Some(material),
            dimensions: Some(Dimensions::new(dec!(5), dec!(2), dec!(1))),
            ..Selection::default()
        };

        let items = generate_estimate_items(&selection);

        assert_eq!(items[0].total, dec!(180000));
    }

    #[test]
    fn concrete_pool_has_no_bowl_line() {
        let selection = Selection {
            material: Some(Material::new(MaterialKind::Concrete, "Бетон")),
            dimensions: Some(Dimensions::new(dec!(8), dec!(4), dec!(1.5))),
            ..Selection::default()
        };

        assert!(generate_estimate_items(&selection).is_empty());
    }

    #[test]
    fn skimmers_and_nozzles_scale_with_volume() {
        let selection = Selection {
            dimensions: Some(Dimensions::new(dec!(8), dec!(4), dec!(1.5))),
            parts: Some(Equipment {
                items: vec![
                    part("Скиммер", "skimmer", dec!(12000), Some(dec!(3000))),
                    part("Форсунка", "nozzle", dec!(2500), None),
                    part("Прожектор", "light", dec!(9000), None),
                ],
                ..Equipment::default()
            }),
            ..Selection::default()
        };

        let items = generate_estimate_items(&selection);

        // 48 m³: 2 skimmers, 7 nozzles
        assert_eq!(items[0].quantity, dec!(2));
        assert_eq!(items[0].total, dec!(24000));
        assert_eq!(items[0].kind.as_deref(), Some("skimmer"));
        assert_eq!(items[1].quantity, dec!(7));
        assert_eq!(items[1].total, dec!(17500));
        assert_eq!(items[2].quantity, dec!(1));
        let install = items.iter().find(|i| i.id == "inst_part_0").unwrap();
        assert_eq!(install.name, "Монтаж: Скиммер");
        assert_eq!(install.quantity, dec!(2));
        assert_eq!(install.total, dec!(6000));
    }

    #[test]
    fn parts_kit_without_items_is_one_set() {
        let selection = Selection {
            parts: Some(Equipment::named("Комплект закладных", dec!(60000))),
            ..Selection::default()
        };

        let items = generate_estimate_items(&selection);

        assert_eq!(ids(&items), vec!["parts_main"]);
        assert_eq!(items[0].unit, "компл");
    }

    #[test]
    fn heater_and_its_installation() {
        let mut heater = Equipment::named("Теплообменник 40 кВт", dec!(65000));
        heater.installation_price = Some(dec!(10000));
        let selection = Selection {
            heating: Some(heater),
            ..Selection::default()
        };

        let items = generate_estimate_items(&selection);

        assert_eq!(ids(&items), vec!["heating_main", "inst_heat"]);
        assert_eq!(items[1].name, "Монтаж нагревателя");
        assert_eq!(items[1].total, dec!(10000));
    }

    #[test]
    fn additional_options_respect_quantity_but_install_once() {
        let mut lamp = Equipment::named("УФ-установка", dec!(45000));
        lamp.quantity = Some(dec!(2));
        lamp.installation_price = Some(dec!(8000));
        let robot = Equipment {
            installation_price: Some(dec!(0)),
            ..Equipment::named("Робот-пылесос", dec!(85000))
        };
        let selection = Selection {
            additional: vec![lamp, robot],
            ..Selection::default()
        };

        let items = generate_estimate_items(&selection);

        assert_eq!(ids(&items), vec!["add_0", "add_1", "inst_add_0"]);
        assert_eq!(items[0].total, dec!(90000));
        // One installation regardless of how many units are ordered.
        assert_eq!(items[2].quantity, Decimal::ONE);
        assert_eq!(items[2].total, dec!(8000));
    }

    #[test]
    fn works_are_priced_per_unit_from_total() {
        let selection = Selection {
            dimensions: Some(Dimensions::new(dec!(8), dec!(4), dec!(1.5))),
            ..Selection::default()
        };
        let selection = Selection {
            works: calculate_auto_works(&selection),
            ..selection
        };

        let items = generate_estimate_items(&selection);
        let excavation = items.iter().find(|i| i.id == "work_excavation").unwrap();

        assert_eq!(excavation.section, sections::CONSTRUCTION);
        assert_eq!(excavation.price, dec!(1500));
        assert_eq!(excavation.quantity, dec!(81));
        assert_eq!(excavation.total, dec!(121500));
        assert_eq!(items.len(), 10);
    }
}
