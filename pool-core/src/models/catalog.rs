use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{Bowl, Equipment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Bowls,
    Filtration,
    Heating,
    Parts,
    Additional,
    Accessories,
    Chemicals,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bowls => "bowls",
            Self::Filtration => "filtration",
            Self::Heating => "heating",
            Self::Parts => "parts",
            Self::Additional => "additional",
            Self::Accessories => "accessories",
            Self::Chemicals => "chemicals",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bowls" => Some(Self::Bowls),
            "filtration" => Some(Self::Filtration),
            "heating" => Some(Self::Heating),
            "parts" => Some(Self::Parts),
            "additional" => Some(Self::Additional),
            "accessories" => Some(Self::Accessories),
            "chemicals" => Some(Self::Chemicals),
            _ => None,
        }
    }

    /// The catalog group a product of this category is shown in.
    /// Accessories are offered together with the additional options.
    pub fn group(&self) -> ProductCategory {
        match self {
            Self::Accessories => Self::Additional,
            other => *other,
        }
    }
}

/// A price-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub category: ProductCategory,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_price: Option<Decimal>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        category: ProductCategory,
        name: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            name: name.into(),
            price,
            unit: None,
            installation_price: None,
            kind: None,
            flow_rate: None,
            power: None,
            manufacturer: None,
            length: None,
            width: None,
            depth: None,
            description: None,
        }
    }

    fn with_installation(
        mut self,
        installation_price: Decimal,
    ) -> Self {
        self.installation_price = Some(installation_price);
        self
    }

    fn with_flow_rate(
        mut self,
        flow_rate: Decimal,
    ) -> Self {
        self.flow_rate = Some(flow_rate);
        self
    }

    fn with_power(
        mut self,
        power: Decimal,
    ) -> Self {
        self.power = Some(power);
        self
    }

    /// The product as it is stored in a selection.
    pub fn to_equipment(&self) -> Equipment {
        Equipment {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
            kind: self.kind.clone(),
            category: Some(self.category.as_str().to_string()),
            price: Some(self.price),
            installation_price: self.installation_price,
            flow_rate: self.flow_rate,
            power: self.power,
            ..Equipment::default()
        }
    }

    pub fn to_bowl(&self) -> Bowl {
        Bowl {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            price: self.price,
            length: self.length,
            width: self.width,
            depth: self.depth,
            volume: None,
            manufacturer: self.manufacturer.clone(),
        }
    }
}

/// Products grouped the way the configurator steps consume them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub bowls: Vec<Product>,
    pub filtration: Vec<Product>,
    pub heating: Vec<Product>,
    pub parts: Vec<Product>,
    pub additional: Vec<Product>,
    pub chemicals: Vec<Product>,
}

impl Catalog {
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Self::default();
        for product in products {
            let group = product.category.group();
            catalog.group_mut(group).push(product);
        }
        catalog
    }

    pub fn group(
        &self,
        category: ProductCategory,
    ) -> &[Product] {
        match category.group() {
            ProductCategory::Bowls => &self.bowls,
            ProductCategory::Filtration => &self.filtration,
            ProductCategory::Heating => &self.heating,
            ProductCategory::Parts => &self.parts,
            ProductCategory::Chemicals => &self.chemicals,
            ProductCategory::Additional | ProductCategory::Accessories => &self.additional,
        }
    }

    fn group_mut(
        &mut self,
        category: ProductCategory,
    ) -> &mut Vec<Product> {
        match category.group() {
            ProductCategory::Bowls => &mut self.bowls,
            ProductCategory::Filtration => &mut self.filtration,
            ProductCategory::Heating => &mut self.heating,
            ProductCategory::Parts => &mut self.parts,
            ProductCategory::Chemicals => &mut self.chemicals,
            ProductCategory::Additional | ProductCategory::Accessories => &mut self.additional,
        }
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.bowls
            .iter()
            .chain(&self.filtration)
            .chain(&self.heating)
            .chain(&self.parts)
            .chain(&self.additional)
            .chain(&self.chemicals)
    }

    pub fn find(
        &self,
        id: &str,
    ) -> Option<&Product> {
        self.products().find(|p| p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.products().next().is_none()
    }

    /// Inserts products into their group. A product whose id is already
    /// present replaces the old entry; returns how many were new.
    pub fn upsert(
        &mut self,
        products: impl IntoIterator<Item = Product>,
    ) -> usize {
        let mut added = 0;
        for product in products {
            let group = self.group_mut(product.category);
            match group.iter_mut().find(|p| p.id == product.id) {
                Some(existing) => *existing = product,
                None => {
                    group.push(product);
                    added += 1;
                }
            }
        }
        added
    }

    /// Fills every empty group from `defaults`.
    pub fn with_fallback(
        mut self,
        defaults: &Catalog,
    ) -> Self {
        for (group, fallback) in [
            (&mut self.bowls, &defaults.bowls),
            (&mut self.filtration, &defaults.filtration),
            (&mut self.heating, &defaults.heating),
            (&mut self.parts, &defaults.parts),
            (&mut self.additional, &defaults.additional),
            (&mut self.chemicals, &defaults.chemicals),
        ] {
            if group.is_empty() {
                group.clone_from(fallback);
            }
        }
        self
    }

    /// Built-in price list used when the database has nothing for a group.
    pub fn defaults() -> Self {
        use ProductCategory::{Additional, Filtration, Heating};

        Self {
            filtration: vec![
                Product::new("filtration_basic", Filtration, "Фильтровальная установка 6 м³/ч", dec!(95000))
                    .with_flow_rate(dec!(6)),
                Product::new("filtration_standard", Filtration, "Фильтровальная установка 10 м³/ч", dec!(145000))
                    .with_flow_rate(dec!(10)),
                Product::new("filtration_pro", Filtration, "Фильтровальная установка 16 м³/ч", dec!(210000))
                    .with_flow_rate(dec!(16)),
            ],
            heating: vec![
                Product::new("heat_exchanger_40", Heating, "Теплообменник 40 кВт", dec!(65000))
                    .with_power(dec!(40))
                    .with_installation(dec!(10000)),
                Product::new("heat_pump_12", Heating, "Тепловой насос 12 кВт", dec!(280000))
                    .with_power(dec!(12))
                    .with_installation(dec!(20000)),
            ],
            additional: vec![
                Product::new("counter_current", Additional, "Противоток (Искусственное течение)", dec!(185000))
                    .with_installation(dec!(25000)),
                Product::new("waterfall_cobra", Additional, "Водопад \"Кобра\" (Нержавеющая сталь)", dec!(65000))
                    .with_installation(dec!(15000)),
                Product::new("uv_lamp", Additional, "УФ-установка (Обеззараживание)", dec!(45000))
                    .with_installation(dec!(8000)),
                Product::new("auto_station", Additional, "Автоматическая станция дозации (pH/Cl)", dec!(120000))
                    .with_installation(dec!(15000)),
                Product::new("led_lights_color", Additional, "Комплект цветного LED освещения (RGB)", dec!(55000))
                    .with_installation(dec!(12000)),
                Product::new("robot_cleaner", Additional, "Робот-пылесос (Автоматический)", dec!(85000))
                    .with_installation(dec!(0)),
                Product::new("cover_blind", Additional, "Жалюзийное покрытие (Автоматическое)", dec!(450000))
                    .with_installation(dec!(40000)),
            ],
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for category in [
            ProductCategory::Bowls,
            ProductCategory::Filtration,
            ProductCategory::Heating,
            ProductCategory::Parts,
            ProductCategory::Additional,
            ProductCategory::Accessories,
            ProductCategory::Chemicals,
        ] {
            assert_eq!(ProductCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(ProductCategory::parse("tools"), None);
    }

    #[test]
    fn accessories_are_grouped_with_additional() {
        let catalog = Catalog::from_products([
            Product::new("ladder", ProductCategory::Accessories, "Лестница", dec!(35000)),
            Product::new("uv", ProductCategory::Additional, "УФ", dec!(45000)),
            Product::new("b1", ProductCategory::Bowls, "Чаша", dec!(500000)),
        ]);

        assert_eq!(catalog.additional.len(), 2);
        assert_eq!(catalog.bowls.len(), 1);
        assert_eq!(catalog.group(ProductCategory::Accessories).len(), 2);
    }

    #[test]
    fn fallback_only_fills_empty_groups() {
        let catalog = Catalog::from_products([Product::new(
            "f1",
            ProductCategory::Filtration,
            "Фильтр",
            dec!(100000),
        )])
        .with_fallback(&Catalog::defaults());

        assert_eq!(catalog.filtration.len(), 1);
        assert_eq!(catalog.heating.len(), 2);
        assert_eq!(catalog.additional.len(), 7);
        assert!(catalog.bowls.is_empty());
    }

    #[test]
    fn upsert_replaces_same_id_and_counts_new() {
        let mut catalog = Catalog::defaults();
        let mut lamp = catalog.find("uv_lamp").cloned().unwrap();
        lamp.price = dec!(47000);

        let added = catalog.upsert([
            lamp,
            Product::new("slide", ProductCategory::Additional, "Горка", dec!(90000)),
        ]);

        assert_eq!(added, 1);
        assert_eq!(catalog.find("uv_lamp").map(|p| p.price), Some(dec!(47000)));
        assert_eq!(catalog.additional.len(), 8);
    }

    #[test]
    fn default_option_converts_to_equipment() {
        let catalog = Catalog::defaults();
        let equipment = catalog.find("counter_current").unwrap().to_equipment();

        assert_eq!(equipment.unit_price(), dec!(185000));
        assert_eq!(equipment.installation(), Some(dec!(25000)));
        assert_eq!(equipment.category.as_deref(), Some("additional"));
    }
}
