//! Free-text catalog search.
//!
//! A query such as `насос emaux для 50 кубов до 100к` is read into
//! [`SearchFilters`] and then applied to a product list.
//!
//! | In the query                                  | Filter                                  |
//! |-----------------------------------------------|-----------------------------------------|
//! | `50 кубов`, `50 м3`, `50 м³`                  | pool volume; rated items within 80-130 % |
//! | `до 100к`, `до 100 тыс`, `до 2 млн`, `бюджет 80` | price ceiling, in thousands unless `млн` |
//! | `aqua`, `emaux`, `astral`, `pentair`, ...     | brand in the name or manufacturer       |
//! | `насос`, `фильтр`, `нагрев`, `подсвет`, ...   | equipment type                          |
//! | `мощный`, `сильный`, `производительный`       | most powerful first                     |
//! | `лучший`, `топ`                               | most expensive first                    |
//! | `дешевый`, `бюджет`                           | cheapest first                          |

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::models::{Product, ProductCategory};

static VOLUME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*(?:куб|м3|м³)")
        .expect("VOLUME regex should compile - this is a bug")
});

static PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"до\s*(\d+(?:[.,]\d+)?)\s*(млн|тыс|к\b)?|бюджет\s*(\d+(?:[.,]\d+)?)")
        .expect("PRICE regex should compile - this is a bug")
});

static BRAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"aqua|emaux|astral|pentair|hayward|intex")
        .expect("BRAND regex should compile - this is a bug")
});

static TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"насос|фильтр|нагрев|освещ|подсвет|скиммер|форсунк|лестниц|покрыти")
        .expect("TYPE regex should compile - this is a bug")
});

static POWER_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"мощн|сильн|производ").expect("POWER_HINT regex should compile - this is a bug")
});

/// A volume printed on the product; `м³/ч` is a flow rate and is skipped.
static CAPACITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*(?:м3|м³|куб)(/ч)?")
        .expect("CAPACITY regex should compile - this is a bug")
});

static POWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*(?:квт|kw)").expect("POWER regex should compile - this is a bug")
});

/// Shown when the query is too short to suggest anything from.
pub const DEFAULT_SUGGESTIONS: [&str; 5] = [
    "насос для 50 кубов",
    "фильтр до 100 тысяч",
    "самый мощный нагреватель",
    "LED освещение премиум",
    "скиммер для 8 метров",
];

const SUGGESTED_BRANDS: [&str; 5] = ["Aqua", "Emaux", "Astral", "Pentair", "Hayward"];

const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentType {
    Pump,
    Filter,
    Heater,
    Lighting,
    Skimmer,
    Nozzle,
    Ladder,
    Cover,
}

impl EquipmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pump => "pump",
            Self::Filter => "filter",
            Self::Heater => "heater",
            Self::Lighting => "lighting",
            Self::Skimmer => "skimmer",
            Self::Nozzle => "nozzle",
            Self::Ladder => "ladder",
            Self::Cover => "cover",
        }
    }

    fn from_stem(stem: &str) -> Option<Self> {
        match stem {
            "насос" => Some(Self::Pump),
            "фильтр" => Some(Self::Filter),
            "нагрев" => Some(Self::Heater),
            "освещ" | "подсвет" => Some(Self::Lighting),
            "скиммер" => Some(Self::Skimmer),
            "форсунк" => Some(Self::Nozzle),
            "лестниц" => Some(Self::Ladder),
            "покрыти" => Some(Self::Cover),
            _ => None,
        }
    }

    /// Russian stems that name this type in product text.
    fn stems(&self) -> &'static [&'static str] {
        match self {
            Self::Pump => &["насос"],
            Self::Filter => &["фильтр"],
            Self::Heater => &["нагрев", "подогрев", "теплообмен"],
            Self::Lighting => &["освещ", "подсвет", "прожектор", "led"],
            Self::Skimmer => &["скиммер"],
            Self::Nozzle => &["форсунк"],
            Self::Ladder => &["лестниц", "поручн"],
            Self::Cover => &["покрыти"],
        }
    }

    /// `text` must already be lowercase.
    fn found_in(
        &self,
        text: &str,
    ) -> bool {
        text.contains(self.as_str()) || self.stems().iter().any(|stem| text.contains(stem))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Popularity,
    Power,
    PriceAsc,
    PriceDesc,
}

/// What a free-text query asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(rename = "type")]
    pub kind: Option<EquipmentType>,
    pub brands: Vec<String>,
    pub max_price: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub sort: SortOrder,
}

fn number(text: &str) -> Option<Decimal> {
    text.replace(',', ".").parse().ok()
}

/// Name, manufacturer, type and description, lowercased.
fn searchable_text(product: &Product) -> String {
    [
        Some(product.name.as_str()),
        product.manufacturer.as_deref(),
        product.kind.as_deref(),
        product.description.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Pool volume the product is rated for, read from its description or name.
fn capacity_of(product: &Product) -> Option<Decimal> {
    let text = product
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(&product.name)
        .to_lowercase();
    let caps = CAPACITY.captures(&text)?;
    if caps.get(2).is_some() {
        return None;
    }
    number(&caps[1])
}

fn power_of(product: &Product) -> Decimal {
    product
        .power
        .or_else(|| {
            let text = searchable_text(product);
            POWER.captures(&text).and_then(|caps| number(&caps[1]))
        })
        .unwrap_or(Decimal::ZERO)
}

fn category_label(category: ProductCategory) -> &'static str {
    match category {
        ProductCategory::Bowls => "чаши",
        ProductCategory::Filtration => "фильтрация",
        ProductCategory::Heating => "подогрев",
        ProductCategory::Parts => "комплектующие",
        ProductCategory::Additional => "дополнительное оборудование",
        ProductCategory::Accessories => "аксессуары",
        ProductCategory::Chemicals => "химия",
    }
}

impl SearchFilters {
    pub fn parse(query: &str) -> Self {
        let query = query.to_lowercase();
        let mut filters = Self::default();

        if let Some(caps) = VOLUME.captures(&query) {
            filters.volume = number(&caps[1]);
        }

        if let Some(caps) = PRICE.captures(&query) {
            let amount = caps.get(1).or_else(|| caps.get(3)).and_then(|m| number(m.as_str()));
            let scale = match caps.get(2).map(|m| m.as_str()) {
                Some("млн") => dec!(1000000),
                _ => dec!(1000),
            };
            filters.max_price = amount.map(|a| a * scale);
        }

        for brand in BRAND.find_iter(&query) {
            let brand = brand.as_str().to_string();
            if !filters.brands.contains(&brand) {
                filters.brands.push(brand);
            }
        }

        filters.kind = TYPE.find(&query).and_then(|m| EquipmentType::from_stem(m.as_str()));

        filters.sort = if POWER_HINT.is_match(&query) {
            SortOrder::Power
        } else if query.contains("лучш") || query.contains("топ") {
            SortOrder::PriceDesc
        } else if query.contains("дешев") || query.contains("бюджет") {
            SortOrder::PriceAsc
        } else {
            SortOrder::Popularity
        };

        filters
    }

    pub fn matches(
        &self,
        product: &Product,
    ) -> bool {
        let text = searchable_text(product);

        if self.kind.is_some_and(|kind| !kind.found_in(&text)) {
            return false;
        }
        if !self.brands.is_empty() && !self.brands.iter().any(|b| text.contains(b.as_str())) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        if let Some(volume) = self.volume {
            // Products that do not state a volume are kept.
            if let Some(capacity) = capacity_of(product) {
                if capacity < volume * dec!(0.8) || capacity > volume * dec!(1.3) {
                    return false;
                }
            }
        }
        true
    }

    /// Matching products in the requested order. Ties keep catalog order.
    pub fn apply(
        &self,
        products: &[Product],
    ) -> Vec<Product> {
        let mut results: Vec<Product> =
            products.iter().filter(|p| self.matches(p)).cloned().collect();

        match self.sort {
            SortOrder::Popularity => {}
            SortOrder::Power => results.sort_by_key(|p| std::cmp::Reverse(power_of(p))),
            SortOrder::PriceAsc => results.sort_by_key(|p| p.price),
            SortOrder::PriceDesc => results.sort_by_key(|p| std::cmp::Reverse(p.price)),
        }
        results
    }

    /// `Найдено 3 товаров (тип: pump, до 100K ₽)`
    pub fn explain(
        &self,
        count: usize,
    ) -> String {
        let mut parts = Vec::new();
        if let Some(kind) = self.kind {
            parts.push(format!("тип: {}", kind.as_str()));
        }
        if !self.brands.is_empty() {
            parts.push(format!("бренд: {}", self.brands.join(", ")));
        }
        if let Some(max) = self.max_price {
            parts.push(format!("до {}K ₽", (max / dec!(1000)).round().normalize()));
        }
        if let Some(volume) = self.volume {
            parts.push(format!("для {}м³", volume.normalize()));
        }

        if parts.is_empty() {
            format!("Найдено {count} товаров")
        } else {
            format!("Найдено {count} товаров ({})", parts.join(", "))
        }
    }
}

/// Query completions: categories and brands that contain what was typed.
pub fn suggestions(
    query: &str,
    products: &[Product],
) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < 2 {
        return DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
    }

    let mut labels: Vec<&str> = Vec::new();
    for product in products {
        let label = category_label(product.category);
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    let mut suggestions = Vec::new();
    for label in labels.into_iter().filter(|l| l.contains(query.as_str())) {
        suggestions.push(format!("{label} до 50 тысяч"));
        suggestions.push(format!("лучшие {label}"));
    }
    for brand in SUGGESTED_BRANDS {
        if brand.to_lowercase().contains(query.as_str()) {
            suggestions.push(format!("{brand} насосы"));
            suggestions.push(format!("{brand} фильтры"));
        }
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn product(
        id: &str,
        category: ProductCategory,
        name: &str,
        price: Decimal,
    ) -> Product {
        Product::new(id, category, name, price)
    }

    fn sample() -> Vec<Product> {
        vec![
            product("pump_emaux", ProductCategory::Filtration, "Насос Emaux SS050 для 50 м³", dec!(42000)),
            product("pump_astral", ProductCategory::Filtration, "Насос Astral Victoria для 80 м³", dec!(98000)),
            product("pump_small", ProductCategory::Filtration, "Насос Emaux для 20 м³", dec!(21000)),
            Product {
                manufacturer: Some("Kripsol".to_string()),
                ..product("filter_8", ProductCategory::Filtration, "Фильтровальная установка 8 м³/ч", dec!(118000))
            },
            Product {
                power: Some(dec!(18)),
                ..product("heat_18", ProductCategory::Heating, "Теплообменник Elecro", dec!(52000))
            },
            product("heat_pump_13", ProductCategory::Heating, "Тепловой насос 13 кВт", dec!(265000)),
            product("led", ProductCategory::Additional, "LED прожектор RGB", dec!(18000)),
        ]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    // ── parse ──

    #[test]
    fn parses_volume_price_and_type() {
        let filters = SearchFilters::parse("Насос для 50 кубов до 100к");

        assert_eq!(filters.kind, Some(EquipmentType::Pump));
        assert_eq!(filters.volume, Some(dec!(50)));
        assert_eq!(filters.max_price, Some(dec!(100000)));
        assert_eq!(filters.sort, SortOrder::Popularity);
    }

    #[test]
    fn price_units() {
        let price = |q: &str| SearchFilters::parse(q).max_price;

        assert_eq!(price("фильтр до 100 тысяч"), Some(dec!(100000)));
        assert_eq!(price("до 80"), Some(dec!(80000)));
        assert_eq!(price("до 2 млн"), Some(dec!(2000000)));
        assert_eq!(price("до 1,5 млн"), Some(dec!(1500000)));
        assert_eq!(price("бюджет 60"), Some(dec!(60000)));
        assert_eq!(price("насос emaux"), None);
    }

    #[test]
    fn brands_are_collected_once() {
        let filters = SearchFilters::parse("Emaux или Astral, лучше emaux");

        assert_eq!(filters.brands, vec!["emaux".to_string(), "astral".to_string()]);
    }

    #[test]
    fn sort_hints() {
        let sort = |q: &str| SearchFilters::parse(q).sort;

        assert_eq!(sort("самый мощный нагреватель"), SortOrder::Power);
        assert_eq!(sort("производительный насос"), SortOrder::Power);
        assert_eq!(sort("лучший фильтр"), SortOrder::PriceDesc);
        assert_eq!(sort("топ подсветка"), SortOrder::PriceDesc);
        assert_eq!(sort("дешевый скиммер"), SortOrder::PriceAsc);
        assert_eq!(sort("бюджет 50"), SortOrder::PriceAsc);
        assert_eq!(sort("форсунка"), SortOrder::Popularity);
    }

    #[test]
    fn type_stems() {
        let kind = |q: &str| SearchFilters::parse(q).kind;

        assert_eq!(kind("подсветка для бассейна"), Some(EquipmentType::Lighting));
        assert_eq!(kind("освещение"), Some(EquipmentType::Lighting));
        assert_eq!(kind("нагреватель"), Some(EquipmentType::Heater));
        assert_eq!(kind("лестница"), Some(EquipmentType::Ladder));
        assert_eq!(kind("покрытие"), Some(EquipmentType::Cover));
        assert_eq!(kind("химия"), None);
    }

    #[test]
    fn empty_query_has_no_filters() {
        assert_eq!(SearchFilters::parse(""), SearchFilters::default());
    }

    // ── apply ──

    #[test]
    fn volume_keeps_items_rated_within_band() {
        let filters = SearchFilters::parse("насос для 50 кубов");

        let results = filters.apply(&sample());

        // 20 m³ is below 80 % of 50 and 80 m³ above 130 %; the heat pump
        // states no volume and stays.
        assert_eq!(ids(&results), vec!["pump_emaux", "heat_pump_13"]);
    }

    #[test]
    fn flow_rate_is_not_taken_for_volume() {
        let filters = SearchFilters::parse("фильтр для 50 кубов");

        assert_eq!(ids(&filters.apply(&sample())), vec!["filter_8"]);
    }

    #[test]
    fn price_ceiling_and_cheapest_first() {
        let filters = SearchFilters::parse("дешевый насос до 50к");

        let results = filters.apply(&sample());

        assert_eq!(ids(&results), vec!["pump_small", "pump_emaux"]);
    }

    #[test]
    fn brand_matches_name_or_manufacturer() {
        assert_eq!(
            ids(&SearchFilters::parse("emaux").apply(&sample())),
            vec!["pump_emaux", "pump_small"]
        );

        let kripsol = SearchFilters {
            brands: vec!["kripsol".to_string()],
            ..SearchFilters::default()
        };
        assert_eq!(ids(&kripsol.apply(&sample())), vec!["filter_8"]);
    }

    #[test]
    fn most_powerful_first_uses_field_then_name() {
        let filters = SearchFilters::parse("мощный нагрев");

        let results = filters.apply(&sample());

        assert_eq!(ids(&results), vec!["heat_18"]);

        let all = SearchFilters {
            sort: SortOrder::Power,
            ..SearchFilters::default()
        };
        let ordered = all.apply(&sample());
        assert_eq!(&ids(&ordered)[..2], &["heat_18", "heat_pump_13"]);
    }

    #[test]
    fn lighting_matches_led_names() {
        let results = SearchFilters::parse("подсветка").apply(&sample());

        assert_eq!(ids(&results), vec!["led"]);
    }

    // ── explain ──

    #[test]
    fn explanation_lists_applied_filters() {
        let filters = SearchFilters::parse("насос emaux для 50 кубов до 100к");

        assert_eq!(
            filters.explain(3),
            "Найдено 3 товаров (тип: pump, бренд: emaux, до 100K ₽, для 50м³)"
        );
        assert_eq!(SearchFilters::default().explain(0), "Найдено 0 товаров");
    }

    // ── suggestions ──

    #[test]
    fn short_query_gets_default_suggestions() {
        assert_eq!(suggestions("", &sample()), DEFAULT_SUGGESTIONS.map(String::from).to_vec());
        assert_eq!(suggestions("н", &sample()), DEFAULT_SUGGESTIONS.map(String::from).to_vec());
    }

    #[test]
    fn suggestions_from_categories_and_brands() {
        assert_eq!(
            suggestions("подо", &sample()),
            vec!["подогрев до 50 тысяч".to_string(), "лучшие подогрев".to_string()]
        );
        assert_eq!(
            suggestions("ast", &sample()),
            vec!["Astral насосы".to_string(), "Astral фильтры".to_string()]
        );
    }

    #[test]
    fn suggestions_cover_every_matching_category() {
        let products = vec![
            product("chlor", ProductCategory::Chemicals, "Хлор", dec!(2500)),
            product("sand", ProductCategory::Filtration, "Песок", dec!(900)),
        ];

        assert_eq!(
            suggestions("ия", &products),
            vec![
                "химия до 50 тысяч".to_string(),
                "лучшие химия".to_string(),
                "фильтрация до 50 тысяч".to_string(),
                "лучшие фильтрация".to_string(),
            ]
        );
        assert!(suggestions("aq", &products).len() <= MAX_SUGGESTIONS);
    }
}
