//! Sales copy for a configured pool.
//!
//! The text is chosen from the pool's size category and the price segment
//! of the estimate:
//!
//! | Size category | Water area      | Segment  | Total          |
//! |---------------|-----------------|----------|----------------|
//! | intimate      | up to 15 m²     | economy  | up to 2 M      |
//! | family        | up to 35 m²     | standard | up to 4 M      |
//! | sport         | up to 60 m²     | premium  | up to 8 M      |
//! | luxury        | larger          | luxury   | above 8 M      |
//!
//! A zero total counts as `standard`. The current season adds a line about
//! when to start building.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use super::Placeholders;
use crate::calculations::common::format_rub;
use crate::models::Selection;

const FAMILY_PREMIUM: &str = "{{ADJECTIVE}} {{LABEL}} бассейн площадью {{AREA}}м² — это идеальное решение для вашей семьи. {{FEATURES_INTRO}}

✨ Что делает этот проект особенным:
{{FEATURES_LIST}}

{{SEASON_BENEFIT}}

Размеры {{SIZE}} идеально подходят для {{POOL_USE}}. {{HEATING_NOTE}} {{LIGHTING_NOTE}}

💎 Премиум-конфигурация включает только проверенное оборудование ведущих производителей.

{{CLOSING}}";

const FAMILY_STANDARD: &str = "Классический {{LABEL}} бассейн {{SIZE}} — проверенное временем решение для загородного дома. {{FEATURES_INTRO}}

Что входит в проект:
{{FEATURES_LIST}}

{{SEASON_BENEFIT}}

{{HEATING_NOTE}} {{LIGHTING_NOTE}}

{{CLOSING}}";

const SPORT_PREMIUM: &str = "{{ADJECTIVE}} спортивный бассейн размером {{SIZE}} — для тех, кто серьезно относится к плаванию. {{FEATURES_INTRO}}

Профессиональные характеристики:
{{FEATURES_LIST}}

Длина {{LENGTH}}м позволяет комфортно тренироваться, выполнять повороты и отрабатывать технику.

{{HEATING_NOTE}} Профессиональная система фильтрации обеспечивает кристальную чистоту воды.

{{CLOSING}}";

const LUXURY_ANY: &str = "{{ADJECTIVE}} проект класса люкс — воплощение роскоши и технологий. Бассейн {{SIZE}} станет жемчужиной вашего участка.

🌟 Премиальные решения:
{{FEATURES_LIST}}

{{SEASON_BENEFIT}}

Каждая деталь продумана до мелочей. {{HEATING_NOTE}} {{LIGHTING_NOTE}}

Это не просто бассейн — это инвестиция в качество жизни и здоровье семьи.

{{CLOSING}}";

const DEFAULT_FEATURES: &str = "• Качественная система фильтрации\n• Надежное оборудование";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Intimate,
    Family,
    Sport,
    Luxury,
}

impl SizeCategory {
    pub fn from_area(area: Decimal) -> Self {
        if area <= dec!(15) {
            Self::Intimate
        } else if area <= dec!(35) {
            Self::Family
        } else if area <= dec!(60) {
            Self::Sport
        } else {
            Self::Luxury
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Intimate => "уютный",
            Self::Family => "семейный",
            Self::Sport => "спортивный",
            Self::Luxury => "роскошный",
        }
    }

    pub fn adjective(&self) -> &'static str {
        match self {
            Self::Intimate => "компактный",
            Self::Family => "просторный",
            Self::Sport => "профессиональный",
            Self::Luxury => "впечатляющий",
        }
    }

    fn pool_use(&self) -> &'static str {
        match self {
            Self::Intimate => "романтичных вечеров и утренних заплывов",
            Self::Family => "семейного отдыха, детских игр и взрослого плавания",
            Self::Sport => "серьезных тренировок и поддержания спортивной формы",
            Self::Luxury => "приема гостей, вечеринок у бассейна и ежедневного релакса",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSegment {
    Economy,
    Standard,
    Premium,
    Luxury,
}

impl PriceSegment {
    pub fn from_total(total: Decimal) -> Self {
        if total.is_zero() {
            Self::Standard
        } else if total > dec!(8000000) {
            Self::Luxury
        } else if total > dec!(4000000) {
            Self::Premium
        } else if total > dec!(2000000) {
            Self::Standard
        } else {
            Self::Economy
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn from_date(date: NaiveDate) -> Self {
        match date.month() {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    pub fn benefit(&self) -> &'static str {
        match self {
            Self::Spring => "Весна — идеальное время для начала строительства. Бассейн будет готов к лету!",
            Self::Summer => {
                "Летний сезон в разгаре — самое время задуматься о собственном бассейне для следующего года."
            }
            Self::Autumn => {
                "Осень — отличное время для планирования. Избежите весенней загруженности подрядчиков."
            }
            Self::Winter => {
                "Зимнее время — возможность спокойно спроектировать и подготовиться к весеннему старту работ."
            }
        }
    }
}

/// Comfort systems mentioned in the copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Heating,
    Lighting,
    Massage,
    Automation,
    Filtration,
}

impl Feature {
    pub fn short(&self) -> &'static str {
        match self {
            Self::Heating => "Современная система подогрева позволит наслаждаться плаванием круглый год.",
            Self::Lighting => "Атмосферное LED-освещение создаст незабываемую вечернюю атмосферу.",
            Self::Massage => "Система гидромассажа для релаксации после рабочего дня.",
            Self::Automation => "Умная автоматизация управляет всеми системами бассейна.",
            Self::Filtration => "Профессиональная система очистки воды.",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            Self::Heating => {
                "Энергоэффективная система подогрева поддерживает комфортную температуру воды 24-30°C в любое время года."
            }
            Self::Lighting => {
                "Современная подводная LED-подсветка с возможностью смены цветов превращает вечернее купание в волшебное шоу."
            }
            Self::Massage => {
                "Профессиональная система гидромассажа с регулируемыми форсунками обеспечит максимальное расслабление."
            }
            Self::Automation => {
                "Интеллектуальная система управления автоматически поддерживает оптимальные параметры воды и экономит ваше время."
            }
            Self::Filtration => {
                "Многоступенчатая система фильтрации обеспечивает идеальную чистоту воды без применения химии."
            }
        }
    }

    /// Features named by works and equipment, in a fixed order.
    pub fn detect<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Feature> {
        let names: Vec<String> = names.into_iter().map(str::to_lowercase).collect();
        let any = |needles: &[&str]| names.iter().any(|n| needles.iter().any(|k| n.contains(k)));

        let mut features = Vec::new();
        if any(&["одогрев", "нагрев", "теплообменник", "тепловой насос"]) {
            features.push(Self::Heating);
        }
        if any(&["освещ", "подсветк", "прожектор"]) {
            features.push(Self::Lighting);
        }
        if any(&["массаж"]) {
            features.push(Self::Massage);
        }
        if any(&["автомат"]) {
            features.push(Self::Automation);
        }
        if any(&["фильтр"]) {
            features.push(Self::Filtration);
        }
        features
    }
}

/// Facts the copy is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionInput {
    pub length: Decimal,
    pub width: Decimal,
    pub depth: Decimal,
    pub total: Decimal,
    pub features: Vec<Feature>,
    pub season: Season,
}

impl DescriptionInput {
    pub fn from_selection(
        selection: &Selection,
        total: Decimal,
        today: NaiveDate,
    ) -> Self {
        let dims = selection.effective_dimensions().unwrap_or_default();

        let mut names: Vec<&str> = selection.works.values().map(|w| w.name.as_str()).collect();
        let equipment = [&selection.filtration, &selection.heating].into_iter().flatten();
        names.extend(
            equipment
                .chain(selection.additional.iter())
                .filter_map(|e| e.name.as_deref()),
        );
        if selection.heating.is_some() {
            names.push("подогрев");
        }

        Self {
            length: dims.length,
            width: dims.width,
            depth: dims.depth,
            total,
            features: Feature::detect(names),
            season: Season::from_date(today),
        }
    }

    pub fn area(&self) -> Decimal {
        self.length * self.width
    }

    pub fn size_category(&self) -> SizeCategory {
        SizeCategory::from_area(self.area())
    }

    pub fn price_segment(&self) -> PriceSegment {
        PriceSegment::from_total(self.total)
    }

    fn size(&self) -> String {
        format!("{}x{}м", self.length.normalize(), self.width.normalize())
    }

    fn millions(&self) -> String {
        let value = (self.total / dec!(1000000))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        format!("{value:.1}")
    }

    fn has(
        &self,
        feature: Feature,
    ) -> bool {
        self.features.contains(&feature)
    }

    fn template(&self) -> &'static str {
        use self::PriceSegment as P;
        use self::SizeCategory as S;

        match (self.size_category(), self.price_segment()) {
            (S::Family, P::Premium) => FAMILY_PREMIUM,
            (S::Family, P::Standard) => FAMILY_STANDARD,
            (S::Sport, P::Premium) => SPORT_PREMIUM,
            (_, P::Luxury) => LUXURY_ANY,
            (S::Sport, _) => SPORT_PREMIUM,
            (_, P::Premium) => FAMILY_PREMIUM,
            _ => FAMILY_STANDARD,
        }
    }

    /// Full sales text.
    pub fn formal(&self) -> String {
        let category = self.size_category();

        let features_intro = if self.features.is_empty() {
            "Базовая комплектация включает все необходимое для комфортного использования."
                .to_string()
        } else {
            format!(
                "Этот проект включает {} современных систем для максимального комфорта.",
                self.features.len()
            )
        };
        let features_list = if self.features.is_empty() {
            DEFAULT_FEATURES.to_string()
        } else {
            self.features
                .iter()
                .map(|f| format!("• {}", f.detail()))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let closing = if self.total.is_zero() {
            "Готовы обсудить детали? Свяжитесь с нами для точного расчета!".to_string()
        } else {
            format!(
                "💰 Стоимость проекта: {} млн ₽\n\nГотовы обсудить детали? Свяжитесь с нами для \
                 персонализированной консультации!",
                self.millions()
            )
        };
        let note = |feature: Feature| if self.has(feature) { feature.short() } else { "" };

        let values = Placeholders::new()
            .with("ADJECTIVE", category.adjective())
            .with("LABEL", category.label())
            .with("SIZE", self.size())
            .with("AREA", self.area().round().to_string())
            .with("LENGTH", self.length.normalize().to_string())
            .with("POOL_USE", category.pool_use())
            .with("FEATURES_INTRO", features_intro)
            .with("FEATURES_LIST", features_list)
            .with("HEATING_NOTE", note(Feature::Heating))
            .with("LIGHTING_NOTE", note(Feature::Lighting))
            .with("SEASON_BENEFIT", self.season.benefit())
            .with("CLOSING", closing);

        capitalize(values.render(self.template()).trim())
    }

    /// Two or three lines for a messenger.
    pub fn short(&self) -> String {
        let category = self.size_category();
        let features = self
            .features
            .iter()
            .map(Feature::short)
            .collect::<Vec<_>>()
            .join(" ");

        let text = format!(
            "🏊 {} {} бассейн {}\n{features}\n💰 {} млн ₽",
            capitalize(category.adjective()),
            category.label(),
            self.size(),
            self.millions()
        );
        text.replace("\n\n", "\n")
    }

    pub fn casual(&self) -> String {
        let features = if self.features.is_empty() {
            String::new()
        } else {
            let lines = self
                .features
                .iter()
                .map(|f| format!("✓ {}", f.short()))
                .collect::<Vec<_>>()
                .join("\n");
            format!("Со всеми фишками:\n{lines}")
        };

        format!(
            "Представьте: {} бассейн {} прямо у вас на участке! 🏊‍♂️\n\n{features}\n\n{}\n\n\
             Стоимость: {} млн ₽\n\nХотите так же? Давайте обсудим! 😊",
            self.size_category().label(),
            self.size(),
            self.season.benefit(),
            self.millions()
        )
    }

    pub fn technical(&self) -> String {
        let equipment = self
            .features
            .iter()
            .map(|f| format!("- {}", f.detail()))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Технические характеристики бассейна:\n\n\
             Размеры: {} (площадь {}м²)\n\
             Глубина: {}м\n\
             Категория: {}\n\n\
             Оборудование:\n{equipment}\n\n\
             Стоимость под ключ: {} ₽\n\n\
             Срок реализации: {} недель",
            self.size(),
            self.area().round_dp(1),
            self.depth.normalize(),
            self.size_category().label(),
            format_rub(self.total),
            timeline_weeks(self.area())
        )
    }

    pub fn variations(&self) -> Descriptions {
        Descriptions {
            formal: self.formal(),
            casual: self.casual(),
            technical: self.technical(),
            short: self.short(),
        }
    }
}

/// Every variant of the copy at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptions {
    pub formal: String,
    pub casual: String,
    pub technical: String,
    pub short: String,
}

/// Construction time in weeks by water area.
pub fn timeline_weeks(area: Decimal) -> &'static str {
    if area < dec!(20) {
        "4-6"
    } else if area < dec!(40) {
        "6-8"
    } else {
        "8-12"
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
