//! Construction works and their auto-calculated quantities.
//!
//! Each work in the catalog is priced per unit of measure or at a fixed
//! price. Works with a formula get their quantity from the pool geometry:
//!
//! | Work                   | Unit | Formula (L, W, D in metres)                 |
//! |------------------------|------|---------------------------------------------|
//! | Котлован               | м³   | (L + 1) × (W + 1) × (D + 0.3)               |
//! | Обратная засыпка       | м³   | 30% of excavation                           |
//! | Вывоз грунта           | м³   | 50% of excavation                           |
//! | Планировка дна         | м²   | L × W                                       |
//! | Песчаная подушка       | м³   | L × W × 0.2                                 |
//! | Бетонная плита         | м³   | L × W × 0.25                                |
//! | Армирование плиты      | м²   | L × W                                       |
//! | Гидроизоляция          | м²   | L × W                                       |
//! | Монтаж оборудования    | час  | 4 + 2 (heater) + 0.5 per part + 1 per option |
//! | Копинговый камень      | м    | 2 × (L + W)                                 |
//!
//! Quantities are rounded up to 0.1; totals are `ceil(raw quantity × rate)`.
//! Fixed-price works ignore the quantity.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pool_core::calculations::calculate_auto_works;
//! use pool_core::{Dimensions, Selection};
//!
//! let selection = Selection {
//!     dimensions: Some(Dimensions::new(dec!(8), dec!(4), dec!(1.5))),
//!     ..Selection::default()
//! };
//!
//! let works = calculate_auto_works(&selection);
//!
//! assert_eq!(works["excavation"].quantity, dec!(81));
//! assert_eq!(works["excavation"].total, dec!(121500));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::round_quantity_up;
use crate::models::{Dimensions, SelectedWork, Selection, WorkCategory};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorksError {
    #[error("unknown work '{0}'")]
    UnknownWork(String),

    #[error("work quantity must be non-negative, got {0}")]
    NegativeQuantity(Decimal),
}

/// How a work is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pricing {
    PerCubicMeter(Decimal),
    PerSquareMeter(Decimal),
    PerMeter(Decimal),
    PerHour(Decimal),
    Fixed(Decimal),
}

impl Pricing {
    pub fn rate(&self) -> Decimal {
        match *self {
            Self::PerCubicMeter(rate)
            | Self::PerSquareMeter(rate)
            | Self::PerMeter(rate)
            | Self::PerHour(rate)
            | Self::Fixed(rate) => rate,
        }
    }

    /// Total for `quantity`, rounded up to whole roubles.
    pub fn total(
        &self,
        quantity: Decimal,
    ) -> Decimal {
        match *self {
            Self::Fixed(price) => price,
            _ => (quantity * self.rate()).ceil(),
        }
    }
}

/// Geometry formulas behind the auto-calculated works.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formula {
    Excavation,
    Backfill,
    SoilRemoval,
    BottomArea,
    SandBase,
    ConcreteSlab,
    Perimeter,
    EquipmentHours,
}

impl Formula {
    pub fn evaluate(
        &self,
        dims: &Dimensions,
        selection: &Selection,
    ) -> Decimal {
        let excavation =
            || (dims.length + Decimal::ONE) * (dims.width + Decimal::ONE) * (dims.depth + dec!(0.3));

        match self {
            Self::Excavation => excavation(),
            Self::Backfill => excavation() * dec!(0.3),
            Self::SoilRemoval => excavation() * dec!(0.5),
            Self::BottomArea => dims.area(),
            Self::SandBase => dims.area() * dec!(0.2),
            Self::ConcreteSlab => dims.area() * dec!(0.25),
            Self::Perimeter => dims.perimeter(),
            Self::EquipmentHours => {
                let mut hours = dec!(4);
                if selection.heating.is_some() {
                    hours += dec!(2);
                }
                hours += Decimal::from(selection.parts_count()) * dec!(0.5);
                hours += Decimal::from(selection.additional.len());
                hours
            }
        }
    }
}

/// A work offered in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: WorkCategory,
    pub unit: &'static str,
    pub pricing: Pricing,
    pub formula: Option<Formula>,
    /// Quantity used when the work is picked by hand and has no formula.
    pub default_quantity: Decimal,
}

impl WorkDefinition {
    pub fn is_auto(&self) -> bool {
        self.formula.is_some()
    }

    fn entry(
        &self,
        quantity: Decimal,
        total: Decimal,
        manual: bool,
    ) -> SelectedWork {
        SelectedWork {
            id: self.id.to_string(),
            name: self.name.to_string(),
            category: self.category,
            unit: self.unit.to_string(),
            quantity,
            total,
            manual,
        }
    }

    /// Entry computed from the formula; `None` for works without one.
    pub fn auto_entry(
        &self,
        dims: &Dimensions,
        selection: &Selection,
    ) -> Option<SelectedWork> {
        let raw = self.formula?.evaluate(dims, selection);
        Some(self.entry(round_quantity_up(raw), self.pricing.total(raw), false))
    }

    pub fn default_entry(&self) -> SelectedWork {
        let quantity = if self.default_quantity.is_zero() {
            Decimal::ONE
        } else {
            self.default_quantity
        };
        self.entry(quantity, self.pricing.total(quantity), false)
    }

    pub fn manual_entry(
        &self,
        quantity: Decimal,
    ) -> SelectedWork {
        self.entry(quantity, self.pricing.total(quantity), true)
    }
}

const fn work(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: WorkCategory,
    unit: &'static str,
    pricing: Pricing,
    formula: Option<Formula>,
    default_quantity: Decimal,
) -> WorkDefinition {
    WorkDefinition {
        id,
        name,
        description,
        category,
        unit,
        pricing,
        formula,
        default_quantity,
    }
}

use self::Formula as F;
use self::Pricing as P;
use crate::models::WorkCategory as C;

/// Every work the configurator offers, in display order.
pub const WORKS: &[WorkDefinition] = &[
    work("excavation", "Котлован", "Выемка грунта под бассейн",
        C::Earthworks, "м³", P::PerCubicMeter(dec!(1500)), Some(F::Excavation), dec!(1)),
    work("backfill", "Обратная засыпка", "Засыпка пазух котлована",
        C::Earthworks, "м³", P::PerCubicMeter(dec!(800)), Some(F::Backfill), dec!(1)),
    work("removal", "Вывоз грунта", "Погрузка и вывоз лишнего грунта",
        C::Earthworks, "м³", P::PerCubicMeter(dec!(500)), Some(F::SoilRemoval), dec!(1)),
    work("leveling", "Планировка дна", "Выравнивание и уплотнение дна котлована",
        C::Earthworks, "м²", P::PerSquareMeter(dec!(300)), Some(F::BottomArea), dec!(1)),
    work("sandBase", "Песчаная подушка", "Устройство песчаного основания 20см",
        C::Foundation, "м³", P::PerCubicMeter(dec!(2500)), Some(F::SandBase), dec!(1)),
    work("concreteSlab", "Бетонная плита", "Заливка бетонной плиты 25см (бетон М300)",
        C::Foundation, "м³", P::PerCubicMeter(dec!(8000)), Some(F::ConcreteSlab), dec!(1)),
    work("reinforcement", "Армирование плиты", "Армирование бетонной плиты (сетка 200x200)",
        C::Foundation, "м²", P::PerSquareMeter(dec!(1200)), Some(F::BottomArea), dec!(1)),
    work("waterproofing", "Гидроизоляция", "Гидроизоляция плиты (2 слоя)",
        C::Foundation, "м²", P::PerSquareMeter(dec!(800)), Some(F::BottomArea), dec!(1)),
    work("bowlInstallation", "Установка чаши", "Монтаж композитной чаши с выравниванием",
        C::Installation, "шт", P::Fixed(dec!(150000)), None, dec!(1)),
    work("equipmentInstallation", "Монтаж оборудования", "Установка и подключение всего оборудования",
        C::Installation, "час", P::PerHour(dec!(2500)), Some(F::EquipmentHours), dec!(1)),
    work("plumbing", "Сантехнические работы", "Прокладка труб, подключение к коммуникациям",
        C::Installation, "компл", P::Fixed(dec!(45000)), None, dec!(1)),
    work("electrical", "Электромонтажные работы", "Прокладка кабелей, установка автоматики",
        C::Installation, "компл", P::Fixed(dec!(35000)), None, dec!(1)),
    work("commissioning", "Пуско-наладочные работы", "Настройка и тестирование всех систем",
        C::Installation, "компл", P::Fixed(dec!(25000)), None, dec!(1)),
    work("tiling", "Облицовка плиткой", "Укладка плитки вокруг бассейна",
        C::Finishing, "м²", P::PerSquareMeter(dec!(3000)), None, dec!(0)),
    work("coping", "Копинговый камень", "Установка бортового камня",
        C::Finishing, "м", P::PerMeter(dec!(2000)), Some(F::Perimeter), dec!(1)),
    work("deck", "Террасная доска", "Укладка террасной доски вокруг бассейна",
        C::Finishing, "м²", P::PerSquareMeter(dec!(4500)), None, dec!(0)),
    work("ladder", "Лестница из нержавейки", "Установка лестницы для спуска в бассейн",
        C::Finishing, "шт", P::Fixed(dec!(35000)), None, dec!(1)),
    work("delivery", "Доставка материалов", "Доставка всех материалов на объект",
        C::Additional, "компл", P::Fixed(dec!(25000)), None, dec!(1)),
    work("unloading", "Разгрузка", "Разгрузка материалов и оборудования",
        C::Additional, "компл", P::Fixed(dec!(15000)), None, dec!(1)),
    work("waste", "Вывоз мусора", "Вывоз строительного мусора",
        C::Additional, "компл", P::Fixed(dec!(20000)), None, dec!(1)),
];

pub fn find_work(id: &str) -> Option<&'static WorkDefinition> {
    WORKS.iter().find(|w| w.id == id)
}

/// Quantities and totals of every auto-calculated work for the current
/// geometry. Empty when neither dimensions nor a sized bowl is selected.
pub fn calculate_auto_works(selection: &Selection) -> BTreeMap<String, SelectedWork> {
    let Some(dims) = selection.effective_dimensions() else {
        return BTreeMap::new();
    };

    WORKS
        .iter()
        .filter_map(|def| def.auto_entry(&dims, selection))
        .map(|entry| (entry.id.clone(), entry))
        .collect()
}

/// Editing state of the works step.
///
/// Besides the selected works it remembers quantities typed in by hand and
/// the works the user switched off, so that neither is lost when the
/// geometry changes or a work is toggled back on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksEditor {
    selected: BTreeMap<String, SelectedWork>,
    #[serde(default)]
    manual: BTreeMap<String, Decimal>,
    #[serde(default)]
    excluded: BTreeSet<String>,
}

impl WorksEditor {
    /// Starts from the works stored in `selection` and brings the auto
    /// entries up to date.
    pub fn from_selection(selection: &Selection) -> Self {
        let manual = selection
            .works
            .values()
            .filter(|w| w.manual)
            .map(|w| (w.id.clone(), w.quantity))
            .collect();
        let mut editor = Self {
            selected: selection.works.clone(),
            manual,
            excluded: BTreeSet::new(),
        };
        editor.sync(selection);
        editor
    }

    /// Recomputes the auto works for the current geometry. Manual entries
    /// stay as typed and switched-off works stay off.
    pub fn sync(
        &mut self,
        selection: &Selection,
    ) {
        for (id, entry) in calculate_auto_works(selection) {
            if self.excluded.contains(&id) || self.manual.contains_key(&id) {
                continue;
            }
            self.selected.insert(id, entry);
        }
    }

    /// Switches a work on or off and returns whether it is now selected.
    ///
    /// Switching back on restores the manual quantity if one was entered,
    /// otherwise the auto-calculated or default quantity.
    pub fn toggle(
        &mut self,
        id: &str,
        selection: &Selection,
    ) -> Result<bool, WorksError> {
        if self.selected.remove(id).is_some() {
            self.excluded.insert(id.to_string());
            debug!(work = id, "work switched off");
            return Ok(false);
        }

        let def = find_work(id).ok_or_else(|| WorksError::UnknownWork(id.to_string()))?;
        self.excluded.remove(id);
        let entry = match self.manual.get(id) {
            Some(quantity) => def.manual_entry(*quantity),
            None => self.computed_entry(def, selection),
        };
        debug!(work = id, quantity = %entry.quantity, manual = entry.manual, "work switched on");
        self.selected.insert(id.to_string(), entry);
        Ok(true)
    }

    /// Sets a quantity by hand. The work is selected if it was not.
    pub fn set_quantity(
        &mut self,
        id: &str,
        quantity: Decimal,
    ) -> Result<(), WorksError> {
        if quantity < Decimal::ZERO {
            return Err(WorksError::NegativeQuantity(quantity));
        }
        let def = find_work(id).ok_or_else(|| WorksError::UnknownWork(id.to_string()))?;

        self.excluded.remove(id);
        self.manual.insert(id.to_string(), quantity);
        self.selected.insert(id.to_string(), def.manual_entry(quantity));
        Ok(())
    }

    /// Drops a manual quantity and goes back to the computed one.
    pub fn reset_to_auto(
        &mut self,
        id: &str,
        selection: &Selection,
    ) -> Result<(), WorksError> {
        let def = find_work(id).ok_or_else(|| WorksError::UnknownWork(id.to_string()))?;
        self.manual.remove(id);
        if self.selected.contains_key(id) {
            let entry = self.computed_entry(def, selection);
            self.selected.insert(id.to_string(), entry);
        }
        Ok(())
    }

    fn computed_entry(
        &self,
        def: &WorkDefinition,
        selection: &Selection,
    ) -> SelectedWork {
        selection
            .effective_dimensions()
            .and_then(|dims| def.auto_entry(&dims, selection))
            .unwrap_or_else(|| def.default_entry())
    }

    pub fn is_selected(
        &self,
        id: &str,
    ) -> bool {
        self.selected.contains_key(id)
    }

    pub fn is_manual(
        &self,
        id: &str,
    ) -> bool {
        self.manual.contains_key(id)
    }

    pub fn works(&self) -> &BTreeMap<String, SelectedWork> {
        &self.selected
    }

    pub fn into_works(self) -> BTreeMap<String, SelectedWork> {
        self.selected
    }

    pub fn grand_total(&self) -> Decimal {
        self.selected.values().map(|w| w.total).sum()
    }

    /// Totals per category; every category is present, empty ones as zero.
    pub fn category_totals(&self) -> BTreeMap<WorkCategory, Decimal> {
        let mut totals: BTreeMap<WorkCategory, Decimal> =
            WorkCategory::ALL.iter().map(|c| (*c, Decimal::ZERO)).collect();
        for work in self.selected.values() {
            *totals.entry(work.category).or_default() += work.total;
        }
        totals
    }
}
