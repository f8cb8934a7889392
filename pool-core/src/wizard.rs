//! Configurator step navigation.
//!
//! The wizard always starts at `material`. A composite pool continues with
//! the bowl catalog; every other material asks for dimensions instead. The
//! remaining seven steps follow in a fixed order.

use serde::{Deserialize, Serialize};

use crate::models::MaterialKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Material,
    Dimensions,
    Bowl,
    Filtration,
    Heating,
    Parts,
    Works,
    Additional,
    Summary,
}

impl Step {
    pub const ALL: [Step; 9] = [
        Self::Material,
        Self::Dimensions,
        Self::Bowl,
        Self::Filtration,
        Self::Heating,
        Self::Parts,
        Self::Works,
        Self::Additional,
        Self::Summary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Material => "material",
            Self::Dimensions => "dimensions",
            Self::Bowl => "bowl",
            Self::Filtration => "filtration",
            Self::Heating => "heating",
            Self::Parts => "parts",
            Self::Works => "works",
            Self::Additional => "additional",
            Self::Summary => "summary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Material => "Тип",
            Self::Dimensions => "Размеры",
            Self::Bowl => "Чаша",
            Self::Filtration => "Фильтрация",
            Self::Heating => "Подогрев",
            Self::Parts => "Закладные",
            Self::Works => "Работы",
            Self::Additional => "Опции",
            Self::Summary => "Смета",
        }
    }
}

/// Steps shown for the chosen material, in order.
pub fn visible_steps(material: Option<MaterialKind>) -> Vec<Step> {
    let second = match material {
        Some(MaterialKind::Composite) => Step::Bowl,
        _ => Step::Dimensions,
    };
    vec![
        Step::Material,
        second,
        Step::Filtration,
        Step::Heating,
        Step::Parts,
        Step::Works,
        Step::Additional,
        Step::Summary,
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepNavigator {
    current: Step,
    visible: Vec<Step>,
}

impl StepNavigator {
    pub fn new(material: Option<MaterialKind>) -> Self {
        Self {
            current: Step::Material,
            visible: visible_steps(material),
        }
    }

    /// Opens the wizard at the step named in a `?step=` query value.
    /// Unknown or hidden steps fall back to `material`.
    pub fn from_query(
        step: Option<&str>,
        material: Option<MaterialKind>,
    ) -> Self {
        let mut navigator = Self::new(material);
        if let Some(step) = step.and_then(Step::parse) {
            navigator.go_to(step);
        }
        navigator
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn visible_steps(&self) -> &[Step] {
        &self.visible
    }

    pub fn current_index(&self) -> usize {
        self.visible
            .iter()
            .position(|s| *s == self.current)
            .unwrap_or_default()
    }

    /// Recomputes the visible steps after the material changed; leaves a
    /// step that became hidden for `material`.
    pub fn sync(
        &mut self,
        material: Option<MaterialKind>,
    ) {
        self.visible = visible_steps(material);
        if !self.visible.contains(&self.current) {
            self.current = Step::Material;
        }
    }

    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.current = self.visible[self.current_index() + 1];
        true
    }

    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.current = self.visible[self.current_index() - 1];
        true
    }

    /// Jumps to a visible step; hidden steps are ignored.
    pub fn go_to(
        &mut self,
        step: Step,
    ) -> bool {
        if !self.visible.contains(&step) {
            return false;
        }
        self.current = step;
        true
    }

    pub fn go_to_index(
        &mut self,
        index: usize,
    ) -> bool {
        match self.visible.get(index) {
            Some(step) => {
                self.current = *step;
                true
            }
            None => false,
        }
    }

    pub fn can_go_next(&self) -> bool {
        self.current_index() + 1 < self.visible.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.current_index() > 0
    }

    pub fn is_first(&self) -> bool {
        self.current_index() == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index() + 1 == self.visible.len()
    }
}

impl Default for StepNavigator {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn composite_shows_bowl_instead_of_dimensions() {
        let steps = visible_steps(Some(MaterialKind::Composite));

        assert_eq!(steps[1], Step::Bowl);
        assert!(!steps.contains(&Step::Dimensions));
        assert_eq!(steps.len(), 8);
    }

    #[test]
    fn other_materials_show_dimensions() {
        assert_eq!(visible_steps(None)[1], Step::Dimensions);
        assert_eq!(visible_steps(Some(MaterialKind::Concrete))[1], Step::Dimensions);
    }

    #[test]
    fn walks_forward_to_summary_and_back() {
        let mut nav = StepNavigator::new(Some(MaterialKind::Polypropylene));

        assert!(nav.is_first());
        assert!(!nav.back());
        while nav.next() {}
        assert_eq!(nav.current(), Step::Summary);
        assert!(nav.is_last());
        assert!(!nav.can_go_next());
        assert!(nav.back());
        assert_eq!(nav.current(), Step::Additional);
    }

    #[test]
    fn hidden_step_falls_back_to_material() {
        let mut nav = StepNavigator::new(Some(MaterialKind::Composite));
        assert!(nav.go_to(Step::Bowl));

        nav.sync(Some(MaterialKind::Polypropylene));

        assert_eq!(nav.current(), Step::Material);
    }

    #[test]
    fn go_to_ignores_hidden_steps() {
        let mut nav = StepNavigator::new(Some(MaterialKind::Composite));

        assert!(!nav.go_to(Step::Dimensions));
        assert_eq!(nav.current(), Step::Material);
        assert!(nav.go_to_index(3));
        assert_eq!(nav.current(), Step::Heating);
        assert!(!nav.go_to_index(8));
    }

    #[test]
    fn query_step_is_honoured_when_visible() {
        let nav = StepNavigator::from_query(Some("works"), None);
        assert_eq!(nav.current(), Step::Works);

        let nav = StepNavigator::from_query(Some("bowl"), Some(MaterialKind::Concrete));
        assert_eq!(nav.current(), Step::Material);

        let nav = StepNavigator::from_query(Some("checkout"), None);
        assert_eq!(nav.current(), Step::Material);
    }

    #[test]
    fn labels_and_parsing() {
        assert_eq!(Step::parse("parts"), Some(Step::Parts));
        assert_eq!(Step::Parts.label(), "Закладные");
        assert_eq!(Step::parse("Parts"), None);
    }
}
