use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::{Bowl, Dimensions, Equipment, Material, MaterialKind, SelectedWork};

/// Customer and manager contacts attached to an estimate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientInfo {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_phone: Option<String>,
}

/// Everything picked in the configurator so far.
///
/// A selection has no identity until it is saved as a
/// [`HistoryEstimate`](super::HistoryEstimate).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Selection {
    pub material: Option<Material>,
    pub dimensions: Option<Dimensions>,
    pub bowl: Option<Bowl>,
    pub filtration: Option<Equipment>,
    pub heating: Option<Equipment>,
    pub parts: Option<Equipment>,
    #[serde(deserialize_with = "deserialize_works")]
    pub works: BTreeMap<String, SelectedWork>,
    pub additional: Vec<Equipment>,
    pub client_info: ClientInfo,
}

/// Replacement of a single selection field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum SelectionUpdate {
    Material(Option<Material>),
    Dimensions(Option<Dimensions>),
    Bowl(Option<Bowl>),
    Filtration(Option<Equipment>),
    Heating(Option<Equipment>),
    Parts(Option<Equipment>),
    Works(BTreeMap<String, SelectedWork>),
    Additional(Vec<Equipment>),
    ClientInfo(ClientInfo),
}

impl Selection {
    /// Replaces one field; the last write wins.
    pub fn apply(
        &mut self,
        update: SelectionUpdate,
    ) {
        match update {
            SelectionUpdate::Material(value) => self.material = value,
            SelectionUpdate::Dimensions(value) => self.dimensions = value,
            SelectionUpdate::Bowl(value) => self.bowl = value,
            SelectionUpdate::Filtration(value) => self.filtration = value,
            SelectionUpdate::Heating(value) => self.heating = value,
            SelectionUpdate::Parts(value) => self.parts = value,
            SelectionUpdate::Works(value) => self.works = value,
            SelectionUpdate::Additional(value) => self.additional = value,
            SelectionUpdate::ClientInfo(value) => self.client_info = value,
        }
    }

    pub fn material_kind(&self) -> Option<MaterialKind> {
        self.material.as_ref().map(|m| m.kind)
    }

    /// Typed dimensions, or the geometry of the chosen bowl.
    pub fn effective_dimensions(&self) -> Option<Dimensions> {
        self.dimensions
            .clone()
            .or_else(|| self.bowl.as_ref().and_then(Bowl::dimensions))
    }

    /// Water volume in m³; zero when neither dimensions nor a bowl is known.
    pub fn volume(&self) -> Decimal {
        if let Some(dims) = &self.dimensions {
            dims.volume()
        } else if let Some(bowl) = &self.bowl {
            bowl.volume()
        } else {
            Decimal::ZERO
        }
    }

    /// Appends an additional option, replacing an earlier one with the same id.
    pub fn add_additional(
        &mut self,
        item: Equipment,
    ) {
        let existing = item.id.as_deref().and_then(|id| {
            self.additional
                .iter()
                .position(|a| a.id.as_deref() == Some(id))
        });
        match existing {
            Some(index) => self.additional[index] = item,
            None => self.additional.push(item),
        }
    }

    /// Number of embedded parts counted for installation hours.
    pub fn parts_count(&self) -> usize {
        match &self.parts {
            Some(parts) if parts.has_items() => parts.items.len(),
            Some(_) => 1,
            None => 0,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WorksRepr {
    Map(BTreeMap<String, SelectedWork>),
    List(Vec<SelectedWork>),
}

/// Works arrive either keyed by id or as a plain list.
fn deserialize_works<'de, D>(deserializer: D) -> Result<BTreeMap<String, SelectedWork>, D::Error>
where
    D: Deserializer<'de>,
{
    let works = match Option::<WorksRepr>::deserialize(deserializer)? {
        Some(WorksRepr::Map(map)) => map,
        Some(WorksRepr::List(list)) => list.into_iter().map(|w| (w.id.clone(), w)).collect(),
        None => BTreeMap::new(),
    };
    Ok(works)
}

const MAX_HISTORY: usize = 20;

/// Undo/redo over selection snapshots.
///
/// Each update pushes a new snapshot and drops any redo future. Only the
/// last twenty snapshots are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionHistory {
    entries: Vec<Selection>,
    index: usize,
}

impl SelectionHistory {
    pub fn new(initial: Selection) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn current(&self) -> &Selection {
        &self.entries[self.index]
    }

    pub fn update(
        &mut self,
        update: SelectionUpdate,
    ) -> &Selection {
        let mut next = self.current().clone();
        next.apply(update);
        self.replace(next)
    }

    /// Pushes a whole new selection as the next snapshot.
    pub fn replace(
        &mut self,
        next: Selection,
    ) -> &Selection {
        self.entries.truncate(self.index + 1);
        self.entries.push(next);
        if self.entries.len() > MAX_HISTORY {
            let overflow = self.entries.len() - MAX_HISTORY;
            self.entries.drain(..overflow);
        }
        self.index = self.entries.len() - 1;
        self.current()
    }

    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SelectionHistory {
    fn default() -> Self {
        Self::new(Selection::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::WorkCategory;

    fn dims(
        length: Decimal,
        width: Decimal,
        depth: Decimal,
    ) -> Dimensions {
        Dimensions::new(length, width, depth)
    }

    #[test]
    fn apply_replaces_single_field() {
        let mut selection = Selection::default();
        selection.apply(SelectionUpdate::Dimensions(Some(dims(dec!(8), dec!(4), dec!(1.5)))));
        selection.apply(SelectionUpdate::Dimensions(Some(dims(dec!(10), dec!(5), dec!(2)))));

        assert_eq!(selection.volume(), dec!(100));
        assert_eq!(selection.bowl, None);
    }

    #[test]
    fn effective_dimensions_fall_back_to_bowl() {
        let selection = Selection {
            bowl: Some(Bowl {
                name: "Compass".to_string(),
                length: Some(dec!(7)),
                width: Some(dec!(3)),
                depth: Some(dec!(1.5)),
                ..Bowl::default()
            }),
            ..Selection::default()
        };

        assert_eq!(selection.effective_dimensions(), Some(dims(dec!(7), dec!(3), dec!(1.5))));
        assert_eq!(selection.volume(), dec!(31.5));
    }

    #[test]
    fn volume_is_zero_without_geometry() {
        assert_eq!(Selection::default().volume(), dec!(0));
        assert_eq!(Selection::default().effective_dimensions(), None);
    }

    #[test]
    fn add_additional_replaces_same_id() {
        let mut selection = Selection::default();
        let mut lamp = Equipment::named("УФ-лампа", dec!(45000));
        lamp.id = Some("uv_lamp".to_string());
        selection.add_additional(lamp.clone());
        lamp.quantity = Some(dec!(2));
        selection.add_additional(lamp);
        selection.add_additional(Equipment::named("Лестница", dec!(35000)));

        assert_eq!(selection.additional.len(), 2);
        assert_eq!(selection.additional[0].quantity, Some(dec!(2)));
    }

    #[test]
    fn works_deserialize_from_map_or_list() {
        let from_map: Selection = serde_json::from_str(
            r#"{"works": {"excavation": {"id": "excavation", "name": "Котлован", "category": "earthworks", "unit": "м³", "quantity": 10, "total": 15000}}}"#,
        )
        .unwrap();
        let from_list: Selection = serde_json::from_str(
            r#"{"works": [{"id": "excavation", "name": "Котлован", "category": "earthworks", "unit": "м³", "quantity": 10, "total": 15000}]}"#,
        )
        .unwrap();

        assert_eq!(from_map.works, from_list.works);
        assert_eq!(from_map.works["excavation"].category, WorkCategory::Earthworks);
        assert!(!from_map.works["excavation"].manual);
    }

    #[test]
    fn null_fields_deserialize_as_empty() {
        let selection: Selection =
            serde_json::from_str(r#"{"material": null, "works": null, "clientInfo": {"name": "Иван", "phone": ""}}"#)
                .unwrap();

        assert!(selection.works.is_empty());
        assert_eq!(selection.client_info.name, "Иван");
    }

    // ── history ──────────────────────────────────────────────────────────

    #[test]
    fn undo_and_redo_walk_snapshots() {
        let mut history = SelectionHistory::default();
        history.update(SelectionUpdate::Dimensions(Some(dims(dec!(8), dec!(4), dec!(1.5)))));

        assert!(history.can_undo());
        assert!(history.undo());
        assert_eq!(history.current().dimensions, None);
        assert!(history.redo());
        assert_eq!(history.current().volume(), dec!(48));
        assert!(!history.redo());
    }

    #[test]
    fn update_after_undo_drops_future() {
        let mut history = SelectionHistory::default();
        history.update(SelectionUpdate::Dimensions(Some(dims(dec!(8), dec!(4), dec!(1.5)))));
        history.undo();
        history.update(SelectionUpdate::Dimensions(Some(dims(dec!(6), dec!(3), dec!(1.5)))));

        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().volume(), dec!(27));
    }

    #[test]
    fn history_is_capped() {
        let mut history = SelectionHistory::default();
        for i in 1..=30 {
            history.update(SelectionUpdate::Dimensions(Some(dims(Decimal::from(i), dec!(1), dec!(1)))));
        }

        assert_eq!(history.len(), 20);
        let mut undos = 0;
        while history.undo() {
            undos += 1;
        }
        assert_eq!(undos, 19);
        assert_eq!(history.current().volume(), dec!(11));
    }
}
