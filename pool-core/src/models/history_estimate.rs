use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ClientInfo, EstimateItem, Selection};
use crate::validation::{MAX_NAME_LENGTH, ValidationError, ensure_valid};

const COPY_SUFFIX: &str = " (копия)";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateStatus {
    #[default]
    Draft,
    InProgress,
    Completed,
    Archived,
}

impl EstimateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// A saved estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEstimate {
    pub id: i64,
    pub name: String,
    pub status: EstimateStatus,
    pub client_info: Option<ClientInfo>,
    pub selection: Selection,
    pub items: Vec<EstimateItem>,
    pub total: Decimal,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// For saving new estimates (no id or timestamps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHistoryEstimate {
    pub name: String,
    pub status: EstimateStatus,
    pub client_info: Option<ClientInfo>,
    pub selection: Selection,
    pub items: Vec<EstimateItem>,
    pub total: Decimal,
    pub author: Option<String>,
}

impl NewHistoryEstimate {
    /// Builds a draft from the current selection, rejecting an empty or
    /// over-long name and a negative total.
    pub fn new(
        name: impl Into<String>,
        selection: Selection,
        items: Vec<EstimateItem>,
        total: Decimal,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        ensure_valid(&name, total)?;

        let client_info = Some(selection.client_info.clone()).filter(|c| !c.name.is_empty());
        Ok(Self {
            name,
            status: EstimateStatus::Draft,
            client_info,
            selection,
            items,
            total,
            author: None,
        })
    }

    pub fn with_author(
        mut self,
        author: impl Into<String>,
    ) -> Self {
        self.author = Some(author.into());
        self
    }
}

impl HistoryEstimate {
    /// A fresh draft with the same content, named `"<name> (копия)"`.
    /// Long names are shortened so the copy still fits the name limit.
    pub fn duplicate(&self) -> NewHistoryEstimate {
        let room = MAX_NAME_LENGTH - COPY_SUFFIX.chars().count();
        let base: String = self.name.chars().take(room).collect();

        NewHistoryEstimate {
            name: format!("{}{COPY_SUFFIX}", base.trim_end()),
            status: EstimateStatus::Draft,
            client_info: self.client_info.clone(),
            selection: self.selection.clone(),
            items: self.items.clone(),
            total: self.total,
            author: self.author.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::validation::{NAME_REQUIRED, validate_estimate};

    fn saved(name: &str) -> HistoryEstimate {
        let now = Utc::now();
        HistoryEstimate {
            id: 7,
            name: name.to_string(),
            status: EstimateStatus::Completed,
            client_info: None,
            selection: Selection::default(),
            items: vec![],
            total: dec!(2500000),
            author: Some("manager".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            EstimateStatus::Draft,
            EstimateStatus::InProgress,
            EstimateStatus::Completed,
            EstimateStatus::Archived,
        ] {
            assert_eq!(EstimateStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EstimateStatus::parse("sent"), None);
    }

    #[test]
    fn new_estimate_is_a_draft_with_client_from_selection() {
        let mut selection = Selection::default();
        selection.client_info.name = "Иванов".to_string();

        let estimate = NewHistoryEstimate::new("  Бассейн  ", selection, vec![], dec!(1000)).unwrap();

        assert_eq!(estimate.name, "Бассейн");
        assert_eq!(estimate.status, EstimateStatus::Draft);
        assert_eq!(estimate.client_info.map(|c| c.name), Some("Иванов".to_string()));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = NewHistoryEstimate::new("", Selection::default(), vec![], dec!(1000)).unwrap_err();

        assert_eq!(err.messages(), [NAME_REQUIRED.to_string()]);
    }

    #[test]
    fn duplicate_is_named_copy_and_reset_to_draft() {
        let copy = saved("Бассейн 8×4").duplicate();

        assert_eq!(copy.name, "Бассейн 8×4 (копия)");
        assert_eq!(copy.status, EstimateStatus::Draft);
        assert_eq!(copy.total, dec!(2500000));
    }

    #[test]
    fn duplicate_of_long_name_stays_within_limit() {
        let name = "я".repeat(MAX_NAME_LENGTH);

        let copy = saved(&name).duplicate();

        assert_eq!(copy.name.chars().count(), MAX_NAME_LENGTH);
        assert!(copy.name.ends_with(" (копия)"));
        assert_eq!(validate_estimate(&copy.name, copy.total), Vec::<String>::new());
    }
}
