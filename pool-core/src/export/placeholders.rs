//! `{{KEY}}` substitution for document templates.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}")
        .expect("PLACEHOLDER regex should compile - this is a bug")
});

pub const CONTRACT_NUMBER: &str = "CONTRACT_NUMBER";
pub const DATE: &str = "DATE";
pub const CLIENT_NAME: &str = "CLIENT_NAME";
pub const CLIENT_PHONE: &str = "CLIENT_PHONE";
pub const CLIENT_EMAIL: &str = "CLIENT_EMAIL";
pub const TOTAL_SUM: &str = "TOTAL_SUM";

/// Values substituted into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    values: BTreeMap<String, String>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Replaces every known `{{KEY}}`; unknown keys are kept as written.
    ///
    /// # Examples
    ///
    /// ```
    /// use pool_core::export::Placeholders;
    ///
    /// let values = Placeholders::new().with("CLIENT_NAME", "Анна");
    /// assert_eq!(
    ///     values.render("Заказчик: {{CLIENT_NAME}}, {{PASSPORT}}"),
    ///     "Заказчик: Анна, {{PASSPORT}}"
    /// );
    /// ```
    pub fn render(
        &self,
        text: &str,
    ) -> String {
        PLACEHOLDER
            .replace_all(text, |caps: &Captures<'_>| match self.values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}
