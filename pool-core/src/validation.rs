//! Checks run before an estimate is saved.
//!
//! | Rule                         | Message                                           |
//! |------------------------------|---------------------------------------------------|
//! | name is empty or blank       | Название сметы обязательно                        |
//! | name longer than 200 chars   | Название сметы не должно превышать 200 символов   |
//! | total below zero             | Сумма сметы не может быть отрицательной           |

use rust_decimal::Decimal;
use thiserror::Error;

pub const MAX_NAME_LENGTH: usize = 200;

pub const NAME_REQUIRED: &str = "Название сметы обязательно";
pub const NAME_TOO_LONG: &str = "Название сметы не должно превышать 200 символов";
pub const NEGATIVE_TOTAL: &str = "Сумма сметы не может быть отрицательной";

/// One or more validation rules failed. Messages are user-facing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", .0.join("; "))]
pub struct ValidationError(pub Vec<String>);

impl ValidationError {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

/// Returns every rule the estimate breaks; empty when it is valid.
pub fn validate_estimate(
    name: &str,
    total: Decimal,
) -> Vec<String> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push(NAME_REQUIRED.to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        errors.push(NAME_TOO_LONG.to_string());
    }
    if total < Decimal::ZERO {
        errors.push(NEGATIVE_TOTAL.to_string());
    }

    errors
}

pub fn ensure_valid(
    name: &str,
    total: Decimal,
) -> Result<(), ValidationError> {
    let errors = validate_estimate(name, total);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn valid_estimate_has_no_errors() {
        assert!(validate_estimate("Бассейн 8×4", dec!(1500000)).is_empty());
        assert_eq!(ensure_valid("Бассейн", dec!(0)), Ok(()));
    }

    #[test]
    fn empty_and_blank_names_are_rejected() {
        assert_eq!(validate_estimate("", dec!(100)), vec![NAME_REQUIRED.to_string()]);
        assert_eq!(validate_estimate("   ", dec!(100)), vec![NAME_REQUIRED.to_string()]);
    }

    #[test]
    fn long_name_is_counted_in_characters() {
        let exactly = "ж".repeat(MAX_NAME_LENGTH);
        let over = "ж".repeat(MAX_NAME_LENGTH + 1);

        assert!(validate_estimate(&exactly, dec!(1)).is_empty());
        assert_eq!(validate_estimate(&over, dec!(1)), vec![NAME_TOO_LONG.to_string()]);
    }

    #[test]
    fn negative_total_is_rejected() {
        assert_eq!(validate_estimate("Смета", dec!(-0.01)), vec![NEGATIVE_TOTAL.to_string()]);
    }

    #[test]
    fn error_joins_all_messages() {
        let err = ensure_valid("", dec!(-5)).unwrap_err();

        assert_eq!(err.messages().len(), 2);
        assert_eq!(err.to_string(), format!("{NAME_REQUIRED}; {NEGATIVE_TOTAL}"));
    }
}
