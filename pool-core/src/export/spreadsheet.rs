//! Spreadsheet export.
//!
//! The estimate is written as CSV with one header row, a title row per
//! section followed by its items, and a closing `ИТОГО:` row. Amounts are
//! plain decimals so spreadsheet applications read them as numbers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{EstimateItem, group_by_section};

pub const HEADER: [&str; 5] = ["Наименование", "Ед. изм.", "Кол-во", "Цена", "Сумма"];

#[derive(Debug, Error, PartialEq)]
pub enum SpreadsheetError {
    #[error("CSV write error: {0}")]
    Csv(String),

    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(String),
}

impl From<csv::Error> for SpreadsheetError {
    fn from(err: csv::Error) -> Self {
        SpreadsheetError::Csv(err.to_string())
    }
}

/// Writes the estimate as CSV text.
pub fn estimate_csv(
    items: &[EstimateItem],
    total: Decimal,
) -> Result<String, SpreadsheetError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for (section, group) in group_by_section(items) {
        writer.write_record([section, "", "", "", ""])?;
        for item in group {
            let unit = if item.unit.is_empty() { "шт" } else { item.unit.as_str() };
            let quantity = item.quantity.normalize().to_string();
            let price = item.price.normalize().to_string();
            let line_total = item.total.normalize().to_string();
            writer.write_record([
                item.name.as_str(),
                unit,
                quantity.as_str(),
                price.as_str(),
                line_total.as_str(),
            ])?;
        }
    }

    let total = total.normalize().to_string();
    writer.write_record(["ИТОГО:", "", "", "", total.as_str()])?;

    let bytes = writer
        .into_inner()
        .map_err(|e| SpreadsheetError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SpreadsheetError::Encoding(e.to_string()))
}

/// `Смета_<dd-mm-yyyy>.csv`
pub fn file_name(date: NaiveDate) -> String {
    format!("Смета_{}.csv", date.format("%d-%m-%Y"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::sections;

    fn item(
        name: &str,
        section: &str,
        unit: &str,
        price: Decimal,
        quantity: Decimal,
    ) -> EstimateItem {
        EstimateItem {
            id: name.to_string(),
            section: section.to_string(),
            name: name.to_string(),
            price,
            quantity,
            unit: unit.to_string(),
            total: price * quantity,
            kind: None,
            installation_price: None,
        }
    }

    #[test]
    fn writes_sections_items_and_total() {
        let items = vec![
            item("Чаша 6x3", sections::BOWL, "шт", dec!(450000), dec!(1)),
            item("Выемка грунта", sections::CONSTRUCTION, "м³", dec!(1500), dec!(53.1)),
            item("Лестница, 3 ступени", sections::BOWL, "", dec!(25000.00), dec!(1)),
        ];

        let csv = estimate_csv(&items, dec!(554650)).unwrap();

        assert_eq!(
            csv,
            "Наименование,Ед. изм.,Кол-во,Цена,Сумма\n\
             Чаша бассейна,,,,\n\
             Чаша 6x3,шт,1,450000,450000\n\
             \"Лестница, 3 ступени\",шт,1,25000,25000\n\
             Строительные работы,,,,\n\
             Выемка грунта,м³,53.1,1500,79650\n\
             ИТОГО:,,,,554650\n"
        );
    }

    #[test]
    fn empty_estimate_has_header_and_total() {
        let csv = estimate_csv(&[], dec!(0)).unwrap();

        assert_eq!(csv, "Наименование,Ед. изм.,Кол-во,Цена,Сумма\nИТОГО:,,,,0\n");
    }

    #[test]
    fn file_name_uses_dashed_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();

        assert_eq!(file_name(date), "Смета_05-03-2026.csv");
    }
}
