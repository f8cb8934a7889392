//! Sharing an estimate through a WhatsApp link.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use super::{CompanyProfile, non_empty};
use crate::calculations::common::format_rub;
use crate::models::{ClientInfo, EstimateItem, group_by_section};

const SHARE_URL: &str = "https://api.whatsapp.com/send";
const MAX_LISTED_SECTIONS: usize = 5;
const MIN_PHONE_DIGITS: usize = 11;

#[derive(Debug, Error, PartialEq)]
pub enum WhatsAppError {
    #[error("Некорректный номер телефона")]
    InvalidPhone(String),
}

/// Normalizes a Russian phone number to the `7XXXXXXXXXX` form the share
/// link expects. Empty input stays empty.
///
/// # Examples
///
/// ```
/// use pool_core::export::whatsapp::format_phone;
///
/// assert_eq!(format_phone("8 (985) 200-00-41"), "79852000041");
/// assert_eq!(format_phone("+7 985 200 00 41"), "79852000041");
/// assert_eq!(format_phone("985 200 00 41"), "79852000041");
/// ```
pub fn format_phone(phone: &str) -> String {
    if phone.trim().is_empty() {
        return String::new();
    }

    let mut digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if let Some(rest) = digits.strip_prefix('8') {
        digits = format!("7{rest}");
    }
    if !digits.starts_with('7') {
        digits.insert(0, '7');
    }
    digits
}

/// Message text sent with the estimate.
pub fn build_message(
    client: &ClientInfo,
    total: Decimal,
    items: &[EstimateItem],
    company: &CompanyProfile,
) -> String {
    let client_name = non_empty(Some(client.name.as_str())).unwrap_or("Уважаемый клиент");
    let manager_name =
        non_empty(client.manager_name.as_deref()).unwrap_or(company.default_manager.as_str());
    let manager_phone = non_empty(client.manager_phone.as_deref())
        .unwrap_or(company.default_manager_phone.as_str());

    let groups = group_by_section(items);
    let listed = groups
        .iter()
        .take(MAX_LISTED_SECTIONS)
        .map(|(section, _)| format!("• {section}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Здравствуйте, {client_name}!\n\n\
         Подготовил для вас коммерческое предложение на строительство бассейна.\n\n\
         📊 *Общая стоимость: {total} ₽*\n\n\
         Смета включает {count} позиций в {sections} категориях:\n\
         {listed}\n\n\
         PDF-файл с подробной сметой отправлю следующим сообщением.\n\n\
         Свяжитесь со мной для уточнения деталей и согласования сроков выполнения.\n\n\
         С уважением,\n\
         {manager_name}\n\
         {manager_phone}\n\n\
         ---\n\
         {company_name} - Проектирование и строительство бассейнов\n\
         {website}",
        total = format_rub(total),
        count = items.len(),
        sections = groups.len(),
        company_name = company.name,
        website = company.website,
    )
}

/// Share link opening a chat with `phone` and the message prefilled.
pub fn build_url(
    phone: &str,
    message: &str,
) -> Result<String, WhatsAppError> {
    let formatted = format_phone(phone);
    if formatted.len() < MIN_PHONE_DIGITS {
        return Err(WhatsAppError::InvalidPhone(phone.to_string()));
    }

    debug!(phone = %formatted, "Building WhatsApp share link");
    Ok(format!(
        "{SHARE_URL}?phone={formatted}&text={}",
        urlencoding::encode(message)
    ))
}

/// Message and link for a client in one call.
pub fn share_link(
    client: &ClientInfo,
    total: Decimal,
    items: &[EstimateItem],
    company: &CompanyProfile,
) -> Result<String, WhatsAppError> {
    let message = build_message(client, total, items, company);
    build_url(&client.phone, &message)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::sections;

    fn item(
        id: &str,
        section: &str,
    ) -> EstimateItem {
        EstimateItem {
            id: id.to_string(),
            section: section.to_string(),
            name: id.to_string(),
            price: dec!(100),
            quantity: dec!(1),
            unit: "шт".to_string(),
            total: dec!(100),
            kind: None,
            installation_price: None,
        }
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("89852000041"), "79852000041");
        assert_eq!(format_phone("+7 (985) 200-00-41"), "79852000041");
        assert_eq!(format_phone("123"), "7123");
    }

    #[test]
    fn short_phone_is_rejected() {
        let result = build_url("200-00-41", "hi");

        assert_eq!(result, Err(WhatsAppError::InvalidPhone("200-00-41".to_string())));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Некорректный номер телефона"
        );
    }

    #[test]
    fn url_encodes_message() {
        let url = build_url("8 985 200 00 41", "Привет & пока").unwrap();

        assert_eq!(
            url,
            "https://api.whatsapp.com/send?phone=79852000041&text=%D0%9F%D1%80%D0%B8%D0%B2%D0%B5%D1%82%20%26%20%D0%BF%D0%BE%D0%BA%D0%B0"
        );
    }

    #[test]
    fn message_uses_defaults_for_missing_contacts() {
        let items = vec![item("a", sections::BOWL), item("b", sections::BOWL), item("c", "")];

        let message = build_message(
            &ClientInfo::default(),
            dec!(1250000),
            &items,
            &CompanyProfile::default(),
        );

        assert!(message.starts_with("Здравствуйте, Уважаемый клиент!\n\n"));
        assert!(message.contains("📊 *Общая стоимость: 1 250 000 ₽*"));
        assert!(message.contains("Смета включает 3 позиций в 2 категориях:\n• Чаша бассейна\n• Прочее\n\n"));
        assert!(message.contains("С уважением,\nМенеджер MOSPOOL\n+7 (985) 200-00-41\n"));
        assert!(message.ends_with("MOSPOOL - Проектирование и строительство бассейнов\nwww.mos-pool.ru"));
    }

    #[test]
    fn message_lists_at_most_five_sections() {
        let items: Vec<EstimateItem> = sections::ORDER
            .iter()
            .enumerate()
            .map(|(i, s)| item(&i.to_string(), s))
            .collect();
        let client = ClientInfo {
            name: "Анна".to_string(),
            manager_name: Some("Платон".to_string()),
            ..ClientInfo::default()
        };

        let message = build_message(&client, dec!(10), &items, &CompanyProfile::default());

        assert!(message.contains("8 позиций в 8 категориях"));
        assert_eq!(message.matches("• ").count(), 5);
        assert!(message.contains("Здравствуйте, Анна!"));
        assert!(message.contains("Платон\n"));
    }
}
