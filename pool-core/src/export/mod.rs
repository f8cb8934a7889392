//! Documents produced from a finished estimate.
//!
//! | Module          | Output                                           |
//! |-----------------|--------------------------------------------------|
//! | `whatsapp`      | message text and `api.whatsapp.com` share link   |
//! | `placeholders`  | `{{KEY}}` substitution used by templates         |
//! | `contract`      | contract HTML built from a section template      |
//! | `proposal`      | commercial proposal HTML                         |
//! | `spreadsheet`   | CSV estimate grouped by section                  |
//! | `description`   | sales copy for the pool                          |

pub mod contract;
pub mod description;
pub mod placeholders;
pub mod proposal;
pub mod spreadsheet;
pub mod whatsapp;

use serde::{Deserialize, Serialize};

pub use contract::{Alignment, ContractDocument, ContractSection, ContractTemplate};
pub use description::{DescriptionInput, Descriptions, PriceSegment, Season, SizeCategory};
pub use placeholders::Placeholders;
pub use proposal::ProposalDocument;
pub use spreadsheet::{SpreadsheetError, estimate_csv};
pub use whatsapp::WhatsAppError;

/// Branding printed on every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub name: String,
    /// Name used in contracts.
    pub legal_name: String,
    pub tagline: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub region: String,
    pub contract_phone: String,
    pub contract_email: String,
    pub default_manager: String,
    pub default_manager_phone: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "MOSPOOL".to_string(),
            legal_name: "MOS-POOL".to_string(),
            tagline: "Проектирование и строительство бассейнов и SPA".to_string(),
            phone: "+7 985 200-00-41".to_string(),
            email: "mospool@mail.ru".to_string(),
            website: "www.mos-pool.ru".to_string(),
            region: "Москва и Московская область".to_string(),
            contract_phone: "+7 (919) 296-16-47".to_string(),
            contract_email: "info@mos-pool.ru".to_string(),
            default_manager: "Менеджер MOSPOOL".to_string(),
            default_manager_phone: "+7 (985) 200-00-41".to_string(),
        }
    }
}

/// `<prefix><last four characters of id>`, e.g. `Д-0042`.
pub fn document_number(
    prefix: &str,
    id: &str,
) -> String {
    let chars: Vec<char> = id.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{prefix}{tail}")
}

/// Escapes text for an HTML body or attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn document_number_uses_id_tail() {
        assert_eq!(document_number("Д-", "1700000000042"), "Д-0042");
        assert_eq!(document_number("КП-", "17"), "КП-17");
        assert_eq!(document_number("КП-", ""), "КП-");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"ООО Рога & Копыта"</b>"#),
            "&lt;b&gt;&quot;ООО Рога &amp; Копыта&quot;&lt;/b&gt;"
        );
    }
}
