//! Contract documents.
//!
//! A [`ContractTemplate`] is a list of sections. Heading and paragraph text
//! may contain `{{KEY}}` placeholders which are filled from the estimate and
//! the client. The `signatures_table` section prints both parties' details
//! side by side.

use std::fmt::Write as _;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::placeholders::{
    CLIENT_EMAIL, CLIENT_NAME, CLIENT_PHONE, CONTRACT_NUMBER, DATE, Placeholders, TOTAL_SUM,
};
use super::{CompanyProfile, document_number, escape_html, non_empty};
use crate::calculations::common::format_rub;
use crate::models::ClientInfo;

/// Printed in place of a missing client field.
pub const BLANK: &str = "_______________________";
const SIGNATURE_LINE: &str = "________________ / ___________";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

impl Alignment {
    fn css(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justified => "justify",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContractSection {
    Heading {
        #[serde(default)]
        text: String,
        #[serde(default = "default_level")]
        level: u8,
        #[serde(default)]
        alignment: Alignment,
    },
    Paragraph {
        #[serde(default)]
        text: String,
        #[serde(default)]
        alignment: Alignment,
    },
    SignaturesTable,
}

fn default_level() -> u8 {
    1
}

impl ContractSection {
    fn heading(
        text: &str,
        level: u8,
        alignment: Alignment,
    ) -> Self {
        Self::Heading {
            text: text.to_string(),
            level,
            alignment,
        }
    }

    fn paragraph(
        text: &str,
        alignment: Alignment,
    ) -> Self {
        Self::Paragraph {
            text: text.to_string(),
            alignment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTemplate {
    #[serde(default)]
    pub name: String,
    pub sections: Vec<ContractSection>,
}

impl ContractTemplate {
    /// Built-in works contract used when no template is configured.
    pub fn standard() -> Self {
        use self::Alignment::{Center, Justified, Right};
        use self::ContractSection as S;

        Self {
            name: "Договор подряда".to_string(),
            sections: vec![
                S::heading("ДОГОВОР ПОДРЯДА № {{CONTRACT_NUMBER}}", 1, Center),
                S::paragraph("г. Москва, {{DATE}}", Right),
                S::paragraph(
                    "{{CLIENT_NAME}}, именуемый в дальнейшем «Заказчик», с одной стороны, \
                     и MOS-POOL, именуемое в дальнейшем «Подрядчик», с другой стороны, \
                     заключили настоящий договор о нижеследующем.",
                    Justified,
                ),
                S::heading("1. ПРЕДМЕТ ДОГОВОРА", 2, Center),
                S::paragraph(
                    "1.1. Подрядчик обязуется выполнить работы по строительству бассейна \
                     согласно смете, являющейся неотъемлемой частью договора, а Заказчик \
                     обязуется принять и оплатить работы.",
                    Justified,
                ),
                S::heading("2. СТОИМОСТЬ И ПОРЯДОК ОПЛАТЫ", 2, Center),
                S::paragraph("2.1. Стоимость работ составляет {{TOTAL_SUM}} рублей.", Justified),
                S::paragraph(
                    "2.2. Предоплата 30% вносится при подписании договора, оставшиеся 70% \
                     оплачиваются после приемки работ.",
                    Justified,
                ),
                S::heading("3. ГАРАНТИИ", 2, Center),
                S::paragraph(
                    "3.1. Гарантия на выполненные работы составляет 2 года. На оборудование \
                     действует гарантия производителя.",
                    Justified,
                ),
                S::heading("4. РЕКВИЗИТЫ И ПОДПИСИ СТОРОН", 2, Center),
                S::SignaturesTable,
            ],
        }
    }
}

impl Default for ContractTemplate {
    fn default() -> Self {
        Self::standard()
    }
}

/// A contract ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDocument {
    pub number: String,
    pub client_name: Option<String>,
    values: Placeholders,
}

impl ContractDocument {
    pub fn new(
        client: &ClientInfo,
        total: Decimal,
        estimate_id: &str,
        date: NaiveDate,
    ) -> Self {
        let number = document_number("Д-", estimate_id);
        let or_blank = |value: Option<&str>| non_empty(value).unwrap_or(BLANK).to_string();

        let values = Placeholders::new()
            .with(CONTRACT_NUMBER, number.clone())
            .with(DATE, date.format("%d.%m.%Y").to_string())
            .with(CLIENT_NAME, or_blank(Some(client.name.as_str())))
            .with(CLIENT_PHONE, or_blank(Some(client.phone.as_str())))
            .with(CLIENT_EMAIL, or_blank(client.email.as_deref()))
            .with(TOTAL_SUM, format_rub(total));

        Self {
            number,
            client_name: non_empty(Some(client.name.as_str())).map(str::to_string),
            values,
        }
    }

    pub fn placeholders(&self) -> &Placeholders {
        &self.values
    }

    /// `Договор_<number>_<client or "Клиент">`, without extension.
    pub fn file_stem(&self) -> String {
        format!(
            "Договор_{}_{}",
            self.number,
            self.client_name.as_deref().unwrap_or("Клиент")
        )
    }

    pub fn render_html(
        &self,
        template: &ContractTemplate,
        company: &CompanyProfile,
    ) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"ru\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Договор № {}</title>\n<style>\n\
             body {{ font-family: 'Times New Roman', serif; max-width: 800px; margin: 40px auto; }}\n\
             table.signatures {{ width: 100%; border-collapse: collapse; }}\n\
             table.signatures td {{ width: 50%; vertical-align: top; padding: 8px; }}\n\
             </style>\n</head>\n<body>\n",
            escape_html(&self.number)
        );

        for section in &template.sections {
            match section {
                ContractSection::Heading {
                    text,
                    level,
                    alignment,
                } => {
                    let level = if (1..=3).contains(level) { *level } else { 1 };
                    let _ = writeln!(
                        html,
                        "<h{level} style=\"text-align: {}\">{}</h{level}>",
                        alignment.css(),
                        escape_html(&self.values.render(text))
                    );
                }
                ContractSection::Paragraph { text, alignment } => {
                    let _ = writeln!(
                        html,
                        "<p style=\"text-align: {}\">{}</p>",
                        alignment.css(),
                        escape_html(&self.values.render(text))
                    );
                }
                ContractSection::SignaturesTable => self.write_signatures(&mut html, company),
            }
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    fn write_signatures(
        &self,
        html: &mut String,
        company: &CompanyProfile,
    ) {
        let contractor = [
            "ПОДРЯДЧИК:".to_string(),
            company.legal_name.clone(),
            "ИНН: ____________".to_string(),
            format!("Тел: {}", company.contract_phone),
            format!("Email: {}", company.contract_email),
            String::new(),
            SIGNATURE_LINE.to_string(),
        ];
        let client = [
            "ЗАКАЗЧИК:".to_string(),
            self.values.render("{{CLIENT_NAME}}"),
            self.values.render("Тел: {{CLIENT_PHONE}}"),
            self.values.render("Email: {{CLIENT_EMAIL}}"),
            "Паспорт: ________________".to_string(),
            String::new(),
            SIGNATURE_LINE.to_string(),
        ];

        html.push_str("<table class=\"signatures\">\n<tr>\n");
        for column in [&contractor, &client] {
            html.push_str("<td>\n");
            for line in column.iter() {
                let _ = writeln!(html, "<p>{}</p>", escape_html(line));
            }
            html.push_str("</td>\n");
        }
        html.push_str("</tr>\n</table>\n");
    }
}
