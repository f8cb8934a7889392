//! Commercial proposal ("КП") rendered as a printable HTML page.

use std::fmt::Write as _;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{CompanyProfile, document_number, escape_html, non_empty};
use crate::calculations::common::format_rub;
use crate::models::{ClientInfo, EstimateItem, group_by_section};

const ABOUT: [&str; 5] = [
    "Понятные сметы с фиксированной стоимостью",
    "Четкие сроки выполнения работ",
    "Официальную гарантию на все работы",
    "Использование качественного европейского оборудования",
    "Профессиональную команду специалистов с опытом более 10 лет",
];

const ADVANTAGES: [(&str, &str); 4] = [
    ("Опыт", "Более 100 реализованных проектов различной сложности"),
    ("Качество", "Используем проверенное европейское оборудование топ-брендов"),
    ("Гарантия", "Предоставляем официальную гарантию на работы и оборудование"),
    ("Сервис", "Полное сопровождение проекта от проектирования до сдачи"),
];

const TERMS: [&str; 4] = [
    "Оплата: 30% предоплата, 70% по факту выполнения работ",
    "Срок выполнения: рассчитывается индивидуально",
    "Гарантия: 2 года на выполненные работы",
    "Гарантия на оборудование: согласно гарантии производителя",
];

#[derive(Debug, Clone)]
pub struct ProposalDocument<'a> {
    pub number: String,
    pub date: NaiveDate,
    pub client: &'a ClientInfo,
    pub items: &'a [EstimateItem],
    pub total: Decimal,
}

impl<'a> ProposalDocument<'a> {
    pub fn new(
        client: &'a ClientInfo,
        items: &'a [EstimateItem],
        total: Decimal,
        estimate_id: &str,
        date: NaiveDate,
    ) -> Self {
        Self {
            number: document_number("КП-", estimate_id),
            date,
            client,
            items,
            total,
        }
    }

    pub fn file_stem(&self) -> String {
        let client = non_empty(Some(self.client.name.as_str())).unwrap_or("Клиент");
        format!("КП_{}_{client}", self.number)
    }

    pub fn render_html(
        &self,
        company: &CompanyProfile,
    ) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"ru\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Коммерческое предложение № {}</title>\n<style>\n\
             body {{ font-family: Roboto, Arial, sans-serif; max-width: 900px; margin: 40px auto; }}\n\
             section {{ page-break-after: always; }}\n\
             .cover {{ text-align: center; }}\n\
             table {{ width: 100%; border-collapse: collapse; margin-bottom: 24px; }}\n\
             th {{ background: #00b4d8; color: #fff; }}\n\
             th, td {{ padding: 6px; border-bottom: 1px solid #ddd; }}\n\
             td.num {{ text-align: right; white-space: nowrap; }}\n\
             </style>\n</head>\n<body>\n",
            escape_html(&self.number)
        );

        self.write_cover(&mut html, company);
        self.write_about(&mut html, company);
        self.write_items(&mut html);
        self.write_summary(&mut html);

        let _ = write!(
            html,
            "<footer>{} | {}</footer>\n</body>\n</html>\n",
            escape_html(&company.name),
            escape_html(&self.number)
        );
        html
    }

    fn write_cover(
        &self,
        html: &mut String,
        company: &CompanyProfile,
    ) {
        html.push_str("<section class=\"cover\">\n");
        let _ = writeln!(html, "<h1>{}</h1>", escape_html(&company.name));
        let _ = writeln!(html, "<p>{}</p>", escape_html(&company.tagline));
        html.push_str("<hr>\n<h2>КОММЕРЧЕСКОЕ ПРЕДЛОЖЕНИЕ</h2>\n");
        let _ = writeln!(
            html,
            "<p>№ {} от {}</p>",
            escape_html(&self.number),
            self.date.format("%d.%m.%Y")
        );

        if let Some(name) = non_empty(Some(self.client.name.as_str())) {
            let _ = writeln!(html, "<p>Для:</p>\n<p><strong>{}</strong></p>", escape_html(name));
            if let Some(phone) = non_empty(Some(self.client.phone.as_str())) {
                let _ = writeln!(html, "<p>тел: {}</p>", escape_html(phone));
            }
        }

        let _ = writeln!(
            html,
            "<p>Стоимость проекта:</p>\n<p><strong>{} ₽</strong></p>",
            format_rub(self.total)
        );
        let _ = writeln!(
            html,
            "<p>{}</p>\n<p>{} | {}</p>\n<p>{}</p>",
            escape_html(&company.region),
            escape_html(&company.phone),
            escape_html(&company.email),
            escape_html(&company.website)
        );
        html.push_str("</section>\n");
    }

    fn write_about(
        &self,
        html: &mut String,
        company: &CompanyProfile,
    ) {
        html.push_str("<section>\n");
        let _ = writeln!(html, "<h2>О КОМПАНИИ {}</h2>", escape_html(&company.name));
        let _ = writeln!(
            html,
            "<p>Компания {} специализируется на строительстве бассейнов, хаммамов, бань, саун, \
             джакузи, купелей и SPA-комплексов под ключ.</p>",
            escape_html(&company.name)
        );
        html.push_str("<p>Мы предлагаем:</p>\n<ul>\n");
        for line in ABOUT {
            let _ = writeln!(html, "<li>{line}</li>");
        }
        html.push_str("</ul>\n<h2>НАШИ ПРЕИМУЩЕСТВА</h2>\n<dl>\n");
        for (title, text) in ADVANTAGES {
            let _ = writeln!(html, "<dt>◆ {title}:</dt>\n<dd>{text}</dd>");
        }
        html.push_str("</dl>\n</section>\n");
    }

    fn write_items(
        &self,
        html: &mut String,
    ) {
        html.push_str("<section>\n<h2>СОСТАВ КОММЕРЧЕСКОГО ПРЕДЛОЖЕНИЯ</h2>\n");
        for (section, items) in group_by_section(self.items) {
            let _ = writeln!(html, "<h3>{}</h3>", escape_html(section));
            html.push_str(
                "<table>\n<tr><th>Наименование</th><th>Кол-во</th><th>Ед.</th>\
                 <th>Цена</th><th>Сумма</th></tr>\n",
            );
            for item in items {
                let quantity = if item.quantity.is_zero() { Decimal::ONE } else { item.quantity };
                let unit = if item.unit.is_empty() { "шт" } else { item.unit.as_str() };
                let _ = writeln!(
                    html,
                    "<tr><td>{}</td><td class=\"num\">{}</td><td>{}</td>\
                     <td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
                    escape_html(&item.name),
                    quantity.normalize(),
                    escape_html(unit),
                    money_cell(item.price),
                    money_cell(item.total)
                );
            }
            html.push_str("</table>\n");
        }
        html.push_str("</section>\n");
    }

    fn write_summary(
        &self,
        html: &mut String,
    ) {
        html.push_str("<section>\n<h2>ИТОГО</h2>\n");
        let _ = writeln!(
            html,
            "<p><strong>ОБЩАЯ СТОИМОСТЬ:</strong> {} ₽</p>",
            format_rub(self.total)
        );
        html.push_str("<h2>УСЛОВИЯ СОТРУДНИЧЕСТВА</h2>\n<ul>\n");
        for term in TERMS {
            let _ = writeln!(html, "<li>{term}</li>");
        }
        html.push_str("</ul>\n");

        let manager = non_empty(self.client.manager_name.as_deref());
        let manager_phone = non_empty(self.client.manager_phone.as_deref());
        if manager.is_some() || manager_phone.is_some() {
            html.push_str("<h2>ВАШ МЕНЕДЖЕР</h2>\n");
            if let Some(name) = manager {
                let _ = writeln!(html, "<p>Менеджер: {}</p>", escape_html(name));
            }
            if let Some(phone) = manager_phone {
                let _ = writeln!(html, "<p>Телефон: {}</p>", escape_html(phone));
            }
        }

        html.push_str(
            "<p><small>Данное коммерческое предложение не является публичной офертой.<br>\
             Окончательная стоимость определяется после осмотра объекта.</small></p>\n\
             </section>\n",
        );
    }
}

/// Empty for a zero amount.
fn money_cell(value: Decimal) -> String {
    if value.is_zero() {
        String::new()
    } else {
        format!("{} ₽", format_rub(value))
    }
}
