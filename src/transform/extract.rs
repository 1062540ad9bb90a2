//! Markup matching rules for the Dream Cruise results container.
//!
//! Everything that depends on the upstream page structure (tag names, CSS
//! classes, the date text format) lives here so it can change without touching
//! table rendering.

use crate::domain::model::{CruiseSection, PriceCell, SailingRecord};
use crate::utils::error::{CruiseError, Result};
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

const SECTION_SELECTOR: &str = "cruise-item-component";
const TITLE_SELECTOR: &str = ".cruise-title > span.text-gradient";
const ROW_SELECTOR: &str = "tbody > tr";
const CELL_SELECTOR: &str = "td";
const PRICE_SELECTOR: &str = ".text-center";
const LOWEST_PRICE_SELECTOR: &str = "span.lowest-sailing-price";

// e.g. "Jan 5, 2024"
const DATE_PATTERN: &str = r"[A-Za-z]{3} [0-9]{1,2}, [0-9]{4}";
const DATE_FORMAT: &str = "%b %d, %Y";

pub const NO_DAY_PLACEHOLDER: &str = "-";

pub struct SectionExtractor {
    section: Selector,
    title: Selector,
    row: Selector,
    cell: Selector,
    price: Selector,
    lowest_price: Selector,
    date_pattern: Regex,
}

impl SectionExtractor {
    pub fn new() -> Result<Self> {
        let date_pattern =
            Regex::new(DATE_PATTERN).map_err(|e| CruiseError::ProcessingError {
                message: format!("invalid date pattern: {}", e),
            })?;

        Ok(Self {
            section: selector(SECTION_SELECTOR)?,
            title: selector(TITLE_SELECTOR)?,
            row: selector(ROW_SELECTOR)?,
            cell: selector(CELL_SELECTOR)?,
            price: selector(PRICE_SELECTOR)?,
            lowest_price: selector(LOWEST_PRICE_SELECTOR)?,
            date_pattern,
        })
    }

    /// Every cruise item section of the fragment, in document order.
    pub fn sections(&self, markup: &str) -> Vec<CruiseSection> {
        let mut document = Html::parse_fragment(markup);
        strip_comments(&mut document);

        document
            .select(&self.section)
            .enumerate()
            .map(|(index, element)| self.parse_section(index, element))
            .collect()
    }

    fn parse_section(&self, index: usize, element: ElementRef<'_>) -> CruiseSection {
        let nights_label = element
            .select(&self.title)
            .next()
            .map(|title| element_text(title).trim().to_string())
            .filter(|label| !label.is_empty());

        let rows = element
            .select(&self.row)
            .map(|row| self.parse_row(row))
            .collect();

        CruiseSection {
            index,
            nights_label,
            rows,
        }
    }

    fn parse_row(&self, row: ElementRef<'_>) -> SailingRecord {
        let (date_text, date) = match self.find_date(row) {
            Some((text, date)) => (Some(text), Some(date)),
            None => (None, None),
        };

        let day_of_week = date
            .map(|d| d.format("%a").to_string())
            .unwrap_or_else(|| NO_DAY_PLACEHOLDER.to_string());

        let price_cells = row
            .select(&self.price)
            .map(|cell| PriceCell {
                display_text: element_text(cell),
                is_lowest: cell.select(&self.lowest_price).next().is_some(),
            })
            .collect();

        SailingRecord {
            date_text,
            date,
            day_of_week,
            price_cells,
        }
    }

    /// First cell whose text holds a parseable "Mon D, YYYY" date.
    fn find_date(&self, row: ElementRef<'_>) -> Option<(String, NaiveDate)> {
        row.select(&self.cell).find_map(|cell| {
            let text = element_text(cell);
            let matched = self.date_pattern.find(&text)?.as_str();
            NaiveDate::parse_from_str(matched, DATE_FORMAT)
                .ok()
                .map(|date| (matched.to_string(), date))
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| CruiseError::ProcessingError {
        message: format!("invalid selector '{}': {:?}", css, e),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

// 頁面上的註解不是資料，先整個移除
fn strip_comments(document: &mut Html) {
    let comment_ids: Vec<_> = document
        .tree
        .nodes()
        .filter(|node| node.value().is_comment())
        .map(|node| node.id())
        .collect();

    for id in comment_ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}
