use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Inner markup of the rendered results container, produced once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPageFragment(String);

impl RawPageFragment {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCell {
    pub display_text: String,
    pub is_lowest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SailingRecord {
    pub date_text: Option<String>,
    pub date: Option<NaiveDate>,
    /// 三個字母的星期縮寫，沒有日期時為 "-"
    pub day_of_week: String,
    pub price_cells: Vec<PriceCell>,
}

/// One `cruise-item-component` block as found in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CruiseSection {
    pub index: usize,
    pub nights_label: Option<String>,
    pub rows: Vec<SailingRecord>,
}

/// Price tier columns; fixed per transformer version, never inferred per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableLayout {
    Legacy,
    #[default]
    Current,
}

impl TableLayout {
    pub fn price_tiers(&self) -> &'static [&'static str] {
        match self {
            TableLayout::Legacy => &["Balcony", "Suite"],
            TableLayout::Current => &["Interior", "Oceanview", "Balcony", "Suite"],
        }
    }
}

impl FromStr for TableLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(TableLayout::Legacy),
            "current" => Ok(TableLayout::Current),
            other => Err(format!("unknown table layout '{other}' (expected legacy or current)")),
        }
    }
}

impl fmt::Display for TableLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableLayout::Legacy => write!(f, "legacy"),
            TableLayout::Current => write!(f, "current"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBlock {
    pub heading: String,
    pub row_count: usize,
    pub html: String,
}

/// 最終產物：依原順序排列的各晚數區塊，同時也是郵件內容
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryDocument {
    pub blocks: Vec<SectionBlock>,
    pub skipped_sections: usize,
}

impl SummaryDocument {
    pub fn to_html(&self) -> String {
        self.blocks.iter().map(|b| b.html.as_str()).collect()
    }

    pub fn section_count(&self) -> usize {
        self.blocks.len()
    }
}

#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeliveryOutcome {
    Delivered,
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}

/// Outcome of one run; also the body of the serverless response.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub sections: usize,
    pub skipped_sections: usize,
    pub delivery: DeliveryOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_run_report_json_shape() {
        let report = RunReport {
            sections: 3,
            skipped_sections: 1,
            delivery: DeliveryOutcome::Failed {
                reason: "535 auth failed".to_string(),
            },
        };

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "sections": 3,
                "skipped_sections": 1,
                "delivery": { "status": "failed", "reason": "535 auth failed" }
            })
        );
    }

    #[test]
    fn test_delivered_outcome_has_no_reason() {
        assert_eq!(
            serde_json::to_value(DeliveryOutcome::Delivered).unwrap(),
            json!({ "status": "delivered" })
        );
    }

    #[test]
    fn test_layout_parses_case_insensitively() {
        assert_eq!("Legacy".parse::<TableLayout>(), Ok(TableLayout::Legacy));
        assert_eq!(" current ".parse::<TableLayout>(), Ok(TableLayout::Current));
        assert!("compact".parse::<TableLayout>().is_err());
    }
}
