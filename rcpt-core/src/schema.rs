//! Label and date-format tables for model responses.
//!
//! Two response layouts have been used over time:
//!
//!   canonical:  Date / Start Date / End Date, YYYY-MM-DD
//!   legacy:     Date / Check-in Date / Check-out Date, MM/DD/YYYY
//!
//! Both are plain data here so the parser has a single code path.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Receipt field a response label feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Sets both start and end date
    Date,
    StartDate,
    EndDate,
    Total,
    Vendor,
    Category,
}

/// Which labels the parser recognizes and how it reads dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSchema {
    /// chrono format string, e.g. `%Y-%m-%d`
    pub date_format: String,
    /// Human form of `date_format` used in prompts, e.g. `YYYY-MM-DD`
    pub date_hint: String,
    /// Exact, case-sensitive labels. The first label listed for a field is
    /// the one shown to the model.
    pub labels: Vec<(String, Field)>,
}

impl ResponseSchema {
    pub fn canonical() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            date_hint: "YYYY-MM-DD".to_string(),
            labels: table(&[
                ("Date", Field::Date),
                ("Start Date", Field::StartDate),
                ("StartDate", Field::StartDate),
                ("End Date", Field::EndDate),
                ("EndDate", Field::EndDate),
                ("Total", Field::Total),
                ("Vendor", Field::Vendor),
                ("Category", Field::Category),
            ]),
        }
    }

    pub fn legacy() -> Self {
        Self {
            date_format: "%m/%d/%Y".to_string(),
            date_hint: "MM/DD/YYYY".to_string(),
            labels: table(&[
                ("Date", Field::Date),
                ("Check-in Date", Field::StartDate),
                ("Check-out Date", Field::EndDate),
                ("Total", Field::Total),
                ("Vendor", Field::Vendor),
                ("Category", Field::Category),
            ]),
        }
    }

    /// Look up the field for a label (exact match)
    pub fn field_for(&self, label: &str) -> Option<Field> {
        self.labels
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, f)| *f)
    }

    /// Preferred label for a field
    pub fn label_for(&self, field: Field) -> &str {
        self.labels
            .iter()
            .find(|(_, f)| *f == field)
            .map(|(l, _)| l.as_str())
            .unwrap_or("")
    }

    /// Parse `value` in this schema's date format. chrono accepts unpadded
    /// fields and signed years, so the value must also format back to itself.
    pub fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value, &self.date_format)
            .ok()
            .filter(|date| self.format_date(*date) == value)
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}

impl Default for ResponseSchema {
    fn default() -> Self {
        Self::canonical()
    }
}

fn table(entries: &[(&str, Field)]) -> Vec<(String, Field)> {
    entries.iter().map(|(l, f)| (l.to_string(), *f)).collect()
}
