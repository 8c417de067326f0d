//! Receipt record produced by the completion parser

use chrono::NaiveDate;
use serde::Serialize;

/// Validated fields extracted from one receipt.
///
/// Only [`crate::completion`] builds these from model output, so a record in
/// hand always has a start date, a positive total, a vendor and a category.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReceiptRecord {
    start_date: NaiveDate,
    end_date: NaiveDate,
    total: f64,
    vendor: String,
    category: String,
}

impl ReceiptRecord {
    /// Create a new ReceiptRecord
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        total: f64,
        vendor: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            start_date,
            end_date,
            total,
            vendor: vendor.into(),
            category: category.into(),
        }
    }

    /// Single-day receipt: start and end are the same date
    pub fn single_day(
        date: NaiveDate,
        total: f64,
        vendor: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self::new(date, date, total, vendor, category)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns true for multi-day receipts (hotel stays and the like)
    pub fn is_range(&self) -> bool {
        self.start_date != self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_day_is_not_range() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        let record = ReceiptRecord::single_day(date, 123.45, "Test Store", "Food");
        assert_eq!(record.start_date(), record.end_date());
        assert!(!record.is_range());
    }

    #[test]
    fn test_range_receipt() {
        let record = ReceiptRecord::new(
            NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            500.0,
            "Test Hotel",
            "Lodging",
        );
        assert!(record.is_range());
        assert_eq!(record.vendor(), "Test Hotel");
    }

    #[test]
    fn test_serializes_dates_as_iso() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        let record = ReceiptRecord::single_day(date, 9.5, "Cafe", "Food");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["start_date"], "2023-01-15");
        assert_eq!(json["total"], 9.5);
    }
}
