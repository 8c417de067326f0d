//! Render a [`ReceiptRecord`] as a canonical filename:
//!
//!   01-15-2023 - 123.45 - Test_Store - Food.pdf
//!   01-10-2023 to 01-15-2023 - 500.00 - Test_Hotel - Lodging.pdf
//!
//! Other tooling matches on this layout, so separators and substitutions
//! must stay exactly as they are.

use crate::receipt::ReceiptRecord;

const DATE_FORMAT: &str = "%m-%d-%Y";

/// Filename with a `.pdf` extension.
pub fn generate_filename(record: &ReceiptRecord) -> String {
    generate_filename_with_extension(record, ".pdf")
}

/// Filename with a caller-chosen extension (including the leading dot, or
/// empty for none).
pub fn generate_filename_with_extension(record: &ReceiptRecord, ext: &str) -> String {
    format!(
        "{} - {:.2} - {} - {}{}",
        date_segment(record),
        record.total(),
        vendor_segment(record.vendor()),
        category_segment(record.category()),
        ext
    )
}

fn date_segment(record: &ReceiptRecord) -> String {
    let start = record.start_date().format(DATE_FORMAT);
    if record.is_range() {
        format!("{} to {}", start, record.end_date().format(DATE_FORMAT))
    } else {
        start.to_string()
    }
}

fn vendor_segment(vendor: &str) -> String {
    vendor.replace(' ', "_")
}

// Order matters: spaces are replaced before commas are expanded, so
// "Food, Drink" renders as "Food,__Drink".
fn category_segment(category: &str) -> String {
    category.replace(' ', "_").replace(',', ",_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_regular_receipt() {
        let r = ReceiptRecord::single_day(ymd(2023, 1, 15), 123.45, "Test Store", "Food");
        assert_eq!(generate_filename(&r), "01-15-2023 - 123.45 - Test_Store - Food.pdf");
    }

    #[test]
    fn test_hotel_receipt() {
        let r = ReceiptRecord::new(ymd(2023, 1, 15), ymd(2023, 1, 18), 456.78, "Grand Hotel", "Lodging");
        assert_eq!(
            generate_filename(&r),
            "01-15-2023 to 01-18-2023 - 456.78 - Grand_Hotel - Lodging.pdf"
        );
    }

    #[test]
    fn test_special_characters_pass_through() {
        let r = ReceiptRecord::single_day(ymd(2023, 1, 15), 123.45, "Test & Store", "Food & Drink");
        assert_eq!(
            generate_filename(&r),
            "01-15-2023 - 123.45 - Test_&_Store - Food_&_Drink.pdf"
        );
    }

    #[test]
    fn test_category_commas() {
        assert_eq!(category_segment("Food, Drink"), "Food,__Drink");
        assert_eq!(category_segment("Food,Drink"), "Food,_Drink");
        // Vendor commas are left alone
        assert_eq!(vendor_segment("Smith, Jones"), "Smith,_Jones");
    }

    #[test]
    fn test_amount_formatting() {
        let r = ReceiptRecord::single_day(ymd(2023, 1, 15), 17830.81, "A", "B");
        assert!(generate_filename(&r).contains(" - 17830.81 - "));

        let r = ReceiptRecord::single_day(ymd(2023, 1, 15), 500.0, "A", "B");
        assert!(generate_filename(&r).contains(" - 500.00 - "));

        let r = ReceiptRecord::single_day(ymd(2023, 1, 15), 1234567.5, "A", "B");
        assert!(generate_filename(&r).contains(" - 1234567.50 - "));
    }

    #[test]
    fn test_custom_extension() {
        let r = ReceiptRecord::single_day(ymd(2023, 1, 15), 1.0, "A", "B");
        assert_eq!(
            generate_filename_with_extension(&r, ".PDF"),
            "01-15-2023 - 1.00 - A - B.PDF"
        );
        assert_eq!(generate_filename_with_extension(&r, ""), "01-15-2023 - 1.00 - A - B");
    }
}
