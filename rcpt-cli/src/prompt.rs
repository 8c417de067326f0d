use chrono::NaiveDate;
use rcpt_core::{Field, ResponseSchema};

/// Build the extraction prompt for one receipt. Labels and the date format
/// come from `schema`, so the model is asked for exactly what the parser reads.
pub fn build_prompt(receipt_text: &str, schema: &ResponseSchema) -> String {
    let date = schema.label_for(Field::Date);
    let start = schema.label_for(Field::StartDate);
    let end = schema.label_for(Field::EndDate);
    let total = schema.label_for(Field::Total);
    let vendor = schema.label_for(Field::Vendor);
    let category = schema.label_for(Field::Category);
    let hint = &schema.date_hint;

    let example_date = example(schema, 2023, 1, 15);
    let example_start = example(schema, 2023, 1, 10);

    let mut s = String::new();
    s.push_str(
        "You are a helpful assistant that extracts information from receipts. \
Please analyze this existing receipt and extract the following information:\n\n",
    );
    s.push_str("Receipt Text:\n");
    s.push_str(receipt_text.trim());
    s.push_str("\n\n");

    s.push_str("Please extract and provide ONLY the following information in this exact format:\n");
    s.push_str(&format!("{date}: {hint} (for regular receipts)\n"));
    s.push_str(&format!("{start}: {hint} (for hotel receipts)\n"));
    s.push_str(&format!("{end}: {hint} (for hotel receipts)\n"));
    s.push_str(&format!(
        "{total}: XXXX.XX (numeric value only, no currency symbols or text)\n"
    ));
    s.push_str(&format!("{vendor}: Name\n"));
    s.push_str(&format!(
        "{category}: Type (choose the single most appropriate category)\n\n"
    ));

    s.push_str("Important instructions:\n");
    let rules = [
        "Keep the original currency amount without conversion".to_string(),
        "Do not include any currency symbols, codes, or text".to_string(),
        format!("For hotel receipts, use {start} and {end} instead of {date}"),
        "If any field cannot be determined from the receipt, leave it empty but keep the label"
            .to_string(),
        format!("For dates, always use {hint} format"),
        "For totals, always use decimal point (.) and no currency symbols or text".to_string(),
        "For category, choose ONE most appropriate category (do not list multiple categories)"
            .to_string(),
        "Do not include any additional text or notes in the output".to_string(),
    ];
    for (i, rule) in rules.iter().enumerate() {
        s.push_str(&format!("{}. {}\n", i + 1, rule));
    }

    s.push_str("\nExample output for a regular receipt:\n");
    s.push_str(&format!("{date}: {example_date}\n"));
    s.push_str(&format!("{total}: 123.45\n{vendor}: Test Store\n{category}: Food\n"));

    s.push_str("\nExample output for a hotel receipt:\n");
    s.push_str(&format!("{start}: {example_start}\n{end}: {example_date}\n"));
    s.push_str(&format!("{total}: 1234.56\n{vendor}: Grand Hotel\n{category}: Lodging"));
    s
}

fn example(schema: &ResponseSchema, y: i32, m: u32, d: u32) -> String {
    NaiveDate::from_ymd_opt(y, m, d)
        .map(|date| schema.format_date(date))
        .unwrap_or_default()
}
