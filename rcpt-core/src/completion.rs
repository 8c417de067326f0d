//! Parse a model completion (`Label: Value` lines) into a [`ReceiptRecord`].
//!
//! The model is asked for a fixed layout but answers are free text, so the
//! scan tolerates commentary, blank lines, unknown labels and any field
//! order. Dates and totals that are present but malformed abort the parse,
//! since they would end up in the filename otherwise.

use chrono::NaiveDate;

use crate::amount::parse_amount;
use crate::error::ParseError;
use crate::receipt::ReceiptRecord;
use crate::schema::{Field, ResponseSchema};

#[derive(Debug, Default)]
struct Draft {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    total: Option<f64>,
    vendor: String,
    category: String,
}

/// Parse with the canonical `YYYY-MM-DD` schema.
pub fn parse_completion(text: &str) -> Result<ReceiptRecord, ParseError> {
    parse_completion_with(text, &ResponseSchema::canonical())
}

/// Parse with an explicit label/format table.
pub fn parse_completion_with(
    text: &str,
    schema: &ResponseSchema,
) -> Result<ReceiptRecord, ParseError> {
    let mut draft = Draft::default();

    for line in text.lines() {
        let Some((label, value)) = split_line(line) else {
            continue;
        };
        let Some(field) = schema.field_for(label) else {
            continue;
        };

        match field {
            Field::Date => {
                let date = parse_date(schema, label, value)?;
                draft.start_date = Some(date);
                draft.end_date = Some(date);
            }
            Field::StartDate => draft.start_date = Some(parse_date(schema, label, value)?),
            Field::EndDate => draft.end_date = Some(parse_date(schema, label, value)?),
            Field::Total => {
                let total = parse_amount(value).ok_or_else(|| ParseError::InvalidTotal {
                    value: value.to_string(),
                })?;
                draft.total = Some(total);
            }
            Field::Vendor => draft.vendor = value.to_string(),
            Field::Category => draft.category = value.to_string(),
        }
    }

    draft.finish()
}

impl Draft {
    fn finish(self) -> Result<ReceiptRecord, ParseError> {
        let start_date = self
            .start_date
            .ok_or(ParseError::MissingField("Date/StartDate"))?;
        let end_date = self.end_date.unwrap_or(start_date);

        let total = match self.total {
            Some(t) if t != 0.0 => t,
            _ => return Err(ParseError::MissingField("Total")),
        };
        if self.vendor.is_empty() {
            return Err(ParseError::MissingField("Vendor"));
        }
        if self.category.is_empty() {
            return Err(ParseError::MissingField("Category"));
        }

        Ok(ReceiptRecord::new(
            start_date,
            end_date,
            total,
            self.vendor,
            self.category,
        ))
    }
}

/// Split `Label: Value` at the first colon; both sides trimmed. Later colons
/// stay in the value, so `Vendor: Store: Downtown` is kept whole.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (label, value) = line.split_once(':')?;
    Some((label.trim(), value.trim()))
}

fn parse_date(schema: &ResponseSchema, label: &str, value: &str) -> Result<NaiveDate, ParseError> {
    schema
        .parse_date(value)
        .ok_or_else(|| ParseError::InvalidDate {
            label: label.to_string(),
            value: value.to_string(),
        })
}
