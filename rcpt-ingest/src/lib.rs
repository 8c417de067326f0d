//! rcpt-ingest: receipt discovery and PDF text extraction.

pub mod discover;
pub mod extract;
pub mod normalize;

pub use discover::{discover_receipts, is_pdf_path};
pub use extract::{ExtractError, PdfExtractor, TextExtractor};
pub use normalize::normalize_text;
