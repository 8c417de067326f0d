//! rcpt-core: receipt record, completion parser and filename generator.
//!
//! Everything here is pure: text in, record or filename out.

pub mod amount;
pub mod completion;
pub mod error;
pub mod filename;
pub mod receipt;
pub mod schema;

pub use amount::parse_amount;
pub use completion::{parse_completion, parse_completion_with};
pub use error::ParseError;
pub use filename::{generate_filename, generate_filename_with_extension};
pub use receipt::ReceiptRecord;
pub use schema::{Field, ResponseSchema};
