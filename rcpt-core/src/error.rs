use thiserror::Error;

/// Why a model completion could not be turned into a [`crate::ReceiptRecord`].
///
/// Every variant is terminal for the file being processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid {label} format: {value:?}")]
    InvalidDate { label: String, value: String },
    #[error("invalid total amount: {value:?}")]
    InvalidTotal { value: String },
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

impl ParseError {
    /// Label of the offending date line, if this is a date error
    pub fn label(&self) -> Option<&str> {
        match self {
            ParseError::InvalidDate { label, .. } => Some(label),
            _ => None,
        }
    }
}
