//! Kernel errors for parsing identifiers, currencies and settings

use thiserror::Error;
use crate::identifiers::ParseQuoteIdError;
use crate::money::MoneyError;

/// Errors raised while turning external input into kernel types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    QuoteId(#[from] ParseQuoteIdError),

    #[error("Invalid {kind} id: {value}")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn invalid_identifier(kind: &'static str, value: impl Into<String>) -> Self {
        CoreError::InvalidIdentifier {
            kind,
            value: value.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        CoreError::Configuration(message.into())
    }

    /// True when the error came from malformed client input
    pub fn is_input_error(&self) -> bool {
        !matches!(self, CoreError::Configuration(_))
    }
}
