//! Quote workflow errors
//!
//! Every variant is recoverable: a failure leaves the live draft untouched and
//! control returns to form entry.

use thiserror::Error;

use core_kernel::{Money, MoneyError};
use crate::draft::SubEntityId;

/// Errors that can occur in the quote workflow domain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    /// A mandatory base or product field is empty at submit time
    #[error("Missing required field: {field}")]
    MissingRequiredField { field: String },

    /// A filled field is malformed or out of range for its declared kind;
    /// the kind check of the product-field rule, reported after presence
    #[error("Invalid value for {field}: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    /// Computed insurable value is under the product floor
    #[error("Insurable value {actual} is below the minimum of {minimum} for this product")]
    BelowMinimumValue { minimum: Money, actual: Money },

    /// A fleet/cargo style product was submitted without entities
    #[error("At least one entry is required in {collection}")]
    EmptyRequiredCollection { collection: String },

    /// Mandatory acknowledgment unchecked
    #[error("Terms and conditions must be accepted")]
    TermsNotAccepted,

    /// The premium overflowed or came out negative for the entered figures
    #[error("Premium cannot be computed: {0}")]
    PremiumOutOfRange(String),

    /// A staged sub-entity is missing a required sub-field
    #[error("Cannot add to {collection}: {field} {reason}")]
    SubEntityIncomplete {
        collection: String,
        field: String,
        reason: String,
    },

    /// The commit call failed; the draft is preserved for retry
    #[error("Quote submission failed: {0}")]
    SubmissionTransportFailure(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("No quote form is available for {0}")]
    NoFormAvailable(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Product {0} has no repeatable collection")]
    NoCollection(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(SubEntityId),

    #[error("Cannot {action} while the workflow is {state}")]
    InvalidStateTransition { state: String, action: String },

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Submission discarded because the draft was cancelled")]
    SubmissionDiscarded,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Quote not found: {0}")]
    QuoteNotFound(String),

    #[error("Quote ledger unavailable: {0}")]
    LedgerUnavailable(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl QuoteError {
    /// Creates a missing field error
    pub fn missing(field: impl Into<String>) -> Self {
        QuoteError::MissingRequiredField { field: field.into() }
    }

    /// Creates an invalid state transition error
    pub fn invalid_state(state: impl std::fmt::Display, action: impl Into<String>) -> Self {
        QuoteError::InvalidStateTransition {
            state: state.to_string(),
            action: action.into(),
        }
    }

    /// Returns true for failures caused by the content of the draft
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            QuoteError::MissingRequiredField { .. }
                | QuoteError::InvalidFieldValue { .. }
                | QuoteError::BelowMinimumValue { .. }
                | QuoteError::EmptyRequiredCollection { .. }
                | QuoteError::TermsNotAccepted
                | QuoteError::SubEntityIncomplete { .. }
                | QuoteError::PremiumOutOfRange(_)
                | QuoteError::UnknownField(_)
                | QuoteError::NoCollection(_)
        )
    }
}

impl From<MoneyError> for QuoteError {
    fn from(err: MoneyError) -> Self {
        QuoteError::PremiumOutOfRange(err.to_string())
    }
}

impl From<csv::Error> for QuoteError {
    fn from(err: csv::Error) -> Self {
        QuoteError::Export(err.to_string())
    }
}
