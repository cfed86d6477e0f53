//! Strongly-typed identifiers for domain entities
//!
//! Using newtype wrappers around UUIDs provides type safety and prevents
//! accidental mixing of different identifier types. Quote identifiers are the
//! exception: the ledger hands them out sequentially, so they wrap a counter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;

macro_rules! define_id {
    ($name:ident, $prefix:literal, $kind:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            /// Accepts the prefixed display form or a bare UUID
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let uuid_str = trimmed.strip_prefix(concat!($prefix, "-")).unwrap_or(trimmed);
                Uuid::parse_str(uuid_str)
                    .map(Self)
                    .map_err(|_| CoreError::invalid_identifier($kind, s))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// Workflow identifiers
define_id!(SessionId, "SES", "session");
define_id!(DraftId, "DRF", "draft");

/// Error returned when a quote identifier cannot be parsed
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid quote id: {0}")]
pub struct ParseQuoteIdError(pub String);

/// Sequential identifier assigned by the quote ledger on commit
///
/// Displayed as `QT-00042`. Parsing accepts either the prefixed form or the
/// bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(u64);

impl QuoteId {
    /// Wraps a raw sequence number
    pub fn from_sequence(sequence: u64) -> Self {
        Self(sequence)
    }

    /// Returns the raw sequence number
    pub fn sequence(&self) -> u64 {
        self.0
    }

    /// Returns the identifier prefix for display
    pub fn prefix() -> &'static str {
        "QT"
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QT-{:05}", self.0)
    }
}

impl FromStr for QuoteId {
    type Err = ParseQuoteIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("QT-").unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParseQuoteIdError(s.to_string()))
    }
}
