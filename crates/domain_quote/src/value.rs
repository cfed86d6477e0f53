//! Draft field values
//!
//! Form input arrives as text for most fields, so the numeric and date
//! accessors are lenient: a `Text` value that parses is treated the same as a
//! typed one.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use core_kernel::{Currency, Money};
use crate::draft::SubEntity;

/// Date format accepted for text-entered dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single value held by a draft field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
    Flag(bool),
    Date(NaiveDate),
    List(Vec<SubEntity>),
}

impl FieldValue {
    /// Creates a text value
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Returns true when the value carries no usable content
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Number(_) | FieldValue::Flag(_) | FieldValue::Date(_) => false,
        }
    }

    /// Returns the trimmed text of a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.trim()),
            _ => None,
        }
    }

    /// Returns the value as a decimal, parsing text input
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(number) => Some(*number),
            FieldValue::Text(text) => parse_decimal(text),
            _ => None,
        }
    }

    /// Returns the value as money in the given currency
    pub fn as_money(&self, currency: Currency) -> Option<Money> {
        self.as_decimal().map(|amount| Money::new(amount, currency))
    }

    /// Returns the value as a date, parsing `YYYY-MM-DD` text
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            FieldValue::Text(text) => NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok(),
            _ => None,
        }
    }

    /// Returns the value as a boolean flag
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            FieldValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" => Some(true),
                "false" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns the entities of a list value
    pub fn as_list(&self) -> Option<&[SubEntity]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

/// Parses user-entered numbers such as `"600000"` or `"1,500,000.50"`
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}
