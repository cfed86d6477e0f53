//! Core Kernel - Foundational types and utilities for the quote workflow
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Common identifiers and value objects
//! - Port infrastructure shared by adapters

pub mod money;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError, Rate};
pub use identifiers::{SessionId, DraftId, QuoteId, ParseQuoteIdError};
pub use error::CoreError;
pub use ports::{PortError, DomainPort, AdapterHealth, HealthCheckable, HealthCheckResult};
