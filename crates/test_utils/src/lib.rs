//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! quote workflow test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for products, clients and sub-entities
//! - `builders`: Builders that drive a controller or service into a known state
//! - `doubles`: Ledger and printer test doubles
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod doubles;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use doubles::*;
pub use assertions::*;
pub use generators::*;
