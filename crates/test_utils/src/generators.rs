//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating quote workflow inputs that
//! respect the domain's shape: whole-shilling amounts, plausible client names
//! and staged entities with a chosen field left blank.

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Currency, Money};
use domain_quote::StagingEntity;

use crate::fixtures::EntityFixtures;

/// Strategy for the currencies a catalog can be configured with
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::KES),
        Just(Currency::UGX),
        Just(Currency::TZS),
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
    ]
}

/// Strategy for positive whole amounts up to 100 million
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(Decimal::from)
}

/// Strategy for KES money values
pub fn kes_money_strategy() -> impl Strategy<Value = Money> {
    amount_strategy().prop_map(|amount| Money::new(amount, Currency::KES))
}

/// Strategy for client names that survive CSV quoting
pub fn client_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][a-z]{1,12}",
        "[A-Z][a-z]{1,12} [A-Z][a-z]{1,12}",
        "[A-Z][a-z]{1,8}, [A-Z][a-z]{1,8} & Co",
        "[A-Z][a-z]{1,8} \"[A-Z][a-z]{1,8}\" [A-Z][a-z]{1,8}",
    ]
}

/// Strategy for a fleet of one to eight vehicle values
pub fn fleet_values_strategy() -> impl Strategy<Value = Vec<Decimal>> {
    proptest::collection::vec((1_000i64..5_000_000i64).prop_map(Decimal::from), 1..8)
}

/// Required vehicle sub-fields
pub const VEHICLE_FIELDS: [&str; 5] = ["registration", "make", "model", "year", "value"];

/// Strategy for a vehicle with exactly one required sub-field blanked
///
/// Yields the blanked field name alongside the staged entity.
pub fn incomplete_vehicle_strategy() -> impl Strategy<Value = (&'static str, StagingEntity)> {
    (prop::sample::select(VEHICLE_FIELDS.to_vec()), prop::bool::ANY, amount_strategy()).prop_map(
        |(field, whitespace, value)| {
            let mut staging = EntityFixtures::vehicle("KCA 001A", value);
            staging.set(field, if whitespace { "   " } else { "" });
            (field, staging)
        },
    )
}
