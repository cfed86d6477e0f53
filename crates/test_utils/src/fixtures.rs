//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the quote workflow. Named fixtures are
//! fixed and predictable; `ClientFixtures::random` uses `fake` when a test only
//! needs plausible contact details.

use std::sync::Arc;

use core_kernel::{Currency, Money};
use domain_quote::{ProductCatalog, StagingEntity};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::CellNumber;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Product keys as registered in the standard catalog
pub struct ProductFixtures;

impl ProductFixtures {
    pub const PRIVATE_MOTOR: &'static str = "Private Motor Insurance";
    pub const MOTOR_COMMERCIAL: &'static str = "Motor Commercial";
    pub const MARINE_CARGO: &'static str = "Marine Cargo Policy";
    pub const SENIORS_PLAN: &'static str = "Seniors Plan";
    pub const FAMILY_MEDICAL: &'static str = "Family Medical Cover";
    pub const STUDENT_ACCIDENT: &'static str = "Student Accident Cover";
    pub const SPORTS_COVER: &'static str = "Sports Cover";
    pub const PROFESSIONAL_INDEMNITY: &'static str = "Professional Indemnity";
    pub const DOMESTIC_PACKAGE: &'static str = "Domestic Package";

    /// The standard catalog in KES
    pub fn catalog() -> Arc<ProductCatalog> {
        Arc::new(ProductCatalog::standard(Currency::KES))
    }
}

/// Contact details entered in the base fields of every form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Fixture for client contact details
pub struct ClientFixtures;

impl ClientFixtures {
    pub fn jane() -> ClientDetails {
        ClientDetails {
            name: "Jane".to_string(),
            phone: "0712345678".to_string(),
            email: "jane@x.com".to_string(),
        }
    }

    pub fn random() -> ClientDetails {
        ClientDetails {
            name: Name().fake(),
            phone: CellNumber().fake(),
            email: SafeEmail().fake(),
        }
    }
}

/// Fixture for KES amounts
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn kes(amount: Decimal) -> Money {
        Money::new(amount, Currency::KES)
    }

    /// Private motor minimum insurable value
    pub fn private_motor_minimum() -> Money {
        Self::kes(dec!(500000))
    }

    /// Motor commercial minimum fleet value
    pub fn fleet_minimum() -> Money {
        Self::kes(dec!(1000000))
    }
}

/// Fixture for staged sub-entities
pub struct EntityFixtures;

impl EntityFixtures {
    pub fn vehicle(registration: &str, value: Decimal) -> StagingEntity {
        let mut staging = StagingEntity::new();
        staging.set("registration", registration);
        staging.set("make", "Isuzu");
        staging.set("model", "FRR");
        staging.set("year", "2019");
        staging.set("value", value.to_string());
        staging
    }

    pub fn cargo_item(description: &str, value: Decimal) -> StagingEntity {
        let mut staging = StagingEntity::new();
        staging.set("description", description);
        staging.set("quantity", "100");
        staging.set("value", value.to_string());
        staging
    }

    pub fn dependent(name: &str) -> StagingEntity {
        let mut staging = StagingEntity::new();
        staging.set("name", name);
        staging.set("relationship", "Spouse");
        staging.set("date_of_birth", "1957-01-20");
        staging
    }
}
