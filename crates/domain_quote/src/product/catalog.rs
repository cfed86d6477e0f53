//! Product catalog
//!
//! The catalog is built once at startup and is read-only afterwards.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use core_kernel::{Currency, Money};
use super::ProductKind;
use crate::error::QuoteError;

/// An insurance product offered for quoting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDefinition {
    /// Unique product name, also used as the lookup key
    pub key: String,
    pub description: String,
    /// Reference to the product image shown on the selection surface
    pub image: String,
    /// Floor for the insurable value, if the product has one
    pub minimum_value: Option<Money>,
    /// Form bound to the product; `None` means no form is available yet
    pub field_set: Option<ProductKind>,
}

impl ProductDefinition {
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            image: image.into(),
            minimum_value: None,
            field_set: None,
        }
    }

    pub fn with_minimum(mut self, minimum: Money) -> Self {
        self.minimum_value = Some(minimum);
        self
    }

    pub fn with_field_set(mut self, kind: ProductKind) -> Self {
        self.field_set = Some(kind);
        self
    }

    pub fn has_form(&self) -> bool {
        self.field_set.is_some()
    }
}

/// Read-only registry of offered products, in display order
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    currency: Currency,
    products: Vec<ProductDefinition>,
}

impl ProductCatalog {
    pub fn new(currency: Currency, products: Vec<ProductDefinition>) -> Self {
        Self { currency, products }
    }

    /// The standard product line-up
    pub fn standard(currency: Currency) -> Self {
        let money = |amount: Decimal| Money::new(amount, currency);

        let products = vec![
            ProductDefinition::new(
                "Private Motor Insurance",
                "Comprehensive and third party cover for privately owned vehicles",
                "images/products/private-motor.jpg",
            )
            .with_minimum(money(dec!(500000)))
            .with_field_set(ProductKind::PrivateMotor),
            ProductDefinition::new(
                "Motor Commercial",
                "Fleet cover for vehicles used in the course of business",
                "images/products/motor-commercial.jpg",
            )
            .with_minimum(money(dec!(1000000)))
            .with_field_set(ProductKind::MotorCommercial),
            ProductDefinition::new(
                "Marine Cargo Policy",
                "Cover for goods in transit by sea, air or road",
                "images/products/marine-cargo.jpg",
            )
            .with_minimum(money(dec!(100000)))
            .with_field_set(ProductKind::MarineCargo),
            ProductDefinition::new(
                "Seniors Plan",
                "Medical cover for clients aged 60 and above and their dependents",
                "images/products/seniors-plan.jpg",
            )
            .with_minimum(money(dec!(100000)))
            .with_field_set(ProductKind::SeniorsPlan),
            ProductDefinition::new(
                "Family Medical Cover",
                "Inpatient and outpatient medical cover for the whole family",
                "images/products/family-medical.jpg",
            )
            .with_minimum(money(dec!(250000)))
            .with_field_set(ProductKind::FamilyMedical),
            ProductDefinition::new(
                "Student Accident Cover",
                "Personal accident cover for students in and out of school",
                "images/products/student-accident.jpg",
            )
            .with_field_set(ProductKind::StudentAccident),
            ProductDefinition::new(
                "Sports Cover",
                "Accident cover for teams and individual sports participants",
                "images/products/sports-cover.jpg",
            )
            .with_field_set(ProductKind::SportsCover),
            ProductDefinition::new(
                "Professional Indemnity",
                "Liability cover for professionals against negligence claims",
                "images/products/professional-indemnity.jpg",
            ),
            ProductDefinition::new(
                "Domestic Package",
                "Home contents, buildings and domestic staff cover",
                "images/products/domestic-package.jpg",
            ),
        ];

        Self::new(currency, products)
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Finds a product by key; exact matches win over case-insensitive ones
    pub fn lookup(&self, key: &str) -> Result<&ProductDefinition, QuoteError> {
        let key = key.trim();
        self.products
            .iter()
            .find(|product| product.key == key)
            .or_else(|| {
                self.products
                    .iter()
                    .find(|product| product.key.eq_ignore_ascii_case(key))
            })
            .ok_or_else(|| QuoteError::ProductNotFound(key.to_string()))
    }

    pub fn list(&self) -> &[ProductDefinition] {
        &self.products
    }
}
