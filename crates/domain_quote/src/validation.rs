//! Submit-time validation of quote drafts
//!
//! Rules run in a fixed order and the first failure is reported:
//!
//! 1. Contact fields (`name`, `phone`, `email`) are non-empty
//! 2. Product-mandated fields are non-empty, then every filled field is
//!    well-formed for its declared kind
//! 3. The insurable value is at least the product minimum
//! 4. A required collection holds at least one entity
//! 5. Terms are accepted when the product mandates it
//!
//! A product whose insurable value comes from its collection has no value
//! while the collection is empty, so rule 3 is skipped and rule 4 reports the
//! empty collection instead.

use crate::draft::QuoteDraft;
use crate::error::QuoteError;
use crate::product::{FieldSet, ProductDefinition, BASE_FIELDS};

/// Validator for quote drafts
pub struct QuoteValidator;

impl QuoteValidator {
    /// Validates a draft against its product definition
    pub fn validate(draft: &QuoteDraft, definition: &ProductDefinition) -> Result<(), QuoteError> {
        let field_set = definition
            .field_set
            .ok_or_else(|| QuoteError::NoFormAvailable(definition.key.clone()))?;

        Self::check_contact_fields(draft)?;
        Self::check_product_fields(draft, &field_set)?;
        Self::check_minimum_value(draft, definition, &field_set)?;
        Self::check_collection(draft, &field_set)?;
        Self::check_terms(draft, &field_set)
    }

    fn check_contact_fields(draft: &QuoteDraft) -> Result<(), QuoteError> {
        match BASE_FIELDS.iter().find(|field| draft.is_blank(field.name)) {
            Some(field) => Err(QuoteError::missing(field.name)),
            None => Ok(()),
        }
    }

    fn check_product_fields(draft: &QuoteDraft, field_set: &dyn FieldSet) -> Result<(), QuoteError> {
        let fields = field_set.fields();

        if let Some(field) = fields
            .iter()
            .find(|field| field.required && draft.is_blank(field.name))
        {
            return Err(QuoteError::missing(field.name));
        }

        for field in fields {
            if let Some(value) = draft.field(field.name).filter(|value| !value.is_blank()) {
                field.check(value)?;
            }
        }
        Ok(())
    }

    fn check_minimum_value(
        draft: &QuoteDraft,
        definition: &ProductDefinition,
        field_set: &dyn FieldSet,
    ) -> Result<(), QuoteError> {
        let (Some(minimum), Some(actual)) =
            (definition.minimum_value, field_set.insurable_value(draft))
        else {
            return Ok(());
        };

        let meets_minimum = actual
            .at_least(&minimum)
            .map_err(|err| QuoteError::InvalidFieldValue {
                field: "insurable_value".to_string(),
                reason: err.to_string(),
            })?;

        if meets_minimum {
            Ok(())
        } else {
            Err(QuoteError::BelowMinimumValue { minimum, actual })
        }
    }

    fn check_collection(draft: &QuoteDraft, field_set: &dyn FieldSet) -> Result<(), QuoteError> {
        match field_set.collection() {
            Some(spec) if spec.required && draft.entities(spec.name).is_empty() => {
                Err(QuoteError::EmptyRequiredCollection {
                    collection: spec.name.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn check_terms(draft: &QuoteDraft, field_set: &dyn FieldSet) -> Result<(), QuoteError> {
        if field_set.requires_terms() && !draft.terms_accepted() {
            return Err(QuoteError::TermsNotAccepted);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::StagingEntity;
    use crate::product::{ProductCatalog, ProductKind};
    use crate::value::FieldValue;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn catalog() -> ProductCatalog {
        ProductCatalog::standard(Currency::KES)
    }

    fn with_contact(mut draft: QuoteDraft) -> QuoteDraft {
        draft.set_field("name", FieldValue::text("Jane"));
        draft.set_field("phone", FieldValue::text("0712345678"));
        draft.set_field("email", FieldValue::text("jane@x.com"));
        draft
    }

    fn private_motor(value: &str) -> QuoteDraft {
        let mut draft = with_contact(QuoteDraft::new(
            "Private Motor Insurance",
            ProductKind::PrivateMotor,
            Currency::KES,
        ));
        draft.set_field("make", FieldValue::text("Toyota"));
        draft.set_field("model", FieldValue::text("Toyota Model 1"));
        draft.set_field("year", FieldValue::text("2020"));
        draft.set_field("value", FieldValue::text(value));
        draft
    }

    #[test]
    fn test_complete_private_motor_passes() {
        let catalog = catalog();
        let definition = catalog.lookup("Private Motor Insurance").unwrap();
        assert_eq!(QuoteValidator::validate(&private_motor("600000"), definition), Ok(()));
    }

    #[test]
    fn test_contact_fields_checked_first() {
        let catalog = catalog();
        let definition = catalog.lookup("Private Motor Insurance").unwrap();
        let mut draft = private_motor("100000");
        draft.set_field("phone", FieldValue::text(""));

        assert_eq!(
            QuoteValidator::validate(&draft, definition),
            Err(QuoteError::missing("phone"))
        );
    }

    #[test]
    fn test_missing_product_field() {
        let catalog = catalog();
        let definition = catalog.lookup("Private Motor Insurance").unwrap();
        let mut draft = private_motor("600000");
        draft.set_field("make", FieldValue::text("   "));

        assert_eq!(
            QuoteValidator::validate(&draft, definition),
            Err(QuoteError::missing("make"))
        );
    }

    #[test]
    fn test_malformed_value_is_reported() {
        let catalog = catalog();
        let definition = catalog.lookup("Private Motor Insurance").unwrap();
        let draft = private_motor("six hundred thousand");

        assert!(matches!(
            QuoteValidator::validate(&draft, definition),
            Err(QuoteError::InvalidFieldValue { field, .. }) if field == "value"
        ));
    }

    #[test]
    fn test_below_minimum_names_the_minimum() {
        let catalog = catalog();
        let definition = catalog.lookup("Private Motor Insurance").unwrap();
        let err = QuoteValidator::validate(&private_motor("100000"), definition).unwrap_err();

        match &err {
            QuoteError::BelowMinimumValue { minimum, actual } => {
                assert_eq!(minimum.amount(), dec!(500000));
                assert_eq!(actual.amount(), dec!(100000));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("500000"));
    }

    #[test]
    fn test_empty_required_collection() {
        let catalog = catalog();
        let definition = catalog.lookup("Marine Cargo Policy").unwrap();
        let mut draft = with_contact(QuoteDraft::new(
            "Marine Cargo Policy",
            ProductKind::MarineCargo,
            Currency::KES,
        ));
        draft.set_field("vessel_name", FieldValue::text("MV Mombasa Star"));
        draft.set_field("port_of_loading", FieldValue::text("Mombasa"));
        draft.set_field("port_of_discharge", FieldValue::text("Jebel Ali"));
        draft.set_field("shipment_date", FieldValue::text("2024-03-01"));
        draft.set_terms_accepted(true);

        assert_eq!(
            QuoteValidator::validate(&draft, definition),
            Err(QuoteError::EmptyRequiredCollection {
                collection: "cargo_items".to_string()
            })
        );
    }

    #[test]
    fn test_terms_checked_last() {
        let catalog = catalog();
        let definition = catalog.lookup("Sports Cover").unwrap();
        let mut draft = with_contact(QuoteDraft::new(
            "Sports Cover",
            ProductKind::SportsCover,
            Currency::KES,
        ));
        draft.set_field("sport", FieldValue::text("Rugby"));
        draft.set_field("participants", FieldValue::text("15"));

        assert_eq!(
            QuoteValidator::validate(&draft, definition),
            Err(QuoteError::TermsNotAccepted)
        );
        draft.set_terms_accepted(true);
        assert_eq!(QuoteValidator::validate(&draft, definition), Ok(()));
    }

    #[test]
    fn test_optional_collection_may_be_empty() {
        let catalog = catalog();
        let definition = catalog.lookup("Seniors Plan").unwrap();
        let mut draft = with_contact(QuoteDraft::new(
            "Seniors Plan",
            ProductKind::SeniorsPlan,
            Currency::KES,
        ));
        draft.set_field("date_of_birth", FieldValue::text("1955-06-12"));
        draft.set_field("cover_amount", FieldValue::text("300000"));
        draft.set_terms_accepted(true);
        assert_eq!(QuoteValidator::validate(&draft, definition), Ok(()));

        let spec = ProductKind::SeniorsPlan.collection().unwrap();
        let mut staging = StagingEntity::new();
        staging.set("name", "Peter");
        staging.set("relationship", "Spouse");
        staging.set("date_of_birth", "1957-01-20");
        draft.add_entity(spec, &staging).unwrap();
        assert_eq!(QuoteValidator::validate(&draft, definition), Ok(()));
    }

    #[test]
    fn test_product_without_form() {
        let catalog = catalog();
        let definition = catalog.lookup("Domestic Package").unwrap();
        let draft = private_motor("600000");
        assert_eq!(
            QuoteValidator::validate(&draft, definition),
            Err(QuoteError::NoFormAvailable("Domestic Package".to_string()))
        );
    }
}
