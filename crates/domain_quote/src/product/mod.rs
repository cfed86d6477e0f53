//! Products and their dynamic field sets
//!
//! Each offered product may bind a field set: the product-specific schema of
//! flat fields, an optional repeatable collection with a staging sub-form,
//! the terms acknowledgment rule and the way its insurable value and premium
//! are derived. The workflow only talks to the [`FieldSet`] trait; the concrete
//! products are the variants of [`ProductKind`].

pub mod catalog;
pub mod schema;

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::Money;
use crate::draft::{QuoteDraft, StagingEntity, SubEntity};
use crate::error::QuoteError;
use crate::value::{parse_decimal, FieldValue, DATE_FORMAT};

pub use catalog::{ProductCatalog, ProductDefinition};
pub use schema::{ProductSchema, ValueSource};

/// Declared kind of a form field
///
/// `Email` and `Phone` only act as rendering hints; they are checked for
/// presence like plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    /// A whole number of at least one, e.g. a head count or a quantity
    Count,
    /// A calendar year of manufacture
    Year,
    /// A strictly positive monetary amount up to [`MAX_AMOUNT`]
    Amount,
    Date,
    Flag,
    /// One of a fixed set of options (case-insensitive)
    Choice(&'static [&'static str]),
}

/// Largest amount a single field or sub-entity may declare
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Largest head count or quantity a field may declare
pub const MAX_COUNT: Decimal = dec!(1000000);

/// Earliest accepted year of manufacture
pub const MIN_YEAR: i32 = 1900;

impl FieldKind {
    /// Whether values of this kind are read as numbers
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Count | FieldKind::Year | FieldKind::Amount)
    }

    /// Range check for numeric kinds; other kinds accept any number
    fn check_number(&self, number: Decimal) -> Result<(), String> {
        match self {
            FieldKind::Amount if number <= Decimal::ZERO => {
                Err("must be greater than zero".to_string())
            }
            FieldKind::Amount if number > MAX_AMOUNT => {
                Err(format!("must not exceed {MAX_AMOUNT}"))
            }
            FieldKind::Count if !number.fract().is_zero() || number < Decimal::ONE => {
                Err("must be a whole number of at least 1".to_string())
            }
            FieldKind::Count if number > MAX_COUNT => Err(format!("must not exceed {MAX_COUNT}")),
            FieldKind::Year => {
                let latest = Utc::now().year() + 1;
                let in_range = number.fract().is_zero()
                    && number >= Decimal::from(MIN_YEAR)
                    && number <= Decimal::from(latest);
                if in_range {
                    Ok(())
                } else {
                    Err(format!("must be a year between {MIN_YEAR} and {latest}"))
                }
            }
            _ => Ok(()),
        }
    }
}

/// A single field in a product form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, required: true }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, required: false }
    }

    /// Checks that a non-blank value is well-formed for this field's kind
    pub fn check(&self, value: &FieldValue) -> Result<(), QuoteError> {
        let invalid = |reason: &str| QuoteError::InvalidFieldValue {
            field: self.name.to_string(),
            reason: reason.to_string(),
        };

        match self.kind {
            FieldKind::Text | FieldKind::Email | FieldKind::Phone => match value {
                FieldValue::List(_) => Err(invalid("expected a single value")),
                _ => Ok(()),
            },
            FieldKind::Count | FieldKind::Year | FieldKind::Amount => match value.as_decimal() {
                Some(number) => self.kind.check_number(number).map_err(|reason| invalid(&reason)),
                None => Err(invalid("must be a number")),
            },
            FieldKind::Date => value
                .as_date()
                .map(|_| ())
                .ok_or_else(|| invalid(&format!("must be a date ({})", DATE_FORMAT))),
            FieldKind::Flag => value
                .as_flag()
                .map(|_| ())
                .ok_or_else(|| invalid("must be yes or no")),
            FieldKind::Choice(options) => {
                let text = value.as_text().unwrap_or_default();
                if options.iter().any(|option| option.eq_ignore_ascii_case(text)) {
                    Ok(())
                } else {
                    Err(invalid(&format!("must be one of: {}", options.join(", "))))
                }
            }
        }
    }
}

/// Contact fields every product form carries
pub static BASE_FIELDS: [FieldSpec; 3] = [
    FieldSpec::required("name", "Full name", FieldKind::Text),
    FieldSpec::required("phone", "Phone number", FieldKind::Phone),
    FieldSpec::required("email", "Email address", FieldKind::Email),
];

/// A repeatable collection of sub-entities with its staging sub-form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub entity_label: &'static str,
    pub fields: &'static [FieldSpec],
    /// Sub-field summed into the collection aggregate
    pub value_field: Option<&'static str>,
    /// Whether submission needs at least one entity
    pub required: bool,
}

impl CollectionSpec {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Checks a staged candidate and returns its trimmed attributes
    ///
    /// Required sub-fields must be non-empty; numeric sub-fields must parse and
    /// fall within their kind's range.
    pub fn check_candidate(
        &self,
        staging: &StagingEntity,
    ) -> Result<BTreeMap<String, String>, QuoteError> {
        let incomplete = |field: &FieldSpec, reason: &str| QuoteError::SubEntityIncomplete {
            collection: self.name.to_string(),
            field: field.name.to_string(),
            reason: reason.to_string(),
        };

        let mut attributes = BTreeMap::new();
        for field in self.fields {
            let value = staging
                .get(field.name)
                .map(str::trim)
                .filter(|value| !value.is_empty());

            let Some(value) = value else {
                if field.required {
                    return Err(incomplete(field, "is required"));
                }
                continue;
            };

            match field.kind {
                kind if kind.is_numeric() => {
                    let Some(number) = parse_decimal(value) else {
                        return Err(incomplete(field, "must be a number"));
                    };
                    kind.check_number(number)
                        .map_err(|reason| incomplete(field, &reason))?;
                }
                FieldKind::Date => {
                    if chrono::NaiveDate::parse_from_str(value, DATE_FORMAT).is_err() {
                        return Err(incomplete(field, "must be a date (YYYY-MM-DD)"));
                    }
                }
                _ => {}
            }
            attributes.insert(field.name.to_string(), value.to_string());
        }
        Ok(attributes)
    }
}

/// Rendered view of one form field and its current value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    #[serde(flatten)]
    pub spec: FieldSpec,
    pub value: Option<FieldValue>,
}

/// Rendered view of the repeatable collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionView {
    pub name: &'static str,
    pub label: &'static str,
    pub entity_label: &'static str,
    pub fields: &'static [FieldSpec],
    pub required: bool,
    pub entities: Vec<SubEntity>,
    pub staging: StagingEntity,
    /// Derived from the entities on every render
    pub aggregate: Option<Money>,
}

/// Everything needed to draw a product form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub product: String,
    pub fields: Vec<FieldView>,
    pub collection: Option<CollectionView>,
    pub requires_terms: bool,
    pub terms_accepted: bool,
    pub is_submitting: bool,
    pub insurable_value: Option<Money>,
}

/// Product-specific schema and input surface bound to a draft
pub trait FieldSet: Send + Sync {
    /// Product fields, excluding the shared contact fields
    fn fields(&self) -> &'static [FieldSpec];

    /// The repeatable collection, if the product has one
    fn collection(&self) -> Option<&'static CollectionSpec>;

    /// Whether the terms acknowledgment must be checked before submit
    fn requires_terms(&self) -> bool;

    /// Scalar or aggregated value checked against the product minimum
    fn insurable_value(&self, draft: &QuoteDraft) -> Option<Money>;

    /// Premium for a validated draft
    fn estimate(&self, draft: &QuoteDraft) -> Result<Money, QuoteError>;

    /// Looks up a flat field, contact fields included
    fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        BASE_FIELDS
            .iter()
            .chain(self.fields().iter())
            .find(|field| field.name == name)
    }

    /// Names of every mandatory flat field, contact fields first
    fn required_fields(&self) -> Vec<&'static str> {
        BASE_FIELDS
            .iter()
            .chain(self.fields().iter())
            .filter(|field| field.required)
            .map(|field| field.name)
            .collect()
    }

    fn validate_field(&self, name: &str, value: &FieldValue) -> Result<(), QuoteError> {
        let spec = self
            .field(name)
            .ok_or_else(|| QuoteError::UnknownField(name.to_string()))?;
        spec.check(value)
    }

    fn render(&self, draft: &QuoteDraft, staging: &StagingEntity, is_submitting: bool) -> FormView {
        let fields = BASE_FIELDS
            .iter()
            .chain(self.fields().iter())
            .map(|spec| FieldView {
                spec: *spec,
                value: draft.field(spec.name).cloned(),
            })
            .collect();

        let collection = self.collection().map(|spec| CollectionView {
            name: spec.name,
            label: spec.label,
            entity_label: spec.entity_label,
            fields: spec.fields,
            required: spec.required,
            entities: draft.entities(spec.name).to_vec(),
            staging: staging.clone(),
            aggregate: draft.aggregate(spec),
        });

        FormView {
            product: draft.product_key().to_string(),
            fields,
            collection,
            requires_terms: self.requires_terms(),
            terms_accepted: draft.terms_accepted(),
            is_submitting,
            insurable_value: self.insurable_value(draft),
        }
    }
}

/// The products that have a quote form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    PrivateMotor,
    MotorCommercial,
    MarineCargo,
    SeniorsPlan,
    FamilyMedical,
    StudentAccident,
    SportsCover,
}

impl ProductKind {
    /// Static schema backing this product's form
    pub fn schema(&self) -> &'static ProductSchema {
        match self {
            ProductKind::PrivateMotor => &schema::PRIVATE_MOTOR,
            ProductKind::MotorCommercial => &schema::MOTOR_COMMERCIAL,
            ProductKind::MarineCargo => &schema::MARINE_CARGO,
            ProductKind::SeniorsPlan => &schema::SENIORS_PLAN,
            ProductKind::FamilyMedical => &schema::FAMILY_MEDICAL,
            ProductKind::StudentAccident => &schema::STUDENT_ACCIDENT,
            ProductKind::SportsCover => &schema::SPORTS_COVER,
        }
    }
}

impl FieldSet for ProductKind {
    fn fields(&self) -> &'static [FieldSpec] {
        self.schema().fields
    }

    fn collection(&self) -> Option<&'static CollectionSpec> {
        self.schema().collection
    }

    fn requires_terms(&self) -> bool {
        self.schema().requires_terms
    }

    fn insurable_value(&self, draft: &QuoteDraft) -> Option<Money> {
        let schema = self.schema();
        match schema.value_source {
            ValueSource::Field(name) => draft
                .field(name)
                .and_then(|value| value.as_money(draft.currency())),
            // An empty collection has no value to compare
            ValueSource::CollectionTotal => schema
                .collection
                .filter(|spec| !draft.entities(spec.name).is_empty())
                .and_then(|spec| draft.aggregate(spec)),
            ValueSource::None => None,
        }
    }

    fn estimate(&self, draft: &QuoteDraft) -> Result<Money, QuoteError> {
        let schema = self.schema();
        let entity_count = schema
            .collection
            .map_or(0, |spec| draft.entities(spec.name).len());
        schema
            .rating
            .estimate(draft, self.insurable_value(draft), entity_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn private_motor() -> QuoteDraft {
        QuoteDraft::new("Private Motor Insurance", ProductKind::PrivateMotor, Currency::KES)
    }

    #[test]
    fn test_required_fields_start_with_contact_fields() {
        let required = ProductKind::PrivateMotor.required_fields();
        assert_eq!(&required[..3], &["name", "phone", "email"]);
        assert!(required.contains(&"value"));
        assert!(!required.contains(&"registration"));
    }

    #[test]
    fn test_validate_field_by_kind() {
        let kind = ProductKind::PrivateMotor;
        assert!(kind.validate_field("value", &FieldValue::text("600000")).is_ok());
        assert!(kind.validate_field("value", &FieldValue::text("0")).is_err());
        assert!(kind.validate_field("year", &FieldValue::text("twenty")).is_err());
        assert!(kind.validate_field("cover_type", &FieldValue::text("comprehensive")).is_ok());
        assert!(kind.validate_field("cover_type", &FieldValue::text("Gold")).is_err());
        assert_eq!(
            kind.validate_field("colour", &FieldValue::text("red")),
            Err(QuoteError::UnknownField("colour".to_string()))
        );
    }

    #[test]
    fn test_scalar_insurable_value() {
        let mut draft = private_motor();
        assert_eq!(ProductKind::PrivateMotor.insurable_value(&draft), None);

        draft.set_field("value", FieldValue::text("600,000"));
        let value = ProductKind::PrivateMotor.insurable_value(&draft).unwrap();
        assert_eq!(value.amount(), dec!(600000));
    }

    #[test]
    fn test_render_includes_contact_fields_and_values() {
        let mut draft = private_motor();
        draft.set_field("name", FieldValue::text("Jane"));

        let view = ProductKind::PrivateMotor.render(&draft, &StagingEntity::new(), false);
        assert_eq!(view.fields[0].spec.name, "name");
        assert_eq!(view.fields[0].value, Some(FieldValue::text("Jane")));
        assert!(view.collection.is_none());
        assert!(!view.requires_terms);
    }

    #[test]
    fn test_render_collection_derives_aggregate() {
        let kind = ProductKind::MarineCargo;
        let mut draft = QuoteDraft::new("Marine Cargo Policy", kind, Currency::KES);
        let spec = kind.collection().unwrap();

        let mut staging = StagingEntity::new();
        staging.set("description", "Coffee beans");
        staging.set("quantity", "200");
        staging.set("value", "450000");
        draft.add_entity(spec, &staging).unwrap();

        let view = kind.render(&draft, &StagingEntity::new(), true);
        let collection = view.collection.unwrap();
        assert_eq!(collection.entities.len(), 1);
        assert_eq!(collection.aggregate.unwrap().amount(), dec!(450000));
        assert!(view.is_submitting);
        assert_eq!(view.insurable_value.unwrap().amount(), dec!(450000));
    }

    #[test]
    fn test_empty_collection_has_no_insurable_value() {
        let draft = QuoteDraft::new("Motor Commercial", ProductKind::MotorCommercial, Currency::KES);
        assert_eq!(ProductKind::MotorCommercial.insurable_value(&draft), None);
    }
}
