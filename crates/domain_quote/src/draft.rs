//! Quote draft state
//!
//! A `QuoteDraft` is the mutable, in-progress data of one quote request. It
//! holds flat fields keyed by name plus at most one repeatable collection of
//! sub-entities (vehicles, cargo items, dependents, ...). Candidate entities are
//! accumulated in a separate `StagingEntity` and only enter the draft after
//! they pass the collection's checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use core_kernel::{Currency, DraftId, Money};
use crate::error::QuoteError;
use crate::product::{CollectionSpec, ProductKind};
use crate::value::FieldValue;

/// Field holding the client's name
pub const NAME_FIELD: &str = "name";
/// Field holding the client's phone number
pub const PHONE_FIELD: &str = "phone";
/// Field holding the client's email address
pub const EMAIL_FIELD: &str = "email";

/// Identifier of a sub-entity, unique within one draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubEntityId(u32);

impl SubEntityId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SubEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A repeatable child record owned by one draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubEntity {
    pub id: SubEntityId,
    pub attributes: BTreeMap<String, String>,
}

impl SubEntity {
    /// Returns an attribute value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns an attribute parsed as money
    pub fn amount(&self, name: &str, currency: Currency) -> Option<Money> {
        self.get(name)
            .and_then(crate::value::parse_decimal)
            .map(|amount| Money::new(amount, currency))
    }
}

/// Transient staging form for the next candidate sub-entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StagingEntity {
    values: BTreeMap<String, String>,
}

impl StagingEntity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one staged attribute
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Lifecycle status of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftStatus {
    /// Being edited, not yet submitted
    Editing,
    /// Passed validation and awaiting confirmation
    Validated,
}

/// In-progress quote request for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteDraft {
    id: DraftId,
    product_key: String,
    kind: ProductKind,
    currency: Currency,
    fields: BTreeMap<String, FieldValue>,
    terms_accepted: bool,
    status: DraftStatus,
    next_entity_id: u32,
    created_at: DateTime<Utc>,
}

impl QuoteDraft {
    /// Creates an empty draft bound to a product
    pub fn new(product_key: impl Into<String>, kind: ProductKind, currency: Currency) -> Self {
        Self {
            id: DraftId::new_v7(),
            product_key: product_key.into(),
            kind,
            currency,
            fields: BTreeMap::new(),
            terms_accepted: false,
            status: DraftStatus::Editing,
            next_entity_id: 1,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> DraftId {
        self.id
    }

    pub fn product_key(&self) -> &str {
        &self.product_key
    }

    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn status(&self) -> DraftStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns the trimmed text of a field, if it is a non-empty text value
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name)
            .and_then(FieldValue::as_text)
            .filter(|text| !text.is_empty())
    }

    /// Client name as entered on the form
    pub fn client_name(&self) -> &str {
        self.text(NAME_FIELD).unwrap_or_default()
    }

    /// Returns true when the field is absent or blank
    pub fn is_blank(&self, name: &str) -> bool {
        self.field(name).map_or(true, FieldValue::is_blank)
    }

    /// Stores a flat field value
    ///
    /// No validation happens here; values are checked at submit time.
    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
        self.status = DraftStatus::Editing;
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
        self.status = DraftStatus::Editing;
    }

    pub(crate) fn mark_validated(&mut self) {
        self.status = DraftStatus::Validated;
    }

    /// Entities currently held in a collection
    pub fn entities(&self, collection: &str) -> &[SubEntity] {
        self.field(collection)
            .and_then(FieldValue::as_list)
            .unwrap_or(&[])
    }

    /// Validates the staged candidate and appends it to the collection
    ///
    /// On failure the collection is left unchanged.
    pub fn add_entity(
        &mut self,
        spec: &CollectionSpec,
        staging: &StagingEntity,
    ) -> Result<SubEntityId, QuoteError> {
        let attributes = spec.check_candidate(staging)?;
        let id = SubEntityId::new(self.next_entity_id);
        self.next_entity_id += 1;

        let entry = self
            .fields
            .entry(spec.name.to_string())
            .or_insert_with(|| FieldValue::List(Vec::new()));
        match entry {
            FieldValue::List(items) => items.push(SubEntity { id, attributes }),
            other => *other = FieldValue::List(vec![SubEntity { id, attributes }]),
        }
        self.status = DraftStatus::Editing;
        Ok(id)
    }

    /// Removes one entity from a collection by identifier
    pub fn remove_entity(
        &mut self,
        collection: &str,
        id: SubEntityId,
    ) -> Result<SubEntity, QuoteError> {
        let items = match self.fields.get_mut(collection) {
            Some(FieldValue::List(items)) => items,
            _ => return Err(QuoteError::EntityNotFound(id)),
        };
        let position = items
            .iter()
            .position(|entity| entity.id == id)
            .ok_or(QuoteError::EntityNotFound(id))?;
        self.status = DraftStatus::Editing;
        Ok(items.remove(position))
    }

    /// Sum of the collection's value field, recomputed on every call
    pub fn aggregate(&self, spec: &CollectionSpec) -> Option<Money> {
        let value_field = spec.value_field?;
        let amounts: Vec<Money> = self
            .entities(spec.name)
            .iter()
            .filter_map(|entity| entity.amount(value_field, self.currency))
            .collect();
        Money::sum(&amounts, self.currency).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::schema::VEHICLES;
    use rust_decimal_macros::dec;

    fn vehicle(registration: &str, value: &str) -> StagingEntity {
        let mut staging = StagingEntity::new();
        staging.set("registration", registration);
        staging.set("make", "Isuzu");
        staging.set("model", "FRR");
        staging.set("year", "2019");
        staging.set("value", value);
        staging
    }

    fn commercial_draft() -> QuoteDraft {
        QuoteDraft::new("Motor Commercial", ProductKind::MotorCommercial, Currency::KES)
    }

    #[test]
    fn test_new_draft_is_empty() {
        let draft = commercial_draft();
        assert_eq!(draft.status(), DraftStatus::Editing);
        assert!(draft.fields().is_empty());
        assert!(!draft.terms_accepted());
        assert_eq!(draft.client_name(), "");
    }

    #[test]
    fn test_entity_ids_are_unique_within_draft() {
        let mut draft = commercial_draft();
        let first = draft.add_entity(&VEHICLES, &vehicle("KAA 001A", "1000000")).unwrap();
        let second = draft.add_entity(&VEHICLES, &vehicle("KAA 002B", "1000000")).unwrap();
        assert_ne!(first, second);

        draft.remove_entity("vehicles", first).unwrap();
        let third = draft.add_entity(&VEHICLES, &vehicle("KAA 003C", "1000000")).unwrap();
        assert_ne!(third, first);
        assert_ne!(third, second);
    }

    #[test]
    fn test_aggregate_tracks_collection() {
        let mut draft = commercial_draft();
        let first = draft.add_entity(&VEHICLES, &vehicle("KAA 001A", "1000000")).unwrap();
        draft.add_entity(&VEHICLES, &vehicle("KAA 002B", "1500000")).unwrap();
        assert_eq!(draft.aggregate(&VEHICLES).unwrap().amount(), dec!(2500000));

        draft.remove_entity("vehicles", first).unwrap();
        assert_eq!(draft.aggregate(&VEHICLES).unwrap().amount(), dec!(1500000));
    }

    #[test]
    fn test_incomplete_entity_is_rejected() {
        let mut draft = commercial_draft();
        let mut staging = vehicle("KAA 001A", "1000000");
        staging.set("make", "  ");

        let result = draft.add_entity(&VEHICLES, &staging);
        assert!(matches!(result, Err(QuoteError::SubEntityIncomplete { .. })));
        assert!(draft.entities("vehicles").is_empty());
    }

    #[test]
    fn test_non_positive_value_is_rejected() {
        let mut draft = commercial_draft();
        for value in ["0", "-10", "lots"] {
            let result = draft.add_entity(&VEHICLES, &vehicle("KAA 001A", value));
            assert!(result.is_err(), "value {value} should be rejected");
        }
        assert!(draft.entities("vehicles").is_empty());
    }

    #[test]
    fn test_remove_unknown_entity() {
        let mut draft = commercial_draft();
        let result = draft.remove_entity("vehicles", SubEntityId::new(99));
        assert_eq!(result, Err(QuoteError::EntityNotFound(SubEntityId::new(99))));
    }
}
