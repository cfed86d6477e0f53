//! Static form schemas for each product with a quote form

use rust_decimal_macros::dec;

use super::{CollectionSpec, FieldKind, FieldSpec};
use crate::premium::RatingBasis;

/// Where a product's insurable value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// A declared amount field on the form
    Field(&'static str),
    /// Sum of the collection's value field
    CollectionTotal,
    /// The product has no insurable value
    None,
}

/// Everything that distinguishes one product form from another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductSchema {
    pub fields: &'static [FieldSpec],
    pub collection: Option<&'static CollectionSpec>,
    pub value_source: ValueSource,
    pub requires_terms: bool,
    pub rating: RatingBasis,
}

const COVER_TYPES: &[&str] = &["Comprehensive", "Third Party Only", "Third Party Fire & Theft"];
const FLEET_USAGE: &[&str] = &["Own Goods", "General Cartage", "Passenger Service"];
const INCOTERMS: &[&str] = &["EXW", "FOB", "CFR", "CIF"];

pub static PRIVATE_MOTOR: ProductSchema = ProductSchema {
    fields: &[
        FieldSpec::required("make", "Vehicle make", FieldKind::Text),
        FieldSpec::required("model", "Vehicle model", FieldKind::Text),
        FieldSpec::required("year", "Year of manufacture", FieldKind::Year),
        FieldSpec::required("value", "Vehicle value", FieldKind::Amount),
        FieldSpec::optional("registration", "Registration number", FieldKind::Text),
        FieldSpec::optional("cover_type", "Cover type", FieldKind::Choice(COVER_TYPES)),
    ],
    collection: None,
    value_source: ValueSource::Field("value"),
    requires_terms: false,
    rating: RatingBasis::ValueRate {
        percentage: dec!(5),
        minimum_premium: None,
    },
};

pub static VEHICLES: CollectionSpec = CollectionSpec {
    name: "vehicles",
    label: "Fleet vehicles",
    entity_label: "Vehicle",
    fields: &[
        FieldSpec::required("registration", "Registration number", FieldKind::Text),
        FieldSpec::required("make", "Make", FieldKind::Text),
        FieldSpec::required("model", "Model", FieldKind::Text),
        FieldSpec::required("year", "Year", FieldKind::Year),
        FieldSpec::required("value", "Value", FieldKind::Amount),
    ],
    value_field: Some("value"),
    required: true,
};

pub static MOTOR_COMMERCIAL: ProductSchema = ProductSchema {
    fields: &[
        FieldSpec::required("business_name", "Business name", FieldKind::Text),
        FieldSpec::optional("tax_pin", "KRA PIN", FieldKind::Text),
        FieldSpec::required("fleet_usage", "Fleet usage", FieldKind::Choice(FLEET_USAGE)),
    ],
    collection: Some(&VEHICLES),
    value_source: ValueSource::CollectionTotal,
    requires_terms: true,
    rating: RatingBasis::ValueRate {
        percentage: dec!(4),
        minimum_premium: None,
    },
};

pub static CARGO_ITEMS: CollectionSpec = CollectionSpec {
    name: "cargo_items",
    label: "Cargo items",
    entity_label: "Cargo item",
    fields: &[
        FieldSpec::required("description", "Description", FieldKind::Text),
        FieldSpec::required("quantity", "Quantity", FieldKind::Count),
        FieldSpec::required("value", "Value", FieldKind::Amount),
    ],
    value_field: Some("value"),
    required: true,
};

pub static MARINE_CARGO: ProductSchema = ProductSchema {
    fields: &[
        FieldSpec::required("vessel_name", "Vessel name", FieldKind::Text),
        FieldSpec::required("port_of_loading", "Port of loading", FieldKind::Text),
        FieldSpec::required("port_of_discharge", "Port of discharge", FieldKind::Text),
        FieldSpec::required("shipment_date", "Shipment date", FieldKind::Date),
        FieldSpec::optional("incoterm", "Incoterm", FieldKind::Choice(INCOTERMS)),
    ],
    collection: Some(&CARGO_ITEMS),
    value_source: ValueSource::CollectionTotal,
    requires_terms: true,
    rating: RatingBasis::ValueRate {
        percentage: dec!(0.35),
        minimum_premium: Some(dec!(5000)),
    },
};

pub static DEPENDENTS: CollectionSpec = CollectionSpec {
    name: "dependents",
    label: "Dependents",
    entity_label: "Dependent",
    fields: &[
        FieldSpec::required("name", "Full name", FieldKind::Text),
        FieldSpec::required("relationship", "Relationship", FieldKind::Text),
        FieldSpec::required("date_of_birth", "Date of birth", FieldKind::Date),
    ],
    value_field: None,
    required: false,
};

pub static SENIORS_PLAN: ProductSchema = ProductSchema {
    fields: &[
        FieldSpec::required("date_of_birth", "Date of birth", FieldKind::Date),
        FieldSpec::required("cover_amount", "Cover amount", FieldKind::Amount),
        FieldSpec::optional("pre_existing_conditions", "Pre-existing conditions", FieldKind::Text),
    ],
    collection: Some(&DEPENDENTS),
    value_source: ValueSource::Field("cover_amount"),
    requires_terms: true,
    rating: RatingBasis::ValueRatePerEntity {
        percentage: dec!(3),
        per_entity: dec!(2500),
    },
};

pub static FAMILY_MEMBERS: CollectionSpec = CollectionSpec {
    name: "family_members",
    label: "Family members",
    entity_label: "Family member",
    fields: &[
        FieldSpec::required("name", "Full name", FieldKind::Text),
        FieldSpec::required("relationship", "Relationship", FieldKind::Text),
        FieldSpec::required("date_of_birth", "Date of birth", FieldKind::Date),
    ],
    value_field: None,
    required: false,
};

pub static FAMILY_MEDICAL: ProductSchema = ProductSchema {
    fields: &[
        FieldSpec::required("inpatient_limit", "Inpatient limit", FieldKind::Amount),
        FieldSpec::optional("outpatient_cover", "Outpatient cover", FieldKind::Flag),
    ],
    collection: Some(&FAMILY_MEMBERS),
    value_source: ValueSource::Field("inpatient_limit"),
    requires_terms: true,
    rating: RatingBasis::ValueRatePerEntity {
        percentage: dec!(2.5),
        per_entity: dec!(4000),
    },
};

pub static STUDENT_ACCIDENT: ProductSchema = ProductSchema {
    fields: &[
        FieldSpec::required("student_name", "Student name", FieldKind::Text),
        FieldSpec::required("school", "School", FieldKind::Text),
        FieldSpec::required("date_of_birth", "Date of birth", FieldKind::Date),
        FieldSpec::required("cover_amount", "Cover amount", FieldKind::Amount),
    ],
    collection: None,
    value_source: ValueSource::Field("cover_amount"),
    requires_terms: false,
    rating: RatingBasis::ValueRate {
        percentage: dec!(1),
        minimum_premium: None,
    },
};

pub static SPORTS_COVER: ProductSchema = ProductSchema {
    fields: &[
        FieldSpec::required("sport", "Sport", FieldKind::Text),
        FieldSpec::optional("team_name", "Team name", FieldKind::Text),
        FieldSpec::required("participants", "Number of participants", FieldKind::Count),
    ],
    collection: None,
    value_source: ValueSource::None,
    requires_terms: true,
    rating: RatingBasis::PerUnit {
        field: "participants",
        unit_premium: dec!(1200),
    },
};
