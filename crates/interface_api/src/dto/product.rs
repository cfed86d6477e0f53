//! Product DTOs

use serde::Serialize;

use core_kernel::Money;
use domain_quote::product::BASE_FIELDS;
use domain_quote::{CollectionSpec, FieldSet, FieldSpec, ProductDefinition};

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub key: String,
    pub description: String,
    pub image: String,
    pub minimum_value: Option<Money>,
    pub has_form: bool,
}

impl From<&ProductDefinition> for ProductResponse {
    fn from(product: &ProductDefinition) -> Self {
        Self {
            key: product.key.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            minimum_value: product.minimum_value,
            has_form: product.has_form(),
        }
    }
}

/// Shape of a product's quote form, without any draft values
#[derive(Debug, Serialize)]
pub struct FormSchemaResponse {
    pub fields: Vec<FieldSpec>,
    pub collection: Option<CollectionSpec>,
    pub requires_terms: bool,
    pub required_fields: Vec<&'static str>,
}

impl FormSchemaResponse {
    pub fn for_field_set(field_set: &dyn FieldSet) -> Self {
        Self {
            fields: BASE_FIELDS
                .iter()
                .chain(field_set.fields())
                .copied()
                .collect(),
            collection: field_set.collection().copied(),
            requires_terms: field_set.requires_terms(),
            required_fields: field_set.required_fields(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub form: Option<FormSchemaResponse>,
}

impl From<&ProductDefinition> for ProductDetailResponse {
    fn from(product: &ProductDefinition) -> Self {
        Self {
            product: ProductResponse::from(product),
            form: product
                .field_set
                .as_ref()
                .map(|kind| FormSchemaResponse::for_field_set(kind)),
        }
    }
}
