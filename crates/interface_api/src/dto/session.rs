//! Workflow session DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use core_kernel::{Money, SessionId};
use domain_quote::{
    FieldValue, FormView, QuoteSummary, SubEntityId, WorkflowController, WorkflowState,
};

/// Longest text accepted for a single field
pub const MAX_TEXT_LEN: usize = 500;

#[derive(Debug, Deserialize, Validate)]
pub struct SelectProductRequest {
    #[validate(length(min = 1, max = 120, message = "product must be between 1 and 120 characters"))]
    pub product: String,
}

/// A field value as sent by the client
///
/// Strings are tried before numbers so text such as phone numbers keeps its
/// leading zeros.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Flag(bool),
    Text(String),
    Number(Decimal),
}

impl FieldInput {
    /// Text form used by the staging sub-form
    pub fn into_text(self) -> String {
        match self {
            FieldInput::Flag(flag) => flag.to_string(),
            FieldInput::Text(text) => text,
            FieldInput::Number(number) => number.to_string(),
        }
    }
}

impl From<FieldInput> for FieldValue {
    fn from(input: FieldInput) -> Self {
        match input {
            FieldInput::Flag(flag) => FieldValue::Flag(flag),
            FieldInput::Text(text) => FieldValue::Text(text),
            FieldInput::Number(number) => FieldValue::Number(number),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FieldRequest {
    pub value: FieldInput,
}

impl Validate for FieldRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match &self.value {
            FieldInput::Text(text) if text.chars().count() > MAX_TEXT_LEN => {
                let mut error = ValidationError::new("length");
                error.add_param("max".into(), &MAX_TEXT_LEN);
                error.message = Some(format!("value must be at most {MAX_TEXT_LEN} characters").into());

                let mut errors = ValidationErrors::new();
                errors.add("value", error);
                Err(errors)
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TermsRequest {
    pub accepted: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmRequest {
    /// Print the summary before committing
    #[serde(default)]
    pub print: bool,
}

/// Snapshot of one session's controller
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub state: WorkflowState,
    pub product: Option<String>,
    pub form: Option<FormView>,
    pub summary: Option<QuoteSummary>,
    pub last_error: Option<String>,
    pub is_submitting: bool,
}

impl SessionResponse {
    pub fn from_controller(id: SessionId, controller: &WorkflowController) -> Self {
        Self {
            id: id.to_string(),
            state: controller.state(),
            product: controller.selected_product().map(|product| product.key.clone()),
            form: controller.render(),
            summary: controller.provisional().map(|provisional| provisional.summary()),
            last_error: controller.last_error().map(ToString::to_string),
            is_submitting: controller.is_submitting(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntityAddedResponse {
    pub entity_id: SubEntityId,
    pub aggregate: Option<Money>,
}
