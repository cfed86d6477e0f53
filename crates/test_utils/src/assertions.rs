//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for quote workflow types that give
//! more meaningful error messages than standard assertions.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_quote::{QuoteError, WorkflowController, WorkflowState};

/// Asserts that a Money value has the expected amount, ignoring scale
pub fn assert_money_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Money amount mismatch: actual={}, expected={} {}",
        actual,
        actual.currency().symbol(),
        expected
    );
}

/// Asserts that a result failed because a field was missing
pub fn assert_missing_field<T: std::fmt::Debug>(result: Result<T, QuoteError>, field: &str) {
    match result {
        Err(QuoteError::MissingRequiredField { field: actual }) => assert_eq!(
            actual, field,
            "Expected missing field '{}', got missing field '{}'",
            field, actual
        ),
        other => panic!("Expected MissingRequiredField({field}), got {other:?}"),
    }
}

/// Asserts that a result failed on the product minimum and returns the minimum
pub fn assert_below_minimum<T: std::fmt::Debug>(result: Result<T, QuoteError>) -> Money {
    match result {
        Err(QuoteError::BelowMinimumValue { minimum, .. }) => minimum,
        other => panic!("Expected BelowMinimumValue, got {other:?}"),
    }
}

/// Asserts the controller's state with the last error in the message
pub fn assert_state(controller: &WorkflowController, expected: WorkflowState) {
    assert_eq!(
        controller.state(),
        expected,
        "Unexpected workflow state (last error: {:?})",
        controller.last_error()
    );
}

/// Asserts how many entities the open draft's collection holds
pub fn assert_collection_len(controller: &WorkflowController, expected: usize) {
    let draft = controller.draft().expect("controller should have an open draft");
    let collection = draft
        .kind()
        .schema()
        .collection
        .expect("product should have a collection");
    assert_eq!(
        draft.entities(collection.name).len(),
        expected,
        "Unexpected number of entries in {}",
        collection.name
    );
}
