//! Tests for core_kernel error types

use core_kernel::{CoreError, Currency, MoneyError, QuoteId, SessionId};

#[test]
fn test_unknown_currency_converts_transparently() {
    let money_error = "XYZ".parse::<Currency>().unwrap_err();
    let core_error = CoreError::from(money_error.clone());
    assert_eq!(core_error, CoreError::Money(MoneyError::UnknownCurrency("XYZ".to_string())));
    assert_eq!(core_error.to_string(), money_error.to_string());
    assert!(core_error.is_input_error());
}

#[test]
fn test_quote_id_error_keeps_the_input() {
    let core_error: CoreError = "nope".parse::<QuoteId>().unwrap_err().into();
    assert!(core_error.to_string().contains("nope"));
    assert!(core_error.is_input_error());
}

#[test]
fn test_session_id_error_is_input_error() {
    let err = "12345".parse::<SessionId>().unwrap_err();
    assert!(matches!(err, CoreError::InvalidIdentifier { kind: "session", .. }));
}

#[test]
fn test_configuration_error_is_not_input_error() {
    let err = CoreError::configuration("quote validity must be at least one day");
    assert!(!err.is_input_error());
    assert!(err.to_string().starts_with("Configuration error"));
}
