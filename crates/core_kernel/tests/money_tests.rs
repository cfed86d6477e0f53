//! Unit tests for the Money module
//!
//! Tests cover money creation, arithmetic, comparison against product minimums, and rates.

use core_kernel::{Money, Currency, MoneyError, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::KES);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::KES);
        assert!(m.is_zero());
        assert!(!m.is_positive());
    }

    #[test]
    fn test_round_to_currency_uses_currency_places() {
        let kes = Money::new(dec!(10.125), Currency::KES).round_to_currency();
        assert_eq!(kes.amount(), dec!(10.12));

        let ugx = Money::new(dec!(10.6), Currency::UGX).round_to_currency();
        assert_eq!(ugx.amount(), dec!(11));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_sum_adds_insured_values() {
        let items = [
            Money::new(dec!(1000000), Currency::KES),
            Money::new(dec!(1500000), Currency::KES),
        ];
        assert_eq!(Money::sum(&items, Currency::KES).unwrap().amount(), dec!(2500000));
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total = Money::sum(&[], Currency::KES).unwrap();
        assert!(total.is_zero());
    }

    #[test]
    fn test_sum_rejects_mixed_currencies() {
        let items = [
            Money::new(dec!(1), Currency::KES),
            Money::new(dec!(1), Currency::USD),
        ];
        assert!(matches!(
            Money::sum(&items, Currency::KES),
            Err(MoneyError::CurrencyMismatch(_, _))
        ));
    }

    #[test]
    fn test_at_least_is_inclusive() {
        let minimum = Money::new(dec!(500000), Currency::KES);
        assert!(Money::new(dec!(500000), Currency::KES).at_least(&minimum).unwrap());
        assert!(!Money::new(dec!(499999), Currency::KES).at_least(&minimum).unwrap());
    }
}

mod display {
    use super::*;

    #[test]
    fn test_display_uses_symbol_and_places() {
        let m = Money::new(dec!(30000), Currency::KES);
        assert_eq!(m.to_string(), "KSh 30000.00");
    }

    #[test]
    fn test_rate_display() {
        let rate = Rate::from_percentage(dec!(5));
        assert!(rate.to_string().ends_with('%'));
        assert_eq!(rate.as_decimal(), dec!(0.05));
    }

    #[test]
    fn test_rate_round_trip_percentage() {
        let rate = Rate::new(Decimal::new(45, 3));
        assert_eq!(rate.as_percentage(), dec!(4.5));
    }
}
