//! Unit tests for the Identifiers module

use core_kernel::{SessionId, DraftId, QuoteId};
use uuid::Uuid;

mod uuid_ids {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(SessionId::prefix(), "SES");
        assert_eq!(DraftId::prefix(), "DRF");
    }

    #[test]
    fn test_parse_without_prefix() {
        let uuid = Uuid::new_v4();
        let parsed: SessionId = uuid.to_string().parse().unwrap();
        assert_eq!(parsed.as_uuid(), &uuid);
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = DraftId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}

mod quote_ids {
    use super::*;

    #[test]
    fn test_ordering_follows_sequence() {
        assert!(QuoteId::from_sequence(1) < QuoteId::from_sequence(2));
    }

    #[test]
    fn test_display_round_trip() {
        let id = QuoteId::from_sequence(123);
        let parsed: QuoteId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.sequence(), 123);
    }

    #[test]
    fn test_large_sequence_is_not_truncated() {
        assert_eq!(QuoteId::from_sequence(1_234_567).to_string(), "QT-1234567");
    }
}
