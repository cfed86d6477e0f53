//! Provisional and finalized quotes

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Currency, DraftId, Money, QuoteId};
use crate::draft::QuoteDraft;
use crate::error::QuoteError;

/// Days a finalized quote stays valid unless configured otherwise
pub const DEFAULT_VALIDITY_DAYS: i64 = 30;

/// Status of a quote in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteStatus {
    /// Newly committed, awaiting back-office review
    Pending,
    Approved,
    Expired,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "Pending",
            QuoteStatus::Approved => "Approved",
            QuoteStatus::Expired => "Expired",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(QuoteStatus::Pending),
            "approved" => Ok(QuoteStatus::Approved),
            "expired" => Ok(QuoteStatus::Expired),
            other => Err(QuoteError::Export(format!("unknown quote status: {other}"))),
        }
    }
}

/// The fields shown on the summary screen and in printed documents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSummary {
    /// Ledger id once committed, draft reference before
    pub reference: String,
    pub client_name: String,
    pub product: String,
    pub amount: Money,
    pub status: QuoteStatus,
}

/// A validated draft with its computed premium, not yet in the ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionalQuote {
    pub reference: DraftId,
    pub client_name: String,
    pub product: String,
    pub amount: Money,
    pub agent: String,
    pub details: QuoteDraft,
    pub prepared_at: DateTime<Utc>,
}

impl ProvisionalQuote {
    pub fn new(draft: QuoteDraft, amount: Money, agent: impl Into<String>) -> Self {
        Self {
            reference: draft.id(),
            client_name: draft.client_name().to_string(),
            product: draft.product_key().to_string(),
            amount,
            agent: agent.into(),
            details: draft,
            prepared_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            reference: self.reference.to_string(),
            client_name: self.client_name.clone(),
            product: self.product.clone(),
            amount: self.amount,
            status: QuoteStatus::Pending,
        }
    }
}

/// What the submitter gets back from a successful commit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub id: QuoteId,
    pub amount: Money,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A finalized quote held by the ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub id: QuoteId,
    pub client_name: String,
    pub product: String,
    pub amount: Money,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub agent: String,
    pub details: QuoteDraft,
}

impl Quote {
    /// Finalizes a provisional quote under a ledger-assigned id
    pub fn from_provisional(
        id: QuoteId,
        provisional: ProvisionalQuote,
        created_at: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            id,
            client_name: provisional.client_name,
            product: provisional.product,
            amount: provisional.amount,
            status: QuoteStatus::Pending,
            created_at,
            expires_at: created_at
                .checked_add_signed(validity)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            agent: provisional.agent,
            details: provisional.details,
        }
    }

    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            reference: self.id.to_string(),
            client_name: self.client_name.clone(),
            product: self.product.clone(),
            amount: self.amount,
            status: self.status,
        }
    }

    pub fn receipt(&self) -> SubmissionReceipt {
        SubmissionReceipt {
            id: self.id,
            amount: self.amount,
            status: self.status,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }

    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        self.status == QuoteStatus::Expired || at >= self.expires_at
    }
}

/// Count and total amount for one quote status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusTotal {
    pub status: QuoteStatus,
    pub count: usize,
    pub amount: Money,
}

/// Aggregate figures for the back-office stats cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerStats {
    pub total_quotes: usize,
    pub total_amount: Money,
    pub by_status: Vec<StatusTotal>,
}

impl LedgerStats {
    /// Computes stats over quotes in the given currency; other currencies are ignored
    pub fn from_quotes(quotes: &[Quote], currency: Currency) -> Self {
        let in_currency: Vec<&Quote> = quotes
            .iter()
            .filter(|quote| quote.amount.currency() == currency)
            .collect();

        // Every quote here is already in `currency`
        let total = |items: &[&Quote]| {
            Money::sum(items.iter().map(|quote| &quote.amount), currency)
                .unwrap_or_else(|_| Money::zero(currency))
        };

        let by_status = [QuoteStatus::Pending, QuoteStatus::Approved, QuoteStatus::Expired]
            .into_iter()
            .map(|status| {
                let matching: Vec<&Quote> = in_currency
                    .iter()
                    .copied()
                    .filter(|quote| quote.status == status)
                    .collect();
                StatusTotal {
                    status,
                    count: matching.len(),
                    amount: total(&matching),
                }
            })
            .collect();

        Self {
            total_quotes: in_currency.len(),
            total_amount: total(&in_currency),
            by_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductKind;
    use crate::value::FieldValue;
    use rust_decimal_macros::dec;

    fn provisional(amount: rust_decimal::Decimal) -> ProvisionalQuote {
        let mut draft =
            QuoteDraft::new("Private Motor Insurance", ProductKind::PrivateMotor, Currency::KES);
        draft.set_field("name", FieldValue::text("Jane"));
        ProvisionalQuote::new(draft, Money::new(amount, Currency::KES), "Web Portal")
    }

    #[test]
    fn test_provisional_summary_is_pending() {
        let quote = provisional(dec!(30000));
        let summary = quote.summary();
        assert_eq!(summary.client_name, "Jane");
        assert_eq!(summary.product, "Private Motor Insurance");
        assert_eq!(summary.status, QuoteStatus::Pending);
        assert!(summary.reference.starts_with("DRF-"));
    }

    #[test]
    fn test_expiry_follows_validity() {
        let created = Utc::now();
        let quote = Quote::from_provisional(
            QuoteId::from_sequence(1),
            provisional(dec!(30000)),
            created,
            Duration::days(DEFAULT_VALIDITY_DAYS),
        );
        assert_eq!(quote.expires_at - quote.created_at, Duration::days(30));
        assert!(!quote.is_expired_at(created));
        assert!(quote.is_expired_at(created + Duration::days(30)));
        assert_eq!(quote.receipt().id.to_string(), "QT-00001");
    }

    #[test]
    fn test_expiry_saturates_instead_of_overflowing() {
        let created = Utc::now();
        let quote = Quote::from_provisional(
            QuoteId::from_sequence(1),
            provisional(dec!(30000)),
            created,
            Duration::MAX,
        );
        assert_eq!(quote.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(!quote.is_expired_at(created));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("pending".parse::<QuoteStatus>().unwrap(), QuoteStatus::Pending);
        assert!("Lapsed".parse::<QuoteStatus>().is_err());
    }

    #[test]
    fn test_ledger_stats() {
        let now = Utc::now();
        let mut approved = Quote::from_provisional(
            QuoteId::from_sequence(2),
            provisional(dec!(12000)),
            now,
            Duration::days(30),
        );
        approved.status = QuoteStatus::Approved;
        let quotes = vec![
            Quote::from_provisional(QuoteId::from_sequence(1), provisional(dec!(30000)), now, Duration::days(30)),
            approved,
        ];

        let stats = LedgerStats::from_quotes(&quotes, Currency::KES);
        assert_eq!(stats.total_quotes, 2);
        assert_eq!(stats.total_amount.amount(), dec!(42000));
        assert_eq!(stats.by_status[0].count, 1);
        assert_eq!(stats.by_status[1].amount.amount(), dec!(12000));
        assert_eq!(stats.by_status[2].count, 0);
    }
}
