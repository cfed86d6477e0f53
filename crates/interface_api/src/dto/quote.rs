//! Quote ledger DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use core_kernel::Money;
use domain_quote::{Quote, QuoteDraft, QuoteStatus, SubmissionReceipt};

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub id: String,
    pub client_name: String,
    pub product: String,
    pub amount: Money,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub agent: String,
}

impl From<&Quote> for QuoteResponse {
    fn from(quote: &Quote) -> Self {
        Self {
            id: quote.id.to_string(),
            client_name: quote.client_name.clone(),
            product: quote.product.clone(),
            amount: quote.amount,
            status: quote.status,
            created_at: quote.created_at,
            expires_at: quote.expires_at,
            agent: quote.agent.clone(),
        }
    }
}

/// A ledger entry together with the draft it was committed from
#[derive(Debug, Serialize)]
pub struct QuoteDetailResponse {
    #[serde(flatten)]
    pub quote: QuoteResponse,
    pub details: QuoteDraft,
}

impl From<Quote> for QuoteDetailResponse {
    fn from(quote: Quote) -> Self {
        Self {
            quote: QuoteResponse::from(&quote),
            details: quote.details,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub id: String,
    pub amount: Money,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<SubmissionReceipt> for ReceiptResponse {
    fn from(receipt: SubmissionReceipt) -> Self {
        Self {
            id: receipt.id.to_string(),
            amount: receipt.amount,
            status: receipt.status,
            created_at: receipt.created_at,
            expires_at: receipt.expires_at,
        }
    }
}
