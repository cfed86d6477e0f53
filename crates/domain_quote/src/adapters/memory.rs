//! In-memory quote ledger
//!
//! Holds finalized quotes for the lifetime of the process. Id assignment and
//! insertion happen under one write lock, so concurrent appends never share
//! an id.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, QuoteId};
use crate::ports::QuoteLedger;
use crate::quote::{ProvisionalQuote, Quote, DEFAULT_VALIDITY_DAYS};

#[derive(Debug, Default)]
struct LedgerState {
    last_sequence: u64,
    quotes: Vec<Quote>,
}

/// Process-local implementation of [`QuoteLedger`]
#[derive(Debug, Clone)]
pub struct InMemoryQuoteLedger {
    state: Arc<RwLock<LedgerState>>,
    validity: Duration,
}

impl InMemoryQuoteLedger {
    pub fn new() -> Self {
        Self::with_validity(Duration::days(DEFAULT_VALIDITY_DAYS))
    }

    /// Creates a ledger whose quotes expire after `validity`
    pub fn with_validity(validity: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(LedgerState::default())),
            validity,
        }
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.quotes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryQuoteLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainPort for InMemoryQuoteLedger {}

#[async_trait]
impl HealthCheckable for InMemoryQuoteLedger {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let count = self.state.read().await.quotes.len();
        HealthCheckResult::healthy("in-memory-quote-ledger", start.elapsed().as_millis() as u64)
            .with_detail(format!("{count} quotes held"))
    }
}

#[async_trait]
impl QuoteLedger for InMemoryQuoteLedger {
    async fn append(&self, provisional: ProvisionalQuote) -> Result<Quote, PortError> {
        let mut state = self.state.write().await;
        let sequence = state
            .last_sequence
            .checked_add(1)
            .ok_or_else(|| PortError::internal("quote sequence exhausted"))?;
        let quote = Quote::from_provisional(
            QuoteId::from_sequence(sequence),
            provisional,
            Utc::now(),
            self.validity,
        );
        state.last_sequence = sequence;
        state.quotes.push(quote.clone());

        tracing::info!(
            quote_id = %quote.id,
            product = %quote.product,
            amount = %quote.amount,
            "Quote appended to ledger"
        );
        Ok(quote)
    }

    async fn list(&self) -> Result<Vec<Quote>, PortError> {
        let state = self.state.read().await;
        Ok(state.quotes.iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: QuoteId) -> Result<Quote, PortError> {
        self.state
            .read()
            .await
            .quotes
            .iter()
            .find(|quote| quote.id == id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Quote", id))
    }
}
