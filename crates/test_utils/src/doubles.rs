//! Test doubles for the quote domain ports

use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::Notify;

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, PortError, QuoteId,
};
use domain_quote::{ProvisionalQuote, Quote, QuoteLedger, QuotePrinter, QuoteSummary};

/// Printer that remembers every summary it was asked to print
#[derive(Debug, Default)]
pub struct RecordingPrinter {
    printed: Mutex<Vec<QuoteSummary>>,
}

impl RecordingPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn printed(&self) -> Vec<QuoteSummary> {
        self.printed.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl DomainPort for RecordingPrinter {}

#[async_trait]
impl HealthCheckable for RecordingPrinter {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("recording-printer", 0)
    }
}

#[async_trait]
impl QuotePrinter for RecordingPrinter {
    async fn print(&self, summary: &QuoteSummary) -> Result<(), PortError> {
        if let Ok(mut printed) = self.printed.lock() {
            printed.push(summary.clone());
        }
        Ok(())
    }
}

/// Printer that always fails
#[derive(Debug, Default)]
pub struct FailingPrinter;

impl DomainPort for FailingPrinter {}

#[async_trait]
impl HealthCheckable for FailingPrinter {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::unhealthy("failing-printer", "printer offline")
    }
}

#[async_trait]
impl QuotePrinter for FailingPrinter {
    async fn print(&self, _summary: &QuoteSummary) -> Result<(), PortError> {
        Err(PortError::unavailable("failing-printer", "printer offline"))
    }
}

/// Printer that blocks until released, for exercising cancel during commit
#[derive(Debug, Default)]
pub struct GatedPrinter {
    entered: Notify,
    release: Notify,
}

impl GatedPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until a print call is in progress
    pub async fn wait_until_printing(&self) {
        self.entered.notified().await;
    }

    /// Lets the pending print call return
    pub fn release(&self) {
        self.release.notify_one();
    }
}

impl DomainPort for GatedPrinter {}

#[async_trait]
impl HealthCheckable for GatedPrinter {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("gated-printer", 0)
    }
}

#[async_trait]
impl QuotePrinter for GatedPrinter {
    async fn print(&self, _summary: &QuoteSummary) -> Result<(), PortError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

/// Ledger whose every call fails with a connection error
#[derive(Debug, Default)]
pub struct FailingLedger;

impl DomainPort for FailingLedger {}

#[async_trait]
impl HealthCheckable for FailingLedger {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::unhealthy("failing-ledger", "ledger offline")
    }
}

#[async_trait]
impl QuoteLedger for FailingLedger {
    async fn append(&self, _provisional: ProvisionalQuote) -> Result<Quote, PortError> {
        Err(PortError::unavailable("failing-ledger", "ledger offline"))
    }

    async fn list(&self) -> Result<Vec<Quote>, PortError> {
        Err(PortError::unavailable("failing-ledger", "ledger offline"))
    }

    async fn find_by_id(&self, _id: QuoteId) -> Result<Quote, PortError> {
        Err(PortError::unavailable("failing-ledger", "ledger offline"))
    }
}
