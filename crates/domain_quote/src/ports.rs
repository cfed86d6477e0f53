//! Quote Domain Ports
//!
//! Port interfaces for the collaborators the quote workflow depends on:
//!
//! - **`QuoteLedger`**: the append-only store of finalized quotes. The
//!   in-memory adapter is the default; a durable store can replace it
//!   without touching the workflow.
//! - **`QuotePrinter`**: renders a quote summary to a printable document.
//!   Printing is best-effort and never decides whether a quote is committed.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_quote::ports::QuoteLedger;
//! use std::sync::Arc;
//!
//! let ledger: Arc<dyn QuoteLedger> = Arc::new(InMemoryQuoteLedger::new());
//! let quote = ledger.append(provisional).await?;
//! println!("committed {}", quote.id);
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, QuoteId};
use crate::quote::{ProvisionalQuote, Quote, QuoteSummary};

/// Append-only collection of finalized quotes
#[async_trait]
pub trait QuoteLedger: DomainPort + HealthCheckable {
    /// Assigns the next quote id atomically and stores the quote
    async fn append(&self, provisional: ProvisionalQuote) -> Result<Quote, PortError>;

    /// Returns every quote, most recent first
    async fn list(&self) -> Result<Vec<Quote>, PortError>;

    /// Finds a quote by id
    async fn find_by_id(&self, id: QuoteId) -> Result<Quote, PortError>;
}

/// Produces a printable document for a quote
#[async_trait]
pub trait QuotePrinter: DomainPort + HealthCheckable {
    async fn print(&self, summary: &QuoteSummary) -> Result<(), PortError>;
}
