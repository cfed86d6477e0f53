//! Ports and Adapters Infrastructure
//!
//! Domain crates declare their outbound ports (the quote ledger, the quote
//! printer) as traits extending [`DomainPort`] and [`HealthCheckable`]. Every
//! adapter reports failures as [`PortError`] and its own health as a
//! [`HealthCheckResult`], so the service layer can treat an in-memory ledger
//! and a file-backed printer the same way.
//!
//! ```text
//!   QuoteWorkflowService
//!          │
//!          ├── QuoteLedger  ──► InMemoryQuoteLedger
//!          └── QuotePrinter ──► HtmlDocumentPrinter
//! ```

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Failure reported by an adapter behind a port
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested record does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The backing system cannot be reached right now
    #[error("{adapter} is unavailable: {reason}")]
    Unavailable { adapter: String, reason: String },

    /// The call did not complete in time
    #[error("{operation} timed out after {elapsed_ms}ms")]
    Timeout { operation: String, elapsed_ms: u64 },

    /// Reading or writing local storage failed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// An invariant inside the adapter was broken
    #[error("{0}")]
    Internal(String),
}

impl PortError {
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn unavailable(adapter: impl Into<String>, reason: impl Into<String>) -> Self {
        PortError::Unavailable {
            adapter: adapter.into(),
            reason: reason.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PortError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal(message.into())
    }

    /// Whether the same call may succeed if the user tries again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PortError::Unavailable { .. } | PortError::Timeout { .. } | PortError::Io { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker for port traits; ports are shared across request tasks
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    /// Working, but something needs attention
    Degraded,
    Unhealthy,
}

/// Outcome of one adapter health probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub adapter: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    fn new(adapter: impl Into<String>, status: AdapterHealth, latency_ms: u64) -> Self {
        Self {
            adapter: adapter.into(),
            status,
            latency_ms,
            detail: None,
            checked_at: chrono::Utc::now(),
        }
    }

    pub fn healthy(adapter: impl Into<String>, latency_ms: u64) -> Self {
        Self::new(adapter, AdapterHealth::Healthy, latency_ms)
    }

    pub fn degraded(adapter: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(adapter, AdapterHealth::Degraded, 0).with_detail(detail)
    }

    pub fn unhealthy(adapter: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(adapter, AdapterHealth::Unhealthy, 0).with_detail(detail)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Degraded adapters still count as operational
    pub fn is_operational(&self) -> bool {
        self.status != AdapterHealth::Unhealthy
    }
}

/// Adapters that can probe their backing system
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}
