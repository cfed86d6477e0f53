//! Quote workflow application service
//!
//! Owns the product catalog, the ledger and printer ports, and a registry of
//! workflow sessions. Each session holds exactly one controller behind a mutex,
//! so actions on one session are applied in order while separate sessions
//! proceed independently.
//!
//! Committing runs in three steps:
//!
//! 1. `begin_commit` under the session lock marks the draft as submitting
//! 2. for print-and-confirm, the summary is printed with the lock released; a
//!    print failure is logged and the commit continues
//! 3. the session is locked again and, if the draft was not cancelled in the
//!    meantime, the ledger append and `complete_commit` run under that lock
//!
//! A cancel that lands during printing therefore discards the commit, while a
//! cancel issued once the append has started waits for it to finish.
//!
//! Sessions untouched for longer than the session TTL are evicted: lazily when
//! looked up, on every `open_session`, and by [`QuoteWorkflowService::evict_idle_sessions`]
//! for callers that sweep periodically.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use core_kernel::{HealthCheckResult, QuoteId, SessionId};
use crate::error::QuoteError;
use crate::export;
use crate::ports::{QuoteLedger, QuotePrinter};
use crate::product::ProductCatalog;
use crate::quote::{LedgerStats, Quote};
use crate::workflow::{CommitMode, CommitOutcome, WorkflowController};

/// Shared handle to one session's controller
pub type SessionHandle = Arc<Mutex<WorkflowController>>;

/// Idle time after which a session is evicted unless configured otherwise
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;

struct SessionEntry {
    handle: SessionHandle,
    last_touched: DateTime<Utc>,
}

impl SessionEntry {
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_touched >= ttl
    }
}

/// Entry point for every quote workflow operation
pub struct QuoteWorkflowService {
    catalog: Arc<ProductCatalog>,
    ledger: Arc<dyn QuoteLedger>,
    printer: Arc<dyn QuotePrinter>,
    agent: String,
    session_ttl: Duration,
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
}

impl QuoteWorkflowService {
    pub fn new(
        catalog: Arc<ProductCatalog>,
        ledger: Arc<dyn QuoteLedger>,
        printer: Arc<dyn QuotePrinter>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            printer,
            agent: agent.into(),
            session_ttl: Duration::minutes(DEFAULT_SESSION_TTL_MINUTES),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Sets how long a session may sit idle before it is evicted
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Starts a new session with an idle controller, evicting idle ones first
    pub async fn open_session(&self) -> (SessionId, SessionHandle) {
        let id = SessionId::new_v7();
        let controller = WorkflowController::new(Arc::clone(&self.catalog), self.agent.clone());
        let handle = Arc::new(Mutex::new(controller));

        let mut sessions = self.sessions.write().await;
        let evicted = Self::evict_expired(&mut sessions, self.session_ttl);
        sessions.insert(
            id,
            SessionEntry {
                handle: Arc::clone(&handle),
                last_touched: Utc::now(),
            },
        );
        tracing::info!(session_id = %id, evicted, "Workflow session opened");
        (id, handle)
    }

    /// Looks up a live session and marks it as touched
    pub async fn session(&self, id: SessionId) -> Result<SessionHandle, QuoteError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let expired = match sessions.get_mut(&id) {
            Some(entry) if entry.is_expired(now, self.session_ttl) => true,
            Some(entry) => {
                entry.last_touched = now;
                return Ok(Arc::clone(&entry.handle));
            }
            None => false,
        };
        if expired {
            sessions.remove(&id);
            tracing::info!(session_id = %id, "Idle workflow session expired");
        }
        Err(QuoteError::SessionNotFound(id.to_string()))
    }

    /// Drops a session, cancelling whatever it was doing
    pub async fn close_session(&self, id: SessionId) -> Result<(), QuoteError> {
        let handle = self.session(id).await?;
        self.sessions.write().await.remove(&id);
        handle.lock().await.cancel();
        tracing::info!(session_id = %id, "Workflow session closed");
        Ok(())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Removes every session idle for at least the session TTL
    pub async fn evict_idle_sessions(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let evicted = Self::evict_expired(&mut sessions, self.session_ttl);
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Idle workflow sessions evicted");
        }
        evicted
    }

    fn evict_expired(sessions: &mut HashMap<SessionId, SessionEntry>, ttl: Duration) -> usize {
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now, ttl));
        before - sessions.len()
    }

    /// Commits the session's provisional quote, printing it first if asked
    pub async fn commit(&self, id: SessionId, mode: CommitMode) -> Result<Quote, QuoteError> {
        let handle = self.session(id).await?;

        let ticket = handle.lock().await.begin_commit(mode)?;

        if ticket.mode() == CommitMode::PrintAndConfirm {
            let summary = ticket.quote().summary();
            if let Err(err) = self.printer.print(&summary).await {
                tracing::warn!(
                    session_id = %id,
                    reference = %summary.reference,
                    error = %err,
                    "Printing failed, continuing with commit"
                );
            }
        }

        let mut controller = handle.lock().await;
        if !controller.is_live(&ticket) {
            tracing::info!(session_id = %id, "Commit abandoned after cancel");
            return Err(QuoteError::SubmissionDiscarded);
        }

        let result = self.ledger.append(ticket.quote().clone()).await;
        match controller.complete_commit(ticket, result) {
            CommitOutcome::Committed(quote) => Ok(quote),
            CommitOutcome::Discarded => Err(QuoteError::SubmissionDiscarded),
            CommitOutcome::Failed(err) => Err(err),
        }
    }

    /// Every committed quote, most recent first
    pub async fn list_quotes(&self) -> Result<Vec<Quote>, QuoteError> {
        self.ledger
            .list()
            .await
            .map_err(|err| QuoteError::LedgerUnavailable(err.to_string()))
    }

    pub async fn find_quote(&self, id: QuoteId) -> Result<Quote, QuoteError> {
        self.ledger.find_by_id(id).await.map_err(|err| {
            if err.is_not_found() {
                QuoteError::QuoteNotFound(id.to_string())
            } else {
                QuoteError::LedgerUnavailable(err.to_string())
            }
        })
    }

    /// The ledger as CSV, in listing order
    pub async fn export_csv(&self) -> Result<String, QuoteError> {
        let quotes = self.list_quotes().await?;
        export::write_csv(&quotes)
    }

    pub async fn stats(&self) -> Result<LedgerStats, QuoteError> {
        let quotes = self.list_quotes().await?;
        Ok(LedgerStats::from_quotes(&quotes, self.catalog.currency()))
    }

    /// Health of the ledger and printer adapters
    pub async fn health(&self) -> Vec<HealthCheckResult> {
        let (ledger, printer) =
            tokio::join!(self.ledger.health_check(), self.printer.health_check());
        vec![ledger, printer]
    }
}
