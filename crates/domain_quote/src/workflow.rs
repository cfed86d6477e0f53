//! Quote request workflow controller
//!
//! The controller drives one user's journey from product selection to a
//! committed quote:
//!
//! ```text
//! Idle -> ProductSelected -> FormEntry -> Summary -> (commit) -> Idle
//!                        \-> FormUnavailable        \-> FormEntry (revise / failure)
//! ```
//!
//! `cancel` returns to `Idle` from any state. Committing is split in two so the
//! ledger call can run without holding the controller: [`WorkflowController::begin_commit`]
//! hands out a [`CommitTicket`] and [`WorkflowController::complete_commit`] applies
//! the ledger result. Each draft lives in an epoch; a ticket from an epoch that
//! has since been cancelled is discarded instead of resetting a newer draft.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use core_kernel::{Money, PortError};
use crate::draft::{QuoteDraft, StagingEntity, SubEntity, SubEntityId};
use crate::error::QuoteError;
use crate::product::{CollectionSpec, FieldSet, FormView, ProductCatalog, ProductDefinition, ProductKind};
use crate::quote::{ProvisionalQuote, Quote};
use crate::validation::QuoteValidator;
use crate::value::FieldValue;

/// Where the controller currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Nothing selected
    Idle,
    /// A product is chosen, the form is not open yet
    ProductSelected,
    /// The chosen product is offered but has no quote form
    FormUnavailable,
    /// The draft is being edited
    FormEntry,
    /// The draft passed validation and a provisional quote is shown
    Summary,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Idle => "idle",
            WorkflowState::ProductSelected => "product selected",
            WorkflowState::FormUnavailable => "form unavailable",
            WorkflowState::FormEntry => "form entry",
            WorkflowState::Summary => "summary",
        };
        f.write_str(name)
    }
}

/// How the user asked to commit the provisional quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitMode {
    Confirm,
    /// Print the summary first; a print failure does not stop the commit
    PrintAndConfirm,
}

/// Permission to append one provisional quote to the ledger
#[derive(Debug, Clone)]
pub struct CommitTicket {
    epoch: u64,
    mode: CommitMode,
    quote: ProvisionalQuote,
}

impl CommitTicket {
    pub fn mode(&self) -> CommitMode {
        self.mode
    }

    pub fn quote(&self) -> &ProvisionalQuote {
        &self.quote
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Result of applying a ledger response to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The quote is in the ledger and the workflow is back to `Idle`
    Committed(Quote),
    /// The draft was cancelled while the commit was in flight
    Discarded,
    /// The ledger call failed; the draft is back in form entry
    Failed(QuoteError),
}

/// State machine for one quote request session
#[derive(Debug, Clone)]
pub struct WorkflowController {
    catalog: Arc<ProductCatalog>,
    agent: String,
    state: WorkflowState,
    selected: Option<ProductDefinition>,
    draft: Option<QuoteDraft>,
    staging: StagingEntity,
    provisional: Option<ProvisionalQuote>,
    last_error: Option<QuoteError>,
    submitting: bool,
    epoch: u64,
}

impl WorkflowController {
    /// Creates an idle controller; `agent` is stamped on committed quotes
    pub fn new(catalog: Arc<ProductCatalog>, agent: impl Into<String>) -> Self {
        Self {
            catalog,
            agent: agent.into(),
            state: WorkflowState::Idle,
            selected: None,
            draft: None,
            staging: StagingEntity::new(),
            provisional: None,
            last_error: None,
            submitting: false,
            epoch: 0,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn selected_product(&self) -> Option<&ProductDefinition> {
        self.selected.as_ref()
    }

    pub fn draft(&self) -> Option<&QuoteDraft> {
        self.draft.as_ref()
    }

    pub fn staging(&self) -> &StagingEntity {
        &self.staging
    }

    pub fn provisional(&self) -> Option<&ProvisionalQuote> {
        self.provisional.as_ref()
    }

    /// The most recent recoverable error, cleared by the next successful edit
    pub fn last_error(&self) -> Option<&QuoteError> {
        self.last_error.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Chooses the product to quote
    pub fn select_product(&mut self, key: &str) -> Result<&ProductDefinition, QuoteError> {
        if !matches!(
            self.state,
            WorkflowState::Idle | WorkflowState::ProductSelected | WorkflowState::FormUnavailable
        ) {
            return Err(QuoteError::invalid_state(self.state, "select a product"));
        }

        let definition = self.catalog.lookup(key)?.clone();
        tracing::info!(product = %definition.key, "Product selected");

        self.state = WorkflowState::ProductSelected;
        self.last_error = None;
        Ok(self.selected.insert(definition))
    }

    /// Opens the form for the selected product with a fresh draft
    ///
    /// A product without a form moves to `FormUnavailable` rather than failing.
    pub fn open_form(&mut self) -> Result<WorkflowState, QuoteError> {
        if self.state != WorkflowState::ProductSelected {
            return Err(QuoteError::invalid_state(self.state, "open the form"));
        }
        let definition = self
            .selected
            .as_ref()
            .ok_or_else(|| QuoteError::invalid_state(self.state, "open the form"))?;

        match definition.field_set {
            Some(kind) => {
                self.draft = Some(QuoteDraft::new(
                    definition.key.clone(),
                    kind,
                    self.catalog.currency(),
                ));
                self.staging.clear();
                self.state = WorkflowState::FormEntry;
                tracing::debug!(product = %definition.key, "Quote form opened");
            }
            None => {
                tracing::info!(product = %definition.key, "No quote form available");
                self.last_error = Some(QuoteError::NoFormAvailable(definition.key.clone()));
                self.state = WorkflowState::FormUnavailable;
            }
        }
        Ok(self.state)
    }

    /// Stores a flat field value; values are only validated on submit
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), QuoteError> {
        let kind = self.editable_kind("change a field")?;
        if kind.field(name).is_none() {
            return Err(QuoteError::UnknownField(name.to_string()));
        }

        self.draft_mut()?.set_field(name, value);
        self.last_error = None;
        Ok(())
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) -> Result<(), QuoteError> {
        self.editable_kind("change the terms")?;
        self.draft_mut()?.set_terms_accepted(accepted);
        self.last_error = None;
        Ok(())
    }

    /// Sets one field of the staging sub-form
    pub fn stage_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), QuoteError> {
        let spec = self.editable_collection("stage an entry")?;
        if spec.field(name).is_none() {
            return Err(QuoteError::UnknownField(name.to_string()));
        }
        self.staging.set(name, value);
        Ok(())
    }

    /// Moves the staged candidate into the collection and clears staging
    ///
    /// A rejected candidate leaves both the collection and staging untouched.
    pub fn add_staged_entity(&mut self) -> Result<SubEntityId, QuoteError> {
        let spec = self.editable_collection("add an entry")?;
        let staging = self.staging.clone();

        match self.draft_mut()?.add_entity(spec, &staging) {
            Ok(id) => {
                self.staging.clear();
                self.last_error = None;
                tracing::debug!(collection = spec.name, entity = %id, "Entity added");
                Ok(id)
            }
            Err(err) => {
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn remove_entity(&mut self, id: SubEntityId) -> Result<SubEntity, QuoteError> {
        let spec = self.editable_collection("remove an entry")?;
        let removed = self.draft_mut()?.remove_entity(spec.name, id)?;
        tracing::debug!(collection = spec.name, entity = %id, "Entity removed");
        Ok(removed)
    }

    /// Aggregate of the collection, derived from the current entities
    pub fn aggregate(&self) -> Option<Money> {
        let draft = self.draft.as_ref()?;
        let spec = draft.kind().collection()?;
        draft.aggregate(spec)
    }

    /// Renders the form for the open draft
    pub fn render(&self) -> Option<FormView> {
        self.draft
            .as_ref()
            .map(|draft| draft.kind().render(draft, &self.staging, self.submitting))
    }

    /// Validates the draft and, on success, moves to `Summary`
    ///
    /// On failure the error is recorded and the workflow stays in form entry
    /// with the draft unchanged.
    pub fn submit(&mut self) -> Result<ProvisionalQuote, QuoteError> {
        if self.submitting {
            return Err(QuoteError::SubmissionInFlight);
        }
        if self.state != WorkflowState::FormEntry {
            return Err(QuoteError::invalid_state(self.state, "submit"));
        }
        let (Some(definition), Some(draft)) = (self.selected.as_ref(), self.draft.as_mut()) else {
            return Err(QuoteError::invalid_state(self.state, "submit"));
        };

        if let Err(err) = QuoteValidator::validate(draft, definition) {
            tracing::info!(product = %definition.key, error = %err, "Quote draft rejected");
            self.last_error = Some(err.clone());
            return Err(err);
        }

        let amount = match draft.kind().estimate(draft) {
            Ok(amount) => amount,
            Err(err) => {
                tracing::warn!(product = %definition.key, error = %err, "Premium estimate failed");
                self.last_error = Some(err.clone());
                return Err(err);
            }
        };
        draft.mark_validated();
        let provisional = ProvisionalQuote::new(draft.clone(), amount, self.agent.clone());
        tracing::info!(
            product = %provisional.product,
            amount = %provisional.amount,
            reference = %provisional.reference,
            "Quote draft validated"
        );

        self.last_error = None;
        self.state = WorkflowState::Summary;
        self.provisional = Some(provisional.clone());
        Ok(provisional)
    }

    /// Returns from the summary to the form to edit the draft
    pub fn revise(&mut self) -> Result<(), QuoteError> {
        if self.submitting {
            return Err(QuoteError::SubmissionInFlight);
        }
        if self.state != WorkflowState::Summary {
            return Err(QuoteError::invalid_state(self.state, "revise"));
        }
        self.provisional = None;
        self.state = WorkflowState::FormEntry;
        Ok(())
    }

    /// Starts committing the provisional quote
    ///
    /// Only one commit can be in flight; a second request is rejected until the
    /// first completes.
    pub fn begin_commit(&mut self, mode: CommitMode) -> Result<CommitTicket, QuoteError> {
        if self.submitting {
            return Err(QuoteError::SubmissionInFlight);
        }
        if self.state != WorkflowState::Summary {
            return Err(QuoteError::invalid_state(self.state, "confirm"));
        }
        let quote = self
            .provisional
            .clone()
            .ok_or_else(|| QuoteError::invalid_state(self.state, "confirm"))?;

        self.submitting = true;
        Ok(CommitTicket {
            epoch: self.epoch,
            mode,
            quote,
        })
    }

    /// Whether a ticket still belongs to the current, uncancelled draft
    pub fn is_live(&self, ticket: &CommitTicket) -> bool {
        ticket.epoch == self.epoch && self.submitting && self.state == WorkflowState::Summary
    }

    /// Applies the ledger's answer for a ticket
    pub fn complete_commit(
        &mut self,
        ticket: CommitTicket,
        result: Result<Quote, PortError>,
    ) -> CommitOutcome {
        if !self.is_live(&ticket) {
            tracing::warn!(
                reference = %ticket.quote.reference,
                "Commit result arrived for a cancelled draft"
            );
            return CommitOutcome::Discarded;
        }

        match result {
            Ok(quote) => {
                tracing::info!(quote_id = %quote.id, "Quote committed");
                self.reset();
                CommitOutcome::Committed(quote)
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    retryable = err.is_retryable(),
                    "Quote submission failed"
                );
                let err = QuoteError::SubmissionTransportFailure(err.to_string());
                self.submitting = false;
                self.provisional = None;
                self.state = WorkflowState::FormEntry;
                self.last_error = Some(err.clone());
                CommitOutcome::Failed(err)
            }
        }
    }

    /// Abandons the current request from any state
    pub fn cancel(&mut self) {
        if self.state != WorkflowState::Idle {
            tracing::info!(state = %self.state, "Quote request cancelled");
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.state = WorkflowState::Idle;
        self.selected = None;
        self.draft = None;
        self.staging.clear();
        self.provisional = None;
        self.last_error = None;
        self.submitting = false;
        self.epoch += 1;
    }

    fn editable_kind(&self, action: &str) -> Result<ProductKind, QuoteError> {
        if self.state != WorkflowState::FormEntry {
            return Err(QuoteError::invalid_state(self.state, action));
        }
        self.draft
            .as_ref()
            .map(QuoteDraft::kind)
            .ok_or_else(|| QuoteError::invalid_state(self.state, action))
    }

    fn editable_collection(&self, action: &str) -> Result<&'static CollectionSpec, QuoteError> {
        let kind = self.editable_kind(action)?;
        kind.collection().ok_or_else(|| {
            let product = self.draft.as_ref().map_or("", |draft| draft.product_key());
            QuoteError::NoCollection(product.to_string())
        })
    }

    fn draft_mut(&mut self) -> Result<&mut QuoteDraft, QuoteError> {
        let state = self.state;
        self.draft
            .as_mut()
            .ok_or_else(|| QuoteError::invalid_state(state, "edit the draft"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use core_kernel::{Currency, QuoteId};
    use rust_decimal_macros::dec;

    fn controller() -> WorkflowController {
        WorkflowController::new(Arc::new(ProductCatalog::standard(Currency::KES)), "Web Portal")
    }

    fn private_motor_form(value: &str) -> WorkflowController {
        let mut controller = controller();
        controller.select_product("Private Motor Insurance").unwrap();
        controller.open_form().unwrap();
        for (name, input) in [
            ("name", "Jane"),
            ("phone", "0712345678"),
            ("email", "jane@x.com"),
            ("make", "Toyota"),
            ("model", "Toyota Model 1"),
            ("year", "2020"),
            ("value", value),
        ] {
            controller.set_field(name, input.into()).unwrap();
        }
        controller
    }

    fn ledger_answer(ticket: &CommitTicket) -> Result<Quote, PortError> {
        Ok(Quote::from_provisional(
            QuoteId::from_sequence(1),
            ticket.quote().clone(),
            Utc::now(),
            Duration::days(30),
        ))
    }

    #[test]
    fn test_unknown_product_keeps_state() {
        let mut controller = controller();
        let err = controller.select_product("Pet Insurance").unwrap_err();
        assert!(matches!(err, QuoteError::ProductNotFound(_)));
        assert_eq!(controller.state(), WorkflowState::Idle);
    }

    #[test]
    fn test_product_without_form() {
        let mut controller = controller();
        controller.select_product("Domestic Package").unwrap();
        assert_eq!(controller.open_form().unwrap(), WorkflowState::FormUnavailable);
        assert!(controller.draft().is_none());
        assert!(matches!(controller.last_error(), Some(QuoteError::NoFormAvailable(_))));

        controller.select_product("Private Motor Insurance").unwrap();
        assert_eq!(controller.open_form().unwrap(), WorkflowState::FormEntry);
    }

    #[test]
    fn test_submit_moves_to_summary() {
        let mut controller = private_motor_form("600000");
        let provisional = controller.submit().unwrap();
        assert_eq!(provisional.amount.amount(), dec!(30000));
        assert_eq!(controller.state(), WorkflowState::Summary);
    }

    #[test]
    fn test_failed_submit_stays_in_form_entry() {
        let mut controller = private_motor_form("100000");
        let before = controller.draft().cloned();

        let err = controller.submit().unwrap_err();
        assert!(matches!(err, QuoteError::BelowMinimumValue { .. }));
        assert_eq!(controller.state(), WorkflowState::FormEntry);
        assert_eq!(controller.last_error(), Some(&err));
        assert_eq!(controller.draft().cloned(), before);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut controller = private_motor_form("600000");
        let err = controller.set_field("colour", "red".into()).unwrap_err();
        assert_eq!(err, QuoteError::UnknownField("colour".to_string()));
    }

    #[test]
    fn test_staging_without_collection() {
        let mut controller = private_motor_form("600000");
        let err = controller.stage_field("registration", "KAA 001A").unwrap_err();
        assert!(matches!(err, QuoteError::NoCollection(_)));
    }

    #[test]
    fn test_confirm_requires_summary() {
        let mut controller = private_motor_form("600000");
        let err = controller.begin_commit(CommitMode::Confirm).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_second_commit_is_rejected_while_in_flight() {
        let mut controller = private_motor_form("600000");
        controller.submit().unwrap();
        let ticket = controller.begin_commit(CommitMode::Confirm).unwrap();
        assert_eq!(
            controller.begin_commit(CommitMode::Confirm).unwrap_err(),
            QuoteError::SubmissionInFlight
        );

        let answer = ledger_answer(&ticket);
        let outcome = controller.complete_commit(ticket, answer);
        assert!(matches!(outcome, CommitOutcome::Committed(_)));
        assert_eq!(controller.state(), WorkflowState::Idle);
        assert!(controller.draft().is_none());
        assert!(controller.begin_commit(CommitMode::Confirm).is_err());
    }

    #[test]
    fn test_cancel_discards_in_flight_commit() {
        let mut controller = private_motor_form("600000");
        controller.submit().unwrap();
        let ticket = controller.begin_commit(CommitMode::PrintAndConfirm).unwrap();

        controller.cancel();
        assert!(!controller.is_live(&ticket));
        controller.select_product("Sports Cover").unwrap();

        let answer = ledger_answer(&ticket);
        assert_eq!(controller.complete_commit(ticket, answer), CommitOutcome::Discarded);
        assert_eq!(controller.state(), WorkflowState::ProductSelected);
    }

    #[test]
    fn test_transport_failure_preserves_draft() {
        let mut controller = private_motor_form("600000");
        controller.submit().unwrap();
        let ticket = controller.begin_commit(CommitMode::Confirm).unwrap();

        let outcome = controller.complete_commit(ticket, Err(PortError::unavailable("quote-ledger", "offline")));
        assert!(matches!(
            outcome,
            CommitOutcome::Failed(QuoteError::SubmissionTransportFailure(_))
        ));
        assert_eq!(controller.state(), WorkflowState::FormEntry);
        assert!(!controller.is_submitting());
        assert_eq!(controller.draft().unwrap().client_name(), "Jane");

        controller.submit().unwrap();
        assert_eq!(controller.state(), WorkflowState::Summary);
    }

    #[test]
    fn test_revise_returns_to_form() {
        let mut controller = private_motor_form("600000");
        controller.submit().unwrap();
        controller.revise().unwrap();
        assert_eq!(controller.state(), WorkflowState::FormEntry);
        assert!(controller.provisional().is_none());
    }
}
