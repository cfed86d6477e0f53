//! Quote Request Workflow Domain
//!
//! This crate implements the multi-product quote request workflow: product
//! selection, a product-specific dynamic form, a computed quote summary and
//! confirmation into an append-only quote ledger.
//!
//! # Architecture
//!
//! - **Catalog**: read-only product definitions, some without a form
//! - **Field sets**: one [`ProductKind`] variant per product form, used only
//!   through the [`FieldSet`] trait
//! - **Draft**: flat fields plus one repeatable collection with a staging sub-form
//! - **Validation & rating**: ordered submit-time rules and premium estimation
//! - **Workflow**: the per-session state machine
//! - **Ports**: [`QuoteLedger`] and [`QuotePrinter`], with in-memory and HTML
//!   document adapters
//!
//! # Workflow
//!
//! ```text
//! Idle -> ProductSelected -> FormEntry -> Summary -> Committed (-> Idle)
//!                        \-> FormUnavailable
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_quote::{CommitMode, QuoteWorkflowService};
//!
//! let (session, handle) = service.open_session().await;
//! {
//!     let mut controller = handle.lock().await;
//!     controller.select_product("Private Motor Insurance")?;
//!     controller.open_form()?;
//!     controller.set_field("value", "600000".into())?;
//!     // ... remaining fields
//!     controller.submit()?;
//! }
//! let quote = service.commit(session, CommitMode::Confirm).await?;
//! ```

pub mod adapters;
pub mod draft;
pub mod error;
pub mod export;
pub mod ports;
pub mod premium;
pub mod product;
pub mod quote;
pub mod service;
pub mod validation;
pub mod value;
pub mod workflow;

pub use adapters::{HtmlDocumentPrinter, InMemoryQuoteLedger};
pub use draft::{QuoteDraft, StagingEntity, SubEntity, SubEntityId};
pub use error::QuoteError;
pub use export::{read_csv, write_csv, ExportRow, CSV_HEADERS};
pub use ports::{QuoteLedger, QuotePrinter};
pub use premium::RatingBasis;
pub use product::{
    CollectionSpec, FieldKind, FieldSet, FieldSpec, FormView, ProductCatalog, ProductDefinition,
    ProductKind,
};
pub use quote::{LedgerStats, ProvisionalQuote, Quote, QuoteStatus, QuoteSummary, SubmissionReceipt};
pub use service::{QuoteWorkflowService, SessionHandle, DEFAULT_SESSION_TTL_MINUTES};
pub use validation::QuoteValidator;
pub use value::FieldValue;
pub use workflow::{CommitMode, CommitOutcome, CommitTicket, WorkflowController, WorkflowState};
