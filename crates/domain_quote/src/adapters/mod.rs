//! Adapters for the quote domain ports
//!
//! - **InMemoryQuoteLedger**: process-local ledger with atomic id assignment
//! - **HtmlDocumentPrinter**: writes printable quote documents to disk
//!
//! ```rust,ignore
//! use domain_quote::adapters::{HtmlDocumentPrinter, InMemoryQuoteLedger};
//! use domain_quote::ports::{QuoteLedger, QuotePrinter};
//! use std::sync::Arc;
//!
//! let ledger: Arc<dyn QuoteLedger> = Arc::new(InMemoryQuoteLedger::new());
//! let printer: Arc<dyn QuotePrinter> = Arc::new(HtmlDocumentPrinter::new("printed")?);
//! ```

pub mod document;
pub mod memory;

pub use document::HtmlDocumentPrinter;
pub use memory::InMemoryQuoteLedger;
