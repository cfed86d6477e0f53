//! HTML document printer
//!
//! Writes each printed quote as a standalone HTML page named after its
//! reference, e.g. `QT-00001.html`, into an output directory. The page is a
//! Tera template embedded at build time; values are autoescaped.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tera::{Context, Tera};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use crate::ports::QuotePrinter;
use crate::quote::QuoteSummary;

const QUOTE_TEMPLATE: &str = "quote.html";

/// [`QuotePrinter`] that renders quotes to HTML files
#[derive(Debug, Clone)]
pub struct HtmlDocumentPrinter {
    output_dir: PathBuf,
    templates: Arc<Tera>,
}

impl HtmlDocumentPrinter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, PortError> {
        let mut tera = Tera::default();
        tera.add_raw_template(QUOTE_TEMPLATE, include_str!("../../templates/quote.html"))
            .map_err(|err| PortError::internal(format!("invalid quote template: {err}")))?;

        Ok(Self {
            output_dir: output_dir.into(),
            templates: Arc::new(tera),
        })
    }

    /// Renders the printable quote document
    pub fn render_html(&self, summary: &QuoteSummary) -> Result<String, PortError> {
        let mut context = Context::new();
        context.insert("reference", &summary.reference);
        context.insert("client_name", &summary.client_name);
        context.insert("product", &summary.product);
        context.insert("amount", &summary.amount.to_string());
        context.insert("status", &summary.status.to_string());

        self.templates
            .render(QUOTE_TEMPLATE, &context)
            .map_err(|err| PortError::internal(format!("cannot render quote document: {err}")))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the document for `reference` is written to
    pub fn document_path(&self, reference: &str) -> PathBuf {
        let file_name: String = reference
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.output_dir.join(format!("{file_name}.html"))
    }
}

impl DomainPort for HtmlDocumentPrinter {}

#[async_trait]
impl HealthCheckable for HtmlDocumentPrinter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        match tokio::fs::metadata(&self.output_dir).await {
            Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => {
                HealthCheckResult::healthy("html-document-printer", start.elapsed().as_millis() as u64)
            }
            Ok(_) => HealthCheckResult::unhealthy(
                "html-document-printer",
                format!("{} is not a writable directory", self.output_dir.display()),
            ),
            // Created on first print
            Err(_) => HealthCheckResult::degraded(
                "html-document-printer",
                format!("{} does not exist yet", self.output_dir.display()),
            ),
        }
    }
}

#[async_trait]
impl QuotePrinter for HtmlDocumentPrinter {
    async fn print(&self, summary: &QuoteSummary) -> Result<(), PortError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|err| PortError::io("cannot create print directory", err))?;

        let html = self.render_html(summary)?;
        let path = self.document_path(&summary.reference);
        tokio::fs::write(&path, html)
            .await
            .map_err(|err| PortError::io("cannot write quote document", err))?;

        tracing::debug!(reference = %summary.reference, path = %path.display(), "Quote document written");
        Ok(())
    }
}
