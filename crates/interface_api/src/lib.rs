//! HTTP API Layer
//!
//! This crate exposes the quote request workflow over REST using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for products, sessions and the quote ledger
//! - **Middleware**: Request ids, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! A client opens a session, drives it through product selection, form entry
//! and submit, then confirms:
//!
//! ```text
//! POST /api/v1/sessions
//! POST /api/v1/sessions/:id/product   {"product": "Private Motor Insurance"}
//! POST /api/v1/sessions/:id/form
//! PUT  /api/v1/sessions/:id/fields/value   {"value": 600000}
//! POST /api/v1/sessions/:id/submit
//! POST /api/v1/sessions/:id/confirm   {"print": true}
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{build_service, create_router};
//!
//! let service = Arc::new(build_service(&config)?);
//! let app = create_router(service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put, delete},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::cors::{CorsLayer, Any};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::CoreError;
use domain_quote::{HtmlDocumentPrinter, InMemoryQuoteLedger, ProductCatalog, QuoteWorkflowService};

use crate::config::ApiConfig;
use crate::middleware::{audit_middleware, REQUEST_ID_HEADER};
use crate::handlers::{health, products, quotes, sessions};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QuoteWorkflowService>,
    pub config: ApiConfig,
}

/// Wires the standard catalog, in-memory ledger and HTML printer from config
pub fn build_service(config: &ApiConfig) -> Result<QuoteWorkflowService, CoreError> {
    let catalog = ProductCatalog::standard(config.currency()?);
    let ledger = InMemoryQuoteLedger::with_validity(config.quote_validity()?);
    let printer = HtmlDocumentPrinter::new(&config.print_output_dir)
        .map_err(|err| CoreError::configuration(err.to_string()))?;

    Ok(QuoteWorkflowService::new(
        Arc::new(catalog),
        Arc::new(ledger),
        Arc::new(printer),
        config.agent_name.clone(),
    )
    .with_session_ttl(config.session_ttl()?))
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - Quote workflow service shared by all handlers
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(service: Arc<QuoteWorkflowService>, config: ApiConfig) -> Router {
    let state = AppState { service, config };

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Product routes
    let product_routes = Router::new()
        .route("/", get(products::list_products))
        .route("/:key", get(products::get_product));

    // Session routes
    let session_routes = Router::new()
        .route("/", post(sessions::open_session))
        .route("/:id", get(sessions::get_session))
        .route("/:id", delete(sessions::close_session))
        .route("/:id/product", post(sessions::select_product))
        .route("/:id/form", post(sessions::open_form))
        .route("/:id/fields/:name", put(sessions::set_field))
        .route("/:id/terms", put(sessions::set_terms))
        .route("/:id/staging/:name", put(sessions::stage_field))
        .route("/:id/entities", post(sessions::add_entity))
        .route("/:id/entities/:entity_id", delete(sessions::remove_entity))
        .route("/:id/submit", post(sessions::submit))
        .route("/:id/revise", post(sessions::revise))
        .route("/:id/confirm", post(sessions::confirm))
        .route("/:id/cancel", post(sessions::cancel));

    // Quote ledger routes
    let quote_routes = Router::new()
        .route("/", get(quotes::list_quotes))
        .route("/stats", get(quotes::quote_stats))
        .route("/export.csv", get(quotes::export_csv))
        .route("/:id", get(quotes::get_quote));

    let api_routes = Router::new()
        .nest("/products", product_routes)
        .nest("/sessions", session_routes)
        .nest("/quotes", quote_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
