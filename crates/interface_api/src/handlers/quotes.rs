//! Quote ledger handlers

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use core_kernel::{CoreError, QuoteId};
use domain_quote::LedgerStats;

use crate::{AppState, error::ApiError};
use crate::dto::quote::*;

/// Lists committed quotes, most recent first
pub async fn list_quotes(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuoteResponse>>, ApiError> {
    let quotes = state.service.list_quotes().await?;
    Ok(Json(quotes.iter().map(QuoteResponse::from).collect()))
}

/// Gets a committed quote by ID
pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuoteDetailResponse>, ApiError> {
    let id: QuoteId = id.parse().map_err(CoreError::from)?;
    let quote = state.service.find_quote(id).await?;
    Ok(Json(QuoteDetailResponse::from(quote)))
}

/// Counts and totals per status
pub async fn quote_stats(State(state): State<AppState>) -> Result<Json<LedgerStats>, ApiError> {
    Ok(Json(state.service.stats().await?))
}

/// Downloads the ledger as CSV
pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let csv = state.service.export_csv().await?;
    tracing::info!(bytes = csv.len(), "Quote ledger exported");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"quotes.csv\""),
        ],
        csv,
    ))
}
