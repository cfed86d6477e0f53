//! Workflow session handlers
//!
//! Each handler locks the session's controller for the duration of one action,
//! so requests against a session are applied one at a time.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use core_kernel::SessionId;
use domain_quote::{CommitMode, SessionHandle, SubEntityId};

use crate::{AppState, error::ApiError};
use crate::dto::quote::ReceiptResponse;
use crate::dto::session::*;

async fn find_session(state: &AppState, raw: &str) -> Result<(SessionId, SessionHandle), ApiError> {
    let id: SessionId = raw.parse()?;
    let handle = state.service.session(id).await?;
    Ok((id, handle))
}

/// Opens a new workflow session
pub async fn open_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let (id, handle) = state.service.open_session().await;
    let controller = handle.lock().await;
    (
        StatusCode::CREATED,
        Json(SessionResponse::from_controller(id, &controller)),
    )
}

/// Gets the current state of a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (id, handle) = find_session(&state, &id).await?;
    let controller = handle.lock().await;
    Ok(Json(SessionResponse::from_controller(id, &controller)))
}

/// Closes a session, discarding any draft
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let (id, _) = find_session(&state, &id).await?;
    state.service.close_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Selects the product to quote
pub async fn select_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SelectProductRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    request.validate()?;

    let (id, handle) = find_session(&state, &id).await?;
    let mut controller = handle.lock().await;
    controller.select_product(&request.product)?;
    Ok(Json(SessionResponse::from_controller(id, &controller)))
}

/// Opens the quote form for the selected product
pub async fn open_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (id, handle) = find_session(&state, &id).await?;
    let mut controller = handle.lock().await;
    controller.open_form()?;
    Ok(Json(SessionResponse::from_controller(id, &controller)))
}

/// Sets a flat draft field
pub async fn set_field(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    Json(request): Json<FieldRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    request.validate()?;

    let (id, handle) = find_session(&state, &id).await?;
    let mut controller = handle.lock().await;
    controller.set_field(&name, request.value.into())?;
    Ok(Json(SessionResponse::from_controller(id, &controller)))
}

/// Sets the terms acknowledgment
pub async fn set_terms(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<TermsRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (id, handle) = find_session(&state, &id).await?;
    let mut controller = handle.lock().await;
    controller.set_terms_accepted(request.accepted)?;
    Ok(Json(SessionResponse::from_controller(id, &controller)))
}

/// Sets a field of the staging sub-form
pub async fn stage_field(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    Json(request): Json<FieldRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    request.validate()?;

    let (id, handle) = find_session(&state, &id).await?;
    let mut controller = handle.lock().await;
    controller.stage_field(&name, request.value.into_text())?;
    Ok(Json(SessionResponse::from_controller(id, &controller)))
}

/// Adds the staged entry to the collection
pub async fn add_entity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<EntityAddedResponse>), ApiError> {
    let (_, handle) = find_session(&state, &id).await?;
    let mut controller = handle.lock().await;
    let entity_id = controller.add_staged_entity()?;
    Ok((
        StatusCode::CREATED,
        Json(EntityAddedResponse {
            entity_id,
            aggregate: controller.aggregate(),
        }),
    ))
}

/// Removes an entry from the collection
pub async fn remove_entity(
    State(state): State<AppState>,
    Path((id, entity_id)): Path<(String, u32)>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (id, handle) = find_session(&state, &id).await?;
    let mut controller = handle.lock().await;
    controller.remove_entity(SubEntityId::new(entity_id))?;
    Ok(Json(SessionResponse::from_controller(id, &controller)))
}

/// Validates the draft and shows the provisional quote
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (id, handle) = find_session(&state, &id).await?;
    let mut controller = handle.lock().await;
    controller.submit()?;
    Ok(Json(SessionResponse::from_controller(id, &controller)))
}

/// Returns from the summary to the form
pub async fn revise(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (id, handle) = find_session(&state, &id).await?;
    let mut controller = handle.lock().await;
    controller.revise()?;
    Ok(Json(SessionResponse::from_controller(id, &controller)))
}

/// Commits the provisional quote, printing it first when asked
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Option<Json<ConfirmRequest>>,
) -> Result<(StatusCode, Json<ReceiptResponse>), ApiError> {
    let (id, _) = find_session(&state, &id).await?;
    let Json(request) = request.unwrap_or_default();
    let mode = if request.print {
        CommitMode::PrintAndConfirm
    } else {
        CommitMode::Confirm
    };

    let quote = state.service.commit(id, mode).await?;
    Ok((StatusCode::CREATED, Json(ReceiptResponse::from(quote.receipt()))))
}

/// Abandons the current request
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (id, handle) = find_session(&state, &id).await?;
    let mut controller = handle.lock().await;
    controller.cancel();
    Ok(Json(SessionResponse::from_controller(id, &controller)))
}
