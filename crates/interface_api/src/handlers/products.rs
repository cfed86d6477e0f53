//! Product catalog handlers

use axum::{extract::{Path, State}, Json};

use crate::{AppState, error::ApiError};
use crate::dto::product::*;

/// Lists the offered products in display order
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<ProductResponse>> {
    let products = state
        .service
        .catalog()
        .list()
        .iter()
        .map(ProductResponse::from)
        .collect();
    Json(products)
}

/// Gets a product with its form schema
pub async fn get_product(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ProductDetailResponse>, ApiError> {
    let product = state.service.catalog().lookup(&key)?;
    Ok(Json(ProductDetailResponse::from(product)))
}
