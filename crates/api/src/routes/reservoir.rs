//! Reservoir status endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::{DrinkSizeVolume, Volume};
use serde::Serialize;
use store::DispenserStore;

use super::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservoirResponse {
    pub remaining: Volume,
    pub drink_sizes: Vec<DrinkSizeVolume>,
    pub allowed_types: Vec<String>,
}

/// GET /reservoir — current water level, size table and allowed types.
#[tracing::instrument(skip(state))]
pub async fn get<S: DispenserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ReservoirResponse>, ApiError> {
    let settings = state.service.get_reservoir().await?;

    Ok(Json(ReservoirResponse {
        remaining: settings.remaining(),
        drink_sizes: settings.drink_sizes().to_vec(),
        allowed_types: settings.allowed_types().to_vec(),
    }))
}
