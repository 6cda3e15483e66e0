//! Beverage catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::BeverageId;
use domain::{Beverage, BeveragePatch, NewBeverage};
use serde::{Deserialize, Serialize};
use store::DispenserStore;

use super::AppState;
use super::orders::MessageResponse;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct BeverageRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub beverage_type: Option<String>,
    pub temperature: Option<f64>,
    pub garnish: Option<String>,
}

impl From<BeverageRequest> for NewBeverage {
    fn from(req: BeverageRequest) -> Self {
        NewBeverage {
            name: req.name,
            beverage_type: req.beverage_type,
            temperature: req.temperature,
            garnish: req.garnish,
        }
    }
}

impl From<BeverageRequest> for BeveragePatch {
    fn from(req: BeverageRequest) -> Self {
        BeveragePatch {
            name: req.name,
            beverage_type: req.beverage_type,
            temperature: req.temperature,
            garnish: req.garnish,
        }
    }
}

#[derive(Serialize)]
pub struct BeverageResponse {
    pub id: BeverageId,
    pub name: String,
    #[serde(rename = "type")]
    pub beverage_type: String,
    pub temperature: f64,
    pub garnish: Option<String>,
}

impl From<Beverage> for BeverageResponse {
    fn from(b: Beverage) -> Self {
        Self {
            id: b.id,
            name: b.name,
            beverage_type: b.beverage_type,
            temperature: b.temperature,
            garnish: b.garnish,
        }
    }
}

#[derive(Serialize)]
pub struct BeverageSavedResponse {
    pub message: String,
    pub beverage: BeverageResponse,
}

#[derive(Serialize)]
pub struct BeverageListResponse {
    pub count: usize,
    pub beverages: Vec<BeverageResponse>,
}

/// POST /beverages — add a beverage to the catalog.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: DispenserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<BeverageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BeverageSavedResponse>), ApiError> {
    let Json(req) = payload?;
    let beverage = state.service.create_beverage(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(BeverageSavedResponse {
            message: "New beverage created".to_string(),
            beverage: beverage.into(),
        }),
    ))
}

/// GET /beverages — list the catalog.
#[tracing::instrument(skip(state))]
pub async fn list<S: DispenserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<BeverageListResponse>, ApiError> {
    let beverages: Vec<BeverageResponse> = state
        .service
        .list_beverages()
        .await?
        .into_iter()
        .map(BeverageResponse::from)
        .collect();

    Ok(Json(BeverageListResponse {
        count: beverages.len(),
        beverages,
    }))
}

/// GET /beverages/:id
#[tracing::instrument(skip(state))]
pub async fn get<S: DispenserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<BeverageResponse>, ApiError> {
    let beverage_id = parse_beverage_id(&id)?;
    let beverage = state.service.get_beverage(beverage_id).await?;
    Ok(Json(beverage.into()))
}

/// PUT /beverages/:id — partial update; absent fields are kept.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: DispenserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<BeverageRequest>, JsonRejection>,
) -> Result<Json<BeverageSavedResponse>, ApiError> {
    let beverage_id = parse_beverage_id(&id)?;
    let Json(req) = payload?;
    let beverage = state
        .service
        .update_beverage(beverage_id, req.into())
        .await?;

    Ok(Json(BeverageSavedResponse {
        message: format!("Beverage with id {beverage_id} was updated"),
        beverage: beverage.into(),
    }))
}

/// DELETE /beverages/:id
#[tracing::instrument(skip(state))]
pub async fn delete<S: DispenserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let beverage_id = parse_beverage_id(&id)?;
    state.service.delete_beverage(beverage_id).await?;

    Ok(Json(MessageResponse {
        message: format!("Beverage with id {beverage_id} was removed"),
    }))
}

fn parse_beverage_id(id: &str) -> Result<BeverageId, ApiError> {
    BeverageId::parse(id)
        .map_err(|_| ApiError::NotFound("No beverage found with that id".to_string()))
}
