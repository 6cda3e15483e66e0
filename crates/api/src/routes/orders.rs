//! Order placement, listing and completion endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{BeverageId, OrderId};
use domain::{CompleteOrder, DrinkSize, Order, OrderStatus, PlaceOrder};
use fulfillment::PlacedOrder;
use serde::{Deserialize, Serialize};
use store::{DispenserStore, OrderQuery};

use super::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(alias = "username")]
    pub customer: Option<String>,
    pub beverage: Option<String>,
    pub drink_size: Option<String>,
}

impl From<PlaceOrderRequest> for PlaceOrder {
    fn from(req: PlaceOrderRequest) -> Self {
        PlaceOrder {
            customer: req.customer,
            beverage: req.beverage,
            drink_size: req.drink_size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub status: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// -- Response types --

#[derive(Serialize)]
pub struct BeverageSummary {
    pub id: BeverageId,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrderResponse {
    pub id: OrderId,
    pub customer: String,
    pub beverage: BeverageSummary,
    pub drink_size: DrinkSize,
    pub status: OrderStatus,
}

#[derive(Serialize)]
pub struct OrderCreatedResponse {
    pub message: String,
    pub order: PlacedOrderResponse,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    pub customer: String,
    pub beverage: BeverageId,
    pub drink_size: DrinkSize,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id(),
            customer: order.customer().to_string(),
            beverage: order.beverage_id(),
            drink_size: order.size(),
            status: order.status(),
            created_at: order.created_at(),
        }
    }
}

#[derive(Serialize)]
pub struct OrderListResponse {
    pub count: usize,
    pub orders: Vec<OrderResponse>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// -- Handlers --

/// POST /orders — place a new order.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: DispenserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), ApiError> {
    let Json(req) = payload?;
    let PlacedOrder { order, beverage, .. } = state.service.place_order(req.into()).await?;

    let response = OrderCreatedResponse {
        message: "New order created".to_string(),
        order: PlacedOrderResponse {
            id: order.id(),
            customer: order.customer().to_string(),
            beverage: BeverageSummary {
                id: beverage.id,
                name: beverage.name,
            },
            drink_size: order.size(),
            status: order.status(),
        },
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /orders — list orders in creation order, optionally by status.
#[tracing::instrument(skip(state))]
pub async fn list<S: DispenserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ListOrdersParams>,
) -> Result<Json<OrderListResponse>, ApiError> {
    let mut query = OrderQuery::new();
    if let Some(status) = params.status {
        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        query = query.status(status);
    }
    if let Some(limit) = params.limit {
        query = query.limit(limit);
    }
    if let Some(offset) = params.offset {
        query = query.offset(offset);
    }

    let orders: Vec<OrderResponse> = state
        .service
        .list_orders(query)
        .await?
        .into_iter()
        .map(OrderResponse::from)
        .collect();

    Ok(Json(OrderListResponse {
        count: orders.len(),
        orders,
    }))
}

/// GET /orders/:id — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: DispenserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.service.get_order(order_id).await?;
    Ok(Json(order.into()))
}

/// PUT /orders/:id/complete — serve the order at the dispenser.
#[tracing::instrument(skip(state))]
pub async fn complete<S: DispenserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;

    state
        .service
        .complete_order(CompleteOrder::new(order_id))
        .await?;

    Ok(Json(MessageResponse {
        message: format!("Order with id {order_id} was completed"),
    }))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    OrderId::parse(id).map_err(|_| ApiError::NotFound(format!("No order found with id {id}")))
}
