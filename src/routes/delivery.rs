use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{BidQuote, OrderList, PlaceBidRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::delivery_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders/available", get(available_orders))
        .route("/orders/mine", get(my_deliveries))
        .route("/orders/{id}/bids", post(place_bid))
        .route("/orders/{id}/accept", post(accept_order))
        .route("/orders/{id}/pickup", post(pickup_order))
        .route("/orders/{id}/deliver", post(deliver_order))
}

#[utoipa::path(
    get,
    path = "/api/delivery/orders/available",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Orders waiting for a partner", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn available_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = delivery_service::available_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/delivery/orders/mine",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Orders assigned to the caller", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn my_deliveries(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = delivery_service::my_deliveries(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/orders/{id}/bids",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = PlaceBidRequest,
    responses(
        (status = 200, description = "Priced bid with win probability", body = ApiResponse<BidQuote>),
        (status = 400, description = "Order not open for bids"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn place_bid(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlaceBidRequest>,
) -> AppResult<Json<ApiResponse<BidQuote>>> {
    let resp = delivery_service::place_bid(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/orders/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order assigned to the caller", body = ApiResponse<Order>),
        (status = 400, description = "Order not ready"),
        (status = 409, description = "Order already assigned")
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn accept_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = delivery_service::accept_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/orders/{id}/pickup",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order in transit", body = ApiResponse<Order>),
        (status = 400, description = "Order not assigned"),
        (status = 403, description = "Assigned to another partner")
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn pickup_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = delivery_service::pickup_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/orders/{id}/deliver",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order delivered", body = ApiResponse<Order>),
        (status = 400, description = "Order not in transit"),
        (status = 403, description = "Assigned to another partner")
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn deliver_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = delivery_service::deliver_order(&state, &user, id).await?;
    Ok(Json(resp))
}
