use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{KitchenBoard, KitchenStats},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    services::kitchen_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{kitchen_id}/orders", get(kitchen_board))
        .route("/{kitchen_id}/orders/{id}/advance", post(advance_order))
        .route("/{kitchen_id}/stats", get(kitchen_stats))
}

#[utoipa::path(
    get,
    path = "/api/kitchen/{kitchen_id}/orders",
    params(
        ("kitchen_id" = String, Path, description = "Kitchen ID")
    ),
    responses(
        (status = 200, description = "Active orders grouped by stage", body = ApiResponse<KitchenBoard>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Kitchen not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Kitchen"
)]
pub async fn kitchen_board(
    State(state): State<AppState>,
    user: AuthUser,
    Path(kitchen_id): Path<String>,
) -> AppResult<Json<ApiResponse<KitchenBoard>>> {
    let resp = kitchen_service::kitchen_board(&state, &user, &kitchen_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/kitchen/{kitchen_id}/orders/{id}/advance",
    params(
        ("kitchen_id" = String, Path, description = "Kitchen ID"),
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order moved to the next kitchen stage", body = ApiResponse<Order>),
        (status = 400, description = "Order has left the kitchen"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Order changed concurrently")
    ),
    security(("bearer_auth" = [])),
    tag = "Kitchen"
)]
pub async fn advance_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path((kitchen_id, id)): Path<(String, Uuid)>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = kitchen_service::advance_order(&state, &user, &kitchen_id, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/kitchen/{kitchen_id}/stats",
    params(
        ("kitchen_id" = String, Path, description = "Kitchen ID")
    ),
    responses(
        (status = 200, description = "Order counts and revenue", body = ApiResponse<KitchenStats>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Kitchen"
)]
pub async fn kitchen_stats(
    State(state): State<AppState>,
    user: AuthUser,
    Path(kitchen_id): Path<String>,
) -> AppResult<Json<ApiResponse<KitchenStats>>> {
    let resp = kitchen_service::kitchen_stats(&state, &user, &kitchen_id).await?;
    Ok(Json(resp))
}
