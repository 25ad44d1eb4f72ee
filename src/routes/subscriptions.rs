use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    domain::subscription::{Subscription, SubscriptionQuote},
    dto::subscriptions::{SubscriptionList, SubscriptionRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::Pagination,
    services::subscription_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subscriptions).post(create_subscription))
        .route("/quote", post(quote_subscription))
        .route("/{id}/cancel", post(cancel_subscription))
}

#[utoipa::path(
    post,
    path = "/api/subscriptions/quote",
    request_body = SubscriptionRequest,
    responses(
        (status = 200, description = "Dates, delivery count and price for a meal plan", body = ApiResponse<SubscriptionQuote>),
        (status = 400, description = "Invalid selection or kitchen without subscriptions")
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn quote_subscription(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SubscriptionRequest>,
) -> AppResult<Json<ApiResponse<SubscriptionQuote>>> {
    let resp = subscription_service::quote_subscription(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/subscriptions",
    request_body = SubscriptionRequest,
    responses(
        (status = 200, description = "Subscription created", body = ApiResponse<Subscription>),
        (status = 400, description = "Invalid selection or missing address")
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn create_subscription(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SubscriptionRequest>,
) -> AppResult<Json<ApiResponse<Subscription>>> {
    let resp = subscription_service::create_subscription(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/subscriptions",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Own subscriptions, newest first", body = ApiResponse<SubscriptionList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<SubscriptionList>>> {
    let resp = subscription_service::list_subscriptions(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/subscriptions/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Subscription ID")
    ),
    responses(
        (status = 200, description = "Subscription cancelled", body = ApiResponse<Subscription>),
        (status = 400, description = "Already cancelled"),
        (status = 404, description = "Subscription not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn cancel_subscription(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Subscription>>> {
    let resp = subscription_service::cancel_subscription(&state, &user, id).await?;
    Ok(Json(resp))
}
