use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::catalog::{KitchenList, KitchenMenu, PartnerList},
    error::AppResult,
    models::CloudKitchen,
    response::ApiResponse,
    routes::params::{KitchenQuery, Pagination},
    services::catalog_service,
    state::AppState,
};

pub fn kitchens_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_kitchens))
        .route("/{id}", get(get_kitchen))
        .route("/{id}/menu", get(kitchen_menu))
}

pub fn partners_router() -> Router<AppState> {
    Router::new().route("/", get(list_partners))
}

#[utoipa::path(
    get,
    path = "/api/kitchens",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search name, description or cuisine"),
        ("cuisine" = Option<String>, Query, description = "Exact cuisine, case-insensitive"),
        ("vegetarian" = Option<bool>, Query, description = "Only fully vegetarian kitchens"),
        ("subscription" = Option<bool>, Query, description = "Only kitchens offering meal plans")
    ),
    responses(
        (status = 200, description = "List kitchens", body = ApiResponse<KitchenList>)
    ),
    tag = "Kitchens"
)]
pub async fn list_kitchens(
    State(state): State<AppState>,
    Query(query): Query<KitchenQuery>,
) -> AppResult<Json<ApiResponse<KitchenList>>> {
    let resp = catalog_service::list_kitchens(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/kitchens/{id}",
    params(
        ("id" = String, Path, description = "Kitchen ID")
    ),
    responses(
        (status = 200, description = "Get kitchen", body = ApiResponse<CloudKitchen>),
        (status = 404, description = "Kitchen not found"),
    ),
    tag = "Kitchens"
)]
pub async fn get_kitchen(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CloudKitchen>>> {
    let resp = catalog_service::get_kitchen(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/kitchens/{id}/menu",
    params(
        ("id" = String, Path, description = "Kitchen ID")
    ),
    responses(
        (status = 200, description = "Kitchen menu grouped by category", body = ApiResponse<KitchenMenu>),
        (status = 404, description = "Kitchen not found"),
    ),
    tag = "Kitchens"
)]
pub async fn kitchen_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<KitchenMenu>>> {
    let resp = catalog_service::kitchen_menu(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/partners",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "List delivery partners", body = ApiResponse<PartnerList>)
    ),
    tag = "Kitchens"
)]
pub async fn list_partners(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PartnerList>>> {
    let resp = catalog_service::list_partners(&state, pagination).await?;
    Ok(Json(resp))
}
