use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod delivery;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod kitchen;
pub mod orders;
pub mod params;
pub mod subscriptions;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/kitchens", catalog::kitchens_router())
        .nest("/partners", catalog::partners_router())
        .nest("/auth", auth::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::route())
        .nest("/kitchen", kitchen::router())
        .nest("/delivery", delivery::router())
        .nest("/favorites", favorites::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/admin", admin::router())
}
