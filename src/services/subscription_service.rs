use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::subscription::{self, Subscription, SubscriptionQuote, SubscriptionStatus},
    dto::subscriptions::{SubscriptionList, SubscriptionRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta, paginate},
    routes::params::Pagination,
    services::order_service::validate_address,
    state::AppState,
};

fn price_plan(state: &AppState, payload: &SubscriptionRequest) -> AppResult<SubscriptionQuote> {
    let kitchen = state
        .catalog
        .kitchen(&payload.kitchen_id)
        .ok_or_else(|| AppError::BadRequest("Kitchen not found".into()))?;
    let quote = subscription::quote(payload.meal_plan(), kitchen, Utc::now().date_naive())?;
    Ok(quote)
}

pub async fn quote_subscription(
    state: &AppState,
    _user: &AuthUser,
    payload: SubscriptionRequest,
) -> AppResult<ApiResponse<SubscriptionQuote>> {
    let quote = price_plan(state, &payload)?;
    Ok(ApiResponse::success("OK", quote, Some(Meta::empty())))
}

pub async fn create_subscription(
    state: &AppState,
    user: &AuthUser,
    payload: SubscriptionRequest,
) -> AppResult<ApiResponse<Subscription>> {
    let quote = price_plan(state, &payload)?;
    let address = payload
        .delivery_address
        .ok_or_else(|| AppError::BadRequest("Delivery address is required".into()))?;
    validate_address(&address)?;

    let now = Utc::now();
    let created = Subscription {
        id: Uuid::new_v4(),
        customer_id: user.user_id,
        quote,
        delivery_address: address,
        status: SubscriptionStatus::Active,
        created_at: now,
        updated_at: now,
    };
    state.store.subscriptions.write().await.push(created.clone());

    tracing::info!(
        subscription_id = %created.id,
        kitchen_id = %created.quote.kitchen_id,
        deliveries = created.quote.total_deliveries,
        "subscription started"
    );

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "subscription_create",
        Some("subscriptions"),
        Some(serde_json::json!({
            "subscription_id": created.id,
            "estimated_price": created.quote.estimated_price,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Subscription created",
        created,
        Some(Meta::empty()),
    ))
}

pub async fn list_subscriptions(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<SubscriptionList>> {
    let (page, limit, offset) = pagination.normalize();
    let mut own: Vec<Subscription> = state
        .store
        .subscriptions
        .read()
        .await
        .iter()
        .filter(|s| s.customer_id == user.user_id)
        .cloned()
        .collect();
    own.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let (items, meta) = paginate(own, page, limit, offset);
    Ok(ApiResponse::success("OK", SubscriptionList { items }, Some(meta)))
}

pub async fn cancel_subscription(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Subscription>> {
    let cancelled = {
        let mut subscriptions = state.store.subscriptions.write().await;
        let found = subscriptions
            .iter_mut()
            .find(|s| s.id == id && s.customer_id == user.user_id)
            .ok_or(AppError::NotFound)?;
        if found.status == SubscriptionStatus::Cancelled {
            return Err(AppError::BadRequest("Subscription is already cancelled".into()));
        }
        found.status = SubscriptionStatus::Cancelled;
        found.updated_at = Utc::now();
        found.clone()
    };

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "subscription_cancel",
        Some("subscriptions"),
        Some(serde_json::json!({ "subscription_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Subscription cancelled",
        cancelled,
        Some(Meta::empty()),
    ))
}
