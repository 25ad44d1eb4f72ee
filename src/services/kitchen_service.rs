use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::lifecycle::OrderStatus,
    dto::orders::{KitchenBoard, KitchenStats},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, Role},
    response::{ApiResponse, Meta},
    services::{
        auth_service::find_user,
        order_service::transition_order,
    },
    state::AppState,
};

/// Admins see every kitchen; kitchen accounts only the one they are linked to.
async fn ensure_kitchen_access(state: &AppState, user: &AuthUser, kitchen_id: &str) -> AppResult<()> {
    if state.catalog.kitchen(kitchen_id).is_none() {
        return Err(AppError::NotFound);
    }
    match user.role {
        Role::Admin => Ok(()),
        Role::Kitchen => {
            let account = find_user(state, user.user_id).await?;
            let linked = account
                .kitchen
                .as_ref()
                .and_then(|k| k.kitchen_id.as_deref());
            if linked == Some(kitchen_id) {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
        _ => Err(AppError::Forbidden),
    }
}

async fn kitchen_orders(state: &AppState, kitchen_id: &str) -> Vec<Order> {
    let mut orders: Vec<Order> = state
        .store
        .orders
        .read()
        .await
        .iter()
        .filter(|o| o.kitchen_id == kitchen_id)
        .cloned()
        .collect();
    // Priority orders first, then oldest first.
    orders.sort_by_key(|o| (!o.priority_delivery, o.created_at));
    orders
}

pub async fn kitchen_board(
    state: &AppState,
    user: &AuthUser,
    kitchen_id: &str,
) -> AppResult<ApiResponse<KitchenBoard>> {
    ensure_kitchen_access(state, user, kitchen_id).await?;

    let mut board = KitchenBoard::default();
    for order in kitchen_orders(state, kitchen_id).await {
        match order.status {
            OrderStatus::Pending => board.pending.push(order),
            OrderStatus::Confirmed => board.confirmed.push(order),
            OrderStatus::Preparing => board.preparing.push(order),
            OrderStatus::Ready => board.ready.push(order),
            OrderStatus::AwaitingDelivery => board.awaiting_delivery.push(order),
            _ => {}
        }
    }

    Ok(ApiResponse::success("OK", board, Some(Meta::empty())))
}

pub async fn advance_order(
    state: &AppState,
    user: &AuthUser,
    kitchen_id: &str,
    order_id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_kitchen_access(state, user, kitchen_id).await?;

    let current = state
        .store
        .orders
        .read()
        .await
        .iter()
        .find(|o| o.id == order_id && o.kitchen_id == kitchen_id)
        .map(|o| o.status)
        .ok_or(AppError::NotFound)?;

    let next = current.next_kitchen_step().ok_or_else(|| {
        AppError::BadRequest(format!("order is {current} and has left the kitchen"))
    })?;

    // The status is re-checked under the write lock; a concurrent move makes this a no-op error.
    let order = transition_order(
        state,
        order_id,
        next,
        |order| {
            if order.status != current {
                return Err(AppError::Conflict(format!(
                    "order moved to {} in the meantime",
                    order.status
                )));
            }
            Ok(())
        },
        |_| {},
    )
    .await?;

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "kitchen_advance",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Order updated", order, Some(Meta::empty())))
}

pub async fn kitchen_stats(
    state: &AppState,
    user: &AuthUser,
    kitchen_id: &str,
) -> AppResult<ApiResponse<KitchenStats>> {
    ensure_kitchen_access(state, user, kitchen_id).await?;

    let orders = kitchen_orders(state, kitchen_id).await;
    let completed: Vec<&Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Delivered)
        .collect();
    let cancelled = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Cancelled)
        .count() as i64;

    let stats = KitchenStats {
        total_orders: orders.len() as i64,
        active_orders: orders.len() as i64 - completed.len() as i64 - cancelled,
        completed_orders: completed.len() as i64,
        cancelled_orders: cancelled,
        revenue: completed.iter().map(|o| o.subtotal).sum(),
        rating: state
            .catalog
            .kitchen(kitchen_id)
            .map_or(0.0, |k| k.rating),
    };

    Ok(ApiResponse::success("OK", stats, Some(Meta::empty())))
}
