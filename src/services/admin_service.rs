use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    audit::{AuditEntry, log_audit},
    domain::lifecycle::OrderStatus,
    dto::orders::{OrderList, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, User},
    response::{ApiResponse, Meta, paginate},
    routes::params::{OrderListQuery, Pagination, UserListQuery},
    services::order_service::{find_order, page_orders, transition_order},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogList {
    pub items: Vec<AuditEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlatformStats {
    pub total_orders: i64,
    pub orders_by_status: BTreeMap<String, i64>,
    /// Sum of delivered order totals, minor units.
    pub gross_revenue: i64,
    /// Platform fees collected on delivered orders, minor units.
    pub platform_revenue: i64,
    pub users_by_role: BTreeMap<String, i64>,
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let all = state.store.orders.read().await.clone();
    let (items, meta) = page_orders(all, &query)?;
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let order = find_order(state, id).await?;
    Ok(ApiResponse::success("Order found", order, Some(Meta::empty())))
}

/// Admin override; still bound by the transition table.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    // Assignment needs a partner, which only the bid and accept flows supply.
    if payload.status == OrderStatus::Assigned {
        return Err(AppError::BadRequest(
            "orders are assigned by accepting a delivery partner".into(),
        ));
    }
    let order = transition_order(state, id, payload.status, |_| Ok(()), |_| {}).await?;

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Order status updated", order, Some(Meta::empty())))
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();
    let mut users: Vec<User> = state
        .store
        .users
        .read()
        .await
        .iter()
        .filter(|u| query.role.is_none_or(|r| u.role == r))
        .cloned()
        .collect();
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let (items, meta) = paginate(users, page, limit, offset);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn list_audit_logs(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<AuditLogList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();
    let newest_first: Vec<AuditEntry> = state
        .store
        .audit_logs
        .read()
        .await
        .iter()
        .rev()
        .cloned()
        .collect();
    let (items, meta) = paginate(newest_first, page, limit, offset);
    Ok(ApiResponse::success("Audit logs", AuditLogList { items }, Some(meta)))
}

pub async fn platform_stats(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PlatformStats>> {
    ensure_admin(user)?;

    let (total_orders, orders_by_status, gross_revenue, platform_revenue) = {
        let orders = state.store.orders.read().await;
        let mut by_status = BTreeMap::new();
        let mut gross = 0;
        let mut platform = 0;
        for order in orders.iter() {
            *by_status.entry(order.status.to_string()).or_insert(0) += 1;
            if order.status == OrderStatus::Delivered {
                gross += order.total;
                platform += order.platform_fee;
            }
        }
        (orders.len() as i64, by_status, gross, platform)
    };

    let mut users_by_role = BTreeMap::new();
    for u in state.store.users.read().await.iter() {
        *users_by_role.entry(u.role.to_string()).or_insert(0) += 1;
    }

    Ok(ApiResponse::success(
        "Stats",
        PlatformStats {
            total_orders,
            orders_by_status,
            gross_revenue,
            platform_revenue,
            users_by_role,
        },
        Some(Meta::empty()),
    ))
}
