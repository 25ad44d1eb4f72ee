use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::lifecycle::OrderStatus,
    dto::orders::{CheckoutRequest, OrderList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeliveryAddress, Order, OrderItem},
    response::{ApiResponse, Meta, paginate},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// Filter, sort and page a set of orders the caller is allowed to see.
pub(crate) fn page_orders(
    mut orders: Vec<Order>,
    query: &OrderListQuery,
) -> AppResult<(Vec<Order>, Meta)> {
    let (page, limit, offset) = query.pagination.normalize();
    if let Some(status) = query.status_filter()? {
        orders.retain(|o| o.status == status);
    }
    match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => orders.sort_by_key(|o| o.created_at),
        SortOrder::Desc => orders.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    Ok(paginate(orders, page, limit, offset))
}

/// Move one order through the state machine. `guard` sees the order before
/// the move and may refuse it; `mutate` runs after a legal move.
pub(crate) async fn transition_order<G, M>(
    state: &AppState,
    order_id: Uuid,
    next: OrderStatus,
    guard: G,
    mutate: M,
) -> AppResult<Order>
where
    G: FnOnce(&Order) -> AppResult<()>,
    M: FnOnce(&mut Order),
{
    let mut orders = state.store.orders.write().await;
    let order = orders
        .iter_mut()
        .find(|o| o.id == order_id)
        .ok_or(AppError::NotFound)?;
    guard(&*order)?;

    let from = order.status;
    order.status = from.transition_to(next)?;
    mutate(&mut *order);
    order.updated_at = Utc::now();

    tracing::info!(order_id = %order.id, from = %from, to = %next, "order status changed");
    Ok(order.clone())
}

pub(crate) async fn find_order(state: &AppState, order_id: Uuid) -> AppResult<Order> {
    state
        .store
        .orders
        .read()
        .await
        .iter()
        .find(|o| o.id == order_id)
        .cloned()
        .ok_or(AppError::NotFound)
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let own: Vec<Order> = state
        .store
        .orders
        .read()
        .await
        .iter()
        .filter(|o| o.customer_id == user.user_id)
        .cloned()
        .collect();

    let (items, meta) = page_orders(own, &query)?;
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub fn validate_address(address: &DeliveryAddress) -> AppResult<()> {
    if address.street.trim().is_empty()
        || address.city.trim().is_empty()
        || address.pincode.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "Delivery address needs street, city and pincode".into(),
        ));
    }
    Ok(())
}

pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<Order>> {
    let address = payload.delivery_address;
    validate_address(&address)?;

    // The cart is dropped and persisted before the order becomes visible.
    let order = state
        .store
        .update_carts(|carts| {
            let cart = match carts.get(&user.user_id).filter(|c| !c.is_empty()) {
                Some(c) => c,
                None => return Err(AppError::BadRequest("Cart is empty".into())),
            };
            let kitchen = cart
                .kitchen
                .clone()
                .ok_or_else(|| AppError::BadRequest("Cart has no kitchen".into()))?;

            let subtotal = cart.subtotal();
            if subtotal < kitchen.min_order_amount {
                return Err(AppError::BadRequest(format!(
                    "Minimum order for {} is {}",
                    kitchen.name, kitchen.min_order_amount
                )));
            }

            for line in &cart.items {
                let still_available = state
                    .catalog
                    .menu_item(&line.item.id)
                    .is_some_and(|item| item.available);
                if !still_available {
                    return Err(AppError::BadRequest(format!(
                        "{} is no longer available",
                        line.item.name
                    )));
                }
            }

            let now = Utc::now();
            let id = Uuid::new_v4();
            let order = Order {
                id,
                customer_id: user.user_id,
                kitchen_id: kitchen.id.clone(),
                items: cart
                    .items
                    .iter()
                    .map(|line| OrderItem {
                        menu_item_id: line.item.id.clone(),
                        name: line.item.name.clone(),
                        quantity: line.quantity,
                        price: line.item.price,
                        special_instructions: line.special_instructions.clone(),
                    })
                    .collect(),
                status: OrderStatus::Pending,
                subtotal,
                delivery_fee: cart.delivery_fee(),
                platform_fee: cart.platform_fee(),
                total: cart.total(),
                delivery_partner: None,
                delivery_address: address,
                priority_delivery: payload.priority_delivery,
                payment_reference: build_payment_reference(id),
                created_at: now,
                updated_at: now,
            };

            carts.remove(&user.user_id);
            Ok(order)
        })
        .await?;

    state.store.orders.write().await.push(order.clone());

    tracing::info!(
        order_id = %order.id,
        kitchen_id = %order.kitchen_id,
        total = order.total,
        priority = order.priority_delivery,
        "order placed"
    );

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "payment_method": payload.payment_method.unwrap_or_else(|| "card".into()),
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Checkout success",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let order = find_order(state, id).await?;
    if order.customer_id != user.user_id {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let order = transition_order(
        state,
        id,
        OrderStatus::Cancelled,
        |order| {
            if order.customer_id != user.user_id {
                return Err(AppError::NotFound);
            }
            Ok(())
        },
        |_| {},
    )
    .await?;

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "order_cancel",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Order cancelled", order, Some(Meta::empty())))
}

/// Simulated payment: there is no gateway, only a reference to show the customer.
fn build_payment_reference(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    format!("PAY-{}-{}", date, &suffix[..8])
}
