use chrono::{Local, Timelike, Utc};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{
        lifecycle::OrderStatus,
        pricing::{QuoteRequest, win_probability},
    },
    dto::orders::{BidList, BidQuote, OrderList, PlaceBidRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_any_role},
    models::{BidStatus, DeliveryBid, Order, Role, VehicleType},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::{
        auth_service::find_user,
        order_service::{find_order, page_orders, transition_order},
    },
    state::AppState,
};

const DEFAULT_PARTNER_RATING: f64 = 4.5;

/// Who a delivery account bids as: a catalog partner when linked, otherwise itself.
#[derive(Debug, Clone)]
struct PartnerIdentity {
    id: String,
    rating: f64,
    fleet: Vec<VehicleType>,
}

async fn partner_identity(state: &AppState, user: &AuthUser) -> AppResult<PartnerIdentity> {
    if user.role != Role::Delivery {
        return Err(AppError::Forbidden);
    }
    let account = find_user(state, user.user_id).await?;
    let profile = account.delivery.as_ref();

    if let Some(partner) = profile
        .and_then(|p| p.partner_id.as_deref())
        .and_then(|id| state.catalog.partner(id))
    {
        return Ok(PartnerIdentity {
            id: partner.id.clone(),
            rating: partner.rating,
            fleet: partner.available_vehicles.clone(),
        });
    }

    Ok(PartnerIdentity {
        id: account.id.to_string(),
        rating: DEFAULT_PARTNER_RATING,
        fleet: vec![profile.map_or(VehicleType::Motorcycle, |p| p.vehicle_type)],
    })
}

/// Drops bids whose order is gone or finished and closes open bids on orders
/// that stopped taking offers. Keeps the bid list proportional to live orders.
pub fn prune_bids(bids: &mut Vec<DeliveryBid>, orders: &[Order]) {
    bids.retain_mut(|bid| {
        let Some(order) = orders.iter().find(|o| o.id == bid.order_id) else {
            return false;
        };
        if order.status.is_terminal() {
            return false;
        }
        let open_for_bids = order.status.awaits_partner() && order.delivery_partner.is_none();
        if bid.status == BidStatus::Open && !open_for_bids {
            bid.status = BidStatus::Rejected;
        }
        true
    });
}

fn audit_failed(err: AppError) {
    tracing::warn!(error = %err, "audit log failed");
}

pub async fn available_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_any_role(user, &[Role::Delivery, Role::Admin])?;
    let open: Vec<Order> = state
        .store
        .orders
        .read()
        .await
        .iter()
        .filter(|o| o.status.awaits_partner() && o.delivery_partner.is_none())
        .cloned()
        .collect();
    let (items, meta) = page_orders(open, &query)?;
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn my_deliveries(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let me = partner_identity(state, user).await?;
    let mine: Vec<Order> = state
        .store
        .orders
        .read()
        .await
        .iter()
        .filter(|o| o.delivery_partner.as_deref() == Some(me.id.as_str()))
        .cloned()
        .collect();
    let (items, meta) = page_orders(mine, &query)?;
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn place_bid(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: PlaceBidRequest,
) -> AppResult<ApiResponse<BidQuote>> {
    let me = partner_identity(state, user).await?;
    let order = find_order(state, order_id).await?;
    if !order.status.awaits_partner() || order.delivery_partner.is_some() {
        return Err(AppError::BadRequest(format!(
            "order is {} and not open for bids",
            order.status
        )));
    }

    let vehicle = match payload.vehicle_type {
        Some(v) if me.fleet.contains(&v) => v,
        Some(v) => {
            return Err(AppError::BadRequest(format!(
                "vehicle {:?} is not in your fleet",
                v
            )));
        }
        None => me.fleet.first().copied().unwrap_or(VehicleType::Motorcycle),
    };

    let bid = {
        let request = QuoteRequest {
            order: &order,
            partner_id: &me.id,
            partner_rating: me.rating,
            vehicle,
            priority_boost: payload.priority_boost,
            now: Utc::now(),
        };
        let mut rng = rand::rng();
        state
            .estimator
            .quote(&mut rng, &request, Local::now().hour())
    };

    {
        let mut bids = state.store.bids.write().await;
        // A partner holds at most one open bid per order.
        bids.retain(|b| {
            !(b.order_id == order_id
                && b.delivery_partner_id == me.id
                && b.status == BidStatus::Open)
        });
        bids.push(bid.clone());
        prune_bids(&mut bids, &state.store.orders.read().await);
    }

    tracing::info!(
        order_id = %order_id,
        partner_id = %me.id,
        amount = bid.bid_amount,
        minutes = bid.estimated_time,
        "bid placed"
    );

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "bid_place",
        Some("bids"),
        Some(serde_json::json!({ "order_id": order_id, "bid_id": bid.id })),
    )
    .await
    {
        audit_failed(err);
    }

    let quote = BidQuote {
        win_probability: win_probability(bid.bid_amount, me.rating),
        bid,
    };
    Ok(ApiResponse::success("Bid placed", quote, Some(Meta::empty())))
}

/// Order owner or admin.
async fn ensure_order_owner(state: &AppState, user: &AuthUser, order_id: Uuid) -> AppResult<Order> {
    let order = find_order(state, order_id).await?;
    if user.role != Role::Admin && order.customer_id != user.user_id {
        return Err(AppError::NotFound);
    }
    Ok(order)
}

pub async fn list_bids(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<BidList>> {
    ensure_order_owner(state, user, order_id).await?;
    let now = Utc::now();
    let mut items: Vec<_> = state
        .store
        .bids
        .read()
        .await
        .iter()
        .filter(|b| b.order_id == order_id)
        .cloned()
        .map(|mut b| {
            b.status = b.status_at(now);
            b
        })
        .collect();
    items.sort_by_key(|b| b.bid_amount);
    Ok(ApiResponse::success("OK", BidList { items }, Some(Meta::empty())))
}

pub async fn simulate_bids(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<BidList>> {
    let order = ensure_order_owner(state, user, order_id).await?;
    if !order.status.awaits_partner() || order.delivery_partner.is_some() {
        return Err(AppError::BadRequest(format!(
            "order is {} and not open for bids",
            order.status
        )));
    }

    let fresh = {
        let mut rng = rand::rng();
        state.estimator.simulate_bids(
            &mut rng,
            &order,
            state.catalog.partners(),
            Utc::now(),
            Local::now().hour(),
        )
    };

    {
        let mut bids = state.store.bids.write().await;
        // Re-running the simulation replaces the simulated partners' open offers.
        bids.retain(|b| {
            !(b.order_id == order_id
                && b.status == BidStatus::Open
                && fresh.iter().any(|f| f.delivery_partner_id == b.delivery_partner_id))
        });
        bids.extend(fresh.iter().cloned());
        prune_bids(&mut bids, &state.store.orders.read().await);
    }
    tracing::debug!(order_id = %order_id, count = fresh.len(), "simulated partner bids");

    Ok(ApiResponse::success(
        "Bids received",
        BidList { items: fresh },
        Some(Meta::empty()),
    ))
}

pub async fn accept_bid(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    bid_id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_order_owner(state, user, order_id).await?;

    // Bids before orders, everywhere both are locked.
    let mut bids = state.store.bids.write().await;
    let now = Utc::now();
    let bid = bids
        .iter()
        .find(|b| b.id == bid_id && b.order_id == order_id)
        .cloned()
        .ok_or(AppError::NotFound)?;
    match bid.status_at(now) {
        BidStatus::Open => {}
        status => {
            return Err(AppError::BadRequest(format!(
                "bid is {:?} and can no longer be accepted",
                status
            )));
        }
    }

    let partner = bid.delivery_partner_id.clone();
    let order = transition_order(
        state,
        order_id,
        OrderStatus::Assigned,
        |order| {
            if order.delivery_partner.is_some() {
                return Err(AppError::Conflict("order already has a partner".into()));
            }
            Ok(())
        },
        |order| order.delivery_partner = Some(partner),
    )
    .await?;

    if let Some(b) = bids.iter_mut().find(|b| b.id == bid_id) {
        b.status = BidStatus::Accepted;
    }
    prune_bids(&mut bids, &state.store.orders.read().await);
    drop(bids);

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "bid_accept",
        Some("bids"),
        Some(serde_json::json!({ "order_id": order_id, "bid_id": bid_id })),
    )
    .await
    {
        audit_failed(err);
    }

    Ok(ApiResponse::success("Bid accepted", order, Some(Meta::empty())))
}

pub async fn accept_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let me = partner_identity(state, user).await?;
    let partner = me.id.clone();

    let mut bids = state.store.bids.write().await;
    let order = transition_order(
        state,
        order_id,
        OrderStatus::Assigned,
        |order| {
            if order.delivery_partner.is_some() {
                return Err(AppError::Conflict("order already has a partner".into()));
            }
            Ok(())
        },
        |order| order.delivery_partner = Some(partner),
    )
    .await?;

    // Taking the order directly honours the partner's own open offer, if any.
    if let Some(own) = bids.iter_mut().find(|b| {
        b.order_id == order_id && b.delivery_partner_id == me.id && b.status == BidStatus::Open
    }) {
        own.status = BidStatus::Accepted;
    }
    prune_bids(&mut bids, &state.store.orders.read().await);
    drop(bids);

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "delivery_accept",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order_id, "partner_id": me.id })),
    )
    .await
    {
        audit_failed(err);
    }

    Ok(ApiResponse::success("Order assigned", order, Some(Meta::empty())))
}

async fn partner_step(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    next: OrderStatus,
    action: &str,
) -> AppResult<Order> {
    let me = partner_identity(state, user).await?;
    let order = transition_order(
        state,
        order_id,
        next,
        |order| {
            if order.delivery_partner.as_deref() != Some(me.id.as_str()) {
                return Err(AppError::Forbidden);
            }
            Ok(())
        },
        |_| {},
    )
    .await?;

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        action,
        Some("orders"),
        Some(serde_json::json!({ "order_id": order_id, "partner_id": me.id })),
    )
    .await
    {
        audit_failed(err);
    }
    Ok(order)
}

pub async fn pickup_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let order = partner_step(state, user, order_id, OrderStatus::InTransit, "delivery_pickup").await?;
    Ok(ApiResponse::success("Order picked up", order, Some(Meta::empty())))
}

pub async fn deliver_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let order = partner_step(state, user, order_id, OrderStatus::Delivered, "delivery_complete").await?;
    Ok(ApiResponse::success("Order delivered", order, Some(Meta::empty())))
}
