mod common;

use cloud_kitchen_api::{
    domain::lifecycle::OrderStatus,
    dto::{
        cart::AddToCartRequest,
        orders::{CheckoutRequest, PlaceBidRequest, UpdateOrderStatusRequest},
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{BidStatus, VehicleType},
    routes::params::OrderListQuery,
    services::{admin_service, cart_service, delivery_service, kitchen_service, order_service},
    state::AppState,
};
use uuid::Uuid;

fn add(menu_item_id: &str, quantity: i32) -> AddToCartRequest {
    AddToCartRequest {
        menu_item_id: menu_item_id.into(),
        quantity,
        special_instructions: None,
        replace_kitchen: false,
    }
}

// Customer orders -> kitchen prepares -> partners bid -> customer accepts -> rider delivers.
#[tokio::test]
async fn order_travels_from_cart_to_doorstep() -> anyhow::Result<()> {
    let state = common::state().await?;
    let customer = common::customer(&state, "hungry@example.com").await?;
    let staff = common::kitchen_staff(&state, "ck-1").await?;
    let rider = common::rider(&state, "dp-1").await?;
    let admin = common::admin(&state).await?;

    cart_service::add_to_cart(&state, &customer, add("mi-1", 1)).await?;
    let order = order_service::checkout(
        &state,
        &customer,
        CheckoutRequest {
            delivery_address: common::address(),
            priority_delivery: true,
            payment_method: Some("upi".into()),
        },
    )
    .await?
    .data
    .expect("order");

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.subtotal, 32000);
    assert_eq!(order.delivery_fee, 4000);
    assert_eq!(order.platform_fee, 250);
    assert_eq!(order.total, 36250);
    assert!(order.payment_reference.starts_with("PAY-"));

    let cart = cart_service::get_cart(&state, &customer).await?.data.expect("cart");
    assert!(cart.items.is_empty());
    assert!(cart.kitchen.is_none());

    // Pending -> Confirmed -> Preparing -> Ready -> AwaitingDelivery
    let mut seen = Vec::new();
    for _ in 0..4 {
        let moved = kitchen_service::advance_order(&state, &staff, "ck-1", order.id)
            .await?
            .data
            .expect("order");
        seen.push(moved.status);
    }
    assert_eq!(
        seen,
        vec![
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::AwaitingDelivery,
        ]
    );
    let stuck = kitchen_service::advance_order(&state, &staff, "ck-1", order.id).await;
    assert!(matches!(stuck, Err(AppError::BadRequest(_))));

    // Past the kitchen, the customer can no longer cancel.
    let cancel = order_service::cancel_order(&state, &customer, order.id).await;
    assert!(matches!(cancel, Err(AppError::BadRequest(_))));

    let open = delivery_service::available_orders(&state, &rider, OrderListQuery::default())
        .await?
        .data
        .expect("orders");
    assert!(open.items.iter().any(|o| o.id == order.id));

    let simulated = delivery_service::simulate_bids(&state, &customer, order.id)
        .await?
        .data
        .expect("bids");
    assert!(!simulated.items.is_empty() && simulated.items.len() <= 3);
    assert!(simulated.items.windows(2).all(|w| w[0].bid_amount <= w[1].bid_amount));

    let quote = delivery_service::place_bid(
        &state,
        &rider,
        order.id,
        PlaceBidRequest {
            vehicle_type: Some(VehicleType::EVehicle),
            priority_boost: false,
        },
    )
    .await?
    .data
    .expect("quote");
    assert_eq!(quote.bid.delivery_partner_id, "dp-1");
    assert!((5.0..=95.0).contains(&quote.win_probability));

    let assigned = delivery_service::accept_bid(&state, &customer, order.id, quote.bid.id)
        .await?
        .data
        .expect("order");
    assert_eq!(assigned.status, OrderStatus::Assigned);
    assert_eq!(assigned.delivery_partner.as_deref(), Some("dp-1"));

    let bids = delivery_service::list_bids(&state, &customer, order.id)
        .await?
        .data
        .expect("bids");
    assert_eq!(
        bids.items.iter().filter(|b| b.status == BidStatus::Accepted).count(),
        1
    );
    assert!(bids
        .items
        .iter()
        .filter(|b| b.id != quote.bid.id)
        .all(|b| b.status == BidStatus::Rejected));

    let in_transit = delivery_service::pickup_order(&state, &rider, order.id)
        .await?
        .data
        .expect("order");
    assert_eq!(in_transit.status, OrderStatus::InTransit);

    let delivered = delivery_service::deliver_order(&state, &rider, order.id)
        .await?
        .data
        .expect("order");
    assert_eq!(delivered.status, OrderStatus::Delivered);

    // Terminal: even an admin cannot move it on.
    let reopen = admin_service::update_order_status(
        &state,
        &admin,
        order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Pending,
        },
    )
    .await;
    assert!(matches!(reopen, Err(AppError::BadRequest(_))));

    let stats = kitchen_service::kitchen_stats(&state, &staff, "ck-1")
        .await?
        .data
        .expect("stats");
    assert_eq!(stats.completed_orders, 1);
    assert_eq!(stats.revenue, 32000);

    let platform = admin_service::platform_stats(&state, &admin)
        .await?
        .data
        .expect("stats");
    assert_eq!(platform.gross_revenue, 36250);
    assert_eq!(platform.platform_revenue, 250);
    assert_eq!(platform.orders_by_status.get("delivered"), Some(&1));

    Ok(())
}

#[tokio::test]
async fn customer_cancels_before_preparation_finishes() -> anyhow::Result<()> {
    let state = common::state().await?;
    let customer = common::customer(&state, "fickle@example.com").await?;
    let stranger = common::customer(&state, "nosy@example.com").await?;

    cart_service::add_to_cart(&state, &customer, add("mi-11", 2)).await?;
    let order = order_service::checkout(
        &state,
        &customer,
        CheckoutRequest {
            delivery_address: common::address(),
            priority_delivery: false,
            payment_method: None,
        },
    )
    .await?
    .data
    .expect("order");

    let peek = order_service::get_order(&state, &stranger, order.id).await;
    assert!(matches!(peek, Err(AppError::NotFound)));
    let steal = order_service::cancel_order(&state, &stranger, order.id).await;
    assert!(matches!(steal, Err(AppError::NotFound)));

    let cancelled = order_service::cancel_order(&state, &customer, order.id)
        .await?
        .data
        .expect("order");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let again = order_service::cancel_order(&state, &customer, order.id).await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn kitchen_staff_only_see_their_own_kitchen() -> anyhow::Result<()> {
    let state = common::state().await?;
    let staff = common::kitchen_staff(&state, "ck-2").await?;
    let customer = common::customer(&state, "someone@example.com").await?;

    let other = kitchen_service::kitchen_board(&state, &staff, "ck-1").await;
    assert!(matches!(other, Err(AppError::Forbidden)));
    let as_customer = kitchen_service::kitchen_board(&state, &customer, "ck-2").await;
    assert!(matches!(as_customer, Err(AppError::Forbidden)));
    let missing = kitchen_service::kitchen_board(&state, &staff, "ck-99").await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    let board = kitchen_service::kitchen_board(&state, &staff, "ck-2")
        .await?
        .data
        .expect("board");
    assert!(board.pending.is_empty());
    Ok(())
}

#[tokio::test]
async fn second_partner_cannot_take_an_assigned_order() -> anyhow::Result<()> {
    let state = common::state().await?;
    let customer = common::customer(&state, "eater@example.com").await?;
    let admin = common::admin(&state).await?;
    let first = common::rider(&state, "dp-2").await?;
    let second = common::rider(&state, "dp-3").await?;

    cart_service::add_to_cart(&state, &customer, add("mi-8", 2)).await?;
    let order = order_service::checkout(
        &state,
        &customer,
        CheckoutRequest {
            delivery_address: common::address(),
            priority_delivery: false,
            payment_method: None,
        },
    )
    .await?
    .data
    .expect("order");

    for status in [OrderStatus::Confirmed, OrderStatus::Preparing, OrderStatus::Ready] {
        admin_service::update_order_status(&state, &admin, order.id, UpdateOrderStatusRequest { status })
            .await?;
    }

    // Ready orders may be taken directly.
    delivery_service::accept_order(&state, &first, order.id).await?;
    let late = delivery_service::accept_order(&state, &second, order.id).await;
    assert!(matches!(late, Err(AppError::BadRequest(_)) | Err(AppError::Conflict(_))));

    let wrong_rider = delivery_service::pickup_order(&state, &second, order.id).await;
    assert!(matches!(wrong_rider, Err(AppError::Forbidden)));

    let mine = delivery_service::my_deliveries(&state, &first, OrderListQuery::default())
        .await?
        .data
        .expect("orders");
    assert_eq!(mine.items.len(), 1);
    Ok(())
}

/// Checks out a ck-3 order and walks it to Ready.
async fn ready_order(state: &AppState, customer: &AuthUser, admin: &AuthUser) -> anyhow::Result<Uuid> {
    cart_service::add_to_cart(state, customer, add("mi-8", 2)).await?;
    let order = order_service::checkout(
        state,
        customer,
        CheckoutRequest {
            delivery_address: common::address(),
            priority_delivery: false,
            payment_method: None,
        },
    )
    .await?
    .data
    .expect("order");
    for status in [OrderStatus::Confirmed, OrderStatus::Preparing, OrderStatus::Ready] {
        admin_service::update_order_status(state, admin, order.id, UpdateOrderStatusRequest { status })
            .await?;
    }
    Ok(order.id)
}

#[tokio::test]
async fn taking_an_order_directly_closes_other_bids() -> anyhow::Result<()> {
    let state = common::state().await?;
    let customer = common::customer(&state, "quick@example.com").await?;
    let admin = common::admin(&state).await?;
    let rider = common::rider(&state, "dp-5").await?;
    let order_id = ready_order(&state, &customer, &admin).await?;

    // Re-running the simulation replaces offers instead of piling them up.
    for _ in 0..5 {
        delivery_service::simulate_bids(&state, &customer, order_id).await?;
    }
    delivery_service::place_bid(
        &state,
        &rider,
        order_id,
        PlaceBidRequest {
            vehicle_type: None,
            priority_boost: false,
        },
    )
    .await?;
    assert_eq!(state.store.bids.read().await.len(), 4);

    delivery_service::accept_order(&state, &rider, order_id).await?;

    let bids = delivery_service::list_bids(&state, &customer, order_id)
        .await?
        .data
        .expect("bids");
    assert!(bids.items.iter().all(|b| b.status != BidStatus::Open));
    let accepted: Vec<_> = bids
        .items
        .iter()
        .filter(|b| b.status == BidStatus::Accepted)
        .map(|b| b.delivery_partner_id.as_str())
        .collect();
    assert_eq!(accepted, vec!["dp-5"]);

    // Finished orders take their bids with them on the next bid write.
    delivery_service::pickup_order(&state, &rider, order_id).await?;
    delivery_service::deliver_order(&state, &rider, order_id).await?;
    let other = ready_order(&state, &customer, &admin).await?;
    delivery_service::simulate_bids(&state, &customer, other).await?;
    assert!(state
        .store
        .bids
        .read()
        .await
        .iter()
        .all(|b| b.order_id == other));
    Ok(())
}

#[tokio::test]
async fn expired_bids_cannot_be_accepted() -> anyhow::Result<()> {
    let state = common::state().await?;
    let customer = common::customer(&state, "slow@example.com").await?;
    let admin = common::admin(&state).await?;
    let order_id = ready_order(&state, &customer, &admin).await?;

    let offers = delivery_service::simulate_bids(&state, &customer, order_id)
        .await?
        .data
        .expect("bids");
    let stale = offers.items[0].id;
    {
        let mut bids = state.store.bids.write().await;
        for bid in bids.iter_mut().filter(|b| b.id == stale) {
            bid.expires_at = chrono::Utc::now() - chrono::Duration::seconds(1);
        }
    }

    let late = delivery_service::accept_bid(&state, &customer, order_id, stale).await;
    assert!(matches!(late, Err(AppError::BadRequest(_))));

    let listed = delivery_service::list_bids(&state, &customer, order_id)
        .await?
        .data
        .expect("bids");
    let shown = listed.items.iter().find(|b| b.id == stale).expect("stale bid");
    assert_eq!(shown.status, BidStatus::Expired);

    // A fresh offer on the same order still goes through.
    let fresh = offers.items[1].id;
    let order = delivery_service::accept_bid(&state, &customer, order_id, fresh)
        .await?
        .data
        .expect("order");
    assert_eq!(order.status, OrderStatus::Assigned);
    Ok(())
}

#[tokio::test]
async fn admin_cannot_assign_without_a_partner() -> anyhow::Result<()> {
    let state = common::state().await?;
    let customer = common::customer(&state, "waiting@example.com").await?;
    let admin = common::admin(&state).await?;
    let order_id = ready_order(&state, &customer, &admin).await?;

    let forced = admin_service::update_order_status(
        &state,
        &admin,
        order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Assigned,
        },
    )
    .await;
    assert!(matches!(forced, Err(AppError::BadRequest(_))));

    let order = order_service::get_order(&state, &customer, order_id)
        .await?
        .data
        .expect("order");
    assert_eq!(order.status, OrderStatus::Ready);
    assert!(order.delivery_partner.is_none());
    Ok(())
}
