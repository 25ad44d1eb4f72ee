mod common;

use cloud_kitchen_api::{
    domain::subscription::{
        DeliveryDay, MealTime, PRICE_PER_MEAL, SubscriptionPlan, SubscriptionStatus,
    },
    dto::subscriptions::SubscriptionRequest,
    error::AppError,
    routes::params::Pagination,
    services::subscription_service,
};

fn weekly(kitchen_id: &str) -> SubscriptionRequest {
    SubscriptionRequest {
        kitchen_id: kitchen_id.into(),
        plan: SubscriptionPlan::Weekly,
        delivery_days: DeliveryDay::default_days(),
        meal_times: vec![MealTime::Lunch],
        portions: 1,
        delivery_address: Some(common::address()),
    }
}

#[tokio::test]
async fn quote_uses_request_defaults() -> anyhow::Result<()> {
    let state = common::state().await?;
    let user = common::customer(&state, "planner@example.com").await?;

    let payload: SubscriptionRequest =
        serde_json::from_value(serde_json::json!({ "kitchen_id": "ck-1", "plan": "monthly" }))?;
    assert_eq!(payload.delivery_days, DeliveryDay::default_days());
    assert_eq!(payload.meal_times, vec![MealTime::Lunch]);
    assert_eq!(payload.portions, 1);

    let quote = subscription_service::quote_subscription(&state, &user, payload)
        .await?
        .data
        .expect("quote");
    assert_eq!(quote.total_deliveries, 12);
    assert_eq!(quote.estimated_price, 12 * PRICE_PER_MEAL);
    assert_eq!((quote.end_date - quote.start_date).num_days(), 30);

    // The wire form spells weekdays the short way.
    let raw = serde_json::to_value(&quote)?;
    assert_eq!(raw["delivery_days"], serde_json::json!(["Mon", "Wed", "Fri"]));
    Ok(())
}

#[tokio::test]
async fn only_kitchens_offering_plans_accept_subscribers() -> anyhow::Result<()> {
    let state = common::state().await?;
    let user = common::customer(&state, "regular@example.com").await?;

    let refused = subscription_service::create_subscription(&state, &user, weekly("ck-3")).await;
    assert!(matches!(refused, Err(AppError::BadRequest(_))));

    let mut no_days = weekly("ck-1");
    no_days.delivery_days.clear();
    let empty = subscription_service::quote_subscription(&state, &user, no_days).await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));

    let mut homeless = weekly("ck-1");
    homeless.delivery_address = None;
    let missing = subscription_service::create_subscription(&state, &user, homeless).await;
    assert!(matches!(missing, Err(AppError::BadRequest(_))));

    assert!(state.store.subscriptions.read().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn subscribers_manage_only_their_own_plans() -> anyhow::Result<()> {
    let state = common::state().await?;
    let owner = common::customer(&state, "owner@example.com").await?;
    let other = common::customer(&state, "other@example.com").await?;

    let created = subscription_service::create_subscription(&state, &owner, weekly("ck-1"))
        .await?
        .data
        .expect("subscription");
    assert_eq!(created.status, SubscriptionStatus::Active);
    assert_eq!(created.quote.estimated_price, 3 * PRICE_PER_MEAL);

    let theirs = subscription_service::list_subscriptions(&state, &other, Pagination::default())
        .await?
        .data
        .expect("list");
    assert!(theirs.items.is_empty());

    let hijack = subscription_service::cancel_subscription(&state, &other, created.id).await;
    assert!(matches!(hijack, Err(AppError::NotFound)));

    let cancelled = subscription_service::cancel_subscription(&state, &owner, created.id)
        .await?
        .data
        .expect("subscription");
    assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);

    let again = subscription_service::cancel_subscription(&state, &owner, created.id).await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));

    let mine = subscription_service::list_subscriptions(&state, &owner, Pagination::default())
        .await?
        .data
        .expect("list");
    assert_eq!(mine.items.len(), 1);
    assert_eq!(mine.items[0].status, SubscriptionStatus::Cancelled);
    Ok(())
}
