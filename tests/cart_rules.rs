mod common;

use cloud_kitchen_api::{
    domain::cart::PLATFORM_FEE,
    dto::{
        cart::{AddToCartRequest, UpdateQuantityRequest},
        favorites::AddFavoriteRequest,
        orders::CheckoutRequest,
    },
    error::AppError,
    models::Role,
    routes::params::Pagination,
    services::{auth_service, cart_service, favorite_service, order_service},
    state::AppState,
    store::Storage,
};
use uuid::Uuid;

fn add(menu_item_id: &str, quantity: i32, replace_kitchen: bool) -> AddToCartRequest {
    AddToCartRequest {
        menu_item_id: menu_item_id.into(),
        quantity,
        special_instructions: None,
        replace_kitchen,
    }
}

fn checkout_request() -> CheckoutRequest {
    CheckoutRequest {
        delivery_address: common::address(),
        priority_delivery: false,
        payment_method: None,
    }
}

#[tokio::test]
async fn cart_stays_within_one_kitchen() -> anyhow::Result<()> {
    let state = common::state().await?;
    let user = common::customer(&state, "cart@example.com").await?;

    cart_service::add_to_cart(&state, &user, add("mi-2", 1, false)).await?;
    let merged = cart_service::add_to_cart(&state, &user, add("mi-2", 2, false))
        .await?
        .data
        .expect("cart");
    assert_eq!(merged.items.len(), 1);
    assert_eq!(merged.items[0].quantity, 3);
    assert_eq!(merged.line_count, 1);
    assert_eq!(merged.item_count, 3);
    assert_eq!(merged.subtotal, 3 * 26000);
    assert_eq!(merged.total, 3 * 26000 + 4000 + 250);

    let clash = cart_service::add_to_cart(&state, &user, add("mi-5", 1, false)).await;
    assert!(matches!(clash, Err(AppError::Conflict(_))));

    let replaced = cart_service::add_to_cart(&state, &user, add("mi-5", 1, true))
        .await?
        .data
        .expect("cart");
    assert_eq!(replaced.kitchen.as_ref().map(|k| k.id.as_str()), Some("ck-2"));
    assert_eq!(replaced.items.len(), 1);
    assert_eq!(replaced.item_count, 1);
    assert_eq!(replaced.line_count, 1);
    Ok(())
}

#[tokio::test]
async fn invalid_additions_are_rejected() -> anyhow::Result<()> {
    let state = common::state().await?;
    let user = common::customer(&state, "picky@example.com").await?;

    let sold_out = cart_service::add_to_cart(&state, &user, add("mi-10", 1, false)).await;
    assert!(matches!(sold_out, Err(AppError::BadRequest(_))));

    let zero = cart_service::add_to_cart(&state, &user, add("mi-1", 0, false)).await;
    assert!(matches!(zero, Err(AppError::BadRequest(_))));

    let unknown = cart_service::add_to_cart(&state, &user, add("mi-404", 1, false)).await;
    assert!(matches!(unknown, Err(AppError::BadRequest(_))));

    let cart = cart_service::get_cart(&state, &user).await?.data.expect("cart");
    assert!(cart.items.is_empty());
    assert_eq!(cart.subtotal, 0);
    assert_eq!(cart.delivery_fee, 0);
    assert_eq!(cart.total, PLATFORM_FEE);
    Ok(())
}

#[tokio::test]
async fn emptying_the_cart_releases_the_kitchen() -> anyhow::Result<()> {
    let state = common::state().await?;
    let user = common::customer(&state, "undecided@example.com").await?;

    cart_service::add_to_cart(&state, &user, add("mi-8", 1, false)).await?;
    let missing = cart_service::remove_from_cart(&state, &user, "mi-9").await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    let emptied = cart_service::update_quantity(
        &state,
        &user,
        "mi-8",
        UpdateQuantityRequest { quantity: 0 },
    )
    .await?
    .data
    .expect("cart");
    assert!(emptied.items.is_empty());
    assert!(emptied.kitchen.is_none());

    // Any kitchen is fine again without confirmation.
    cart_service::add_to_cart(&state, &user, add("mi-11", 1, false)).await?;
    let cleared = cart_service::clear_cart(&state, &user).await?.data.expect("cart");
    assert!(cleared.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn checkout_enforces_cart_rules() -> anyhow::Result<()> {
    let state = common::state().await?;
    let user = common::customer(&state, "frugal@example.com").await?;

    let empty = order_service::checkout(&state, &user, checkout_request()).await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));

    // A single naan is below the kitchen minimum.
    cart_service::add_to_cart(&state, &user, add("mi-3", 1, false)).await?;
    let small = order_service::checkout(&state, &user, checkout_request()).await;
    assert!(matches!(small, Err(AppError::BadRequest(_))));

    let mut no_city = checkout_request();
    no_city.delivery_address.city = "  ".into();
    cart_service::add_to_cart(&state, &user, add("mi-1", 1, false)).await?;
    let bad_address = order_service::checkout(&state, &user, no_city).await;
    assert!(matches!(bad_address, Err(AppError::BadRequest(_))));

    // Failed checkouts leave the cart untouched.
    let cart = cart_service::get_cart(&state, &user).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 2);

    let order = order_service::checkout(&state, &user, checkout_request())
        .await?
        .data
        .expect("order");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.subtotal, 38000);
    Ok(())
}

#[tokio::test]
async fn carts_and_favorites_survive_a_restart() -> anyhow::Result<()> {
    let dir = std::env::temp_dir().join(format!("cloud-kitchen-test-{}", Uuid::new_v4()));

    let user = {
        let state = AppState::build(Storage::directory(&dir).await?, common::SECRET).await?;
        let user = common::customer(&state, "loyal@example.com").await?;
        cart_service::add_to_cart(&state, &user, add("mi-13", 2, false)).await?;
        favorite_service::add_favorite(
            &state,
            &user,
            AddFavoriteRequest {
                kitchen_id: "ck-4".into(),
            },
        )
        .await?;
        user
    };

    let state = AppState::build(Storage::directory(&dir).await?, common::SECRET).await?;
    let cart = cart_service::get_cart(&state, &user).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);

    let favorites = favorite_service::list_favorites(&state, &user, Pagination::default())
        .await?
        .data
        .expect("favorites");
    assert_eq!(favorites.items.len(), 1);
    assert_eq!(favorites.items[0].id, "ck-4");

    favorite_service::remove_favorite(&state, &user, "ck-4").await?;
    let gone = favorite_service::remove_favorite(&state, &user, "ck-4").await;
    assert!(matches!(gone, Err(AppError::NotFound)));

    tokio::fs::remove_dir_all(&dir).await?;
    Ok(())
}

#[tokio::test]
async fn failed_writes_leave_memory_untouched() -> anyhow::Result<()> {
    let dir = std::env::temp_dir().join(format!("cloud-kitchen-test-{}", Uuid::new_v4()));
    let state = AppState::build(Storage::directory(&dir).await?, common::SECRET).await?;
    let user = common::customer(&state, "unlucky@example.com").await?;
    cart_service::add_to_cart(&state, &user, add("mi-1", 1, false)).await?;

    // Every later write now fails.
    tokio::fs::remove_dir_all(&dir).await?;

    let signup =
        auth_service::register_user(&state, common::request("late@example.com", Role::Customer))
            .await;
    assert!(matches!(signup, Err(AppError::Storage(_))));
    assert!(!state
        .store
        .users
        .read()
        .await
        .iter()
        .any(|u| u.email == "late@example.com"));

    let grown = cart_service::add_to_cart(&state, &user, add("mi-2", 1, false)).await;
    assert!(grown.is_err());
    let failed = order_service::checkout(&state, &user, checkout_request()).await;
    assert!(matches!(failed, Err(AppError::Storage(_))));
    assert!(state.store.orders.read().await.is_empty());

    let cart = cart_service::get_cart(&state, &user).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].item.id, "mi-1");

    // Once storage is back the same signup goes through.
    tokio::fs::create_dir_all(&dir).await?;
    common::customer(&state, "late@example.com").await?;

    tokio::fs::remove_dir_all(&dir).await?;
    Ok(())
}
