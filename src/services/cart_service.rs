use crate::{
    audit::log_audit,
    domain::cart::{AddOutcome, Cart, CartSummary},
    dto::cart::{AddToCartRequest, UpdateQuantityRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartSummary>> {
    let summary = state
        .store
        .carts
        .read()
        .await
        .get(&user.user_id)
        .map(Cart::summary)
        .unwrap_or_else(|| Cart::default().summary());
    Ok(ApiResponse::success("OK", summary, Some(Meta::empty())))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartSummary>> {
    let item = state
        .catalog
        .menu_item(&payload.menu_item_id)
        .cloned()
        .ok_or_else(|| AppError::BadRequest("menu item not found".to_string()))?;
    let kitchen = state
        .catalog
        .kitchen(&item.restaurant_id)
        .cloned()
        .ok_or_else(|| AppError::BadRequest("kitchen not found".to_string()))?;

    let (outcome, summary) = state
        .store
        .update_carts(|carts| {
            let cart = carts.entry(user.user_id).or_default();
            let outcome = cart.add_item(
                item,
                payload.quantity,
                payload.special_instructions,
                &kitchen,
                payload.replace_kitchen,
            )?;
            Ok((outcome, cart.summary()))
        })
        .await?;

    if outcome == AddOutcome::KitchenReplaced {
        tracing::info!(user_id = %user.user_id, kitchen_id = %kitchen.id, "cart switched kitchen");
    }

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "cart_update",
        Some("carts"),
        Some(serde_json::json!({
            "menu_item_id": payload.menu_item_id,
            "quantity": payload.quantity,
            "kitchen_replaced": outcome == AddOutcome::KitchenReplaced,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", summary, None))
}

pub async fn update_quantity(
    state: &AppState,
    user: &AuthUser,
    menu_item_id: &str,
    payload: UpdateQuantityRequest,
) -> AppResult<ApiResponse<CartSummary>> {
    let summary = state
        .store
        .update_carts(|carts| {
            let cart = carts.get_mut(&user.user_id).ok_or(AppError::NotFound)?;
            cart.update_quantity(menu_item_id, payload.quantity)?;
            Ok(cart.summary())
        })
        .await?;

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "cart_quantity",
        Some("carts"),
        Some(serde_json::json!({ "menu_item_id": menu_item_id, "quantity": payload.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", summary, None))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    menu_item_id: &str,
) -> AppResult<ApiResponse<CartSummary>> {
    let summary = state
        .store
        .update_carts(|carts| {
            let cart = carts.get_mut(&user.user_id).ok_or(AppError::NotFound)?;
            cart.remove_item(menu_item_id)?;
            Ok(cart.summary())
        })
        .await?;

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "cart_remove",
        Some("carts"),
        Some(serde_json::json!({ "menu_item_id": menu_item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Removed from cart", summary, Some(Meta::empty())))
}

pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartSummary>> {
    if state.store.carts.read().await.contains_key(&user.user_id) {
        state
            .store
            .update_carts(|carts| {
                carts.remove(&user.user_id);
                Ok(())
            })
            .await?;
    }

    Ok(ApiResponse::success(
        "Cart cleared",
        Cart::default().summary(),
        Some(Meta::empty()),
    ))
}
