use crate::{
    audit::log_audit,
    dto::favorites::{AddFavoriteRequest, FavoriteKitchenList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CloudKitchen,
    response::{ApiResponse, Meta, paginate},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_favorites(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<FavoriteKitchenList>> {
    let (page, limit, offset) = pagination.normalize();
    let ids = state
        .store
        .favorites
        .read()
        .await
        .get(&user.user_id)
        .cloned()
        .unwrap_or_default();

    // Most recently added first; ids no longer in the catalog are skipped.
    let kitchens: Vec<CloudKitchen> = ids
        .iter()
        .rev()
        .filter_map(|id| state.catalog.kitchen(id).cloned())
        .collect();

    let (items, meta) = paginate(kitchens, page, limit, offset);
    Ok(ApiResponse::success("OK", FavoriteKitchenList { items }, Some(meta)))
}

pub async fn add_favorite(
    state: &AppState,
    user: &AuthUser,
    payload: AddFavoriteRequest,
) -> AppResult<ApiResponse<CloudKitchen>> {
    let kitchen = state
        .catalog
        .kitchen(&payload.kitchen_id)
        .cloned()
        .ok_or_else(|| AppError::BadRequest("Kitchen not found".into()))?;

    let already_saved = state
        .store
        .favorites
        .read()
        .await
        .get(&user.user_id)
        .is_some_and(|list| list.contains(&kitchen.id));
    if !already_saved {
        state
            .store
            .update_favorites(|favorites| {
                let list = favorites.entry(user.user_id).or_default();
                if !list.contains(&kitchen.id) {
                    list.push(kitchen.id.clone());
                }
                Ok(())
            })
            .await?;
    }

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "favorite_add",
        Some("favorites"),
        Some(serde_json::json!({ "kitchen_id": kitchen.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Added to favorites",
        kitchen,
        Some(Meta::empty()),
    ))
}

pub async fn remove_favorite(
    state: &AppState,
    user: &AuthUser,
    kitchen_id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .store
        .update_favorites(|favorites| {
            let list = favorites.get_mut(&user.user_id).ok_or(AppError::NotFound)?;
            let before = list.len();
            list.retain(|id| id != kitchen_id);
            if list.len() == before {
                return Err(AppError::NotFound);
            }
            if list.is_empty() {
                favorites.remove(&user.user_id);
            }
            Ok(())
        })
        .await?;

    if let Err(err) = log_audit(
        &state.store,
        Some(user.user_id),
        "favorite_remove",
        Some("favorites"),
        Some(serde_json::json!({ "kitchen_id": kitchen_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from favorites",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
