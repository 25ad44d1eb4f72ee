use crate::{
    domain::catalog::KitchenFilter,
    dto::catalog::{KitchenList, KitchenMenu, PartnerList},
    error::{AppError, AppResult},
    models::CloudKitchen,
    response::{ApiResponse, Meta, paginate},
    routes::params::{KitchenQuery, Pagination},
    state::AppState,
};

pub async fn list_kitchens(
    state: &AppState,
    query: KitchenQuery,
) -> AppResult<ApiResponse<KitchenList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let filter = KitchenFilter {
        q: query.q,
        cuisine: query.cuisine,
        vegetarian_only: query.vegetarian.unwrap_or(false),
        subscription_only: query.subscription.unwrap_or(false),
    };
    let found: Vec<_> = state
        .catalog
        .search(&filter)
        .into_iter()
        .cloned()
        .collect();

    let (items, meta) = paginate(found, page, limit, offset);
    Ok(ApiResponse::success("Kitchens", KitchenList { items }, Some(meta)))
}

pub async fn get_kitchen(
    state: &AppState,
    kitchen_id: &str,
) -> AppResult<ApiResponse<CloudKitchen>> {
    let kitchen = state
        .catalog
        .kitchen(kitchen_id)
        .cloned()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Kitchen", kitchen, Some(Meta::empty())))
}

pub async fn kitchen_menu(state: &AppState, kitchen_id: &str) -> AppResult<ApiResponse<KitchenMenu>> {
    let kitchen = state
        .catalog
        .kitchen(kitchen_id)
        .cloned()
        .ok_or(AppError::NotFound)?;
    let items: Vec<_> = state.catalog.menu(kitchen_id).into_iter().cloned().collect();

    let mut categories: Vec<String> = Vec::new();
    for item in &items {
        if !categories.contains(&item.category) {
            categories.push(item.category.clone());
        }
    }

    Ok(ApiResponse::success(
        "Menu",
        KitchenMenu {
            kitchen,
            items,
            categories,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_partners(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<PartnerList>> {
    let (page, limit, offset) = pagination.normalize();
    let all = state.catalog.partners().to_vec();
    let (items, meta) = paginate(all, page, limit, offset);
    Ok(ApiResponse::success("Partners", PartnerList { items }, Some(meta)))
}
