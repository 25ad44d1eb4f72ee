use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::CloudKitchen;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddFavoriteRequest {
    pub kitchen_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteKitchenList {
    pub items: Vec<CloudKitchen>,
}
