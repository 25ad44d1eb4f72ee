use serde::Deserialize;
use utoipa::ToSchema;

fn one() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub menu_item_id: String,
    #[serde(default = "one")]
    pub quantity: i32,
    pub special_instructions: Option<String>,
    /// Confirms dropping the current cart when the item is from another kitchen.
    #[serde(default)]
    pub replace_kitchen: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}
