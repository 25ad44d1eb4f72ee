use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{CloudKitchen, DeliveryPartner, MenuItem};

#[derive(Debug, Serialize, ToSchema)]
pub struct KitchenList {
    pub items: Vec<CloudKitchen>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KitchenMenu {
    pub kitchen: CloudKitchen,
    pub items: Vec<MenuItem>,
    /// Distinct categories in menu order.
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerList {
    pub items: Vec<DeliveryPartner>,
}
