use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::lifecycle::OrderStatus,
    models::{DeliveryAddress, DeliveryBid, Order, VehicleType},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub delivery_address: DeliveryAddress,
    #[serde(default)]
    pub priority_delivery: bool,
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct KitchenBoard {
    pub pending: Vec<Order>,
    pub confirmed: Vec<Order>,
    pub preparing: Vec<Order>,
    pub ready: Vec<Order>,
    pub awaiting_delivery: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KitchenStats {
    pub total_orders: i64,
    pub active_orders: i64,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
    /// Sum of delivered order subtotals, minor units.
    pub revenue: i64,
    pub rating: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceBidRequest {
    pub vehicle_type: Option<VehicleType>,
    #[serde(default)]
    pub priority_boost: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BidQuote {
    pub bid: DeliveryBid,
    /// Percent, 5 to 95.
    pub win_probability: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BidList {
    pub items: Vec<DeliveryBid>,
}
