use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::lifecycle::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Kitchen,
    Delivery,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Kitchen => "kitchen",
            Role::Delivery => "delivery",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "customer" => Some(Role::Customer),
            "kitchen" => Some(Role::Kitchen),
            "delivery" => Some(Role::Delivery),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KitchenProfile {
    /// Catalog kitchen this account operates, if linked.
    pub kitchen_id: Option<String>,
    pub kitchen_name: String,
    pub kitchen_address: String,
    pub fssai_license: String,
    pub gst_number: String,
    pub cuisine: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryProfile {
    /// Partner record in the catalog this account bids as.
    pub partner_id: Option<String>,
    pub vehicle_type: VehicleType,
    pub license_number: String,
    pub aadhar_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kitchen: Option<KitchenProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum KitchenType {
    CloudKitchen,
    HomeOffice,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OperatingHours {
    pub open: String,
    pub close: String,
    pub days: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CloudKitchen {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rating: f64,
    /// Minutes.
    pub delivery_time: i32,
    pub delivery_fee: i64,
    pub cuisine_type: Vec<String>,
    pub address: String,
    pub kitchen_type: KitchenType,
    pub operating_hours: OperatingHours,
    pub min_order_amount: i64,
    pub subscription_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub available: bool,
    pub vegetarian: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Cycle,
    EVehicle,
    Motorcycle,
    PublicTransport,
    Car,
}

impl VehicleType {
    pub const ALL: [VehicleType; 5] = [
        VehicleType::Cycle,
        VehicleType::EVehicle,
        VehicleType::Motorcycle,
        VehicleType::PublicTransport,
        VehicleType::Car,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryPartner {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub rating: f64,
    pub completed_deliveries: i32,
    pub is_available: bool,
    pub available_vehicles: Vec<VehicleType>,
    /// Minutes.
    pub average_delivery_time: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub item: MenuItem,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryAddress {
    pub street: String,
    pub area: String,
    pub city: String,
    pub pincode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: i32,
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub kitchen_id: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub platform_fee: i64,
    pub total: i64,
    pub delivery_partner: Option<String>,
    pub delivery_address: DeliveryAddress,
    pub priority_delivery: bool,
    pub payment_reference: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrafficCondition {
    Light,
    Moderate,
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryRoute {
    /// Kilometres.
    pub distance: f64,
    /// Minutes.
    pub estimated_duration: i32,
    pub traffic_condition: TrafficCondition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    Open,
    Accepted,
    Rejected,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryBid {
    pub id: Uuid,
    pub order_id: Uuid,
    pub delivery_partner_id: String,
    pub bid_amount: i64,
    /// Minutes.
    pub estimated_time: i32,
    pub vehicle_type: VehicleType,
    pub delivery_route: DeliveryRoute,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl DeliveryBid {
    /// Status as observed at `now`; open bids past their deadline read as expired.
    pub fn status_at(&self, now: DateTime<Utc>) -> BidStatus {
        if self.status == BidStatus::Open && now >= self.expires_at {
            BidStatus::Expired
        } else {
            self.status
        }
    }
}
