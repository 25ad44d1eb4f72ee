use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Role, User, VehicleType};

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct KitchenRegistration {
    pub kitchen_id: Option<String>,
    pub kitchen_name: Option<String>,
    pub kitchen_address: Option<String>,
    pub fssai_license: Option<String>,
    pub gst_number: Option<String>,
    #[serde(default)]
    pub cuisine: Vec<String>,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct DeliveryRegistration {
    pub partner_id: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub license_number: Option<String>,
    pub aadhar_number: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub avatar: Option<String>,
    #[serde(default)]
    pub kitchen: Option<KitchenRegistration>,
    #[serde(default)]
    pub delivery: Option<DeliveryRegistration>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}
