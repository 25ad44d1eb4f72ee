#![allow(dead_code)]

use cloud_kitchen_api::{
    dto::auth::{DeliveryRegistration, KitchenRegistration, RegisterRequest},
    middleware::auth::{AuthUser, decode_token},
    models::{DeliveryAddress, Role},
    services::auth_service::register_user,
    state::AppState,
};

pub const SECRET: &str = "test-secret";

pub async fn state() -> anyhow::Result<AppState> {
    Ok(AppState::in_memory(SECRET).await?)
}

pub fn request(email: &str, role: Role) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        password: "secret".into(),
        name: "Test User".into(),
        phone: None,
        role,
        avatar: None,
        kitchen: None,
        delivery: None,
    }
}

/// Registers and returns the identity the bearer token decodes to.
pub async fn register(state: &AppState, request: RegisterRequest) -> anyhow::Result<AuthUser> {
    let resp = register_user(state, request).await?;
    let token = resp.data.expect("auth data").token;
    let raw = token.strip_prefix("Bearer ").expect("bearer prefix");
    Ok(decode_token(raw, SECRET)?)
}

pub async fn customer(state: &AppState, email: &str) -> anyhow::Result<AuthUser> {
    register(state, request(email, Role::Customer)).await
}

pub async fn admin(state: &AppState) -> anyhow::Result<AuthUser> {
    register(state, request("admin@example.com", Role::Admin)).await
}

pub async fn kitchen_staff(state: &AppState, kitchen_id: &str) -> anyhow::Result<AuthUser> {
    let mut req = request(&format!("staff-{kitchen_id}@example.com"), Role::Kitchen);
    req.kitchen = Some(KitchenRegistration {
        kitchen_id: Some(kitchen_id.into()),
        ..Default::default()
    });
    register(state, req).await
}

pub async fn rider(state: &AppState, partner_id: &str) -> anyhow::Result<AuthUser> {
    let mut req = request(&format!("rider-{partner_id}@example.com"), Role::Delivery);
    req.delivery = Some(DeliveryRegistration {
        partner_id: Some(partner_id.into()),
        ..Default::default()
    });
    register(state, req).await
}

pub fn address() -> DeliveryAddress {
    DeliveryAddress {
        street: "42 Brigade Road".into(),
        area: "Ashok Nagar".into(),
        city: "Bengaluru".into(),
        pincode: "560025".into(),
    }
}
