mod common;

use cloud_kitchen_api::{
    dto::auth::{DeliveryRegistration, KitchenRegistration, LoginRequest},
    error::AppError,
    middleware::auth::decode_token,
    models::{Role, VehicleType},
    routes::params::UserListQuery,
    services::{admin_service, auth_service},
};

#[tokio::test]
async fn register_then_login_with_matching_role() -> anyhow::Result<()> {
    let state = common::state().await?;
    let registered = common::customer(&state, "Priya@Example.com").await?;

    let resp = auth_service::login_user(
        &state,
        LoginRequest {
            email: "  priya@example.com ".into(),
            password: "anything".into(),
            role: Role::Customer,
        },
    )
    .await?;
    let auth = resp.data.expect("auth");
    assert_eq!(auth.user.id, registered.user_id);
    assert_eq!(auth.user.email, "priya@example.com");
    assert!(auth.user.avatar.contains("ui-avatars.com"));

    let token = auth.token.strip_prefix("Bearer ").expect("bearer prefix");
    let decoded = decode_token(token, common::SECRET)?;
    assert_eq!(decoded.user_id, registered.user_id);
    assert_eq!(decoded.role, Role::Customer);

    let me = auth_service::current_user(&state, &decoded).await?.data.expect("user");
    assert_eq!(me.role, Role::Customer);
    Ok(())
}

#[tokio::test]
async fn login_requires_the_registered_role() -> anyhow::Result<()> {
    let state = common::state().await?;
    common::customer(&state, "diner@example.com").await?;

    let wrong_role = auth_service::login_user(
        &state,
        LoginRequest {
            email: "diner@example.com".into(),
            password: "x".into(),
            role: Role::Kitchen,
        },
    )
    .await;
    assert!(matches!(wrong_role, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn duplicate_and_invalid_registrations_fail() -> anyhow::Result<()> {
    let state = common::state().await?;
    common::customer(&state, "twice@example.com").await?;

    let dup = auth_service::register_user(&state, common::request("TWICE@example.com", Role::Delivery)).await;
    assert!(matches!(dup, Err(AppError::BadRequest(_))));
    let matching = state
        .store
        .users
        .read()
        .await
        .iter()
        .filter(|u| u.email == "twice@example.com")
        .count();
    assert_eq!(matching, 1);

    let no_at = auth_service::register_user(&state, common::request("not-an-email", Role::Customer)).await;
    assert!(matches!(no_at, Err(AppError::BadRequest(_))));

    let mut ghost_kitchen = common::request("ghost@example.com", Role::Kitchen);
    ghost_kitchen.kitchen = Some(KitchenRegistration {
        kitchen_id: Some("ck-404".into()),
        ..Default::default()
    });
    let ghost = auth_service::register_user(&state, ghost_kitchen).await;
    assert!(matches!(ghost, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn role_profiles_are_attached() -> anyhow::Result<()> {
    let state = common::state().await?;
    let mut req = common::request("cyclist@example.com", Role::Delivery);
    req.delivery = Some(DeliveryRegistration {
        vehicle_type: Some(VehicleType::Cycle),
        ..Default::default()
    });
    let user = auth_service::register_user(&state, req)
        .await?
        .data
        .expect("auth")
        .user;

    let profile = user.delivery.expect("delivery profile");
    assert_eq!(profile.vehicle_type, VehicleType::Cycle);
    assert!(profile.partner_id.is_none());
    assert!(user.kitchen.is_none());
    Ok(())
}

#[tokio::test]
async fn tokens_and_roles_gate_access() -> anyhow::Result<()> {
    let state = common::state().await?;
    let customer = common::customer(&state, "plain@example.com").await?;
    let admin = common::admin(&state).await?;

    let denied = admin_service::list_users(&state, &customer, UserListQuery::default()).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let users = admin_service::list_users(
        &state,
        &admin,
        UserListQuery {
            role: Some(Role::Customer),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("users");
    assert_eq!(users.items.len(), 1);

    let forged = decode_token("not.a.jwt", common::SECRET);
    assert!(matches!(forged, Err(AppError::Unauthorized(_))));
    Ok(())
}
