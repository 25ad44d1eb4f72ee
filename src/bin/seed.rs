use cloud_kitchen_api::{
    config::AppConfig,
    dto::auth::{DeliveryRegistration, KitchenRegistration, RegisterRequest},
    models::{Role, VehicleType},
    services::auth_service::register_user,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    if config.data_dir.is_none() {
        anyhow::bail!("DATA_DIR must be set; seeding an in-memory store has no effect");
    }

    let state = AppState::from_config(&config).await?;

    ensure_user(&state, demo("customer@example.com", "Demo Customer", Role::Customer)).await?;
    ensure_user(&state, demo("admin@example.com", "Demo Admin", Role::Admin)).await?;

    let mut kitchen = demo("kitchen@example.com", "Spice Route Staff", Role::Kitchen);
    kitchen.kitchen = Some(KitchenRegistration {
        kitchen_id: Some("ck-1".into()),
        kitchen_name: Some("Spice Route Kitchen".into()),
        kitchen_address: Some("12 MG Road, Bengaluru".into()),
        fssai_license: Some("10012345000123".into()),
        gst_number: Some("29ABCDE1234F1Z5".into()),
        cuisine: vec!["Indian".into()],
    });
    ensure_user(&state, kitchen).await?;

    let mut rider = demo("rider@example.com", "Demo Rider", Role::Delivery);
    rider.delivery = Some(DeliveryRegistration {
        partner_id: Some("dp-1".into()),
        vehicle_type: Some(VehicleType::Motorcycle),
        license_number: Some("KA0120230001234".into()),
        aadhar_number: Some("1234 5678 9012".into()),
    });
    ensure_user(&state, rider).await?;

    println!("Seed completed.");
    Ok(())
}

fn demo(email: &str, name: &str, role: Role) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        password: "demo".into(),
        name: name.into(),
        phone: Some("+91 98765 43210".into()),
        role,
        avatar: None,
        kitchen: None,
        delivery: None,
    }
}

async fn ensure_user(state: &AppState, request: RegisterRequest) -> anyhow::Result<()> {
    let email = request.email.clone();
    let role = request.role;
    let exists = state
        .store
        .users
        .read()
        .await
        .iter()
        .any(|u| u.email == email);
    if exists {
        println!("User {email} already present");
        return Ok(());
    }

    register_user(state, request).await?;
    println!("Ensured user {email} (role={role})");
    Ok(())
}
