use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{AuthResponse, Claims, LoginRequest, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeliveryProfile, KitchenProfile, Role, User, VehicleType},
    response::{ApiResponse, Meta},
    state::AppState,
};

const TOKEN_TTL_HOURS: i64 = 24;

pub fn issue_token(secret: &str, user: &User) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.as_str().to_string(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok(format!("Bearer {}", token))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn default_avatar(name: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("https://ui-avatars.com/api/?name={encoded}&background=random")
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let RegisterRequest {
        email,
        password,
        name,
        phone,
        role,
        avatar,
        kitchen,
        delivery,
    } = payload;

    let email = normalize_email(&email);
    if !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".into()));
    }
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".into()));
    }
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }

    let kitchen = match role {
        Role::Kitchen => {
            let k = kitchen.unwrap_or_default();
            if let Some(id) = k.kitchen_id.as_deref() {
                if state.catalog.kitchen(id).is_none() {
                    return Err(AppError::BadRequest(format!("Unknown kitchen {id}")));
                }
            }
            Some(KitchenProfile {
                kitchen_id: k.kitchen_id,
                kitchen_name: k.kitchen_name.unwrap_or_default(),
                kitchen_address: k.kitchen_address.unwrap_or_default(),
                fssai_license: k.fssai_license.unwrap_or_default(),
                gst_number: k.gst_number.unwrap_or_default(),
                cuisine: k.cuisine,
            })
        }
        _ => None,
    };

    let delivery = match role {
        Role::Delivery => {
            let d = delivery.unwrap_or_default();
            if let Some(id) = d.partner_id.as_deref() {
                if state.catalog.partner(id).is_none() {
                    return Err(AppError::BadRequest(format!("Unknown delivery partner {id}")));
                }
            }
            Some(DeliveryProfile {
                partner_id: d.partner_id,
                vehicle_type: d.vehicle_type.unwrap_or(VehicleType::Motorcycle),
                license_number: d.license_number.unwrap_or_default(),
                aadhar_number: d.aadhar_number.unwrap_or_default(),
            })
        }
        _ => None,
    };

    let user = state
        .store
        .update_users(|users| {
            if users.iter().any(|u| u.email == email) {
                return Err(AppError::BadRequest("Email is already taken".to_string()));
            }

            let user = User {
                id: Uuid::new_v4(),
                email,
                avatar: avatar
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or_else(|| default_avatar(&name)),
                name,
                phone: phone.unwrap_or_default(),
                role,
                created_at: Utc::now(),
                kitchen,
                delivery,
            };
            users.push(user.clone());
            Ok(user)
        })
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "user registered");

    if let Err(err) = log_audit(
        &state.store,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id, "role": user.role })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    // Registration signs the new user straight in.
    let token = issue_token(&state.jwt_secret, &user)?;
    Ok(ApiResponse::success(
        "User created",
        AuthResponse { token, user },
        None,
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    // Demo accounts: any password is accepted for a known email and role.
    let LoginRequest {
        email,
        password: _,
        role,
    } = payload;
    let email = normalize_email(&email);

    let user = state
        .store
        .users
        .read()
        .await
        .iter()
        .find(|u| u.email == email && u.role == role)
        .cloned();

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Invalid email or role".into())),
    };

    let token = issue_token(&state.jwt_secret, &user)?;

    if let Err(err) = log_audit(
        &state.store,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Logged in",
        AuthResponse { token, user },
        Some(Meta::empty()),
    ))
}

pub async fn find_user(state: &AppState, user_id: Uuid) -> AppResult<User> {
    state
        .store
        .users
        .read()
        .await
        .iter()
        .find(|u| u.id == user_id)
        .cloned()
        .ok_or(AppError::NotFound)
}

pub async fn current_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let found = find_user(state, user.user_id).await?;
    Ok(ApiResponse::success("OK", found, Some(Meta::empty())))
}
