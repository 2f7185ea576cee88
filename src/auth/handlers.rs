use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, ProfileResponse, PublicUser, RefreshRequest,
            RegisterRequest,
        },
        repo::NewUser,
        repo_types::User,
        services::{
            hash_password, is_email_identifier, is_valid_email, is_valid_username,
            verify_password, AuthUser, JwtKeys,
        },
    },
    error::{is_unique_violation, ApiError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me", delete(delete_me))
}

fn sign_pair(keys: &JwtKeys, user: &User) -> Result<AuthResponse, ApiError> {
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        },
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_username(&payload.username) {
        warn!(username = %payload.username, "invalid username");
        return Err(ApiError::BadRequest(
            "username must be 3-32 characters (letters, digits, _ or -)".into(),
        ));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::BadRequest("password too short".into()));
    }

    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username taken");
        return Err(ApiError::Conflict("username already registered".into()));
    }
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;

    let user = User::create(
        &state.db,
        NewUser {
            username: &payload.username,
            email: &payload.email,
            password_hash: &hash,
            full_name: payload.full_name.as_deref(),
            phone: payload.phone.as_deref(),
            address: payload.address.as_deref(),
        },
    )
    .await
    .map_err(|e| {
        // race between the pre-check and the insert
        if is_unique_violation(&e) {
            ApiError::Conflict("username or email already registered".into())
        } else {
            ApiError::from(e)
        }
    })?;

    let keys = JwtKeys::from_ref(&state);
    let response = sign_pair(&keys, &user)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let identifier = payload.identifier.trim().to_string();

    let user = if is_email_identifier(&identifier) {
        User::find_by_email(&state.db, &identifier.to_lowercase()).await?
    } else {
        User::find_by_username(&state.db, &identifier).await?
    };
    let user = match user {
        Some(u) => u,
        None => {
            warn!(identifier = %identifier, "login unknown identifier");
            return Err(ApiError::Unauthorized("invalid credentials".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(identifier = %identifier, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let response = sign_pair(&keys, &user)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("user not found".into()))?;

    let response = sign_pair(&keys, &user)?;
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("user not found".into()))?;

    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        full_name: user.full_name,
        phone: user.phone,
        address: user.address,
    }))
}

#[instrument(skip(state))]
pub async fn delete_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, ApiError> {
    if !User::delete(&state.db, user_id).await? {
        return Err(ApiError::NotFound("user not found".into()));
    }
    info!(user_id = %user_id, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod dto_tests {
    use super::*;

    #[test]
    fn public_user_serialization() {
        let response = PublicUser {
            id: uuid::Uuid::new_v4(),
            username: "budi".to_string(),
            email: "budi@desa.id".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("budi@desa.id"));
        assert!(json.contains("id"));
    }

    #[test]
    fn login_accepts_username_or_email_identifier() {
        let by_username: LoginRequest =
            serde_json::from_str(r#"{"username":"budi","password":"pw"}"#).unwrap();
        assert_eq!(by_username.identifier, "budi");

        let by_email: LoginRequest =
            serde_json::from_str(r#"{"identifier":"budi@desa.id","password":"pw"}"#).unwrap();
        assert!(is_email_identifier(&by_email.identifier));
    }
}
