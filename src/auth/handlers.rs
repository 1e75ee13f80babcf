use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, TokenResponse},
        password,
        repo::{NewUser, User},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let Json(payload) = payload?;

    let hash = password::hash(payload.password).await.map_err(|e| {
        error!(error = %e, "hash_password failed");
        AppError::internal(e)
    })?;

    let user = state
        .users
        .create(NewUser {
            full_name: payload.full_name,
            username: payload.username,
            password_hash: hash,
            role: None,
        })
        .await
        .map_err(|e| {
            error!(error = %e, "create user failed");
            AppError::validation(e)
        })?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(payload) = payload?;

    let user = match state.users.find_by_username(&payload.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(username = %payload.username, "login unknown username");
            return Err(AppError::UserNotFound);
        }
        Err(e) => {
            error!(error = %e, "find_by_username failed");
            return Err(e.into());
        }
    };

    // an unparsable stored digest is reported the same way as a mismatch
    let ok = password::verify(payload.password, user.password.clone())
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, user_id = %user.id, "verify_password failed");
            false
        });

    if !ok {
        warn!(username = %payload.username, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidPassword);
    }

    let token = state.keys.sign(&user).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::internal(e)
    })?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(TokenResponse { token }))
}
