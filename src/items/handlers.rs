use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::{dto::ItemPayload, repo::Item};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/shopitems", get(list_items).post(create_item))
        .route(
            "/shopitems/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
}

/// Ids that are not UUIDs are a store-level failure, not a miss.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|e| AppError::Internal(format!("invalid item id {raw:?}: {e}")))
}

#[instrument(skip(state))]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, AppError> {
    let items = state.items.list().await.map_err(|e| {
        error!(error = %e, "list items failed");
        AppError::from(e)
    })?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, AppError> {
    let id = parse_id(&id)?;
    match state.items.get(id).await {
        Ok(Some(item)) => Ok(Json(item)),
        Ok(None) => Err(AppError::NotFound),
        Err(e) => {
            error!(error = %e, %id, "get item failed");
            Err(e.into())
        }
    }
}

#[instrument(skip(state, user, payload))]
pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    user.require_admin()?;
    let Json(payload) = payload?;

    let item = state.items.create(payload).await.map_err(|e| {
        error!(error = %e, "create item failed");
        AppError::validation(e)
    })?;

    info!(item_id = %item.id, user_id = %user.user_id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state, user, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    user.require_admin()?;
    let id = parse_id(&id)?;
    let Json(patch) = payload?;

    match state.items.update(id, patch).await {
        Ok(Some(item)) => {
            info!(item_id = %item.id, user_id = %user.user_id, "item updated");
            Ok(Json(item))
        }
        Ok(None) => Err(AppError::NotFound),
        Err(e) => {
            error!(error = %e, %id, "update item failed");
            Err(e.into())
        }
    }
}

#[instrument(skip(state, user))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;
    let id = parse_id(&id)?;

    match state.items.delete(id).await {
        Ok(true) => {
            info!(item_id = %id, user_id = %user.user_id, "item deleted");
            Ok(Json(json!({ "message": "Item deleted" })))
        }
        Ok(false) => Err(AppError::NotFound),
        Err(e) => {
            error!(error = %e, %id, "delete item failed");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_uuids_only() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);

        let err = parse_id("42").unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("invalid item id"));
    }
}
