use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;

use models::item::{Item, ItemFields};
use models::role::Role;
use service::errors::ServiceError;

use crate::auth::{require_admin, ServerState};
use crate::errors::ApiError;

/// List items. Admins get the full stored records; regular users get the
/// `{id,name,price}` projection regardless of what else is stored.
pub async fn list_items(
    State(state): State<ServerState>,
    Extension(role): Extension<Role>,
) -> Result<Json<Value>, ApiError> {
    let items = state.items.list().await;
    let body = if role.is_admin() {
        serde_json::to_value(&items).map_err(ServiceError::from)?
    } else {
        Value::Array(items.iter().map(Item::public_view).collect())
    };
    Ok(Json(body))
}

/// Create an item with a store-assigned id. Admin only.
pub async fn create_item(
    State(state): State<ServerState>,
    Extension(role): Extension<Role>,
    Json(fields): Json<ItemFields>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    require_admin(role)?;
    let created = state.items.create(fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Shallow-merge the supplied fields onto an existing item. Admin only.
pub async fn update_item(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    Extension(role): Extension<Role>,
    Json(patch): Json<ItemFields>,
) -> Result<Json<Item>, ApiError> {
    require_admin(role)?;
    let updated = state.items.update(id, patch).await?;
    Ok(Json(updated))
}

/// Delete an item. Admin only; 204 with empty body on success.
pub async fn delete_item(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    Extension(role): Extension<Role>,
) -> Result<StatusCode, ApiError> {
    require_admin(role)?;
    state.items.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
