use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use models::role::Role;
use service::{accounts::UserStore, catalog::ItemStore};

use crate::errors::ApiError;

/// Header carrying the shared-secret credential.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<UserStore>,
    pub items: Arc<ItemStore>,
}

/// Middleware: resolve `x-api-key` to a [`Role`] and attach it to the
/// request. An absent or empty header is rejected with 401; registration
/// routes are mounted outside this layer.
pub async fn require_api_key(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let role = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(Role::from_credential)
        .ok_or(ApiError::MissingApiKey)?;

    req.extensions_mut().insert(role);
    Ok(next.run(req).await)
}

/// Guard for mutating item routes: anyone who is not admin gets 403.
pub fn require_admin(role: Role) -> Result<(), ApiError> {
    if role.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
