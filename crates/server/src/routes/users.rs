use axum::{extract::State, http::StatusCode, Json};

use models::user::User;

use crate::auth::ServerState;
use crate::errors::ApiError;

/// Register a new user. Open route: registration happens before any
/// credential exists, so it sits outside the API-key layer.
pub async fn register_user(
    State(state): State<ServerState>,
    Json(user): Json<User>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    state.users.register(user).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"message": "User created successfully"})),
    ))
}
