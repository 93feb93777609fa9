use std::sync::Arc;

use models::user::User;
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::json_array_store::JsonArrayStore;

/// File-backed store for registered users.
///
/// Users are append-only: registration is the only mutation, and the
/// uniqueness check runs under the same write lock as the append so two
/// concurrent registrations of the same name cannot both pass.
#[derive(Clone)]
pub struct UserStore {
    store: Arc<JsonArrayStore<User>>,
}

impl UserStore {
    /// Initialize the store from the given file path. A missing or
    /// unreadable file starts the collection empty.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Arc<Self> {
        let store = JsonArrayStore::<User>::new(path).await;
        Arc::new(Self { store })
    }

    /// All registered users in registration order.
    pub async fn list(&self) -> Vec<User> {
        self.store.list().await
    }

    /// Exact-match linear scan on `username`.
    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        self.store
            .read(|users| users.iter().find(|u| u.username == username).cloned())
            .await
    }

    /// Append the user and persist, failing if the username is taken.
    pub async fn register(&self, user: User) -> Result<(), ServiceError> {
        let username = user.username.clone();
        self.store
            .update(move |users| {
                if users.iter().any(|u| u.username == user.username) {
                    return Err(ServiceError::DuplicateUsername);
                }
                users.push(user);
                Ok(())
            })
            .await?;
        info!(%username, "user registered");
        Ok(())
    }
}
