use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}
