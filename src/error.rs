use thiserror::Error;

/// Errors raised while handling a single row event.
///
/// None of these outlive the event that produced them; the caller logs or
/// reports them and moves on to the next event.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("No field at column {0}")]
    PositionNotFound(usize),

    #[error("Invalid column layout: {0}")]
    InvalidLayout(String),

    #[error("Failed to parse metadata payload: {0}")]
    MetadataParse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl SyncError {
    pub fn field_not_found(name: impl Into<String>) -> Self {
        Self::FieldNotFound(name.into())
    }

    pub fn invalid_value(field: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
