use thiserror::Error;

/// Errors that are safe to expose to other modules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipesError {
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Already exists: {message}")]
    AlreadyExists { message: String },

    #[error("Relation not found: {message}")]
    RelationNotFound { message: String },

    #[error("Invalid short-link token")]
    InvalidToken,

    #[error("Internal error")]
    Internal,
}

impl RecipesError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for RecipesError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            Validation { field, message } => Self::validation(field, message),
            Unauthorized => Self::Unauthorized,
            Forbidden { message } => Self::Forbidden { message },
            NotFound { entity, id } => Self::not_found(format!("{entity} {id}")),
            AlreadyExists { message } => Self::AlreadyExists { message },
            RelationNotFound { message } => Self::RelationNotFound { message },
            InvalidToken => Self::InvalidToken,
            EmptyShoppingCart => Self::validation("shopping_cart", "Shopping cart is empty"),
            Database { .. } | Storage { .. } => Self::internal(),
        }
    }
}
