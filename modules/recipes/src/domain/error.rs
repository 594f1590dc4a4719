use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Authentication credentials were not provided")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i32 },

    #[error("{message}")]
    AlreadyExists { message: String },

    #[error("{message}")]
    RelationNotFound { message: String },

    #[error("Invalid short-link token")]
    InvalidToken,

    #[error("Shopping cart is empty")]
    EmptyShoppingCart,

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn recipe_not_found(id: i32) -> Self {
        Self::NotFound {
            entity: "Recipe",
            id,
        }
    }

    pub fn user_not_found(id: i32) -> Self {
        Self::NotFound { entity: "User", id }
    }

    pub fn tag_not_found(id: i32) -> Self {
        Self::NotFound { entity: "Tag", id }
    }

    pub fn ingredient_not_found(id: i32) -> Self {
        Self::NotFound {
            entity: "Ingredient",
            id,
        }
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            message: message.into(),
        }
    }

    pub fn relation_not_found(message: impl Into<String>) -> Self {
        Self::RelationNotFound {
            message: message.into(),
        }
    }

    pub fn invalid_token() -> Self {
        Self::InvalidToken
    }

    pub fn empty_shopping_cart() -> Self {
        Self::EmptyShoppingCart
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// True for failures caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Database { .. } | Self::Storage { .. })
    }
}
