use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse, ValidationError};
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.foodgram.dev/{}", code.to_lowercase()))
        .with_code(code)
        .with_instance(instance);

    // Correlate with the request span when one is active
    let problem = if let Some(id) = tracing::Span::current().id() {
        problem.with_request_id(id.into_u64().to_string())
    } else {
        problem
    };

    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::Validation { field, message } => {
            let mut resp = from_parts(
                StatusCode::BAD_REQUEST,
                "RECIPES_VALIDATION",
                "Validation error",
                format!("{field}: {message}"),
                instance,
            );
            resp.0 = resp.0.with_errors(vec![ValidationError {
                detail: message.clone(),
                pointer: format!("/{field}"),
            }]);
            resp
        }
        DomainError::Unauthorized => from_parts(
            StatusCode::UNAUTHORIZED,
            "RECIPES_UNAUTHORIZED",
            "Unauthorized",
            e.to_string(),
            instance,
        ),
        DomainError::Forbidden { message } => from_parts(
            StatusCode::FORBIDDEN,
            "RECIPES_FORBIDDEN",
            "Forbidden",
            message.clone(),
            instance,
        ),
        DomainError::NotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "RECIPES_NOT_FOUND",
            "Not found",
            e.to_string(),
            instance,
        ),
        DomainError::AlreadyExists { message } => from_parts(
            StatusCode::BAD_REQUEST,
            "RECIPES_ALREADY_EXISTS",
            "Already exists",
            message.clone(),
            instance,
        ),
        DomainError::RelationNotFound { message } => from_parts(
            StatusCode::BAD_REQUEST,
            "RECIPES_RELATION_NOT_FOUND",
            "Relation not found",
            message.clone(),
            instance,
        ),
        DomainError::InvalidToken => from_parts(
            StatusCode::BAD_REQUEST,
            "RECIPES_INVALID_TOKEN",
            "Invalid token",
            e.to_string(),
            instance,
        ),
        DomainError::EmptyShoppingCart => from_parts(
            StatusCode::BAD_REQUEST,
            "RECIPES_EMPTY_SHOPPING_CART",
            "Empty shopping cart",
            e.to_string(),
            instance,
        ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
        DomainError::Storage { .. } => {
            tracing::error!(error = ?e, "Media storage error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_STORAGE",
                "Internal error",
                "An internal storage error occurred",
                instance,
            )
        }
    }
}

/// Malformed JSON body or wrong content type.
pub fn json_rejection(rejection: &JsonRejection, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "RECIPES_INVALID_BODY",
        "Invalid request body",
        rejection.body_text(),
        instance,
    )
}

pub fn query_rejection(rejection: &QueryRejection, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "RECIPES_INVALID_QUERY",
        "Invalid query string",
        rejection.body_text(),
        instance,
    )
}

/// Non-numeric ids in the path are reported as missing resources.
pub fn path_rejection(rejection: &PathRejection, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::NOT_FOUND,
        "RECIPES_NOT_FOUND",
        "Not found",
        rejection.body_text(),
        instance,
    )
}
