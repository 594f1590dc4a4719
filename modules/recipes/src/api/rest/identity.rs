//! Caller identity as forwarded by the upstream authentication collaborator.
//!
//! The auth layer in front of this service resolves the session and passes the
//! numeric user id in a configurable header. No header means an anonymous
//! caller; a header that does not hold a positive integer is rejected with 401.

use axum::{
    extract::FromRequestParts,
    http::{header::HeaderName, request::Parts, StatusCode},
};

use crate::api::rest::error::from_parts;
use crate::api::rest::problem::ProblemResponse;
use crate::contract::model::Viewer;

pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";

/// Name of the identity header, injected into the router as an extension.
#[derive(Debug, Clone)]
pub struct IdentityHeader(pub HeaderName);

impl IdentityHeader {
    pub fn new(name: &str) -> anyhow::Result<Self> {
        let name = HeaderName::from_bytes(name.trim().to_ascii_lowercase().as_bytes())
            .map_err(|e| anyhow::anyhow!("invalid identity header name '{name}': {e}"))?;
        Ok(Self(name))
    }
}

impl Default for IdentityHeader {
    fn default() -> Self {
        Self(HeaderName::from_static(DEFAULT_IDENTITY_HEADER))
    }
}

/// Extractor yielding the request's [`Viewer`].
#[derive(Debug, Clone, Copy)]
pub struct CurrentViewer(pub Viewer);

impl<S> FromRequestParts<S> for CurrentViewer
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .extensions
            .get::<IdentityHeader>()
            .cloned()
            .unwrap_or_default();

        let Some(raw) = parts.headers.get(&header.0) else {
            return Ok(Self(Viewer::anonymous()));
        };
        let raw = raw.to_str().map(str::trim).unwrap_or("\u{0}");
        if raw.is_empty() {
            return Ok(Self(Viewer::anonymous()));
        }

        match raw.parse::<i32>() {
            Ok(id) if id > 0 => Ok(Self(Viewer::user(id))),
            _ => {
                tracing::warn!(header = %header.0, "Rejecting malformed identity header");
                Err(from_parts(
                    StatusCode::UNAUTHORIZED,
                    "RECIPES_UNAUTHORIZED",
                    "Unauthorized",
                    "Invalid identity header",
                    parts.uri.path(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<Viewer, ProblemResponse> {
        let (mut parts, _) = req.into_parts();
        CurrentViewer::from_request_parts(&mut parts, &())
            .await
            .map(|CurrentViewer(v)| v)
    }

    #[tokio::test]
    async fn missing_header_is_anonymous() {
        let viewer = extract(Request::builder().uri("/").body(()).unwrap())
            .await
            .unwrap();
        assert!(viewer.is_anonymous());
    }

    #[tokio::test]
    async fn numeric_header_identifies_the_user() {
        let req = Request::builder()
            .uri("/")
            .header("x-user-id", " 42 ")
            .body(())
            .unwrap();
        assert_eq!(extract(req).await.unwrap().id(), Some(42));
    }

    #[tokio::test]
    async fn malformed_header_is_unauthorized() {
        for bad in ["abc", "-1", "0", "1.5"] {
            let req = Request::builder()
                .uri("/api/users/me")
                .header("x-user-id", bad)
                .body(())
                .unwrap();
            let err = extract(req).await.unwrap_err();
            assert_eq!(err.0.status, 401, "{bad}");
            assert_eq!(err.0.instance, "/api/users/me");
        }
    }

    #[tokio::test]
    async fn configured_header_name_is_honoured() {
        let mut req = Request::builder()
            .uri("/")
            .header("x-remote-user", "7")
            .header("x-user-id", "9")
            .body(())
            .unwrap();
        req.extensions_mut()
            .insert(IdentityHeader::new("X-Remote-User").unwrap());
        assert_eq!(extract(req).await.unwrap().id(), Some(7));
    }

    #[test]
    fn rejects_invalid_header_names() {
        assert!(IdentityHeader::new("bad header").is_err());
    }
}
