use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use axum::{
    extract::DefaultBodyLimit,
    response::{Html, Json},
    routing::get,
    Router,
};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
};

use recipes::api::rest::{dto::HealthDto, register_routes, IdentityHeader};
use recipes::domain::service::Service;
use recipes::RecipesConfig;
use runtime::ServerConfig;

use crate::request_id;

pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

pub async fn serve_docs() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>Foodgram API</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/api/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}

/// Media must live under its own non-root prefix.
pub fn validate_media_url(media_url: &str) -> Result<()> {
    let trimmed = media_url.trim_end_matches('/');
    if !trimmed.starts_with('/') || trimmed.len() < 2 {
        bail!("modules.recipes.media_url must be an absolute non-root path (got '{media_url}')");
    }
    Ok(())
}

/// Assemble the HTTP surface: API routes, media files, health and the
/// middleware stack.
pub fn build_router(
    server: &ServerConfig,
    recipes_cfg: &RecipesConfig,
    service: Arc<Service>,
    identity: IdentityHeader,
    media_root: &Path,
) -> Result<Router> {
    validate_media_url(&recipes_cfg.media_url)?;

    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/api/docs", get(serve_docs));
    router = register_routes(router, service, identity);
    router = router.nest_service(
        recipes_cfg.media_url.trim_end_matches('/'),
        ServeDir::new(media_root),
    );

    // Layers added later wrap the earlier ones.
    let body_limit = server.body_limit_mb * 1024 * 1024;
    router = router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit));

    if server.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }
    if server.timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(server.timeout_sec)));
    }

    let x_request_id = request_id::header();
    router = router
        .layer(request_id::create_trace_layer())
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

    Ok(router)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("HTTP server shutting down gracefully");
}

pub async fn serve(addr: SocketAddr, router: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use recipes::domain::service::ServiceConfig;
    use recipes::infra::media::FsImageStore;
    use recipes::infra::storage::{migrations::Migrator, SeaOrmRecipesRepository};
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;
    use tower::ServiceExt;

    async fn test_router(media_root: &Path) -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let recipes_cfg = RecipesConfig::default();
        let service = Arc::new(Service::new(
            Arc::new(SeaOrmRecipesRepository::new(db)),
            Arc::new(FsImageStore::new(media_root, recipes_cfg.media_url.clone())),
            ServiceConfig::from(&recipes_cfg),
        ));
        build_router(
            &ServerConfig::default(),
            &recipes_cfg,
            service,
            IdentityHeader::default(),
            media_root,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok_with_request_id() {
        let media = tempfile::tempdir().unwrap();
        let router = test_router(media.path()).await;

        let resp = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn client_request_id_is_propagated() {
        let media = tempfile::tempdir().unwrap();
        let router = test_router(media.path()).await;

        let resp = router
            .oneshot(
                Request::get("/api/tags")
                    .header("x-request-id", "abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["x-request-id"], "abc123");
    }

    #[tokio::test]
    async fn uploaded_media_is_served() {
        let media = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(media.path().join("recipes")).unwrap();
        std::fs::write(media.path().join("recipes/a.png"), b"png").unwrap();
        let router = test_router(media.path()).await;

        let resp = router
            .oneshot(
                Request::get("/media/recipes/a.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"png");
    }

    #[test]
    fn media_url_must_be_a_prefix() {
        assert!(validate_media_url("/media").is_ok());
        assert!(validate_media_url("/media/").is_ok());
        assert!(validate_media_url("/").is_err());
        assert!(validate_media_url("media").is_err());
    }
}
