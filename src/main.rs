//! # AICTE Portal
//!
//! Serves the portal's GraphQL API along with uploaded proof documents.

use std::net::SocketAddr;

use aicte_portal::config::Config;
use aicte_portal::error::{PortalError, PortalResult};
use aicte_portal::file::UPLOADS_ROUTE;
use aicte_portal::graphql::{build_schema, PortalSchema, User};
use aicte_portal::util::connect_to_db;
use anyhow::Context;
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql::{Request, Response};
use axum::extract::Extension;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Html;
use axum::routing::{get, get_service};
use axum::{Json, Router};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const PORTAL_TOKEN: &str = "PORTAL_TOKEN";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let pool = connect_to_db(&config.database_url).await?;
    let uploads = get_service(ServeDir::new(&config.upload_dir)).handle_error(upload_error);

    let app = Router::new()
        .route("/", get(playground).post(query))
        .nest(UPLOADS_ROUTE, uploads)
        .layer(Extension(build_schema()))
        .layer(Extension(pool))
        .layer(Extension(config.clone()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, upload_dir = %config.upload_dir.display(), "portal listening");

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .context("Server stopped unexpectedly")
}

async fn query(
    Extension(schema): Extension<PortalSchema>,
    Extension(pool): Extension<PgPool>,
    Extension(config): Extension<Config>,
    headers: HeaderMap,
    Json(request): Json<Request>,
) -> PortalResult<Json<Response>> {
    let user = match get_token(&headers)? {
        Some(token) => Some(User::with_token(token, &config, &pool).await?),
        None => None,
    };

    let request = request.data(pool).data(config);
    let request = if let Some(user) = user {
        user.attach_to(request)
    } else {
        request
    };

    Ok(Json(schema.execute(request).await))
}

async fn playground(headers: HeaderMap) -> PortalResult<Html<String>> {
    let mut config = GraphQLPlaygroundConfig::new("/");
    if let Some(token) = get_token(&headers)? {
        config = config.with_header(PORTAL_TOKEN, token);
    }

    Ok(Html(playground_source(config)))
}

async fn upload_error(error: std::io::Error) -> (StatusCode, String) {
    tracing::error!(%error, "failed to serve upload");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to serve file: {}", error),
    )
}

fn get_token(headers: &HeaderMap) -> PortalResult<Option<&str>> {
    headers
        .get(PORTAL_TOKEN)
        .map(|value| value.to_str().map_err(PortalError::InvalidTokenHeader))
        .transpose()
}
