//! HTTP server rendering pages on every request

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::pages::{self, PostPage};
use crate::Blog;

/// Build the application router, mounted under the configured `root`
pub fn router(blog: Arc<Blog>) -> Router {
    let mut app = Router::new()
        .route("/", get(home_handler))
        .route("/posts", get(listing_handler))
        .route("/posts/", get(listing_handler))
        .route("/posts/:slug", get(post_handler));

    let public_dir = blog.public_dir();
    if public_dir.is_dir() {
        tracing::debug!("Serving static files from {:?}", public_dir);
        app = app.nest_service("/public", ServeDir::new(public_dir));
    }

    let root = blog.config.root.trim_matches('/');
    if !root.is_empty() {
        let prefix = format!("/{}", root);
        tracing::debug!("Mounting pages under {}", prefix);
        // Nested "/" only answers the bare prefix
        app = Router::new()
            .route(&format!("{}/", prefix), get(home_handler))
            .nest(&prefix, app);
    }

    app.fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(blog)
}

/// Start the server
pub async fn start(blog: Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(Arc::new(blog));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home_handler(State(blog): State<Arc<Blog>>) -> Result<Html<String>, ServerError> {
    Ok(Html(pages::home(&blog).await?))
}

async fn listing_handler(State(blog): State<Arc<Blog>>) -> Result<Html<String>, ServerError> {
    Ok(Html(pages::listing(&blog).await?))
}

async fn post_handler(
    State(blog): State<Arc<Blog>>,
    Path(slug): Path<String>,
) -> Result<Response, ServerError> {
    let response = match pages::post(&blog, Some(&slug)).await? {
        PostPage::Found(html) => Html(html).into_response(),
        PostPage::NotFound => {
            (StatusCode::NOT_FOUND, Html(pages::render_not_found(&blog)?)).into_response()
        }
        PostPage::Unavailable => (
            StatusCode::BAD_GATEWAY,
            Html(pages::render_unavailable(&blog)?),
        )
            .into_response(),
    };
    Ok(response)
}

async fn not_found_handler(State(blog): State<Arc<Blog>>) -> Result<Response, ServerError> {
    Ok((StatusCode::NOT_FOUND, Html(pages::render_not_found(&blog)?)).into_response())
}

/// A page that could not be rendered
pub struct ServerError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ServerError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!("Failed to render page: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
    }
}
