//! `api` crate — server-rendered HTML surface of the tool inventory.
//!
//! Exposes:
//!   GET  /                    GET  /categories
//!   GET  /show?id=            GET  /categories/new
//!   GET  /new                 POST /categories/insert
//!   GET  /edit?id=            GET  /categories/edit?id=
//!   POST /insert              POST /categories/update
//!   POST /update              GET  /categories/delete?id=
//!   GET  /delete?id=

pub mod error;
pub mod handlers;
pub mod views;

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use db::DbPool;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{info, warn};

pub use error::{ApiError, ApiResult};
pub use handlers::AppState;

use handlers::{categories, tools};

/// Build the router with every route and the request middleware.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        // Tools
        .route("/", get(tools::index))
        .route("/show", get(tools::show))
        .route("/new", get(tools::new_form))
        .route("/edit", get(tools::edit_form))
        .route("/insert", post(tools::insert))
        .route("/update", post(tools::update))
        .route("/delete", get(tools::delete))
        // Categories
        .route("/categories", get(categories::list))
        .route("/categories/new", get(categories::new_form))
        .route("/categories/insert", post(categories::insert))
        .route("/categories/edit", get(categories::edit_form))
        .route("/categories/update", post(categories::update))
        .route("/categories/delete", get(categories::delete))
        .with_state(state)
        .layer(middleware::from_fn_with_state(request_timeout, enforce_timeout))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Abort requests that run past `limit` and answer with the error view.
async fn enforce_timeout(State(limit): State<Duration>, request: Request, next: Next) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => ApiError::Timeout(limit).into_response(),
    }
}

/// Serve the inventory on `bind` until Ctrl-C or SIGTERM.
pub async fn serve(bind: &str, pool: DbPool, request_timeout: Duration) -> std::io::Result<()> {
    let app = router(AppState::new(pool), request_timeout);
    let listener = TcpListener::bind(bind).await?;
    info!("Server started on: http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C, shutting down"),
        _ = terminate => warn!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod routes_tests;
