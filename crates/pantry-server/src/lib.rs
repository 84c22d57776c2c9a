//! Pantry HTTP API.
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/health` | liveness + configured providers |
//! | GET | `/api/ai/search?q=` | natural-language search translation |
//! | POST | `/api/ai/recommend` | recommendation parameters |
//! | POST | `/api/ai/analyze` | recipe analysis |
//! | POST | `/api/ai/modify` | recipe modification |
//! | GET | `/api/recipes/{id}` | recipe lookup |
//! | GET | `/api/recipes/search` | recipe search |
//!
//! Errors are JSON `{error, message}` with 400, 404, 500 or 502.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub mod error;
pub mod routes;
pub mod state;

use routes::{
    ai_search_handler, analyze_handler, health_handler, modify_handler, recipe_handler,
    recipe_search_handler, recommend_handler, SOURCE_HEADER,
};
pub use state::State;

/// Build the application router.
pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .expose_headers([HeaderName::from_static(SOURCE_HEADER)])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/ai/search", get(ai_search_handler))
        .route("/api/ai/recommend", post(recommend_handler))
        .route("/api/ai/analyze", post(analyze_handler))
        .route("/api/ai/modify", post(modify_handler))
        .route("/api/recipes/search", get(recipe_search_handler))
        .route("/api/recipes/{id}", get(recipe_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<State>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if state.assistant.chain().is_empty() {
        warn!("No AI provider configured; search falls back, analyze/modify will fail");
    }

    let address = listener.local_addr()?;
    info!(
        providers = ?state.assistant.chain().names(),
        "Server running on {address}"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
