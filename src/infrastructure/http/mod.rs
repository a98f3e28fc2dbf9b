pub mod request_id;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::controllers::{drill::DrillController, health};
use crate::domain::storage::ContentPersister;
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Static mount for locally stored artifacts
#[derive(Debug, Clone)]
pub struct MediaMount {
    pub route: String,
    pub root: PathBuf,
}

pub fn build_router(
    drill_controller: Arc<DrillController>,
    persister: Arc<ContentPersister>,
    media: Option<MediaMount>,
) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(persister);

    let drill_routes = Router::new()
        .route(
            "/api/drills",
            post(DrillController::render).delete(DrillController::discard),
        )
        .route("/api/drills/url", get(DrillController::signed_url))
        .with_state(drill_controller);

    let mut app = Router::new().merge(health_routes).merge(drill_routes);

    if let Some(media) = media {
        tracing::info!(route = %media.route, root = %media.root.display(), "Serving local media");
        app = app.nest_service(&media.route, ServeDir::new(media.root));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(request_id_middleware)),
    )
}

/// Bind and serve until the process is stopped
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
