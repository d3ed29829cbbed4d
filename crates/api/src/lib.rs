//! # Slotbook API
//!
//! HTTP layer of the slot booking engine. Providers publish recurring
//! weekly schedules that are expanded into concrete bookable slots;
//! clients query availability and book slots through a version-guarded
//! conditional write, so concurrent booking attempts never double-book.
//!
//! ## Architecture
//!
//! - **Routes**: API endpoints and URL structure
//! - **Handlers**: request processing logic
//! - **Middleware**: caller identity extraction and error mapping
//! - **Clients**: outbound call to the profile service
//! - **Config**: environment-based configuration
//!
//! The API uses Axum as the web framework; storage is reached only
//! through the injected [`SlotStore`] trait object.

/// Outbound service clients
pub mod clients;
/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for caller identity and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use slotbook_core::profile::ProfileLookup;
use slotbook_db::store::{PgSlotStore, SlotStore};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::clients::profile::HttpProfileLookup;

/// Shared application state that is accessible to all request handlers.
///
/// Both collaborators are injected as trait objects: handlers never see
/// a connection pool or an HTTP client directly, which keeps them
/// testable against in-memory implementations.
pub struct ApiState {
    /// Slot persistence
    pub slots: Arc<dyn SlotStore>,
    /// Display-name lookup against the profile service
    pub profiles: Arc<dyn ProfileLookup>,
}

/// Builds the application router over the given state.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Schedule publication endpoints
        .merge(routes::schedule::routes())
        // Availability query endpoints
        .merge(routes::availability::routes())
        // Booking endpoints
        .merge(routes::booking::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and database
/// connection: sets up logging, wires the store and profile client into
/// the router, and serves until shutdown.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let profiles = HttpProfileLookup::new(config.profile_service_url.clone())
        .map_err(|err| eyre::eyre!("Failed to build profile client: {}", err))?;
    let state = Arc::new(ApiState {
        slots: Arc::new(PgSlotStore::new(db_pool)),
        profiles: Arc::new(profiles),
    });

    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let mut allowed: Vec<axum::http::HeaderValue> = Vec::new();
        for origin in origins {
            allowed.push(origin.parse()?);
        }

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(tower_http::cors::AllowOrigin::list(allowed))
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(axum::error_handling::HandleErrorLayer::new(
                |_: tower::BoxError| async { axum::http::StatusCode::REQUEST_TIMEOUT },
            ))
            .timeout(std::time::Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
