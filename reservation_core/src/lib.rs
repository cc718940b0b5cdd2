//! Core library for the studio reservation site: the form controller, the
//! submission service, store clients and the HTTP routes that expose them.

pub mod config;
pub mod error;
pub mod extractors;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod validation;

pub use config::{AppConfig, StoreBackend};
pub use error::{AppError, Result, StoreError};
pub use form::{FieldUpdate, FormController, FormState, HttpGateway, ReservationGateway, SubmitOutcome};
pub use handlers::routes::create_routes;
pub use models::{PhotoType, ReservationRequest, ShootingMonth, StoreSchema, SubmissionResult};
pub use services::ReservationService;
pub use store::{MemoryStore, ReservationStore, SupabaseStore};

use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub reservations: ReservationService,
}

impl AppState {
    pub fn new(reservations: ReservationService) -> Self {
        Self {
            app_name: "Family Photo Studio".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            reservations,
        }
    }

    /// Builds the store client named by the configuration. This is where a
    /// missing store URL or key stops the process.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn ReservationStore> = match config.store.backend {
            StoreBackend::Supabase => Arc::new(SupabaseStore::new(&config.store)?),
            StoreBackend::Memory => {
                warn!("Using the in-memory reservation store - reservations are lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::new(ReservationService::new(store, &config.store)))
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, &AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Router {
    let router = create_routes()
        .layer(middleware::cors::cors_layer_from_config(&config.cors))
        .with_state(state);

    middleware::logging::with_request_logging(router)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
