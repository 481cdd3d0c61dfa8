//! Evaluation API: JSON routes behind basic auth, report routes behind the
//! `auth` query token, and an optional static front end.

pub mod auth;
pub mod error;
pub mod handlers;

use crate::auth::PasswordVerifier;
use crate::config::cli::LocalStorage;
use crate::config::DashboardConfig;
use crate::core::etl::EtlEngine;
use crate::core::pipeline::IngestPipeline;
use crate::core::repository::ProjectRepository;
use crate::utils::error::Result;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub type LocalRepository =
    ProjectRepository<LocalStorage, IngestPipeline<LocalStorage, DashboardConfig>>;

pub struct AppState {
    pub repository: LocalRepository,
    pub verifier: PasswordVerifier,
}

impl AppState {
    pub fn new(repository: LocalRepository, verifier: PasswordVerifier) -> Self {
        Self {
            repository,
            verifier,
        }
    }

    /// Wires local storage, the form ingestion pipeline and the password check.
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let storage = LocalStorage::new(config.data.path.clone());
        let pipeline = IngestPipeline::new(storage.clone(), config.clone())?;
        let repository = ProjectRepository::new(
            storage,
            EtlEngine::new(pipeline),
            config.data.entries_file.clone(),
            config.data.dictionary_file.clone(),
        );
        Ok(Self::new(
            repository,
            PasswordVerifier::new(&config.auth.password),
        ))
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️ Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    // credentials 不能搭配萬用字元，改用鏡像
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn router(state: Arc<AppState>, cors_origins: &[String], static_dir: Option<&str>) -> Router {
    let api = Router::new()
        .route("/actualizar-datos", post(handlers::refresh_data))
        .route("/metricas-principales", get(handlers::main_metrics))
        .route("/datos-graficos", get(handlers::charts))
        .route("/insights-generales", get(handlers::general_insights))
        .route("/proyectos", get(handlers::projects))
        .route("/buscar-proyecto", post(handlers::search_project))
        .route("/reporte-proyecto/{nombre}", get(handlers::project_report))
        .route("/reporte-top10", get(handlers::top10_report))
        .route("/reporte-aprobados", get(handlers::approved_report))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => {
            tracing::info!("🗂️ Serving static files from {}", dir);
            api.fallback_service(ServeDir::new(dir))
        }
        None => api,
    };

    app.layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(config: DashboardConfig) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    let app = router(
        state,
        &config.server.cors_origins,
        config.server.static_dir.as_deref(),
    );

    let listener = TcpListener::bind(&config.server.bind).await?;
    tracing::info!("🚀 TRL dashboard API listening on {}", config.server.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
