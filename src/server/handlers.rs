use super::auth::{Authorized, QueryAuthorized};
use super::error::ApiError;
use super::AppState;
use crate::core::analytics::{self, top_by_total, GeneralInsights, MainMetrics};
use crate::core::charts::general_charts;
use crate::domain::model::ProjectSummary;
use crate::reports::{self, APPROVED_FILENAME, XLSX_CONTENT_TYPE};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const NO_APPROVED_PROJECTS: &str = "No hay proyectos aprobados.";
const TOP_REPORT_SIZE: usize = 10;

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub nombre: String,
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub async fn refresh_data(
    _: Authorized,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Value>> {
    tracing::info!("📥 Refreshing form entries");
    let count = state
        .repository
        .refresh()
        .await
        .map_err(ApiError::context("Error al actualizar datos"))?;
    tracing::info!("✅ Stored {} entries", count);

    Ok(Json(json!({
        "mensaje": format!("Datos cargados ({} registros)", count)
    })))
}

pub async fn main_metrics(
    _: Authorized,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MainMetrics>> {
    let projects = state
        .repository
        .projects()
        .await
        .map_err(ApiError::context("Error al calcular métricas"))?;
    Ok(Json(analytics::main_metrics(&projects)))
}

pub async fn charts(_: Authorized, State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let context = ApiError::context("Error al generar gráficos");
    let projects = state.repository.projects().await.map_err(&context)?;
    let charts = general_charts(&projects).map_err(context)?;
    Ok(Json(json!({ "graficos": charts })))
}

pub async fn general_insights(
    _: Authorized,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<GeneralInsights>> {
    let projects = state
        .repository
        .projects()
        .await
        .map_err(ApiError::context("Error al generar insights"))?;
    Ok(Json(analytics::general_insights(&projects)))
}

pub async fn projects(_: Authorized, State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let projects = state
        .repository
        .projects()
        .await
        .map_err(ApiError::context("Error al listar proyectos"))?;
    let summaries: Vec<ProjectSummary> = projects.iter().map(ProjectSummary::from).collect();
    Ok(Json(json!({ "proyectos": summaries })))
}

pub async fn search_project(
    _: Authorized,
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload?;
    tracing::debug!("Searching projects matching '{}'", request.nombre);
    let found = state
        .repository
        .search(&request.nombre)
        .await
        .map_err(ApiError::context("Error al buscar proyecto"))?;
    Ok(Json(json!({ "proyectos": found })))
}

pub async fn project_report(
    _: QueryAuthorized,
    State(state): State<Arc<AppState>>,
    Path(nombre): Path<String>,
) -> ApiResult<Html<String>> {
    let project = state
        .repository
        .find_first(&nombre)
        .await
        .map_err(ApiError::context("Error al generar reporte"))?;
    tracing::info!("📄 Project report for '{}'", project.name);
    Ok(Html(reports::project_report(&project, now())))
}

pub async fn top10_report(
    _: QueryAuthorized,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Html<String>> {
    let projects = state
        .repository
        .projects()
        .await
        .map_err(ApiError::context("Error al generar reporte"))?;
    let top = top_by_total(&projects, TOP_REPORT_SIZE);
    Ok(Html(reports::top10_report(&top, now())))
}

pub async fn approved_report(
    _: QueryAuthorized,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let context = ApiError::context("Error al generar reporte");
    let approved = state.repository.approved().await.map_err(&context)?;
    if approved.is_empty() {
        return Err(ApiError::NotFound(NO_APPROVED_PROJECTS.to_string()));
    }

    let workbook = reports::approved_workbook(&approved).map_err(context)?;
    tracing::info!("📊 Approved workbook with {} project(s)", approved.len());

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", APPROVED_FILENAME),
            ),
        ],
        workbook,
    ))
}
