use super::api::DashboardClient;
use crate::auth::sanitize_password;
use crate::core::analytics::{GeneralInsights, MainMetrics};
use crate::core::charts::ChartSet;
use crate::domain::model::ProjectSummary;
use crate::utils::error::Result;

pub const MSG_MISSING_PASSWORD: &str = "Por favor ingrese la contraseña";
pub const MSG_LOADING: &str = "Actualizando datos...";
pub const MSG_UPDATED: &str = "Datos actualizados correctamente";
pub const MSG_UPDATE_FAILED: &str = "Error al actualizar datos. Verifique la contraseña.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading(String),
    Success(String),
    Error(String),
}

impl Status {
    pub fn is_idle(&self) -> bool {
        matches!(self, Status::Idle)
    }

    pub fn message(&self) -> &str {
        match self {
            Status::Idle => "",
            Status::Loading(m) | Status::Success(m) | Status::Error(m) => m,
        }
    }
}

/// Panels of the dashboard that show a placeholder while empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Metrics,
    Projects,
    Insights,
}

/// The four data slots behind the dashboard, replaced together or not at all.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub status: Status,
    pub metrics: Option<MainMetrics>,
    pub charts: Option<ChartSet>,
    pub insights: Option<GeneralInsights>,
    pub projects: Vec<ProjectSummary>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reloads every slot with the given password. Returns whether it succeeded;
    /// the outcome is also reflected in `status`.
    pub async fn refresh(&mut self, base_url: &str, password: &str) -> bool {
        let password = sanitize_password(password);
        if password.is_empty() {
            self.status = Status::Error(MSG_MISSING_PASSWORD.to_string());
            return false;
        }

        self.status = Status::Loading(MSG_LOADING.to_string());
        match Self::fetch_all(base_url, &password).await {
            Ok((projects, metrics, charts, insights)) => {
                tracing::info!("✅ Dashboard refreshed with {} project(s)", projects.len());
                self.projects = projects;
                self.metrics = Some(metrics);
                self.charts = Some(charts);
                self.insights = Some(insights);
                self.status = Status::Success(MSG_UPDATED.to_string());
                true
            }
            Err(e) => {
                tracing::error!("❌ Dashboard refresh failed: {}", e);
                self.status = Status::Error(MSG_UPDATE_FAILED.to_string());
                false
            }
        }
    }

    async fn fetch_all(
        base_url: &str,
        password: &str,
    ) -> Result<(Vec<ProjectSummary>, MainMetrics, ChartSet, GeneralInsights)> {
        let client = DashboardClient::new(base_url, password)?;
        tokio::try_join!(
            client.projects(),
            client.main_metrics(),
            client.charts(),
            client.general_insights(),
        )
    }

    /// Text shown in place of an empty panel.
    pub fn placeholder(&self, panel: Panel) -> &'static str {
        let idle = self.status.is_idle();
        match (panel, idle) {
            (Panel::Metrics, true) => "Actualice los datos para ver las métricas",
            (Panel::Projects, true) => "Actualice los datos para ver los proyectos",
            (Panel::Insights, true) => "Actualice los datos para ver los insights",
            (Panel::Metrics | Panel::Projects, false) => "No hay datos disponibles",
            (Panel::Insights, false) => "No hay insights disponibles",
        }
    }

    pub fn has_data(&self) -> bool {
        self.metrics.is_some() || self.insights.is_some() || !self.projects.is_empty()
    }
}
