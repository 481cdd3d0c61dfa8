use crate::auth::Credentials;
use crate::core::analytics::{GeneralInsights, MainMetrics};
use crate::core::charts::ChartSet;
use crate::domain::model::{Project, ProjectSummary};
use crate::utils::error::{DashboardError, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct ChartsResponse {
    graficos: ChartSet,
}

#[derive(Debug, Deserialize)]
struct ProjectsResponse<T> {
    proyectos: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    mensaje: String,
}

/// Typed access to the evaluation API, authenticated as the dashboard account.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

impl DashboardClient {
    pub fn new(base_url: &str, password: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| DashboardError::InvalidConfigValueError {
                field: "dashboard.url".to_string(),
                value: base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            credentials: Credentials::dashboard(password),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| DashboardError::ProcessingError {
                message: format!("Invalid endpoint '{}': {}", path, e),
            })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(
            &self.credentials.username,
            Some(&self.credentials.password),
        )
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or(body);
        Err(DashboardError::UpstreamError {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!("📡 GET {}", url);
        let response = self.authorized(self.client.get(url)).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!("📡 POST {}", url);
        let response = self
            .authorized(self.client.post(url))
            .json(body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn charts(&self) -> Result<ChartSet> {
        let response: ChartsResponse = self.get_json("datos-graficos").await?;
        Ok(response.graficos)
    }

    pub async fn main_metrics(&self) -> Result<MainMetrics> {
        self.get_json("metricas-principales").await
    }

    pub async fn general_insights(&self) -> Result<GeneralInsights> {
        self.get_json("insights-generales").await
    }

    pub async fn projects(&self) -> Result<Vec<ProjectSummary>> {
        let response: ProjectsResponse<ProjectSummary> = self.get_json("proyectos").await?;
        Ok(response.proyectos)
    }

    /// Asks the API to re-download the form entries; returns its message.
    pub async fn refresh_data(&self) -> Result<String> {
        let response: RefreshResponse = self
            .post_json("actualizar-datos", &serde_json::json!({}))
            .await?;
        Ok(response.mensaje)
    }

    /// Blank terms skip the request. Failures are logged and yield no results.
    pub async fn search_project(&self, name: &str) -> Vec<Project> {
        if name.trim().is_empty() {
            return Vec::new();
        }

        let result: Result<ProjectsResponse<Project>> = self
            .post_json("buscar-proyecto", &serde_json::json!({ "nombre": name }))
            .await;
        match result {
            Ok(response) => response.proyectos,
            Err(e) => {
                tracing::warn!("⚠️ Project search for '{}' failed: {}", name, e);
                Vec::new()
            }
        }
    }

    fn report_url(&self, path: &str) -> Result<Url> {
        let token = urlencoding::encode(&self.credentials.token()).into_owned();
        self.endpoint(&format!("{}?auth={}", path, token))
    }

    pub fn project_report_url(&self, name: &str) -> Result<Url> {
        self.report_url(&format!("reporte-proyecto/{}", urlencoding::encode(name)))
    }

    pub fn top10_report_url(&self) -> Result<Url> {
        self.report_url("reporte-top10")
    }

    pub fn approved_report_url(&self) -> Result<Url> {
        self.report_url("reporte-aprobados")
    }

    /// Fetches a report document; the token travels in the URL.
    pub async fn download(&self, url: Url) -> Result<Vec<u8>> {
        tracing::debug!("📥 Downloading {}", url.path());
        let response = self.client.get(url).send().await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
