use crate::core::dictionary::ScoringDictionary;
use crate::core::etl::EtlEngine;
use crate::core::pipeline::records_from_csv;
use crate::core::scoring::evaluate_all;
use crate::core::{Pipeline, Record, Storage};
use crate::domain::model::Project;
use crate::utils::error::{DashboardError, Result};
use tokio::sync::RwLock;

pub const PROJECT_NOT_FOUND: &str = "Proyecto no encontrado";

/// Case-insensitive literal substring match on the project name.
pub fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// 本地的回覆檔案 + 評分字典；檔案不存在時先跑一次 ingestion
pub struct ProjectRepository<S: Storage, P: Pipeline> {
    storage: S,
    engine: EtlEngine<P>,
    entries_file: String,
    dictionary_file: String,
    // refresh 寫檔時擋住讀取
    lock: RwLock<()>,
}

impl<S: Storage, P: Pipeline> ProjectRepository<S, P> {
    pub fn new(
        storage: S,
        engine: EtlEngine<P>,
        entries_file: impl Into<String>,
        dictionary_file: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            engine,
            entries_file: entries_file.into(),
            dictionary_file: dictionary_file.into(),
            lock: RwLock::new(()),
        }
    }

    /// Re-fetches every entry from the form API and returns how many were stored.
    pub async fn refresh(&self) -> Result<usize> {
        let _guard = self.lock.write().await;
        let report = self.engine.run().await?;
        Ok(report.record_count)
    }

    pub async fn load_entries(&self) -> Result<Vec<Record>> {
        if !self.storage.exists(&self.entries_file).await {
            let _guard = self.lock.write().await;
            if !self.storage.exists(&self.entries_file).await {
                tracing::info!("📁 No local entries file, fetching from the form API");
                self.engine.run().await?;
            }
        }

        let _guard = self.lock.read().await;
        if !self.storage.exists(&self.entries_file).await {
            return Ok(Vec::new());
        }
        let data = self.storage.read_file(&self.entries_file).await?;
        records_from_csv(&data)
    }

    pub async fn load_dictionary(&self) -> Result<ScoringDictionary> {
        if !self.storage.exists(&self.dictionary_file).await {
            return Err(DashboardError::ConfigError {
                message: format!("Scoring dictionary '{}' not found", self.dictionary_file),
            });
        }
        let data = self.storage.read_file(&self.dictionary_file).await?;
        ScoringDictionary::from_csv(&data)
    }

    pub async fn projects(&self) -> Result<Vec<Project>> {
        let dictionary = self.load_dictionary().await?;
        let entries = self.load_entries().await?;
        let projects = evaluate_all(&entries, &dictionary);
        tracing::debug!("Evaluated {} project(s)", projects.len());
        Ok(projects)
    }

    pub async fn search(&self, term: &str) -> Result<Vec<Project>> {
        let matches: Vec<Project> = self
            .projects()
            .await?
            .into_iter()
            .filter(|p| name_matches(&p.name, term))
            .collect();

        if matches.is_empty() {
            return Err(DashboardError::NotFoundError {
                message: PROJECT_NOT_FOUND.to_string(),
            });
        }
        Ok(matches)
    }

    pub async fn find_first(&self, term: &str) -> Result<Project> {
        self.search(term)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DashboardError::NotFoundError {
                message: PROJECT_NOT_FOUND.to_string(),
            })
    }

    pub async fn approved(&self) -> Result<Vec<Project>> {
        Ok(self
            .projects()
            .await?
            .into_iter()
            .filter(Project::is_approved)
            .collect())
    }
}
