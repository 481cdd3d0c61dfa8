pub mod auth;
pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod reports;
pub mod server;
pub mod utils;

pub use config::{cli::LocalStorage, DashboardConfig};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{etl::EtlEngine, pipeline::IngestPipeline, repository::ProjectRepository};
pub use domain::model::{Project, ProjectSummary};
pub use utils::error::{DashboardError, Result};
