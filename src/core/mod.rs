pub mod analytics;
pub mod charts;
pub mod dictionary;
pub mod etl;
pub mod insights;
pub mod pipeline;
pub mod repository;
pub mod scoring;

pub use crate::domain::model::{Record, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
