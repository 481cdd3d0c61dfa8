use crate::core::{ConfigProvider, Pipeline, Record, Storage, TransformResult};
use crate::utils::error::{DashboardError, Result};
use reqwest::Client;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use url::Url;

/// 從 Gravity Forms 拉回所有回覆，轉成 CSV 並存入 Storage
pub struct IngestPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> IngestPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds()))
            .build()?;
        Ok(Self {
            storage,
            config,
            client,
        })
    }

    fn page_url(&self, page: usize) -> Result<Url> {
        let mut url = Url::parse(self.config.api_endpoint()).map_err(|e| {
            DashboardError::InvalidConfigValueError {
                field: "source.endpoint".to_string(),
                value: self.config.api_endpoint().to_string(),
                reason: e.to_string(),
            }
        })?;
        url.query_pairs_mut()
            .append_pair("paging[page_size]", &self.config.page_size().to_string())
            .append_pair("paging[current_page]", &page.to_string());
        Ok(url)
    }

    async fn fetch_page(&self, page: usize) -> Result<(Option<usize>, Vec<Record>)> {
        let url = self.page_url(page)?;
        tracing::debug!("📡 Requesting entries page {}: {}", page, url);

        let response = self
            .client
            .get(url)
            .basic_auth(
                self.config.source_username(),
                Some(self.config.source_password()),
            )
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DashboardError::UpstreamError {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response.json().await?;
        let total = parse_total_count(body.get("total_count"));

        let entries = match body.get("entries") {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object())
                .map(normalize_entry)
                .collect(),
            _ => Vec::new(),
        };

        Ok((total, entries))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for IngestPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let (total, entries) = self.fetch_page(page).await?;
            if entries.is_empty() {
                break;
            }
            records.extend(entries);

            match total {
                Some(total) if records.len() >= total => break,
                None => break,
                _ => page += 1,
            }
        }

        tracing::debug!("Fetched {} entries over {} page(s)", records.len(), page);
        Ok(records)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        let csv_output = records_to_csv(&data)?;
        Ok(TransformResult {
            processed_records: data,
            csv_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let file_name = self.config.entries_file();
        tracing::debug!(
            "Writing {} entries ({} bytes) to {}",
            result.processed_records.len(),
            result.csv_output.len(),
            file_name
        );
        self.storage
            .write_file(file_name, result.csv_output.as_bytes())
            .await?;
        Ok(file_name.to_string())
    }
}

fn parse_total_count(value: Option<&serde_json::Value>) -> Option<usize> {
    match value? {
        serde_json::Value::Number(n) => n.as_u64().map(|n| n as usize),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn normalize_entry(entry: &serde_json::Map<String, serde_json::Value>) -> Record {
    let data = entry
        .iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::Null => String::new(),
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), serde_json::Value::String(text))
        })
        .collect::<HashMap<_, _>>();
    Record { data }
}

/// 以所有欄位 id 的聯集（排序後）作為表頭
pub fn records_to_csv(records: &[Record]) -> Result<String> {
    let headers: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.data.keys().map(String::as_str))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers.iter())?;
    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|h| record.text(h).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::ProcessingError {
            message: format!("Failed to flush CSV writer: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| DashboardError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

pub fn records_from_csv(data: &[u8]) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record = Record::from_pairs(
            headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.to_string(), v.to_string())),
        );
        records.push(record);
    }
    Ok(records)
}
