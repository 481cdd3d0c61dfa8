use anyhow::Result;
use httpmock::prelude::*;
use tempfile::TempDir;
use trl_dashboard::core::dictionary::ScoringDictionary;
use trl_dashboard::core::pipeline::records_from_csv;
use trl_dashboard::core::scoring::evaluate_all;
use trl_dashboard::{DashboardConfig, EtlEngine, IngestPipeline, LocalStorage};

fn config_for(dir: &TempDir, endpoint: String, page_size: usize) -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.data.path = dir.path().to_string_lossy().to_string();
    config.source.endpoint = endpoint;
    config.source.page_size = page_size;
    config.auth.password = "clave".to_string();
    config
}

#[tokio::test]
async fn test_end_to_end_ingestion_with_real_http() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let page1 = server.mock(|when, then| {
        when.method(GET)
            .path("/forms/9/entries")
            .query_param("paging[page_size]", "2")
            .query_param("paging[current_page]", "1")
            .header_exists("Authorization");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "total_count": 3,
                "entries": [
                    {"1": "Robot Agrícola", "14": "5", "15": "Si", "17": "Avanzado", "20": "Prototipo funcional"},
                    {"1": "App de Turismo", "14": 2, "15": "No"}
                ]
            }));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET)
            .path("/forms/9/entries")
            .query_param("paging[current_page]", "2");
        then.status(200).json_body(serde_json::json!({
            "total_count": 3,
            "entries": [{"1": "Biochar", "14": "9", "30": "junín"}]
        }));
    });

    let config = config_for(&temp_dir, server.url("/forms/9/entries"), 2);
    let storage = LocalStorage::new(config.data.path.clone());
    let engine = EtlEngine::new(IngestPipeline::new(storage, config)?);

    let report = engine.run().await?;
    page1.assert();
    page2.assert();
    assert_eq!(report.record_count, 3);
    assert_eq!(report.output_path.as_deref(), Some("datos_formularios.csv"));

    let written = std::fs::read(temp_dir.path().join("datos_formularios.csv"))?;
    let records = records_from_csv(&written)?;
    assert_eq!(records.len(), 3);

    let dictionary = ScoringDictionary::from_csv(
        b"pregunta,respuesta,segmento,puntaje\n20,Prototipo funcional,TRL 4-7,40\n",
    )?;
    let projects = evaluate_all(&records, &dictionary);
    // 40 + 4 (avanzado) + 10 (docente)
    assert_eq!(projects[0].score_development, 54.0);
    assert!(projects[0].is_approved());
    assert!(!projects[1].is_approved());
    assert_eq!(projects[2].location.as_deref(), Some("junín"));

    Ok(())
}

#[tokio::test]
async fn test_empty_extraction_keeps_existing_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("datos_formularios.csv"), "1\nPrevio\n")?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/entries");
        then.status(200)
            .json_body(serde_json::json!({"total_count": 0, "entries": []}));
    });

    let config = config_for(&temp_dir, server.url("/entries"), 100);
    let storage = LocalStorage::new(config.data.path.clone());
    let engine = EtlEngine::new(IngestPipeline::new(storage, config)?);

    let report = engine.run().await?;
    assert_eq!(report.record_count, 0);
    assert!(report.output_path.is_none());
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("datos_formularios.csv"))?,
        "1\nPrevio\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_upstream_error_leaves_no_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/entries");
        then.status(500).body("boom");
    });

    let config = config_for(&temp_dir, server.url("/entries"), 100);
    let storage = LocalStorage::new(config.data.path.clone());
    let engine = EtlEngine::new(IngestPipeline::new(storage, config)?);

    let err = engine.run().await.unwrap_err();
    assert_eq!(
        err.category(),
        trl_dashboard::utils::error::ErrorCategory::Network
    );
    assert!(!temp_dir.path().join("datos_formularios.csv").exists());

    Ok(())
}
