use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use httpmock::prelude::*;
use std::io::Read;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use trl_dashboard::auth::Credentials;
use trl_dashboard::server::{router, AppState};
use trl_dashboard::DashboardConfig;

const PASSWORD: &str = "clave segura";

const ENTRIES: &str = "1,14,15,17,20,3,30\n\
Robot Agrícola,5,Si,intermedio,Prototipo funcional,Agro,lima\n\
App de Turismo,2,No,básico,,Turismo,\n";

const DICTIONARY: &str = "pregunta,respuesta,segmento,puntaje\n\
20,Prototipo funcional,TRL 4-7,50\n";

struct TestApp {
    _dir: TempDir,
    app: Router,
}

fn test_app(endpoint: Option<String>) -> Result<TestApp> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("datos_formularios.csv"), ENTRIES)?;
    std::fs::write(dir.path().join("diccionario.csv"), DICTIONARY)?;

    let mut config = DashboardConfig::default();
    config.data.path = dir.path().to_string_lossy().to_string();
    config.auth.password = PASSWORD.to_string();
    if let Some(endpoint) = endpoint {
        config.source.endpoint = endpoint;
    }

    let state = Arc::new(AppState::from_config(&config)?);
    let app = router(state, &config.server.cors_origins, None);
    Ok(TestApp { _dir: dir, app })
}

fn basic_auth() -> String {
    Credentials::dashboard(PASSWORD).authorization_header()
}

fn auth_query() -> String {
    urlencoding::encode(&Credentials::dashboard(PASSWORD).token()).into_owned()
}

async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, Vec<u8>)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, body.to_vec()))
}

async fn get_json(app: &Router, uri: &str) -> Result<(StatusCode, serde_json::Value)> {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth())
        .body(Body::empty())?;
    let (status, body) = send(app, request).await?;
    Ok((status, serde_json::from_slice(&body)?))
}

#[tokio::test]
async fn test_json_routes_require_basic_auth() -> Result<()> {
    let test = test_app(None)?;

    let request = Request::builder().uri("/proyectos").body(Body::empty())?;
    let (status, body) = send(&test.app, request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(body["detail"], "Error en autenticación");

    let request = Request::builder()
        .uri("/proyectos")
        .header(
            header::AUTHORIZATION,
            Credentials::dashboard("otra").authorization_header(),
        )
        .body(Body::empty())?;
    let (status, _) = send(&test.app, request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 密碼前後的空白與零寬字元會被清掉
    let request = Request::builder()
        .uri("/proyectos")
        .header(
            header::AUTHORIZATION,
            Credentials {
                username: "cualquiera".to_string(),
                password: format!(" {}\u{200B}", PASSWORD),
            }
            .authorization_header(),
        )
        .body(Body::empty())?;
    let (status, _) = send(&test.app, request).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_projects_and_metrics() -> Result<()> {
    let test = test_app(None)?;

    let (status, body) = get_json(&test.app, "/proyectos").await?;
    assert_eq!(status, StatusCode::OK);
    let projects = body["proyectos"].as_array().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["Nombre del Proyecto"], "Robot Agrícola");
    assert_eq!(projects[0]["Aprobado"], "Sí");
    assert_eq!(projects[0]["Puntaje TRL 4-7"], 62.0);
    assert_eq!(projects[0]["Segmento TRL"], "TRL 4-7");
    assert_eq!(projects[1]["Aprobado"], "No");

    let (status, metrics) = get_json(&test.app, "/metricas-principales").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["formularios"], 2);
    assert_eq!(metrics["aprobados"], 1);
    assert_eq!(metrics["trl_max"], 5);
    assert_eq!(metrics["docente_si"], 1);
    assert_eq!(metrics["docente_no"], 1);
    assert_eq!(metrics["top_proyectos_trl"]["TRL 4-7"], "Robot Agrícola");

    let (status, insights) = get_json(&test.app, "/insights-generales").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(insights["metricas"]["total_proyectos"], 2);
    assert_eq!(insights["insights"].as_array().unwrap().len(), 5);

    let (status, charts) = get_json(&test.app, "/datos-graficos").await?;
    assert_eq!(status, StatusCode::OK);
    let first: serde_json::Value =
        serde_json::from_str(charts["graficos"]["grafico_1"].as_str().unwrap())?;
    assert!(first["data"].is_array());
    assert!(first["layout"].is_object());

    Ok(())
}

#[tokio::test]
async fn test_search_project() -> Result<()> {
    let test = test_app(None)?;

    let search = |name: &str| {
        Request::builder()
            .method("POST")
            .uri("/buscar-proyecto")
            .header(header::AUTHORIZATION, basic_auth())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "nombre": name }).to_string()))
    };

    let (status, body) = send(&test.app, search("ROBOT")?).await?;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(body["proyectos"][0]["Nombre del Proyecto"], "Robot Agrícola");
    assert_eq!(body["proyectos"][0]["Docente Acompañante"], true);

    let (status, body) = send(&test.app, search("inexistente")?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(body["detail"], "Proyecto no encontrado");

    Ok(())
}

#[tokio::test]
async fn test_search_bad_body_returns_detail() -> Result<()> {
    let test = test_app(None)?;

    let search = |content_type: &str, body: &'static str| {
        Request::builder()
            .method("POST")
            .uri("/buscar-proyecto")
            .header(header::AUTHORIZATION, basic_auth())
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
    };

    let cases = [
        ("application/json", "{}", StatusCode::UNPROCESSABLE_ENTITY),
        ("application/json", "not json", StatusCode::BAD_REQUEST),
        ("text/plain", r#"{"nombre": "robot"}"#, StatusCode::UNSUPPORTED_MEDIA_TYPE),
    ];
    for (content_type, body, expected) in cases {
        let (status, body) = send(&test.app, search(content_type, body)?).await?;
        assert_eq!(status, expected);
        let body: serde_json::Value = serde_json::from_slice(&body)?;
        assert!(body["detail"].is_string(), "unexpected body: {}", body);
    }

    let (_, body) = send(&test.app, search("application/json", "{}")?).await?;
    let body: serde_json::Value = serde_json::from_slice(&body)?;
    assert!(body["detail"].as_str().unwrap().contains("nombre"));

    Ok(())
}

#[tokio::test]
async fn test_report_routes_use_query_token() -> Result<()> {
    let test = test_app(None)?;

    let uri = format!(
        "/reporte-proyecto/{}?auth={}",
        urlencoding::encode("agrícola"),
        auth_query()
    );
    let (status, body) = send(&test.app, Request::builder().uri(uri).body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body)?;
    assert!(html.contains("Robot Agrícola"));
    assert!(html.contains("Generado el"));

    let (status, _) = send(
        &test.app,
        Request::builder()
            .uri("/reporte-top10?auth=bm8tdmFsaWRv")
            .body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &test.app,
        Request::builder()
            .uri(format!("/reporte-top10?auth={}", auth_query()))
            .body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body)?;
    assert!(html.find("1. Robot Agrícola").unwrap() < html.find("2. App de Turismo").unwrap());

    let missing = format!("/reporte-proyecto/dron?auth={}", auth_query());
    let (status, _) = send(&test.app, Request::builder().uri(missing).body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_approved_workbook_download() -> Result<()> {
    let test = test_app(None)?;

    let request = Request::builder()
        .uri(format!("/reporte-aprobados?auth={}", auth_query()))
        .body(Body::empty())?;
    let response = test.app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=proyectos_aprobados.xlsx"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(body.to_vec()))?;
    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")?
        .read_to_string(&mut sheet)?;
    assert!(sheet.contains("Robot Agrícola"));
    assert!(!sheet.contains("App de Turismo"));

    Ok(())
}

#[tokio::test]
async fn test_refresh_downloads_entries() -> Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/entries");
        then.status(200).json_body(serde_json::json!({
            "total_count": "3",
            "entries": [
                {"1": "Dron Solar", "14": 8, "20": "Prototipo funcional"},
                {"1": "Sensor IoT", "14": "4"},
                {"1": "Biochar", "14": null}
            ]
        }));
    });

    let test = test_app(Some(server.url("/entries")))?;

    let request = Request::builder()
        .method("POST")
        .uri("/actualizar-datos")
        .header(header::AUTHORIZATION, basic_auth())
        .body(Body::empty())?;
    let (status, body) = send(&test.app, request).await?;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(body["mensaje"], "Datos cargados (3 registros)");
    mock.assert();

    let (_, body) = get_json(&test.app, "/proyectos").await?;
    let names: Vec<&str> = body["proyectos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["Nombre del Proyecto"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Dron Solar", "Sensor IoT", "Biochar"]);

    Ok(())
}

#[tokio::test]
async fn test_refresh_upstream_failure_is_500() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/entries");
        then.status(503).body("down");
    });

    let test = test_app(Some(server.url("/entries")))?;
    let request = Request::builder()
        .method("POST")
        .uri("/actualizar-datos")
        .header(header::AUTHORIZATION, basic_auth())
        .body(Body::empty())?;
    let (status, body) = send(&test.app, request).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = serde_json::from_slice(&body)?;
    assert!(body["detail"].as_str().unwrap().contains("503"));

    Ok(())
}
