use clap::Parser;
use trl_dashboard::client::{
    table::{self, SortConfig, SortDirection, SortKey, ITEMS_PER_PAGE},
    Carousel, DashboardClient, DashboardState,
};
use trl_dashboard::config::{Command, DashboardAction, ReportKind, SortColumn};
use trl_dashboard::utils::error::{DashboardError, ErrorSeverity, Result};
use trl_dashboard::utils::{logger, validation::Validate};
use trl_dashboard::{CliConfig, EtlEngine, IngestPipeline, LocalStorage};

// 終端機輸出以桌面版每頁兩張圖計算
const DESKTOP_WIDTH: u32 = 1280;

#[tokio::main]
async fn main() {
    // .env 不存在時直接略過
    let env_file = dotenvy::dotenv().ok();

    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting trl-dashboard");
    if let Some(path) = env_file {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    match cli.command.clone() {
        Command::Serve { .. } => {
            let config = cli.load_dashboard_config()?;
            config.validate()?;
            trl_dashboard::server::serve(config).await
        }
        Command::Fetch => fetch(&cli).await,
        Command::Dashboard {
            url,
            password,
            action,
        } => dashboard(&url, &password, action).await,
    }
}

async fn fetch(cli: &CliConfig) -> Result<()> {
    let config = cli.load_dashboard_config()?;
    config.validate()?;

    let storage = LocalStorage::new(config.data.path.clone());
    let pipeline = IngestPipeline::new(storage, config.clone())?;
    let engine = EtlEngine::new(pipeline);

    let report = engine.run().await?;
    match report.output_path {
        Some(path) => {
            tracing::info!("✅ Ingestion completed successfully!");
            println!("✅ {} registros guardados en {}", report.record_count, path);
        }
        None => {
            tracing::warn!("⚠️ The form API returned no entries, keeping the existing file");
            println!("⚠️ No se recibieron registros; se conserva el archivo existente");
        }
    }
    Ok(())
}

async fn dashboard(url: &str, password: &str, action: DashboardAction) -> Result<()> {
    match action {
        DashboardAction::Refresh => {
            let mut state = DashboardState::new();
            let ok = state.refresh(url, password).await;
            println!("{}", state.status.message());
            if !ok {
                return Err(DashboardError::ProcessingError {
                    message: state.status.message().to_string(),
                });
            }
            print_state(&state);
            Ok(())
        }
        DashboardAction::Update => {
            let client = DashboardClient::new(url, password)?;
            println!("✅ {}", client.refresh_data().await?);
            Ok(())
        }
        DashboardAction::Search { name } => {
            let client = DashboardClient::new(url, password)?;
            let found = client.search_project(&name).await;
            if found.is_empty() {
                println!("Proyecto no encontrado");
            }
            for project in found {
                println!(
                    "• {} | Aprobado: {} | {} | Total: {}",
                    project.name,
                    project.approval.label(),
                    project.segment,
                    project.total_score
                );
                for insight in &project.insights {
                    println!("    {}", insight);
                }
            }
            Ok(())
        }
        DashboardAction::Table { sort, asc, page } => {
            let client = DashboardClient::new(url, password)?;
            let rows = client.projects().await?;
            let config = SortConfig {
                key: sort_key(sort),
                direction: if asc {
                    SortDirection::Ascending
                } else {
                    SortDirection::Descending
                },
            };
            let sorted = table::sort_projects(&rows, &config);
            println!(
                "{:<40} {:>8} {:>16} {:>8}",
                "Nombre del Proyecto",
                "Aprobado",
                config.key.column(),
                "Total"
            );
            for row in table::paginate(&sorted, page, ITEMS_PER_PAGE) {
                println!(
                    "{:<40} {:>8} {:>16} {:>8}",
                    row.name,
                    row.approval.label(),
                    table::ScoredRow::score(row, config.key),
                    row.total_score
                );
            }
            println!(
                "Página {} de {}{}{}",
                page,
                table::total_pages(sorted.len(), ITEMS_PER_PAGE),
                if table::has_prev(page) { " · anterior" } else { "" },
                if table::has_next(page, sorted.len(), ITEMS_PER_PAGE) {
                    " · siguiente"
                } else {
                    ""
                }
            );
            Ok(())
        }
        DashboardAction::Report { kind, name, output } => {
            let client = DashboardClient::new(url, password)?;
            let report_url = match kind {
                ReportKind::Project => {
                    let name = name.ok_or_else(|| DashboardError::ValidationError {
                        message: "--name is required for the project report".to_string(),
                    })?;
                    client.project_report_url(&name)?
                }
                ReportKind::Top10 => client.top10_report_url()?,
                ReportKind::Approved => client.approved_report_url()?,
            };
            let bytes = client.download(report_url).await?;
            tokio::fs::write(&output, &bytes).await?;
            println!("📁 Reporte guardado en {} ({} bytes)", output, bytes.len());
            Ok(())
        }
    }
}

fn sort_key(column: SortColumn) -> SortKey {
    match column {
        SortColumn::Initial => SortKey::ScoreInitial,
        SortColumn::Development => SortKey::ScoreDevelopment,
        SortColumn::Ready => SortKey::ScoreReady,
        SortColumn::Total => SortKey::Total,
    }
}

fn print_state(state: &DashboardState) {
    use trl_dashboard::client::Panel;

    match &state.metrics {
        Some(m) => {
            println!("\n📊 Métricas principales");
            println!("  Formularios: {}", m.formularios);
            println!("  Aprobados: {}", m.aprobados);
            println!("  TRL máximo: {}", m.trl_max);
            println!("  Puntaje máximo: {}", m.puntaje_maximo);
            println!("  Con docente: {} · Sin docente: {}", m.docente_si, m.docente_no);
            println!("  Nivel de inglés más común: {}", m.nivel_ingles_mas_comun);
            for (segment, name) in &m.top_proyectos_trl {
                println!("  Mejor {}: {}", segment, name);
            }
        }
        None => println!("{}", state.placeholder(Panel::Metrics)),
    }

    if state.projects.is_empty() {
        println!("{}", state.placeholder(Panel::Projects));
    } else {
        println!("\n🏆 Top 10");
        for (rank, project) in table::top10(&state.projects).iter().enumerate() {
            println!(
                "  {:>2}. {} ({} pts, {})",
                rank + 1,
                project.name,
                project.total_score,
                project.approval.label()
            );
        }
    }

    if let Some(charts) = state.charts.as_ref().filter(|c| !c.is_empty()) {
        let carousel = Carousel::new(charts.len(), DESKTOP_WIDTH);
        println!(
            "\n📈 {} gráfico(s) en {} diapositiva(s)",
            charts.len(),
            carousel.total_slides()
        );
        for (title, _) in charts.entries() {
            println!("  - {}", title);
        }
    }

    match &state.insights {
        Some(insights) => {
            println!("\n💡 Insights generales");
            for line in &insights.insights {
                println!("  {}", line);
            }
        }
        None => println!("{}", state.placeholder(Panel::Insights)),
    }
}
