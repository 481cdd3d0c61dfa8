pub mod cli;
pub mod toml_config;

pub use toml_config::DashboardConfig;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "trl-dashboard")]
#[command(about = "TRL project evaluation API and dashboard client")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, short = 'c', global = true, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Emit JSON logs")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the evaluation API
    Serve {
        #[arg(long, help = "Override server.bind")]
        bind: Option<String>,
    },
    /// Download every form entry into the local entries file
    Fetch,
    /// Talk to a running API the way the dashboard does
    Dashboard {
        #[arg(long, default_value = "http://localhost:8000")]
        url: String,

        #[arg(long, env = "DASHBOARD_PASSWORD", hide_env_values = true)]
        password: String,

        #[command(subcommand)]
        action: DashboardAction,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum DashboardAction {
    /// Reload every panel and print a summary
    Refresh,
    /// Ask the API to re-download the form entries
    Update,
    /// Search projects by name
    Search { name: String },
    /// Print one page of the projects table
    Table {
        #[arg(long, value_enum, default_value_t = SortColumn::Total)]
        sort: SortColumn,

        #[arg(long, help = "Sort ascending instead of descending")]
        asc: bool,

        #[arg(long, default_value = "1")]
        page: usize,
    },
    /// Download a report document
    Report {
        #[arg(value_enum)]
        kind: ReportKind,

        #[arg(long, help = "Project name, required for the project report")]
        name: Option<String>,

        #[arg(long, short = 'o')]
        output: String,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    Initial,
    Development,
    Ready,
    Total,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Project,
    Top10,
    Approved,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// TOML 檔案優先，沒有則用預設值 (密碼取自 APP_PASSWORD)
    pub fn load_dashboard_config(&self) -> crate::utils::error::Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::default(),
        };
        if let Command::Serve { bind: Some(bind) } = &self.command {
            config.server.bind = bind.clone();
        }
        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_bind_override() {
        let cli = CliConfig::try_parse_from([
            "trl-dashboard",
            "--verbose",
            "serve",
            "--bind",
            "127.0.0.1:9100",
        ])
        .unwrap();

        assert!(cli.verbose);
        let config = cli.load_dashboard_config().unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9100");
    }

    #[test]
    fn test_parse_dashboard_report() {
        let cli = CliConfig::try_parse_from([
            "trl-dashboard",
            "dashboard",
            "--password",
            "secret",
            "report",
            "project",
            "--name",
            "Robot",
            "-o",
            "robot.html",
        ])
        .unwrap();

        match cli.command {
            Command::Dashboard {
                url,
                password,
                action: DashboardAction::Report { kind, name, output },
            } => {
                assert_eq!(url, "http://localhost:8000");
                assert_eq!(password, "secret");
                assert_eq!(kind, ReportKind::Project);
                assert_eq!(name.as_deref(), Some("Robot"));
                assert_eq!(output, "robot.html");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_table_defaults() {
        let cli = CliConfig::try_parse_from([
            "trl-dashboard",
            "dashboard",
            "--password",
            "x",
            "table",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Command::Dashboard {
                action: DashboardAction::Table {
                    sort: SortColumn::Total,
                    asc: false,
                    page: 1
                },
                ..
            }
        ));
    }
}
