use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 終端機用的精簡格式
    Compact,
    /// 伺服器部署用 JSON 格式，方便集中收集
    Json,
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(format: LogFormat, verbose: bool) -> &'static str {
    match (format, verbose) {
        (_, true) => "trl_dashboard=debug,tower_http=debug,info",
        (LogFormat::Compact, false) => "trl_dashboard=info",
        (LogFormat::Json, false) => "trl_dashboard=info,tower_http=info",
    }
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(format, verbose)));

    let compact = (format == LogFormat::Compact).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
    });
    let json = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .json()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(json)
        .init();
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(LogFormat::Compact, verbose);
}

pub fn init_json_logger() {
    init_logger(LogFormat::Json, false);
}
