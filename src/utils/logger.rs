use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "compact" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// 組出預設過濾字串；`RUST_LOG` 有設定時以環境變數為準
pub fn default_directive(verbose: bool, level: Option<&str>) -> String {
    match (verbose, level) {
        (true, _) => "punk_atlas=debug,info".to_string(),
        (false, Some(level)) => format!("punk_atlas={}", level),
        (false, None) => "punk_atlas=info".to_string(),
    }
}

/// 初始化日誌。`enabled = false` 時完全不安裝 subscriber，所有 tracing 事件直接丟棄。
pub fn init_cli_logger(enabled: bool, verbose: bool, level: Option<&str>, format: LogFormat) {
    if !enabled {
        return;
    }

    let directive = default_directive(verbose, level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.compact())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init(),
    }
}
