use std::sync::OnceLock;

use lookout_common::observability::{LogConfig, LogFormat, LogSink};

static INIT: OnceLock<()> = OnceLock::new();

pub fn init_test_tracing() {
    INIT.get_or_init(|| {
        let config = LogConfig {
            app_name: "lookout-tests",
            sink: LogSink::Stderr,
            format: if std::env::var("LOOKOUT_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
            ..LogConfig::default()
        };
        let _ = lookout_common::observability::init_logging(config);
    });
}
