use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::{level_filters::LevelFilter, Level};
use tracing_appender::rolling::Rotation;
use tracing_subscriber::fmt::{
    format::FmtSpan,
    writer::{BoxMakeWriter, MakeWriterExt},
};

pub const LOG_PREFIX: &str = "export";

/// Installs the global subscriber. Warnings and errors always reach stderr, everything else only
/// with `show_std`. With `log_dir` the same events are also written into daily rotated files.
pub fn enable_logging(
    log_dir: Option<&Path>,
    log_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<()> {
    let appender = log_dir
        .map(|dir| {
            tracing_appender::rolling::Builder::new()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix(LOG_PREFIX)
                .build(dir)
        })
        .transpose()?
        .map(BoxMakeWriter::new)
        .unwrap_or_else(|| BoxMakeWriter::new(std::io::sink));

    let stderr = std::io::stderr.with_filter(move |meta| show_std || *meta.level() <= Level::WARN);

    let level = log_level
        .map(|v| v.to_string())
        .unwrap_or_else(|| std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!(
            "{}={level}",
            env!("CARGO_PKG_NAME").replace("-", "_"),
        )))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stderr.and(appender))
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
