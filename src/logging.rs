use std::fs::File;
use std::path::Path;
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_LOG_LEVEL: &str = "info";
const ENV_VAR_NAME: &str = "STENCIL_LOG";

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber.
///
/// Logs go to stderr in compact form; prompt text itself never does, so
/// stdout stays clean for piping. When `log_file` is set, structured JSON
/// events are appended there as well, at TRACE verbosity regardless of the
/// stderr filter. Filter precedence: `STENCIL_LOG` env var > `log_level`
/// argument > `info`.
pub fn init(log_level: Option<&str>, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut init_err: Option<anyhow::Error> = None;

    INIT.call_once(|| {
        if let Err(e) = try_init(log_level, log_file) {
            init_err = Some(e);
        }
    });

    match init_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn try_init(log_level: Option<&str>, log_file: Option<&Path>) -> anyhow::Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true)
        .compact()
        .with_filter(env_filter(log_level));

    // Option<Layer> composes as a no-op when None.
    let file_layer = log_file
        .map(|path| -> anyhow::Result<_> {
            let file = open_log_file(path)?;
            Ok(tracing_subscriber::fmt::layer()
                .with_writer(file.with_max_level(Level::TRACE))
                .with_target(false)
                .with_ansi(false)
                .json())
        })
        .transpose()?;

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

fn env_filter(log_level: Option<&str>) -> EnvFilter {
    // STENCIL_LOG wins over the CLI flag.
    EnvFilter::try_from_env(ENV_VAR_NAME)
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or(DEFAULT_LOG_LEVEL)))
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("failed to create log directory {}: {e}", parent.display())
            })?;
        }
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", path.display()))
}
