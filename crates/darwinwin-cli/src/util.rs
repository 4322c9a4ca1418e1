use std::{fs::File, io, path::Path};

use anyhow::Context;
use darwinwin_training::config::TrainingConfig;
use tracing_subscriber::EnvFilter;

/// Installs the log subscriber. `RUST_LOG` overrides the default `info` level.
///
/// Logs go to stderr so stdout stays free for command output.
pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub(crate) fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Loads a training config, or the defaults when no path is given.
pub(crate) fn load_config<P>(path: Option<P>) -> anyhow::Result<TrainingConfig>
where
    P: AsRef<Path>,
{
    match path {
        Some(path) => read_json_file("training config", path),
        None => Ok(TrainingConfig::default()),
    }
}
