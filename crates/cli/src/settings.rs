//! Configuration loading
//!
//! Sources, lowest precedence first:
//! 1. `<config dir>/toolbridge.toml` (optional)
//! 2. `--config <file>` (required when given)
//! 3. `TOOLBRIDGE__*` environment variables (e.g. `TOOLBRIDGE__ADAPTER__EXECUTABLE`)
//! 4. command-line flags (applied by the caller)

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use toolbridge_core::domain::AdapterConfig;
use toolbridge_infra_system::RunnerConfig;

const CONFIG_FILE_NAME: &str = "toolbridge.toml";
const ENV_PREFIX: &str = "TOOLBRIDGE";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub adapter: AdapterConfig,
    pub runner: RunnerConfig,
}

/// Per-user default config file location
pub fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "toolbridge").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut builder = Config::builder();

    if let Some(path) = default_config_file() {
        builder = builder.add_source(File::from(path).required(false));
    }

    if let Some(path) = explicit {
        let path = expand_path(path);
        builder = builder.add_source(File::from(path.clone()).required(true));
        tracing::debug!(config = %path.display(), "Loading configuration file");
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("runner.env_allowlist"),
    );

    let mut settings: Settings = builder
        .build()
        .context("failed to read configuration")?
        .try_deserialize()
        .context("invalid configuration")?;

    expand_adapter_paths(&mut settings.adapter);
    Ok(settings)
}

/// Expand `~` and environment variables in a path
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => path.to_path_buf(),
    }
}

fn expand_adapter_paths(config: &mut AdapterConfig) {
    for path in [
        &mut config.input_path,
        &mut config.output_path,
        &mut config.scratch_dir,
    ]
    .into_iter()
    .flatten()
    {
        *path = expand_path(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbridge_core::domain::PathStyle;

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tool.toml");
        std::fs::write(
            &file,
            r#"
[adapter]
executable = "xtb"
input_path = "mol.xyz"
output_path = "energy.json"
trailing_options = "--opt"
path_style = "as_given"
temporary_scratch = true

[adapter.params]
charge = 0

[runner]
timeout_ms = 60000
"#,
        )
        .unwrap();

        let settings = load(Some(&file)).unwrap();

        assert_eq!(settings.adapter.executable.as_deref(), Some("xtb"));
        assert_eq!(settings.adapter.path_style, PathStyle::AsGiven);
        assert!(settings.adapter.temporary_scratch);
        assert_eq!(settings.adapter.params["charge"], 0);
        assert_eq!(settings.runner.timeout_ms, Some(60000));
        assert_eq!(settings.runner.shell, RunnerConfig::default().shell);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = load(Some(Path::new("/nonexistent/toolbridge-test.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_path(Path::new("~/scratch"));
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }
}
