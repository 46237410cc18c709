//! Configuration file discovery and loading
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. `<user config dir>/vpop/config.toml`
//! 4. Built-in defaults (no file)
//!
//! A missing configuration file never terminates startup: the caller gets
//! defaults and a warning is logged.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "VPOP_CONFIG";

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolve which config file to read, if any.
///
/// Returns `None` when neither an override nor the per-user file exists;
/// callers fall back to built-in defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: per-user config file
    default_config_path().filter(|p| p.exists())
}

/// Per-user config file location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vpop").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(toml::from_str(&content)?)
}

/// Load a config file, degrading to defaults when it does not exist.
///
/// A file that exists but fails to parse is still an error.
pub fn load_toml_or_default<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        info!("No config file found, using built-in defaults");
        return Ok(T::default());
    };

    if !path.exists() {
        warn!(
            "Config file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(T::default());
    }

    info!("Loading configuration from {}", path.display());
    load_toml(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[derive(Debug, Deserialize, Default, PartialEq)]
    struct Sample {
        #[serde(default)]
        name: String,
        #[serde(default)]
        logging: LoggingConfig,
    }

    #[test]
    fn test_logging_config_default_level() {
        assert_eq!(LoggingConfig::default().level, "info");
    }

    #[test]
    #[serial]
    fn test_cli_arg_wins_over_env() {
        std::env::set_var("VPOP_TEST_CONFIG_A", "/tmp/from-env.toml");
        let resolved = resolve_config_path(Some(Path::new("/tmp/cli.toml")), "VPOP_TEST_CONFIG_A");
        assert_eq!(resolved, Some(PathBuf::from("/tmp/cli.toml")));
        std::env::remove_var("VPOP_TEST_CONFIG_A");
    }

    #[test]
    #[serial]
    fn test_env_var_used_without_cli() {
        std::env::set_var("VPOP_TEST_CONFIG_B", "/tmp/from-env.toml");
        let resolved = resolve_config_path(None, "VPOP_TEST_CONFIG_B");
        assert_eq!(resolved, Some(PathBuf::from("/tmp/from-env.toml")));
        std::env::remove_var("VPOP_TEST_CONFIG_B");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let sample: Sample =
            load_toml_or_default(Some(Path::new("/nonexistent/vpop/config.toml"))).unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn test_no_path_yields_defaults() {
        let sample: Sample = load_toml_or_default(None).unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn test_load_toml_parses_nested_logging() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name = \"overlay\"\n[logging]\nlevel = \"debug\"").unwrap();

        let sample: Sample = load_toml_or_default(Some(file.path())).unwrap();
        assert_eq!(sample.name, "overlay");
        assert_eq!(sample.logging.level, "debug");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name = [unterminated").unwrap();

        let result: Result<Sample> = load_toml_or_default(Some(file.path()));
        assert!(matches!(result, Err(Error::Toml(_))));
    }
}
