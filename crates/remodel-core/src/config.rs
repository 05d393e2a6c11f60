//! Configuration
//!
//! Values come from, in increasing precedence:
//! 1. Defaults
//! 2. Config file (~/.config/remodel/config.toml, or REMODEL_CONFIG)
//! 3. Environment variables (REMODEL_* prefix)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix
const ENV_PREFIX: &str = "REMODEL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Process configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL for entity types without an explicit location
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Schema file describing the entity types
    #[serde(default)]
    pub schema_path: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            schema_path: None,
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields defaults. Environment overrides still apply.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var(format!("{}_BASE_URL", ENV_PREFIX)) {
            self.base_url = if val.is_empty() { None } else { Some(val) };
        }

        if let Ok(val) = std::env::var(format!("{}_TIMEOUT_SECS", ENV_PREFIX)) {
            self.timeout_secs = val
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}_TIMEOUT_SECS: {:?}", ENV_PREFIX, val))?;
        }

        if let Ok(val) = std::env::var(format!("{}_SCHEMA", ENV_PREFIX)) {
            self.schema_path = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        if let Ok(val) = std::env::var(format!("{}_LOG", ENV_PREFIX)) {
            self.log_level = if val.is_empty() { None } else { Some(val) };
        }

        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with the REMODEL_CONFIG environment variable.
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("remodel")
            .join("config.toml")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("remodel/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // Serializes tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Locks env access, clears the given vars and restores them on drop
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "REMODEL_BASE_URL",
        "REMODEL_TIMEOUT_SECS",
        "REMODEL_SCHEMA",
        "REMODEL_LOG",
        "REMODEL_CONFIG",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.base_url.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("remodel/"));
    }

    #[test]
    fn test_env_override_base_url() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("REMODEL_BASE_URL", "http://api.example.com");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://api.example.com"));

        // Empty string clears it
        env::set_var("REMODEL_BASE_URL", "");
        config.apply_env_overrides().unwrap();
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_env_override_timeout() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("REMODEL_TIMEOUT_SECS", "5");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.timeout_secs, 5);

        env::set_var("REMODEL_TIMEOUT_SECS", "soon");
        assert!(config.apply_env_overrides().is_err());
    }

    #[test]
    fn test_env_override_schema_and_log() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("REMODEL_SCHEMA", "/etc/remodel/schema.toml");
        env::set_var("REMODEL_LOG", "debug");
        config.apply_env_overrides().unwrap();
        assert_eq!(
            config.schema_path,
            Some(PathBuf::from("/etc/remodel/schema.toml"))
        );
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_config_file_path_override() {
        let _guard = EnvGuard::new(ENV_VARS);

        assert!(Config::config_file_path().ends_with("remodel/config.toml"));

        env::set_var("REMODEL_CONFIG", "/tmp/remodel.toml");
        assert_eq!(Config::config_file_path(), PathBuf::from("/tmp/remodel.toml"));
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            base_url = "http://example.com"
            timeout_secs = 10
            schema_path = "schema.toml"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://example.com"));
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.schema_path, Some(PathBuf::from("schema.toml")));
        assert!(config.user_agent.starts_with("remodel/"));
    }

    #[test]
    fn test_load_from_path() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://from-file.test\"").unwrap();
        env::set_var("REMODEL_BASE_URL", "http://from-env.test");

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://from-env.test"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::load_from_path(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_path_invalid() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = \"thirty\"").unwrap();
        assert!(Config::load_from_path(file.path()).is_err());
    }
}
