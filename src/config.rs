//! Probe configuration.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional settings file, then `PERFWATCH_*` environment variables, then
//! command-line overrides. The merged [`Settings`] are validated once into
//! an immutable [`ProbeConfig`] that the orchestrator and probe borrow.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::data::Thresholds;
use crate::error::ConfigError;

pub const DEFAULT_OBJECT: &str = "Memory";
pub const DEFAULT_THRESHOLD: &str = "1";
pub const DEFAULT_MAX_CACHE_AGE_SECS: u64 = 180;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_OUTPUT_PREFIX: &str = "CUCM Perfmon";
pub const ENV_PREFIX: &str = "PERFWATCH";

/// Raw merged settings, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Option<String>,
    #[serde(default)]
    pub nodes: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub object: String,
    #[serde(default)]
    pub counter: String,
    pub warning: String,
    pub critical: String,
    pub max_cache_age_secs: u64,
    pub list_counters: bool,
    pub cache_dir: Option<PathBuf>,
    pub timeout_secs: u64,
    pub accept_invalid_certs: bool,
    pub output_prefix: String,
}

impl Settings {
    /// Defaults, optional settings file and environment, ready for
    /// command-line overrides.
    pub fn builder(config_file: Option<&Path>) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Self::builder_with_env(config_file, Environment::with_prefix(ENV_PREFIX))
    }

    /// Like [`Settings::builder`] with an explicit environment source.
    ///
    /// Environment values stay strings: passwords and threshold ranges are
    /// passed through verbatim and numeric keys are parsed on deserialize.
    pub fn builder_with_env(
        config_file: Option<&Path>,
        env: Environment,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let mut builder = Config::builder()
            .set_default("object", DEFAULT_OBJECT)?
            .set_default("warning", DEFAULT_THRESHOLD)?
            .set_default("critical", DEFAULT_THRESHOLD)?
            .set_default("max_cache_age_secs", DEFAULT_MAX_CACHE_AGE_SECS)?
            .set_default("list_counters", false)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("accept_invalid_certs", false)?
            .set_default("output_prefix", DEFAULT_OUTPUT_PREFIX)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path));
        }

        Ok(builder.add_source(env))
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        Ok(config.try_deserialize()?)
    }
}

/// Validated, immutable configuration for one invocation.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Server the PerfmonPort service runs on.
    pub server: String,
    /// Nodes to probe, in order.
    pub nodes: Vec<String>,
    pub username: String,
    pub password: String,
    /// Object with optional instance suffix, e.g. `Processor(_Total)`.
    pub object_instance: String,
    /// Counter to evaluate; empty lists the whole object.
    pub counter: String,
    pub thresholds: Thresholds,
    pub max_cache_age: Duration,
    pub list_counters: bool,
    pub cache_dir: PathBuf,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    pub output_prefix: String,
}

impl ProbeConfig {
    /// Object name without the instance suffix; this is what the server is
    /// asked for and what the cache is keyed on.
    pub fn object(&self) -> &str {
        object_name(&self.object_instance)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            nodes: Vec::new(),
            username: String::new(),
            password: String::new(),
            object_instance: DEFAULT_OBJECT.to_string(),
            counter: String::new(),
            thresholds: Thresholds::default(),
            max_cache_age: Duration::from_secs(DEFAULT_MAX_CACHE_AGE_SECS),
            list_counters: false,
            cache_dir: default_cache_dir(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            accept_invalid_certs: false,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
        }
    }
}

impl TryFrom<Settings> for ProbeConfig {
    type Error = ConfigError;

    fn try_from(settings: Settings) -> Result<Self, Self::Error> {
        let server = settings
            .server
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("server"))?;

        let nodes = split_nodes(&settings.nodes);
        if nodes.is_empty() {
            return Err(ConfigError::Missing("nodes"));
        }

        if settings.object.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "object",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            server,
            nodes,
            username: settings.username,
            password: settings.password,
            object_instance: settings.object,
            counter: settings.counter,
            thresholds: Thresholds::parse(&settings.warning, &settings.critical),
            max_cache_age: Duration::from_secs(settings.max_cache_age_secs),
            list_counters: settings.list_counters,
            cache_dir: settings.cache_dir.unwrap_or_else(default_cache_dir),
            timeout: Duration::from_secs(settings.timeout_secs),
            accept_invalid_certs: settings.accept_invalid_certs,
            output_prefix: settings.output_prefix,
        })
    }
}

/// Split a comma-separated node list, dropping blanks.
pub fn split_nodes(nodes: &str) -> Vec<String> {
    nodes
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect()
}

/// `Processor(_Total)` -> `Processor`
pub fn object_name(object_instance: &str) -> &str {
    match object_instance.find('(') {
        Some(pos) => &object_instance[..pos],
        None => object_instance,
    }
}

pub fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("perfwatch_cache")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(builder: ConfigBuilder<DefaultState>) -> Result<ProbeConfig, ConfigError> {
        let settings = Settings::from_config(builder.build()?)?;
        ProbeConfig::try_from(settings)
    }

    #[test]
    fn test_split_nodes() {
        assert_eq!(split_nodes("10.0.0.1"), vec!["10.0.0.1"]);
        assert_eq!(
            split_nodes(" 10.0.0.1, 10.0.0.2 ,,"),
            vec!["10.0.0.1", "10.0.0.2"]
        );
        assert!(split_nodes(" , ").is_empty());
    }

    #[test]
    fn test_object_name() {
        assert_eq!(object_name("Processor(_Total)"), "Processor");
        assert_eq!(object_name("Memory"), "Memory");
        assert_eq!(object_name("Cisco CallManager"), "Cisco CallManager");
    }

    #[test]
    fn test_defaults_with_overrides() {
        let builder = Settings::builder(None)
            .unwrap()
            .set_override("server", "cucm-pub")
            .unwrap()
            .set_override("nodes", "10.0.0.1,10.0.0.2")
            .unwrap();

        let config = load(builder).unwrap();
        assert_eq!(config.server, "cucm-pub");
        assert_eq!(config.nodes, vec!["10.0.0.1", "10.0.0.2"]);
        assert_eq!(config.object_instance, "Memory");
        assert_eq!(config.thresholds.warning_spec, "1");
        assert_eq!(config.thresholds.critical_spec, "1");
        assert_eq!(config.max_cache_age, Duration::from_secs(180));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.output_prefix, "CUCM Perfmon");
        assert!(!config.list_counters);
        assert_eq!(config.cache_dir, default_cache_dir());
    }

    #[test]
    fn test_settings_file_then_override() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
server = "cucm-pub"
nodes = "10.0.0.1"
object = "Processor(_Total)"
counter = "% CPU Time"
warning = "80"
critical = "90"
max_cache_age_secs = 60
"#
        )
        .unwrap();

        let builder = Settings::builder(Some(file.path()))
            .unwrap()
            .set_override_option("critical", Some("95"))
            .unwrap()
            .set_override_option::<_, String>("warning", None)
            .unwrap();

        let config = load(builder).unwrap();
        assert_eq!(config.object_instance, "Processor(_Total)");
        assert_eq!(config.object(), "Processor");
        assert_eq!(config.counter, "% CPU Time");
        assert_eq!(config.thresholds.warning_spec, "80");
        assert_eq!(config.thresholds.critical_spec, "95");
        assert_eq!(config.max_cache_age, Duration::from_secs(60));
    }

    #[test]
    fn test_environment_values_stay_verbatim() {
        let vars: config::Map<String, String> = [
            ("PERFWATCH_SERVER", "cucm-pub"),
            ("PERFWATCH_NODES", "10.0.0.1"),
            ("PERFWATCH_PASSWORD", "0123"),
            ("PERFWATCH_WARNING", "1e3"),
            ("PERFWATCH_CRITICAL", "@10:20"),
            ("PERFWATCH_MAX_CACHE_AGE_SECS", "60"),
            ("PERFWATCH_ACCEPT_INVALID_CERTS", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let env = Environment::with_prefix(ENV_PREFIX).source(Some(vars));

        let config = load(Settings::builder_with_env(None, env).unwrap()).unwrap();
        assert_eq!(config.password, "0123");
        assert_eq!(config.thresholds.warning_spec, "1e3");
        assert_eq!(config.thresholds.critical_spec, "@10:20");
        assert_eq!(config.max_cache_age, Duration::from_secs(60));
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_missing_server() {
        let builder = Settings::builder(None)
            .unwrap()
            .set_override("nodes", "10.0.0.1")
            .unwrap();
        assert!(matches!(load(builder), Err(ConfigError::Missing("server"))));
    }

    #[test]
    fn test_missing_nodes() {
        let builder = Settings::builder(None)
            .unwrap()
            .set_override("server", "cucm")
            .unwrap()
            .set_override("nodes", " , ")
            .unwrap();
        assert!(matches!(load(builder), Err(ConfigError::Missing("nodes"))));
    }
}
