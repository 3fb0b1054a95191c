//! Process configuration, layered as built-in defaults, then the YAML file,
//! then `APP__`-prefixed environment variables (`APP__SERVER__PORT=8080`).
//!
//! Module sections stay untyped here; each module deserializes its own
//! `modules.<name>` entry through [`AppConfig::module_config`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::paths::{resolve_home_dir, resolve_under};

/// Directory under the user's home used when `server.home_dir` is empty.
pub const DEFAULT_HOME_SUBDIR: &str = ".labpresence";

/// Logging section applied to targets without a section of their own.
pub const DEFAULT_LOG_SECTION: &str = "default";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// `None` until a file or the CLI provides logging settings.
    pub logging: Option<LoggingConfig>,
    /// Directory of `<module>.yaml` files merged into `modules`. Relative to
    /// the config file.
    #[serde(default)]
    pub modules_dir: Option<String>,
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Absolute after loading; data and log paths resolve against it.
    pub home_dir: String,
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds; 0 keeps the HTTP layer's own setting.
    #[serde(default)]
    pub timeout_sec: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            host: "127.0.0.1".to_owned(),
            port: 3001,
            timeout_sec: 0,
        }
    }
}

/// Target name (crate or module path prefix) to its log settings.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// `trace`..`error`, or `off`.
    pub console_level: String,
    /// Log file, relative to the home dir. Empty disables file output.
    pub file: String,
    /// Empty means the same as `console_level`.
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

pub fn default_logging_config() -> LoggingConfig {
    HashMap::from([(
        DEFAULT_LOG_SECTION.to_owned(),
        Section {
            console_level: "info".to_owned(),
            file: "logs/labpresence.log".to_owned(),
            file_level: "debug".to_owned(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    )])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or use the built-in defaults when no path is given.
    ///
    /// An explicit path must exist. In both cases `server.home_dir` is made
    /// absolute and created.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let configured = Some(config.server.home_dir.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        let home = resolve_home_dir(configured, DEFAULT_HOME_SUBDIR, true)
            .context("Failed to resolve server.home_dir")?;
        config.server.home_dir = home.to_string_lossy().into_owned();

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        // figment would quietly treat a missing file as an empty layer
        if !path.is_file() {
            bail!("config file not found: {}", path.display());
        }

        // logging stays None unless the file or env sets it
        let base = AppConfig {
            logging: None,
            ..AppConfig::default()
        };

        let mut config: AppConfig = Figment::from(Serialized::defaults(base))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("APP__").split("__"))
            .extract()
            .with_context(|| format!("Failed to parse yaml config from {}", path.display()))?;

        if let Some(dir) = &config.modules_dir {
            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            let dir = resolve_under(dir, base_dir);
            config.modules.extend(read_module_files(&dir)?);
        }

        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Typed view of `modules.<name>`; an absent entry yields `T::default()`.
    pub fn module_config<T>(&self, name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let Some(raw) = self.modules.get(name) else {
            return Ok(T::default());
        };
        serde_json::from_value(raw.clone())
            .with_context(|| format!("Invalid configuration for module '{name}'"))
    }

    pub fn home_dir(&self) -> PathBuf {
        PathBuf::from(&self.server.home_dir)
    }

    /// `--port` replaces `server.port`; each `-v` raises the default console
    /// level one step (debug, then trace).
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }

        let level = match overrides.verbose {
            0 => return,
            1 => "debug",
            _ => "trace",
        };
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(section) = logging.get_mut(DEFAULT_LOG_SECTION) {
            section.console_level = level.to_owned();
        }
    }
}

/// Command line flags that take precedence over the loaded file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub verbose: u8,
}

/// `<name>.yaml` / `<name>.yml` files in `dir`, keyed by file stem.
/// A missing directory contributes nothing.
fn read_module_files(dir: &Path) -> Result<HashMap<String, serde_json::Value>> {
    let mut found = HashMap::new();
    if !dir.is_dir() {
        return Ok(found);
    }

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list modules_dir {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !is_yaml || !path.is_file() {
            continue;
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value: serde_json::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse module yaml {}", path.display()))?;
        found.insert(name.to_owned(), value);
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_yaml(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn posix(p: &Path) -> String {
        p.to_string_lossy().replace('\\', "/")
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Probe {
        data_dir: String,
        enable_reset: bool,
    }

    #[test]
    fn defaults_listen_on_localhost_3001() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3001);
        assert_eq!(
            config.logging.unwrap()[DEFAULT_LOG_SECTION].file,
            "logs/labpresence.log"
        );
    }

    #[test]
    fn file_sections_are_loaded_and_home_is_created() {
        let tmp = tempdir().unwrap();
        let home = tmp.path().join("home");
        let path = write_yaml(
            tmp.path(),
            "cfg.yaml",
            &format!(
                r#"
server:
  home_dir: "{}"
  host: "0.0.0.0"
  port: 9090
  timeout_sec: 30
logging:
  default:
    console_level: debug
    file: "logs/server.log"
modules:
  attendance:
    data_dir: "lab-data"
    enable_reset: true
"#,
                posix(&home)
            ),
        );

        let config = AppConfig::load(Some(path.as_path())).unwrap();

        assert!(home.is_dir());
        assert!(config.home_dir().is_absolute());
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.timeout_sec, 30);
        assert_eq!(
            config.logging.as_ref().unwrap()["default"].file,
            "logs/server.log"
        );
        assert_eq!(
            config.module_config::<Probe>("attendance").unwrap(),
            Probe {
                data_dir: "lab-data".into(),
                enable_reset: true
            }
        );
        assert_eq!(config.module_config::<Probe>("absent").unwrap(), Probe::default());
    }

    #[test]
    fn partial_server_section_keeps_defaults_and_logging_stays_unset() {
        let tmp = tempdir().unwrap();
        let path = write_yaml(
            tmp.path(),
            "cfg.yaml",
            &format!("server:\n  home_dir: \"{}\"\n  port: 8080\n", posix(tmp.path())),
        );

        let config = AppConfig::load(Some(path.as_path())).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.logging.is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = tempdir().unwrap();
        let err = AppConfig::load(Some(tmp.path().join("nope.yaml").as_path())).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn unknown_top_level_section_is_rejected() {
        let tmp = tempdir().unwrap();
        let path = write_yaml(
            tmp.path(),
            "cfg.yaml",
            &format!(
                "server:\n  home_dir: \"{}\"\ndatabase:\n  url: x\n",
                posix(tmp.path())
            ),
        );
        assert!(AppConfig::load(Some(path.as_path())).is_err());
    }

    #[test]
    fn modules_dir_is_relative_to_the_config_file() {
        let tmp = tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("conf.d")).unwrap();
        write_yaml(
            &tmp.path().join("conf.d"),
            "api_ingress.yml",
            "bind_addr: \"127.0.0.1:4100\"\ncors_enabled: false\n",
        );
        write_yaml(&tmp.path().join("conf.d"), "notes.txt", "ignored");
        let path = write_yaml(
            tmp.path(),
            "cfg.yaml",
            &format!(
                "server:\n  home_dir: \"{}\"\nmodules_dir: conf.d\nmodules:\n  attendance:\n    data_dir: data\n",
                posix(&tmp.path().join("home"))
            ),
        );

        let config = AppConfig::load(Some(path.as_path())).unwrap();

        assert_eq!(config.modules.len(), 2);
        assert_eq!(config.modules["api_ingress"]["bind_addr"], "127.0.0.1:4100");
        assert_eq!(config.modules["api_ingress"]["cors_enabled"], false);
    }

    #[test]
    fn verbosity_raises_console_level() {
        for (verbose, expected) in [(0, "info"), (1, "debug"), (2, "trace"), (5, "trace")] {
            let mut config = AppConfig::default();
            config.apply_overrides(Overrides {
                port: Some(4000),
                verbose,
            });

            assert_eq!(config.server.port, 4000);
            assert_eq!(
                config.logging.unwrap()[DEFAULT_LOG_SECTION].console_level,
                expected
            );
        }
    }

    #[test]
    fn yaml_dump_reloads() {
        let yaml = AppConfig::default().to_yaml().unwrap();
        let back: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.server.port, 3001);
        assert!(back.logging.is_some());
    }
}
