use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use vanguard_providers::{EndpointBackend, PageSpeedBackend, ScanBackend};

pub const CONFIG_FILE: &str = "vanguard.yaml";
pub const DEFAULT_PROMPT: &str = "$ ";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Invalid argument: {0}")]
    Argument(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    /// A scan service answering `GET <url>?url=<target>`.
    Endpoint { url: String },
    /// Google PageSpeed Insights, called directly.
    #[serde(rename = "pagespeed")]
    PageSpeed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::PageSpeed { api_key: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".vanguard")
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: BackendConfig::default(),
            prompt: default_prompt(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Builds the effective configuration: file in the data directory (if
    /// any), then environment, then command line.
    pub fn resolve(args: &CliArgs) -> Result<Self, ConfigError> {
        let data_dir = args
            .data_dir
            .clone()
            .or_else(|| std::env::var_os("VANGUARD_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(default_data_dir);

        let config_path = data_dir.join(CONFIG_FILE);
        let mut config = if config_path.exists() {
            Self::load(&config_path)?
        } else {
            Self::default()
        };
        config.data_dir = data_dir;
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("VANGUARD_SCAN_ENDPOINT").filter(|u| !u.trim().is_empty()) {
            self.backend = BackendConfig::Endpoint { url };
        }
        if let BackendConfig::PageSpeed { api_key } = &mut self.backend {
            if let Some(key) = var("GOOGLE_PAGESPEED_API_KEY") {
                *api_key = Some(key);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prompt.is_empty() {
            return Err(ConfigError::Invalid("prompt cannot be empty".to_string()));
        }
        if let BackendConfig::Endpoint { url } = &self.backend {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "endpoint must be an http(s) URL: {}",
                    url
                )));
            }
        }
        Ok(())
    }

    pub fn build_backend(&self) -> Arc<dyn ScanBackend> {
        match &self.backend {
            BackendConfig::Endpoint { url } => Arc::new(EndpointBackend::new(url.clone())),
            BackendConfig::PageSpeed { api_key } => {
                if api_key.is_none() {
                    tracing::warn!("GOOGLE_PAGESPEED_API_KEY is not set; scans will fail");
                }
                Arc::new(PageSpeedBackend::new(api_key.clone()))
            }
        }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("vanguard.log")
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    pub data_dir: Option<PathBuf>,
    pub ephemeral: bool,
    pub help: bool,
}

pub const USAGE: &str = "Usage: vanguard [--data-dir <path>] [--ephemeral] [--help]

  --data-dir <path>  Directory for config, saved aliases/monitors and logs
  --ephemeral        Do not load or save aliases and monitors
  --help             Show this message";

impl CliArgs {
    pub fn parse<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => {
                    let dir = args.next().ok_or_else(|| {
                        ConfigError::Argument("--data-dir requires a path".to_string())
                    })?;
                    parsed.data_dir = Some(PathBuf::from(dir));
                }
                "--ephemeral" => parsed.ephemeral = true,
                "-h" | "--help" => parsed.help = true,
                other => return Err(ConfigError::Argument(other.to_string())),
            }
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_cli_args() {
        let parsed = CliArgs::parse(args(&["--data-dir", "/tmp/v", "--ephemeral"])).unwrap();
        assert_eq!(parsed.data_dir, Some(PathBuf::from("/tmp/v")));
        assert!(parsed.ephemeral);
        assert!(!parsed.help);

        assert!(matches!(
            CliArgs::parse(args(&["--data-dir"])),
            Err(ConfigError::Argument(_))
        ));
        assert!(matches!(
            CliArgs::parse(args(&["--bogus"])),
            Err(ConfigError::Argument(_))
        ));
    }

    #[test]
    fn test_yaml_backend_variants() {
        let config: Config = serde_yaml::from_str(
            "backend:\n  type: endpoint\n  url: http://localhost:3000/api/scan\n",
        )
        .unwrap();
        assert_eq!(
            config.backend,
            BackendConfig::Endpoint {
                url: "http://localhost:3000/api/scan".to_string()
            }
        );
        assert_eq!(config.prompt, DEFAULT_PROMPT);

        let config: Config = serde_yaml::from_str("backend:\n  type: pagespeed\n").unwrap();
        assert_eq!(config.backend, BackendConfig::PageSpeed { api_key: None });
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|name| match name {
            "GOOGLE_PAGESPEED_API_KEY" => Some("secret".to_string()),
            _ => None,
        });
        assert_eq!(
            config.backend,
            BackendConfig::PageSpeed {
                api_key: Some("secret".to_string())
            }
        );

        config.apply_env(|name| match name {
            "VANGUARD_SCAN_ENDPOINT" => Some("https://scan.example/api".to_string()),
            _ => None,
        });
        assert!(matches!(config.backend, BackendConfig::Endpoint { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let config = Config {
            backend: BackendConfig::Endpoint {
                url: "ftp://x".to_string(),
            },
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_resolve_reads_file_in_data_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), "prompt: \"vg> \"\n").unwrap();

        let config = Config::resolve(&CliArgs {
            data_dir: Some(temp_dir.path().to_path_buf()),
            ..CliArgs::default()
        })
        .unwrap();
        assert_eq!(config.prompt, "vg> ");
        assert_eq!(config.data_dir, temp_dir.path());
    }
}
