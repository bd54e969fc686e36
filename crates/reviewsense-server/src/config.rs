//! Server configuration

use crate::cli::{ModelArgs, ServeArgs};
use anyhow::{bail, Context};
use reviewsense_classifiers::{ClassifierSettings, ModelSource};
use reviewsense_policy::DEFAULT_MAX_WORDS;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Prefix for the analysis and health endpoints
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Word limit applied to every review
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Request body size limit
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Allow cross-origin requests from any origin
    #[serde(default = "default_true")]
    pub cors_allow_any_origin: bool,

    #[serde(default)]
    pub classifier: ClassifierSettings,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, args: &ServeArgs) -> anyhow::Result<Self> {
        let mut config = Self::from_file(config_path)?;

        if let Some(listen) = &args.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = args.port {
            config.port = port;
        }

        if let Some(max_words) = args.max_words {
            config.max_words = max_words;
        }

        if let Some(backend) = args.backend {
            config.classifier.backend = backend;
        }

        config.apply_model_args(&args.model);
        config.validate()?;
        Ok(config)
    }

    /// Read the file if it exists, otherwise start from defaults
    pub fn from_file(config_path: &str) -> anyhow::Result<Self> {
        if !Path::new(config_path).exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", config_path))?;
        Ok(config)
    }

    pub fn apply_model_args(&mut self, model: &ModelArgs) {
        if let Some(path) = &model.model_path {
            self.classifier.source = ModelSource::Local { path: path.clone() };
        } else if let Some(repo) = &model.model {
            self.classifier.source = ModelSource::HuggingFace {
                repo: repo.clone(),
                revision: "main".to_string(),
            };
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.api_prefix.starts_with('/') || self.api_prefix.ends_with('/') {
            bail!(
                "api_prefix must start with '/' and must not end with '/', got '{}'",
                self.api_prefix
            );
        }

        if self.max_words == 0 {
            bail!("max_words must be at least 1");
        }

        if self.max_body_bytes == 0 {
            bail!("max_body_bytes must be at least 1");
        }

        Ok(())
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.listen, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.listen, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            api_prefix: default_api_prefix(),
            max_words: default_max_words(),
            max_body_bytes: default_max_body_bytes(),
            cors_allow_any_origin: true,
            classifier: ClassifierSettings::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_max_words() -> usize {
    DEFAULT_MAX_WORDS
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewsense_classifiers::ClassifierBackend;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load("/nonexistent/reviewsense.yaml", &ServeArgs::default())
            .unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.api_prefix, "/api/v1");
        assert_eq!(config.max_words, 250);
        assert!(config.cors_allow_any_origin);
        assert_eq!(config.classifier.backend, ClassifierBackend::Distilbert);
    }

    #[test]
    fn test_file_and_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
port: 9100
max_words: 100
cors_allow_any_origin: false
classifier:
  backend: lexicon
"#
        )
        .unwrap();

        let args = ServeArgs {
            port: Some(9200),
            ..Default::default()
        };
        let config = ServerConfig::load(file.path().to_str().unwrap(), &args).unwrap();

        assert_eq!(config.port, 9200);
        assert_eq!(config.max_words, 100);
        assert!(!config.cors_allow_any_origin);
        assert_eq!(config.classifier.backend, ClassifierBackend::Lexicon);
        assert_eq!(config.listen, "0.0.0.0");
    }

    #[test]
    fn test_model_path_override() {
        let args = ServeArgs {
            model: ModelArgs {
                model: None,
                model_path: Some(PathBuf::from("/models/sst2")),
            },
            ..Default::default()
        };
        let config = ServerConfig::load("/nonexistent.yaml", &args).unwrap();
        assert_eq!(
            config.classifier.source,
            ModelSource::Local {
                path: PathBuf::from("/models/sst2")
            }
        );
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        let config = ServerConfig {
            api_prefix: "/api/v1/".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            api_prefix: "api".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: [not a number").unwrap();
        assert!(ServerConfig::from_file(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_listen_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr().unwrap().port(), 8000);
    }
}
