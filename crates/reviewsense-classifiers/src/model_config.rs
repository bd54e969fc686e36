//! Classifier and model configuration structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Model used when nothing else is configured
pub const DEFAULT_MODEL_REPO: &str = "distilbert-base-uncased-finetuned-sst-2-english";

/// Which classifier implementation to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// Candle DistilBERT sequence classifier
    #[default]
    Distilbert,
    /// Word-list classifier, no model weights needed
    Lexicon,
}

impl std::str::FromStr for ClassifierBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "distilbert" => Ok(Self::Distilbert),
            "lexicon" => Ok(Self::Lexicon),
            other => Err(format!(
                "unknown classifier backend '{}' (expected distilbert or lexicon)",
                other
            )),
        }
    }
}

/// Classifier configuration (the `classifier:` section of the server config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierSettings {
    #[serde(default)]
    pub backend: ClassifierBackend,

    /// Where model weights come from (ignored by the lexicon backend)
    #[serde(default)]
    pub source: ModelSource,

    /// Inference settings
    #[serde(default)]
    pub inference: InferenceConfig,
}

impl ClassifierSettings {
    pub fn lexicon() -> Self {
        Self {
            backend: ClassifierBackend::Lexicon,
            ..Default::default()
        }
    }

    /// Human-readable model identifier for logs
    pub fn model_id(&self) -> String {
        match self.backend {
            ClassifierBackend::Lexicon => "sentiment-lexicon".to_string(),
            ClassifierBackend::Distilbert => match &self.source {
                ModelSource::HuggingFace { repo, revision } => format!("{}@{}", repo, revision),
                ModelSource::Local { path } => path.display().to_string(),
            },
        }
    }
}

/// Model source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSource {
    /// Load from local filesystem
    Local { path: PathBuf },

    /// Download from HuggingFace Hub
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::HuggingFace {
            repo: DEFAULT_MODEL_REPO.to_string(),
            revision: default_revision(),
        }
    }
}

fn default_revision() -> String {
    "main".to_string()
}

/// Inference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Device to run on (cpu, cuda, mps)
    #[serde(default = "default_device")]
    pub device: String,

    /// Maximum sequence length in subword tokens
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_max_length() -> usize {
    512
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            max_length: default_max_length(),
        }
    }
}
