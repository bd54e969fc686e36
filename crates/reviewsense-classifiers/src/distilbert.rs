//! DistilBERT sentiment classifier backed by Candle
//!
//! Loads a DistilBERT sequence classification checkpoint (by default
//! `distilbert-base-uncased-finetuned-sst-2-english`) from the Hugging Face
//! Hub or a local directory. Forward passes run on tokio's blocking pool.

use crate::classifier::{ClassificationMetadata, ClassificationResult, Classifier};
use crate::model_config::{ClassifierSettings, ModelSource};
use async_trait::async_trait;
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use reviewsense_core::{Error, Result, SentimentLabel};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokenizers::{Tokenizer, TruncationParams};

pub struct DistilBertSentimentClassifier {
    name: String,
    inner: Arc<DistilBertInner>,
}

struct DistilBertInner {
    name: String,
    tokenizer: Tokenizer,
    model: DistilBertModel,
    pre_classifier: Option<Linear>,
    classifier: Linear,
    device: Device,
    /// Label for each logit index, from the checkpoint's `id2label`
    labels: Vec<SentimentLabel>,
}

impl DistilBertSentimentClassifier {
    /// Resolve, download if needed, and load the configured checkpoint.
    ///
    /// Blocking: performs network and disk IO.
    pub fn load(settings: &ClassifierSettings) -> Result<Self> {
        let model_path = fetch_model(&settings.source)?;
        let name = settings.model_id();

        let mut tokenizer = load_tokenizer(&model_path)?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: settings.inference.max_length,
                ..Default::default()
            }))
            .map_err(|e| Error::classifier(format!("Failed to configure truncation: {}", e)))?;

        let (config_json, distilbert_config) = read_checkpoint_config(&model_path)?;

        let hidden_size = config_json
            .get("dim")
            .or_else(|| config_json.get("hidden_size"))
            .and_then(|v| v.as_u64())
            .unwrap_or(768) as usize;

        let labels = parse_id2label(&config_json)?;

        let device = get_device(&settings.inference.device)?;
        let vb = load_var_builder(&model_path, &device)?;

        let model = DistilBertModel::load(vb.pp("distilbert"), &distilbert_config)
            .map_err(|e| Error::classifier(format!("Failed to load DistilBERT model: {}", e)))?;

        let pre_classifier =
            candle_nn::linear(hidden_size, hidden_size, vb.pp("pre_classifier")).ok();
        if pre_classifier.is_some() {
            tracing::debug!("Loaded pre_classifier layer (hidden_size={})", hidden_size);
        }

        let classifier = candle_nn::linear(hidden_size, labels.len(), vb.pp("classifier"))
            .map_err(|e| {
                Error::classifier(format!("Failed to load classification head: {}", e))
            })?;

        tracing::info!(
            model = %name,
            labels = ?labels,
            "Loaded DistilBERT sentiment classifier"
        );

        Ok(Self {
            name: name.clone(),
            inner: Arc::new(DistilBertInner {
                name,
                tokenizer,
                model,
                pre_classifier,
                classifier,
                device,
                labels,
            }),
        })
    }
}

impl DistilBertInner {
    fn infer(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::classifier(format!("Tokenization failed: {}", e)))?;

        let input_ids_i64: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let input_ids = Tensor::new(input_ids_i64.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::classifier(format!("Failed to create input tensor: {}", e)))?;

        // DistilBERT masks positions where the mask is 1, the inverse of the tokenizer's
        let attention_mask_inverted: Vec<u8> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| if x == 0 { 1u8 } else { 0u8 })
            .collect();
        let attention_mask = Tensor::new(attention_mask_inverted.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::classifier(format!("Failed to create attention mask: {}", e)))?;

        let hidden_states = self
            .model
            .forward(&input_ids, &attention_mask)
            .map_err(|e| Error::classifier(format!("Model forward pass failed: {}", e)))?;

        let cls_embedding = hidden_states
            .i((0, 0, ..))
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::classifier(format!("Failed to get CLS token: {}", e)))?;

        let pooled_output = match &self.pre_classifier {
            Some(pre_classifier) => pre_classifier
                .forward(&cls_embedding)
                .and_then(|t| t.relu())
                .map_err(|e| Error::classifier(format!("Pre-classifier failed: {}", e)))?,
            None => cls_embedding,
        };

        let logits = self
            .classifier
            .forward(&pooled_output)
            .map_err(|e| Error::classifier(format!("Classification head failed: {}", e)))?;

        let probs = to_probabilities(&logits)?;
        Ok(build_result(&self.name, &self.labels, &probs, start))
    }
}

#[async_trait]
impl Classifier for DistilBertSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || inner.infer(&text))
            .await
            .map_err(|e| Error::classifier(format!("Inference task failed: {}", e)))?
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Make sure the checkpoint files are on disk and return their directory.
///
/// Hub downloads go through the `hf-hub` cache, so repeated calls are cheap.
pub fn fetch_model(source: &ModelSource) -> Result<PathBuf> {
    match source {
        ModelSource::Local { path } => {
            if !path.exists() {
                return Err(Error::classifier(format!(
                    "Model path does not exist: {}",
                    path.display()
                )));
            }
            Ok(path.clone())
        }
        ModelSource::HuggingFace { repo, revision } => download_from_huggingface(repo, revision),
    }
}

fn download_from_huggingface(repo: &str, revision: &str) -> Result<PathBuf> {
    tracing::info!("Fetching model from HuggingFace: {}@{}", repo, revision);

    let api = hf_hub::api::sync::Api::new().map_err(|e| {
        Error::classifier(format!("Failed to initialize HuggingFace API: {}", e))
    })?;

    let repo_obj = api.repo(hf_hub::Repo::with_revision(
        repo.to_string(),
        hf_hub::RepoType::Model,
        revision.to_string(),
    ));

    let config_path = repo_obj
        .get("config.json")
        .map_err(|e| Error::classifier(format!("Failed to download config.json: {}", e)))?;

    repo_obj
        .get("model.safetensors")
        .map_err(|e| Error::classifier(format!("Failed to download model.safetensors: {}", e)))?;

    let found_tokenizer = ["tokenizer.json", "vocab.txt"].iter().any(|file| {
        match repo_obj.get(file) {
            Ok(_) => {
                tracing::debug!("Found tokenizer file: {}", file);
                true
            }
            Err(_) => {
                tracing::debug!("File not found: {}", file);
                false
            }
        }
    });

    if !found_tokenizer {
        return Err(Error::classifier(
            "No tokenizer found (tried tokenizer.json, vocab.txt)",
        ));
    }

    let model_dir = config_path
        .parent()
        .ok_or_else(|| Error::classifier("Invalid cache path"))?;

    tracing::info!("Model available at: {}", model_dir.display());
    Ok(model_dir.to_path_buf())
}

/// Read `config.json` both as raw JSON (for `id2label` and head sizes) and
/// as the Candle DistilBERT config
fn read_checkpoint_config(model_path: &Path) -> Result<(serde_json::Value, DistilBertConfig)> {
    let config_str = std::fs::read_to_string(model_path.join("config.json"))?;
    let config_json: serde_json::Value = serde_json::from_str(&config_str)?;
    let distilbert_config: DistilBertConfig = serde_json::from_str(&config_str)?;
    Ok((config_json, distilbert_config))
}

fn get_device(device_str: &str) -> Result<Device> {
    match device_str.to_lowercase().as_str() {
        "cuda" | "cuda:0" => Device::new_cuda(0)
            .map_err(|e| Error::classifier(format!("Failed to initialize CUDA: {}", e))),
        "mps" | "metal" => Device::new_metal(0)
            .map_err(|e| Error::classifier(format!("Failed to initialize Metal: {}", e))),
        _ => Ok(Device::Cpu),
    }
}

fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_path.join("model.safetensors");
    if !weights_path.exists() {
        return Err(Error::classifier(format!(
            "model.safetensors not found in {}",
            model_path.display()
        )));
    }

    // SAFETY: the weights file is opened read-only and not modified while mapped
    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
            .map_err(|e| Error::classifier(format!("Failed to load weights: {}", e)))?
    };

    Ok(vb)
}

fn load_tokenizer(model_path: &Path) -> Result<Tokenizer> {
    let tokenizer_json_path = model_path.join("tokenizer.json");
    if tokenizer_json_path.exists() {
        tracing::debug!("Loading tokenizer from tokenizer.json");
        return Tokenizer::from_file(&tokenizer_json_path)
            .map_err(|e| Error::classifier(format!("Failed to load tokenizer.json: {}", e)));
    }

    let vocab_path = model_path.join("vocab.txt");
    if vocab_path.exists() {
        tracing::debug!("Building tokenizer from vocab.txt");

        use tokenizers::models::wordpiece::WordPiece;
        use tokenizers::normalizers::BertNormalizer;
        use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
        use tokenizers::processors::bert::BertProcessing;

        let wordpiece = WordPiece::from_file(vocab_path.to_string_lossy().as_ref())
            .unk_token("[UNK]".to_string())
            .build()
            .map_err(|e| Error::classifier(format!("Failed to build WordPiece model: {}", e)))?;

        let mut tokenizer = Tokenizer::new(wordpiece);
        tokenizer.with_normalizer(Some(BertNormalizer::default()));
        tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));

        let sep = ("[SEP]".to_string(), 102);
        let cls = ("[CLS]".to_string(), 101);
        tokenizer.with_post_processor(Some(BertProcessing::new(sep, cls)));

        return Ok(tokenizer);
    }

    Err(Error::classifier(format!(
        "No tokenizer found in {} (tried tokenizer.json, vocab.txt)",
        model_path.display()
    )))
}

/// Read `id2label` from a checkpoint config. Missing means the SST-2 order.
fn parse_id2label(config_json: &serde_json::Value) -> Result<Vec<SentimentLabel>> {
    let Some(map) = config_json.get("id2label").and_then(|v| v.as_object()) else {
        return Ok(vec![SentimentLabel::Negative, SentimentLabel::Positive]);
    };

    let mut entries = map
        .iter()
        .map(|(idx, label)| -> Result<(usize, SentimentLabel)> {
            let idx: usize = idx
                .parse()
                .map_err(|_| Error::config(format!("Invalid id2label index '{}'", idx)))?;
            let label = label
                .as_str()
                .and_then(SentimentLabel::from_model_label)
                .ok_or_else(|| {
                    Error::config(format!(
                        "Unsupported label {} (expected a binary positive/negative model)",
                        label
                    ))
                })?;
            Ok((idx, label))
        })
        .collect::<Result<Vec<_>>>()?;

    entries.sort_by_key(|(idx, _)| *idx);
    let labels: Vec<_> = entries.into_iter().map(|(_, label)| label).collect();

    if labels.len() != 2 || labels[0] == labels[1] {
        return Err(Error::config(format!(
            "Expected exactly one POSITIVE and one NEGATIVE label, got {:?}",
            labels
        )));
    }

    Ok(labels)
}

fn to_probabilities(logits: &Tensor) -> Result<Vec<f32>> {
    candle_nn::ops::softmax(logits, D::Minus1)
        .and_then(|t| t.squeeze(0))
        .and_then(|t| t.to_vec1())
        .map_err(|e| Error::classifier(format!("Softmax failed: {}", e)))
}

fn build_result(
    name: &str,
    labels: &[SentimentLabel],
    probs: &[f32],
    start: Instant,
) -> ClassificationResult {
    let (max_idx, max_prob) = probs
        .iter()
        .copied()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0, 0.5));

    let label = labels
        .get(max_idx)
        .copied()
        .unwrap_or(SentimentLabel::Positive);

    let all_scores = labels
        .iter()
        .zip(probs.iter().copied())
        .map(|(label, prob)| (*label, prob))
        .collect();

    ClassificationResult {
        label,
        score: max_prob,
        metadata: ClassificationMetadata {
            model: Some(name.to_string()),
            all_scores: Some(all_scores),
        },
        latency_us: start.elapsed().as_micros() as u64,
    }
}
