//! 🧠 Personality classifier - BERT encoder with a five-way head
//!
//! Checkpoint layout follows `BertForSequenceClassification`:
//! `bert.*` encoder, `bert.pooler.dense`, then `classifier`.

use anyhow::{anyhow, Result};
use candle_core::{DType, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

use crate::demiurge::traits::Trait;
use crate::logos::tokenizer::{encode, load_tokenizer};
use crate::priests::device::DeviceChoice;
use crate::utils::{resolve_weights, WeightsFile};

/// Order of the model's output logits
pub const HEAD_ORDER: [Trait; 5] = [
    Trait::Openness,
    Trait::Conscientiousness,
    Trait::Extraversion,
    Trait::Agreeableness,
    Trait::Neuroticism,
];

/// Anything that turns text into one raw logit per trait, in `HEAD_ORDER`
pub trait TraitClassifier: Send + Sync {
    fn logits(&self, text: &str) -> Result<Vec<f32>>;
}

/// Fields of `config.json` that describe the classification head
#[derive(Debug, Deserialize)]
struct HeadConfig {
    hidden_size: usize,
    #[serde(default)]
    id2label: Option<BTreeMap<String, String>>,
}

impl HeadConfig {
    fn num_labels(&self) -> usize {
        self.id2label.as_ref().map_or(HEAD_ORDER.len(), BTreeMap::len)
    }
}

/// Local copies of the files a checkpoint needs
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: WeightsFile,
}

impl ModelFiles {
    /// Files laid out in one directory, as `huggingface-cli download` leaves them
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let config = dir.join("config.json");
        let tokenizer = dir.join("tokenizer.json");
        for required in [&config, &tokenizer] {
            if !required.exists() {
                anyhow::bail!("model file not found: {}", required.display());
            }
        }
        let weights = resolve_weights(|name| {
            let path = dir.join(name);
            path.exists().then_some(path)
        })
        .ok_or_else(|| anyhow!("no model weights in {}", dir.display()))?;
        Ok(Self {
            config,
            tokenizer,
            weights,
        })
    }

    /// Fetches (or reuses the cached copy of) a hub checkpoint
    pub fn from_hub(model_id: &str, revision: &str) -> Result<Self> {
        let api = Api::new()?;
        let repo = api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));
        let config = repo.get("config.json")?;
        let tokenizer = repo.get("tokenizer.json")?;
        let weights = resolve_weights(|name| repo.get(name).ok())
            .ok_or_else(|| anyhow!("{model_id} has neither safetensors nor pytorch weights"))?;
        Ok(Self {
            config,
            tokenizer,
            weights,
        })
    }
}

pub struct BertPersonalityClassifier {
    bert: BertModel,
    pooler: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    device: DeviceChoice,
}

impl BertPersonalityClassifier {
    pub fn load(files: &ModelFiles, device: DeviceChoice, max_tokens: usize) -> Result<Self> {
        println!("🧠 Загрузка модели личности: {}", files.config.display());

        let raw = std::fs::read_to_string(&files.config)?;
        let config: Config = serde_json::from_str(&raw)?;
        let head: HeadConfig = serde_json::from_str(&raw)?;
        if head.num_labels() != HEAD_ORDER.len() {
            anyhow::bail!(
                "expected a {}-way classification head, config declares {}",
                HEAD_ORDER.len(),
                head.num_labels()
            );
        }

        let dtype = device.dtype();
        tracing::info!(weights = %files.weights.path().display(), ?dtype, "reading weights");
        let vb = match &files.weights {
            WeightsFile::SafeTensors(path) => unsafe {
                VarBuilder::from_mmaped_safetensors(&[path], dtype, &device.device)?
            },
            WeightsFile::Pytorch(path) => VarBuilder::from_pth(path, dtype, &device.device)?,
        };
        let tokenizer = load_tokenizer(&files.tokenizer, max_tokens)?;

        let classifier = Self::from_var_builder(vb, &config, head.hidden_size, tokenizer, device)?;
        println!("✅ Модель личности загружена на {}", classifier.device.describe());
        Ok(classifier)
    }

    /// Wires encoder, pooler and head under the `BertForSequenceClassification` prefixes
    fn from_var_builder(
        vb: VarBuilder,
        config: &Config,
        hidden_size: usize,
        tokenizer: Tokenizer,
        device: DeviceChoice,
    ) -> Result<Self> {
        let bert = BertModel::load(vb.pp("bert"), config)?;
        let pooler = candle_nn::linear(
            hidden_size,
            hidden_size,
            vb.pp("bert").pp("pooler").pp("dense"),
        )?;
        let classifier = candle_nn::linear(hidden_size, HEAD_ORDER.len(), vb.pp("classifier"))?;
        Ok(Self {
            bert,
            pooler,
            classifier,
            tokenizer,
            device,
        })
    }

    fn forward(&self, text: &str) -> Result<Tensor> {
        let encoded = encode(&self.tokenizer, text)?;
        let device = &self.device.device;

        let input_ids = Tensor::new(encoded.ids.as_slice(), device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let attention_mask = Tensor::new(encoded.attention_mask.as_slice(), device)?.unsqueeze(0)?;

        let hidden = self
            .bert
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        // [CLS] токен, затем pooler: dense + tanh
        let cls = hidden.i((.., 0))?;
        let pooled = self.pooler.forward(&cls)?.tanh()?;
        let logits = self.classifier.forward(&pooled)?;
        Ok(logits.squeeze(0)?.to_dtype(DType::F32)?)
    }
}

impl TraitClassifier for BertPersonalityClassifier {
    fn logits(&self, text: &str) -> Result<Vec<f32>> {
        let start = std::time::Instant::now();
        let logits = self.forward(text)?.to_vec1::<f32>()?;
        tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, ?logits, "classified");
        Ok(logits)
    }
}
