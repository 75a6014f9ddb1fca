//! Generative model loading and inference with Candle
//!
//! Loads a quantized Qwen2 causal language model in GGUF format. A locally
//! fine-tuned model directory takes priority; otherwise each configured
//! Hugging Face candidate is tried in order until one loads.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Device type for inference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// CPU inference (always available)
    #[default]
    Cpu,
    /// CUDA GPU inference (if available)
    Cuda(usize),
    /// Metal (Apple Silicon)
    Metal(usize),
}

/// A GGUF model published on the Hugging Face Hub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCandidate {
    /// Repository holding the GGUF weights
    pub repo: String,

    /// GGUF file inside `repo`
    pub file: String,

    /// Repository holding `tokenizer.json`
    pub tokenizer_repo: String,

    #[serde(default = "default_revision")]
    pub revision: String,
}

impl ModelCandidate {
    pub fn new(
        repo: impl Into<String>,
        file: impl Into<String>,
        tokenizer_repo: impl Into<String>,
    ) -> Self {
        Self {
            repo: repo.into(),
            file: file.into(),
            tokenizer_repo: tokenizer_repo.into(),
            revision: default_revision(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{}/{}", self.repo, self.file)
    }
}

/// Where to look for the generative model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Directory with a fine-tuned `model.gguf` and `tokenizer.json`
    #[serde(default = "default_local_dir")]
    pub local_dir: Option<PathBuf>,

    /// Hub models tried in order when no local model loads
    #[serde(default = "default_candidates")]
    pub candidates: Vec<ModelCandidate>,

    #[serde(default)]
    pub device: DeviceType,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            local_dir: default_local_dir(),
            candidates: default_candidates(),
            device: DeviceType::Cpu,
        }
    }
}

impl ModelSettings {
    /// Names of every source `GenerativeModel::load` would try, in order
    pub fn candidate_names(&self) -> Vec<String> {
        self.local_dir
            .iter()
            .map(|dir| dir.display().to_string())
            .chain(self.candidates.iter().map(ModelCandidate::display_name))
            .collect()
    }
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_local_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("reviewreply").join("models").join("trained"))
}

fn default_candidates() -> Vec<ModelCandidate> {
    vec![
        ModelCandidate::new(
            "Qwen/Qwen2.5-0.5B-Instruct-GGUF",
            "qwen2.5-0.5b-instruct-q4_k_m.gguf",
            "Qwen/Qwen2.5-0.5B-Instruct",
        ),
        ModelCandidate::new(
            "Qwen/Qwen2-0.5B-Instruct-GGUF",
            "qwen2-0_5b-instruct-q4_k_m.gguf",
            "Qwen/Qwen2-0.5B-Instruct",
        ),
    ]
}

#[cfg(feature = "ml-models")]
pub use self::candle_model::GenerativeModel;

#[cfg(feature = "ml-models")]
mod candle_model {
    use super::{DeviceType, ModelCandidate, ModelSettings};
    use crate::generator::{GenerationParams, TextGenerator};
    use candle_core::quantized::gguf_file;
    use candle_core::{DType, Device, Tensor};
    use candle_transformers::generation::LogitsProcessor;
    use candle_transformers::models::quantized_qwen2::ModelWeights;
    use candle_transformers::utils::apply_repeat_penalty;
    use hf_hub::api::sync::Api;
    use hf_hub::{Repo, RepoType};
    use parking_lot::Mutex;
    use reviewreply_core::{Error, Result};
    use std::path::Path;
    use tokenizers::Tokenizer;
    use tracing::{debug, info, warn};

    const LOCAL_WEIGHTS: &str = "model.gguf";
    const TOKENIZER_FILE: &str = "tokenizer.json";
    const EOS_TOKENS: [&str; 2] = ["<|endoftext|>", "<|im_end|>"];

    /// A loaded quantized causal language model
    pub struct GenerativeModel {
        name: String,
        weights: Mutex<ModelWeights>,
        tokenizer: Tokenizer,
        device: Device,
        eos_token: Option<u32>,
    }

    impl GenerativeModel {
        /// Load the first model that works: local directory, then hub candidates
        pub fn load(settings: &ModelSettings) -> Result<Self> {
            let device = create_device(settings.device)?;

            if let Some(dir) = &settings.local_dir {
                if dir.join(LOCAL_WEIGHTS).is_file() {
                    match Self::load_local(dir, &device) {
                        Ok(model) => return Ok(model),
                        Err(e) => warn!(path = %dir.display(), error = %e, "Failed to load local model"),
                    }
                } else {
                    debug!(path = %dir.display(), "No local model found");
                }
            }

            for candidate in &settings.candidates {
                match Self::load_hub(candidate, &device) {
                    Ok(model) => return Ok(model),
                    Err(e) => warn!(model = %candidate.display_name(), error = %e, "Failed to load candidate model"),
                }
            }

            Err(Error::model_unavailable(
                "no generative model could be loaded from the local directory or any candidate",
            ))
        }

        fn load_local(dir: &Path, device: &Device) -> Result<Self> {
            info!(path = %dir.display(), "Loading local model");
            Self::from_files(
                dir.display().to_string(),
                &dir.join(LOCAL_WEIGHTS),
                &dir.join(TOKENIZER_FILE),
                device,
            )
        }

        fn load_hub(candidate: &ModelCandidate, device: &Device) -> Result<Self> {
            info!(model = %candidate.display_name(), "Downloading model from HuggingFace Hub");

            let api = Api::new()
                .map_err(|e| Error::model_unavailable(format!("Failed to create HF API: {e}")))?;

            let weights_path = api
                .repo(Repo::with_revision(
                    candidate.repo.clone(),
                    RepoType::Model,
                    candidate.revision.clone(),
                ))
                .get(&candidate.file)
                .map_err(|e| Error::model_unavailable(format!("Failed to download {}: {e}", candidate.file)))?;

            let tokenizer_path = api
                .repo(Repo::with_revision(
                    candidate.tokenizer_repo.clone(),
                    RepoType::Model,
                    candidate.revision.clone(),
                ))
                .get(TOKENIZER_FILE)
                .map_err(|e| Error::model_unavailable(format!("Failed to download tokenizer: {e}")))?;

            Self::from_files(candidate.display_name(), &weights_path, &tokenizer_path, device)
        }

        fn from_files(name: String, weights_path: &Path, tokenizer_path: &Path, device: &Device) -> Result<Self> {
            let mut file = std::fs::File::open(weights_path)?;
            let content = gguf_file::Content::read(&mut file)
                .map_err(|e| Error::model_unavailable(format!("Invalid GGUF file {}: {e}", weights_path.display())))?;
            let weights = ModelWeights::from_gguf(content, &mut file, device)
                .map_err(|e| Error::model_unavailable(format!("Failed to load model weights: {e}")))?;

            let tokenizer = Tokenizer::from_file(tokenizer_path)
                .map_err(|e| Error::model_unavailable(format!("Failed to load tokenizer: {e}")))?;
            let eos_token = EOS_TOKENS.iter().find_map(|t| tokenizer.token_to_id(t));

            info!(model = %name, "Generative model loaded");

            Ok(Self {
                name,
                weights: Mutex::new(weights),
                tokenizer,
                device: device.clone(),
                eos_token,
            })
        }

        fn sample(
            &self,
            processor: &mut LogitsProcessor,
            logits: &Tensor,
            context: &[u32],
            params: &GenerationParams,
        ) -> Result<u32> {
            let logits = logits.flatten_all().and_then(|l| l.to_dtype(DType::F32)).map_err(candle_err)?;
            let logits = if (params.repetition_penalty - 1.0).abs() < f32::EPSILON {
                logits
            } else {
                let start = context.len().saturating_sub(params.repeat_last_n);
                apply_repeat_penalty(&logits, params.repetition_penalty, &context[start..]).map_err(candle_err)?
            };
            processor.sample(&logits).map_err(candle_err)
        }
    }

    impl TextGenerator for GenerativeModel {
        fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
            let encoding = self
                .tokenizer
                .encode(prompt, true)
                .map_err(|e| Error::generation(format!("Failed to tokenize prompt: {e}")))?;
            let prompt_tokens = encoding.get_ids().to_vec();
            if prompt_tokens.is_empty() {
                return Err(Error::generation("prompt produced no tokens"));
            }

            let seed = params.seed.unwrap_or_else(rand::random);
            let temperature = (params.temperature > 0.0).then_some(params.temperature);
            let mut processor = LogitsProcessor::new(seed, temperature, params.top_p);

            let mut weights = self.weights.lock();
            let mut tokens = prompt_tokens.clone();

            let input = Tensor::new(prompt_tokens.as_slice(), &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(candle_err)?;
            let logits = weights.forward(&input, 0).map_err(candle_err)?;
            let mut next = self.sample(&mut processor, &logits, &tokens, params)?;

            for index in 0..params.max_new_tokens {
                if Some(next) == self.eos_token {
                    break;
                }
                tokens.push(next);
                if index + 1 == params.max_new_tokens {
                    break;
                }

                let input = Tensor::new(&[next], &self.device)
                    .and_then(|t| t.unsqueeze(0))
                    .map_err(candle_err)?;
                let logits = weights
                    .forward(&input, prompt_tokens.len() + index)
                    .map_err(candle_err)?;
                next = self.sample(&mut processor, &logits, &tokens, params)?;
            }
            drop(weights);

            debug!(
                model = %self.name,
                new_tokens = tokens.len() - prompt_tokens.len(),
                "Generation finished"
            );

            // Only new tokens are decoded; the prompt is echoed verbatim
            let continuation = self
                .tokenizer
                .decode(&tokens[prompt_tokens.len()..], true)
                .map_err(|e| Error::generation(format!("Failed to decode output: {e}")))?;
            Ok(format!("{prompt}{continuation}"))
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn create_device(device_type: DeviceType) -> Result<Device> {
        match device_type {
            DeviceType::Cpu => Ok(Device::Cpu),
            DeviceType::Cuda(idx) => Device::new_cuda(idx)
                .map_err(|e| Error::model_unavailable(format!("Failed to create CUDA device: {e}"))),
            DeviceType::Metal(idx) => Device::new_metal(idx)
                .map_err(|e| Error::model_unavailable(format!("Failed to create Metal device: {e}"))),
        }
    }

    fn candle_err(e: candle_core::Error) -> Error {
        Error::generation(e.to_string())
    }
}
