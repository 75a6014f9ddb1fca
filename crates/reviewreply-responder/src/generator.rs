//! Text generation seam

use reviewreply_core::Result;
use serde::{Deserialize, Serialize};

/// Sampling parameters for a single generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Upper bound on newly generated tokens
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Nucleus sampling cutoff, disabled when unset
    #[serde(default)]
    pub top_p: Option<f64>,

    /// Penalty applied to recently generated tokens (1.0 disables it)
    #[serde(default = "default_repetition_penalty")]
    pub repetition_penalty: f32,

    /// How many trailing tokens the repetition penalty looks at
    #[serde(default = "default_repeat_last_n")]
    pub repeat_last_n: usize,

    /// Fixed sampling seed, random per call when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            top_p: None,
            repetition_penalty: default_repetition_penalty(),
            repeat_last_n: default_repeat_last_n(),
            seed: None,
        }
    }
}

fn default_max_new_tokens() -> usize {
    60
}

fn default_temperature() -> f64 {
    0.7
}

fn default_repetition_penalty() -> f32 {
    1.2
}

fn default_repeat_last_n() -> usize {
    64
}

/// A model able to continue a prompt.
///
/// Implementations return the full decoded text, prompt included, the way
/// causal language models echo their input.
pub trait TextGenerator: Send + Sync {
    /// Generate a continuation of `prompt`
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String>;

    /// Identifier used in logs and the health endpoint
    fn name(&self) -> &str;
}
