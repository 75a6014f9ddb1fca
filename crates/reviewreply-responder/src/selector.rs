//! Reply selection: generative model first (when enabled), templates always

use crate::generator::{GenerationParams, TextGenerator};
use crate::model_loader::ModelSettings;
use crate::templates::ResponseTemplateSet;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use reviewreply_core::{Error, ResponseSource, Result, SentimentLabel};
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Generative reply settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Attempt model replies before falling back to templates
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub params: GenerationParams,

    /// Text placed before the cleaned review to form the prompt
    #[serde(default = "default_prompt_prefix")]
    pub prompt_prefix: String,

    /// Shortest accepted model reply, in characters
    #[serde(default = "default_min_reply_chars")]
    pub min_reply_chars: usize,

    /// Longest accepted model reply, in characters
    #[serde(default = "default_max_reply_chars")]
    pub max_reply_chars: usize,

    #[serde(default)]
    pub model: ModelSettings,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            params: GenerationParams::default(),
            prompt_prefix: default_prompt_prefix(),
            min_reply_chars: default_min_reply_chars(),
            max_reply_chars: default_max_reply_chars(),
            model: ModelSettings::default(),
        }
    }
}

fn default_prompt_prefix() -> String {
    "Avis client: ".to_string()
}

fn default_min_reply_chars() -> usize {
    15
}

fn default_max_reply_chars() -> usize {
    300
}

/// Terminal state of a reply selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Model mode inactive, templates used directly
    NotAttempted,
    /// Model produced an acceptable reply
    ModelSuccess,
    /// Model was tried and its reply rejected or it failed; templates used
    ModelFailed(String),
}

/// The reply chosen for a review
#[derive(Debug, Clone)]
pub struct SelectedResponse {
    pub text: String,
    pub source: ResponseSource,
    pub outcome: GenerationOutcome,
}

/// Chooses reply text for a classified review
pub struct ResponseSelector {
    templates: ResponseTemplateSet,
    generator: Option<Arc<dyn TextGenerator>>,
    settings: GenerationSettings,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl ResponseSelector {
    /// Template-only selector seeded from OS entropy
    pub fn new(templates: ResponseTemplateSet) -> Self {
        Self {
            templates,
            generator: None,
            settings: GenerationSettings::default(),
            rng: Mutex::new(Box::new(StdRng::from_entropy())),
        }
    }

    /// Attach a generator; it is only consulted when `settings.enabled` is set
    pub fn with_generator(
        mut self,
        generator: Option<Arc<dyn TextGenerator>>,
        settings: GenerationSettings,
    ) -> Self {
        self.generator = generator;
        self.settings = settings;
        self
    }

    /// Replace the template RNG, mainly for deterministic tests
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn templates(&self) -> &ResponseTemplateSet {
        &self.templates
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Whether replies will be attempted with the generative model
    pub fn model_mode_active(&self) -> bool {
        self.settings.enabled && self.generator.is_some()
    }

    pub fn generator_name(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.name())
    }

    /// Pick the reply for `cleaned_text` labelled `label`. Always yields a string.
    pub fn select_response(&self, cleaned_text: &str, label: SentimentLabel) -> SelectedResponse {
        let generator = match (&self.generator, self.settings.enabled) {
            (Some(generator), true) => generator,
            _ => {
                debug!(sentiment = %label, "Model mode inactive, using template");
                return SelectedResponse {
                    text: self.template_for(label),
                    source: ResponseSource::Template,
                    outcome: GenerationOutcome::NotAttempted,
                };
            }
        };

        debug!(model = generator.name(), sentiment = %label, "Trying generative reply");

        match self.try_model(generator.as_ref(), cleaned_text) {
            Ok(text) => {
                debug!(model = generator.name(), chars = text.chars().count(), "Generative reply accepted");
                SelectedResponse {
                    text,
                    source: ResponseSource::Model,
                    outcome: GenerationOutcome::ModelSuccess,
                }
            }
            Err(e) => {
                warn!(model = generator.name(), error = %e, "Generative reply failed, falling back to template");
                SelectedResponse {
                    text: self.template_for(label),
                    source: ResponseSource::Template,
                    outcome: GenerationOutcome::ModelFailed(e.to_string()),
                }
            }
        }
    }

    /// Uniform random choice among the templates for `label`
    pub fn template_for(&self, label: SentimentLabel) -> String {
        let templates = self.templates.for_label(label);
        // Template lists are validated non-empty at construction
        let index = self.rng.lock().gen_range(0..templates.len());
        templates[index].clone()
    }

    fn try_model(&self, generator: &dyn TextGenerator, cleaned_text: &str) -> Result<String> {
        let prompt = format!("{}{}", self.settings.prompt_prefix, cleaned_text);

        let generated = catch_unwind(AssertUnwindSafe(|| {
            generator.generate(&prompt, &self.settings.params)
        }))
        .map_err(|_| Error::generation("generator panicked"))??;

        self.extract_reply(&prompt, &generated)
    }

    /// Strip the echoed prompt and check the reply length window.
    ///
    /// Output that does not start with the prompt is rejected, so the review
    /// text can never leak into the reply.
    fn extract_reply(&self, prompt: &str, generated: &str) -> Result<String> {
        let reply = generated
            .strip_prefix(prompt)
            .ok_or_else(|| Error::generation("generated text does not echo the prompt"))?
            .trim();
        let chars = reply.chars().count();

        if chars < self.settings.min_reply_chars || chars > self.settings.max_reply_chars {
            return Err(Error::generation(format!(
                "reply length {chars} outside {}..={}",
                self.settings.min_reply_chars, self.settings.max_reply_chars
            )));
        }

        Ok(reply.to_string())
    }
}
