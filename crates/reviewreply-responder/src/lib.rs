//! ReviewReply Responder
//!
//! Picks the reply sent back for a classified review.
//!
//! Replies come from one of two places:
//! - Canned templates, three per sentiment, chosen at random (always available)
//! - An optional generative language model, validated and backed by the templates
//!
//! The model is an injected dependency of [`ResponseSelector`]; without one the
//! selector runs in template mode only.

pub mod generator;
pub mod model_loader;
pub mod selector;
pub mod templates;

pub use generator::{GenerationParams, TextGenerator};
pub use model_loader::{DeviceType, ModelCandidate, ModelSettings};
#[cfg(feature = "ml-models")]
pub use model_loader::GenerativeModel;
pub use selector::{GenerationOutcome, GenerationSettings, ResponseSelector, SelectedResponse};
pub use templates::{ResponseTemplateSet, TemplateConfig, MIN_TEMPLATE_CHARS};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::generator::{GenerationParams, TextGenerator};
    pub use crate::selector::{ResponseSelector, SelectedResponse};
    pub use crate::templates::ResponseTemplateSet;
}
