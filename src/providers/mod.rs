//! Remote text-generation transports

pub mod huggingface;

// Re-export for convenience
pub use huggingface::HfInferenceClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Parameters of one remote text-generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextGenerationCall
{   pub prompt: String
  , pub model: String
  , pub max_new_tokens: u32
  , pub temperature: f32
  , /// Named backend provider; None uses the default routing
    pub provider: Option<String>
}

impl From<&crate::request::GenerationRequest> for TextGenerationCall
{   fn from(req: &crate::request::GenerationRequest) -> Self
    {   TextGenerationCall
        {   prompt: req.prompt.clone()
          , model: req.model.clone()
          , max_new_tokens: req.max_new_tokens
          , temperature: req.temperature
          , provider: req.provider.clone()
        }
    }
}

/// Anything that can run a text-generation call.
///
/// Returns the response body with any list or `choices` envelope already
/// removed; shape normalization happens in the handler.
#[async_trait]
pub trait TextGeneration: Send + Sync
{   async fn text_generation(
      &self
    , call: &TextGenerationCall
    ) -> Result<serde_json::Value, crate::error::Error>;
}
