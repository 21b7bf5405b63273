//! Request and result types for a single generation

use serde::{Deserialize, Serialize};
use crate::config::{
  MAX_NEW_TOKENS, MAX_TEMPERATURE, MIN_NEW_TOKENS, MIN_TEMPERATURE
};

/// One generation as submitted from the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest
{   /// The prompt text
    pub prompt: String
  , /// Model identifier
    pub model: String
  , /// Max new tokens to generate
    pub max_new_tokens: u32
  , /// Temperature for sampling
    pub temperature: f32
  , /// Named backend provider; None uses the default routing
    pub provider: Option<String>
}

impl GenerationRequest
{   /// Request with the form defaults
    pub fn new(
      prompt: impl Into<String>
    , defaults: &crate::config::FormDefaults
    ) -> Self
    {   GenerationRequest
        {   prompt: prompt.into()
          , model: defaults.default_model().to_string()
          , max_new_tokens: defaults.max_new_tokens
          , temperature: defaults.temperature
          , provider: defaults.default_provider().map(str::to_string)
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self
    {   self.model = model.into();
        self
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self
    {   self.max_new_tokens = max_new_tokens;
        self
    }

    /// Out-of-range values are kept as given so `validate` rejects them
    pub fn with_temperature(mut self, temperature: f32) -> Self
    {   self.temperature
          = if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature)
            {   round_temperature(temperature)
            } else
            {   temperature
            };
        self
    }

    pub fn with_provider(mut self, provider: Option<String>) -> Self
    {   self.provider = provider;
        self
    }

    /// Checks done before anything is sent
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   if self.prompt.trim().is_empty()
        {   return Err(crate::error::Error::Validation(
              "Please enter a query before generating.".to_string()
            ));
        }
        if self.model.trim().is_empty()
        {   return Err(crate::error::Error::Validation(
              "Please select a model.".to_string()
            ));
        }
        if !(MIN_NEW_TOKENS..=MAX_NEW_TOKENS)
          .contains(&self.max_new_tokens)
        {   return Err(crate::error::Error::Validation(format!(
              "Max new tokens must be between {} and {}, got {}",
              MIN_NEW_TOKENS, MAX_NEW_TOKENS, self.max_new_tokens
            )));
        }
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE)
          .contains(&self.temperature)
        {   return Err(crate::error::Error::Validation(format!(
              "Temperature must be between {:.1} and {:.1}, got {}",
              MIN_TEMPERATURE, MAX_TEMPERATURE, self.temperature
            )));
        }
        Ok(())
    }

    /// Provider label for diagnostics
    pub fn provider_label(&self) -> &str
    {   self.provider.as_deref().unwrap_or("default")
    }
}

/// Snap to the 0.01 step of the temperature slider
pub fn round_temperature(temperature: f32) -> f32
{   (temperature * 100.0).round() / 100.0
}

/// Generated text, possibly from an unrecognized response shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation
{   pub text: String
  , /// Set when the text is the stringified raw response
    pub format_warning: bool
}

/// Structured failure handed to the display layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationFailure
{   /// Error category name, e.g. "AuthError"
    pub kind: String
  , pub message: String
}

impl From<&crate::error::Error> for GenerationFailure
{   fn from(err: &crate::error::Error) -> Self
    {   GenerationFailure
        {   kind: err.kind().to_string()
          , message: err.to_string()
        }
    }
}

impl From<crate::error::Error> for GenerationFailure
{   fn from(err: crate::error::Error) -> Self
    {   GenerationFailure::from(&err)
    }
}

/// Outcome of one request; never an Err
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenerationResult
{   Success(Generation)
  , Failure(GenerationFailure)
}

impl GenerationResult
{   pub fn is_success(&self) -> bool
    {   matches!(self, GenerationResult::Success(_))
    }

    pub fn text(&self) -> Option<&str>
    {   match self
        {   GenerationResult::Success(g) => Some(&g.text)
          , GenerationResult::Failure(_) => None
        }
    }

    pub fn failure(&self) -> Option<&GenerationFailure>
    {   match self
        {   GenerationResult::Success(_) => None
          , GenerationResult::Failure(f) => Some(f)
        }
    }
}

impl From<crate::error::Error> for GenerationResult
{   fn from(err: crate::error::Error) -> Self
    {   GenerationResult::Failure(err.into())
    }
}
