//! The generate contract: validate, call once, normalize, never fail

use log::{debug, info, warn};
use crate::providers::{TextGeneration, TextGenerationCall};
use crate::request::{GenerationRequest, GenerationResult};

/// Build a client from the credentials and run one request.
/// Client construction errors come back as a Failure.
pub async fn generate(
  request: &GenerationRequest
, credentials: &crate::config::Credentials
, settings: &crate::config::ClientSettings
) -> GenerationResult
{   if let Err(e) = request.validate()
    {   warn!("{}", e);
        return e.into();
    }
    debug!("Token: {}", credentials.redacted());
    match crate::providers::HfInferenceClient::new(credentials, settings)
    {   Ok(client) => generate_with(&client, request).await
      , Err(e) => e.into()
    }
}

/// Run one request on an already constructed transport
pub async fn generate_with<T>(
  transport: &T
, request: &GenerationRequest
) -> GenerationResult
where T: TextGeneration + ?Sized
{   if let Err(e) = request.validate()
    {   warn!("{}", e);
        return e.into();
    }

    debug!(
      "Generating with model {} via {}",
      request.model,
      request.provider_label()
    );
    let call = TextGenerationCall::from(request);
    match transport.text_generation(&call).await
    {   Ok(response) => {
          let generation = crate::normalize::normalize_response(response);
          info!(
            "Generation completed ({} chars)",
            generation.text.chars().count()
          );
          GenerationResult::Success(generation)
        }
      , Err(e) => {
          warn!("Generation failed: {}: {}", e.kind(), e);
          e.into()
        }
    }
}
