use std::time::Duration;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use async_trait::async_trait;
use log::{debug, trace, error, info};

/// Provider segment used when no provider is named
pub const DEFAULT_ROUTE: &str = "hf-inference";

// ===== Wire Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HfParameters
{   pub max_new_tokens: u32
  , pub temperature: f32
  , pub return_full_text: bool
}

/// Body for the default `hf-inference` route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HfInferenceRequest
{   pub inputs: String
  , pub parameters: HfParameters
}

/// Body for a provider's OpenAI-compatible completions route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest
{   pub model: String
  , pub prompt: String
  , pub max_tokens: u32
  , pub temperature: f32
}

// ===== Hugging Face Client =====

/// HTTP client for the Hugging Face inference router
#[derive(Debug, Clone)]
pub struct HfInferenceClient
{   http_client: reqwest::Client
  , api_base: String
  , hub_base: String
}

impl HfInferenceClient
{   /// Build a client that sends the bearer token on every request
    pub fn new(
      credentials: &crate::config::Credentials
    , settings: &crate::config::ClientSettings
    ) -> Result<Self, crate::error::Error>
    {   debug!(
          "Creating HfInferenceClient for {}",
          settings.api_base
        );

        if credentials.token().is_empty()
        {   return Err(crate::error::Error::ClientBuild(
              "bearer token is empty".to_string()
            ));
        }

        let mut auth = HeaderValue::from_str(
          &format!("Bearer {}", credentials.token())
        ).map_err(|e| {
          error!("Token is not a valid header value");
          crate::error::Error::ClientBuild(
            format!("invalid bearer token: {}", e)
          )
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let mut builder = reqwest::Client::builder()
          .default_headers(headers);
        if let Some(secs) = settings.timeout_secs
        {   builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          crate::error::Error::ClientBuild(e.to_string())
        })?;

        Ok(HfInferenceClient
        {   http_client
          , api_base: settings.api_base.trim_end_matches('/').to_string()
          , hub_base: settings.hub_base.trim_end_matches('/').to_string()
        })
    }

    /// URL the call is routed to
    pub fn endpoint(&self, call: &crate::providers::TextGenerationCall)
      -> String
    {   match call.provider.as_deref()
        {   Some(provider) => {
              format!("{}/{}/v1/completions", self.api_base, provider)
            }
          , None => {
              format!(
                "{}/{}/models/{}",
                self.api_base, DEFAULT_ROUTE, call.model
              )
            }
        }
    }

    /// JSON body matching the route chosen by `endpoint`
    pub fn request_body(call: &crate::providers::TextGenerationCall)
      -> Result<Value, crate::error::Error>
    {   let body = match call.provider
        {   Some(_) => serde_json::to_value(CompletionRequest
            {   model: call.model.clone()
              , prompt: call.prompt.clone()
              , max_tokens: call.max_new_tokens
              , temperature: call.temperature
            })
          , None => serde_json::to_value(HfInferenceRequest
            {   inputs: call.prompt.clone()
              , parameters: HfParameters
                {   max_new_tokens: call.max_new_tokens
                  , temperature: call.temperature
                  , return_full_text: false
                }
            })
        };
        body.map_err(|e| crate::error::Error::ParseError(e.to_string()))
    }

    /// Check that the token can see the model on the Hub.
    /// Best effort: callers only log the outcome.
    pub async fn probe_model_access(&self, model: &str)
      -> Result<(), crate::error::Error>
    {   let url = format!("{}/api/models/{}", self.hub_base, model);
        debug!("Probing model access at {}", url);

        let response = self.http_client
          .get(&url)
          .send()
          .await
          .map_err(transport_error)?;

        let status = response.status();
        trace!("Probe response status: {}", status);
        if status.is_success()
        {   info!("Direct access to {} confirmed", model);
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status.as_u16(), &body))
    }
}

#[async_trait]
impl crate::providers::TextGeneration for HfInferenceClient
{   async fn text_generation(
      &self
    , call: &crate::providers::TextGenerationCall
    ) -> Result<Value, crate::error::Error>
    {   let url = self.endpoint(call);
        let body = Self::request_body(call)?;
        debug!("Sending text generation to {}", url);
        trace!("Request body: {}", body);

        let response = self.http_client
          .post(&url)
          .json(&body)
          .send()
          .await
          .map_err(transport_error)?;

        let status = response.status();
        trace!("Response status: {}", status);

        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success()
        {   error!("Inference API error {}: {}", status, text);
            return Err(error_for_status(status.as_u16(), &text));
        }

        let value: Value = serde_json::from_str(&text).map_err(|e| {
          error!("Parse error: {}", e);
          crate::error::Error::ParseError(e.to_string())
        })?;
        Ok(unwrap_envelope(value))
    }
}

fn transport_error(e: reqwest::Error) -> crate::error::Error
{   if e.is_timeout()
    {   error!("Request timed out: {}", e);
        crate::error::Error::Timeout
    } else
    {   error!("HTTP error: {}", e);
        crate::error::Error::HttpError(e.to_string())
    }
}

/// Strip the list or `choices` wrapper the routes put around results
pub fn unwrap_envelope(value: Value) -> Value
{   match value
    {   Value::Array(mut items) if !items.is_empty() => {
          items.swap_remove(0)
        }
      , Value::Object(mut map) => {
          let has_choices = matches!(
            map.get("choices"),
            Some(Value::Array(choices)) if !choices.is_empty()
          );
          match (has_choices, map.remove("choices"))
          {   (true, Some(Value::Array(mut choices))) => {
                choices.swap_remove(0)
              }
            , (_, Some(choices)) => {
                map.insert("choices".to_string(), choices);
                Value::Object(map)
              }
            , (_, None) => Value::Object(map)
          }
        }
      , other => other
    }
}

/// Map a failed status and its body to an error category
pub fn error_for_status(status: u16, body: &str) -> crate::error::Error
{   let message = error_message(status, body);
    match status
    {   401 | 403 => crate::error::Error::Auth(message)
      , 429 => crate::error::Error::RateLimited(message)
      , 404 | 503 => crate::error::Error::ModelUnavailable(message)
      , _ => crate::error::Error::ApiError(status, message)
    }
}

/// Pull the human-readable message out of an error body
fn error_message(status: u16, body: &str) -> String
{   if let Ok(value) = serde_json::from_str::<Value>(body)
    {   let found = value.get("error")
          .and_then(|e| e.as_str().or_else(|| {
            e.get("message").and_then(Value::as_str)
          }))
          .or_else(|| value.get("message").and_then(Value::as_str));
        if let Some(msg) = found
        {   return msg.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty()
    {   reqwest::StatusCode::from_u16(status)
          .ok()
          .and_then(|s| s.canonical_reason())
          .unwrap_or("no response body")
          .to_string()
    } else
    {   trimmed.to_string()
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use serde_json::json;
    use crate::config::{ClientSettings, Credentials};
    use crate::providers::TextGenerationCall;

    fn call(provider: Option<&str>) -> TextGenerationCall
    {   TextGenerationCall
        {   prompt: "Hello".to_string()
          , model: "org/model".to_string()
          , max_new_tokens: 70
          , temperature: 0.7
          , provider: provider.map(str::to_string)
        }
    }

    fn client() -> HfInferenceClient
    {   let settings = ClientSettings
        {   api_base: "http://router.test/".to_string()
          , ..ClientSettings::default()
        };
        HfInferenceClient::new(&Credentials::new("hf_test"), &settings)
          .unwrap()
    }

    #[test]
    fn provider_selects_completions_route()
    {   let c = client();
        assert_eq!(
          c.endpoint(&call(Some("featherless-ai"))),
          "http://router.test/featherless-ai/v1/completions"
        );
        let body = HfInferenceClient::request_body(
          &call(Some("featherless-ai"))
        ).unwrap();
        assert_eq!(body["model"], "org/model");
        assert_eq!(body["prompt"], "Hello");
        assert_eq!(body["max_tokens"], 70);
    }

    #[test]
    fn default_request_routes_to_configured_provider()
    {   let c = HfInferenceClient::new(
          &Credentials::new("hf_test"),
          &ClientSettings::default()
        ).unwrap();
        let req = crate::request::GenerationRequest::new(
          "Hello",
          &crate::config::FormDefaults::default()
        );
        assert_eq!(
          c.endpoint(&TextGenerationCall::from(&req)),
          "https://router.huggingface.co/featherless-ai/v1/completions"
        );
    }

    #[test]
    fn no_provider_uses_default_route()
    {   let c = client();
        assert_eq!(
          c.endpoint(&call(None)),
          "http://router.test/hf-inference/models/org/model"
        );
        let body = HfInferenceClient::request_body(&call(None)).unwrap();
        assert_eq!(body["inputs"], "Hello");
        assert_eq!(body["parameters"]["max_new_tokens"], 70);
        assert_eq!(body["parameters"]["return_full_text"], false);
    }

    #[test]
    fn bad_token_fails_construction()
    {   let err = HfInferenceClient::new(
          &Credentials::new("hf_bad\ntoken"),
          &ClientSettings::default()
        ).unwrap_err();
        assert_eq!(err.kind(), "ClientBuildError");

        let err = HfInferenceClient::new(
          &Credentials::new(""),
          &ClientSettings::default()
        ).unwrap_err();
        assert_eq!(err.kind(), "ClientBuildError");
    }

    #[test]
    fn envelopes_are_unwrapped()
    {   assert_eq!(
          unwrap_envelope(json!([{"generated_text": "hi"}])),
          json!({"generated_text": "hi"})
        );
        assert_eq!(
          unwrap_envelope(json!({"id": "x", "choices": [{"text": "hi"}]})),
          json!({"text": "hi"})
        );
        assert_eq!(
          unwrap_envelope(json!({"choices": []})),
          json!({"choices": []})
        );
        assert_eq!(unwrap_envelope(json!("hi")), json!("hi"));
        assert_eq!(unwrap_envelope(json!([])), json!([]));
    }

    #[test]
    fn statuses_map_to_categories()
    {   let err = error_for_status(
          401, r#"{"error": "Invalid credentials in Authorization header"}"#
        );
        assert_eq!(
          err,
          crate::error::Error::Auth(
            "Invalid credentials in Authorization header".to_string()
          )
        );
        assert_eq!(error_for_status(429, "").kind(), "RateLimitError");
        assert_eq!(
          error_for_status(503, "").kind(),
          "ModelUnavailableError"
        );
        assert_eq!(
          error_for_status(400, r#"{"error": {"message": "bad temp"}}"#),
          crate::error::Error::ApiError(400, "bad temp".to_string())
        );
        assert_eq!(
          error_for_status(500, ""),
          crate::error::Error::ApiError(
            500, "Internal Server Error".to_string()
          )
        );
    }
}
