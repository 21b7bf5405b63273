//! Terminal rendering of results, warnings and failures

use crate::request::{
  Generation, GenerationFailure, GenerationRequest, GenerationResult
};

pub const FORMAT_WARNING: &str
  = "⚠️ Unexpected response format. Showing raw response.";

/// Usage notes printed after `--help`
pub const FOOTER: &str = "\
Instructions:
  1. Pass your text generation prompt as an argument or on stdin
  2. Adjust settings with the flags above as needed
  3. Run the command to get your response

Troubleshooting:
  - On errors, check the debug information printed below the error
  - Ensure your HF_TOKEN has access to the selected model";

pub fn render_result(
  result: &GenerationResult
, request: &GenerationRequest
) -> String
{   match result
    {   GenerationResult::Success(g) => render_success(g, request)
      , GenerationResult::Failure(f) => render_failure(f, request)
    }
}

pub fn render_success(
  generation: &Generation
, request: &GenerationRequest
) -> String
{   let mut out = String::new();
    if generation.format_warning
    {   out.push_str(FORMAT_WARNING);
        out.push('\n');
    }
    out.push_str("✅ Generation completed!\n\n");
    out.push_str("Generated Text\n---\n");
    out.push_str(&generation.text);
    out.push_str("\n\n");
    out.push_str(&render_settings(request));
    out
}

pub fn render_settings(request: &GenerationRequest) -> String
{   format!(
      "Settings Used\n---\nModel: {}\nMax Tokens: {}\nTemperature: {}\n",
      request.model, request.max_new_tokens, request.temperature
    )
}

/// Validation problems are warnings; everything else gets the
/// error banner and the debug panel.
pub fn render_failure(
  failure: &GenerationFailure
, request: &GenerationRequest
) -> String
{   if failure.kind == "ValidationError"
    {   return format!("⚠️ {}\n", failure.message);
    }
    format!(
      "❌ Error: {}: {}\n\n🔍 Debug Information\n\
       \x20 Error Type: {}\n\
       \x20 Error Message: {}\n\
       \x20 Model: {}\n\
       \x20 Provider: {}\n",
      failure.kind,
      failure.message,
      failure.kind,
      failure.message,
      request.model,
      request.provider_label()
    )
}

/// Startup failure, with a hint on how to fix it
pub fn render_config_error(err: &crate::error::Error) -> String
{   let hint = match err
    {   crate::error::Error::MissingToken => {
          "Add HF_TOKEN to your secrets file or export it as an \
           environment variable."
        }
      , _ => "Check the config and secrets files passed on the command line."
    };
    format!("❌ {}\nℹ️ {}\n", err, hint)
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::config::FormDefaults;

    fn request() -> GenerationRequest
    {   GenerationRequest::new("Hello", &FormDefaults::default())
          .with_provider(Some("featherless-ai".to_string()))
    }

    #[test]
    fn success_echoes_settings()
    {   let out = render_success(
          &Generation { text: "Hi there".into(), format_warning: false },
          &request()
        );
        assert!(out.contains("Hi there"));
        assert!(out.contains("Max Tokens: 70"));
        assert!(out.contains("Temperature: 0.7"));
        assert!(!out.contains(FORMAT_WARNING));
    }

    #[test]
    fn degraded_success_carries_warning()
    {   let out = render_success(
          &Generation { text: "{}".into(), format_warning: true },
          &request()
        );
        assert!(out.starts_with(FORMAT_WARNING));
    }

    #[test]
    fn failure_shows_debug_panel()
    {   let failure = GenerationFailure
        {   kind: "AuthError".into()
          , message: "Authorization failed: bad token".into()
        };
        let out = render_failure(&failure, &request());
        assert!(out.starts_with(
          "❌ Error: AuthError: Authorization failed: bad token"
        ));
        assert!(out.contains("  Error Type: AuthError"));
        assert!(out.contains("  Provider: featherless-ai"));
    }

    #[test]
    fn validation_failure_is_only_a_warning()
    {   let failure = GenerationFailure
        {   kind: "ValidationError".into()
          , message: "Please enter a query before generating.".into()
        };
        let out = render_failure(&failure, &request());
        assert_eq!(out, "⚠️ Please enter a query before generating.\n");
    }

    #[test]
    fn missing_token_gets_remediation()
    {   let out = render_config_error(&crate::error::Error::MissingToken);
        assert!(out.contains("HF_TOKEN"));
        assert!(out.contains("environment variable"));
    }
}
