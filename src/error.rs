use std::fmt;

/// Custom error type for hfgen operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// HF_TOKEN found in neither the secrets store nor the environment
    MissingToken
  , /// Config or secrets file could not be read or parsed
    InvalidConfiguration(String)
  , /// Request rejected locally, nothing was sent
    Validation(String)
  , /// The HTTP client could not be constructed
    ClientBuild(String)
  , /// Token rejected by the service (401/403)
    Auth(String)
  , /// Rate limit exceeded (429)
    RateLimited(String)
  , /// Model missing or still loading (404/503)
    ModelUnavailable(String)
  , /// Any other non-success status
    ApiError(u16, String)
  , /// Transport-level failure
    HttpError(String)
  , /// Request timed out
    Timeout
  , /// Failed to decode the response body
    ParseError(String)
  , /// Generic error
    Other(String)
}

impl Error
{   /// Category name shown to the user as the error type
    pub fn kind(&self) -> &'static str
    {   match self
        {   Error::MissingToken
          | Error::InvalidConfiguration(_) => "ConfigurationError"
          , Error::Validation(_) => "ValidationError"
          , Error::ClientBuild(_) => "ClientBuildError"
          , Error::Auth(_) => "AuthError"
          , Error::RateLimited(_) => "RateLimitError"
          , Error::ModelUnavailable(_) => "ModelUnavailableError"
          , Error::ApiError(..) => "ApiError"
          , Error::HttpError(_) => "HttpError"
          , Error::Timeout => "TimeoutError"
          , Error::ParseError(_) => "ParseError"
          , Error::Other(_) => "Error"
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingToken => {
              write!(f,
                "HF_TOKEN not found in secrets store or environment"
              )
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Validation(msg) => {
              write!(f, "{}", msg)
            }
          , Error::ClientBuild(msg) => {
              write!(f, "Failed to build inference client: {}", msg)
            }
          , Error::Auth(msg) => {
              write!(f, "Authorization failed: {}", msg)
            }
          , Error::RateLimited(msg) => {
              write!(f, "Rate limit exceeded: {}", msg)
            }
          , Error::ModelUnavailable(msg) => {
              write!(f, "Model unavailable: {}", msg)
            }
          , Error::ApiError(status, msg) => {
              write!(f, "API error ({}): {}", status, msg)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
