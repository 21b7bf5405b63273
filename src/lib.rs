pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod normalize;
pub mod handler;
pub mod client;
pub mod display;

pub use client::{GenerationBackend, HandlerState};
pub use config::{AppConfig, ClientSettings, Credentials};
pub use error::Error;
pub use handler::{generate, generate_with};
pub use request::{
  Generation, GenerationFailure, GenerationRequest, GenerationResult
};

/*

hfgen: send one prompt to a hosted text-generation model and show
what comes back.

hfgen/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and backend channel types
│   ├── main.rs         # Command-line form
│   ├── error.rs        # Error taxonomy
│   ├── config.rs       # Settings, form defaults, HF_TOKEN lookup
│   ├── request.rs      # Request/result types and validation
│   ├── normalize.rs    # Response shape normalization
│   ├── handler.rs      # generate(): validate, call, normalize
│   ├── client.rs       # Backend task, one request in flight
│   ├── display.rs      # Terminal rendering
│   └── providers/
│       ├── mod.rs      # TextGeneration trait
│       └── huggingface.rs
└── tests/

*/

/// BACKEND API INTERFACE:

// ===== Generate =====

pub type GenerateReply = crate::request::GenerationResult;
pub type GenerateReplySender
  = tokio::sync::mpsc::UnboundedSender<GenerateReply>;

pub struct GenerateArgs
{   pub request: crate::request::GenerationRequest
  , pub reply: GenerateReplySender
}

// ===== Shutdown =====

pub type ShutdownReply = Result<(), crate::error::Error>;
pub type ShutdownReplySender
  = tokio::sync::mpsc::UnboundedSender<ShutdownReply>;

pub struct ShutdownArgs
{   pub reply: ShutdownReplySender
}

// ===== BackendHand (sender side) =====

pub struct BackendHand
{   pub generate_tx
      : tokio::sync::mpsc::UnboundedSender<GenerateArgs>
  , pub shutdown_tx
      : tokio::sync::mpsc::UnboundedSender<ShutdownArgs>
}

// ===== BackendFoot (receiver side) =====

pub struct BackendFoot
{   pub generate_rx
      : tokio::sync::mpsc::UnboundedReceiver<GenerateArgs>
  , pub shutdown_rx
      : tokio::sync::mpsc::UnboundedReceiver<ShutdownArgs>
}
