use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use log::{debug, error, info};
use crate::BackendFoot;

/// Where the backend is in its request cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState
{   Idle
  , Requesting
}

/// Public API for the generation backend - owns the task
pub struct GenerationBackend
{   hand: crate::BackendHand
  , requesting: Arc<AtomicBool>
  , _task_handle: tokio::task::JoinHandle<()>
}

impl GenerationBackend
{   /// Spawn a backend around a transport.
    /// Returns immediately - spawns background task
    pub fn new<T>(transport: T) -> Self
    where T: crate::providers::TextGeneration + 'static
    {   debug!("Creating GenerationBackend with task ownership");

        let (generate_tx, generate_rx)
          = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx)
          = mpsc::unbounded_channel();

        let hand = crate::BackendHand
        {   generate_tx
          , shutdown_tx
        };

        let foot = crate::BackendFoot
        {   generate_rx
          , shutdown_rx
        };

        let requesting = Arc::new(AtomicBool::new(false));
        let loop_flag = requesting.clone();
        let _task_handle = tokio::spawn(async move {
          run_backend_loop(foot, transport, loop_flag).await
        });

        GenerationBackend
        {   hand
          , requesting
          , _task_handle
        }
    }

    pub fn state(&self) -> HandlerState
    {   if self.requesting.load(Ordering::SeqCst)
        {   HandlerState::Requesting
        } else
        {   HandlerState::Idle
        }
    }

    /// Queue a request - returns almost immediately
    pub async fn generate(
      &self
    , request: crate::request::GenerationRequest
    ) -> Result<
        mpsc::UnboundedReceiver<crate::GenerateReply>,
        crate::error::Error
      >
    {   debug!("generate queuing command for model: {}", request.model);
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::GenerateArgs
        {   request
          , reply: reply_tx
        };

        self.hand.generate_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::Other(
              "Backend disconnected".to_string()
            )
          })?;

        Ok(reply_rx)
    }

    /// Queue a request and wait for its result
    pub async fn generate_and_wait(
      &self
    , request: crate::request::GenerationRequest
    ) -> crate::request::GenerationResult
    {   let mut reply_rx = match self.generate(request).await
        {   Ok(rx) => rx
          , Err(e) => return e.into()
        };
        match reply_rx.recv().await
        {   Some(result) => result
          , None => {
              error!("Backend dropped the reply");
              crate::error::Error::Other(
                "Backend disconnected".to_string()
              ).into()
            }
        }
    }

    /// Gracefully shutdown the backend
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down GenerationBackend");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::ShutdownArgs
        {   reply: reply_tx
        };

        self.hand.shutdown_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel already closed");
            crate::error::Error::Other(
              "Backend already shutdown".to_string()
            )
          })?;

        // Wait for shutdown confirmation
        if let Some(result) = reply_rx.recv().await
        {   debug!("Backend shutdown confirmed");
            result
        } else
        {   error!("Backend dropped the shutdown reply");
            Err(crate::error::Error::Other(
              "Backend disconnected".to_string()
            ))
        }
    }
}

/// Main backend event loop
///
/// Requests are handled one at a time, so at most one call is in
/// flight. Shutdown is only seen between requests.
async fn run_backend_loop<T>(
  foot: crate::BackendFoot
, transport: T
, requesting: Arc<AtomicBool>
)
where T: crate::providers::TextGeneration
{   debug!("Starting GenerationBackend event loop");
    let BackendFoot
    {   mut generate_rx
      , mut shutdown_rx
    } = foot;

    loop
    { tokio::select!
      { Some(cmd) = generate_rx.recv() => {
          debug!("Received Generate for model: {}", cmd.request.model);
          requesting.store(true, Ordering::SeqCst);
          let result = crate::handler::generate_with(
            &transport,
            &cmd.request
          ).await;
          requesting.store(false, Ordering::SeqCst);
          let _ = cmd.reply.send(result);
        }
      , Some(cmd) = shutdown_rx.recv() => {
          debug!("Received Shutdown");
          let _ = cmd.reply.send(Ok(()));
          info!("GenerationBackend shutting down");
          break;
        }
      , else => {
          debug!("All backend channels closed");
          break;
        }
      }
    }
}
