//! # coursegen-models
//!
//! Endpoint clients for coursegen.
//!
//! - [`CompletionClient`]: one chat-completion exchange per call, with
//!   HTTP failures normalized into [`ModelError`] so the retry classifier can
//!   tell transient from permanent.
//! - [`ImageClient`]: one-shot cover image generation.
//! - [`MockModel`]: scripted [`CompletionModel`] for tests.
//!
//! ## Example
//!
//! ```rust,ignore
//! use coursegen_models::{CallOptions, CompletionClient, CompletionModel, CompletionRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CompletionClient::from_env()?;
//!     let request = CompletionRequest::new(client.name(), "You are terse.", "Say hi");
//!     let text = client.complete(&request, CallOptions::none()).await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod chat;
pub mod config;
pub mod error;
pub mod images;
pub mod mock;
pub mod model;
pub mod request;
pub mod types;

// Re-exports
pub use chat::CompletionClient;
pub use config::ClientConfig;
pub use error::{ModelError, ModelResult};
pub use images::{AspectRatio, ImageClient, ImageResult};
pub use mock::MockModel;
pub use model::{run_cancellable, CallOptions, CompletionModel};
pub use request::{CompletionRequest, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        AspectRatio, CallOptions, ClientConfig, CompletionClient, CompletionModel,
        CompletionRequest, ImageClient, ImageResult, MockModel, ModelError, ModelResult,
    };
}
