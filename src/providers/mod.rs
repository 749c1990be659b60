//! External collaborators used by the planning session
//!
//! Each collaborator is a trait so the session can be driven by the HTTP
//! providers in production and by scripted fakes in tests.

mod openrouter;
mod unsplash;

use async_trait::async_trait;
use url::Url;

pub use openrouter::OpenRouterClient;
pub use unsplash::{DisabledImageSearch, UnsplashClient};

use crate::Result;

/// Language-model text completion
#[async_trait]
pub trait Completion: Send + Sync {
    /// Complete `user_prompt` under `system_instructions`
    ///
    /// # Errors
    ///
    /// Returns error on any network, HTTP or response-shape failure
    async fn complete(
        &self,
        system_instructions: &str,
        user_prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String>;
}

/// Photo search keyed on a place name
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Return up to `count` image URLs for `query`, best match first
    ///
    /// # Errors
    ///
    /// Returns error on any network, HTTP or response-shape failure
    async fn search_images(&self, query: &str, count: usize) -> Result<Vec<Url>>;
}

/// Voice capture followed by speech-to-text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Capture one utterance; `None` when nothing intelligible was heard
    async fn transcribe(&self) -> Option<String>;
}

/// Text-to-speech synthesis
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into encoded audio (MP3)
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}
