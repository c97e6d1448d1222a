use crate::error::ProviderError;
use async_trait::async_trait;

/// Seam between the widget and the language-model backend.
///
/// `generate` takes the fully composed prompt and returns the assistant
/// reply text. Implementations own transport, authentication, and the
/// degrade policy for malformed payloads.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
