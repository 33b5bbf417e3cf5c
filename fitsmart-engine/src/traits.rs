use async_trait::async_trait;
use fitsmart_core::prompt::CompletionRequest;

/// A hosted text/multimodal completion service.
///
/// Implementations return the raw model text; decoding into structured data
/// happens in the engine so every provider gets the same fallback chain.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String>;
}
