use crate::config::RuntimeConfig;
use fitsmart_core::prompt::CompletionRequest;
use fitsmart_engine::traits::CompletionProvider;
use fitsmart_providers::gemini::{GeminiConfig, build_generate_content_request};
use fitsmart_providers::parse::parse_generate_content;
use fitsmart_providers::runtime::execute;

/// `RuntimeConfig` already redacts the key in its `Debug` output.
#[derive(Debug, Clone)]
pub struct GeminiCompletionProvider {
    cfg: RuntimeConfig,
}

impl GeminiCompletionProvider {
    pub fn new(cfg: RuntimeConfig) -> Self {
        Self { cfg }
    }

    fn config_for(&self, request: &CompletionRequest) -> GeminiConfig {
        GeminiConfig {
            base_url: self.cfg.base_url.clone(),
            api_key: self.cfg.api_key.clone(),
            model: self.cfg.model_for(request.tier).to_string(),
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for GeminiCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
        let cfg = self.config_for(request);
        let req = build_generate_content_request(&cfg, request);
        let resp = execute(&req, self.cfg.timeouts).await?;

        if !resp.is_success() {
            return Err(anyhow::anyhow!(
                "Gemini request failed: status={} body={}",
                resp.status,
                String::from_utf8_lossy(&resp.body)
            ));
        }

        let text = parse_generate_content(&resp.body)?;
        log::debug!("{} replied with {} chars", cfg.model, text.len());
        Ok(text)
    }
}
