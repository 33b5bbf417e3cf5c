use crate::request::HttpRequest;
use fitsmart_core::prompt::{CompletionRequest, ContentPart};
use serde_json::{Value, json};

#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

fn part_json(part: &ContentPart) -> Value {
    match part {
        ContentPart::Text(text) => json!({ "text": text }),
        ContentPart::InlineData { mime_type, data } => json!({
            "inlineData": { "mimeType": mime_type, "data": data }
        }),
    }
}

pub fn build_generate_content_request(cfg: &GeminiConfig, req: &CompletionRequest) -> HttpRequest {
    let url = join_url(
        &cfg.base_url,
        &format!("/v1beta/models/{}:generateContent", cfg.model),
    );

    let mut payload = json!({
        "contents": [{
            "role": "user",
            "parts": req.parts.iter().map(part_json).collect::<Vec<_>>(),
        }],
    });

    if let Some(system) = req.system_instruction.as_ref().filter(|s| !s.trim().is_empty()) {
        payload["systemInstruction"] = json!({ "parts": [{ "text": system }] });
    }
    if req.json_output {
        payload["generationConfig"] = json!({ "responseMimeType": "application/json" });
    }

    HttpRequest {
        url,
        headers: vec![
            ("Content-Type".into(), "application/json".into()),
            ("x-goog-api-key".into(), cfg.api_key.clone()),
        ],
        json_body: payload.to_string(),
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
