use crate::request::{Body, HttpRequest, join_url};
use serde_json::json;

/// Groq's OpenAI-compatible endpoint. Any server speaking the same chat
/// completions dialect works (tests point this at a local mock).
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model used for the clinical-insight narrative.
pub const INSIGHT_MODEL: &str = "llama-3.1-8b-instant";

// Deterministic-leaning analysis with a bounded narrative length.
const INSIGHT_TEMPERATURE: f64 = 0.2;
const INSIGHT_MAX_TOKENS: u32 = 1000;

#[derive(Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

pub fn build_chat_completions_request(cfg: &ChatConfig, messages: &[ChatMessage]) -> HttpRequest {
    let url = join_url(&cfg.base_url, "/chat/completions");

    let payload = json!({
        "model": cfg.model,
        "messages": messages
            .iter()
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect::<Vec<_>>(),
        "temperature": INSIGHT_TEMPERATURE,
        "max_tokens": INSIGHT_MAX_TOKENS,
    });

    HttpRequest {
        url,
        headers: vec![
            ("Content-Type".into(), "application/json".into()),
            ("Authorization".into(), format!("Bearer {}", cfg.api_key)),
        ],
        body: Body::Json(payload.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_authorized_json_request() {
        let cfg = ChatConfig {
            base_url: "https://api.groq.com/openai/v1".into(),
            api_key: "k".into(),
            model: INSIGHT_MODEL.into(),
        };
        let req = build_chat_completions_request(
            &cfg,
            &[ChatMessage {
                role: "user".into(),
                content: "analyze".into(),
            }],
        );

        assert!(req.url.ends_with("/chat/completions"));
        assert_eq!(req.header("authorization"), Some("Bearer k"));
        match req.body {
            Body::Json(s) => {
                assert!(s.contains("llama-3.1-8b-instant"));
                assert!(s.contains("\"temperature\":0.2"));
                assert!(s.contains("\"max_tokens\":1000"));
            }
            _ => panic!("expected json body"),
        }
    }
}
