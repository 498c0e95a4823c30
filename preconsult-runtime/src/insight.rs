use async_trait::async_trait;
use preconsult_engine::traits::InsightBackend;
use preconsult_providers::chat::{
    ChatConfig, ChatMessage, GROQ_BASE_URL, INSIGHT_MODEL, build_chat_completions_request,
};
use preconsult_providers::parse::parse_chat_completion;
use preconsult_providers::runtime::execute;

/// Clinical-insight generation over Groq's chat completions endpoint.
#[derive(Debug, Clone)]
pub struct GroqInsightBackend {
    cfg: ChatConfig,
}

impl GroqInsightBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            cfg: ChatConfig {
                base_url: GROQ_BASE_URL.into(),
                api_key: api_key.into(),
                model: INSIGHT_MODEL.into(),
            },
        }
    }

    /// Points the backend at a different server; tests use a local mock.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.cfg.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl InsightBackend for GroqInsightBackend {
    async fn analyze(&self, prompt: &str) -> anyhow::Result<String> {
        let messages = [ChatMessage {
            role: "user".into(),
            content: prompt.to_string(),
        }];

        let req = build_chat_completions_request(&self.cfg, &messages);
        let resp = execute(&req).await?;
        if !(200..=299).contains(&resp.status) {
            return Err(anyhow::anyhow!(
                "insight request failed: status={} body={}",
                resp.status,
                String::from_utf8_lossy(&resp.body)
            ));
        }

        parse_chat_completion(&resp.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_narrative_from_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "Pain Profile: migraines."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = GroqInsightBackend::new("test-key").with_base_url(server.uri());
        let narrative = backend.analyze("analyze this").await.unwrap();
        assert_eq!(narrative, "Pain Profile: migraines.");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let backend = GroqInsightBackend::new("test-key").with_base_url(server.uri());
        let err = backend.analyze("analyze this").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }
}
