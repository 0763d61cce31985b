//! Topic analysis endpoint: proxies the topic to an upstream chat
//! completion service and falls back to a canned paragraph when the
//! upstream fails.

use log::warn;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;

use super::ApiResponse;

const SYSTEM_PROMPT: &str = "Aja como Sérgio Monteiro, um Pesquisador e Desenvolvedor em Soluções Inteligentes, Tecnologia e Automação com uma \"visão 360°\". A sua experiência abrange mais de 15 países, com profundo conhecimento em Supply Chain (trabalhou com gigantes como Ferrero, LIDL, ALDI), inovação, e é o fundador de ecossistemas de IA como IAHub360, NexFlowX e IAHub360 Labs. A sua tarefa é fornecer uma análise preditiva, concisa e inovadora sobre o tópico solicitado. A sua resposta deve refletir a sua perspetiva única, combinando conhecimento técnico com visão estratégica de negócios. Seja provocador, futurista e direto. Responda num único parágrafo bem elaborado em Português de Portugal.";

const EMPTY_ANALYSIS: &str =
    "Não foi possível gerar uma análise neste momento. Por favor, tente novamente.";

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    fn for_topic(topic: &str) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("Forneça uma análise sobre o futuro de: \"{}\"", topic),
                },
            ],
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

/// Upstream chat completion call. A trait so handler tests can mock the
/// network.
pub trait ChatBackend {
    fn complete(&self, request: &ChatRequest) -> Result<Value, ApiError>;
}

pub struct HttpChatBackend {
    url: String,
    agent: ureq::Agent,
}

impl HttpChatBackend {
    pub fn new(url: String) -> Self {
        Self {
            url,
            agent: ureq::AgentBuilder::new()
                .timeout(std::time::Duration::from_secs(30))
                .build(),
        }
    }
}

impl ChatBackend for HttpChatBackend {
    fn complete(&self, request: &ChatRequest) -> Result<Value, ApiError> {
        let response = self
            .agent
            .post(&self.url)
            .send_json(request)
            .map_err(|e| ApiError::Upstream(e.to_string()))?;
        response
            .into_json()
            .map_err(|e| ApiError::Upstream(e.to_string()))
    }
}

/// Pull the analysis text out of whichever shape the upstream returned:
/// an OpenAI-style `choices` array or a bare `content` field.
fn extract_analysis(result: &Value) -> String {
    if let Some(content) = result["choices"][0]["message"]["content"].as_str() {
        return content.to_string();
    }
    if let Some(content) = result["content"].as_str() {
        return content.to_string();
    }
    EMPTY_ANALYSIS.to_string()
}

fn fallback_analysis(topic: &str) -> String {
    format!(
        "Como Sérgio Monteiro, com visão 360° em soluções inteligentes e automação, analiso que \"{}\" representa um campo de enorme potencial transformador. A intersecção entre IA, automação e processos de negócio criará oportunidades sem precedentes para otimização e inovação. Aqueles que conseguirem integrar estas tecnologias de forma estratégica estarão na vanguarda da próxima revolução industrial.",
        topic
    )
}

/// Handle `POST /api/analysis`. The request body is `{"topic": "..."}`.
pub fn handle(body: &str, backend: &dyn ChatBackend) -> ApiResponse {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => {
            warn!("Malformed analysis request body: {err}");
            return ApiResponse::error(500, "Internal server error");
        }
    };

    let topic = match parsed["topic"].as_str() {
        Some(topic) if !topic.is_empty() => topic,
        _ => return ApiResponse::error(400, "Topic is required"),
    };

    match backend.complete(&ChatRequest::for_topic(topic)) {
        Ok(result) => ApiResponse::ok(json!({ "analysis": extract_analysis(&result) })),
        Err(err) => {
            warn!("Chat upstream failed, serving fallback analysis: {err}");
            ApiResponse::ok(json!({ "analysis": fallback_analysis(topic) }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedChat(Value);
    impl ChatBackend for FixedChat {
        fn complete(&self, _request: &ChatRequest) -> Result<Value, ApiError> {
            Ok(self.0.clone())
        }
    }

    struct FailingChat;
    impl ChatBackend for FailingChat {
        fn complete(&self, _request: &ChatRequest) -> Result<Value, ApiError> {
            Err(ApiError::Upstream("connection refused".to_string()))
        }
    }

    struct CapturingChat(std::cell::RefCell<Option<String>>);
    impl ChatBackend for CapturingChat {
        fn complete(&self, request: &ChatRequest) -> Result<Value, ApiError> {
            *self.0.borrow_mut() = serde_json::to_string(request).ok();
            Ok(json!({ "content": "ok" }))
        }
    }

    #[test]
    fn test_missing_topic_is_400() {
        let response = handle("{}", &FailingChat);
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"], "Topic is required");
    }

    #[test]
    fn test_empty_topic_is_400() {
        let response = handle(r#"{"topic": ""}"#, &FailingChat);
        assert_eq!(response.status, 400);
    }

    #[test]
    fn test_malformed_body_is_500() {
        let response = handle("not json", &FailingChat);
        assert_eq!(response.status, 500);
        assert_eq!(response.body["error"], "Internal server error");
    }

    #[test]
    fn test_extracts_choices_shape() {
        let backend = FixedChat(json!({
            "choices": [{ "message": { "content": "análise detalhada" } }]
        }));
        let response = handle(r#"{"topic": "IA"}"#, &backend);
        assert_eq!(response.status, 200);
        assert_eq!(response.body["analysis"], "análise detalhada");
    }

    #[test]
    fn test_extracts_bare_content_shape() {
        let backend = FixedChat(json!({ "content": "resposta direta" }));
        let response = handle(r#"{"topic": "IA"}"#, &backend);
        assert_eq!(response.body["analysis"], "resposta direta");
    }

    #[test]
    fn test_unrecognized_shape_yields_placeholder() {
        let backend = FixedChat(json!({ "unexpected": true }));
        let response = handle(r#"{"topic": "IA"}"#, &backend);
        assert_eq!(response.status, 200);
        assert_eq!(response.body["analysis"], EMPTY_ANALYSIS);
    }

    #[test]
    fn test_upstream_failure_serves_fallback_with_topic() {
        let response = handle(r#"{"topic": "Supply Chain"}"#, &FailingChat);
        assert_eq!(response.status, 200);
        let analysis = response.body["analysis"].as_str().unwrap();
        assert!(analysis.contains("\"Supply Chain\""));
        assert!(analysis.starts_with("Como Sérgio Monteiro"));
    }

    #[test]
    fn test_request_carries_prompt_and_sampling_params() {
        let backend = CapturingChat(std::cell::RefCell::new(None));
        handle(r#"{"topic": "Automação"}"#, &backend);

        let sent = backend.0.borrow().clone().unwrap();
        let sent: Value = serde_json::from_str(&sent).unwrap();
        assert_eq!(sent["temperature"], 0.7);
        assert_eq!(sent["max_tokens"], 500);
        assert_eq!(sent["messages"][0]["role"], "system");
        assert_eq!(
            sent["messages"][1]["content"],
            "Forneça uma análise sobre o futuro de: \"Automação\""
        );
    }
}
