//! Hosted inference endpoint backend.
//!
//! Requests go to `POST {base}/{model-id}` in the Hugging Face Inference API
//! shape. The bearer token is optional; requests without one share the
//! anonymous rate pool.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BackendError, Generation, error_body};
use crate::gateway::types::{Credential, InvocationConfig, InvocationRequest};

#[derive(Debug, Serialize)]
struct EndpointRequest {
    inputs: String,
    parameters: EndpointParameters,
}

#[derive(Debug, Serialize)]
struct EndpointParameters {
    temperature: f32,
    max_length: u32,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Hosted endpoints answer with a one-element array for text generation and
/// a bare object for some pipelines; accept both
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EndpointResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

impl EndpointResponse {
    fn into_text(self) -> Option<String> {
        match self {
            EndpointResponse::Batch(items) => items.into_iter().next().map(|g| g.generated_text),
            EndpointResponse::Single(item) => Some(item.generated_text),
        }
    }
}

fn flatten_prompt(request: &InvocationRequest) -> String {
    let user = request.user_text();
    match request.system_text() {
        Some(system) => format!("{}\n\n{}", system, user),
        None => user,
    }
}

/// Run one generation against the hosted endpoint. Requests without a token
/// share the anonymous rate pool. The endpoint reports no token counts, so
/// `Generation::tokens` is `None`.
pub async fn generate(
    http: &Client,
    base_url: &str,
    token: Option<&Credential>,
    config: &InvocationConfig,
    request: &InvocationRequest,
) -> Result<Generation, BackendError> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), config.model);
    let payload = EndpointRequest {
        inputs: flatten_prompt(request),
        parameters: EndpointParameters {
            temperature: config.temperature,
            max_length: config.max_output,
        },
    };

    let mut builder = http.post(&url).json(&payload);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token.expose()));
    }
    let response = builder.send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = error_body(response).await;
        return Err(BackendError::Status { status, body });
    }

    let body = response.text().await?;
    let parsed: EndpointResponse = serde_json::from_str(&body)
        .map_err(|e| BackendError::Malformed(format!("endpoint response: {}", e)))?;
    let text = parsed
        .into_text()
        .ok_or_else(|| BackendError::Malformed("endpoint returned an empty batch".to_string()))?;

    Ok(Generation { text, tokens: None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::types::{Credential, Message, Provider};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoint_config(model: &str) -> InvocationConfig {
        InvocationConfig::new(Provider::HostedEndpoint, model)
    }

    #[tokio::test]
    async fn test_generate_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/google/flan-t5-small"))
            .and(body_partial_json(
                json!({"inputs": "Explain ownership in Rust"}),
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"generated_text": "Ownership moves values."}])),
            )
            .mount(&server)
            .await;

        let http = Client::new();
        let config = endpoint_config("google/flan-t5-small");
        let request = InvocationRequest::prompt("Explain ownership in Rust");
        let generation = generate(&http, &server.uri(), None, &config, &request)
            .await
            .unwrap();
        assert_eq!(generation.text, "Ownership moves values.");
        assert_eq!(generation.tokens, None);
    }

    #[tokio::test]
    async fn test_generate_sends_bearer_token_when_present() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/distilgpt2"))
            .and(header("Authorization", "Bearer hf_test_token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"generated_text": "ok"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let http = Client::new();
        let token = Credential::new("hf_test_token");
        let config = endpoint_config("distilgpt2");
        let request = InvocationRequest::prompt("hello");
        let generation = generate(&http, &server.uri(), Some(&token), &config, &request)
            .await
            .unwrap();
        assert_eq!(generation.text, "ok");
    }

    #[tokio::test]
    async fn test_generate_accepts_bare_object_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/microsoft/DialoGPT-small"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"generated_text": "hi there"})),
            )
            .mount(&server)
            .await;

        let http = Client::new();
        let config = endpoint_config("microsoft/DialoGPT-small");
        let request = InvocationRequest::prompt("hi");
        let generation = generate(&http, &server.uri(), None, &config, &request)
            .await
            .unwrap();
        assert_eq!(generation.text, "hi there");
    }

    #[tokio::test]
    async fn test_model_loading_status_surfaces_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/google/flan-t5-large"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "error": "Model google/flan-t5-large is currently loading",
                "estimated_time": 20.0
            })))
            .mount(&server)
            .await;

        let http = Client::new();
        let config = endpoint_config("google/flan-t5-large");
        let request = InvocationRequest::prompt("hello");
        let err = generate(&http, &server.uri(), None, &config, &request)
            .await
            .unwrap_err();
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert!(body.contains("currently loading"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_system_message_prepended_to_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/distilgpt2"))
            .and(body_partial_json(
                json!({"inputs": "Answer in one sentence.\n\nWhat is a borrow?"}),
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"generated_text": "A loan."}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let http = Client::new();
        let config = endpoint_config("distilgpt2");
        let request = InvocationRequest::new(vec![
            Message::system("Answer in one sentence."),
            Message::user("What is a borrow?"),
        ]);
        let generation = generate(&http, &server.uri(), None, &config, &request)
            .await
            .unwrap();
        assert_eq!(generation.text, "A loan.");
    }
}
