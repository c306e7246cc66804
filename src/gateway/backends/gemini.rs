//! Keyed chat service backend speaking the Gemini generateContent API.
//!
//! Conversations keep their role tags on the wire: user messages become
//! `contents` entries and the system message becomes `systemInstruction`.
//! The API key travels in the `x-goog-api-key` header, never in the URL,
//! so request logs and error text cannot leak it.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BackendError, Generation, error_body};
use crate::gateway::types::{Credential, InvocationConfig, InvocationRequest, Role};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    candidates_token_count: Option<u64>,
}

fn to_generate_request(
    config: &InvocationConfig,
    request: &InvocationRequest,
) -> GenerateContentRequest {
    let contents = request
        .messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| RequestContent {
            role: "user".to_string(),
            parts: vec![Part {
                text: m.content.clone(),
            }],
        })
        .collect();

    let system_instruction = request.system_text().map(|text| SystemInstruction {
        parts: vec![Part {
            text: text.to_string(),
        }],
    });

    GenerateContentRequest {
        contents,
        system_instruction,
        generation_config: GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output,
        },
    }
}

fn extract_generation(response: GenerateContentResponse) -> Result<Generation, BackendError> {
    let tokens = response
        .usage_metadata
        .as_ref()
        .and_then(|u| u.candidates_token_count);

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            BackendError::Malformed("response contained no candidate text".to_string())
        })?;

    Ok(Generation { text, tokens })
}

/// Run one generateContent call against the chat service
pub async fn generate(
    http: &Client,
    base_url: &str,
    key: &Credential,
    config: &InvocationConfig,
    request: &InvocationRequest,
) -> Result<Generation, BackendError> {
    let url = format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        config.model
    );
    let payload = to_generate_request(config, request);

    let response = http
        .post(&url)
        .header("x-goog-api-key", key.expose())
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = error_body(response).await;
        return Err(BackendError::Status { status, body });
    }

    let body = response.text().await?;
    let parsed: GenerateContentResponse = serde_json::from_str(&body)
        .map_err(|e| BackendError::Malformed(format!("generateContent response: {}", e)))?;
    extract_generation(parsed)
}
