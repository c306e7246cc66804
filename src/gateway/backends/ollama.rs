//! Local daemon backend speaking the Ollama REST API.
//!
//! Model discovery reads `GET /api/tags`; generation posts to
//! `POST /api/generate` with streaming disabled so the full completion
//! arrives in one body.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BackendError, Generation, error_body};
use crate::gateway::types::{InvocationConfig, InvocationRequest};

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    eval_count: Option<u64>,
}

/// List the models the daemon has pulled locally
pub async fn list_models(http: &Client, base_url: &str) -> Result<Vec<String>, BackendError> {
    let url = format!("{}/api/tags", base_url.trim_end_matches('/'));
    let response = http.get(&url).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = error_body(response).await;
        return Err(BackendError::Status { status, body });
    }

    let body = response.text().await?;
    let tags: TagsResponse = serde_json::from_str(&body)
        .map_err(|e| BackendError::Malformed(format!("tags listing: {}", e)))?;
    Ok(tags.models.into_iter().map(|m| m.name).collect())
}

/// Run one non-streaming generation against the daemon
pub async fn generate(
    http: &Client,
    base_url: &str,
    config: &InvocationConfig,
    request: &InvocationRequest,
) -> Result<Generation, BackendError> {
    let url = format!("{}/api/generate", base_url.trim_end_matches('/'));
    let payload = GenerateRequest {
        model: &config.model,
        prompt: request.user_text(),
        system: request.system_text(),
        stream: false,
        options: GenerateOptions {
            temperature: config.temperature,
            num_predict: config.max_output,
        },
    };

    let response = http.post(&url).json(&payload).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = error_body(response).await;
        return Err(BackendError::Status { status, body });
    }

    let body = response.text().await?;
    let parsed: GenerateResponse = serde_json::from_str(&body)
        .map_err(|e| BackendError::Malformed(format!("generate response: {}", e)))?;

    Ok(Generation {
        text: parsed.response,
        tokens: parsed.eval_count,
    })
}
