//! The routing orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ctxroute_core::provider::{Provider, ProviderRequest};
use ctxroute_core::{Catalog, RouteError, RouteInput, RouteResult, RouteStatus};
use tracing::{debug, info, warn};

use crate::filter::partition;
use crate::normalize::normalize;
use crate::prompt::build_prompt;

/// Skip reason when the caller sent no candidates at all.
pub const EMPTY_CATALOG_REASON: &str = "no docs or skills in catalog";

/// Everything one routing invocation produced.
#[derive(Debug, Clone)]
pub struct DecisionTrace {
    pub status: RouteStatus,

    /// Items to inject; empty unless `status` is `Ok`
    pub result: RouteResult,

    /// Catalog items dropped because the session already consumed them
    pub excluded: Catalog,

    /// The prompt, if one was built
    pub prompt: Option<String>,

    /// The model's raw text, if it was received
    pub raw_response: Option<String>,

    /// Why no call was made
    pub skip_reason: Option<String>,

    pub error: Option<RouteError>,

    /// Wall-clock time of the call path; zero for skips
    pub latency: Duration,
}

impl DecisionTrace {
    fn skipped(reason: String, excluded: Catalog) -> Self {
        Self {
            status: RouteStatus::Skipped,
            result: RouteResult::empty(),
            excluded,
            prompt: None,
            raw_response: None,
            skip_reason: Some(reason),
            error: None,
            latency: Duration::ZERO,
        }
    }
}

/// Decides what to inject for one conversation turn.
pub struct Router {
    /// The completion backend
    provider: Arc<dyn Provider>,

    /// Model name sent with every request
    model: String,
}

impl Router {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one routing decision.
    ///
    /// Never fails: every outcome, errors included, is reported through the
    /// returned trace.
    pub async fn route(&self, input: &RouteInput) -> DecisionTrace {
        let catalog = &input.registry;

        if catalog.is_empty() {
            debug!("Catalog is empty, skipping model call");
            return DecisionTrace::skipped(EMPTY_CATALOG_REASON.to_string(), Catalog::default());
        }

        let parts = partition(catalog, &input.session);
        if parts.eligible.is_empty() {
            let reason = format!("all {} item(s) already injected this session", catalog.len());
            debug!(items = catalog.len(), "Every catalog item already consumed, skipping model call");
            return DecisionTrace::skipped(reason, parts.excluded);
        }

        info!(
            provider = self.provider.name(),
            model = %self.model,
            messages = input.messages.len(),
            eligible = parts.eligible.len(),
            excluded = parts.excluded.len(),
            "Routing turn"
        );

        let start = Instant::now();
        let prompt = build_prompt(&input.messages, &parts.eligible);

        let (outcome, raw_response) = self.call(&prompt).await;
        let latency = start.elapsed();

        match outcome {
            Ok(result) => {
                debug!(
                    docs = result.docs.len(),
                    skills = result.skills.len(),
                    latency_ms = latency.as_millis() as u64,
                    "Routing decision made"
                );
                DecisionTrace {
                    status: RouteStatus::Ok,
                    result,
                    excluded: parts.excluded,
                    prompt: Some(prompt),
                    raw_response,
                    skip_reason: None,
                    error: None,
                    latency,
                }
            }
            Err(e) => {
                warn!(error = %e, "Routing failed");
                DecisionTrace {
                    status: RouteStatus::Error,
                    result: RouteResult::empty(),
                    excluded: parts.excluded,
                    prompt: Some(prompt),
                    raw_response,
                    skip_reason: None,
                    error: Some(e),
                    latency,
                }
            }
        }
    }

    /// One completion plus normalization. The raw text is returned
    /// alongside the outcome whenever it was received.
    async fn call(&self, prompt: &str) -> (Result<RouteResult, RouteError>, Option<String>) {
        let request = ProviderRequest::new(self.model.clone(), prompt);

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => return (Err(e.into()), None),
        };

        debug!(model = %response.model, usage = ?response.usage, "Completion received");

        let outcome = normalize(&response.content);
        (outcome, Some(response.content))
    }
}
