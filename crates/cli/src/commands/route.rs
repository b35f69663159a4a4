//! `ctxroute route`: one routing decision per process run.
//!
//! Whatever happens, stdout gets exactly one JSON line and the exit status is
//! success, so a hook calling this never blocks the agent.

use std::path::PathBuf;

use ctxroute_config::AppConfig;
use ctxroute_core::{RouteInput, RouteResult};
use ctxroute_journal::{DecisionLog, DecisionRecord};
use ctxroute_router::Router;
use tokio::io::AsyncReadExt;
use tracing::warn;

pub async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Config error, using defaults");
        AppConfig::default()
    });

    let mut raw_input = String::new();
    if let Err(e) = tokio::io::stdin().read_to_string(&mut raw_input).await {
        warn!(error = %e, "Failed to read stdin");
    }

    let provider = ctxroute_providers::build_from_config(&config);
    let router = Router::new(provider, config.provider.model.clone());
    let log = DecisionLog::new(AppConfig::log_path());

    let result = handle(&raw_input, &router, &log, &current_dir()).await;
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

/// Parse `raw_input`, route it and log the decision. Returns what goes to
/// stdout.
pub async fn handle(raw_input: &str, router: &Router, log: &DecisionLog, cwd: &str) -> RouteResult {
    let input: RouteInput = match serde_json::from_str(raw_input) {
        Ok(input) => input,
        Err(e) => {
            warn!(error = %e, "Invalid input");
            log.append(DecisionRecord::invalid_input(&e, router.model(), cwd));
            return RouteResult::empty();
        }
    };

    let trace = router.route(&input).await;
    log.append(DecisionRecord::from_trace(&input, &trace, router.model(), cwd));
    trace.result
}

fn current_dir() -> String {
    std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ctxroute_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use ctxroute_core::{ProviderError, RouteStatus};
    use std::sync::Arc;
    use tempfile::tempdir;

    struct FixedProvider(&'static str);

    #[async_trait]
    impl Provider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                content: self.0.to_string(),
                model: request.model,
                usage: None,
            })
        }
    }

    fn router(reply: &'static str) -> Router {
        Router::new(Arc::new(FixedProvider(reply)), "test-model")
    }

    #[tokio::test]
    async fn invalid_stdin_logs_error_and_prints_empty() {
        let dir = tempdir().unwrap();
        let log = DecisionLog::new(dir.path().join("log.jsonl"));

        let result = handle("{not json", &router("{}"), &log, "/work/app").await;
        assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"docs":[],"skills":[]}"#);

        let records = log.read_last(5).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, RouteStatus::Error);
        assert!(records[0].error.as_deref().unwrap().starts_with("invalid stdin: "));
        assert_eq!(records[0].model, "test-model");
        assert_eq!(records[0].cwd, "/work/app");
    }

    #[tokio::test]
    async fn empty_stdin_is_invalid_input() {
        let dir = tempdir().unwrap();
        let log = DecisionLog::new(dir.path().join("log.jsonl"));

        let result = handle("", &router("{}"), &log, "/w").await;
        assert!(result.is_empty());
        assert_eq!(log.read_last(1).unwrap()[0].status, RouteStatus::Error);
    }

    #[tokio::test]
    async fn routed_decision_is_logged_and_returned() {
        let dir = tempdir().unwrap();
        let log = DecisionLog::new(dir.path().join("log.jsonl"));
        let stdin = r#"{
            "messages": [{"type": "user", "text": "fix the login bug"}],
            "registry": {
                "docs": [{"path": "docs/auth.md", "summary": "auth", "read_when": "login"}],
                "skills": [{"name": "deploy", "description": "ship it"}]
            },
            "session": {"docs_read": [], "skills_used": []},
            "metadata": {"hook": "UserPromptSubmit"}
        }"#;

        let result = handle(
            stdin,
            &router(r#"{"docs":["docs/auth.md"],"skills":[]}"#),
            &log,
            "/work/app",
        )
        .await;
        assert_eq!(result.docs, vec!["docs/auth.md"]);

        let record = &log.read_last(1).unwrap()[0];
        assert_eq!(record.status, RouteStatus::Ok);
        assert_eq!(record.message_count, 1);
        assert_eq!(record.catalog_size, 2);
        assert_eq!(record.registry.docs[0].triggers, vec!["login"]);
        assert_eq!(record.result, result);
    }

    #[tokio::test]
    async fn null_sections_are_accepted() {
        let dir = tempdir().unwrap();
        let log = DecisionLog::new(dir.path().join("log.jsonl"));

        let result = handle(
            r#"{"messages":null,"registry":null,"session":null}"#,
            &router("{}"),
            &log,
            "/w",
        )
        .await;
        assert!(result.is_empty());

        let record = &log.read_last(1).unwrap()[0];
        assert_eq!(record.status, RouteStatus::Skipped);
        assert_eq!(record.skip_reason.as_deref(), Some("no docs or skills in catalog"));
    }
}
