//! The persisted shape of one routing decision.

use chrono::{DateTime, Utc};
use ctxroute_core::{Catalog, RouteInput, RouteResult, RouteStatus, SessionState};
use ctxroute_router::DecisionTrace;
use serde::{Deserialize, Serialize};

/// One line of the decision log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Set by [`crate::DecisionLog::append`]
    pub ts: DateTime<Utc>,

    /// Working directory of the calling process
    #[serde(default)]
    pub cwd: String,

    pub status: RouteStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,

    #[serde(default)]
    pub message_count: usize,

    /// Docs plus skills offered before filtering
    #[serde(default)]
    pub catalog_size: usize,

    #[serde(default)]
    pub registry: Catalog,

    #[serde(default)]
    pub session: SessionState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,

    #[serde(default)]
    pub result: RouteResult,

    #[serde(default)]
    pub latency_ms: u64,

    #[serde(default)]
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DecisionRecord {
    /// Record a finished routing decision.
    pub fn from_trace(
        input: &RouteInput,
        trace: &DecisionTrace,
        model: impl Into<String>,
        cwd: impl Into<String>,
    ) -> Self {
        Self {
            ts: Utc::now(),
            cwd: cwd.into(),
            status: trace.status,
            skip_reason: trace.skip_reason.clone(),
            message_count: input.messages.len(),
            catalog_size: input.registry.len(),
            registry: input.registry.clone(),
            session: input.session.clone(),
            raw_response: trace.raw_response.clone(),
            result: trace.result.clone(),
            latency_ms: u64::try_from(trace.latency.as_millis()).unwrap_or(u64::MAX),
            model: model.into(),
            error: trace.error.as_ref().map(ToString::to_string),
        }
    }

    /// Record input that could not be read at all.
    pub fn invalid_input(
        reason: impl std::fmt::Display,
        model: impl Into<String>,
        cwd: impl Into<String>,
    ) -> Self {
        Self {
            ts: Utc::now(),
            cwd: cwd.into(),
            status: RouteStatus::Error,
            skip_reason: None,
            message_count: 0,
            catalog_size: 0,
            registry: Catalog::default(),
            session: SessionState::default(),
            raw_response: None,
            result: RouteResult::empty(),
            latency_ms: 0,
            model: model.into(),
            error: Some(format!("invalid stdin: {reason}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxroute_core::{ConversationTurn, DocItem, ProviderError, RouteError, SkillItem};
    use std::time::Duration;

    fn input() -> RouteInput {
        RouteInput {
            messages: vec![
                ConversationTurn::user("deploy it"),
                ConversationTurn::assistant("on it"),
            ],
            registry: Catalog::new(
                vec![DocItem::new("docs/deploy.md", "deploy steps")],
                vec![SkillItem::new("deploy", "ship it"), SkillItem::new("lint", "lint it")],
            ),
            session: SessionState::new(Vec::<String>::new(), ["lint"]),
            ..Default::default()
        }
    }

    fn trace(status: RouteStatus) -> DecisionTrace {
        DecisionTrace {
            status,
            result: RouteResult::empty(),
            excluded: Catalog::default(),
            prompt: None,
            raw_response: None,
            skip_reason: None,
            error: None,
            latency: Duration::ZERO,
        }
    }

    #[test]
    fn from_ok_trace() {
        let mut t = trace(RouteStatus::Ok);
        t.result.skills = vec!["deploy".into()];
        t.raw_response = Some(r#"{"docs":[],"skills":["deploy"]}"#.into());
        t.latency = Duration::from_millis(1234);

        let record = DecisionRecord::from_trace(&input(), &t, "kimi-k2.5", "/work/app");

        assert_eq!(record.status, RouteStatus::Ok);
        assert_eq!(record.message_count, 2);
        assert_eq!(record.catalog_size, 3);
        assert_eq!(record.latency_ms, 1234);
        assert_eq!(record.model, "kimi-k2.5");
        assert_eq!(record.cwd, "/work/app");
        assert_eq!(record.result.skills, vec!["deploy"]);
        assert!(record.session.has_used("lint"));
        assert!(record.error.is_none());
    }

    #[test]
    fn from_error_trace_keeps_message_and_raw() {
        let mut t = trace(RouteStatus::Error);
        t.raw_response = Some("not json".into());
        t.error = Some(RouteError::Parse {
            reason: "expected value at line 1 column 1".into(),
            raw: "not json".into(),
        });

        let record = DecisionRecord::from_trace(&input(), &t, "m", "/w");
        assert_eq!(
            record.error.as_deref(),
            Some("failed to parse LLM response: expected value at line 1 column 1")
        );
        assert_eq!(record.raw_response.as_deref(), Some("not json"));

        t.error = Some(ProviderError::Network("dns".into()).into());
        let record = DecisionRecord::from_trace(&input(), &t, "m", "/w");
        assert_eq!(record.error.as_deref(), Some("LLM error: Network error: dns"));
    }

    #[test]
    fn optional_fields_omitted_when_absent() {
        let mut t = trace(RouteStatus::Skipped);
        t.skip_reason = Some("no docs or skills in catalog".into());
        let record = DecisionRecord::from_trace(&RouteInput::default(), &t, "m", "/w");

        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["skip_reason"], "no docs or skills in catalog");
        assert_eq!(json["result"], serde_json::json!({"docs": [], "skills": []}));
        assert!(json.get("raw_response").is_none());
        assert!(json.get("error").is_none());
        assert!(json["ts"].is_string());
    }

    #[test]
    fn invalid_input_record() {
        let record = DecisionRecord::invalid_input("expected value at line 1 column 1", "m", "/w");
        assert_eq!(record.status, RouteStatus::Error);
        assert_eq!(
            record.error.as_deref(),
            Some("invalid stdin: expected value at line 1 column 1")
        );
        assert!(record.result.is_empty());
    }

    #[test]
    fn reads_sparse_lines() {
        let line = r#"{"ts":"2026-01-02T03:04:05Z","status":"ok","result":{"docs":["a.md"]}}"#;
        let record: DecisionRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.result.docs, vec!["a.md"]);
        assert!(record.result.skills.is_empty());
        assert_eq!(record.catalog_size, 0);
    }
}
