//! Route input/output types.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, SessionState};
use crate::message::ConversationTurn;
use crate::serde_helpers::null_to_default;

/// One routing request, as read from the calling process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteInput {
    /// Recent conversation, oldest first
    #[serde(default, deserialize_with = "null_to_default")]
    pub messages: Vec<ConversationTurn>,

    /// Candidate docs and skills
    #[serde(default, deserialize_with = "null_to_default")]
    pub registry: Catalog,

    /// Items already injected this session
    #[serde(default, deserialize_with = "null_to_default")]
    pub session: SessionState,

    /// Caller-defined extras, carried through untouched
    #[serde(default, deserialize_with = "null_to_default")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// The items to inject.
///
/// Both lists are always present. A `null` or missing list from the model
/// is read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResult {
    #[serde(default, deserialize_with = "null_to_default")]
    pub docs: Vec<String>,

    #[serde(default, deserialize_with = "null_to_default")]
    pub skills: Vec<String>,
}

impl RouteResult {
    /// The "inject nothing" result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty() && self.skills.is_empty()
    }
}

/// Outcome of one routing invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    /// The model was called and its answer parsed
    Ok,
    /// No call was needed
    Skipped,
    /// The call or the parse failed
    Error,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Ok => "ok",
            RouteStatus::Skipped => "skipped",
            RouteStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_serializes_both_arrays() {
        let json = serde_json::to_string(&RouteResult::empty()).unwrap();
        assert_eq!(json, r#"{"docs":[],"skills":[]}"#);
    }

    #[test]
    fn parse_full_input() {
        let input: RouteInput = serde_json::from_str(
            r#"{
                "messages": [{"type": "user", "text": "how do I deploy?"}],
                "registry": {
                    "docs": [{"path": "docs/deploy.md", "summary": "deploy guide", "read_when": ["deploying"]}],
                    "skills": [{"name": "ship", "description": "release helper"}]
                },
                "session": {"docs_read": [], "skills_used": ["ship"]},
                "metadata": {"session_id": "abc"}
            }"#,
        )
        .unwrap();

        assert_eq!(input.messages.len(), 1);
        assert_eq!(input.registry.len(), 2);
        assert!(input.session.has_used("ship"));
        assert_eq!(input.metadata["session_id"], "abc");
    }

    #[test]
    fn parse_minimal_input() {
        let input: RouteInput = serde_json::from_str("{}").unwrap();
        assert!(input.messages.is_empty());
        assert!(input.registry.is_empty());

        let input: RouteInput =
            serde_json::from_str(r#"{"messages":null,"registry":null,"session":null}"#).unwrap();
        assert!(input.messages.is_empty());
        assert!(input.registry.is_empty());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RouteStatus::Skipped).unwrap(), r#""skipped""#);
        let status: RouteStatus = serde_json::from_str(r#""error""#).unwrap();
        assert_eq!(status, RouteStatus::Error);
        assert_eq!(RouteStatus::Ok.to_string(), "ok");
    }
}
