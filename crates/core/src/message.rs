//! Conversation turn types.
//!
//! The caller hands over the recent tail of its conversation, oldest first.
//! Turns are immutable inputs; only the prompt builder shortens their text,
//! and only in the prompt it renders.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn of the conversation.
///
/// On the wire the role travels as `type`: `{"type": "user", "text": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(rename = "type")]
    pub role: Role,

    #[serde(default)]
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_uses_type_on_the_wire() {
        let turn = ConversationTurn::user("help me deploy");
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"type":"user","text":"help me deploy"}"#);
    }

    #[test]
    fn parse_assistant_turn() {
        let turn: ConversationTurn =
            serde_json::from_str(r#"{"type":"assistant","text":"sure thing"}"#).unwrap();
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.text, "sure thing");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result = serde_json::from_str::<ConversationTurn>(r#"{"type":"system","text":"x"}"#);
        assert!(result.is_err());
    }
}
