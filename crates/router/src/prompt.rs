//! Prompt builder.
//!
//! Turns the eligible catalog and the recent conversation into the single
//! instruction text sent to the completion model. Output depends only on the
//! inputs, so the same call always yields byte-identical text.

use std::fmt::Write;

use ctxroute_core::{Catalog, ConversationTurn};

/// Longest turn text (in characters) copied into the prompt.
pub const MAX_TURN_CHARS: usize = 500;

const PREAMBLE: &str = "You are a context router for an AI agent. Your job: decide which docs \
or skills the agent needs to read before it responds to the current conversation.";

const INSTRUCTIONS: &str = r#"## Instructions

Based on the conversation above, decide what the agent needs before its next response.

Rules:
- Only select items that are genuinely relevant to what the user is asking for right now
- When in doubt, leave it out: omitting an item is better than injecting noise
- Return ONLY raw JSON: no explanation, no prose, no markdown code fences

Return exactly:
{"docs": ["path/to/doc.md"], "skills": ["skill-name"]}

If nothing is needed:
{"docs": [], "skills": []}
"#;

/// Build the routing prompt.
pub fn build_prompt(messages: &[ConversationTurn], catalog: &Catalog) -> String {
    let mut out = String::with_capacity(1024 + catalog.len() * 128);

    out.push_str(PREAMBLE);
    out.push_str("\n\n## Available docs and skills\n\n");
    write_catalog(&mut out, catalog);

    out.push_str("\n## Recent conversation\n\n");
    write_conversation(&mut out, messages);

    out.push('\n');
    out.push_str(INSTRUCTIONS);
    out
}

fn write_catalog(out: &mut String, catalog: &Catalog) {
    if catalog.is_empty() {
        out.push_str("(none)\n");
        return;
    }

    if !catalog.docs.is_empty() {
        out.push_str("Docs:\n");
        for doc in &catalog.docs {
            let triggers = if doc.triggers.is_empty() {
                "(none)".to_string()
            } else {
                doc.triggers.join(", ")
            };
            let _ = writeln!(out, "- path: {}", doc.path);
            let _ = writeln!(out, "  summary: {}", doc.summary);
            let _ = writeln!(out, "  triggers: {triggers}");
        }
    }

    if !catalog.skills.is_empty() {
        if !catalog.docs.is_empty() {
            out.push('\n');
        }
        out.push_str("Skills:\n");
        for skill in &catalog.skills {
            let _ = writeln!(out, "- name: {}", skill.name);
            let _ = writeln!(out, "  description: {}", skill.description);
        }
    }
}

fn write_conversation(out: &mut String, messages: &[ConversationTurn]) {
    if messages.is_empty() {
        out.push_str("(no messages)\n");
        return;
    }

    for turn in messages {
        let _ = writeln!(out, "[{}] {}", turn.role, truncate(&turn.text, MAX_TURN_CHARS));
    }
}

/// Cut `text` to at most `max` characters, appending `...` when cut.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
