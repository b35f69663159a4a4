//! Response normalizer.
//!
//! Models do not always follow formatting instructions, so the raw text is
//! trimmed and unwrapped from a markdown code fence before it is parsed.
//! Extra fields (a `reasoning` sentence, say) are ignored. A `null` or
//! missing list becomes empty. Item keys are not checked against the catalog.

use ctxroute_core::{RouteError, RouteResult};

const FENCE: &str = "```";

/// Parse raw model output into a [`RouteResult`].
///
/// On failure the error carries `raw` unchanged.
pub fn normalize(raw: &str) -> Result<RouteResult, RouteError> {
    let cleaned = strip_fences(raw);

    serde_json::from_str::<RouteResult>(&cleaned).map_err(|e| RouteError::Parse {
        reason: e.to_string(),
        raw: raw.to_string(),
    })
}

/// Drop a leading fence line (with any language tag) and, if present, the
/// closing fence line.
fn strip_fences(raw: &str) -> String {
    let text = raw.trim();
    if !text.starts_with(FENCE) {
        return text.to_string();
    }

    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < 2 {
        return text.to_string();
    }

    lines.remove(0);
    if lines.last().is_some_and(|last| last.trim() == FENCE) {
        lines.pop();
    }

    lines.join("\n").trim().to_string()
}
