//! `ctxroute logs`: recent routing decisions as a table.

use std::path::Path;

use chrono::Local;
use ctxroute_config::AppConfig;
use ctxroute_core::RouteResult;
use ctxroute_journal::{DecisionLog, DecisionRecord};

const PROJECT_WIDTH: usize = 20;
const RESULT_WIDTH: usize = 30;

pub async fn run(last: usize) -> Result<(), Box<dyn std::error::Error>> {
    let log = DecisionLog::new(AppConfig::log_path());
    let records = log.read_last(last)?;

    if records.is_empty() {
        println!("No logs yet.");
        return Ok(());
    }

    println!(
        "{:<19}  {:<20}  {:<30}  {:<8}  MSG/REG",
        "TIME", "PROJECT", "RESULT", "LATENCY"
    );
    println!("{}", "─".repeat(88));
    for record in &records {
        println!("{}", format_row(record));
    }

    println!();
    println!("Log file: {}", log.path().display());
    Ok(())
}

fn format_row(record: &DecisionRecord) -> String {
    let local = record.ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
    format!(
        "{:<19}  {:<20}  {:<30}  {}ms  ({}m/{}r)",
        local.to_string(),
        project_name(&record.cwd),
        summarize(record.error.as_deref(), &record.result),
        record.latency_ms,
        record.message_count,
        record.catalog_size
    )
}

fn project_name(cwd: &str) -> String {
    let name = Path::new(cwd)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cwd.to_string());
    truncate(&name, PROJECT_WIDTH)
}

/// `error: ..`, `(nothing)`, or doc basenames and `/skill` names.
fn summarize(error: Option<&str>, result: &RouteResult) -> String {
    if let Some(error) = error {
        return format!("error: {}", truncate(error, RESULT_WIDTH - 2));
    }

    let mut parts = Vec::new();
    if !result.docs.is_empty() {
        let docs: Vec<String> = result
            .docs
            .iter()
            .map(|p| {
                Path::new(p)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.clone())
            })
            .collect();
        parts.push(docs.join(", "));
    }
    parts.extend(result.skills.iter().map(|s| format!("/{s}")));

    if parts.is_empty() {
        "(nothing)".to_string()
    } else {
        truncate(&parts.join(" · "), RESULT_WIDTH)
    }
}

/// At most `max` characters, ending in `...` when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
