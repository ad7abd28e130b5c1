// docmatch/src/report.rs
//
// Plain-text, markdown and JSON output for batches, single reports and
// history listings.

use std::fmt::Write as _;

use clap::ValueEnum;

use crate::model::{BatchOutcome, ComparisonResult, DocSide};
use crate::state::reports::{HistoryEntry, ReportRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

fn ai_cell(side: &DocSide) -> String {
    match side.ai {
        Some(v) => format!("{} {:.2}%", v.label, v.score),
        None => "-".to_string(),
    }
}

// ── Batch ─────────────────────────────────────────────────────────────────────

pub fn render_batch(outcome: &BatchOutcome, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => batch_text(outcome),
        OutputFormat::Markdown => batch_markdown(outcome),
        OutputFormat::Json => serde_json::to_string_pretty(outcome)?,
    })
}

fn batch_text(outcome: &BatchOutcome) -> String {
    let mut out = String::new();
    let width = outcome.comparisons.iter().map(|c| c.pair.chars().count()).max().unwrap_or(4).max(4);

    let _ = writeln!(
        out,
        "{:<width$}  {:>10}  {:>11}  {:>8}  {:>8}  {}",
        "PAIR", "SIMILARITY", "ORIGINALITY", "LEXICAL", "SEMANTIC", "REPORT",
        width = width
    );
    for c in &outcome.comparisons {
        let _ = writeln!(
            out,
            "{:<width$}  {:>9.2}%  {:>10.2}%  {:>8.2}  {:>8.2}  {}",
            c.pair, c.similarity, c.originality, c.lexical_score, c.semantic_score, c.report_id,
            width = width
        );
    }
    if !outcome.dropped.is_empty() {
        let _ = writeln!(out, "\ndropped (no comparable text): {}", outcome.dropped.join(", "));
    }
    out
}

fn batch_markdown(outcome: &BatchOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# docmatch comparison");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Pairs**: {}  **Dropped**: {}",
        outcome.comparisons.len(),
        outcome.dropped.len()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "| Pair | Similarity | Originality | Lexical | Semantic | AI (A) | AI (B) | Report |");
    let _ = writeln!(out, "|------|-----------:|------------:|--------:|---------:|--------|--------|--------|");
    for c in &outcome.comparisons {
        let _ = writeln!(
            out,
            "| {} | {:.2}% | {:.2}% | {:.2} | {:.2} | {} | {} | `{}` |",
            c.pair.replace('|', "\\|"),
            c.similarity,
            c.originality,
            c.lexical_score,
            c.semantic_score,
            ai_cell(&c.doc_a),
            ai_cell(&c.doc_b),
            c.report_id
        );
    }
    if !outcome.dropped.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Dropped: {}", outcome.dropped.join(", "));
    }
    out
}

// ── Single report ─────────────────────────────────────────────────────────────

pub fn render_comparison(result: &ComparisonResult, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Markdown => comparison_markdown(result),
        OutputFormat::Text => comparison_text(result),
    })
}

pub fn render_record(record: &ReportRecord, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(record)?);
    }
    let mut out = render_comparison(&record.result, format)?;
    let _ = writeln!(out, "\nsaved {} by {}", record.timestamp.to_rfc3339(), record.user.as_deref().unwrap_or("-"));
    Ok(out)
}

fn comparison_text(c: &ComparisonResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", c.pair, c.report_id);
    let _ = writeln!(
        out,
        "similarity {:.2}%  originality {:.2}%  (lexical {:.2}, semantic {:.2})",
        c.similarity, c.originality, c.lexical_score, c.semantic_score
    );
    for side in [&c.doc_a, &c.doc_b] {
        let _ = writeln!(out, "\n{}  AI: {}", side.name, ai_cell(side));
        for fragment in side.markup.matched_fragments() {
            let _ = writeln!(out, "  = {}", fragment);
        }
    }
    out
}

fn comparison_markdown(c: &ComparisonResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", c.pair);
    let _ = writeln!(out);
    let _ = writeln!(out, "| Metric      | Value   |");
    let _ = writeln!(out, "|-------------|---------|");
    let _ = writeln!(out, "| Similarity  | {:.2}% |", c.similarity);
    let _ = writeln!(out, "| Originality | {:.2}% |", c.originality);
    let _ = writeln!(out, "| Lexical     | {:.2}  |", c.lexical_score);
    let _ = writeln!(out, "| Semantic    | {:.2}  |", c.semantic_score);
    let _ = writeln!(out);
    for side in [&c.doc_a, &c.doc_b] {
        let _ = writeln!(out, "## {}", side.name);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "AI: {}  Matched: {:.2}% of words",
            ai_cell(side),
            side.markup.matched_share()
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", side.markup.to_html());
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "Report `{}`", c.report_id);
    out
}

// ── History ───────────────────────────────────────────────────────────────────

pub fn render_history(entries: &[HistoryEntry], format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(entries)?);
    }
    let mut out = String::new();
    if entries.is_empty() {
        out.push_str("no history\n");
        return Ok(out);
    }
    for e in entries {
        let top = e
            .comparisons
            .first()
            .map(|c| format!("top {} {:.2}%", c.pair, c.similarity))
            .unwrap_or_else(|| "no pairs".to_string());
        let rules: Vec<String> = e.settings.effective_rules().iter().map(|r| r.to_string()).collect();
        let _ = writeln!(
            out,
            "{}  {} pairs  {}  rules=[{}]",
            e.timestamp.format("%Y-%m-%d %H:%M:%S"),
            e.comparisons.len(),
            top,
            rules.join(",")
        );
    }
    Ok(out)
}
