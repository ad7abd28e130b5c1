// docmatch/src/model.rs
//
// Shared domain types flowing through the comparison pipeline.
//
//   RawInput  → Document  → (pairwise) AlignmentResult + semantic score
//             → ComparisonResult → BatchOutcome
//
// Everything here is transient for one batch except ComparisonResult, which
// the CLI hands to the report store.

use std::ops::Range;

use serde::{Deserialize, Serialize};

// ── Inputs ────────────────────────────────────────────────────────────────────

/// One item submitted to a batch.
#[derive(Debug, Clone)]
pub enum RawInput {
    /// Uploaded file; text comes from the extractor (archives are expanded).
    File { name: String, bytes: Vec<u8> },
    /// Pasted text; skips extraction.
    Text { name: String, text: String },
}

impl RawInput {
    pub fn file(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::File { name: name.into(), bytes }
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text { name: name.into(), text: text.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Text { name, .. } => name,
        }
    }
}

/// A single comparable document. Owned by the batch for its lifetime.
#[derive(Debug, Clone)]
pub struct Document {
    pub name:            String,
    pub raw_text:        String,
    pub normalized_text: String,
    pub embedding:       Option<Vec<f32>>,
    pub ai_verdict:      Option<AiVerdict>,
}

impl Document {
    pub fn new(name: impl Into<String>, raw_text: String, normalized_text: String) -> Self {
        Self {
            name: name.into(),
            raw_text,
            normalized_text,
            embedding: None,
            ai_verdict: None,
        }
    }

    /// True when nothing survived normalization.
    pub fn is_blank(&self) -> bool {
        self.normalized_text.trim().is_empty()
    }
}

// ── AI authorship ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AiLabel {
    #[serde(rename = "AI")]
    Ai,
    Human,
}

impl std::fmt::Display for AiLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ai => write!(f, "AI"),
            Self::Human => write!(f, "Human"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AiVerdict {
    pub label: AiLabel,
    pub score: f64, // confidence, [0,100]
}

// ── Alignment ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Equal,
    Replace,
    Insert, // present only in B
    Delete, // present only in A
}

/// One alignment run over the two word sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub kind: OpKind,
    pub a:    Range<usize>,
    pub b:    Range<usize>,
}

impl Opcode {
    pub fn new(kind: OpKind, a: Range<usize>, b: Range<usize>) -> Self {
        Self { kind, a, b }
    }

    /// Same run seen from the other document's side.
    pub fn mirrored(&self) -> Self {
        let kind = match self.kind {
            OpKind::Insert => OpKind::Delete,
            OpKind::Delete => OpKind::Insert,
            k => k,
        };
        Self { kind, a: self.b.clone(), b: self.a.clone() }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpanTag {
    Match,
    Removed,
    Changed,
    Added,
}

impl SpanTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Removed => "removed",
            Self::Changed => "changed",
            Self::Added => "added",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    pub tag:  SpanTag,
    pub text: String,
}

/// Annotated rendering of one side of a pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Markup(pub Vec<Span>);

impl Markup {
    pub fn push(&mut self, tag: SpanTag, text: String) {
        self.0.push(Span { tag, text });
    }

    pub fn spans(&self) -> &[Span] {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct AlignmentResult {
    pub opcodes:            Vec<Opcode>,
    pub markup_a:           Markup,
    pub markup_b:           Markup,
    pub lexical_similarity: f64,
}

// ── Results ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocSide {
    pub name:   String,
    pub markup: Markup,
    pub ai:     Option<AiVerdict>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub pair:           String,
    pub similarity:     f64,
    pub originality:    f64,
    pub semantic_score: f64,
    pub lexical_score:  f64,
    pub doc_a:          DocSide,
    pub doc_b:          DocSide,
    pub report_id:      String,
}

impl ComparisonResult {
    pub fn pair_label(a: &str, b: &str) -> String {
        format!("{} vs {}", a, b)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Sorted by descending similarity.
    pub comparisons: Vec<ComparisonResult>,
    /// Inputs that produced no comparable text.
    pub dropped:     Vec<String>,
}
