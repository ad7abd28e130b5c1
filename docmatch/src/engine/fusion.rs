// docmatch/src/engine/fusion.rs
//
// Weighted fusion of the lexical and semantic signals.
//
// Weight distribution (sum = 1.00):
//   Lexical   0.70  word alignment ratio, the direct evidence of reuse
//   Semantic  0.30  embedding cosine, catches paraphrase
//
// These are policy constants, not user settings. Recalibrate here against a
// labelled corpus; nothing else in the pipeline depends on their values.

use serde::{Deserialize, Serialize};

use super::{clamp_pct, round2};

pub const LEXICAL_WEIGHT:  f64 = 0.7;
pub const SEMANTIC_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub similarity:  f64,
    pub originality: f64,
}

pub fn combine(lexical_score: f64, semantic_score: f64) -> Scores {
    let fused = LEXICAL_WEIGHT * lexical_score + SEMANTIC_WEIGHT * semantic_score;
    let similarity = round2(clamp_pct(fused));
    Scores { similarity, originality: round2(100.0 - similarity) }
}
