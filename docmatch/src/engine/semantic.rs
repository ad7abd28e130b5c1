// docmatch/src/engine/semantic.rs
//
// Cosine similarity over precomputed embeddings, as a percentage.
// Never calls the embedding provider: the batch computes every vector once
// up front and pairs only read them.

use crate::model::Document;

use super::{clamp_pct, round2};

pub fn semantic_similarity(vec_a: &[f32], vec_b: &[f32]) -> f64 {
    if vec_a.is_empty() || vec_a.len() != vec_b.len() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in vec_a.iter().zip(vec_b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let cosine = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !cosine.is_finite() {
        return 0.0;
    }
    round2(clamp_pct(cosine * 100.0))
}

/// Document-level score: blank text or a missing vector scores 0.
pub fn semantic_similarity_for(a: &Document, b: &Document) -> f64 {
    if a.is_blank() || b.is_blank() {
        return 0.0;
    }
    match (&a.embedding, &b.embedding) {
        (Some(va), Some(vb)) => semantic_similarity(va, vb),
        _ => 0.0,
    }
}
