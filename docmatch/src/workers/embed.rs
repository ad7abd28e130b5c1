// docmatch/src/workers/embed.rs
//
// Default embedding provider: random feature hashing (RFH).
//
//   1. Tokenize the normalized text into word n-grams (n=1..3)
//   2. Hash each n-gram deterministically into a 256-dim ±1 feature vector
//   3. Sum and L2-normalize → unit embedding vector
//
// Paraphrases that keep vocabulary and short phrases score high; reordered
// or lightly edited copies keep most of their n-grams. No model weights, no
// runtime, and the same text always maps to the same vector. A
// sentence-transformer backend only needs to implement EmbeddingProvider.

use sha2::{Digest, Sha256};
use tracing::debug;

use super::EmbeddingProvider;
use crate::error::ProviderError;

pub const DIM: usize = 256;
const MAX_NGRAM: usize = 3;

#[derive(Debug, Default, Clone, Copy)]
pub struct HashingEmbedder;

impl HashingEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        debug!("embedding batch of {} texts", texts.len());
        Ok(texts.iter().map(|t| embed_text(t).to_vec()).collect())
    }
}

/// Deterministic random feature vector for an n-gram.
/// Maps token → 256 dimensions of ±1 via SHA256 (one bit per dimension).
fn token_feature(token: &str) -> [f32; DIM] {
    let mut h = Sha256::new();
    h.update(b"dm_rfh_v1:");
    h.update(token.as_bytes());
    let digest = h.finalize();

    let mut feat = [0.0f32; DIM];
    for (i, f) in feat.iter_mut().enumerate() {
        let bit = (digest[i / 8] >> (i % 8)) & 1;
        *f = if bit == 1 { 1.0 } else { -1.0 };
    }
    feat
}

/// Unit-length embedding; the zero vector for empty text.
pub fn embed_text(text: &str) -> [f32; DIM] {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut vec = [0.0f32; DIM];

    for n in 1..=MAX_NGRAM {
        for window in tokens.windows(n) {
            let feat = token_feature(&window.join(" "));
            for (v, f) in vec.iter_mut().zip(feat.iter()) {
                *v += f;
            }
        }
    }

    // L2 normalize
    let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-8 {
        for v in vec.iter_mut() {
            *v /= norm;
        }
    }
    vec
}
