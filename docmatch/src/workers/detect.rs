// docmatch/src/workers/detect.rs
//
// Default AI-authorship detector: compression against a prelude.
//
// The prelude is a block of typical machine-generated prose. A sample that
// shares its phrasing compresses better when appended to it, pulling the
// combined ratio below the prelude's own ratio:
//
//   delta = ratio(prelude) − ratio(prelude + "\n" + sample)
//   delta > 0  → AI       delta ≤ 0 → Human
//   confidence = clamp(|delta| · 10 000, 0, 100)
//
// Cheap, offline and deterministic. A weak signal on its own; it is
// reported beside each document, never folded into the similarity score.

use std::io::Cursor;

use zstd::stream::encode_all;

use super::AiDetector;
use crate::engine::{clamp_pct, round2};
use crate::error::ProviderError;
use crate::model::{AiLabel, AiVerdict};

const COMPRESSION_LEVEL: i32 = 3;
const CONFIDENCE_SCALE: f64 = 10_000.0;

const PRELUDE: &str = "\
In today's rapidly evolving landscape, it is important to note that a comprehensive \
understanding of the topic requires a nuanced approach. Furthermore, it is essential to \
consider the various factors that contribute to the overall outcome. In conclusion, by \
leveraging these insights, we can foster a deeper understanding and pave the way for \
future advancements. Additionally, it is worth noting that this multifaceted issue \
plays a crucial role in shaping the broader context. Overall, the findings highlight \
the significance of continued research and underscore the need for a holistic \
perspective. Moreover, this approach not only enhances efficiency but also ensures \
that stakeholders can navigate the complexities of the modern world. It is crucial \
to recognize that these developments have far-reaching implications for society as a \
whole. Ultimately, embracing innovation and collaboration will enable us to unlock \
new opportunities and drive meaningful change. In summary, the key takeaways from \
this analysis demonstrate the importance of a balanced and thoughtful strategy.";

pub struct CompressionDetector {
    prelude:       String,
    prelude_ratio: f64,
}

impl CompressionDetector {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_prelude(PRELUDE)
    }

    pub fn with_prelude(prelude: &str) -> Result<Self, ProviderError> {
        let prelude_ratio = compression_ratio(prelude)?;
        Ok(Self { prelude: prelude.to_string(), prelude_ratio })
    }
}

fn compression_ratio(text: &str) -> Result<f64, ProviderError> {
    if text.is_empty() {
        return Ok(1.0);
    }
    let compressed = encode_all(Cursor::new(text.as_bytes()), COMPRESSION_LEVEL)
        .map_err(|e| ProviderError::Detector(e.to_string()))?;
    Ok(compressed.len() as f64 / text.len() as f64)
}

impl AiDetector for CompressionDetector {
    fn detect(&self, text: &str) -> Result<AiVerdict, ProviderError> {
        if text.trim().is_empty() {
            return Ok(AiVerdict { label: AiLabel::Human, score: 0.0 });
        }

        let combined = format!("{}\n{}", self.prelude, text);
        let delta = self.prelude_ratio - compression_ratio(&combined)?;

        let label = if delta > 0.0 { AiLabel::Ai } else { AiLabel::Human };
        let score = round2(clamp_pct(delta.abs() * CONFIDENCE_SCALE));
        Ok(AiVerdict { label, score })
    }
}
