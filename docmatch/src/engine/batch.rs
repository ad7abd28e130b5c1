// docmatch/src/engine/batch.rs
//
// Batch orchestrator: N inputs → C(N,2) scored pairs.
//
// Stage 1  per input     extract + normalize on the CPU pool, empties dropped
// Stage 2  per document  one embed call for the whole batch, one detect each
// Stage 3  per pair      align on the CPU pool, cosine on cached vectors,
//                        fuse, assign report id
//
// Each stage fully completes before the next starts. The embedding provider
// is the expensive call, so it is never invoked per pair. Dropping the
// returned future aborts the pairwise tasks still in flight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::align::align;
use super::fusion::combine;
use super::normalize::{Lemmatizer, Normalizer};
use super::semantic::semantic_similarity_for;
use crate::config::FilterConfig;
use crate::error::{CompareError, ProviderError};
use crate::extract::Extractor;
use crate::model::{BatchOutcome, ComparisonResult, DocSide, Document, OpKind, RawInput};
use crate::workers::pool::CpuPool;
use crate::workers::{AiDetector, EmbeddingProvider};

pub const MIN_DOCUMENTS: usize = 2;

pub struct BatchComparator {
    embedder:   Arc<dyn EmbeddingProvider>,
    detector:   Arc<dyn AiDetector>,
    extractor:  Arc<dyn Extractor>,
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
    pool:       CpuPool,
}

/// What one input turned into after stage 1.
enum Prepared {
    Ready(Document),
    Dropped { name: String, reason: String },
}

impl BatchComparator {
    pub fn new(
        embedder:  Arc<dyn EmbeddingProvider>,
        detector:  Arc<dyn AiDetector>,
        extractor: Arc<dyn Extractor>,
        pool:      CpuPool,
    ) -> Self {
        Self { embedder, detector, extractor, lemmatizer: None, pool }
    }

    pub fn with_lemmatizer(mut self, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        self.lemmatizer = Some(lemmatizer);
        self
    }

    pub async fn compare_batch(
        &self,
        inputs: Vec<RawInput>,
        config: &FilterConfig,
    ) -> Result<BatchOutcome, CompareError> {
        let n_inputs = inputs.len();
        if n_inputs < MIN_DOCUMENTS {
            return Err(CompareError::validation(format!(
                "at least {} documents are required, got {}",
                MIN_DOCUMENTS, n_inputs
            )));
        }

        // ── Stage 1: extraction + normalization ──────────────────────────────
        let (mut docs, dropped) = self.prepare(inputs, config).await?;
        info!(
            "batch: {} inputs → {} documents ({} dropped)",
            n_inputs, docs.len(), dropped.len()
        );
        if docs.len() < MIN_DOCUMENTS {
            return Err(CompareError::validation(format!(
                "insufficient documents: {} of {} inputs have comparable text after filtering",
                docs.len(), n_inputs
            )));
        }

        // ── Stage 2: embeddings + AI verdicts ────────────────────────────────
        self.annotate(&mut docs).await?;

        // ── Stage 3: pairwise comparison ─────────────────────────────────────
        let comparisons = self.compare_pairs(Arc::new(docs)).await?;
        if let Some(top) = comparisons.first() {
            info!(
                "batch: {} pairs, top {} similarity={:.2}",
                comparisons.len(), top.pair, top.similarity
            );
        }

        Ok(BatchOutcome { comparisons, dropped })
    }

    /// Re-score two edited texts. Both must be non-empty before and after
    /// normalization.
    pub async fn recompare(
        &self,
        a: RawInput,
        b: RawInput,
        config: &FilterConfig,
    ) -> Result<ComparisonResult, CompareError> {
        for input in [&a, &b] {
            if let RawInput::Text { name, text } = input {
                if text.trim().is_empty() {
                    return Err(CompareError::validation(format!("{} is empty", name)));
                }
            }
        }

        let (mut docs, dropped) = self.prepare(vec![a, b], config).await?;
        if docs.len() != 2 {
            return Err(CompareError::validation(format!(
                "nothing left to compare after filtering: {}",
                dropped.join(", ")
            )));
        }

        self.annotate(&mut docs).await?;
        self.pool.run(move || compare_pair(&docs[0], &docs[1])).await
    }

    async fn prepare(
        &self,
        inputs: Vec<RawInput>,
        config: &FilterConfig,
    ) -> Result<(Vec<Document>, Vec<String>), CompareError> {
        let normalizer = Arc::new(Normalizer::new(config).with_lemmatizer(self.lemmatizer.clone()));
        for rejected in normalizer.rejected_patterns() {
            warn!("skipping custom pattern: {}", rejected);
        }

        let mut set = JoinSet::new();
        for (idx, input) in inputs.into_iter().enumerate() {
            let extractor  = Arc::clone(&self.extractor);
            let normalizer = Arc::clone(&normalizer);
            let pool       = self.pool.clone();
            let name       = input.name().to_string();
            set.spawn(async move {
                let out = pool
                    .run(move || prepare_input(extractor.as_ref(), &normalizer, input))
                    .await;
                (idx, name, out)
            });
        }

        let mut slots: Vec<(usize, Vec<Prepared>)> = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            let (idx, name, out) = joined?;
            match out {
                Ok(prepared) => slots.push((idx, prepared)),
                Err(e) => slots.push((idx, vec![Prepared::Dropped { name, reason: e.to_string() }])),
            }
        }
        slots.sort_by_key(|(idx, _)| *idx);

        let mut docs = Vec::new();
        let mut dropped = Vec::new();
        for prepared in slots.into_iter().flat_map(|(_, p)| p) {
            match prepared {
                Prepared::Ready(doc) => docs.push(doc),
                Prepared::Dropped { name, reason } => {
                    warn!("dropping {}: {}", name, reason);
                    dropped.push(name);
                }
            }
        }
        Ok((docs, dropped))
    }

    async fn annotate(&self, docs: &mut [Document]) -> Result<(), CompareError> {
        let texts: Vec<String> = docs.iter().map(|d| d.normalized_text.clone()).collect();
        let expected = texts.len();

        let embedder = Arc::clone(&self.embedder);
        let vectors = tokio::task::spawn_blocking(move || embedder.embed(&texts)).await??;
        if vectors.len() != expected {
            return Err(ProviderError::Shape { expected, got: vectors.len() }.into());
        }
        let dim = vectors.first().map_or(0, Vec::len);
        if let Some((idx, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
            return Err(ProviderError::Embedding(format!(
                "vector {} has {} dimensions, expected {}",
                idx, v.len(), dim
            ))
            .into());
        }
        debug!("embedded {} documents in one call", expected);

        let mut set = JoinSet::new();
        for (idx, doc) in docs.iter().enumerate() {
            let detector = Arc::clone(&self.detector);
            let text     = doc.normalized_text.clone();
            set.spawn_blocking(move || (idx, detector.detect(&text)));
        }
        let mut verdicts = vec![None; docs.len()];
        while let Some(joined) = set.join_next().await {
            let (idx, verdict) = joined?;
            verdicts[idx] = Some(verdict?);
        }

        for ((doc, vector), verdict) in docs.iter_mut().zip(vectors).zip(verdicts) {
            doc.embedding  = Some(vector);
            doc.ai_verdict = verdict;
        }
        Ok(())
    }

    async fn compare_pairs(&self, docs: Arc<Vec<Document>>) -> Result<Vec<ComparisonResult>, CompareError> {
        let n = docs.len();
        let mut set = JoinSet::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let docs = Arc::clone(&docs);
                let pool = self.pool.clone();
                set.spawn(async move {
                    pool.run(move || compare_pair(&docs[i], &docs[j]))
                        .await
                        .map(|r| ((i, j), r))
                });
            }
        }

        let mut results = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        while let Some(joined) = set.join_next().await {
            results.push(joined??);
        }

        // index order first, so the stable sort keeps it among ties
        results.sort_by_key(|(ij, _)| *ij);
        let mut comparisons: Vec<ComparisonResult> = results.into_iter().map(|(_, r)| r).collect();
        comparisons.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        Ok(comparisons)
    }
}

fn prepare_input(extractor: &dyn Extractor, normalizer: &Normalizer, input: RawInput) -> Vec<Prepared> {
    match input {
        RawInput::Text { name, text } => vec![finish(normalizer, name, text)],
        RawInput::File { name, bytes } if extractor.is_archive(&name) => {
            match extractor.extract_archive(&bytes, &name) {
                Ok(members) if members.is_empty() => vec![Prepared::Dropped {
                    name,
                    reason: "archive holds no supported documents".into(),
                }],
                Ok(members) => members
                    .into_iter()
                    .map(|(inner, data)| extract_one(extractor, normalizer, inner, &data))
                    .collect(),
                Err(e) => vec![Prepared::Dropped { name, reason: e.to_string() }],
            }
        }
        RawInput::File { name, bytes } => vec![extract_one(extractor, normalizer, name, &bytes)],
    }
}

fn extract_one(extractor: &dyn Extractor, normalizer: &Normalizer, name: String, bytes: &[u8]) -> Prepared {
    match extractor.extract(bytes, &name) {
        Ok(raw) => finish(normalizer, name, raw),
        Err(e) => Prepared::Dropped { name, reason: e.to_string() },
    }
}

fn finish(normalizer: &Normalizer, name: String, raw: String) -> Prepared {
    let normalized = normalizer.normalize(&raw);
    if normalized.is_empty() {
        Prepared::Dropped { name, reason: "no comparable text after filtering".into() }
    } else {
        Prepared::Ready(Document::new(name, raw, normalized))
    }
}

/// Score one pair from already-annotated documents. Pure apart from the id.
pub fn compare_pair(a: &Document, b: &Document) -> ComparisonResult {
    let alignment = align(&a.normalized_text, &b.normalized_text);
    let semantic  = semantic_similarity_for(a, b);
    let scores    = combine(alignment.lexical_similarity, semantic);
    let pair      = ComparisonResult::pair_label(&a.name, &b.name);

    let edits = alignment.opcodes.iter().filter(|op| op.kind != OpKind::Equal).count();
    debug!(
        "{}: lexical={:.2} semantic={:.2} similarity={:.2} edits={}",
        pair, alignment.lexical_similarity, semantic, scores.similarity, edits
    );

    ComparisonResult {
        report_id:      generate_report_id(&pair),
        pair,
        similarity:     scores.similarity,
        originality:    scores.originality,
        semantic_score: semantic,
        lexical_score:  alignment.lexical_similarity,
        doc_a: DocSide { name: a.name.clone(), markup: alignment.markup_a, ai: a.ai_verdict },
        doc_b: DocSide { name: b.name.clone(), markup: alignment.markup_b, ai: b.ai_verdict },
    }
}

static REPORT_SEQ: AtomicU64 = AtomicU64::new(0);

/// 12 upper-case hex chars. The process-wide counter keeps ids distinct even
/// when the clock does not advance between pairs.
pub fn generate_report_id(pair: &str) -> String {
    let mut h = Sha256::new();
    h.update(b"dm_report:");
    h.update(pair.as_bytes());
    h.update(Utc::now().timestamp_nanos_opt().unwrap_or(0).to_le_bytes());
    h.update(REPORT_SEQ.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    hex::encode_upper(&h.finalize()[..6])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    use crate::config::Rule;
    use crate::error::ExtractError;
    use crate::model::{AiLabel, AiVerdict};
    use crate::workers::embed::HashingEmbedder;

    // ── Test doubles ─────────────────────────────────────────────────────────

    /// Records every batch it is asked to embed.
    #[derive(Default)]
    struct RecordingEmbedder {
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl EmbeddingProvider for RecordingEmbedder {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            self.calls.lock().push(texts.to_vec());
            HashingEmbedder.embed(texts)
        }
    }

    struct FailingEmbedder;

    impl EmbeddingProvider for FailingEmbedder {
        fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Err(ProviderError::Embedding("model not loaded".into()))
        }
    }

    struct ShortEmbedder;

    impl EmbeddingProvider for ShortEmbedder {
        fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(vec![vec![1.0, 0.0]])
        }
    }

    /// Vectors of uneven length.
    struct RaggedEmbedder;

    impl EmbeddingProvider for RaggedEmbedder {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts.iter().enumerate().map(|(i, _)| vec![1.0; i + 1]).collect())
        }
    }

    /// Records every text it is asked to judge.
    #[derive(Default)]
    struct RecordingDetector {
        calls: Mutex<Vec<String>>,
    }

    impl AiDetector for RecordingDetector {
        fn detect(&self, text: &str) -> Result<AiVerdict, ProviderError> {
            self.calls.lock().push(text.to_string());
            Ok(AiVerdict { label: AiLabel::Human, score: 12.5 })
        }
    }

    struct DropPlural;

    impl Lemmatizer for DropPlural {
        fn lemmatize(&self, text: &str) -> Option<String> {
            Some(text.split(' ').map(|w| w.trim_end_matches('s')).collect::<Vec<_>>().join(" "))
        }
    }

    /// Files are UTF-8 text, except names starting with "corrupt".
    struct PlainExtractor;

    impl Extractor for PlainExtractor {
        fn extract(&self, bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
            if filename.starts_with("corrupt") {
                return Err(ExtractError::Pdf("bad xref table".into()));
            }
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }

        fn extract_archive(&self, bytes: &[u8], filename: &str)
            -> Result<Vec<(String, Vec<u8>)>, ExtractError>
        {
            // "a|b|c" → three members
            Ok(String::from_utf8_lossy(bytes)
                .split('|')
                .enumerate()
                .map(|(i, part)| (format!("{}::{}.txt", filename, i), part.as_bytes().to_vec()))
                .collect())
        }
    }

    struct Fixture {
        embedder: Arc<RecordingEmbedder>,
        detector: Arc<RecordingDetector>,
        batch:    BatchComparator,
    }

    fn fixture() -> Fixture {
        let embedder = Arc::new(RecordingEmbedder::default());
        let detector = Arc::new(RecordingDetector::default());
        let batch = BatchComparator::new(
            embedder.clone(),
            detector.clone(),
            Arc::new(PlainExtractor),
            CpuPool::new(2),
        );
        Fixture { embedder, detector, batch }
    }

    fn with_embedder(embedder: Arc<dyn EmbeddingProvider>) -> BatchComparator {
        BatchComparator::new(
            embedder,
            Arc::new(RecordingDetector::default()),
            Arc::new(PlainExtractor),
            CpuPool::new(2),
        )
    }

    fn words(n: usize, tag: &str) -> String {
        (0..n).map(|i| format!("{}{}", tag, i)).collect::<Vec<_>>().join(" ")
    }

    // ── Tests ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn three_documents_give_three_pairs_and_one_embed_call() {
        let f = fixture();
        let inputs = vec![
            RawInput::text("a", "the quick brown fox jumps"),
            RawInput::text("b", "the quick brown dog jumps"),
            RawInput::text("c", "an entirely unrelated sentence"),
        ];
        let out = f.batch.compare_batch(inputs, &FilterConfig::default()).await.unwrap();

        let mut pairs: Vec<&str> = out.comparisons.iter().map(|c| c.pair.as_str()).collect();
        pairs.sort();
        assert_eq!(pairs, vec!["a vs b", "a vs c", "b vs c"]);
        assert!(out.dropped.is_empty());

        let calls = f.embedder.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 3);
        assert_eq!(calls[0][0], "the quick brown fox jumps");
        assert_eq!(f.detector.calls.lock().len(), 3);

        let ai = out.comparisons[0].doc_a.ai.unwrap();
        assert_eq!(ai.score, 12.5);
    }

    #[tokio::test]
    async fn results_sorted_by_descending_similarity() {
        let f = fixture();
        let inputs = vec![
            RawInput::text("x", "one two three four five six"),
            RawInput::text("y", "one two three four five seven"),
            RawInput::text("z", "red green blue"),
            RawInput::text("w", "one two nine"),
        ];
        let out = f.batch.compare_batch(inputs, &FilterConfig::default()).await.unwrap();
        assert_eq!(out.comparisons.len(), 6);
        assert_eq!(out.comparisons[0].pair, "x vs y");
        for w in out.comparisons.windows(2) {
            assert!(w[0].similarity >= w[1].similarity);
        }
        for c in &out.comparisons {
            assert!((c.similarity + c.originality - 100.0).abs() <= 0.01);
        }
    }

    #[tokio::test]
    async fn identical_documents_score_full_similarity() {
        let f = fixture();
        let text = words(50, "w");
        let inputs = vec![RawInput::text("a", text.clone()), RawInput::text("b", text)];
        let out = f.batch.compare_batch(inputs, &FilterConfig::default()).await.unwrap();
        let c = &out.comparisons[0];
        assert_eq!(c.lexical_score, 100.0);
        assert_eq!(c.semantic_score, 100.0);
        assert_eq!(c.similarity, 100.0);
        assert_eq!(c.originality, 0.0);
    }

    #[tokio::test]
    async fn failed_extraction_is_dropped_not_fatal() {
        let f = fixture();
        let inputs = vec![
            RawInput::file("a.txt", b"shared words here".to_vec()),
            RawInput::file("corrupt.pdf", vec![0, 1, 2]),
            RawInput::file("b.txt", b"shared words there".to_vec()),
        ];
        let out = f.batch.compare_batch(inputs, &FilterConfig::default()).await.unwrap();
        assert_eq!(out.comparisons.len(), 1);
        assert_eq!(out.comparisons[0].pair, "a.txt vs b.txt");
        assert_eq!(out.dropped, vec!["corrupt.pdf".to_string()]);
    }

    #[tokio::test]
    async fn archives_expand_into_members() {
        let f = fixture();
        let inputs = vec![
            RawInput::file("pack.zip", b"alpha beta|alpha gamma".to_vec()),
            RawInput::text("pasted", "alpha delta"),
        ];
        let out = f.batch.compare_batch(inputs, &FilterConfig::default()).await.unwrap();
        assert_eq!(out.comparisons.len(), 3);
        assert!(out.comparisons.iter().any(|c| c.pair == "pack.zip::0.txt vs pack.zip::1.txt"));
    }

    #[tokio::test]
    async fn empty_after_filtering_is_dropped() {
        let f = fixture();
        let config = FilterConfig::default().with_rules(vec![Rule::Apa]);
        let inputs = vec![
            RawInput::text("a", "body text one"),
            RawInput::text("b", "References\n[1] Smith"),
            RawInput::text("c", "body text two"),
        ];
        let out = f.batch.compare_batch(inputs, &config).await.unwrap();
        assert_eq!(out.comparisons.len(), 1);
        assert_eq!(out.dropped, vec!["b".to_string()]);
        assert_eq!(f.embedder.calls.lock()[0].len(), 2);
    }

    #[tokio::test]
    async fn detector_sees_filtered_text() {
        let f = fixture();
        let config = FilterConfig::default().with_rules(vec![Rule::Apa]);
        let inputs = vec![
            RawInput::text("a", "Body text here\nReferences\n[1] Smith"),
            RawInput::text("b", "Other Body\nBibliography\n[2] Jones"),
        ];
        f.batch.compare_batch(inputs, &config).await.unwrap();

        let mut seen = f.detector.calls.lock().clone();
        seen.sort();
        assert_eq!(seen, vec!["body text here".to_string(), "other body".to_string()]);
    }

    #[tokio::test]
    async fn attached_lemmatizer_shapes_the_comparison() {
        let f = fixture();
        let batch = f.batch.with_lemmatizer(Arc::new(DropPlural));
        let res = batch
            .recompare(
                RawInput::text("a", "cats chase dogs"),
                RawInput::text("b", "cat chase dog"),
                &FilterConfig::default(),
            )
            .await
            .unwrap();
        assert_eq!(res.lexical_score, 100.0);
        assert_eq!(f.embedder.calls.lock()[0], vec!["cat chase dog".to_string(); 2]);
    }

    #[tokio::test]
    async fn fewer_than_two_inputs_is_validation_error() {
        let f = fixture();
        let err = f
            .batch
            .compare_batch(vec![RawInput::text("only", "some text")], &FilterConfig::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(f.embedder.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn fewer_than_two_survivors_is_validation_error() {
        let f = fixture();
        let inputs = vec![
            RawInput::text("a", "real content"),
            RawInput::text("b", "   \n  "),
            RawInput::file("corrupt.pdf", vec![]),
        ];
        let err = f.batch.compare_batch(inputs, &FilterConfig::default()).await.unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("insufficient documents"));
        assert!(f.embedder.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_fails_the_batch() {
        let batch = with_embedder(Arc::new(FailingEmbedder));
        let inputs = vec![RawInput::text("a", "one"), RawInput::text("b", "two")];
        let err = batch.compare_batch(inputs, &FilterConfig::default()).await.unwrap_err();
        assert!(matches!(err, CompareError::Provider(ProviderError::Embedding(_))));
    }

    #[tokio::test]
    async fn wrong_length_embedding_response_is_rejected() {
        let batch = with_embedder(Arc::new(ShortEmbedder));
        let inputs = vec![
            RawInput::text("a", "one"),
            RawInput::text("b", "two"),
            RawInput::text("c", "three"),
        ];
        let err = batch.compare_batch(inputs, &FilterConfig::default()).await.unwrap_err();
        assert!(matches!(
            err,
            CompareError::Provider(ProviderError::Shape { expected: 3, got: 1 })
        ));
    }

    #[tokio::test]
    async fn uneven_vector_lengths_are_rejected() {
        let batch = with_embedder(Arc::new(RaggedEmbedder));
        let inputs = vec![RawInput::text("a", "one"), RawInput::text("b", "two")];
        let err = batch.compare_batch(inputs, &FilterConfig::default()).await.unwrap_err();
        assert!(matches!(err, CompareError::Provider(ProviderError::Embedding(_))));
        assert!(err.to_string().contains("vector 1 has 2 dimensions, expected 1"));
    }

    #[tokio::test]
    async fn report_ids_are_unique_hex() {
        let f = fixture();
        let inputs: Vec<RawInput> = (0..6)
            .map(|i| RawInput::text(format!("d{}", i), "same text everywhere"))
            .collect();
        let out = f.batch.compare_batch(inputs, &FilterConfig::default()).await.unwrap();
        assert_eq!(out.comparisons.len(), 15);

        let ids: HashSet<&str> = out.comparisons.iter().map(|c| c.report_id.as_str()).collect();
        assert_eq!(ids.len(), 15);
        for id in ids {
            assert_eq!(id.len(), 12);
            assert!(id.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        }
    }

    #[tokio::test]
    async fn recompare_scores_edited_texts() {
        let f = fixture();
        let res = f
            .batch
            .recompare(
                RawInput::text("a", "a b c"),
                RawInput::text("b", "a x c"),
                &FilterConfig::default(),
            )
            .await
            .unwrap();
        assert_eq!(res.pair, "a vs b");
        assert_eq!(res.lexical_score, 66.67);
        assert_eq!(f.embedder.calls.lock().len(), 1);
        assert_eq!(f.detector.calls.lock().len(), 2);
    }

    #[tokio::test]
    async fn recompare_rejects_empty_text() {
        let f = fixture();
        let config = FilterConfig::default().with_rules(vec![Rule::Apa]);

        let err = f
            .batch
            .recompare(RawInput::text("a", "  "), RawInput::text("b", "text"), &config)
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = f
            .batch
            .recompare(RawInput::text("a", "References only"), RawInput::text("b", "text"), &config)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(f.embedder.calls.lock().is_empty());
    }
}
