// docmatch/src/workers/mod.rs
//
// Process-wide collaborators the batch consumes.
//
// Providers are created once in main, wrapped in Arc and injected into
// BatchComparator. From the batch's point of view they are stateless, so
// they are shared freely across concurrent batches.

pub mod detect;
pub mod embed;
pub mod pool;
pub mod stem;

use tracing::info;

use crate::error::ProviderError;
use crate::model::AiVerdict;

/// Text → dense vector. One call per batch with every surviving document.
pub trait EmbeddingProvider: Send + Sync {
    /// Output order matches input order, one vector per text.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

/// Text → AI-authorship verdict.
pub trait AiDetector: Send + Sync {
    fn detect(&self, text: &str) -> Result<AiVerdict, ProviderError>;
}

/// Optional features, probed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub pdf:        bool,
    pub docx:       bool,
    pub zip:        bool,
    pub rar:        bool,
    pub lemmatizer: bool,
}

impl Capabilities {
    pub fn probe(lemmatizer: bool) -> Self {
        let archive = cfg!(feature = "archive");
        Self { pdf: true, docx: archive, zip: archive, rar: false, lemmatizer }
    }

    pub fn log(&self) {
        info!(
            "capabilities pdf={} docx={} zip={} rar={} lemmatizer={}",
            self.pdf, self.docx, self.zip, self.rar, self.lemmatizer
        );
    }
}
