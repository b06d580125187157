use crate::corpus::{load, Corpus, CorpusSource};
use crate::error::AppError;

/// Business citation set shipped with the crate, used when no corpus path is configured.
pub const BUILTIN_CORPUS_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../fixtures/corpus/business_citations.json"
));

pub fn builtin_corpus() -> Result<Corpus, AppError> {
    load(&CorpusSource::Builtin)
}
