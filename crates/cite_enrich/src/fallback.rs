use cite_core::domain::ValidationWarning;
use cite_core::store::CitationStore;
use tracing::warn;

use crate::pipeline::{enrich_with_citations, EnrichRequest, EnrichResponse};

/// Enrich when the corpus is available; otherwise hand the content back untouched.
///
/// Citations are an enhancement. A corpus that cannot be loaded is logged and reported as
/// a `CITATIONS_UNAVAILABLE` warning so document generation can still succeed.
pub fn enrich_or_passthrough(store: &CitationStore, request: &EnrichRequest) -> EnrichResponse {
    match store.corpus() {
        Ok(corpus) => enrich_with_citations(&corpus, request),
        Err(e) => {
            warn!(
                code = %e.code,
                source = %store.source().describe(),
                "citation corpus unavailable; generating without citations"
            );
            let reason = ValidationWarning::new(
                "CITATIONS_UNAVAILABLE",
                "Citation corpus could not be loaded; output has no citations",
            )
            .with_details(format!(
                "code={}; details={}",
                e.code,
                e.details.as_deref().unwrap_or("")
            ));
            EnrichResponse::passthrough(&request.content, reason)
        }
    }
}
