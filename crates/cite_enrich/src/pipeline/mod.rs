use cite_core::corpus::Corpus;
use cite_core::domain::{CitationStyle, QualityMetrics, ValidationWarning};
use cite_core::metrics::{assess_quality, score_at, QualityThresholds};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use crate::enrich::enrich;
use crate::matcher::filter;
use crate::rank::{cap_selection, rank_and_select};

pub const DEFAULT_MIN_CITATIONS: usize = 3;

/// Per-request knobs for citation enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrichOptions {
    /// Lower bound on the selection; larger candidate pools are returned whole.
    pub min_citations: usize,
    pub style: CitationStyle,
    /// Optional industry tag; blank means no industry filtering.
    pub industry: Option<String>,
    /// Optional hard cap applied after ranking.
    pub max_citations: Option<usize>,
    pub thresholds: QualityThresholds,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            min_citations: DEFAULT_MIN_CITATIONS,
            style: CitationStyle::Business,
            industry: None,
            max_citations: None,
            thresholds: QualityThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrichRequest {
    pub content: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub options: EnrichOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichResponse {
    /// Original content with inline markers, followed by the bibliography block.
    pub content: String,
    pub citation_count: usize,
    /// Organization (or domain) of each selected citation, in selection order.
    pub sources: Vec<String>,
    pub metrics: QualityMetrics,
    pub quality_warnings: Vec<ValidationWarning>,
    /// Selected citations that appear only in the bibliography.
    pub unplaced: Vec<String>,
}

impl EnrichResponse {
    /// Content returned as-is with no citation data, carrying the reason as a warning.
    pub fn passthrough(content: &str, reason: ValidationWarning) -> Self {
        Self {
            content: content.to_string(),
            citation_count: 0,
            sources: Vec::new(),
            metrics: QualityMetrics::default(),
            quality_warnings: vec![reason],
            unplaced: Vec::new(),
        }
    }
}

/// Run the full enrichment pipeline against the current UTC time.
pub fn enrich_with_citations(corpus: &Corpus, request: &EnrichRequest) -> EnrichResponse {
    enrich_with_citations_at(corpus, request, OffsetDateTime::now_utc())
}

/// filter → rank/select → place markers + bibliography → score → quality gate.
///
/// Unmatched queries are not errors: they yield zero citations and a header-only
/// bibliography appended to the content.
pub fn enrich_with_citations_at(
    corpus: &Corpus,
    request: &EnrichRequest,
    now: OffsetDateTime,
) -> EnrichResponse {
    let opts = &request.options;

    let candidates = filter(corpus.all(), &request.keywords, opts.industry.as_deref());
    let ranked = rank_and_select(&candidates, opts.min_citations);
    let selected = cap_selection(ranked, opts.max_citations);

    debug!(
        corpus = corpus.len(),
        candidates = candidates.len(),
        selected = selected.len(),
        min_citations = opts.min_citations,
        "citation selection complete"
    );

    let enriched = enrich(&request.content, &selected, opts.style);
    let metrics = score_at(&selected, now);
    let quality_warnings = assess_quality(&metrics, &opts.thresholds);

    EnrichResponse {
        content: format!("{}\n\n{}", enriched.content, enriched.bibliography),
        citation_count: selected.len(),
        sources: selected
            .iter()
            .map(|c| c.source_label().to_string())
            .collect(),
        metrics,
        quality_warnings,
        unplaced: enriched.unplaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cite_core::domain::{Citation, Confidence};
    use time::macros::{date, datetime};

    fn in_memory_corpus() -> Corpus {
        let cite = |id: &str, domain: &str, confidence| Citation {
            id: id.to_string(),
            title: format!("Churn study {id}"),
            url: format!("https://{domain}/{id}"),
            domain: domain.to_string(),
            published_on: date!(2024 - 04 - 01),
            organization: None,
            key_finding: format!("Churn drops with onboarding {id}"),
            industry_focus: vec!["saas".to_string()],
            confidence,
        };
        Corpus::from_citations(vec![
            cite("A", "one.example", Confidence::Low),
            cite("B", "one.example", Confidence::Low),
        ])
    }

    #[test]
    fn weak_selection_is_flagged_but_still_returned() {
        let req = EnrichRequest {
            content: "Churn matters.".to_string(),
            keywords: vec!["churn".to_string()],
            options: EnrichOptions::default(),
        };
        let res = enrich_with_citations_at(&in_memory_corpus(), &req, datetime!(2024-05-01 0:00 UTC));
        assert_eq!(res.citation_count, 2);
        assert_eq!(res.metrics.credibility_score, 33);
        assert_eq!(res.metrics.diversity_score, 50);
        let codes: Vec<&str> = res.quality_warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec!["QUALITY_LOW_CREDIBILITY"]);
        assert!(res.content.starts_with("Churn matters. [A] [B]\n\n## References"));
    }

    #[test]
    fn request_accepts_the_loose_call_contract() {
        let req: EnrichRequest = serde_json::from_str(
            r#"{"content":"Body.","keywords":["ai"],"industry":"saas","minCitations":1,"style":"apa"}"#,
        )
        .expect("decode");
        assert_eq!(req.options.min_citations, 1);
        assert_eq!(req.options.style, CitationStyle::Apa);
        assert_eq!(req.options.industry.as_deref(), Some("saas"));
        assert_eq!(req.options.max_citations, None);
    }

    #[test]
    fn omitted_options_use_defaults_and_unknown_style_falls_back() {
        let req: EnrichRequest =
            serde_json::from_str(r#"{"content":"Body.","style":"chicago"}"#).expect("decode");
        assert!(req.keywords.is_empty());
        assert_eq!(req.options.min_citations, DEFAULT_MIN_CITATIONS);
        assert_eq!(req.options.style, CitationStyle::Default);
        assert_eq!(req.options.thresholds, QualityThresholds::default());
    }
}
