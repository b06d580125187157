use cite_core::demo::builtin_corpus;
use cite_enrich::pipeline::{enrich_with_citations_at, EnrichOptions, EnrichRequest};
use pretty_assertions::assert_eq;
use time::macros::datetime;

const ONE_PAGER: &str = "Our platform helps teams adopt AI responsibly. AI adoption jumped to 72 percent of organizations surveyed last year, so demand is real.\n\nSeventy percent of CEOs expect generative AI to reshape value creation.\n\nPricing is usage based.";

#[test]
fn saas_ai_one_pager_gets_ranked_inline_citations() {
    let corpus = builtin_corpus().expect("corpus");
    let req = EnrichRequest {
        content: ONE_PAGER.to_string(),
        keywords: vec!["ai".to_string()],
        options: EnrichOptions {
            industry: Some("saas".to_string()),
            ..EnrichOptions::default()
        },
    };
    let res = enrich_with_citations_at(&corpus, &req, datetime!(2024-12-31 0:00 UTC));

    assert_eq!(
        res.sources,
        vec!["Forrester", "McKinsey & Company", "PwC", "openviewpartners.com"]
    );
    assert_eq!(res.citation_count, 4);
    assert_eq!(res.unplaced, vec!["OPENVIEW-PLG-2023".to_string()]);

    let (body, bibliography) = res
        .content
        .split_once("\n\n## References\n\n")
        .expect("bibliography block");
    assert_eq!(
        body,
        "Our platform helps teams adopt AI responsibly. AI adoption jumped to 72 percent of organizations surveyed last year, so demand is real [MCK-AI-2024]. [FORR-CX-2024]\n\nSeventy percent of CEOs expect generative AI to reshape value creation [PWC-CEO-2024].\n\nPricing is usage based."
    );

    let entry_ids: Vec<&str> = bibliography
        .split("\n\n")
        .filter(|e| !e.is_empty())
        .filter_map(|e| e.strip_prefix('[').and_then(|rest| rest.split(']').next()))
        .collect();
    assert_eq!(
        entry_ids,
        vec!["FORR-CX-2024", "MCK-AI-2024", "PWC-CEO-2024", "OPENVIEW-PLG-2023"]
    );

    assert_eq!(res.metrics.credibility_score, 83);
    assert_eq!(res.metrics.diversity_score, 100);
    assert_eq!(res.metrics.unique_sources, 4);
    assert!(
        (70..=85).contains(&res.metrics.recency_score),
        "recency {}",
        res.metrics.recency_score
    );
    assert!(res.quality_warnings.is_empty(), "{:?}", res.quality_warnings);
}

#[test]
fn business_entries_expose_identifying_fields() {
    let corpus = builtin_corpus().expect("corpus");
    let req = EnrichRequest {
        content: "Cloud budgets keep growing.".to_string(),
        keywords: vec!["cloud".to_string()],
        options: EnrichOptions::default(),
    };
    let res = enrich_with_citations_at(&corpus, &req, datetime!(2025-01-15 0:00 UTC));
    let c = corpus.get("GART-CLOUD-2024").expect("record");
    assert_eq!(res.sources, vec!["Gartner"]);
    for part in [
        c.id.as_str(),
        c.title.as_str(),
        "Gartner",
        "2024",
        c.url.as_str(),
    ] {
        assert!(res.content.contains(part), "missing {part}");
    }
}

#[test]
fn stale_single_source_selection_is_flagged() {
    let corpus = builtin_corpus().expect("corpus");
    let req = EnrichRequest {
        content: "Launch readiness matters.".to_string(),
        keywords: vec!["launch".to_string()],
        options: EnrichOptions::default(),
    };
    // Years after publication the recency score bottoms out.
    let res = enrich_with_citations_at(&corpus, &req, datetime!(2030-01-01 0:00 UTC));
    assert_eq!(res.citation_count, 1);
    let codes: Vec<&str> = res.quality_warnings.iter().map(|w| w.code.as_str()).collect();
    assert_eq!(codes, vec!["QUALITY_STALE_SOURCES"]);
}
