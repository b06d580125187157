use std::borrow::Borrow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, Time};

use crate::domain::{Citation, QualityMetrics, ValidationWarning};

const CREDIBILITY_SCALE: f64 = 33.33;
const SECONDS_PER_MONTH: f64 = 30.0 * 86_400.0;
const RECENCY_DECAY_PER_MONTH: f64 = 2.0;

fn iter_citations<C: Borrow<Citation>>(citations: &[C]) -> impl Iterator<Item = &Citation> {
    citations.iter().map(|c| c.borrow())
}

fn clamp_score(v: f64) -> u32 {
    v.round().clamp(0.0, 100.0) as u32
}

/// Average confidence ordinal scaled to 0..=100. Empty set scores 0.
pub fn credibility_score<C: Borrow<Citation>>(citations: &[C]) -> u32 {
    if citations.is_empty() {
        return 0;
    }
    let sum: u32 = iter_citations(citations)
        .map(|c| u32::from(c.confidence.ordinal()))
        .sum();
    let avg = f64::from(sum) / citations.len() as f64;
    clamp_score(avg * CREDIBILITY_SCALE)
}

/// Elapsed 30-day months from the start of the publication day (UTC) to `now`.
pub fn months_old(citation: &Citation, now: OffsetDateTime) -> f64 {
    let published = citation.published_on.with_time(Time::MIDNIGHT).assume_utc();
    (now - published).as_seconds_f64() / SECONDS_PER_MONTH
}

/// Average of `100 - 2 * monthsOld` per citation, each clamped to 0..=100.
pub fn recency_score<C: Borrow<Citation>>(citations: &[C], now: OffsetDateTime) -> u32 {
    if citations.is_empty() {
        return 0;
    }
    let total: f64 = iter_citations(citations)
        .map(|c| (100.0 - months_old(c, now) * RECENCY_DECAY_PER_MONTH).clamp(0.0, 100.0))
        .sum();
    clamp_score(total / citations.len() as f64)
}

/// Number of distinct source domains (case-insensitive).
pub fn unique_domains<C: Borrow<Citation>>(citations: &[C]) -> usize {
    iter_citations(citations)
        .map(|c| c.domain.trim().to_ascii_lowercase())
        .collect::<HashSet<_>>()
        .len()
}

pub fn diversity_score<C: Borrow<Citation>>(citations: &[C]) -> u32 {
    if citations.is_empty() {
        return 0;
    }
    let ratio = unique_domains(citations) as f64 / citations.len() as f64;
    clamp_score((ratio * 100.0).min(100.0))
}

/// Score a selection against the current UTC time.
pub fn score<C: Borrow<Citation>>(citations: &[C]) -> QualityMetrics {
    score_at(citations, OffsetDateTime::now_utc())
}

/// Score a selection as of `now`. The four sub-scores are independent of each other.
pub fn score_at<C: Borrow<Citation>>(citations: &[C], now: OffsetDateTime) -> QualityMetrics {
    if citations.is_empty() {
        return QualityMetrics::default();
    }
    QualityMetrics {
        total_citations: citations.len() as u32,
        credibility_score: credibility_score(citations),
        recency_score: recency_score(citations, now),
        diversity_score: diversity_score(citations),
        unique_sources: unique_domains(citations) as u32,
    }
}

/// Minimums below which generated output is flagged as low-confidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityThresholds {
    pub min_citations: u32,
    pub min_credibility: u32,
    pub min_recency: u32,
    pub min_diversity: u32,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_citations: 1,
            min_credibility: 60,
            min_recency: 40,
            min_diversity: 50,
        }
    }
}

/// Compare metrics against thresholds. An empty result means the output passes.
///
/// Score checks are skipped when there are no citations; the citation-count warning
/// already covers that case.
pub fn assess_quality(
    metrics: &QualityMetrics,
    thresholds: &QualityThresholds,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if metrics.total_citations < thresholds.min_citations {
        warnings.push(
            ValidationWarning::new("QUALITY_TOO_FEW_CITATIONS", "Too few supporting citations")
                .with_details(format!(
                    "found={}; required={}",
                    metrics.total_citations, thresholds.min_citations
                )),
        );
    }
    if metrics.total_citations == 0 {
        return warnings;
    }

    for (code, message, value, min) in [
        (
            "QUALITY_LOW_CREDIBILITY",
            "Citation credibility below threshold",
            metrics.credibility_score,
            thresholds.min_credibility,
        ),
        (
            "QUALITY_STALE_SOURCES",
            "Citations are older than the recency threshold allows",
            metrics.recency_score,
            thresholds.min_recency,
        ),
        (
            "QUALITY_LOW_DIVERSITY",
            "Too many citations come from the same source",
            metrics.diversity_score,
            thresholds.min_diversity,
        ),
    ] {
        if value < min {
            warnings.push(
                ValidationWarning::new(code, message)
                    .with_details(format!("score={value}; minimum={min}")),
            );
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Confidence;
    use time::macros::{date, datetime};

    fn cite(id: &str, domain: &str, confidence: Confidence, published_on: time::Date) -> Citation {
        Citation {
            id: id.to_string(),
            title: format!("Title {id}"),
            url: format!("https://{domain}/{id}"),
            domain: domain.to_string(),
            published_on,
            organization: None,
            key_finding: "finding".to_string(),
            industry_focus: Vec::new(),
            confidence,
        }
    }

    #[test]
    fn credibility_rounds_the_scaled_average() {
        let set = vec![
            cite("a", "a.com", Confidence::High, date!(2024 - 01 - 01)),
            cite("b", "b.com", Confidence::Medium, date!(2024 - 01 - 01)),
        ];
        // avg 2.5 * 33.33 = 83.325
        assert_eq!(credibility_score(&set), 83);
        assert_eq!(
            credibility_score(&[cite("c", "c.com", Confidence::Low, date!(2024 - 01 - 01))]),
            33
        );
    }

    #[test]
    fn recency_decays_two_points_per_thirty_days() {
        let now = datetime!(2024-03-01 0:00 UTC);
        // 2024-01-01 -> 2024-03-01 is 60 days = 2 months -> 96.
        let set = vec![cite("a", "a.com", Confidence::High, date!(2024 - 01 - 01))];
        assert_eq!(recency_score(&set, now), 96);

        let ancient = vec![cite("b", "b.com", Confidence::High, date!(2010 - 01 - 01))];
        assert_eq!(recency_score(&ancient, now), 0);

        let future = vec![cite("c", "c.com", Confidence::High, date!(2025 - 01 - 01))];
        assert_eq!(recency_score(&future, now), 100);
    }

    #[test]
    fn diversity_counts_domains_case_insensitively() {
        let set = vec![
            cite("a", "Gartner.com", Confidence::High, date!(2024 - 01 - 01)),
            cite("b", "gartner.com", Confidence::High, date!(2024 - 01 - 01)),
            cite("c", "idc.com", Confidence::High, date!(2024 - 01 - 01)),
            cite("d", "forrester.com", Confidence::High, date!(2024 - 01 - 01)),
        ];
        assert_eq!(unique_domains(&set), 3);
        assert_eq!(diversity_score(&set), 75);
    }

    #[test]
    fn gate_reports_each_failing_dimension() {
        let metrics = QualityMetrics {
            total_citations: 2,
            credibility_score: 33,
            recency_score: 10,
            diversity_score: 50,
            unique_sources: 1,
        };
        let codes: Vec<String> = assess_quality(&metrics, &QualityThresholds::default())
            .into_iter()
            .map(|w| w.code)
            .collect();
        assert_eq!(codes, vec!["QUALITY_LOW_CREDIBILITY", "QUALITY_STALE_SOURCES"]);
    }

    #[test]
    fn gate_on_empty_metrics_only_flags_the_count() {
        let warnings = assess_quality(&QualityMetrics::default(), &QualityThresholds::default());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "QUALITY_TOO_FEW_CITATIONS");
    }
}
