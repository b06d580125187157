use serde::{Deserialize, Serialize};

use crate::domain::{Citation, Confidence, ValidationWarning};
use crate::normalize::dates::normalize_published_at;

/// Citation record exactly as it appears in a corpus file.
///
/// Every field is optional at this layer so a single incomplete record surfaces as a
/// validation warning instead of failing the whole corpus decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CitationRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub domain: Option<String>,
    pub published_at: Option<String>,
    pub organization: Option<String>,
    pub key_finding: Option<String>,
    pub industry_focus: Option<Vec<String>>,
    pub confidence: Option<String>,
}

fn required(
    ordinal: usize,
    field: &str,
    value: Option<String>,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<String> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => Some(v),
        None => {
            warnings.push(
                ValidationWarning::new(
                    "CORPUS_RECORD_MISSING_FIELD",
                    format!("Citation record is missing required field {field}"),
                )
                .with_details(format!("record={ordinal}")),
            );
            None
        }
    }
}

/// Validate one raw record into a `Citation`.
///
/// All problems with the record are collected before deciding, so a record with
/// several defects reports each of them. Returns `None` when the record must be skipped.
pub fn validate_record(
    ordinal: usize,
    record: CitationRecord,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<Citation> {
    let before = warnings.len();

    let id = required(ordinal, "id", record.id, warnings);
    let title = required(ordinal, "title", record.title, warnings);
    let url = required(ordinal, "url", record.url, warnings);
    let domain = required(ordinal, "domain", record.domain, warnings);
    let key_finding = required(ordinal, "keyFinding", record.key_finding, warnings);
    let published_raw = required(ordinal, "publishedAt", record.published_at, warnings);
    let confidence_raw = required(ordinal, "confidence", record.confidence, warnings);

    let published_on = published_raw
        .as_deref()
        .and_then(|raw| normalize_published_at("publishedAt", raw, warnings));

    let confidence = confidence_raw.as_deref().and_then(|raw| {
        let parsed = Confidence::parse(raw);
        if parsed.is_none() {
            warnings.push(
                ValidationWarning::new(
                    "CORPUS_RECORD_BAD_CONFIDENCE",
                    "Citation confidence must be High, Medium, or Low",
                )
                .with_details(format!("record={ordinal}; value={raw}")),
            );
        }
        parsed
    });

    // Date normalization does not know which record it is looking at.
    for w in warnings.iter_mut().skip(before) {
        let tagged = match w.details.as_deref() {
            Some(d) if d.contains("record=") => continue,
            Some(d) => format!("record={ordinal}; {d}"),
            None => format!("record={ordinal}"),
        };
        w.details = Some(tagged);
    }

    let (
        Some(id),
        Some(title),
        Some(url),
        Some(domain),
        Some(key_finding),
        Some(published_on),
        Some(confidence),
    ) = (id, title, url, domain, key_finding, published_on, confidence)
    else {
        return None;
    };

    let organization = record
        .organization
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty());

    let industry_focus = record
        .industry_focus
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    Some(Citation {
        id,
        title,
        url,
        domain,
        published_on,
        organization,
        key_finding,
        industry_focus,
        confidence,
    })
}
