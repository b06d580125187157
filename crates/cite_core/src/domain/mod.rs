use serde::{Deserialize, Serialize};
use time::Date;

/// Source reliability rating carried by every citation record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Ordinal used for ranking and credibility scoring.
    pub fn ordinal(self) -> u8 {
        match self {
            Confidence::High => 3,
            Confidence::Medium => 2,
            Confidence::Low => 1,
        }
    }

    /// Case-insensitive parse; unknown labels yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Confidence::High),
            "medium" => Some(Confidence::Medium),
            "low" => Some(Confidence::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

/// A validated, immutable citation record.
///
/// Notes:
/// - `published_on` is the calendar date normalized from the record's `publishedAt`.
/// - `industry_focus` is empty when the source record omits it.
/// - Instances only come out of corpus loading; nothing mutates them afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub published_on: Date,
    pub organization: Option<String>,
    pub key_finding: String,
    pub industry_focus: Vec<String>,
    pub confidence: Confidence,
}

impl Citation {
    /// Organization name, or the domain when the record has none.
    pub fn source_label(&self) -> &str {
        self.organization
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .unwrap_or(self.domain.as_str())
    }

    pub fn year(&self) -> i32 {
        self.published_on.year()
    }
}

/// Rendering style for inline markers and bibliography entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum CitationStyle {
    #[default]
    Business,
    Apa,
    Default,
}

impl CitationStyle {
    /// Unrecognized names fall back to `Default`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "business" => CitationStyle::Business,
            "apa" => CitationStyle::Apa,
            _ => CitationStyle::Default,
        }
    }
}

impl From<String> for CitationStyle {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormattedCitation {
    pub inline: String,
    pub bibliography: String,
}

/// Aggregate quality signal over one selected citation set. All scores are 0..=100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub total_citations: u32,
    pub credibility_score: u32,
    pub recency_score: u32,
    pub diversity_score: u32,
    pub unique_sources: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
