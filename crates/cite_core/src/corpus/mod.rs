use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::domain::{Citation, ValidationWarning};
use crate::error::AppError;
use crate::validate::{validate_record, CitationRecord};

mod csv_source;

pub use csv_source::CSV_HEADERS;

/// Environment variable naming an on-disk corpus; `.csv` files are read as CSV.
pub const CORPUS_ENV_VAR: &str = "CITEWRIGHT_CORPUS";

/// Where the static citation corpus comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    JsonFile(PathBuf),
    CsvFile(PathBuf),
    JsonText(String),
    /// The business citation set compiled into the crate.
    Builtin,
}

impl CorpusSource {
    /// Pick a file source by extension: `.csv` is CSV, everything else JSON.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv {
            CorpusSource::CsvFile(path)
        } else {
            CorpusSource::JsonFile(path)
        }
    }

    /// `CITEWRIGHT_CORPUS` when set and non-empty, otherwise the built-in corpus.
    pub fn from_env() -> Self {
        match std::env::var(CORPUS_ENV_VAR) {
            Ok(v) if !v.trim().is_empty() => Self::from_path(v.trim()),
            _ => CorpusSource::Builtin,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CorpusSource::JsonFile(p) => format!("json:{}", p.display()),
            CorpusSource::CsvFile(p) => format!("csv:{}", p.display()),
            CorpusSource::JsonText(_) => "json:inline".to_string(),
            CorpusSource::Builtin => "builtin".to_string(),
        }
    }
}

/// Summary of a corpus load, suitable for surfacing to operators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusLoadReport {
    pub source: String,
    pub accepted: usize,
    pub skipped: usize,
    pub fingerprint: String,
    pub warnings: Vec<ValidationWarning>,
}

/// Immutable in-memory citation corpus, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    citations: Vec<Citation>,
    report: CorpusLoadReport,
}

impl Corpus {
    /// Build a corpus directly from validated citations (tests and embedding callers).
    pub fn from_citations(citations: Vec<Citation>) -> Self {
        let ids: Vec<String> = citations.iter().map(|c| c.id.clone()).collect();
        let fingerprint = sha256_hex(ids.join("\n").as_bytes());
        Self {
            report: CorpusLoadReport {
                source: "memory".to_string(),
                accepted: citations.len(),
                skipped: 0,
                fingerprint,
                warnings: Vec::new(),
            },
            citations,
        }
    }

    pub fn all(&self) -> &[Citation] {
        &self.citations
    }

    pub fn get(&self, id: &str) -> Option<&Citation> {
        self.citations.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    pub fn fingerprint(&self) -> &str {
        &self.report.fingerprint
    }

    pub fn report(&self) -> &CorpusLoadReport {
        &self.report
    }
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Validate raw records, dropping (and logging) the ones that cannot be used.
fn assemble(
    source: String,
    fingerprint: String,
    records: Vec<Result<CitationRecord, String>>,
) -> Corpus {
    let mut warnings: Vec<ValidationWarning> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut citations = Vec::new();
    let mut skipped = 0usize;

    for (ordinal, record) in records.into_iter().enumerate() {
        let before = warnings.len();
        let accepted = match record {
            Ok(record) => validate_record(ordinal, record, &mut warnings),
            Err(err) => {
                warnings.push(
                    ValidationWarning::new(
                        "CORPUS_RECORD_DECODE_FAILED",
                        "Citation record could not be decoded",
                    )
                    .with_details(format!("record={ordinal}; err={err}")),
                );
                None
            }
        };

        let accepted = accepted.and_then(|c| {
            if seen.insert(c.id.clone()) {
                Some(c)
            } else {
                warnings.push(
                    ValidationWarning::new(
                        "CORPUS_RECORD_DUPLICATE_ID",
                        "Duplicate citation id; keeping the first occurrence",
                    )
                    .with_details(format!("record={ordinal}; id={}", c.id)),
                );
                None
            }
        });

        for w in &warnings[before..] {
            warn!(
                code = %w.code,
                details = w.details.as_deref().unwrap_or(""),
                "{}",
                w.message
            );
        }

        match accepted {
            Some(c) => citations.push(c),
            None => skipped += 1,
        }
    }

    info!(
        source = %source,
        accepted = citations.len(),
        skipped,
        fingerprint = %fingerprint,
        "citation corpus loaded"
    );

    Corpus {
        report: CorpusLoadReport {
            source,
            accepted: citations.len(),
            skipped,
            fingerprint,
            warnings,
        },
        citations,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonCorpusShape {
    Bare(Vec<serde_json::Value>),
    Wrapped { citations: Vec<serde_json::Value> },
}

fn parse_json(source: String, text: &str) -> Result<Corpus, AppError> {
    let shape: JsonCorpusShape = serde_json::from_str(text).map_err(|e| {
        AppError::new(
            "CORPUS_MALFORMED",
            "Citation corpus must be a JSON array or an object with a citations array",
        )
        .with_details(format!("source={source}; err={e}"))
    })?;
    let values = match shape {
        JsonCorpusShape::Bare(v) => v,
        JsonCorpusShape::Wrapped { citations } => citations,
    };

    let records = values
        .into_iter()
        .map(|v| serde_json::from_value::<CitationRecord>(v).map_err(|e| e.to_string()))
        .collect();

    Ok(assemble(source, sha256_hex(text.as_bytes()), records))
}

/// Parse a JSON corpus held in memory.
pub fn load_json_str(text: &str) -> Result<Corpus, AppError> {
    parse_json("json:inline".to_string(), text)
}

/// Parse a CSV corpus held in memory.
pub fn load_csv_str(text: &str) -> Result<Corpus, AppError> {
    let records = csv_source::read_records("csv:inline", text)?;
    Ok(assemble(
        "csv:inline".to_string(),
        sha256_hex(text.as_bytes()),
        records,
    ))
}

fn read_source_file(path: &Path) -> Result<String, AppError> {
    if !path.exists() {
        return Err(AppError::new("CORPUS_NOT_FOUND", "Citation corpus file not found")
            .with_details(format!("path={}", path.display())));
    }
    fs::read_to_string(path).map_err(|e| {
        AppError::new("CORPUS_READ_FAILED", "Failed to read citation corpus")
            .with_details(format!("path={}; err={}", path.display(), e))
            .with_retryable(true)
    })
}

/// Load the corpus from `source`. Individual bad records are skipped; only a missing
/// or structurally unreadable source is an error.
pub fn load(source: &CorpusSource) -> Result<Corpus, AppError> {
    match source {
        CorpusSource::JsonFile(path) => {
            let text = read_source_file(path)?;
            parse_json(source.describe(), &text)
        }
        CorpusSource::CsvFile(path) => {
            let text = read_source_file(path)?;
            let label = source.describe();
            let records = csv_source::read_records(&label, &text)?;
            Ok(assemble(label, sha256_hex(text.as_bytes()), records))
        }
        CorpusSource::JsonText(text) => parse_json(source.describe(), text),
        CorpusSource::Builtin => parse_json(source.describe(), crate::demo::BUILTIN_CORPUS_JSON),
    }
}
