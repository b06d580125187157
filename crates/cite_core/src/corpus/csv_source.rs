use crate::error::AppError;
use crate::validate::CitationRecord;

/// Column layout of a CSV corpus. `industryFocus` holds `;`-separated tags.
pub const CSV_HEADERS: [&str; 9] = [
    "id",
    "title",
    "url",
    "domain",
    "publishedAt",
    "organization",
    "keyFinding",
    "industryFocus",
    "confidence",
];

fn get(row: &csv::StringRecord, headers: &csv::StringRecord, name: &str) -> Option<String> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .and_then(|idx| row.get(idx))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn split_tags(raw: Option<String>) -> Option<Vec<String>> {
    raw.map(|s| {
        s.split(';')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
}

/// Read every data row into a raw record. Rows the CSV reader rejects become `Err`
/// entries so the caller can skip them without losing the rest of the file.
pub(super) fn read_records(
    label: &str,
    text: &str,
) -> Result<Vec<Result<CitationRecord, String>>, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| {
            AppError::new("CORPUS_MALFORMED", "Failed to read citation corpus CSV headers")
                .with_details(format!("source={label}; err={e}"))
        })?
        .clone();

    if !headers.iter().any(|h| h.trim() == "id") {
        return Err(
            AppError::new("CORPUS_MALFORMED", "Citation corpus CSV has no id column")
                .with_details(format!(
                    "source={label}; expected={}",
                    CSV_HEADERS.join(",")
                )),
        );
    }

    let mut out = Vec::new();
    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                out.push(Err(e.to_string()));
                continue;
            }
        };
        out.push(Ok(CitationRecord {
            id: get(&row, &headers, "id"),
            title: get(&row, &headers, "title"),
            url: get(&row, &headers, "url"),
            domain: get(&row, &headers, "domain"),
            published_at: get(&row, &headers, "publishedAt"),
            organization: get(&row, &headers, "organization"),
            key_finding: get(&row, &headers, "keyFinding"),
            industry_focus: split_tags(get(&row, &headers, "industryFocus")),
            confidence: get(&row, &headers, "confidence"),
        }));
    }
    Ok(out)
}
