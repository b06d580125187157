//! Inline citation placement and bibliography assembly.
//!
//! Placement is planned against the original content in one pass and applied in a single
//! right-to-left splice. Markers that land on the same offset keep selection order, which
//! is what re-scanning the progressively edited text would produce.

use cite_core::domain::{Citation, CitationStyle};
use cite_core::format::format_citation;
use serde::{Deserialize, Serialize};

pub const BIBLIOGRAPHY_HEADER: &str = "## References";

/// Characters of `keyFinding` used to locate a citation's supporting sentence.
pub const NEEDLE_CHARS: usize = 30;

/// Citations this early in the selection get a paragraph-end marker when no sentence matches.
pub const FALLBACK_SLOTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insertion {
    pub offset: usize,
    pub citation_id: String,
    pub marker: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedContent {
    pub content: String,
    pub bibliography: String,
    pub placed: Vec<String>,
    pub unplaced: Vec<String>,
}

fn chars_eq_ci(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Case-insensitive search returning the byte range of the first match.
///
/// Compares char by char so offsets always fall on UTF-8 boundaries of `haystack`, even
/// for characters whose lowercase form has a different byte length.
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    'outer: for (start, _) in haystack.char_indices() {
        let mut rest = haystack[start..].char_indices();
        let mut end = start;
        for n in needle.chars() {
            match rest.next() {
                Some((i, h)) if chars_eq_ci(h, n) => end = start + i + h.len_utf8(),
                _ => continue 'outer,
            }
        }
        return Some((start, end));
    }
    None
}

fn needle_for(citation: &Citation) -> String {
    let head: String = citation.key_finding.trim().chars().take(NEEDLE_CHARS).collect();
    head.trim_end().to_string()
}

/// Offset just past the last non-whitespace character before `pos`.
fn before_trailing_whitespace(content: &str, pos: usize) -> usize {
    content[..pos].trim_end().len()
}

fn first_paragraph_end(content: &str) -> usize {
    let pos = content.find("\n\n").unwrap_or(content.len());
    before_trailing_whitespace(content, pos)
}

/// Decide where each selected citation's inline marker goes.
///
/// 1. The first `NEEDLE_CHARS` characters of the key finding are searched for
///    case-insensitively; on a hit the marker goes right before the next `.` after the
///    match (or at the end of the content when no period follows).
/// 2. Otherwise the first `FALLBACK_SLOTS` citations of the selection go to the end of
///    the first paragraph; later ones get no inline marker.
pub fn plan_insertions(
    content: &str,
    selected: &[&Citation],
    style: CitationStyle,
) -> Vec<Insertion> {
    let mut plan = Vec::new();
    for (idx, citation) in selected.iter().enumerate() {
        let marker = format_citation(citation, style).inline;
        let needle = needle_for(citation);

        let offset = match find_case_insensitive(content, &needle) {
            Some((_, match_end)) => content[match_end..]
                .find('.')
                .map(|i| match_end + i)
                .unwrap_or_else(|| before_trailing_whitespace(content, content.len())),
            None if idx < FALLBACK_SLOTS => first_paragraph_end(content),
            None => continue,
        };

        plan.push(Insertion {
            offset,
            citation_id: citation.id.clone(),
            marker,
        });
    }
    plan
}

/// Splice planned markers into `content`, each preceded by a space.
pub fn apply_insertions(content: &str, plan: &[Insertion]) -> String {
    let mut ordered: Vec<(usize, &Insertion)> = plan.iter().enumerate().collect();
    ordered.sort_by(|a, b| a.1.offset.cmp(&b.1.offset).then(a.0.cmp(&b.0)));

    let extra: usize = plan.iter().map(|i| i.marker.len() + 1).sum();
    let mut out = String::with_capacity(content.len() + extra);
    out.push_str(content);
    // Right to left: earlier offsets stay valid while later ones are filled in.
    for (_, ins) in ordered.iter().rev() {
        out.insert_str(ins.offset, &format!(" {}", ins.marker));
    }
    out
}

/// `## References` followed by one entry per citation in selection order, each
/// followed by a blank line. With no citations only the header is emitted.
pub fn build_bibliography(selected: &[&Citation], style: CitationStyle) -> String {
    let mut out = String::new();
    out.push_str(BIBLIOGRAPHY_HEADER);
    out.push_str("\n\n");
    for citation in selected {
        out.push_str(&format_citation(citation, style).bibliography);
        out.push_str("\n\n");
    }
    out
}

/// Merge a selected citation set into prose and build its bibliography.
///
/// Never fails. An empty selection returns `content` unchanged.
pub fn enrich(content: &str, selected: &[&Citation], style: CitationStyle) -> EnrichedContent {
    let plan = plan_insertions(content, selected, style);
    let placed: Vec<String> = plan.iter().map(|i| i.citation_id.clone()).collect();
    let unplaced = selected
        .iter()
        .filter(|c| !placed.contains(&c.id))
        .map(|c| c.id.clone())
        .collect();

    EnrichedContent {
        content: apply_insertions(content, &plan),
        bibliography: build_bibliography(selected, style),
        placed,
        unplaced,
    }
}
