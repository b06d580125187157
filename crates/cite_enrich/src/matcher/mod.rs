use cite_core::domain::Citation;

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn mentions_keyword(citation: &Citation, keyword: &str) -> bool {
    contains_ci(&citation.title, keyword)
        || contains_ci(&citation.key_finding, keyword)
        || citation
            .industry_focus
            .iter()
            .any(|tag| contains_ci(tag, keyword))
}

/// Narrow the corpus to citations plausibly relevant to a query.
///
/// A citation matches when any keyword is a case-insensitive substring of its title, key
/// finding, or one of its industry tags. A non-blank `industry` additionally requires an
/// industry tag containing it. Blank keywords are ignored; with no usable keyword nothing
/// matches. Output keeps corpus order.
pub fn filter<'a>(
    corpus: &'a [Citation],
    keywords: &[String],
    industry: Option<&str>,
) -> Vec<&'a Citation> {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return Vec::new();
    }

    let industry = industry
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty());

    corpus
        .iter()
        .filter(|c| keywords.iter().any(|k| mentions_keyword(c, k)))
        .filter(|c| match industry.as_deref() {
            None => true,
            Some(ind) => c.industry_focus.iter().any(|tag| contains_ci(tag, ind)),
        })
        .collect()
}
