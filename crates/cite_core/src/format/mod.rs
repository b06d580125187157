use crate::domain::{Citation, CitationStyle, FormattedCitation};

fn sentence(text: &str) -> &str {
    text.trim().trim_end_matches('.').trim_end()
}

/// Render a citation as an inline marker plus a bibliography entry.
///
/// Pure; never fails. Records without an organization are attributed to their domain.
pub fn format_citation(citation: &Citation, style: CitationStyle) -> FormattedCitation {
    let source = citation.source_label();
    let year = citation.year();
    let title = sentence(&citation.title);
    let finding = sentence(&citation.key_finding);
    let url = citation.url.trim();

    match style {
        CitationStyle::Business => FormattedCitation {
            inline: format!("[{}]", citation.id),
            bibliography: format!(
                "[{}] {title}. {source} ({year}). {finding}. Available: {url}",
                citation.id
            ),
        },
        CitationStyle::Apa => FormattedCitation {
            inline: format!("({source}, {year})"),
            bibliography: format!("{source} ({year}). {title}. Retrieved from {url}"),
        },
        CitationStyle::Default => FormattedCitation {
            inline: format!("[{}]", citation.id),
            bibliography: format!(
                "[{}] {title}. {source} ({year}). {finding}. {url}",
                citation.id
            ),
        },
    }
}
