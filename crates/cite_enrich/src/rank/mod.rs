use std::cmp::Ordering;

use cite_core::domain::Citation;

fn quality_order(a: &Citation, b: &Citation) -> Ordering {
    b.confidence
        .ordinal()
        .cmp(&a.confidence.ordinal())
        .then_with(|| b.published_on.cmp(&a.published_on))
}

/// Order candidates by confidence (High first), then publication date (newest first);
/// remaining ties keep their input order.
///
/// Size policy: `max(min_count, pool)` items are taken from the ranked list, so a pool
/// larger than `min_count` is returned whole and a smaller pool is never padded.
pub fn rank_and_select<'a>(candidates: &[&'a Citation], min_count: usize) -> Vec<&'a Citation> {
    let mut ranked: Vec<&Citation> = candidates.to_vec();
    ranked.sort_by(|a, b| quality_order(a, b));
    let take = min_count.max(ranked.len());
    ranked.truncate(take);
    ranked
}

/// Apply an explicit upper bound after ranking. `None` leaves the selection untouched.
pub fn cap_selection<'a>(selection: Vec<&'a Citation>, max: Option<usize>) -> Vec<&'a Citation> {
    match max {
        Some(max) => selection.into_iter().take(max).collect(),
        None => selection,
    }
}
