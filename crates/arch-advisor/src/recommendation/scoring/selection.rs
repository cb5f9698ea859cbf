use std::cmp::Ordering;

use super::super::domain::CategoryKind;
use super::ScoredCandidate;

/// Highest total first, then cheapest, then earliest in the catalog.
pub(crate) fn rank_order(left: &ScoredCandidate<'_>, right: &ScoredCandidate<'_>) -> Ordering {
    right
        .total
        .total_cmp(&left.total)
        .then_with(|| left.monthly_cost.total_cmp(&right.monthly_cost))
        .then_with(|| left.service.ordinal.cmp(&right.service.ordinal))
}

/// Number of leading candidates a ranked list contributes to the architecture.
pub(crate) fn selection_count(kind: CategoryKind, ranked: &[ScoredCandidate<'_>]) -> usize {
    if ranked.is_empty() {
        return 0;
    }

    match kind {
        CategoryKind::SingleSelect => 1,
        CategoryKind::MultiSelect { max, threshold } => {
            let above = ranked
                .iter()
                .take(usize::from(max))
                .take_while(|candidate| candidate.total >= threshold)
                .count();
            above.max(1)
        }
    }
}
