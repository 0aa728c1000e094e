//! Client-side filter/sort pipeline
//!
//! Pure and deterministic: the same collection and filters always produce the
//! same output, and the input slice is never reordered. Stages run in a fixed
//! order: tab projection (which may reorder), then category, then search.

use std::cmp::{Ordering, Reverse};

use crate::models::{CategoryFilter, Recommendation, Tab};

/// Parameters of one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub tab: Tab,
    pub category: CategoryFilter,
    pub search_term: String,
}

/// Runs the full pipeline over `recommendations`
pub fn filter_recommendations<'a>(
    recommendations: &'a [Recommendation],
    filters: &Filters,
) -> Vec<&'a Recommendation> {
    let needle = filters.search_term.to_lowercase();

    project_tab(recommendations, filters.tab)
        .into_iter()
        .filter(|rec| filters.category.matches(&rec.category))
        .filter(|rec| rec.matches_search(&needle))
        .collect()
}

/// Tab stage: selects (`trending`) or stably reorders (`recent`, `top`) a copy
pub fn project_tab(recommendations: &[Recommendation], tab: Tab) -> Vec<&Recommendation> {
    match tab {
        Tab::All => recommendations.iter().collect(),
        Tab::Trending => recommendations.iter().filter(|rec| rec.trending).collect(),
        Tab::Recent => {
            let mut projected: Vec<&Recommendation> = recommendations.iter().collect();
            // Unparseable timestamps are `None`, which sorts below every instant
            projected.sort_by_cached_key(|rec| Reverse(rec.created_at()));
            projected
        }
        Tab::Top => {
            let mut projected: Vec<&Recommendation> = recommendations.iter().collect();
            projected.sort_by(|a, b| by_rating_desc(a.rating, b.rating));
            projected
        }
    }
}

/// Descending rating order with NaN last, so the comparator stays total
fn by_rating_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}
