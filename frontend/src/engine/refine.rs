use std::cmp::Ordering;

use crate::api::types::Session;
use crate::state::filters::{FilterState, SortKey, SortOrder};

/// Re-applies the fast filters and the sort to whatever has been accumulated
/// so far, so edits narrow already-loaded rows without waiting for the
/// server round trip. Pure and stateless.
///
/// Team is deliberately not re-applied here: sessions carry no team field,
/// so team filtering is exclusively server-side and the parameter is passed
/// through untouched.
pub fn derive(sessions: &[Session], filters: &FilterState) -> Vec<Session> {
    let needle = filters.search.trim().to_lowercase();

    let mut rows: Vec<Session> = sessions
        .iter()
        .filter(|session| matches(session, filters, &needle))
        .cloned()
        .collect();

    // Stable sort: ties keep fetch order for both directions, and desc is
    // exactly the reversed asc comparator.
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, filters.sort_by);
        match filters.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    rows
}

fn matches(session: &Session, filters: &FilterState, needle: &str) -> bool {
    if !needle.is_empty() && !session.title.to_lowercase().contains(needle) {
        return false;
    }
    if session.score < filters.score_min || session.score > filters.score_max {
        return false;
    }
    let created = session.created_at.date_naive();
    if let Some(from) = filters.date_from {
        if created < from {
            return false;
        }
    }
    if let Some(to) = filters.date_to {
        if created > to {
            return false;
        }
    }
    true
}

fn compare(a: &Session, b: &Session, key: SortKey) -> Ordering {
    match key {
        SortKey::Score => a.score.total_cmp(&b.score),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}
