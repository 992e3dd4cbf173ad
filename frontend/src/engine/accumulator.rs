use crate::api::types::{Session, SessionPage};

/// Identifies one outstanding page fetch. The epoch pins the request to the
/// filter state it was issued under; a response whose epoch no longer
/// matches is discarded instead of appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub epoch: u64,
    pub page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended { loaded: usize },
    Stale,
}

/// Accumulates successively fetched server pages into one ordered collection.
///
/// Pure state machine: the owner issues the network calls and feeds results
/// back through [`complete`](PageAccumulator::complete) /
/// [`fail`](PageAccumulator::fail). Page N+1 can only be requested after
/// page N has been appended, because `begin_fetch` refuses to overlap
/// in-flight requests.
#[derive(Debug, Clone, PartialEq)]
pub struct PageAccumulator {
    epoch: u64,
    sessions: Vec<Session>,
    total: Option<usize>,
    next_page: u32,
    in_flight: bool,
    failed: bool,
}

impl PageAccumulator {
    pub fn new() -> Self {
        Self {
            epoch: 0,
            sessions: Vec::new(),
            total: None,
            next_page: 1,
            in_flight: false,
            failed: false,
        }
    }

    /// Starts a new epoch: accumulated pages are discarded and fetching
    /// restarts from page 1. Any fetch still in flight for the previous
    /// epoch will be rejected by the epoch check when it lands.
    pub fn reset(&mut self) -> u64 {
        self.epoch += 1;
        self.sessions.clear();
        self.total = None;
        self.next_page = 1;
        self.in_flight = false;
        self.failed = false;
        self.epoch
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn loaded(&self) -> usize {
        self.sessions.len()
    }

    /// Server-reported total, once the first page of the epoch has landed.
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn last_fetch_failed(&self) -> bool {
        self.failed
    }

    /// True until the server-reported total has been reached. Before the
    /// first page lands the total is unknown, so there is always more.
    pub fn has_more(&self) -> bool {
        match self.total {
            Some(total) => self.sessions.len() < total,
            None => true,
        }
    }

    /// Claims the next page fetch, or `None` when one is already in flight
    /// or everything is loaded. Requesting past the end is a no-op, which
    /// makes scroll-driven triggers idempotent.
    pub fn begin_fetch(&mut self) -> Option<PageRequest> {
        if self.in_flight || !self.has_more() {
            return None;
        }
        self.in_flight = true;
        Some(PageRequest {
            epoch: self.epoch,
            page: self.next_page,
        })
    }

    /// Applies a fetched page. Stale-epoch responses are dropped whole; the
    /// collection never mixes pages from two filter states.
    pub fn complete(&mut self, epoch: u64, page: SessionPage) -> AppendOutcome {
        if epoch != self.epoch {
            return AppendOutcome::Stale;
        }
        self.in_flight = false;
        self.failed = false;
        self.total = Some(page.total);
        self.sessions.extend(page.sessions);
        // loaded may never exceed the server-reported total
        if self.sessions.len() > page.total {
            self.sessions.truncate(page.total);
        }
        self.next_page += 1;
        AppendOutcome::Appended {
            loaded: self.sessions.len(),
        }
    }

    /// Records a fetch failure after retries were exhausted. Pages already
    /// accumulated stay available.
    pub fn fail(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.in_flight = false;
        self.failed = true;
        true
    }

}

impl Default for PageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::test_support::fixtures::{page_of, session};

    #[test]
    fn accumulates_pages_until_total_then_stops() {
        // page size 2, total 5: loaded counts go 2, 4, 5
        let mut acc = PageAccumulator::new();
        acc.reset();

        let req = acc.begin_fetch().expect("first fetch");
        assert_eq!(req.page, 1);
        acc.complete(req.epoch, page_of(&["a", "b"], 5, 1, 2));
        assert_eq!(acc.loaded(), 2);

        let req = acc.begin_fetch().expect("second fetch");
        assert_eq!(req.page, 2);
        acc.complete(req.epoch, page_of(&["c", "d"], 5, 2, 2));
        assert_eq!(acc.loaded(), 4);

        let req = acc.begin_fetch().expect("third fetch");
        assert_eq!(req.page, 3);
        acc.complete(req.epoch, page_of(&["e"], 5, 3, 2));
        assert_eq!(acc.loaded(), 5);

        // fourth request is a no-op: everything is loaded
        assert!(acc.begin_fetch().is_none());
        assert!(!acc.has_more());
    }

    #[test]
    fn loaded_count_is_monotone_and_bounded_by_total() {
        let mut acc = PageAccumulator::new();
        acc.reset();
        let mut previous = 0;
        for (page, ids) in [(1u32, vec!["a", "b"]), (2, vec!["c", "d"]), (3, vec!["e"])] {
            let req = acc.begin_fetch().unwrap();
            assert_eq!(req.page, page);
            acc.complete(req.epoch, page_of(&ids, 5, page, 2));
            assert!(acc.loaded() >= previous);
            assert!(acc.loaded() <= acc.total().unwrap());
            previous = acc.loaded();
        }
    }

    #[test]
    fn no_duplicate_concurrent_fetches() {
        let mut acc = PageAccumulator::new();
        acc.reset();
        let first = acc.begin_fetch();
        assert!(first.is_some());
        // repeated scroll events while the fetch is in flight
        assert!(acc.begin_fetch().is_none());
        assert!(acc.begin_fetch().is_none());
    }

    #[test]
    fn stale_epoch_response_is_discarded() {
        let mut acc = PageAccumulator::new();
        acc.reset();
        let req = acc.begin_fetch().unwrap();
        acc.complete(req.epoch, page_of(&["old-a", "old-b"], 4, 1, 2));
        let in_flight = acc.begin_fetch().unwrap();

        // filter change arrives while page 2 is in flight
        let new_epoch = acc.reset();
        let fresh = acc.begin_fetch().unwrap();
        assert_eq!(fresh.epoch, new_epoch);
        acc.complete(fresh.epoch, page_of(&["new-a", "new-b"], 3, 1, 2));

        // the old page 2 lands late and must not be appended
        let outcome = acc.complete(in_flight.epoch, page_of(&["old-c", "old-d"], 4, 2, 2));
        assert_eq!(outcome, AppendOutcome::Stale);
        let ids: Vec<&str> = acc.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["new-a", "new-b"]);
    }

    #[test]
    fn failure_keeps_already_loaded_pages() {
        let mut acc = PageAccumulator::new();
        acc.reset();
        let req = acc.begin_fetch().unwrap();
        acc.complete(req.epoch, page_of(&["a", "b"], 5, 1, 2));

        let req = acc.begin_fetch().unwrap();
        assert!(acc.fail(req.epoch));
        assert!(acc.last_fetch_failed());
        assert_eq!(acc.loaded(), 2);
        // and fetching can resume
        assert!(acc.begin_fetch().is_some());
    }

    #[test]
    fn stale_failure_is_ignored() {
        let mut acc = PageAccumulator::new();
        acc.reset();
        let req = acc.begin_fetch().unwrap();
        acc.reset();
        assert!(!acc.fail(req.epoch));
        assert!(!acc.last_fetch_failed());
    }

    #[test]
    fn overfull_final_page_is_truncated_to_total() {
        let mut acc = PageAccumulator::new();
        acc.reset();
        let req = acc.begin_fetch().unwrap();
        let mut page = page_of(&["a", "b"], 3, 1, 2);
        page.sessions.push(session("c", 5.0));
        page.sessions.push(session("d", 5.0));
        // server reported total 3 but sent 4 rows across pages
        page.page_size = 4;
        acc.complete(req.epoch, page);
        assert_eq!(acc.loaded(), 3);
        assert!(!acc.has_more());
    }
}
