use std::collections::HashMap;

use chrono::NaiveDate;
use leptos::*;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::utils::debounce::Debouncer;

pub const SCORE_FLOOR: f64 = 0.0;
pub const SCORE_CEIL: f64 = 10.0;

/// Trailing-edge delay before an edited filter state is written back to the
/// URL. Every edit inside the window resets the timer.
pub const URL_SYNC_DEBOUNCE_MS: u32 = 300;

const DATE_FORMAT: &str = "%Y-%m-%d";

// Characters that must not appear raw in a query-string value.
const QUERY_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'&')
    .add(b'=')
    .add(b'+')
    .add(b'%');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Score,
    CreatedAt,
    Title,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Score => "score",
            SortKey::CreatedAt => "created_at",
            SortKey::Title => "title",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "score" => Some(SortKey::Score),
            "created_at" => Some(SortKey::CreatedAt),
            "title" => Some(SortKey::Title),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub fn as_u32(&self) -> u32 {
        match self {
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "25" => Some(PageSize::TwentyFive),
            "50" => Some(PageSize::Fifty),
            "100" => Some(PageSize::Hundred),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Enterprise,
    MidMarket,
    Smb,
}

impl Team {
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Enterprise => "enterprise",
            Team::MidMarket => "mid_market",
            Team::Smb => "smb",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "enterprise" => Some(Team::Enterprise),
            "mid_market" => Some(Team::MidMarket),
            "smb" => Some(Team::Smb),
            _ => None,
        }
    }

    pub const ALL: [Team; 3] = [Team::Enterprise, Team::MidMarket, Team::Smb];
}

/// The single source of truth for "what the user asked to see".
///
/// Every field maps to exactly one query-string key; fields at their default
/// are omitted when serializing, so the default state writes an empty query.
/// `detail` is client-only state (the open session id) and is never forwarded
/// to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub search: String,
    pub score_min: f64,
    pub score_max: f64,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub team: Option<Team>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub page_size: PageSize,
    pub detail: Option<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            score_min: SCORE_FLOOR,
            score_max: SCORE_CEIL,
            date_from: None,
            date_to: None,
            team: None,
            sort_by: SortKey::CreatedAt,
            sort_order: SortOrder::Desc,
            page_size: PageSize::TwentyFive,
            detail: None,
        }
    }
}

impl FilterState {
    /// Parses a decoded key/value map into a typed state. Absent or malformed
    /// parameters fall back to the field default; a violated pair invariant
    /// (min > max, from > to) resets the pair.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let defaults = FilterState::default();

        let search = params
            .get("search")
            .map(|value| value.to_string())
            .unwrap_or(defaults.search);

        let mut score_min = parse_score(params.get("scoreMin"), defaults.score_min);
        let mut score_max = parse_score(params.get("scoreMax"), defaults.score_max);
        if score_min > score_max {
            log::debug!("ignoring inverted score range {}..{}", score_min, score_max);
            score_min = defaults.score_min;
            score_max = defaults.score_max;
        }

        let mut date_from = parse_date(params.get("dateFrom"));
        let mut date_to = parse_date(params.get("dateTo"));
        if let (Some(from), Some(to)) = (date_from, date_to) {
            if from > to {
                log::debug!("ignoring inverted date range {}..{}", from, to);
                date_from = None;
                date_to = None;
            }
        }

        let team = params.get("team").and_then(|value| Team::parse(value));
        let sort_by = params
            .get("sortBy")
            .and_then(|value| SortKey::parse(value))
            .unwrap_or(defaults.sort_by);
        let sort_order = params
            .get("sortOrder")
            .and_then(|value| SortOrder::parse(value))
            .unwrap_or(defaults.sort_order);
        let page_size = params
            .get("pageSize")
            .and_then(|value| PageSize::parse(value))
            .unwrap_or(defaults.page_size);
        let detail = params
            .get("detail")
            .filter(|value| !value.is_empty())
            .cloned();

        Self {
            search,
            score_min,
            score_max,
            date_from,
            date_to,
            team,
            sort_by,
            sort_order,
            page_size,
            detail,
        }
    }

    /// Serializes to query pairs, omitting every field at its default value.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let defaults = FilterState::default();
        let mut pairs = Vec::new();

        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if self.score_min != defaults.score_min {
            pairs.push(("scoreMin", format_score(self.score_min)));
        }
        if self.score_max != defaults.score_max {
            pairs.push(("scoreMax", format_score(self.score_max)));
        }
        if let Some(from) = self.date_from {
            pairs.push(("dateFrom", from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("dateTo", to.format(DATE_FORMAT).to_string()));
        }
        if let Some(team) = self.team {
            pairs.push(("team", team.as_str().to_string()));
        }
        if self.sort_by != defaults.sort_by {
            pairs.push(("sortBy", self.sort_by.as_str().to_string()));
        }
        if self.sort_order != defaults.sort_order {
            pairs.push(("sortOrder", self.sort_order.as_str().to_string()));
        }
        if self.page_size != defaults.page_size {
            pairs.push(("pageSize", self.page_size.as_u32().to_string()));
        }
        if let Some(detail) = &self.detail {
            if !detail.is_empty() {
                pairs.push(("detail", detail.clone()));
            }
        }

        pairs
    }

    /// The parameter set sent to the remote session source for one page.
    /// `page` and `pageSize` are always present; `detail` never is.
    pub fn server_query(&self, page: u32) -> Vec<(&'static str, String)> {
        let defaults = FilterState::default();
        let mut pairs = vec![
            ("page", page.to_string()),
            ("pageSize", self.page_size.as_u32().to_string()),
            ("sortBy", self.sort_by.as_str().to_string()),
            ("sortOrder", self.sort_order.as_str().to_string()),
        ];

        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if self.score_min != defaults.score_min {
            pairs.push(("scoreMin", format_score(self.score_min)));
        }
        if self.score_max != defaults.score_max {
            pairs.push(("scoreMax", format_score(self.score_max)));
        }
        if let Some(from) = self.date_from {
            pairs.push(("dateFrom", from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("dateTo", to.format(DATE_FORMAT).to_string()));
        }
        if let Some(team) = self.team {
            pairs.push(("team", team.as_str().to_string()));
        }

        pairs
    }
}

fn parse_score(raw: Option<&String>, default: f64) -> f64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if (SCORE_FLOOR..=SCORE_CEIL).contains(&value) => value,
        _ => {
            log::debug!("invalid score parameter {:?}, using default", raw);
            default
        }
    }
}

fn parse_date(raw: Option<&String>) -> Option<NaiveDate> {
    let raw = raw?;
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            log::debug!("invalid date parameter {:?}, ignoring", raw);
            None
        }
    }
}

fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Percent-encodes query pairs into a `key=value&...` string (no leading `?`).
pub fn encode_query(pairs: &[(&'static str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!("{}={}", key, utf8_percent_encode(value, QUERY_ENCODE))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Decodes a raw query string (with or without a leading `?`) into a map.
/// Undecodable escapes keep their raw form rather than failing.
pub fn parse_query_string(raw: &str) -> HashMap<String, String> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let mut params = HashMap::new();
    for piece in raw.split('&') {
        if piece.is_empty() {
            continue;
        }
        let (key, value) = piece.split_once('=').unwrap_or((piece, ""));
        let key = percent_decode_str(key)
            .decode_utf8()
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| key.to_string());
        let value = value.replace('+', " ");
        let value = percent_decode_str(&value)
            .decode_utf8()
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| value.to_string());
        params.insert(key, value);
    }
    params
}

/// A partial change merged into [`FilterState`] by [`FilterStore::update`].
/// Double-`Option` fields distinguish "leave alone" from "clear".
#[derive(Debug, Clone, Default)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub score_min: Option<f64>,
    pub score_max: Option<f64>,
    pub date_from: Option<Option<NaiveDate>>,
    pub date_to: Option<Option<NaiveDate>>,
    pub team: Option<Option<Team>>,
    pub sort_by: Option<SortKey>,
    pub sort_order: Option<SortOrder>,
    pub page_size: Option<PageSize>,
    pub detail: Option<Option<String>>,
}

impl FilterPatch {
    pub fn apply(self, state: &mut FilterState) {
        if let Some(search) = self.search {
            state.search = search;
        }
        if let Some(score_min) = self.score_min {
            state.score_min = score_min.clamp(SCORE_FLOOR, SCORE_CEIL);
        }
        if let Some(score_max) = self.score_max {
            state.score_max = score_max.clamp(SCORE_FLOOR, SCORE_CEIL);
        }
        if state.score_min > state.score_max {
            std::mem::swap(&mut state.score_min, &mut state.score_max);
        }
        if let Some(date_from) = self.date_from {
            state.date_from = date_from;
        }
        if let Some(date_to) = self.date_to {
            state.date_to = date_to;
        }
        if let Some(team) = self.team {
            state.team = team;
        }
        if let Some(sort_by) = self.sort_by {
            state.sort_by = sort_by;
        }
        if let Some(sort_order) = self.sort_order {
            state.sort_order = sort_order;
        }
        if let Some(page_size) = self.page_size {
            state.page_size = page_size;
        }
        if let Some(detail) = self.detail {
            state.detail = detail;
        }
    }
}

/// Reactive wrapper owning the filter state for one page.
///
/// With `url_sync` enabled the state is reconstructed from the current URL at
/// creation and every update schedules a debounced `history.replaceState`
/// write (replacement, so filter edits do not pollute back/forward history).
/// With it disabled the same record works purely in memory.
#[derive(Clone, Copy)]
pub struct FilterStore {
    state: RwSignal<FilterState>,
    url_sync: bool,
    debouncer: StoredValue<Debouncer>,
}

impl FilterStore {
    pub fn new(url_sync: bool) -> Self {
        let initial = if url_sync {
            FilterState::from_query(&current_url_params())
        } else {
            FilterState::default()
        };
        Self {
            state: create_rw_signal(initial),
            url_sync,
            debouncer: store_value(Debouncer::new(URL_SYNC_DEBOUNCE_MS)),
        }
    }

    pub fn state(&self) -> RwSignal<FilterState> {
        self.state
    }

    pub fn get(&self) -> FilterState {
        self.state.get()
    }

    pub fn update(&self, patch: FilterPatch) {
        self.state.update(|state| patch.apply(state));
        if self.url_sync {
            self.schedule_url_write();
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn schedule_url_write(&self) {
        let state = self.state;
        self.debouncer.with_value(|debouncer| {
            debouncer.schedule(move || {
                let query = encode_query(&state.get_untracked().to_query());
                replace_url_query(&query);
            });
        });
    }

    // URL writes only exist in the browser.
    #[cfg(not(target_arch = "wasm32"))]
    fn schedule_url_write(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn current_url_params() -> HashMap<String, String> {
    let search = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();
    parse_query_string(&search)
}

#[cfg(not(target_arch = "wasm32"))]
fn current_url_params() -> HashMap<String, String> {
    HashMap::new()
}

#[cfg(target_arch = "wasm32")]
fn replace_url_query(query: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let location = window.location();
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let url = if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query)
    };
    if let Ok(history) = window.history() {
        if let Err(err) = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url)) {
            log::warn!("failed to replace URL state: {:?}", err);
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::with_runtime;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn default_state_serializes_to_empty_query() {
        let state = FilterState::default();
        assert!(state.to_query().is_empty());
        assert_eq!(encode_query(&state.to_query()), "");
    }

    #[test]
    fn default_state_round_trips_through_url() {
        let written = encode_query(&FilterState::default().to_query());
        let parsed = FilterState::from_query(&parse_query_string(&written));
        assert_eq!(parsed, FilterState::default());
    }

    #[test]
    fn populated_state_round_trips_through_url() {
        let state = FilterState {
            search: "cold call & follow-up".to_string(),
            score_min: 2.5,
            score_max: 9.0,
            date_from: NaiveDate::from_ymd_opt(2026, 1, 1),
            date_to: NaiveDate::from_ymd_opt(2026, 3, 31),
            team: Some(Team::MidMarket),
            sort_by: SortKey::Score,
            sort_order: SortOrder::Asc,
            page_size: PageSize::Fifty,
            detail: Some("sess-42".to_string()),
        };
        let written = encode_query(&state.to_query());
        let parsed = FilterState::from_query(&parse_query_string(&written));
        assert_eq!(parsed, state);
    }

    #[test]
    fn malformed_numeric_parameter_falls_back_to_default() {
        let parsed = FilterState::from_query(&params(&[("scoreMin", "banana")]));
        assert_eq!(parsed.score_min, SCORE_FLOOR);

        let parsed = FilterState::from_query(&params(&[("scoreMax", "999")]));
        assert_eq!(parsed.score_max, SCORE_CEIL);
    }

    #[test]
    fn inverted_score_range_resets_both_bounds() {
        let parsed = FilterState::from_query(&params(&[("scoreMin", "8"), ("scoreMax", "3")]));
        assert_eq!(parsed.score_min, SCORE_FLOOR);
        assert_eq!(parsed.score_max, SCORE_CEIL);
    }

    #[test]
    fn inverted_date_range_is_dropped() {
        let parsed = FilterState::from_query(&params(&[
            ("dateFrom", "2026-05-01"),
            ("dateTo", "2026-04-01"),
        ]));
        assert!(parsed.date_from.is_none());
        assert!(parsed.date_to.is_none());
    }

    #[test]
    fn unknown_enum_values_fall_back_to_defaults() {
        let parsed = FilterState::from_query(&params(&[
            ("team", "galactic"),
            ("sortBy", "vibes"),
            ("sortOrder", "sideways"),
            ("pageSize", "37"),
        ]));
        assert!(parsed.team.is_none());
        assert_eq!(parsed.sort_by, SortKey::CreatedAt);
        assert_eq!(parsed.sort_order, SortOrder::Desc);
        assert_eq!(parsed.page_size, PageSize::TwentyFive);
    }

    #[test]
    fn server_query_always_has_paging_and_never_detail() {
        let mut state = FilterState::default();
        state.detail = Some("sess-1".to_string());
        let pairs = state.server_query(3);
        assert!(pairs.iter().any(|(key, value)| *key == "page" && value == "3"));
        assert!(pairs.iter().any(|(key, value)| *key == "pageSize" && value == "25"));
        assert!(pairs.iter().all(|(key, _)| *key != "detail"));
    }

    #[test]
    fn query_encoding_escapes_reserved_characters() {
        let pairs = vec![("search", "a&b=c #1".to_string())];
        let encoded = encode_query(&pairs);
        assert_eq!(encoded, "search=a%26b%3Dc%20%231");
        let parsed = parse_query_string(&encoded);
        assert_eq!(parsed.get("search").map(String::as_str), Some("a&b=c #1"));
    }

    #[test]
    fn patch_merges_and_repairs_score_order() {
        with_runtime(|| {
            let store = FilterStore::new(false);
            store.update(FilterPatch {
                search: Some("demo".to_string()),
                score_min: Some(7.0),
                ..Default::default()
            });
            store.update(FilterPatch {
                score_max: Some(4.0),
                ..Default::default()
            });
            let state = store.get();
            assert_eq!(state.search, "demo");
            // min/max swapped back into order after the conflicting edit
            assert!(state.score_min <= state.score_max);
        });
    }

    #[test]
    fn patch_clears_optional_fields() {
        with_runtime(|| {
            let store = FilterStore::new(false);
            store.update(FilterPatch {
                team: Some(Some(Team::Smb)),
                detail: Some(Some("sess-9".to_string())),
                ..Default::default()
            });
            assert_eq!(store.get().team, Some(Team::Smb));
            store.update(FilterPatch {
                team: Some(None),
                detail: Some(None),
                ..Default::default()
            });
            assert!(store.get().team.is_none());
            assert!(store.get().detail.is_none());
        });
    }
}
