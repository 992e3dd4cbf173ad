use chrono::NaiveDate;
use leptos::*;

use crate::state::filters::{
    FilterPatch, FilterStore, PageSize, SortKey, SortOrder, Team, SCORE_CEIL, SCORE_FLOOR,
};

/// `<input type="date">` wants `YYYY-MM-DD` and an empty string for "unset".
fn date_input_value(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[component]
pub fn FilterBar(store: FilterStore) -> impl IntoView {
    let state = store.state();

    let on_date = move |raw: String, is_from: bool| {
        let value = if raw.trim().is_empty() {
            Some(None)
        } else {
            match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                Ok(date) => Some(Some(date)),
                Err(_) => None,
            }
        };
        let Some(value) = value else { return };
        let patch = if is_from {
            FilterPatch {
                date_from: Some(value),
                ..Default::default()
            }
        } else {
            FilterPatch {
                date_to: Some(value),
                ..Default::default()
            }
        };
        store.update(patch);
    };

    view! {
        <div class="bg-surface-raised border border-border rounded-md p-4 grid grid-cols-1 md:grid-cols-3 lg:grid-cols-4 gap-3">
            <label class="flex flex-col text-sm text-fg-muted">
                "Search"
                <input
                    type="text"
                    class="mt-1 rounded-md border-border bg-surface text-fg"
                    placeholder="Search titles"
                    prop:value=move || state.with(|s| s.search.clone())
                    on:input=move |ev| {
                        store.update(FilterPatch {
                            search: Some(event_target_value(&ev)),
                            ..Default::default()
                        })
                    }
                />
            </label>
            <div class="flex gap-2">
                <label class="flex flex-col text-sm text-fg-muted flex-1">
                    "Min score"
                    <input
                        type="number" min="0" max="10" step="0.5"
                        class="mt-1 rounded-md border-border bg-surface text-fg"
                        prop:value=move || state.with(|s| s.score_min.to_string())
                        on:change=move |ev| {
                            let value = event_target_value(&ev).trim().parse::<f64>().unwrap_or(SCORE_FLOOR);
                            store.update(FilterPatch { score_min: Some(value), ..Default::default() })
                        }
                    />
                </label>
                <label class="flex flex-col text-sm text-fg-muted flex-1">
                    "Max score"
                    <input
                        type="number" min="0" max="10" step="0.5"
                        class="mt-1 rounded-md border-border bg-surface text-fg"
                        prop:value=move || state.with(|s| s.score_max.to_string())
                        on:change=move |ev| {
                            let value = event_target_value(&ev).trim().parse::<f64>().unwrap_or(SCORE_CEIL);
                            store.update(FilterPatch { score_max: Some(value), ..Default::default() })
                        }
                    />
                </label>
            </div>
            <div class="flex gap-2">
                <label class="flex flex-col text-sm text-fg-muted flex-1">
                    "From"
                    <input
                        type="date"
                        class="mt-1 rounded-md border-border bg-surface text-fg"
                        prop:value=move || state.with(|s| date_input_value(s.date_from))
                        on:change=move |ev| on_date(event_target_value(&ev), true)
                    />
                </label>
                <label class="flex flex-col text-sm text-fg-muted flex-1">
                    "To"
                    <input
                        type="date"
                        class="mt-1 rounded-md border-border bg-surface text-fg"
                        prop:value=move || state.with(|s| date_input_value(s.date_to))
                        on:change=move |ev| on_date(event_target_value(&ev), false)
                    />
                </label>
            </div>
            <label class="flex flex-col text-sm text-fg-muted">
                "Team"
                <select
                    class="mt-1 rounded-md border-border bg-surface text-fg"
                    prop:value=move || state.with(|s| s.team.map(|t| t.as_str()).unwrap_or(""))
                    on:change=move |ev| {
                        store.update(FilterPatch {
                            team: Some(Team::parse(&event_target_value(&ev))),
                            ..Default::default()
                        })
                    }
                >
                    <option value="">"All teams"</option>
                    <option value="enterprise">"Enterprise"</option>
                    <option value="mid_market">"Mid-market"</option>
                    <option value="smb">"SMB"</option>
                </select>
            </label>
            <label class="flex flex-col text-sm text-fg-muted">
                "Sort by"
                <select
                    class="mt-1 rounded-md border-border bg-surface text-fg"
                    prop:value=move || state.with(|s| s.sort_by.as_str())
                    on:change=move |ev| {
                        if let Some(key) = SortKey::parse(&event_target_value(&ev)) {
                            store.update(FilterPatch { sort_by: Some(key), ..Default::default() })
                        }
                    }
                >
                    <option value="created_at">"Date"</option>
                    <option value="score">"Score"</option>
                    <option value="title">"Title"</option>
                </select>
            </label>
            <label class="flex flex-col text-sm text-fg-muted">
                "Order"
                <select
                    class="mt-1 rounded-md border-border bg-surface text-fg"
                    prop:value=move || state.with(|s| s.sort_order.as_str())
                    on:change=move |ev| {
                        if let Some(order) = SortOrder::parse(&event_target_value(&ev)) {
                            store.update(FilterPatch { sort_order: Some(order), ..Default::default() })
                        }
                    }
                >
                    <option value="desc">"Descending"</option>
                    <option value="asc">"Ascending"</option>
                </select>
            </label>
            <label class="flex flex-col text-sm text-fg-muted">
                "Page size"
                <select
                    class="mt-1 rounded-md border-border bg-surface text-fg"
                    prop:value=move || state.with(|s| s.page_size.as_u32().to_string())
                    on:change=move |ev| {
                        if let Some(size) = PageSize::parse(&event_target_value(&ev)) {
                            store.update(FilterPatch { page_size: Some(size), ..Default::default() })
                        }
                    }
                >
                    <option value="25">"25"</option>
                    <option value="50">"50"</option>
                    <option value="100">"100"</option>
                </select>
            </label>
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::state::filters::FilterState;
    use std::collections::HashMap;

    #[test]
    fn restored_dates_surface_in_the_inputs() {
        let params: HashMap<String, String> = [
            ("dateFrom".to_string(), "2026-02-01".to_string()),
            ("dateTo".to_string(), "2026-02-28".to_string()),
        ]
        .into_iter()
        .collect();
        let state = FilterState::from_query(&params);

        assert_eq!(date_input_value(state.date_from), "2026-02-01");
        assert_eq!(date_input_value(state.date_to), "2026-02-28");
    }

    #[test]
    fn unset_dates_render_as_empty_values() {
        let state = FilterState::default();
        assert_eq!(date_input_value(state.date_from), "");
        assert_eq!(date_input_value(state.date_to), "");
    }
}
