use leptos::*;

use crate::pages::sessions::components::{BulkBar, DetailPanel, FilterBar, VirtualList};
use crate::pages::sessions::view_model::use_sessions_view_model;
use crate::state::filters::FilterPatch;

#[component]
pub fn SessionsPage() -> impl IntoView {
    let vm = use_sessions_view_model();
    let accumulator = vm.accumulator;
    let list_message = vm.list_message;

    let on_viewport = Callback::new({
        let vm = vm.clone();
        move |(scroll_top, height): (f64, f64)| vm.set_viewport(scroll_top, height)
    });
    let on_open = Callback::new({
        let vm = vm.clone();
        move |id: String| vm.toggle_detail(&id)
    });
    let on_submit = Callback::new({
        let vm = vm.clone();
        move |_| vm.submit_feedback()
    });
    let on_close = Callback::new({
        let vm = vm.clone();
        move |_| {
            vm.update_filters(FilterPatch {
                detail: Some(None),
                ..Default::default()
            })
        }
    });
    let on_retry = {
        let vm = vm.clone();
        move |_| vm.retry_failed_fetch()
    };

    let status = move || {
        accumulator.with(|acc| match acc.total() {
            Some(total) => format!("{} of {} sessions loaded", acc.loaded(), total),
            None => "Loading sessions...".to_string(),
        })
    };

    view! {
        <div class="max-w-6xl mx-auto py-8 px-4 sm:px-6 lg:px-8 space-y-4">
            <h1 class="text-2xl font-bold text-fg">"Practice sessions"</h1>
            <FilterBar store=vm.filters/>
            <BulkBar
                selection=vm.selection
                form=vm.bulk_form
                pending=vm.bulk_action.pending()
                message=vm.bulk_message
                on_submit=on_submit
            />
            {move || {
                list_message.get().error.map(|error| {
                    view! {
                        <div class="flex items-center justify-between bg-danger-surface border border-danger rounded-md px-4 py-2">
                            <p class="text-sm text-danger">{error}</p>
                            <button
                                class="text-sm font-medium text-danger hover:underline"
                                on:click=on_retry.clone()
                            >
                                "Retry"
                            </button>
                        </div>
                    }
                })
            }}
            <div class="flex items-center justify-between text-sm text-fg-muted">
                <span>{status}</span>
                {move || {
                    accumulator
                        .with(|acc| acc.is_loading())
                        .then(|| view! { <span>"Loading..."</span> })
                }}
            </div>
            <VirtualList
                rows=vm.rows
                plan=vm.window_plan
                selection=vm.selection
                on_viewport=on_viewport
                on_open=on_open
            />
            <DetailPanel detail=vm.detail on_close=on_close/>
        </div>
    }
}
