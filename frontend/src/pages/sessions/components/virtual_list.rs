use leptos::*;
use wasm_bindgen::JsCast;

use crate::api::Session;
use crate::engine::WindowPlan;
use crate::pages::sessions::utils::{format_duration, format_score, ROW_HEIGHT_PX};
use crate::state::selection::SelectionState;

/// Renders only the planned slice of the row collection. A spacer above
/// (the translated inner container) and the full-height outer element keep
/// the scrollbar honest while off-window rows stay unmounted.
#[component]
pub fn VirtualList(
    rows: Memo<Vec<Session>>,
    plan: Memo<WindowPlan>,
    selection: SelectionState,
    #[prop(into)] on_viewport: Callback<(f64, f64)>,
    #[prop(into)] on_open: Callback<String>,
) -> impl IntoView {
    let windowed = create_memo(move |_| {
        let plan = plan.get();
        rows.with(|rows| {
            let end = plan.end.min(rows.len());
            let start = plan.start.min(end);
            rows[start..end].to_vec()
        })
    });

    view! {
        <div
            class="h-[32rem] overflow-y-auto border border-border rounded-md bg-surface"
            on:scroll=move |ev| {
                if let Some(el) = ev.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) {
                    on_viewport.call((el.scroll_top() as f64, el.client_height() as f64));
                }
            }
        >
            <div
                class="relative"
                style:height=move || format!("{}px", plan.get().total_height)
            >
                <div
                    class="absolute inset-x-0"
                    style:transform=move || format!("translateY({}px)", plan.get().top_offset)
                >
                    <For
                        each=move || windowed.get()
                        key=|session| session.id.clone()
                        children=move |session| {
                            view! { <SessionRow session selection on_open/> }
                        }
                    />
                </div>
            </div>
        </div>
    }
}

#[component]
fn SessionRow(
    session: Session,
    selection: SelectionState,
    on_open: Callback<String>,
) -> impl IntoView {
    let id_for_checked = session.id.clone();
    let id_for_toggle = session.id.clone();
    let id_for_open = session.id.clone();

    view! {
        <div
            class="flex items-center gap-4 px-4 border-b border-border text-sm"
            style:height=format!("{}px", ROW_HEIGHT_PX)
        >
            <input
                type="checkbox"
                class="rounded border-border"
                prop:checked=move || selection.is_selected(&id_for_checked)
                on:change=move |_| selection.toggle(&id_for_toggle)
            />
            <button
                class="flex-1 text-left text-fg font-medium hover:underline truncate"
                on:click=move |_| on_open.call(id_for_open.clone())
            >
                {session.title.clone()}
            </button>
            <span class="w-12 text-right text-fg">{format_score(session.score)}</span>
            <span class="w-28 text-fg-muted">{session.created_at.format("%Y-%m-%d").to_string()}</span>
            <span class="w-20 text-right text-fg-muted">{format_duration(session.duration_seconds)}</span>
        </div>
    }
}
