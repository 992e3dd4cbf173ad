use leptos::*;

use crate::pages::sessions::utils::{BulkFormState, MessageState};
use crate::state::selection::SelectionState;

#[component]
pub fn BulkBar(
    selection: SelectionState,
    form: BulkFormState,
    #[prop(into)] pending: Signal<bool>,
    message: RwSignal<MessageState>,
    #[prop(into)] on_submit: Callback<()>,
) -> impl IntoView {
    let feedback = form.feedback_signal();

    view! {
        <div class="bg-surface-raised border border-border rounded-md p-4 space-y-2">
            <div class="flex items-center justify-between">
                <span class="text-sm text-fg-muted">
                    {move || format!("{} selected", selection.len())}
                </span>
                <button
                    class="px-4 py-1.5 rounded-md text-sm font-medium text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg_hover disabled:opacity-50"
                    disabled=move || pending.get() || selection.is_empty()
                    on:click=move |_| on_submit.call(())
                >
                    {move || if pending.get() { "Applying..." } else { "Apply feedback" }}
                </button>
            </div>
            <textarea
                class="w-full rounded-md border-border bg-surface text-fg text-sm"
                rows="2"
                placeholder="Feedback for the selected sessions"
                prop:value=move || feedback.get()
                on:input=move |ev| feedback.set(event_target_value(&ev))
            ></textarea>
            {move || {
                let state = message.get();
                if let Some(error) = state.error {
                    Some(view! { <p class="text-sm text-danger">{error}</p> })
                } else {
                    state
                        .success
                        .map(|msg| view! { <p class="text-sm text-success">{msg}</p> })
                }
            }}
        </div>
    }
}
