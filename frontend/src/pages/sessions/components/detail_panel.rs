use leptos::*;

use crate::api::Session;
use crate::pages::sessions::utils::{format_duration, format_score};

#[component]
pub fn DetailPanel(
    detail: Memo<Option<Session>>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    move || {
        detail.get().map(|session| {
            view! {
                <div class="bg-surface-raised border border-border rounded-md p-4 space-y-3">
                    <div class="flex items-start justify-between">
                        <div>
                            <h2 class="text-lg font-semibold text-fg">{session.title.clone()}</h2>
                            <p class="text-sm text-fg-muted">
                                {format!(
                                    "{} · {} · score {}",
                                    session.created_at.format("%Y-%m-%d %H:%M"),
                                    format_duration(session.duration_seconds),
                                    format_score(session.score),
                                )}
                            </p>
                        </div>
                        <button
                            class="text-sm text-fg-muted hover:text-fg"
                            on:click=move |_| on_close.call(())
                        >
                            "Close"
                        </button>
                    </div>
                    <dl class="grid grid-cols-3 gap-2 text-sm">
                        <MetricCell label="Clarity" value=session.metrics.clarity/>
                        <MetricCell label="Confidence" value=session.metrics.confidence/>
                        <MetricCell label="Engagement" value=session.metrics.engagement/>
                    </dl>
                    {session
                        .feedback
                        .clone()
                        .map(|feedback| view! { <p class="text-sm text-fg border-t border-border pt-2">{feedback}</p> })}
                </div>
            }
        })
    }
}

#[component]
fn MetricCell(label: &'static str, value: f64) -> impl IntoView {
    view! {
        <div class="bg-surface rounded-md border border-border p-2">
            <dt class="text-fg-muted">{label}</dt>
            <dd class="text-fg font-medium">{format_score(value)}</dd>
        </div>
    }
}
