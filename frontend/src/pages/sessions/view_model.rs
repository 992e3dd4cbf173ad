use leptos::*;

use crate::api::{ApiClient, ApiError, BulkFeedbackRequest, Session, SessionPage};
use crate::engine::refine;
use crate::engine::{
    near_end, plan_window, PageAccumulator, PageRequest, Viewport, WindowPlan, DEFAULT_OVERSCAN,
    LOAD_MORE_THRESHOLD,
};
use crate::live::NotificationHub;
use crate::pages::sessions::repository;
use crate::pages::sessions::utils::{BulkFormState, MessageState, ROW_HEIGHT_PX};
use crate::state::filters::{FilterPatch, FilterStore};
use crate::state::selection::SelectionState;

/// One page fetch, pinned to the filter state it was issued under. The query
/// is snapshotted at dispatch so a concurrent filter edit cannot change what
/// the in-flight request means.
#[derive(Clone)]
pub struct PageFetch {
    pub request: PageRequest,
    pub query: Vec<(&'static str, String)>,
}

type LoadAction = Action<PageFetch, (PageRequest, Result<SessionPage, ApiError>)>;

#[derive(Clone)]
pub struct SessionsViewModel {
    pub api: ApiClient,
    pub filters: FilterStore,
    pub accumulator: RwSignal<PageAccumulator>,
    pub selection: SelectionState,
    pub viewport: RwSignal<Viewport>,
    pub rows: Memo<Vec<Session>>,
    pub window_plan: Memo<WindowPlan>,
    pub detail: Memo<Option<Session>>,
    pub load_action: LoadAction,
    pub bulk_action: Action<BulkFeedbackRequest, Result<usize, ApiError>>,
    pub bulk_form: BulkFormState,
    pub list_message: RwSignal<MessageState>,
    pub bulk_message: RwSignal<MessageState>,
}

impl SessionsViewModel {
    pub fn new() -> Self {
        let api = use_context::<ApiClient>().expect("ApiClient should be provided");
        let filters = FilterStore::new(true);
        let accumulator = create_rw_signal(PageAccumulator::new());
        let selection = SelectionState::new();
        let viewport = create_rw_signal(Viewport::default());
        let bulk_form = BulkFormState::default();
        let list_message = create_rw_signal(MessageState::default());
        let bulk_message = create_rw_signal(MessageState::default());

        let api_for_load = api.clone();
        let load_action: LoadAction = create_action(move |fetch: &PageFetch| {
            let api = api_for_load.clone();
            let fetch = fetch.clone();
            async move {
                let result = repository::fetch_session_page(&api, &fetch.query).await;
                (fetch.request, result)
            }
        });

        // Landed pages go through the epoch check; stale ones vanish whole.
        create_isomorphic_effect(move |_| {
            if let Some((request, result)) = load_action.value().get() {
                match result {
                    Ok(page) => accumulator.update(|acc| {
                        acc.complete(request.epoch, page);
                    }),
                    Err(err) => {
                        let mut current = false;
                        accumulator.update(|acc| current = acc.fail(request.epoch));
                        if current {
                            list_message.update(|msg| msg.set_error(err));
                        }
                    }
                }
            }
        });

        // Any server-relevant parameter change restarts from page 1 under a
        // new epoch. Runs once at creation for the initial load.
        let server_key = create_memo(move |_| filters.state().with(|state| state.server_query(1)));
        create_isomorphic_effect(move |_| {
            let _ = server_key.get();
            accumulator.update(|acc| {
                acc.reset();
            });
            list_message.update(|msg| msg.clear());
            request_next_page(accumulator, filters, load_action);
        });

        let rows = create_memo(move |_| {
            filters
                .state()
                .with(|state| accumulator.with(|acc| refine::derive(acc.sessions(), state)))
        });

        let window_plan = create_memo(move |_| {
            plan_window(
                rows.with(|rows| rows.len()),
                ROW_HEIGHT_PX,
                viewport.get(),
                DEFAULT_OVERSCAN,
            )
        });

        // Scroll-driven infinite load. begin_fetch refuses overlapping or
        // past-the-end requests, so firing this on every plan change is safe.
        create_isomorphic_effect(move |_| {
            let plan = window_plan.get();
            let visible = rows.with(|rows| rows.len());
            if near_end(&plan, visible, LOAD_MORE_THRESHOLD) {
                request_next_page(accumulator, filters, load_action);
            }
        });

        let detail = create_memo(move |_| {
            filters
                .state()
                .with(|state| state.detail.clone())
                .and_then(|id| rows.with(|rows| rows.iter().find(|s| s.id == id).cloned()))
        });

        let api_for_bulk = api.clone();
        let bulk_action = create_action(move |request: &BulkFeedbackRequest| {
            let api = api_for_bulk.clone();
            let request = request.clone();
            async move {
                repository::submit_bulk_feedback(&api, &request)
                    .await
                    .map(|_| request.session_ids.len())
            }
        });

        // On success the selection has served its purpose; on failure it is
        // kept so the user can retry without re-picking rows.
        create_isomorphic_effect(move |_| {
            if let Some(result) = bulk_action.value().get() {
                match result {
                    Ok(count) => {
                        selection.clear();
                        bulk_form.reset();
                        bulk_message.update(|msg| {
                            msg.set_success(format!("Feedback saved to {} sessions.", count))
                        });
                        accumulator.update(|acc| {
                            acc.reset();
                        });
                        request_next_page(accumulator, filters, load_action);
                    }
                    Err(err) => bulk_message.update(|msg| msg.set_error(err)),
                }
            }
        });

        // Created/updated events invalidate the whole accumulated collection.
        // A missing hub just means no live refresh.
        if let Some(hub) = use_context::<NotificationHub>() {
            hub.subscribe(move |_| {
                let reset = accumulator.try_update(|acc| {
                    acc.reset();
                });
                if reset.is_some() {
                    request_next_page(accumulator, filters, load_action);
                }
            });
        }

        Self {
            api,
            filters,
            accumulator,
            selection,
            viewport,
            rows,
            window_plan,
            detail,
            load_action,
            bulk_action,
            bulk_form,
            list_message,
            bulk_message,
        }
    }

    pub fn update_filters(&self, patch: FilterPatch) {
        self.filters.update(patch);
    }

    pub fn set_viewport(&self, scroll_top: f64, height: f64) {
        self.viewport.set(Viewport { scroll_top, height });
    }

    pub fn is_loading(&self) -> bool {
        self.accumulator.with(|acc| acc.is_loading())
    }

    pub fn loaded_of_total(&self) -> (usize, Option<usize>) {
        self.accumulator.with(|acc| (acc.loaded(), acc.total()))
    }

    /// Opens the detail pane for `id`, or closes it when already open.
    pub fn toggle_detail(&self, id: &str) {
        let current = self.filters.state().with_untracked(|state| state.detail.clone());
        let next = if current.as_deref() == Some(id) {
            None
        } else {
            Some(id.to_string())
        };
        self.filters.update(FilterPatch {
            detail: Some(next),
            ..Default::default()
        });
    }

    pub fn retry_failed_fetch(&self) {
        self.list_message.update(|msg| msg.clear());
        request_next_page(self.accumulator, self.filters, self.load_action);
    }

    pub fn submit_feedback(&self) {
        match self.bulk_form.to_payload(self.selection.ids()) {
            Ok(payload) => {
                self.bulk_message.update(|msg| msg.clear());
                self.bulk_action.dispatch(payload);
            }
            Err(err) => self.bulk_message.update(|msg| msg.set_error(err)),
        }
    }
}

fn request_next_page(accumulator: RwSignal<PageAccumulator>, filters: FilterStore, load: LoadAction) {
    let claimed = accumulator
        .try_update(|acc| acc.begin_fetch())
        .and_then(|request| request);
    let Some(request) = claimed else {
        return;
    };
    let query = filters
        .state()
        .with_untracked(|state| state.server_query(request.page));
    load.dispatch(PageFetch { request, query });
}

pub fn use_sessions_view_model() -> SessionsViewModel {
    match use_context::<SessionsViewModel>() {
        Some(vm) => vm,
        None => {
            let vm = SessionsViewModel::new();
            provide_context(vm.clone());
            vm
        }
    }
}
