use leptos::*;
use leptos_meta::*;
use leptos_router::*;

use crate::components::layout::Layout;
use crate::pages::{home::HomePage, SessionsPage};

pub const ROUTE_PATHS: &[&str] = &["/", "/sessions"];

#[cfg(target_arch = "wasm32")]
pub fn mount_app() {
    mount_to_body(app_root);
}

pub fn app_root() -> impl IntoView {
    provide_meta_context();
    provide_context(crate::api::ApiClient::new());

    let hub = crate::live::NotificationHub::new();
    #[cfg(target_arch = "wasm32")]
    crate::live::socket::start(hub.clone());
    provide_context(hub);

    view! {
        <Title text="PitchLab"/>
        <Router>
            <Layout>
                <Routes>
                    <Route path="/" view=HomePage/>
                    <Route path="/sessions" view=SessionsPage/>
                </Routes>
            </Layout>
        </Router>
    }
}
