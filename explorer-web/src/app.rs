use crate::api::gateway;
use crate::components::loading::Loading;
use crate::models::app_state::AppState;
use crate::routes::{Route, switch};
use futures::StreamExt;
use wasm_bindgen_futures::spawn_local;
use yew::suspense::Suspense;
use yew::{Html, function_component, html, use_effect_with};
use yew_router::prelude::*;
use yewdux::prelude::use_store;

/// Translates gateway auth signals into state refreshes and navigation.
#[function_component(AuthWatcher)]
fn auth_watcher() -> Html {
    let (_state, dispatch) = use_store::<AppState>();
    let navigator = use_navigator();

    use_effect_with((), move |_| {
        let gateway = gateway();
        let mut signals = gateway.subscribe();
        spawn_local(async move {
            while let Some(signal) = signals.next().await {
                web_sys::console::warn_1(&format!("Session ended: {}", signal.message()).into());
                dispatch.set(AppState::from_store(gateway.session()));
                let target = Route::recognize(signal.redirect_to()).unwrap_or(Route::Login);
                if let Some(navigator) = &navigator {
                    navigator.push(&target);
                }
            }
        });
        || ()
    });

    html! {}
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <AuthWatcher />
            <Suspense fallback={ html!{ <Loading /> } }>
                <Switch<Route> render={switch} />
            </Suspense>
        </BrowserRouter>
    }
}
