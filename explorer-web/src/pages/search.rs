use crate::api::{gateway, is_current};
use i18nrs::yew::use_translation;
use shared::models::{ResultEntry, SearchHistoryItem};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(SearchPage)]
pub fn search_page() -> Html {
    let (i18n, ..) = use_translation();
    let query = use_state(String::new);
    let results = use_state(|| None::<Vec<ResultEntry>>);
    let history = use_state(Vec::<SearchHistoryItem>::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    {
        let history = history.clone();
        use_effect_with((), move |_| {
            let generation = gateway().session().generation();
            spawn_local(async move {
                match gateway().search_history().await {
                    Ok(response) if is_current(generation) => history.set(response.search_history),
                    Ok(_) => {}
                    Err(err) => log::error!("failed to load search history: {err}"),
                }
            });
            || ()
        });
    }

    let on_search = {
        let query = query.clone();
        let results = results.clone();
        let error = error.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let text = query.trim().to_string();
            if text.is_empty() {
                return;
            }
            loading.set(true);
            error.set(None);
            let results = results.clone();
            let error = error.clone();
            let loading = loading.clone();
            let generation = gateway().session().generation();
            spawn_local(async move {
                let outcome = gateway().search(&text).await;
                loading.set(false);
                if !is_current(generation) {
                    return;
                }
                match outcome {
                    Ok(response) => results.set(Some(response.results)),
                    Err(err) => {
                        results.set(Some(Vec::new()));
                        error.set(Some(err.message()));
                    }
                }
            });
        })
    };

    let on_input = {
        let query = query.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                query.set(input.value());
            }
        })
    };

    let render_results = match &*results {
        None => html! {},
        Some(entries) if entries.is_empty() => html! {
            <p class="text-base-content/60">{i18n.t("search.no_results")}</p>
        },
        Some(entries) => html! {
            <ul class="space-y-2">
                { for entries.iter().map(|entry| html! {
                    <li class="card bg-base-200 p-3 text-sm shadow">{entry.display_text()}</li>
                }) }
            </ul>
        },
    };

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{i18n.t("search.title")}</h1>
            <form class="flex gap-2" onsubmit={on_search}>
                <input
                    type="text"
                    class="input input-bordered flex-1"
                    placeholder={i18n.t("search.placeholder")}
                    value={(*query).clone()}
                    oninput={on_input}
                />
                <button class="btn btn-primary" type="submit" disabled={*loading}>
                    {if *loading { i18n.t("search.busy") } else { i18n.t("search.submit") }}
                </button>
            </form>
            if let Some(message) = &*error {
                <div class="alert alert-error"><span>{message.clone()}</span></div>
            }
            <section class="space-y-2">
                <h2 class="text-lg font-semibold">{i18n.t("search.results")}</h2>
                {render_results}
            </section>
            <section class="space-y-2">
                <h2 class="text-lg font-semibold">{i18n.t("search.history")}</h2>
                if history.is_empty() {
                    <p class="text-base-content/60">{i18n.t("search.empty_history")}</p>
                } else {
                    <ul class="space-y-1">
                        { for history.iter().map(|item| html! {
                            <li key={item.id} class="text-sm">
                                <span class="font-medium">{&item.query}</span>
                                if let Some(snippet) = item.first_snippet() {
                                    <span class="text-base-content/60">{": "}{snippet}</span>
                                }
                            </li>
                        }) }
                    </ul>
                }
            </section>
        </div>
    }
}
