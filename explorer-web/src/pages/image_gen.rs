use crate::api::{gateway, is_current};
use crate::models::history_list::{HistoryAction, HistoryList};
use i18nrs::yew::use_translation;
use shared::models::ImageHistoryItem;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(ImageGenPage)]
pub fn image_gen_page() -> Html {
    let (i18n, ..) = use_translation();
    let prompt = use_state(String::new);
    let images = use_reducer(HistoryList::<ImageHistoryItem>::default);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    {
        let images = images.clone();
        use_effect_with((), move |_| {
            let generation = gateway().session().generation();
            spawn_local(async move {
                match gateway().image_history().await {
                    Ok(response) if is_current(generation) => {
                        images.dispatch(HistoryAction::Loaded(response.image_history));
                    }
                    Ok(_) => {}
                    Err(err) => log::error!("failed to load image history: {err}"),
                }
            });
            || ()
        });
    }

    let on_generate = {
        let prompt = prompt.clone();
        let images = images.clone();
        let error = error.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let text = prompt.trim().to_string();
            if text.is_empty() {
                return;
            }
            loading.set(true);
            error.set(None);
            let prompt = prompt.clone();
            let images = images.clone();
            let error = error.clone();
            let loading = loading.clone();
            let generation = gateway().session().generation();
            spawn_local(async move {
                let outcome = gateway().generate_image(&text).await;
                loading.set(false);
                if !is_current(generation) {
                    return;
                }
                match outcome {
                    Ok(image) => {
                        #[allow(clippy::cast_possible_truncation)]
                        let fallback_id = js_sys::Date::now() as i64;
                        images.dispatch(HistoryAction::Prepend(image.into_history_item(fallback_id)));
                        prompt.set(String::new());
                    }
                    Err(err) => error.set(Some(err.message())),
                }
            });
        })
    };

    let on_input = {
        let prompt = prompt.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                prompt.set(input.value());
            }
        })
    };

    let no_prompt = i18n.t("image.no_prompt");

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{i18n.t("image.title")}</h1>
            <form class="flex gap-2" onsubmit={on_generate}>
                <input
                    type="text"
                    class="input input-bordered flex-1"
                    placeholder={i18n.t("image.placeholder")}
                    value={(*prompt).clone()}
                    oninput={on_input}
                />
                <button class="btn btn-primary" type="submit" disabled={*loading}>
                    {if *loading { i18n.t("image.busy") } else { i18n.t("image.submit") }}
                </button>
            </form>
            if let Some(message) = &*error {
                <div class="alert alert-error"><span>{message.clone()}</span></div>
            }
            <h2 class="text-lg font-semibold">{i18n.t("image.history")}</h2>
            <div class="grid grid-cols-2 md:grid-cols-3 gap-4">
                if images.items.is_empty() {
                    <p class="text-base-content/60 col-span-full">{i18n.t("image.empty_history")}</p>
                } else {
                    { for images.items.iter().map(|image| {
                        let caption = image.prompt().unwrap_or(&no_prompt).to_string();
                        html! {
                            <div key={image.id} class="card bg-base-200 p-3 shadow">
                                if let Some(src) = image.source() {
                                    <img src={src.to_string()} alt={caption.clone()} class="rounded-xl" />
                                }
                                <p class="text-sm mt-2">{caption}</p>
                            </div>
                        }
                    }) }
                }
            </div>
        </div>
    }
}
