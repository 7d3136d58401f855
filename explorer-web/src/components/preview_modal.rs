use i18nrs::yew::use_translation;
use shared::models::SearchHistoryItem;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PreviewModalProps {
    pub item: SearchHistoryItem,
    pub on_close: Callback<()>,
}

/// Full view of one past search and its stored results.
#[function_component(PreviewModal)]
pub fn preview_modal(props: &PreviewModalProps) -> Html {
    let (i18n, ..) = use_translation();
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div class="modal modal-open">
            <div class="modal-box max-w-2xl">
                <h3 class="font-bold text-lg">{&props.item.query}</h3>
                if let Some(timestamp) = &props.item.timestamp {
                    <p class="text-xs text-base-content/60">{timestamp}</p>
                }
                <ul class="mt-4 space-y-2">
                    { for props.item.results.iter().map(|entry| html! {
                        <li class="p-2 bg-base-200 rounded">
                            {entry.display_text()}
                        </li>
                    }) }
                </ul>
                <div class="modal-action">
                    <button class="btn" onclick={on_close}>{i18n.t("dashboard.close")}</button>
                </div>
            </div>
        </div>
    }
}
