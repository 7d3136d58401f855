use i18nrs::yew::use_translation;
use yew::{Html, function_component, html};

#[function_component(Loading)]
pub fn loading() -> Html {
    let (i18n, ..) = use_translation();

    html! {
        <div class="flex flex-col items-center justify-center h-full animate-fadeIn">
            <div class="bg-base-200 p-6 rounded-lg shadow-md flex flex-col items-center">
                <div class="text-xl font-medium">{i18n.t("app.title")}</div>
                <div class="mt-3 flex items-center gap-2">
                    <span>{i18n.t("app.loading")}</span>
                    <span class="loading loading-dots loading-sm"></span>
                </div>
            </div>
        </div>
    }
}
