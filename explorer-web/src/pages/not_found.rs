use crate::routes::Route;
use i18nrs::yew::use_translation;
use yew::{Html, function_component, html};
use yew_router::prelude::Link;

/// Shown for any path that matches no route.
#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    let (i18n, _) = use_translation();

    html! {
        <div class="p-4 space-y-6 text-center">
            <h1 class="text-2xl font-bold">{ i18n.t("not_found.title") }</h1>
            <p>{ i18n.t("not_found.description") }</p>
            <Link<Route> to={Route::Search} classes="btn btn-primary">
                { i18n.t("not_found.home") }
            </Link<Route>>
        </div>
    }
}
