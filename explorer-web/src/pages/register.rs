use crate::{api::gateway, routes::Route};
use i18nrs::yew::use_translation;
use shared::models::Credentials;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::{Link, use_navigator};

#[function_component(RegisterPage)]
pub fn register_page() -> Html {
    let (i18n, ..) = use_translation();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let navigator = use_navigator();

    let onsubmit = {
        let email_handle = email.clone();
        let password_handle = password.clone();
        let error_handle = error.clone();
        let loading_handle = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let credentials = Credentials::new((*email_handle).clone(), (*password_handle).clone());
            loading_handle.set(true);
            error_handle.set(None);
            let loading_ref = loading_handle.clone();
            let error_ref = error_handle.clone();
            let navigator_handle = navigator.clone();
            spawn_local(async move {
                let result = gateway().register(&credentials).await;
                loading_ref.set(false);
                match result {
                    Ok(_) => {
                        if let Some(ref nav) = navigator_handle {
                            nav.push(&Route::Login);
                        }
                    }
                    Err(err) => error_ref.set(Some(err.message())),
                }
            });
        })
    };

    let on_email_change = {
        let email = email.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                email.set(input.value());
            }
        })
    };

    let on_password_change = {
        let password = password.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                password.set(input.value());
            }
        })
    };

    let is_busy = *loading;
    let disable_submit = (*email).is_empty() || (*password).is_empty() || is_busy;

    html! {
        <div class="flex items-center justify-center min-h-[70vh]">
            <div class="card w-full max-w-md shadow-lg bg-base-200">
                <form class="card-body" onsubmit={onsubmit}>
                    <h2 class="card-title text-2xl">{i18n.t("register.title")}</h2>
                    if let Some(message) = &*error {
                        <div class="alert alert-error">
                            <span>{message.clone()}</span>
                        </div>
                    }
                    <div class="form-control">
                        <label class="label" for="email">
                            <span class="label-text">{i18n.t("login.email")}</span>
                        </label>
                        <input
                            id="email"
                            class="input input-bordered"
                            type="email"
                            required=true
                            value={(*email).clone()}
                            oninput={on_email_change}
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="password">
                            <span class="label-text">{i18n.t("login.password")}</span>
                        </label>
                        <input
                            id="password"
                            class="input input-bordered"
                            type="password"
                            required=true
                            value={(*password).clone()}
                            oninput={on_password_change}
                        />
                    </div>
                    <div class="form-control mt-6">
                        <button class="btn btn-primary" type="submit" disabled={disable_submit}>
                            {if is_busy { i18n.t("register.busy") } else { i18n.t("register.submit") }}
                        </button>
                    </div>
                    <p class="text-sm">
                        {i18n.t("register.have_account")}{" "}
                        <Link<Route> to={Route::Login} classes="link link-primary">
                            {i18n.t("nav.login")}
                        </Link<Route>>
                    </p>
                </form>
            </div>
        </div>
    }
}
