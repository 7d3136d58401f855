use crate::{
    api::gateway,
    components::nav_item::{LogoutItem, NavItem},
    models::app_state::AppState,
    routes::Route,
};
use i18nrs::yew::use_translation;
use yew::prelude::*;
use yew_icons::{Icon, IconId};
use yew_router::prelude::{Link, use_navigator};
use yewdux::prelude::use_store;

#[derive(Properties, PartialEq)]
pub struct NavbarProps {
    #[prop_or_default]
    pub current_route: Option<Route>,
}

#[function_component(Navbar)]
pub fn navbar(props: &NavbarProps) -> Html {
    let (i18n, ..) = use_translation();
    let (state, dispatch) = use_store::<AppState>();
    let navigator = use_navigator();
    let menu_open = use_state(|| false);

    let on_logout = {
        let menu_open = menu_open.clone();
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            let gateway = gateway();
            if let Err(err) = gateway.session().logout() {
                log::error!("logout failed: {err}");
            }
            dispatch.set(AppState::from_store(gateway.session()));
            menu_open.set(false);
            if let Some(navigator) = &navigator {
                navigator.push(&Route::Login);
            }
        })
    };

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(!*menu_open))
    };

    let render_routes = |routes: &[Route]| -> Html {
        html! {
            <>
                { for routes.iter().map(|route| html! {
                    <NavItem current_route={props.current_route.clone()} route={route.clone()} />
                }) }
                if state.logged_in {
                    <LogoutItem onclick={on_logout.clone()} />
                }
            </>
        }
    };
    let routes = Route::nav_routes(state.logged_in);

    html! {
        <nav class="navbar justify-between bg-base-300">
            <Link<Route> to={Route::Home} classes="btn btn-ghost text-lg">
                {i18n.t("app.title")}
            </Link<Route>>
            <div class="sm:hidden">
                <button class="btn btn-soft" aria-label={i18n.t("nav.menu")} onclick={toggle_menu}>
                    <Icon
                        icon_id={if *menu_open { IconId::HeroiconsOutlineXMark } else { IconId::HeroiconsOutlineBars3 }}
                        class="w-6 h-6"
                    />
                </button>
                if *menu_open {
                    <ul class="menu absolute right-2 z-[1] bg-base-200 p-6 rounded-box shadow w-56 gap-2">
                        {render_routes(&routes)}
                    </ul>
                }
            </div>
            <ul class="hidden menu sm:menu-horizontal gap-1">
                {render_routes(&routes)}
            </ul>
        </nav>
    }
}
