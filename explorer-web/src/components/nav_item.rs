use crate::routes::Route;
use i18nrs::yew::use_translation;
use yew::{Callback, Html, Properties, classes, function_component, html};
use yew_icons::{Icon, IconId};
use yew_router::prelude::Link;

#[derive(Properties, PartialEq, Eq)]
pub struct NavItemProps {
    pub route: Route,
    pub current_route: Option<Route>,
}

fn icon_for(route: &Route) -> IconId {
    match route {
        Route::Login => IconId::HeroiconsOutlineArrowRightOnRectangle,
        Route::Register => IconId::HeroiconsOutlineUserPlus,
        Route::ImageGen => IconId::HeroiconsOutlinePhoto,
        Route::Dashboard => IconId::HeroiconsOutlineChartBar,
        Route::Home | Route::Search | Route::NotFound => IconId::HeroiconsOutlineMagnifyingGlass,
    }
}

#[function_component(NavItem)]
pub fn nav_item(props: &NavItemProps) -> Html {
    let (i18n, ..) = use_translation();

    let active_route_class = if props.current_route.as_ref() == Some(&props.route) {
        "btn-soft"
    } else {
        ""
    };

    html! {
      <li>
          <Link<Route> to={props.route.clone()} classes={classes!("btn", "btn-ghost", "gap-2", active_route_class)}>
              <Icon icon_id={icon_for(&props.route)} class="w-5 h-5" />
              {i18n.t(props.route.label_key())}
          </Link<Route>>
      </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct LogoutItemProps {
    pub onclick: Callback<yew::MouseEvent>,
}

#[function_component(LogoutItem)]
pub fn logout_item(props: &LogoutItemProps) -> Html {
    let (i18n, ..) = use_translation();

    html! {
        <li>
            <a class="btn btn-ghost gap-2" onclick={props.onclick.clone()}>
                <Icon icon_id={IconId::HeroiconsOutlineArrowLeftOnRectangle} class="w-5 h-5" />
                {i18n.t("nav.logout")}
            </a>
        </li>
    }
}
