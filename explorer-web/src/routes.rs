use crate::{containers::layout::Layout, models::app_state::AppState, pages::*};
use strum::{EnumIter, IntoEnumIterator};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

/// The app routes.
#[derive(Debug, Clone, PartialEq, Eq, Routable, EnumIter)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/search")]
    Search,
    #[at("/image")]
    ImageGen,
    #[at("/dashboard")]
    Dashboard,
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// What to do with a requested route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
}

impl Route {
    /// Whether the route needs a signed-in user.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Search | Self::ImageGen | Self::Dashboard)
    }

    /// Translation key of the navbar label.
    pub fn label_key(&self) -> &'static str {
        match self {
            Self::Home | Self::Search => "nav.search",
            Self::Login => "nav.login",
            Self::Register => "nav.register",
            Self::ImageGen => "nav.image",
            Self::Dashboard => "nav.dashboard",
            Self::NotFound => "not_found.title",
        }
    }

    /// Links shown in the navbar.
    pub fn nav_routes(logged_in: bool) -> Vec<Route> {
        Self::iter()
            .filter(|route| match route {
                Self::Login | Self::Register => !logged_in,
                Self::Search | Self::ImageGen | Self::Dashboard => logged_in,
                Self::Home | Self::NotFound => false,
            })
            .collect()
    }

    /// Apply the route guard.
    pub fn resolve(self, logged_in: bool) -> Resolution {
        match self {
            Self::Home => Resolution::Redirect(Self::Search),
            Self::Login if logged_in => Resolution::Redirect(Self::Dashboard),
            route if route.requires_auth() && !logged_in => Resolution::Redirect(Self::Login),
            route => Resolution::Render(route),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct RouteViewProps {
    pub route: Route,
}

#[function_component(RouteView)]
fn route_view(props: &RouteViewProps) -> Html {
    let logged_in = use_selector(|state: &AppState| state.logged_in);

    let route = match props.route.clone().resolve(*logged_in) {
        Resolution::Redirect(to) => return html! { <Redirect<Route> to={to} /> },
        Resolution::Render(route) => route,
    };

    let page = match route {
        Route::Login => html! { <LoginPage /> },
        Route::Register => html! { <RegisterPage /> },
        Route::Search => html! { <SearchPage /> },
        Route::ImageGen => html! { <ImageGenPage /> },
        Route::Dashboard => html! { <DashboardPage /> },
        Route::Home | Route::NotFound => html! { <NotFoundPage /> },
    };

    html! {
        <Layout current_route={Some(route)}>
            {page}
        </Layout>
    }
}

/// Switch function for the app routes.
pub fn switch(route: Route) -> Html {
    log::debug!("switching to route {route:?}");
    html! { <RouteView {route} /> }
}
