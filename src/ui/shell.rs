use dioxus::prelude::*;

use crate::app::{sign_out, Route};
use crate::domain::{AppState, ShipFormKind};
use crate::infra::api::ApiClient;
use crate::ui::pages::LoginPage;
use crate::ui::theme;
use crate::util::{
    assets,
    i18n::t,
    version::{version_label, APP_NAME},
};

#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let client = use_context::<ApiClient>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    // Every page behind the sidebar needs a session.
    if !state.with(AppState::is_authenticated) {
        return rsx! { LoginPage {} };
    }

    let version = version_label();
    let is_admin = state.with(AppState::is_admin);
    let user_email = state.with(|st| {
        st.session
            .as_ref()
            .and_then(|session| session.claims())
            .map(|claims| claims.email)
            .unwrap_or_default()
    });

    let form_links = [
        (ShipFormKind::Ours, Route::AddOurShip {}),
        (ShipFormKind::Agent, Route::AddAgentShip {}),
        (ShipFormKind::Fleet, Route::AddFleet {}),
    ]
    .into_iter()
    .map(|(kind, route)| (t(kind.title_key()), current_route == route, route))
    .collect::<Vec<_>>();

    rsx! {
        div { class: "layout",
            aside { class: "sidebar",
                div { class: "brand",
                    img { src: assets::logo_data_uri(), alt: "{APP_NAME}" }
                    span { "{APP_NAME}" }
                }
                for (label, active, route) in form_links {
                    NavButton {
                        active,
                        label,
                        onclick: move |_| { nav.push(route.clone()); },
                    }
                }
                hr {}
                NavButton {
                    active: matches!(current_route, Route::Report {} | Route::UpdateShip { .. }),
                    label: t("common.report"),
                    onclick: move |_| { nav.push(Route::Report {}); },
                }
                NavButton {
                    active: matches!(current_route, Route::FleetsReport {}),
                    label: t("common.fleetsReport"),
                    onclick: move |_| { nav.push(Route::FleetsReport {}); },
                }
                div { class: "footer",
                    if is_admin {
                        NavButton {
                            active: matches!(current_route, Route::Users {}),
                            label: t("common.manageUsers"),
                            onclick: move |_| { nav.push(Route::Users {}); },
                        }
                    }
                    p { "{user_email}" }
                    button {
                        class: theme::btn_small(),
                        onclick: move |_| {
                            sign_out(state, &client);
                            nav.replace(Route::Login {});
                        },
                        {t("common.logout")}
                    }
                    p { "{version}" }
                }
            }
            main { class: "content",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, label: String, onclick: EventHandler<()>) -> Element {
    rsx! {
        button {
            class: theme::nav_link(active),
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
