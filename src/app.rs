use dioxus::prelude::*;
use tracing::{error, info, warn};

use crate::{
    domain::{AppState, ShipFormKind},
    infra::{
        api::{ApiClient, ApiError},
        downloads::save_download,
    },
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{FleetsReportPage, LoginPage, ReportPage, ShipFormPage, UpdateShipPage, UsersPage},
        shell::Shell,
    },
    util::{
        assets,
        config::AppConfig,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Login {},
    #[route("/dashboard")]
    AddOurShip {},
    #[route("/add-agent-ship")]
    AddAgentShip {},
    #[route("/add-fleet")]
    AddFleet {},
    #[route("/report")]
    Report {},
    #[route("/report/update/:id")]
    UpdateShip { id: String },
    #[route("/fleets-report")]
    FleetsReport {},
    #[route("/users")]
    Users {},
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    let client = use_hook({
        let mut state = state;
        move || {
            let persisted = load_persisted_state().unwrap_or_default();
            let config = AppConfig::load(persisted.api_base_url.as_deref());
            let token = persisted
                .session
                .as_ref()
                .map(|session| session.access_token.clone());
            state.with_mut(|st| st.apply_persisted(persisted));
            ApiClient::with_base_url(&config.api_base_url)
                .map(|client| client.with_ttl(config.cache_ttl).with_token(token))
                .map_err(|err| err.to_string())
        }
    });
    use_context_provider(|| state);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let css = assets::main_css();
    rsx! {
        document::Link { rel: "icon", href: assets::logo_data_uri() }
        document::Style { "{css}" }
        match client {
            Ok(client) => rsx! { Desk { client } },
            Err(message) => rsx! { StartupError { message } },
        }
        Toast {}
    }
}

/// Provides the API client to every route.
#[component]
fn Desk(client: ApiClient) -> Element {
    use_context_provider(|| client.clone());
    rsx! { Router::<Route> {} }
}

#[component]
fn StartupError(message: String) -> Element {
    rsx! {
        div { class: "login",
            div { class: "panel",
                h2 { "Cannot reach the configured API" }
                p { "{message}" }
                p { class: "muted", "Set MARINER_API_BASE_URL to a valid URL and restart." }
            }
        }
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        warn!("Failed to persist user state: {err}");
    }
}

/// Ends the session locally and forgets the token and every cached query.
pub fn sign_out(mut state: Signal<AppState>, client: &ApiClient) {
    state.with_mut(AppState::logout);
    persist_user_state(&state);
    let client = client.clone();
    spawn(async move {
        client.set_token(None).await;
        client.invalidate().await;
    });
    info!("Signed out");
}

/// Turns a failed call into a toast. An expired session signs the user out.
pub fn report_api_error(
    state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    client: &ApiClient,
    action: &str,
    err: &ApiError,
) {
    if err.is_unauthorized() {
        sign_out(state, client);
        push_toast(toasts, ToastKind::Warning, err.to_string());
    } else {
        push_toast(toasts, ToastKind::Error, format!("{action}: {err}"));
    }
}

/// Saves an exported PDF to the downloads folder and reports the outcome.
pub fn deliver_pdf(
    state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    client: &ApiClient,
    file_name: &str,
    exported: Result<Vec<u8>, ApiError>,
) {
    let bytes = match exported {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("PDF export failed: {err}");
            report_api_error(state, toasts, client, "Failed to export PDF", &err);
            return;
        }
    };
    match save_download(file_name, &bytes) {
        Ok(path) => {
            info!("Saved {}", path.display());
            push_toast(
                toasts,
                ToastKind::Success,
                format!("PDF exported successfully to {}", path.display()),
            );
        }
        Err(err) => {
            error!("Could not save {file_name}: {err}");
            push_toast(toasts, ToastKind::Error, format!("Failed to save PDF: {err}"));
        }
    }
}

#[component]
fn Login() -> Element {
    rsx! { LoginPage {} }
}

#[component]
fn AddOurShip() -> Element {
    rsx! { Shell { ShipFormPage { kind: ShipFormKind::Ours } } }
}

#[component]
fn AddAgentShip() -> Element {
    rsx! { Shell { ShipFormPage { kind: ShipFormKind::Agent } } }
}

#[component]
fn AddFleet() -> Element {
    rsx! { Shell { ShipFormPage { kind: ShipFormKind::Fleet } } }
}

#[component]
fn Report() -> Element {
    rsx! { Shell { ReportPage {} } }
}

#[component]
fn UpdateShip(id: String) -> Element {
    rsx! { Shell { UpdateShipPage { id } } }
}

#[component]
fn FleetsReport() -> Element {
    rsx! { Shell { FleetsReportPage {} } }
}

#[component]
fn Users() -> Element {
    rsx! { Shell { UsersPage {} } }
}
