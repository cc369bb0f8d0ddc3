use dioxus::prelude::*;
use tracing::{info, warn};

use crate::app::{persist_user_state, Route};
use crate::domain::auth::LoginForm;
use crate::domain::schema::validate_login;
use crate::domain::{AppState, Session, ValidationErrors};
use crate::infra::api::ApiClient;
use crate::ui::components::fields::TextField;
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::theme;
use crate::util::{assets, i18n::t};

#[component]
pub fn LoginPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();
    let nav = use_navigator();

    let mut form = use_signal(|| LoginForm::remembered(state.peek().remembered_username.as_deref()));
    let mut errors = use_signal(ValidationErrors::default);
    let mut busy = use_signal(|| false);

    use_effect(move || {
        if state.read().is_authenticated() {
            nav.replace(Route::AddOurShip {});
        }
    });

    let email_error = errors.read().for_path("email").map(str::to_string);
    let password_error = errors.read().for_path("password").map(str::to_string);
    let current = form();

    rsx! {
        div { class: "login",
            form {
                class: theme::panel(),
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    let client = client.clone();
                    let current = form();
                    if let Err(found) = validate_login(&current) {
                        errors.set(found);
                        return;
                    }
                    errors.set(ValidationErrors::default());
                    busy.set(true);
                    spawn(async move {
                        match client.login(&current.request()).await {
                            Ok(response) => {
                                let session = Session {
                                    access_token: response.access_token.clone(),
                                    remember: current.remember_me,
                                };
                                client.set_token(Some(response.access_token)).await;
                                state.with_mut(|st| st.login(session, &current.email));
                                persist_user_state(&state);
                                info!("Signed in as {}", current.email);
                                nav.replace(Route::AddOurShip {});
                            }
                            Err(err) => {
                                warn!("Login failed: {err}");
                                push_toast(toasts, ToastKind::Error, err.to_string());
                                busy.set(false);
                            }
                        }
                    });
                },
                img { src: assets::logo_data_uri(), alt: "logo" }
                h1 { {t("pages.login.title")} }
                p { class: "muted", {t("pages.login.subtitle")} }
                TextField {
                    label: t("form.email.label"),
                    value: current.email,
                    input_type: "email",
                    error: email_error,
                    oninput: move |value: String| form.with_mut(|f| f.email = value),
                }
                TextField {
                    label: t("form.password.label"),
                    value: current.password,
                    input_type: "password",
                    error: password_error,
                    oninput: move |value: String| form.with_mut(|f| f.password = value),
                }
                label { class: "row",
                    input {
                        r#type: "checkbox",
                        checked: current.remember_me,
                        onchange: move |evt| form.with_mut(|f| f.remember_me = evt.checked()),
                    }
                    {t("form.keepSignedIn")}
                }
                button { class: theme::btn_primary(), r#type: "submit", disabled: busy(),
                    if busy() { {t("common.loading")} } else { {t("common.login")} }
                }
            }
        }
    }
}
