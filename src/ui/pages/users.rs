use dioxus::prelude::*;
use tracing::info;

use crate::app::report_api_error;
use crate::domain::schema::validate_user;
use crate::domain::users::{RoleDto, UserDto, UserForm, UserFormMode};
use crate::domain::{AppState, ValidationErrors};
use crate::infra::api::ApiClient;
use crate::ui::components::data_table::DataTable;
use crate::ui::components::fields::{SelectField, TextField};
use crate::ui::components::modal::ConfirmDialog;
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::pages::report::ListFreshness;
use crate::ui::theme;
use crate::util::i18n::t;

fn role_code(roles: &[RoleDto], id: &str) -> String {
    roles
        .iter()
        .find(|role| role.id == id)
        .map(|role| role.code.clone())
        .unwrap_or_default()
}

fn role_id(roles: &[RoleDto], code: &str) -> String {
    roles
        .iter()
        .find(|role| role.code == code)
        .map(|role| role.id.clone())
        .unwrap_or_default()
}

fn edit_user_form(mut form: Signal<UserForm>, apply: impl FnOnce(&mut UserForm)) {
    form.with_mut(apply);
}

/// Administrator-only user management.
#[component]
pub fn UsersPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    if !state.read().is_admin() {
        return rsx! {
            h1 { class: "page-title", {t("pages.users.title")} }
            section { class: theme::panel(),
                p { class: "muted", "Only administrators can manage users." }
            }
        };
    }
    rsx! { UserManager {} }
}

#[component]
fn UserManager() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();

    let mut reload = use_signal(|| 0u32);
    let mut form = use_signal(UserForm::default);
    let mut errors = use_signal(ValidationErrors::default);
    let mut busy = use_signal(|| false);
    let mut deleting = use_signal(|| None::<UserDto>);

    let users = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            let _round = reload();
            async move {
                let result = client.get_users().await;
                if let Err(err) = &result {
                    report_api_error(state, toasts, &client, "Failed to load users", err);
                }
                result.ok()
            }
        }
    });

    let roles = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move {
                match client.get_roles().await {
                    Ok(payload) => payload.data,
                    Err(err) => {
                        report_api_error(state, toasts, &client, "Failed to load roles", &err);
                        Vec::new()
                    }
                }
            }
        }
    });

    let loaded = users.read().clone();
    let loading = loaded.is_none();
    let payload = loaded.flatten();
    let list = payload.as_ref().map(|p| p.data.clone()).unwrap_or_default();
    let freshness = payload.map(|p| (p.status, p.fetched_at));
    let is_empty = list.is_empty();

    let role_list = roles.read().clone().unwrap_or_default();
    let role_codes = role_list.iter().map(|role| role.code.clone()).collect::<Vec<_>>();
    let current = form();
    let mode = current.mode();
    let selected_role = role_code(&role_list, &current.role_id);
    let current_errors = errors();
    let error = |path: &str| current_errors.for_path(path).map(str::to_string);
    let first_name_error = error("firstName");
    let last_name_error = error("lastName");
    let email_error = error("email");
    let password_error = error("password");
    let role_error = error("roleId");
    let (form_title, submit_label) = match mode {
        UserFormMode::Create => (t("pages.users.create"), t("common.submit")),
        UserFormMode::Update => (current.email.clone(), t("common.update")),
    };
    let password_hint = match mode {
        UserFormMode::Create => String::new(),
        UserFormMode::Update => String::from("Leave blank to keep the current password"),
    };
    let headers = vec![
        t("form.firstName.label"),
        t("form.lastName.label"),
        t("form.email.label"),
        t("form.role.label"),
        t("common.actions"),
    ];

    let on_submit = {
        let client = client.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let snapshot = form();
            let mode = snapshot.mode();
            let request = match validate_user(&snapshot, mode) {
                Ok(request) => request,
                Err(found) => {
                    errors.set(found);
                    return;
                }
            };
            errors.set(ValidationErrors::default());
            busy.set(true);
            let client = client.clone();
            spawn(async move {
                let outcome = match &snapshot.id {
                    Some(id) => client.update_user(id, &request).await,
                    None => client.create_user(&request).await.map(|_| ()),
                };
                match outcome {
                    Ok(()) => {
                        let message = match mode {
                            UserFormMode::Create => "User created successfully",
                            UserFormMode::Update => "User updated successfully",
                        };
                        info!("{message}: {}", request.email);
                        push_toast(toasts, ToastKind::Success, message);
                        form.set(UserForm::default());
                        reload += 1;
                    }
                    Err(err) => report_api_error(state, toasts, &client, "Failed to save user", &err),
                }
                busy.set(false);
            });
        }
    };

    rsx! {
        h1 { class: "page-title", {t("pages.users.title")} }
        section { class: theme::panel(),
            h2 { "{form_title}" }
            form { onsubmit: on_submit,
                div { class: "grid",
                    TextField {
                        label: t("form.firstName.label"),
                        value: current.first_name.clone(),
                        error: first_name_error,
                        oninput: move |value: String| edit_user_form(form, |f| f.first_name = value),
                    }
                    TextField {
                        label: t("form.lastName.label"),
                        value: current.last_name.clone(),
                        error: last_name_error,
                        oninput: move |value: String| edit_user_form(form, |f| f.last_name = value),
                    }
                    TextField {
                        label: t("form.email.label"),
                        value: current.email.clone(),
                        input_type: "email",
                        error: email_error,
                        oninput: move |value: String| edit_user_form(form, |f| f.email = value),
                    }
                    TextField {
                        label: t("form.password.label"),
                        value: current.password.clone(),
                        input_type: "password",
                        placeholder: password_hint,
                        error: password_error,
                        oninput: move |value: String| edit_user_form(form, |f| f.password = value),
                    }
                    SelectField {
                        label: t("form.role.label"),
                        value: selected_role,
                        options: role_codes,
                        error: role_error,
                        onchange: move |code: String| {
                            let id = role_id(&role_list, &code);
                            edit_user_form(form, |f| f.role_id = id);
                        },
                    }
                }
                div { class: "row",
                    span { class: "spacer" }
                    if mode == UserFormMode::Update {
                        button {
                            class: theme::btn(),
                            r#type: "button",
                            disabled: busy(),
                            onclick: move |_| {
                                form.set(UserForm::default());
                                errors.set(ValidationErrors::default());
                            },
                            {t("common.cancel")}
                        }
                    }
                    button { class: theme::btn_primary(), r#type: "submit", disabled: busy(), "{submit_label}" }
                }
            }
        }

        if let Some((status, fetched_at)) = freshness {
            ListFreshness { status, fetched_at, reload }
        }

        DataTable { headers, loading, is_empty,
            for user in list {
                UserTableRow {
                    key: "{user.id}",
                    user: user.clone(),
                    on_edit: move |picked: UserDto| {
                        form.set(UserForm::edit(&picked));
                        errors.set(ValidationErrors::default());
                    },
                    on_delete: move |picked: UserDto| deleting.set(Some(picked)),
                }
            }
        }

        if let Some(user) = deleting() {
            DeleteUserDialog {
                user,
                on_close: move |_| deleting.set(None),
                on_deleted: move |_| {
                    deleting.set(None);
                    reload += 1;
                },
            }
        }
    }
}

#[component]
fn UserTableRow(user: UserDto, on_edit: EventHandler<UserDto>, on_delete: EventHandler<UserDto>) -> Element {
    let for_edit = user.clone();
    let for_delete = user.clone();
    rsx! {
        tr {
            td { "{user.first_name}" }
            td { "{user.last_name}" }
            td { "{user.email}" }
            td { "{user.role.code}" }
            td {
                div { class: "row",
                    button {
                        class: theme::btn_small(),
                        onclick: move |_| on_edit.call(for_edit.clone()),
                        {t("common.edit")}
                    }
                    button {
                        class: theme::btn_small_danger(),
                        onclick: move |_| on_delete.call(for_delete.clone()),
                        {t("common.delete")}
                    }
                }
            }
        }
    }
}

#[component]
fn DeleteUserDialog(user: UserDto, on_close: EventHandler<()>, on_deleted: EventHandler<()>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();
    let mut busy = use_signal(|| false);

    let title = format!("{} {}", t("common.delete"), user.full_name());
    let id = user.id.clone();

    rsx! {
        ConfirmDialog {
            title,
            message: t("pages.users.confirmDelete"),
            busy: busy(),
            danger: true,
            on_cancel: move |_| on_close.call(()),
            on_confirm: move |_| {
                let client = client.clone();
                let id = id.clone();
                busy.set(true);
                spawn(async move {
                    match client.delete_user(&id).await {
                        Ok(()) => {
                            info!("Deleted user {id}");
                            push_toast(toasts, ToastKind::Success, "User deleted successfully");
                            on_deleted.call(());
                        }
                        Err(err) => {
                            report_api_error(state, toasts, &client, "Failed to delete user", &err);
                            busy.set(false);
                        }
                    }
                });
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn roles_map_between_code_and_id() {
        let roles = vec![
            RoleDto {
                id: "r-1".into(),
                code: "ADMIN".into(),
            },
            RoleDto {
                id: "r-2".into(),
                code: "AGENT".into(),
            },
        ];
        assert_eq!(role_code(&roles, "r-2"), "AGENT");
        assert_eq!(role_id(&roles, "ADMIN"), "r-1");
        assert_eq!(role_code(&roles, "missing"), "");
    }
}
