//! Create and update forms for ships, agent ships and fleet entries.

use dioxus::prelude::*;
use time::OffsetDateTime;
use tracing::{error, info};

use crate::app::{report_api_error, Route};
use crate::domain::catalog::{ship_type_options, BOARDING_PORTS, COUNTRIES, SHIP_STATUSES};
use crate::domain::form::PersonnelContactForm;
use crate::domain::schema::document_messages;
use crate::domain::ship::{DocumentKind, GetFournisseursFilter, GetReceiversFilter};
use crate::domain::{
    ship_dto_to_form, ship_form_to_dto, AppState, ContactRole, ShipForm, ShipFormKind,
    ShipFormLayout, ShipSchema, UploadFile, ValidationErrors,
};
use crate::infra::api::ApiClient;
use crate::ui::components::cargo_section::CargoSection;
use crate::ui::components::contact_card::ContactCard;
use crate::ui::components::documents::{DocumentInput, StoredDocuments};
use crate::ui::components::fields::{DateTimeField, SelectField, TextAreaField, TextField};
use crate::ui::components::modal::ConfirmDialog;
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::theme;
use crate::util::i18n::t;

fn static_options(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[component]
pub fn ShipFormPage(kind: ShipFormKind) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();
    let nav = use_navigator();

    let mut form = use_signal(|| ShipForm::new(kind));
    let mut errors = use_signal(ValidationErrors::default);
    let mut busy = use_signal(|| false);

    let on_submit = move |_: ()| {
        let client = client.clone();
        let current = form();
        if let Err(found) = ShipSchema::for_fleet(kind.is_fleet()).validate(&current) {
            error!("Ship form has {} invalid field(s)", found.len());
            errors.set(found);
            return;
        }
        errors.set(ValidationErrors::default());
        busy.set(true);
        spawn(async move {
            let submission = ship_form_to_dto(&current, kind.is_fleet());
            match client.create_ship(&submission).await {
                Ok(id) => {
                    info!("Created ship {id}");
                    push_toast(toasts, ToastKind::Success, kind.created_message());
                    if kind == ShipFormKind::Fleet {
                        nav.push(Route::FleetsReport {});
                        return;
                    }
                    form.set(ShipForm::new(kind));
                }
                Err(err) => report_api_error(state, toasts, &client, "Create ship", &err),
            }
            busy.set(false);
        });
    };

    let title = t(kind.title_key());
    let submit_label = if busy() {
        String::from("Adding...")
    } else {
        t("common.submit")
    };

    rsx! {
        h1 { class: "page-title", "{title}" }
        ShipFormView {
            form,
            errors,
            layout: ShipFormLayout::for_kind(kind),
            busy: busy(),
            submit_label,
            cargo_title: t("common.addCargaison"),
            on_submit,
        }
    }
}

#[component]
pub fn UpdateShipPage(id: String) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();
    let nav = use_navigator();

    let mut form = use_signal(ShipForm::default);
    let mut initial = use_signal(ShipForm::default);
    let mut is_fleet = use_signal(|| false);
    let mut loaded = use_signal(|| false);
    let mut errors = use_signal(ValidationErrors::default);
    let mut busy = use_signal(|| false);
    let mut confirm_discard = use_signal(|| false);

    let ship = use_resource({
        let client = client.clone();
        let id = id.clone();
        move || {
            let client = client.clone();
            let id = id.clone();
            async move {
                let result = client.get_ship(&id).await;
                match &result {
                    Ok(dto) => {
                        let prefilled = ship_dto_to_form(dto);
                        is_fleet.set(dto.is_fleet());
                        initial.set(prefilled.clone());
                        form.set(prefilled);
                        loaded.set(true);
                    }
                    Err(err) => {
                        error!("Failed to load ship {id}: {err}");
                        report_api_error(state, toasts, &client, "Load ship", err);
                    }
                }
                result.map(|_| ())
            }
        }
    });

    let back = move || {
        if is_fleet() {
            nav.push(Route::FleetsReport {});
        } else {
            nav.push(Route::Report {});
        }
    };

    let on_submit = {
        let id = id.clone();
        move |_: ()| {
            let client = client.clone();
            let id = id.clone();
            let current = form();
            let fleet = is_fleet();
            if let Err(found) = ShipSchema::for_fleet(fleet).validate(&current) {
                error!("Ship form has {} invalid field(s)", found.len());
                errors.set(found);
                return;
            }
            errors.set(ValidationErrors::default());
            busy.set(true);
            spawn(async move {
                let submission = ship_form_to_dto(&current, fleet);
                match client.update_ship(&id, &submission).await {
                    Ok(()) => {
                        let message = if fleet {
                            "Fleet ship updated successfully"
                        } else {
                            "Ship updated successfully"
                        };
                        push_toast(toasts, ToastKind::Success, message);
                        back();
                        return;
                    }
                    Err(err) => report_api_error(state, toasts, &client, "Update ship", &err),
                }
                busy.set(false);
            });
        }
    };

    if !loaded() {
        let failed = matches!(&*ship.read(), Some(Err(_)));
        return rsx! {
            div { class: theme::panel(),
                if failed {
                    p { class: "error", "Failed to load ship" }
                    button { class: theme::btn(), onclick: move |_| back(), {t("common.cancel")} }
                } else {
                    p { class: "muted", "Loading ship…" }
                }
            }
        };
    }

    let title = t("common.updateShip");
    let submit_label = if busy() {
        String::from("Updating...")
    } else {
        t("common.update")
    };
    let cargo_title = format!("{} {}(s)", t("common.update"), t("common.cargaison"));
    let layout = ShipFormLayout::for_update(&form.read());

    rsx! {
        h1 { class: "page-title", "{title}" }
        ShipFormView {
            form,
            errors,
            layout,
            busy: busy(),
            submit_label,
            cargo_title,
            on_submit,
            on_document_deleted: move |id: String| initial.with_mut(|f| f.forget_document(&id)),
            on_cancel: move |_| {
                if form.read().is_dirty(&initial.read()) {
                    confirm_discard.set(true);
                } else {
                    back();
                }
            },
        }
        if confirm_discard() {
            ConfirmDialog {
                title: t("common.cancel"),
                message: "Discard your changes to this ship?",
                danger: true,
                on_confirm: move |_| {
                    confirm_discard.set(false);
                    back();
                },
                on_cancel: move |_| confirm_discard.set(false),
            }
        }
    }
}

/// The ship form body shared by every create page and the update page.
#[component]
fn ShipFormView(
    form: Signal<ShipForm>,
    errors: Signal<ValidationErrors>,
    layout: ShipFormLayout,
    busy: bool,
    submit_label: String,
    cargo_title: String,
    on_submit: EventHandler<()>,
    #[props(default)] on_cancel: Option<EventHandler<()>>,
    #[props(default)] on_document_deleted: Option<EventHandler<String>>,
) -> Element {
    let current = form();
    let found = errors();
    let error = |path: &str| found.for_path(path).map(str::to_string);
    let details = current.add_ship.clone();

    rsx! {
        form {
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                on_submit.call(());
            },
            section { class: theme::panel(),
                div { class: "grid",
                    TextField {
                        label: t("form.shipName.label"),
                        value: details.ship_name,
                        error: error("addShip.shipName"),
                        oninput: move |value: String| form.with_mut(|f| f.add_ship.ship_name = value),
                    }
                    TextField {
                        label: t("form.shipImo.label"),
                        value: details.ship_imo,
                        error: error("addShip.shipImo"),
                        oninput: move |value: String| form.with_mut(|f| f.add_ship.ship_imo = value),
                    }
                    TextField {
                        label: t("form.dwt.label"),
                        value: details.dwt,
                        error: error("addShip.dwt"),
                        oninput: move |value: String| form.with_mut(|f| f.add_ship.dwt = value),
                    }
                    SelectField {
                        label: t("form.shipType.label"),
                        value: details.ship_type,
                        options: static_options(&ship_type_options()),
                        onchange: move |value: String| form.with_mut(|f| f.add_ship.ship_type = value),
                    }
                    SelectField {
                        label: t("form.boardingPort.label"),
                        value: details.boarding_port,
                        options: static_options(BOARDING_PORTS),
                        error: error("addShip.boardingPort"),
                        onchange: move |value: String| form.with_mut(|f| f.add_ship.boarding_port = value),
                    }
                    if layout.schedule {
                        DateTimeField {
                            label: t("form.BerthingDate.label"),
                            value: details.berthing_date,
                            error: error("addShip.berthingDate"),
                            onchange: move |value: Option<OffsetDateTime>| form.with_mut(|f| f.add_ship.berthing_date = value),
                        }
                        DateTimeField {
                            label: t("form.completionDate.label"),
                            value: details.completion_date,
                            error: error("addShip.completionDate"),
                            onchange: move |value: Option<OffsetDateTime>| form.with_mut(|f| f.add_ship.completion_date = value),
                        }
                        SelectField {
                            label: t("form.shipStatus.label"),
                            value: details.ship_status,
                            options: static_options(SHIP_STATUSES),
                            error: error("addShip.shipStatus"),
                            onchange: move |value: String| form.with_mut(|f| f.add_ship.ship_status = value),
                        }
                        SelectField {
                            label: t("form.provenance.label"),
                            value: details.provenance,
                            options: static_options(COUNTRIES),
                            error: error("addShip.provenance"),
                            onchange: move |value: String| form.with_mut(|f| f.add_ship.provenance = value),
                        }
                    }
                    if layout.agent {
                        TextField {
                            label: t("form.agent.label"),
                            value: details.agent,
                            oninput: move |value: String| form.with_mut(|f| f.add_ship.agent = value),
                        }
                    }
                }
            }

            if layout.cargoes {
                CargoList { form, errors, title: cargo_title }
            }

            div { class: "grid",
                for role in ContactRole::ALL {
                    ContactCard {
                        role,
                        contact: current.contact(role).clone(),
                        name_error: error(&format!("{}.name", role.path())),
                        on_change: move |contact: PersonnelContactForm| form.with_mut(|f| *f.contact_mut(role) = contact),
                    }
                }
            }

            section { class: theme::panel(),
                h3 { {t("common.documentation")} }
                for kind in DocumentKind::ALL {
                    DocumentSlot {
                        kind,
                        files: current.documents.get(kind).to_vec(),
                        stored: current.existing_documents(kind).to_vec(),
                        errors: document_messages(&found, kind),
                        form,
                        on_deleted: move |id: String| {
                            if let Some(handler) = on_document_deleted {
                                handler.call(id);
                            }
                        },
                    }
                }
            }

            div { class: "grid",
                section { class: theme::panel(),
                    TextAreaField {
                        label: t("common.remarksAndFacts"),
                        value: current.remarks_and_facts.clone(),
                        placeholder: t("form.yourNotes.label"),
                        oninput: move |value: String| form.with_mut(|f| f.remarks_and_facts = value),
                    }
                }
                if layout.performance_rate {
                    section { class: theme::panel(),
                        TextAreaField {
                            label: t("common.performanceRate"),
                            value: current.performance_rate.clone(),
                            placeholder: t("form.performanceRateFunction"),
                            oninput: move |value: String| form.with_mut(|f| f.performance_rate = value),
                        }
                    }
                }
            }

            div { class: "row",
                span { class: "spacer" }
                if let Some(cancel) = on_cancel {
                    button {
                        class: theme::btn(),
                        r#type: "button",
                        onclick: move |_| cancel.call(()),
                        {t("common.cancel")}
                    }
                }
                button { class: theme::btn_primary(), r#type: "submit", disabled: busy, "{submit_label}" }
            }
        }
    }
}

#[component]
fn CargoList(form: Signal<ShipForm>, errors: Signal<ValidationErrors>, title: String) -> Element {
    let mut form = form;
    let mut errors = errors;
    let client = use_context::<ApiClient>();

    let parties = use_resource(move || {
        let client = client.clone();
        async move {
            let receivers = client.get_receivers(&GetReceiversFilter::default()).await;
            let fournisseurs = client
                .get_fournisseurs(&GetFournisseursFilter::default())
                .await;
            (
                receivers.map(|payload| payload.data).unwrap_or_default(),
                fournisseurs.map(|payload| payload.data).unwrap_or_default(),
            )
        }
    });

    let (receivers, fournisseurs) = parties.read().clone().unwrap_or_default();
    let count = form.read().cargoes.len();
    let has_errors = errors.read().has_under("cargoes");
    let add_class = if has_errors {
        theme::btn_small()
    } else {
        theme::btn_primary()
    };

    rsx! {
        section { class: theme::panel(),
            div { class: "row",
                h3 { "{title}" }
                span { class: "spacer" }
                button {
                    class: add_class,
                    r#type: "button",
                    title: t("common.addCargaison"),
                    onclick: move |_| {
                        let added = form.with_mut(ShipForm::add_cargo);
                        let fresh = match added {
                            Ok(()) => ValidationErrors::default(),
                            Err(found) => {
                                error!("Cannot add a cargo while {} field(s) are invalid", found.len());
                                found
                            }
                        };
                        errors.with_mut(|errs| errs.replace_under("cargoes", fresh));
                    },
                    "+"
                }
            }
            for index in 0..count {
                CargoSection {
                    form,
                    index,
                    errors: errors(),
                    receivers: receivers.clone(),
                    fournisseurs: fournisseurs.clone(),
                }
            }
        }
    }
}

#[component]
fn DocumentSlot(
    kind: DocumentKind,
    files: Vec<UploadFile>,
    stored: Vec<String>,
    errors: Vec<String>,
    form: Signal<ShipForm>,
    on_deleted: EventHandler<String>,
) -> Element {
    let mut form = form;
    let label = t(&format!("form.files.{}", kind.form_key()));
    rsx! {
        div { class: "field",
            label { "{label}" }
            DocumentInput {
                kind,
                files,
                errors,
                on_change: move |files: Vec<UploadFile>| form.with_mut(|f| f.documents.set(kind, files)),
            }
            StoredDocuments {
                ids: stored,
                on_delete: move |id: String| {
                    form.with_mut(|f| f.forget_document(&id));
                    on_deleted.call(id);
                },
            }
        }
    }
}
