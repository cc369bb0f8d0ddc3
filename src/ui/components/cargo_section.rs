//! Editor for one cargo entry of a ship form.

use dioxus::prelude::*;

use crate::domain::catalog::{cargo_categories, sub_categories_for};
use crate::domain::form::{CargaisonForm, CargaisonType, PartyMode, ShipForm};
use crate::domain::ship::{FournisseurSummaryDto, ReceiverSummaryDto};
use crate::domain::ValidationErrors;
use crate::ui::components::fields::{SelectField, TextField};
use crate::ui::theme;
use crate::util::i18n::t;

fn edit_form(mut form: Signal<ShipForm>, apply: impl FnOnce(&mut ShipForm)) {
    form.with_mut(apply);
}

fn update_cargo(mut form: Signal<ShipForm>, index: usize, apply: impl FnOnce(&mut CargaisonForm)) {
    form.with_mut(|form| {
        if let Some(cargo) = form.cargoes.get_mut(index) {
            apply(cargo);
        }
    });
}

#[component]
pub fn CargoSection(
    form: Signal<ShipForm>,
    index: usize,
    errors: ValidationErrors,
    receivers: Vec<ReceiverSummaryDto>,
    fournisseurs: Vec<FournisseurSummaryDto>,
) -> Element {
    let Some(cargo) = form.read().cargoes.get(index).cloned() else {
        return rsx! { Fragment {} };
    };
    let error = |field: &str| {
        errors
            .for_path(&format!("cargoes.{index}.{field}"))
            .map(str::to_string)
    };
    let type_error = error("type");
    let category_error = error("category");
    let sub_category_error = error("subCategory");
    let receiver_email_error = error("receiverEmail");
    let fournisseur_email_error = error("fournisseurEmail");
    let email_error = error("email");

    let categories = cargo_categories().into_iter().map(String::from).collect::<Vec<_>>();
    let sub_categories = sub_categories_for(&cargo.category);
    let position = index + 1;
    let cargo_label = t("common.cargaison");
    let shows_fournisseur = cargo.kind == Some(CargaisonType::Cargaison);
    let kinds = CargaisonType::ALL.map(|kind| (kind, kind.label()));
    let receiver_names = receivers.iter().map(|r| r.receiver_name.clone()).collect::<Vec<_>>();
    let fournisseur_names = fournisseurs
        .iter()
        .map(|f| f.fournisseur_name.clone())
        .collect::<Vec<_>>();

    rsx! {
        div { class: "cargo-card",
            div { class: "row",
                strong { "{cargo_label} {position}" }
                for (kind, kind_label) in kinds {
                    label {
                        input {
                            r#type: "radio",
                            name: "cargo-type-{index}",
                            checked: cargo.kind == Some(kind),
                            onchange: move |_| update_cargo(form, index, |cargo| cargo.kind = Some(kind)),
                        }
                        " {kind_label}"
                    }
                }
                span { class: "spacer" }
                button {
                    class: theme::btn_small_danger(),
                    title: "Remove cargo {position}",
                    onclick: move |_| edit_form(form, |form| form.remove_cargo(index)),
                    "✕"
                }
            }
            if let Some(message) = type_error {
                span { class: "error", "{message}" }
            }
            div { class: "grid",
                SelectField {
                    label: t("form.category.label"),
                    value: cargo.category.clone(),
                    options: categories,
                    error: category_error,
                    onchange: move |value: String| edit_form(form, |form| form.set_cargo_category(index, value)),
                }
                SelectField {
                    label: t("form.subCategory.label"),
                    value: cargo.sub_category.clone(),
                    options: sub_categories,
                    error: sub_category_error,
                    onchange: move |value: String| update_cargo(form, index, |cargo| cargo.sub_category = value),
                }
                TextField {
                    label: t("form.tonnage.label"),
                    value: cargo.tonnage.clone(),
                    oninput: move |value: String| update_cargo(form, index, |cargo| cargo.tonnage = value),
                }
            }

            PartyModeSwitch {
                title: t("common.receiver"),
                group: format!("receiver-mode-{index}"),
                mode: cargo.receiver_mode,
                on_change: move |mode: PartyMode| update_cargo(form, index, |cargo| cargo.set_receiver_mode(mode)),
            }
            div { class: "grid",
                if cargo.receiver_mode == PartyMode::Existing {
                    SelectField {
                        label: t("form.receiverName.label"),
                        value: cargo.receiver_name.clone(),
                        options: receiver_names,
                        placeholder: t("common.noOptions"),
                        onchange: {
                            let receivers = receivers.clone();
                            move |name: String| {
                                match receivers.iter().find(|r| r.receiver_name == name) {
                                    Some(receiver) => update_cargo(form, index, |cargo| cargo.select_existing_receiver(receiver)),
                                    None => update_cargo(form, index, CargaisonForm::clear_receiver),
                                }
                            }
                        },
                    }
                } else {
                    TextField {
                        label: t("form.receiverName.label"),
                        value: cargo.receiver_name.clone(),
                        oninput: move |value: String| update_cargo(form, index, |cargo| cargo.receiver_name = value),
                    }
                    TextField {
                        label: t("form.receiverEmail.label"),
                        value: cargo.receiver_email.clone(),
                        error: receiver_email_error,
                        oninput: move |value: String| update_cargo(form, index, |cargo| cargo.receiver_email = value),
                    }
                    TextField {
                        label: t("form.phoneMobile.label"),
                        value: cargo.receiver_phone_mobile.clone(),
                        input_type: "tel",
                        oninput: move |value: String| update_cargo(form, index, |cargo| cargo.receiver_phone_mobile = value),
                    }
                    TextField {
                        label: t("form.mic.label"),
                        value: cargo.receiver_mic.clone(),
                        oninput: move |value: String| update_cargo(form, index, |cargo| cargo.receiver_mic = value),
                    }
                }
            }

            if shows_fournisseur {
                PartyModeSwitch {
                    title: t("common.fournisseur"),
                    group: format!("fournisseur-mode-{index}"),
                    mode: cargo.fournisseur_mode,
                    on_change: move |mode: PartyMode| update_cargo(form, index, |cargo| cargo.set_fournisseur_mode(mode)),
                }
                div { class: "grid",
                    if cargo.fournisseur_mode == PartyMode::Existing {
                        SelectField {
                            label: t("form.fournisseurName.label"),
                            value: cargo.fournisseur_name.clone(),
                            options: fournisseur_names,
                            placeholder: t("common.noOptions"),
                            onchange: {
                                let fournisseurs = fournisseurs.clone();
                                move |name: String| {
                                    match fournisseurs.iter().find(|f| f.fournisseur_name == name) {
                                        Some(fournisseur) => update_cargo(form, index, |cargo| cargo.select_existing_fournisseur(fournisseur)),
                                        None => update_cargo(form, index, CargaisonForm::clear_fournisseur),
                                    }
                                }
                            },
                        }
                    } else {
                        TextField {
                            label: t("form.mic.label"),
                            value: cargo.fournisseur_mic.clone(),
                            oninput: move |value: String| update_cargo(form, index, |cargo| cargo.fournisseur_mic = value),
                        }
                        TextField {
                            label: t("form.fournisseurName.label"),
                            value: cargo.fournisseur_name.clone(),
                            oninput: move |value: String| update_cargo(form, index, |cargo| cargo.fournisseur_name = value),
                        }
                        TextField {
                            label: t("form.fournisseurEmail.label"),
                            value: cargo.fournisseur_email.clone(),
                            error: fournisseur_email_error,
                            oninput: move |value: String| update_cargo(form, index, |cargo| cargo.fournisseur_email = value),
                        }
                        TextField {
                            label: t("form.phoneFixe.label"),
                            value: cargo.fournisseur_phone_fixe.clone(),
                            input_type: "tel",
                            oninput: move |value: String| update_cargo(form, index, |cargo| cargo.fournisseur_phone_fixe = value),
                        }
                        TextField {
                            label: t("form.phoneMobile.label"),
                            value: cargo.fournisseur_phone_mobile.clone(),
                            input_type: "tel",
                            oninput: move |value: String| update_cargo(form, index, |cargo| cargo.fournisseur_phone_mobile = value),
                        }
                    }
                }
            }

            div { class: "grid",
                TextField {
                    label: t("form.phoneNumber.label"),
                    value: cargo.phone_number.clone(),
                    input_type: "tel",
                    oninput: move |value: String| update_cargo(form, index, |cargo| cargo.phone_number = value),
                }
                TextField {
                    label: t("form.whatsAppNumber.label"),
                    value: cargo.whats_app_number.clone(),
                    input_type: "tel",
                    oninput: move |value: String| update_cargo(form, index, |cargo| cargo.whats_app_number = value),
                }
                TextField {
                    label: t("form.email.label"),
                    value: cargo.email.clone(),
                    error: email_error,
                    oninput: move |value: String| update_cargo(form, index, |cargo| cargo.email = value),
                }
            }
        }
    }
}

#[component]
fn PartyModeSwitch(
    title: String,
    group: String,
    mode: PartyMode,
    on_change: EventHandler<PartyMode>,
) -> Element {
    let lower = title.to_lowercase();
    rsx! {
        div { class: "row",
            strong { "{title}" }
            label {
                input {
                    r#type: "radio",
                    name: "{group}",
                    checked: mode == PartyMode::Existing,
                    onchange: move |_| on_change.call(PartyMode::Existing),
                }
                " Select existing {lower}"
            }
            label {
                input {
                    r#type: "radio",
                    name: "{group}",
                    checked: mode == PartyMode::New,
                    onchange: move |_| on_change.call(PartyMode::New),
                }
                " Add new {lower}"
            }
        }
    }
}
