//! Dialogs opened from the ships and fleets tables.

use dioxus::prelude::*;
use tracing::info;

use crate::app::{deliver_pdf, report_api_error};
use crate::domain::reports::{format_report_date, format_tonnage, total_tonnage, AgentTotals};
use crate::domain::ship::{DocumentKind, ShipDto, ShipPersonnelContactDto};
use crate::domain::{AppState, ContactRole};
use crate::infra::api::ApiClient;
use crate::infra::downloads::ship_cargoes_pdf;
use crate::ui::components::documents::DocumentViewer;
use crate::ui::components::kpi_card::KpiCard;
use crate::ui::components::modal::{ConfirmDialog, Modal};
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::theme;
use crate::util::i18n::t;

/// Which dialog a table row asked for.
#[derive(Clone, Debug, PartialEq)]
pub enum ShipDialog {
    Cargoes(ShipDto),
    Documents(ShipDto),
    Contacts(ShipDto),
    Agent(String),
    Delete(ShipDto),
}

/// Renders the requested dialog; `on_changed` fires after a successful delete.
#[component]
pub fn ShipDialogHost(
    dialog: Signal<Option<ShipDialog>>,
    #[props(default)] delete_message: Option<String>,
    on_changed: EventHandler<()>,
) -> Element {
    let mut dialog = dialog;
    let current = dialog();
    let close = move |_: ()| dialog.set(None);
    match current {
        None => rsx! { Fragment {} },
        Some(ShipDialog::Cargoes(ship)) => rsx! { CargoesDialog { ship, on_close: close } },
        Some(ShipDialog::Documents(ship)) => rsx! { DocumentsDialog { ship, on_close: close } },
        Some(ShipDialog::Contacts(ship)) => rsx! { ContactsDialog { ship, on_close: close } },
        Some(ShipDialog::Agent(agent)) => rsx! { AgentDialog { agent, on_close: close } },
        Some(ShipDialog::Delete(ship)) => rsx! {
            DeleteShipDialog {
                ship,
                message: delete_message.unwrap_or_else(|| String::from("Are you sure you want to delete this ship?")),
                on_close: close,
                on_deleted: move |_| {
                    dialog.set(None);
                    on_changed.call(());
                },
            }
        },
    }
}

#[component]
fn CargoesDialog(ship: ShipDto, on_close: EventHandler<()>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();
    let mut exporting = use_signal(|| false);

    let title = format!("{} ({})", ship.name, ship.imo);
    let total = format_tonnage(total_tonnage(&ship.cargoes));
    let cargoes = ship
        .cargoes
        .iter()
        .map(|cargo| {
            [
                cargo.kind.clone(),
                cargo.category.clone(),
                cargo.sub_category.clone(),
                cargo.tonnage.clone(),
                cargo.receiver_name.clone(),
                cargo.fournisseur_name.clone(),
            ]
        })
        .collect::<Vec<_>>();
    let id = ship.id.clone().unwrap_or_default();
    let can_export = !id.is_empty();
    let file_name = ship_cargoes_pdf(&ship.imo);

    rsx! {
        Modal { title, on_close,
            if cargoes.is_empty() {
                p { class: "muted", "No cargoes recorded for this ship." }
            } else {
                table { class: theme::table(),
                    thead {
                        tr {
                            th { {t("form.cargoType.label")} }
                            th { {t("form.category.label")} }
                            th { {t("form.subCategory.label")} }
                            th { {t("form.tonnage.label")} }
                            th { {t("common.receiver")} }
                            th { {t("common.fournisseur")} }
                        }
                    }
                    tbody {
                        for cells in cargoes {
                            tr {
                                for cell in cells {
                                    td { "{cell}" }
                                }
                            }
                        }
                    }
                }
                p { strong { "Total tonnage: {total}" } }
            }
            div { class: "row",
                span { class: "spacer" }
                button {
                    class: theme::btn_primary(),
                    disabled: exporting() || !can_export,
                    onclick: move |_| {
                        let client = client.clone();
                        let id = id.clone();
                        let file_name = file_name.clone();
                        exporting.set(true);
                        spawn(async move {
                            let exported = client.export_ship_cargoes_pdf(&id).await;
                            deliver_pdf(state, toasts, &client, &file_name, exported);
                            exporting.set(false);
                        });
                    },
                    {t("common.exportPdf")}
                }
            }
        }
    }
}

#[component]
fn DocumentsDialog(ship: ShipDto, on_close: EventHandler<()>) -> Element {
    let title = format!("{} · {}", t("common.documentation"), ship.name);
    let groups = DocumentKind::ALL
        .into_iter()
        .map(|kind| {
            (
                t(&format!("form.files.{}", kind.form_key())),
                kind.form_key(),
                ship.documents_of(kind).to_vec(),
            )
        })
        .filter(|(_, _, ids)| !ids.is_empty())
        .collect::<Vec<_>>();

    rsx! {
        Modal { title, on_close,
            if groups.is_empty() {
                p { class: "muted", "No documents uploaded." }
            }
            for (label, key, ids) in groups {
                h3 { "{label}" }
                div { class: "preview-grid",
                    for (position, id) in ids.into_iter().enumerate() {
                        DocumentViewer {
                            key: "{id}",
                            id: id.clone(),
                            filename: format!("{key}-document-{}", position + 1),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ContactsDialog(ship: ShipDto, on_close: EventHandler<()>) -> Element {
    let title = format!("{} · {}", ship.name, ship.imo);
    let contacts = ContactRole::ALL
        .into_iter()
        .map(|role| {
            let contact = match role {
                ContactRole::ShipOwner => ship.ship_owner.clone(),
                ContactRole::OperationDepart => ship.operation_depart.clone(),
                ContactRole::ChartingDepart => ship.charting_depart.clone(),
            };
            (t(role.title_key()), contact_lines(contact))
        })
        .collect::<Vec<_>>();

    rsx! {
        Modal { title, on_close,
            div { class: "grid",
                for (heading, lines) in contacts {
                    section { class: theme::panel(),
                        h3 { "{heading}" }
                        if lines.is_empty() {
                            p { class: "muted", "N/A" }
                        }
                        for line in lines {
                            p { "{line}" }
                        }
                    }
                }
            }
        }
    }
}

fn contact_lines(contact: Option<ShipPersonnelContactDto>) -> Vec<String> {
    let Some(contact) = contact else {
        return Vec::new();
    };
    let labelled = [
        ("Phone", contact.phone_number),
        ("WhatsApp", contact.whats_app_number),
        ("WeChat", contact.we_chat_number),
    ];
    let mut lines = vec![contact.name];
    lines.extend(
        labelled
            .into_iter()
            .filter_map(|(label, value)| value.filter(|v| !v.is_empty()).map(|v| format!("{label}: {v}"))),
    );
    lines.retain(|line| !line.is_empty());
    lines
}

#[component]
fn AgentDialog(agent: String, on_close: EventHandler<()>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();

    let ships = use_resource({
        let agent = agent.clone();
        move || {
            let client = client.clone();
            let agent = agent.clone();
            async move {
                let result = client.get_ships_by_agent(&agent).await;
                if let Err(err) = &result {
                    report_api_error(state, toasts, &client, "Failed to load agent ships", err);
                }
                result.unwrap_or_default()
            }
        }
    });

    let title = format!("{}: {agent}", t("form.agent.label"));
    let loaded = ships.read().clone();
    let body = match loaded {
        None => rsx! { p { class: "muted", {t("common.loading")} } },
        Some(list) => {
            let totals = AgentTotals::from_ships(&list);
            let rows = list
                .iter()
                .map(|ship| {
                    (
                        ship.name.clone(),
                        ship.imo.clone(),
                        ship.dwt.clone(),
                        format_report_date(ship.completion_date.as_deref()),
                    )
                })
                .collect::<Vec<_>>();
            rsx! {
                div { class: "grid",
                    KpiCard { title: t("common.ships"), value: totals.ships.to_string() }
                    KpiCard { title: t("pages.report.totalDwt"), value: format_tonnage(totals.total_dwt) }
                    KpiCard { title: t("pages.report.totalCargoes"), value: totals.total_cargoes.to_string() }
                }
                table { class: theme::table(),
                    thead {
                        tr {
                            th { {t("form.shipName.label")} }
                            th { {t("form.shipImo.label")} }
                            th { {t("form.dwt.label")} }
                            th { {t("form.completionDate.label")} }
                        }
                    }
                    tbody {
                        for (name, imo, dwt, completed) in rows {
                            tr {
                                td { "{name}" }
                                td { "{imo}" }
                                td { "{dwt}" }
                                td { "{completed}" }
                            }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        Modal { title, on_close, {body} }
    }
}

#[component]
fn DeleteShipDialog(
    ship: ShipDto,
    message: String,
    on_close: EventHandler<()>,
    on_deleted: EventHandler<()>,
) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();
    let mut busy = use_signal(|| false);

    let id = ship.id.clone().unwrap_or_default();
    let title = format!("{} {}", t("common.delete"), ship.name);

    rsx! {
        ConfirmDialog {
            title,
            message,
            busy: busy(),
            danger: true,
            on_cancel: move |_| on_close.call(()),
            on_confirm: move |_| {
                let client = client.clone();
                let id = id.clone();
                busy.set(true);
                spawn(async move {
                    match client.delete_ship(&id).await {
                        Ok(()) => {
                            info!("Deleted ship {id}");
                            push_toast(toasts, ToastKind::Success, "Ship deleted successfully");
                            on_deleted.call(());
                        }
                        Err(err) => {
                            report_api_error(state, toasts, &client, "Failed to delete ship", &err);
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
    fn contact_lines_skip_blank_numbers() {
        let lines = contact_lines(Some(ShipPersonnelContactDto {
            name: "Captain Diallo".into(),
            phone_number: Some("+222 45 00 00 00".into()),
            whats_app_number: Some(String::new()),
            we_chat_number: None,
            ..ShipPersonnelContactDto::default()
        }));
        assert_eq!(
            lines,
            vec![
                "Captain Diallo".to_string(),
                "Phone: +222 45 00 00 00".to_string(),
            ]
        );
        assert!(contact_lines(None).is_empty());
    }
}
