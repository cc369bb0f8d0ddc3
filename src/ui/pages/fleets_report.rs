use dioxus::prelude::*;
use tracing::info;

use crate::app::{deliver_pdf, report_api_error, Route};
use crate::domain::mappers::fleet_to_ship;
use crate::domain::reports::{FilterOptions, FleetRow};
use crate::domain::ship::{GetShipsFilter, ShipDto, ShipsExportFilter};
use crate::domain::AppState;
use crate::infra::api::ApiClient;
use crate::infra::downloads::fleets_pdf;
use crate::ui::components::data_table::DataTable;
use crate::ui::components::fields::SelectField;
use crate::ui::components::modal::ConfirmDialog;
use crate::ui::components::ship_dialogs::{ShipDialog, ShipDialogHost};
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::pages::report::ListFreshness;
use crate::ui::theme;
use crate::util::i18n::t;

#[component]
pub fn FleetsReportPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();

    let mut port = use_signal(String::new);
    let mut reload = use_signal(|| 0u32);
    let dialog = use_signal(|| None::<ShipDialog>);
    let mut converting = use_signal(|| None::<ShipDto>);
    let mut exporting = use_signal(|| false);

    let fleets = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            let query = GetShipsFilter {
                boarding_port: Some(port()),
                ..GetShipsFilter::default()
            };
            let _round = reload();
            async move {
                let result = client.get_fleets(&query).await;
                if let Err(err) = &result {
                    report_api_error(state, toasts, &client, "Failed to load fleets", err);
                }
                result.ok()
            }
        }
    });

    let loaded = fleets.read().clone();
    let loading = loaded.is_none();
    let payload = loaded.flatten();
    let ships = payload.as_ref().map(|p| p.data.clone()).unwrap_or_default();
    let freshness = payload.map(|p| (p.status, p.fetched_at));
    let ports = FilterOptions::from_ships(&ships).ports;
    let rows = ships
        .iter()
        .map(|ship| {
            let row = FleetRow::from(ship);
            (format!("{}-{}", row.imo, row.name), row, ship.clone())
        })
        .collect::<Vec<_>>();
    let is_empty = rows.is_empty();
    let selected_port = port();
    let headers = vec![
        t("form.shipName.label"),
        t("form.shipImo.label"),
        t("form.dwt.label"),
        t("form.boardingPort.label"),
        t("common.receivers"),
        t("common.fournisseurs"),
        t("common.shipowner"),
        t("form.tonnage.label"),
        t("common.convertToShip"),
        t("common.actions"),
    ];

    rsx! {
        h1 { class: "page-title", {t("common.fleetsReport")} }
        section { class: theme::panel(),
            div { class: "row",
                SelectField {
                    label: t("form.boardingPort.label"),
                    value: selected_port.clone(),
                    options: ports,
                    placeholder: t("common.search"),
                    onchange: move |value: String| port.set(value),
                }
                span { class: "spacer" }
                button {
                    class: theme::btn_primary(),
                    disabled: exporting(),
                    onclick: {
                        let client = client.clone();
                        move |_| {
                            let client = client.clone();
                            let filter = ShipsExportFilter {
                                boarding_port: Some(port()),
                                is_fleet: Some(true),
                                ..ShipsExportFilter::default()
                            };
                            exporting.set(true);
                            spawn(async move {
                                let exported = client.export_ships_pdf(&filter).await;
                                deliver_pdf(state, toasts, &client, &fleets_pdf(), exported);
                                exporting.set(false);
                            });
                        }
                    },
                    {t("common.exportPdf")}
                }
            }
        }

        if let Some((status, fetched_at)) = freshness {
            ListFreshness { status, fetched_at, reload }
        }

        DataTable { headers, loading, is_empty,
            for (key, row, ship) in rows {
                FleetTableRow {
                    key: "{key}",
                    row,
                    ship,
                    dialog,
                    on_convert: move |picked: ShipDto| converting.set(Some(picked)),
                }
            }
        }

        ShipDialogHost {
            dialog,
            delete_message: t("pages.fleets.confirmDelete"),
            on_changed: move |_| reload += 1,
        }

        if let Some(ship) = converting() {
            ConvertFleetDialog { ship, on_close: move |_| converting.set(None) }
        }
    }
}

#[component]
fn FleetTableRow(
    row: FleetRow,
    ship: ShipDto,
    dialog: Signal<Option<ShipDialog>>,
    on_convert: EventHandler<ShipDto>,
) -> Element {
    let mut dialog = dialog;
    let nav = use_navigator();
    let owner = if row.ship_owner_phone.is_empty() {
        row.ship_owner.clone()
    } else {
        format!("{} ({})", row.ship_owner, row.ship_owner_phone)
    };
    let id = row.id.clone();
    let can_convert = id.is_some();
    let for_cargoes = ship.clone();
    let for_contacts = ship.clone();
    let for_delete = ship.clone();
    let for_convert = ship;

    rsx! {
        tr {
            td { "{row.name}" }
            td {
                if row.has_cargo {
                    button {
                        class: "link",
                        onclick: move |_| dialog.set(Some(ShipDialog::Cargoes(for_cargoes.clone()))),
                        "{row.imo}"
                    }
                } else {
                    "{row.imo}"
                }
            }
            td { "{row.dwt}" }
            td { "{row.boarding_port}" }
            td { "{row.receivers}" }
            td { "{row.fournisseurs}" }
            td { "{owner}" }
            td { "{row.tonnage}" }
            td {
                button {
                    class: theme::btn_small(),
                    disabled: !can_convert,
                    onclick: move |_| on_convert.call(for_convert.clone()),
                    {t("common.convertToShip")}
                }
            }
            td {
                div { class: "row",
                    if let Some(id) = id {
                        button {
                            class: theme::btn_small(),
                            onclick: move |_| { nav.push(Route::UpdateShip { id: id.clone() }); },
                            {t("common.edit")}
                        }
                    }
                    button {
                        class: theme::btn_small_danger(),
                        onclick: move |_| dialog.set(Some(ShipDialog::Delete(for_delete.clone()))),
                        {t("common.delete")}
                    }
                    button {
                        class: theme::btn_small(),
                        onclick: move |_| dialog.set(Some(ShipDialog::Contacts(for_contacts.clone()))),
                        "Info"
                    }
                }
            }
        }
    }
}

/// Clears the fleet flag, then opens the ship in the update form so the
/// regular-only fields can be completed.
#[component]
fn ConvertFleetDialog(ship: ShipDto, on_close: EventHandler<()>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();
    let nav = use_navigator();
    let mut busy = use_signal(|| false);

    let message = format!("{} ({})", t("pages.fleets.confirmConvert"), ship.name);

    rsx! {
        ConfirmDialog {
            title: t("common.convertToShip"),
            message,
            busy: busy(),
            on_cancel: move |_| on_close.call(()),
            on_confirm: move |_| {
                let client = client.clone();
                let ship = ship.clone();
                let Some(id) = ship.id.clone() else {
                    return;
                };
                busy.set(true);
                spawn(async move {
                    match client.put_ship(&id, &fleet_to_ship(&ship)).await {
                        Ok(()) => {
                            info!("Converted fleet ship {id}");
                            push_toast(
                                toasts,
                                ToastKind::Success,
                                format!(
                                    "Fleet ship {} converted successfully. Please complete the ship details.",
                                    ship.name
                                ),
                            );
                            nav.push(Route::UpdateShip { id });
                        }
                        Err(err) => {
                            report_api_error(state, toasts, &client, "Failed to convert fleet ship", &err);
                            busy.set(false);
                        }
                    }
                });
            },
        }
    }
}
