use std::time::SystemTime;

use dioxus::prelude::*;
use time::Date;

use crate::app::{deliver_pdf, report_api_error, Route};
use crate::domain::reports::{
    filter_by_dwt, format_report_date, today, DateRange, FilterOptions, ShipRow,
};
use crate::domain::ship::{ShipDto, ShipsExportFilter};
use crate::domain::{AppState, ReportFilters};
use crate::infra::api::{ApiClient, CacheStatus};
use crate::infra::downloads::ships_pdf;
use crate::ui::components::cache_note::CacheNote;
use crate::ui::components::data_table::DataTable;
use crate::ui::components::fields::{DateField, SelectField, TextField};
use crate::ui::components::ship_dialogs::{ShipDialog, ShipDialogHost};
use crate::ui::components::toast::ToastMessage;
use crate::ui::pages::report_parties::{FournisseursTab, ReceiversTab, SubCategoriesTab};
use crate::ui::theme;
use crate::util::i18n::t;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReportTab {
    Ships,
    Receivers,
    Fournisseurs,
    SubCategories,
}

impl ReportTab {
    const ALL: [ReportTab; 4] = [
        ReportTab::Ships,
        ReportTab::Receivers,
        ReportTab::Fournisseurs,
        ReportTab::SubCategories,
    ];

    fn label(&self) -> String {
        match self {
            ReportTab::Ships => t("common.ships"),
            ReportTab::Receivers => t("common.receivers"),
            ReportTab::Fournisseurs => t("common.fournisseurs"),
            ReportTab::SubCategories => t("common.subCategories"),
        }
    }
}

#[component]
pub fn ReportPage() -> Element {
    let mut tab = use_signal(|| ReportTab::Ships);
    let tabs = ReportTab::ALL
        .into_iter()
        .map(|entry| (entry, entry.label(), tab() == entry))
        .collect::<Vec<_>>();

    rsx! {
        h1 { class: "page-title", {t("pages.report.title")} }
        div { class: "tabs",
            for (entry, label, active) in tabs {
                button { class: theme::tab(active), onclick: move |_| tab.set(entry), "{label}" }
            }
        }
        {match tab() {
            ReportTab::Ships => rsx! { ShipsTab {} },
            ReportTab::Receivers => rsx! { ReceiversTab {} },
            ReportTab::Fournisseurs => rsx! { FournisseursTab {} },
            ReportTab::SubCategories => rsx! { SubCategoriesTab {} },
        }}
    }
}

pub(crate) fn edit_report_filters(mut state: Signal<AppState>, apply: impl FnOnce(&mut ReportFilters)) {
    state.with_mut(|st| apply(&mut st.report_filters));
}

/// True once a list is older than the client cache lifetime.
fn is_outdated(fetched_at: SystemTime, client: &ApiClient) -> bool {
    fetched_at
        .elapsed()
        .map(|age| age > client.ttl())
        .unwrap_or(false)
}

/// Cache note for a loaded list. Refreshing drops the cache and bumps `reload`.
#[component]
pub(crate) fn ListFreshness(status: CacheStatus, fetched_at: SystemTime, reload: Signal<u32>) -> Element {
    let client = use_context::<ApiClient>();
    let mut reload = reload;
    let outdated = status == CacheStatus::Stale || is_outdated(fetched_at, &client);
    rsx! {
        CacheNote {
            status,
            fetched_at,
            outdated,
            on_refresh: move |_| {
                let client = client.clone();
                spawn(async move {
                    client.invalidate().await;
                    reload += 1;
                });
            },
        }
    }
}

#[component]
fn ShipsTab() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();

    let filters = use_memo(move || state.read().report_filters.clone());
    let mut reload = use_signal(|| 0u32);
    let dialog = use_signal(|| None::<ShipDialog>);
    let mut exporting = use_signal(|| false);

    let ships = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            let query = filters().ships_filter();
            let _round = reload();
            async move {
                let result = client.get_ships(&query).await;
                if let Err(err) = &result {
                    report_api_error(state, toasts, &client, "Failed to load ships", err);
                }
                result
            }
        }
    });

    let current = filters();
    let (all_ships, freshness, failure) = match &*ships.read() {
        Some(Ok(payload)) => (
            payload.data.clone(),
            Some((payload.status.clone(), payload.fetched_at)),
            None,
        ),
        Some(Err(err)) => (Vec::new(), None, Some(err.to_string())),
        None => (Vec::new(), None, None),
    };
    let loading = ships.read().is_none();
    let options = FilterOptions::from_ships(&all_ships);
    let rows = filter_by_dwt(&all_ships, &current.dwt_from, &current.dwt_to)
        .into_iter()
        .map(|ship| {
            let row = ShipRow::from(ship);
            (format!("{}-{}", row.imo, row.name), row, ship.clone())
        })
        .collect::<Vec<_>>();
    let is_empty = rows.is_empty();
    let headers = vec![
        t("form.shipName.label"),
        t("form.shipImo.label"),
        t("form.dwt.label"),
        t("form.cargoType.label"),
        t("form.category.label"),
        t("form.agent.label"),
        t("form.boardingPort.label"),
        t("form.completionDate.label"),
        t("common.actions"),
    ];
    let export_filter = ShipsExportFilter {
        boarding_port: Some(current.boarding_port.clone()),
        is_fleet: Some(false),
        ..ShipsExportFilter::default()
    };

    rsx! {
        section { class: theme::panel(),
            div { class: "grid",
                DateField {
                    label: t("form.dateFrom.label"),
                    value: current.date_from,
                    onchange: move |date: Option<Date>| edit_report_filters(state, |f| f.date_from = date),
                }
                DateField {
                    label: t("form.dateTo.label"),
                    value: current.date_to,
                    onchange: move |date: Option<Date>| edit_report_filters(state, |f| f.date_to = date),
                }
                div { class: "row",
                    button {
                        class: theme::btn_small(),
                        onclick: move |_| edit_report_filters(state, |f| f.apply_dates(DateRange::last_year(today()))),
                        {t("common.lastYear")}
                    }
                    button {
                        class: theme::btn_small(),
                        onclick: move |_| edit_report_filters(state, |f| f.apply_dates(DateRange::this_year(today()))),
                        {t("common.thisYear")}
                    }
                    button {
                        class: theme::btn_small(),
                        onclick: move |_| edit_report_filters(state, |f| f.apply_dates(None)),
                        {t("common.clear")}
                    }
                }
            }
            div { class: "grid",
                SelectField {
                    label: t("form.category.label"),
                    value: current.category.clone(),
                    options: options.categories,
                    placeholder: t("common.search"),
                    onchange: move |value: String| edit_report_filters(state, |f| f.category = value),
                }
                SelectField {
                    label: t("common.receiver"),
                    value: current.receiver_name.clone(),
                    options: options.receivers,
                    placeholder: t("common.search"),
                    onchange: move |value: String| edit_report_filters(state, |f| f.receiver_name = value),
                }
                SelectField {
                    label: t("form.subCategory.label"),
                    value: current.sub_category.clone(),
                    options: options.sub_categories,
                    placeholder: t("common.search"),
                    onchange: move |value: String| edit_report_filters(state, |f| f.sub_category = value),
                }
                SelectField {
                    label: t("form.boardingPort.label"),
                    value: current.boarding_port.clone(),
                    options: options.ports,
                    placeholder: t("common.search"),
                    onchange: move |value: String| edit_report_filters(state, |f| f.boarding_port = value),
                }
                TextField {
                    label: t("form.dwt.from"),
                    value: current.dwt_from.clone(),
                    input_type: "number",
                    oninput: move |value: String| edit_report_filters(state, |f| f.dwt_from = value),
                }
                TextField {
                    label: t("form.dwt.to"),
                    value: current.dwt_to.clone(),
                    input_type: "number",
                    oninput: move |value: String| edit_report_filters(state, |f| f.dwt_to = value),
                }
            }
            div { class: "row",
                button {
                    class: theme::btn(),
                    onclick: move |_| edit_report_filters(state, |f| *f = ReportFilters::default()),
                    {t("common.reset")}
                }
                span { class: "spacer" }
                button {
                    class: theme::btn_primary(),
                    disabled: exporting(),
                    onclick: {
                        let client = client.clone();
                        move |_| {
                            let client = client.clone();
                            let filter = export_filter.clone();
                            exporting.set(true);
                            spawn(async move {
                                let exported = client.export_ships_pdf(&filter).await;
                                deliver_pdf(state, toasts, &client, &ships_pdf(), exported);
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
        if let Some(message) = failure {
            p { class: "error", "{message}" }
        }

        DataTable { headers, loading, is_empty,
            for (key, row, ship) in rows {
                ShipTableRow { key: "{key}", row, ship, dialog }
            }
        }

        ShipDialogHost { dialog, on_changed: move |_| reload += 1 }
    }
}

#[component]
fn ShipTableRow(row: ShipRow, ship: ShipDto, dialog: Signal<Option<ShipDialog>>) -> Element {
    let mut dialog = dialog;
    let nav = use_navigator();
    let completed = format_report_date(row.completion_date.as_deref());
    let agent = row.agent.clone();
    let has_documents = row.document_count > 0;
    let id = row.id.clone();

    let for_cargoes = ship.clone();
    let for_documents = ship.clone();
    let for_contacts = ship.clone();
    let for_delete = ship;

    rsx! {
        tr {
            td { "{row.name}" }
            td {
                button {
                    class: "link",
                    title: t("pages.report.cargoDetails"),
                    onclick: move |_| dialog.set(Some(ShipDialog::Cargoes(for_cargoes.clone()))),
                    "{row.imo}"
                }
            }
            td { "{row.dwt}" }
            td { "{row.cargo_type}" }
            td { "{row.cargo_category}" }
            td {
                button {
                    class: "link",
                    onclick: move |_| dialog.set(Some(ShipDialog::Agent(agent.clone()))),
                    "{row.agent}"
                }
            }
            td { "{row.boarding_port}" }
            td { "{completed}" }
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
                    if has_documents {
                        button {
                            class: theme::btn_small(),
                            onclick: move |_| dialog.set(Some(ShipDialog::Documents(for_documents.clone()))),
                            {t("common.documentation")}
                        }
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
