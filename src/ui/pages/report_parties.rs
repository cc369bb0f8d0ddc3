//! Receivers, fournisseurs and sub-categories tabs of the report page.

use std::collections::BTreeSet;

use dioxus::prelude::*;

use crate::app::{deliver_pdf, report_api_error};
use crate::domain::reports::{format_report_date, format_tonnage, today};
use crate::domain::ship::{
    CargoDetailsDto, FournisseurSummaryDto, ReceiverSummaryDto, SubCategorySummaryDto,
};
use crate::domain::{AppState, PartyFilters};
use crate::infra::api::ApiClient;
use crate::infra::downloads::{
    fournisseur_cargoes_pdf, fournisseurs_filtered_pdf, receiver_cargoes_pdf,
    receivers_filtered_pdf, sub_category_pdf,
};
use crate::ui::components::data_table::DataTable;
use crate::ui::components::documents::DocumentViewer;
use crate::ui::components::fields::{SelectField, TextField};
use crate::ui::components::modal::Modal;
use crate::ui::components::toast::ToastMessage;
use crate::ui::pages::report::{edit_report_filters, ListFreshness};
use crate::ui::theme;
use crate::util::i18n::t;

fn sorted_unique<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or("N/A")
        .to_string()
}

fn edit_party_filters(mut state: Signal<AppState>, apply: impl FnOnce(&mut PartyFilters)) {
    state.with_mut(|st| apply(&mut st.fournisseur_filters));
}

/// Rows without a backend id cannot be exported or opened.
fn exportable(id: &str) -> Option<String> {
    (!id.is_empty()).then(|| id.to_string())
}

#[component]
pub fn ReceiversTab() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();

    let query = use_memo(move || state.read().report_filters.receivers_filter());
    let reload = use_signal(|| 0u32);
    let mut details = use_signal(|| None::<ReceiverSummaryDto>);
    let mut exporting = use_signal(|| false);

    let receivers = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            let query = query();
            let _round = reload();
            async move {
                let result = client.get_receivers(&query).await;
                if let Err(err) = &result {
                    report_api_error(state, toasts, &client, "Failed to load receivers", err);
                }
                result.ok()
            }
        }
    });

    let filters = state.read().report_filters.clone();
    let loaded = receivers.read().clone();
    let loading = loaded.is_none();
    let payload = loaded.flatten();
    let list = payload.as_ref().map(|p| p.data.clone()).unwrap_or_default();
    let freshness = payload.map(|p| (p.status, p.fetched_at));
    let names = sorted_unique(list.iter().map(|r| &r.receiver_name));
    let sub_categories = sorted_unique(list.iter().flat_map(|r| r.sub_categories.iter()));
    let is_empty = list.is_empty();
    let headers = vec![
        t("form.receiverName.label"),
        t("form.email.label"),
        t("form.phoneFixe.label"),
        t("form.phoneMobile.label"),
        t("pages.report.totalCargoes"),
        t("form.tonnage.label"),
        t("form.category.label"),
        t("form.subCategory.label"),
        t("common.actions"),
    ];

    rsx! {
        section { class: theme::panel(),
            div { class: "grid",
                SelectField {
                    label: t("form.receiverName.label"),
                    value: filters.receiver_name.clone(),
                    options: names,
                    placeholder: t("common.search"),
                    onchange: move |value: String| edit_report_filters(state, |f| f.receiver_name = value),
                }
                SelectField {
                    label: t("form.subCategory.label"),
                    value: filters.sub_category.clone(),
                    options: sub_categories,
                    placeholder: t("common.search"),
                    onchange: move |value: String| edit_report_filters(state, |f| f.sub_category = value),
                }
            }
            div { class: "row",
                button {
                    class: theme::btn(),
                    onclick: move |_| edit_report_filters(state, |f| {
                        f.receiver_name.clear();
                        f.sub_category.clear();
                    }),
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
                            let filter = query();
                            exporting.set(true);
                            spawn(async move {
                                let exported = client.export_receivers_pdf(&filter).await;
                                deliver_pdf(state, toasts, &client, &receivers_filtered_pdf(today()), exported);
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
            for receiver in list {
                ReceiverTableRow {
                    key: "{receiver.receiver_id}-{receiver.receiver_name}",
                    receiver: receiver.clone(),
                    on_details: move |picked: ReceiverSummaryDto| details.set(Some(picked)),
                }
            }
        }

        if let Some(receiver) = details() {
            ReceiverDetails { receiver, on_close: move |_| details.set(None) }
        }
    }
}

#[component]
fn ReceiverTableRow(receiver: ReceiverSummaryDto, on_details: EventHandler<ReceiverSummaryDto>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();
    let mut exporting = use_signal(|| false);

    let email = receiver.receiver_email.clone().unwrap_or_default();
    let phone_fixe = receiver.receiver_phone_fixe.clone().unwrap_or_default();
    let phone_mobile = receiver.receiver_phone_mobile.clone().unwrap_or_default();
    let tonnage = format_tonnage(receiver.total_tonnage);
    let categories = receiver.categories.join(", ");
    let sub_categories = receiver.sub_categories.join(", ");
    let export_id = exportable(&receiver.receiver_id);
    let picked = receiver.clone();

    rsx! {
        tr {
            td { "{receiver.receiver_name}" }
            td { "{email}" }
            td { "{phone_fixe}" }
            td { "{phone_mobile}" }
            td { "{receiver.total_cargoes}" }
            td { "{tonnage}" }
            td { "{categories}" }
            td { "{sub_categories}" }
            td {
                div { class: "row",
                    button {
                        class: theme::btn_small(),
                        onclick: move |_| on_details.call(picked.clone()),
                        {t("pages.report.cargoDetails")}
                    }
                    if let Some(id) = export_id {
                        button {
                            class: theme::btn_small(),
                            disabled: exporting(),
                            onclick: move |_| {
                                let client = client.clone();
                                let id = id.clone();
                                exporting.set(true);
                                spawn(async move {
                                    let exported = client.export_receiver_pdf(&id).await;
                                    deliver_pdf(state, toasts, &client, &receiver_cargoes_pdf(&id), exported);
                                    exporting.set(false);
                                });
                            },
                            "PDF"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ReceiverDetails(receiver: ReceiverSummaryDto, on_close: EventHandler<()>) -> Element {
    let show_fournisseur = use_context::<Signal<AppState>>().read().is_admin();
    let title = format!("{} - {}", receiver.receiver_name, t("pages.report.cargoDetails"));
    let tonnage = format_tonnage(receiver.total_tonnage);
    let categories = receiver.categories.join(", ");
    let documents = receiver
        .cargoes
        .iter()
        .flat_map(|cargo| cargo.receiver_documents.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();

    rsx! {
        Modal { title, on_close,
            div { class: "row",
                span { strong { "Total cargoes: " } "{receiver.total_cargoes}" }
                span { strong { "Total tonnage: " } "{tonnage}" }
                span { strong { "Categories: " } "{categories}" }
            }
            CargoDetailsTable { cargoes: receiver.cargoes.clone(), show_receiver: false, show_fournisseur }
            if !documents.is_empty() {
                h3 { {t("form.files.receiver")} }
                div { class: "preview-grid",
                    for (position, id) in documents.into_iter().enumerate() {
                        DocumentViewer {
                            key: "{id}",
                            id: id.clone(),
                            filename: format!("receiver-document-{}", position + 1),
                        }
                    }
                }
            }
        }
    }
}

/// Cargo lines shared by the receiver and fournisseur details dialogs.
#[component]
fn CargoDetailsTable(cargoes: Vec<CargoDetailsDto>, show_receiver: bool, show_fournisseur: bool) -> Element {
    let rows = cargoes
        .iter()
        .map(|cargo| {
            let mut cells = vec![
                cargo.ship_name.clone(),
                cargo.ship_imo.clone(),
                cargo.boarding_port.clone(),
                format_report_date(cargo.completion_date.as_deref()),
                or_na(Some(&cargo.category)),
                or_na(Some(&cargo.sub_category)),
                or_na(Some(&cargo.tonnage)),
                or_na(cargo.provenance.as_deref()),
            ];
            if show_receiver {
                cells.push(or_na(cargo.receiver_name.as_deref()));
            }
            if show_fournisseur {
                cells.push(or_na(cargo.fournisseur_name.as_deref()));
            }
            cells
        })
        .collect::<Vec<_>>();

    if rows.is_empty() {
        return rsx! { p { class: "muted", "No cargo details available." } };
    }

    rsx! {
        table { class: theme::table(),
            thead {
                tr {
                    th { {t("form.shipName.label")} }
                    th { {t("form.shipImo.label")} }
                    th { {t("form.boardingPort.label")} }
                    th { {t("form.completionDate.label")} }
                    th { {t("form.category.label")} }
                    th { {t("form.subCategory.label")} }
                    th { {t("form.tonnage.label")} }
                    th { {t("form.provenance.label")} }
                    if show_receiver {
                        th { {t("common.receiver")} }
                    }
                    if show_fournisseur {
                        th { {t("common.fournisseur")} }
                    }
                }
            }
            tbody {
                for cells in rows {
                    tr {
                        for cell in cells {
                            td { "{cell}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn FournisseursTab() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();

    let query = use_memo(move || state.read().fournisseur_filters.fournisseurs_filter());
    let reload = use_signal(|| 0u32);
    let mut details = use_signal(|| None::<String>);
    let mut exporting = use_signal(|| false);

    let fournisseurs = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            let query = query();
            let _round = reload();
            async move {
                let result = client.get_fournisseurs(&query).await;
                if let Err(err) = &result {
                    report_api_error(state, toasts, &client, "Failed to load fournisseurs", err);
                }
                result.ok()
            }
        }
    });

    let filters = state.read().fournisseur_filters.clone();
    let loaded = fournisseurs.read().clone();
    let loading = loaded.is_none();
    let payload = loaded.flatten();
    let list = payload.as_ref().map(|p| p.data.clone()).unwrap_or_default();
    let freshness = payload.map(|p| (p.status, p.fetched_at));
    let names = sorted_unique(list.iter().map(|f| &f.fournisseur_name));
    let sub_categories = sorted_unique(list.iter().flat_map(|f| f.sub_categories.iter()));
    let is_empty = list.is_empty();
    let headers = vec![
        t("form.fournisseurName.label"),
        t("form.email.label"),
        t("form.phoneFixe.label"),
        t("form.phoneMobile.label"),
        t("form.tonnage.label"),
        t("form.category.label"),
        t("form.subCategory.label"),
        t("common.actions"),
    ];

    rsx! {
        section { class: theme::panel(),
            div { class: "grid",
                SelectField {
                    label: t("form.fournisseurName.label"),
                    value: filters.name.clone(),
                    options: names,
                    placeholder: t("common.search"),
                    onchange: move |value: String| edit_party_filters(state, |f| f.name = value),
                }
                SelectField {
                    label: t("form.subCategory.label"),
                    value: filters.sub_category.clone(),
                    options: sub_categories,
                    placeholder: t("common.search"),
                    onchange: move |value: String| edit_party_filters(state, |f| f.sub_category = value),
                }
            }
            div { class: "row",
                button {
                    class: theme::btn(),
                    onclick: move |_| edit_party_filters(state, |f| *f = PartyFilters::default()),
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
                            let filter = query();
                            exporting.set(true);
                            spawn(async move {
                                let exported = client.export_fournisseurs_pdf(&filter).await;
                                deliver_pdf(state, toasts, &client, &fournisseurs_filtered_pdf(today()), exported);
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
            for fournisseur in list {
                FournisseurTableRow {
                    key: "{fournisseur.fournisseur_id}-{fournisseur.fournisseur_name}",
                    fournisseur: fournisseur.clone(),
                    on_details: move |id: String| details.set(Some(id)),
                }
            }
        }

        if let Some(id) = details() {
            FournisseurDetails { id, on_close: move |_| details.set(None) }
        }
    }
}

#[component]
fn FournisseurTableRow(fournisseur: FournisseurSummaryDto, on_details: EventHandler<String>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();
    let mut exporting = use_signal(|| false);

    let email = fournisseur.fournisseur_email.clone().unwrap_or_default();
    let phone_fixe = fournisseur.fournisseur_phone_fixe.clone().unwrap_or_default();
    let phone_mobile = fournisseur.fournisseur_phone_mobile.clone().unwrap_or_default();
    let tonnage = format_tonnage(fournisseur.total_tonnage);
    let categories = fournisseur.categories.join(", ");
    let sub_categories = fournisseur.sub_categories.join(", ");
    let details_id = exportable(&fournisseur.fournisseur_id);
    let export_id = details_id.clone();

    rsx! {
        tr {
            td { "{fournisseur.fournisseur_name}" }
            td { "{email}" }
            td { "{phone_fixe}" }
            td { "{phone_mobile}" }
            td { "{tonnage}" }
            td { "{categories}" }
            td { "{sub_categories}" }
            td {
                div { class: "row",
                    if let Some(id) = details_id {
                        button {
                            class: theme::btn_small(),
                            onclick: move |_| on_details.call(id.clone()),
                            {t("pages.report.cargoDetails")}
                        }
                    }
                    if let Some(id) = export_id {
                        button {
                            class: theme::btn_small(),
                            disabled: exporting(),
                            onclick: move |_| {
                                let client = client.clone();
                                let id = id.clone();
                                exporting.set(true);
                                spawn(async move {
                                    let exported = client.export_fournisseur_pdf(&id).await;
                                    deliver_pdf(state, toasts, &client, &fournisseur_cargoes_pdf(&id), exported);
                                    exporting.set(false);
                                });
                            },
                            "PDF"
                        }
                    }
                }
            }
        }
    }
}

/// Loads the fournisseur afresh so the dialog shows every cargo line.
#[component]
fn FournisseurDetails(id: String, on_close: EventHandler<()>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();

    let fournisseur = use_resource({
        let id = id.clone();
        move || {
            let client = client.clone();
            let id = id.clone();
            async move {
                let result = client.get_fournisseur(&id).await;
                if let Err(err) = &result {
                    report_api_error(state, toasts, &client, "Failed to load fournisseur", err);
                }
                result.ok()
            }
        }
    });

    let loaded = fournisseur.read().clone();
    let (title, body) = match loaded {
        None => (t("pages.report.cargoDetails"), rsx! { p { class: "muted", {t("common.loading")} } }),
        Some(None) => (
            t("pages.report.cargoDetails"),
            rsx! { p { class: "error", "Could not load this fournisseur." } },
        ),
        Some(Some(found)) => {
            let tonnage = format_tonnage(found.total_tonnage);
            let categories = found.categories.join(", ");
            (
                format!("{} - {}", found.fournisseur_name, t("pages.report.cargoDetails")),
                rsx! {
                    div { class: "row",
                        span { strong { "Total tonnage: " } "{tonnage}" }
                        span { strong { "Categories: " } "{categories}" }
                    }
                    CargoDetailsTable { cargoes: found.cargoes.clone(), show_receiver: true, show_fournisseur: false }
                },
            )
        }
    };

    rsx! {
        Modal { title, on_close, {body} }
    }
}

/// Case-insensitive match on the sub-category name.
fn matches_search(summary: &SubCategorySummaryDto, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty() || summary.sub_category.to_lowercase().contains(&needle)
}

#[component]
pub fn SubCategoriesTab() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();

    let reload = use_signal(|| 0u32);
    let mut search = use_signal(String::new);
    let mut details = use_signal(|| None::<SubCategorySummaryDto>);

    let summaries = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            let _round = reload();
            async move {
                let result = client.get_sub_category_summaries().await;
                if let Err(err) = &result {
                    report_api_error(state, toasts, &client, "Failed to load sub-categories", err);
                }
                result.ok()
            }
        }
    });

    let loaded = summaries.read().clone();
    let loading = loaded.is_none();
    let payload = loaded.flatten();
    let freshness = payload.as_ref().map(|p| (p.status.clone(), p.fetched_at));
    let needle = search();
    let list = payload
        .map(|p| p.data)
        .unwrap_or_default()
        .into_iter()
        .filter(|summary| matches_search(summary, &needle))
        .collect::<Vec<_>>();
    let is_empty = list.is_empty();
    let headers = vec![
        t("form.subCategory.label"),
        t("form.tonnage.label"),
        t("common.receivers"),
        t("common.actions"),
    ];

    rsx! {
        section { class: theme::panel(),
            TextField {
                label: t("common.search"),
                value: needle.clone(),
                oninput: move |value: String| search.set(value),
            }
        }

        if let Some((status, fetched_at)) = freshness {
            ListFreshness { status, fetched_at, reload }
        }

        DataTable { headers, loading, is_empty,
            for summary in list {
                SubCategoryTableRow {
                    key: "{summary.sub_category}",
                    summary: summary.clone(),
                    on_details: move |picked: SubCategorySummaryDto| details.set(Some(picked)),
                }
            }
        }

        if let Some(summary) = details() {
            SubCategoryDetails { summary, on_close: move |_| details.set(None) }
        }
    }
}

#[component]
fn SubCategoryTableRow(summary: SubCategorySummaryDto, on_details: EventHandler<SubCategorySummaryDto>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<ApiClient>();
    let mut exporting = use_signal(|| false);

    let tonnage = format_tonnage(summary.total_tonnage);
    let receiver_count = summary.receivers.len();
    let name = summary.sub_category.clone();
    let picked = summary.clone();

    rsx! {
        tr {
            td { "{summary.sub_category}" }
            td { "{tonnage}" }
            td { "{receiver_count}" }
            td {
                div { class: "row",
                    button {
                        class: theme::btn_small(),
                        onclick: move |_| on_details.call(picked.clone()),
                        {t("common.receivers")}
                    }
                    button {
                        class: theme::btn_small(),
                        disabled: exporting(),
                        onclick: move |_| {
                            let client = client.clone();
                            let name = name.clone();
                            exporting.set(true);
                            spawn(async move {
                                let exported = client.export_sub_category_pdf(&name).await;
                                deliver_pdf(state, toasts, &client, &sub_category_pdf(&name), exported);
                                exporting.set(false);
                            });
                        },
                        "PDF"
                    }
                }
            }
        }
    }
}

#[component]
fn SubCategoryDetails(summary: SubCategorySummaryDto, on_close: EventHandler<()>) -> Element {
    let title = summary.sub_category.clone();
    let total = format_tonnage(summary.total_tonnage);
    let rows = summary
        .receivers
        .iter()
        .map(|receiver| (receiver.receiver_name.clone(), format_tonnage(receiver.tonnage)))
        .collect::<Vec<_>>();

    rsx! {
        Modal { title, on_close,
            table { class: theme::table(),
                thead {
                    tr {
                        th { {t("form.receiverName.label")} }
                        th { {t("form.tonnage.label")} }
                    }
                }
                tbody {
                    for (name, tonnage) in rows {
                        tr {
                            td { "{name}" }
                            td { "{tonnage}" }
                        }
                    }
                }
            }
            p { strong { "Total: {total}" } }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ship::ReceiverTonnageDto;
    use pretty_assertions::assert_eq;

    #[test]
    fn sub_category_search_ignores_case_and_blanks() {
        let summary = SubCategorySummaryDto {
            sub_category: "Frozen Fish".into(),
            total_tonnage: 1200.0,
            receivers: vec![ReceiverTonnageDto {
                receiver_name: "Atlantic Cold".into(),
                tonnage: 1200.0,
            }],
        };
        assert!(matches_search(&summary, "  "));
        assert!(matches_search(&summary, "frozen"));
        assert!(!matches_search(&summary, "grain"));
    }

    #[test]
    fn filter_choices_are_sorted_and_unique() {
        let names = vec![
            "Sahel Trade".to_string(),
            String::new(),
            "Atlantic Cold".to_string(),
            "Sahel Trade".to_string(),
        ];
        assert_eq!(
            sorted_unique(names.iter()),
            vec!["Atlantic Cold".to_string(), "Sahel Trade".to_string()]
        );
        assert_eq!(or_na(Some("")), "N/A");
        assert_eq!(or_na(None), "N/A");
        assert_eq!(exportable(""), None);
    }
}
