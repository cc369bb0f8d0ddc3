use dioxus::prelude::*;
use tracing::{error, warn};

use crate::app::report_api_error;
use crate::domain::{AppState, DocumentKind, UploadFile};
use crate::infra::api::ApiClient;
use crate::infra::downloads::{document_file, mime_for_file_name, save_download};
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::theme;
use crate::util::{assets::data_uri, i18n::t};

const ACCEPTED_FILES: &str = "image/png, image/jpeg, image/svg+xml, application/pdf";

/// File picker for one document kind. Picking replaces the selection; the cross clears it.
#[component]
pub fn DocumentInput(
    kind: DocumentKind,
    files: Vec<UploadFile>,
    errors: Vec<String>,
    on_change: EventHandler<Vec<UploadFile>>,
) -> Element {
    let count = files.len();
    let files_label = t("form.files.label");
    rsx! {
        div { class: "field",
            if count > 0 {
                div { class: "row",
                    span { class: "chip",
                        "{count} {files_label}"
                        button { class: "link", onclick: move |_| on_change.call(Vec::new()), "✕" }
                    }
                    for file in files {
                        span { class: "muted", "{file.name}" }
                    }
                }
            } else {
                input {
                    class: theme::input(!errors.is_empty()),
                    r#type: "file",
                    accept: ACCEPTED_FILES,
                    multiple: true,
                    name: kind.form_key(),
                    onchange: move |evt: FormEvent| async move {
                        let picked = read_picked_files(&evt).await;
                        if picked.is_empty() {
                            warn!("File list is empty");
                            return;
                        }
                        on_change.call(picked);
                    },
                }
            }
            for message in errors {
                span { class: "error", "{message}" }
            }
        }
    }
}

async fn read_picked_files(evt: &FormEvent) -> Vec<UploadFile> {
    let mut picked = Vec::new();
    for file in evt.files() {
        let name = file.name();
        match file.read_bytes().await {
            Ok(bytes) => picked.push(UploadFile {
                mime: mime_for_file_name(&name).to_string(),
                name,
                bytes: bytes.to_vec(),
            }),
            Err(err) => error!("Could not read {name}: {err}"),
        }
    }
    picked
}

/// Renders a stored document: images inline, anything else as a card with a
/// download button.
#[component]
pub fn DocumentViewer(
    id: String,
    #[props(default = "document".to_string())] filename: String,
    #[props(default)] compact: bool,
) -> Element {
    let client = use_context::<ApiClient>();
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let mut downloading = use_signal(|| false);

    let document = use_resource({
        let id = id.clone();
        move || {
            let client = client.clone();
            let id = id.clone();
            async move {
                let result = client.get_document(&id).await;
                if let Err(err) = &result {
                    if err.is_unauthorized() {
                        report_api_error(state, toasts, &client, "Load document", err);
                    }
                }
                result
            }
        }
    });

    let card_class = if compact { "doc-card compact" } else { "doc-card" };

    let body = match &*document.read() {
        None => rsx! { span { class: "muted", {t("common.loading")} } },
        Some(Err(err)) => {
            let message = err.to_string();
            rsx! { span { class: "error", "{message}" } }
        }
        Some(Ok(blob)) if blob.is_image() => {
            let src = data_uri(&blob.content_type, &blob.bytes);
            rsx! { img { src: "{src}", alt: "{filename}" } }
        }
        Some(Ok(blob)) => {
            let is_pdf = blob.is_pdf();
            let kind_label = if is_pdf {
                String::from("PDF File")
            } else {
                blob.content_type.clone()
            };
            let save_name = if is_pdf {
                format!("{filename}.pdf")
            } else {
                document_file(&id, &blob.content_type)
            };
            let bytes = blob.bytes.clone();
            rsx! {
                div {
                    strong { "{filename}" }
                    p { class: "muted", "{kind_label}" }
                }
                if !compact {
                    button {
                        class: theme::btn_small(),
                        disabled: downloading(),
                        onclick: move |_| {
                            downloading.set(true);
                            match save_download(&save_name, &bytes) {
                                Ok(path) => push_toast(
                                    toasts,
                                    ToastKind::Success,
                                    format!("Saved to {}", path.display()),
                                ),
                                Err(err) => {
                                    error!("Error downloading file: {err}");
                                    push_toast(
                                        toasts,
                                        ToastKind::Error,
                                        "Failed to download file. Please try again.",
                                    );
                                }
                            }
                            downloading.set(false);
                        },
                        "Download"
                    }
                }
            }
        }
    };

    rsx! {
        div { class: card_class, {body} }
    }
}

/// Previews of documents already stored on the ship, each with a delete button.
#[component]
pub fn StoredDocuments(ids: Vec<String>, on_delete: EventHandler<String>) -> Element {
    let client = use_context::<ApiClient>();
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let mut deleting = use_signal(Vec::<String>::new);

    if ids.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div { class: "preview-grid",
            for id in ids {
                div { key: "{id}", class: "field",
                    DocumentViewer { id: id.clone(), compact: true }
                    button {
                        class: theme::btn_small_danger(),
                        disabled: deleting.read().contains(&id),
                        onclick: {
                            let client = client.clone();
                            let id = id.clone();
                            move |_| {
                                let client = client.clone();
                                let id = id.clone();
                                deleting.with_mut(|ids| ids.push(id.clone()));
                                spawn(async move {
                                    match client.delete_document(&id).await {
                                        Ok(()) => on_delete.call(id.clone()),
                                        Err(err) => report_api_error(state, toasts, &client, "Delete document", &err),
                                    }
                                    deleting.with_mut(|ids| ids.retain(|other| other != &id));
                                });
                            }
                        },
                        {t("common.delete")}
                    }
                }
            }
        }
    }
}
