use std::time::SystemTime;

use dioxus::prelude::*;

use crate::domain::reports::fetch_age_label;
use crate::infra::api::CacheStatus;
use crate::ui::theme;

/// "Updated 3m ago" line above a list, with a refresh button. A stale payload
/// means the backend was unreachable and the last good copy is shown.
#[component]
pub fn CacheNote(
    status: CacheStatus,
    fetched_at: SystemTime,
    outdated: bool,
    on_refresh: EventHandler<()>,
) -> Element {
    let age = fetch_age_label(fetched_at, SystemTime::now());
    let refresh_class = if outdated {
        theme::btn_primary()
    } else {
        theme::btn_small()
    };
    rsx! {
        div { class: "row",
            span { class: "muted", "Updated {age}" }
            if status == CacheStatus::Stale {
                span { class: "chip", "Offline copy" }
            }
            span { class: "spacer" }
            button { class: refresh_class, onclick: move |_| on_refresh.call(()), "Refresh" }
        }
    }
}
