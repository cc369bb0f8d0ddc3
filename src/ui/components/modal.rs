use dioxus::prelude::*;

use crate::ui::theme;
use crate::util::i18n::t;

#[component]
pub fn Modal(title: String, on_close: EventHandler<()>, children: Element) -> Element {
    rsx! {
        div { class: "modal-backdrop", onclick: move |_| on_close.call(()),
            div {
                class: "modal",
                onclick: move |evt| evt.stop_propagation(),
                div { class: "row",
                    h2 { "{title}" }
                    span { class: "spacer" }
                    button { class: theme::btn_small(), onclick: move |_| on_close.call(()), {t("common.close")} }
                }
                {children}
            }
        }
    }
}

/// Yes/no prompt used before deletes and conversions.
#[component]
pub fn ConfirmDialog(
    title: String,
    message: String,
    #[props(default)] busy: bool,
    #[props(default)] danger: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let confirm_class = if danger {
        theme::btn_danger()
    } else {
        theme::btn_primary()
    };
    rsx! {
        Modal { title, on_close: move |_| on_cancel.call(()),
            p { "{message}" }
            div { class: "row",
                span { class: "spacer" }
                button { class: theme::btn(), disabled: busy, onclick: move |_| on_cancel.call(()), {t("common.cancel")} }
                button {
                    class: confirm_class,
                    disabled: busy,
                    onclick: move |_| on_confirm.call(()),
                    if busy { {t("common.loading")} } else { {t("common.confirm")} }
                }
            }
        }
    }
}
