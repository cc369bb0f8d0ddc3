use dioxus::prelude::*;

use crate::ui::theme;
use crate::util::i18n::t;

/// Table frame with a header row; rows come in as children.
#[component]
pub fn DataTable(
    headers: Vec<String>,
    #[props(default)] loading: bool,
    #[props(default)] is_empty: bool,
    children: Element,
) -> Element {
    let columns = headers.len().max(1).to_string();
    rsx! {
        div { class: theme::panel(),
            table { class: theme::table(),
                thead {
                    tr {
                        for header in headers {
                            th { "{header}" }
                        }
                    }
                }
                tbody {
                    if loading {
                        tr { td { class: "empty", colspan: "{columns}", {t("common.loading")} } }
                    } else if is_empty {
                        tr { td { class: "empty", colspan: "{columns}", {t("common.noResults")} } }
                    } else {
                        {children}
                    }
                }
            }
        }
    }
}
