use dioxus::prelude::*;

use crate::domain::form::{ContactRole, PersonnelContactForm};
use crate::ui::components::fields::TextField;
use crate::ui::theme;
use crate::util::i18n::t;

/// One of the three personnel contacts on a ship form.
#[component]
pub fn ContactCard(
    role: ContactRole,
    contact: PersonnelContactForm,
    #[props(default)] name_error: Option<String>,
    on_change: EventHandler<PersonnelContactForm>,
) -> Element {
    let title = t(role.title_key());
    let name = contact.name.clone();
    let phone = contact.phone_number.clone();
    let whats_app = contact.whats_app_number.clone();
    let wechat = contact.wechat_number.clone();

    let by_name = contact.clone();
    let by_phone = contact.clone();
    let by_whats_app = contact.clone();
    let by_wechat = contact;

    rsx! {
        section { class: theme::panel(),
            h3 { "{title}" }
            div { class: "grid",
                TextField {
                    label: t("form.name.label"),
                    value: name,
                    error: name_error,
                    oninput: move |value: String| on_change.call(PersonnelContactForm { name: value, ..by_name.clone() }),
                }
                TextField {
                    label: t("form.phoneNumber.label"),
                    value: phone,
                    input_type: "tel",
                    oninput: move |value: String| on_change.call(PersonnelContactForm { phone_number: value, ..by_phone.clone() }),
                }
                TextField {
                    label: t("form.whatsAppNumber.label"),
                    value: whats_app,
                    input_type: "tel",
                    oninput: move |value: String| on_change.call(PersonnelContactForm { whats_app_number: value, ..by_whats_app.clone() }),
                }
                TextField {
                    label: t("form.wechatNumber.label"),
                    value: wechat,
                    oninput: move |value: String| on_change.call(PersonnelContactForm { wechat_number: value, ..by_wechat.clone() }),
                }
            }
        }
    }
}
