//! Labelled inputs that show their validation message underneath.

use dioxus::prelude::*;
use time::{Date, OffsetDateTime};

use crate::domain::mappers::parse_date;
use crate::domain::reports::{format_query_date, parse_query_date};
use crate::ui::theme;

#[component]
pub fn TextField(
    label: String,
    value: String,
    #[props(default)] error: Option<String>,
    #[props(default = "text".to_string())] input_type: String,
    #[props(default)] placeholder: String,
    #[props(default)] disabled: bool,
    oninput: EventHandler<String>,
) -> Element {
    rsx! {
        div { class: "field",
            label { "{label}" }
            input {
                class: theme::input(error.is_some()),
                r#type: "{input_type}",
                value: "{value}",
                placeholder: "{placeholder}",
                disabled,
                oninput: move |evt| oninput.call(evt.value()),
            }
            if let Some(message) = error.as_ref() {
                span { class: "error", "{message}" }
            }
        }
    }
}

#[component]
pub fn TextAreaField(
    label: String,
    value: String,
    #[props(default)] placeholder: String,
    oninput: EventHandler<String>,
) -> Element {
    rsx! {
        div { class: "field",
            label { "{label}" }
            textarea {
                class: theme::input(false),
                rows: "4",
                placeholder: "{placeholder}",
                value: "{value}",
                oninput: move |evt| oninput.call(evt.value()),
            }
        }
    }
}

/// A select whose empty option reads `placeholder`. A current value missing from
/// `options` is still listed so saved data stays visible.
#[component]
pub fn SelectField(
    label: String,
    value: String,
    options: Vec<String>,
    #[props(default)] placeholder: String,
    #[props(default)] error: Option<String>,
    onchange: EventHandler<String>,
) -> Element {
    let mut options = options;
    if !value.is_empty() && !options.contains(&value) {
        options.insert(0, value.clone());
    }
    rsx! {
        div { class: "field",
            label { "{label}" }
            select {
                class: theme::input(error.is_some()),
                value: "{value}",
                onchange: move |evt| onchange.call(evt.value()),
                option { value: "", selected: value.is_empty(), "{placeholder}" }
                for opt in options {
                    option { value: "{opt}", selected: opt == value, "{opt}" }
                }
            }
            if let Some(message) = error.as_ref() {
                span { class: "error", "{message}" }
            }
        }
    }
}

/// Date-only picker for filters.
#[component]
pub fn DateField(label: String, value: Option<Date>, onchange: EventHandler<Option<Date>>) -> Element {
    let text = value.map(format_query_date).unwrap_or_default();
    rsx! {
        div { class: "field",
            label { "{label}" }
            input {
                class: theme::input(false),
                r#type: "date",
                value: "{text}",
                onchange: move |evt| onchange.call(parse_query_date(&evt.value())),
            }
        }
    }
}

/// Date and time picker for the ship schedule, stored as UTC.
#[component]
pub fn DateTimeField(
    label: String,
    value: Option<OffsetDateTime>,
    #[props(default)] error: Option<String>,
    onchange: EventHandler<Option<OffsetDateTime>>,
) -> Element {
    let text = value.map(local_input_value).unwrap_or_default();
    rsx! {
        div { class: "field",
            label { "{label}" }
            input {
                class: theme::input(error.is_some()),
                r#type: "datetime-local",
                value: "{text}",
                onchange: move |evt| onchange.call(parse_local_input(&evt.value())),
            }
            if let Some(message) = error.as_ref() {
                span { class: "error", "{message}" }
            }
        }
    }
}

fn local_input_value(value: OffsetDateTime) -> String {
    format!(
        "{}T{:02}:{:02}",
        format_query_date(value.date()),
        value.hour(),
        value.minute()
    )
}

/// `datetime-local` yields `YYYY-MM-DDTHH:MM`; seconds and zone are added before parsing.
fn parse_local_input(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.len() {
        16 => parse_date(&format!("{value}:00Z")),
        19 => parse_date(&format!("{value}Z")),
        _ => parse_date(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn datetime_inputs_round_trip_through_utc() {
        let value = datetime!(2025-03-04 07:05 UTC);
        assert_eq!(local_input_value(value), "2025-03-04T07:05");
        assert_eq!(parse_local_input("2025-03-04T07:05"), Some(value));
        assert_eq!(parse_local_input(""), None);
        assert_eq!(parse_local_input("2025-03-04"), Some(datetime!(2025-03-04 0:00 UTC)));
    }
}
