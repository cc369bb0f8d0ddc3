//! Translation lookup over the embedded locale files.

use std::sync::OnceLock;

use serde_json::Value;
use tracing::warn;

use super::assets;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
}

impl Language {
    fn locale_path(self) -> &'static str {
        match self {
            Language::En => "locales/en.json",
        }
    }
}

static EN_MESSAGES: OnceLock<Value> = OnceLock::new();

fn messages(language: Language) -> &'static Value {
    match language {
        Language::En => EN_MESSAGES.get_or_init(|| load_messages(language)),
    }
}

fn load_messages(language: Language) -> Value {
    assets::load_text(language.locale_path())
        .and_then(|text| match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("Locale {:?} is not valid JSON: {err}", language);
                None
            }
        })
        .unwrap_or(Value::Null)
}

/// Looks up a dotted key such as `common.addShip`. Unknown keys come back unchanged.
pub fn t(key: &str) -> String {
    translate(Language::default(), key)
}

pub fn translate(language: Language, key: &str) -> String {
    lookup(messages(language), key)
        .map(str::to_string)
        .unwrap_or_else(|| key.to_string())
}

fn lookup<'a>(messages: &'a Value, key: &str) -> Option<&'a str> {
    key.split('.')
        .try_fold(messages, |node, part| node.get(part))?
        .as_str()
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_keys_resolve() {
        assert_eq!(t("common.addOurShip"), "Add our ship");
        assert_eq!(t("form.shipImo.label"), "IMO");
        assert_eq!(t("form.keepSignedIn"), "Keep me signed in");
    }

    #[test]
    fn missing_keys_fall_back_to_the_key() {
        assert_eq!(t("common.doesNotExist"), "common.doesNotExist");
        // A group is not a message.
        assert_eq!(t("form.dwt"), "form.dwt");
    }

    #[test]
    fn empty_messages_are_treated_as_missing() {
        let messages = json!({ "a": { "b": "" , "c": "C" } });
        assert_eq!(lookup(&messages, "a.b"), None);
        assert_eq!(lookup(&messages, "a.c"), Some("C"));
    }
}
