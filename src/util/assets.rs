use std::{borrow::Cow, sync::OnceLock};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_embed::RustEmbed;
use tracing::error;

/// Embed the entire `assets/` directory into the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

static MAIN_CSS: OnceLock<String> = OnceLock::new();
static LOGO_DATA_URI: OnceLock<String> = OnceLock::new();

/// Returns the contents of `assets/main.css` as a static string.
pub fn main_css() -> &'static str {
    MAIN_CSS
        .get_or_init(|| load_text("/assets/main.css").unwrap_or_default())
        .as_str()
}

/// Returns a data URI for the sidebar and login logo.
pub fn logo_data_uri() -> &'static str {
    LOGO_DATA_URI
        .get_or_init(|| {
            load_asset("/assets/logo.svg")
                .map(|bytes| data_uri(guess_mime("logo.svg"), &bytes))
                .unwrap_or_default()
        })
        .as_str()
}

/// Reads an embedded UTF-8 file such as `locales/en.json`.
pub fn load_text(path: &str) -> Option<String> {
    let asset = load_asset(path)?;
    match String::from_utf8(asset.into_owned()) {
        Ok(text) => Some(text),
        Err(_) => {
            error!("Embedded asset {path} is not valid UTF-8");
            None
        }
    }
}

/// Inline form of a binary file, used for the logo and for image documents.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

fn load_asset(path: &str) -> Option<Cow<'static, [u8]>> {
    let canonical = canonical_asset_path(path);
    let asset = EmbeddedAssets::get(&canonical).map(|file| file.data);
    if asset.is_none() {
        error!("Failed to locate embedded asset: {path}");
    }
    asset
}

fn canonical_asset_path(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if let Some(rest) = trimmed.strip_prefix("assets/") {
        rest.to_string()
    } else {
        trimmed.to_string()
    }
}

fn guess_mime(path: &str) -> &'static str {
    if path.ends_with(".css") {
        "text/css"
    } else if path.ends_with(".svg") {
        "image/svg+xml"
    } else if path.ends_with(".json") {
        "application/json"
    } else if path.ends_with(".png") {
        "image/png"
    } else {
        "application/octet-stream"
    }
}
