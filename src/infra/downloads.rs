//! Saving exported PDFs and documents to the user's download folder.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use time::Date;
use tracing::{info, warn};

use crate::domain::reports::format_query_date;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("file name is empty")]
    EmptyName,
    #[error("could not find a free file name for {0}")]
    Exhausted(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

const MAX_ATTEMPTS: u32 = 1000;

pub fn ships_pdf() -> String {
    String::from("ships.pdf")
}

pub fn fleets_pdf() -> String {
    String::from("fleets.pdf")
}

pub fn ship_cargoes_pdf(imo: &str) -> String {
    format!("ship_{imo}_cargoes.pdf")
}

pub fn receiver_cargoes_pdf(receiver_id: &str) -> String {
    format!("receiver_{receiver_id}_cargoes.pdf")
}

pub fn receivers_filtered_pdf(on: Date) -> String {
    format!("receivers_filtered_{}.pdf", format_query_date(on))
}

pub fn fournisseur_cargoes_pdf(fournisseur_id: &str) -> String {
    format!("fournisseur_{fournisseur_id}_cargoes.pdf")
}

pub fn fournisseurs_filtered_pdf(on: Date) -> String {
    format!("fournisseurs_filtered_{}.pdf", format_query_date(on))
}

pub fn sub_category_pdf(name: &str) -> String {
    format!("subcategory_{}_receivers.pdf", name.replace(' ', "_"))
}

pub fn document_file(id: &str, content_type: &str) -> String {
    format!("document_{id}.{}", extension_for(content_type))
}

pub fn extension_for(content_type: &str) -> &'static str {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "application/pdf" => "pdf",
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/svg+xml" => "svg",
        _ => "bin",
    }
}

/// Maps a picked file's extension to the MIME type checked by the form rules.
pub fn mime_for_file_name(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// The user's download folder, or the temp directory when there is none.
pub fn download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| {
        warn!("No download directory configured, using the temp directory");
        std::env::temp_dir()
    })
}

pub fn save_download(file_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
    save_download_in(&download_dir(), file_name, bytes)
}

/// Writes `bytes` under `dir` without replacing an existing file: `ships.pdf`
/// becomes `ships (1).pdf`, `ships (2).pdf` and so on.
pub fn save_download_in(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
    let file_name = sanitize(file_name);
    if file_name.is_empty() {
        return Err(DownloadError::EmptyName);
    }
    fs::create_dir_all(dir)?;

    let (stem, extension) = split_name(&file_name);
    for attempt in 0..MAX_ATTEMPTS {
        let candidate = match (attempt, extension) {
            (0, _) => file_name.clone(),
            (n, Some(ext)) => format!("{stem} ({n}).{ext}"),
            (n, None) => format!("{stem} ({n})"),
        };
        let path = dir.join(&candidate);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(bytes)?;
                info!("Saved {} bytes to {}", bytes.len(), path.display());
                return Ok(path);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Err(DownloadError::Exhausted(file_name))
}

fn split_name(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    }
}

/// Strips path separators so a name can never leave the target folder.
fn sanitize(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            other => other,
        })
        .collect::<String>()
        .trim()
        .trim_start_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn export_names_follow_conventions() {
        assert_eq!(ships_pdf(), "ships.pdf");
        assert_eq!(fleets_pdf(), "fleets.pdf");
        assert_eq!(ship_cargoes_pdf("9321483"), "ship_9321483_cargoes.pdf");
        assert_eq!(receiver_cargoes_pdf("r-1"), "receiver_r-1_cargoes.pdf");
        assert_eq!(
            receivers_filtered_pdf(date!(2025 - 02 - 03)),
            "receivers_filtered_2025-02-03.pdf"
        );
        assert_eq!(fournisseur_cargoes_pdf("f-9"), "fournisseur_f-9_cargoes.pdf");
        assert_eq!(
            fournisseurs_filtered_pdf(date!(2025 - 02 - 03)),
            "fournisseurs_filtered_2025-02-03.pdf"
        );
        assert_eq!(
            sub_category_pdf("Vegetable oil blend"),
            "subcategory_Vegetable_oil_blend_receivers.pdf"
        );
        assert_eq!(document_file("d-1", "image/png"), "document_d-1.png");
        assert_eq!(
            document_file("d-2", "application/pdf; charset=binary"),
            "document_d-2.pdf"
        );
    }

    #[test]
    fn mime_types_from_extensions() {
        assert_eq!(mime_for_file_name("scan.JPG"), "image/jpeg");
        assert_eq!(mime_for_file_name("bl.pdf"), "application/pdf");
        assert_eq!(mime_for_file_name("logo.svg"), "image/svg+xml");
        assert_eq!(mime_for_file_name("notes"), "application/octet-stream");
    }

    #[test]
    fn downloads_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();

        let first = save_download_in(dir.path(), "ships.pdf", b"one").unwrap();
        let second = save_download_in(dir.path(), "ships.pdf", b"two").unwrap();
        let third = save_download_in(dir.path(), "ships.pdf", b"three").unwrap();

        assert_eq!(first.file_name().unwrap(), "ships.pdf");
        assert_eq!(second.file_name().unwrap(), "ships (1).pdf");
        assert_eq!(third.file_name().unwrap(), "ships (2).pdf");
        assert_eq!(fs::read(&first).unwrap(), b"one");
        assert_eq!(fs::read(&third).unwrap(), b"three");
    }

    #[test]
    fn names_without_extension_and_unsafe_names() {
        let dir = tempfile::tempdir().unwrap();
        save_download_in(dir.path(), "report", b"a").unwrap();
        let again = save_download_in(dir.path(), "report", b"b").unwrap();
        assert_eq!(again.file_name().unwrap(), "report (1)");

        let escaped = save_download_in(dir.path(), "../../etc/passwd", b"c").unwrap();
        assert_eq!(escaped.parent().unwrap(), dir.path());

        assert!(matches!(
            save_download_in(dir.path(), "  ", b""),
            Err(DownloadError::EmptyName)
        ));
    }
}
