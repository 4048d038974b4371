use std::fs;
use std::io;
use std::path::Path;

use recommender_core::Document;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Reads a resume from disk.
///
/// The content type is a best guess; the document policy decides whether it is acceptable.
pub fn load_document(path: &Path) -> io::Result<Document> {
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let content_type = guess_content_type(path, &bytes);
    Ok(Document::new(file_name, content_type, bytes))
}

pub fn guess_content_type(path: &Path, bytes: &[u8]) -> &'static str {
    if bytes.starts_with(PDF_MAGIC) {
        return "application/pdf";
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") | Some("md") => "text/plain",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
