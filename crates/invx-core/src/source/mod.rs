//! Loading document text for extraction.
//!
//! Plain-text files (typically OCR output) and the text layer of PDFs are
//! supported. Raster images are rejected: they must go through an external
//! OCR engine first. A document without text still loads, with a warning,
//! and yields a record whose fields are all absent.

#[cfg(feature = "pdf")]
mod pdf;

use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::SourceError;
use crate::models::config::SourceConfig;
use crate::models::record::SourceType;

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Name used for text read from standard input.
pub const STDIN_NAME: &str = "-";

/// Kind of document, decided by file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    /// Plain text.
    Text,
    /// PDF with a text layer.
    Pdf,
    /// Raster image.
    Image,
    /// Anything else.
    Unsupported(String),
}

impl DocumentKind {
    /// Classify a path by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "" | "txt" | "text" => DocumentKind::Text,
            "pdf" => DocumentKind::Pdf,
            "png" | "jpg" | "jpeg" | "bmp" | "tiff" | "tif" => DocumentKind::Image,
            other => DocumentKind::Unsupported(other.to_string()),
        }
    }

    /// Whether files of this kind can be loaded.
    pub fn is_supported(&self) -> bool {
        matches!(self, DocumentKind::Text | DocumentKind::Pdf)
    }
}

/// Document text ready for extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedText {
    /// File name without directories (`-` for standard input).
    pub filename: String,
    /// Extracted text.
    pub text: String,
    /// Where the text came from.
    pub source_type: SourceType,
}

/// Load the text of a document file.
pub fn load_text(path: &Path, config: &SourceConfig) -> Result<LoadedText> {
    let shown = path.display().to_string();
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(shown.as_str())
        .to_string();

    let (text, source_type) = match DocumentKind::from_path(path) {
        DocumentKind::Text => {
            let data = read_bounded(path, config)?;
            (String::from_utf8_lossy(&data).into_owned(), SourceType::Text)
        }
        DocumentKind::Pdf => {
            let data = read_bounded(path, config)?;
            (pdf_text(&data)?, SourceType::TextPdf)
        }
        DocumentKind::Image => return Err(SourceError::RequiresOcr(shown)),
        DocumentKind::Unsupported(ext) => return Err(SourceError::UnsupportedType(ext)),
    };

    check_length(&shown, &text, config);

    debug!("Loaded {} characters from {}", text.len(), shown);

    Ok(LoadedText {
        filename,
        text,
        source_type,
    })
}

/// Read document text from any reader, such as standard input.
pub fn load_reader<R: Read>(name: &str, reader: R, config: &SourceConfig) -> Result<LoadedText> {
    let mut data = Vec::new();
    reader
        .take(config.max_file_bytes + 1)
        .read_to_end(&mut data)
        .map_err(|source| SourceError::Io {
            path: name.to_string(),
            source,
        })?;

    let size = data.len() as u64;
    if size > config.max_file_bytes {
        return Err(SourceError::TooLarge {
            path: name.to_string(),
            size,
            limit: config.max_file_bytes,
        });
    }

    let text = String::from_utf8_lossy(&data).into_owned();
    check_length(name, &text, config);

    Ok(LoadedText {
        filename: name.to_string(),
        text,
        source_type: if name == STDIN_NAME {
            SourceType::Stdin
        } else {
            SourceType::Text
        },
    })
}

fn read_bounded(path: &Path, config: &SourceConfig) -> Result<Vec<u8>> {
    let io_err = |source| SourceError::Io {
        path: path.display().to_string(),
        source,
    };

    let size = fs::metadata(path).map_err(io_err)?.len();
    if size > config.max_file_bytes {
        return Err(SourceError::TooLarge {
            path: path.display().to_string(),
            size,
            limit: config.max_file_bytes,
        });
    }

    fs::read(path).map_err(io_err)
}

fn check_length(name: &str, text: &str, config: &SourceConfig) {
    let len = text.trim().chars().count();
    if len == 0 {
        warn!("{} has no text; its fields will be empty", name);
    } else if len < config.min_text_length {
        warn!("{} has only {} characters of text", name, len);
    }
}

#[cfg(feature = "pdf")]
fn pdf_text(data: &[u8]) -> Result<String> {
    pdf::extract_text(data)
}

#[cfg(not(feature = "pdf"))]
fn pdf_text(_data: &[u8]) -> Result<String> {
    Err(SourceError::Pdf("built without PDF support".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_document_kind() {
        assert_eq!(DocumentKind::from_path(Path::new("a.TXT")), DocumentKind::Text);
        assert_eq!(DocumentKind::from_path(Path::new("scan")), DocumentKind::Text);
        assert_eq!(DocumentKind::from_path(Path::new("a.pdf")), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("a.Jpeg")), DocumentKind::Image);
        assert_eq!(
            DocumentKind::from_path(Path::new("a.docx")),
            DocumentKind::Unsupported("docx".to_string())
        );
    }

    #[test]
    fn test_load_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acme.txt");
        fs::write(&path, "From: Acme Corp\nTotal: $10.00").unwrap();

        let loaded = load_text(&path, &SourceConfig::default()).unwrap();
        assert_eq!(loaded.filename, "acme.txt");
        assert_eq!(loaded.text, "From: Acme Corp\nTotal: $10.00");
        assert_eq!(loaded.source_type, SourceType::Text);
    }

    #[test]
    fn test_image_requires_ocr() {
        let err = load_text(&PathBuf::from("scan.png"), &SourceConfig::default()).unwrap_err();
        assert!(matches!(err, SourceError::RequiresOcr(_)));
    }

    #[test]
    fn test_unsupported_type() {
        let err = load_text(&PathBuf::from("sheet.xlsx"), &SourceConfig::default()).unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedType(ext) if ext == "xlsx"));
    }

    #[test]
    fn test_blank_file_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        fs::write(&path, " \n\n ").unwrap();

        let loaded = load_text(&path, &SourceConfig::default()).unwrap();
        assert_eq!(loaded.filename, "blank.txt");
        assert_eq!(loaded.text, " \n\n ");
    }

    #[test]
    fn test_file_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        fs::write(&path, "x".repeat(64)).unwrap();

        let config = SourceConfig {
            max_file_bytes: 32,
            ..SourceConfig::default()
        };
        let err = load_text(&path, &config).unwrap_err();
        assert!(matches!(err, SourceError::TooLarge { size: 64, limit: 32, .. }));
    }

    #[test]
    fn test_load_reader() {
        let loaded = load_reader(STDIN_NAME, "Seller: Globex\n".as_bytes(), &SourceConfig::default())
            .unwrap();
        assert_eq!(loaded.filename, "-");
        assert_eq!(loaded.source_type, SourceType::Stdin);

        let config = SourceConfig {
            max_file_bytes: 4,
            ..SourceConfig::default()
        };
        let err = load_reader(STDIN_NAME, "too long".as_bytes(), &config).unwrap_err();
        assert!(matches!(err, SourceError::TooLarge { size: 5, limit: 4, .. }));
    }
}
