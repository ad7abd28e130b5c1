// docmatch/src/extract.rs
//
// Bytes → plain text.
//
//   .txt   UTF-8, Windows-1251 when the bytes are not valid UTF-8
//   .pdf   pdf-extract
//   .docx  word/document.xml, one line per paragraph   (feature "archive")
//   .zip   expanded to its .pdf/.docx/.txt members      (feature "archive")
//   .rar   never available
//
// Failures are per document. The batch logs them and drops the input.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::ExtractError;
use crate::workers::Capabilities;

pub const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".docx", ".txt"];
pub const ARCHIVE_EXTENSIONS: &[&str] = &[".zip", ".rar"];

pub trait Extractor: Send + Sync {
    fn extract(&self, bytes: &[u8], filename: &str) -> Result<String, ExtractError>;

    /// Members of an archive as `("<archive>::<member>", bytes)`, limited to
    /// supported document types.
    fn extract_archive(&self, bytes: &[u8], filename: &str)
        -> Result<Vec<(String, Vec<u8>)>, ExtractError>;

    fn is_archive(&self, filename: &str) -> bool {
        has_extension(filename, ARCHIVE_EXTENSIONS)
    }
}

fn has_extension(filename: &str, exts: &[&str]) -> bool {
    let lower = filename.to_lowercase();
    exts.iter().any(|e| lower.ends_with(e))
}

pub struct FileExtractor {
    caps: Capabilities,
}

impl FileExtractor {
    pub fn new(caps: Capabilities) -> Self {
        Self { caps }
    }
}

impl Extractor for FileExtractor {
    fn extract(&self, bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".txt") {
            Ok(decode_text(bytes))
        } else if lower.ends_with(".pdf") {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
        } else if lower.ends_with(".docx") {
            if !self.caps.docx {
                return Err(ExtractError::Unavailable("docx"));
            }
            docx_text(bytes)
        } else {
            Err(ExtractError::Unsupported(filename.to_string()))
        }
    }

    fn extract_archive(&self, bytes: &[u8], filename: &str)
        -> Result<Vec<(String, Vec<u8>)>, ExtractError>
    {
        let lower = filename.to_lowercase();
        if lower.ends_with(".rar") {
            if !self.caps.rar {
                return Err(ExtractError::Unavailable("rar"));
            }
            return Err(ExtractError::Unsupported(filename.to_string()));
        }
        if !lower.ends_with(".zip") {
            return Err(ExtractError::Unsupported(filename.to_string()));
        }
        if !self.caps.zip {
            return Err(ExtractError::Unavailable("zip"));
        }

        let members = zip_members(bytes)?;
        debug!("archive {}: {} supported members", filename, members.len());
        Ok(members
            .into_iter()
            .map(|(inner, data)| (format!("{}::{}", filename, inner), data))
            .collect())
    }
}

/// UTF-8 (BOM stripped), else Windows-1251.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.strip_prefix('\u{feff}').unwrap_or(s).to_string(),
        Err(_) => {
            let (text, _) = encoding_rs::WINDOWS_1251.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}

// ── DOCX ──────────────────────────────────────────────────────────────────────

static TAG_RE: OnceLock<Regex> = OnceLock::new();

/// WordprocessingML body → text. Paragraph ends become newlines so the
/// line-anchored removal rules still see headings.
pub fn document_xml_to_text(xml: &str) -> String {
    let tags = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag regex"));
    let marked = xml
        .replace("</w:p>", "\n")
        .replace("<w:tab/>", "\t")
        .replace("<w:br/>", "\n");
    let stripped = tags.replace_all(&marked, "");
    html_escape::decode_html_entities(&stripped).trim().to_string()
}

#[cfg(feature = "archive")]
fn docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    use std::io::{Cursor, Read};

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Archive(e.to_string()))?;
    let mut part = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Archive(e.to_string()))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(document_xml_to_text(&xml))
}

#[cfg(not(feature = "archive"))]
fn docx_text(_bytes: &[u8]) -> Result<String, ExtractError> {
    Err(ExtractError::Unavailable("docx"))
}

// ── ZIP ───────────────────────────────────────────────────────────────────────

#[cfg(feature = "archive")]
fn zip_members(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>, ExtractError> {
    use std::io::{Cursor, Read};

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Archive(e.to_string()))?;

    let mut out = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ExtractError::Archive(e.to_string()))?;
        if entry.is_dir() || !has_extension(entry.name(), DOCUMENT_EXTENSIONS) {
            continue;
        }
        let name = entry.name().to_string();
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        out.push((name, data));
    }
    Ok(out)
}

#[cfg(not(feature = "archive"))]
fn zip_members(_bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>, ExtractError> {
    Err(ExtractError::Unavailable("zip"))
}
