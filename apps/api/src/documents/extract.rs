//! Plain-text extraction from uploaded files.
//!
//! PDF parsing delegates to `pdf-extract`; DOCX is a zip archive whose
//! `word/document.xml` text runs we collect with `quick-xml`. Legacy `.doc`
//! uploads are attempted as DOCX and simply yield no text when that fails.

use std::io::Read;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

/// Extracts text for the given MIME type. `None` means extraction failed;
/// callers treat that as "document not analyzable" rather than an error.
pub fn extract_text(path: &str, mime_type: &str) -> Option<String> {
    let result = match mime_type {
        "application/pdf" => extract_pdf_text(path),
        "application/msword"
        | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            extract_docx_text(path)
        }
        "text/plain" => extract_txt_text(path),
        other => {
            warn!("No extractor for MIME type {other}");
            return None;
        }
    };

    match result {
        Ok(text) if !text.is_empty() => Some(text),
        Ok(_) => {
            warn!("Extraction produced no text for {path}");
            None
        }
        Err(e) => {
            warn!("Error extracting text from {path}: {e:#}");
            None
        }
    }
}

fn extract_pdf_text(path: &str) -> Result<String> {
    let text = pdf_extract::extract_text(path)
        .with_context(|| format!("pdf-extract failed for {path}"))?;
    Ok(text.trim().to_string())
}

fn extract_docx_text(path: &str) -> Result<String> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).context("not a zip archive")?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("word/document.xml missing")?
        .read_to_string(&mut xml)?;
    Ok(docx_xml_to_text(&xml))
}

/// Collects the text runs of a WordprocessingML document, one line per
/// paragraph (`w:p`).
fn docx_xml_to_text(xml: &str) -> String {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => {
                if let Ok(text) = t.unescape() {
                    out.push_str(&text);
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => out.push('\n'),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("DOCX XML parse stopped early: {e}");
                break;
            }
        }
    }

    out.trim().to_string()
}

fn extract_txt_text(path: &str) -> Result<String> {
    let text = std::fs::read_to_string(path)?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_txt_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "  Software engineer with 5 years of Rust.\n").unwrap();

        let text = extract_text(path.to_str().unwrap(), "text/plain").unwrap();
        assert_eq!(text, "Software engineer with 5 years of Rust.");
    }

    #[test]
    fn test_txt_empty_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        assert!(extract_text(path.to_str().unwrap(), "text/plain").is_none());
    }

    #[test]
    fn test_unknown_mime_yields_none() {
        assert!(extract_text("whatever.bin", "application/octet-stream").is_none());
    }

    #[test]
    fn test_docx_xml_to_text_paragraphs() {
        let xml = r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
                <w:p><w:r><w:t>Senior Engineer</w:t></w:r><w:r><w:t> at Acme</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;
        assert_eq!(docx_xml_to_text(xml), "Jane Doe\nSenior Engineer at Acme");
    }

    #[test]
    fn test_docx_extraction_from_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/document.xml", zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(
            br#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>Hello resume</w:t></w:r></w:p></w:body></w:document>"#,
        )
        .unwrap();
        zip.finish().unwrap();

        let text = extract_text(
            path.to_str().unwrap(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        )
        .unwrap();
        assert_eq!(text, "Hello resume");
    }

    #[test]
    fn test_corrupt_docx_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"this is not a zip").unwrap();

        assert!(extract_text(
            path.to_str().unwrap(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        )
        .is_none());
    }
}
