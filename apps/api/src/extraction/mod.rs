//! PDF text extraction.
//!
//! Wraps `pdf-extract` for uploaded resumes and LinkedIn profile exports.
//! Parsing is CPU-bound and runs on the blocking pool. The parser can panic on
//! malformed streams; a panic is reported as an unreadable document.

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("The uploaded file is empty.")]
    Empty,

    #[error("The uploaded file could not be read as a PDF: {0}")]
    Unreadable(String),

    #[error("Could not extract text from PDF. Please ensure it's a text-based PDF.")]
    NoText,
}

/// Plain text of a document, one entry per source page in page order.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pages: Vec<String>,
}

impl ExtractedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All pages concatenated in order, separated by a newline.
    pub fn text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Extracts the text of every page of `bytes`.
pub async fn extract_pdf_text(bytes: bytes::Bytes) -> Result<ExtractedDocument, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::Empty);
    }
    let size = bytes.len();
    let pages = tokio::task::spawn_blocking(move || extract_pages(&bytes))
        .await
        .map_err(|e| ExtractionError::Unreadable(format!("parser aborted: {e}")))??;

    let document = build_document(pages)?;
    info!(
        "Extracted {} characters from {} page(s) ({size} bytes)",
        document.text().len(),
        document.page_count()
    );
    Ok(document)
}

fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))
}

fn build_document(pages: Vec<String>) -> Result<ExtractedDocument, ExtractionError> {
    if pages.iter().all(|p| p.trim().is_empty()) {
        debug!("PDF with {} page(s) carried no text layer", pages.len());
        return Err(ExtractionError::NoText);
    }
    Ok(ExtractedDocument { pages })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a PDF with one page per entry; `None` yields a page with no text.
    pub fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let operations = match text {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}
