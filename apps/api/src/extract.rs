// Text extraction for uploaded CV files.
// Format-specific parsing is delegated to pdf-extract and docx-rs; this module
// normalizes everything to plain UTF-8 text.

use thiserror::Error;

use crate::models::document::FileType;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(#[from] pdf_extract::OutputError),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("File is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Determines the file type from the filename's last dot-segment,
/// case-insensitively. Unknown extensions are rejected before any bytes are
/// read.
pub fn detect_file_type(filename: &str) -> Result<FileType, ExtractionError> {
    let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    FileType::from_extension(&extension).ok_or(ExtractionError::UnsupportedFormat(extension))
}

/// Extracts normalized text from raw file bytes.
/// CPU-bound for PDF and DOCX; async callers run this inside
/// `tokio::task::spawn_blocking`.
pub fn extract_text(file_type: FileType, data: &[u8]) -> Result<String, ExtractionError> {
    match file_type {
        FileType::Pdf => extract_pdf(data),
        FileType::Docx => extract_docx(data),
        FileType::Txt => Ok(String::from_utf8(data.to_vec())?),
    }
}

/// Per-page text in page order, each page followed by a line break. Pages
/// without extractable text contribute an empty segment rather than an error.
fn extract_pdf(data: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(data)?;
    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    Ok(text)
}

/// Paragraph text in document order, one paragraph per line. Non-paragraph
/// children (tables, section breaks) are skipped.
fn extract_docx(data: &[u8]) -> Result<String, ExtractionError> {
    let doc = docx_rs::read_docx(data).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut text = String::new();
    for child in doc.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}
