use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use tracing::debug;

use crate::error::{Result, SiftError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    Text,
}

impl ResumeFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "pdf" => Some(ResumeFormat::Pdf),
            "docx" => Some(ResumeFormat::Docx),
            "txt" | "text" | "md" => Some(ResumeFormat::Text),
            _ => None,
        }
    }
}

// --- Decoder trait ---

/// Turns the raw bytes of a resume into plain text.
pub trait ResumeDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String>;
    fn format(&self) -> ResumeFormat;
}

pub fn decoder_for(format: ResumeFormat) -> Box<dyn ResumeDecoder> {
    match format {
        ResumeFormat::Pdf => Box::new(PdfDecoder),
        ResumeFormat::Docx => Box::new(DocxDecoder),
        ResumeFormat::Text => Box::new(PlainTextDecoder),
    }
}

// --- Plain text ---

pub struct PlainTextDecoder;

impl ResumeDecoder for PlainTextDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn format(&self) -> ResumeFormat {
        ResumeFormat::Text
    }
}

// --- PDF ---

pub struct PdfDecoder;

impl ResumeDecoder for PdfDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| SiftError::Extraction(format!("invalid PDF: {}", e)))?;

        let mut text = String::new();
        for page in doc.get_pages().keys() {
            match doc.extract_text(&[*page]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => debug!(page, error = %e, "skipping unreadable PDF page"),
            }
        }

        if text.trim().is_empty() {
            return Err(SiftError::Extraction("PDF contains no extractable text".to_string()));
        }
        Ok(text)
    }

    fn format(&self) -> ResumeFormat {
        ResumeFormat::Pdf
    }
}

// --- DOCX ---

pub struct DocxDecoder;

impl ResumeDecoder for DocxDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| SiftError::Extraction(format!("invalid DOCX: {}", e)))?;

        let mut lines: Vec<String> = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
                DocumentChild::Table(table) => table_lines(table, &mut lines),
                _ => {}
            }
        }
        Ok(lines.join("\n"))
    }

    fn format(&self) -> ResumeFormat {
        ResumeFormat::Docx
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut line = String::new();
    for p_child in &paragraph.children {
        if let ParagraphChild::Run(run) = p_child {
            for r_child in &run.children {
                if let RunChild::Text(t) = r_child {
                    line.push_str(&t.text);
                }
            }
        }
    }
    line
}

/// One line per non-empty cell, row by row. Nested tables are flattened.
fn table_lines(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            let mut parts: Vec<String> = Vec::new();
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => parts.push(paragraph_text(paragraph)),
                    TableCellContent::Table(nested) => table_lines(nested, lines),
                    _ => {}
                }
            }
            let text = parts.join(" ");
            if !text.trim().is_empty() {
                lines.push(text.trim().to_string());
            }
        }
    }
}
