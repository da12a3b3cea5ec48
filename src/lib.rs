//! Column-aware phrase highlighting for PDFs
//!
//! This crate provides:
//! - Word extraction with block/line/word ids from PDF pages
//! - Phrase matching that rejects runs crossing columns or lines
//! - Colored highlight annotations for every match

pub mod color_names;
pub mod config;
pub mod extractor;
pub mod highlight;
pub mod matcher;
pub mod words;

pub use config::{Color, ColorEntry, ColorMapping};
pub use extractor::{extract_words, extract_words_mem, ExtractionConfig, PageWords};
pub use highlight::{add_highlight, Grouping};
pub use matcher::{extract_locs_by_phrase, find_phrase, MatchSpan, Matches, Phrase};
pub use words::{adjacency, BBox, WordToken};

use indexmap::IndexMap;
use log::{debug, info, warn};
use lopdf::Document;
use rayon::prelude::*;
use std::path::Path;

/// Options for a highlighting run
#[derive(Debug, Clone, Default)]
pub struct HighlightOptions {
    /// Word extraction settings
    pub extraction: ExtractionConfig,
    /// How matches are grouped into annotations
    pub grouping: Grouping,
}

/// Summary of a highlighting run
#[derive(Debug, Clone, Default)]
pub struct HighlightReport {
    /// Number of pages in the document
    pub page_count: u32,
    /// Number of annotations added
    pub annotations: usize,
    /// Matched occurrences per `(color, phrase)`, in configuration order
    pub matches_per_phrase: IndexMap<(String, String), usize>,
}

impl HighlightReport {
    /// Total matched occurrences across all phrases
    pub fn total_matches(&self) -> usize {
        self.matches_per_phrase.values().sum()
    }
}

/// Highlight every configured phrase in a PDF file and write the result.
///
/// The whole document is processed in memory and written once at the end,
/// so no output file is left behind on failure.
pub fn process_pdf<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    mapping: &ColorMapping,
    options: &HighlightOptions,
) -> Result<HighlightReport, HighlightError> {
    let output = output.as_ref();
    let buffer = std::fs::read(input.as_ref())?;
    let (bytes, report) = process_pdf_mem(&buffer, mapping, options)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, bytes)?;
    info!(
        "wrote {} ({} annotations)",
        output.display(),
        report.annotations
    );

    Ok(report)
}

/// Highlight every configured phrase in a PDF held in memory.
///
/// Returns the serialized highlighted document.
pub fn process_pdf_mem(
    buffer: &[u8],
    mapping: &ColorMapping,
    options: &HighlightOptions,
) -> Result<(Vec<u8>, HighlightReport), HighlightError> {
    let mut doc = Document::load_mem(buffer)?;
    let report = highlight_document(&mut doc, mapping, options)?;

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok((bytes, report))
}

/// Add highlight annotations for every configured phrase to a loaded document
pub fn highlight_document(
    doc: &mut Document,
    mapping: &ColorMapping,
    options: &HighlightOptions,
) -> Result<HighlightReport, HighlightError> {
    let pages = extractor::extract_words_from_doc(doc, &options.extraction)?;
    for page in pages.iter().filter(|p| p.words.is_empty()) {
        warn!(
            "page {} has no extractable words (scanned or image-only?)",
            page.page
        );
    }

    // Matching is read-only and runs per page in parallel
    let page_matches: Vec<Vec<Vec<MatchSpan>>> = pages
        .par_iter()
        .map(|page| {
            mapping
                .entries()
                .iter()
                .flat_map(|entry| entry.phrases.iter())
                .map(|phrase| find_phrase(&page.words, phrase).collect::<Vec<_>>())
                .collect::<Vec<_>>()
        })
        .collect();

    let mut report = HighlightReport {
        page_count: pages.len() as u32,
        ..Default::default()
    };

    // Annotations mutate the document, so they are added on this thread in
    // (color, phrase, page) order
    let mut phrase_idx = 0;
    for entry in mapping.entries() {
        for phrase in &entry.phrases {
            let mut occurrences = 0;
            for (page, matches) in pages.iter().zip(&page_matches) {
                let spans = matches[phrase_idx].clone();
                occurrences += spans.len();
                for boxes in options.grouping.group(spans) {
                    add_highlight(doc, page.page_id, &boxes, entry.color)?;
                    report.annotations += 1;
                }
            }
            debug!(
                "{} `{}`: {} occurrence(s)",
                entry.name, phrase, occurrences
            );
            report
                .matches_per_phrase
                .insert((entry.name.clone(), phrase.to_string()), occurrences);
            phrase_idx += 1;
        }
    }

    Ok(report)
}

#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("invalid configuration in {path}: {message}")]
    Config { path: String, message: String },
    #[error("malformed word token at index {index}: {message}")]
    ContractViolation { index: usize, message: String },
    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),
}

impl From<lopdf::Error> for HighlightError {
    fn from(e: lopdf::Error) -> Self {
        HighlightError::Parse(e.to_string())
    }
}
