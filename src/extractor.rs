//! Word extraction from PDF using lopdf
//!
//! This module walks each page's content stream, splits shown text into
//! words with bounding boxes, and assigns the block/line/word ids the
//! phrase matcher relies on.

use crate::words::{BBox, WordToken};
use crate::HighlightError;
use log::debug;
use lopdf::{Dictionary, Document, Object, ObjectId};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Configuration for word extraction and layout id assignment
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Maximum baseline difference for two words to share a line
    pub y_tolerance: f32,
    /// A vertical gap larger than this many font sizes starts a new block
    pub block_gap_factor: f32,
    /// Minimum words on a page before column detection is attempted
    pub min_column_items: usize,
    /// Minimum empty gutter between columns, in multiples of the median font size
    pub column_gutter_em: f32,
    /// Negative `TJ` adjustment (thousandths of an em) treated as a word break
    pub kerning_word_break: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            y_tolerance: 3.0,
            block_gap_factor: 1.5,
            min_column_items: 20,
            column_gutter_em: 1.0,
            kerning_word_break: 200.0,
        }
    }
}

/// The word stream of one page
#[derive(Debug, Clone)]
pub struct PageWords {
    /// Page number (1-indexed)
    pub page: u32,
    /// Object id of the page dictionary
    pub page_id: ObjectId,
    /// Words ordered by `(block_id, line_id, word_index)`
    pub words: Vec<WordToken>,
}

/// Extract the word stream of every page of a PDF file
pub fn extract_words<P: AsRef<Path>>(
    path: P,
    config: &ExtractionConfig,
) -> Result<Vec<PageWords>, HighlightError> {
    let doc = Document::load(path)?;
    extract_words_from_doc(&doc, config)
}

/// Extract the word stream of every page from a memory buffer
pub fn extract_words_mem(
    buffer: &[u8],
    config: &ExtractionConfig,
) -> Result<Vec<PageWords>, HighlightError> {
    let doc = Document::load_mem(buffer)?;
    extract_words_from_doc(&doc, config)
}

/// Extract the word stream of every page of a loaded document.
///
/// Pages are processed in parallel; the result is in page order.
pub fn extract_words_from_doc(
    doc: &Document,
    config: &ExtractionConfig,
) -> Result<Vec<PageWords>, HighlightError> {
    let pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();

    pages
        .par_iter()
        .map(|&(page_num, page_id)| {
            let words = extract_page_words(doc, page_id, page_num, config)?;
            debug!("page {}: {} words", page_num, words.len());
            Ok(PageWords {
                page: page_num,
                page_id,
                words,
            })
        })
        .collect()
}

/// Extract the word stream of a single page
pub fn extract_page_words(
    doc: &Document,
    page_id: ObjectId,
    page_num: u32,
    config: &ExtractionConfig,
) -> Result<Vec<WordToken>, HighlightError> {
    let raw = extract_raw_words(doc, page_id, config)?;
    if raw.is_empty() {
        debug!("page {}: no text shown", page_num);
    }
    Ok(assign_layout(raw, config))
}

/// A word positioned on the page, before layout ids are assigned
#[derive(Debug, Clone)]
struct RawWord {
    text: String,
    x0: f32,
    x1: f32,
    /// Baseline
    y: f32,
    font_size: f32,
}

impl RawWord {
    fn bbox(&self) -> BBox {
        // Approximate ascent/descent of a typical Latin font
        BBox::new(
            self.x0,
            self.y - self.font_size * 0.2,
            self.x1,
            self.y + self.font_size * 0.8,
        )
    }
}

/// Glyph widths of a simple font, in thousandths of an em
#[derive(Debug, Clone, Default)]
struct FontMetrics {
    first_char: i64,
    widths: Vec<f32>,
}

impl FontMetrics {
    fn from_dict(doc: &Document, font: &Dictionary) -> Self {
        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| resolve(doc, o).as_i64().ok())
            .unwrap_or(0);
        let widths = font
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|w| get_number(resolve(doc, w)).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();
        Self { first_char, widths }
    }

    fn width(&self, code: u8) -> Option<f32> {
        let idx = i64::from(code) - self.first_char;
        if idx < 0 {
            return None;
        }
        self.widths
            .get(idx as usize)
            .copied()
            .filter(|w| *w > 0.0)
    }
}

/// Average glyph advance when the font carries no widths, in ems
const DEFAULT_GLYPH_WIDTH: f32 = 0.5;

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Multiply two 2D transformation matrices
/// Matrix format: [a, b, c, d, e, f] representing:
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
fn multiply_matrices(m1: &[f32; 6], m2: &[f32; 6]) -> [f32; 6] {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

fn translation(tx: f32, ty: f32) -> [f32; 6] {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

/// Text state that survives across BT/ET
#[derive(Debug, Clone)]
struct TextState {
    font: String,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: String::new(),
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn line_advance(&self) -> f32 {
        if self.leading > 0.0 {
            self.leading
        } else {
            // Approximate line height
            self.font_size * 1.2
        }
    }
}

/// Accumulates glyphs into words, breaking on whitespace and on jumps
#[derive(Debug, Default)]
struct WordCollector {
    words: Vec<RawWord>,
    pending: Option<RawWord>,
}

impl WordCollector {
    fn push_glyph(&mut self, ch: char, x0: f32, x1: f32, y: f32, font_size: f32, y_tolerance: f32) {
        if ch.is_whitespace() {
            self.flush();
            return;
        }

        let continues = self.pending.as_ref().map_or(false, |word| {
            (word.y - y).abs() < y_tolerance && (x0 - word.x1).abs() <= font_size * 0.15
        });

        if continues {
            if let Some(word) = self.pending.as_mut() {
                word.text.push(ch);
                word.x1 = word.x1.max(x1);
                word.font_size = word.font_size.max(font_size);
            }
        } else {
            self.flush();
            self.pending = Some(RawWord {
                text: ch.to_string(),
                x0: x0.min(x1),
                x1: x0.max(x1),
                y,
                font_size,
            });
        }
    }

    fn flush(&mut self) {
        if let Some(word) = self.pending.take() {
            self.words.push(word);
        }
    }

    fn finish(mut self) -> Vec<RawWord> {
        self.flush();
        self.words
    }
}

/// Walk a page's content stream and collect positioned words
fn extract_raw_words(
    doc: &Document,
    page_id: ObjectId,
    config: &ExtractionConfig,
) -> Result<Vec<RawWord>, HighlightError> {
    use lopdf::content::Content;

    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let metrics: HashMap<Vec<u8>, FontMetrics> = fonts
        .iter()
        .map(|(name, dict)| (name.clone(), FontMetrics::from_dict(doc, dict)))
        .collect();

    let content_data = doc.get_page_content(page_id)?;
    let content = Content::decode(&content_data)?;

    let mut collector = WordCollector::default();

    // Graphics state tracking
    let mut ctm = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut ctm_stack: Vec<[f32; 6]> = Vec::new();

    let mut state = TextState::default();
    let mut text_matrix = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut line_matrix = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut in_text_block = false;

    let shower = GlyphShower {
        doc,
        fonts: &fonts,
        metrics: &metrics,
        config,
    };

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => ctm_stack.push(ctm),
            "Q" => {
                if let Some(saved) = ctm_stack.pop() {
                    ctm = saved;
                }
            }
            "cm" => {
                if operands.len() >= 6 {
                    let m = matrix_from_operands(operands);
                    ctm = multiply_matrices(&m, &ctm);
                }
            }
            "BT" => {
                in_text_block = true;
                text_matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                line_matrix = text_matrix;
            }
            "ET" => in_text_block = false,
            "Tf" => {
                if operands.len() >= 2 {
                    if let Ok(name) = operands[0].as_name() {
                        state.font = String::from_utf8_lossy(name).to_string();
                    }
                    if let Some(size) = get_number(&operands[1]) {
                        state.font_size = size;
                    }
                }
            }
            "Tc" => {
                if let Some(v) = operands.first().and_then(get_number) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = operands.first().and_then(get_number) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = operands.first().and_then(get_number) {
                    state.horizontal_scale = v / 100.0;
                }
            }
            "TL" => {
                if let Some(v) = operands.first().and_then(get_number) {
                    state.leading = v;
                }
            }
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    let tx = get_number(&operands[0]).unwrap_or(0.0);
                    let ty = get_number(&operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    line_matrix = multiply_matrices(&translation(tx, ty), &line_matrix);
                    text_matrix = line_matrix;
                }
            }
            "Tm" => {
                if operands.len() >= 6 {
                    text_matrix = matrix_from_operands(operands);
                    line_matrix = text_matrix;
                }
            }
            "T*" => {
                line_matrix =
                    multiply_matrices(&translation(0.0, -state.line_advance()), &line_matrix);
                text_matrix = line_matrix;
            }
            "Tj" => {
                if in_text_block {
                    if let Some(operand) = operands.first() {
                        shower.show(operand, &state, &mut text_matrix, &ctm, &mut collector);
                    }
                }
            }
            "TJ" => {
                if in_text_block {
                    if let Some(Ok(array)) = operands.first().map(|o| o.as_array()) {
                        for element in array {
                            match get_number(element) {
                                Some(adjust) => shower.kern(
                                    adjust,
                                    &state,
                                    &mut text_matrix,
                                    &mut collector,
                                ),
                                None => shower.show(
                                    element,
                                    &state,
                                    &mut text_matrix,
                                    &ctm,
                                    &mut collector,
                                ),
                            }
                        }
                    }
                }
            }
            "'" | "\"" => {
                if op.operator == "\"" && operands.len() >= 3 {
                    state.word_spacing = get_number(&operands[0]).unwrap_or(state.word_spacing);
                    state.char_spacing = get_number(&operands[1]).unwrap_or(state.char_spacing);
                }
                line_matrix =
                    multiply_matrices(&translation(0.0, -state.line_advance()), &line_matrix);
                text_matrix = line_matrix;
                if let Some(operand) = operands.last() {
                    shower.show(operand, &state, &mut text_matrix, &ctm, &mut collector);
                }
            }
            _ => {}
        }
    }

    Ok(collector.finish())
}

/// Shows strings: decodes them, advances the text matrix glyph by glyph and
/// feeds the glyphs to the collector in page space.
struct GlyphShower<'a> {
    doc: &'a Document,
    fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
    metrics: &'a HashMap<Vec<u8>, FontMetrics>,
    config: &'a ExtractionConfig,
}

impl<'a> GlyphShower<'a> {
    fn show(
        &self,
        operand: &Object,
        state: &TextState,
        text_matrix: &mut [f32; 6],
        ctm: &[f32; 6],
        collector: &mut WordCollector,
    ) {
        let Object::String(bytes, _) = operand else {
            return;
        };
        let Some(text) = decode_string(bytes, self.doc, self.fonts, &state.font) else {
            return;
        };

        let metrics = self.metrics.get(state.font.as_bytes());
        // Byte-per-glyph fonts can use their width table directly
        let single_byte = text.chars().count() == bytes.len();

        for (i, ch) in text.chars().enumerate() {
            let glyph_width = if single_byte {
                metrics
                    .and_then(|m| m.width(bytes[i]))
                    .map(|w| w / 1000.0)
                    .unwrap_or(DEFAULT_GLYPH_WIDTH)
            } else {
                DEFAULT_GLYPH_WIDTH
            };

            let mut advance = glyph_width * state.font_size + state.char_spacing;
            if ch == ' ' {
                advance += state.word_spacing;
            }
            advance *= state.horizontal_scale;

            let combined = multiply_matrices(text_matrix, ctm);
            let rendered_size = effective_font_size(state.font_size, &combined);
            let start_x = combined[4];
            let y = combined[5];
            let end_x = combined[0] * (glyph_width * state.font_size * state.horizontal_scale)
                + combined[4];

            collector.push_glyph(ch, start_x, end_x, y, rendered_size, self.config.y_tolerance);

            *text_matrix = multiply_matrices(&translation(advance, 0.0), text_matrix);
        }
    }

    fn kern(
        &self,
        adjust: f32,
        state: &TextState,
        text_matrix: &mut [f32; 6],
        collector: &mut WordCollector,
    ) {
        if adjust < -self.config.kerning_word_break {
            collector.flush();
        }
        let tx = -adjust / 1000.0 * state.font_size * state.horizontal_scale;
        *text_matrix = multiply_matrices(&translation(tx, 0.0), text_matrix);
    }
}

fn matrix_from_operands(operands: &[Object]) -> [f32; 6] {
    let mut m = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    for (i, operand) in operands.iter().take(6).enumerate() {
        m[i] = get_number(operand).unwrap_or(if i == 0 || i == 3 { 1.0 } else { 0.0 });
    }
    m
}

/// Helper to get f32 from Object
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Compute effective font size from base size and text matrix
fn effective_font_size(base_size: f32, matrix: &[f32; 6]) -> f32 {
    let scale_x = (matrix[0].powi(2) + matrix[1].powi(2)).sqrt();
    let scale_y = (matrix[2].powi(2) + matrix[3].powi(2)).sqrt();
    base_size * scale_x.max(scale_y)
}

/// Decode a string operand using the current font's encoding
fn decode_string(
    bytes: &[u8],
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    current_font: &str,
) -> Option<String> {
    if let Some(font_dict) = fonts.get(current_font.as_bytes()) {
        if let Ok(encoding) = font_dict.get_font_encoding(doc) {
            if let Ok(text) = Document::decode_text(&encoding, bytes) {
                return Some(text);
            }
        }
    }

    // Fallback: try UTF-16BE then Latin-1
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return Some(String::from_utf16_lossy(&utf16));
    }

    Some(bytes.iter().map(|&b| b as char).collect())
}

/// Represents a column region on a page
#[derive(Debug, Clone, PartialEq)]
struct ColumnRegion {
    x_min: f32,
    x_max: f32,
}

impl ColumnRegion {
    fn contains(&self, x: f32) -> bool {
        x >= self.x_min && x < self.x_max
    }
}

/// Detect column boundaries from vertical gutters no word box crosses
fn detect_columns(words: &[RawWord], config: &ExtractionConfig) -> Vec<ColumnRegion> {
    if words.is_empty() {
        return vec![];
    }

    let x_min = words.iter().map(|w| w.x0).fold(f32::INFINITY, f32::min);
    let x_max = words.iter().map(|w| w.x1).fold(f32::NEG_INFINITY, f32::max);
    let single = vec![ColumnRegion {
        x_min,
        x_max: x_max + 1.0,
    }];

    let text_width = x_max - x_min;
    if text_width < 200.0 || words.len() < config.min_column_items {
        return single;
    }

    let mut spans: Vec<(f32, f32)> = words.iter().map(|w| (w.x0, w.x1)).collect();
    spans.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    // Sweep the merged horizontal coverage of all word boxes
    let min_gutter = median_font_size(words) * config.column_gutter_em;
    let mut boundaries = vec![x_min];
    let mut covered_to = spans[0].1;
    for &(x0, x1) in &spans[1..] {
        if x0 - covered_to > min_gutter {
            boundaries.push((covered_to + x0) / 2.0);
        }
        covered_to = covered_to.max(x1);
    }
    boundaries.push(x_max + 1.0);

    let columns: Vec<ColumnRegion> = boundaries
        .windows(2)
        .map(|b| ColumnRegion {
            x_min: b[0],
            x_max: b[1],
        })
        .collect();

    if columns.len() < 2 {
        return single;
    }

    // Each column must carry a substantial share of the words
    let counts: Vec<usize> = columns
        .iter()
        .map(|col| words.iter().filter(|w| col.contains(w.x0)).count())
        .collect();
    let min_share = words.len() / 5;
    if counts.iter().all(|&c| c >= min_share) {
        return columns;
    }

    // Merge sparse columns into their substantial neighbours
    let first = counts.iter().position(|&c| c >= min_share);
    let last = counts.iter().rposition(|&c| c >= min_share);
    if let (Some(first), Some(last)) = (first, last) {
        if first != last {
            return vec![
                ColumnRegion {
                    x_min: columns[0].x_min,
                    x_max: columns[first].x_max,
                },
                ColumnRegion {
                    x_min: columns[last].x_min,
                    x_max: columns[columns.len() - 1].x_max,
                },
            ];
        }
    }

    single
}

fn median_font_size(words: &[RawWord]) -> f32 {
    let mut sizes: Vec<f32> = words.iter().map(|w| w.font_size).collect();
    sizes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sizes.get(sizes.len() / 2).copied().unwrap_or(0.0)
}

/// A line of words inside one column
#[derive(Debug)]
struct RawLine {
    words: Vec<RawWord>,
    y: f32,
    font_size: f32,
}

/// Group a column's words into lines.
/// Preserves stream order and only merges a word into the most recent line.
fn group_single_column(words: Vec<RawWord>, y_tolerance: f32) -> Vec<RawLine> {
    let mut lines: Vec<RawLine> = Vec::new();

    for word in words {
        match lines.last_mut() {
            Some(line) if (line.y - word.y).abs() < y_tolerance => {
                line.font_size = line.font_size.max(word.font_size);
                line.words.push(word);
            }
            _ => lines.push(RawLine {
                y: word.y,
                font_size: word.font_size,
                words: vec![word],
            }),
        }
    }

    for line in &mut lines {
        line.words
            .sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));
    }

    lines
}

/// Assign block, line and word ids in reading order
fn assign_layout(words: Vec<RawWord>, config: &ExtractionConfig) -> Vec<WordToken> {
    let columns = detect_columns(&words, config);
    let mut per_column: Vec<Vec<RawWord>> = vec![Vec::new(); columns.len()];
    for word in words {
        let idx = columns
            .iter()
            .position(|c| c.contains(word.x0))
            .unwrap_or(columns.len().saturating_sub(1));
        per_column[idx].push(word);
    }

    let mut tokens = Vec::new();
    let mut block_id: u32 = 0;
    let mut started = false;

    for column_words in per_column {
        let lines = group_single_column(column_words, config.y_tolerance);
        let mut prev: Option<(f32, f32)> = None;
        let mut line_id: u32 = 0;

        for line in lines {
            let new_block = match prev {
                None => true,
                Some((prev_y, prev_size)) => {
                    let gap = prev_y - line.y;
                    let size = prev_size.max(line.font_size);
                    // Moving up the page, or a gap wider than normal leading
                    gap < 0.0 || gap > size * config.block_gap_factor
                }
            };

            if new_block {
                if started {
                    block_id += 1;
                }
                started = true;
                line_id = 0;
            } else {
                line_id += 1;
            }

            prev = Some((line.y, line.font_size));
            for (word_index, word) in line.words.into_iter().enumerate() {
                tokens.push(WordToken::new(
                    word.bbox(),
                    word.text,
                    block_id,
                    line_id,
                    word_index as u32,
                ));
            }
        }
    }

    tokens
}
