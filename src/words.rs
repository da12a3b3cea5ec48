//! Word stream model
//!
//! A page's text as an ordered list of word tokens, each carrying its
//! bounding box and the block/line/word ids assigned by the extractor.
//! The ids are the only signal used to decide whether two consecutive
//! tokens are on the same printed line.

use crate::HighlightError;
use serde_json::Value;

/// A rectangle in PDF user space (origin at bottom-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

impl From<(f32, f32, f32, f32)> for BBox {
    fn from((x0, y0, x1, y1): (f32, f32, f32, f32)) -> Self {
        BBox::new(x0, y0, x1, y1)
    }
}

/// One extracted word with its position metadata
#[derive(Debug, Clone, PartialEq)]
pub struct WordToken {
    /// Bounding box on the page
    pub bbox: BBox,
    /// The literal word
    pub text: String,
    /// Layout block (column or region) the word belongs to
    pub block_id: u32,
    /// Line inside the block
    pub line_id: u32,
    /// Position of the word inside its line
    pub word_index: u32,
}

/// Extractor tuple: `(x0, y0, x1, y1, text, block_id, line_id, word_index)`
pub type WordTuple = (f32, f32, f32, f32, String, u32, u32, u32);

impl WordToken {
    pub fn new(
        bbox: BBox,
        text: impl Into<String>,
        block_id: u32,
        line_id: u32,
        word_index: u32,
    ) -> Self {
        Self {
            bbox,
            text: text.into(),
            block_id,
            line_id,
            word_index,
        }
    }

    pub fn from_tuple(tuple: WordTuple) -> Self {
        let (x0, y0, x1, y1, text, block_id, line_id, word_index) = tuple;
        Self::new(BBox::new(x0, y0, x1, y1), text, block_id, line_id, word_index)
    }

    pub fn to_tuple(&self) -> WordTuple {
        (
            self.bbox.x0,
            self.bbox.y0,
            self.bbox.x1,
            self.bbox.y1,
            self.text.clone(),
            self.block_id,
            self.line_id,
            self.word_index,
        )
    }
}

/// Whether `next` may continue a phrase run that `prev` belongs to.
///
/// Both tokens must sit in the same block and on the same line. Word order
/// within the line is taken from the stream as-is.
pub fn adjacency(prev: &WordToken, next: &WordToken) -> bool {
    prev.block_id == next.block_id && prev.line_id == next.line_id
}

const FIELD_NAMES: [&str; 8] = [
    "x0",
    "y0",
    "x1",
    "y1",
    "text",
    "block_id",
    "line_id",
    "word_index",
];

/// Parse a word stream serialized as a JSON array of 8-element arrays.
///
/// Any token with a missing or mistyped field is rejected with
/// [`HighlightError::ContractViolation`]; tokens are never skipped.
pub fn word_tokens_from_json(json: &str) -> Result<Vec<WordToken>, HighlightError> {
    let value: Value = serde_json::from_str(json).map_err(|e| HighlightError::ContractViolation {
        index: 0,
        message: format!("word stream is not valid JSON: {}", e),
    })?;

    let entries = value
        .as_array()
        .ok_or_else(|| HighlightError::ContractViolation {
            index: 0,
            message: "word stream must be an array".to_string(),
        })?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| word_token_from_value(index, entry))
        .collect()
}

fn word_token_from_value(index: usize, entry: &Value) -> Result<WordToken, HighlightError> {
    let violation = |message: String| HighlightError::ContractViolation { index, message };

    let fields = entry
        .as_array()
        .ok_or_else(|| violation("token must be an array".to_string()))?;
    if fields.len() < FIELD_NAMES.len() {
        return Err(violation(format!(
            "missing field `{}` (got {} of {} fields)",
            FIELD_NAMES[fields.len()],
            fields.len(),
            FIELD_NAMES.len()
        )));
    }

    let coord = |i: usize| {
        fields[i]
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| violation(format!("field `{}` must be a number", FIELD_NAMES[i])))
    };
    let id = |i: usize| {
        fields[i]
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| {
                violation(format!(
                    "field `{}` must be a non-negative integer",
                    FIELD_NAMES[i]
                ))
            })
    };
    let text = fields[4]
        .as_str()
        .ok_or_else(|| violation("field `text` must be a string".to_string()))?;

    Ok(WordToken::new(
        BBox::new(coord(0)?, coord(1)?, coord(2)?, coord(3)?),
        text,
        id(5)?,
        id(6)?,
        id(7)?,
    ))
}

/// Serialize a word stream in the same tuple shape `word_tokens_from_json` reads
pub fn word_tokens_to_json(words: &[WordToken]) -> String {
    let tuples: Vec<Value> = words
        .iter()
        .map(|w| {
            serde_json::json!([
                w.bbox.x0,
                w.bbox.y0,
                w.bbox.x1,
                w.bbox.y1,
                w.text,
                w.block_id,
                w.line_id,
                w.word_index
            ])
        })
        .collect();
    Value::Array(tuples).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, block_id: u32, line_id: u32, word_index: u32) -> WordToken {
        WordToken::new(BBox::new(0.0, 0.0, 10.0, 10.0), text, block_id, line_id, word_index)
    }

    #[test]
    fn test_adjacency_same_block_and_line() {
        assert!(adjacency(&word("a", 0, 0, 0), &word("b", 0, 0, 1)));
    }

    #[test]
    fn test_adjacency_ignores_word_index() {
        assert!(adjacency(&word("a", 2, 3, 5), &word("b", 2, 3, 1)));
    }

    #[test]
    fn test_adjacency_rejects_other_block_or_line() {
        assert!(!adjacency(&word("a", 0, 0, 2), &word("b", 1, 0, 0)));
        assert!(!adjacency(&word("a", 0, 0, 2), &word("b", 0, 1, 0)));
    }

    #[test]
    fn test_tuple_conversion() {
        let token = WordToken::from_tuple((0.0, 0.0, 10.0, 10.0, "First".to_string(), 0, 0, 0));
        assert_eq!(token.text, "First");
        assert_eq!(token.bbox, BBox::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(token.to_tuple().4, "First");
    }

    #[test]
    fn test_bbox_union() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(15.0, -5.0, 25.0, 8.0);
        assert_eq!(a.union(&b), BBox::new(0.0, -5.0, 25.0, 10.0));
    }

    #[test]
    fn test_parse_word_stream() {
        let json = r#"[[0, 0, 10, 10, "First", 0, 0, 0], [15.5, 0, 25, 10, "of", 0, 0, 1]]"#;
        let words = word_tokens_from_json(json).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].text, "of");
        assert_eq!(words[1].bbox.x0, 15.5);
        assert_eq!(words[1].word_index, 1);
    }

    #[test]
    fn test_parse_missing_field_is_contract_violation() {
        let json = r#"[[0, 0, 10, 10, "First", 0, 0, 0], [15, 0, 25, 10, "of", 0]]"#;
        match word_tokens_from_json(json) {
            Err(HighlightError::ContractViolation { index, message }) => {
                assert_eq!(index, 1);
                assert!(message.contains("line_id"));
            }
            other => panic!("expected contract violation, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_mistyped_field_is_contract_violation() {
        let json = r#"[[0, 0, 10, 10, 42, 0, 0, 0]]"#;
        assert!(matches!(
            word_tokens_from_json(json),
            Err(HighlightError::ContractViolation { index: 0, .. })
        ));

        let json = r#"[[0, 0, 10, 10, "x", -1, 0, 0]]"#;
        assert!(matches!(
            word_tokens_from_json(json),
            Err(HighlightError::ContractViolation { index: 0, .. })
        ));
    }

    #[test]
    fn test_json_dump_is_readable_back() {
        let words = vec![word("Hello", 0, 0, 0), word("world", 0, 0, 1)];
        let parsed = word_tokens_from_json(&word_tokens_to_json(&words)).unwrap();
        assert_eq!(parsed, words);
    }
}
