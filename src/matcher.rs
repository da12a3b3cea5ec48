//! Phrase matching over a word stream
//!
//! A phrase matches a window of the stream when every word is textually
//! equal (case-sensitive, no normalization) and every consecutive pair of
//! the window passes [`adjacency`]. The adjacency check is what keeps the
//! tail of one column from matching together with the head of the next.

use crate::words::{adjacency, BBox, WordToken};
use std::fmt;
use std::str::FromStr;

/// An ordered list of words to search for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phrase {
    words: Vec<String>,
}

impl Phrase {
    /// Split a phrase on single spaces.
    ///
    /// Consecutive spaces produce empty words, which never match an
    /// extracted word. Returns `None` for an empty string.
    pub fn parse(phrase: &str) -> Option<Self> {
        if phrase.is_empty() {
            return None;
        }
        Some(Self {
            words: phrase.split(' ').map(str::to_string).collect(),
        })
    }

    /// Build a phrase from already separated words. Returns `None` if empty.
    pub fn from_words<I, S>(words: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            None
        } else {
            Some(Self { words })
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromStr for Phrase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phrase::parse(s).ok_or_else(|| "phrase must not be empty".to_string())
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.words.join(" "))
    }
}

/// One validated occurrence of a phrase
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSpan {
    /// Index of the first matched token in the word stream
    pub start: usize,
    /// Boxes of the matched words, in phrase order
    pub boxes: Vec<BBox>,
}

/// Lazy iterator over the matches of a phrase in a word stream
pub struct Matches<'a> {
    words: &'a [WordToken],
    phrase: &'a Phrase,
    next_start: usize,
}

impl<'a> Iterator for Matches<'a> {
    type Item = MatchSpan;

    fn next(&mut self) -> Option<MatchSpan> {
        let len = self.phrase.len();
        if len > self.words.len() {
            return None;
        }
        let last_start = self.words.len() - len;

        while self.next_start <= last_start {
            let start = self.next_start;
            self.next_start += 1;

            let window = &self.words[start..start + len];
            if window_matches(window, self.phrase) {
                return Some(MatchSpan {
                    start,
                    boxes: window.iter().map(|w| w.bbox).collect(),
                });
            }
        }

        None
    }
}

fn window_matches(window: &[WordToken], phrase: &Phrase) -> bool {
    let text_equal = window
        .iter()
        .zip(phrase.words())
        .all(|(word, target)| word.text == *target);

    text_equal && window.windows(2).all(|pair| adjacency(&pair[0], &pair[1]))
}

/// Find every occurrence of `phrase` in `words`.
///
/// Overlapping windows are evaluated independently, so `"the the"` against
/// three consecutive `"the"` on one line yields two matches.
pub fn find_phrase<'a>(words: &'a [WordToken], phrase: &'a Phrase) -> Matches<'a> {
    Matches {
        words,
        phrase,
        next_start: 0,
    }
}

/// Boxes of every matched word, flattened in document order.
///
/// An empty result means the phrase does not occur in this stream.
pub fn extract_locs_by_phrase(words: &[WordToken], phrase: &Phrase) -> Vec<BBox> {
    find_phrase(words, phrase)
        .flat_map(|span| span.boxes)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(x0: f32, y0: f32, x1: f32, y1: f32, text: &str, block: u32, line: u32, idx: u32) -> WordToken {
        WordToken::new(BBox::new(x0, y0, x1, y1), text, block, line, idx)
    }

    fn first_of_all() -> Vec<WordToken> {
        vec![
            token(0.0, 0.0, 10.0, 10.0, "First", 0, 0, 0),
            token(15.0, 0.0, 25.0, 10.0, "of", 0, 0, 1),
            token(30.0, 0.0, 40.0, 10.0, "all", 0, 0, 2),
        ]
    }

    fn phrase(s: &str) -> Phrase {
        Phrase::parse(s).unwrap()
    }

    #[test]
    fn test_phrase_parse() {
        assert_eq!(phrase("On the contrary").words(), &["On", "the", "contrary"]);
        assert_eq!(phrase("a  b").words(), &["a", "", "b"]);
        assert!(Phrase::parse("").is_none());
        assert_eq!(phrase("On the contrary").to_string(), "On the contrary");
    }

    #[test]
    fn test_multi_word_match() {
        let locs = extract_locs_by_phrase(&first_of_all(), &phrase("First of all"));
        assert_eq!(
            locs,
            vec![
                BBox::new(0.0, 0.0, 10.0, 10.0),
                BBox::new(15.0, 0.0, 25.0, 10.0),
                BBox::new(30.0, 0.0, 40.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_cross_block_rejected() {
        let mut words = first_of_all();
        words.push(token(100.0, 0.0, 110.0, 10.0, "First", 1, 0, 0));
        words.push(token(115.0, 0.0, 125.0, 10.0, "column", 1, 0, 1));

        assert!(extract_locs_by_phrase(&words, &phrase("all First")).is_empty());
        assert_eq!(extract_locs_by_phrase(&words, &phrase("First column")).len(), 2);
    }

    #[test]
    fn test_cross_line_rejected() {
        let words = vec![
            token(0.0, 20.0, 10.0, 30.0, "end", 0, 0, 0),
            token(0.0, 0.0, 10.0, 10.0, "start", 0, 1, 0),
        ];
        assert!(extract_locs_by_phrase(&words, &phrase("end start")).is_empty());
    }

    #[test]
    fn test_single_word_occurrences() {
        let mut words = first_of_all();
        words.push(token(0.0, 15.0, 10.0, 25.0, "First", 0, 1, 0));

        let locs = extract_locs_by_phrase(&words, &phrase("First"));
        assert_eq!(
            locs,
            vec![BBox::new(0.0, 0.0, 10.0, 10.0), BBox::new(0.0, 15.0, 10.0, 25.0)]
        );
    }

    #[test]
    fn test_case_sensitive() {
        assert!(extract_locs_by_phrase(&first_of_all(), &phrase("first")).is_empty());
        assert!(extract_locs_by_phrase(&first_of_all(), &phrase("all.")).is_empty());
    }

    #[test]
    fn test_overlapping_windows_all_emitted() {
        let words = vec![
            token(0.0, 0.0, 10.0, 10.0, "the", 0, 0, 0),
            token(15.0, 0.0, 25.0, 10.0, "the", 0, 0, 1),
            token(30.0, 0.0, 40.0, 10.0, "the", 0, 0, 2),
        ];
        let p = phrase("the the");

        let spans: Vec<MatchSpan> = find_phrase(&words, &p).collect();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[1].start, 1);

        let locs = extract_locs_by_phrase(&words, &p);
        // Two boxes per window, the middle word appears in both
        assert_eq!(locs.len(), 4);
        assert_eq!(locs[1], locs[2]);
    }

    #[test]
    fn test_phrase_longer_than_stream() {
        let p = phrase("First of all and more");
        assert!(extract_locs_by_phrase(&first_of_all(), &p).is_empty());
        assert!(extract_locs_by_phrase(&[], &phrase("x")).is_empty());
    }

    #[test]
    fn test_iterator_is_lazy_and_resumable() {
        let words = vec![
            token(0.0, 0.0, 10.0, 10.0, "a", 0, 0, 0),
            token(15.0, 0.0, 25.0, 10.0, "b", 0, 0, 1),
            token(30.0, 0.0, 40.0, 10.0, "a", 0, 0, 2),
        ];
        let p = phrase("a");
        let mut matches = find_phrase(&words, &p);
        assert_eq!(matches.next().map(|m| m.start), Some(0));
        assert_eq!(matches.next().map(|m| m.start), Some(2));
        assert!(matches.next().is_none());
        assert!(matches.next().is_none());
    }
}
