//! Color → phrase configuration
//!
//! The configuration is a JSON object mapping a color name to the phrases
//! highlighted in that color:
//!
//! ```json
//! { "yellow": ["On the contrary", "however"], "red": ["integration"] }
//! ```
//!
//! Everything is validated at load time so a bad file fails the run before
//! any page is touched.

use crate::color_names::named_color;
use crate::matcher::Phrase;
use crate::HighlightError;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// An RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9A-F]{2})([0-9A-F]{2})([0-9A-F]{2})$").unwrap());

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Resolve a color name (case-insensitive) or a `#RRGGBB` hex string
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_uppercase();

        if let Some(caps) = HEX_COLOR.captures(&upper) {
            let channel = |i: usize| u8::from_str_radix(&caps[i], 16).ok();
            return Some(Color::from_rgb8(channel(1)?, channel(2)?, channel(3)?));
        }

        let (r, g, b) = named_color(&upper)?;
        Some(Color::from_rgb8(r, g, b))
    }

    fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }
}

/// The configuration file as written, before validation
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct RawColorConfig(IndexMap<String, Vec<String>>);

/// One configured color and its phrases
#[derive(Debug, Clone)]
pub struct ColorEntry {
    /// Color name, upper-cased
    pub name: String,
    pub color: Color,
    pub phrases: Vec<Phrase>,
}

/// Mapping from color to the phrases highlighted in it, in file order
#[derive(Debug, Clone, Default)]
pub struct ColorMapping {
    entries: Vec<ColorEntry>,
}

impl ColorMapping {
    /// Load the mapping from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HighlightError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| HighlightError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&data).map_err(|message| HighlightError::Config {
            path: path.display().to_string(),
            message,
        })
    }

    /// Parse the mapping from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, HighlightError> {
        Self::parse(json).map_err(|message| HighlightError::Config {
            path: "<inline>".to_string(),
            message,
        })
    }

    fn parse(json: &str) -> Result<Self, String> {
        let RawColorConfig(raw) = serde_json::from_str(json)
            .map_err(|e| format!("expected an object of color -> [phrase, ...]: {}", e))?;

        let mut entries: Vec<ColorEntry> = Vec::with_capacity(raw.len());
        for (key, values) in raw {
            let name = key.trim().to_uppercase();
            if entries.iter().any(|e| e.name == name) {
                return Err(format!("color `{}` is configured more than once", name));
            }
            let color =
                Color::from_name(&name).ok_or_else(|| format!("unknown color `{}`", key))?;

            let phrases = values
                .iter()
                .map(|value| {
                    Phrase::parse(value)
                        .ok_or_else(|| format!("empty phrase configured for color `{}`", key))
                })
                .collect::<Result<Vec<_>, _>>()?;

            entries.push(ColorEntry {
                name,
                color,
                phrases,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    /// Total number of configured phrases across all colors
    pub fn phrase_count(&self) -> usize {
        self.entries.iter().map(|e| e.phrases.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
