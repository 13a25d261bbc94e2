//! Entry color tags

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Color applied when an entry carries no tag.
pub const DEFAULT_COLOR_TAG: &str = "#3b82f6";

/// A named swatch offered by color pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor {
    pub name: &'static str,
    pub value: &'static str,
}

/// The fixed palette offered to users. Stored tags are free-form strings.
pub const COLOR_PALETTE: [PaletteColor; 8] = [
    PaletteColor { name: "Red", value: "#ef4444" },
    PaletteColor { name: "Orange", value: "#f97316" },
    PaletteColor { name: "Yellow", value: "#eab308" },
    PaletteColor { name: "Green", value: "#22c55e" },
    PaletteColor { name: "Blue", value: "#3b82f6" },
    PaletteColor { name: "Purple", value: "#a855f7" },
    PaletteColor { name: "Pink", value: "#ec4899" },
    PaletteColor { name: "Gray", value: "#6b7280" },
];

/// Color tag of an entry. Blank values fall back to [`DEFAULT_COLOR_TAG`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ColorTag(String);

impl ColorTag {
    /// Wrap a stored tag, substituting the default for blank input.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() {
            Self::default()
        } else {
            Self(value.to_string())
        }
    }

    /// Parse user input: a palette name (any case), a palette value, or a hex color.
    pub fn parse_choice(input: &str) -> Result<Self> {
        let input = input.trim();
        if let Some(color) = COLOR_PALETTE
            .iter()
            .find(|color| color.name.eq_ignore_ascii_case(input))
        {
            return Ok(Self(color.value.to_string()));
        }
        if hex_color_regex().is_match(input) {
            return Ok(Self(input.to_ascii_lowercase()));
        }
        Err(Error::validation(format!(
            "Unknown color '{input}'. Use a palette name or a hex value like #3b82f6"
        )))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Palette name for this tag, if it is one of the palette swatches.
    #[must_use]
    pub fn palette_name(&self) -> Option<&'static str> {
        COLOR_PALETTE
            .iter()
            .find(|color| color.value.eq_ignore_ascii_case(&self.0))
            .map(|color| color.name)
    }
}

impl Default for ColorTag {
    fn default() -> Self {
        Self(DEFAULT_COLOR_TAG.to_string())
    }
}

impl From<String> for ColorTag {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<ColorTag> for String {
    fn from(value: ColorTag) -> Self {
        value.0
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn hex_color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("Invalid regex")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tag_falls_back_to_blue() {
        assert_eq!(ColorTag::new("  ").as_str(), DEFAULT_COLOR_TAG);
        assert_eq!(ColorTag::default().palette_name(), Some("Blue"));
    }

    #[test]
    fn deserializing_empty_string_uses_default() {
        let tag: ColorTag = serde_json::from_str("\"\"").unwrap();
        assert_eq!(tag, ColorTag::default());
    }

    #[test]
    fn parse_choice_accepts_names_and_hex() {
        assert_eq!(ColorTag::parse_choice("purple").unwrap().as_str(), "#a855f7");
        assert_eq!(ColorTag::parse_choice("#ABCDEF").unwrap().as_str(), "#abcdef");
        assert!(ColorTag::parse_choice("sky").is_err());
        assert!(ColorTag::parse_choice("#12345").is_err());
    }

    #[test]
    fn free_form_tags_have_no_palette_name() {
        assert_eq!(ColorTag::new("#123456").palette_name(), None);
    }
}
