//! Text element.

use super::StylePatch;
use serde::{Deserialize, Serialize};

/// Placeholder content for new text elements.
pub const DEFAULT_TEXT: &str = "Double click to edit text";

/// Font families offered by the editor.
pub const FONT_FAMILIES: [&str; 10] = [
    "Arial",
    "Helvetica",
    "Georgia",
    "Times New Roman",
    "Courier New",
    "Verdana",
    "Impact",
    "Comic Sans MS",
    "Trebuchet MS",
    "Palatino",
];

/// Font weight. Numeric CSS weights of 600 and above read as bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// Flip between normal and bold.
    pub fn toggled(self) -> Self {
        match self {
            FontWeight::Normal => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Normal,
        }
    }
}

impl From<String> for FontWeight {
    fn from(value: String) -> Self {
        match value.as_str() {
            "bold" | "bolder" => FontWeight::Bold,
            other => match other.parse::<u32>() {
                Ok(weight) if weight >= 600 => FontWeight::Bold,
                _ => FontWeight::Normal,
            },
        }
    }
}

impl From<FontWeight> for String {
    fn from(value: FontWeight) -> Self {
        match value {
            FontWeight::Normal => "normal".to_string(),
            FontWeight::Bold => "bold".to_string(),
        }
    }
}

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
}

impl FontSlant {
    pub fn toggled(self) -> Self {
        match self {
            FontSlant::Normal => FontSlant::Italic,
            FontSlant::Italic => FontSlant::Normal,
        }
    }
}

impl From<String> for FontSlant {
    fn from(value: String) -> Self {
        match value.as_str() {
            "italic" | "oblique" => FontSlant::Italic,
            _ => FontSlant::Normal,
        }
    }
}

impl From<FontSlant> for String {
    fn from(value: FontSlant) -> Self {
        match value {
            FontSlant::Normal => "normal".to_string(),
            FontSlant::Italic => "italic".to_string(),
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl From<String> for TextAlign {
    fn from(value: String) -> Self {
        match value.as_str() {
            "center" => TextAlign::Center,
            "right" | "end" => TextAlign::Right,
            "justify" => TextAlign::Justify,
            _ => TextAlign::Left,
        }
    }
}

impl From<TextAlign> for String {
    fn from(value: TextAlign) -> Self {
        match value {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
        .to_string()
    }
}

/// Text decoration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

impl TextDecoration {
    /// Flip underline on or off.
    pub fn toggled_underline(self) -> Self {
        match self {
            TextDecoration::Underline => TextDecoration::None,
            _ => TextDecoration::Underline,
        }
    }
}

impl From<String> for TextDecoration {
    fn from(value: String) -> Self {
        match value.as_str() {
            "underline" => TextDecoration::Underline,
            "line-through" => TextDecoration::LineThrough,
            _ => TextDecoration::None,
        }
    }
}

impl From<TextDecoration> for String {
    fn from(value: TextDecoration) -> Self {
        match value {
            TextDecoration::None => "none",
            TextDecoration::Underline => "underline",
            TextDecoration::LineThrough => "line-through",
        }
        .to_string()
    }
}

/// Typography of a text element.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub color: String,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub font_style: FontSlant,
    pub text_align: TextAlign,
    pub text_decoration: TextDecoration,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            color: "#000000".to_string(),
            font_family: "Arial".to_string(),
            font_weight: FontWeight::Normal,
            font_style: FontSlant::Normal,
            text_align: TextAlign::Left,
            text_decoration: TextDecoration::None,
        }
    }
}

impl TextStyle {
    /// Apply the typographic attributes of a patch; fill, rounding and clip are ignored.
    pub fn apply(&mut self, patch: &StylePatch) {
        if let Some(size) = patch.font_size {
            self.font_size = size;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(family) = &patch.font_family {
            self.font_family = family.clone();
        }
        if let Some(weight) = patch.font_weight {
            self.font_weight = weight;
        }
        if let Some(slant) = patch.font_style {
            self.font_style = slant;
        }
        if let Some(align) = patch.text_align {
            self.text_align = align;
        }
        if let Some(decoration) = patch.text_decoration {
            self.text_decoration = decoration;
        }
    }

    pub fn to_patch(&self) -> StylePatch {
        StylePatch {
            font_size: Some(self.font_size),
            color: Some(self.color.clone()),
            font_family: Some(self.font_family.clone()),
            font_weight: Some(self.font_weight),
            font_style: Some(self.font_style),
            text_align: Some(self.text_align),
            text_decoration: Some(self.text_decoration),
            ..StylePatch::default()
        }
    }
}

/// A block of styled text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub content: String,
    pub style: TextStyle,
}

impl TextElement {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: TextStyle::default(),
        }
    }
}

impl Default for TextElement {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_ignores_shape_attributes() {
        let mut style = TextStyle::default();
        style.apply(
            &StylePatch::new()
                .with_font_size(48.0)
                .with_background_color("#ff0000")
                .with_clip_path("circle(50%)"),
        );
        assert!((style.font_size - 48.0).abs() < f64::EPSILON);
        assert!(style.to_patch().background_color.is_none());
        assert!(style.to_patch().clip_path.is_none());
    }

    #[test]
    fn test_toggles() {
        assert_eq!(FontWeight::Normal.toggled(), FontWeight::Bold);
        assert_eq!(FontSlant::Italic.toggled(), FontSlant::Normal);
        assert_eq!(TextDecoration::None.toggled_underline(), TextDecoration::Underline);
        assert_eq!(TextDecoration::Underline.toggled_underline(), TextDecoration::None);
    }
}
