//! Sparse style attributes shared by the wire format and style edits.

use super::text::{FontSlant, FontWeight, TextAlign, TextDecoration};
use serde::{Deserialize, Serialize};

/// A sparse set of optional visual attributes.
///
/// This is the flat `style` object stored with every element, and also the
/// payload of a style edit: only the fields that are `Some` are applied. Each
/// element kind picks the attributes it understands and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Fill color (shapes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontSlant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    /// Corner rounding as a CSS length or percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    /// Clip shape as a CSS `clip-path` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_path: Option<String>,
}

impl StylePatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the patch sets nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow-merge another patch on top of this one.
    pub fn merge(&mut self, other: &StylePatch) {
        fn take<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if let Some(value) = src {
                *dst = Some(value.clone());
            }
        }
        take(&mut self.font_size, &other.font_size);
        take(&mut self.color, &other.color);
        take(&mut self.background_color, &other.background_color);
        take(&mut self.font_family, &other.font_family);
        take(&mut self.font_weight, &other.font_weight);
        take(&mut self.font_style, &other.font_style);
        take(&mut self.text_align, &other.text_align);
        take(&mut self.text_decoration, &other.text_decoration);
        take(&mut self.border_radius, &other.border_radius);
        take(&mut self.clip_path, &other.clip_path);
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn with_font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn with_font_style(mut self, slant: FontSlant) -> Self {
        self.font_style = Some(slant);
        self
    }

    pub fn with_text_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    pub fn with_text_decoration(mut self, decoration: TextDecoration) -> Self {
        self.text_decoration = Some(decoration);
        self
    }

    pub fn with_border_radius(mut self, radius: impl Into<String>) -> Self {
        self.border_radius = Some(radius.into());
        self
    }

    pub fn with_clip_path(mut self, clip: impl Into<String>) -> Self {
        self.clip_path = Some(clip.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_shallow() {
        let mut base = StylePatch::new().with_font_size(24.0).with_color("#000000");
        base.merge(&StylePatch::new().with_color("#ff0000").with_text_align(TextAlign::Center));

        assert_eq!(base.font_size, Some(24.0));
        assert_eq!(base.color.as_deref(), Some("#ff0000"));
        assert_eq!(base.text_align, Some(TextAlign::Center));
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let patch = StylePatch::new()
            .with_font_weight(FontWeight::Bold)
            .with_background_color("#3B82F6");
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["fontWeight"], "bold");
        assert_eq!(json["backgroundColor"], "#3B82F6");
        assert!(json.get("fontSize").is_none());
    }

    #[test]
    fn test_unknown_attribute_values_are_tolerated() {
        let patch: StylePatch =
            serde_json::from_str(r#"{"fontWeight":"600","textAlign":"start","unknown":1}"#).unwrap();
        assert_eq!(patch.font_weight, Some(FontWeight::Bold));
        assert_eq!(patch.text_align, Some(TextAlign::Left));
    }
}
