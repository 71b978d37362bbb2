//! Filled shape element.

use super::StylePatch;
use serde::{Deserialize, Serialize};

/// Clip path used for triangles.
pub const TRIANGLE_CLIP: &str = "polygon(50% 0%, 0% 100%, 100% 100%)";

/// Shape presets offered by the shape tool.
///
/// The preset only decides the initial style; a stored shape is just a
/// filled box with optional rounding and clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Triangle,
}

/// Fill and outline of a shape. A shape without a fill is transparent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeStyle {
    pub fill: Option<String>,
    pub border_radius: Option<String>,
    pub clip_path: Option<String>,
}

impl ShapeStyle {
    /// Initial style for a shape preset.
    pub fn for_kind(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Rectangle => Self {
                fill: Some("#3B82F6".to_string()),
                border_radius: None,
                clip_path: None,
            },
            ShapeKind::Circle => Self {
                fill: Some("#EF4444".to_string()),
                border_radius: Some("50%".to_string()),
                clip_path: None,
            },
            ShapeKind::Triangle => Self {
                fill: Some("#F59E0B".to_string()),
                border_radius: None,
                clip_path: Some(TRIANGLE_CLIP.to_string()),
            },
        }
    }

    /// Apply fill, rounding and clip from a patch; typography is ignored.
    pub fn apply(&mut self, patch: &StylePatch) {
        if let Some(fill) = &patch.background_color {
            self.fill = Some(fill.clone());
        }
        if let Some(radius) = &patch.border_radius {
            self.border_radius = Some(radius.clone());
        }
        if let Some(clip) = &patch.clip_path {
            self.clip_path = Some(clip.clone());
        }
    }

    pub fn to_patch(&self) -> StylePatch {
        StylePatch {
            background_color: self.fill.clone(),
            border_radius: self.border_radius.clone(),
            clip_path: self.clip_path.clone(),
            ..StylePatch::default()
        }
    }
}

/// A filled box, optionally rounded or clipped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeElement {
    pub style: ShapeStyle,
}

impl ShapeElement {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            style: ShapeStyle::for_kind(kind),
        }
    }
}
