//! Image and video elements referencing externally hosted media.

use super::StylePatch;

/// Check whether a MIME type should become a video element.
pub fn is_video_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("video/")
}

/// Framing of an image or video.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaStyle {
    pub border_radius: Option<String>,
    pub clip_path: Option<String>,
}

impl MediaStyle {
    pub fn apply(&mut self, patch: &StylePatch) {
        if let Some(radius) = &patch.border_radius {
            self.border_radius = Some(radius.clone());
        }
        if let Some(clip) = &patch.clip_path {
            self.clip_path = Some(clip.clone());
        }
    }

    pub fn to_patch(&self) -> StylePatch {
        StylePatch {
            border_radius: self.border_radius.clone(),
            clip_path: self.clip_path.clone(),
            ..StylePatch::default()
        }
    }
}

/// An image or video by URL (or data URI).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaElement {
    pub source: String,
    pub style: MediaStyle,
}

impl MediaElement {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            style: MediaStyle::default(),
        }
    }
}
