//! Element definitions for slides.
//!
//! Elements are stored as a tagged body per kind, each with its own style
//! record. On the wire they keep the flat shape `{id, type, x, y, width,
//! height, content?, src?, style}` so decks written by other clients load
//! unchanged; style attributes that do not apply to a kind are dropped on
//! read rather than rejected.

mod media;
mod shape;
mod style;
mod text;

pub use media::{MediaElement, MediaStyle, is_video_mime};
pub use shape::{ShapeElement, ShapeKind, ShapeStyle, TRIANGLE_CLIP};
pub use style::StylePatch;
pub use text::{
    DEFAULT_TEXT, FONT_FAMILIES, FontSlant, FontWeight, TextAlign, TextDecoration, TextElement,
    TextStyle,
};

use crate::geometry::MIN_SIZE;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements (and slides).
///
/// Freshly minted ids are UUIDs, but any string read from a stored deck is accepted.
pub type ElementId = String;

/// Mint a new random identifier.
pub fn new_id() -> ElementId {
    Uuid::new_v4().simple().to_string()
}

/// Element kind as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Shape,
    Video,
}

/// Kind-specific payload of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementBody {
    Text(TextElement),
    Image(MediaElement),
    Video(MediaElement),
    Shape(ShapeElement),
}

impl ElementBody {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementBody::Text(_) => ElementKind::Text,
            ElementBody::Image(_) => ElementKind::Image,
            ElementBody::Video(_) => ElementKind::Video,
            ElementBody::Shape(_) => ElementKind::Shape,
        }
    }

    /// Flat view of the style, as stored on the wire.
    pub fn style_patch(&self) -> StylePatch {
        match self {
            ElementBody::Text(text) => text.style.to_patch(),
            ElementBody::Image(media) | ElementBody::Video(media) => media.style.to_patch(),
            ElementBody::Shape(shape) => shape.style.to_patch(),
        }
    }

    fn apply_style(&mut self, patch: &StylePatch) {
        match self {
            ElementBody::Text(text) => text.style.apply(patch),
            ElementBody::Image(media) | ElementBody::Video(media) => media.style.apply(patch),
            ElementBody::Shape(shape) => shape.style.apply(patch),
        }
    }
}

/// A positioned object on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawElement", into = "RawElement")]
pub struct Element {
    pub id: ElementId,
    /// Top-left corner in slide space.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub body: ElementBody,
}

impl Element {
    /// Create an element with a fresh id.
    pub fn new(body: ElementBody, bounds: Rect) -> Self {
        Self {
            id: new_id(),
            position: bounds.origin(),
            width: bounds.width(),
            height: bounds.height(),
            body,
        }
    }

    /// New text element with the editor's default placement and typography.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(
            ElementBody::Text(TextElement::new(content)),
            Rect::new(100.0, 100.0, 400.0, 200.0),
        )
    }

    /// New shape element for a preset.
    pub fn shape(kind: ShapeKind) -> Self {
        Self::new(
            ElementBody::Shape(ShapeElement::new(kind)),
            Rect::new(150.0, 150.0, 250.0, 250.0),
        )
    }

    pub fn image(source: impl Into<String>) -> Self {
        Self::new(
            ElementBody::Image(MediaElement::new(source)),
            Rect::new(100.0, 100.0, 400.0, 300.0),
        )
    }

    pub fn video(source: impl Into<String>) -> Self {
        Self::new(
            ElementBody::Video(MediaElement::new(source)),
            Rect::new(100.0, 100.0, 500.0, 325.0),
        )
    }

    /// New image or video element, chosen by MIME type.
    pub fn media(source: impl Into<String>, mime: &str) -> Self {
        if is_video_mime(mime) {
            Self::video(source)
        } else {
            Self::image(source)
        }
    }

    /// Replace the element's bounds.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.position = bounds.origin();
        self.width = bounds.width();
        self.height = bounds.height();
        self
    }

    /// Apply a style patch before the element is placed.
    pub fn with_style(mut self, patch: &StylePatch) -> Self {
        self.apply_style(patch);
        self
    }

    /// Copy of this element under a new id.
    pub fn with_fresh_id(&self) -> Self {
        Self {
            id: new_id(),
            ..self.clone()
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.body.kind()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Bounding box in slide space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }

    /// Check if a slide-space point falls inside the element.
    pub fn hit_test(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Set the size, clamped to `MIN_SIZE` in both dimensions.
    pub fn set_size(&mut self, size: Size) {
        self.width = size.width.max(MIN_SIZE);
        self.height = size.height.max(MIN_SIZE);
    }

    /// Shallow-merge style attributes; attributes this kind does not use are ignored.
    pub fn apply_style(&mut self, patch: &StylePatch) {
        self.body.apply_style(patch);
    }

    pub fn style(&self) -> StylePatch {
        self.body.style_patch()
    }

    /// Text payload (text elements only).
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            ElementBody::Text(text) => Some(&text.content),
            _ => None,
        }
    }

    /// Replace the text payload. Returns false for non-text elements.
    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        match &mut self.body {
            ElementBody::Text(text) => {
                text.content = content.into();
                true
            }
            _ => false,
        }
    }

    /// Media reference (image and video elements only).
    pub fn source(&self) -> Option<&str> {
        match &self.body {
            ElementBody::Image(media) | ElementBody::Video(media) => Some(&media.source),
            _ => None,
        }
    }
}

/// Flat wire representation of an element.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawElement {
    id: String,
    #[serde(rename = "type")]
    kind: ElementKind,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    src: Option<String>,
    #[serde(default)]
    style: StylePatch,
}

impl From<RawElement> for Element {
    fn from(raw: RawElement) -> Self {
        let mut body = match raw.kind {
            ElementKind::Text => ElementBody::Text(TextElement::new(raw.content.unwrap_or_default())),
            ElementKind::Image => ElementBody::Image(MediaElement::new(raw.src.unwrap_or_default())),
            ElementKind::Video => ElementBody::Video(MediaElement::new(raw.src.unwrap_or_default())),
            ElementKind::Shape => ElementBody::Shape(ShapeElement::default()),
        };
        body.apply_style(&raw.style);

        Self {
            id: raw.id,
            position: Point::new(raw.x, raw.y),
            width: raw.width,
            height: raw.height,
            body,
        }
    }
}

impl From<Element> for RawElement {
    fn from(element: Element) -> Self {
        let style = element.body.style_patch();
        let kind = element.body.kind();
        let (content, src) = match element.body {
            ElementBody::Text(text) => (Some(text.content), None),
            ElementBody::Image(media) | ElementBody::Video(media) => (None, Some(media.source)),
            ElementBody::Shape(_) => (None, None),
        };

        Self {
            id: element.id,
            kind,
            x: element.position.x,
            y: element.position.y,
            width: element.width,
            height: element.height,
            content,
            src,
            style,
        }
    }
}
