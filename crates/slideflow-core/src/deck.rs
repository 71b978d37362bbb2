//! Slides and decks.

use crate::elements::{Element, ElementId, FontWeight, StylePatch, TextAlign, new_id};
use crate::geometry::{SLIDE_HEIGHT, SLIDE_WIDTH};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Display time of a new slide, in seconds.
pub const DEFAULT_DURATION_SECS: f64 = 10.0;
/// Shortest display time the editor allows.
pub const MIN_DURATION_SECS: f64 = 1.0;
/// Longest display time the editor allows.
pub const MAX_DURATION_SECS: f64 = 60.0;
/// Longest time a stored slide is held on a display, in seconds.
pub const MAX_PLAYBACK_SECS: f64 = 86_400.0;
/// Background of a new slide.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Kind of an uploaded content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Image,
    Video,
    #[serde(other)]
    Document,
}

/// A media library item a deck can be started from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default, rename = "duration")]
    pub duration_secs: Option<f64>,
}

/// One screen's worth of elements, background and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    pub name: String,
    /// Elements back to front.
    #[serde(default)]
    pub elements: Vec<Element>,
    pub background_color: String,
    /// Seconds on screen while auto-advancing.
    #[serde(rename = "duration")]
    pub duration_secs: f64,
}

impl Slide {
    /// Create an empty slide with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            elements: Vec::new(),
            background_color: DEFAULT_BACKGROUND.to_string(),
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }

    /// Display time, never zero.
    ///
    /// Stored decks can carry a non-positive duration; those play for the
    /// minimum duration instead of spinning. Huge ones are capped at
    /// `MAX_PLAYBACK_SECS`.
    pub fn duration(&self) -> Duration {
        let secs = if self.duration_secs.is_finite() && self.duration_secs > 0.0 {
            self.duration_secs.min(MAX_PLAYBACK_SECS)
        } else {
            MIN_DURATION_SECS
        };
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::from_secs(1))
    }

    /// Get an element by ID.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Add an element on top of the others.
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Remove an element, keeping the order of the rest.
    pub fn remove_element(&mut self, id: &str) -> Option<Element> {
        let pos = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(pos))
    }

    /// Move an element to the top of the stack.
    /// Returns true if the order changed.
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        match self.elements.iter().position(|e| e.id == id) {
            Some(pos) if pos + 1 < self.elements.len() => {
                let element = self.elements.remove(pos);
                self.elements.push(element);
                true
            }
            _ => false,
        }
    }

    /// Move an element to the bottom of the stack.
    /// Returns true if the order changed.
    pub fn send_to_back(&mut self, id: &str) -> bool {
        match self.elements.iter().position(|e| e.id == id) {
            Some(pos) if pos > 0 => {
                let element = self.elements.remove(pos);
                self.elements.insert(0, element);
                true
            }
            _ => false,
        }
    }

    /// Elements under a slide-space point, front to back.
    pub fn elements_at_point(&self, point: Point) -> Vec<ElementId> {
        self.elements
            .iter()
            .rev()
            .filter(|e| e.hit_test(point))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Deep copy under a new slide id with fresh element ids, named "<name> (Copy)".
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(),
            name: format!("{} (Copy)", self.name),
            elements: self.elements.iter().map(Element::with_fresh_id).collect(),
            background_color: self.background_color.clone(),
            duration_secs: self.duration_secs,
        }
    }
}

/// The ordered slides of one presentation. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Slide>", into = "Vec<Slide>")]
pub struct Deck {
    slides: Vec<Slide>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Slide>> for Deck {
    /// An empty list becomes the default one-slide deck.
    fn from(slides: Vec<Slide>) -> Self {
        if slides.is_empty() {
            Self::new()
        } else {
            Self { slides }
        }
    }
}

impl From<Deck> for Vec<Slide> {
    fn from(deck: Deck) -> Self {
        deck.slides
    }
}

impl Deck {
    /// Create a deck holding one blank slide.
    pub fn new() -> Self {
        Self {
            slides: vec![Slide::new("Slide 1")],
        }
    }

    /// Deck shown by a display before anything was published.
    pub fn welcome() -> Self {
        let mut slide = Slide::new("Welcome Slide");
        slide.background_color = "#4F46E5".to_string();
        slide.add_element(
            Element::text("Welcome to Our Digital Signage")
                .with_bounds(Rect::new(100.0, 150.0, 860.0, 250.0))
                .with_style(&headline_style("#ffffff")),
        );
        Self::with_slide(slide)
    }

    /// Single-slide deck built from a content item: media fills the slide,
    /// anything else shows its name as a headline.
    pub fn from_content(content: &ContentItem) -> Self {
        let mut slide = Slide::new("Slide 1");
        if let Some(duration) = content.duration_secs.filter(|d| d.is_finite() && *d > 0.0) {
            slide.duration_secs = duration;
        }
        let full_slide = Rect::new(0.0, 0.0, SLIDE_WIDTH, SLIDE_HEIGHT);

        let element = match (content.kind, &content.file_url) {
            (ContentKind::Image, Some(url)) => Element::image(url.clone()).with_bounds(full_slide),
            (ContentKind::Video, Some(url)) => Element::video(url.clone()).with_bounds(full_slide),
            _ => {
                let name = if content.name.is_empty() { "Content" } else { content.name.as_str() };
                Element::text(name)
                    .with_bounds(Rect::new(100.0, 200.0, 860.0, 340.0))
                    .with_style(&headline_style("#000000"))
            }
        };
        slide.add_element(element);
        Self::with_slide(slide)
    }

    /// Create a deck with a single given slide.
    pub fn with_slide(slide: Slide) -> Self {
        Self { slides: vec![slide] }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Slide> {
        self.slides.get_mut(index)
    }

    /// Clamp an index into `0..len`.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.slides.len() - 1)
    }

    /// Name for the next appended slide ("Slide N").
    pub fn next_slide_name(&self) -> String {
        format!("Slide {}", self.slides.len() + 1)
    }

    /// Append a slide and return its index.
    pub fn push(&mut self, slide: Slide) -> usize {
        self.slides.push(slide);
        self.slides.len() - 1
    }

    /// Insert a slide, clamping the position to the end.
    pub fn insert(&mut self, index: usize, slide: Slide) -> usize {
        let index = index.min(self.slides.len());
        self.slides.insert(index, slide);
        index
    }

    /// Remove a slide. Refused (None) for the last remaining slide or a bad index.
    pub fn remove(&mut self, index: usize) -> Option<Slide> {
        if self.slides.len() <= 1 || index >= self.slides.len() {
            return None;
        }
        Some(self.slides.remove(index))
    }

    /// Move a slide from one position to another.
    /// Returns false if either index is out of range or they are equal.
    pub fn move_slide(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.slides.len() || to >= self.slides.len() {
            return false;
        }
        let slide = self.slides.remove(from);
        self.slides.insert(to, slide);
        true
    }

    /// Serialize the deck to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a deck from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn headline_style(color: &str) -> StylePatch {
    StylePatch::new()
        .with_font_size(48.0)
        .with_color(color)
        .with_font_weight(FontWeight::Bold)
        .with_text_align(TextAlign::Center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementBody, ShapeKind};

    #[test]
    fn test_new_deck_has_one_slide() {
        let deck = Deck::new();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.slides()[0].name, "Slide 1");
        assert_eq!(deck.slides()[0].background_color, DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_remove_last_slide_refused() {
        let mut deck = Deck::new();
        assert!(deck.remove(0).is_none());
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_empty_json_becomes_default_deck() {
        let deck = Deck::from_json("[]").unwrap();
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_reads_stored_slides() {
        let json = r##"[{
            "id": "1", "name": "Welcome Slide", "backgroundColor": "#4F46E5", "duration": 10,
            "elements": [{"id":"1","type":"text","x":100,"y":150,"width":760,"height":100,
                          "content":"Welcome","style":{"fontSize":48}}]
        }]"##;
        let deck = Deck::from_json(json).unwrap();
        let slide = &deck.slides()[0];
        assert_eq!(slide.name, "Welcome Slide");
        assert_eq!(slide.duration(), Duration::from_secs(10));
        assert_eq!(slide.elements.len(), 1);

        let written = serde_json::to_value(&deck).unwrap();
        assert_eq!(written[0]["backgroundColor"], "#4F46E5");
        assert_eq!(written[0]["duration"], 10.0);
    }

    #[test]
    fn test_zero_duration_plays_minimum() {
        let mut slide = Slide::new("x");
        slide.duration_secs = 0.0;
        assert_eq!(slide.duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_huge_duration_is_capped() {
        let deck = Deck::from_json(r##"[{"id": "1", "name": "Stuck", "backgroundColor": "#000", "duration": 1e20}]"##).unwrap();
        let slide = deck.get(0).unwrap();
        assert_eq!(slide.duration(), Duration::from_secs_f64(MAX_PLAYBACK_SECS));
    }

    #[test]
    fn test_z_order() {
        let mut slide = Slide::new("z");
        let a = Element::shape(ShapeKind::Rectangle);
        let b = Element::shape(ShapeKind::Circle);
        let (id_a, id_b) = (a.id.clone(), b.id.clone());
        slide.add_element(a);
        slide.add_element(b);

        assert!(slide.bring_to_front(&id_a));
        assert_eq!(slide.elements[1].id, id_a);
        assert!(!slide.bring_to_front(&id_a));
        assert!(slide.send_to_back(&id_a));
        assert_eq!(slide.elements[0].id, id_a);

        // Both shapes overlap at (200, 200); the front one comes first.
        assert_eq!(slide.elements_at_point(Point::new(200.0, 200.0)), vec![id_b, id_a]);
    }

    #[test]
    fn test_duplicate_is_independent() {
        let mut slide = Slide::new("Intro");
        slide.add_element(Element::text("hello"));
        let copy = slide.duplicate();

        assert_ne!(copy.id, slide.id);
        assert_eq!(copy.name, "Intro (Copy)");
        assert_ne!(copy.elements[0].id, slide.elements[0].id);
        assert_eq!(copy.elements[0].content(), Some("hello"));
    }

    #[test]
    fn test_content_seeds() {
        let image = ContentItem {
            id: "3".to_string(),
            name: "Poster".to_string(),
            kind: ContentKind::Image,
            file_url: Some("https://cdn.example/poster.png".to_string()),
            duration_secs: Some(20.0),
        };
        let deck = Deck::from_content(&image);
        let slide = &deck.slides()[0];
        assert_eq!(slide.duration(), Duration::from_secs(20));
        assert_eq!(slide.elements[0].bounds(), Rect::new(0.0, 0.0, SLIDE_WIDTH, SLIDE_HEIGHT));

        let document: ContentItem =
            serde_json::from_str(r#"{"id":"4","name":"Menu.pdf","type":"pdf","file_url":null}"#).unwrap();
        assert_eq!(document.kind, ContentKind::Document);
        let deck = Deck::from_content(&document);
        let element = &deck.slides()[0].elements[0];
        assert_eq!(element.content(), Some("Menu.pdf"));
        assert!(matches!(&element.body, ElementBody::Text(t) if t.style.font_weight == FontWeight::Bold));
    }

    #[test]
    fn test_move_slide() {
        let mut deck = Deck::new();
        deck.push(Slide::new("Slide 2"));
        deck.push(Slide::new("Slide 3"));
        assert!(deck.move_slide(0, 2));
        let names: Vec<_> = deck.slides().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Slide 2", "Slide 3", "Slide 1"]);
        assert!(!deck.move_slide(0, 3));
    }
}
