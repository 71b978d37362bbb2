//! Selection handles for slide elements.

use crate::elements::Element;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 12.0;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// Corner resize handle, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    #[serde(rename = "nw")]
    NorthWest,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "sw")]
    SouthWest,
    #[serde(rename = "se")]
    SouthEast,
}

impl ResizeHandle {
    /// All corner handles, in drawing order.
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::NorthWest,
        ResizeHandle::NorthEast,
        ResizeHandle::SouthWest,
        ResizeHandle::SouthEast,
    ];

    /// Short compass name ("nw", "ne", "sw", "se").
    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::NorthWest => "nw",
            ResizeHandle::NorthEast => "ne",
            ResizeHandle::SouthWest => "sw",
            ResizeHandle::SouthEast => "se",
        }
    }

    /// Parse a compass name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "nw" => Some(ResizeHandle::NorthWest),
            "ne" => Some(ResizeHandle::NorthEast),
            "sw" => Some(ResizeHandle::SouthWest),
            "se" => Some(ResizeHandle::SouthEast),
            _ => None,
        }
    }

    pub fn touches_north(self) -> bool {
        matches!(self, ResizeHandle::NorthWest | ResizeHandle::NorthEast)
    }

    pub fn touches_south(self) -> bool {
        matches!(self, ResizeHandle::SouthWest | ResizeHandle::SouthEast)
    }

    pub fn touches_east(self) -> bool {
        matches!(self, ResizeHandle::NorthEast | ResizeHandle::SouthEast)
    }

    pub fn touches_west(self) -> bool {
        matches!(self, ResizeHandle::NorthWest | ResizeHandle::SouthWest)
    }

    /// Position of this corner on a bounding rectangle.
    pub fn corner_of(self, bounds: Rect) -> Point {
        match self {
            ResizeHandle::NorthWest => Point::new(bounds.x0, bounds.y0),
            ResizeHandle::NorthEast => Point::new(bounds.x1, bounds.y0),
            ResizeHandle::SouthWest => Point::new(bounds.x0, bounds.y1),
            ResizeHandle::SouthEast => Point::new(bounds.x1, bounds.y1),
        }
    }
}

/// A selection handle with its position and corner.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in logical slide coordinates.
    pub position: Point,
    /// Which corner the handle resizes from.
    pub kind: ResizeHandle,
}

impl Handle {
    pub fn new(position: Point, kind: ResizeHandle) -> Self {
        Self { position, kind }
    }

    /// Check if a logical point hits this handle.
    /// `tolerance` is in logical units, so callers divide screen tolerance by the zoom scale.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Get the four corner handles of an element.
pub fn get_handles(element: &Element) -> Vec<Handle> {
    let bounds = element.bounds();
    ResizeHandle::ALL
        .iter()
        .map(|&kind| Handle::new(kind.corner_of(bounds), kind))
        .collect()
}

/// Find which handle (if any) of an element is hit at a logical point.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    get_handles(element)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, ShapeKind};

    #[test]
    fn test_parse_handles() {
        for handle in ResizeHandle::ALL {
            assert_eq!(ResizeHandle::parse(handle.as_str()), Some(handle));
        }
        assert_eq!(ResizeHandle::parse("SE"), Some(ResizeHandle::SouthEast));
        assert_eq!(ResizeHandle::parse("n"), None);
    }

    #[test]
    fn test_handles_sit_on_corners() {
        let element = Element::shape(ShapeKind::Rectangle).with_bounds(Rect::new(10.0, 20.0, 110.0, 70.0));
        let handles = get_handles(&element);
        assert_eq!(handles.len(), 4);
        assert_eq!(handles[0].position, Point::new(10.0, 20.0));
        assert_eq!(handles[3].position, Point::new(110.0, 70.0));
    }

    #[test]
    fn test_hit_test_handles() {
        let element = Element::shape(ShapeKind::Rectangle).with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(
            hit_test_handles(&element, Point::new(98.0, 103.0), HANDLE_HIT_TOLERANCE),
            Some(ResizeHandle::SouthEast)
        );
        assert_eq!(hit_test_handles(&element, Point::new(50.0, 50.0), HANDLE_HIT_TOLERANCE), None);
    }
}
