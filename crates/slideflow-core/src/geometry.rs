//! Slide-space geometry and zoom transforms.
//!
//! Every element position is stored in a fixed logical coordinate space of
//! `SLIDE_WIDTH` x `SLIDE_HEIGHT` units. The editor canvas shows that space
//! scaled by a zoom percentage; pointer events arrive in screen pixels and are
//! mapped back to logical units before they touch the deck.

use crate::selection::ResizeHandle;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Logical slide width.
pub const SLIDE_WIDTH: f64 = 960.0;
/// Logical slide height.
pub const SLIDE_HEIGHT: f64 = 540.0;
/// Smallest width or height an element can be resized to.
pub const MIN_SIZE: f64 = 50.0;

/// Smallest zoom percentage offered by the editor.
pub const MIN_ZOOM: f64 = 25.0;
/// Largest zoom percentage offered by the editor.
pub const MAX_ZOOM: f64 = 200.0;
/// Zoom change applied by one zoom-in/zoom-out step.
pub const ZOOM_STEP: f64 = 25.0;
/// Zoom percentage that maps one logical unit to one pixel.
pub const DEFAULT_ZOOM: f64 = 100.0;

/// Scale factor for a zoom percentage.
pub fn zoom_scale(zoom: f64) -> f64 {
    zoom / 100.0
}

/// Convert a logical point to screen space.
pub fn to_screen(point: Point, zoom: f64) -> Point {
    let scale = zoom_scale(zoom);
    Point::new(point.x * scale, point.y * scale)
}

/// Convert a screen-space point back to logical units.
///
/// `zoom` must be non-zero; the editor keeps it within `MIN_ZOOM..=MAX_ZOOM`.
pub fn to_logical(point: Point, zoom: f64) -> Point {
    let scale = zoom_scale(zoom);
    Point::new(point.x / scale, point.y / scale)
}

/// Offset between the grab point and the element origin at drag start.
///
/// Subsequent pointer moves subtract this offset so the element keeps the
/// same grab point under the cursor.
pub fn compute_drag_offset(pointer: Point, canvas_origin: Point, zoom: f64, element_pos: Point) -> Vec2 {
    let logical = to_logical((pointer - canvas_origin).to_point(), zoom);
    logical - element_pos
}

/// Compute a new element size from a corner drag.
///
/// `E`/`W` handles change the width and `N`/`S` handles change the height,
/// with `W` and `N` inverting the delta. Both dimensions are clamped to
/// `MIN_SIZE`. The top-left corner of the element does not move for any
/// handle.
pub fn apply_resize(start: Size, delta: Vec2, handle: ResizeHandle) -> Size {
    let mut width = start.width;
    let mut height = start.height;

    if handle.touches_east() {
        width = start.width + delta.x;
    }
    if handle.touches_west() {
        width = start.width - delta.x;
    }
    if handle.touches_south() {
        height = start.height + delta.y;
    }
    if handle.touches_north() {
        height = start.height - delta.y;
    }

    Size::new(width.max(MIN_SIZE), height.max(MIN_SIZE))
}

/// Editor view onto the slide canvas.
///
/// Holds the zoom percentage and where the slide's top-left corner sits on
/// screen, converting between screen pixels and logical slide units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen position of the slide canvas's top-left corner.
    pub origin: Point,
    /// Zoom percentage (100 = one pixel per logical unit).
    pub zoom: f64,
    /// Minimum allowed zoom percentage.
    pub min_zoom: f64,
    /// Maximum allowed zoom percentage.
    pub max_zoom: f64,
    /// Step used by `zoom_in`/`zoom_out`.
    pub zoom_step: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl Viewport {
    /// Create a viewport at 100% with the canvas at the screen origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scale factor.
    pub fn scale(&self) -> f64 {
        zoom_scale(self.zoom)
    }

    /// Set the zoom percentage, clamped to the allowed range.
    /// Set the zoom, clamped to the allowed range. Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.zoom_step);
    }

    /// Move the canvas origin (e.g. after the window layout changed).
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Convert a screen point to logical slide coordinates.
    pub fn screen_to_logical(&self, screen_point: Point) -> Point {
        to_logical((screen_point - self.origin).to_point(), self.zoom)
    }

    /// Convert a logical slide point to screen coordinates.
    pub fn logical_to_screen(&self, logical_point: Point) -> Point {
        to_screen(logical_point, self.zoom) + self.origin.to_vec2()
    }

    /// Convert a screen-space distance to logical units.
    pub fn screen_delta_to_logical(&self, delta: Vec2) -> Vec2 {
        delta / self.scale()
    }
}
