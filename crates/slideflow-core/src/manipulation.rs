//! Drag-to-move and corner-resize sessions.
//!
//! A session starts when the pointer goes down on an element body or one of
//! its handles, updates the element live on every pointer move, and ends on
//! pointer release. The engine itself never touches history; the editor
//! commits one snapshot when a session ends.

use crate::deck::Slide;
use crate::elements::ElementId;
use crate::geometry::{Viewport, apply_resize, compute_drag_offset};
use crate::selection::ResizeHandle;
use kurbo::{Point, Size, Vec2};

/// What the active session does to its element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionMode {
    /// Moving the whole element. `offset` is the grab point relative to the
    /// element's top-left corner, in logical units.
    Move { offset: Vec2 },
    /// Resizing from a corner. Deltas are measured from `start_pointer`
    /// (screen space) and applied to `start_size`.
    Resize {
        handle: ResizeHandle,
        start_pointer: Point,
        start_size: Size,
    },
}

/// State for an in-progress manipulation.
#[derive(Debug, Clone, PartialEq)]
pub struct ManipulationState {
    /// The element being manipulated.
    pub element_id: ElementId,
    pub mode: SessionMode,
}

impl ManipulationState {
    pub fn is_resize(&self) -> bool {
        matches!(self.mode, SessionMode::Resize { .. })
    }
}

/// Holds at most one manipulation session.
#[derive(Debug, Clone, Default)]
pub struct ManipulationEngine {
    session: Option<ManipulationState>,
}

impl ManipulationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start moving an element. Returns false if the element is not on the slide.
    ///
    /// Any session already running is replaced.
    pub fn begin_drag(&mut self, slide: &Slide, element_id: &str, pointer: Point, viewport: &Viewport) -> bool {
        let Some(element) = slide.element(element_id) else {
            return false;
        };
        let offset = compute_drag_offset(pointer, viewport.origin, viewport.zoom, element.position);
        self.session = Some(ManipulationState {
            element_id: element.id.clone(),
            mode: SessionMode::Move { offset },
        });
        true
    }

    /// Start resizing an element from a corner. Returns false if the element
    /// is not on the slide.
    ///
    /// Handles sit on top of the element body, so a move session started by
    /// the same pointer-down is dropped in favour of the resize.
    pub fn begin_resize(&mut self, slide: &Slide, element_id: &str, handle: ResizeHandle, pointer: Point) -> bool {
        let Some(element) = slide.element(element_id) else {
            return false;
        };
        self.session = Some(ManipulationState {
            element_id: element.id.clone(),
            mode: SessionMode::Resize {
                handle,
                start_pointer: pointer,
                start_size: element.size(),
            },
        });
        true
    }

    /// Apply a pointer move to the session's element.
    /// Returns true if an element was updated.
    pub fn on_pointer_move(&self, slide: &mut Slide, pointer: Point, viewport: &Viewport) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        let Some(element) = slide.element_mut(&session.element_id) else {
            return false;
        };

        match session.mode {
            SessionMode::Move { offset } => {
                element.set_position(viewport.screen_to_logical(pointer) - offset);
            }
            SessionMode::Resize {
                handle,
                start_pointer,
                start_size,
            } => {
                let delta = viewport.screen_delta_to_logical(pointer - start_pointer);
                let size = apply_resize(start_size, delta, handle);
                element.width = size.width;
                element.height = size.height;
            }
        }
        true
    }

    /// Finish the current session, returning it if one was active.
    pub fn end_session(&mut self) -> Option<ManipulationState> {
        self.session.take()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&ManipulationState> {
        self.session.as_ref()
    }
}
