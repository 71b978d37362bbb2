//! SlideFlow Core Library
//!
//! Slide model, canvas geometry, editing history and display playback for
//! the SlideFlow signage tools. Nothing in here draws; front ends feed
//! pointer and key events in and render the deck they get back.

pub mod deck;
pub mod display;
pub mod editor;
pub mod elements;
pub mod geometry;
pub mod history;
pub mod input;
pub mod manipulation;
pub mod remote;
pub mod selection;
pub mod shortcuts;
pub mod storage;

pub use deck::{ContentItem, ContentKind, Deck, Slide};
pub use display::{DisplayConfig, DisplayController, DisplayEvent, DisplayKey, PlaybackState};
pub use editor::{EditorConfig, EditorSession, GeometryPatch, SlidePatch, StatusKind, StatusMessage};
pub use elements::{Element, ElementBody, ElementId, ElementKind, ShapeKind, StylePatch};
pub use geometry::{Viewport, apply_resize, compute_drag_offset, to_logical, to_screen};
pub use history::{History, Snapshot};
pub use input::{Modifiers, MouseButton, PointerEvent};
pub use manipulation::{ManipulationEngine, ManipulationState};
pub use remote::{HttpShowService, MemoryShowService, ShowRecord, ShowReference, ShowService};
pub use selection::ResizeHandle;
pub use shortcuts::{EditorCommand, ShortcutRegistry};
pub use storage::{DeckStore, FileStorage, MemoryStorage, Storage, StorageError};
