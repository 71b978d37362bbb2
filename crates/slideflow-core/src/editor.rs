//! Editor session: the deck being edited plus view, selection and history.
//!
//! Every operation that changes the deck commits exactly one history entry
//! when it succeeds. Refused operations (unknown ids, deleting the last
//! slide, ...) leave both the deck and the history untouched. Selection and
//! zoom changes never commit.

use crate::deck::{ContentItem, Deck, MAX_DURATION_SECS, MIN_DURATION_SECS, Slide};
use crate::elements::{DEFAULT_TEXT, Element, ElementId, ShapeKind, StylePatch};
use crate::geometry::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, Viewport, ZOOM_STEP};
use crate::history::History;
use crate::input::{Modifiers, MouseButton, PointerEvent};
use crate::manipulation::ManipulationEngine;
use crate::remote::{RemoteResult, ScheduleWindow, ShowRecord, ShowReference, ShowService, StockImage, ValidationError};
use crate::selection::{HANDLE_HIT_TOLERANCE, ResizeHandle, hit_test_handles};
use crate::shortcuts::{EditorCommand, ShortcutRegistry};
use crate::storage::{AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL_SECS, DeckStore, Storage, StorageResult};
use kurbo::Point;
use std::time::{Duration, Instant};

/// How long a successful save message stays up.
pub const SAVE_OK_DISPLAY: Duration = Duration::from_secs(2);
/// How long a failed save message stays up.
pub const SAVE_FAILED_DISPLAY: Duration = Duration::from_secs(3);

/// Name given to shows that were never named.
pub const UNTITLED_SHOW: &str = "Untitled Slide";

/// Zoom limits and autosave period for an editor session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub initial_zoom: f64,
    /// Minimum time between local cache autosaves.
    pub autosave_interval: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            initial_zoom: DEFAULT_ZOOM,
            autosave_interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
        }
    }
}

impl EditorConfig {
    fn viewport(&self) -> Viewport {
        let mut viewport = Viewport {
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            zoom_step: self.zoom_step,
            ..Viewport::default()
        };
        viewport.set_zoom(self.initial_zoom);
        viewport
    }
}

/// Partial geometry update; absent fields are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Partial slide update; absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlidePatch {
    pub name: Option<String>,
    pub background_color: Option<String>,
    /// Seconds, clamped to the editor's allowed range.
    pub duration_secs: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Failure,
}

/// Transient message shown after a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub expires_at: Instant,
}

impl StatusMessage {
    pub fn saved(now: Instant) -> Self {
        Self {
            text: "Saved!".to_string(),
            kind: StatusKind::Success,
            expires_at: now + SAVE_OK_DISPLAY,
        }
    }

    pub fn failed(now: Instant) -> Self {
        Self::failure("Save failed", now)
    }

    /// A failure message with its own text, shown as long as a failed save.
    pub fn failure(text: impl Into<String>, now: Instant) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Failure,
            expires_at: now + SAVE_FAILED_DISPLAY,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// State of one editing session over a deck.
pub struct EditorSession {
    deck: Deck,
    active_slide: usize,
    selected: Option<ElementId>,
    history: History,
    pub viewport: Viewport,
    manipulation: ManipulationEngine,
    name: String,
    show_ref: Option<ShowReference>,
    schedule: Option<ScheduleWindow>,
    status: Option<StatusMessage>,
    autosave: AutoSaveManager,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(Deck::new())
    }
}

impl EditorSession {
    /// Start editing a deck. The initial state is the first history entry.
    pub fn new(deck: Deck) -> Self {
        Self::with_config(deck, EditorConfig::default())
    }

    pub fn with_config(deck: Deck, config: EditorConfig) -> Self {
        let history = History::new(&deck, 0);
        Self {
            deck,
            active_slide: 0,
            selected: None,
            history,
            viewport: config.viewport(),
            manipulation: ManipulationEngine::new(),
            name: UNTITLED_SHOW.to_string(),
            show_ref: None,
            schedule: None,
            status: None,
            autosave: AutoSaveManager::new(config.autosave_interval),
        }
    }

    /// Resume editing a stored show.
    pub fn from_record(record: ShowRecord) -> Self {
        let schedule = record.window();
        let mut session = Self::new(record.slides_data);
        session.name = if record.name.is_empty() { UNTITLED_SHOW.to_string() } else { record.name };
        session.show_ref = Some(ShowReference::Id(record.id));
        session.schedule = schedule;
        session
    }

    /// Open the show stored for a content item, or seed a fresh deck from
    /// the item itself when none was saved yet.
    ///
    /// A failed fetch also seeds the deck and leaves a "Load failed" status.
    pub fn open_content(service: &dyn ShowService, content: &ContentItem, now: Instant) -> Self {
        let reference = ShowReference::Content(content.id.clone());
        let failed = match service.load_deck(&reference) {
            Ok(Some(record)) => {
                log::info!("Opened show {} for content {}", record.id, content.id);
                return Self::from_record(record);
            }
            Ok(None) => {
                log::info!("No show saved for content {}, seeding deck", content.id);
                false
            }
            Err(e) => {
                log::warn!("Failed to load show for content {}: {}", content.id, e);
                true
            }
        };

        let mut session = Self::new(Deck::from_content(content));
        session.name = if content.name.is_empty() { UNTITLED_SHOW.to_string() } else { content.name.clone() };
        session.show_ref = Some(reference);
        if failed {
            session.status = Some(StatusMessage::failure("Load failed", now));
        }
        session
    }

    // --- Accessors ---

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn active_slide_index(&self) -> usize {
        self.active_slide
    }

    pub fn active_slide(&self) -> Option<&Slide> {
        self.deck.get(self.active_slide)
    }

    fn active_slide_mut(&mut self) -> Option<&mut Slide> {
        self.deck.get_mut(self.active_slide)
    }

    pub fn selected_element_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        let id = self.selected.as_deref()?;
        self.active_slide()?.element(id)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn show_reference(&self) -> Option<&ShowReference> {
        self.show_ref.as_ref()
    }

    pub fn schedule(&self) -> Option<&ScheduleWindow> {
        self.schedule.as_ref()
    }

    /// Set the schedule from form fields; both empty clears it.
    pub fn set_schedule(&mut self, start: Option<&str>, finish: Option<&str>) -> Result<(), ValidationError> {
        self.schedule = ScheduleWindow::from_parts(start, finish)?;
        Ok(())
    }

    /// The save message, if it has not expired yet.
    pub fn status(&self, now: Instant) -> Option<&StatusMessage> {
        self.status.as_ref().filter(|status| !status.is_expired(now))
    }

    fn commit(&mut self) {
        self.history.commit(&self.deck, self.active_slide);
        self.autosave.mark_dirty();
    }

    /// True when edits were made since the deck was last written locally.
    pub fn has_unsaved_changes(&self) -> bool {
        self.autosave.is_dirty()
    }

    // --- Elements ---

    /// Append an element to the active slide and select it.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id.clone();
        if let Some(slide) = self.active_slide_mut() {
            slide.add_element(element);
        }
        self.selected = Some(id.clone());
        self.commit();
        id
    }

    pub fn add_text(&mut self) -> ElementId {
        self.add_element(Element::text(DEFAULT_TEXT))
    }

    pub fn add_shape(&mut self, kind: ShapeKind) -> ElementId {
        self.add_element(Element::shape(kind))
    }

    pub fn add_image(&mut self, source: impl Into<String>) -> ElementId {
        self.add_element(Element::image(source))
    }

    /// Add an image or video depending on the MIME type.
    pub fn add_media(&mut self, source: impl Into<String>, mime: &str) -> ElementId {
        self.add_element(Element::media(source, mime))
    }

    pub fn add_stock_image(&mut self, image: &StockImage) -> ElementId {
        self.add_image(image.full_url.clone())
    }

    /// Upload a file and place it on the active slide.
    /// Nothing is added if the upload fails; the status reports it instead.
    pub fn upload_media(
        &mut self,
        service: &dyn ShowService,
        bytes: &[u8],
        mime: &str,
        now: Instant,
    ) -> RemoteResult<ElementId> {
        match service.upload_media(bytes, mime) {
            Ok(uploaded) => Ok(self.add_media(uploaded.public_url, mime)),
            Err(e) => {
                log::warn!("Upload failed: {}", e);
                self.status = Some(StatusMessage::failure("Upload failed", now));
                Err(e)
            }
        }
    }

    /// Delete the selected element. Returns false without a selection.
    pub fn delete_selected_element(&mut self) -> bool {
        let Some(id) = self.selected.take() else {
            return false;
        };
        let removed = self.active_slide_mut().and_then(|slide| slide.remove_element(&id));
        if removed.is_none() {
            return false;
        }
        self.commit();
        true
    }

    /// Update position and size; sizes below the minimum are clamped.
    /// Patches carrying NaN or infinite values are refused.
    pub fn update_element_geometry(&mut self, id: &str, patch: GeometryPatch) -> bool {
        let values = [patch.x, patch.y, patch.width, patch.height];
        if values.iter().flatten().any(|v| !v.is_finite()) {
            return false;
        }
        let Some(element) = self.active_slide_mut().and_then(|slide| slide.element_mut(id)) else {
            return false;
        };
        let x = patch.x.unwrap_or(element.position.x);
        let y = patch.y.unwrap_or(element.position.y);
        let size = kurbo::Size::new(patch.width.unwrap_or(element.width), patch.height.unwrap_or(element.height));
        element.set_position(Point::new(x, y));
        element.set_size(size);
        self.commit();
        true
    }

    /// Merge style attributes into an element.
    pub fn update_element_style(&mut self, id: &str, patch: &StylePatch) -> bool {
        let Some(element) = self.active_slide_mut().and_then(|slide| slide.element_mut(id)) else {
            return false;
        };
        element.apply_style(patch);
        self.commit();
        true
    }

    /// Replace the text of a text element.
    pub fn update_element_content(&mut self, id: &str, content: &str) -> bool {
        let Some(element) = self.active_slide_mut().and_then(|slide| slide.element_mut(id)) else {
            return false;
        };
        if !element.set_content(content) {
            return false;
        }
        self.commit();
        true
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        let changed = self.active_slide_mut().is_some_and(|slide| slide.bring_to_front(id));
        if changed {
            self.commit();
        }
        changed
    }

    pub fn send_to_back(&mut self, id: &str) -> bool {
        let changed = self.active_slide_mut().is_some_and(|slide| slide.send_to_back(id));
        if changed {
            self.commit();
        }
        changed
    }

    /// Select an element on the active slide, or clear the selection.
    pub fn select_element(&mut self, id: Option<&str>) {
        self.selected = id
            .filter(|id| self.active_slide().is_some_and(|slide| slide.element(id).is_some()))
            .map(str::to_string);
    }

    // --- Slides ---

    /// Change name, background or duration of the active slide.
    pub fn update_slide_properties(&mut self, patch: SlidePatch) -> bool {
        let Some(slide) = self.active_slide_mut() else {
            return false;
        };
        if let Some(name) = patch.name {
            slide.name = name;
        }
        if let Some(color) = patch.background_color {
            slide.background_color = color;
        }
        if let Some(duration) = patch.duration_secs.filter(|d| d.is_finite()) {
            slide.duration_secs = duration.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS);
        }
        self.commit();
        true
    }

    /// Append a blank slide and make it active.
    pub fn add_slide(&mut self) -> usize {
        let slide = Slide::new(self.deck.next_slide_name());
        self.active_slide = self.deck.push(slide);
        self.selected = None;
        self.commit();
        self.active_slide
    }

    /// Copy a slide right after itself and make the copy active.
    pub fn duplicate_slide(&mut self, index: usize) -> bool {
        let Some(copy) = self.deck.get(index).map(Slide::duplicate) else {
            return false;
        };
        self.active_slide = self.deck.insert(index + 1, copy);
        self.selected = None;
        self.commit();
        true
    }

    /// Remove a slide. The last remaining slide cannot be deleted.
    pub fn delete_slide(&mut self, index: usize) -> bool {
        if self.deck.remove(index).is_none() {
            return false;
        }
        self.active_slide = index.min(self.deck.len() - 1);
        self.selected = None;
        self.manipulation.end_session();
        self.commit();
        true
    }

    /// Move a slide; the active slide stays active wherever it ends up.
    pub fn reorder_slide(&mut self, from: usize, to: usize) -> bool {
        let active_id = self.active_slide().map(|slide| slide.id.clone());
        if !self.deck.move_slide(from, to) {
            return false;
        }
        if let Some(active_id) = active_id {
            self.active_slide = self
                .deck
                .slides()
                .iter()
                .position(|slide| slide.id == active_id)
                .unwrap_or(to);
        }
        self.commit();
        true
    }

    /// Switch the active slide. Out-of-range indices are ignored.
    pub fn select_slide(&mut self, index: usize) -> bool {
        if index >= self.deck.len() {
            return false;
        }
        if index != self.active_slide {
            self.active_slide = index;
            self.selected = None;
            self.manipulation.end_session();
        }
        true
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.install(snapshot.deck, snapshot.active_slide);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.install(snapshot.deck, snapshot.active_slide);
        true
    }

    fn install(&mut self, deck: Deck, active_slide: usize) {
        self.deck = deck;
        self.autosave.mark_dirty();
        self.active_slide = self.deck.clamp_index(active_slide);
        self.manipulation.end_session();
        if self.selected_element().is_none() {
            self.selected = None;
        }
    }

    // --- Pointer manipulation ---

    /// Start moving an element from a screen-space pointer position.
    pub fn begin_drag(&mut self, id: &str, pointer: Point) -> bool {
        let Some(slide) = self.deck.get(self.active_slide) else {
            return false;
        };
        let started = self.manipulation.begin_drag(slide, id, pointer, &self.viewport);
        if started {
            self.selected = Some(id.to_string());
        }
        started
    }

    /// Start resizing an element from one of its corners.
    pub fn begin_resize(&mut self, id: &str, handle: ResizeHandle, pointer: Point) -> bool {
        let Some(slide) = self.deck.get(self.active_slide) else {
            return false;
        };
        let started = self.manipulation.begin_resize(slide, id, handle, pointer);
        if started {
            self.selected = Some(id.to_string());
        }
        started
    }

    /// Live update of the element under manipulation. Never commits.
    pub fn on_pointer_move(&mut self, pointer: Point) -> bool {
        let Some(slide) = self.deck.get_mut(self.active_slide) else {
            return false;
        };
        self.manipulation.on_pointer_move(slide, pointer, &self.viewport)
    }

    /// Finish the manipulation and record it. Returns false if none was active.
    pub fn end_session(&mut self) -> bool {
        if self.manipulation.end_session().is_none() {
            return false;
        }
        self.commit();
        true
    }

    pub fn is_manipulating(&self) -> bool {
        self.manipulation.is_active()
    }

    /// Route a raw pointer event: handles of the selected element win over
    /// element bodies, and clicking empty canvas clears the selection.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> bool {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.pointer_down(*position),
            PointerEvent::Down { .. } => false,
            PointerEvent::Move { position } => self.on_pointer_move(*position),
            PointerEvent::Up { .. } => self.end_session(),
        }
    }

    fn pointer_down(&mut self, position: Point) -> bool {
        let logical = self.viewport.screen_to_logical(position);
        let tolerance = HANDLE_HIT_TOLERANCE / self.viewport.scale();

        if let Some(selected) = self.selected_element() {
            if let Some(handle) = hit_test_handles(selected, logical, tolerance) {
                let id = selected.id.clone();
                return self.begin_resize(&id, handle, position);
            }
        }

        let hit = self
            .active_slide()
            .and_then(|slide| slide.elements_at_point(logical).into_iter().next());
        match hit {
            Some(id) => self.begin_drag(&id, position),
            None => {
                self.selected = None;
                false
            }
        }
    }

    // --- View ---

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
    }

    // --- Commands ---

    pub fn execute(&mut self, command: EditorCommand) -> bool {
        match command {
            EditorCommand::DeleteElement => self.delete_selected_element(),
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::ZoomIn => {
                self.zoom_in();
                true
            }
            EditorCommand::ZoomOut => {
                self.zoom_out();
                true
            }
        }
    }

    /// Handle a key press. Returns true if a bound command ran.
    pub fn handle_shortcut(&mut self, key: &str, modifiers: Modifiers) -> bool {
        match ShortcutRegistry::resolve(key, modifiers) {
            Some(command) => self.execute(command),
            None => false,
        }
    }

    // --- Persistence ---

    /// Save the show remotely and cache the deck for local displays.
    ///
    /// On failure the deck is left as it is and the status reports the
    /// failure.
    pub async fn save<S: Storage>(&mut self, service: &dyn ShowService, store: &DeckStore<S>, now: Instant) -> &StatusMessage {
        let result = service.save_deck(self.show_ref.as_ref(), &self.deck, &self.name, self.schedule.as_ref());
        let status = match result {
            Ok(record) => {
                self.show_ref = Some(ShowReference::Id(record.id));
                match self.autosave.save(store, &self.deck, now).await {
                    Ok(()) => StatusMessage::saved(now),
                    Err(e) => {
                        log::warn!("Saved show but failed to cache deck: {}", e);
                        StatusMessage::failed(now)
                    }
                }
            }
            Err(e) => {
                log::warn!("Save failed: {}", e);
                StatusMessage::failed(now)
            }
        };
        self.status.insert(status)
    }

    /// Hand the deck to local displays.
    pub async fn present<S: Storage>(&mut self, store: &DeckStore<S>, now: Instant) -> StorageResult<()> {
        self.autosave.save(store, &self.deck, now).await
    }

    /// Write the deck to the local cache if it changed and the autosave
    /// interval has passed. Returns true if it was written.
    pub async fn autosave<S: Storage>(&mut self, store: &DeckStore<S>, now: Instant) -> StorageResult<bool> {
        self.autosave.maybe_save(store, &self.deck, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::ContentKind;
    use crate::remote::{
        MemoryShowService, RemoteError, ShowSummary, UploadedMedia,
    };
    use crate::storage::{MemoryStorage, block_on};
    use kurbo::{Rect, Size};
    use std::sync::Arc;

    fn store() -> DeckStore<MemoryStorage> {
        DeckStore::new(Arc::new(MemoryStorage::new()))
    }

    /// A show service whose every call fails.
    struct OfflineService;

    fn offline() -> RemoteError {
        RemoteError::NotConfigured("show service")
    }

    impl ShowService for OfflineService {
        fn load_deck(&self, _reference: &ShowReference) -> RemoteResult<Option<ShowRecord>> {
            Err(offline())
        }

        fn save_deck(
            &self,
            _reference: Option<&ShowReference>,
            _deck: &Deck,
            _name: &str,
            _window: Option<&ScheduleWindow>,
        ) -> RemoteResult<ShowRecord> {
            Err(offline())
        }

        fn list_saved_decks(&self, _scheduled_only: bool) -> RemoteResult<Vec<ShowSummary>> {
            Err(offline())
        }

        fn delete_deck(&self, _id: &str) -> RemoteResult<()> {
            Err(offline())
        }

        fn upload_media(&self, _bytes: &[u8], _mime: &str) -> RemoteResult<UploadedMedia> {
            Err(offline())
        }

        fn search_stock_images(&self, _query: &str) -> RemoteResult<Vec<StockImage>> {
            Err(offline())
        }
    }

    #[test]
    fn test_add_text_selects_and_commits() {
        let mut editor = EditorSession::default();
        let id = editor.add_text();
        assert_eq!(editor.selected_element_id(), Some(id.as_str()));
        assert_eq!(editor.history().len(), 2);
        let element = editor.selected_element().unwrap();
        assert_eq!(element.bounds(), Rect::new(100.0, 100.0, 400.0, 200.0));
    }

    #[test]
    fn test_drag_commits_once() {
        let mut editor = EditorSession::default();
        let id = editor.add_text();
        let before = editor.history().len();

        assert!(editor.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(110.0, 110.0),
            button: MouseButton::Left,
        }));
        editor.handle_pointer_event(&PointerEvent::Move {
            position: Point::new(200.0, 150.0),
        });
        editor.handle_pointer_event(&PointerEvent::Move {
            position: Point::new(260.0, 190.0),
        });
        assert_eq!(editor.history().len(), before);
        assert!(editor.handle_pointer_event(&PointerEvent::Up {
            position: Point::new(260.0, 190.0),
            button: MouseButton::Left,
        }));

        assert_eq!(editor.history().len(), before + 1);
        let element = editor.active_slide().unwrap().element(&id).unwrap();
        assert_eq!(element.position, Point::new(250.0, 180.0));
    }

    #[test]
    fn test_click_without_move_still_commits() {
        let mut editor = EditorSession::default();
        let id = editor.add_text();
        let before = editor.history().len();

        assert!(editor.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(150.0, 150.0),
            button: MouseButton::Left,
        }));
        assert!(editor.handle_pointer_event(&PointerEvent::Up {
            position: Point::new(150.0, 150.0),
            button: MouseButton::Left,
        }));

        assert_eq!(editor.history().len(), before + 1);
        let element = editor.active_slide().unwrap().element(&id).unwrap();
        assert_eq!(element.position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_release_without_session_does_not_commit() {
        let mut editor = EditorSession::default();
        assert!(!editor.end_session());
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_pointer_on_handle_resizes() {
        let mut editor = EditorSession::default();
        let id = editor.add_shape(ShapeKind::Rectangle);

        // South-east corner of the default shape is at (250, 250).
        editor.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(252.0, 249.0),
            button: MouseButton::Left,
        });
        editor.handle_pointer_event(&PointerEvent::Move {
            position: Point::new(172.0, 169.0),
        });
        editor.handle_pointer_event(&PointerEvent::Up {
            position: Point::new(172.0, 169.0),
            button: MouseButton::Left,
        });

        let element = editor.active_slide().unwrap().element(&id).unwrap();
        assert_eq!(element.size(), Size::new(50.0, 50.0));
        assert_eq!(element.position, Point::new(150.0, 150.0));
    }

    #[test]
    fn test_click_on_empty_canvas_clears_selection() {
        let mut editor = EditorSession::default();
        editor.add_text();
        editor.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(900.0, 500.0),
            button: MouseButton::Left,
        });
        assert!(editor.selected_element_id().is_none());
        assert!(!editor.is_manipulating());
    }

    #[test]
    fn test_delete_last_slide_is_refused() {
        let mut editor = EditorSession::default();
        assert!(!editor.delete_slide(0));
        assert_eq!(editor.deck().len(), 1);
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_delete_slide_selects_neighbour() {
        let mut editor = EditorSession::default();
        editor.add_slide();
        editor.add_slide();
        assert!(editor.delete_slide(2));
        assert_eq!(editor.active_slide_index(), 1);
        assert!(editor.delete_slide(0));
        assert_eq!(editor.active_slide_index(), 0);
        assert_eq!(editor.deck().len(), 1);
    }

    #[test]
    fn test_duplicate_many_times() {
        let mut editor = EditorSession::default();
        editor.add_text();
        editor.add_slide();
        for _ in 0..3 {
            assert!(editor.duplicate_slide(0));
        }
        assert_eq!(editor.deck().len(), 5);
        assert_eq!(editor.active_slide_index(), 1);

        let mut slide_ids: Vec<_> = editor.deck().slides().iter().map(|s| s.id.clone()).collect();
        slide_ids.sort();
        slide_ids.dedup();
        assert_eq!(slide_ids.len(), 5);

        // Editing a copy leaves the source alone.
        let copy_element = editor.active_slide().unwrap().elements[0].id.clone();
        editor.update_element_content(&copy_element, "changed");
        assert_eq!(editor.deck().slides()[0].elements[0].content(), Some(DEFAULT_TEXT));
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut editor = EditorSession::default();
        let before = editor.deck().clone();
        editor.add_slide();
        let after = editor.deck().clone();

        assert!(editor.undo());
        assert_eq!(editor.deck(), &before);
        assert_eq!(editor.active_slide_index(), 0);
        assert!(!editor.undo());

        assert!(editor.redo());
        assert_eq!(editor.deck(), &after);
        assert_eq!(editor.active_slide_index(), 1);
    }

    #[test]
    fn test_undo_clears_stale_selection() {
        let mut editor = EditorSession::default();
        editor.add_text();
        editor.undo();
        assert!(editor.selected_element_id().is_none());
    }

    #[test]
    fn test_geometry_update_clamps_size() {
        let mut editor = EditorSession::default();
        let id = editor.add_image("https://cdn.example/a.png");
        assert!(editor.update_element_geometry(
            &id,
            GeometryPatch {
                x: Some(5.0),
                width: Some(10.0),
                ..GeometryPatch::default()
            }
        ));
        let element = editor.selected_element().unwrap();
        assert_eq!(element.position, Point::new(5.0, 100.0));
        assert_eq!(element.size(), Size::new(50.0, 200.0));
        assert!(!editor.update_element_geometry("missing", GeometryPatch::default()));
    }

    #[test]
    fn test_non_finite_geometry_refused() {
        let mut editor = EditorSession::default();
        let id = editor.add_text();
        let len = editor.history().len();

        for patch in [
            GeometryPatch {
                x: Some(f64::NAN),
                ..GeometryPatch::default()
            },
            GeometryPatch {
                width: Some(f64::INFINITY),
                ..GeometryPatch::default()
            },
        ] {
            assert!(!editor.update_element_geometry(&id, patch));
        }
        assert_eq!(editor.history().len(), len);

        let json = editor.deck().to_json().unwrap();
        assert_eq!(&Deck::from_json(&json).unwrap(), editor.deck());
    }

    #[test]
    fn test_nan_zoom_ignored() {
        let mut editor = EditorSession::default();
        editor.set_zoom(50.0);
        editor.set_zoom(f64::NAN);
        assert!((editor.viewport.zoom - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_style_update_merges() {
        let mut editor = EditorSession::default();
        let id = editor.add_text();
        editor.update_element_style(&id, &StylePatch::new().with_font_size(64.0));
        editor.update_element_style(&id, &StylePatch::new().with_color("#ff0000"));
        let style = editor.selected_element().unwrap().style();
        assert_eq!(style.font_size, Some(64.0));
        assert_eq!(style.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_slide_duration_clamped() {
        let mut editor = EditorSession::default();
        editor.update_slide_properties(SlidePatch {
            duration_secs: Some(600.0),
            ..SlidePatch::default()
        });
        assert!((editor.active_slide().unwrap().duration_secs - MAX_DURATION_SECS).abs() < f64::EPSILON);
        editor.update_slide_properties(SlidePatch {
            duration_secs: Some(0.0),
            background_color: Some("#000000".to_string()),
            ..SlidePatch::default()
        });
        let slide = editor.active_slide().unwrap();
        assert!((slide.duration_secs - MIN_DURATION_SECS).abs() < f64::EPSILON);
        assert_eq!(slide.background_color, "#000000");
    }

    #[test]
    fn test_reorder_follows_active_slide() {
        let mut editor = EditorSession::default();
        editor.add_slide();
        editor.add_slide();
        editor.select_slide(0);
        assert!(editor.reorder_slide(0, 2));
        assert_eq!(editor.active_slide_index(), 2);
        assert_eq!(editor.active_slide().unwrap().name, "Slide 1");
    }

    #[test]
    fn test_select_slide_does_not_commit() {
        let mut editor = EditorSession::default();
        editor.add_slide();
        let len = editor.history().len();
        assert!(editor.select_slide(0));
        assert!(!editor.select_slide(9));
        assert_eq!(editor.history().len(), len);
    }

    #[test]
    fn test_shortcuts() {
        let mut editor = EditorSession::default();
        editor.add_text();
        assert!(editor.handle_shortcut("Delete", Modifiers::NONE));
        assert!(editor.active_slide().unwrap().elements.is_empty());
        assert!(editor.handle_shortcut("z", Modifiers::ctrl()));
        assert_eq!(editor.active_slide().unwrap().elements.len(), 1);
        assert!(editor.handle_shortcut("z", Modifiers::ctrl_shift()));
        assert!(editor.active_slide().unwrap().elements.is_empty());
        assert!(!editor.handle_shortcut("q", Modifiers::NONE));
    }

    #[test]
    fn test_save_remembers_show_and_caches_deck() {
        let service = MemoryShowService::new();
        let store = store();
        let mut editor = EditorSession::default();
        editor.set_name("Lobby");
        editor.add_slide();
        let now = Instant::now();

        let status = block_on(editor.save(&service, &store, now)).clone();
        assert_eq!(status.kind, StatusKind::Success);
        assert_eq!(status.text, "Saved!");
        assert!(matches!(editor.show_reference(), Some(ShowReference::Id(_))));
        assert_eq!(block_on(store.load()).unwrap().unwrap().len(), 2);

        // A second save updates the same show.
        block_on(editor.save(&service, &store, now));
        assert_eq!(service.show_count(), 1);

        assert!(editor.status(now + Duration::from_secs(1)).is_some());
        assert!(editor.status(now + SAVE_OK_DISPLAY).is_none());
    }

    #[test]
    fn test_failed_save_reports_failure() {
        let service = MemoryShowService::new();
        let store = store();
        let mut editor = EditorSession::default();
        // Updating a show the service never stored fails.
        editor.show_ref = Some(ShowReference::Id("gone".to_string()));
        let now = Instant::now();

        let status = block_on(editor.save(&service, &store, now)).clone();
        assert_eq!(status.kind, StatusKind::Failure);
        assert_eq!(status.expires_at, now + SAVE_FAILED_DISPLAY);
        assert!(block_on(store.load()).unwrap().is_none());
    }

    #[test]
    fn test_schedule_validation() {
        let mut editor = EditorSession::default();
        assert!(editor.set_schedule(Some("2026-01-01T09:00"), None).is_err());
        assert!(editor.set_schedule(Some("2026-01-01T09:00"), Some("2026-01-01T10:00")).is_ok());
        assert!(editor.schedule().is_some());
        assert!(editor.set_schedule(None, None).is_ok());
        assert!(editor.schedule().is_none());
    }

    #[test]
    fn test_open_content_seeds_then_resumes() {
        let service = MemoryShowService::new();
        let content = ContentItem {
            id: "12".to_string(),
            name: "Promo".to_string(),
            kind: ContentKind::Video,
            file_url: Some("https://cdn.example/promo.mp4".to_string()),
            duration_secs: Some(15.0),
        };

        let mut editor = EditorSession::open_content(&service, &content, Instant::now());
        assert_eq!(editor.name(), "Promo");
        let slide = editor.active_slide().unwrap();
        assert_eq!(slide.elements[0].source(), Some("https://cdn.example/promo.mp4"));

        block_on(editor.save(&service, &store(), Instant::now()));
        editor.add_slide();
        let reopened = EditorSession::open_content(&service, &content, Instant::now());
        assert_eq!(reopened.deck().len(), 1);
        assert!(matches!(reopened.show_reference(), Some(ShowReference::Id(_))));
    }

    #[test]
    fn test_upload_adds_media() {
        let service = MemoryShowService::new();
        let mut editor = EditorSession::default();
        let id = editor.upload_media(&service, b"data", "video/mp4", Instant::now()).unwrap();
        let element = editor.selected_element().unwrap();
        assert_eq!(element.id, id);
        assert_eq!(element.size(), Size::new(400.0, 225.0));
    }

    #[test]
    fn test_failed_upload_reports_failure() {
        let mut editor = EditorSession::default();
        let len = editor.history().len();
        let now = Instant::now();

        assert!(editor.upload_media(&OfflineService, b"data", "image/png", now).is_err());
        assert!(editor.active_slide().unwrap().elements.is_empty());
        assert_eq!(editor.history().len(), len);

        let status = editor.status(now).unwrap();
        assert_eq!(status.text, "Upload failed");
        assert_eq!(status.kind, StatusKind::Failure);
        assert!(editor.status(now + SAVE_FAILED_DISPLAY).is_none());
    }

    #[test]
    fn test_failed_fetch_seeds_deck_with_status() {
        let content = ContentItem {
            id: "3".to_string(),
            name: "Menu".to_string(),
            kind: ContentKind::Document,
            file_url: None,
            duration_secs: None,
        };
        let now = Instant::now();
        let editor = EditorSession::open_content(&OfflineService, &content, now);

        assert_eq!(editor.name(), "Menu");
        assert_eq!(editor.active_slide().unwrap().elements[0].content(), Some("Menu"));
        assert_eq!(editor.status(now).unwrap().text, "Load failed");
    }

    #[test]
    fn test_autosave_after_edits() {
        let store = store();
        let config = EditorConfig {
            autosave_interval: Duration::from_secs(30),
            ..EditorConfig::default()
        };
        let mut editor = EditorSession::with_config(Deck::new(), config);
        let t0 = Instant::now();

        assert!(!editor.has_unsaved_changes());
        assert!(!block_on(editor.autosave(&store, t0)).unwrap());

        editor.add_slide();
        assert!(editor.has_unsaved_changes());
        assert!(block_on(editor.autosave(&store, t0)).unwrap());
        assert_eq!(block_on(store.load()).unwrap().unwrap().len(), 2);

        editor.add_slide();
        assert!(!block_on(editor.autosave(&store, t0 + Duration::from_secs(10))).unwrap());
        assert!(block_on(editor.autosave(&store, t0 + Duration::from_secs(30))).unwrap());
        assert_eq!(block_on(store.load()).unwrap().unwrap().len(), 3);
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn test_present_clears_unsaved_changes() {
        let store = store();
        let mut editor = EditorSession::default();
        editor.add_text();
        block_on(editor.present(&store, Instant::now())).unwrap();
        assert!(!editor.has_unsaved_changes());
        assert_eq!(block_on(store.load()).unwrap().unwrap(), *editor.deck());
    }
}
