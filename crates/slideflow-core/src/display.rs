//! Autoplay controller for display screens.
//!
//! Timers are deadlines rather than background tasks: the owner calls
//! `tick` with the current instant (typically after sleeping until
//! `next_deadline`) and acts on the returned events. Refresh and reload
//! only announce that the deck should be re-read; `refresh_from` and
//! `reload_from` do the reading.

use crate::deck::{Deck, Slide};
use crate::storage::{DeckStore, Storage};
use std::time::{Duration, Instant};

/// Default period between deck store polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Default period between full reloads.
pub const DEFAULT_RELOAD_INTERVAL: Duration = Duration::from_secs(300);

/// Refresh timing for a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub poll_interval: Duration,
    pub reload_interval: Duration,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            reload_interval: DEFAULT_RELOAD_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
}

/// Keys the display reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKey {
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
}

impl DisplayKey {
    /// Parse a DOM-style key name.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(DisplayKey::ArrowLeft),
            "ArrowRight" => Some(DisplayKey::ArrowRight),
            " " | "Space" => Some(DisplayKey::Space),
            "Escape" => Some(DisplayKey::Escape),
            _ => None,
        }
    }
}

/// Something the owner of the controller should react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    SlideChanged { from: usize, to: usize },
    PlaybackChanged(PlaybackState),
    /// Time to re-read the deck store.
    RefreshDue,
    /// Time to re-initialize from the deck store.
    ReloadDue,
    ExitRequested,
}

/// Plays a deck, advancing on each slide's duration.
#[derive(Debug, Clone)]
pub struct DisplayController {
    deck: Deck,
    current: usize,
    state: PlaybackState,
    config: DisplayConfig,
    advance_at: Option<Instant>,
    poll_at: Option<Instant>,
    reload_at: Option<Instant>,
    shut_down: bool,
}

impl DisplayController {
    /// Start playing from the first slide.
    pub fn new(deck: Deck, config: DisplayConfig, now: Instant) -> Self {
        let mut controller = Self {
            deck,
            current: 0,
            state: PlaybackState::Playing,
            config,
            advance_at: None,
            poll_at: now.checked_add(config.poll_interval),
            reload_at: now.checked_add(config.reload_interval),
            shut_down: false,
        };
        controller.arm_advance(now);
        controller
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.deck.get(self.current)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Earliest pending deadline, if any timer is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.advance_at, self.poll_at, self.reload_at].into_iter().flatten().min()
    }

    /// When the current slide will advance.
    pub fn advance_deadline(&self) -> Option<Instant> {
        self.advance_at
    }

    fn arm_advance(&mut self, from: Instant) {
        self.advance_at = if self.shut_down || self.state == PlaybackState::Paused || self.deck.len() <= 1 {
            None
        } else {
            self.current_slide().and_then(|slide| from.checked_add(slide.duration()))
        };
    }

    fn go_to(&mut self, index: usize, now: Instant) -> Option<DisplayEvent> {
        let from = self.current;
        self.current = index;
        self.arm_advance(now);
        (from != index).then_some(DisplayEvent::SlideChanged { from, to: index })
    }

    /// Fire every deadline that has passed.
    pub fn tick(&mut self, now: Instant) -> Vec<DisplayEvent> {
        let mut events = Vec::new();
        if self.shut_down {
            return events;
        }

        // Re-arm from the missed deadline so slide timing does not drift.
        while let Some(at) = self.advance_at.filter(|at| *at <= now) {
            let from = self.current;
            self.current = (self.current + 1) % self.deck.len();
            self.arm_advance(at);
            log::info!("Advancing slide {} -> {}", from, self.current);
            events.push(DisplayEvent::SlideChanged { from, to: self.current });
        }

        if let Some(at) = self.poll_at.filter(|at| *at <= now) {
            self.poll_at = next_period(at, self.config.poll_interval, now);
            events.push(DisplayEvent::RefreshDue);
        }
        if let Some(at) = self.reload_at.filter(|at| *at <= now) {
            self.reload_at = next_period(at, self.config.reload_interval, now);
            events.push(DisplayEvent::ReloadDue);
        }
        events
    }

    pub fn next(&mut self, now: Instant) -> Option<DisplayEvent> {
        let index = (self.current + 1) % self.deck.len();
        self.go_to(index, now)
    }

    pub fn previous(&mut self, now: Instant) -> Option<DisplayEvent> {
        let len = self.deck.len();
        let index = (self.current + len - 1) % len;
        self.go_to(index, now)
    }

    /// Pause or resume. Resuming gives the current slide its full duration.
    pub fn toggle_play_pause(&mut self, now: Instant) -> DisplayEvent {
        self.state = match self.state {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Playing,
        };
        self.arm_advance(now);
        log::info!("Playback {:?}", self.state);
        DisplayEvent::PlaybackChanged(self.state)
    }

    pub fn handle_key(&mut self, key: DisplayKey, now: Instant) -> Option<DisplayEvent> {
        if self.shut_down {
            return None;
        }
        match key {
            DisplayKey::ArrowLeft => self.previous(now),
            DisplayKey::ArrowRight => self.next(now),
            DisplayKey::Space => Some(self.toggle_play_pause(now)),
            DisplayKey::Escape => Some(DisplayEvent::ExitRequested),
        }
    }

    /// Swap in a newer deck, keeping the position where possible.
    ///
    /// The advance timer restarts only when the slide count, the current
    /// slide's duration or the current index changed, so polling an
    /// unchanged deck does not hold a slide on screen.
    pub fn replace_deck(&mut self, deck: Deck, now: Instant) {
        let old_len = self.deck.len();
        let old_duration = self.current_slide().map(Slide::duration);

        self.deck = deck;
        let clamped = self.deck.clamp_index(self.current);
        let index_changed = clamped != self.current;
        self.current = clamped;

        let new_duration = self.current_slide().map(Slide::duration);
        if index_changed || old_len != self.deck.len() || old_duration != new_duration || self.advance_at.is_none() {
            self.arm_advance(now);
        }
    }

    /// Re-initialize with a deck: timers restart from `now`. Ignored once
    /// shut down.
    pub fn reload(&mut self, deck: Deck, now: Instant) {
        if self.shut_down {
            return;
        }
        self.deck = deck;
        self.current = self.deck.clamp_index(self.current);
        self.poll_at = now.checked_add(self.config.poll_interval);
        self.reload_at = now.checked_add(self.config.reload_interval);
        self.arm_advance(now);
        log::info!("Reloaded deck ({} slides)", self.deck.len());
    }

    /// Re-read the store and pick up any newer deck. Missing or unreadable
    /// decks keep the current one.
    pub async fn refresh_from<S: Storage>(&mut self, store: &DeckStore<S>, now: Instant) {
        match store.load().await {
            Ok(Some(deck)) => self.replace_deck(deck, now),
            Ok(None) => {}
            Err(e) => log::warn!("Failed to refresh deck: {}", e),
        }
    }

    pub async fn reload_from<S: Storage>(&mut self, store: &DeckStore<S>, now: Instant) {
        match store.load().await {
            Ok(Some(deck)) => self.reload(deck, now),
            Ok(None) => {
                let deck = self.deck.clone();
                self.reload(deck, now);
            }
            Err(e) => log::warn!("Failed to reload deck: {}", e),
        }
    }

    /// Stop all timers. A shut-down controller never fires again.
    pub fn shutdown(&mut self) {
        self.advance_at = None;
        self.poll_at = None;
        self.reload_at = None;
        self.shut_down = true;
    }
}

/// Next periodic deadline after `at`, skipping periods already missed.
fn next_period(at: Instant, period: Duration, now: Instant) -> Option<Instant> {
    match at.checked_add(period) {
        Some(next) if next > now => Some(next),
        _ => now.checked_add(period),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, block_on};
    use std::sync::Arc;

    fn deck_with_durations(durations: &[f64]) -> Deck {
        let mut slides = durations.iter().enumerate().map(|(i, d)| {
            let mut slide = Slide::new(format!("Slide {}", i + 1));
            slide.duration_secs = *d;
            slide
        });
        let mut deck = match slides.next() {
            Some(first) => Deck::with_slide(first),
            None => Deck::new(),
        };
        for slide in slides {
            deck.push(slide);
        }
        deck
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_advances_on_each_duration() {
        let t0 = Instant::now();
        let mut display = DisplayController::new(deck_with_durations(&[5.0, 10.0, 3.0]), DisplayConfig::default(), t0);

        assert!(display.tick(t0 + Duration::from_millis(4999)).is_empty());
        assert_eq!(display.tick(t0 + secs(5)), vec![DisplayEvent::SlideChanged { from: 0, to: 1 }]);
        assert!(display.tick(t0 + secs(14)).is_empty());
        assert_eq!(display.tick(t0 + secs(15)), vec![DisplayEvent::SlideChanged { from: 1, to: 2 }]);
        assert_eq!(display.tick(t0 + secs(18)), vec![DisplayEvent::SlideChanged { from: 2, to: 0 }]);
    }

    #[test]
    fn test_late_tick_catches_up_without_drift() {
        let t0 = Instant::now();
        let mut display = DisplayController::new(deck_with_durations(&[5.0, 10.0, 3.0]), DisplayConfig::default(), t0);

        let events = display.tick(t0 + secs(16));
        assert_eq!(events.len(), 2);
        assert_eq!(display.current_index(), 2);
        assert_eq!(display.advance_deadline(), Some(t0 + secs(18)));
    }

    #[test]
    fn test_single_slide_never_advances() {
        let t0 = Instant::now();
        let mut display = DisplayController::new(Deck::new(), DisplayConfig::default(), t0);
        assert!(display.advance_deadline().is_none());
        assert!(display.next(t0).is_none());
        assert_eq!(display.current_index(), 0);
    }

    #[test]
    fn test_manual_navigation_wraps_and_rearms() {
        let t0 = Instant::now();
        let mut display = DisplayController::new(deck_with_durations(&[5.0, 10.0, 3.0]), DisplayConfig::default(), t0);

        assert_eq!(
            display.handle_key(DisplayKey::ArrowLeft, t0 + secs(2)),
            Some(DisplayEvent::SlideChanged { from: 0, to: 2 })
        );
        assert_eq!(display.advance_deadline(), Some(t0 + secs(5)));
        display.handle_key(DisplayKey::ArrowRight, t0 + secs(3));
        assert_eq!(display.current_index(), 0);
        assert_eq!(display.advance_deadline(), Some(t0 + secs(8)));
    }

    #[test]
    fn test_pause_and_resume() {
        let t0 = Instant::now();
        let mut display = DisplayController::new(deck_with_durations(&[5.0, 5.0]), DisplayConfig::default(), t0);

        assert_eq!(
            display.handle_key(DisplayKey::Space, t0 + secs(1)),
            Some(DisplayEvent::PlaybackChanged(PlaybackState::Paused))
        );
        assert!(display.tick(t0 + secs(60)).iter().all(|e| !matches!(e, DisplayEvent::SlideChanged { .. })));
        assert_eq!(display.current_index(), 0);

        display.toggle_play_pause(t0 + secs(60));
        assert_eq!(display.state(), PlaybackState::Playing);
        assert_eq!(display.advance_deadline(), Some(t0 + secs(65)));
    }

    #[test]
    fn test_escape_requests_exit() {
        let t0 = Instant::now();
        let mut display = DisplayController::new(Deck::new(), DisplayConfig::default(), t0);
        assert_eq!(display.handle_key(DisplayKey::Escape, t0), Some(DisplayEvent::ExitRequested));
        assert_eq!(DisplayKey::parse(" "), Some(DisplayKey::Space));
        assert_eq!(DisplayKey::parse("Enter"), None);
    }

    #[test]
    fn test_refresh_and_reload_events() {
        let t0 = Instant::now();
        let config = DisplayConfig {
            poll_interval: secs(30),
            reload_interval: secs(300),
        };
        let mut display = DisplayController::new(Deck::new(), config, t0);

        assert_eq!(display.next_deadline(), Some(t0 + secs(30)));
        assert_eq!(display.tick(t0 + secs(30)), vec![DisplayEvent::RefreshDue]);
        let events = display.tick(t0 + secs(300));
        assert!(events.contains(&DisplayEvent::RefreshDue));
        assert!(events.contains(&DisplayEvent::ReloadDue));
        assert_eq!(display.next_deadline(), Some(t0 + secs(330)));
    }

    #[test]
    fn test_replace_deck_clamps_index() {
        let t0 = Instant::now();
        let mut display = DisplayController::new(deck_with_durations(&[5.0, 5.0, 5.0]), DisplayConfig::default(), t0);
        display.next(t0);
        display.next(t0);
        assert_eq!(display.current_index(), 2);

        display.replace_deck(deck_with_durations(&[5.0, 5.0]), t0 + secs(1));
        assert_eq!(display.current_index(), 1);
        assert_eq!(display.advance_deadline(), Some(t0 + secs(6)));
    }

    #[test]
    fn test_unchanged_deck_keeps_timer() {
        let t0 = Instant::now();
        let deck = deck_with_durations(&[20.0, 20.0]);
        let mut display = DisplayController::new(deck.clone(), DisplayConfig::default(), t0);
        display.replace_deck(deck, t0 + secs(10));
        assert_eq!(display.advance_deadline(), Some(t0 + secs(20)));
    }

    #[test]
    fn test_shutdown_stops_everything() {
        let t0 = Instant::now();
        let mut display = DisplayController::new(deck_with_durations(&[1.0, 1.0]), DisplayConfig::default(), t0);
        display.shutdown();
        assert!(display.next_deadline().is_none());
        assert!(display.tick(t0 + secs(1000)).is_empty());
        assert!(display.handle_key(DisplayKey::Space, t0).is_none());
        assert_eq!(display.current_index(), 0);
    }

    #[test]
    fn test_huge_stored_duration_plays() {
        let t0 = Instant::now();
        let deck = Deck::from_json(
            r##"[{"id": "a", "name": "Long", "backgroundColor": "#000", "duration": 1e20},
                 {"id": "b", "name": "Short", "backgroundColor": "#000", "duration": 5}]"##,
        )
        .unwrap();
        let mut display = DisplayController::new(deck.clone(), DisplayConfig::default(), t0);
        assert_eq!(display.current_slide().unwrap().name, "Long");
        assert!(display.advance_deadline().is_some());

        display.replace_deck(deck.clone(), t0 + secs(1));
        display.reload(deck, t0 + secs(2));
        assert_eq!(display.current_index(), 0);
    }

    #[test]
    fn test_reload_after_shutdown_stays_quiet() {
        let t0 = Instant::now();
        let mut display = DisplayController::new(deck_with_durations(&[5.0, 5.0]), DisplayConfig::default(), t0);
        display.shutdown();
        display.reload(deck_with_durations(&[5.0, 5.0, 5.0]), t0 + secs(1));
        assert!(display.next_deadline().is_none());
        assert_eq!(display.deck().len(), 2);
    }

    #[test]
    fn test_refresh_from_store() {
        let t0 = Instant::now();
        let store = DeckStore::new(Arc::new(MemoryStorage::new()));
        let mut display = DisplayController::new(Deck::welcome(), DisplayConfig::default(), t0);

        block_on(display.refresh_from(&store, t0));
        assert_eq!(display.current_slide().unwrap().name, "Welcome Slide");

        block_on(store.save(&deck_with_durations(&[4.0, 4.0]))).unwrap();
        block_on(display.refresh_from(&store, t0));
        assert_eq!(display.deck().len(), 2);
        assert_eq!(display.advance_deadline(), Some(t0 + secs(4)));
    }
}
