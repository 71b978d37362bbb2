//! Full-screen terminal player driving a `DisplayController`.

use crate::PlayerError;
use crate::sync::ShowSync;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, ClearType},
};
use slideflow_core::deck::Deck;
use slideflow_core::display::{DisplayConfig, DisplayController, DisplayEvent, DisplayKey, PlaybackState};
use slideflow_core::elements::ElementBody;
use slideflow_core::remote::ShowService;
use slideflow_core::storage::{DeckStore, Storage};
use std::io::{Write, stdout};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Longest wait for input when no timer is armed.
const IDLE_WAIT: Duration = Duration::from_millis(500);

/// Map a terminal key press to a display key. `q` and Ctrl+C also exit.
pub fn map_key(key: KeyEvent) -> Option<DisplayKey> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Left => Some(DisplayKey::ArrowLeft),
        KeyCode::Right => Some(DisplayKey::ArrowRight),
        KeyCode::Char(' ') => Some(DisplayKey::Space),
        KeyCode::Esc | KeyCode::Char('q') => Some(DisplayKey::Escape),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(DisplayKey::Escape),
        _ => None,
    }
}

/// Text summary of the slide on screen.
pub fn slide_lines(display: &DisplayController) -> Vec<String> {
    let Some(slide) = display.current_slide() else {
        return vec!["(no slides)".to_string()];
    };

    let state = match display.state() {
        PlaybackState::Playing => "playing",
        PlaybackState::Paused => "paused",
    };
    let mut lines = vec![
        format!(
            "{} [{}/{}] {} {}s",
            slide.name,
            display.current_index() + 1,
            display.deck().len(),
            state,
            slide.duration().as_secs()
        ),
        String::new(),
    ];

    for element in &slide.elements {
        let line = match &element.body {
            ElementBody::Text(text) => text.content.clone(),
            ElementBody::Image(media) => format!("[image] {}", media.source),
            ElementBody::Video(media) => format!("[video] {}", media.source),
            ElementBody::Shape(shape) => format!("[shape] {}", shape.style.fill.as_deref().unwrap_or("transparent")),
        };
        lines.push(line);
    }
    lines
}

/// Leaves raw mode and the alternate screen when dropped.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn render(display: &DisplayController) -> std::io::Result<()> {
    let mut out = stdout();
    queue!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    for line in slide_lines(display) {
        queue!(out, Print(line), Print("\r\n"))?;
    }
    queue!(out, Print("\r\n<-/-> navigate  space pause  esc quit"))?;
    out.flush()
}

/// Play the shared deck until the viewer exits.
pub fn run<S, T>(store: &DeckStore<S>, sync: Option<&ShowSync<T>>, config: DisplayConfig) -> Result<(), PlayerError>
where
    S: Storage,
    T: ShowService,
{
    if let Some(Err(e)) = sync.map(|sync| sync.pull(store)) {
        log::warn!("Initial show sync failed: {}", e);
    }

    let deck = match pollster::block_on(store.load()) {
        Ok(Some(deck)) => deck,
        Ok(None) => Deck::welcome(),
        Err(e) => {
            log::warn!("Failed to load deck, showing welcome slide: {}", e);
            Deck::welcome()
        }
    };

    // Saves made through the store are picked up without waiting for a poll.
    let (tx, rx) = mpsc::channel();
    let subscription = store.subscribe(move |deck| {
        let _ = tx.send(deck.clone());
    });

    let mut display = DisplayController::new(deck, config, Instant::now());
    let guard = TerminalGuard::enter()?;
    let result = play(&mut display, store, sync, &rx);
    drop(guard);

    display.shutdown();
    store.unsubscribe(subscription);
    result
}

fn play<S, T>(
    display: &mut DisplayController,
    store: &DeckStore<S>,
    sync: Option<&ShowSync<T>>,
    updates: &mpsc::Receiver<Deck>,
) -> Result<(), PlayerError>
where
    S: Storage,
    T: ShowService,
{
    render(display)?;
    loop {
        let mut dirty = false;

        let wait = display
            .next_deadline()
            .map(|at| at.saturating_duration_since(Instant::now()).min(IDLE_WAIT))
            .unwrap_or(IDLE_WAIT);
        if event::poll(wait)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(key) = map_key(key) {
                        match display.handle_key(key, Instant::now()) {
                            Some(DisplayEvent::ExitRequested) => return Ok(()),
                            Some(_) => dirty = true,
                            None => {}
                        }
                    }
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }

        while let Ok(deck) = updates.try_recv() {
            display.replace_deck(deck, Instant::now());
            dirty = true;
        }

        let now = Instant::now();
        for event in display.tick(now) {
            match event {
                DisplayEvent::RefreshDue => {
                    if let Some(Err(e)) = sync.map(|sync| sync.pull(store)) {
                        log::warn!("Show sync failed: {}", e);
                    }
                    pollster::block_on(display.refresh_from(store, now));
                }
                DisplayEvent::ReloadDue => pollster::block_on(display.reload_from(store, now)),
                DisplayEvent::ExitRequested => return Ok(()),
                DisplayEvent::SlideChanged { .. } | DisplayEvent::PlaybackChanged(_) => {}
            }
            dirty = true;
        }

        if dirty {
            render(display)?;
        }
    }
}
