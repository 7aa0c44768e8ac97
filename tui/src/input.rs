//! Input handling for Flashdeck TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;

use flashdeck_engine::{App, ControlInput, SettingKey};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 256; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the frame
/// loop through a bounded channel.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a backpressured send unblocks.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending input into `app`. Returns `true` when the app should quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev) {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns `true` when the app should quit.
pub fn apply_event(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) => {
            // Handle press + repeat events (ignore releases)
            if matches!(key.kind, KeyEventKind::Release) {
                return app.should_quit();
            }

            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                app.request_quit();
                return true;
            }

            if app.settings_open() {
                handle_drawer_keys(app, key);
            } else {
                handle_deck_keys(app, key);
            }
        }
        Event::FocusGained => app.focus_changed(true),
        Event::FocusLost => app.focus_changed(false),
        _ => {}
    }
    app.should_quit()
}

fn handle_deck_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(' ') => {
            app.toggle_play_pause();
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.next();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.previous();
        }
        KeyCode::Char('s') => app.toggle_settings(),
        KeyCode::Char('R') => app.reset_settings(),
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Char('+' | '=') => {
            app.compact_adjust(SettingKey::CardDuration, ControlInput::Increment);
        }
        KeyCode::Char('-') => {
            app.compact_adjust(SettingKey::CardDuration, ControlInput::Decrement);
        }
        KeyCode::Char('m') => {
            app.compact_adjust(SettingKey::Mode, ControlInput::Cycle);
        }
        KeyCode::Char('t') => {
            app.compact_adjust(SettingKey::SoundEnabled, ControlInput::Toggle);
        }
        _ => {}
    }
}

fn handle_drawer_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('s') => app.close_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.drawer_focus_prev(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.drawer_focus_next(),
        KeyCode::Left | KeyCode::Char('h') => {
            app.drawer_adjust(ControlInput::Decrement);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.drawer_adjust(ControlInput::Increment);
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.drawer_adjust(ControlInput::Cycle);
        }
        KeyCode::Char('R') => app.reset_settings(),
        KeyCode::Char('q') => app.request_quit(),
        _ => {}
    }
}
