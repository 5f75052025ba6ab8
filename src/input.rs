/// Terminal keyboard tracking.
///
/// Instead of acting on each key event individually, we record the loop
/// frame of the last press/repeat event for every key.  A key counts as held
/// while that record is fresh, which lets several keys be held at once.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): proper `Press` /
///   `Repeat` / `Release` events, modifier keys reported on their own, keys
///   dropped on release.
/// * **Classic terminals**: only `Press` events, OS key-repeat shows up as
///   repeated presses, and Shift is only visible as a modifier flag.  Keys
///   expire after a short window of silence.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

use crate::compute::{Command, HeldKeys, TickInput};

/// A key is considered held if its last press/repeat arrived within this many
/// frames (≈100 ms at 50 FPS, shorter than the OS repeat interval).
pub const HOLD_WINDOW: u64 = 5;

/// The hyper key is edge-triggered, so it must outlive the OS initial repeat
/// delay on classic terminals or a long hold would fire twice.
pub const HYPER_HOLD_WINDOW: u64 = 35;

const BOOST_KEY: KeyCode = KeyCode::Modifier(ModifierKeyCode::LeftShift);
const HYPER_KEY: KeyCode = KeyCode::Modifier(ModifierKeyCode::RightShift);

/// Lower-case letters so `a` and `A` (Shift held) are the same key.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    /// Maps each held key → the frame it was last seen (press or repeat).
    key_frame: HashMap<KeyCode, u64>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn seen_within(&self, key: KeyCode, frame: u64, window: u64) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= window)
            .unwrap_or(false)
    }

    fn is_held(&self, key: KeyCode, frame: u64) -> bool {
        self.seen_within(key, frame, HOLD_WINDOW)
    }

    fn any_held(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|&k| self.is_held(k, frame))
    }

    /// Record one key event.  Returns the one-shot command it triggers, if any.
    pub fn on_event(&mut self, event: KeyEvent, frame: u64) -> Option<Command> {
        let code = normalize(event.code);
        match event.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(code, frame);
                let shifted = event.modifiers.contains(KeyModifiers::SHIFT);
                if shifted {
                    self.key_frame.insert(BOOST_KEY, frame);
                }
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
                    KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(Command::Quit)
                    }
                    KeyCode::Char(' ') => {
                        if shifted || self.is_held(BOOST_KEY, frame) {
                            Some(Command::SpreadFire)
                        } else {
                            Some(Command::Fire)
                        }
                    }
                    KeyCode::Char('c') | KeyCode::CapsLock => Some(Command::Shield),
                    KeyCode::Char('e') => Some(Command::AreaEffect),
                    _ => None,
                }
            }
            // Repeat: refresh timestamp so key stays "held"
            KeyEventKind::Repeat => {
                self.key_frame.insert(code, frame);
                None
            }
            // Release: remove key immediately (keyboard-enhancement path)
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
                None
            }
        }
    }

    /// Keys that count as held on `frame`.
    pub fn held(&self, frame: u64) -> HeldKeys {
        HeldKeys {
            up: self.any_held(&[KeyCode::Up, KeyCode::Char('w')], frame),
            down: self.any_held(&[KeyCode::Down, KeyCode::Char('s')], frame),
            left: self.any_held(&[KeyCode::Left, KeyCode::Char('a')], frame),
            right: self.any_held(&[KeyCode::Right, KeyCode::Char('d')], frame),
            boost: self.is_held(BOOST_KEY, frame),
            hyper: self.seen_within(KeyCode::Char('h'), frame, HYPER_HOLD_WINDOW)
                || self.seen_within(HYPER_KEY, frame, HYPER_HOLD_WINDOW),
        }
    }

    /// Fold this frame's events into a `TickInput`.
    pub fn frame_input(
        &mut self,
        events: impl IntoIterator<Item = KeyEvent>,
        frame: u64,
    ) -> TickInput {
        let commands = events
            .into_iter()
            .filter_map(|ev| self.on_event(ev, frame))
            .collect();
        TickInput {
            held: self.held(frame),
            commands,
        }
    }
}
