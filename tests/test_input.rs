use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};
use kokaton_barrage::compute::Command;
use kokaton_barrage::input::{KeyTracker, HOLD_WINDOW, HYPER_HOLD_WINDOW};

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
}

#[test]
fn pressed_key_is_held_until_window_expires() {
    let mut keys = KeyTracker::new();
    keys.on_event(press(KeyCode::Left), 10);
    assert!(keys.held(10).left);
    assert!(keys.held(10 + HOLD_WINDOW).left);
    assert!(!keys.held(10 + HOLD_WINDOW + 1).left);
}

#[test]
fn repeat_refreshes_and_release_drops() {
    let mut keys = KeyTracker::new();
    keys.on_event(press(KeyCode::Char('d')), 1);
    keys.on_event(
        KeyEvent::new_with_kind(KeyCode::Char('d'), KeyModifiers::NONE, KeyEventKind::Repeat),
        4,
    );
    assert!(keys.held(4 + HOLD_WINDOW).right);
    keys.on_event(release(KeyCode::Char('d')), 5);
    assert!(!keys.held(5).right);
}

#[test]
fn wasd_and_arrows_are_equivalent() {
    let mut keys = KeyTracker::new();
    let input = keys.frame_input(
        [
            press(KeyCode::Char('w')),
            press(KeyCode::Char('A')),
            press(KeyCode::Down),
            press(KeyCode::Right),
        ],
        1,
    );
    assert!(input.held.up && input.held.left && input.held.down && input.held.right);
    assert!(input.commands.is_empty());
}

#[test]
fn space_fires_and_shift_space_spreads() {
    let mut keys = KeyTracker::new();
    assert_eq!(keys.on_event(press(KeyCode::Char(' ')), 1), Some(Command::Fire));
    assert_eq!(
        keys.on_event(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::SHIFT), 2),
        Some(Command::SpreadFire)
    );
}

#[test]
fn held_left_shift_makes_space_spread() {
    let mut keys = KeyTracker::new();
    let shift = KeyCode::Modifier(ModifierKeyCode::LeftShift);
    keys.on_event(press(shift), 1);
    assert!(keys.held(1).boost);
    assert_eq!(keys.on_event(press(KeyCode::Char(' ')), 2), Some(Command::SpreadFire));
    keys.on_event(release(shift), 3);
    assert!(!keys.held(3).boost);
    assert_eq!(keys.on_event(press(KeyCode::Char(' ')), 3), Some(Command::Fire));
}

#[test]
fn shifted_movement_boosts() {
    let mut keys = KeyTracker::new();
    keys.on_event(KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT), 1);
    let held = keys.held(1);
    assert!(held.up);
    assert!(held.boost);
}

#[test]
fn ability_and_quit_bindings() {
    let mut keys = KeyTracker::new();
    assert_eq!(keys.on_event(press(KeyCode::Char('c')), 1), Some(Command::Shield));
    assert_eq!(keys.on_event(press(KeyCode::CapsLock), 1), Some(Command::Shield));
    assert_eq!(keys.on_event(press(KeyCode::Char('e')), 1), Some(Command::AreaEffect));
    assert_eq!(keys.on_event(press(KeyCode::Char('q')), 1), Some(Command::Quit));
    assert_eq!(keys.on_event(press(KeyCode::Esc), 1), Some(Command::Quit));
    assert_eq!(
        keys.on_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), 1),
        Some(Command::Quit)
    );
    assert_eq!(keys.on_event(press(KeyCode::Char('h')), 1), None);
}

#[test]
fn hyper_key_outlasts_repeat_delay() {
    let mut keys = KeyTracker::new();
    keys.on_event(press(KeyCode::Char('h')), 1);
    assert!(keys.held(1 + HYPER_HOLD_WINDOW).hyper);
    assert!(!keys.held(2 + HYPER_HOLD_WINDOW).hyper);

    let right_shift = KeyCode::Modifier(ModifierKeyCode::RightShift);
    keys.on_event(press(right_shift), 50);
    assert!(keys.held(50).hyper);
    keys.on_event(release(right_shift), 51);
    assert!(!keys.held(51).hyper);
}
