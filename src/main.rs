use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use kokaton_barrage::compute::{init_state, tick};
use kokaton_barrage::config::Cli;
use kokaton_barrage::consts::FPS;
use kokaton_barrage::display::{self, Viewport, MIN_COLS, MIN_ROWS};
use kokaton_barrage::entities::{GameEvent, GameState, Phase};
use kokaton_barrage::error::{GameError, Result};
use kokaton_barrage::input::KeyTracker;

const FRAME: Duration = Duration::from_millis(1000 / FPS as u64);

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits or the defeat cutscene finishes.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut viewport = Viewport::new(cols, rows);
    let mut keys = KeyTracker::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        let mut pending = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(Event::Key(key)) => pending.push(key),
                Ok(Event::Resize(c, r)) => {
                    viewport = Viewport::new(c, r);
                    if !viewport.fits() {
                        warn!("terminal resized to {c}x{r}, below {MIN_COLS}x{MIN_ROWS}");
                    }
                }
                Ok(_) => {}
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Err(GameError::InputClosed),
            }
        }

        let input = keys.frame_input(pending, frame);
        for ev in tick(state, &input, rng) {
            match ev {
                GameEvent::Quit => info!("quit at frame {}", state.frame),
                GameEvent::AvatarHit => info!("game over, score {}", state.score.value),
                other => debug!("{:?}", other),
            }
        }

        display::render(out, &viewport, state)?;

        if state.phase == Phase::GameOver {
            return Ok(());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let (cols, rows) = terminal::size()?;
    if cols < MIN_COLS || rows < MIN_ROWS {
        return Err(GameError::TerminalTooSmall {
            width: cols,
            height: rows,
            min_width: MIN_COLS,
            min_height: MIN_ROWS,
        });
    }

    let seed = cli.resolve_seed();
    info!("starting with seed {seed} on a {cols}x{rows} terminal");
    let mut rng = StdRng::seed_from_u64(seed);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for release events and standalone modifier keys (Shift, Caps Lock).
    // Kitty-protocol terminals support this; others fall back to hold windows.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES,
            ))
            .is_ok();
    if !keyboard_enhanced {
        warn!("keyboard enhancement unavailable; using press-only input");
    }

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let mut state = init_state();
    let result = game_loop(&mut out, &mut state, &rx, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("final score {} after {} frames", state.score.value, state.frame);
    result
}
