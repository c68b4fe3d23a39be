mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use astro_shooter::compute::{handle_intent_in_place, init_state, tick_in_place, Intent};
use astro_shooter::config::GameConfig;
use astro_shooter::entities::{GameState, GameStatus};
use astro_shooter::view;

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is at least 15 Hz, so 8 frames at 60 Hz (≈133 ms)
/// is always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if any of `keys` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

fn letter(c: char) -> [KeyCode; 2] {
    [KeyCode::Char(c.to_ascii_lowercase()), KeyCode::Char(c.to_ascii_uppercase())]
}

/// Translate the set of held keys into the six continuous thrust/rotate
/// intents. Sent every frame, so a key that expires turns its control off.
fn held_intents(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> [Intent; 6] {
    [
        Intent::MoveForward(is_held(key_frame, &letter('w'), frame)),
        Intent::MoveBackward(is_held(key_frame, &letter('s'), frame)),
        Intent::MoveLeft(is_held(key_frame, &letter('a'), frame)),
        Intent::MoveRight(is_held(key_frame, &letter('d'), frame)),
        Intent::RotateLeft(is_held(key_frame, &[KeyCode::Left], frame)),
        Intent::RotateRight(is_held(key_frame, &[KeyCode::Right], frame)),
    ]
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the user quits.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key. Each frame the still-fresh keys become
/// thrust and rotate intents, so W + ← + SPACE can be held together. One-shot
/// keys (B, Q, SPACE in the menus) act on the press itself. Firing cadence
/// is left to the simulation's own shot cooldown.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    frame_len: Duration,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char(' ') if state.status != GameStatus::Playing => {
                            handle_intent_in_place(state, Intent::Start, &mut rng);
                        }
                        KeyCode::Char('b') | KeyCode::Char('B') => {
                            handle_intent_in_place(state, Intent::ActivateBomb, &mut rng);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Apply held-key actions every frame ────────────────────────────────
        if state.status == GameStatus::Playing {
            for intent in held_intents(&key_frame, frame) {
                handle_intent_in_place(state, intent, &mut rng);
            }
            if is_held(&key_frame, &[KeyCode::Char(' ')], frame) {
                handle_intent_in_place(state, Intent::Fire, &mut rng);
            }
        }

        tick_in_place(state, &mut rng);

        display::render(out, state.field, &view::views(state), &view::hud(state))?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// The terminal belongs to the renderer, so logs go to a file.
fn init_logging(config: &GameConfig) -> anyhow::Result<()> {
    let file = File::create(&config.log_path)
        .with_context(|| format!("cannot open log file {}", config.log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = GameConfig::load_or_default();
    config.validate().context("invalid configuration")?;
    init_logging(&config)?;
    info!("Starting astro_shooter with {:?}", config);

    let mut state = init_state(&config, &mut thread_rng());
    let frame_len = Duration::from_secs_f64(config.tick_delta());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped, program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut state, &rx, frame_len);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(
        "Exiting, score {} (best {})",
        state.score.current(),
        state.score.high()
    );
    result.context("game loop failed")
}
