mod audio;
mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use archery_range::compute::{
    fire_arrow, init_session, move_player, play_again_button, tick, validate_tuning,
};
use archery_range::entities::{Direction, GameEvent, SessionStatus};

use audio::Audio;

const FRAME: Duration = Duration::from_micros(16_667); // ≈60 FPS

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Sound dispatch ────────────────────────────────────────────────────────────

fn play_cues(audio: &Audio, events: &[GameEvent]) {
    for ev in events {
        match ev {
            GameEvent::ArrowFired => audio.shot(),
            GameEvent::TargetHit => audio.target_hit(),
            GameEvent::ObstacleHit => audio.obstacle_hit(),
            GameEvent::CountdownTick => audio.countdown_tick(),
            GameEvent::SessionOver => audio.game_over(),
        }
    }
}

// ── Unified frame loop ────────────────────────────────────────────────────────

/// One loop drives both session phases: `Running` ticks the simulation,
/// `Ended` freezes it and waits for a restart click (or `r`) while still
/// redrawing.  Restart is a plain re-init, never a nested loop.
///
/// Input model: instead of acting on each key event individually, we
/// maintain a `key_frame` map that records the frame number of the last
/// press/repeat event for every key.  Each frame we check which movement
/// keys are still "fresh" (within `HOLD_WINDOW` frames) and apply them
/// simultaneously, so Up/Down stay smooth while firing.  Fire itself is a
/// discrete press, not a held key.
fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    audio: &Audio,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let (width, height) = terminal::size()?;
    let mut state = init_session(width, height, &mut rng);

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut pointer: Option<(u16, u16)> = None;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    // Press: record key + handle one-shot actions
                    KeyEventKind::Press => {
                        key_frame.insert(code.clone(), frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c')
                                if modifiers.contains(KeyModifiers::CONTROL) =>
                            {
                                return Ok(());
                            }
                            KeyCode::Char(' ')
                                if state.status == SessionStatus::Running =>
                            {
                                state = fire_arrow(&state);
                                play_cues(audio, &state.events);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if state.status == SessionStatus::Ended =>
                            {
                                state = init_session(state.width, state.height, &mut rng);
                            }
                            _ => {}
                        }
                    }
                    // Repeat: refresh timestamp so key stays "held"
                    KeyEventKind::Repeat => {
                        key_frame.insert(code.clone(), frame);
                    }
                    // Release: remove key immediately (keyboard-enhancement path)
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent {
                    kind, column, row, ..
                }) => match kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        pointer = Some((column, row));
                    }
                    MouseEventKind::Down(MouseButton::Left) => {
                        pointer = Some((column, row));
                        if state.status == SessionStatus::Ended {
                            let button = play_again_button(state.width, state.height);
                            if button.contains(f32::from(column), f32::from(row)) {
                                state = init_session(state.width, state.height, &mut rng);
                            }
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        // ── Held-key movement, applied every frame ────────────────────────────
        if state.status == SessionStatus::Running {
            let up = is_held(&key_frame, &KeyCode::Up, frame)
                || is_held(&key_frame, &KeyCode::Char('w'), frame)
                || is_held(&key_frame, &KeyCode::Char('W'), frame);
            let down = is_held(&key_frame, &KeyCode::Down, frame)
                || is_held(&key_frame, &KeyCode::Char('s'), frame)
                || is_held(&key_frame, &KeyCode::Char('S'), frame);

            if up {
                state = move_player(&state, Direction::Up);
            }
            if down {
                state = move_player(&state, Direction::Down);
            }

            state = tick(&state, &mut rng);
            play_cues(audio, &state.events);
        }

        display::render(out, &state, pointer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    validate_tuning()?;

    // Open the audio device before raw mode so a failure prints cleanly.
    let audio = Audio::new()?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = run(&mut out, &rx, &audio);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result?;
    Ok(())
}
