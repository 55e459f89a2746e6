/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// session state.  No game logic is performed; this module only translates
/// state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use archery_range::compute::{play_again_button, remaining_secs, COUNTDOWN_PHASE_SECS};
use archery_range::entities::{Arrow, Rect, SessionState, SessionStatus};

// Field origin inside the terminal: one column in from the side walls,
// below the HUD row and the top bar.
const FIELD_OX: i32 = 1;
const FIELD_OY: i32 = 2;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_DIVIDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_TIME: Color = Color::White;
const C_HUD_TIME_LOW: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ARROW: Color = Color::Yellow;
const C_TARGET: Color = Color::Red;
const C_OBSTACLE: Color = Color::DarkMagenta;
const C_HINT: Color = Color::DarkGrey;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.  `pointer` is the last known mouse
/// position, used to highlight the end-screen button on hover.
pub fn render<W: Write>(
    out: &mut W,
    state: &SessionState,
    pointer: Option<(u16, u16)>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, state)?;
    draw_divider(out, state)?;
    draw_hud(out, state)?;

    for target in &state.targets {
        draw_block(out, state, &target.rect, C_TARGET)?;
    }
    for obstacle in &state.obstacles {
        draw_block(out, state, &obstacle.rect, C_OBSTACLE)?;
    }
    for arrow in &state.arrows {
        draw_arrow(out, state, arrow)?;
    }

    draw_player(out, state)?;
    draw_controls_hint(out, state)?;

    if state.status == SessionStatus::Ended {
        draw_end_screen(out, state, pointer)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, state.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Cell plumbing ─────────────────────────────────────────────────────────────

fn field_cols(state: &SessionState) -> i32 {
    i32::from(state.width.saturating_sub(2))
}

fn field_rows(state: &SessionState) -> i32 {
    i32::from(state.height.saturating_sub(4))
}

/// Print one character at a field-relative cell, clipped to the field.
fn put_cell<W: Write>(
    out: &mut W,
    state: &SessionState,
    fx: i32,
    fy: i32,
    glyph: &str,
) -> std::io::Result<()> {
    if fx < 0 || fy < 0 || fx >= field_cols(state) || fy >= field_rows(state) {
        return Ok(());
    }
    out.queue(cursor::MoveTo((FIELD_OX + fx) as u16, (FIELD_OY + fy) as u16))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Border & divider ──────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, state: &SessionState) -> std::io::Result<()> {
    let w = state.width as usize;
    let h = state.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(state.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

/// The decorative mid-field divider the arrows arc over.
fn draw_divider<W: Write>(out: &mut W, state: &SessionState) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_DIVIDER))?;
    let fx = field_cols(state) / 2;
    for fy in 0..field_rows(state) {
        put_cell(out, state, fx, fy, "·")?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &SessionState) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>5}", state.score)))?;

    // Countdown — right, turning red for the final stretch
    let secs = remaining_secs(state).ceil() as u32;
    let time_str = format!("Time:{:>3}s", secs);
    let color = if secs <= COUNTDOWN_PHASE_SECS {
        C_HUD_TIME_LOW
    } else {
        C_HUD_TIME
    };
    let rx = state
        .width
        .saturating_sub(time_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(&time_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, state: &SessionState) -> std::io::Result<()> {
    // Archer sprite (3 rows, 3 cols), bow facing the targets:
    //    o
    //   /|)
    //   / \
    let px = state.player.rect.x.round() as i32;
    let py = state.player.rect.y.round() as i32;
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    for (i, row) in [" o ", "/|)", "/ \\"].iter().enumerate() {
        for (j, ch) in row.chars().enumerate() {
            if ch != ' ' {
                put_cell(out, state, px + j as i32, py + i as i32, &ch.to_string())?;
            }
        }
    }
    Ok(())
}

fn draw_arrow<W: Write>(out: &mut W, state: &SessionState, arrow: &Arrow) -> std::io::Result<()> {
    // Orientation is display-only, picked from the flight angle.
    let deg = arrow.heading().to_degrees();
    let glyph = if deg > 22.5 {
        "↗"
    } else if deg < -22.5 {
        "↘"
    } else {
        "→"
    };
    out.queue(style::SetForegroundColor(C_ARROW))?;
    put_cell(
        out,
        state,
        arrow.rect.x.round() as i32,
        arrow.rect.y.round() as i32,
        glyph,
    )
}

/// Filled block for a target or obstacle rect, clipped to the field.
fn draw_block<W: Write>(
    out: &mut W,
    state: &SessionState,
    rect: &Rect,
    color: Color,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(color))?;
    let x = rect.x.round() as i32;
    let y = rect.y.round() as i32;
    for dy in 0..rect.h.round() as i32 {
        for dx in 0..rect.w.round() as i32 {
            put_cell(out, state, x + dx, y + dy, "█")?;
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &SessionState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, state.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("↑ ↓ / W S : Move   SPACE : Fire   Q : Quit"))?;
    Ok(())
}

// ── End-of-session overlay ────────────────────────────────────────────────────

fn draw_end_screen<W: Write>(
    out: &mut W,
    state: &SessionState,
    pointer: Option<(u16, u16)>,
) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════════╗", Color::Red),
        ("║      TIME'S  UP      ║", Color::Red),
        ("╚══════════════════════╝", Color::Red),
    ];

    let cx = state.width / 2;
    let start_row = (state.height / 2).saturating_sub(3);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let score_line = format!("Final Score: {:>5}", state.score);
    let score_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    // Clickable button, highlighted while the pointer is inside it
    let button = play_again_button(state.width, state.height);
    let hovered = pointer
        .map(|(mx, my)| button.contains(f32::from(mx), f32::from(my)))
        .unwrap_or(false);
    out.queue(cursor::MoveTo(button.x as u16, button.y as u16))?;
    if hovered {
        out.queue(style::SetBackgroundColor(Color::Yellow))?;
        out.queue(style::SetForegroundColor(Color::Black))?;
    } else {
        out.queue(style::SetForegroundColor(Color::White))?;
    }
    out.queue(Print("[ Play Again ]"))?;
    out.queue(style::ResetColor)?;

    let hint = "Click, or R - Play Again  Q - Quit";
    let hint_row = button.y as u16 + 2;
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, hint_row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;

    Ok(())
}
