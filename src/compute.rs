/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `SessionState` (and, where needed, an RNG handle) and returns a brand-new
/// `SessionState`.  Side effects are limited to the injected RNG.

use std::fmt;

use rand::Rng;

use crate::entities::{
    Arrow, Direction, GameEvent, Mover, Player, Rect, SessionState, SessionStatus,
};

// ── Tuning ───────────────────────────────────────────────────────────────────

/// Simulation ticks per second.
pub const TICK_RATE: u32 = 60;

/// Session length in seconds; the countdown starts here.
pub const MAX_DURATION_SECS: u32 = 60;

pub const MAX_DURATION_TICKS: u64 = MAX_DURATION_SECS as u64 * TICK_RATE as u64;

/// The final stretch of the countdown that gets a per-second tick sound.
pub const COUNTDOWN_PHASE_SECS: u32 = 10;

/// Max simultaneous arrows in flight.
pub const MAX_ARROWS: usize = 3;

/// Player vertical speed, cells per tick.
pub const PLAYER_SPEED: f32 = 0.25;

pub const PLAYER_X: f32 = 1.0;
pub const PLAYER_W: f32 = 3.0;
pub const PLAYER_H: f32 = 3.0;

/// Arrow launch speed, cells per tick.
pub const ARROW_SPEED: f32 = 1.6;

/// Launch elevation above horizontal, degrees.
pub const LAUNCH_ANGLE_DEG: f32 = 30.0;

/// Downward acceleration applied to every arrow, cells per tick squared.
pub const GRAVITY: f32 = 0.03;

pub const ARROW_W: f32 = 1.0;
pub const ARROW_H: f32 = 1.0;

/// How many targets (or obstacles) appear whenever their collection
/// empties.
pub const RESPAWN_BATCH: usize = 3;

/// Drift speed range for targets and obstacles, cells per tick.
pub const MOVER_MAX_SPEED: f32 = 0.5;

// ── Init-time validation ─────────────────────────────────────────────────────

/// Nonsensical tuning is caught once, before the terminal is touched.
#[derive(Clone, Debug, PartialEq)]
pub enum TuningError {
    ZeroArrowCap,
    NonPositiveSpeed(&'static str),
    ZeroTickRate,
    ZeroDuration,
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::ZeroArrowCap => write!(f, "arrow cap must be at least 1"),
            TuningError::NonPositiveSpeed(which) => {
                write!(f, "{which} must be positive")
            }
            TuningError::ZeroTickRate => write!(f, "tick rate must be at least 1"),
            TuningError::ZeroDuration => write!(f, "session duration must be at least 1s"),
        }
    }
}

impl std::error::Error for TuningError {}

pub fn validate_tuning() -> Result<(), TuningError> {
    if MAX_ARROWS == 0 {
        return Err(TuningError::ZeroArrowCap);
    }
    if ARROW_SPEED <= 0.0 {
        return Err(TuningError::NonPositiveSpeed("arrow launch speed"));
    }
    if PLAYER_SPEED <= 0.0 {
        return Err(TuningError::NonPositiveSpeed("player speed"));
    }
    if TICK_RATE == 0 {
        return Err(TuningError::ZeroTickRate);
    }
    if MAX_DURATION_SECS == 0 {
        return Err(TuningError::ZeroDuration);
    }
    Ok(())
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session for the given terminal dimensions.  Also the
/// restart path: "Play Again" simply calls this again.
pub fn init_session(width: u16, height: u16, rng: &mut impl Rng) -> SessionState {
    let mut state = SessionState {
        player: Player {
            rect: Rect::new(PLAYER_X, 0.0, PLAYER_W, PLAYER_H),
        },
        arrows: Vec::new(),
        targets: Vec::new(),
        obstacles: Vec::new(),
        score: 0,
        status: SessionStatus::Running,
        frame: 0,
        prev_whole_second: MAX_DURATION_SECS,
        events: Vec::new(),
        width,
        height,
    };
    state.player.rect.y = (state.field_h() - PLAYER_H) / 2.0;
    state.targets = spawn_targets(rng, state.field_w(), state.field_h());
    state.obstacles = spawn_obstacles(rng, state.field_w(), state.field_h());
    state
}

/// Seconds left on the countdown clock.
pub fn remaining_secs(state: &SessionState) -> f32 {
    MAX_DURATION_TICKS.saturating_sub(state.frame) as f32 / TICK_RATE as f32
}

/// Bounds of the end-screen "Play Again" button, in terminal cell
/// coordinates.  Shared by the renderer (drawing) and the frame loop
/// (click hit-testing).
pub fn play_again_button(width: u16, height: u16) -> Rect {
    let w = 14.0;
    let x = ((f32::from(width) - w) / 2.0).floor();
    let y = (f32::from(height) / 2.0 + 3.0).floor();
    Rect::new(x, y, w, 1.0)
}

// ── Input-driven state transitions (pure) ────────────────────────────────────

/// Shift the player one tick's worth in the given direction, clamped to
/// the vertical play extent.
pub fn move_player(state: &SessionState, direction: Direction) -> SessionState {
    let max_y = state.field_h() - state.player.rect.h;
    let new_y = match direction {
        Direction::Up => (state.player.rect.y - PLAYER_SPEED).max(0.0),
        Direction::Down => (state.player.rect.y + PLAYER_SPEED).min(max_y),
    };
    SessionState {
        player: Player {
            rect: Rect {
                y: new_y,
                ..state.player.rect
            },
        },
        events: Vec::new(),
        ..state.clone()
    }
}

/// Launch an arrow from the player's bow edge — capped at
/// `MAX_ARROWS` simultaneous arrows.  At the cap this is an exact no-op:
/// no arrow, no event, hence no sound.
pub fn fire_arrow(state: &SessionState) -> SessionState {
    if state.arrows.len() >= MAX_ARROWS {
        return SessionState {
            events: Vec::new(),
            ..state.clone()
        };
    }
    let angle = LAUNCH_ANGLE_DEG.to_radians();
    let new_arrow = Arrow {
        rect: Rect::new(
            state.player.rect.right(),
            state.player.rect.y + (state.player.rect.h - ARROW_H) / 2.0,
            ARROW_W,
            ARROW_H,
        ),
        vx: ARROW_SPEED * angle.cos(),
        vy: -ARROW_SPEED * angle.sin(),
    };
    let mut arrows = state.arrows.clone();
    arrows.push(new_arrow);
    SessionState {
        arrows,
        events: vec![GameEvent::ArrowFired],
        ..state.clone()
    }
}

// ── Per-tick step (nearly pure — RNG is injected) ────────────────────────────

/// Advance the simulation by one fixed timestep.  All randomness comes
/// through `rng` so callers control determinism (useful for tests with a
/// seeded RNG).  Ticking an `Ended` session is inert.
pub fn tick(state: &SessionState, rng: &mut impl Rng) -> SessionState {
    if state.status == SessionStatus::Ended {
        return SessionState {
            events: Vec::new(),
            ..state.clone()
        };
    }

    let frame = state.frame + 1;
    let field_w = state.field_w();
    let field_h = state.field_h();
    let mut events: Vec<GameEvent> = Vec::new();

    // ── 1. Advance arrows ────────────────────────────────────────────────────
    // Constant horizontal velocity, gravity on the vertical one.  An arrow
    // that leaves the play volume after the update is discarded.
    let arrows: Vec<Arrow> = state
        .arrows
        .iter()
        .filter_map(|a| {
            let vy = a.vy + GRAVITY;
            let rect = Rect {
                x: a.rect.x + a.vx,
                y: a.rect.y + vy,
                ..a.rect
            };
            let gone = rect.x > field_w || rect.y > field_h * 1.5 || rect.y < field_h * -0.5;
            if gone {
                None
            } else {
                Some(Arrow { rect, vx: a.vx, vy })
            }
        })
        .collect();

    // ── 2. Drift targets and obstacles ───────────────────────────────────────
    let targets = advance_movers(&state.targets, field_h);
    let obstacles = advance_movers(&state.obstacles, field_h);

    // ── 3. Collisions ────────────────────────────────────────────────────────
    // Targets are scanned first, obstacles only for arrows that hit no
    // target; list order decides which entity a multi-overlap arrow takes.
    // An arrow scores at most one hit per tick.
    let mut used_arrows: Vec<usize> = Vec::new();
    let mut killed_targets: Vec<usize> = Vec::new();
    let mut killed_obstacles: Vec<usize> = Vec::new();

    for (ai, arrow) in arrows.iter().enumerate() {
        for (ti, target) in targets.iter().enumerate() {
            if arrow.rect.overlaps(&target.rect) && !killed_targets.contains(&ti) {
                used_arrows.push(ai);
                killed_targets.push(ti);
                events.push(GameEvent::TargetHit);
                break;
            }
        }
    }
    for (ai, arrow) in arrows.iter().enumerate() {
        if used_arrows.contains(&ai) {
            continue;
        }
        for (oi, obstacle) in obstacles.iter().enumerate() {
            if arrow.rect.overlaps(&obstacle.rect) && !killed_obstacles.contains(&oi) {
                used_arrows.push(ai);
                killed_obstacles.push(oi);
                events.push(GameEvent::ObstacleHit);
                break;
            }
        }
    }

    let score = state.score + killed_targets.len() as i32 - killed_obstacles.len() as i32;

    let arrows: Vec<Arrow> = arrows
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !used_arrows.contains(i))
        .map(|(_, a)| a)
        .collect();
    let mut targets: Vec<Mover> = targets
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !killed_targets.contains(i))
        .map(|(_, t)| t)
        .collect();
    let mut obstacles: Vec<Mover> = obstacles
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !killed_obstacles.contains(i))
        .map(|(_, o)| o)
        .collect();

    // ── 4. Respawn emptied collections ───────────────────────────────────────
    if targets.is_empty() {
        targets = spawn_targets(rng, field_w, field_h);
    }
    if obstacles.is_empty() {
        obstacles = spawn_obstacles(rng, field_w, field_h);
    }

    // ── 5. Countdown & end of session ────────────────────────────────────────
    let remaining_ticks = MAX_DURATION_TICKS.saturating_sub(frame);
    let mut status = SessionStatus::Running;
    let mut prev_whole_second = state.prev_whole_second;
    if remaining_ticks == 0 {
        status = SessionStatus::Ended;
        events.push(GameEvent::SessionOver);
    } else {
        // A partial second still counts as a whole one on the clock, so
        // the boundary fires exactly when a new integer second is entered.
        let whole = remaining_ticks.div_ceil(u64::from(TICK_RATE)) as u32;
        if whole <= COUNTDOWN_PHASE_SECS && whole != prev_whole_second {
            events.push(GameEvent::CountdownTick);
        }
        prev_whole_second = whole;
    }

    SessionState {
        player: state.player.clone(),
        arrows,
        targets,
        obstacles,
        score,
        status,
        frame,
        prev_whole_second,
        events,
        width: state.width,
        height: state.height,
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn advance_movers(movers: &[Mover], field_h: f32) -> Vec<Mover> {
    movers
        .iter()
        .map(|m| {
            let mut rect = m.rect;
            let mut dir = m.dir;
            rect.y += m.speed * dir;
            if rect.y <= 0.0 {
                rect.y = 0.0;
                dir = 1.0;
            } else if rect.bottom() >= field_h {
                rect.y = field_h - rect.h;
                dir = -1.0;
            }
            Mover {
                rect,
                speed: m.speed,
                dir,
            }
        })
        .collect()
}

fn spawn_targets(rng: &mut impl Rng, field_w: f32, field_h: f32) -> Vec<Mover> {
    spawn_movers(rng, field_w, field_h, 2..=4, 2..=3)
}

/// Obstacles share the target motion model but draw from a smaller size
/// range.
fn spawn_obstacles(rng: &mut impl Rng, field_w: f32, field_h: f32) -> Vec<Mover> {
    spawn_movers(rng, field_w, field_h, 1..=2, 1..=2)
}

/// Generate one respawn batch in the right half of the field.
fn spawn_movers(
    rng: &mut impl Rng,
    field_w: f32,
    field_h: f32,
    w_range: std::ops::RangeInclusive<u32>,
    h_range: std::ops::RangeInclusive<u32>,
) -> Vec<Mover> {
    (0..RESPAWN_BATCH)
        .map(|_| {
            let w = rng.gen_range(w_range.clone()) as f32;
            let h = rng.gen_range(h_range.clone()) as f32;
            let min_x = field_w / 2.0;
            let max_x = (field_w - w).max(min_x + 1.0);
            let max_y = (field_h - h).max(1.0);
            Mover {
                rect: Rect::new(
                    rng.gen_range(min_x..max_x),
                    rng.gen_range(0.0..max_y),
                    w,
                    h,
                ),
                speed: rng.gen_range(0.0..=MOVER_MAX_SPEED),
                dir: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            }
        })
        .collect()
}
