/// All game entity types — pure data, no logic.

/// An axis-aligned rectangle in play-area cell coordinates.
///
/// `y` grows downward.  Positions are fractional so sub-cell motion
/// (gravity arcs, slow drifting blocks) stays smooth between redraws.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// AABB overlap test.  Rectangles that merely touch do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True if the point lies inside the rectangle (left/top inclusive).
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionStatus {
    Running,
    Ended,
}

/// What happened during one state transition.  Replaced, never
/// accumulated: every `compute` function starts from an empty list, so
/// the caller sees only the events of the step it just applied.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    ArrowFired,
    TargetHit,
    ObstacleHit,
    CountdownTick,
    SessionOver,
}

// ── Player & projectiles ──────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
}

/// An arrow in flight.  Horizontal velocity is fixed at launch; vertical
/// velocity is mutated by gravity every tick.
#[derive(Clone, Debug)]
pub struct Arrow {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
}

impl Arrow {
    /// Flight angle in radians for display orientation only (y-up
    /// convention, so a rising arrow has a positive angle).  Has no
    /// effect on the simulation.
    pub fn heading(&self) -> f32 {
        (-self.vy).atan2(self.vx)
    }
}

// ── Drifting blocks ───────────────────────────────────────────────────────────

/// Shared shape and motion state for targets and obstacles: a rectangle
/// drifting vertically at a per-entity speed, reflecting off the top and
/// bottom play-area edges.  `dir` is +1.0 (down) or -1.0 (up).
#[derive(Clone, Debug)]
pub struct Mover {
    pub rect: Rect,
    pub speed: f32,
    pub dir: f32,
}

// ── Master session state ──────────────────────────────────────────────────────

/// The entire session state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub player: Player,
    /// Arrows currently in flight (never more than the launch cap).
    pub arrows: Vec<Arrow>,
    /// Blocks worth +1 when struck.
    pub targets: Vec<Mover>,
    /// Blocks worth -1 when struck.
    pub obstacles: Vec<Mover>,
    pub score: i32,
    pub status: SessionStatus,
    /// Fixed-timestep tick counter; the countdown derives from it.
    pub frame: u64,
    /// Whole seconds remaining as of the previous tick, for edge-detecting
    /// integer-second boundaries in the countdown phase.
    pub prev_whole_second: u32,
    /// Events produced by the most recent state transition.
    pub events: Vec<GameEvent>,
    /// Terminal dimensions the session was initialized with.
    pub width: u16,
    pub height: u16,
}

impl SessionState {
    /// Width of the playable field, excluding the side borders.
    pub fn field_w(&self) -> f32 {
        f32::from(self.width.saturating_sub(2))
    }

    /// Height of the playable field, excluding the HUD row, the border
    /// bars and the hint row.
    pub fn field_h(&self) -> f32 {
        f32::from(self.height.saturating_sub(4))
    }
}
