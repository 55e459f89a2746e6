use archery_range::entities::*;

#[test]
fn entity_clone_and_eq() {
    // Enums derive PartialEq — equality comparisons must work
    assert_eq!(SessionStatus::Running, SessionStatus::Running);
    assert_ne!(SessionStatus::Running, SessionStatus::Ended);
    assert_eq!(Direction::Up, Direction::Up);
    assert_ne!(Direction::Up, Direction::Down);
    assert_eq!(GameEvent::TargetHit, GameEvent::TargetHit);
    assert_ne!(GameEvent::TargetHit, GameEvent::ObstacleHit);

    // Clone must produce an equal value
    let ev = GameEvent::CountdownTick;
    assert_eq!(ev.clone(), GameEvent::CountdownTick);
}

#[test]
fn rect_edges() {
    let r = Rect::new(2.0, 3.0, 4.0, 5.0);
    assert_eq!(r.right(), 6.0);
    assert_eq!(r.bottom(), 8.0);
}

#[test]
fn rect_overlap_basics() {
    let a = Rect::new(0.0, 0.0, 4.0, 4.0);
    let b = Rect::new(2.0, 2.0, 4.0, 4.0); // overlapping corner
    let c = Rect::new(10.0, 10.0, 2.0, 2.0); // disjoint
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
    assert!(!a.overlaps(&c));
    assert!(!c.overlaps(&a));
}

#[test]
fn rect_touching_edges_do_not_overlap() {
    let a = Rect::new(0.0, 0.0, 4.0, 4.0);
    let right = Rect::new(4.0, 0.0, 4.0, 4.0); // shares a's right edge
    let below = Rect::new(0.0, 4.0, 4.0, 4.0); // shares a's bottom edge
    assert!(!a.overlaps(&right));
    assert!(!a.overlaps(&below));
}

#[test]
fn rect_contained_rect_overlaps() {
    let outer = Rect::new(0.0, 0.0, 10.0, 10.0);
    let inner = Rect::new(3.0, 3.0, 2.0, 2.0);
    assert!(outer.overlaps(&inner));
    assert!(inner.overlaps(&outer));
}

#[test]
fn rect_contains_points() {
    let r = Rect::new(10.0, 5.0, 4.0, 2.0);
    assert!(r.contains(10.0, 5.0)); // left/top inclusive
    assert!(r.contains(12.0, 6.0));
    assert!(!r.contains(14.0, 5.0)); // right edge exclusive
    assert!(!r.contains(10.0, 7.0)); // bottom edge exclusive
    assert!(!r.contains(9.9, 5.0));
}

#[test]
fn arrow_heading_follows_velocity() {
    // y grows downward, so a negative vy means the arrow is rising
    let rising = Arrow {
        rect: Rect::new(0.0, 0.0, 1.0, 1.0),
        vx: 1.0,
        vy: -1.0,
    };
    let falling = Arrow {
        rect: Rect::new(0.0, 0.0, 1.0, 1.0),
        vx: 1.0,
        vy: 1.0,
    };
    let level = Arrow {
        rect: Rect::new(0.0, 0.0, 1.0, 1.0),
        vx: 1.0,
        vy: 0.0,
    };
    assert!((rising.heading().to_degrees() - 45.0).abs() < 1e-4);
    assert!((falling.heading().to_degrees() + 45.0).abs() < 1e-4);
    assert!(level.heading().abs() < 1e-6);
}

#[test]
fn session_state_clone_is_independent() {
    let original = SessionState {
        player: Player {
            rect: Rect::new(1.0, 8.5, 3.0, 3.0),
        },
        arrows: Vec::new(),
        targets: Vec::new(),
        obstacles: Vec::new(),
        score: 0,
        status: SessionStatus::Running,
        frame: 0,
        prev_whole_second: 60,
        events: Vec::new(),
        width: 80,
        height: 24,
    };
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.rect.y = 0.0;
    cloned.score = 99;
    cloned.arrows.push(Arrow {
        rect: Rect::new(4.0, 9.5, 1.0, 1.0),
        vx: 1.0,
        vy: -0.5,
    });

    assert_eq!(original.player.rect.y, 8.5);
    assert_eq!(original.score, 0);
    assert!(original.arrows.is_empty());
}

#[test]
fn field_dims_exclude_chrome_rows() {
    let s = SessionState {
        player: Player {
            rect: Rect::new(1.0, 0.0, 3.0, 3.0),
        },
        arrows: Vec::new(),
        targets: Vec::new(),
        obstacles: Vec::new(),
        score: 0,
        status: SessionStatus::Running,
        frame: 0,
        prev_whole_second: 60,
        events: Vec::new(),
        width: 80,
        height: 24,
    };
    // two side walls, HUD row, two border bars and the hint row
    assert_eq!(s.field_w(), 78.0);
    assert_eq!(s.field_h(), 20.0);
}
