//! All playfield entity types: flat per-kind records plus the small
//! geometry capability they share. Behaviour lives in `compute`.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::config::{
    COORDINATE_LIMIT, DEADLY_STRUMMER_LIFE_POINTS, DEADLY_STRUMMER_POINTS, DEADLY_STRUMMER_SPEED,
    HUNTER_BANJO_POINTS, HUNTER_BANJO_SPEED, NOTE_SHOT_SPEED, PLAYER_SPEED,
    SIMPLE_BANJO_POINTS, SIMPLE_BANJO_SPEED, STARTING_LIVES,
};
use crate::error::{GameError, Result};
use crate::geometry::{Rect, Viewport};

// ── Geometry capability ───────────────────────────────────────────────────────

/// Anything positioned by a rectangle. `move_by` is a raw translation; bounds
/// are each concrete type's business in its own update.
pub trait Geometry {
    fn rect(&self) -> Rect;
    fn rect_mut(&mut self) -> &mut Rect;

    fn x(&self) -> i32 {
        self.rect().x
    }

    fn y(&self) -> i32 {
        self.rect().y
    }

    fn move_by(&mut self, dx: i32, dy: i32) {
        let rect = self.rect_mut();
        rect.x += dx;
        rect.y += dy;
    }
}

/// Range check used at construction. It is an OR, so almost every value
/// passes; the rectangle check below is what rejects negatives.
fn coordinate_in_range(value: i32, min: i32, max: i32) -> bool {
    value >= min || value <= max
}

fn within_limit(values: &[i32]) -> bool {
    values
        .iter()
        .all(|v| v.unsigned_abs() <= COORDINATE_LIMIT.unsigned_abs())
}

fn invalid(rect: Rect, problems: &[&str]) -> GameError {
    GameError::InvalidGeometry(format!(
        "({}, {}, {}, {}): {}",
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        problems.join(", ")
    ))
}

// ── Sprite / MovingSprite ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub rect: Rect,
}

impl Sprite {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self> {
        let mut problems = Vec::new();
        if !coordinate_in_range(x, 0, width) {
            problems.push("x coordinate out of range");
        }
        if !coordinate_in_range(y, 0, height) {
            problems.push("y coordinate out of range");
        }
        if x < 0 || y < 0 || width < 0 || height < 0 {
            problems.push("invalid rectangle measurements");
        }
        if !within_limit(&[x, y, width, height]) {
            problems.push("outside the coordinate limit");
        }
        let rect = Rect::new(x, y, width, height);
        if !problems.is_empty() {
            return Err(invalid(rect, &problems));
        }
        Ok(Self { rect })
    }

    /// Rebuild a sprite read back from save data. Entities caught mid-flight
    /// may sit partly off-screen, so the position may be negative; the size
    /// may not, and nothing may pass the coordinate limit.
    pub fn restored(rect: Rect) -> Result<Self> {
        let mut problems = Vec::new();
        if rect.width < 0 || rect.height < 0 {
            problems.push("invalid rectangle measurements");
        }
        if !within_limit(&[rect.x, rect.y, rect.width, rect.height]) {
            problems.push("outside the coordinate limit");
        }
        if !problems.is_empty() {
            return Err(invalid(rect, &problems));
        }
        Ok(Self { rect })
    }
}

impl Geometry for Sprite {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn rect_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovingSprite {
    pub sprite: Sprite,
    pub speed: i32,
}

impl MovingSprite {
    pub fn new(x: i32, y: i32, width: i32, height: i32, speed: i32) -> Result<Self> {
        Self::with_speed(Sprite::new(x, y, width, height)?, speed)
    }

    pub fn restored(rect: Rect, speed: i32) -> Result<Self> {
        Self::with_speed(Sprite::restored(rect)?, speed)
    }

    fn with_speed(sprite: Sprite, speed: i32) -> Result<Self> {
        if speed < 0 || speed > COORDINATE_LIMIT {
            return Err(GameError::InvalidGeometry(format!(
                "speed out of range: {speed}"
            )));
        }
        Ok(Self { sprite, speed })
    }
}

impl Geometry for MovingSprite {
    fn rect(&self) -> Rect {
        self.sprite.rect
    }

    fn rect_mut(&mut self) -> &mut Rect {
        &mut self.sprite.rect
    }
}

macro_rules! geometry_via_body {
    ($ty:ty) => {
        impl Geometry for $ty {
            fn rect(&self) -> Rect {
                self.body.rect()
            }

            fn rect_mut(&mut self) -> &mut Rect {
                self.body.rect_mut()
            }
        }
    };
}

// ── Background ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Background {
    pub body: Sprite,
}

impl Background {
    pub fn new(viewport: Viewport) -> Result<Self> {
        Ok(Self {
            body: Sprite::new(0, 0, viewport.width, viewport.height)?,
        })
    }
}

geometry_via_body!(Background);

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub body: MovingSprite,
    pub lives: u32,
    pub score: u32,
    /// Best score of this process; never saved, survives resets.
    pub high_score: u32,
}

impl Player {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self> {
        Ok(Self {
            body: MovingSprite::new(x, y, width, height, PLAYER_SPEED)?,
            lives: STARTING_LIVES,
            score: 0,
            high_score: 0,
        })
    }

    pub fn add_score(&mut self, amount: u32) -> u32 {
        self.score = self.score.saturating_add(amount);
        self.score
    }

    /// Takes one life and returns the count *before* the decrement.
    pub fn subtract_life(&mut self) -> u32 {
        let before = self.lives;
        self.lives = self.lives.saturating_sub(1);
        before
    }

    /// Returns true when the current score became the new high score.
    pub fn record_high_score_if_beaten(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    /// New round: full lives, zero score, parked at the bottom middle.
    pub fn reset(&mut self, viewport: Viewport) {
        self.lives = STARTING_LIVES;
        self.score = 0;
        let rect = self.rect_mut();
        rect.x = viewport.width / 2 - rect.width / 2;
        rect.y = viewport.height - rect.height;
    }
}

geometry_via_body!(Player);

// ── NoteShot ──────────────────────────────────────────────────────────────────

/// The player's projectile; travels straight up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteShot {
    pub body: MovingSprite,
}

impl NoteShot {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self> {
        Ok(Self {
            body: MovingSprite::new(x, y, width, height, NOTE_SHOT_SPEED)?,
        })
    }
}

geometry_via_body!(NoteShot);

// ── Enemy movement enums ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementState {
    LeftToRight,
    TouchedSide,
    TouchedBottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    pub const fn sign(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

impl fmt::Display for MovementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MovementState::LeftToRight => "LeftToRight",
            MovementState::TouchedSide => "TouchedSide",
            MovementState::TouchedBottom => "TouchedBottom",
        })
    }
}

impl FromStr for MovementState {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "LeftToRight" => Ok(MovementState::LeftToRight),
            "TouchedSide" => Ok(MovementState::TouchedSide),
            "TouchedBottom" => Ok(MovementState::TouchedBottom),
            other => Err(GameError::ParseError(format!(
                "unknown movement state {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Left => "Left",
            Direction::Right => "Right",
        })
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Left" => Ok(Direction::Left),
            "Right" => Ok(Direction::Right),
            other => Err(GameError::ParseError(format!("unknown direction {other:?}"))),
        }
    }
}

// ── Strum shot ────────────────────────────────────────────────────────────────

/// A Deadly Strummer's note in flight. The heading is fixed at the firing
/// instant and never retargets.
#[derive(Clone, Debug, PartialEq)]
pub struct StrumShot {
    pub rect: Rect,
    pub position: (f32, f32),
    pub heading: (f32, f32),
    pub speed: i32,
}

/// One shot per Deadly Strummer lifetime.
#[derive(Clone, Debug, PartialEq)]
pub enum Strum {
    Ready,
    InFlight(StrumShot),
    Spent,
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum EnemyKind {
    Simple,
    /// Bounces until `mode_switch_at_ms + HUNTER_BOUNCE_MS`, then homes in.
    Hunter { mode_switch_at_ms: i64 },
    Deadly { life_points: i32, strum: Strum },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: MovingSprite,
    /// Spawn row; the return bound after a touched-bottom excursion.
    pub origin_y: i32,
    pub movement: MovementState,
    pub direction: Direction,
    pub kind: EnemyKind,
}

/// Result of a projectile striking an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Destroyed { points: u32 },
    Wounded,
}

impl Enemy {
    fn with_kind(
        x: i32,
        y: i32,
        size: (i32, i32),
        speed: i32,
        direction: Direction,
        kind: EnemyKind,
    ) -> Result<Self> {
        Ok(Self {
            body: MovingSprite::new(x, y, size.0, size.1, speed)?,
            origin_y: y,
            movement: MovementState::LeftToRight,
            direction,
            kind,
        })
    }

    pub fn simple(x: i32, y: i32, size: (i32, i32), direction: Direction) -> Result<Self> {
        Self::with_kind(x, y, size, SIMPLE_BANJO_SPEED, direction, EnemyKind::Simple)
    }

    pub fn hunter(
        x: i32,
        y: i32,
        size: (i32, i32),
        direction: Direction,
        now_ms: i64,
    ) -> Result<Self> {
        Self::with_kind(
            x,
            y,
            size,
            HUNTER_BANJO_SPEED,
            direction,
            EnemyKind::Hunter {
                mode_switch_at_ms: now_ms,
            },
        )
    }

    /// Deadly Strummers never bounce, so their origin row is pinned to 0.
    pub fn deadly(x: i32, y: i32, size: (i32, i32), direction: Direction) -> Result<Self> {
        let mut enemy = Self::with_kind(
            x,
            y,
            size,
            DEADLY_STRUMMER_SPEED,
            direction,
            EnemyKind::Deadly {
                life_points: DEADLY_STRUMMER_LIFE_POINTS,
                strum: Strum::Ready,
            },
        )?;
        enemy.origin_y = 0;
        Ok(enemy)
    }

    pub const fn points(&self) -> u32 {
        match self.kind {
            EnemyKind::Simple => SIMPLE_BANJO_POINTS,
            EnemyKind::Hunter { .. } => HUNTER_BANJO_POINTS,
            EnemyKind::Deadly { .. } => DEADLY_STRUMMER_POINTS,
        }
    }

    /// Applies one projectile hit. Only a Deadly Strummer can survive one,
    /// and it pays out only on the hit that takes it to zero.
    pub fn take_hit(&mut self) -> Hit {
        let points = self.points();
        match &mut self.kind {
            EnemyKind::Deadly { life_points, .. } => {
                if *life_points > 0 {
                    *life_points -= 1;
                }
                if *life_points == 0 {
                    Hit::Destroyed { points }
                } else {
                    Hit::Wounded
                }
            }
            _ => Hit::Destroyed { points },
        }
    }

    pub fn strum_shot(&self) -> Option<&StrumShot> {
        match &self.kind {
            EnemyKind::Deadly {
                strum: Strum::InFlight(shot),
                ..
            } => Some(shot),
            _ => None,
        }
    }
}

geometry_via_body!(Enemy);

// ── Live entity ───────────────────────────────────────────────────────────────

/// Entities that come and go during a round. Background and player are
/// held separately by the arena.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Shot(NoteShot),
    Enemy(Enemy),
}

impl Geometry for Entity {
    fn rect(&self) -> Rect {
        match self {
            Entity::Shot(shot) => shot.rect(),
            Entity::Enemy(enemy) => enemy.rect(),
        }
    }

    fn rect_mut(&mut self) -> &mut Rect {
        match self {
            Entity::Shot(shot) => shot.rect_mut(),
            Entity::Enemy(enemy) => enemy.rect_mut(),
        }
    }
}
