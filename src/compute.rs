//! Pure per-entity game logic.
//!
//! Every function mutates exactly the entity it is handed and reads the rest
//! of the world through plain values (player rectangle, viewport, clock).
//! Side effects are limited to the injected sound sink.

use crate::config::{DIAGONAL_FACTOR, HUNTER_BOUNCE_MS, STRUM_SHOT_SPEED};
use crate::entities::{
    Direction, Enemy, EnemyKind, Geometry, MovementState, NoteShot, Player, Strum, StrumShot,
};
use crate::geometry::{FrameContext, Rect, SpriteSizes, Viewport};
use crate::input::InputSnapshot;
use crate::sound::{Sound, SoundSink};

/// What an update means for the current round.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Something reached the player or the floor; the round is lost.
    RoundOver,
}

impl Outcome {
    pub fn is_round_over(self) -> bool {
        self == Outcome::RoundOver
    }

    pub fn or(self, other: Outcome) -> Outcome {
        if self.is_round_over() {
            self
        } else {
            other
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Resolve the four directional intents, then clamp every edge to the
/// viewport.
pub fn update_player(player: &mut Player, input: &InputSnapshot, viewport: Viewport) {
    let speed = player.body.speed;
    let damped = (DIAGONAL_FACTOR * speed as f32) as i32;
    let vertical_step = if input.horizontal() { damped } else { speed };
    let horizontal_step = if input.vertical() { damped } else { speed };

    let mut dx = 0;
    let mut dy = 0;
    if input.up {
        dy -= vertical_step;
    }
    if input.down {
        dy += vertical_step;
    }
    if input.left {
        dx -= horizontal_step;
    }
    if input.right {
        dx += horizontal_step;
    }

    player.move_by(dx, dy);
    clamp_to_viewport(player.rect_mut(), viewport);
}

pub fn clamp_to_viewport(rect: &mut Rect, viewport: Viewport) {
    if rect.top() <= 0 {
        rect.y = 0;
    }
    if rect.bottom() >= viewport.height {
        rect.y = viewport.height - rect.height;
    }
    if rect.left() <= 0 {
        rect.x = 0;
    }
    if rect.right() >= viewport.width {
        rect.x = viewport.width - rect.width;
    }
}

/// Attract-mode pilot: bounce around the lower half of the screen.
pub fn demo_step(player: &mut Player, velocity: &mut (i32, i32), viewport: Viewport) {
    player.move_by(velocity.0, velocity.1);
    let rect = player.rect();

    if rect.right() >= viewport.width {
        velocity.0 = -velocity.0.abs();
    }
    if rect.left() <= 0 {
        velocity.0 = velocity.0.abs();
    }
    if rect.bottom() >= viewport.height {
        velocity.1 = -velocity.1.abs();
    }
    if rect.top() <= viewport.height / 2 {
        velocity.1 = velocity.1.abs();
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

pub fn update_note_shot(shot: &mut NoteShot) {
    let speed = shot.body.speed;
    shot.move_by(0, -speed);
}

/// Unit vector from `from` toward `to`, or `None` when they coincide.
pub fn heading(from: (f32, f32), to: (f32, f32)) -> Option<(f32, f32)> {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 || !length.is_finite() {
        return None;
    }
    Some((dx / length, dy / length))
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// One step of the bounce machine shared by Simple and Hunter banjos.
pub fn move_left_to_right(enemy: &mut Enemy, viewport: Viewport) -> Outcome {
    let speed = enemy.body.speed;
    match enemy.movement {
        MovementState::LeftToRight => {
            enemy.move_by(enemy.direction.sign() * speed, 0);
            let rect = enemy.rect();
            if rect.right() >= viewport.width {
                enemy.direction = Direction::Left;
                enemy.movement = MovementState::TouchedSide;
            }
            if rect.left() <= 0 {
                enemy.direction = Direction::Right;
                enemy.movement = MovementState::TouchedSide;
            }
            Outcome::Continue
        }
        MovementState::TouchedSide => {
            enemy.move_by(0, speed);
            if enemy.rect().bottom() >= viewport.height {
                enemy.movement = MovementState::TouchedBottom;
                return Outcome::RoundOver;
            }
            Outcome::Continue
        }
        MovementState::TouchedBottom => {
            enemy.move_by(0, -speed);
            if enemy.rect().top() <= enemy.origin_y {
                enemy.movement = MovementState::LeftToRight;
            }
            Outcome::Continue
        }
    }
}

/// Step `speed` pixels straight at the target's top-left corner. A body
/// already sitting on the target stays put.
pub fn move_to_player<G: Geometry>(body: &mut G, speed: i32, target: Rect) {
    let rect = body.rect_mut();
    let from = (rect.x as f32, rect.y as f32);
    let Some(dir) = heading(from, (target.x as f32, target.y as f32)) else {
        return;
    };
    rect.x = (from.0 + dir.0 * speed as f32) as i32;
    rect.y = (from.1 + dir.1 * speed as f32) as i32;
}

/// Fire the Deadly Strummer's single note, or fly the one already out.
pub fn strum_fire(
    enemy: &mut Enemy,
    player: Rect,
    ctx: &FrameContext,
    sound: &mut impl SoundSink,
) -> Outcome {
    let body = enemy.rect();
    let EnemyKind::Deadly { strum, .. } = &mut enemy.kind else {
        return Outcome::Continue;
    };

    let (next, outcome) = match strum {
        Strum::Ready => {
            let (width, height) = SpriteSizes::for_viewport(ctx.viewport).note;
            let x = body.x + body.width / 2;
            let y = body.bottom();
            let position = (x as f32, (y + height) as f32);
            let heading =
                heading(position, (player.x as f32, player.y as f32)).unwrap_or((0.0, 0.0));
            sound.play(Sound::Shot);
            tracing::debug!(x, y, "deadly strummer fired");
            let shot = StrumShot {
                rect: Rect::new(x, y, width, height),
                position,
                heading,
                speed: STRUM_SHOT_SPEED,
            };
            (Some(Strum::InFlight(shot)), Outcome::Continue)
        }
        Strum::InFlight(shot) => {
            let step = shot.speed as f32;
            shot.position.0 += shot.heading.0 * step;
            shot.position.1 += shot.heading.1 * step;
            shot.rect.x = shot.position.0 as i32;
            shot.rect.y = shot.position.1 as i32;

            if shot.rect.intersects(&player) {
                (Some(Strum::Spent), Outcome::RoundOver)
            } else if shot.rect.top() >= ctx.viewport.height {
                (Some(Strum::Spent), Outcome::Continue)
            } else {
                (None, Outcome::Continue)
            }
        }
        Strum::Spent => (None, Outcome::Continue),
    };
    if let Some(next) = next {
        *strum = next;
    }
    outcome
}

/// Per-kind enemy behaviour.
pub fn update_enemy(
    enemy: &mut Enemy,
    player: Rect,
    ctx: &FrameContext,
    sound: &mut impl SoundSink,
) -> Outcome {
    match enemy.kind {
        EnemyKind::Simple => move_left_to_right(enemy, ctx.viewport),
        EnemyKind::Hunter { mode_switch_at_ms } => {
            // One-way: the timestamp is never moved after spawn.
            if mode_switch_at_ms + HUNTER_BOUNCE_MS >= ctx.now() {
                move_left_to_right(enemy, ctx.viewport)
            } else {
                let speed = enemy.body.speed;
                move_to_player(enemy, speed, player);
                Outcome::Continue
            }
        }
        EnemyKind::Deadly { .. } => {
            let speed = enemy.body.speed;
            move_to_player(enemy, speed, player);
            strum_fire(enemy, player, ctx, sound)
        }
    }
}
