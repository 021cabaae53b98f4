//! The playfield: owns every live entity and explosion, and runs spawning,
//! shooting cadence, collision resolution and scoring.

use rand::Rng;
use tracing::{debug, error, info};

use crate::compute::{demo_step, update_enemy, update_note_shot, update_player, Outcome};
use crate::config::{
    ATTRACT_SPEED, INITIAL_SPAWN_INTERVAL_MS, SHOOTING_THRESHOLD_MS, SPAWN_RAMP_PERIOD_MS,
    SPAWN_RAMP_STEP_MS,
};
use crate::entities::{Background, Direction, Enemy, Entity, Geometry, Hit, NoteShot, Player};
use crate::error::Result;
use crate::explosion::Explosion;
use crate::geometry::{FrameContext, SpriteSizes};
use crate::input::InputSnapshot;
use crate::sound::{Sound, SoundSink};

/// Enemy spawn interval after `elapsed_ms` of ramp time: 1000 ms, minus
/// 10 ms per full 5 s. There is no floor; a non-positive interval means a
/// spawn on every frame.
pub fn spawn_interval_ms(elapsed_ms: i64) -> i64 {
    INITIAL_SPAWN_INTERVAL_MS - SPAWN_RAMP_STEP_MS * (elapsed_ms.max(0) / SPAWN_RAMP_PERIOD_MS)
}

/// Which banjo a spawn roll in `1..=30` produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BanjoRoll {
    Simple,
    Hunter,
    Deadly,
}

impl BanjoRoll {
    pub fn from_roll(roll: u32) -> Self {
        match roll {
            0..=14 => BanjoRoll::Simple,
            15..=24 => BanjoRoll::Hunter,
            _ => BanjoRoll::Deadly,
        }
    }
}

fn roll_below(rng: &mut impl Rng, upper: i32) -> i32 {
    if upper > 0 {
        rng.gen_range(0..upper)
    } else {
        0
    }
}

#[derive(Clone, Debug)]
pub struct Arena {
    pub background: Background,
    pub player: Player,
    entities: Vec<Entity>,
    explosions: Vec<Explosion>,
    last_shot_ms: i64,
    last_spawn_ms: i64,
    ramp_started_ms: i64,
    demo_velocity: (i32, i32),
}

impl Arena {
    pub fn new(background: Background, player: Player) -> Self {
        Self {
            background,
            player,
            entities: Vec::new(),
            explosions: Vec::new(),
            last_shot_ms: 0,
            last_spawn_ms: 0,
            ramp_started_ms: 0,
            demo_velocity: (ATTRACT_SPEED, ATTRACT_SPEED),
        }
    }

    /// Fresh playfield: full-screen background, player in the middle.
    pub fn new_game(ctx: &FrameContext) -> Result<Self> {
        let viewport = ctx.viewport;
        let (width, height) = SpriteSizes::for_viewport(viewport).player;
        let background = Background::new(viewport)?;
        let player = Player::new(viewport.width / 2, viewport.height / 2, width, height)?;
        let mut arena = Self::new(background, player);
        arena.ramp_started_ms = ctx.now();
        Ok(arena)
    }

    /// Rebuild from loaded parts; timers restart at `now_ms`.
    pub fn restore(
        background: Background,
        player: Player,
        entities: Vec<Entity>,
        now_ms: i64,
    ) -> Self {
        let mut arena = Self::new(background, player);
        arena.entities = entities;
        arena.last_shot_ms = now_ms;
        arena.last_spawn_ms = now_ms;
        arena.ramp_started_ms = now_ms;
        arena
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    /// Entity count including the background and the player.
    pub fn entity_count(&self) -> usize {
        2 + self.entities.len()
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn add_explosion(&mut self, explosion: Explosion) {
        self.explosions.push(explosion);
    }

    pub fn current_spawn_interval_ms(&self, now_ms: i64) -> i64 {
        spawn_interval_ms(now_ms - self.ramp_started_ms)
    }

    // ── Shooting ─────────────────────────────────────────────────────────────

    fn shot_ready(&self, now_ms: i64) -> bool {
        now_ms >= self.last_shot_ms + SHOOTING_THRESHOLD_MS
    }

    fn fire_note(&mut self, ctx: &FrameContext) -> bool {
        let rect = self.player.rect();
        let (width, height) = SpriteSizes::for_viewport(ctx.viewport).note;
        match NoteShot::new(rect.x + rect.width / 4, rect.top(), width, height) {
            Ok(shot) => {
                debug!(x = shot.x(), y = shot.y(), "note fired");
                self.entities.push(Entity::Shot(shot));
                self.last_shot_ms = ctx.now();
                true
            }
            Err(err) => {
                error!(%err, "note shot rejected");
                false
            }
        }
    }

    /// Fire if the shoot intent is held and the cadence allows it.
    pub fn shoot(
        &mut self,
        input: &InputSnapshot,
        ctx: &FrameContext,
        sound: &mut impl SoundSink,
    ) -> bool {
        if !input.shoot || !self.shot_ready(ctx.now()) {
            return false;
        }
        let fired = self.fire_note(ctx);
        if fired {
            sound.play(Sound::Shot);
        }
        fired
    }

    /// Attract-mode demo: bounce the player and autofire, silently.
    pub fn attract_step(&mut self, ctx: &FrameContext) {
        demo_step(&mut self.player, &mut self.demo_velocity, ctx.viewport);
        if self.shot_ready(ctx.now()) {
            let _ = self.fire_note(ctx);
        }
    }

    // ── Spawning ─────────────────────────────────────────────────────────────

    pub fn spawn_enemies(
        &mut self,
        ctx: &FrameContext,
        rng: &mut impl Rng,
        sound: &mut impl SoundSink,
    ) -> bool {
        let now = ctx.now();
        if now < self.last_spawn_ms + self.current_spawn_interval_ms(now) {
            return false;
        }

        let viewport = ctx.viewport;
        let (banjo_width, _) = SpriteSizes::for_viewport(viewport).banjo;
        let x = roll_below(rng, viewport.width - banjo_width);
        let y = roll_below(rng, viewport.height / 4);
        self.last_spawn_ms = now;
        self.create_enemy(x, y, ctx, rng, sound)
    }

    /// Weighted draw over 1..=30: Simple 14, Hunter 10, Deadly 6.
    pub fn create_enemy(
        &mut self,
        x: i32,
        y: i32,
        ctx: &FrameContext,
        rng: &mut impl Rng,
        sound: &mut impl SoundSink,
    ) -> bool {
        let size = SpriteSizes::for_viewport(ctx.viewport).banjo;
        let direction = Direction::random(rng);
        let roll = BanjoRoll::from_roll(rng.gen_range(1..=30));
        let enemy = match roll {
            BanjoRoll::Simple => Enemy::simple(x, y, size, direction),
            BanjoRoll::Hunter => Enemy::hunter(x, y, size, direction, ctx.now()),
            BanjoRoll::Deadly => Enemy::deadly(x, y, size, direction),
        };
        sound.play(Sound::EnemySpawn);
        match enemy {
            Ok(enemy) => {
                debug!(?roll, x, y, ?direction, "enemy spawned");
                self.entities.push(Entity::Enemy(enemy));
                true
            }
            Err(err) => {
                error!(%err, ?roll, "enemy spawn rejected");
                false
            }
        }
    }

    // ── Per-frame ────────────────────────────────────────────────────────────

    /// Clear everything but the background and the player, then reset the
    /// survivors.
    pub fn reset(&mut self, ctx: &FrameContext) {
        self.entities.clear();
        self.player.reset(ctx.viewport);
        self.ramp_started_ms = ctx.now();
        self.demo_velocity = (ATTRACT_SPEED, ATTRACT_SPEED);
    }

    /// Collisions first, then every entity's own update, then explosions.
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        ctx: &FrameContext,
        sound: &mut impl SoundSink,
    ) -> Outcome {
        let mut outcome = self.resolve_collisions();

        update_player(&mut self.player, input, ctx.viewport);
        let player_rect = self.player.rect();
        for entity in &mut self.entities {
            match entity {
                Entity::Shot(shot) => update_note_shot(shot),
                Entity::Enemy(enemy) => {
                    outcome = outcome.or(update_enemy(enemy, player_rect, ctx, sound));
                }
            }
        }

        for explosion in &mut self.explosions {
            explosion.advance(ctx.time.elapsed_ms);
        }
        self.explosions.retain(Explosion::active);

        outcome
    }

    /// One collision pass. The scan only records what happens; removals
    /// are applied afterwards so no entity is skipped or seen twice.
    pub fn resolve_collisions(&mut self) -> Outcome {
        let player_rect = self.player.rect();
        let count = self.entities.len();
        let mut doomed = vec![false; count];
        let mut blasts = Vec::new();
        let mut award = 0u32;
        let mut outcome = Outcome::Continue;

        for i in 0..count {
            if doomed[i] {
                continue;
            }
            let rect = self.entities[i].rect();

            if matches!(self.entities[i], Entity::Shot(_)) {
                let mut destroyed = false;
                for j in 0..count {
                    if doomed[j] {
                        continue;
                    }
                    let Entity::Enemy(enemy) = &mut self.entities[j] else {
                        continue;
                    };
                    if !rect.intersects(&enemy.rect()) {
                        continue;
                    }
                    match enemy.take_hit() {
                        Hit::Destroyed { points } => {
                            debug!(points, "enemy destroyed");
                            award += points;
                            blasts.push(enemy.rect().center());
                            doomed[j] = true;
                            destroyed = true;
                            break;
                        }
                        Hit::Wounded => debug!("deadly strummer wounded"),
                    }
                }
                if destroyed || rect.bottom() < 0 {
                    doomed[i] = true;
                }
            } else if rect.intersects(&player_rect) {
                info!("enemy collided with player");
                doomed[i] = true;
                blasts.push(rect.center());
                outcome = Outcome::RoundOver;
                break;
            }
        }

        if award > 0 {
            self.player.add_score(award);
        }
        let mut flags = doomed.into_iter();
        self.entities.retain(|_| !flags.next().unwrap_or(false));
        self.explosions
            .extend(blasts.into_iter().map(Explosion::new));

        outcome
    }
}
