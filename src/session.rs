//! The four-state session machine that decides which arena operations run
//! on each frame.

use std::io;
use std::path::Path;

use rand::Rng;
use tracing::{info, warn};

use crate::arena::Arena;
use crate::config::{GAME_OVER_PAUSE_FRAMES, LIFE_LOST_PAUSE_FRAMES};
use crate::error::{GameError, Result};
use crate::geometry::FrameContext;
use crate::input::InputSnapshot;
use crate::save;
use crate::sound::{Sound, SoundSink};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Attract,
    Playing,
    Paused,
    GameOver,
}

/// What the host should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    Continue,
    /// Persist the arena; exit only if that worked.
    SaveAndQuit,
    /// Exit without saving.
    Quit,
}

#[derive(Clone, Debug)]
pub struct Session {
    state: GameState,
    arena: Arena,
    pause_counter: u32,
    death_sound_played: bool,
    new_record: bool,
    previous_input: InputSnapshot,
}

impl Session {
    pub fn new(ctx: &FrameContext) -> Result<Self> {
        Ok(Self::with_arena(Arena::new_game(ctx)?, GameState::Attract))
    }

    pub fn with_arena(arena: Arena, state: GameState) -> Self {
        Self {
            state,
            arena,
            pause_counter: 0,
            death_sound_played: false,
            new_record: false,
            previous_input: InputSnapshot::default(),
        }
    }

    /// Resume the saved game paused if the slot loads, otherwise start fresh
    /// in attract mode.
    pub fn restore_or_new(path: &Path, ctx: &FrameContext) -> Result<Self> {
        match save::load_from_path(path, ctx.now()) {
            Ok(arena) => Ok(Self::with_arena(arena, GameState::Paused)),
            Err(GameError::IoFailure(err)) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no saved game, starting fresh");
                Self::new(ctx)
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "saved game unusable, starting fresh");
                Self::new(ctx)
            }
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// The game that just ended beat the previous high score.
    pub fn new_record(&self) -> bool {
        self.new_record
    }

    /// Another life follows this game-over pause.
    pub fn lives_remain(&self) -> bool {
        self.arena.player.lives > 1
    }

    pub fn save(&self, path: &Path, now_ms: i64) -> Result<()> {
        save::save_to_path(&self.arena, path, now_ms)
    }

    /// Advance one frame.
    pub fn tick(
        &mut self,
        input: &InputSnapshot,
        ctx: &FrameContext,
        rng: &mut impl Rng,
        sound: &mut impl SoundSink,
    ) -> Directive {
        if input.quit {
            info!("quit requested");
            return Directive::Quit;
        }

        let directive = match self.state {
            GameState::Attract => {
                self.attract(input, ctx, sound);
                Directive::Continue
            }
            GameState::Playing => self.play(input, ctx, rng, sound),
            GameState::Paused => {
                if input.pause_released(&self.previous_input) {
                    info!("resumed");
                    self.state = GameState::Playing;
                    sound.play(Sound::MusicResume);
                }
                Directive::Continue
            }
            GameState::GameOver => {
                self.game_over(sound);
                Directive::Continue
            }
        };

        self.previous_input = *input;
        directive
    }

    fn attract(&mut self, input: &InputSnapshot, ctx: &FrameContext, sound: &mut impl SoundSink) {
        self.arena.attract_step(ctx);
        // The demo cannot lose.
        let _ = self.arena.update(input, ctx, sound);

        if input.any_key {
            info!("new game");
            self.arena.reset(ctx);
            self.pause_counter = 0;
            self.death_sound_played = false;
            self.new_record = false;
            self.state = GameState::Playing;
        }
    }

    fn play(
        &mut self,
        input: &InputSnapshot,
        ctx: &FrameContext,
        rng: &mut impl Rng,
        sound: &mut impl SoundSink,
    ) -> Directive {
        let _ = self.arena.shoot(input, ctx, sound);
        let _ = self.arena.spawn_enemies(ctx, rng, sound);

        if self.arena.update(input, ctx, sound).is_round_over() {
            self.enter_game_over();
            return Directive::Continue;
        }

        if input.pause_released(&self.previous_input) {
            info!("paused");
            self.state = GameState::Paused;
            sound.play(Sound::MusicPause);
        }
        if input.save_released(&self.previous_input) {
            return Directive::SaveAndQuit;
        }
        Directive::Continue
    }

    fn enter_game_over(&mut self) {
        let player = &mut self.arena.player;
        info!(lives = player.lives, score = player.score, "round lost");
        self.state = GameState::GameOver;
        self.pause_counter = 0;
        if player.lives <= 1 {
            self.new_record = player.record_high_score_if_beaten();
            if self.new_record {
                info!(high_score = player.high_score, "new high score");
            }
        }
    }

    fn game_over(&mut self, sound: &mut impl SoundSink) {
        if !self.death_sound_played {
            sound.play(Sound::MusicPause);
            sound.play(Sound::Death);
            self.death_sound_played = true;
        }

        self.pause_counter += 1;
        if self.lives_remain() {
            if self.pause_counter >= LIFE_LOST_PAUSE_FRAMES {
                let before = self.arena.player.subtract_life();
                info!(lives = before - 1, "back to play");
                self.pause_counter = 0;
                self.death_sound_played = false;
                self.state = GameState::Playing;
                sound.play(Sound::MusicResume);
            }
        } else if self.pause_counter >= GAME_OVER_PAUSE_FRAMES {
            info!(score = self.arena.player.score, "game over");
            self.pause_counter = 0;
            self.state = GameState::Attract;
            sound.play(Sound::MusicPlay);
        }
    }
}
