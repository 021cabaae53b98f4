//! Gameplay tuning and host runtime settings.

use std::{env, path::PathBuf};

// ── Speeds (pixels per frame) ────────────────────────────────────────────────

pub const PLAYER_SPEED: i32 = 12;
pub const NOTE_SHOT_SPEED: i32 = 20;
pub const SIMPLE_BANJO_SPEED: i32 = 4;
pub const HUNTER_BANJO_SPEED: i32 = 5;
pub const DEADLY_STRUMMER_SPEED: i32 = 7;
pub const STRUM_SHOT_SPEED: i32 = 10;

/// Per-axis speed factor when two perpendicular directions are held.
pub const DIAGONAL_FACTOR: f32 = 0.7;

// ── Scoring & lives ──────────────────────────────────────────────────────────

pub const SIMPLE_BANJO_POINTS: u32 = 10;
pub const HUNTER_BANJO_POINTS: u32 = 20;
pub const DEADLY_STRUMMER_POINTS: u32 = 50;
pub const DEADLY_STRUMMER_LIFE_POINTS: i32 = 2;
pub const STARTING_LIVES: u32 = 3;

// ── Timing (milliseconds of game time) ───────────────────────────────────────

/// Minimum gap between two player shots.
pub const SHOOTING_THRESHOLD_MS: i64 = 80;
pub const INITIAL_SPAWN_INTERVAL_MS: i64 = 1000;
pub const SPAWN_RAMP_STEP_MS: i64 = 10;
pub const SPAWN_RAMP_PERIOD_MS: i64 = 5000;
/// How long a Hunter bounces before it starts homing in.
pub const HUNTER_BOUNCE_MS: i64 = 2500;
pub const EXPLOSION_SWITCH_FRAME_MS: i64 = 50;
pub const EXPLOSION_LIFETIME_MS: i64 = 850;
/// Explosion sprite sheet is 5 columns by 4 rows.
pub const EXPLOSION_GRID: (u32, u32) = (5, 4);

// ── Geometry limits ──────────────────────────────────────────────────────────

/// Largest magnitude a coordinate, dimension or speed may have. Keeps edge
/// sums and per-frame movement far from `i32` overflow.
pub const COORDINATE_LIMIT: i32 = 1 << 20;

// ── Session pacing (frames) ──────────────────────────────────────────────────

pub const LIFE_LOST_PAUSE_FRAMES: u32 = 60;
pub const GAME_OVER_PAUSE_FRAMES: u32 = 300;

/// Attract-mode demo pilot speed on each axis.
pub const ATTRACT_SPEED: i32 = 7;

// ── Host runtime settings ────────────────────────────────────────────────────

pub fn save_path() -> PathBuf {
    env::var("BANJO_SAVE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("banjo_attack_save.txt"))
}

/// Logging is off unless a log file is named; the terminal is in raw mode.
pub fn log_file() -> Option<PathBuf> {
    env::var("BANJO_LOG_FILE").ok().map(PathBuf::from)
}

pub fn rng_seed() -> Option<u64> {
    env::var("BANJO_SEED").ok().and_then(|v| v.parse().ok())
}
