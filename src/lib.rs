//! Gameplay core of Banjo Attack: entities, per-frame simulation, collision
//! and scoring, the four-state session machine, and save/restore.
//!
//! Everything here is pure with respect to the outside world: time, input,
//! randomness and sound are all handed in by the host.

pub mod arena;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod explosion;
pub mod geometry;
pub mod input;
pub mod save;
pub mod session;
pub mod sound;

pub use error::{GameError, Result};
