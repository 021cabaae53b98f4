//! Short-lived sprite-sheet explosion, advanced by elapsed game time.

use crate::config::{EXPLOSION_GRID, EXPLOSION_LIFETIME_MS, EXPLOSION_SWITCH_FRAME_MS};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explosion {
    /// Centre of the destroyed sprite.
    pub position: (i32, i32),
    /// Sheet layout as (columns, rows).
    pub grid: (u32, u32),
    /// Current cell as (column, row).
    pub frame: (u32, u32),
    pub switch_frame_ms: i64,
    frame_counter_ms: i64,
    lifetime_ms: i64,
    active: bool,
}

impl Explosion {
    pub fn new(position: (i32, i32)) -> Self {
        Self::with_grid(position, EXPLOSION_GRID)
    }

    pub fn with_grid(position: (i32, i32), grid: (u32, u32)) -> Self {
        Self {
            position,
            grid: (grid.0.max(1), grid.1.max(1)),
            frame: (0, 0),
            switch_frame_ms: EXPLOSION_SWITCH_FRAME_MS,
            frame_counter_ms: 0,
            lifetime_ms: 0,
            active: true,
        }
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn lifetime_ms(&self) -> i64 {
        self.lifetime_ms
    }

    pub fn advance(&mut self, elapsed_ms: i64) {
        if !self.active {
            self.frame_counter_ms = 0;
            return;
        }

        self.frame_counter_ms += elapsed_ms;
        self.lifetime_ms += elapsed_ms;

        if self.frame_counter_ms >= self.switch_frame_ms {
            self.frame_counter_ms = 0;
            self.frame.0 += 1;
            if self.frame.0 >= self.grid.0 {
                self.frame.0 = 0;
                self.frame.1 = (self.frame.1 + 1) % self.grid.1;
            }
        }

        if self.lifetime_ms >= EXPLOSION_LIFETIME_MS {
            self.active = false;
        }
    }

    /// Cell to draw this frame, or nothing once burnt out.
    pub fn visible_frame(&self) -> Option<(u32, u32)> {
        self.active.then_some(self.frame)
    }
}
