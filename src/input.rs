//! Logical input intents. The host polls its keyboard once per frame and
//! hands the core one of these; key codes never reach the core.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    pub pause: bool,
    pub save: bool,
    pub quit: bool,
    /// Any key at all is held, including ones with no mapped intent.
    pub any_key: bool,
}

impl InputSnapshot {
    pub const fn horizontal(&self) -> bool {
        self.left || self.right
    }

    pub const fn vertical(&self) -> bool {
        self.up || self.down
    }

    /// True on the frame a toggle-style key is let go.
    pub fn pause_released(&self, previous: &InputSnapshot) -> bool {
        previous.pause && !self.pause
    }

    pub fn save_released(&self, previous: &InputSnapshot) -> bool {
        previous.save && !self.save
    }
}
