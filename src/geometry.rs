//! Rectangles, viewport and per-frame timing shared by every module.

/// Axis-aligned rectangle in viewport pixels. Sole authority for both
/// placement and collision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Strict overlap: rectangles that merely share an edge do not intersect.
    pub const fn intersects(&self, other: &Rect) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Snapshot of the host's game clock for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameTime {
    /// Milliseconds since the clock started.
    pub total_ms: i64,
    /// Milliseconds since the previous frame.
    pub elapsed_ms: i64,
}

impl GameTime {
    pub const fn new(total_ms: i64, elapsed_ms: i64) -> Self {
        Self { total_ms, elapsed_ms }
    }
}

/// Everything the core needs to know about the outside world for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameContext {
    pub time: GameTime,
    pub viewport: Viewport,
}

impl FrameContext {
    pub const fn new(time: GameTime, viewport: Viewport) -> Self {
        Self { time, viewport }
    }

    pub const fn now(&self) -> i64 {
        self.time.total_ms
    }
}

/// Sprite cell dimensions derived from the viewport. The core never scales
/// sizes itself; spawn sites read them from here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteSizes {
    pub player: (i32, i32),
    pub banjo: (i32, i32),
    pub note: (i32, i32),
}

impl SpriteSizes {
    pub const fn for_viewport(viewport: Viewport) -> Self {
        let w = viewport.width;
        let h = viewport.height;
        Self {
            player: ((w / 12) / 2, (h / 12 + 10) / 2),
            banjo: ((w / 20) / 2, (h / 5 + 15) / 2),
            note: ((w / 30) / 2, (h / 30) / 2),
        }
    }
}
