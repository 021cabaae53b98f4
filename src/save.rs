//! Single-slot save game: a flat, ordered, one-token-per-line text stream.
//!
//! ```text
//! <entity count>
//! <tag>
//! <fields...>
//! ```
//!
//! Every rectangle is `x, y, width, height`; moving entities append their
//! speed. Tags form a closed set, anything else is rejected.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::{info, warn};

use crate::arena::Arena;
use crate::config::DEADLY_STRUMMER_LIFE_POINTS;
use crate::entities::{
    Background, Direction, Enemy, EnemyKind, Entity, Geometry, MovementState, MovingSprite,
    NoteShot, Player, Sprite, Strum,
};
use crate::error::{GameError, Result};
use crate::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityTag {
    Background,
    Player,
    NoteShot,
    SimpleBanjo,
    HunterBanjo,
    DeadlyStrummer,
}

impl EntityTag {
    pub fn of(entity: &Entity) -> Self {
        match entity {
            Entity::Shot(_) => EntityTag::NoteShot,
            Entity::Enemy(enemy) => match enemy.kind {
                EnemyKind::Simple => EntityTag::SimpleBanjo,
                EnemyKind::Hunter { .. } => EntityTag::HunterBanjo,
                EnemyKind::Deadly { .. } => EntityTag::DeadlyStrummer,
            },
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityTag::Background => "Background",
            EntityTag::Player => "Player",
            EntityTag::NoteShot => "NoteShot",
            EntityTag::SimpleBanjo => "SimpleBanjo",
            EntityTag::HunterBanjo => "HunterBanjo",
            EntityTag::DeadlyStrummer => "DeadlyStrummer",
        })
    }
}

impl FromStr for EntityTag {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Background" => Ok(EntityTag::Background),
            "Player" => Ok(EntityTag::Player),
            "NoteShot" => Ok(EntityTag::NoteShot),
            "SimpleBanjo" => Ok(EntityTag::SimpleBanjo),
            "HunterBanjo" => Ok(EntityTag::HunterBanjo),
            "DeadlyStrummer" => Ok(EntityTag::DeadlyStrummer),
            other => Err(GameError::ParseError(format!("unknown entity type {other:?}"))),
        }
    }
}

// ── Duration text ─────────────────────────────────────────────────────────────

/// `hh:mm:ss.fff`; negative spans are written as zero.
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = ms / 60_000 % 60;
    let seconds = ms / 1000 % 60;
    let millis = ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Inverse of [`format_duration`]. Accepts any number of fraction digits;
/// precision past the millisecond is dropped.
pub fn parse_duration(text: &str) -> Result<i64> {
    let bad = || GameError::ParseError(format!("malformed duration {text:?}"));
    let mut parts = text.trim().split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(bad());
    };
    let hours: i64 = h.parse().map_err(|_| bad())?;
    let minutes: i64 = m.parse().map_err(|_| bad())?;
    let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
    let seconds: i64 = whole.parse().map_err(|_| bad())?;
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad());
    }
    let millis: i64 = format!("{fraction:0<3}")[..3].parse().map_err(|_| bad())?;
    if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return Err(bad());
    }
    hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add((minutes * 60 + seconds) * 1000 + millis))
        .ok_or_else(bad)
}

// ── Writing ───────────────────────────────────────────────────────────────────

fn write_rect<W: Write>(out: &mut W, rect: Rect) -> io::Result<()> {
    writeln!(out, "{}", rect.x)?;
    writeln!(out, "{}", rect.y)?;
    writeln!(out, "{}", rect.width)?;
    writeln!(out, "{}", rect.height)
}

fn write_moving<W: Write>(out: &mut W, body: &MovingSprite) -> io::Result<()> {
    write_rect(out, body.rect())?;
    writeln!(out, "{}", body.speed)
}

fn write_enemy<W: Write>(out: &mut W, enemy: &Enemy, now_ms: i64) -> io::Result<()> {
    write_moving(out, &enemy.body)?;
    writeln!(out, "{}", enemy.origin_y)?;
    writeln!(out, "{}", enemy.movement)?;
    writeln!(out, "{}", enemy.direction)?;
    match &enemy.kind {
        EnemyKind::Simple => Ok(()),
        EnemyKind::Hunter { mode_switch_at_ms } => {
            writeln!(out, "{}", format_duration(now_ms.saturating_sub(*mode_switch_at_ms)))
        }
        EnemyKind::Deadly { life_points, .. } => writeln!(out, "{life_points}"),
    }
}

/// Serialise the whole arena in list order. `now_ms` anchors the Hunter
/// mode-switch clocks.
pub fn write_arena<W: Write>(arena: &Arena, out: &mut W, now_ms: i64) -> Result<()> {
    writeln!(out, "{}", arena.entity_count())?;

    writeln!(out, "{}", EntityTag::Background)?;
    write_rect(out, arena.background.rect())?;

    writeln!(out, "{}", EntityTag::Player)?;
    write_moving(out, &arena.player.body)?;
    writeln!(out, "{}", arena.player.lives)?;
    writeln!(out, "{}", arena.player.score)?;

    for entity in arena.entities() {
        writeln!(out, "{}", EntityTag::of(entity))?;
        match entity {
            Entity::Shot(shot) => write_moving(out, &shot.body)?,
            Entity::Enemy(enemy) => write_enemy(out, enemy, now_ms)?,
        }
    }
    Ok(())
}

// ── Reading ───────────────────────────────────────────────────────────────────

struct LineReader<R> {
    lines: io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(input: R) -> Self {
        Self {
            lines: input.lines(),
            line_no: 0,
        }
    }

    fn next_line(&mut self) -> Result<String> {
        self.line_no += 1;
        match self.lines.next() {
            Some(line) => Ok(line?.trim().to_string()),
            None => Err(GameError::ParseError(format!(
                "save data truncated at line {}",
                self.line_no
            ))),
        }
    }

    fn next_int<T: FromStr>(&mut self) -> Result<T> {
        let line = self.next_line()?;
        line.parse().map_err(|_| {
            GameError::ParseError(format!("line {}: {line:?} is not an integer", self.line_no))
        })
    }

    fn next_rect(&mut self) -> Result<Rect> {
        Ok(Rect::new(
            self.next_int()?,
            self.next_int()?,
            self.next_int()?,
            self.next_int()?,
        ))
    }

    fn next_moving(&mut self) -> Result<MovingSprite> {
        let rect = self.next_rect()?;
        let speed = self.next_int()?;
        MovingSprite::restored(rect, speed).map_err(|err| self.rejected(err))
    }

    fn rejected(&self, err: GameError) -> GameError {
        GameError::ParseError(format!("line {}: {err}", self.line_no))
    }

    fn next_enemy(&mut self, tag: EntityTag, now_ms: i64) -> Result<Enemy> {
        let body = self.next_moving()?;
        let origin_y = self.next_int()?;
        let movement: MovementState = self.next_line()?.parse()?;
        let direction: Direction = self.next_line()?.parse()?;
        let kind = match tag {
            EntityTag::HunterBanjo => {
                let elapsed = parse_duration(&self.next_line()?)?;
                let mode_switch_at_ms = now_ms.checked_sub(elapsed).ok_or_else(|| {
                    GameError::ParseError(format!(
                        "line {}: hunter duration out of range",
                        self.line_no
                    ))
                })?;
                EnemyKind::Hunter { mode_switch_at_ms }
            }
            EntityTag::DeadlyStrummer => {
                let life_points: i32 = self.next_int()?;
                if !(1..=DEADLY_STRUMMER_LIFE_POINTS).contains(&life_points) {
                    return Err(GameError::ParseError(format!(
                        "line {}: {life_points} life points left is impossible",
                        self.line_no
                    )));
                }
                EnemyKind::Deadly {
                    life_points,
                    strum: Strum::Ready,
                }
            }
            _ => EnemyKind::Simple,
        };
        Ok(Enemy {
            body,
            origin_y,
            movement,
            direction,
            kind,
        })
    }

    fn expect_tag(&mut self, expected: EntityTag) -> Result<()> {
        let tag: EntityTag = self.next_line()?.parse()?;
        if tag != expected {
            return Err(GameError::ParseError(format!(
                "line {}: expected {expected}, found {tag}",
                self.line_no
            )));
        }
        Ok(())
    }
}

/// Rebuild an arena from save data. Nothing is returned unless the whole
/// stream parses.
pub fn read_arena<R: BufRead>(input: R, now_ms: i64) -> Result<Arena> {
    let mut reader = LineReader::new(input);
    let count: usize = reader.next_int()?;
    if count < 2 {
        return Err(GameError::ParseError(format!(
            "save holds {count} entities, background and player are required"
        )));
    }

    reader.expect_tag(EntityTag::Background)?;
    let rect = reader.next_rect()?;
    let background = Background {
        body: Sprite::restored(rect).map_err(|err| reader.rejected(err))?,
    };

    reader.expect_tag(EntityTag::Player)?;
    let body = reader.next_moving()?;
    let lives = reader.next_int()?;
    let score = reader.next_int()?;
    let player = Player {
        body,
        lives,
        score,
        high_score: 0,
    };

    let mut entities = Vec::with_capacity((count - 2).min(256));
    for _ in 2..count {
        let tag: EntityTag = reader.next_line()?.parse()?;
        let entity = match tag {
            EntityTag::NoteShot => Entity::Shot(NoteShot {
                body: reader.next_moving()?,
            }),
            EntityTag::SimpleBanjo | EntityTag::HunterBanjo | EntityTag::DeadlyStrummer => {
                Entity::Enemy(reader.next_enemy(tag, now_ms)?)
            }
            EntityTag::Background | EntityTag::Player => {
                return Err(GameError::ParseError(format!(
                    "line {}: {tag} may only appear once, at the start",
                    reader.line_no
                )));
            }
        };
        entities.push(entity);
    }

    Ok(Arena::restore(background, player, entities, now_ms))
}

// ── Save slot ─────────────────────────────────────────────────────────────────

/// Write the arena to `path`. The file is replaced only once the new
/// contents are fully on disk.
pub fn save_to_path(arena: &Arena, path: &Path, now_ms: i64) -> Result<()> {
    let staging = path.with_extension("tmp");
    let written = (|| -> Result<()> {
        let mut out = BufWriter::new(File::create(&staging)?);
        write_arena(arena, &mut out, now_ms)?;
        out.flush()?;
        Ok(())
    })();

    if let Err(err) = written {
        let _ = fs::remove_file(&staging);
        warn!(path = %path.display(), %err, "save failed");
        return Err(err);
    }
    fs::rename(&staging, path)?;
    info!(path = %path.display(), entities = arena.entity_count(), "game saved");
    Ok(())
}

pub fn load_from_path(path: &Path, now_ms: i64) -> Result<Arena> {
    let file = File::open(path)?;
    let arena = read_arena(BufReader::new(file), now_ms)?;
    info!(path = %path.display(), entities = arena.entity_count(), "game loaded");
    Ok(arena)
}
