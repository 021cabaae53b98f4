//! Rendering layer: all terminal output lives here.
//!
//! The core works in viewport pixels; each terminal cell stands for a
//! CELL_W × CELL_H block of them. Nothing here mutates the session.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use banjo_attack::entities::{EnemyKind, Entity, Geometry};
use banjo_attack::geometry::{Rect, Viewport};
use banjo_attack::session::{GameState, Session};

pub const CELL_W: i32 = 8;
pub const CELL_H: i32 = 16;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_SIMPLE: Color = Color::Green;
const C_HUNTER: Color = Color::Magenta;
const C_DEADLY: Color = Color::Red;
const C_NOTE: Color = Color::Cyan;
const C_STRUM: Color = Color::Red;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_TEXT: Color = Color::White;

/// The playfield fills every row but the last, which holds the HUD.
pub fn viewport_for(cols: u16, rows: u16) -> Viewport {
    Viewport::new(
        cols as i32 * CELL_W,
        rows.saturating_sub(1) as i32 * CELL_H,
    )
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    session: &Session,
    cols: u16,
    rows: u16,
    bell: bool,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let arena = session.arena();
    for entity in arena.entities() {
        match entity {
            Entity::Shot(shot) => fill(out, shot.rect(), "♪", C_NOTE, cols, rows)?,
            Entity::Enemy(enemy) => {
                let (glyph, color) = match enemy.kind {
                    EnemyKind::Simple => ("b", C_SIMPLE),
                    EnemyKind::Hunter { .. } => ("h", C_HUNTER),
                    EnemyKind::Deadly { .. } => ("D", C_DEADLY),
                };
                fill(out, enemy.rect(), glyph, color, cols, rows)?;
                if let Some(shot) = enemy.strum_shot() {
                    fill(out, shot.rect, "•", C_STRUM, cols, rows)?;
                }
            }
        }
    }
    fill(out, arena.player.rect(), "#", C_PLAYER, cols, rows)?;

    for explosion in arena.explosions() {
        if let Some((col, _)) = explosion.visible_frame() {
            let glyph = ["*", "✶", "✷", "+", "·"][col as usize % 5];
            let (x, y) = explosion.position;
            fill(out, Rect::new(x, y, 1, 1), glyph, C_EXPLOSION, cols, rows)?;
        }
    }

    draw_hud(out, session, rows)?;
    draw_overlay(out, session, cols, rows)?;

    if bell {
        out.queue(Print("\x07"))?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Sprites ───────────────────────────────────────────────────────────────────

fn fill<W: Write>(
    out: &mut W,
    rect: Rect,
    glyph: &str,
    color: Color,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let play_rows = rows.saturating_sub(1) as i32;
    let left = rect.x.div_euclid(CELL_W);
    let top = rect.y.div_euclid(CELL_H);
    let width = (rect.width / CELL_W).max(1);
    let height = (rect.height / CELL_H).max(1);

    out.queue(style::SetForegroundColor(color))?;
    for row in top..top + height {
        if row < 0 || row >= play_rows {
            continue;
        }
        for col in left..left + width {
            if col < 0 || col >= cols as i32 {
                continue;
            }
            out.queue(cursor::MoveTo(col as u16, row as u16))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

// ── HUD (last row) ────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, session: &Session, rows: u16) -> std::io::Result<()> {
    let player = &session.arena().player;
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Score: {}  Lives: {}  Best: {}",
        player.score, player.lives, player.high_score
    )))?;
    Ok(())
}

// ── State overlays ────────────────────────────────────────────────────────────

fn draw_overlay<W: Write>(
    out: &mut W,
    session: &Session,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let player = &session.arena().player;
    let final_score = format!("Your final score is: {}", player.score);
    let high_score = format!("Current highscore is: {}", player.high_score);

    let lines: Vec<&str> = match session.state() {
        GameState::Attract => vec![
            "Press arrow keys or WASD keys to move",
            "Press the spacebar to shoot",
            "Press P to pause, G to save and quit the game",
            "Press Esc to quit the game without saving",
            "",
            high_score.as_str(),
            "Press any key to start the game",
        ],
        GameState::Playing => Vec::new(),
        GameState::Paused => vec!["Game paused. Press P to resume"],
        GameState::GameOver if session.lives_remain() => vec!["You have lost a life!"],
        GameState::GameOver if session.new_record() => vec![
            "Game Over",
            final_score.as_str(),
            "You have set a new record!",
            "The game will restart in 5 seconds",
        ],
        GameState::GameOver => vec![
            "Game Over",
            final_score.as_str(),
            "The game will restart in 5 seconds",
        ],
    };

    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);
    out.queue(style::SetForegroundColor(C_TEXT))?;
    for (i, msg) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
