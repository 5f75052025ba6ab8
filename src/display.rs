/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands, scaling the 1600×900 logical viewport onto
/// whatever character grid the terminal offers.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;

use crate::consts::{HEIGHT, WIDTH};
use crate::entities::{
    Avatar, AvatarState, Beam, Bomb, BombColor, BombState, Cutscene, Enemy, EntityKind,
    Explosion, Expression, Facing, GameState, Phase, Shield,
};
use crate::geometry::Rect;

/// Smallest terminal the layout fits in.
pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 16;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_SCORE: Color = Color::Blue;
const C_HYPER_TEXT: Color = Color::Blue;
const C_TITLE: Color = Color::Cyan;
const C_AVATAR: Color = Color::White;
const C_AVATAR_HYPER: Color = Color::Magenta;
const C_SHIELD: Color = Color::Blue;
const C_BEAM: Color = Color::Cyan;
const C_ENEMY: [Color; 3] = [Color::Green, Color::Red, Color::Yellow];
const C_ENEMY_DISTORTED: Color = Color::DarkGrey;
const C_EXPLOSION: [Color; 2] = [Color::Yellow, Color::Red];
const C_FLASH: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

// ── Viewport mapping ──────────────────────────────────────────────────────────

/// Maps logical coordinates onto the play-area cells inside the border.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Terminal size.
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Whether the terminal is big enough for the layout.
    pub fn fits(&self) -> bool {
        self.cols >= MIN_COLS && self.rows >= MIN_ROWS
    }

    /// First and last play-area column.
    fn col_span(&self) -> (u16, u16) {
        (1, self.cols.saturating_sub(2))
    }

    /// First and last play-area row (row 0 is the HUD, row 1 the top border).
    fn row_span(&self) -> (u16, u16) {
        (2, self.rows.saturating_sub(3))
    }

    /// Cell holding a logical point, or `None` outside the play area.
    pub fn to_cell(&self, p: Vec2) -> Option<(u16, u16)> {
        if !(0.0..=WIDTH).contains(&p.x) || !(0.0..=HEIGHT).contains(&p.y) {
            return None;
        }
        let (c0, c1) = self.col_span();
        let (r0, r1) = self.row_span();
        let cols = c1.checked_sub(c0)?;
        let rows = r1.checked_sub(r0)?;
        let col = c0 as f32 + p.x / WIDTH * cols as f32;
        let row = r0 as f32 + p.y / HEIGHT * rows as f32;
        Some((col.round() as u16, row.round() as u16))
    }

    /// Inclusive cell range covered by a box, clipped to the play area.
    pub fn cells(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let tl = Vec2::new(rect.left().max(0.0), rect.top().max(0.0));
        let br = Vec2::new(rect.right().min(WIDTH), rect.bottom().min(HEIGHT));
        if tl.x > br.x || tl.y > br.y {
            return None;
        }
        let (c0, r0) = self.to_cell(tl)?;
        let (c1, r1) = self.to_cell(br)?;
        Some((c0, r0, c1, r1))
    }
}

fn put<W: Write>(out: &mut W, cell: (u16, u16), color: Color, glyph: &str) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(cell.0, cell.1))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn fill<W: Write>(
    out: &mut W,
    vp: &Viewport,
    rect: &Rect,
    color: Color,
    glyph: char,
) -> std::io::Result<()> {
    let Some((c0, r0, c1, r1)) = vp.cells(rect) else {
        return Ok(());
    };
    let line: String = std::iter::repeat(glyph).take((c1 - c0 + 1) as usize).collect();
    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    if !vp.fits() {
        return draw_too_small(out, vp);
    }

    draw_border(out, vp)?;
    draw_title(out, vp, state)?;
    draw_hyper_time(out, vp, &state.avatar)?;

    for kind in EntityKind::FRAME_ORDER {
        match kind {
            EntityKind::Avatar => draw_avatar(out, vp, &state.avatar)?,
            EntityKind::Shield => {
                for shield in state.shields.values() {
                    draw_shield(out, vp, shield, &state.avatar)?;
                }
            }
            EntityKind::Beam => {
                for beam in state.beams.values() {
                    draw_beam(out, vp, beam)?;
                }
            }
            EntityKind::Enemy => {
                for enemy in state.enemies.values() {
                    draw_enemy(out, vp, enemy)?;
                }
            }
            EntityKind::Bomb => {
                for bomb in state.bombs.values() {
                    draw_bomb(out, vp, bomb)?;
                }
            }
            EntityKind::Explosion => {
                for explosion in state.explosions.values() {
                    draw_explosion(out, vp, explosion)?;
                }
            }
        }
    }

    draw_score(out, vp, state)?;

    match state.phase {
        Phase::Cutscene {
            kind: Cutscene::AreaEffect,
            ..
        } => draw_flash(out, vp)?,
        Phase::Cutscene {
            kind: Cutscene::Defeat,
            ..
        }
        | Phase::GameOver => draw_game_over(out, vp, state)?,
        Phase::Playing => {}
    }

    draw_controls_hint(out, vp)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Frame ─────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let w = vp.cols as usize;
    let h = vp.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(vp.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn draw_title<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> std::io::Result<()> {
    put(out, (1, 0), C_TITLE, "KOKATON BARRAGE")?;
    if let Some(shield) = state.shields.values().next() {
        let tag = format!("[Shield {:>3}]", shield.life.max(0));
        let x = vp.cols.saturating_sub(tag.chars().count() as u16 + 1);
        put(out, (x, 0), C_SHIELD, &tag)?;
    }
    Ok(())
}

/// Bottom-left of the play area.
fn draw_score<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> std::io::Result<()> {
    let (_, r1) = vp.row_span();
    put(out, (2, r1), C_SCORE, &state.score.text())
}

/// Bottom-right of the play area, only while hyper.
fn draw_hyper_time<W: Write>(out: &mut W, vp: &Viewport, avatar: &Avatar) -> std::io::Result<()> {
    if avatar.state != AvatarState::Hyper {
        return Ok(());
    }
    let text = hyper_text(avatar);
    let (_, r1) = vp.row_span();
    let x = vp.cols.saturating_sub(text.chars().count() as u16 + 2);
    put(out, (x, r1), C_HYPER_TEXT, &text)
}

/// Remaining hyper time in whole seconds at 50 FPS.
pub fn hyper_text(avatar: &Avatar) -> String {
    format!("Hyper Time: {}", avatar.hyper_life.div_euclid(50))
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn facing_glyph(facing: Facing) -> &'static str {
    match facing {
        Facing::East => "→",
        Facing::NorthEast => "↗",
        Facing::North => "↑",
        Facing::NorthWest => "↖",
        Facing::West => "←",
        Facing::SouthWest => "↙",
        Facing::South => "↓",
        Facing::SouthEast => "↘",
    }
}

fn draw_avatar<W: Write>(out: &mut W, vp: &Viewport, avatar: &Avatar) -> std::io::Result<()> {
    let (color, body) = match avatar.state {
        AvatarState::Normal => (C_AVATAR, '█'),
        AvatarState::Hyper => (C_AVATAR_HYPER, '▒'),
    };
    fill(out, vp, &avatar.rect, color, body)?;

    let face = match avatar.expression {
        Expression::Neutral => facing_glyph(avatar.facing),
        Expression::Joy => "☺",
        Expression::Sorrow => "☹",
    };
    if let Some(cell) = vp.to_cell(avatar.rect.center) {
        out.queue(style::SetBackgroundColor(color))?;
        put(out, cell, Color::Black, face)?;
        out.queue(style::SetBackgroundColor(Color::Reset))?;
    }
    Ok(())
}

/// The shield is a bar perpendicular to the facing, so plot it as a line
/// through its centre rather than filling the bounding box.
fn draw_shield<W: Write>(
    out: &mut W,
    vp: &Viewport,
    shield: &Shield,
    avatar: &Avatar,
) -> std::io::Result<()> {
    let (sin, cos) = shield.angle.to_radians().sin_cos();
    // Perpendicular to the facing, screen Y down.
    let along = Vec2::new(sin, cos);
    let half = avatar.rect.height();
    let steps = 16;
    for i in 0..=steps {
        let t = -half + 2.0 * half * i as f32 / steps as f32;
        if let Some(cell) = vp.to_cell(shield.rect.center + along * t) {
            put(out, cell, C_SHIELD, "▓")?;
        }
    }
    Ok(())
}

fn draw_beam<W: Write>(out: &mut W, vp: &Viewport, beam: &Beam) -> std::io::Result<()> {
    let octant = (beam.angle.rem_euclid(180.0) / 45.0).round() as i32 % 4;
    let glyph = match octant {
        0 => "━",
        1 => "╱",
        2 => "┃",
        _ => "╲",
    };
    match vp.to_cell(beam.rect.center) {
        Some(cell) => put(out, cell, C_BEAM, glyph),
        None => Ok(()),
    }
}

fn draw_enemy<W: Write>(out: &mut W, vp: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    let sprite = match enemy.variant {
        0 => "«▼»",
        1 => "(◎)",
        _ => "<W>",
    };
    let color = if enemy.distorted {
        C_ENEMY_DISTORTED
    } else {
        C_ENEMY[enemy.variant as usize % C_ENEMY.len()]
    };
    match vp.to_cell(enemy.rect.center) {
        Some((col, row)) => put(out, (col.saturating_sub(1).max(1), row), color, sprite),
        None => Ok(()),
    }
}

fn bomb_color(color: BombColor) -> Color {
    match color {
        BombColor::Red => Color::Red,
        BombColor::Green => Color::Green,
        BombColor::Blue => Color::Blue,
        BombColor::Yellow => Color::Yellow,
        BombColor::Magenta => Color::Magenta,
        BombColor::Cyan => Color::Cyan,
    }
}

fn draw_bomb<W: Write>(out: &mut W, vp: &Viewport, bomb: &Bomb) -> std::io::Result<()> {
    let color = bomb_color(bomb.color);
    if bomb.radius >= 35 {
        fill(out, vp, &bomb.rect, color, '●')?;
    }
    let glyph = match bomb.state {
        BombState::Active => "●",
        BombState::Inactive => "○",
    };
    match vp.to_cell(bomb.rect.center) {
        Some(cell) => put(out, cell, color, glyph),
        None => Ok(()),
    }
}

fn draw_explosion<W: Write>(out: &mut W, vp: &Viewport, explosion: &Explosion) -> std::io::Result<()> {
    let frame = explosion.frame();
    let glyph = if frame == 0 { '*' } else { '+' };
    fill(out, vp, &explosion.rect, C_EXPLOSION[frame], glyph)
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Translucent full-screen flash of the area effect.
fn draw_flash<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let screen = Rect::new(
        Vec2::new(WIDTH / 2.0, HEIGHT / 2.0),
        Vec2::new(WIDTH, HEIGHT),
    );
    fill(out, vp, &screen, C_FLASH, '░')
}

fn draw_game_over<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> std::io::Result<()> {
    let score_line = format!("Final {}", state.score.text());
    let lines: [(&str, Color); 3] = [
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];

    let cx = vp.cols / 2;
    let start_row = (vp.rows / 2).saturating_sub(2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        put(out, (col, start_row + i as u16), *color, msg)?;
    }

    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    put(out, (col, start_row + lines.len() as u16), Color::Yellow, &score_line)
}

/// Shown instead of the game while the terminal is below the minimum size.
fn draw_too_small<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetForegroundColor(Color::Red))?;
    out.queue(Print(format!(
        "Terminal too small: {}x{}, need {}x{}",
        vp.cols, vp.rows, MIN_COLS, MIN_ROWS
    )))?;
    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    put(
        out,
        (1, vp.rows.saturating_sub(1)),
        C_HINT,
        "Move:←↑↓→/WASD Shift:fast SPC:beam Shift+SPC:spread H:hyper C:shield E:emp Q:quit",
    )
}
