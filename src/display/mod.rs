/// Rendering layer; all terminal I/O lives here.
///
/// Each function receives a mutable writer and read-only snapshots of the
/// game. No game logic is performed: world coordinates are scaled onto the
/// terminal grid inside the border and each entity kind gets a glyph.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use astro_shooter::entities::{EntityKind, GameStatus, Playfield};
use astro_shooter::view::{EntityView, Hud};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_BOMB: Color = Color::Magenta;
const C_PLAYER: Color = Color::White;
const C_PLAYER_DIM: Color = Color::DarkGrey;
const C_ASTEROID: Color = Color::Grey;
const C_ENEMY: Color = Color::Green;
const C_BOSS: Color = Color::Red;
const C_SHOT_PLAYER: Color = Color::Cyan;
const C_SHOT_ENEMY: Color = Color::Magenta;
const C_SHOT_BOSS: Color = Color::DarkRed;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

/// Terminal area reserved for the playfield: rows 2..h-2, cols 1..w-1.
#[derive(Clone, Copy, Debug)]
struct Viewport {
    cols: u16,
    rows: u16,
    field: Playfield,
}

impl Viewport {
    fn new(cols: u16, rows: u16, field: Playfield) -> Self {
        Self { cols, rows, field }
    }

    /// Map a world point to a terminal cell, or `None` if it is off-screen.
    fn cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let inner_w = f64::from(self.cols.saturating_sub(2));
        let inner_h = f64::from(self.rows.saturating_sub(4));
        if inner_w < 1.0 || inner_h < 1.0 {
            return None;
        }
        let cx = x / self.field.width * inner_w;
        let cy = y / self.field.height * inner_h;
        if !(0.0..inner_w).contains(&cx) || !(0.0..inner_h).contains(&cy) {
            return None;
        }
        Some((1 + cx as u16, 2 + cy as u16))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    field: Playfield,
    entities: &[EntityView],
    hud: &Hud,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let viewport = Viewport::new(cols, rows, field);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, cols, rows)?;
    draw_hud(out, hud, cols)?;

    for entity in entities {
        draw_entity(out, entity, &viewport)?;
    }

    draw_controls_hint(out, rows)?;

    match hud.status {
        GameStatus::Menu => draw_menu(out, hud, cols, rows)?,
        GameStatus::GameOver => draw_game_over(out, hud, cols, rows)?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, hud: &Hud, cols: u16) -> std::io::Result<()> {
    // Score and combo, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    let combo = if hud.combo > 1 { format!("  x{}", hud.combo) } else { String::new() };
    out.queue(Print(format!("Score: {:>6}  Best: {:>6}{}", hud.score, hud.high_score, combo)))?;

    // Bomb readiness, centre
    let bomb = if hud.bomb_cooldown > 0.0 {
        format!("[ BOMB {:>4.1}s ]", hud.bomb_cooldown)
    } else {
        "[ BOMB READY ]".to_string()
    };
    let bx = (cols / 2).saturating_sub(bomb.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(bx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_BOMB))?;
    out.queue(Print(&bomb))?;

    // Lives, right
    let hearts: String = "♥".repeat(hud.lives as usize);
    let lives_text = format!("Lives: {}", hearts);
    let rx = cols.saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Eight-way arrow for a heading in degrees (0 = east, y grows downward).
fn heading_glyph(rotation: f64) -> &'static str {
    const ARROWS: [&str; 8] = ["→", "↘", "↓", "↙", "←", "↖", "↑", "↗"];
    let octant = ((rotation.rem_euclid(360.0) + 22.5) / 45.0) as usize % 8;
    ARROWS[octant]
}

fn glyph(entity: &EntityView) -> (&'static str, Color) {
    match entity.kind {
        EntityKind::Player => {
            let color = if entity.dimmed { C_PLAYER_DIM } else { C_PLAYER };
            (heading_glyph(entity.rotation), color)
        }
        EntityKind::Asteroid if entity.width >= 60.0 => ("@", C_ASTEROID),
        EntityKind::Asteroid => ("o", C_ASTEROID),
        EntityKind::Enemy if entity.hp_fraction < 1.0 => ("x", C_ENEMY),
        EntityKind::Enemy => ("<▼>", C_ENEMY),
        EntityKind::Boss if entity.frame % 2 == 0 => ("[◉]", C_BOSS),
        EntityKind::Boss => ("{◉}", C_BOSS),
        EntityKind::Projectile => ("•", C_SHOT_PLAYER),
        EntityKind::EnemyProjectile => ("∙", C_SHOT_ENEMY),
        EntityKind::BossProjectile => ("*", C_SHOT_BOSS),
        EntityKind::Explosion | EntityKind::BombExplosion => {
            const FRAMES: [&str; 6] = ["·", "+", "*", "※", "░", " "];
            (FRAMES[entity.frame as usize % FRAMES.len()], C_EXPLOSION)
        }
    }
}

fn draw_entity<W: Write>(
    out: &mut W,
    entity: &EntityView,
    viewport: &Viewport,
) -> std::io::Result<()> {
    let Some((col, row)) = viewport.cell(entity.x, entity.y) else {
        return Ok(());
    };
    let (text, color) = glyph(entity);
    let width = text.chars().count() as u16;
    let col = col.saturating_sub(width / 2).max(1);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "W S A D : Thrust   ← → : Rotate   SPACE : Fire   B : Bomb   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Pulsing prompt colour: bright while the blink alpha is high.
fn prompt_color(alpha: f64) -> Color {
    if alpha > 0.66 {
        Color::White
    } else if alpha > 0.33 {
        Color::Grey
    } else {
        Color::DarkGrey
    }
}

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(&str, Color)],
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_menu<W: Write>(out: &mut W, hud: &Hud, cols: u16, rows: u16) -> std::io::Result<()> {
    let best = format!("Best Score: {}", hud.high_score);
    let lines: &[(&str, Color)] = &[
        ("★  ASTRO  SHOOTER  ★", Color::Cyan),
        (&best, Color::Yellow),
        ("", Color::Reset),
        ("Press SPACE to start", prompt_color(hud.blink_alpha)),
    ];
    draw_centered(out, lines, cols, rows)
}

fn draw_game_over<W: Write>(out: &mut W, hud: &Hud, cols: u16, rows: u16) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", hud.score);
    let best_line = format!("Best Score: {}", hud.high_score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        (&best_line, Color::Yellow),
        ("SPACE - Play Again  Q - Quit", prompt_color(hud.blink_alpha)),
    ];
    draw_centered(out, lines, cols, rows)
}
