/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.  World coordinates are scaled onto the
/// terminal grid inside the border.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use upgrade_shooter::economy;
use upgrade_shooter::entities::{Bullet, Enemy, GameState, GameStatus, Particle};
use upgrade_shooter::rules::GatePolicy;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_TOTAL: Color = Color::Magenta;
const C_PLAYER: Color = Color::Green;
const C_ENEMY: Color = Color::Red;
const C_BULLET: Color = Color::Yellow;
const C_BULLET_AIM: Color = Color::Cyan;
const C_BULLET_BOUNCE: Color = Color::Rgb { r: 255, g: 165, b: 0 };
const C_HINT: Color = Color::DarkGrey;

/// Front-end values that are not part of the simulation.
#[derive(Clone, Debug, Default)]
pub struct Hud {
    pub total_points: u64,
    /// Last shop message (e.g. a rejected purchase).
    pub message: Option<String>,
}

/// Maps world coordinates onto terminal cells.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    world_w: f32,
    world_h: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, state: &GameState) -> Self {
        Self {
            cols,
            rows,
            world_w: state.width(),
            world_h: state.height(),
        }
    }

    fn inner_w(&self) -> f32 {
        f32::from(self.cols.saturating_sub(2).max(1))
    }

    fn inner_h(&self) -> f32 {
        f32::from(self.rows.saturating_sub(4).max(1))
    }

    /// Cell for a world point, or `None` when it lies outside the field.
    pub fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= self.world_w || y >= self.world_h {
            return None;
        }
        let col = 1 + (x / self.world_w * self.inner_w()) as u16;
        let row = 2 + (y / self.world_h * self.inner_h()) as u16;
        Some((col, row))
    }

    /// World x for a terminal column (used for mouse steering).
    pub fn world_x(&self, col: u16) -> f32 {
        let inner = f32::from(col.saturating_sub(1)) + 0.5;
        (inner / self.inner_w() * self.world_w).clamp(0.0, self.world_w)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, hud: &Hud) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let view = Viewport::new(cols, rows, state);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, state, hud, &view)?;

    for particle in &state.particles {
        draw_particle(out, particle, &view)?;
    }
    for enemy in &state.enemies {
        draw_enemy(out, enemy, &view)?;
    }
    for bullet in &state.bullets {
        draw_bullet(out, bullet, &view)?;
    }

    draw_player(out, state, &view)?;
    draw_controls_hint(out, state, &view)?;

    match state.status {
        GameStatus::UpgradeOpen => draw_upgrade_screen(out, state, hud, &view)?,
        GameStatus::GameOver => draw_game_over(out, state, hud, &view)?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameState,
    hud: &Hud,
    view: &Viewport,
) -> std::io::Result<()> {
    // Score and total points, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", state.display_score())))?;
    if state.rules.persistent {
        out.queue(style::SetForegroundColor(C_HUD_TOTAL))?;
        out.queue(Print(format!("  Total:{:>7}", hud.total_points)))?;
    }

    // Variant, centre
    let label = format!("[ {} ]", state.rules.variant.label());
    let lx = (view.cols / 2).saturating_sub(label.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&label))?;

    // Health, right
    let hearts: String = "♥".repeat(state.player.health as usize);
    let health_text = format!("Health: {}", hearts);
    let rx = view
        .cols
        .saturating_sub(health_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&health_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    // Sprite (2 rows, 3 cols):
    //   ▲       ← row y      (tip)
    //  /|\      ← row y+1    (wings + fuselage)
    let p = &state.player;
    let Some((col, row)) = view.cell(p.x, p.y) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print("▲"))?;

    if row + 1 < view.rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row + 1))?;
        out.queue(Print("/|\\"))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, view: &Viewport) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(enemy.x, enemy.y) else {
        return Ok(());
    };
    let lx = col.saturating_sub(1).max(1);

    // Health bar above the sprite, three cells wide
    if row > 2 {
        let ratio = if enemy.max_health > 0.0 {
            (enemy.health / enemy.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let filled = (ratio * 3.0).ceil() as usize;
        out.queue(cursor::MoveTo(lx, row - 1))?;
        out.queue(style::SetForegroundColor(Color::Green))?;
        out.queue(Print(format!("{:<3}", "▬".repeat(filled))))?;
    }

    out.queue(cursor::MoveTo(lx, row))?;
    out.queue(style::SetForegroundColor(C_ENEMY))?;
    out.queue(Print("[■]"))?;
    Ok(())
}

fn draw_bullet<W: Write>(out: &mut W, bullet: &Bullet, view: &Viewport) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(bullet.x, bullet.y) else {
        return Ok(());
    };
    let color = if bullet.is_bounce {
        C_BULLET_BOUNCE
    } else if bullet.is_aim {
        C_BULLET_AIM
    } else {
        C_BULLET
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print("•"))?;
    Ok(())
}

fn draw_particle<W: Write>(out: &mut W, particle: &Particle, view: &Viewport) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(particle.x, particle.y) else {
        return Ok(());
    };
    let [r, g, b] = particle.color;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(Color::Rgb { r, g, b }))?;
    out.queue(Print("·"))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot"))?;
    if state.rules.persistent {
        out.queue(Print("   S : Save & quit"))?;
    }
    out.queue(Print("   Q : Quit"))?;

    if state.rules.gate == GatePolicy::Manual && economy::upgrade_available(state) {
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print("   U : UPGRADES"))?;
    }
    Ok(())
}

// ── Upgrade screen overlay ────────────────────────────────────────────────────

fn draw_upgrade_screen<W: Write>(
    out: &mut W,
    state: &GameState,
    hud: &Hud,
    view: &Viewport,
) -> std::io::Result<()> {
    let mut lines: Vec<(String, Color)> = vec![
        ("╔══════════════════════════╗".to_string(), Color::Cyan),
        ("║         UPGRADES         ║".to_string(), Color::Cyan),
        ("╚══════════════════════════╝".to_string(), Color::Cyan),
        (format!("Score: {}", state.display_score()), C_HUD_SCORE),
    ];
    for (i, kind) in state.rules.offered.iter().enumerate() {
        let price = economy::cost(state, *kind);
        let affordable = state.score >= price;
        lines.push((
            format!(
                "[{}] {:<13} Lv {:>2}  cost {:>4}",
                i + 1,
                kind.label(),
                state.upgrades.level(*kind),
                price.ceil() as u64
            ),
            if affordable { Color::White } else { Color::DarkGrey },
        ));
    }
    if let Some(msg) = &hud.message {
        lines.push((msg.clone(), Color::Red));
    }
    let close_hint = match state.rules.gate {
        GatePolicy::Manual => "ESC - Back to game",
        GatePolicy::Auto => "Spend your score to continue",
    };
    lines.push((close_hint.to_string(), C_HINT));

    draw_centered(out, &lines, view)
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    hud: &Hud,
    view: &Viewport,
) -> std::io::Result<()> {
    let mut lines: Vec<(String, Color)> = vec![
        ("╔══════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER    ║".to_string(), Color::Red),
        ("╚══════════════════╝".to_string(), Color::Red),
        (format!("Final Score: {}", state.display_score()), Color::Yellow),
    ];
    if state.rules.persistent {
        lines.push((format!("Total Points: {}", hud.total_points), C_HUD_TOTAL));
    }
    lines.push(("R - Title  Q - Quit".to_string(), Color::White));

    draw_centered(out, &lines, view)
}

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(String, Color)],
    view: &Viewport,
) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }

    Ok(())
}
