/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// world.  No game logic is performed; this module only translates state
/// into terminal commands, scaling the 800 × 540 arena onto whatever grid
/// the terminal offers.

use std::io::Write;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use elysian_grove::config::{ARENA_HEIGHT, ARENA_WIDTH, BANNER_MS};
use elysian_grove::effects::EffectKind;
use elysian_grove::entities::{
    Enemy, EnemyTier, FruitKind, GameEvent, GameStatus, Position, World,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkGreen;
const C_HUD: Color = Color::White;
const C_HEALTH_OK: Color = Color::Red;
const C_HEALTH_LOW: Color = Color::White;
const C_HEALTH_HIT: Color = Color::DarkRed;
const C_PLAYER: Color = Color::White;
const C_PLAYER_INVULN: Color = Color::Yellow;
const C_LURE: Color = Color::DarkRed;
const C_STATUS: Color = Color::Green;
const C_INVENTORY: Color = Color::Blue;
const C_HINT: Color = Color::DarkGrey;

/// Smallest terminal the layout fits in.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 16;

/// Columns taken by the inventory strip: glyph plus a padded count per kind.
const INVENTORY_CELLS: u16 = 6 * FruitKind::COUNT as u16 + 1;

// ── Transient banners ─────────────────────────────────────────────────────────

/// How long the health bar flashes after a hit.
const HIT_FLASH_MS: u64 = 250;

/// Presentation-side memory of recent events. Fed from `World::events`
/// after each tick; never read by the simulation.
///
/// Event banners run on the game clock and freeze with it while paused.
/// Notices (save results) run on the wall clock.
#[derive(Default)]
pub struct Hud {
    collected: Option<(FruitKind, u64)>,
    level_up_until: Option<u64>,
    experience: Option<(u32, u64)>,
    special: Option<(usize, u64)>,
    hit_until: Option<u64>,
    message: Option<(String, Instant)>,
    pub paused: bool,
}

impl Hud {
    pub fn observe(&mut self, events: &[GameEvent], now: u64) {
        let mut awarded = 0;
        for event in events {
            match event {
                GameEvent::FruitCollected(kind) => self.collected = Some((*kind, now + BANNER_MS)),
                GameEvent::LevelUp { .. } => self.level_up_until = Some(now + BANNER_MS),
                GameEvent::EnemyDefeated { award, .. } => awarded += *award,
                GameEvent::PlayerHit { .. } => self.hit_until = Some(now + HIT_FLASH_MS),
                GameEvent::SpecialAttack { hits } => self.special = Some((*hits, now + BANNER_MS)),
            }
        }
        if awarded > 0 {
            self.experience = Some((awarded, now + BANNER_MS));
        }
    }

    /// Show a one-line notice (save result, load failure) for a moment.
    pub fn notify(&mut self, text: impl Into<String>, wall: Instant) {
        let until = wall + Duration::from_millis(2 * BANNER_MS);
        self.message = Some((text.into(), until));
    }

    fn level_up_showing(&self, now: u64) -> bool {
        self.level_up_until.is_some_and(|t| now < t)
    }

    fn hit_flashing(&self, now: u64) -> bool {
        self.hit_until.is_some_and(|t| now < t)
    }

    /// Banner texts still live at game time `now` and wall time `wall`.
    fn banners(&self, now: u64, wall: Instant) -> Vec<String> {
        let mut parts = Vec::new();
        if let Some((kind, until)) = self.collected {
            if now < until {
                parts.push(format!("Collected: {}", kind.name()));
            }
        }
        if let Some((amount, until)) = self.experience {
            if now < until {
                parts.push(format!("+{amount} XP"));
            }
        }
        if let Some((hits, until)) = self.special {
            if now < until {
                parts.push(format!("Special: {hits} hit"));
            }
        }
        if let Some((text, until)) = &self.message {
            if wall < *until {
                parts.push(text.clone());
            }
        }
        parts
    }
}

// ── Arena → terminal mapping ──────────────────────────────────────────────────

/// Interior of the border: columns `1..width-1`, rows `2..height-3`.
struct Viewport {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn new(width: u16, height: u16) -> Self {
        Viewport {
            left: 1,
            top: 2,
            cols: width.saturating_sub(2).max(1),
            rows: height.saturating_sub(5).max(1),
        }
    }

    fn cell(&self, pos: Position) -> (u16, u16) {
        let cx = (pos.x / ARENA_WIDTH * self.cols as f32) as u16;
        let cy = (pos.y / ARENA_HEIGHT * self.rows as f32) as u16;
        (
            self.left + cx.min(self.cols - 1),
            self.top + cy.min(self.rows - 1),
        )
    }

    /// Width in cells of something `size` arena units wide (at least 1).
    fn span(&self, size: f32) -> u16 {
        ((size / ARENA_WIDTH * self.cols as f32).round() as u16).max(1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, world: &World, hud: &Hud) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, world, hud, width)?;

    for fruit in &world.fruits {
        let (x, y) = view.cell(fruit.pos);
        let (glyph, color) = fruit_glyph(fruit.kind);
        out.queue(cursor::MoveTo(x, y))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }

    if let (Some(marker), true) = (
        world.player.lure,
        world.player.effects.is_active(EffectKind::Lure),
    ) {
        let (x, y) = view.cell(marker);
        out.queue(cursor::MoveTo(x, y))?;
        out.queue(style::SetForegroundColor(C_LURE))?;
        out.queue(Print("✶"))?;
    }

    for enemy in &world.enemies {
        draw_enemy(out, &view, enemy)?;
    }

    draw_player(out, &view, world)?;
    draw_inventory(out, world, height)?;
    draw_status_line(out, world, hud, width, height)?;

    match world.status {
        GameStatus::Lost => draw_centered(out, width, height, "GAME OVER", Color::Red)?,
        GameStatus::Won => draw_centered(out, width, height, "YOU WIN", Color::Green)?,
        GameStatus::Playing if hud.paused => {
            draw_centered(out, width, height, "PAUSED", Color::Blue)?
        }
        GameStatus::Playing => {
            if hud.level_up_showing(world.now) {
                draw_centered(out, width, height, "LEVEL UP!", Color::Green)?;
            }
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;
    let bottom = height.saturating_sub(3);

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn health_bar(health: i32, max_health: i32, cells: usize) -> String {
    let filled = if max_health > 0 {
        ((health.max(0) as usize * cells) / max_health as usize).min(cells)
    } else {
        0
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(cells.saturating_sub(filled)))
}

fn draw_hud<W: Write>(out: &mut W, world: &World, hud: &Hud, width: u16) -> std::io::Result<()> {
    let p = &world.player;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Level: {:<3}  Experience: {:<4}  Health: {:>3}/{:<3} ",
        p.level, p.experience, p.health, p.max_health
    )))?;

    // Red while healthy, white below a tenth.
    let color = if p.health * 10 > p.max_health {
        C_HEALTH_OK
    } else {
        C_HEALTH_LOW
    };
    out.queue(style::SetForegroundColor(color))?;
    if hud.hit_flashing(world.now) {
        out.queue(style::SetBackgroundColor(C_HEALTH_HIT))?;
    }
    out.queue(Print(health_bar(p.health, p.max_health, 10)))?;
    out.queue(style::SetBackgroundColor(Color::Reset))?;

    let special = if p.special_attack_ready() {
        "Special: READY".to_string()
    } else {
        format!(
            "Special: {:>2}s",
            p.effects.remaining(EffectKind::SpecialCooldown, world.now) / 1000 + 1
        )
    };
    let sx = width.saturating_sub(special.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(special))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn fruit_glyph(kind: FruitKind) -> (&'static str, Color) {
    match kind {
        FruitKind::GleamBerry => ("•", Color::Cyan),
        FruitKind::ShimmeringApple => ("●", Color::Yellow),
        FruitKind::EtherealPear => ("♠", Color::Magenta),
        FruitKind::Flamefruit => ("♦", Color::Red),
        FruitKind::MoonbeamMelon => ("◆", Color::White),
    }
}

fn draw_enemy<W: Write>(out: &mut W, view: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    let (x, y) = view.cell(enemy.pos);
    let span = view.span(enemy.tier.size()) as usize;
    let (glyph, color) = match enemy.tier {
        EnemyTier::Basic => ("x", Color::Green),
        EnemyTier::Boss => ("B", Color::Magenta),
        EnemyTier::SuperBoss => ("M", Color::Red),
    };

    // Health bar one row above, unless that would cover the border.
    if y > view.top {
        let bar = health_bar(enemy.health, enemy.tier.max_health(), span.max(2));
        out.queue(cursor::MoveTo(x, y - 1))?;
        out.queue(style::SetForegroundColor(Color::DarkRed))?;
        out.queue(Print(bar))?;
    }

    let right = (view.left + view.cols) as usize;
    let body: String = glyph.repeat(span.min(right.saturating_sub(x as usize)).max(1));
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(body))?;
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, view: &Viewport, world: &World) -> std::io::Result<()> {
    let (x, y) = view.cell(world.player.pos);
    let color = if world.player.is_invulnerable() {
        C_PLAYER_INVULN
    } else {
        C_PLAYER
    };
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print("@"))?;
    Ok(())
}

// ── Inventory strip & status line (last two rows) ─────────────────────────────

fn draw_inventory<W: Write>(out: &mut W, world: &World, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(2)))?;
    for (kind, count) in world.player.inventory.iter() {
        let (glyph, color) = fruit_glyph(kind);
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
        out.queue(style::SetForegroundColor(C_INVENTORY))?;
        out.queue(Print(format!(" {:<4}", count)))?;
    }
    Ok(())
}

fn draw_status_line<W: Write>(
    out: &mut W,
    world: &World,
    hud: &Hud,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let row = height.saturating_sub(1);

    let mut parts = hud.banners(world.now, Instant::now());
    if world.player.is_invulnerable() {
        parts.push("Invulnerable".to_string());
    }
    if world.player.effects.is_active(EffectKind::DamageBoost) {
        parts.push("Increased Damage".to_string());
    }

    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_STATUS))?;
    out.queue(Print(parts.join("  ")))?;

    // Right of the inventory strip, when there is room for it.
    let hint = "SPACE Attack  N Special  P Pause  S Save  Q Quit";
    let hint_len = hint.chars().count() as u16;
    if width >= INVENTORY_CELLS + hint_len + 2 {
        out.queue(cursor::MoveTo(width - hint_len - 1, height.saturating_sub(2)))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(hint))?;
    }
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, height / 2))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

pub fn draw_menu<W: Write>(out: &mut W, notice: Option<&str>) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let lines: &[(&str, Color)] = &[
        ("Elysian Grove Adventure", Color::Green),
        ("", Color::White),
        ("S - Start new game", Color::White),
        ("L - Load saved game", Color::White),
        ("Q - Quit", Color::DarkGrey),
    ];
    let start_row = cy.saturating_sub(4);
    for (i, (text, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }

    if let Some(text) = notice {
        let col = cx.saturating_sub(text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + lines.len() as u16 + 1))?;
        out.queue(style::SetForegroundColor(Color::Red))?;
        out.queue(Print(text))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}
