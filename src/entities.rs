//! Game entity types and the leveling rules that belong to them.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::*;
use crate::effects::{EffectKind, Effects};
use crate::spawner::Spawner;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Top-left corner of an entity, in arena units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Position { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned square footprint used for every collision check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub pos: Position,
    pub size: f32,
}

impl Bounds {
    pub fn new(pos: Position, size: f32) -> Self {
        Bounds { pos, size }
    }

    pub fn center(&self) -> Position {
        Position::new(self.pos.x + self.size / 2.0, self.pos.y + self.size / 2.0)
    }

    /// Strict overlap: squares that only share an edge do not collide.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.pos.x < other.pos.x + other.size
            && other.pos.x < self.pos.x + self.size
            && self.pos.y < other.pos.y + other.size
            && other.pos.y < self.pos.y + self.size
    }
}

/// Keep a square of `size` fully inside the arena.
pub fn clamp_to_arena(pos: Position, size: f32) -> Position {
    Position::new(
        pos.x.clamp(0.0, ARENA_WIDTH - size),
        pos.y.clamp(0.0, ARENA_HEIGHT - size),
    )
}

// ── Fruits ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FruitKind {
    /// Small heal.
    GleamBerry,
    /// Permanent speed bonus plus a short invulnerability window.
    ShimmeringApple,
    /// Experience, a bigger heal and a permanent max-health bonus.
    EtherealPear,
    /// Experience and a lure that draws basic enemies to where it was eaten.
    Flamefruit,
    /// Experience and a short damage boost.
    MoonbeamMelon,
}

impl FruitKind {
    pub const COUNT: usize = 5;
    pub const ALL: [FruitKind; FruitKind::COUNT] = [
        FruitKind::GleamBerry,
        FruitKind::ShimmeringApple,
        FruitKind::EtherealPear,
        FruitKind::Flamefruit,
        FruitKind::MoonbeamMelon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FruitKind::GleamBerry => "Gleam Berry",
            FruitKind::ShimmeringApple => "Shimmering Apple",
            FruitKind::EtherealPear => "Ethereal Pear",
            FruitKind::Flamefruit => "Flamefruit",
            FruitKind::MoonbeamMelon => "Moonbeam Melon",
        }
    }

    /// Experience granted on top of `FRUIT_BASE_EXPERIENCE`.
    pub fn bonus_experience(self) -> u32 {
        match self {
            FruitKind::GleamBerry | FruitKind::ShimmeringApple => 0,
            FruitKind::EtherealPear => PEAR_EXPERIENCE,
            FruitKind::Flamefruit => FLAMEFRUIT_EXPERIENCE,
            FruitKind::MoonbeamMelon => MELON_EXPERIENCE,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fruit {
    pub pos: Position,
    pub kind: FruitKind,
}

impl Fruit {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, FRUIT_SIZE)
    }
}

/// Collected-fruit counters, one slot per `FruitKind`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: [u32; FruitKind::COUNT],
}

impl Inventory {
    pub fn count(&self, kind: FruitKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn add(&mut self, kind: FruitKind) {
        self.counts[kind.index()] += 1;
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FruitKind, u32)> + '_ {
        FruitKind::ALL.into_iter().map(move |k| (k, self.count(k)))
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyTier {
    /// Night Crawler.
    Basic,
    Boss,
    /// Malakar; at most one alive at a time.
    SuperBoss,
}

impl EnemyTier {
    pub fn max_health(self) -> i32 {
        match self {
            EnemyTier::Basic => 100,
            EnemyTier::Boss => 500,
            EnemyTier::SuperBoss => 5000,
        }
    }

    /// Experience awarded to the player for the killing blow.
    pub fn experience_award(self) -> u32 {
        match self {
            EnemyTier::Basic => 50,
            EnemyTier::Boss => 550,
            EnemyTier::SuperBoss => 1050,
        }
    }

    /// Damage dealt to the player on contact.
    pub fn contact_damage(self) -> i32 {
        match self {
            EnemyTier::Basic => 1,
            EnemyTier::Boss | EnemyTier::SuperBoss => 10,
        }
    }

    pub fn size(self) -> f32 {
        match self {
            EnemyTier::Basic => 45.0,
            EnemyTier::Boss | EnemyTier::SuperBoss => 90.0,
        }
    }

    /// Only basic enemies are drawn to a Flamefruit lure.
    pub fn follows_lure(self) -> bool {
        self == EnemyTier::Basic
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub pos: Position,
    pub tier: EnemyTier,
    pub health: i32,
    /// Units moved per axis per tick.
    pub speed: f32,
}

impl Enemy {
    pub fn new(tier: EnemyTier, pos: Position, speed: f32) -> Self {
        Enemy {
            pos,
            tier,
            health: tier.max_health(),
            speed,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, self.tier.size())
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// The player character. Every field is part of the save snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Position,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub experience: u32,
    pub level: u32,
    /// `BASE_DAMAGE`, or `BOOSTED_DAMAGE` while the melon boost runs.
    pub damage: i32,
    pub inventory: Inventory,
    pub effects: Effects,
    /// Game time of the last hit that actually removed health.
    pub last_hit: Option<u64>,
    pub last_regen: u64,
    /// Where basic enemies converge while the lure effect runs.
    pub lure: Option<Position>,
    /// Game clock when the snapshot was written. Every timestamp above is
    /// on this clock, so a loaded game resumes from here.
    pub saved_at: u64,
}

impl Player {
    /// A fresh level-1 player standing in the middle of the arena.
    pub fn new(now: u64) -> Self {
        Player {
            pos: Position::new(
                (ARENA_WIDTH - PLAYER_SIZE) / 2.0,
                (ARENA_HEIGHT - PLAYER_SIZE) / 2.0,
            ),
            speed: PLAYER_BASE_SPEED,
            health: PLAYER_START_HEALTH,
            max_health: PLAYER_START_HEALTH,
            experience: 0,
            level: 1,
            damage: BASE_DAMAGE,
            inventory: Inventory::default(),
            effects: Effects::default(),
            last_hit: None,
            last_regen: now,
            lure: None,
            saved_at: now,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, PLAYER_SIZE)
    }

    /// Step by `(dx, dy)` times the current speed, staying inside the arena.
    pub fn move_by(&mut self, dx: i8, dy: i8) {
        let next = Position::new(
            self.pos.x + dx as f32 * self.speed,
            self.pos.y + dy as f32 * self.speed,
        );
        self.pos = clamp_to_arena(next, PLAYER_SIZE);
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Add experience and level up once the threshold is reached.
    /// Any surplus over the threshold is discarded. Returns `true` on level-up.
    pub fn gain_experience(&mut self, amount: u32) -> bool {
        self.experience += amount;
        if self.experience >= LEVEL_UP_THRESHOLD {
            self.level += 1;
            self.experience = 0;
            info!(level = self.level, "level up");
            true
        } else {
            false
        }
    }

    /// Apply a fruit's effect. `center` is where the fruit was eaten and
    /// becomes the lure marker for Flamefruit. Returns `true` on level-up.
    pub fn collect_fruit(&mut self, kind: FruitKind, center: Position, now: u64) -> bool {
        self.inventory.add(kind);
        match kind {
            FruitKind::GleamBerry => self.heal(BERRY_HEAL),
            FruitKind::ShimmeringApple => {
                self.speed += APPLE_SPEED_BONUS;
                self.effects.arm(EffectKind::Invulnerable, now, APPLE_INVULN_MS);
            }
            FruitKind::EtherealPear => {
                self.max_health += PEAR_MAX_HEALTH_BONUS;
                self.heal(PEAR_HEAL);
            }
            FruitKind::Flamefruit => {
                self.lure = Some(center);
                self.effects.arm(EffectKind::Lure, now, FLAMEFRUIT_LURE_MS);
            }
            FruitKind::MoonbeamMelon => {
                self.damage = BOOSTED_DAMAGE;
                self.effects.arm(EffectKind::DamageBoost, now, MELON_BOOST_MS);
            }
        }
        self.gain_experience(FRUIT_BASE_EXPERIENCE + kind.bonus_experience())
    }

    pub fn is_invulnerable(&self) -> bool {
        self.effects.is_active(EffectKind::Invulnerable)
    }

    pub fn special_attack_ready(&self) -> bool {
        !self.effects.is_active(EffectKind::SpecialCooldown)
    }
}

// ── Per-tick events ───────────────────────────────────────────────────────────

/// Something noteworthy that happened during the last tick. The renderer
/// turns these into transient banners; the core never reads them back.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    FruitCollected(FruitKind),
    LevelUp { level: u32 },
    EnemyDefeated { tier: EnemyTier, award: u32 },
    PlayerHit { amount: i32 },
    SpecialAttack { hits: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything the simulation owns, from program start to exit.
#[derive(Clone, Debug)]
pub struct World {
    pub player: Player,
    pub fruits: Vec<Fruit>,
    /// All enemy tiers share one collection; `Enemy::tier` tells them apart.
    pub enemies: Vec<Enemy>,
    pub spawner: Spawner,
    pub status: GameStatus,
    /// Game clock in milliseconds. Advances only while ticking.
    pub now: u64,
    /// Events produced by the most recent tick.
    pub events: Vec<GameEvent>,
}

impl World {
    /// An empty world at time zero: just the player, no fruits or enemies.
    pub fn new() -> Self {
        World {
            player: Player::new(0),
            fruits: Vec::new(),
            enemies: Vec::new(),
            spawner: Spawner::new(0),
            status: GameStatus::Playing,
            now: 0,
            events: Vec::new(),
        }
    }

    pub fn count_tier(&self, tier: EnemyTier) -> usize {
        self.enemies.iter().filter(|e| e.tier == tier).count()
    }
}

impl Default for World {
    fn default() -> Self {
        World::new()
    }
}
