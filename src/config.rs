//! Tuning constants for the simulation.
//!
//! All times are milliseconds of game clock; all distances are arena units
//! (the arena is 800 × 540 regardless of terminal size).

// ── Arena ─────────────────────────────────────────────────────────────────────

pub const ARENA_WIDTH: f32 = 800.0;
/// Playable height; the inventory strip is drawn below it, outside the arena.
pub const ARENA_HEIGHT: f32 = 540.0;

// ── Frame pacing ─────────────────────────────────────────────────────────────

/// Target frame length (≈30 FPS). Per-tick speeds below assume this.
pub const TICK_MS: u64 = 33;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_SIZE: f32 = 45.0;
pub const PLAYER_BASE_SPEED: f32 = 10.0;
pub const PLAYER_START_HEALTH: i32 = 100;
pub const BASE_DAMAGE: i32 = 20;
pub const BOOSTED_DAMAGE: i32 = 100;

/// Minimum gap between two successful hits on the player.
pub const HIT_COOLDOWN_MS: u64 = 1000;
pub const REGEN_INTERVAL_MS: u64 = 5000;
pub const REGEN_AMOUNT: i32 = 1;

// ── Leveling ──────────────────────────────────────────────────────────────────

pub const FRUIT_BASE_EXPERIENCE: u32 = 100;
pub const LEVEL_UP_THRESHOLD: u32 = 1000;
pub const WIN_LEVEL: u32 = 100;

// ── Fruit effects ─────────────────────────────────────────────────────────────

pub const FRUIT_SIZE: f32 = 30.0;
pub const BERRY_HEAL: i32 = 10;
pub const APPLE_SPEED_BONUS: f32 = 2.0;
pub const APPLE_INVULN_MS: u64 = 3000;
pub const PEAR_EXPERIENCE: u32 = 150;
pub const PEAR_HEAL: i32 = 20;
pub const PEAR_MAX_HEALTH_BONUS: i32 = 5;
pub const FLAMEFRUIT_EXPERIENCE: u32 = 100;
pub const FLAMEFRUIT_LURE_MS: u64 = 3000;
pub const MELON_EXPERIENCE: u32 = 200;
pub const MELON_BOOST_MS: u64 = 3050;

// ── Enemies & combat ──────────────────────────────────────────────────────────

pub const ENEMY_SPEED_MIN: f32 = 1.0;
pub const ENEMY_SPEED_MAX: f32 = 3.0;
pub const AGGRO_RADIUS: f32 = ARENA_WIDTH / 5.0;

pub const SPECIAL_ATTACK_DAMAGE: i32 = 250;
pub const SPECIAL_ATTACK_RADIUS: f32 = ARENA_WIDTH / 5.0;
pub const SPECIAL_ATTACK_COOLDOWN_MS: u64 = 30_000;

// ── Spawning ──────────────────────────────────────────────────────────────────

pub const INITIAL_FRUITS: usize = 10;
pub const INITIAL_ENEMIES: usize = 10;
pub const FRUIT_SPAWN_INTERVAL_MS: u64 = 2000;
pub const ENEMY_SPAWN_INTERVAL_MS: u64 = 2000;
pub const BOSS_SPAWN_INTERVAL_MS: u64 = 5000;
pub const MAX_BOSSES: usize = 3;
pub const SUPER_BOSS_FIRST_DELAY_MS: u64 = 30_000;
pub const SUPER_BOSS_RESPAWN_DELAY_MS: u64 = 15_000;
/// Draws attempted when looking for a fruit spot that overlaps nothing.
pub const FRUIT_PLACEMENT_ATTEMPTS: usize = 16;

// ── Presentation timings ──────────────────────────────────────────────────────

pub const BANNER_MS: u64 = 1000;
pub const END_SCREEN_PAUSE_MS: u64 = 3000;
