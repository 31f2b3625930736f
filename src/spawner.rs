//! Time-gated population control.
//!
//! Fruits and basic enemies arrive on fixed intervals, bosses on an interval
//! under a population cap, and the single super-boss only once the field is
//! clear of bosses and its respawn delay has passed.

use rand::Rng;
use tracing::{debug, info};

use crate::config::*;
use crate::entities::{Enemy, EnemyTier, Fruit, FruitKind, Position, World};

#[derive(Clone, Debug, PartialEq)]
pub struct Spawner {
    pub last_fruit: u64,
    pub last_enemy: u64,
    pub last_boss: u64,
    /// The super-boss may not appear before this time.
    pub super_boss_allowed_at: u64,
}

impl Spawner {
    /// All periodic timers start at `now`; the first super-boss is held back
    /// by `SUPER_BOSS_FIRST_DELAY_MS`.
    pub fn new(now: u64) -> Self {
        Spawner {
            last_fruit: now,
            last_enemy: now,
            last_boss: now,
            super_boss_allowed_at: now + SUPER_BOSS_FIRST_DELAY_MS,
        }
    }

    pub fn super_boss_defeated(&mut self, now: u64) {
        self.super_boss_allowed_at = now + SUPER_BOSS_RESPAWN_DELAY_MS;
        info!(allowed_at = self.super_boss_allowed_at, "super-boss defeated");
    }
}

/// Uniform top-left position for a square of `size` fully inside the arena.
pub fn random_position(rng: &mut impl Rng, size: f32) -> Position {
    Position::new(
        rng.gen_range(0.0..=ARENA_WIDTH - size),
        rng.gen_range(0.0..=ARENA_HEIGHT - size),
    )
}

pub fn random_enemy(rng: &mut impl Rng, tier: EnemyTier) -> Enemy {
    let pos = random_position(rng, tier.size());
    let speed = rng.gen_range(ENEMY_SPEED_MIN..ENEMY_SPEED_MAX);
    Enemy::new(tier, pos, speed)
}

/// A fruit of random kind placed where it overlaps neither the player nor
/// another fruit. Falls back to the last draw if no free spot turns up.
pub fn random_fruit(world: &World, rng: &mut impl Rng) -> Fruit {
    let kind = FruitKind::ALL[rng.gen_range(0..FruitKind::COUNT)];
    let mut fruit = Fruit {
        pos: random_position(rng, FRUIT_SIZE),
        kind,
    };
    for _ in 1..FRUIT_PLACEMENT_ATTEMPTS {
        if is_free(world, &fruit) {
            break;
        }
        fruit.pos = random_position(rng, FRUIT_SIZE);
    }
    fruit
}

fn is_free(world: &World, fruit: &Fruit) -> bool {
    let bounds = fruit.bounds();
    !world.player.bounds().overlaps(&bounds)
        && !world.fruits.iter().any(|f| f.bounds().overlaps(&bounds))
}

/// Seed a new game with its starting fruits and basic enemies.
pub fn populate_initial(world: &mut World, rng: &mut impl Rng) {
    for _ in 0..INITIAL_FRUITS {
        let fruit = random_fruit(world, rng);
        world.fruits.push(fruit);
    }
    for _ in 0..INITIAL_ENEMIES {
        world.enemies.push(random_enemy(rng, EnemyTier::Basic));
    }
}

/// Run every spawn rule that is due at `world.now`.
pub fn spawn_due(world: &mut World, rng: &mut impl Rng) {
    let now = world.now;

    if now.saturating_sub(world.spawner.last_fruit) >= FRUIT_SPAWN_INTERVAL_MS {
        let fruit = random_fruit(world, rng);
        debug!(kind = ?fruit.kind, "fruit spawned");
        world.fruits.push(fruit);
        world.spawner.last_fruit = now;
    }

    if now.saturating_sub(world.spawner.last_enemy) >= ENEMY_SPAWN_INTERVAL_MS {
        world.enemies.push(random_enemy(rng, EnemyTier::Basic));
        world.spawner.last_enemy = now;
    }

    let bosses = world.count_tier(EnemyTier::Boss);
    if bosses < MAX_BOSSES
        && now.saturating_sub(world.spawner.last_boss) >= BOSS_SPAWN_INTERVAL_MS
    {
        debug!(bosses = bosses + 1, "boss spawned");
        world.enemies.push(random_enemy(rng, EnemyTier::Boss));
        world.spawner.last_boss = now;
    }

    if super_boss_may_spawn(world) {
        info!(now, "super-boss spawned");
        world.enemies.push(random_enemy(rng, EnemyTier::SuperBoss));
    }
}

/// No bosses, no super-boss, and the respawn delay has elapsed.
pub fn super_boss_may_spawn(world: &World) -> bool {
    world.count_tier(EnemyTier::Boss) == 0
        && world.count_tier(EnemyTier::SuperBoss) == 0
        && world.now >= world.spawner.super_boss_allowed_at
}
