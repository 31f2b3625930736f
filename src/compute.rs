/// Per-tick simulation.
///
/// `tick` is the only place the phases of a frame are ordered: timers,
/// movement, collisions and combat, spawning, then the win/lose check. All
/// randomness comes through the injected RNG so callers control determinism.

use rand::Rng;
use tracing::debug;

use crate::combat;
use crate::config::WIN_LEVEL;
use crate::entities::{Fruit, GameEvent, GameStatus, Player, World};
use crate::spawner;

/// Player intent for one tick, already debounced by the input layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    /// -1, 0 or 1 on each axis.
    pub dx: i8,
    pub dy: i8,
    pub attack: bool,
    pub special: bool,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// A new game: fresh player, starting fruits and enemies, clock at zero.
pub fn new_game(rng: &mut impl Rng) -> World {
    let mut world = World::new();
    spawner::populate_initial(&mut world, rng);
    world
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the world by `dt_ms`. A finished game is left untouched.
pub fn tick(world: &mut World, input: &TickInput, dt_ms: u64, rng: &mut impl Rng) {
    if world.status != GameStatus::Playing {
        return;
    }
    world.events.clear();
    world.now += dt_ms;

    // ── 1. Timed effects & regeneration ──────────────────────────────────────
    world.player.advance(world.now);

    // ── 2. Movement (enemy contact damage lands here) ────────────────────────
    world.player.move_by(input.dx, input.dy);
    combat::pursue(world);

    // ── 3. Pickups & attacks ─────────────────────────────────────────────────
    collect_fruits(world);
    if input.special {
        combat::special_attack(world);
    }
    if input.attack {
        combat::melee(world);
    }

    // ── 4. Spawning ──────────────────────────────────────────────────────────
    spawner::spawn_due(world, rng);

    // ── 5. Status ────────────────────────────────────────────────────────────
    world.status = status_of(&world.player);
}

/// Take every fruit the player overlaps out of the world in one pass, then
/// apply each. A fruit can therefore be collected at most once.
pub fn collect_fruits(world: &mut World) -> usize {
    let player_bounds = world.player.bounds();
    let mut collected: Vec<Fruit> = Vec::new();
    world.fruits.retain(|f| {
        if f.bounds().overlaps(&player_bounds) {
            collected.push(f.clone());
            false
        } else {
            true
        }
    });

    for fruit in &collected {
        debug!(kind = ?fruit.kind, "fruit collected");
        world.events.push(GameEvent::FruitCollected(fruit.kind));
        let center = fruit.bounds().center();
        if world.player.collect_fruit(fruit.kind, center, world.now) {
            world.events.push(GameEvent::LevelUp {
                level: world.player.level,
            });
        }
    }
    collected.len()
}

pub fn status_of(player: &Player) -> GameStatus {
    if player.health <= 0 {
        GameStatus::Lost
    } else if player.level >= WIN_LEVEL {
        GameStatus::Won
    } else {
        GameStatus::Playing
    }
}
