//! Combat resolution: player strikes, the area attack, enemy pursuit and
//! contact damage, and removal of defeated enemies.

use tracing::{debug, info};

use crate::config::*;
use crate::effects::EffectKind;
use crate::entities::{clamp_to_arena, EnemyTier, Enemy, GameEvent, Player, Position, World};

/// Subtract `damage` from `target`. Returns the tier's experience award when
/// the blow is lethal; removal is left to `reap_defeated`.
pub fn strike(damage: i32, target: &mut Enemy) -> Option<u32> {
    target.health -= damage;
    if target.is_alive() {
        None
    } else {
        Some(target.tier.experience_award())
    }
}

impl Player {
    /// Apply `amount` unless invulnerable or hit within the last
    /// `HIT_COOLDOWN_MS`. Returns `true` if health changed.
    pub fn take_damage(&mut self, amount: i32, now: u64) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        if let Some(last) = self.last_hit {
            if now.saturating_sub(last) < HIT_COOLDOWN_MS {
                return false;
            }
        }
        self.health = (self.health - amount).max(0);
        self.last_hit = Some(now);
        true
    }
}

/// Strike every enemy touching the player with the player's current damage.
/// Returns the number of enemies hit.
pub fn melee(world: &mut World) -> usize {
    let player_bounds = world.player.bounds();
    let damage = world.player.damage;
    let mut hits = 0;
    for enemy in world.enemies.iter_mut() {
        if enemy.bounds().overlaps(&player_bounds) {
            strike(damage, enemy);
            hits += 1;
        }
    }
    if hits > 0 {
        reap_defeated(world);
    }
    hits
}

/// Area attack: `SPECIAL_ATTACK_DAMAGE` to every enemy whose centre lies
/// within `SPECIAL_ATTACK_RADIUS` of the player's centre, then arm the
/// cooldown. Does nothing while the cooldown runs. Returns whether it fired.
pub fn special_attack(world: &mut World) -> bool {
    if !world.player.special_attack_ready() {
        return false;
    }
    let origin = world.player.bounds().center();
    let mut hits = 0;
    for enemy in world.enemies.iter_mut() {
        if enemy.bounds().center().distance(&origin) <= SPECIAL_ATTACK_RADIUS {
            strike(SPECIAL_ATTACK_DAMAGE, enemy);
            hits += 1;
        }
    }
    world
        .player
        .effects
        .arm(EffectKind::SpecialCooldown, world.now, SPECIAL_ATTACK_COOLDOWN_MS);
    info!(hits, "special attack");
    world.events.push(GameEvent::SpecialAttack { hits });
    reap_defeated(world);
    true
}

/// Remove every enemy at or below zero health, awarding its tier's
/// experience once. A super-boss defeat delays the next one.
pub fn reap_defeated(world: &mut World) {
    let mut defeated = Vec::new();
    world.enemies.retain(|e| {
        if e.is_alive() {
            true
        } else {
            defeated.push(e.tier);
            false
        }
    });

    for tier in defeated {
        let award = tier.experience_award();
        debug!(?tier, award, "enemy defeated");
        world.events.push(GameEvent::EnemyDefeated { tier, award });
        if tier == EnemyTier::SuperBoss {
            world.spawner.super_boss_defeated(world.now);
        }
        if world.player.gain_experience(award) {
            world.events.push(GameEvent::LevelUp {
                level: world.player.level,
            });
        }
    }
}

fn step_toward(from: f32, to: f32, speed: f32) -> f32 {
    if from < to {
        (from + speed).min(to)
    } else if from > to {
        (from - speed).max(to)
    } else {
        from
    }
}

fn approach(enemy: &mut Enemy, target: Position) {
    let size = enemy.tier.size();
    let next = Position::new(
        step_toward(enemy.pos.x, target.x, enemy.speed),
        step_toward(enemy.pos.y, target.y, enemy.speed),
    );
    enemy.pos = clamp_to_arena(next, size);
}

/// Move enemies and apply contact damage.
///
/// Inside `AGGRO_RADIUS` an enemy closes on the player and hurts it while
/// their bounds overlap. Otherwise, while a lure is active, lure-following
/// tiers head for the marker. Everyone else stays put.
pub fn pursue(world: &mut World) {
    let now = world.now;
    let lure = if world.player.effects.is_active(EffectKind::Lure) {
        world.player.lure
    } else {
        None
    };

    for enemy in world.enemies.iter_mut() {
        let player_center = world.player.bounds().center();
        if enemy.bounds().center().distance(&player_center) <= AGGRO_RADIUS {
            approach(enemy, world.player.pos);
            if enemy.bounds().overlaps(&world.player.bounds()) {
                let amount = enemy.tier.contact_damage();
                if world.player.take_damage(amount, now) {
                    debug!(tier = ?enemy.tier, amount, health = world.player.health, "player hit");
                    world.events.push(GameEvent::PlayerHit { amount });
                }
            }
        } else if let (Some(marker), true) = (lure, enemy.tier.follows_lure()) {
            approach(enemy, marker);
        }
    }
}
