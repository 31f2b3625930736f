use elysian_grove::compute::{new_game, tick, TickInput};
use elysian_grove::config::*;
use elysian_grove::effects::EffectKind;
use elysian_grove::entities::*;
use elysian_grove::persistence::{load, load_game, save, save_game};
use elysian_grove::GameError;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

/// A player far from the defaults in every field.
fn seasoned_player() -> Player {
    let mut p = Player::new(0);
    let at = Position::new(120.0, 80.0);
    p.collect_fruit(FruitKind::EtherealPear, at, 100);
    p.collect_fruit(FruitKind::ShimmeringApple, at, 200);
    p.collect_fruit(FruitKind::Flamefruit, at, 300);
    p.collect_fruit(FruitKind::MoonbeamMelon, at, 400);
    p.effects.arm(EffectKind::SpecialCooldown, 500, SPECIAL_ATTACK_COOLDOWN_MS);
    p.pos = Position::new(12.5, 300.0);
    p.level = 7;
    p.experience = 420;
    p.health = 63;
    p.last_hit = Some(1234);
    p.last_regen = 999;
    p.saved_at = 2000;
    p
}

fn write_raw(path: &std::path::Path, player: &Player) {
    std::fs::write(path, bincode::serialize(player).unwrap()).unwrap();
}

#[test]
fn save_then_load_reproduces_every_field() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("savegame.dat");
    let player = seasoned_player();

    save(&player, &path).unwrap();
    let loaded = load(&path).unwrap().expect("save file present");

    assert_eq!(loaded, player);
    assert_eq!(loaded.inventory.count(FruitKind::MoonbeamMelon), 1);
    assert_eq!(loaded.damage, BOOSTED_DAMAGE);
    assert_eq!(loaded.lure, Some(Position::new(120.0, 80.0)));
}

#[test]
fn save_overwrites_previous_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("savegame.dat");

    save(&seasoned_player(), &path).unwrap();
    let fresh = Player::new(0);
    save(&fresh, &path).unwrap();

    assert_eq!(load(&path).unwrap(), Some(fresh));
}

#[test]
fn missing_file_is_not_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nothing-here.dat");
    assert_eq!(load(&path).unwrap(), None);

    let mut world = new_game(&mut StdRng::seed_from_u64(1));
    assert!(!load_game(&mut world, &path).unwrap());
    assert_eq!(world.fruits.len(), INITIAL_FRUITS);
    assert_eq!(world.enemies.len(), INITIAL_ENEMIES);
}

#[test]
fn garbage_is_reported_as_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("savegame.dat");

    std::fs::write(&path, b"not a save").unwrap();
    assert!(matches!(load(&path), Err(GameError::CorruptSave { .. })));

    std::fs::write(&path, b"").unwrap();
    assert!(matches!(load(&path), Err(GameError::CorruptSave { .. })));

    // A valid snapshot followed by anything else is not a snapshot.
    save(&seasoned_player(), &path).unwrap();
    let mut bytes = std::fs::read(&path).unwrap();
    bytes.extend_from_slice(b"extra");
    std::fs::write(&path, bytes).unwrap();
    assert!(matches!(load(&path), Err(GameError::CorruptSave { .. })));
}

#[test]
fn out_of_range_values_are_reported_as_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("savegame.dat");

    let mut p = Player::new(0);
    p.health = p.max_health + 1;
    write_raw(&path, &p);
    assert!(matches!(load(&path), Err(GameError::CorruptSave { .. })));

    let mut p = Player::new(0);
    p.damage = 37;
    write_raw(&path, &p);
    assert!(matches!(load(&path), Err(GameError::CorruptSave { .. })));

    let mut p = Player::new(0);
    p.last_hit = Some(500);
    write_raw(&path, &p);
    assert!(matches!(load(&path), Err(GameError::CorruptSave { .. })));
}

#[test]
fn effect_leftovers_without_their_timer_are_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("savegame.dat");

    // Boost that could never revert.
    let mut p = Player::new(0);
    p.damage = BOOSTED_DAMAGE;
    write_raw(&path, &p);
    assert!(matches!(load(&path), Err(GameError::CorruptSave { .. })));

    // Lure marker that would never clear.
    let mut p = Player::new(0);
    p.lure = Some(Position::new(10.0, 10.0));
    write_raw(&path, &p);
    assert!(matches!(load(&path), Err(GameError::CorruptSave { .. })));

    // The same values with their effects running are fine.
    let mut p = Player::new(0);
    let at = Position::new(10.0, 10.0);
    p.collect_fruit(FruitKind::MoonbeamMelon, at, 0);
    p.collect_fruit(FruitKind::Flamefruit, at, 0);
    write_raw(&path, &p);
    assert_eq!(load(&path).unwrap(), Some(p));
}

#[test]
fn load_game_restores_player_and_clears_populations() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("savegame.dat");
    let player = seasoned_player();
    save(&player, &path).unwrap();

    let mut world = new_game(&mut StdRng::seed_from_u64(7));
    assert!(!world.fruits.is_empty());
    assert!(!world.enemies.is_empty());

    assert!(load_game(&mut world, &path).unwrap());
    assert_eq!(world.player, player);
    assert!(world.fruits.is_empty());
    assert!(world.enemies.is_empty());
    assert_eq!(world.status, GameStatus::Playing);
    assert_eq!(world.now, player.saved_at);
    assert_eq!(world.spawner.last_fruit, player.saved_at);
    assert_eq!(
        world.spawner.super_boss_allowed_at,
        player.saved_at + SUPER_BOSS_FIRST_DELAY_MS
    );
}

#[test]
fn save_game_stamps_the_clock() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("savegame.dat");
    let mut world = World::new();
    world.now = 12_345;

    save_game(&mut world, &path).unwrap();
    assert_eq!(load(&path).unwrap().unwrap().saved_at, 12_345);
}

#[test]
fn late_save_keeps_the_one_second_hit_cooldown() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("savegame.dat");

    // Ten minutes in, just hit.
    let mut world = World::new();
    world.now = 600_000;
    world.player.last_hit = Some(600_000);
    world.player.last_regen = 600_000;
    save_game(&mut world, &path).unwrap();

    let mut world = World::new();
    assert!(load_game(&mut world, &path).unwrap());
    let boss = Enemy::new(EnemyTier::Boss, world.player.pos, 2.0);
    world.enemies.push(boss);

    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..40 {
        tick(&mut world, &TickInput::default(), TICK_MS, &mut rng);
    }
    assert_eq!(world.now, 600_000 + 40 * TICK_MS);
    assert_eq!(world.player.health, PLAYER_START_HEALTH - 10);
    assert_eq!(world.player.last_hit, Some(600_000 + 31 * TICK_MS));
}
