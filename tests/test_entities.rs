use elysian_grove::config::*;
use elysian_grove::effects::EffectKind;
use elysian_grove::entities::*;

fn origin() -> Position {
    Position::new(0.0, 0.0)
}

// ── Player construction & movement ────────────────────────────────────────────

#[test]
fn new_player_defaults() {
    let p = Player::new(0);
    assert_eq!(p.level, 1);
    assert_eq!(p.experience, 0);
    assert_eq!(p.health, PLAYER_START_HEALTH);
    assert_eq!(p.max_health, PLAYER_START_HEALTH);
    assert_eq!(p.damage, BASE_DAMAGE);
    assert_eq!(p.inventory.total(), 0);
    assert_eq!(p.last_hit, None);
    assert_eq!(p.pos, Position::new(377.5, 247.5)); // centred in 800 × 540
}

#[test]
fn move_scales_by_speed() {
    let mut p = Player::new(0);
    p.move_by(1, -1);
    assert_eq!(p.pos, Position::new(377.5 + PLAYER_BASE_SPEED, 247.5 - PLAYER_BASE_SPEED));
}

#[test]
fn move_clamps_to_arena() {
    let mut p = Player::new(0);
    p.pos = origin();
    p.move_by(-1, -1);
    assert_eq!(p.pos, origin());

    p.pos = Position::new(ARENA_WIDTH - PLAYER_SIZE - 1.0, ARENA_HEIGHT - PLAYER_SIZE);
    p.move_by(1, 1);
    assert_eq!(p.pos, Position::new(ARENA_WIDTH - PLAYER_SIZE, ARENA_HEIGHT - PLAYER_SIZE));
}

// ── Leveling ──────────────────────────────────────────────────────────────────

#[test]
fn level_up_discards_surplus_experience() {
    // 950 + 100 base + 150 pear bonus = 1200 → level 2, experience 0
    let mut p = Player::new(0);
    p.experience = 950;
    assert!(p.collect_fruit(FruitKind::EtherealPear, origin(), 0));
    assert_eq!(p.level, 2);
    assert_eq!(p.experience, 0);
}

#[test]
fn reaching_threshold_exactly_levels_up() {
    let mut p = Player::new(0);
    p.experience = 900;
    assert!(p.collect_fruit(FruitKind::GleamBerry, origin(), 0));
    assert_eq!(p.level, 2);
    assert_eq!(p.experience, 0);
}

#[test]
fn experience_below_threshold_accumulates() {
    let mut p = Player::new(0);
    assert!(!p.collect_fruit(FruitKind::GleamBerry, origin(), 0));
    assert!(!p.gain_experience(50));
    assert_eq!(p.experience, 150);
    assert_eq!(p.level, 1);
}

// ── Fruit effects ─────────────────────────────────────────────────────────────

#[test]
fn every_fruit_bumps_exactly_its_own_counter() {
    for kind in FruitKind::ALL {
        let mut p = Player::new(0);
        p.collect_fruit(kind, origin(), 0);
        assert_eq!(p.inventory.count(kind), 1, "{:?}", kind);
        assert_eq!(p.inventory.total(), 1, "{:?}", kind);
    }
}

#[test]
fn gleam_berry_heals_up_to_max() {
    let mut p = Player::new(0);
    p.health = 95;
    p.collect_fruit(FruitKind::GleamBerry, origin(), 0);
    assert_eq!(p.health, 100);
    assert_eq!(p.experience, 100);
}

#[test]
fn shimmering_apple_speeds_up_and_grants_invulnerability() {
    let mut p = Player::new(0);
    p.collect_fruit(FruitKind::ShimmeringApple, origin(), 500);
    assert_eq!(p.speed, PLAYER_BASE_SPEED + APPLE_SPEED_BONUS);
    assert!(p.is_invulnerable());
    assert_eq!(p.effects.get(EffectKind::Invulnerable).expires_at, 3500);
}

#[test]
fn ethereal_pear_raises_max_and_keeps_health_in_bounds() {
    let mut p = Player::new(0);
    p.health = 90;
    p.collect_fruit(FruitKind::EtherealPear, origin(), 0);
    assert_eq!(p.max_health, 105);
    assert_eq!(p.health, 105); // 90 + 20 capped at the new max
    assert_eq!(p.experience, 250);
}

#[test]
fn flamefruit_places_lure_at_fruit() {
    let mut p = Player::new(0);
    let at = Position::new(120.0, 80.0);
    p.collect_fruit(FruitKind::Flamefruit, at, 0);
    assert_eq!(p.lure, Some(at));
    assert!(p.effects.is_active(EffectKind::Lure));
    assert_eq!(p.experience, 200);
}

#[test]
fn moonbeam_melon_boosts_damage() {
    let mut p = Player::new(0);
    p.collect_fruit(FruitKind::MoonbeamMelon, origin(), 0);
    assert_eq!(p.damage, BOOSTED_DAMAGE);
    assert_eq!(p.effects.get(EffectKind::DamageBoost).expires_at, MELON_BOOST_MS);
    assert_eq!(p.experience, 300);
}

// ── Enemy tiers ───────────────────────────────────────────────────────────────

#[test]
fn tier_table() {
    assert_eq!(EnemyTier::Basic.max_health(), 100);
    assert_eq!(EnemyTier::Boss.max_health(), 500);
    assert_eq!(EnemyTier::SuperBoss.max_health(), 5000);

    let awards: Vec<u32> = [EnemyTier::Basic, EnemyTier::Boss, EnemyTier::SuperBoss]
        .iter()
        .map(|t| t.experience_award())
        .collect();
    assert_eq!(awards, vec![50, 550, 1050]);

    assert!(EnemyTier::Basic.follows_lure());
    assert!(!EnemyTier::Boss.follows_lure());
    assert!(!EnemyTier::SuperBoss.follows_lure());
}

#[test]
fn enemy_starts_at_tier_health() {
    let e = Enemy::new(EnemyTier::Boss, origin(), 1.5);
    assert_eq!(e.health, 500);
    assert!(e.is_alive());
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[test]
fn bounds_overlap_is_strict() {
    let a = Bounds::new(origin(), 45.0);
    let touching = Bounds::new(Position::new(45.0, 0.0), 45.0);
    let inside = Bounds::new(Position::new(44.0, 44.0), 30.0);
    assert!(!a.overlaps(&touching));
    assert!(a.overlaps(&inside));
    assert!(inside.overlaps(&a));
}

#[test]
fn world_clone_is_independent() {
    let original = World::new();
    let mut cloned = original.clone();

    cloned.player.level = 9;
    cloned.enemies.push(Enemy::new(EnemyTier::Basic, origin(), 1.0));

    assert_eq!(original.player.level, 1);
    assert!(original.enemies.is_empty());
}
