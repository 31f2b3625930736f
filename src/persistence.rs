//! Save and load of the player snapshot.
//!
//! The file is the bincode encoding of `Player` and nothing else: no header,
//! no version, no checksum. A file written by a build with a different
//! `Player` layout is rejected as corrupt rather than guessed at.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use bincode::Options;
use tracing::{info, warn};

use crate::config::{BASE_DAMAGE, BOOSTED_DAMAGE};
use crate::effects::EffectKind;
use crate::entities::{GameStatus, Player, World};
use crate::error::GameError;
use crate::spawner::Spawner;

/// Fixed-width little-endian integers; a file must end where the snapshot does.
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Write `player` to `path`, replacing any existing file.
pub fn save(player: &Player, path: &Path) -> Result<(), GameError> {
    let bytes = codec().serialize(player)?;
    fs::write(path, bytes)?;
    info!(path = %path.display(), level = player.level, "game saved");
    Ok(())
}

/// Stamp the player with the current game clock and save it.
pub fn save_game(world: &mut World, path: &Path) -> Result<(), GameError> {
    world.player.saved_at = world.now;
    save(&world.player, path)
}

/// Read a player snapshot. A missing file is `Ok(None)`.
pub fn load(path: &Path) -> Result<Option<Player>, GameError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let corrupt = |reason: String| GameError::CorruptSave {
        path: path.to_path_buf(),
        reason,
    };

    let player: Player = codec()
        .deserialize(&bytes)
        .map_err(|e| corrupt(e.to_string()))?;
    validate(&player).map_err(|reason| corrupt(reason.to_string()))?;
    Ok(Some(player))
}

/// Decoding only proves the bytes fit the layout; this checks the values.
fn validate(player: &Player) -> Result<(), &'static str> {
    if player.max_health <= 0 {
        return Err("max health is not positive");
    }
    if player.health < 0 || player.health > player.max_health {
        return Err("health outside [0, max_health]");
    }
    if player.damage != BASE_DAMAGE && player.damage != BOOSTED_DAMAGE {
        return Err("damage is neither base nor boosted");
    }
    if player.damage == BOOSTED_DAMAGE && !player.effects.is_active(EffectKind::DamageBoost) {
        return Err("boosted damage without a running boost");
    }
    if player.lure.is_some() && !player.effects.is_active(EffectKind::Lure) {
        return Err("lure marker without a running lure");
    }
    if player.level == 0 {
        return Err("level is zero");
    }
    if !player.pos.x.is_finite() || !player.pos.y.is_finite() || !player.speed.is_finite() {
        return Err("non-finite position or speed");
    }
    let after_save = |t: u64| t > player.saved_at;
    if after_save(player.last_regen) || player.last_hit.is_some_and(after_save) {
        return Err("timestamp later than the save clock");
    }
    Ok(())
}

/// Replace the world's player with the saved one, resume the game clock
/// where the save left it and clear every fruit and enemy. Returns `false`
/// (world untouched) when there is no save file.
pub fn load_game(world: &mut World, path: &Path) -> Result<bool, GameError> {
    match load(path)? {
        Some(player) => {
            world.now = player.saved_at;
            world.spawner = Spawner::new(world.now);
            world.player = player;
            world.fruits.clear();
            world.enemies.clear();
            world.events.clear();
            world.status = GameStatus::Playing;
            info!(
                path = %path.display(),
                level = world.player.level,
                now = world.now,
                "game loaded"
            );
            Ok(true)
        }
        None => {
            warn!(path = %path.display(), "no save file to load");
            Ok(false)
        }
    }
}
