//! Timed player effects.
//!
//! Every buff or cooldown is one slot in a small fixed table. A slot is
//! active while `now < expires_at` and is reported as expired exactly once,
//! by the first `advance` call that sees its deadline pass. The player then
//! runs that effect's revert action; nothing else touches the fields an
//! effect owns.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BASE_DAMAGE, REGEN_AMOUNT, REGEN_INTERVAL_MS};
use crate::entities::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Shimmering Apple: incoming damage is ignored.
    Invulnerable,
    /// Moonbeam Melon: player damage raised to `BOOSTED_DAMAGE`.
    DamageBoost,
    /// Flamefruit: basic enemies out of aggro range walk to the lure marker.
    Lure,
    /// Area attack recharge.
    SpecialCooldown,
}

impl EffectKind {
    pub const COUNT: usize = 4;
    pub const ALL: [EffectKind; EffectKind::COUNT] = [
        EffectKind::Invulnerable,
        EffectKind::DamageBoost,
        EffectKind::Lure,
        EffectKind::SpecialCooldown,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Undo whatever this effect changed on the player.
    fn revert(self, player: &mut Player) {
        match self {
            EffectKind::DamageBoost => player.damage = BASE_DAMAGE,
            EffectKind::Lure => player.lure = None,
            // Read through `Effects::is_active`; nothing to restore.
            EffectKind::Invulnerable | EffectKind::SpecialCooldown => {}
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub active: bool,
    pub expires_at: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effects {
    slots: [TimedEffect; EffectKind::COUNT],
}

impl Effects {
    /// Start `kind`, or extend it if it is already running.
    pub fn arm(&mut self, kind: EffectKind, now: u64, duration_ms: u64) {
        self.slots[kind.index()] = TimedEffect {
            active: true,
            expires_at: now + duration_ms,
        };
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.slots[kind.index()].active
    }

    pub fn get(&self, kind: EffectKind) -> TimedEffect {
        self.slots[kind.index()]
    }

    /// Milliseconds left on `kind`, zero when inactive.
    pub fn remaining(&self, kind: EffectKind, now: u64) -> u64 {
        let slot = self.get(kind);
        if slot.active {
            slot.expires_at.saturating_sub(now)
        } else {
            0
        }
    }

    /// Deactivate every slot whose deadline has passed and return those kinds.
    /// Calling again with the same `now` returns nothing.
    pub fn advance(&mut self, now: u64) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for kind in EffectKind::ALL {
            let slot = &mut self.slots[kind.index()];
            if slot.active && now >= slot.expires_at {
                slot.active = false;
                expired.push(kind);
            }
        }
        expired
    }
}

impl Player {
    /// Expire finished effects (running each one's revert once) and apply
    /// regeneration. Called once per tick before anything moves.
    pub fn advance(&mut self, now: u64) {
        for kind in self.effects.advance(now) {
            debug!(?kind, now, "effect expired");
            kind.revert(self);
        }
        self.regenerate(now);
    }

    /// +`REGEN_AMOUNT` health if below max and at least `REGEN_INTERVAL_MS`
    /// has passed since the last regeneration. The interval restarts from
    /// `now`, so late ticks push later regens back.
    pub fn regenerate(&mut self, now: u64) -> bool {
        if self.health < self.max_health
            && now.saturating_sub(self.last_regen) >= REGEN_INTERVAL_MS
        {
            self.heal(REGEN_AMOUNT);
            self.last_regen = now;
            true
        } else {
            false
        }
    }
}
