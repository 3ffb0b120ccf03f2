//! Death sequencing.
//!
//! A unit whose health reaches zero is flagged `DYING` at once, so it can no
//! longer act or be targeted, but keeps its tile. It is finalized on a later
//! tick, once its attacker has stopped attacking or the configured wait limit
//! has run out, whichever comes first.

use crate::env::{AnimationTag, AnimatorFlag, Collaborators};
use crate::state::{BufferTimer, TileId, UnitId};
use crate::unit::{StatusFlags, Weapon};

use super::{Battle, CombatEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingDeath {
    unit: UnitId,
    attacker: Option<UnitId>,
    limit: BufferTimer,
}

/// A weapon left on the ground by a dead unit.
#[derive(Clone, Debug, PartialEq)]
pub struct DroppedWeapon {
    pub tile: TileId,
    pub weapon: Weapon,
}

impl Battle {
    pub(crate) fn begin_death(
        &mut self,
        unit: UnitId,
        attacker: Option<UnitId>,
        collab: &mut Collaborators<'_>,
    ) {
        if self.deaths.iter().any(|death| death.unit == unit) {
            return;
        }
        let Some(victim) = self.units.get_mut(&unit) else {
            return;
        };
        victim.set_flag(StatusFlags::ACTING, false);
        victim.set_flag(StatusFlags::DYING, true);
        victim.dodge_window = None;
        collab.presentation.set_flag(unit, AnimatorFlag::Aiming, false);

        tracing::info!("{} is down", unit);
        self.deaths.push(PendingDeath {
            unit,
            attacker,
            limit: BufferTimer::start(&self.clock, self.config.death_wait_limit()),
        });
        self.emit(CombatEvent::UnitDowned { unit, attacker });
    }

    pub(crate) fn finalize_deaths(&mut self, collab: &mut Collaborators<'_>) {
        let pending = std::mem::take(&mut self.deaths);
        for death in pending {
            let attacking = death
                .attacker
                .and_then(|attacker| self.units.get(&attacker))
                .is_some_and(|attacker| attacker.has_flag(StatusFlags::ATTACKING));

            if !attacking {
                self.finalize_death(death.unit, collab);
            } else if death.limit.is_ready(&self.clock) {
                tracing::warn!(
                    "{} still attacking after the death wait limit; finalizing {}",
                    death.attacker.map_or_else(String::new, |a| a.to_string()),
                    death.unit
                );
                self.finalize_death(death.unit, collab);
            } else {
                self.deaths.push(death);
            }
        }
    }

    fn finalize_death(&mut self, unit: UnitId, collab: &mut Collaborators<'_>) {
        let Some(victim) = self.units.get_mut(&unit) else {
            return;
        };
        victim.set_flag(StatusFlags::DYING, false);
        victim.set_flag(StatusFlags::DEAD, true);
        let tile = victim.tile();
        victim.set_tile(None);
        let weapon = victim.inventory.drop_equipped();

        collab.presentation.play(unit, AnimationTag::Death);
        tracing::info!("{} died", unit);

        if let Some(tile) = tile {
            if let Err(err) = self.grid.vacate(tile, unit) {
                tracing::error!("occupancy desync while releasing {}: {}", tile, err);
            }
            if let Some(weapon) = weapon {
                self.emit(CombatEvent::WeaponDropped {
                    unit,
                    tile,
                    weapon: weapon.name().to_owned(),
                });
                self.dropped.push(DroppedWeapon { tile, weapon });
            }
        }
        self.emit(CombatEvent::UnitDied { unit });
    }
}
