use bitflags::bitflags;

bitflags! {
    /// Transient status bits carried by a unit.
    ///
    /// Ownership of each bit:
    /// - `MOVING`, `VAULTING`: set and cleared by the move action.
    /// - `AIMING`, `ATTACKING`: set and cleared by the shoot actions.
    /// - `RELOADING`: reload action. `STOWING`: swap action.
    /// - `USING_ITEM`: item action.
    /// - `DODGING`: set by shot resolution on a miss, cleared by the battle
    ///   tick once the dodge window expires.
    /// - `DYING`, `DEAD`: death sequencing in the battle aggregate.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatusFlags: u16 {
        const MOVING     = 1 << 0;
        const AIMING     = 1 << 1;
        const ATTACKING  = 1 << 2;
        const STOWING    = 1 << 3;
        const RELOADING  = 1 << 4;
        const DODGING    = 1 << 5;
        const VAULTING   = 1 << 6;
        const USING_ITEM = 1 << 7;
        const DYING      = 1 << 8;
        const DEAD       = 1 << 9;

        /// Union polled by the turn orchestrator.
        const ACTING = Self::MOVING.bits()
            | Self::ATTACKING.bits()
            | Self::STOWING.bits()
            | Self::RELOADING.bits()
            | Self::AIMING.bits()
            | Self::DODGING.bits();

        const INCAPACITATED = Self::DYING.bits() | Self::DEAD.bits();
    }
}

impl StatusFlags {
    pub fn is_acting(self) -> bool {
        self.intersects(Self::ACTING)
    }

    pub fn is_incapacitated(self) -> bool {
        self.intersects(Self::INCAPACITATED)
    }
}
