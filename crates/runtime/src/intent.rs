//! Player intents and the binding sets states claim for them.
use bitflags::bitflags;
use tactics_core::ScreenPoint;

/// A single input gesture, already decoded from the device layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    /// Select / confirm at a pointer position.
    Primary { point: ScreenPoint },
    /// Order / back out at a pointer position.
    Secondary { point: ScreenPoint },
    /// Pointer moved without a click.
    Hover { point: ScreenPoint },
    /// Numbered action button, zero based.
    ActionSlot(usize),
    /// Cycle through candidates; `reverse` when shift is held.
    Tab { reverse: bool },
    Cancel,
}

impl Intent {
    /// Binding an intent is routed through.
    pub fn binding(&self) -> IntentSet {
        match self {
            Intent::Primary { .. } => IntentSet::PRIMARY,
            Intent::Secondary { .. } => IntentSet::SECONDARY,
            Intent::Hover { .. } => IntentSet::HOVER,
            Intent::ActionSlot(_) => IntentSet::ACTION_SLOTS,
            Intent::Tab { .. } => IntentSet::TAB,
            Intent::Cancel => IntentSet::CANCEL,
        }
    }
}

bitflags! {
    /// Input bindings a state owns while it is active.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct IntentSet: u8 {
        const PRIMARY = 1 << 0;
        const SECONDARY = 1 << 1;
        const HOVER = 1 << 2;
        const ACTION_SLOTS = 1 << 3;
        const TAB = 1 << 4;
        const CANCEL = 1 << 5;
    }
}
