//! Party roster: stable slot index → actor id

use super::actor::{Actor, ActorId};
use super::state::WorldState;

/// Maximum roster width. Matches the bit width of [`SlotMask`](crate::enumeration::SlotMask).
pub const MAX_PARTY_SIZE: usize = 64;

/// Party slots as reported by the game.
///
/// Slots hold ids only; members are resolved against the world on every query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyState {
    slots: [Option<ActorId>; MAX_PARTY_SIZE],
}

impl Default for PartyState {
    fn default() -> Self {
        Self {
            slots: [None; MAX_PARTY_SIZE],
        }
    }
}

impl PartyState {
    /// Actor id in the slot, if assigned
    pub fn get(&self, slot: usize) -> Option<ActorId> {
        self.slots.get(slot).copied().flatten()
    }

    /// Returns false when the slot is out of range
    pub(crate) fn assign(&mut self, slot: usize, id: Option<ActorId>) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                *entry = id;
                true
            }
            None => false,
        }
    }

    pub fn find_slot(&self, id: ActorId) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(id))
    }

    /// Number of assigned slots
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live member in the slot
    pub fn member<'w>(&self, world: &'w WorldState, slot: usize) -> Option<&'w Actor> {
        self.get(slot).and_then(|id| world.actor(id))
    }

    /// Live members with their slot index, in slot order. Unresolvable ids are skipped.
    pub fn with_slots<'w>(
        &self,
        world: &'w WorldState,
    ) -> impl Iterator<Item = (usize, &'w Actor)> + 'w {
        let slots = self.slots;
        slots
            .into_iter()
            .enumerate()
            .filter_map(move |(slot, id)| id.and_then(|id| world.actor(id)).map(|a| (slot, a)))
    }

    /// Live members without slot index, in slot order
    pub fn members<'w>(&self, world: &'w WorldState) -> impl Iterator<Item = &'w Actor> + 'w {
        self.with_slots(world).map(|(_, actor)| actor)
    }

    /// Live, not dead members with their slot index
    pub fn alive_with_slots<'w>(
        &self,
        world: &'w WorldState,
    ) -> impl Iterator<Item = (usize, &'w Actor)> + 'w {
        self.with_slots(world).filter(|(_, a)| !a.is_dead)
    }
}
