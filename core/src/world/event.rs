use glam::Vec3;
use smallvec::SmallVec;

use super::actor::{ActionId, Actor, ActorId, CastInfo, Status, Tether};

/// One target hit by a resolved cast, with the raw effect words reported by the game.
#[derive(Debug, Clone, PartialEq)]
pub struct CastTarget {
    pub id: ActorId,
    pub effects: [u64; 8],
}

/// A resolved ability application. Tick-scoped: dispatched once, never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct CastEvent {
    pub caster_id: ActorId,
    /// Note that the actually affected targets may differ completely
    pub main_target_id: Option<ActorId>,
    pub action: ActionId,
    pub targets: SmallVec<[CastTarget; 8]>,
    pub source_sequence: u32,
}

impl CastEvent {
    pub fn new(caster_id: ActorId, action: ActionId) -> Self {
        Self {
            caster_id,
            main_target_id: None,
            action,
            targets: SmallVec::new(),
            source_sequence: 0,
        }
    }

    pub fn is(&self, action: ActionId) -> bool {
        self.action == action
    }

    pub fn hit(&self, id: ActorId) -> bool {
        self.targets.iter().any(|t| t.id == id)
    }
}

/// Change notifications raised by [`WorldState`](super::WorldState), exactly one per
/// applied change, in the order the changes were applied.
///
/// Variants carry whatever snapshot a consumer needs after the change already
/// happened (the removed status, the finished cast, the removed actor).
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    // Actor lifecycle
    ActorAdded {
        id: ActorId,
    },
    ActorRemoved {
        actor: Box<Actor>,
    },

    // Actor state changes
    ActorMoved {
        id: ActorId,
        from: Vec3,
        to: Vec3,
        rotation: f32,
    },
    HpChanged {
        id: ActorId,
        old_hp: u32,
        hp: u32,
        max_hp: u32,
    },
    TargetableChanged {
        id: ActorId,
        targetable: bool,
    },
    DeadChanged {
        id: ActorId,
        dead: bool,
    },
    TargetChanged {
        id: ActorId,
        target: Option<ActorId>,
    },

    // Casts
    CastStarted {
        id: ActorId,
        cast: CastInfo,
    },
    CastFinished {
        id: ActorId,
        cast: CastInfo,
    },

    // Tethers
    TetherAdded {
        id: ActorId,
        tether: Tether,
    },
    TetherRemoved {
        id: ActorId,
        tether: Tether,
    },

    // Statuses
    StatusGained {
        id: ActorId,
        index: usize,
        status: Status,
    },
    StatusLost {
        id: ActorId,
        index: usize,
        status: Status,
    },
    StatusChanged {
        id: ActorId,
        index: usize,
        status: Status,
    },

    // World-level events
    IconShown {
        actor_id: ActorId,
        icon_id: u32,
    },
    EnvControl {
        feature_id: u32,
        index: u8,
        state: u32,
    },
    CastResolved(CastEvent),
    PartySlotChanged {
        slot: usize,
        id: Option<ActorId>,
    },
}

impl WorldEvent {
    /// The actor this event describes, if it is actor-scoped
    pub fn actor_id(&self) -> Option<ActorId> {
        match self {
            Self::ActorAdded { id }
            | Self::ActorMoved { id, .. }
            | Self::HpChanged { id, .. }
            | Self::TargetableChanged { id, .. }
            | Self::DeadChanged { id, .. }
            | Self::TargetChanged { id, .. }
            | Self::CastStarted { id, .. }
            | Self::CastFinished { id, .. }
            | Self::TetherAdded { id, .. }
            | Self::TetherRemoved { id, .. }
            | Self::StatusGained { id, .. }
            | Self::StatusLost { id, .. }
            | Self::StatusChanged { id, .. } => Some(*id),
            Self::ActorRemoved { actor } => Some(actor.id),
            Self::IconShown { actor_id, .. } => Some(*actor_id),
            Self::CastResolved(event) => Some(event.caster_id),
            Self::EnvControl { .. } | Self::PartySlotChanged { .. } => None,
        }
    }
}
