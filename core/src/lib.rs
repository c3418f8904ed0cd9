pub mod component;
pub mod config;
pub mod encounter;
pub mod enumeration;
pub mod geometry;
pub mod render;
pub mod state_machine;
pub mod world;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use bossmod_types::{ColorCategory, EngineConfig, StateHint, TextHint};
pub use component::{
    CastCounter, ClosestBait, Component, ComponentFactory, ComponentSet, EncounterContext,
    SelfTargetedAoe, SharedTankbuster, SpreadFromCastTargets, TextHints,
};
pub use config::{ConfigError, EngineConfigExt};
pub use encounter::{
    Arena, ArenaBounds, BossEncounter, Diagnostic, EncounterError, EncounterFactory,
    EncounterManager, EncounterOutput, EncounterRegistry, ErrorLog, SlotOutput,
};
pub use enumeration::{ActorEnumeration, SlotEnumeration, SlotMask};
pub use geometry::AoeShape;
pub use render::{RenderData, RenderPrimitive};
pub use state_machine::{
    MachineStatus, StateId, StateMachine, StateMachineBuilder, StateMachineDefinition,
    StateMachineError, UpcomingState,
};
pub use world::{
    ActionId, Actor, ActorId, ActorType, CastEvent, CastInfo, CastTarget, MAX_PARTY_SIZE, MAX_STATUSES,
    PartyState, Status, Tether, WorldEvent, WorldState,
};
