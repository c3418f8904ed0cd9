//! Encounter lookup and lifecycle
//!
//! The registry maps a boss kind code to the function that builds its encounter.
//! The manager watches the world for registered bosses, keeps one live
//! [`BossEncounter`] per boss actor and drives them every tick.

use bossmod_types::EngineConfig;
use hashbrown::HashMap;

use super::{BossEncounter, EncounterError};
use crate::state_machine::StateMachineError;
use crate::world::{Actor, ActorId, WorldEvent, WorldState};

/// Builds an encounter for a freshly seen boss actor.
pub type EncounterFactory = fn(&Actor, &EngineConfig) -> Result<BossEncounter, StateMachineError>;

#[derive(Clone, Copy)]
struct Registration {
    name: &'static str,
    factory: EncounterFactory,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Registration").field(&self.name).finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EncounterRegistry {
    by_kind: HashMap<u32, Registration>,
}

impl EncounterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an encounter for the boss kind `kind`. A later registration for
    /// the same kind replaces the earlier one.
    pub fn register(&mut self, kind: u32, name: &'static str, factory: EncounterFactory) -> &mut Self {
        if let Some(previous) = self.by_kind.insert(kind, Registration { name, factory }) {
            tracing::warn!(kind, previous = previous.name, name, "Encounter registration replaced");
        }
        self
    }

    pub fn contains(&self, kind: u32) -> bool {
        self.by_kind.contains_key(&kind)
    }

    pub fn name(&self, kind: u32) -> Option<&'static str> {
        self.by_kind.get(&kind).map(|r| r.name)
    }

    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    /// Build the encounter for `actor`, if its kind is registered
    pub fn create(&self, actor: &Actor, config: &EngineConfig) -> Option<Result<BossEncounter, EncounterError>> {
        let registration = self.by_kind.get(&actor.kind)?;
        Some(
            (registration.factory)(actor, config).map_err(|source| EncounterError::Definition {
                name: registration.name.to_string(),
                source,
            }),
        )
    }
}

/// Owns the live encounters of one world.
#[derive(Debug)]
pub struct EncounterManager {
    registry: EncounterRegistry,
    config: EngineConfig,
    encounters: Vec<BossEncounter>,
}

impl EncounterManager {
    pub fn new(registry: EncounterRegistry, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            encounters: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn encounters(&self) -> &[BossEncounter] {
        &self.encounters
    }

    pub fn encounters_mut(&mut self) -> &mut [BossEncounter] {
        &mut self.encounters
    }

    pub fn encounter_for(&self, primary_id: ActorId) -> Option<&BossEncounter> {
        self.encounters.iter().find(|e| e.primary_id() == primary_id)
    }

    pub fn encounter_for_mut(&mut self, primary_id: ActorId) -> Option<&mut BossEncounter> {
        self.encounters.iter_mut().find(|e| e.primary_id() == primary_id)
    }

    /// Spawn encounters for registered bosses that are already in the world
    pub fn attach_existing(&mut self, world: &WorldState) {
        let ids: Vec<ActorId> = world.actors().map(|a| a.id).collect();
        for id in ids {
            self.spawn(world, id);
        }
    }

    /// Drain the world's events and run one tick of every encounter
    pub fn update(&mut self, world: &mut WorldState) {
        let events = world.take_events();
        let world: &WorldState = world;

        for event in &events {
            match event {
                WorldEvent::ActorRemoved { actor } => self.drop_for(actor.id),
                WorldEvent::ActorAdded { id } => self.spawn(world, *id),
                _ => {}
            }
        }

        for encounter in &mut self.encounters {
            encounter.update(world, &events);
        }
    }

    fn spawn(&mut self, world: &WorldState, id: ActorId) {
        if self.encounter_for(id).is_some() {
            return;
        }
        let Some(actor) = world.actor(id) else {
            return;
        };
        match self.registry.create(actor, &self.config) {
            None => {}
            Some(Ok(encounter)) => {
                tracing::info!(encounter = encounter.name(), primary = id.0, kind = actor.kind, "Encounter spawned");
                self.encounters.push(encounter);
            }
            Some(Err(error)) => {
                tracing::error!(primary = id.0, kind = actor.kind, error = %error, source = %source_of(&error), "Failed to build encounter");
            }
        }
    }

    fn drop_for(&mut self, id: ActorId) {
        let before = self.encounters.len();
        self.encounters.retain(|e| e.primary_id() != id);
        if self.encounters.len() != before {
            tracing::info!(primary = id.0, "Encounter dropped");
        }
    }
}

fn source_of(error: &EncounterError) -> String {
    std::error::Error::source(error).map_or_else(String::new, ToString::to_string)
}
