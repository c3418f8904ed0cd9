//! Context handed to every component hook

use chrono::NaiveDateTime;

use crate::encounter::{Arena, ErrorLog};
use crate::world::{Actor, ActorId, WorldState};

/// Read-only view of the encounter plus a diagnostic sink.
///
/// Diagnostics reported through the context are tagged with the name of the
/// component currently being called and the current timeline state.
pub struct EncounterContext<'a> {
    pub world: &'a WorldState,
    pub arena: &'a Arena,
    pub primary_id: ActorId,
    state: Option<&'a str>,
    source: &'static str,
    log: &'a mut ErrorLog,
}

impl<'a> EncounterContext<'a> {
    pub fn new(
        world: &'a WorldState,
        arena: &'a Arena,
        primary_id: ActorId,
        state: Option<&'a str>,
        log: &'a mut ErrorLog,
    ) -> Self {
        Self {
            world,
            arena,
            primary_id,
            state,
            source: "encounter",
            log,
        }
    }

    /// The boss this encounter is bound to, if it still exists
    pub fn primary(&self) -> Option<&'a Actor> {
        self.world.actor(self.primary_id)
    }

    pub fn now(&self) -> NaiveDateTime {
        self.world.now()
    }

    /// Name of the current timeline state
    pub fn state(&self) -> Option<&'a str> {
        self.state
    }

    /// Who diagnostics are currently attributed to
    pub fn source(&self) -> &'static str {
        self.source
    }

    pub(crate) fn set_source(&mut self, source: &'static str) {
        self.source = source;
    }

    /// Record a protocol divergence; execution continues
    pub fn report(&mut self, message: impl Into<String>) {
        self.log
            .report(self.world.now(), self.source, self.state, message);
    }
}
