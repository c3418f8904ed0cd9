//! Authoritative world snapshot and ingest API
//!
//! The host (network hook or replay) applies changes through the methods below.
//! Every applied change queues exactly one [`WorldEvent`]; the queue is drained
//! once per tick with [`WorldState::take_events`]. Calls that reference an actor
//! the world doesn't know about are ignored: the actor is effectively absent.

use chrono::NaiveDateTime;
use glam::Vec3;
use hashbrown::HashMap;

use super::actor::{Actor, ActorId, CastInfo, MAX_STATUSES, Status, Tether};
use super::event::{CastEvent, WorldEvent};
use super::party::PartyState;
use crate::geometry::normalize_angle;

#[derive(Debug, Default)]
pub struct WorldState {
    now: NaiveDateTime,
    /// Insertion order is kept so enumeration is deterministic
    actors: Vec<Actor>,
    index: HashMap<ActorId, usize>,
    party: PartyState,
    pending: Vec<WorldEvent>,
}

impl WorldState {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            ..Default::default()
        }
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    /// Current game time
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.index.get(&id).map(|&i| &self.actors[i])
    }

    /// All live actors in insertion order
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    /// Live actors with the given kind code (e.g. all copies of an add)
    pub fn actors_of_kind(&self, kind: u32) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter(move |a| a.kind == kind)
    }

    pub fn party(&self) -> &PartyState {
        &self.party
    }

    /// Live party members with their slot index
    pub fn party_with_slots(&self) -> impl Iterator<Item = (usize, &Actor)> {
        self.party.with_slots(self)
    }

    /// Events queued since the last drain (not yet consumed)
    pub fn pending_events(&self) -> &[WorldEvent] {
        &self.pending
    }

    /// Drain the events queued since the last call, in the order they happened
    pub fn take_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.pending)
    }

    // ─── Ingest: clock and roster ───────────────────────────────────────────

    /// Set the game clock for the current tick
    pub fn advance_time(&mut self, now: NaiveDateTime) {
        if now < self.now {
            tracing::debug!(%now, previous = %self.now, "Ignoring backwards clock update");
            return;
        }
        self.now = now;
    }

    pub fn assign_party_slot(&mut self, slot: usize, id: Option<ActorId>) {
        if self.party.get(slot) == id {
            return;
        }
        if !self.party.assign(slot, id) {
            tracing::debug!(slot, "Ignoring party slot outside roster width");
            return;
        }
        self.pending.push(WorldEvent::PartySlotChanged { slot, id });
    }

    // ─── Ingest: actor lifecycle ────────────────────────────────────────────

    /// Add an actor. If the id is already live, the previous actor is removed first
    /// (the game recycles ids).
    pub fn add_actor(&mut self, mut actor: Actor) {
        if self.index.contains_key(&actor.id) {
            self.remove_actor(actor.id);
        }
        actor.rotation = normalize_angle(actor.rotation);
        let id = actor.id;
        self.index.insert(id, self.actors.len());
        self.actors.push(actor);
        self.pending.push(WorldEvent::ActorAdded { id });
    }

    pub fn remove_actor(&mut self, id: ActorId) {
        let Some(pos) = self.index.remove(&id) else {
            tracing::debug!(actor = id.0, "Remove for unknown actor");
            return;
        };
        let actor = self.actors.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        self.pending.push(WorldEvent::ActorRemoved {
            actor: Box::new(actor),
        });
    }

    // ─── Ingest: actor state ────────────────────────────────────────────────

    pub fn move_actor(&mut self, id: ActorId, position: Vec3, rotation: f32) {
        let rotation = normalize_angle(rotation);
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        if actor.position == position && actor.rotation == rotation {
            return;
        }
        let from = actor.position;
        actor.position = position;
        actor.rotation = rotation;
        self.pending.push(WorldEvent::ActorMoved {
            id,
            from,
            to: position,
            rotation,
        });
    }

    pub fn change_hp(&mut self, id: ActorId, hp: u32, max_hp: u32) {
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        if actor.hp == hp && actor.max_hp == max_hp {
            return;
        }
        let old_hp = actor.hp;
        actor.hp = hp;
        actor.max_hp = max_hp;
        self.pending.push(WorldEvent::HpChanged {
            id,
            old_hp,
            hp,
            max_hp,
        });
    }

    pub fn set_targetable(&mut self, id: ActorId, targetable: bool) {
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        if actor.is_targetable == targetable {
            return;
        }
        actor.is_targetable = targetable;
        self.pending
            .push(WorldEvent::TargetableChanged { id, targetable });
    }

    pub fn set_dead(&mut self, id: ActorId, dead: bool) {
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        if actor.is_dead == dead {
            return;
        }
        actor.is_dead = dead;
        self.pending.push(WorldEvent::DeadChanged { id, dead });
    }

    pub fn set_target(&mut self, id: ActorId, target: Option<ActorId>) {
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        if actor.target_id == target {
            return;
        }
        actor.target_id = target;
        self.pending.push(WorldEvent::TargetChanged { id, target });
    }

    // ─── Ingest: casts ──────────────────────────────────────────────────────

    /// Start a cast. An interrupted previous cast is reported as finished first.
    pub fn start_cast(&mut self, id: ActorId, cast: CastInfo) {
        if self.actor(id).is_some_and(|a| a.cast.is_some()) {
            self.finish_cast(id);
        }
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        actor.cast = Some(cast.clone());
        self.pending.push(WorldEvent::CastStarted { id, cast });
    }

    /// Update elapsed time of the in-progress cast. Progress is not a change
    /// notification; nothing is queued.
    pub fn update_cast_progress(&mut self, id: ActorId, elapsed_time: f32) {
        if let Some(cast) = self.actor_mut(id).and_then(|a| a.cast.as_mut()) {
            cast.elapsed_time = elapsed_time;
        }
    }

    pub fn finish_cast(&mut self, id: ActorId) {
        let Some(cast) = self.actor_mut(id).and_then(|a| a.cast.take()) else {
            return;
        };
        self.pending.push(WorldEvent::CastFinished { id, cast });
    }

    /// Record a resolved ability application. The caster does not need to be live.
    pub fn resolve_cast(&mut self, event: CastEvent) {
        self.pending.push(WorldEvent::CastResolved(event));
    }

    // ─── Ingest: tethers ────────────────────────────────────────────────────

    pub fn add_tether(&mut self, id: ActorId, tether: Tether) {
        if self.actor(id).is_some_and(|a| a.tether.is_some()) {
            self.remove_tether(id);
        }
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        actor.tether = Some(tether);
        self.pending.push(WorldEvent::TetherAdded { id, tether });
    }

    pub fn remove_tether(&mut self, id: ActorId) {
        let Some(tether) = self.actor_mut(id).and_then(|a| a.tether.take()) else {
            return;
        };
        self.pending.push(WorldEvent::TetherRemoved { id, tether });
    }

    // ─── Ingest: statuses ───────────────────────────────────────────────────

    /// Gain a status in the given slot. A status still occupying the slot is
    /// reported as lost first.
    pub fn gain_status(&mut self, id: ActorId, index: usize, status: Status) {
        if index >= MAX_STATUSES {
            tracing::debug!(actor = id.0, index, "Ignoring status slot outside status list");
            return;
        }
        if self.actor(id).is_some_and(|a| a.status(index).is_some()) {
            self.lose_status(id, index);
        }
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        if actor.statuses.len() <= index {
            actor.statuses.resize(index + 1, None);
        }
        actor.statuses[index] = Some(status.clone());
        self.pending
            .push(WorldEvent::StatusGained { id, index, status });
    }

    pub fn lose_status(&mut self, id: ActorId, index: usize) {
        let Some(status) = self
            .actor_mut(id)
            .and_then(|a| a.statuses.get_mut(index))
            .and_then(Option::take)
        else {
            return;
        };
        self.pending.push(WorldEvent::StatusLost { id, index, status });
    }

    /// Update duration/stacks/extra of an existing status in place
    pub fn change_status(
        &mut self,
        id: ActorId,
        index: usize,
        expire_at: NaiveDateTime,
        stacks: u8,
        extra: u16,
    ) {
        let Some(status) = self
            .actor_mut(id)
            .and_then(|a| a.statuses.get_mut(index))
            .and_then(Option::as_mut)
        else {
            tracing::debug!(actor = id.0, index, "Status change for empty slot");
            return;
        };
        if status.expire_at == expire_at && status.stacks == stacks && status.extra == extra {
            return;
        }
        status.expire_at = expire_at;
        status.stacks = stacks;
        status.extra = extra;
        let status = status.clone();
        self.pending
            .push(WorldEvent::StatusChanged { id, index, status });
    }

    // ─── Ingest: world events ───────────────────────────────────────────────

    pub fn show_icon(&mut self, actor_id: ActorId, icon_id: u32) {
        self.pending.push(WorldEvent::IconShown { actor_id, icon_id });
    }

    pub fn env_control(&mut self, feature_id: u32, index: u8, state: u32) {
        self.pending.push(WorldEvent::EnvControl {
            feature_id,
            index,
            state,
        });
    }

    fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        match self.index.get(&id) {
            Some(&i) => Some(&mut self.actors[i]),
            None => {
                tracing::debug!(actor = id.0, "Update for unknown actor");
                None
            }
        }
    }
}
