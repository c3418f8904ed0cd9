//! Encounter orchestration
//!
//! A [`BossEncounter`] binds one boss actor to its arena, timeline and active
//! components, and turns each tick's world events into hints and render data.

mod arena;
mod diagnostics;
mod error;
mod registry;

#[cfg(test)]
mod encounter_tests;

pub use arena::{Arena, ArenaBounds};
pub use diagnostics::{Diagnostic, ErrorLog};
pub use error::EncounterError;
pub use registry::{EncounterFactory, EncounterManager, EncounterRegistry};

use bossmod_types::{ColorCategory, EngineConfig, TextHint};
use serde::Serialize;

use crate::component::{ComponentFactory, ComponentSet, EncounterContext, TextHints};
use crate::render::RenderData;
use crate::state_machine::{MachineStatus, StateId, StateMachine, StateMachineDefinition, Step, UpcomingState};
use crate::world::{ActorId, WorldEvent, WorldState};

/// Diagnostics raised by the timeline itself are attributed to this source
const TIMELINE_SOURCE: &str = "timeline";

// ─────────────────────────────────────────────────────────────────────────────
// Egress
// ─────────────────────────────────────────────────────────────────────────────

/// Per-slot output of one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotOutput {
    pub slot: usize,
    pub hints: Vec<TextHint>,
    pub render: RenderData,
}

/// Everything the host needs to present one encounter after a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncounterOutput {
    pub encounter: String,
    pub primary_id: ActorId,
    pub status: MachineStatus,
    pub state: Option<String>,
    pub time_in_state: f32,
    pub arena: Arena,
    pub global_hints: Vec<String>,
    pub upcoming: Vec<UpcomingState>,
    pub slots: Vec<SlotOutput>,
}

// ─────────────────────────────────────────────────────────────────────────────
// BossEncounter
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct BossEncounter {
    name: String,
    primary_id: ActorId,
    arena: Arena,
    machine: StateMachine,
    components: ComponentSet,
    /// Encounter-wide components not yet activated
    pending: Vec<ComponentFactory>,
    log: ErrorLog,
    config: EngineConfig,
}

impl BossEncounter {
    pub fn new(
        name: impl Into<String>,
        primary_id: ActorId,
        arena: Arena,
        definition: StateMachineDefinition,
        config: &EngineConfig,
    ) -> Self {
        Self {
            name: name.into(),
            primary_id,
            arena,
            machine: StateMachine::new(definition, config.unknown_timeout_secs),
            components: ComponentSet::new(),
            pending: Vec::new(),
            log: ErrorLog::new(config.max_diagnostics),
            config: config.clone(),
        }
    }

    /// Component active for the whole encounter, independent of the timeline.
    /// Activated on the first update.
    pub fn with_component(mut self, factory: ComponentFactory) -> Self {
        self.pending.push(factory);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_id(&self) -> ActorId {
        self.primary_id
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.log.iter()
    }

    pub fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.log.drain()
    }

    /// Start the timeline now, regardless of engagement.
    ///
    /// Components entered here replay the world as it stands. If changes are
    /// still queued, the next [`update`](Self::update) delivers them as well, so
    /// the common components treat a repeated cast start as the same cast.
    pub fn start(&mut self, world: &WorldState) {
        if let Some(initial) = self.machine.start(world.now()) {
            tracing::info!(encounter = %self.name, primary = self.primary_id.0, "Encounter started");
            self.enter_state(world, initial);
        }
    }

    /// Process one tick: dispatch `events` in order, update components, then
    /// start the timeline if the boss is engaged and advance it once.
    ///
    /// Components activated during the tick are not sent this tick's events;
    /// activation replays the world as it stands instead.
    pub fn update(&mut self, world: &WorldState, events: &[WorldEvent]) {
        {
            let label = self.machine.current_label();
            let mut ctx = EncounterContext::new(
                world,
                &self.arena,
                self.primary_id,
                label.as_deref(),
                &mut self.log,
            );
            for event in events {
                self.components.dispatch(&mut ctx, event);
            }
            self.components.update(&mut ctx);
        }

        if !self.pending.is_empty() {
            self.activate_pending(world);
        }

        if !self.machine.is_started()
            && self.config.auto_start
            && world.actor(self.primary_id).is_some_and(|boss| boss.target_id.is_some())
        {
            self.start(world);
        }

        let step = self.machine.update(world, self.primary_id, &self.components);
        self.apply(world, step);
    }

    fn activate_pending(&mut self, world: &WorldState) {
        let first_new = self.components.len();
        let mut ctx = EncounterContext::new(world, &self.arena, self.primary_id, None, &mut self.log);
        for factory in self.pending.drain(..) {
            self.components.activate(&factory, &mut ctx);
        }
        self.components.update_from(first_new, &mut ctx);
    }

    fn apply(&mut self, world: &WorldState, step: Step) {
        match step {
            Step::Stay => {}
            Step::Advanced { from, to } => {
                self.exit_state(world, from);
                self.enter_state(world, to);
            }
            Step::Completed { from } => {
                self.exit_state(world, from);
                self.components.deactivate_all();
                tracing::info!(encounter = %self.name, "Encounter complete");
            }
            Step::Diverged { last, reason } => {
                let label = self.machine.definition().state(last).map(|s| s.label());
                self.log
                    .report(world.now(), TIMELINE_SOURCE, label.as_deref(), reason);
            }
        }
    }

    fn exit_state(&mut self, world: &WorldState, id: StateId) {
        let Some(state) = self.machine.definition().state(id) else {
            return;
        };
        if state.deactivate_on_exit.is_empty() {
            return;
        }
        let label = state.label();
        let mut ctx = EncounterContext::new(world, &self.arena, self.primary_id, Some(&label), &mut self.log);
        for factory in &state.deactivate_on_exit {
            self.components.deactivate(factory, &mut ctx);
        }
    }

    fn enter_state(&mut self, world: &WorldState, id: StateId) {
        let Some(state) = self.machine.definition().state(id) else {
            return;
        };
        if let Some(arena) = state.arena_on_enter {
            tracing::debug!(encounter = %self.name, state = %id, "Arena changed");
            self.arena = arena;
        }
        let label = state.label();
        let first_new = self.components.len();
        let mut ctx = EncounterContext::new(world, &self.arena, self.primary_id, Some(&label), &mut self.log);
        for factory in &state.activate_on_enter {
            self.components.activate(factory, &mut ctx);
        }
        self.components.update_from(first_new, &mut ctx);
    }

    // ─── Egress ─────────────────────────────────────────────────────────────

    /// Hints for the party member in `slot` (empty if the slot is vacant)
    pub fn hints(&mut self, world: &WorldState, slot: usize) -> TextHints {
        let Some(actor) = world.party().member(world, slot) else {
            return TextHints::new();
        };
        let label = self.machine.current_label();
        let mut ctx = EncounterContext::new(world, &self.arena, self.primary_id, label.as_deref(), &mut self.log);
        self.components.hints(&mut ctx, slot, actor)
    }

    /// Component global hints followed by early warnings for upcoming states
    pub fn global_hints(&mut self, world: &WorldState) -> Vec<String> {
        let mut hints = Vec::new();
        {
            let label = self.machine.current_label();
            let mut ctx =
                EncounterContext::new(world, &self.arena, self.primary_id, label.as_deref(), &mut self.log);
            self.components.global_hints(&mut ctx, &mut hints);
        }
        hints.extend(self.upcoming(world).into_iter().map(|s| {
            format!("{} in {:.1}s", s.hint.label(), s.eta_secs)
        }));
        hints
    }

    /// Hinted states resolving within the configured horizon
    pub fn upcoming(&self, world: &WorldState) -> Vec<UpcomingState> {
        let mut upcoming = self.machine.upcoming(world.now(), self.config.upcoming_limit);
        upcoming.retain(|s| s.eta_secs <= self.config.upcoming_horizon_secs);
        upcoming
    }

    /// Arena border, actor markers and component primitives for `pc_slot`'s view
    pub fn render(&mut self, world: &WorldState, pc_slot: usize) -> RenderData {
        let mut out = RenderData::new();
        self.arena.draw_border(&mut out);

        let Some(pc) = world.party().member(world, pc_slot) else {
            return out;
        };
        let label = self.machine.current_label();
        let mut ctx = EncounterContext::new(world, &self.arena, self.primary_id, label.as_deref(), &mut self.log);
        self.components.draw(&mut ctx, pc_slot, pc, &mut out);

        if let Some(boss) = world.actor(self.primary_id) {
            out.actor(boss.position, boss.rotation, ColorCategory::Enemy);
        }
        for (slot, member) in world.party_with_slots() {
            let color = if slot == pc_slot {
                ColorCategory::LocalPlayer
            } else {
                ColorCategory::GenericPlayer
            };
            out.actor(member.position, member.rotation, color);
        }
        out
    }

    /// Full egress for the requested slots
    pub fn collect(&mut self, world: &WorldState, slots: &[usize]) -> EncounterOutput {
        let slots = slots
            .iter()
            .map(|&slot| SlotOutput {
                slot,
                hints: self.hints(world, slot).into_vec(),
                render: self.render(world, slot),
            })
            .collect();

        EncounterOutput {
            encounter: self.name.clone(),
            primary_id: self.primary_id,
            status: self.machine.status(),
            state: self.machine.current_label(),
            time_in_state: self.machine.time_in_state(world.now()),
            arena: self.arena,
            global_hints: self.global_hints(world),
            upcoming: self.upcoming(world),
            slots,
        }
    }
}
