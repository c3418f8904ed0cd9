//! Timeline runtime

use bossmod_types::StateHint;
use chrono::NaiveDateTime;
use serde::Serialize;

use super::builder::StateMachineDefinition;
use super::state::{Advance, ConditionContext, State, StateId};
use crate::component::ComponentSet;
use crate::world::{ActorId, WorldState};

/// Where the timeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MachineStatus {
    NotStarted,
    Active { state: StateId },
    /// Fell out of sync; `last` is the last state known to be correct
    Unknown { last: StateId },
    Complete,
}

impl MachineStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MachineStatus::Unknown { .. } | MachineStatus::Complete)
    }
}

/// One entry of the transition history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub status: MachineStatus,
    pub at: NaiveDateTime,
}

/// Result of one `update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Stay,
    Advanced { from: StateId, to: StateId },
    Completed { from: StateId },
    /// Fell back to Unknown; `reason` describes why
    Diverged { last: StateId, reason: String },
}

/// Early-warning entry for a state that has not resolved yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingState {
    pub id: StateId,
    pub name: String,
    pub hint: StateHint,
    /// Expected seconds until the state resolves
    pub eta_secs: f32,
}

#[derive(Debug)]
pub struct StateMachine {
    definition: StateMachineDefinition,
    status: MachineStatus,
    entered_at: Option<NaiveDateTime>,
    default_window: f32,
    history: Vec<Transition>,
}

impl StateMachine {
    /// `default_window` is the Unknown timeout for states without their own
    pub fn new(definition: StateMachineDefinition, default_window: f32) -> Self {
        Self {
            definition,
            status: MachineStatus::NotStarted,
            entered_at: None,
            default_window: default_window.max(0.0),
            history: Vec::new(),
        }
    }

    pub fn definition(&self) -> &StateMachineDefinition {
        &self.definition
    }

    pub fn status(&self) -> MachineStatus {
        self.status
    }

    pub fn is_started(&self) -> bool {
        self.status != MachineStatus::NotStarted
    }

    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    /// The active state, if the timeline is running
    pub fn current_state(&self) -> Option<&State> {
        match self.status {
            MachineStatus::Active { state } => self.definition.state(state),
            _ => None,
        }
    }

    /// Name of the active state, or of the last known state when Unknown
    pub fn current_label(&self) -> Option<String> {
        match self.status {
            MachineStatus::Active { state } | MachineStatus::Unknown { last: state } => {
                self.definition.state(state).map(State::label)
            }
            MachineStatus::NotStarted | MachineStatus::Complete => None,
        }
    }

    pub fn time_in_state(&self, now: NaiveDateTime) -> f32 {
        self.entered_at.map_or(0.0, |at| seconds_between(at, now))
    }

    /// Enter the initial state. Returns `None` if already started.
    pub fn start(&mut self, now: NaiveDateTime) -> Option<StateId> {
        if self.is_started() {
            return None;
        }
        let id = self.definition.initial().id;
        tracing::debug!(state = %id, "State machine started");
        self.enter(MachineStatus::Active { state: id }, now);
        Some(id)
    }

    fn enter(&mut self, status: MachineStatus, now: NaiveDateTime) {
        self.status = status;
        self.entered_at = Some(now);
        self.history.push(Transition { status, at: now });
    }

    /// Evaluate the current state's advance rule once. At most one transition
    /// happens per call.
    pub fn update(&mut self, world: &WorldState, primary_id: ActorId, components: &ComponentSet) -> Step {
        let MachineStatus::Active { state: current } = self.status else {
            return Step::Stay;
        };
        let Some(state) = self.definition.state(current) else {
            return Step::Stay;
        };

        let now = world.now();
        let ctx = ConditionContext {
            world,
            primary_id,
            components,
            elapsed: self.time_in_state(now),
            now,
        };

        let resolved = match &state.advance {
            Advance::Timer => (ctx.elapsed >= state.duration).then_some(state.next),
            Advance::Condition(predicate) => predicate(&ctx).then_some(state.next),
            Advance::Branch { targets, select } => match select(&ctx) {
                Some(to) if targets.contains(&to) => Some(Some(to)),
                Some(to) => {
                    let reason = format!("{} branched to undeclared state {to}", state.label());
                    return self.diverge(current, reason, now);
                }
                None => None,
            },
        };

        match resolved {
            Some(Some(to)) => {
                tracing::debug!(from = %current, to = %to, elapsed = ctx.elapsed, "State transition");
                self.enter(MachineStatus::Active { state: to }, now);
                Step::Advanced { from: current, to }
            }
            Some(None) => {
                tracing::debug!(from = %current, "State machine complete");
                self.enter(MachineStatus::Complete, now);
                Step::Completed { from: current }
            }
            None => {
                let window = state.timeout_window.unwrap_or(self.default_window);
                if ctx.elapsed > state.duration + window {
                    let mut reason = format!(
                        "{} did not resolve within {:.1}s (expected {:.1}s)",
                        state.label(),
                        state.duration + window,
                        state.duration
                    );
                    if let Some(note) = &state.note {
                        reason.push_str(": ");
                        reason.push_str(note);
                    }
                    self.diverge(current, reason, now)
                } else {
                    Step::Stay
                }
            }
        }
    }

    fn diverge(&mut self, last: StateId, reason: String, now: NaiveDateTime) -> Step {
        self.enter(MachineStatus::Unknown { last }, now);
        Step::Diverged { last, reason }
    }

    /// Hinted states ahead of the timeline, starting with the current one.
    ///
    /// Follows default successors and stops at the first branch.
    pub fn upcoming(&self, now: NaiveDateTime, limit: usize) -> Vec<UpcomingState> {
        let mut result = Vec::new();
        let Some(mut state) = self.current_state() else {
            return result;
        };
        let mut eta = (state.duration - self.time_in_state(now)).max(0.0);

        while result.len() < limit {
            if state.hint.is_warning() {
                result.push(UpcomingState {
                    id: state.id,
                    name: state.label(),
                    hint: state.hint.clone(),
                    eta_secs: eta,
                });
            }
            if matches!(state.advance, Advance::Branch { .. }) {
                break;
            }
            let Some(next) = state.next.and_then(|id| self.definition.state(id)) else {
                break;
            };
            eta += next.duration;
            state = next;
        }
        result
    }
}

fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> f32 {
    (to.signed_duration_since(from).num_milliseconds().max(0) as f32) / 1000.0
}
