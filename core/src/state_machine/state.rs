//! Timeline state definitions

use std::fmt;

use bossmod_types::StateHint;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentFactory, ComponentSet};
use crate::encounter::Arena;
use crate::world::{Actor, ActorId, WorldState};

/// Author-assigned state identifier. Only uniqueness matters; ordering comes from
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// What a predicate can look at when deciding whether to advance.
pub struct ConditionContext<'a> {
    pub world: &'a WorldState,
    pub primary_id: ActorId,
    pub components: &'a ComponentSet,
    /// Seconds since the current state was entered
    pub elapsed: f32,
    pub now: NaiveDateTime,
}

impl<'a> ConditionContext<'a> {
    pub fn primary(&self) -> Option<&'a Actor> {
        self.world.actor(self.primary_id)
    }

    pub fn component<T: Component>(&self) -> Option<&'a T> {
        self.components.find::<T>()
    }
}

pub type Predicate = Box<dyn Fn(&ConditionContext<'_>) -> bool>;
pub type BranchSelector = Box<dyn Fn(&ConditionContext<'_>) -> Option<StateId>>;

/// When a state is done.
pub enum Advance {
    /// After the expected duration
    Timer,
    /// As soon as the predicate holds
    Condition(Predicate),
    /// As soon as the selector picks one of `targets`
    Branch {
        targets: Vec<StateId>,
        select: BranchSelector,
    },
}

impl fmt::Debug for Advance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advance::Timer => f.write_str("Timer"),
            Advance::Condition(_) => f.write_str("Condition(..)"),
            Advance::Branch { targets, .. } => f.debug_struct("Branch").field("targets", targets).finish(),
        }
    }
}

/// One node of a validated timeline.
#[derive(Debug)]
pub struct State {
    pub id: StateId,
    pub name: String,
    /// Expected seconds from entry until the state resolves
    pub duration: f32,
    pub hint: StateHint,
    pub advance: Advance,
    /// `None` means the encounter is complete once this state resolves
    pub next: Option<StateId>,
    pub activate_on_enter: Vec<ComponentFactory>,
    pub deactivate_on_exit: Vec<ComponentFactory>,
    /// Overrides the engine-wide Unknown timeout for this state
    pub timeout_window: Option<f32>,
    pub arena_on_enter: Option<Arena>,
    /// Included in the Unknown diagnostic if the timeline stalls here
    pub note: Option<String>,
}

impl State {
    /// Display name, falling back to the id for unnamed states
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.id.to_string()
        } else {
            self.name.clone()
        }
    }
}
