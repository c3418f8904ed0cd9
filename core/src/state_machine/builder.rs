//! Timeline authoring
//!
//! States are declared in fight order; each one advances to the next declared
//! state unless it names an explicit successor. The last declared state completes
//! the encounter.
//!
//! ```ignore
//! let mut b = StateMachineBuilder::new();
//! b.cast(StateId(0x100), AID_DECOLLATION, 9.3, 5.0, "AOE").hint(StateHint::Raidwide);
//! b.cast(StateId(0x200), AID_EVISCERATION, 4.2, 5.0, "Tankbuster")
//!     .activate_on_enter::<Evisceration>()
//!     .hint(StateHint::Tankbuster);
//! b.component_condition::<Evisceration>(StateId(0x202), 3.2, "Hit", |c| c.casts() > 0)
//!     .deactivate_on_exit::<Evisceration>();
//! let definition = b.build()?;
//! ```

use bossmod_types::StateHint;
use hashbrown::HashMap;

use super::state::{Advance, ConditionContext, State, StateId};
use super::StateMachineError;
use crate::component::{Component, ComponentFactory};
use crate::encounter::Arena;
use crate::world::ActionId;

/// Ordered, validated list of states.
#[derive(Debug)]
pub struct StateMachineDefinition {
    states: Vec<State>,
    index: HashMap<StateId, usize>,
}

impl StateMachineDefinition {
    pub fn initial(&self) -> &State {
        // build() rejects empty definitions
        &self.states[0]
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.index.get(&id).map(|&i| &self.states[i])
    }

    /// Position in declaration order
    pub fn position(&self, id: StateId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

struct Draft {
    state: State,
    explicit_next: Option<StateId>,
}

#[derive(Default)]
pub struct StateMachineBuilder {
    drafts: Vec<Draft>,
}

impl StateMachineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a state with an arbitrary advance rule
    pub fn simple(
        &mut self,
        id: StateId,
        duration: f32,
        name: impl Into<String>,
        advance: Advance,
    ) -> StateBuilder<'_> {
        self.drafts.push(Draft {
            state: State {
                id,
                name: name.into(),
                duration,
                hint: StateHint::None,
                advance,
                next: None,
                activate_on_enter: Vec::new(),
                deactivate_on_exit: Vec::new(),
                timeout_window: None,
                arena_on_enter: None,
                note: None,
            },
            explicit_next: None,
        });
        let index = self.drafts.len() - 1;
        StateBuilder {
            draft: &mut self.drafts[index],
        }
    }

    /// Pure timer
    pub fn timeout(&mut self, id: StateId, duration: f32, name: impl Into<String>) -> StateBuilder<'_> {
        self.simple(id, duration, name, Advance::Timer)
    }

    pub fn condition(
        &mut self,
        id: StateId,
        duration: f32,
        name: impl Into<String>,
        predicate: impl Fn(&ConditionContext<'_>) -> bool + 'static,
    ) -> StateBuilder<'_> {
        self.simple(id, duration, name, Advance::Condition(Box::new(predicate)))
    }

    /// Advance once the active component of type `T` satisfies `predicate`.
    /// An inactive component never satisfies it.
    pub fn component_condition<T: Component>(
        &mut self,
        id: StateId,
        duration: f32,
        name: impl Into<String>,
        predicate: impl Fn(&T) -> bool + 'static,
    ) -> StateBuilder<'_> {
        self.condition(id, duration, name, move |ctx| {
            ctx.component::<T>().is_some_and(|c| predicate(c))
        })
    }

    /// Advance when the primary actor starts casting `action`
    pub fn cast_start(
        &mut self,
        id: StateId,
        action: ActionId,
        duration: f32,
        name: impl Into<String>,
    ) -> StateBuilder<'_> {
        self.condition(id, duration, name, move |ctx| {
            ctx.primary().is_some_and(|boss| boss.is_casting(action))
        })
    }

    /// Advance when the primary actor is no longer casting
    pub fn cast_end(&mut self, id: StateId, duration: f32, name: impl Into<String>) -> StateBuilder<'_> {
        self.condition(id, duration, name, |ctx| {
            ctx.primary().is_none_or(|boss| boss.cast.is_none())
        })
    }

    /// Cast start followed by cast end (`id` and `id + 1`). Modifiers apply to the
    /// cast-end state, which is entered when the cast begins.
    pub fn cast(
        &mut self,
        id: StateId,
        action: ActionId,
        delay: f32,
        cast_time: f32,
        name: impl Into<String>,
    ) -> StateBuilder<'_> {
        self.cast_start(id, action, delay, "");
        self.cast_end(StateId(id.0.wrapping_add(1)), cast_time, name)
    }

    /// Advance when the primary actor's targetable flag becomes `targetable`
    pub fn targetable(
        &mut self,
        id: StateId,
        targetable: bool,
        duration: f32,
        name: impl Into<String>,
    ) -> StateBuilder<'_> {
        self.condition(id, duration, name, move |ctx| {
            ctx.primary().is_some_and(|boss| boss.is_targetable == targetable)
        })
    }

    /// Validate and freeze the timeline
    pub fn build(self) -> Result<StateMachineDefinition, StateMachineError> {
        if self.drafts.is_empty() {
            return Err(StateMachineError::Empty);
        }

        let mut index = HashMap::with_capacity(self.drafts.len());
        for (i, draft) in self.drafts.iter().enumerate() {
            let state = &draft.state;
            if index.insert(state.id, i).is_some() {
                return Err(StateMachineError::DuplicateState { id: state.id });
            }
            let window = state.timeout_window.unwrap_or(0.0);
            for value in [state.duration, window] {
                if !value.is_finite() || value < 0.0 {
                    return Err(StateMachineError::NegativeDuration {
                        id: state.id,
                        duration: value,
                    });
                }
            }
        }

        let check_forward = |from_index: usize, from: StateId, to: StateId| match index.get(&to) {
            None => Err(StateMachineError::DanglingTransition { from, to }),
            Some(&target) if target <= from_index => {
                Err(StateMachineError::BackwardTransition { from, to })
            }
            Some(_) => Ok(()),
        };

        let following: Vec<Option<StateId>> = (0..self.drafts.len())
            .map(|i| self.drafts.get(i + 1).map(|d| d.state.id))
            .collect();

        let mut states = Vec::with_capacity(self.drafts.len());
        for (i, draft) in self.drafts.into_iter().enumerate() {
            let mut state = draft.state;
            if let Advance::Branch { targets, .. } = &state.advance {
                for &to in targets {
                    check_forward(i, state.id, to)?;
                }
            }
            state.next = match draft.explicit_next {
                Some(to) => {
                    check_forward(i, state.id, to)?;
                    Some(to)
                }
                None => following[i],
            };
            states.push(state);
        }

        tracing::debug!(states = states.len(), "Built state machine");
        Ok(StateMachineDefinition { states, index })
    }
}

/// Modifiers for the state just declared.
pub struct StateBuilder<'b> {
    draft: &'b mut Draft,
}

impl StateBuilder<'_> {
    pub fn id(&self) -> StateId {
        self.draft.state.id
    }

    pub fn hint(self, hint: StateHint) -> Self {
        self.draft.state.hint = hint;
        self
    }

    pub fn activate_on_enter<T: Component + Default>(self) -> Self {
        self.activate_factory(ComponentFactory::of::<T>())
    }

    pub fn deactivate_on_exit<T: Component + Default>(self) -> Self {
        self.deactivate_factory(ComponentFactory::of::<T>())
    }

    pub fn activate_factory(self, factory: ComponentFactory) -> Self {
        self.draft.state.activate_on_enter.push(factory);
        self
    }

    pub fn deactivate_factory(self, factory: ComponentFactory) -> Self {
        self.draft.state.deactivate_on_exit.push(factory);
        self
    }

    pub fn arena_on_enter(self, arena: Arena) -> Self {
        self.draft.state.arena_on_enter = Some(arena);
        self
    }

    /// Seconds past the expected duration before falling back to Unknown
    pub fn timeout_window(self, secs: f32) -> Self {
        self.draft.state.timeout_window = Some(secs);
        self
    }

    pub fn note(self, note: impl Into<String>) -> Self {
        self.draft.state.note = Some(note.into());
        self
    }

    /// Skip ahead to `id` instead of the next declared state
    pub fn next(self, id: StateId) -> Self {
        self.draft.explicit_next = Some(id);
        self
    }

    /// Replace the advance rule with a branch to one of `targets`
    pub fn branch(
        self,
        targets: &[StateId],
        select: impl Fn(&ConditionContext<'_>) -> Option<StateId> + 'static,
    ) -> Self {
        self.draft.state.advance = Advance::Branch {
            targets: targets.to_vec(),
            select: Box::new(select),
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successors_follow_declaration_order() {
        let mut b = StateMachineBuilder::new();
        b.timeout(StateId(10), 1.0, "A");
        b.cast(StateId(20), ActionId(5), 2.0, 3.0, "B");
        let def = b.build().unwrap();

        assert_eq!(def.len(), 3);
        assert_eq!(def.initial().id, StateId(10));
        assert_eq!(def.state(StateId(10)).unwrap().next, Some(StateId(20)));
        assert_eq!(def.state(StateId(20)).unwrap().next, Some(StateId(21)));
        assert_eq!(def.state(StateId(21)).unwrap().next, None);
        assert_eq!(def.state(StateId(21)).unwrap().name, "B");
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(StateMachineBuilder::new().build().unwrap_err(), StateMachineError::Empty);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut b = StateMachineBuilder::new();
        b.timeout(StateId(1), 1.0, "A");
        b.timeout(StateId(1), 1.0, "B");
        assert_eq!(
            b.build().unwrap_err(),
            StateMachineError::DuplicateState { id: StateId(1) }
        );
    }

    #[test]
    fn explicit_successor_must_exist_and_be_later() {
        let mut b = StateMachineBuilder::new();
        b.timeout(StateId(1), 1.0, "A");
        b.timeout(StateId(2), 1.0, "B").next(StateId(1));
        assert_eq!(
            b.build().unwrap_err(),
            StateMachineError::BackwardTransition {
                from: StateId(2),
                to: StateId(1)
            }
        );

        let mut b = StateMachineBuilder::new();
        b.timeout(StateId(1), 1.0, "A").next(StateId(9));
        assert_eq!(
            b.build().unwrap_err(),
            StateMachineError::DanglingTransition {
                from: StateId(1),
                to: StateId(9)
            }
        );
    }

    #[test]
    fn branch_targets_are_validated() {
        let mut b = StateMachineBuilder::new();
        b.timeout(StateId(1), 1.0, "A");
        b.timeout(StateId(2), 1.0, "B")
            .branch(&[StateId(1)], |_| Some(StateId(1)));
        assert!(matches!(
            b.build(),
            Err(StateMachineError::BackwardTransition { .. })
        ));
    }

    #[test]
    fn negative_durations_are_rejected() {
        let mut b = StateMachineBuilder::new();
        b.timeout(StateId(1), -1.0, "A");
        assert!(matches!(
            b.build(),
            Err(StateMachineError::NegativeDuration { id: StateId(1), .. })
        ));

        let mut b = StateMachineBuilder::new();
        b.timeout(StateId(1), 1.0, "A").timeout_window(f32::NAN);
        assert!(b.build().is_err());
    }

    #[test]
    fn error_messages_name_states() {
        let err = StateMachineError::DanglingTransition {
            from: StateId(0x10000),
            to: StateId(0x20000),
        };
        assert_eq!(
            err.to_string(),
            "state 0x00010000 transitions to undeclared state 0x00020000"
        );
    }
}
