//! Encounter components
//!
//! A component owns the bookkeeping for one mechanic. It is created when its
//! timeline state activates it, receives world events while active, contributes
//! hints and render primitives, and is dropped on deactivation. Re-activating
//! always starts from a fresh instance.

mod common;
mod context;
mod set;


pub use common::{CastCounter, ClosestBait, SelfTargetedAoe, SharedTankbuster, SpreadFromCastTargets};
pub use context::EncounterContext;
pub use set::ComponentSet;

use std::any::{Any, type_name};
use std::fmt;

use bossmod_types::TextHint;
use serde::Serialize;

use crate::render::RenderData;
use crate::world::{Actor, ActorId, CastEvent, CastInfo, Status, Tether};

// ─────────────────────────────────────────────────────────────────────────────
// Component trait
// ─────────────────────────────────────────────────────────────────────────────

/// Downcast support for `ComponentSet::find`.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Mechanic handler. Every hook has a no-op default.
///
/// Hooks never fail. Unexpected input is reported through [`EncounterContext::report`]
/// and the component carries on.
#[allow(unused_variables)]
pub trait Component: AsAny {
    /// Called once right after activation
    fn init(&mut self, ctx: &mut EncounterContext<'_>) {}

    /// Called every tick after events are dispatched
    fn update(&mut self, ctx: &mut EncounterContext<'_>) {}

    /// `actor` is the snapshot taken at removal. Its id may already belong to a
    /// new actor by the time later events of the same tick are dispatched, so
    /// anything keyed on it must be dropped here.
    fn on_actor_removed(&mut self, ctx: &mut EncounterContext<'_>, actor: &Actor) {}

    fn on_cast_started(&mut self, ctx: &mut EncounterContext<'_>, actor: &Actor, cast: &CastInfo) {}

    /// Completed or interrupted; `cast` is the cast as it was when it ended
    fn on_cast_finished(&mut self, ctx: &mut EncounterContext<'_>, actor: &Actor, cast: &CastInfo) {}

    fn on_status_gain(
        &mut self,
        ctx: &mut EncounterContext<'_>,
        actor: &Actor,
        index: usize,
        status: &Status,
    ) {
    }

    fn on_status_lose(
        &mut self,
        ctx: &mut EncounterContext<'_>,
        actor: &Actor,
        index: usize,
        status: &Status,
    ) {
    }

    fn on_status_change(
        &mut self,
        ctx: &mut EncounterContext<'_>,
        actor: &Actor,
        index: usize,
        status: &Status,
    ) {
    }

    fn on_tethered(&mut self, ctx: &mut EncounterContext<'_>, actor: &Actor, tether: &Tether) {}

    fn on_untethered(&mut self, ctx: &mut EncounterContext<'_>, actor: &Actor, tether: &Tether) {}

    /// An ability landed (or missed) on its targets
    fn on_resolved_cast(&mut self, ctx: &mut EncounterContext<'_>, event: &CastEvent) {}

    fn on_icon(&mut self, ctx: &mut EncounterContext<'_>, actor_id: ActorId, icon_id: u32) {}

    fn on_env_control(&mut self, ctx: &mut EncounterContext<'_>, feature_id: u32, index: u8, state: u32) {}

    /// Advice for the player in `slot`
    fn add_hints(
        &self,
        ctx: &mut EncounterContext<'_>,
        slot: usize,
        actor: &Actor,
        hints: &mut TextHints,
    ) {
    }

    /// Advice shown to everyone
    fn add_global_hints(&self, ctx: &mut EncounterContext<'_>, hints: &mut Vec<String>) {}

    /// Primitives for the view of the player in `pc_slot`
    fn draw(&self, ctx: &mut EncounterContext<'_>, pc_slot: usize, pc: &Actor, out: &mut RenderData) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// Text hints
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered per-player advice lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TextHints(Vec<TextHint>);

impl TextHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>, persistent: bool) {
        self.0.push(TextHint {
            text: text.into(),
            persistent,
        });
    }

    /// Something the player should fix right now
    pub fn warning(&mut self, text: impl Into<String>) {
        self.0.push(TextHint::warning(text));
    }

    /// Ongoing condition
    pub fn persistent(&mut self, text: impl Into<String>) {
        self.0.push(TextHint::persistent(text));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextHint> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.0.iter().any(|h| h.text == text)
    }

    pub fn into_vec(self) -> Vec<TextHint> {
        self.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Factory
// ─────────────────────────────────────────────────────────────────────────────

/// Names a component "type" in activation lists and creates fresh instances.
///
/// Two factories are the same component when their names match, so names must be
/// unique within one encounter.
#[derive(Clone, Copy)]
pub struct ComponentFactory {
    name: &'static str,
    create: fn() -> Box<dyn Component>,
}

impl ComponentFactory {
    /// Factory for a parameterized component:
    ///
    /// ```ignore
    /// ComponentFactory::new("Cleave", || {
    ///     Box::new(SelfTargetedAoe::new(ActionId(0x6A2B), AoeShape::cone(40.0, FRAC_PI_4)))
    /// })
    /// ```
    pub const fn new(name: &'static str, create: fn() -> Box<dyn Component>) -> Self {
        Self { name, create }
    }

    /// Factory for a `Default` component, named after its type
    pub fn of<T: Component + Default>() -> Self {
        Self {
            name: short_type_name::<T>(),
            create: || -> Box<dyn Component> { Box::new(T::default()) },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn create(&self) -> Box<dyn Component> {
        (self.create)()
    }
}

impl fmt::Debug for ComponentFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentFactory").field(&self.name).finish()
    }
}

impl PartialEq for ComponentFactory {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ComponentFactory {}

/// `crate::module::Type<Args>` → `Type<Args>`
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base_end = full.find('<').unwrap_or(full.len());
    let start = full[..base_end].rfind("::").map_or(0, |i| i + 2);
    &full[start..]
}
