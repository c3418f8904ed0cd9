//! Active component instances of one encounter

use super::{Component, ComponentFactory, EncounterContext, TextHints};
use crate::render::RenderData;
use crate::world::{Actor, WorldEvent};

struct ActiveComponent {
    name: &'static str,
    instance: Box<dyn Component>,
}

/// Active components in activation order.
///
/// The order is stable: events, updates and egress visit components in the order
/// they were activated.
#[derive(Default)]
pub struct ComponentSet {
    active: Vec<ActiveComponent>,
}

impl ComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.iter().any(|c| c.name == name)
    }

    /// Names of active components, in activation order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.active.iter().map(|c| c.name)
    }

    /// First active component of type `T`
    pub fn find<T: Component>(&self) -> Option<&T> {
        self.active
            .iter()
            .find_map(|c| (*c.instance).as_any().downcast_ref::<T>())
    }

    pub fn find_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.active
            .iter_mut()
            .find_map(|c| (*c.instance).as_any_mut().downcast_mut::<T>())
    }

    /// Create and initialize a fresh instance, then replay in-progress casts,
    /// tethers and statuses to it. Activating a component that is already active
    /// is reported and ignored. Returns whether an instance was added.
    pub fn activate(&mut self, factory: &ComponentFactory, ctx: &mut EncounterContext<'_>) -> bool {
        let name = factory.name();
        ctx.set_source(name);
        if self.is_active(name) {
            ctx.report("component activated while already active");
            return false;
        }

        tracing::debug!(component = name, state = ctx.state(), "Activating component");
        let mut instance = factory.create();
        instance.init(ctx);
        replay_world(instance.as_mut(), ctx);
        self.active.push(ActiveComponent { name, instance });
        true
    }

    /// Drop the instance. Deactivating an inactive component is reported.
    pub fn deactivate(&mut self, factory: &ComponentFactory, ctx: &mut EncounterContext<'_>) -> bool {
        let name = factory.name();
        match self.active.iter().position(|c| c.name == name) {
            Some(index) => {
                tracing::debug!(component = name, state = ctx.state(), "Deactivating component");
                self.active.remove(index);
                true
            }
            None => {
                ctx.set_source(name);
                ctx.report("component deactivated while not active");
                false
            }
        }
    }

    pub fn deactivate_all(&mut self) {
        self.active.clear();
    }

    fn each(
        &mut self,
        ctx: &mut EncounterContext<'_>,
        mut f: impl FnMut(&mut dyn Component, &mut EncounterContext<'_>),
    ) {
        for c in &mut self.active {
            ctx.set_source(c.name);
            f(c.instance.as_mut(), ctx);
        }
    }

    /// Update only the instances at `from..` (newly activated ones)
    pub(crate) fn update_from(&mut self, from: usize, ctx: &mut EncounterContext<'_>) {
        for c in self.active.iter_mut().skip(from) {
            ctx.set_source(c.name);
            c.instance.update(ctx);
        }
    }

    pub fn update(&mut self, ctx: &mut EncounterContext<'_>) {
        self.each(ctx, |c, ctx| c.update(ctx));
    }

    /// Route one world event to every active component.
    ///
    /// Events about actors that no longer resolve are skipped. Removals carry
    /// their own snapshot and always go through.
    pub fn dispatch(&mut self, ctx: &mut EncounterContext<'_>, event: &WorldEvent) {
        let world = ctx.world;
        match event {
            WorldEvent::ActorRemoved { actor } => {
                self.each(ctx, |c, ctx| c.on_actor_removed(ctx, actor));
            }
            WorldEvent::CastStarted { id, cast } => {
                let Some(actor) = world.actor(*id) else { return };
                self.each(ctx, |c, ctx| c.on_cast_started(ctx, actor, cast));
            }
            WorldEvent::CastFinished { id, cast } => {
                let Some(actor) = world.actor(*id) else { return };
                self.each(ctx, |c, ctx| c.on_cast_finished(ctx, actor, cast));
            }
            WorldEvent::StatusGained { id, index, status } => {
                let Some(actor) = world.actor(*id) else { return };
                self.each(ctx, |c, ctx| c.on_status_gain(ctx, actor, *index, status));
            }
            WorldEvent::StatusLost { id, index, status } => {
                let Some(actor) = world.actor(*id) else { return };
                self.each(ctx, |c, ctx| c.on_status_lose(ctx, actor, *index, status));
            }
            WorldEvent::StatusChanged { id, index, status } => {
                let Some(actor) = world.actor(*id) else { return };
                self.each(ctx, |c, ctx| c.on_status_change(ctx, actor, *index, status));
            }
            WorldEvent::TetherAdded { id, tether } => {
                let Some(actor) = world.actor(*id) else { return };
                self.each(ctx, |c, ctx| c.on_tethered(ctx, actor, tether));
            }
            WorldEvent::TetherRemoved { id, tether } => {
                let Some(actor) = world.actor(*id) else { return };
                self.each(ctx, |c, ctx| c.on_untethered(ctx, actor, tether));
            }
            WorldEvent::CastResolved(cast) => {
                self.each(ctx, |c, ctx| c.on_resolved_cast(ctx, cast));
            }
            WorldEvent::IconShown { actor_id, icon_id } => {
                if world.actor(*actor_id).is_none() {
                    return;
                }
                self.each(ctx, |c, ctx| c.on_icon(ctx, *actor_id, *icon_id));
            }
            WorldEvent::EnvControl {
                feature_id,
                index,
                state,
            } => {
                self.each(ctx, |c, ctx| c.on_env_control(ctx, *feature_id, *index, *state));
            }
            // Snapshot changes without a hook; components read them from the world
            WorldEvent::ActorAdded { .. }
            | WorldEvent::ActorMoved { .. }
            | WorldEvent::HpChanged { .. }
            | WorldEvent::TargetableChanged { .. }
            | WorldEvent::DeadChanged { .. }
            | WorldEvent::TargetChanged { .. }
            | WorldEvent::PartySlotChanged { .. } => {}
        }
    }

    pub fn hints(&self, ctx: &mut EncounterContext<'_>, slot: usize, actor: &Actor) -> TextHints {
        let mut hints = TextHints::new();
        for c in &self.active {
            ctx.set_source(c.name);
            c.instance.add_hints(ctx, slot, actor, &mut hints);
        }
        hints
    }

    pub fn global_hints(&self, ctx: &mut EncounterContext<'_>, hints: &mut Vec<String>) {
        for c in &self.active {
            ctx.set_source(c.name);
            c.instance.add_global_hints(ctx, hints);
        }
    }

    pub fn draw(&self, ctx: &mut EncounterContext<'_>, pc_slot: usize, pc: &Actor, out: &mut RenderData) {
        for c in &self.active {
            ctx.set_source(c.name);
            c.instance.draw(ctx, pc_slot, pc, out);
        }
    }
}

/// Feed the current world state to a new instance as if it had just happened
fn replay_world(component: &mut dyn Component, ctx: &mut EncounterContext<'_>) {
    let world = ctx.world;
    for actor in world.actors() {
        if let Some(cast) = &actor.cast {
            component.on_cast_started(ctx, actor, cast);
        }
        if let Some(tether) = &actor.tether {
            component.on_tethered(ctx, actor, tether);
        }
        for (index, status) in actor.statuses.iter().enumerate() {
            if let Some(status) = status {
                component.on_status_gain(ctx, actor, index, status);
            }
        }
    }
}

impl std::fmt::Debug for ComponentSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
