//! Reusable components for common mechanic patterns
//!
//! These are parameterized by action id and shape, so encounters register them
//! through [`ComponentFactory::new`](super::ComponentFactory::new) with a
//! non-capturing closure.

use bossmod_types::ColorCategory;

use super::{Component, EncounterContext, TextHints};
use crate::enumeration::{ActorEnumeration, SlotEnumeration, SlotMask};
use crate::geometry::{AoeShape, point_in_circle};
use crate::render::RenderData;
use crate::world::{ActionId, Actor, ActorId, CastEvent, CastInfo, WorldState};

// ─────────────────────────────────────────────────────────────────────────────
// CastCounter
// ─────────────────────────────────────────────────────────────────────────────

/// Counts resolved casts of one action.
#[derive(Debug, Clone)]
pub struct CastCounter {
    action: ActionId,
    count: usize,
}

impl CastCounter {
    pub fn new(action: ActionId) -> Self {
        Self { action, count: 0 }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Component for CastCounter {
    fn on_resolved_cast(&mut self, _ctx: &mut EncounterContext<'_>, event: &CastEvent) {
        if event.is(self.action) {
            self.count += 1;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SelfTargetedAoe
// ─────────────────────────────────────────────────────────────────────────────

/// Shape anchored on the caster for as long as the cast is in progress.
#[derive(Debug, Clone)]
pub struct SelfTargetedAoe {
    action: ActionId,
    shape: AoeShape,
    casters: Vec<ActorId>,
}

impl SelfTargetedAoe {
    pub fn new(action: ActionId, shape: AoeShape) -> Self {
        Self {
            action,
            shape,
            casters: Vec::new(),
        }
    }

    pub fn casters<'w>(&self, world: &'w WorldState) -> impl Iterator<Item = &'w Actor> {
        let ids = self.casters.clone();
        ids.into_iter().filter_map(move |id| world.actor(id))
    }

    pub fn is_active(&self) -> bool {
        !self.casters.is_empty()
    }
}

impl Component for SelfTargetedAoe {
    fn update(&mut self, ctx: &mut EncounterContext<'_>) {
        let world = ctx.world;
        self.casters.retain(|id| world.actor(*id).is_some());
    }

    fn on_actor_removed(&mut self, _ctx: &mut EncounterContext<'_>, actor: &Actor) {
        self.casters.retain(|id| *id != actor.id);
    }

    fn on_cast_started(&mut self, _ctx: &mut EncounterContext<'_>, actor: &Actor, cast: &CastInfo) {
        if cast.is(self.action) && !self.casters.contains(&actor.id) {
            self.casters.push(actor.id);
        }
    }

    fn on_cast_finished(&mut self, _ctx: &mut EncounterContext<'_>, actor: &Actor, cast: &CastInfo) {
        if cast.is(self.action) {
            self.casters.retain(|id| *id != actor.id);
        }
    }

    fn add_hints(
        &self,
        ctx: &mut EncounterContext<'_>,
        _slot: usize,
        actor: &Actor,
        hints: &mut TextHints,
    ) {
        if self
            .casters(ctx.world)
            .any(|caster| self.shape.check_actor(actor.position, caster))
        {
            hints.warning("GTFO from aoe!");
        }
    }

    fn draw(&self, ctx: &mut EncounterContext<'_>, _pc_slot: usize, _pc: &Actor, out: &mut RenderData) {
        for caster in self.casters(ctx.world) {
            out.zone(&self.shape, caster.position, caster.rotation, ColorCategory::Danger);
        }
    }
}

/// A caster has at most one cast in progress, so a repeated start for the same
/// caster replaces its entry.
fn track_cast(casts: &mut Vec<(ActorId, ActorId)>, caster: ActorId, target: ActorId) {
    match casts.iter_mut().find(|(c, _)| *c == caster) {
        Some(entry) => entry.1 = target,
        None => casts.push((caster, target)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SpreadFromCastTargets
// ─────────────────────────────────────────────────────────────────────────────

/// Circle around every target of an in-progress cast; targets must spread out.
#[derive(Debug, Clone)]
pub struct SpreadFromCastTargets {
    action: ActionId,
    radius: f32,
    /// (caster, target) for each in-progress cast
    spreads: Vec<(ActorId, ActorId)>,
}

impl SpreadFromCastTargets {
    pub fn new(action: ActionId, radius: f32) -> Self {
        Self {
            action,
            radius,
            spreads: Vec::new(),
        }
    }

    fn targets<'w>(&self, world: &'w WorldState) -> impl Iterator<Item = &'w Actor> {
        let ids: Vec<ActorId> = self.spreads.iter().map(|(_, target)| *target).collect();
        ids.into_iter().filter_map(move |id| world.actor(id))
    }

    pub fn target_count(&self) -> usize {
        self.spreads.len()
    }
}

impl Component for SpreadFromCastTargets {
    fn on_actor_removed(&mut self, _ctx: &mut EncounterContext<'_>, actor: &Actor) {
        self.spreads
            .retain(|(caster, target)| *caster != actor.id && *target != actor.id);
    }

    fn on_cast_started(&mut self, ctx: &mut EncounterContext<'_>, actor: &Actor, cast: &CastInfo) {
        if !cast.is(self.action) {
            return;
        }
        match cast.target_id {
            Some(target) => track_cast(&mut self.spreads, actor.id, target),
            None => ctx.report(format!("spread cast {:X} without a target", cast.action.0)),
        }
    }

    fn on_cast_finished(&mut self, _ctx: &mut EncounterContext<'_>, actor: &Actor, cast: &CastInfo) {
        if cast.is(self.action) {
            self.spreads.retain(|(caster, _)| *caster != actor.id);
        }
    }

    fn add_hints(
        &self,
        ctx: &mut EncounterContext<'_>,
        _slot: usize,
        actor: &Actor,
        hints: &mut TextHints,
    ) {
        let world = ctx.world;
        let is_target = self.spreads.iter().any(|(_, t)| *t == actor.id);
        let crowded = if is_target {
            world
                .party()
                .members(world)
                .in_radius_excluding(actor, self.radius)
                .next()
                .is_some()
        } else {
            self.targets(world)
                .any(|target| point_in_circle(actor.position - target.position, self.radius))
        };
        if crowded {
            hints.warning("Spread!");
        }
    }

    fn draw(&self, ctx: &mut EncounterContext<'_>, _pc_slot: usize, pc: &Actor, out: &mut RenderData) {
        for target in self.targets(ctx.world) {
            if target.id == pc.id {
                out.circle(target.position, self.radius, ColorCategory::Danger);
            } else {
                out.zone(&AoeShape::circle(self.radius), target.position, 0.0, ColorCategory::Danger);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SharedTankbuster
// ─────────────────────────────────────────────────────────────────────────────

/// Circle on the cast target, to be shared by the stack partners only.
#[derive(Debug, Clone)]
pub struct SharedTankbuster {
    action: ActionId,
    radius: f32,
    partners: SlotMask,
    /// (caster, target)
    busters: Vec<(ActorId, ActorId)>,
}

impl SharedTankbuster {
    pub fn new(action: ActionId, radius: f32) -> Self {
        Self {
            action,
            radius,
            partners: SlotMask::EMPTY,
            busters: Vec::new(),
        }
    }

    /// Slots expected to share the hit with the target (usually the other tanks)
    pub fn with_partners(mut self, partners: SlotMask) -> Self {
        self.partners = partners;
        self
    }

    pub fn target_ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.busters.iter().map(|(_, target)| *target)
    }
}

impl Component for SharedTankbuster {
    fn on_actor_removed(&mut self, _ctx: &mut EncounterContext<'_>, actor: &Actor) {
        self.busters
            .retain(|(caster, target)| *caster != actor.id && *target != actor.id);
    }

    fn on_cast_started(&mut self, ctx: &mut EncounterContext<'_>, actor: &Actor, cast: &CastInfo) {
        if !cast.is(self.action) {
            return;
        }
        match cast.target_id {
            Some(target) => track_cast(&mut self.busters, actor.id, target),
            None => ctx.report(format!("tankbuster cast {:X} without a target", cast.action.0)),
        }
    }

    fn on_cast_finished(&mut self, _ctx: &mut EncounterContext<'_>, actor: &Actor, cast: &CastInfo) {
        if cast.is(self.action) {
            self.busters.retain(|(caster, _)| *caster != actor.id);
        }
    }

    fn add_hints(
        &self,
        ctx: &mut EncounterContext<'_>,
        slot: usize,
        actor: &Actor,
        hints: &mut TextHints,
    ) {
        let world = ctx.world;
        for target in self.target_ids().filter_map(|id| world.actor(id)) {
            if target.id == actor.id {
                continue;
            }
            let in_range = point_in_circle(actor.position - target.position, self.radius);
            if self.partners.is_set(slot) {
                if !in_range {
                    hints.warning("Stack with target!");
                }
            } else if in_range {
                hints.warning("GTFO from tank!");
            }
        }
    }

    fn draw(&self, ctx: &mut EncounterContext<'_>, _pc_slot: usize, _pc: &Actor, out: &mut RenderData) {
        let world = ctx.world;
        for target in self.target_ids().filter_map(|id| world.actor(id)) {
            out.zone(&AoeShape::circle(self.radius), target.position, 0.0, ColorCategory::Danger);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ClosestBait
// ─────────────────────────────────────────────────────────────────────────────

/// Attack baited by the party member closest to the caster, ignoring whoever the
/// caster is targeting.
#[derive(Debug, Clone)]
pub struct ClosestBait {
    action: ActionId,
    radius: f32,
    casters: Vec<ActorId>,
}

impl ClosestBait {
    pub fn new(action: ActionId, radius: f32) -> Self {
        Self {
            action,
            radius,
            casters: Vec::new(),
        }
    }

    /// Current baiter for each active caster
    pub fn baiters<'w>(&self, world: &'w WorldState) -> Vec<(usize, &'w Actor)> {
        self.casters
            .iter()
            .filter_map(|id| world.actor(*id))
            .filter_map(|caster| {
                world
                    .party()
                    .alive_with_slots(world)
                    .closest_excluding(caster.position, caster.target_id)
            })
            .collect()
    }
}

impl Component for ClosestBait {
    fn update(&mut self, ctx: &mut EncounterContext<'_>) {
        let world = ctx.world;
        self.casters.retain(|id| world.actor(*id).is_some());
    }

    fn on_actor_removed(&mut self, _ctx: &mut EncounterContext<'_>, actor: &Actor) {
        self.casters.retain(|id| *id != actor.id);
    }

    fn on_cast_started(&mut self, _ctx: &mut EncounterContext<'_>, actor: &Actor, cast: &CastInfo) {
        if cast.is(self.action) && !self.casters.contains(&actor.id) {
            self.casters.push(actor.id);
        }
    }

    fn on_cast_finished(&mut self, _ctx: &mut EncounterContext<'_>, actor: &Actor, cast: &CastInfo) {
        if cast.is(self.action) {
            self.casters.retain(|id| *id != actor.id);
        }
    }

    fn add_hints(
        &self,
        ctx: &mut EncounterContext<'_>,
        _slot: usize,
        actor: &Actor,
        hints: &mut TextHints,
    ) {
        let world = ctx.world;
        for (_, baiter) in self.baiters(world) {
            if baiter.id == actor.id {
                let hits_others = world
                    .party()
                    .alive_with_slots(world)
                    .in_radius_excluding(actor, self.radius)
                    .next()
                    .is_some();
                if hits_others {
                    hints.warning("Bait away from raid!");
                }
            } else if point_in_circle(actor.position - baiter.position, self.radius) {
                hints.warning("GTFO from baited aoe!");
            }
        }
    }

    fn draw(&self, ctx: &mut EncounterContext<'_>, _pc_slot: usize, pc: &Actor, out: &mut RenderData) {
        for (_, baiter) in self.baiters(ctx.world) {
            if baiter.id == pc.id {
                out.circle(baiter.position, self.radius, ColorCategory::Danger);
            } else {
                out.zone(&AoeShape::circle(self.radius), baiter.position, 0.0, ColorCategory::Danger);
                out.actor(baiter.position, baiter.rotation, ColorCategory::InterestingPlayer);
            }
        }
    }
}
