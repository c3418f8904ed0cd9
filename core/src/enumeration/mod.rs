//! Lazy filters over actors and party slots
//!
//! Both traits are blanket-implemented for any iterator with the right item type,
//! so queries chain directly off the world's sources:
//!
//! ```ignore
//! let baited = world
//!     .party_with_slots()
//!     .excluded_from_mask(already_hit)
//!     .in_radius(boss.position, 6.0)
//!     .mask();
//! ```
//!
//! Everything here borrows the world immutably, so nothing can mutate actors
//! while a query is alive.

mod slot_mask;

#[cfg(test)]
mod enumeration_tests;

pub use slot_mask::SlotMask;

use glam::Vec3;

use crate::geometry::{AoeShape, point_in_circle};
use crate::world::{Actor, ActorId};

#[inline]
fn within(actor: &Actor, origin: Vec3, radius: f32) -> bool {
    point_in_circle(actor.position - origin, radius)
}

fn by_range<T>(items: &mut [T], origin: Vec3, actor: impl Fn(&T) -> &Actor) {
    // Stable: equal distances keep input order
    items.sort_by(|a, b| {
        actor(a)
            .distance_squared_to(origin)
            .total_cmp(&actor(b).distance_squared_to(origin))
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Plain actor iterators
// ─────────────────────────────────────────────────────────────────────────────

pub trait ActorEnumeration<'a>: Iterator<Item = &'a Actor> + Sized {
    fn exclude(self, id: ActorId) -> impl Iterator<Item = &'a Actor> {
        self.filter(move |a| a.id != id)
    }

    fn in_radius(self, origin: Vec3, radius: f32) -> impl Iterator<Item = &'a Actor> {
        self.filter(move |a| within(a, origin, radius))
    }

    fn out_of_radius(self, origin: Vec3, radius: f32) -> impl Iterator<Item = &'a Actor> {
        self.filter(move |a| !within(a, origin, radius))
    }

    /// Actors within `radius` of `origin`, not counting `origin` itself
    fn in_radius_excluding(self, origin: &Actor, radius: f32) -> impl Iterator<Item = &'a Actor> {
        let (id, position) = (origin.id, origin.position);
        self.filter(move |a| a.id != id && within(a, position, radius))
    }

    fn in_shape(
        self,
        shape: AoeShape,
        origin: Vec3,
        rotation: f32,
    ) -> impl Iterator<Item = &'a Actor> {
        self.filter(move |a| shape.check(a.position, origin, rotation))
    }

    /// Shape anchored on `origin`'s position and facing
    fn in_shape_of(self, shape: AoeShape, origin: &Actor) -> impl Iterator<Item = &'a Actor> {
        self.in_shape(shape, origin.position, origin.rotation)
    }

    /// Actors carrying a tether with the given id
    fn tethered(self, tether_id: u32) -> impl Iterator<Item = &'a Actor> {
        self.filter(move |a| a.tether.is_some_and(|t| t.id == tether_id))
    }

    fn sorted_by_range(self, origin: Vec3) -> std::vec::IntoIter<&'a Actor> {
        let mut actors: Vec<_> = self.collect();
        by_range(&mut actors, origin, |a| *a);
        actors.into_iter()
    }

    /// Nearest actor; the first one wins a tie
    fn closest(self, origin: Vec3) -> Option<&'a Actor> {
        self.min_by(|a, b| {
            a.distance_squared_to(origin)
                .total_cmp(&b.distance_squared_to(origin))
        })
    }
}

impl<'a, I: Iterator<Item = &'a Actor>> ActorEnumeration<'a> for I {}

// ─────────────────────────────────────────────────────────────────────────────
// Party (slot, actor) iterators
// ─────────────────────────────────────────────────────────────────────────────

pub trait SlotEnumeration<'a>: Iterator<Item = (usize, &'a Actor)> + Sized {
    fn where_slot(
        self,
        mut pred: impl FnMut(usize) -> bool,
    ) -> impl Iterator<Item = (usize, &'a Actor)> {
        self.filter(move |(slot, _)| pred(*slot))
    }

    fn where_actor(
        self,
        mut pred: impl FnMut(&Actor) -> bool,
    ) -> impl Iterator<Item = (usize, &'a Actor)> {
        self.filter(move |(_, actor)| pred(actor))
    }

    fn exclude_actor(self, id: ActorId) -> impl Iterator<Item = (usize, &'a Actor)> {
        self.filter(move |(_, a)| a.id != id)
    }

    fn exclude_slot(self, slot: usize) -> impl Iterator<Item = (usize, &'a Actor)> {
        self.filter(move |(s, _)| *s != slot)
    }

    fn included_in_mask(self, mask: SlotMask) -> impl Iterator<Item = (usize, &'a Actor)> {
        self.filter(move |(slot, _)| mask.is_set(*slot))
    }

    fn excluded_from_mask(self, mask: SlotMask) -> impl Iterator<Item = (usize, &'a Actor)> {
        self.filter(move |(slot, _)| !mask.is_set(*slot))
    }

    fn in_radius(self, origin: Vec3, radius: f32) -> impl Iterator<Item = (usize, &'a Actor)> {
        self.filter(move |(_, a)| within(a, origin, radius))
    }

    fn out_of_radius(self, origin: Vec3, radius: f32) -> impl Iterator<Item = (usize, &'a Actor)> {
        self.filter(move |(_, a)| !within(a, origin, radius))
    }

    fn in_radius_excluding(
        self,
        origin: &Actor,
        radius: f32,
    ) -> impl Iterator<Item = (usize, &'a Actor)> {
        let (id, position) = (origin.id, origin.position);
        self.filter(move |(_, a)| a.id != id && within(a, position, radius))
    }

    fn in_shape(
        self,
        shape: AoeShape,
        origin: Vec3,
        rotation: f32,
    ) -> impl Iterator<Item = (usize, &'a Actor)> {
        self.filter(move |(_, a)| shape.check(a.position, origin, rotation))
    }

    fn tethered(self, tether_id: u32) -> impl Iterator<Item = (usize, &'a Actor)> {
        self.filter(move |(_, a)| a.tether.is_some_and(|t| t.id == tether_id))
    }

    fn sorted_by_range(self, origin: Vec3) -> std::vec::IntoIter<(usize, &'a Actor)> {
        let mut members: Vec<_> = self.collect();
        by_range(&mut members, origin, |(_, a)| *a);
        members.into_iter()
    }

    /// Nearest member other than `excluded`; ties go to the lower slot
    fn closest_excluding(self, origin: Vec3, excluded: Option<ActorId>) -> Option<(usize, &'a Actor)> {
        self.filter(|(_, a)| Some(a.id) != excluded).min_by(|(sa, a), (sb, b)| {
            a.distance_squared_to(origin)
                .total_cmp(&b.distance_squared_to(origin))
                .then(sa.cmp(sb))
        })
    }

    fn mask(self) -> SlotMask {
        self.map(|(slot, _)| slot).collect()
    }
}

impl<'a, I: Iterator<Item = (usize, &'a Actor)>> SlotEnumeration<'a> for I {}
