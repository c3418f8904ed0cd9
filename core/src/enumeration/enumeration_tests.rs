//! Tests for actor and slot enumeration

use glam::Vec3;
use proptest::prelude::*;

use super::{ActorEnumeration, SlotEnumeration, SlotMask};
use crate::geometry::AoeShape;
use crate::test_support::{enemy, party_world};
use crate::world::{ActorId, Tether};

fn ids<'a>(actors: impl Iterator<Item = &'a crate::world::Actor>) -> Vec<u32> {
    actors.map(|a| a.id.0).collect()
}

#[test]
fn radius_filters_are_inclusive_and_complementary() {
    let world = party_world(&[(0.0, 0.0), (5.0, 0.0), (5.5, 0.0), (0.0, -10.0)]);

    let inside = ids(world.actors().in_radius(Vec3::ZERO, 5.0));
    let outside = ids(world.actors().out_of_radius(Vec3::ZERO, 5.0));
    assert_eq!(inside, vec![1, 2]);
    assert_eq!(outside, vec![3, 4]);
}

#[test]
fn in_radius_excluding_skips_origin() {
    let world = party_world(&[(0.0, 0.0), (1.0, 0.0), (20.0, 0.0)]);
    let origin = world.actor(ActorId(1)).unwrap();

    let near = ids(world.actors().in_radius_excluding(origin, 3.0));
    assert_eq!(near, vec![2]);

    let slots = world.party_with_slots().in_radius_excluding(origin, 3.0).mask();
    assert_eq!(slots, SlotMask::single(1));
}

#[test]
fn shape_filter_uses_actor_frame() {
    let mut world = party_world(&[(0.0, 10.0), (10.0, 0.0)]);
    world.add_actor(enemy(100, 0x1, 0.0, 0.0));
    let boss = world.actor(ActorId(100)).unwrap();

    let cone = AoeShape::cone(20.0, std::f32::consts::FRAC_PI_4);
    let hit = ids(world.party().members(&world).in_shape_of(cone, boss));
    assert_eq!(hit, vec![1]);
}

#[test]
fn tethered_matches_tether_id() {
    let mut world = party_world(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    world.add_tether(ActorId(2), Tether { id: 7, target: ActorId(1) });
    world.add_tether(ActorId(3), Tether { id: 8, target: ActorId(1) });

    assert_eq!(ids(world.actors().tethered(7)), vec![2]);
    assert_eq!(world.party_with_slots().tethered(8).mask(), SlotMask::single(2));
}

#[test]
fn sorted_by_range_keeps_slot_order_on_ties() {
    let world = party_world(&[(4.0, 0.0), (0.0, 4.0), (1.0, 0.0), (-4.0, 0.0)]);

    let slots: Vec<usize> = world
        .party_with_slots()
        .sorted_by_range(Vec3::ZERO)
        .map(|(slot, _)| slot)
        .collect();
    assert_eq!(slots, vec![2, 0, 1, 3]);
}

#[test]
fn closest_excluding_breaks_ties_by_slot() {
    let world = party_world(&[(0.0, 1.0), (3.0, 0.0), (0.0, -3.0), (-3.0, 0.0)]);

    let (slot, actor) = world
        .party_with_slots()
        .closest_excluding(Vec3::ZERO, Some(ActorId(1)))
        .unwrap();
    assert_eq!(slot, 1);
    assert_eq!(actor.id, ActorId(2));

    let (slot, _) = world.party_with_slots().closest_excluding(Vec3::ZERO, None).unwrap();
    assert_eq!(slot, 0);
}

#[test]
fn closest_on_empty_is_none() {
    let world = party_world(&[]);
    assert!(world.actors().closest(Vec3::ZERO).is_none());
    assert!(world.party_with_slots().closest_excluding(Vec3::ZERO, None).is_none());
}

#[test]
fn slot_filters_compose() {
    let world = party_world(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);

    let mask = world
        .party_with_slots()
        .exclude_slot(0)
        .exclude_actor(ActorId(4))
        .where_slot(|slot| slot != 5)
        .where_actor(|a| a.hp > 0)
        .mask();
    assert_eq!(mask.iter().collect::<Vec<_>>(), vec![1, 2]);

    let included = world.party_with_slots().included_in_mask(mask).count();
    assert_eq!(included, 2);
}

fn position() -> impl Strategy<Value = (f32, f32)> {
    ((-400i32..400), (-400i32..400)).prop_map(|(x, z)| (x as f32 * 0.1, z as f32 * 0.1))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn radius_and_mask_filters_commute(
        positions in prop::collection::vec(position(), 0..16),
        mask in any::<u64>(),
        radius in 0.0f32..30.0,
    ) {
        let world = party_world(&positions);
        let mask = SlotMask(mask);

        let a = world
            .party_with_slots()
            .in_radius(Vec3::ZERO, radius)
            .excluded_from_mask(mask)
            .mask();
        let b = world
            .party_with_slots()
            .excluded_from_mask(mask)
            .in_radius(Vec3::ZERO, radius)
            .mask();
        prop_assert_eq!(a, b);
    }
}
