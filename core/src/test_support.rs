//! Shared builders for unit tests

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use glam::Vec3;

use crate::world::{Actor, ActorId, ActorType, WorldState};

/// Install a test-writer subscriber so `tracing` output shows up on failure
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("bossmod_core=debug")
        .try_init();
}

/// Fixed pull time used by all tests
pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap()
}

/// `t0` plus the given number of seconds
pub fn at(secs: f32) -> NaiveDateTime {
    t0() + TimeDelta::milliseconds((secs * 1000.0).round() as i64)
}

pub fn player(id: u32, x: f32, z: f32) -> Actor {
    Actor::new(ActorId(id), 0, ActorType::Player, Vec3::new(x, 0.0, z))
        .with_name(format!("Player {id}"))
        .with_hp(1000, 1000)
}

pub fn enemy(id: u32, kind: u32, x: f32, z: f32) -> Actor {
    Actor::new(ActorId(id), kind, ActorType::Enemy, Vec3::new(x, 0.0, z))
        .with_name(format!("Enemy {kind:X}"))
        .with_hp(100_000, 100_000)
}

/// World with players 1..=n at the given XZ positions, in slots 0..n.
/// The setup events are drained.
pub fn party_world(positions: &[(f32, f32)]) -> WorldState {
    let mut world = WorldState::new(t0());
    for (slot, &(x, z)) in positions.iter().enumerate() {
        let id = slot as u32 + 1;
        world.add_actor(player(id, x, z));
        world.assign_party_slot(slot, Some(ActorId(id)));
    }
    world.take_events();
    world
}
