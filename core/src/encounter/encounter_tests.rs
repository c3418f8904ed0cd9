//! Tests for encounter orchestration and the encounter manager

use bossmod_types::{ColorCategory, EngineConfig, StateHint};
use glam::Vec3;

use super::*;
use crate::component::{
    CastCounter, Component, ComponentFactory, EncounterContext, SelfTargetedAoe, SpreadFromCastTargets,
};
use crate::geometry::AoeShape;
use crate::render::RenderPrimitive;
use crate::state_machine::{MachineStatus, StateId, StateMachineBuilder, StateMachineError};
use crate::test_support::{at, enemy, init_tracing, party_world, player, t0};
use crate::world::{ActionId, Actor, ActorId, CastInfo, Status, WorldState};

const BOSS: ActorId = ActorId(100);
const BOSS_KIND: u32 = 0x35E4;
const CLEAVE: ActionId = ActionId(0x6A2B);
const HIT: ActionId = ActionId(0x6A2C);
const SPREAD: ActionId = ActionId(0x6A2D);

// ─── Recording components ───────────────────────────────────────────────────────

/// Remembers where player 1 was during the last update
#[derive(Default)]
struct PositionRecorder {
    seen: Option<Vec3>,
}

impl Component for PositionRecorder {
    fn update(&mut self, ctx: &mut EncounterContext<'_>) {
        self.seen = ctx.world.actor(ActorId(1)).map(|a| a.position);
    }
}

/// Reports every status gain, so dispatch order shows up in the diagnostics
#[derive(Default)]
struct FirstRecorder;

impl Component for FirstRecorder {
    fn on_status_gain(&mut self, ctx: &mut EncounterContext<'_>, _actor: &Actor, _index: usize, status: &Status) {
        ctx.report(format!("status {}", status.id));
    }
}

#[derive(Default)]
struct SecondRecorder;

impl Component for SecondRecorder {
    fn on_status_gain(&mut self, ctx: &mut EncounterContext<'_>, _actor: &Actor, _index: usize, status: &Status) {
        ctx.report(format!("status {}", status.id));
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn config() -> EngineConfig {
    EngineConfig::default()
}

fn arena() -> Arena {
    Arena::circle(Vec3::ZERO, 20.0)
}

fn cleave() -> ComponentFactory {
    ComponentFactory::new("Cleave", || {
        Box::new(SelfTargetedAoe::new(CLEAVE, AoeShape::cone(15.0, std::f32::consts::FRAC_PI_4)))
    })
}

fn hits() -> ComponentFactory {
    ComponentFactory::new("Hits", || Box::new(CastCounter::new(HIT)))
}

fn spread() -> ComponentFactory {
    ComponentFactory::new("Spread", || Box::new(SpreadFromCastTargets::new(SPREAD, 6.0)))
}

/// Single long state with the spread component active throughout
fn spread_encounter() -> Result<BossEncounter, StateMachineError> {
    let mut b = StateMachineBuilder::new();
    b.timeout(StateId(0x100), 30.0, "Spreads").activate_factory(spread());
    Ok(BossEncounter::new("Spread Boss", BOSS, arena(), b.build()?, &config()))
}

fn cast(action: ActionId) -> CastInfo {
    CastInfo {
        action,
        target_id: None,
        location: Vec3::ZERO,
        total_time: 3.0,
        elapsed_time: 0.0,
    }
}

fn status(id: u32) -> Status {
    Status {
        id,
        source_id: Some(BOSS),
        expire_at: at(30.0),
        stacks: 0,
        extra: 0,
    }
}

/// Cleave cast, then wait for two hits, then a raidwide
fn timeline_encounter(primary: ActorId, config: &EngineConfig) -> Result<BossEncounter, StateMachineError> {
    let mut b = StateMachineBuilder::new();
    b.cast(StateId(0x100), CLEAVE, 5.0, 3.0, "Cleave")
        .activate_factory(cleave())
        .deactivate_factory(cleave());
    b.component_condition::<CastCounter>(StateId(0x200), 4.0, "Hits", |c| c.count() >= 2)
        .activate_factory(hits())
        .hint(StateHint::Tankbuster);
    b.timeout(StateId(0x300), 6.0, "Raidwide").hint(StateHint::Raidwide);
    Ok(BossEncounter::new("Test Boss", primary, arena(), b.build()?, config))
}

fn boss_world() -> WorldState {
    let mut world = party_world(&[(0.0, 10.0), (10.0, 0.0)]);
    world.add_actor(enemy(BOSS.0, BOSS_KIND, 0.0, 0.0));
    world.take_events();
    world
}

fn tick(encounter: &mut BossEncounter, world: &mut WorldState, secs: f32) {
    world.advance_time(at(secs));
    let events = world.take_events();
    encounter.update(world, &events);
}

// ─── BossEncounter ──────────────────────────────────────────────────────────

#[test]
fn update_observes_latest_position_after_add_and_move() {
    let mut world = WorldState::new(t0());
    let mut encounter = timeline_encounter(BOSS, &config())
        .unwrap()
        .with_component(ComponentFactory::of::<PositionRecorder>());

    world.add_actor(player(1, 0.0, 0.0));
    world.move_actor(ActorId(1), Vec3::new(3.0, 0.0, 0.0), 0.0);
    let events = world.take_events();
    encounter.update(&world, &events);

    let recorder = encounter.components().find::<PositionRecorder>().unwrap();
    assert_eq!(recorder.seen, Some(Vec3::new(3.0, 0.0, 0.0)));
}

#[test]
fn events_reach_components_in_arrival_and_registration_order() {
    let mut world = boss_world();
    let mut encounter = timeline_encounter(BOSS, &config())
        .unwrap()
        .with_component(ComponentFactory::of::<FirstRecorder>())
        .with_component(ComponentFactory::of::<SecondRecorder>());
    tick(&mut encounter, &mut world, 0.0);

    world.gain_status(ActorId(1), 0, status(11));
    world.gain_status(ActorId(2), 0, status(22));
    tick(&mut encounter, &mut world, 0.5);

    let log: Vec<(String, String)> = encounter
        .drain_diagnostics()
        .into_iter()
        .map(|d| (d.source, d.message))
        .collect();
    assert_eq!(
        log,
        vec![
            ("FirstRecorder".to_string(), "status 11".to_string()),
            ("SecondRecorder".to_string(), "status 11".to_string()),
            ("FirstRecorder".to_string(), "status 22".to_string()),
            ("SecondRecorder".to_string(), "status 22".to_string()),
        ]
    );
}

#[test]
fn late_activation_replays_current_world() {
    let mut world = boss_world();
    let mut encounter = timeline_encounter(BOSS, &config())
        .unwrap()
        .with_component(ComponentFactory::of::<FirstRecorder>());

    // Status gained before the component exists
    world.gain_status(ActorId(2), 4, status(33));
    tick(&mut encounter, &mut world, 0.5);

    let messages: Vec<_> = encounter.drain_diagnostics().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["status 33".to_string()]);
}

#[test]
fn start_before_update_tracks_in_progress_cast_once() {
    let mut world = boss_world();
    let mut encounter = spread_encounter().unwrap();

    world.start_cast(
        BOSS,
        CastInfo {
            target_id: Some(ActorId(1)),
            ..cast(SPREAD)
        },
    );
    // Activation replays the cast, then the tick delivers the queued start again
    encounter.start(&world);
    tick(&mut encounter, &mut world, 0.5);

    let spread = encounter.components().find::<SpreadFromCastTargets>().unwrap();
    assert_eq!(spread.target_count(), 1);

    world.finish_cast(BOSS);
    tick(&mut encounter, &mut world, 1.0);
    let spread = encounter.components().find::<SpreadFromCastTargets>().unwrap();
    assert_eq!(spread.target_count(), 0);
    assert!(encounter.drain_diagnostics().is_empty());
}

#[test]
fn despawned_caster_leaves_nothing_for_recycled_id() {
    let mut world = boss_world();
    let mut encounter = spread_encounter().unwrap();
    encounter.start(&world);
    world.start_cast(
        BOSS,
        CastInfo {
            target_id: Some(ActorId(2)),
            ..cast(SPREAD)
        },
    );
    tick(&mut encounter, &mut world, 1.0);
    let spread = encounter.components().find::<SpreadFromCastTargets>().unwrap();
    assert_eq!(spread.target_count(), 1);

    // Boss despawns mid-cast and its id comes straight back as an idle add
    world.remove_actor(BOSS);
    world.add_actor(enemy(BOSS.0, 0x9, 0.0, 0.0));
    tick(&mut encounter, &mut world, 1.5);

    let spread = encounter.components().find::<SpreadFromCastTargets>().unwrap();
    assert_eq!(spread.target_count(), 0);
    assert!(encounter.drain_diagnostics().is_empty());
}

#[test]
fn timeline_drives_component_activation() {
    let mut world = boss_world();
    let mut encounter = timeline_encounter(BOSS, &config()).unwrap();

    // Not engaged yet
    tick(&mut encounter, &mut world, 1.0);
    assert_eq!(encounter.machine().status(), MachineStatus::NotStarted);

    world.set_target(BOSS, Some(ActorId(1)));
    tick(&mut encounter, &mut world, 2.0);
    assert_eq!(encounter.machine().status(), MachineStatus::Active { state: StateId(0x100) });
    assert!(encounter.components().is_empty());

    // Cast start enters the cast-end state and activates the cleave
    world.start_cast(BOSS, cast(CLEAVE));
    tick(&mut encounter, &mut world, 3.0);
    assert_eq!(encounter.machine().status(), MachineStatus::Active { state: StateId(0x101) });
    assert!(encounter.components().is_active("Cleave"));
    assert!(encounter.components().find::<SelfTargetedAoe>().unwrap().is_active());

    // Player 1 stands in front of the boss
    assert!(encounter.hints(&world, 0).contains("GTFO from aoe!"));
    assert!(encounter.hints(&world, 1).is_empty());

    world.finish_cast(BOSS);
    tick(&mut encounter, &mut world, 6.0);
    assert_eq!(encounter.machine().status(), MachineStatus::Active { state: StateId(0x200) });
    let names: Vec<_> = encounter.components().names().collect();
    assert_eq!(names, vec!["Hits"]);

    world.resolve_cast(crate::world::CastEvent::new(BOSS, HIT));
    world.resolve_cast(crate::world::CastEvent::new(BOSS, HIT));
    tick(&mut encounter, &mut world, 7.0);
    assert_eq!(encounter.machine().status(), MachineStatus::Active { state: StateId(0x300) });

    tick(&mut encounter, &mut world, 13.5);
    assert_eq!(encounter.machine().status(), MachineStatus::Complete);
    assert!(encounter.components().is_empty());
    assert!(encounter.drain_diagnostics().is_empty());
}

#[test]
fn stalled_timeline_reports_once_and_keeps_components() {
    init_tracing();
    let mut b = StateMachineBuilder::new();
    b.timeout(StateId(0), 1.0, "S0");
    b.condition(StateId(1), 3.0, "S1", |_| false)
        .timeout_window(2.0)
        .activate_factory(hits());
    b.timeout(StateId(2), 1.0, "S2");
    let mut encounter = BossEncounter::new("Stall", BOSS, arena(), b.build().unwrap(), &config());
    let mut world = boss_world();

    encounter.start(&world);
    for i in 1..=40 {
        tick(&mut encounter, &mut world, i as f32 * 0.5);
    }

    let history: Vec<_> = encounter.machine().history().iter().map(|t| t.status).collect();
    assert_eq!(
        history,
        vec![
            MachineStatus::Active { state: StateId(0) },
            MachineStatus::Active { state: StateId(1) },
            MachineStatus::Unknown { last: StateId(1) },
        ]
    );

    let diagnostics = encounter.drain_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].state.as_deref(), Some("S1"));
    assert!(diagnostics[0].message.contains("S1"));
    assert!(encounter.components().is_active("Hits"));
}

#[test]
fn global_hints_announce_upcoming_states() {
    let mut world = boss_world();
    let mut b = StateMachineBuilder::new();
    b.timeout(StateId(0), 4.0, "Opener");
    b.timeout(StateId(1), 3.0, "Big hit").hint(StateHint::Raidwide);
    b.timeout(StateId(2), 30.0, "Far away").hint(StateHint::Tankbuster);
    let mut encounter = BossEncounter::new("Hints", BOSS, arena(), b.build().unwrap(), &config());
    encounter.start(&world);

    world.advance_time(at(1.0));
    let hints = encounter.global_hints(&world);
    assert_eq!(hints, vec!["Raidwide in 6.0s".to_string()]);
}

#[test]
fn render_includes_border_markers_and_zones() {
    let mut world = boss_world();
    let mut encounter = timeline_encounter(BOSS, &config()).unwrap();
    world.set_target(BOSS, Some(ActorId(1)));
    tick(&mut encounter, &mut world, 1.0);
    world.start_cast(BOSS, cast(CLEAVE));
    tick(&mut encounter, &mut world, 2.0);

    let out = encounter.render(&world, 1);
    assert_eq!(out.zones.len(), 1);
    assert!(out.markers.iter().any(|p| matches!(p, RenderPrimitive::Circle { color: ColorCategory::Border, .. })));
    assert!(out.markers.iter().any(|p| p.color() == ColorCategory::Enemy));
    assert_eq!(
        out.markers.iter().filter(|p| p.color() == ColorCategory::LocalPlayer).count(),
        1
    );

    // Vacant slot still gets the arena
    let empty = encounter.render(&world, 7);
    assert_eq!(empty.len(), 1);
}

#[test]
fn collect_gathers_egress_for_requested_slots() {
    let mut world = boss_world();
    let mut encounter = timeline_encounter(BOSS, &config()).unwrap();
    world.set_target(BOSS, Some(ActorId(1)));
    tick(&mut encounter, &mut world, 1.0);
    world.start_cast(BOSS, cast(CLEAVE));
    tick(&mut encounter, &mut world, 2.0);

    let output = encounter.collect(&world, &[0, 1]);
    assert_eq!(output.encounter, "Test Boss");
    assert_eq!(output.state.as_deref(), Some("Cleave"));
    assert_eq!(output.slots.len(), 2);
    assert_eq!(output.slots[0].hints[0].text, "GTFO from aoe!");
    assert!(output.slots[1].hints.is_empty());
    assert_eq!(output.arena, arena());
}

#[test]
fn arena_changes_on_state_entry() {
    let mut b = StateMachineBuilder::new();
    b.timeout(StateId(0), 1.0, "Intro");
    b.timeout(StateId(1), 1.0, "Platform")
        .arena_on_enter(Arena::rect(Vec3::ZERO, 5.0, 5.0));
    let mut encounter = BossEncounter::new("Arena", BOSS, arena(), b.build().unwrap(), &config());
    let mut world = boss_world();

    encounter.start(&world);
    tick(&mut encounter, &mut world, 1.0);
    assert_eq!(encounter.arena().bounds, ArenaBounds::Rect { half_width: 5.0, half_length: 5.0 });
}

// ─── Manager ────────────────────────────────────────────────────────────────

fn build_test_boss(actor: &Actor, config: &EngineConfig) -> Result<BossEncounter, StateMachineError> {
    timeline_encounter(actor.id, config)
}

fn build_broken(_actor: &Actor, _config: &EngineConfig) -> Result<BossEncounter, StateMachineError> {
    StateMachineBuilder::new()
        .build()
        .map(|def| BossEncounter::new("Broken", ActorId(0), arena(), def, &EngineConfig::default()))
}

#[test]
fn manager_spawns_updates_and_drops_encounters() {
    init_tracing();
    let mut registry = EncounterRegistry::new();
    registry
        .register(BOSS_KIND, "Test Boss", build_test_boss)
        .register(0xBAD, "Broken", build_broken);
    let mut manager = EncounterManager::new(registry, config());
    let mut world = party_world(&[(0.0, 10.0)]);

    world.add_actor(enemy(BOSS.0, BOSS_KIND, 0.0, 0.0));
    world.add_actor(enemy(101, 0xBAD, 5.0, 5.0));
    world.add_actor(enemy(102, 0x999, 5.0, 5.0));
    world.set_target(BOSS, Some(ActorId(1)));
    manager.update(&mut world);

    assert_eq!(manager.encounters().len(), 1);
    let encounter = manager.encounter_for(BOSS).unwrap();
    assert_eq!(encounter.name(), "Test Boss");
    assert!(encounter.machine().is_started());

    world.remove_actor(BOSS);
    manager.update(&mut world);
    assert!(manager.encounters().is_empty());
}

#[test]
fn manager_attaches_to_bosses_already_present() {
    let mut registry = EncounterRegistry::new();
    registry.register(BOSS_KIND, "Test Boss", build_test_boss);
    assert_eq!(registry.name(BOSS_KIND), Some("Test Boss"));

    let mut manager = EncounterManager::new(registry, config());
    let world = boss_world();
    manager.attach_existing(&world);
    manager.attach_existing(&world);

    assert_eq!(manager.encounters().len(), 1);
}

#[test]
fn registry_wraps_definition_errors() {
    let mut registry = EncounterRegistry::new();
    registry.register(0xBAD, "Broken", build_broken);
    let actor = enemy(1, 0xBAD, 0.0, 0.0);

    let error = registry.create(&actor, &config()).unwrap().unwrap_err();
    assert_eq!(error.to_string(), "invalid timeline for encounter Broken");
    assert!(matches!(
        std::error::Error::source(&error).and_then(|s| s.downcast_ref::<StateMachineError>()),
        Some(StateMachineError::Empty)
    ));
    assert!(registry.create(&enemy(2, 0x1, 0.0, 0.0), &config()).is_none());
}
