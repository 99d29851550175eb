use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use elemental_siege_core::{Element, Event, StatusKind, TimeScale, Vec2, WELCOME_BANNER};
use elemental_siege_engine::{
    CannedFlavor, EconomyTotals, FlavorError, FlavorSource, InMemoryLedger, PointerEvent,
    Simulation, SimulationConfig, BOSS_FLAVOR_FALLBACK,
};
use elemental_siege_world::query;

const FRAME: Duration = Duration::from_millis(16);

const STATIONARY_TARGET: &str = r#"
[waves]
base_count = 1
count_per_wave = 0
base_health = 40.0
health_per_wave = 0.0
base_speed = 0.0
speed_per_wave = 0.0
boss_interval = 0
"#;

struct Scripted(&'static str);

impl FlavorSource for Scripted {
    fn request_boss_flavor(&self, _wave: u32) -> Result<String, FlavorError> {
        Ok(self.0.to_owned())
    }
}

struct Offline;

impl FlavorSource for Offline {
    fn request_boss_flavor(&self, _wave: u32) -> Result<String, FlavorError> {
        Err(FlavorError::Unavailable("no network".to_owned()))
    }
}

fn simulation_from(config: &str) -> Simulation {
    Simulation::new(SimulationConfig::from_toml_str(config).expect("valid config"))
}

fn simulation_with_gold(config: &str, gold: u32) -> Simulation {
    Simulation::with_collaborators(
        SimulationConfig::from_toml_str(config).expect("valid config"),
        Arc::new(CannedFlavor),
        Box::new(InMemoryLedger::new(EconomyTotals { gold, diamonds: 0 })),
    )
}

fn place(simulation: &mut Simulation, element: Element, position: Vec2) -> Vec<Event> {
    let _ = simulation.toggle_placement(element);
    let down = PointerEvent::Down(position);
    simulation.handle_pointer(down).to_vec()
}

fn drag(simulation: &mut Simulation, from: Vec2, to: Vec2) -> Vec<Event> {
    let mut events = simulation.handle_pointer(PointerEvent::Down(from)).to_vec();
    events.extend_from_slice(simulation.handle_pointer(PointerEvent::Move(to)));
    events.extend_from_slice(simulation.handle_pointer(PointerEvent::Up(to)));
    events
}

fn run_frames(simulation: &mut Simulation, frames: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..frames {
        events.extend_from_slice(simulation.step(FRAME));
    }
    events
}

fn wait_for_announcement(simulation: &mut Simulation, expected: &str) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while simulation.announcement() != expected {
        assert!(
            Instant::now() < deadline,
            "announcement stuck at {:?}",
            simulation.announcement()
        );
        thread::sleep(Duration::from_millis(1));
        let _ = simulation.step(FRAME);
    }
}

#[test]
fn fresh_simulation_greets_the_commander() {
    let simulation = Simulation::new(SimulationConfig::default());
    let frame = simulation.snapshot();

    assert_eq!(simulation.announcement(), WELCOME_BANNER);
    assert!(!frame.state.started);
    assert!(frame.towers.is_empty());
    assert!(frame.enemies.is_empty());
}

#[test]
fn starting_a_run_spawns_the_first_wave_immediately() {
    let mut simulation = Simulation::new(SimulationConfig::default());

    let events = simulation.start_run().to_vec();

    assert!(events.contains(&Event::WaveStarted {
        wave: 1,
        enemies: 7,
        boss: false,
    }));
    let frame = simulation.snapshot();
    assert_eq!(frame.state.gold, 150);
    assert_eq!(frame.state.hearts, 10);
    assert_eq!(frame.enemies.len(), 7);
}

#[test]
fn placing_a_fire_tower_costs_fifty_and_reaches_the_ledger() {
    let mut simulation = Simulation::new(SimulationConfig::default());
    let _ = simulation.start_run();

    let _ = place(&mut simulation, Element::Fire, Vec2::new(100.0, 200.0));

    let frame = simulation.snapshot();
    assert_eq!(frame.state.gold, 100);
    assert_eq!(frame.towers.len(), 1);
    assert_eq!(frame.towers[0].tier.get(), 1);
    assert_eq!(simulation.ledger().totals().gold, 100);
}

#[test]
fn preview_follows_the_cursor_while_placing() {
    let mut simulation = Simulation::new(SimulationConfig::default());
    let _ = simulation.start_run();
    let _ = simulation.toggle_placement(Element::Water);

    let _ = simulation.handle_pointer(PointerEvent::Move(Vec2::new(100.0, 200.0)));
    let open = simulation.snapshot().preview.expect("placement armed");
    assert!(open.placeable);
    assert_eq!(open.range, 100.0);

    let _ = simulation.handle_pointer(PointerEvent::Move(Vec2::new(100.0, 100.0)));
    let blocked = simulation.snapshot().preview.expect("placement armed");
    assert!(!blocked.placeable);

    let _ = simulation.toggle_placement(Element::Water);
    assert!(simulation.snapshot().preview.is_none());
}

#[test]
fn rejected_placements_are_announced() {
    let mut simulation = simulation_with_gold("", 30);
    let _ = simulation.start_run();

    let _ = place(&mut simulation, Element::Fire, Vec2::new(200.0, 200.0));
    assert_eq!(simulation.announcement(), "Invalid position: Path blocked!");

    let _ = simulation.handle_pointer(PointerEvent::Down(Vec2::new(100.0, 200.0)));
    assert_eq!(simulation.announcement(), "Not enough gold!");
    assert_eq!(simulation.snapshot().state.gold, 30);
}

#[test]
fn fusion_is_announced_and_prices_the_next_tier() {
    let mut simulation = Simulation::new(SimulationConfig::default());
    let _ = simulation.start_run();
    let source = Vec2::new(100.0, 200.0);
    let target = Vec2::new(300.0, 200.0);
    let _ = place(&mut simulation, Element::Fire, source);
    let _ = place(&mut simulation, Element::Fire, target);

    let _ = drag(&mut simulation, source, target);

    assert_eq!(
        simulation.announcement(),
        "FUSION SUCCESS: Tier 2 FIRE Tower online."
    );
    let frame = simulation.snapshot();
    assert_eq!(frame.state.gold, 10);
    assert_eq!(frame.towers.len(), 1);
    assert_eq!(frame.selected_fusion_cost, Some(80));
}

#[test]
fn unaffordable_fusion_reports_an_empty_treasury() {
    let mut simulation = simulation_with_gold("", 100);
    let _ = simulation.start_run();
    let source = Vec2::new(100.0, 200.0);
    let target = Vec2::new(300.0, 200.0);
    let _ = place(&mut simulation, Element::Fire, source);
    let _ = place(&mut simulation, Element::Fire, target);

    let _ = drag(&mut simulation, source, target);

    assert_eq!(simulation.announcement(), "Treasury empty! Cannot fuse.");
    let frame = simulation.snapshot();
    assert_eq!(frame.towers.len(), 2);
    assert!(frame.towers.iter().any(|tower| tower.position == source));
    assert_eq!(frame.state.dragging_tower, None);
}

#[test]
fn enemy_dies_on_the_second_of_three_simultaneous_fire_hits() {
    let mut simulation = simulation_from(STATIONARY_TARGET);
    let _ = simulation.start_run();
    for position in [
        Vec2::new(0.0, 202.0),
        Vec2::new(-102.0, 100.0),
        Vec2::new(0.0, -2.0),
    ] {
        let placed = place(&mut simulation, Element::Fire, position);
        assert!(placed
            .iter()
            .any(|event| matches!(event, Event::TowerPlaced { .. })));
    }
    let target = simulation.snapshot().enemies[0].id;

    let events = run_frames(&mut simulation, 30);

    let fired = events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileFired { target: t, .. } if *t == target))
        .count();
    let impacts = events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileImpacted { hits: 1, .. }))
        .count();
    let discarded = events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileDiscarded { .. }))
        .count();
    let kills: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemyKilled { enemy, reward } => Some((*enemy, *reward)),
            _ => None,
        })
        .collect();

    assert_eq!(fired, 3);
    assert_eq!(impacts, 2);
    assert_eq!(discarded, 1);
    assert_eq!(kills, vec![(target, 15)]);
    let frame = simulation.snapshot();
    assert!(frame.enemies.iter().all(|enemy| enemy.id != target));
    assert_eq!(frame.state.gold, 15);
    assert_eq!(frame.state.wave, 2);
}

#[test]
fn burn_and_slow_coexist_on_one_enemy() {
    let mut simulation = simulation_from(STATIONARY_TARGET);
    let _ = simulation.start_run();
    let _ = place(&mut simulation, Element::Fire, Vec2::new(0.0, 202.0));
    let _ = place(&mut simulation, Element::Water, Vec2::new(-95.0, 100.0));

    let mut impacts = 0;
    for _ in 0..40 {
        impacts += simulation
            .step(FRAME)
            .iter()
            .filter(|event| matches!(event, Event::ProjectileImpacted { .. }))
            .count();
        if impacts == 2 {
            break;
        }
    }
    assert_eq!(impacts, 2);

    let frame = simulation.snapshot();
    let enemy = frame.enemies.first().expect("enemy survives both hits");
    let kinds: Vec<_> = enemy.effects.iter().map(|effect| effect.kind()).collect();
    assert!(kinds.contains(&StatusKind::Burn));
    assert!(kinds.contains(&StatusKind::Slow));
    assert_eq!(kinds.len(), 2);
    assert!((enemy.health - 5.0).abs() < 1e-3);
}

#[test]
fn pausing_freezes_the_battlefield_and_pointer_downs() {
    let mut simulation = Simulation::new(SimulationConfig::default());
    let _ = simulation.start_run();
    let _ = run_frames(&mut simulation, 3);
    let clock = query::clock(simulation.world());
    let _ = simulation.toggle_placement(Element::Fire);

    let _ = simulation.toggle_pause();
    let events = run_frames(&mut simulation, 10);
    let placed = simulation
        .handle_pointer(PointerEvent::Down(Vec2::new(100.0, 200.0)))
        .to_vec();

    assert!(events.is_empty());
    assert!(placed.is_empty());
    assert_eq!(query::clock(simulation.world()), clock);

    let _ = simulation.toggle_pause();
    assert!(!run_frames(&mut simulation, 1).is_empty());
}

#[test]
fn time_scale_cycles_and_resets_on_redeploy() {
    let mut simulation = Simulation::new(SimulationConfig::default());
    let _ = simulation.start_run();

    let _ = simulation.cycle_time_scale();
    assert_eq!(simulation.snapshot().state.time_scale, TimeScale::Double);
    let _ = simulation.cycle_time_scale();
    assert_eq!(simulation.snapshot().state.time_scale, TimeScale::Quadruple);

    let _ = simulation.start_run();
    assert_eq!(simulation.snapshot().state.time_scale, TimeScale::Normal);

    let _ = simulation.cycle_time_scale();
    let _ = simulation.cycle_time_scale();
    let _ = simulation.cycle_time_scale();
    assert_eq!(simulation.snapshot().state.time_scale, TimeScale::Normal);
}

#[test]
fn losing_the_last_heart_ends_the_run_until_redeploy() {
    let mut simulation = simulation_from(
        r#"
        [economy]
        hearts = 1

        [waves]
        base_count = 1
        count_per_wave = 0
        base_speed = 50.0
        speed_per_wave = 0.0
        "#,
    );
    let _ = simulation.start_run();

    let events = run_frames(&mut simulation, 200);

    assert!(events.contains(&Event::GameOver { wave: 1 }));
    assert!(simulation.snapshot().state.game_over);
    assert!(run_frames(&mut simulation, 5).is_empty());

    let _ = simulation.start_run();
    let state = simulation.snapshot().state;
    assert!(!state.game_over);
    assert_eq!(state.hearts, 1);
    assert_eq!(state.wave, 1);
}

#[test]
fn abandoning_returns_to_the_menu() {
    let mut simulation = Simulation::new(SimulationConfig::default());
    let _ = simulation.start_run();
    let _ = simulation.toggle_pause();

    let events = simulation.abandon().to_vec();

    assert_eq!(events, vec![Event::RunAbandoned]);
    let state = simulation.snapshot().state;
    assert!(!state.started);
    assert!(!state.paused);
    assert!(run_frames(&mut simulation, 3).is_empty());
}

#[test]
fn boss_waves_show_fallback_then_the_collaborator_text() {
    let config = SimulationConfig::from_toml_str("[waves]\nboss_interval = 1\n").expect("valid");
    let mut simulation = Simulation::with_collaborators(
        config,
        Arc::new(Scripted("The titan wakes.")),
        Box::new(InMemoryLedger::new(EconomyTotals {
            gold: 150,
            diamonds: 0,
        })),
    );

    let events = simulation.start_run().to_vec();

    assert!(events.contains(&Event::WaveStarted {
        wave: 1,
        enemies: 7,
        boss: true,
    }));
    assert_eq!(simulation.announcement(), BOSS_FLAVOR_FALLBACK);
    wait_for_announcement(&mut simulation, "The titan wakes.");
}

#[test]
fn failed_flavor_requests_keep_the_fallback() {
    let config = SimulationConfig::from_toml_str("[waves]\nboss_interval = 1\n").expect("valid");
    let mut simulation = Simulation::with_collaborators(
        config,
        Arc::new(Offline),
        Box::new(InMemoryLedger::default()),
    );
    let _ = simulation.start_run();

    let deadline = Instant::now() + Duration::from_millis(200);
    while Instant::now() < deadline {
        let _ = simulation.step(FRAME);
        assert_eq!(simulation.announcement(), BOSS_FLAVOR_FALLBACK);
        thread::sleep(Duration::from_millis(5));
    }
}
