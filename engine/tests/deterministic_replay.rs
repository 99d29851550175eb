use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use elemental_siege_core::{Element, EnemyId, EnemySnapshot, Event, ProjectileId, TowerId, Vec2};
use elemental_siege_engine::{PointerEvent, Simulation, SimulationConfig};

#[derive(Clone, Copy, Debug)]
enum Input {
    Arm(Element),
    Pointer(PointerEvent),
    CycleSpeed,
    Frames(u32),
}

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(&scripted_inputs());
    let second = replay(&scripted_inputs());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(
        first
            .events
            .iter()
            .any(|record| matches!(record, EventRecord::EnemyKilled { .. })),
        "scripted defense should kill at least one enemy"
    );
}

#[test]
fn different_inputs_change_the_fingerprint() {
    let mut altered = scripted_inputs();
    altered.retain(|input| !matches!(input, Input::CycleSpeed));

    assert_ne!(
        replay(&scripted_inputs()).fingerprint(),
        replay(&altered).fingerprint()
    );
}

fn replay(inputs: &[Input]) -> ReplayOutcome {
    let mut simulation = Simulation::new(SimulationConfig::default());
    let mut log = Vec::new();
    record_events(simulation.start_run(), &mut log);

    for input in inputs {
        match *input {
            Input::Arm(element) => record_events(simulation.toggle_placement(element), &mut log),
            Input::Pointer(event) => record_events(simulation.handle_pointer(event), &mut log),
            Input::CycleSpeed => record_events(simulation.cycle_time_scale(), &mut log),
            Input::Frames(count) => {
                for _ in 0..count {
                    record_events(simulation.step(Duration::from_millis(16)), &mut log);
                }
            }
        }
    }

    let enemies = simulation
        .snapshot()
        .enemies
        .into_iter()
        .map(EnemyState::from)
        .collect();

    ReplayOutcome {
        enemies,
        events: log,
    }
}

fn record_events(events: &[Event], log: &mut Vec<EventRecord>) {
    log.extend(events.iter().filter_map(EventRecord::from_event));
}

fn scripted_inputs() -> Vec<Input> {
    vec![
        Input::Arm(Element::Fire),
        Input::Pointer(PointerEvent::Down(Vec2::new(100.0, 200.0))),
        Input::Arm(Element::Water),
        Input::Pointer(PointerEvent::Down(Vec2::new(300.0, 200.0))),
        Input::Frames(120),
        Input::CycleSpeed,
        Input::Pointer(PointerEvent::Down(Vec2::new(300.0, 200.0))),
        Input::Pointer(PointerEvent::Move(Vec2::new(350.0, 220.0))),
        Input::Pointer(PointerEvent::Up(Vec2::new(350.0, 220.0))),
        Input::Frames(240),
        Input::Arm(Element::Earth),
        Input::Pointer(PointerEvent::Down(Vec2::new(600.0, 250.0))),
        Input::Frames(240),
    ]
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    enemies: Vec<EnemyState>,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct EnemyState {
    id: EnemyId,
    position: (u32, u32),
    health: u32,
    path_index: usize,
    effects: usize,
}

impl From<EnemySnapshot> for EnemyState {
    fn from(snapshot: EnemySnapshot) -> Self {
        Self {
            id: snapshot.id,
            position: (snapshot.position.x.to_bits(), snapshot.position.y.to_bits()),
            health: snapshot.health.to_bits(),
            path_index: snapshot.path_index,
            effects: snapshot.effects.len(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    TimeAdvanced {
        dt_micros: u128,
    },
    ProjectileFired {
        projectile: ProjectileId,
        tower: TowerId,
        target: EnemyId,
    },
    EnemyKilled {
        enemy: EnemyId,
        reward: u32,
    },
    EnemyEscaped {
        enemy: EnemyId,
        hearts: u32,
    },
    WaveStarted {
        wave: u32,
        enemies: usize,
    },
    TowerPlaced {
        tower: TowerId,
    },
    TowerMoved {
        tower: TowerId,
    },
}

impl EventRecord {
    fn from_event(event: &Event) -> Option<Self> {
        let record = match *event {
            Event::TimeAdvanced { dt } => Self::TimeAdvanced {
                dt_micros: dt.as_micros(),
            },
            Event::ProjectileFired {
                projectile,
                tower,
                target,
            } => Self::ProjectileFired {
                projectile,
                tower,
                target,
            },
            Event::EnemyKilled { enemy, reward } => Self::EnemyKilled { enemy, reward },
            Event::EnemyEscaped { enemy, hearts } => Self::EnemyEscaped { enemy, hearts },
            Event::WaveStarted { wave, enemies, .. } => Self::WaveStarted { wave, enemies },
            Event::TowerPlaced { tower, .. } => Self::TowerPlaced { tower },
            Event::TowerMoved { tower, .. } => Self::TowerMoved { tower },
            _ => return None,
        };
        Some(record)
    }
}
