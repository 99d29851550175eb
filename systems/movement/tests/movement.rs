use std::time::Duration;

use elemental_siege_core::{Command, EnemySpawn, Event, Vec2};
use elemental_siege_system_movement::Movement;
use elemental_siege_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);

fn started_world_with_enemy(speed: f32) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StartRun {
            gold: 150,
            diamonds: 0,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnWave {
            wave: 1,
            enemies: vec![EnemySpawn {
                position: Vec2::new(0.0, 100.0),
                health: 30.0,
                speed,
                reward: 15,
                boss: false,
            }],
        },
        &mut events,
    );
    world
}

fn pump_frame(world: &mut World, movement: &mut Movement) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: FRAME }, &mut events);
    movement.observe(&events);

    let mut commands = Vec::new();
    movement.advance_enemies(
        &query::enemy_view(world),
        &[],
        query::path(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn path_index_stays_within_path_until_release() {
    let mut world = started_world_with_enemy(50.0);
    let mut movement = Movement::new();
    let path_len = query::path(&world).len();
    let mut escaped = None;

    for frame in 0..200 {
        for enemy in query::enemy_view(&world).iter() {
            assert!(enemy.path_index < path_len);
        }
        let events = pump_frame(&mut world, &mut movement);
        if let Some(hearts) = events.iter().find_map(|event| match event {
            Event::EnemyEscaped { hearts, .. } => Some(*hearts),
            _ => None,
        }) {
            escaped = Some((frame, hearts));
            break;
        }
    }

    let (_, hearts) = escaped.expect("enemy should reach the exit");
    assert_eq!(hearts, 9);
    assert!(query::enemy_view(&world).is_empty());
}

#[test]
fn path_index_never_decreases() {
    let mut world = started_world_with_enemy(3.0);
    let mut movement = Movement::new();
    let mut last_index = 0;

    for _ in 0..400 {
        let _ = pump_frame(&mut world, &mut movement);
        let Some(enemy) = query::enemy_view(&world).iter().next().cloned() else {
            break;
        };
        assert!(enemy.path_index >= last_index);
        last_index = enemy.path_index;
    }

    assert!(
        last_index >= 2,
        "enemy should have turned at least two corners"
    );
}
