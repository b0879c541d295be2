use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use lane_defence_core::{stats_for, CellCoord, Command, EnemyKind, Event, LevelGrid};
use lane_defence_world::{apply, query, CombatSimulation, Config};

const FRAME: Duration = Duration::from_nanos(16_666_667);

/// Ten lane tiles along row 1 with one free tile just past the lane end.
fn straight_lane() -> CombatSimulation<LevelGrid> {
    let text = ["wwwwwwwwwww", "++++++++++ ", "wwwwwwwwwww"].join("\n");
    let grid = LevelGrid::parse(&text, 50.0).expect("test level");
    CombatSimulation::new(grid, Config::new(7))
}

fn run_frames(simulation: &mut CombatSimulation<LevelGrid>, frames: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..frames {
        apply(simulation, Command::Tick { dt: FRAME }, &mut events);
    }
    events
}

#[test]
fn unopposed_enemy_escapes_exactly_once() {
    let mut simulation = straight_lane();
    let enemy = simulation.spawn_enemy(EnemyKind::Basic).expect("lane exists");

    let events = run_frames(&mut simulation, 8 * 60);

    let escapes: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyEscaped { .. }))
        .collect();
    assert_eq!(
        escapes,
        vec![&Event::EnemyEscaped {
            enemy,
            kind: EnemyKind::Basic,
        }]
    );
    assert_eq!(query::live_enemy_count(&simulation), 0);
    assert_eq!(simulation.consume_escaped_enemies(), vec![EnemyKind::Basic]);
    assert!(simulation.consume_escaped_enemies().is_empty());
}

#[test]
fn escape_queue_is_independent_of_the_event_journal() {
    let mut simulation = straight_lane();
    let _ = simulation.spawn_enemy(EnemyKind::Fast);
    simulation.tick(Duration::from_secs(10));

    assert!(simulation
        .drain_events()
        .contains(&Event::EnemyEscaped {
            enemy: lane_defence_core::EnemyId::new(0),
            kind: EnemyKind::Fast,
        }));
    assert_eq!(simulation.consume_escaped_enemies(), vec![EnemyKind::Fast]);
    assert!(simulation.consume_escaped_enemies().is_empty());
}

#[test]
fn turret_beside_the_lane_kills_a_basic_enemy_before_it_escapes() {
    let mut simulation = straight_lane();
    assert!(simulation.place_turret(CellCoord::new(10, 1)));
    let enemy = simulation.spawn_enemy(EnemyKind::Basic).expect("lane exists");

    let events = run_frames(&mut simulation, 8 * 60);

    assert!(events.contains(&Event::EnemyKilled {
        enemy,
        kind: EnemyKind::Basic,
    }));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::EnemyEscaped { .. })));
    let shots = events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileFired { .. }))
        .count();
    assert!(shots >= 3, "three hits are needed, saw {shots} shots");
    assert!(simulation.consume_escaped_enemies().is_empty());
    assert_eq!(query::live_enemy_count(&simulation), 0);
}

#[test]
fn firing_resets_cooldown_to_the_fire_interval() {
    let mut simulation = straight_lane();
    assert!(simulation.place_turret(CellCoord::new(10, 1)));
    let _ = simulation.spawn_enemy(EnemyKind::Tank);

    let mut fired = false;
    for _ in 0..20 * 60 {
        simulation.tick(FRAME);
        if simulation
            .drain_events()
            .iter()
            .any(|event| matches!(event, Event::ProjectileFired { .. }))
        {
            fired = true;
            break;
        }
    }

    assert!(fired);
    let turret = &query::turrets(&simulation)[0];
    assert_eq!(turret.cooldown_remaining(), 0.5);
    assert!(turret.just_fired());
    assert_eq!(query::projectiles(&simulation).len(), 1);
}

#[test]
fn turret_out_of_reach_never_fires() {
    let text = ["++++++++++", "wwwwwwwwww", "wwwwwwwwww", "wwwwwwwwww", "    wwwwww"].join("\n");
    let grid = LevelGrid::parse(&text, 50.0).expect("test level");
    let mut simulation = CombatSimulation::new(grid, Config::default());
    assert!(simulation.place_turret(CellCoord::new(0, 4)));
    for _ in 0..5 {
        let _ = simulation.spawn_enemy(EnemyKind::Tank);
    }

    let events = run_frames(&mut simulation, 30 * 60);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ProjectileFired { .. })));
    assert_eq!(simulation.consume_escaped_enemies().len(), 5);
}

#[test]
fn enemies_escaping_this_tick_are_never_targeted() {
    let mut simulation = straight_lane();
    assert!(simulation.place_turret(CellCoord::new(10, 1)));
    let _ = simulation.spawn_enemy(EnemyKind::Basic);

    let mut events = Vec::new();
    apply(
        &mut simulation,
        Command::Tick {
            dt: Duration::from_secs(60),
        },
        &mut events,
    );

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ProjectileFired { .. })));
    assert_eq!(simulation.consume_escaped_enemies(), vec![EnemyKind::Basic]);
}

#[test]
fn projectile_outliving_its_target_expires() {
    let mut simulation = straight_lane();
    assert!(simulation.place_turret(CellCoord::new(10, 1)));
    let _ = simulation.spawn_enemy(EnemyKind::Basic);

    while query::projectiles(&simulation).is_empty() {
        simulation.tick(FRAME);
    }
    // One long step carries the enemy past the lane end before the shot lands.
    simulation.tick(Duration::from_secs(2));

    assert!(query::projectiles(&simulation).is_empty());
    assert_eq!(simulation.consume_escaped_enemies(), vec![EnemyKind::Basic]);
    assert!(!simulation
        .drain_events()
        .iter()
        .any(|event| matches!(event, Event::EnemyKilled { .. })));
}

#[test]
fn first_wave_is_spent_then_cleared_once_the_lane_empties() {
    let mut simulation = straight_lane();
    let mut events = Vec::new();
    apply(&mut simulation, Command::StartNextWave, &mut events);
    assert_eq!(events, vec![Event::WaveStarted { level: 0, wave: 0 }]);

    let mut escaped = Vec::new();
    for _ in 0..200 {
        apply(
            &mut simulation,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );
        escaped.extend(simulation.consume_escaped_enemies());
        if simulation.is_awaiting_player_start() {
            break;
        }
    }

    assert!(simulation.is_awaiting_player_start());
    assert_eq!(simulation.current_wave(), 1);
    assert!(events.contains(&Event::WaveCleared { level: 0, wave: 0 }));
    let spent: u32 = escaped.iter().map(|kind| stats_for(*kind).spawn_cost).sum();
    assert_eq!(spent, 10);
    assert!(escaped
        .iter()
        .all(|kind| matches!(kind, EnemyKind::Basic | EnemyKind::Fast)));
}

#[test]
fn identical_command_streams_replay_identically() {
    let first = replay();
    let second = replay();
    assert_eq!(first, second, "replay diverged between runs");

    let fingerprint = |events: &[Event]| {
        let mut hasher = DefaultHasher::new();
        format!("{events:?}").hash(&mut hasher);
        hasher.finish()
    };
    assert_eq!(fingerprint(&first), fingerprint(&second));
}

fn replay() -> Vec<Event> {
    let mut simulation = straight_lane();
    let mut events = Vec::new();
    apply(
        &mut simulation,
        Command::PlaceTurret {
            cell: CellCoord::new(10, 1),
        },
        &mut events,
    );
    for _ in 0..3 {
        apply(&mut simulation, Command::StartNextWave, &mut events);
        events.extend(run_frames(&mut simulation, 40 * 60));
    }
    events
}
