use nova_defence_core::{Command, EnemyKind, Event};
use nova_defence_system_spawning::{WaveDirector, WavePhase};
use nova_defence_world::{testing, World};

fn started_director(world: &mut World) -> (WaveDirector, Vec<Event>) {
    let mut director = WaveDirector::new();
    director.initialize(world);
    let mut events = Vec::new();
    director.handle(&[Command::StartNextWave], world, 0.1, &mut events);
    (director, events)
}

fn clear_field(world: &mut World) {
    for id in world.enemy_ids() {
        let _ = world.remove_enemy(id);
        world.decrement_enemies_remaining();
    }
}

#[test]
fn manual_start_spawns_head_immediately() {
    let mut world = testing::playing_world();
    let (director, events) = started_director(&mut world);

    assert_eq!(director.phase(), WavePhase::Spawning);
    assert_eq!(world.enemy_count(), 1);
    assert_eq!(
        events[0],
        Event::WaveStarted {
            wave: 1,
            enemies: 3
        }
    );
    match &events[1] {
        Event::EnemySpawned { kind, position, .. } => {
            assert_eq!(*kind, EnemyKind::Floofernaut);
            assert_eq!(*position, testing::SAMPLE_PATH[0]);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn spawn_delays_are_relative_to_previous_spawn() {
    let mut world = testing::playing_world();
    let (mut director, _) = started_director(&mut world);
    let mut events = Vec::new();

    director.update(&mut world, 0.5, &mut events);
    assert_eq!(world.enemy_count(), 1, "half a delay spawns nothing");

    director.update(&mut world, 0.5, &mut events);
    assert_eq!(world.enemy_count(), 2);

    director.update(&mut world, 0.9, &mut events);
    assert_eq!(world.enemy_count(), 2, "timer restarted at the second spawn");

    director.update(&mut world, 0.1, &mut events);
    assert_eq!(world.enemy_count(), 3);
    assert_eq!(director.phase(), WavePhase::WaitingForClear);
    assert_eq!(director.queued(), 0);
}

#[test]
fn starting_while_a_wave_runs_is_a_no_op() {
    let mut world = testing::playing_world();
    let (mut director, _) = started_director(&mut world);
    let mut events = Vec::new();

    assert!(!director.start_next_wave(&mut world, &mut events));
    assert!(events.is_empty());
    assert_eq!(world.wave_status().current_wave, 0);
    assert_eq!(world.wave_status().enemies_remaining, 3);
}

#[test]
fn clearing_the_field_completes_the_wave_once() {
    let mut world = testing::playing_world();
    let (mut director, _) = started_director(&mut world);
    let mut events = Vec::new();
    director.update(&mut world, 1.0, &mut events);
    director.update(&mut world, 1.0, &mut events);
    assert_eq!(director.phase(), WavePhase::WaitingForClear);

    director.update(&mut world, 0.1, &mut events);
    assert_eq!(director.phase(), WavePhase::WaitingForClear);

    clear_field(&mut world);
    events.clear();
    director.update(&mut world, 0.1, &mut events);
    director.update(&mut world, 0.1, &mut events);

    let status = world.wave_status();
    assert_eq!(status.current_wave, 1);
    assert!(!status.wave_in_progress);
    assert_eq!(status.enemies_remaining, 0);
    assert_eq!(world.economy().currency, 200 + 35);
    assert_eq!(events, vec![Event::WaveCompleted { wave: 1, bonus: 35 }]);
    assert_eq!(director.phase(), WavePhase::BetweenWaves { countdown: None });
}

#[test]
fn final_wave_marks_schedule_complete() {
    let mut world = testing::playing_world();
    let mut director = WaveDirector::new();
    director.initialize(&mut world);
    let mut events = Vec::new();

    for _ in 0..2 {
        assert!(director.start_next_wave(&mut world, &mut events));
        for _ in 0..5 {
            director.update(&mut world, 1.0, &mut events);
        }
        clear_field(&mut world);
        director.update(&mut world, 0.1, &mut events);
    }

    assert_eq!(director.phase(), WavePhase::Complete);
    assert_eq!(world.wave_status().current_wave, 2);
    assert_eq!(events.last(), Some(&Event::AllWavesCompleted));
    assert!(!director.start_next_wave(&mut world, &mut events));
}

#[test]
fn auto_start_counts_down_from_first_wave_delay() {
    let mut config = testing::sample_config();
    config.wave_schedule.first_wave_delay = Some(2.0);
    config.wave_schedule.auto_advance = true;
    let mut world = testing::playing_world_with(config);
    let mut director = WaveDirector::new();
    director.initialize(&mut world);
    let mut events = Vec::new();

    director.update(&mut world, 1.0, &mut events);
    assert_eq!(
        director.phase(),
        WavePhase::BetweenWaves {
            countdown: Some(1.0)
        }
    );
    assert_eq!(world.enemy_count(), 0);

    director.update(&mut world, 1.0, &mut events);
    assert_eq!(director.phase(), WavePhase::Spawning);
    assert_eq!(world.enemy_count(), 1);

    director.update(&mut world, 1.0, &mut events);
    director.update(&mut world, 1.0, &mut events);
    clear_field(&mut world);
    director.update(&mut world, 0.1, &mut events);

    assert_eq!(
        director.phase(),
        WavePhase::BetweenWaves {
            countdown: Some(3.0)
        }
    );
}
