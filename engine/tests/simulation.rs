use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use nova_defence_core::{
    AbilitySlot, Command, EconomyConfig, EnemyKind, Event, GameConfig, GamePhase, HeroKind,
    PlacementError, SpawnGroup, SpotId, TowerKind, WaveConfig,
};
use nova_defence_engine::Simulation;
use nova_defence_system_spawning::WavePhase;
use nova_defence_world::{testing, CommandError};

fn single_floof_config() -> GameConfig {
    let mut config = testing::sample_config();
    config.waves = vec![WaveConfig {
        id: 1,
        enemies: vec![SpawnGroup {
            kind: EnemyKind::Floofernaut,
            count: 1,
            spawn_delay: 0.0,
        }],
        delay_between_waves: 0.0,
    }];
    config
}

fn started(config: GameConfig) -> Simulation {
    let mut simulation = Simulation::new(config).expect("configuration is valid");
    simulation
        .submit(Command::StartGame)
        .expect("menu transitions to playing");
    simulation
}

fn run_until_over(simulation: &mut Simulation, max_ticks: usize) -> Vec<Event> {
    let mut log = Vec::new();
    for _ in 0..max_ticks {
        log.extend_from_slice(simulation.tick(0.1));
        if simulation.world().phase().is_over() {
            break;
        }
    }
    log
}

#[test]
fn clearing_the_last_wave_wins_the_match() {
    let mut simulation = started(single_floof_config());
    simulation
        .submit(Command::PlaceTower {
            kind: TowerKind::PlasmaSpire,
            spot: SpotId::new(0),
        })
        .expect("affordable");
    simulation
        .submit(Command::PlaceTower {
            kind: TowerKind::RailCannon,
            spot: SpotId::new(1),
        })
        .expect("affordable");
    simulation
        .submit(Command::StartNextWave)
        .expect("wave start allowed while playing");

    let log = run_until_over(&mut simulation, 400);

    assert_eq!(simulation.world().phase(), GamePhase::Won);
    assert!(log.contains(&Event::AllWavesCompleted));
    assert!(log.contains(&Event::PhaseChanged {
        from: GamePhase::Playing,
        to: GamePhase::Won,
    }));
    assert_eq!(simulation.wave_director().phase(), WavePhase::Complete);
}

#[test]
fn escaping_enemies_lose_the_match_once() {
    let mut config = single_floof_config();
    config.economy = EconomyConfig {
        starting_lives: 1,
        ..EconomyConfig::default()
    };
    let mut simulation = started(config);
    simulation
        .submit(Command::StartNextWave)
        .expect("wave start allowed while playing");

    let log = run_until_over(&mut simulation, 400);

    assert_eq!(simulation.world().phase(), GamePhase::Lost);
    let losses = log
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::PhaseChanged {
                    to: GamePhase::Lost,
                    ..
                }
            )
        })
        .count();
    assert_eq!(losses, 1);

    let clock = simulation.world().clock();
    assert!(simulation.tick(0.1).is_empty());
    assert_eq!(simulation.world().clock(), clock);
}

#[test]
fn paused_matches_do_not_advance() {
    let mut simulation = started(testing::sample_config());
    simulation.submit(Command::Pause).expect("pause while playing");

    let _ = simulation.tick(0.1);
    assert_eq!(simulation.world().clock(), 0.0);

    simulation.submit(Command::Resume).expect("resume while paused");
    let _ = simulation.tick(0.05);
    assert_eq!(simulation.world().clock(), 0.05);
}

#[test]
fn oversized_deltas_are_clamped() {
    let mut simulation = started(testing::sample_config());

    let _ = simulation.tick(5.0);

    assert_eq!(simulation.world().clock(), 0.1);
}

#[test]
fn nothing_advances_in_the_menu() {
    let mut simulation = Simulation::new(testing::sample_config()).expect("valid");

    let _ = simulation.tick(0.1);

    assert_eq!(simulation.world().phase(), GamePhase::Menu);
    assert_eq!(simulation.world().clock(), 0.0);
}

#[test]
fn queued_ability_resolves_on_the_next_tick() {
    let mut simulation = started(testing::sample_config());
    simulation
        .submit(Command::ActivateAbility {
            slot: AbilitySlot::Second,
        })
        .expect("ability requests are accepted while playing");

    let events = simulation.tick(0.1).to_vec();

    assert!(events.iter().any(|event| matches!(
        event,
        Event::AbilityCast {
            slot: AbilitySlot::Second,
            ultimate: false,
            ..
        }
    )));
    assert!(simulation.tick(0.1).is_empty());
}

#[test]
fn rejected_commands_surface_on_the_next_tick() {
    let mut simulation = started(testing::sample_config());

    let result = simulation.submit(Command::PlaceTower {
        kind: TowerKind::PlasmaSpire,
        spot: SpotId::new(42),
    });

    assert_eq!(
        result,
        Err(CommandError::Placement(PlacementError::UnknownSpot))
    );
    let events = simulation.tick(0.1);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::TowerPlacementRejected {
            reason: PlacementError::UnknownSpot,
            ..
        }
    )));
}

#[test]
fn reset_rearms_the_wave_director() {
    let mut simulation = started(testing::sample_config());
    simulation.submit(Command::StartNextWave).expect("allowed");
    for _ in 0..20 {
        let _ = simulation.tick(0.1);
    }
    assert!(simulation.world().enemy_count() > 0);

    simulation.submit(Command::ResetGame).expect("reset succeeds");

    assert_eq!(simulation.world().enemy_count(), 0);
    assert_eq!(simulation.world().clock(), 0.0);
    assert_eq!(simulation.world().wave_status().total_waves, 2);
    assert_eq!(
        simulation.wave_director().phase(),
        WavePhase::BetweenWaves { countdown: None }
    );
}

fn scripted_fingerprint() -> u64 {
    let mut simulation = Simulation::with_default_config().expect("default configuration");
    simulation.submit(Command::StartGame).expect("start");
    simulation
        .submit(Command::SwitchHero {
            kind: HeroKind::Assassin,
        })
        .expect("switch");
    for (kind, spot) in [
        (TowerKind::PlasmaSpire, 1),
        (TowerKind::RailCannon, 2),
    ] {
        simulation
            .submit(Command::PlaceTower {
                kind,
                spot: SpotId::new(spot),
            })
            .expect("affordable");
    }

    let mut hasher = DefaultHasher::new();
    for step in 0..900 {
        if step % 50 == 0 {
            let _ = simulation.submit(Command::ActivateAbility {
                slot: AbilitySlot::Second,
            });
        }
        if step == 300 {
            let _ = simulation.submit(Command::MoveHero { x: -4.0, z: -4.0 });
        }
        for event in simulation.tick(0.1) {
            format!("{event:?}").hash(&mut hasher);
        }
        if simulation.world().phase().is_over() {
            break;
        }
    }
    simulation.world().economy().score.hash(&mut hasher);
    simulation.world().clock().to_bits().hash(&mut hasher);
    hasher.finish()
}

#[test]
fn identical_scripts_replay_identically() {
    assert_eq!(scripted_fingerprint(), scripted_fingerprint());
}
