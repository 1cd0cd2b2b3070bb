//! Programmatic configuration and placement helpers shared by system tests.

use nova_defence_core::{
    AbilityConfig, AbilityParams, ArmorBehavior, Behaviors, BurrowBehavior, Command,
    DodgeBehavior, EconomyConfig, EnemyConfig, EnemyId, EnemyKind, GameConfig,
    HeroAbilityConfigs, HeroConfig, HeroKind, MapConfig, SpawnGroup, SpecialEffect,
    SplitBehavior, SpotId, StatModifiers, TeleportBehavior, TowerConfig, TowerId, TowerKind,
    TowerSpotConfig, TowerUpgrades, TrailBehavior, UpgradeConfig, Vec3, WaveConfig,
    WaveScheduleConfig,
};

use crate::{apply, World};

/// Waypoints of the sample route: four ten-unit segments.
pub const SAMPLE_PATH: [Vec3; 5] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(10.0, 0.0, 0.0),
    Vec3::new(10.0, 0.0, 10.0),
    Vec3::new(20.0, 0.0, 10.0),
    Vec3::new(20.0, 0.0, 20.0),
];

/// Complete configuration with every kind present and manual wave starts.
#[must_use]
pub fn sample_config() -> GameConfig {
    GameConfig {
        seed: 0x5eed,
        max_tick_delta: 0.1,
        starting_hero: HeroKind::Fighter,
        economy: EconomyConfig::default(),
        wave_schedule: WaveScheduleConfig {
            first_wave_delay: None,
            auto_advance: false,
        },
        waves: vec![
            WaveConfig {
                id: 1,
                enemies: vec![SpawnGroup {
                    kind: EnemyKind::Floofernaut,
                    count: 3,
                    spawn_delay: 1.0,
                }],
                delay_between_waves: 3.0,
            },
            WaveConfig {
                id: 2,
                enemies: vec![
                    SpawnGroup {
                        kind: EnemyKind::SirScuttles,
                        count: 2,
                        spawn_delay: 0.5,
                    },
                    SpawnGroup {
                        kind: EnemyKind::Chonkzilla,
                        count: 1,
                        spawn_delay: 0.0,
                    },
                ],
                delay_between_waves: 3.0,
            },
        ],
        map: MapConfig {
            path: SAMPLE_PATH.to_vec(),
            spawn_point: SAMPLE_PATH[0],
            hero_start: Vec3::new(5.0, 0.0, -5.0),
            tower_spots: vec![
                spot(0, Vec3::new(5.0, 0.0, 2.0)),
                spot(1, Vec3::new(12.0, 0.0, 5.0)),
                spot(2, Vec3::new(15.0, 0.0, 12.0)),
                spot(3, Vec3::new(22.0, 0.0, 15.0)),
            ],
        },
        enemies: sample_enemies(),
        towers: sample_towers(),
        heroes: sample_heroes(),
    }
}

/// Builds a world from the sample configuration and starts play.
#[must_use]
pub fn playing_world() -> World {
    playing_world_with(sample_config())
}

/// Builds a world from `config` and starts play.
#[must_use]
pub fn playing_world_with(config: GameConfig) -> World {
    let mut world = World::new(config).expect("sample configuration is valid");
    let mut events = Vec::new();
    apply(&mut world, Command::StartGame, &mut events).expect("menu transitions to playing");
    world
}

/// Spawns an enemy and places it at `(path_index, path_progress)`.
pub fn place_enemy(
    world: &mut World,
    kind: EnemyKind,
    path_index: usize,
    path_progress: f32,
) -> EnemyId {
    let position = world.path().position_on_segment(path_index, path_progress);
    let rotation = world.path().segment_heading(path_index);
    let id = world
        .spawn_enemy(kind, position)
        .expect("sample configuration has every enemy kind");
    let enemy = world.enemy_mut(id).expect("enemy was just spawned");
    enemy.path_index = path_index;
    enemy.path_progress = path_progress;
    enemy.rotation = rotation;
    id
}

/// Spawns an enemy at an arbitrary world position, off the path encoding.
pub fn place_enemy_at(world: &mut World, kind: EnemyKind, position: Vec3) -> EnemyId {
    world
        .spawn_enemy(kind, position)
        .expect("sample configuration has every enemy kind")
}

/// Buys a tower on `spot`.
pub fn build_tower(world: &mut World, kind: TowerKind, spot: SpotId) -> TowerId {
    let mut events = Vec::new();
    apply(world, Command::PlaceTower { kind, spot }, &mut events)
        .expect("tower placement succeeds");
    world
        .towers()
        .find(|tower| tower.spot == spot)
        .map(|tower| tower.id)
        .expect("tower stands on the spot")
}

/// Moves the hero to `position` and leaves it standing still.
pub fn set_hero_position(world: &mut World, position: Vec3) {
    let hero = world.hero_mut();
    hero.position = position;
    hero.target_position = None;
    hero.is_moving = false;
}

/// Swaps the hero for a fresh record of `kind`.
pub fn switch_hero(world: &mut World, kind: HeroKind) {
    let mut events = Vec::new();
    apply(world, Command::SwitchHero { kind }, &mut events).expect("every hero kind is configured");
}

fn spot(id: u32, position: Vec3) -> TowerSpotConfig {
    TowerSpotConfig {
        id: SpotId::new(id),
        position,
    }
}

fn enemy(
    kind: EnemyKind,
    name: &str,
    stats: (f32, f32, u32, u32),
    behaviors: Behaviors,
) -> EnemyConfig {
    let (max_health, speed, damage, reward) = stats;
    EnemyConfig {
        kind,
        name: name.to_owned(),
        max_health,
        speed,
        damage,
        reward,
        behaviors,
    }
}

fn sample_enemies() -> Vec<EnemyConfig> {
    vec![
        enemy(
            EnemyKind::Blobbert,
            "Blobbert",
            (100.0, 2.0, 1, 10),
            Behaviors {
                split: Some(SplitBehavior {
                    count: 2,
                    health_percent: 0.4,
                }),
                ..Behaviors::default()
            },
        ),
        enemy(
            EnemyKind::SirScuttles,
            "Sir Scuttles",
            (80.0, 2.5, 1, 12),
            Behaviors {
                dodge: Some(DodgeBehavior { chance: 0.33 }),
                ..Behaviors::default()
            },
        ),
        enemy(
            EnemyKind::Chonkzilla,
            "Chonkzilla",
            (300.0, 1.0, 3, 30),
            Behaviors {
                armor: Some(ArmorBehavior { percent: 0.5 }),
                knockback_immune: true,
                ..Behaviors::default()
            },
        ),
        enemy(
            EnemyKind::Floofernaut,
            "Floofernaut",
            (90.0, 3.0, 1, 15),
            Behaviors {
                trail: Some(TrailBehavior { interval: 1.0 }),
                ..Behaviors::default()
            },
        ),
        enemy(
            EnemyKind::Zipzap,
            "Zipzap",
            (70.0, 2.0, 1, 15),
            Behaviors {
                teleport: Some(TeleportBehavior {
                    interval: 3.0,
                    segments: 1,
                }),
                ..Behaviors::default()
            },
        ),
        enemy(
            EnemyKind::Diggory,
            "Diggory",
            (120.0, 1.5, 2, 20),
            Behaviors {
                burrow: Some(BurrowBehavior {
                    interval: 4.0,
                    duration: 1.5,
                    segments: 1,
                }),
                ..Behaviors::default()
            },
        ),
    ]
}

fn upgrade(
    name: &str,
    cost: u32,
    modifiers: StatModifiers,
    special_effect: Option<SpecialEffect>,
) -> UpgradeConfig {
    UpgradeConfig {
        name: name.to_owned(),
        cost,
        modifiers,
        special_effect,
    }
}

fn damage_by(multiplier: f32) -> StatModifiers {
    StatModifiers {
        damage: Some(multiplier),
        ..StatModifiers::default()
    }
}

fn sample_towers() -> Vec<TowerConfig> {
    vec![
        TowerConfig {
            kind: TowerKind::PlasmaSpire,
            name: "Plasma Spire".to_owned(),
            cost: 50,
            damage: 10.0,
            range: 5.0,
            fire_rate: 2.0,
            projectile_speed: 15.0,
            splash_radius: None,
            upgrades: TowerUpgrades {
                tier2: upgrade("Plasma Spire II", 40, damage_by(1.25), None),
                tier3: upgrade("Plasma Spire III", 60, damage_by(1.25), None),
                tier4a: upgrade(
                    "Overcharged Spire",
                    150,
                    StatModifiers {
                        fire_rate: Some(1.5),
                        ..StatModifiers::default()
                    },
                    Some(SpecialEffect::Overcharge),
                ),
                tier4b: upgrade(
                    "Arc Spire",
                    150,
                    damage_by(1.3),
                    Some(SpecialEffect::ChainArc),
                ),
            },
        },
        TowerConfig {
            kind: TowerKind::RailCannon,
            name: "Rail Cannon".to_owned(),
            cost: 80,
            damage: 40.0,
            range: 7.0,
            fire_rate: 0.5,
            projectile_speed: 30.0,
            splash_radius: None,
            upgrades: TowerUpgrades {
                tier2: upgrade("Rail Cannon II", 60, damage_by(1.3), None),
                tier3: upgrade("Rail Cannon III", 90, damage_by(1.3), None),
                tier4a: upgrade(
                    "Piercer",
                    200,
                    damage_by(1.5),
                    Some(SpecialEffect::ArmorPiercing),
                ),
                tier4b: upgrade(
                    "Shrapnel Rail",
                    200,
                    damage_by(1.2),
                    Some(SpecialEffect::SplashOnHit),
                ),
            },
        },
        TowerConfig {
            kind: TowerKind::NovaLauncher,
            name: "Nova Launcher".to_owned(),
            cost: 100,
            damage: 30.0,
            range: 6.0,
            fire_rate: 0.5,
            projectile_speed: 10.0,
            splash_radius: Some(2.5),
            upgrades: TowerUpgrades {
                tier2: upgrade(
                    "Nova Launcher II",
                    80,
                    StatModifiers {
                        damage: Some(1.3),
                        splash_radius: Some(1.2),
                        ..StatModifiers::default()
                    },
                    None,
                ),
                tier3: upgrade("Nova Launcher III", 120, damage_by(1.3), None),
                tier4a: upgrade(
                    "Supernova",
                    250,
                    damage_by(1.5),
                    Some(SpecialEffect::AoeCore),
                ),
                tier4b: upgrade(
                    "Cluster Nova",
                    250,
                    StatModifiers {
                        fire_rate: Some(1.5),
                        ..StatModifiers::default()
                    },
                    Some(SpecialEffect::ClusterBomb),
                ),
            },
        },
    ]
}

fn ability(name: &str, cooldown: f32, params: AbilityParams) -> AbilityConfig {
    AbilityConfig {
        name: name.to_owned(),
        cooldown,
        params,
    }
}

fn hero(
    kind: HeroKind,
    name: &str,
    stats: (f32, f32, f32, f32, f32),
    abilities: [AbilityConfig; 3],
) -> HeroConfig {
    let (max_health, speed, damage, attack_range, attack_speed) = stats;
    let [first, second, ultimate] = abilities;
    HeroConfig {
        kind,
        name: name.to_owned(),
        max_health,
        speed,
        damage,
        attack_range,
        attack_speed,
        abilities: HeroAbilityConfigs {
            first,
            second,
            ultimate,
        },
    }
}

fn sample_heroes() -> Vec<HeroConfig> {
    vec![
        hero(
            HeroKind::Fighter,
            "Captain Zara",
            (500.0, 5.0, 25.0, 4.0, 1.5),
            [
                ability(
                    "Plasma Burst",
                    8.0,
                    AbilityParams {
                        damage: Some(80.0),
                        radius: Some(2.5),
                        ..AbilityParams::default()
                    },
                ),
                ability(
                    "Energy Shield",
                    12.0,
                    AbilityParams {
                        heal: Some(50.0),
                        ..AbilityParams::default()
                    },
                ),
                ability(
                    "Orbital Strike",
                    45.0,
                    AbilityParams {
                        damage: Some(200.0),
                        radius: Some(4.0),
                        ..AbilityParams::default()
                    },
                ),
            ],
        ),
        hero(
            HeroKind::Mage,
            "Lumen",
            (350.0, 4.5, 18.0, 6.0, 1.0),
            [
                ability(
                    "Frost Field",
                    10.0,
                    AbilityParams {
                        radius: Some(4.0),
                        slow_percent: Some(0.5),
                        duration: Some(3.0),
                        ..AbilityParams::default()
                    },
                ),
                ability(
                    "Prospector Pulse",
                    15.0,
                    AbilityParams {
                        radius: Some(8.0),
                        currency_bonus: Some(5.0),
                        ..AbilityParams::default()
                    },
                ),
                ability(
                    "Singularity",
                    50.0,
                    AbilityParams {
                        radius: Some(5.0),
                        damage: Some(150.0),
                        pull_strength: Some(0.5),
                        delay: Some(1.0),
                        ..AbilityParams::default()
                    },
                ),
            ],
        ),
        hero(
            HeroKind::Tank,
            "Brakk",
            (900.0, 3.5, 30.0, 2.5, 0.8),
            [
                ability(
                    "Shield Bash",
                    7.0,
                    AbilityParams {
                        damage: Some(60.0),
                        radius: Some(3.0),
                        knockback_force: Some(4.0),
                        cone_degrees: Some(120.0),
                        ..AbilityParams::default()
                    },
                ),
                ability(
                    "Fortress",
                    20.0,
                    AbilityParams {
                        duration: Some(5.0),
                        ..AbilityParams::default()
                    },
                ),
                ability(
                    "Bombardment",
                    60.0,
                    AbilityParams {
                        damage: Some(250.0),
                        radius: Some(8.0),
                        ..AbilityParams::default()
                    },
                ),
            ],
        ),
        hero(
            HeroKind::Assassin,
            "Vesper",
            (300.0, 6.5, 35.0, 2.5, 2.0),
            [
                ability(
                    "Shadow Mark",
                    6.0,
                    AbilityParams {
                        crit_multiplier: Some(3.0),
                        duration: Some(4.0),
                        ..AbilityParams::default()
                    },
                ),
                ability(
                    "Blink Strike",
                    9.0,
                    AbilityParams {
                        range: Some(8.0),
                        radius: Some(2.0),
                        damage: Some(70.0),
                        ..AbilityParams::default()
                    },
                ),
                ability(
                    "Death Mark",
                    55.0,
                    AbilityParams {
                        radius: Some(6.0),
                        execute_threshold: Some(0.3),
                        ..AbilityParams::default()
                    },
                ),
            ],
        ),
        hero(
            HeroKind::Healer,
            "Seraphine",
            (400.0, 4.5, 15.0, 5.0, 1.2),
            [
                ability(
                    "Renewal",
                    12.0,
                    AbilityParams {
                        heal_per_second: Some(20.0),
                        duration: Some(5.0),
                        ..AbilityParams::default()
                    },
                ),
                ability(
                    "Sanctuary",
                    25.0,
                    AbilityParams {
                        duration: Some(3.0),
                        ..AbilityParams::default()
                    },
                ),
                ability(
                    "Resurrection",
                    70.0,
                    AbilityParams {
                        radius: Some(10.0),
                        damage: Some(40.0),
                        currency_bonus: Some(50.0),
                        ..AbilityParams::default()
                    },
                ),
            ],
        ),
    ]
}
