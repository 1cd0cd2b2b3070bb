use nova_defence_core::{
    geometry::distance_2d, AbilitySlot, Command, EnemyId, EnemyKind, Event, HeroKind, SpotId,
    TowerKind, Vec3,
};
use nova_defence_system_enemy_health::damage_enemy;
use nova_defence_system_hero_abilities::{HeroAbilities, ScheduledEffect};
use nova_defence_world::{testing, World};

fn hero_world(kind: HeroKind, position: Vec3) -> World {
    let mut world = testing::playing_world();
    testing::switch_hero(&mut world, kind);
    testing::set_hero_position(&mut world, position);
    world
}

fn activate(world: &mut World, abilities: &mut HeroAbilities, slot: AbilitySlot) -> Vec<Event> {
    let mut events = Vec::new();
    abilities.handle(&[Command::ActivateAbility { slot }], world, 0.0, &mut events);
    events
}

fn tick(world: &mut World, abilities: &mut HeroAbilities, dt: f32) {
    let mut events = Vec::new();
    abilities.handle(&[], world, dt, &mut events);
}

fn health(world: &World, id: EnemyId) -> f32 {
    world.enemy(id).expect("enemy exists").health
}

#[test]
fn frost_field_slows_until_it_expires() {
    let mut world = hero_world(HeroKind::Mage, Vec3::new(5.0, 0.0, 1.0));
    let enemy = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.5);
    let mut abilities = HeroAbilities::new();

    let _ = activate(&mut world, &mut abilities, AbilitySlot::First);
    let slowed = world.enemy(enemy).expect("enemy exists");
    assert_eq!(slowed.speed, 1.5);
    assert!(slowed.state.slow.is_some());

    tick(&mut world, &mut abilities, 3.0);
    let restored = world.enemy(enemy).expect("enemy exists");
    assert_eq!(restored.speed, 3.0);
    assert!(restored.state.slow.is_none());
}

#[test]
fn frost_field_does_not_stack_on_a_slowed_enemy() {
    let mut world = hero_world(HeroKind::Mage, Vec3::new(5.0, 0.0, 1.0));
    let enemy = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.5);
    let mut abilities = HeroAbilities::new();

    let _ = activate(&mut world, &mut abilities, AbilitySlot::First);
    world.hero_mut().abilities.first.current_cooldown = 0.0;
    let _ = activate(&mut world, &mut abilities, AbilitySlot::First);

    assert_eq!(world.enemy(enemy).expect("enemy exists").speed, 1.5);
}

#[test]
fn prospector_pulse_pays_per_nearby_tower() {
    let mut world = hero_world(HeroKind::Mage, Vec3::new(12.0, 0.0, 5.0));
    for spot in 0..4 {
        let _ = testing::build_tower(&mut world, TowerKind::PlasmaSpire, SpotId::new(spot));
    }
    let before = world.economy();
    let mut abilities = HeroAbilities::new();

    let _ = activate(&mut world, &mut abilities, AbilitySlot::Second);

    let after = world.economy();
    assert_eq!(after.currency, before.currency + 15);
    assert_eq!(after.score, before.score + 150);
}

#[test]
fn singularity_pulls_along_the_path_then_detonates() {
    let mut world = hero_world(HeroKind::Mage, Vec3::new(5.0, 0.0, 3.0));
    let light = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.3);
    let heavy = testing::place_enemy(&mut world, EnemyKind::Chonkzilla, 0, 0.7);
    let mut abilities = HeroAbilities::new();

    let _ = activate(&mut world, &mut abilities, AbilitySlot::Ultimate);

    let pulled = world.enemy(light).expect("enemy exists");
    assert!((pulled.path_progress - 0.4).abs() < 1e-4);
    assert!((pulled.position.x - 4.0).abs() < 1e-3);
    assert_eq!(world.enemy(heavy).expect("enemy exists").path_progress, 0.7);
    assert!(matches!(
        abilities.scheduled(),
        [ScheduledEffect::DelayedBlast { .. }]
    ));
    assert_eq!(health(&world, light), 90.0);

    tick(&mut world, &mut abilities, 1.0);

    assert!(abilities.scheduled().is_empty());
    assert_eq!(health(&world, light), 0.0);
    assert_eq!(health(&world, heavy), 215.0);
}

#[test]
fn shield_bash_hits_the_front_cone_and_knocks_back() {
    let mut world = hero_world(HeroKind::Tank, Vec3::new(5.0, 0.0, 2.0));
    world.hero_mut().rotation = std::f32::consts::PI;
    let front = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.5);
    let immune = testing::place_enemy(&mut world, EnemyKind::Chonkzilla, 0, 0.6);
    let behind =
        testing::place_enemy_at(&mut world, EnemyKind::Floofernaut, Vec3::new(5.0, 0.0, 4.0));
    let mut abilities = HeroAbilities::new();

    let _ = activate(&mut world, &mut abilities, AbilitySlot::First);

    let struck = world.enemy(front).expect("enemy exists");
    assert_eq!(struck.health, 30.0);
    assert!((struck.path_progress - 0.3).abs() < 1e-4);
    assert!((struck.position.x - 3.0).abs() < 1e-3);

    let anchored = world.enemy(immune).expect("enemy exists");
    assert_eq!(anchored.health, 270.0);
    assert_eq!(anchored.path_progress, 0.6);

    assert_eq!(health(&world, behind), 90.0);
}

#[test]
fn fortress_doubles_damage_roots_and_then_restores() {
    let mut world = hero_world(HeroKind::Tank, Vec3::ZERO);
    world.hero_mut().target_position = Some(Vec3::new(9.0, 0.0, 9.0));
    world.hero_mut().is_moving = true;
    let mut abilities = HeroAbilities::new();

    let _ = activate(&mut world, &mut abilities, AbilitySlot::Second);
    let hero = world.hero();
    assert_eq!(hero.damage, 60.0);
    assert_eq!(hero.speed, 0.0);
    assert!(hero.is_rooted());
    assert!(!hero.is_moving);
    assert_eq!(hero.target_position, None);

    tick(&mut world, &mut abilities, 2.5);
    assert!(world.hero().is_rooted());

    tick(&mut world, &mut abilities, 2.5);
    let hero = world.hero();
    assert!(!hero.is_rooted());
    assert_eq!(hero.damage, 30.0);
    assert_eq!(hero.speed, 3.5);
}

#[test]
fn bombardment_barely_fades_across_its_radius() {
    let mut world = hero_world(HeroKind::Tank, Vec3::new(5.0, 0.0, 1.0));
    let centre =
        testing::place_enemy_at(&mut world, EnemyKind::Chonkzilla, Vec3::new(5.0, 0.0, 1.0));
    let rim = testing::place_enemy_at(&mut world, EnemyKind::Chonkzilla, Vec3::new(13.0, 0.0, 1.0));
    let mut abilities = HeroAbilities::new();

    let _ = activate(&mut world, &mut abilities, AbilitySlot::Ultimate);

    assert_eq!(health(&world, centre), 175.0);
    assert_eq!(health(&world, rim), 207.0);
}

#[test]
fn shadow_mark_primes_a_crit_that_fades() {
    let mut world = hero_world(HeroKind::Assassin, Vec3::ZERO);
    let mut abilities = HeroAbilities::new();

    let _ = activate(&mut world, &mut abilities, AbilitySlot::First);
    let crit = world.hero().pending_crit.expect("crit primed");
    assert_eq!(crit.multiplier, 3.0);
    assert_eq!(crit.remaining, 4.0);

    tick(&mut world, &mut abilities, 4.0);
    assert!(!world.hero().has_pending_crit());
}

#[test]
fn blink_strike_lands_on_the_nearest_enemy() {
    let mut world = hero_world(HeroKind::Assassin, Vec3::new(0.0, 0.0, 5.0));
    let near = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.5);
    let far = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 2, 0.5);
    let mut abilities = HeroAbilities::new();

    let _ = activate(&mut world, &mut abilities, AbilitySlot::Second);

    assert_eq!(world.hero().position, Vec3::new(5.0, 0.0, 0.0));
    assert!(!world.hero().is_moving);
    assert_eq!(health(&world, near), 20.0);
    assert_eq!(health(&world, far), 90.0);
}

#[test]
fn blink_strike_without_targets_hops_a_short_distance() {
    let mut world = hero_world(HeroKind::Assassin, Vec3::ZERO);
    let mut abilities = HeroAbilities::new();

    let events = activate(&mut world, &mut abilities, AbilitySlot::Second);

    assert!((distance_2d(Vec3::ZERO, world.hero().position) - 3.0).abs() < 1e-4);
    assert!(matches!(events.last(), Some(Event::AbilityCast { .. })));
}

#[test]
fn death_mark_executes_only_weakened_targetable_enemies() {
    let mut world = hero_world(HeroKind::Assassin, Vec3::new(5.0, 0.0, 1.0));
    let weak = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.5);
    let healthy = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.4);
    let buried = testing::place_enemy(&mut world, EnemyKind::Diggory, 0, 0.6);
    world.enemy_mut(weak).expect("enemy exists").health = 20.0;
    world.enemy_mut(healthy).expect("enemy exists").health = 30.0;
    {
        let digger = world.enemy_mut(buried).expect("enemy exists");
        digger.health = 10.0;
        digger.state.burrowed = true;
    }
    let mut abilities = HeroAbilities::new();

    let events = activate(&mut world, &mut abilities, AbilitySlot::Ultimate);

    assert_eq!(health(&world, weak), 0.0);
    assert_eq!(health(&world, healthy), 30.0);
    assert_eq!(health(&world, buried), 10.0);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::EnemyDamaged { enemy, amount, .. } if *enemy == weak && *amount == 20.0
    )));
}

#[test]
fn death_mark_counts_toward_the_dodge_period() {
    let mut world = hero_world(HeroKind::Assassin, Vec3::new(5.0, 0.0, 1.0));
    let scuttler = testing::place_enemy(&mut world, EnemyKind::SirScuttles, 0, 0.5);
    let mut sink = Vec::new();
    assert_eq!(damage_enemy(&mut world, scuttler, 10.0, false, &mut sink), 10.0);
    assert_eq!(damage_enemy(&mut world, scuttler, 10.0, false, &mut sink), 10.0);
    world.enemy_mut(scuttler).expect("enemy exists").health = 20.0;
    let mut abilities = HeroAbilities::new();

    let events = activate(&mut world, &mut abilities, AbilitySlot::Ultimate);

    assert_eq!(health(&world, scuttler), 20.0);
    assert_eq!(
        world.enemy(scuttler).expect("enemy exists").state.projectiles_received,
        3
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::EnemyDodged { enemy, .. } if *enemy == scuttler)));

    world.hero_mut().abilities.ultimate.current_cooldown = 0.0;
    let events = activate(&mut world, &mut abilities, AbilitySlot::Ultimate);

    assert_eq!(health(&world, scuttler), 0.0);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::EnemyDamaged { enemy, amount, .. } if *enemy == scuttler && *amount == 20.0
    )));
}

#[test]
fn renewal_heals_in_half_second_pulses() {
    let mut world = hero_world(HeroKind::Healer, Vec3::ZERO);
    world.hero_mut().health = 300.0;
    let mut abilities = HeroAbilities::new();

    let _ = activate(&mut world, &mut abilities, AbilitySlot::First);
    assert_eq!(world.hero().health, 300.0);

    tick(&mut world, &mut abilities, 0.25);
    assert_eq!(world.hero().health, 300.0);
    tick(&mut world, &mut abilities, 0.25);
    assert_eq!(world.hero().health, 310.0);

    for _ in 0..9 {
        tick(&mut world, &mut abilities, 0.5);
    }
    assert_eq!(world.hero().health, 400.0);
    assert!(abilities.scheduled().is_empty());
}

#[test]
fn sanctuary_spikes_then_settles_slightly_above_the_start() {
    let mut world = hero_world(HeroKind::Healer, Vec3::ZERO);
    world.hero_mut().health = 200.0;
    let mut abilities = HeroAbilities::new();

    let _ = activate(&mut world, &mut abilities, AbilitySlot::Second);
    assert_eq!(world.hero().health, 4000.0);

    tick(&mut world, &mut abilities, 1.5);
    assert_eq!(world.hero().health, 4000.0);
    tick(&mut world, &mut abilities, 1.5);
    assert_eq!(world.hero().health, 240.0);
}

#[test]
fn resurrection_heals_pays_and_damages() {
    let mut world = hero_world(HeroKind::Healer, Vec3::new(5.0, 0.0, 1.0));
    world.hero_mut().health = 100.0;
    let enemy = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.5);
    let before = world.economy();
    let mut abilities = HeroAbilities::new();

    let events = activate(&mut world, &mut abilities, AbilitySlot::Ultimate);

    assert_eq!(world.hero().health, 300.0);
    assert_eq!(world.economy().currency, before.currency + 50);
    assert_eq!(world.economy().score, before.score + 500);
    assert_eq!(health(&world, enemy), 50.0);
    assert!(matches!(
        events.last(),
        Some(Event::AbilityCast { ultimate: true, kind: HeroKind::Healer, .. })
    ));
}
