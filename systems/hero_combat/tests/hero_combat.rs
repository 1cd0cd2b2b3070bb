use nova_defence_core::{EnemyId, EnemyKind, Event, PendingCrit, Vec3};
use nova_defence_system_hero_combat::HeroCombat;
use nova_defence_world::{testing, World};

fn swing(world: &mut World, combat: &mut HeroCombat, dt: f32) -> Vec<Event> {
    world.advance_clock(dt);
    let mut events = Vec::new();
    combat.handle(world, &mut events);
    events
}

fn health(world: &World, id: EnemyId) -> f32 {
    world.enemy(id).expect("enemy exists").health
}

#[test]
fn hero_strikes_the_nearest_enemy_in_range() {
    let mut world = testing::playing_world();
    testing::set_hero_position(&mut world, Vec3::new(5.0, 0.0, 1.0));
    let far = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.3);
    let near = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.5);

    let events = swing(&mut world, &mut HeroCombat::new(), 0.0);

    assert_eq!(health(&world, near), 65.0);
    assert_eq!(health(&world, far), 90.0);
    assert_eq!(world.hero().target, Some(near));
    assert!(matches!(
        events.last(),
        Some(Event::HeroAttacked { damage, critical: false, .. }) if *damage == 25.0
    ));
}

#[test]
fn attack_speed_gates_swings() {
    let mut world = testing::playing_world();
    testing::set_hero_position(&mut world, Vec3::new(5.0, 0.0, 1.0));
    let _enemy = testing::place_enemy(&mut world, EnemyKind::Chonkzilla, 0, 0.5);
    let mut combat = HeroCombat::new();

    let attacks = |events: &[Event]| {
        events
            .iter()
            .filter(|event| matches!(event, Event::HeroAttacked { .. }))
            .count()
    };
    assert_eq!(attacks(&swing(&mut world, &mut combat, 0.0)), 1);
    assert_eq!(attacks(&swing(&mut world, &mut combat, 0.5)), 0);
    assert_eq!(attacks(&swing(&mut world, &mut combat, 0.25)), 1);
}

#[test]
fn moving_hero_does_not_attack() {
    let mut world = testing::playing_world();
    testing::set_hero_position(&mut world, Vec3::new(5.0, 0.0, 1.0));
    let enemy = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.5);
    world.hero_mut().is_moving = true;
    world.hero_mut().target_position = Some(Vec3::new(9.0, 0.0, 9.0));

    let events = swing(&mut world, &mut HeroCombat::new(), 0.0);

    assert!(events.is_empty());
    assert_eq!(health(&world, enemy), 90.0);
}

#[test]
fn pending_crit_multiplies_one_swing() {
    let mut world = testing::playing_world();
    testing::set_hero_position(&mut world, Vec3::new(5.0, 0.0, 1.0));
    let enemy = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.5);
    world.hero_mut().pending_crit = Some(PendingCrit {
        multiplier: 3.0,
        remaining: 4.0,
    });

    let events = swing(&mut world, &mut HeroCombat::new(), 0.0);

    assert_eq!(health(&world, enemy), 15.0);
    assert!(!world.hero().has_pending_crit());
    assert!(matches!(
        events.last(),
        Some(Event::HeroAttacked { damage, critical: true, .. }) if *damage == 75.0
    ));
}

#[test]
fn burrowed_enemies_are_skipped_and_target_cleared() {
    let mut world = testing::playing_world();
    testing::set_hero_position(&mut world, Vec3::new(5.0, 0.0, 1.0));
    let digger = testing::place_enemy(&mut world, EnemyKind::Diggory, 0, 0.5);
    world.hero_mut().target = Some(digger);
    world.enemy_mut(digger).expect("enemy exists").state.burrowed = true;

    let events = swing(&mut world, &mut HeroCombat::new(), 0.0);

    assert!(events.is_empty());
    assert_eq!(world.hero().target, None);
    assert_eq!(world.hero().last_attack_time, None);
}
