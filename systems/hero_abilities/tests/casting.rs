use nova_defence_core::{AbilitySlot, Command, EnemyId, EnemyKind, Event, HeroKind, Vec3};
use nova_defence_system_hero_abilities::{HeroAbilities, ScheduledEffect};
use nova_defence_world::{testing, World};

fn activate(world: &mut World, abilities: &mut HeroAbilities, slots: &[AbilitySlot]) -> Vec<Event> {
    let commands: Vec<Command> = slots
        .iter()
        .map(|&slot| Command::ActivateAbility { slot })
        .collect();
    let mut events = Vec::new();
    abilities.handle(&commands, world, 0.0, &mut events);
    events
}

fn tick(world: &mut World, abilities: &mut HeroAbilities, dt: f32) -> Vec<Event> {
    let mut events = Vec::new();
    abilities.handle(&[], world, dt, &mut events);
    events
}

fn casts(events: &[Event]) -> Vec<(AbilitySlot, bool)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::AbilityCast { slot, ultimate, .. } => Some((*slot, *ultimate)),
            _ => None,
        })
        .collect()
}

fn health(world: &World, id: EnemyId) -> f32 {
    world.enemy(id).expect("enemy exists").health
}

#[test]
fn plasma_burst_hits_everything_in_its_radius() {
    let mut world = testing::playing_world();
    testing::set_hero_position(&mut world, Vec3::new(5.0, 0.0, 1.0));
    let close = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.5);
    let distant = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.2);
    let mut abilities = HeroAbilities::new();

    let events = activate(&mut world, &mut abilities, &[AbilitySlot::First]);

    assert_eq!(health(&world, close), 10.0);
    assert_eq!(health(&world, distant), 90.0);
    assert_eq!(casts(&events), vec![(AbilitySlot::First, false)]);
    assert_eq!(world.hero().abilities.first.current_cooldown, 8.0);
}

#[test]
fn request_during_cooldown_is_dropped_not_queued() {
    let mut world = testing::playing_world();
    let mut abilities = HeroAbilities::new();

    assert_eq!(casts(&activate(&mut world, &mut abilities, &[AbilitySlot::First])).len(), 1);
    assert!(casts(&activate(&mut world, &mut abilities, &[AbilitySlot::First])).is_empty());

    assert!(casts(&tick(&mut world, &mut abilities, 8.0)).is_empty());
    assert!(world.hero().abilities.first.is_ready());
    assert_eq!(casts(&activate(&mut world, &mut abilities, &[AbilitySlot::First])).len(), 1);
}

#[test]
fn last_request_of_a_tick_wins() {
    let mut world = testing::playing_world();
    let mut abilities = HeroAbilities::new();

    let events = activate(
        &mut world,
        &mut abilities,
        &[AbilitySlot::First, AbilitySlot::Ultimate],
    );

    assert_eq!(casts(&events), vec![(AbilitySlot::Ultimate, true)]);
    assert!(world.hero().abilities.first.is_ready());
    assert_eq!(world.hero().abilities.ultimate.current_cooldown, 45.0);
}

#[test]
fn energy_shield_heals_up_to_max_health() {
    let mut world = testing::playing_world();
    let mut abilities = HeroAbilities::new();

    world.hero_mut().health = 400.0;
    let _ = activate(&mut world, &mut abilities, &[AbilitySlot::Second]);
    assert_eq!(world.hero().health, 450.0);

    world.hero_mut().health = 480.0;
    world.hero_mut().abilities.second.current_cooldown = 0.0;
    let _ = activate(&mut world, &mut abilities, &[AbilitySlot::Second]);
    assert_eq!(world.hero().health, 500.0);
}

#[test]
fn orbital_strike_fades_toward_the_rim() {
    let mut world = testing::playing_world();
    testing::set_hero_position(&mut world, Vec3::new(5.0, 0.0, 4.0));
    let rim = testing::place_enemy(&mut world, EnemyKind::Floofernaut, 0, 0.5);
    let centre =
        testing::place_enemy_at(&mut world, EnemyKind::Chonkzilla, Vec3::new(5.0, 0.0, 4.0));
    let mut abilities = HeroAbilities::new();

    let _ = activate(&mut world, &mut abilities, &[AbilitySlot::Ultimate]);

    assert_eq!(health(&world, rim), 24.0);
    assert_eq!(health(&world, centre), 200.0);
}

#[test]
fn cooldowns_tick_down_and_floor_at_zero() {
    let mut world = testing::playing_world();
    let mut abilities = HeroAbilities::new();
    let _ = activate(&mut world, &mut abilities, &[AbilitySlot::First]);

    let _ = tick(&mut world, &mut abilities, 2.0);
    assert_eq!(world.hero().abilities.first.current_cooldown, 6.0);

    let _ = tick(&mut world, &mut abilities, 10.0);
    assert_eq!(world.hero().abilities.first.current_cooldown, 0.0);
}

#[test]
fn switching_heroes_drops_their_scheduled_effects() {
    let mut world = testing::playing_world();
    testing::switch_hero(&mut world, HeroKind::Healer);
    world.hero_mut().health = 100.0;
    let mut abilities = HeroAbilities::new();
    let _ = activate(&mut world, &mut abilities, &[AbilitySlot::First]);
    assert!(matches!(
        abilities.scheduled(),
        [ScheduledEffect::HealOverTime { .. }]
    ));

    testing::switch_hero(&mut world, HeroKind::Fighter);
    world.hero_mut().health = 100.0;
    let _ = tick(&mut world, &mut abilities, 0.5);

    assert!(abilities.scheduled().is_empty());
    assert_eq!(world.hero().health, 100.0);
}
