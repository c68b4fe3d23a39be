use astro_shooter::compute::movement::{guarded_update, Entity, UpdateContext};
use astro_shooter::entities::*;
use astro_shooter::error::SimError;

use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f64 = 1.0 / 60.0;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn ctx() -> UpdateContext {
    UpdateContext {
        dt: DT,
        field: Playfield { width: 800.0, height: 600.0 },
        target: None,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Asteroid ──────────────────────────────────────────────────────────────────

#[test]
fn asteroid_moves_and_spins_each_tick() {
    let mut a = Asteroid::with_motion(100.0, 100.0, AsteroidSize::Large, 2.0, 1.0, 3.0, 0.0);
    a.update(&ctx());
    assert!(close(a.body.x, 102.0));
    assert!(close(a.body.y, 101.0));
    assert!(close(a.body.rotation, 3.0));
}

#[test]
fn random_asteroid_moves_and_turns_on_first_update() {
    let mut rng = seeded_rng();
    let mut a = Asteroid::new(100.0, 100.0, AsteroidSize::Large, &mut rng);
    let rotation = a.body.rotation;
    a.update(&ctx());
    assert_ne!(a.body.x, 100.0);
    assert_ne!(a.body.y, 100.0);
    assert_ne!(a.body.rotation, rotation);
}

#[test]
fn asteroid_wraps_to_negative_extent_past_right_edge() {
    let mut a = Asteroid::with_motion(799.0, 300.0, AsteroidSize::Large, 2.0, 0.0, 0.0, 0.0);
    a.update(&ctx());
    assert!(close(a.body.x, -60.0));
}

#[test]
fn asteroid_wraps_to_far_edge_past_negative_extent() {
    let mut a = Asteroid::with_motion(300.0, -29.0, AsteroidSize::Medium, 0.0, -2.0, 0.0, 0.0);
    a.update(&ctx());
    assert!(close(a.body.y, 600.0));
}

#[test]
fn asteroid_inside_margin_is_not_wrapped() {
    let mut a = Asteroid::with_motion(-10.0, 300.0, AsteroidSize::Large, -2.0, 0.0, 0.0, 0.0);
    a.update(&ctx());
    assert!(close(a.body.x, -12.0));
}

#[test]
fn asteroid_damage_destroys_exactly_once() {
    let mut a = Asteroid::with_motion(0.0, 0.0, AsteroidSize::Medium, 0.0, 0.0, 0.0, 0.0);
    assert_eq!(a.hit_points(), 2);
    assert!(!a.take_damage(1));
    assert!(!a.is_destroyed());
    assert!(a.take_damage(1));
    assert!(a.is_destroyed());
    assert!(!a.take_damage(1));
    assert!(a.is_destroyed());
}

#[test]
fn asteroid_size_table() {
    assert_eq!(AsteroidSize::Large.extent(), 60.0);
    assert_eq!(AsteroidSize::Large.hit_points(), 1);
    assert_eq!(AsteroidSize::Large.points(), 1);
    assert_eq!(AsteroidSize::Medium.extent(), 30.0);
    assert_eq!(AsteroidSize::Medium.hit_points(), 2);
    assert_eq!(AsteroidSize::Medium.points(), 2);
}

#[test]
fn random_asteroid_speed_stays_in_range() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let a = Asteroid::new(0.0, 0.0, AsteroidSize::Medium, &mut rng);
        let speed = a.vx.hypot(a.vy);
        assert!((1.0 - 1e-9..=3.0 + 1e-9).contains(&speed), "speed {}", speed);
        assert!(a.spin.abs() <= 2.0);
    }
}

// ── Size codes ────────────────────────────────────────────────────────────────

#[test]
fn size_codes_outside_the_table_are_rejected() {
    assert_eq!(AsteroidSize::try_from(1), Ok(AsteroidSize::Large));
    assert_eq!(AsteroidSize::try_from(2), Ok(AsteroidSize::Medium));
    assert_eq!(AsteroidSize::try_from(3), Err(SimError::InvalidAsteroidSize(3)));
    assert_eq!(AsteroidSize::try_from(0), Err(SimError::InvalidAsteroidSize(0)));
    assert_eq!(EnemySize::try_from(2), Ok(EnemySize::Large));
    assert_eq!(EnemySize::try_from(7), Err(SimError::InvalidEnemySize(7)));
    assert_eq!(BossSize::try_from(1), Ok(BossSize::Standard));
    assert_eq!(BossSize::try_from(2), Err(SimError::InvalidBossSize(2)));
}

// ── Enemy & boss ──────────────────────────────────────────────────────────────

#[test]
fn enemy_turns_toward_target_at_capped_rate() {
    let mut rng = seeded_rng();
    let mut e = Enemy::new(100.0, 100.0, EnemySize::Small, PlayerHandle::new(0), &mut rng);
    e.vx = 0.0;
    e.vy = 0.0;
    e.body.rotation = 0.0;
    let ctx = UpdateContext { target: Some(Target { x: 100.0, y: 300.0 }), ..ctx() };
    e.update(&ctx);
    assert!(close(e.body.rotation, HOMING_TURN_RATE));
}

#[test]
fn enemy_without_target_keeps_heading() {
    let mut rng = seeded_rng();
    let mut e = Enemy::new(100.0, 100.0, EnemySize::Large, PlayerHandle::new(0), &mut rng);
    let before = e.body.rotation;
    e.update(&ctx());
    assert_eq!(e.body.rotation, before);
}

#[test]
fn enemy_cooldown_reset_is_jittered() {
    let mut rng = seeded_rng();
    let mut e = Enemy::new(0.0, 0.0, EnemySize::Small, PlayerHandle::new(0), &mut rng);
    for _ in 0..20 {
        e.reset_shoot_cooldown(&mut rng);
        let c = e.shoot_cooldown();
        assert!((1.6..=2.4).contains(&c), "cooldown {}", c);
    }
}

#[test]
fn boss_survives_two_then_dies_on_three() {
    let mut rng = seeded_rng();
    let mut boss = Boss::new(0.0, 0.0, BossSize::Standard, PlayerHandle::new(0), &mut rng);
    assert_eq!(boss.hit_points(), 5);
    assert!(!boss.take_damage(2));
    assert_eq!(boss.hit_points(), 3);
    assert!(boss.take_damage(3));
    assert!(boss.is_destroyed());
    assert!(!boss.take_damage(1));
    assert_eq!(boss.points(), 10);
}

#[test]
fn boss_closes_in_on_target() {
    let mut rng = seeded_rng();
    let mut boss = Boss::new(100.0, 300.0, BossSize::Standard, PlayerHandle::new(0), &mut rng);
    let speed = boss.speed;
    let ctx = UpdateContext { target: Some(Target { x: 400.0, y: 300.0 }), ..ctx() };
    boss.update(&ctx);
    assert!(close(boss.body.x, 100.0 + speed));
    assert!(close(boss.body.y, 300.0));
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[test]
fn projectile_velocity_follows_rotation() {
    let p = Projectile::new(ProjectileKind::Player, 0.0, 0.0, 90.0);
    assert!(p.vx.abs() < 1e-9);
    assert!(close(p.vy, 12.0));
    let e = Projectile::new(ProjectileKind::Enemy, 0.0, 0.0, 180.0);
    assert!(close(e.vx, -8.0));
}

#[test]
fn fired_projectile_starts_ahead_of_the_muzzle() {
    let p = Projectile::fired_from(ProjectileKind::Player, 100.0, 100.0, 0.0);
    assert!(close(p.body.x, 100.0 + MUZZLE_OFFSET));
    assert!(close(p.body.y, 100.0));
}

fn updates_until_expired(kind: ProjectileKind, ticks: usize) -> Projectile {
    let mut p = Projectile::new(kind, 400.0, 300.0, 0.0);
    for _ in 0..ticks {
        p.update(&ctx());
    }
    p
}

#[test]
fn player_projectile_lives_about_forty_ticks() {
    assert!(!updates_until_expired(ProjectileKind::Player, 39).is_expired());
    assert!(updates_until_expired(ProjectileKind::Player, 41).is_expired());
}

#[test]
fn enemy_projectile_lives_about_thirty_four_ticks() {
    assert!(!updates_until_expired(ProjectileKind::Enemy, 33).is_expired());
    assert!(updates_until_expired(ProjectileKind::Enemy, 34).is_expired());
}

#[test]
fn boss_projectile_lives_about_sixty_three_ticks() {
    let kind = ProjectileKind::Boss(BossPattern::Straight);
    assert!(!updates_until_expired(kind, 62).is_expired());
    assert!(updates_until_expired(kind, 63).is_expired());
}

#[test]
fn expired_projectile_is_inert() {
    let mut p = updates_until_expired(ProjectileKind::Player, 41);
    let (x, y) = (p.body.x, p.body.y);
    p.update(&ctx());
    assert_eq!((p.body.x, p.body.y), (x, y));
    assert!(p.is_expired());
}

#[test]
fn boss_fan_spreads_evenly_around_heading() {
    let fan = Projectile::boss_fan(0.0, 0.0, 90.0, BOSS_FAN_COUNT, BOSS_FAN_SPREAD);
    assert_eq!(fan.len(), 5);
    let rotations: Vec<f64> = fan.iter().map(|p| p.body.rotation).collect();
    let expected = [67.5, 78.75, 90.0, 101.25, 112.5];
    for (got, want) in rotations.iter().zip(expected) {
        assert!(close(*got, want), "{} != {}", got, want);
    }
    assert!(fan
        .iter()
        .all(|p| p.kind() == ProjectileKind::Boss(BossPattern::MultiShot)));
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_hit_is_ignored_while_invulnerable() {
    let mut p = Player::new(400.0, 300.0, PlayerHandle::new(0));
    assert!(p.hit());
    assert!(!p.hit());
    assert_eq!(p.lives(), 2);
    assert!(p.is_invulnerable());
}

#[test]
fn invulnerability_lasts_two_seconds() {
    let mut p = Player::new(400.0, 300.0, PlayerHandle::new(0));
    p.hit();
    for _ in 0..119 {
        p.update(&ctx());
    }
    assert!(p.is_invulnerable());
    p.update(&ctx());
    p.update(&ctx());
    assert!(!p.is_invulnerable());
    assert!(p.hit());
    assert_eq!(p.lives(), 1);
}

#[test]
fn player_thrust_is_capped_and_decays() {
    let mut p = Player::new(400.0, 300.0, PlayerHandle::new(0));
    p.controls.forward = true;
    for _ in 0..200 {
        p.update(&ctx());
        assert!(p.vx.hypot(p.vy) <= PLAYER_MAX_SPEED);
    }
    p.controls.forward = false;
    let before = p.vx.hypot(p.vy);
    p.update(&ctx());
    assert!(p.vx.hypot(p.vy) < before);
}

#[test]
fn player_wraps_at_exact_edges() {
    let mut p = Player::new(799.0, 300.0, PlayerHandle::new(0));
    p.vx = 3.0;
    p.update(&ctx());
    assert!(close(p.body.x, 0.0));
}

#[test]
fn player_rotation_follows_controls() {
    let mut p = Player::new(400.0, 300.0, PlayerHandle::new(0));
    p.controls.rotate_right = true;
    p.update(&ctx());
    assert!(close(p.body.rotation, PLAYER_START_ROTATION + PLAYER_ROTATION_SPEED));
}

// ── Guarded updates ───────────────────────────────────────────────────────────

#[test]
fn non_finite_update_is_rolled_back() {
    let mut a = Asteroid::with_motion(100.0, 100.0, AsteroidSize::Large, f64::NAN, 0.0, 0.0, 0.0);
    let err = guarded_update(&mut a, &ctx()).unwrap_err();
    assert_eq!(err, SimError::NonFiniteBody { kind: EntityKind::Asteroid });
    assert_eq!(a.body.x, 100.0);
}

#[test]
fn finite_update_passes_guard() {
    let mut a = Asteroid::with_motion(100.0, 100.0, AsteroidSize::Large, 1.0, 0.0, 0.0, 0.0);
    assert!(guarded_update(&mut a, &ctx()).is_ok());
    assert!(close(a.body.x, 101.0));
}

// ── Effects & status ──────────────────────────────────────────────────────────

#[test]
fn hit_explosion_finishes_after_its_frames() {
    let mut e = Explosion::new(ExplosionKind::Hit, 0.0, 0.0);
    e.update(&ctx());
    assert!(!e.is_finished());
    for _ in 0..30 {
        e.update(&ctx());
    }
    assert!(e.is_finished());
    assert_eq!(e.frame, ExplosionKind::Hit.frame_count());
}

#[test]
fn explosion_kinds_map_to_entity_kinds() {
    assert_eq!(Explosion::new(ExplosionKind::Hit, 0.0, 0.0).kind(), EntityKind::Explosion);
    assert_eq!(
        Explosion::new(ExplosionKind::Bomb, 0.0, 0.0).kind(),
        EntityKind::BombExplosion
    );
}

#[test]
fn blink_stays_in_unit_range_and_reverses() {
    let mut blink = Blink::default();
    let mut reversed = false;
    for _ in 0..200 {
        blink.advance();
        assert!((0.0..=1.0).contains(&blink.alpha));
        if blink.delta > 0.0 {
            reversed = true;
        }
    }
    assert!(reversed);
}

#[test]
fn player_handle_generations_differ() {
    let h = PlayerHandle::new(0);
    assert_ne!(h, h.next());
    assert_eq!(h.next().generation(), 1);
}
