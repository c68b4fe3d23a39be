use astro_shooter::compute::empty_state;
use astro_shooter::compute::spawn::*;
use astro_shooter::config::GameConfig;
use astro_shooter::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_state() -> GameState {
    let mut state = empty_state(&GameConfig::default());
    state.status = GameStatus::Playing;
    state
}

fn reach_score(state: &mut GameState, points: u32) {
    state.score.add_points(points, 0.0);
    state.director.observe_score(state.score.current());
}

// ── SpawnDirector ─────────────────────────────────────────────────────────────

#[test]
fn director_fires_once_per_interval() {
    let mut d = SpawnDirector::new(3.0, 10, 20);
    assert!(!d.advance(1.0));
    assert!(!d.advance(1.0));
    assert!(d.advance(1.0));
    assert_eq!(d.timer(), 3.0);
}

#[test]
fn threshold_latch_survives_until_reset() {
    let mut d = SpawnDirector::new(3.0, 10, 20);
    d.observe_score(9);
    assert!(!d.threshold_reached());
    d.observe_score(10);
    assert!(d.threshold_reached());
    d.observe_score(0);
    assert!(d.threshold_reached());
    d.reset();
    assert!(!d.threshold_reached());
    assert_eq!(d.timer(), 3.0);
}

#[test]
fn run_does_nothing_before_timer_fires() {
    let mut state = make_state();
    let mut rng = seeded_rng();
    assert_eq!(run(&mut state, &mut rng), None);
    assert!(state.asteroids.is_empty());
    assert!(state.enemies.is_empty());
}

// ── Waves ─────────────────────────────────────────────────────────────────────

#[test]
fn early_wave_brings_one_asteroid_and_one_enemy() {
    let mut state = make_state();
    let mut rng = seeded_rng();
    state.director.expire_timer();
    let report = run(&mut state, &mut rng).expect("timer expired");
    assert_eq!(report.asteroids, 1);
    assert_eq!(report.enemies, 1);
    assert!(!report.boss);
    assert_eq!(state.asteroids.len(), 1);
    assert_eq!(state.enemies.len(), 1);
    assert!(state.bosses.is_empty());
}

#[test]
fn boss_arrives_at_threshold_and_clears_enemies() {
    let mut state = make_state();
    let mut rng = seeded_rng();
    spawn_enemies(&mut state, 2, &mut rng);
    reach_score(&mut state, 10);
    state.director.expire_timer();

    let report = run(&mut state, &mut rng).expect("timer expired");
    assert!(report.boss);
    assert_eq!(report.enemies_cleared, 3);
    assert_eq!(state.bosses.len(), 1);
    assert!(state.enemies.is_empty());
    assert!(state.director.boss_spawned());
}

#[test]
fn live_boss_blocks_second_boss_and_enemies() {
    let mut state = make_state();
    let mut rng = seeded_rng();
    reach_score(&mut state, 10);
    spawn_wave(&mut state, &mut rng);
    assert_eq!(state.bosses.len(), 1);

    let report = spawn_wave(&mut state, &mut rng);
    assert!(!report.boss);
    assert_eq!(report.enemies, 0);
    assert_eq!(state.bosses.len(), 1);
    assert!(state.enemies.is_empty());
    assert_eq!(state.asteroids.len(), 2);
}

#[test]
fn defeated_boss_skips_one_enemy_then_may_return() {
    let mut state = make_state();
    let mut rng = seeded_rng();
    reach_score(&mut state, 10);
    spawn_wave(&mut state, &mut rng);
    state.bosses.clear();
    state.director.on_boss_defeated();
    assert!(state.director.enemies_suppressed());

    let report = spawn_wave(&mut state, &mut rng);
    assert!(!state.director.enemies_suppressed());
    assert!(report.boss);
    assert_eq!(state.bosses.len(), 1);
    assert!(state.enemies.is_empty());
}

#[test]
fn suppression_without_threshold_only_skips_enemy() {
    let mut state = make_state();
    let mut rng = seeded_rng();
    state.director.on_boss_defeated();

    let first = spawn_wave(&mut state, &mut rng);
    assert_eq!(first.enemies, 0);
    let second = spawn_wave(&mut state, &mut rng);
    assert_eq!(second.enemies, 1);
}

#[test]
fn high_score_adds_extra_enemy_even_with_boss() {
    let mut state = make_state();
    let mut rng = seeded_rng();
    reach_score(&mut state, 20);

    let report = spawn_wave(&mut state, &mut rng);
    assert!(report.boss);
    assert_eq!(report.enemies, 1);
    assert_eq!(state.enemies.len(), 1);
    assert_eq!(state.bosses.len(), 1);
}

#[test]
fn spawned_hostiles_target_current_player() {
    let mut state = make_state();
    let mut rng = seeded_rng();
    reach_score(&mut state, 20);
    spawn_wave(&mut state, &mut rng);
    let handle = state.player.handle();
    assert!(state.enemies.iter().all(|e| e.target == handle));
    assert!(state.bosses.iter().all(|b| b.target == handle));
}

// ── Placement ─────────────────────────────────────────────────────────────────

#[test]
fn edge_positions_sit_just_outside_the_field() {
    let field = Playfield { width: 800.0, height: 600.0 };
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let (x, y) = edge_position(field, &mut rng);
        let on_vertical_edge = (x == -EDGE_MARGIN || x == field.width + EDGE_MARGIN)
            && (0.0..=field.height).contains(&y);
        let on_horizontal_edge = (y == -EDGE_MARGIN || y == field.height + EDGE_MARGIN)
            && (0.0..=field.width).contains(&x);
        assert!(on_vertical_edge || on_horizontal_edge, "({}, {})", x, y);
    }
}

#[test]
fn edge_choice_covers_all_four_sides() {
    let field = Playfield { width: 800.0, height: 600.0 };
    let mut rng = seeded_rng();
    let mut seen = [false; 4];
    for _ in 0..200 {
        let (x, y) = edge_position(field, &mut rng);
        if x < 0.0 {
            seen[0] = true;
        } else if x > field.width {
            seen[1] = true;
        } else if y < 0.0 {
            seen[2] = true;
        } else {
            seen[3] = true;
        }
    }
    assert_eq!(seen, [true; 4]);
}
