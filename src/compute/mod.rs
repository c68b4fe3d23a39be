//! Game-logic functions.
//!
//! `tick` and `handle_intent` take an immutable reference to the current
//! `GameState` (and an RNG handle) and return a brand-new `GameState`; the
//! `*_in_place` variants do the same work on a mutable state. Side effects
//! are limited to the injected RNG and logging.

pub mod collision;
pub mod movement;
pub mod spawn;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::entities::{
    angle_to, Blink, BossPattern, Explosion, ExplosionKind, GameState, GameStatus, Player,
    PlayerHandle, Playfield, Projectile, ProjectileKind, Target, BOSS_FAN_COUNT,
    BOSS_FAN_SPREAD, MUZZLE_OFFSET,
};
use crate::error::SimError;
use crate::score::ScoreState;

use self::collision::{check_collision, handle_collisions};
use self::movement::{guarded_update, UpdateContext};
use self::spawn::SpawnDirector;

/// Damage one projectile deals to the hazard it strikes.
pub const PROJECTILE_DAMAGE: i32 = 1;

const MENU_ASTEROIDS: usize = 3;
const MENU_ENEMIES: usize = 1;
const NEW_GAME_ASTEROIDS: usize = 2;
const NEW_GAME_ENEMIES: usize = 1;

/// Discrete input intents produced by the input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    MoveForward(bool),
    MoveBackward(bool),
    MoveLeft(bool),
    MoveRight(bool),
    RotateLeft(bool),
    RotateRight(bool),
    Fire,
    ActivateBomb,
    Start,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial state: the menu, with a few hazards drifting behind it.
pub fn init_state(config: &GameConfig, rng: &mut impl Rng) -> GameState {
    let mut state = empty_state(config);
    spawn::spawn_asteroids(&mut state, MENU_ASTEROIDS, rng);
    spawn::spawn_enemies(&mut state, MENU_ENEMIES, rng);
    state
}

/// A menu-mode state with a fresh player and nothing else in the world.
pub fn empty_state(config: &GameConfig) -> GameState {
    let field = Playfield { width: config.width, height: config.height };
    GameState {
        player: Player::new(field.width / 2.0, field.height / 2.0, PlayerHandle::new(0)),
        asteroids: Vec::new(),
        enemies: Vec::new(),
        bosses: Vec::new(),
        projectiles: Vec::new(),
        enemy_projectiles: Vec::new(),
        boss_projectiles: Vec::new(),
        explosions: Vec::new(),
        score: ScoreState::new(),
        director: SpawnDirector::from_config(config),
        status: GameStatus::Menu,
        blink: Blink::default(),
        field,
        dt: config.tick_delta(),
        collision_margin: config.collision_margin,
        elapsed: 0.0,
        frame: 0,
    }
}

/// Full reset into Playing: score, director, every collection and the player.
///
/// The hazard lists are cleared before the player is replaced, and the new
/// player gets a new handle, so no targeting reference can outlive its ship.
pub fn start_new_game(state: &mut GameState, rng: &mut impl Rng) {
    state.score.reset();
    state.director.reset();
    state.elapsed = 0.0;
    state.blink = Blink::default();

    state.asteroids.clear();
    state.enemies.clear();
    state.bosses.clear();
    state.projectiles.clear();
    state.enemy_projectiles.clear();
    state.boss_projectiles.clear();
    state.explosions.clear();

    let handle = state.player.handle().next();
    state.player = Player::new(state.field.width / 2.0, state.field.height / 2.0, handle);

    spawn::spawn_asteroids(state, NEW_GAME_ASTEROIDS, rng);
    spawn::spawn_enemies(state, NEW_GAME_ENEMIES, rng);

    state.status = GameStatus::Playing;
    info!("New game started");
}

// ── Input-driven state transitions ───────────────────────────────────────────

pub fn handle_intent(state: &GameState, intent: Intent, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    handle_intent_in_place(&mut next, intent, rng);
    next
}

/// Interpret one intent according to the current mode. Menu and GameOver
/// only react to `Start`; Playing ignores `Start` and everything once the
/// player is dead.
pub fn handle_intent_in_place(state: &mut GameState, intent: Intent, rng: &mut impl Rng) {
    match state.status {
        GameStatus::Menu | GameStatus::GameOver => {
            if intent == Intent::Start {
                start_new_game(state, rng);
            }
        }
        GameStatus::Playing => {
            if !state.player.is_alive() {
                return;
            }
            match intent {
                Intent::MoveForward(on) => state.player.controls.forward = on,
                Intent::MoveBackward(on) => state.player.controls.backward = on,
                Intent::MoveLeft(on) => state.player.controls.left = on,
                Intent::MoveRight(on) => state.player.controls.right = on,
                Intent::RotateLeft(on) => state.player.controls.rotate_left = on,
                Intent::RotateRight(on) => state.player.controls.rotate_right = on,
                Intent::Fire => {
                    fire_projectile(state);
                }
                Intent::ActivateBomb => {
                    activate_bomb(state);
                }
                Intent::Start => {}
            }
        }
    }
}

/// Fire from the ship's nose if the shot cooldown allows. Returns whether a
/// projectile was created.
pub fn fire_projectile(state: &mut GameState) -> bool {
    let player = &mut state.player;
    if !player.can_shoot() {
        return false;
    }
    let shot = Projectile::fired_from(
        ProjectileKind::Player,
        player.body.x,
        player.body.y,
        player.body.rotation,
    );
    debug!("Projectile fired from ({:.1}, {:.1})", shot.body.x, shot.body.y);
    state.projectiles.push(shot);
    player.reset_shoot_cooldown();
    true
}

/// Destroy the asteroid nearest the player outright. The bomb is only spent
/// when there is an asteroid to destroy.
pub fn activate_bomb(state: &mut GameState) -> bool {
    if !state.player.can_use_bomb() {
        return false;
    }
    let (px, py) = (state.player.body.x, state.player.body.y);
    let nearest = state
        .asteroids
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.is_destroyed())
        .map(|(i, a)| (i, (a.body.x - px).hypot(a.body.y - py)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i);

    let Some(index) = nearest else {
        return false;
    };

    let mut asteroid = state.asteroids.remove(index);
    let remaining = asteroid.hit_points();
    if asteroid.take_damage(remaining) {
        award_destruction(
            state,
            asteroid.points(),
            asteroid.body.x,
            asteroid.body.y,
            ExplosionKind::Bomb,
        );
    }
    state.player.use_bomb();
    info!("Bomb used on nearest asteroid");
    true
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one tick.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    tick_in_place(&mut next, rng);
    next
}

pub fn tick_in_place(state: &mut GameState, rng: &mut impl Rng) {
    state.frame += 1;
    match state.status {
        GameStatus::Menu => update_menu(state),
        GameStatus::Playing => update_playing(state, rng),
        GameStatus::GameOver => state.blink.advance(),
    }
}

/// Ornamental background: hazards drift, nothing collides or fires.
fn update_menu(state: &mut GameState) {
    let ctx = context(state);
    for asteroid in &mut state.asteroids {
        log_failure(guarded_update(asteroid, &ctx));
    }
    let live = live_target(state);
    for enemy in &mut state.enemies {
        let ctx = UpdateContext { target: aim(enemy.target, live), ..ctx };
        log_failure(guarded_update(enemy, &ctx));
    }
    state.blink.advance();
}

/// One Playing tick, always in the same order.
fn update_playing(state: &mut GameState, rng: &mut impl Rng) {
    // ── 1. Dead player ends the game ─────────────────────────────────────────
    if !state.player.is_alive() {
        state.status = GameStatus::GameOver;
        info!("Game over, final score {}", state.score.current());
        return;
    }
    state.elapsed += state.dt;
    let ctx = context(state);

    // ── 2. Player ────────────────────────────────────────────────────────────
    log_failure(guarded_update(&mut state.player, &ctx));

    // ── 3. Explosions ────────────────────────────────────────────────────────
    for explosion in &mut state.explosions {
        log_failure(guarded_update(explosion, &ctx));
    }
    state.explosions.retain(|e| !e.is_finished());

    // ── 4. Player projectiles against hazards ────────────────────────────────
    let mut projectiles = std::mem::take(&mut state.projectiles);
    projectiles.retain_mut(|projectile| {
        log_failure(guarded_update(projectile, &ctx));
        if projectile.is_expired() {
            return false;
        }
        !strike_hazard(state, projectile)
    });
    state.projectiles = projectiles;

    // ── 5. Asteroids ─────────────────────────────────────────────────────────
    state.asteroids.retain(|a| !a.is_destroyed());
    for asteroid in &mut state.asteroids {
        log_failure(guarded_update(asteroid, &ctx));
    }

    // ── 6. Enemies ───────────────────────────────────────────────────────────
    update_enemies(state, &ctx, rng);

    // ── 7. Bosses ────────────────────────────────────────────────────────────
    update_bosses(state, &ctx);

    // ── 8. Hostile projectiles against the player ────────────────────────────
    let margin = state.collision_margin;
    update_hostile_projectiles(&mut state.enemy_projectiles, &mut state.player, &ctx, margin);
    update_hostile_projectiles(&mut state.boss_projectiles, &mut state.player, &ctx, margin);

    // ── 9. Body contact ──────────────────────────────────────────────────────
    handle_collisions(
        &mut state.player,
        &state.asteroids,
        &state.enemies,
        &state.bosses,
        margin,
    );

    // ── 10. Boss eligibility ─────────────────────────────────────────────────
    state.director.observe_score(state.score.current());

    // ── 11. Spawning ─────────────────────────────────────────────────────────
    spawn::run(state, rng);
}

fn update_enemies(state: &mut GameState, ctx: &UpdateContext, rng: &mut impl Rng) {
    state.enemies.retain(|e| !e.is_destroyed());
    let live = live_target(state);

    for enemy in &mut state.enemies {
        let target = aim(enemy.target, live);
        let ctx = UpdateContext { target, ..*ctx };
        log_failure(guarded_update(enemy, &ctx));

        if let Some(target) = target {
            if enemy.can_shoot() {
                let angle = angle_to(enemy.body.x, enemy.body.y, target);
                state.enemy_projectiles.push(Projectile::fired_from(
                    ProjectileKind::Enemy,
                    enemy.body.x,
                    enemy.body.y,
                    angle,
                ));
                enemy.reset_shoot_cooldown(rng);
            }
        }
    }
}

fn update_bosses(state: &mut GameState, ctx: &UpdateContext) {
    state.bosses.retain(|b| !b.is_destroyed());
    let live = live_target(state);

    for boss in &mut state.bosses {
        let target = aim(boss.target, live);
        let ctx = UpdateContext { target, ..*ctx };
        log_failure(guarded_update(boss, &ctx));

        if let Some(target) = target {
            if boss.can_shoot() {
                let angle = angle_to(boss.body.x, boss.body.y, target);
                match boss.next_pattern() {
                    BossPattern::Straight => {
                        state.boss_projectiles.push(Projectile::fired_from(
                            ProjectileKind::Boss(BossPattern::Straight),
                            boss.body.x,
                            boss.body.y,
                            angle,
                        ));
                    }
                    BossPattern::MultiShot => {
                        let rad = angle.to_radians();
                        state.boss_projectiles.extend(Projectile::boss_fan(
                            boss.body.x + rad.cos() * MUZZLE_OFFSET,
                            boss.body.y + rad.sin() * MUZZLE_OFFSET,
                            angle,
                            BOSS_FAN_COUNT,
                            BOSS_FAN_SPREAD,
                        ));
                    }
                }
                boss.record_volley();
                boss.reset_shoot_cooldown();
            }
        }
    }
}

fn update_hostile_projectiles(
    projectiles: &mut Vec<Projectile>,
    player: &mut Player,
    ctx: &UpdateContext,
    margin: f64,
) {
    projectiles.retain_mut(|projectile| {
        log_failure(guarded_update(projectile, ctx));
        if projectile.is_expired() {
            return false;
        }
        if player.is_alive() && check_collision(&*projectile, &*player, margin) {
            player.hit();
            return false;
        }
        true
    });
}

// ── Damage & destruction ─────────────────────────────────────────────────────

/// Test one live player projectile against asteroids, then enemies, then
/// bosses. The first hazard hit takes the damage and consumes the projectile.
/// Hazards already destroyed this tick are skipped.
fn strike_hazard(state: &mut GameState, projectile: &Projectile) -> bool {
    let margin = state.collision_margin;

    if let Some(i) = state
        .asteroids
        .iter()
        .position(|a| !a.is_destroyed() && check_collision(projectile, a, margin))
    {
        let asteroid = &mut state.asteroids[i];
        if asteroid.take_damage(PROJECTILE_DAMAGE) {
            let (points, x, y) = (asteroid.points(), asteroid.body.x, asteroid.body.y);
            award_destruction(state, points, x, y, ExplosionKind::Hit);
            info!("Asteroid destroyed, score {}", state.score.current());
        }
        return true;
    }

    if let Some(i) = state
        .enemies
        .iter()
        .position(|e| !e.is_destroyed() && check_collision(projectile, e, margin))
    {
        let enemy = &mut state.enemies[i];
        if enemy.take_damage(PROJECTILE_DAMAGE) {
            let (points, x, y) = (enemy.points(), enemy.body.x, enemy.body.y);
            award_destruction(state, points, x, y, ExplosionKind::Hit);
            info!("Enemy destroyed, score {}", state.score.current());
        }
        return true;
    }

    if let Some(i) = state
        .bosses
        .iter()
        .position(|b| !b.is_destroyed() && check_collision(projectile, b, margin))
    {
        let boss = &mut state.bosses[i];
        if boss.take_damage(PROJECTILE_DAMAGE) {
            let (points, x, y) = (boss.points(), boss.body.x, boss.body.y);
            award_destruction(state, points, x, y, ExplosionKind::Hit);
            state.director.on_boss_defeated();
            info!("Boss defeated, score {}", state.score.current());
        }
        return true;
    }

    false
}

/// Score a destroyed hazard and mark its spot with an explosion.
fn award_destruction(state: &mut GameState, points: u32, x: f64, y: f64, kind: ExplosionKind) {
    let awarded = state.score.add_points(points, state.elapsed);
    debug!("Awarded {} point(s) at ({:.1}, {:.1})", awarded, x, y);
    state.explosions.push(Explosion::new(kind, x, y));
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn context(state: &GameState) -> UpdateContext {
    UpdateContext { dt: state.dt, field: state.field, target: None }
}

/// The current player's handle and position, if the player is alive.
fn live_target(state: &GameState) -> Option<(PlayerHandle, Target)> {
    let handle = state.player.handle();
    state.resolve_target(handle).map(|target| (handle, target))
}

/// Revalidate a stored handle against the live player.
fn aim(handle: PlayerHandle, live: Option<(PlayerHandle, Target)>) -> Option<Target> {
    live.filter(|(current, _)| *current == handle).map(|(_, target)| target)
}

fn log_failure(result: Result<(), SimError>) {
    if let Err(e) = result {
        warn!("Entity update skipped: {}", e);
    }
}
