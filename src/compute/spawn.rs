/// Timer-driven spawn policy.
///
/// Every interval one asteroid enters from a screen edge. Enemies join until
/// the score makes a boss eligible; the boss clears the drones when it
/// arrives, and past the second threshold an extra drone joins every wave.

use rand::Rng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::entities::{
    Asteroid, AsteroidSize, Boss, BossSize, Enemy, EnemySize, GameState, Playfield,
};

/// Distance outside the visible rectangle at which new hazards appear.
pub const EDGE_MARGIN: f64 = 30.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnDirector {
    interval: f64,
    timer: f64,
    boss_threshold: u32,
    extra_enemy_score: u32,
    boss_spawned: bool,
    threshold_reached: bool,
    enemies_suppressed: bool,
}

/// What one firing of the director added or removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub asteroids: u32,
    pub enemies: u32,
    pub boss: bool,
    pub enemies_cleared: usize,
}

impl SpawnDirector {
    pub fn new(interval: f64, boss_threshold: u32, extra_enemy_score: u32) -> Self {
        Self {
            interval,
            timer: interval,
            boss_threshold,
            extra_enemy_score,
            boss_spawned: false,
            threshold_reached: false,
            enemies_suppressed: false,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.spawn_interval,
            config.boss_score_threshold,
            config.extra_enemy_score,
        )
    }

    /// Back to the start-of-game state: full timer, every flag cleared.
    pub fn reset(&mut self) {
        *self = Self::new(self.interval, self.boss_threshold, self.extra_enemy_score);
    }

    /// Latch the boss threshold. Once reached it stays reached until reset.
    pub fn observe_score(&mut self, score: u32) {
        if !self.threshold_reached && score >= self.boss_threshold {
            self.threshold_reached = true;
            info!("Score threshold {} reached, boss can now spawn", self.boss_threshold);
        }
    }

    /// A boss died: allow the next one and skip one wave's drone.
    pub fn on_boss_defeated(&mut self) {
        self.boss_spawned = false;
        self.enemies_suppressed = true;
    }

    /// Count the timer down; `true` when it fires. The timer is reset to the
    /// full interval whenever it fires.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.timer = self.interval;
            true
        } else {
            false
        }
    }

    /// Force the next `advance` to fire.
    pub fn expire_timer(&mut self) {
        self.timer = 0.0;
    }

    pub fn timer(&self) -> f64 {
        self.timer
    }

    pub fn boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    pub fn threshold_reached(&self) -> bool {
        self.threshold_reached
    }

    pub fn enemies_suppressed(&self) -> bool {
        self.enemies_suppressed
    }
}

/// Advance the director by one tick and spawn a wave if its timer fired.
pub fn run(state: &mut GameState, rng: &mut impl Rng) -> Option<SpawnReport> {
    if state.director.advance(state.dt) {
        Some(spawn_wave(state, rng))
    } else {
        None
    }
}

/// One firing of the director, in fixed order: asteroid, drone, boss,
/// extra drone.
pub fn spawn_wave(state: &mut GameState, rng: &mut impl Rng) -> SpawnReport {
    let mut report = SpawnReport::default();

    spawn_asteroids(state, 1, rng);
    report.asteroids += 1;

    if !state.director.boss_spawned && !state.director.enemies_suppressed {
        spawn_enemies(state, 1, rng);
        report.enemies += 1;
    }
    state.director.enemies_suppressed = false;

    if state.director.threshold_reached && !state.director.boss_spawned && !state.boss_exists() {
        report.enemies_cleared = state.enemies.len();
        report.enemies = 0;
        state.enemies.clear();
        spawn_boss(state, rng);
        report.boss = true;
    }

    if state.score.current() >= state.director.extra_enemy_score {
        spawn_enemies(state, 1, rng);
        report.enemies += 1;
    }

    debug!(
        "Spawn wave: {} asteroid(s), {} enemy(ies), boss={}",
        report.asteroids, report.enemies, report.boss
    );
    report
}

/// Random point just outside one of the four edges, the edge chosen
/// uniformly and the position along it uniform.
pub fn edge_position(field: Playfield, rng: &mut impl Rng) -> (f64, f64) {
    match rng.gen_range(0..4) {
        0 => (-EDGE_MARGIN, rng.gen::<f64>() * field.height),
        1 => (field.width + EDGE_MARGIN, rng.gen::<f64>() * field.height),
        2 => (rng.gen::<f64>() * field.width, -EDGE_MARGIN),
        _ => (rng.gen::<f64>() * field.width, field.height + EDGE_MARGIN),
    }
}

pub fn random_asteroid_size(rng: &mut impl Rng) -> AsteroidSize {
    if rng.gen_bool(0.6) {
        AsteroidSize::Large
    } else {
        AsteroidSize::Medium
    }
}

pub fn random_enemy_size(rng: &mut impl Rng) -> EnemySize {
    if rng.gen_bool(0.6) {
        EnemySize::Small
    } else {
        EnemySize::Large
    }
}

pub fn spawn_asteroids(state: &mut GameState, count: usize, rng: &mut impl Rng) {
    for _ in 0..count {
        let (x, y) = edge_position(state.field, rng);
        let size = random_asteroid_size(rng);
        state.asteroids.push(Asteroid::new(x, y, size, rng));
    }
}

pub fn spawn_enemies(state: &mut GameState, count: usize, rng: &mut impl Rng) {
    let target = state.player.handle();
    for _ in 0..count {
        let (x, y) = edge_position(state.field, rng);
        let size = random_enemy_size(rng);
        state.enemies.push(Enemy::new(x, y, size, target, rng));
    }
}

/// Place the boss unconditionally and mark it spawned. The eligibility
/// checks live in `spawn_wave`.
fn spawn_boss(state: &mut GameState, rng: &mut impl Rng) {
    let (x, y) = edge_position(state.field, rng);
    let target = state.player.handle();
    state.bosses.push(Boss::new(x, y, BossSize::Standard, target, rng));
    state.director.boss_spawned = true;
    info!("Boss spawned at ({:.1}, {:.1})", x, y);
}
