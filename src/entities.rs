/// All game entity types and the master game state.
///
/// This module owns construction and the per-entity invariants (hit points,
/// invulnerability, cooldown bookkeeping). Per-tick motion lives in
/// `compute::movement`; world-level rules live in `compute`.

use rand::Rng;
use tracing::{debug, info};

use crate::compute::spawn::SpawnDirector;
use crate::error::SimError;
use crate::score::ScoreState;

// ── Tuning constants ─────────────────────────────────────────────────────────

pub const PLAYER_SIZE: f64 = 20.0;
pub const PLAYER_START_LIVES: u32 = 3;
pub const PLAYER_MAX_SPEED: f64 = 5.0;
pub const PLAYER_ACCELERATION: f64 = 0.2;
pub const PLAYER_DRAG: f64 = 0.98;
pub const PLAYER_ROTATION_SPEED: f64 = 5.0;
pub const PLAYER_START_ROTATION: f64 = -90.0;
pub const INVULNERABILITY_DURATION: f64 = 2.0;
pub const PLAYER_SHOOT_COOLDOWN: f64 = 0.25;
pub const BOMB_COOLDOWN: f64 = 15.0;

pub const ENEMY_SHOOT_COOLDOWN: f64 = 2.0;
pub const BOSS_SHOOT_COOLDOWN: f64 = 1.5;
/// Degrees per tick an enemy or boss may turn toward the player.
pub const HOMING_TURN_RATE: f64 = 3.0;

/// Distance ahead of the shooter at which a projectile appears.
pub const MUZZLE_OFFSET: f64 = 20.0;
pub const BOSS_FAN_COUNT: usize = 5;
pub const BOSS_FAN_SPREAD: f64 = 45.0;

// ── Shared geometry ──────────────────────────────────────────────────────────

/// Closed set of entity kinds, used for logging, errors and render views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Asteroid,
    Enemy,
    Boss,
    Projectile,
    EnemyProjectile,
    BossProjectile,
    Explosion,
    BombExplosion,
}

/// The wrapped rectangle every entity lives on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
}

/// Kinematic body embedded in every entity. `(x, y)` is the centre.
///
/// `rotation` is in degrees and is only normalised where angles are compared.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

/// Axis-aligned box described by its top-left corner and size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn center(&self) -> (f64, f64) {
        (self.min_x + self.width / 2.0, self.min_y + self.height / 2.0)
    }
}

impl Body {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, rotation: 0.0 }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.rotation.is_finite()
    }

    /// Check the body is still on the finite plane.
    pub fn validate(&self, kind: EntityKind) -> Result<(), SimError> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(SimError::NonFiniteBody { kind })
        }
    }

    pub fn bounds(&self, kind: EntityKind) -> Result<Bounds, SimError> {
        self.validate(kind)?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(SimError::DegenerateBounds { kind });
        }
        Ok(Bounds {
            min_x: self.x - self.width / 2.0,
            min_y: self.y - self.height / 2.0,
            width: self.width,
            height: self.height,
        })
    }
}

/// Point an enemy or boss steers toward this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub x: f64,
    pub y: f64,
}

/// Non-owning reference to the player slot.
///
/// The generation changes every time the player is replaced, so a stale
/// handle resolves to nothing instead of to the new ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerHandle {
    generation: u32,
}

impl PlayerHandle {
    pub const fn new(generation: u32) -> Self {
        Self { generation }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn next(&self) -> Self {
        Self { generation: self.generation.wrapping_add(1) }
    }
}

/// Heading from `(x, y)` to the target, in degrees.
pub fn angle_to(x: f64, y: f64, target: Target) -> f64 {
    (target.y - y).atan2(target.x - x).to_degrees()
}

fn random_heading(rng: &mut impl Rng, speed: f64) -> (f64, f64) {
    let angle = rng.gen::<f64>() * std::f64::consts::TAU;
    (angle.cos() * speed, angle.sin() * speed)
}

// ── Player ───────────────────────────────────────────────────────────────────

/// Held movement intents, set by the input layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Controls {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub vx: f64,
    pub vy: f64,
    pub controls: Controls,
    handle: PlayerHandle,
    lives: u32,
    invulnerable: bool,
    invulnerability_timer: f64,
    shoot_cooldown: f64,
    bomb_cooldown: f64,
    /// Thrust animation frame, advanced while moving forward.
    pub anim_frame: u32,
    pub anim_timer: f64,
    /// Hit-effect frame, advanced while invulnerable.
    pub hit_frame: u32,
    pub hit_timer: f64,
}

impl Player {
    pub fn new(x: f64, y: f64, handle: PlayerHandle) -> Self {
        let mut body = Body::new(x, y, PLAYER_SIZE, PLAYER_SIZE);
        body.rotation = PLAYER_START_ROTATION;
        info!("Player created at ({:.1}, {:.1})", x, y);
        Self {
            body,
            vx: 0.0,
            vy: 0.0,
            controls: Controls::default(),
            handle,
            lives: PLAYER_START_LIVES,
            invulnerable: false,
            invulnerability_timer: 0.0,
            shoot_cooldown: 0.0,
            bomb_cooldown: 0.0,
            anim_frame: 0,
            anim_timer: 0.0,
            hit_frame: 0,
            hit_timer: 0.0,
        }
    }

    pub fn handle(&self) -> PlayerHandle {
        self.handle
    }

    /// Take one hit. Returns `true` when a life was actually lost; hits
    /// during the invulnerability window are ignored.
    pub fn hit(&mut self) -> bool {
        if self.invulnerable || self.lives == 0 {
            return false;
        }
        self.lives -= 1;
        self.invulnerable = true;
        self.invulnerability_timer = INVULNERABILITY_DURATION;
        info!("Player hit, lives remaining: {}", self.lives);
        true
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn invulnerability_remaining(&self) -> f64 {
        self.invulnerability_timer
    }

    /// Blink phase for the hit flicker: dimmed on even tenths of a second.
    pub fn flicker_dimmed(&self) -> bool {
        self.invulnerable && (self.invulnerability_timer * 10.0).floor() as i64 % 2 == 0
    }

    pub fn can_shoot(&self) -> bool {
        self.shoot_cooldown <= 0.0
    }

    pub fn reset_shoot_cooldown(&mut self) {
        self.shoot_cooldown = PLAYER_SHOOT_COOLDOWN;
    }

    pub fn can_use_bomb(&self) -> bool {
        self.bomb_cooldown <= 0.0
    }

    pub fn use_bomb(&mut self) {
        self.bomb_cooldown = BOMB_COOLDOWN;
    }

    pub fn bomb_cooldown(&self) -> f64 {
        self.bomb_cooldown.max(0.0)
    }

    /// Count every timer down by `dt`.
    pub(crate) fn tick_timers(&mut self, dt: f64) {
        if self.invulnerable {
            self.invulnerability_timer -= dt;
            if self.invulnerability_timer <= 0.0 {
                self.invulnerable = false;
                self.invulnerability_timer = 0.0;
                self.hit_frame = 0;
            }
        }
        if self.shoot_cooldown > 0.0 {
            self.shoot_cooldown -= dt;
        }
        if self.bomb_cooldown > 0.0 {
            self.bomb_cooldown -= dt;
        }
    }
}

// ── Asteroid ─────────────────────────────────────────────────────────────────

/// The two reachable asteroid classes. Raw code 1 is large, 2 is medium.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsteroidSize {
    Large,
    Medium,
}

impl AsteroidSize {
    pub fn extent(self) -> f64 {
        match self {
            AsteroidSize::Large => 60.0,
            AsteroidSize::Medium => 30.0,
        }
    }

    pub fn hit_points(self) -> i32 {
        match self {
            AsteroidSize::Large => 1,
            AsteroidSize::Medium => 2,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            AsteroidSize::Large => 1,
            AsteroidSize::Medium => 2,
        }
    }

    fn speed_factor(self) -> f64 {
        match self {
            AsteroidSize::Large => 0.5,
            AsteroidSize::Medium => 1.0,
        }
    }
}

impl TryFrom<u8> for AsteroidSize {
    type Error = SimError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(AsteroidSize::Large),
            2 => Ok(AsteroidSize::Medium),
            other => Err(SimError::InvalidAsteroidSize(other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Asteroid {
    pub body: Body,
    pub vx: f64,
    pub vy: f64,
    /// Degrees added to the rotation every tick.
    pub spin: f64,
    size: AsteroidSize,
    hit_points: i32,
    destroyed: bool,
}

impl Asteroid {
    /// Asteroid with a random heading, speed, spin and initial rotation.
    pub fn new(x: f64, y: f64, size: AsteroidSize, rng: &mut impl Rng) -> Self {
        let speed = (1.0 + rng.gen::<f64>() * 2.0) * size.speed_factor();
        let (vx, vy) = random_heading(rng, speed);
        let spin = (rng.gen::<f64>() - 0.5) * 4.0;
        let rotation = rng.gen::<f64>() * 360.0;
        debug!("Created {:?} asteroid at ({:.1}, {:.1})", size, x, y);
        Self::with_motion(x, y, size, vx, vy, spin, rotation)
    }

    /// Asteroid with fully specified motion.
    pub fn with_motion(
        x: f64,
        y: f64,
        size: AsteroidSize,
        vx: f64,
        vy: f64,
        spin: f64,
        rotation: f64,
    ) -> Self {
        let mut body = Body::new(x, y, size.extent(), size.extent());
        body.rotation = rotation;
        Self {
            body,
            vx,
            vy,
            spin,
            size,
            hit_points: size.hit_points(),
            destroyed: false,
        }
    }

    /// Subtract `amount` hit points. Returns `true` only on the call that
    /// destroys the asteroid.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hit_points -= amount;
        let newly = !self.destroyed && self.hit_points <= 0;
        if newly {
            self.destroyed = true;
        }
        newly
    }

    pub fn size(&self) -> AsteroidSize {
        self.size
    }

    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    pub fn points(&self) -> u32 {
        self.size.points()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

/// Drone classes. Raw code 1 is the small drone, 2 the large one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemySize {
    Small,
    Large,
}

impl EnemySize {
    pub fn extent(self) -> f64 {
        match self {
            EnemySize::Small => 32.0,
            EnemySize::Large => 64.0,
        }
    }

    pub fn hit_points(self) -> i32 {
        match self {
            EnemySize::Small => 1,
            EnemySize::Large => 2,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            EnemySize::Small => 1,
            EnemySize::Large => 2,
        }
    }

    fn speed_factor(self) -> f64 {
        match self {
            EnemySize::Small => 0.8,
            EnemySize::Large => 0.6,
        }
    }
}

impl TryFrom<u8> for EnemySize {
    type Error = SimError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(EnemySize::Small),
            2 => Ok(EnemySize::Large),
            other => Err(SimError::InvalidEnemySize(other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub body: Body,
    pub vx: f64,
    pub vy: f64,
    pub target: PlayerHandle,
    size: EnemySize,
    hit_points: i32,
    shoot_cooldown: f64,
    destroyed: bool,
}

impl Enemy {
    pub fn new(x: f64, y: f64, size: EnemySize, target: PlayerHandle, rng: &mut impl Rng) -> Self {
        let speed = (3.0 + rng.gen::<f64>() * 2.0) * size.speed_factor();
        let (vx, vy) = random_heading(rng, speed);
        let mut body = Body::new(x, y, size.extent(), size.extent());
        body.rotation = rng.gen::<f64>() * 360.0;
        debug!("Created {:?} enemy at ({:.1}, {:.1})", size, x, y);
        Self {
            body,
            vx,
            vy,
            target,
            size,
            hit_points: size.hit_points(),
            shoot_cooldown: rng.gen::<f64>() * ENEMY_SHOOT_COOLDOWN,
            destroyed: false,
        }
    }

    /// Returns `true` only on the call that destroys the enemy.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hit_points -= amount;
        let newly = !self.destroyed && self.hit_points <= 0;
        if newly {
            self.destroyed = true;
        }
        newly
    }

    pub fn can_shoot(&self) -> bool {
        self.shoot_cooldown <= 0.0
    }

    /// Base cooldown jittered by ±20%.
    pub fn reset_shoot_cooldown(&mut self, rng: &mut impl Rng) {
        self.shoot_cooldown = ENEMY_SHOOT_COOLDOWN * (0.8 + rng.gen::<f64>() * 0.4);
    }

    pub fn shoot_cooldown(&self) -> f64 {
        self.shoot_cooldown
    }

    pub fn set_shoot_cooldown(&mut self, seconds: f64) {
        self.shoot_cooldown = seconds;
    }

    pub(crate) fn tick_cooldown(&mut self, dt: f64) {
        if self.shoot_cooldown > 0.0 {
            self.shoot_cooldown -= dt;
        }
    }

    pub fn size(&self) -> EnemySize {
        self.size
    }

    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    pub fn max_hit_points(&self) -> i32 {
        self.size.hit_points()
    }

    pub fn points(&self) -> u32 {
        self.size.points()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

// ── Boss ─────────────────────────────────────────────────────────────────────

/// Only one boss class exists; raw code 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossSize {
    Standard,
}

impl BossSize {
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            BossSize::Standard => (80.0, 70.0),
        }
    }

    pub fn hit_points(self) -> i32 {
        match self {
            BossSize::Standard => 5,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            BossSize::Standard => 10,
        }
    }
}

impl TryFrom<u8> for BossSize {
    type Error = SimError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(BossSize::Standard),
            other => Err(SimError::InvalidBossSize(other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub body: Body,
    /// Units per tick along the line to the player.
    pub speed: f64,
    pub target: PlayerHandle,
    size: BossSize,
    hit_points: i32,
    shoot_cooldown: f64,
    volleys_fired: u32,
    destroyed: bool,
    pub anim_frame: u32,
    pub anim_timer: f64,
}

impl Boss {
    pub fn new(x: f64, y: f64, size: BossSize, target: PlayerHandle, rng: &mut impl Rng) -> Self {
        let (width, height) = size.dimensions();
        let mut body = Body::new(x, y, width, height);
        body.rotation = rng.gen::<f64>() * 360.0;
        debug!("Boss created at ({:.1}, {:.1})", x, y);
        Self {
            body,
            speed: (3.0 + rng.gen::<f64>() * 2.0) * 0.7,
            target,
            size,
            hit_points: size.hit_points(),
            shoot_cooldown: rng.gen::<f64>() * BOSS_SHOOT_COOLDOWN,
            volleys_fired: 0,
            destroyed: false,
            anim_frame: 0,
            anim_timer: 0.0,
        }
    }

    /// Returns `true` only on the call that destroys the boss.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hit_points -= amount;
        let newly = !self.destroyed && self.hit_points <= 0;
        if newly {
            self.destroyed = true;
        }
        newly
    }

    pub fn can_shoot(&self) -> bool {
        self.shoot_cooldown <= 0.0
    }

    pub fn reset_shoot_cooldown(&mut self) {
        self.shoot_cooldown = BOSS_SHOOT_COOLDOWN;
    }

    pub fn set_shoot_cooldown(&mut self, seconds: f64) {
        self.shoot_cooldown = seconds;
    }

    pub(crate) fn tick_cooldown(&mut self, dt: f64) {
        if self.shoot_cooldown > 0.0 {
            self.shoot_cooldown -= dt;
        }
    }

    /// Pattern of the next volley: straight and fan shots alternate.
    pub fn next_pattern(&self) -> BossPattern {
        if self.volleys_fired % 2 == 0 {
            BossPattern::Straight
        } else {
            BossPattern::MultiShot
        }
    }

    pub(crate) fn record_volley(&mut self) {
        self.volleys_fired = self.volleys_fired.wrapping_add(1);
    }

    pub fn size(&self) -> BossSize {
        self.size
    }

    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    pub fn max_hit_points(&self) -> i32 {
        self.size.hit_points()
    }

    pub fn points(&self) -> u32 {
        self.size.points()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossPattern {
    Straight,
    MultiShot,
}

/// Who fired a projectile. Decides speed, size, lifetime and what it can hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    Player,
    Enemy,
    Boss(BossPattern),
}

impl ProjectileKind {
    pub fn speed(self) -> f64 {
        match self {
            ProjectileKind::Player => 12.0,
            ProjectileKind::Enemy => 8.0,
            ProjectileKind::Boss(_) => 7.0,
        }
    }

    pub fn extent(self) -> f64 {
        match self {
            ProjectileKind::Player => 6.0,
            ProjectileKind::Enemy => 5.0,
            ProjectileKind::Boss(_) => 6.0,
        }
    }

    /// Lifetime accumulated per tick.
    pub fn lifetime_step(self) -> f64 {
        match self {
            ProjectileKind::Player => 0.025,
            ProjectileKind::Enemy => 0.030,
            ProjectileKind::Boss(_) => 0.020,
        }
    }

    pub fn max_lifetime(self) -> f64 {
        match self {
            ProjectileKind::Player => 1.0,
            ProjectileKind::Enemy => 1.0,
            ProjectileKind::Boss(_) => 1.25,
        }
    }

    pub fn entity_kind(self) -> EntityKind {
        match self {
            ProjectileKind::Player => EntityKind::Projectile,
            ProjectileKind::Enemy => EntityKind::EnemyProjectile,
            ProjectileKind::Boss(_) => EntityKind::BossProjectile,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub body: Body,
    pub vx: f64,
    pub vy: f64,
    kind: ProjectileKind,
    lifetime: f64,
    expired: bool,
}

impl Projectile {
    /// Projectile at `(x, y)` travelling along `rotation` degrees. The
    /// velocity is fixed here and never recomputed.
    pub fn new(kind: ProjectileKind, x: f64, y: f64, rotation: f64) -> Self {
        let extent = kind.extent();
        let mut body = Body::new(x, y, extent, extent);
        body.rotation = rotation;
        let rad = rotation.to_radians();
        Self {
            body,
            vx: rad.cos() * kind.speed(),
            vy: rad.sin() * kind.speed(),
            kind,
            lifetime: 0.0,
            expired: false,
        }
    }

    /// Projectile fired from a shooter at `(x, y)`, placed ahead of it.
    pub fn fired_from(kind: ProjectileKind, x: f64, y: f64, rotation: f64) -> Self {
        let rad = rotation.to_radians();
        Self::new(
            kind,
            x + rad.cos() * MUZZLE_OFFSET,
            y + rad.sin() * MUZZLE_OFFSET,
            rotation,
        )
    }

    /// `count` boss projectiles spread evenly across `spread` degrees,
    /// centred on `rotation`, all starting at `(x, y)`.
    pub fn boss_fan(x: f64, y: f64, rotation: f64, count: usize, spread: f64) -> Vec<Self> {
        let kind = ProjectileKind::Boss(BossPattern::MultiShot);
        if count <= 1 {
            return vec![Self::new(kind, x, y, rotation)];
        }
        let step = spread / (count - 1) as f64;
        let start = rotation - spread / 2.0;
        (0..count)
            .map(|i| Self::new(kind, x, y, start + step * i as f64))
            .collect()
    }

    pub fn kind(&self) -> ProjectileKind {
        self.kind
    }

    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Accumulate one tick of lifetime; once expired the flag never clears.
    pub(crate) fn age(&mut self) {
        self.lifetime += self.kind.lifetime_step();
        if self.lifetime >= self.kind.max_lifetime() {
            self.expired = true;
        }
    }
}

// ── Explosions ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionKind {
    /// Destruction by a projectile.
    Hit,
    /// Destruction by the bomb ability.
    Bomb,
}

impl ExplosionKind {
    pub fn frame_count(self) -> u32 {
        match self {
            ExplosionKind::Hit => 5,
            ExplosionKind::Bomb => 6,
        }
    }

    pub fn frame_duration(self) -> f64 {
        match self {
            ExplosionKind::Hit => 0.05,
            ExplosionKind::Bomb => 0.055,
        }
    }

    pub fn extent(self) -> f64 {
        match self {
            ExplosionKind::Hit => 48.0,
            ExplosionKind::Bomb => 64.0,
        }
    }
}

/// Cosmetic only: never takes part in collision.
#[derive(Clone, Debug)]
pub struct Explosion {
    pub x: f64,
    pub y: f64,
    pub kind: ExplosionKind,
    pub frame: u32,
    pub frame_timer: f64,
    finished: bool,
}

impl Explosion {
    pub fn new(kind: ExplosionKind, x: f64, y: f64) -> Self {
        Self { x, y, kind, frame: 0, frame_timer: 0.0, finished: false }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn advance(&mut self, dt: f64) {
        if self.finished {
            return;
        }
        self.frame_timer += dt;
        if self.frame_timer >= self.kind.frame_duration() {
            self.frame_timer = 0.0;
            self.frame += 1;
            if self.frame >= self.kind.frame_count() {
                self.finished = true;
            }
        }
    }
}

// ── Game status ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Menu,
    Playing,
    GameOver,
}

/// Alpha of the pulsing "press start" text in Menu and GameOver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blink {
    pub alpha: f64,
    pub delta: f64,
}

impl Default for Blink {
    fn default() -> Self {
        Self { alpha: 1.0, delta: -0.02 }
    }
}

impl Blink {
    pub fn advance(&mut self) {
        self.alpha += self.delta;
        if self.alpha <= 0.0 || self.alpha >= 1.0 {
            self.alpha = self.alpha.clamp(0.0, 1.0);
            self.delta = -self.delta;
        }
    }
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire game state.
///
/// Collections are unordered; the player is a singleton that enemies and the
/// boss refer to only through a `PlayerHandle`.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub asteroids: Vec<Asteroid>,
    pub enemies: Vec<Enemy>,
    pub bosses: Vec<Boss>,
    pub projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub boss_projectiles: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    pub score: ScoreState,
    pub director: SpawnDirector,
    pub status: GameStatus,
    pub blink: Blink,
    pub field: Playfield,
    /// Nominal simulated seconds per tick.
    pub dt: f64,
    pub collision_margin: f64,
    /// Simulated seconds spent in Playing since the last new game.
    pub elapsed: f64,
    pub frame: u64,
}

impl GameState {
    /// Resolve a targeting handle to the player's current position. Stale
    /// handles and a dead player resolve to `None`.
    pub fn resolve_target(&self, handle: PlayerHandle) -> Option<Target> {
        if handle == self.player.handle() && self.player.is_alive() {
            Some(Target { x: self.player.body.x, y: self.player.body.y })
        } else {
            None
        }
    }

    pub fn boss_exists(&self) -> bool {
        !self.bosses.is_empty()
    }
}
