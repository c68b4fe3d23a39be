/// Per-kind update rules behind one capability trait.
///
/// Every entity advances in playfield units per tick; timers and animation
/// counters consume the nominal tick delta carried by `UpdateContext`.

use crate::entities::{
    angle_to, Asteroid, Body, Boss, Bounds, EntityKind, Enemy, Explosion, ExplosionKind, Player,
    Playfield, Projectile, Target, HOMING_TURN_RATE, PLAYER_ACCELERATION, PLAYER_DRAG,
    PLAYER_MAX_SPEED, PLAYER_ROTATION_SPEED,
};
use crate::error::SimError;

const PLAYER_ANIM_FRAMES: u32 = 6;
const PLAYER_ANIM_INTERVAL: f64 = 0.1;
const HIT_ANIM_FRAMES: u32 = 5;
const HIT_ANIM_INTERVAL: f64 = 0.1;
const BOSS_ANIM_FRAMES: u32 = 2;
const BOSS_ANIM_INTERVAL: f64 = 0.2;

/// What an entity may read while it updates.
#[derive(Clone, Copy, Debug)]
pub struct UpdateContext {
    pub dt: f64,
    pub field: Playfield,
    /// Resolved player position for homing entities, if the player is alive.
    pub target: Option<Target>,
}

/// Shared capability of every simulated entity.
pub trait Entity {
    fn kind(&self) -> EntityKind;
    fn body(&self) -> Body;
    fn update(&mut self, ctx: &UpdateContext);

    fn bounds(&self) -> Result<Bounds, SimError> {
        self.body().bounds(self.kind())
    }
}

/// Run one update, rolling the entity back if it leaves the finite plane.
///
/// A failed entity is left exactly as it was before the tick, so the rest of
/// the world can keep advancing around it.
pub fn guarded_update<E: Entity + Clone>(
    entity: &mut E,
    ctx: &UpdateContext,
) -> Result<(), SimError> {
    let before = entity.clone();
    entity.update(ctx);
    let kind = entity.kind();
    if let Err(e) = entity.body().validate(kind) {
        *entity = before;
        return Err(e);
    }
    Ok(())
}

// ── Wrap-around ──────────────────────────────────────────────────────────────

/// Wrap at the exact playfield edges (player and projectiles).
pub fn wrap_tight(body: &mut Body, field: Playfield) {
    if body.x < 0.0 {
        body.x = field.width;
    } else if body.x > field.width {
        body.x = 0.0;
    }
    if body.y < 0.0 {
        body.y = field.height;
    } else if body.y > field.height {
        body.y = 0.0;
    }
}

/// Wrap hazards, which may sit up to one extent outside the visible area.
///
/// Leaving past the far edge re-enters at `-extent`, so the hazard slides in
/// from off-screen instead of popping into view.
pub fn wrap_with_margin(body: &mut Body, field: Playfield) {
    if body.x < -body.width {
        body.x = field.width;
    } else if body.x > field.width {
        body.x = -body.width;
    }
    if body.y < -body.height {
        body.y = field.height;
    } else if body.y > field.height {
        body.y = -body.height;
    }
}

// ── Homing ───────────────────────────────────────────────────────────────────

/// Signed shortest difference `to - from`, in (-180, 180].
pub fn angle_difference(from: f64, to: f64) -> f64 {
    let diff = (to - from).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Turn `rotation` toward `target_angle` by at most `max_step` degrees.
pub fn turn_toward(rotation: f64, target_angle: f64, max_step: f64) -> f64 {
    let diff = angle_difference(rotation, target_angle);
    rotation + diff.signum() * diff.abs().min(max_step)
}

fn advance_frame(frame: &mut u32, timer: &mut f64, dt: f64, interval: f64, count: u32) {
    *timer += dt;
    if *timer >= interval {
        *frame = (*frame + 1) % count;
        *timer = 0.0;
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

impl Entity for Player {
    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn body(&self) -> Body {
        self.body
    }

    fn update(&mut self, ctx: &UpdateContext) {
        let controls = self.controls;

        if controls.forward {
            advance_frame(
                &mut self.anim_frame,
                &mut self.anim_timer,
                ctx.dt,
                PLAYER_ANIM_INTERVAL,
                PLAYER_ANIM_FRAMES,
            );
        }

        if controls.rotate_left {
            self.body.rotation -= PLAYER_ROTATION_SPEED;
        }
        if controls.rotate_right {
            self.body.rotation += PLAYER_ROTATION_SPEED;
        }

        let heading = self.body.rotation.to_radians();
        let half_turn = std::f64::consts::FRAC_PI_2;
        let mut thrust = |angle: f64, sign: f64| {
            self.vx += sign * angle.cos() * PLAYER_ACCELERATION;
            self.vy += sign * angle.sin() * PLAYER_ACCELERATION;
        };
        if controls.forward {
            thrust(heading, 1.0);
        }
        if controls.backward {
            thrust(heading, -1.0);
        }
        if controls.left {
            thrust(heading - half_turn, 1.0);
        }
        if controls.right {
            thrust(heading + half_turn, 1.0);
        }

        let speed = self.vx.hypot(self.vy);
        if speed > PLAYER_MAX_SPEED {
            self.vx = self.vx / speed * PLAYER_MAX_SPEED;
            self.vy = self.vy / speed * PLAYER_MAX_SPEED;
        }

        self.body.x += self.vx;
        self.body.y += self.vy;
        self.vx *= PLAYER_DRAG;
        self.vy *= PLAYER_DRAG;

        wrap_tight(&mut self.body, ctx.field);

        if self.is_invulnerable() {
            advance_frame(
                &mut self.hit_frame,
                &mut self.hit_timer,
                ctx.dt,
                HIT_ANIM_INTERVAL,
                HIT_ANIM_FRAMES,
            );
        }
        self.tick_timers(ctx.dt);
    }
}

// ── Hazards ──────────────────────────────────────────────────────────────────

impl Entity for Asteroid {
    fn kind(&self) -> EntityKind {
        EntityKind::Asteroid
    }

    fn body(&self) -> Body {
        self.body
    }

    fn update(&mut self, ctx: &UpdateContext) {
        self.body.x += self.vx;
        self.body.y += self.vy;
        self.body.rotation += self.spin;
        wrap_with_margin(&mut self.body, ctx.field);
    }
}

impl Entity for Enemy {
    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }

    fn body(&self) -> Body {
        self.body
    }

    /// Drift along the spawn heading while turning to face the player.
    fn update(&mut self, ctx: &UpdateContext) {
        self.body.x += self.vx;
        self.body.y += self.vy;
        if let Some(target) = ctx.target {
            let wanted = angle_to(self.body.x, self.body.y, target);
            self.body.rotation = turn_toward(self.body.rotation, wanted, HOMING_TURN_RATE);
        }
        self.tick_cooldown(ctx.dt);
        wrap_with_margin(&mut self.body, ctx.field);
    }
}

impl Entity for Boss {
    fn kind(&self) -> EntityKind {
        EntityKind::Boss
    }

    fn body(&self) -> Body {
        self.body
    }

    /// Close in on the player at a fixed speed while turning to face it.
    fn update(&mut self, ctx: &UpdateContext) {
        advance_frame(
            &mut self.anim_frame,
            &mut self.anim_timer,
            ctx.dt,
            BOSS_ANIM_INTERVAL,
            BOSS_ANIM_FRAMES,
        );

        if let Some(target) = ctx.target {
            let dx = target.x - self.body.x;
            let dy = target.y - self.body.y;
            let distance = dx.hypot(dy);
            if distance > 0.0 {
                self.body.x += dx / distance * self.speed;
                self.body.y += dy / distance * self.speed;
            }
            let wanted = angle_to(self.body.x, self.body.y, target);
            self.body.rotation = turn_toward(self.body.rotation, wanted, HOMING_TURN_RATE);
        }

        self.tick_cooldown(ctx.dt);
        wrap_with_margin(&mut self.body, ctx.field);
    }
}

// ── Projectiles & effects ────────────────────────────────────────────────────

impl Entity for Projectile {
    fn kind(&self) -> EntityKind {
        Projectile::kind(self).entity_kind()
    }

    fn body(&self) -> Body {
        self.body
    }

    /// Expired projectiles are inert; an expiring one is not wrapped.
    fn update(&mut self, ctx: &UpdateContext) {
        if self.is_expired() {
            return;
        }
        self.body.x += self.vx;
        self.body.y += self.vy;
        self.age();
        if self.is_expired() {
            return;
        }
        wrap_tight(&mut self.body, ctx.field);
    }
}

impl Entity for Explosion {
    fn kind(&self) -> EntityKind {
        match self.kind {
            ExplosionKind::Hit => EntityKind::Explosion,
            ExplosionKind::Bomb => EntityKind::BombExplosion,
        }
    }

    fn body(&self) -> Body {
        let extent = self.kind.extent();
        Body::new(self.x, self.y, extent, extent)
    }

    fn update(&mut self, ctx: &UpdateContext) {
        self.advance(ctx.dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_difference_takes_short_way_round() {
        assert!((angle_difference(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((angle_difference(10.0, 350.0) + 20.0).abs() < 1e-9);
        assert!(angle_difference(-90.0, 630.0).abs() < 1e-9);
    }

    #[test]
    fn turn_toward_is_capped() {
        assert!((turn_toward(0.0, 90.0, 3.0) - 3.0).abs() < 1e-9);
        assert!((turn_toward(0.0, -1.0, 3.0) + 1.0).abs() < 1e-9);
        assert_eq!(turn_toward(45.0, 45.0, 3.0), 45.0);
    }
}
