/// Read-only snapshots for renderers.
///
/// The simulation never draws anything itself; a frontend asks for the
/// entity list and the HUD after each tick and paints whatever it likes.

use crate::compute::movement::Entity;
use crate::entities::{EntityKind, GameState, GameStatus};

/// One drawable entity: kind, centre, extent, heading and animation frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityView {
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub frame: u32,
    /// Remaining hit points as a fraction of the maximum, for damage tinting.
    pub hp_fraction: f64,
    /// Set while the invulnerable player is in the dark half of its flicker.
    pub dimmed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub high_score: u32,
    pub combo: u32,
    pub lives: u32,
    /// Seconds until the bomb is ready again; zero when ready.
    pub bomb_cooldown: f64,
    pub status: GameStatus,
    pub blink_alpha: f64,
}

fn snapshot<E: Entity>(entity: &E, frame: u32, hp_fraction: f64) -> EntityView {
    let body = entity.body();
    EntityView {
        kind: entity.kind(),
        x: body.x,
        y: body.y,
        width: body.width,
        height: body.height,
        rotation: body.rotation,
        frame,
        hp_fraction,
        dimmed: false,
    }
}

fn fraction(current: i32, max: i32) -> f64 {
    if max <= 0 {
        return 0.0;
    }
    (f64::from(current) / f64::from(max)).clamp(0.0, 1.0)
}

/// Every entity worth drawing, back to front. The player is omitted outside
/// Playing and once it has no lives left.
pub fn views(state: &GameState) -> Vec<EntityView> {
    let mut out = Vec::with_capacity(
        state.asteroids.len()
            + state.enemies.len()
            + state.bosses.len()
            + state.projectiles.len()
            + state.enemy_projectiles.len()
            + state.boss_projectiles.len()
            + state.explosions.len()
            + 1,
    );

    out.extend(state.asteroids.iter().filter(|a| !a.is_destroyed()).map(|a| {
        snapshot(a, 0, fraction(a.hit_points(), a.size().hit_points()))
    }));
    out.extend(
        state
            .enemies
            .iter()
            .filter(|e| !e.is_destroyed())
            .map(|e| snapshot(e, 0, fraction(e.hit_points(), e.max_hit_points()))),
    );
    out.extend(
        state
            .bosses
            .iter()
            .filter(|b| !b.is_destroyed())
            .map(|b| snapshot(b, b.anim_frame, fraction(b.hit_points(), b.max_hit_points()))),
    );

    let shots = state
        .projectiles
        .iter()
        .chain(&state.enemy_projectiles)
        .chain(&state.boss_projectiles);
    out.extend(shots.filter(|p| !p.is_expired()).map(|p| snapshot(p, 0, 1.0)));

    out.extend(state.explosions.iter().map(|e| snapshot(e, e.frame, 1.0)));

    let player = &state.player;
    if state.status == GameStatus::Playing && player.is_alive() {
        let frame = if player.is_invulnerable() { player.hit_frame } else { player.anim_frame };
        let mut view = snapshot(player, frame, 1.0);
        view.dimmed = player.flicker_dimmed();
        out.push(view);
    }

    out
}

pub fn hud(state: &GameState) -> Hud {
    Hud {
        score: state.score.current(),
        high_score: state.score.high(),
        combo: state.score.combo(),
        lives: state.player.lives(),
        bomb_cooldown: state.player.bomb_cooldown().max(0.0),
        status: state.status,
        blink_alpha: state.blink.alpha,
    }
}
