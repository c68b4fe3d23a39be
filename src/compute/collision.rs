/// Axis-aligned overlap tests.
///
/// Boxes are scaled by the configured margin before comparing centres; a
/// margin below 1.0 shrinks them, which makes near misses count as misses.

use tracing::{debug, error};

use crate::compute::movement::Entity;
use crate::entities::{Asteroid, Boss, Bounds, Enemy, Player};

/// `true` when the two boxes overlap. Never panics: if either box cannot be
/// computed the failure is logged and the pair reported as not colliding.
pub fn check_collision<A, B>(a: &A, b: &B, margin: f64) -> bool
where
    A: Entity + ?Sized,
    B: Entity + ?Sized,
{
    match (a.bounds(), b.bounds()) {
        (Ok(first), Ok(second)) => overlaps(&first, &second, margin),
        (Err(e), _) | (_, Err(e)) => {
            error!(
                "Collision check between {:?} and {:?} failed: {}",
                a.kind(),
                b.kind(),
                e
            );
            false
        }
    }
}

fn overlaps(a: &Bounds, b: &Bounds, margin: f64) -> bool {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    let half_w = (a.width * margin + b.width * margin) / 2.0;
    let half_h = (a.height * margin + b.height * margin) / 2.0;
    (ax - bx).abs() < half_w && (ay - by).abs() < half_h
}

/// Outcome of one player-vs-hazard pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContactReport {
    /// Scans (asteroids, enemies, bosses) that found an overlapping hazard.
    pub contacts: u32,
    /// Lives actually removed; at most one, since a hit starts invulnerability.
    pub lives_lost: u32,
}

/// Body contact between the player and every hazard list.
///
/// Skipped entirely while the player is invulnerable. Each list stops at its
/// first overlap, and the three scans run independently, so one tick can
/// register up to three contacts. Only the first of them costs a life because
/// `Player::hit` starts the invulnerability window. Hazards are not damaged
/// by contact.
pub fn handle_collisions(
    player: &mut Player,
    asteroids: &[Asteroid],
    enemies: &[Enemy],
    bosses: &[Boss],
    margin: f64,
) -> ContactReport {
    let mut report = ContactReport::default();
    if player.is_invulnerable() {
        return report;
    }

    if asteroids.iter().any(|a| check_collision(&*player, a, margin)) {
        register(player, "asteroid", &mut report);
    }
    if enemies.iter().any(|e| check_collision(&*player, e, margin)) {
        register(player, "enemy", &mut report);
    }
    if bosses.iter().any(|b| check_collision(&*player, b, margin)) {
        register(player, "boss", &mut report);
    }

    report
}

fn register(player: &mut Player, source: &str, report: &mut ContactReport) {
    report.contacts += 1;
    if player.hit() {
        report.lives_lost += 1;
        debug!("Contact with {} cost a life", source);
    }
}
