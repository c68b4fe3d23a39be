/// Score bookkeeping threaded through the simulation step.
///
/// Combo timing uses simulated time supplied by the caller, so two game
/// instances never share state and tests can place hits at exact instants.

use tracing::{debug, info};

/// Seconds within which a scoring hit continues the current combo.
pub const COMBO_WINDOW: f64 = 2.0;
/// Per-hit growth of the combo multiplier.
pub const COMBO_MULTIPLIER: f64 = 1.2;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreState {
    current: u32,
    high: u32,
    combo: u32,
    last_hit_time: Option<f64>,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the running score and combo; the high score survives.
    pub fn reset(&mut self) {
        self.current = 0;
        self.combo = 0;
        self.last_hit_time = None;
        info!("Score reset to 0");
    }

    /// Award `points` for a scoring hit at simulated time `now`, applying the
    /// combo multiplier when the previous hit landed inside the window.
    /// Returns the points actually added.
    pub fn add_points(&mut self, points: u32, now: f64) -> u32 {
        let in_window = self
            .last_hit_time
            .map(|last| now - last <= COMBO_WINDOW)
            .unwrap_or(false);

        let awarded = if in_window {
            self.combo += 1;
            let multiplier = f64::from(self.combo) * COMBO_MULTIPLIER;
            let boosted = (f64::from(points) * multiplier) as u32;
            debug!("Combo x{} applied, {} points become {}", self.combo, points, boosted);
            boosted
        } else {
            self.combo = 1;
            points
        };

        self.last_hit_time = Some(now);
        self.current = self.current.saturating_add(awarded);

        if self.current > self.high {
            self.high = self.current;
            info!("New high score: {}", self.high);
        }
        awarded
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn is_high_score(&self) -> bool {
        self.current > 0 && self.current >= self.high
    }
}
