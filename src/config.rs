use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

/// Game configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Playfield width in world units
    pub width: f64,
    /// Playfield height in world units
    pub height: f64,
    /// Target ticks per second for the driver loop
    pub tick_rate: u32,
    /// Seconds between spawn-director firings
    pub spawn_interval: f64,
    /// Score at which a boss becomes eligible
    pub boss_score_threshold: u32,
    /// Score at which an extra enemy joins every spawn wave
    pub extra_enemy_score: u32,
    /// Multiplier applied to bounding boxes before overlap tests
    pub collision_margin: f64,
    /// Where the binary writes its log (the terminal belongs to the renderer)
    pub log_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            tick_rate: 60,
            spawn_interval: 3.0,
            boss_score_threshold: 10,
            extra_enemy_score: 20,
            collision_margin: 0.9,
            log_path: PathBuf::from("astro_shooter.log"),
        }
    }
}

impl GameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        override_from_env("ASTRO_WIDTH", &mut config.width);
        override_from_env("ASTRO_HEIGHT", &mut config.height);
        override_from_env("ASTRO_TICK_RATE", &mut config.tick_rate);
        override_from_env("ASTRO_SPAWN_INTERVAL", &mut config.spawn_interval);
        override_from_env("ASTRO_BOSS_SCORE", &mut config.boss_score_threshold);
        override_from_env("ASTRO_EXTRA_ENEMY_SCORE", &mut config.extra_enemy_score);
        override_from_env("ASTRO_COLLISION_MARGIN", &mut config.collision_margin);

        if let Ok(path) = std::env::var("ASTRO_LOG_FILE") {
            config.log_path = PathBuf::from(path);
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(out_of_range("width", "a positive number", self.width));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(out_of_range("height", "a positive number", self.height));
        }
        if self.tick_rate == 0 {
            return Err(out_of_range("tick_rate", "at least 1", self.tick_rate));
        }
        if !(self.spawn_interval.is_finite() && self.spawn_interval > 0.0) {
            return Err(out_of_range(
                "spawn_interval",
                "a positive number",
                self.spawn_interval,
            ));
        }
        if !(self.collision_margin > 0.0 && self.collision_margin <= 2.0) {
            return Err(out_of_range(
                "collision_margin",
                "in (0, 2]",
                self.collision_margin,
            ));
        }
        if self.extra_enemy_score < self.boss_score_threshold {
            return Err(out_of_range(
                "extra_enemy_score",
                "at least boss_score_threshold",
                self.extra_enemy_score,
            ));
        }
        Ok(())
    }

    /// Nominal simulated time per tick.
    pub fn tick_delta(&self) -> f64 {
        1.0 / f64::from(self.tick_rate.max(1))
    }
}

fn override_from_env<T: FromStr>(key: &str, slot: &mut T) {
    if let Ok(raw) = std::env::var(key) {
        match raw.trim().parse() {
            Ok(parsed) => *slot = parsed,
            Err(_) => tracing::warn!("Invalid {} '{}', using default", key, raw),
        }
    }
}

fn out_of_range(
    field: &'static str,
    requirement: &'static str,
    value: impl ToString,
) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        requirement,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.width, 800.0);
        assert_eq!(config.height, 600.0);
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.boss_score_threshold, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tick_delta() {
        let config = GameConfig::default();
        assert!((config.tick_delta() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_zero_tick_rate() {
        let config = GameConfig {
            tick_rate: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "tick_rate", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_margin() {
        let config = GameConfig {
            collision_margin: 0.0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let config = GameConfig {
            boss_score_threshold: 30,
            extra_enemy_score: 20,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
