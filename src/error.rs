use thiserror::Error;

use crate::entities::EntityKind;

/// Failures raised inside the simulation core.
///
/// None of these reach the player: construction errors indicate a bug in the
/// spawn logic, and the rest are caught at the entity boundary and logged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid asteroid size code {0} (expected 1 or 2)")]
    InvalidAsteroidSize(u8),

    #[error("invalid enemy size code {0} (expected 1 or 2)")]
    InvalidEnemySize(u8),

    #[error("invalid boss size code {0} (expected 1)")]
    InvalidBossSize(u8),

    #[error("{kind:?} body left the finite plane")]
    NonFiniteBody { kind: EntityKind },

    #[error("{kind:?} has degenerate bounds")]
    DegenerateBounds { kind: EntityKind },
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be {requirement}, got {value}")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: String,
    },
}
