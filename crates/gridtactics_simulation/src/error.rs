//! Ошибки симуляции
//!
//! Runtime-ошибки тика (unreachable, out of range, invalid state) никогда не
//! поднимаются из систем: создаются, логируются и поглощаются на месте.
//! Наверх через `Result` уходит только загрузка конфига.

use bevy::prelude::IVec2;
use thiserror::Error;

pub type Result<T, E = TacticsError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TacticsError {
    /// Pathfinder вернул пустой маршрут
    #[error("destination {to} unreachable from {from}")]
    UnreachableDestination { from: IVec2, to: IVec2 },

    /// Клик дальше movement cap (не исключение, просто игнор)
    #[error("click at distance {distance:.1}px ignored, max {max:.1}px")]
    OutOfRangeClick { distance: f32, max: f32 },

    /// Операция над юнитом в терминальном состоянии
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    /// Маршрут от pathfinder нарушает grid-инварианты
    #[error("invalid route: {reason}")]
    InvalidRoute { reason: String },

    #[error("config parse failed: {0}")]
    Config(#[from] toml::de::Error),

    /// Конфиг распарсился, но значение недопустимо
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
}

impl TacticsError {
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    pub fn invalid_route(reason: impl Into<String>) -> Self {
        Self::InvalidRoute {
            reason: reason.into(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Поглотить ошибку тика: залогировать с уровнем по тяжести
    pub fn absorb(&self) {
        match self {
            Self::OutOfRangeClick { .. } => crate::logger::log(&self.to_string()),
            Self::Config(_) | Self::InvalidConfig { .. } => {
                crate::logger::log_error(&self.to_string())
            }
            _ => crate::logger::log_warning(&self.to_string()),
        }
    }
}
