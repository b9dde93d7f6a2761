//! Конфигурация симуляции (TOML, все поля с дефолтами)

use bevy::prelude::*;
use serde::Deserialize;

use crate::error::{Result, TacticsError};

/// Что делать с destination, до которого нет маршрута
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleDestinationPolicy {
    /// Сбросить запрос в том же тике, юнит стоит на месте
    Abandon,
    /// Держать destination, сбросить после N тиков без движения
    ClearAfterTicks(u32),
}

impl Default for StaleDestinationPolicy {
    fn default() -> Self {
        Self::Abandon
    }
}

/// Глобальные параметры тактического слоя
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TacticsConfig {
    /// Размер тайла (пиксели)
    pub tile_size: f32,
    /// Вычитается из movement cap в пикселях, чтобы граница тайла не совпадала точно
    pub movement_epsilon: f32,
    /// Окно после получения хода, в котором input игнорируется (секунды)
    pub debounce_window: f32,
    /// Задержка перед показом range overlay (секунды)
    pub range_display_delay: f32,
    /// Базовая скорость (пиксели/сек)
    pub walk_speed: f32,
    /// Скорость с зажатым run (пиксели/сек)
    pub run_speed: f32,
    /// Частота FixedUpdate
    pub tick_hz: f64,
    /// Сколько показывать HP bar после урона (секунды)
    pub hp_bar_duration: f32,
    pub stale_destination: StaleDestinationPolicy,
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            movement_epsilon: 0.0001,
            debounce_window: 0.1,
            range_display_delay: 0.2,
            walk_speed: 128.0,
            run_speed: 256.0,
            tick_hz: 60.0,
            hp_bar_duration: 1.0,
            stale_destination: StaleDestinationPolicy::Abandon,
        }
    }
}

impl TacticsConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Значения, на которых тик не может работать (деление на tile_size, 1/tick_hz)
    pub fn validate(&self) -> Result<()> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        let non_negative = |value: f32| value.is_finite() && value >= 0.0;

        if !positive(self.tile_size) {
            return Err(TacticsError::invalid_config(format!(
                "tile_size must be > 0, got {}",
                self.tile_size
            )));
        }
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            return Err(TacticsError::invalid_config(format!(
                "tick_hz must be > 0, got {}",
                self.tick_hz
            )));
        }
        if !(non_negative(self.movement_epsilon) && self.movement_epsilon < 1.0) {
            return Err(TacticsError::invalid_config(format!(
                "movement_epsilon must be in [0, 1), got {}",
                self.movement_epsilon
            )));
        }
        for (name, value) in [
            ("debounce_window", self.debounce_window),
            ("range_display_delay", self.range_display_delay),
            ("hp_bar_duration", self.hp_bar_duration),
        ] {
            if !non_negative(value) {
                return Err(TacticsError::invalid_config(format!(
                    "{} must be >= 0, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [("walk_speed", self.walk_speed), ("run_speed", self.run_speed)] {
            if !positive(value) {
                return Err(TacticsError::invalid_config(format!(
                    "{} must be > 0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Длительность одного fixed тика
    pub fn tick_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.tick_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TacticsConfig::default();
        assert_eq!(config.tile_size, 32.0);
        assert_eq!(config.debounce_window, 0.1);
        assert_eq!(config.walk_speed, 128.0);
        assert_eq!(config.run_speed, 256.0);
        assert_eq!(config.stale_destination, StaleDestinationPolicy::Abandon);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TacticsConfig::from_toml_str("tile_size = 16.0\nwalk_speed = 64.0\n")
            .expect("partial config should parse");
        assert_eq!(config.tile_size, 16.0);
        assert_eq!(config.walk_speed, 64.0);
        assert_eq!(config.run_speed, 256.0);
        assert_eq!(config.debounce_window, 0.1);
    }

    #[test]
    fn test_stale_policy_from_toml() {
        let config = TacticsConfig::from_toml_str("stale_destination = { clear_after_ticks = 30 }")
            .expect("policy table should parse");
        assert_eq!(config.stale_destination, StaleDestinationPolicy::ClearAfterTicks(30));

        let config = TacticsConfig::from_toml_str("stale_destination = \"abandon\"")
            .expect("policy string should parse");
        assert_eq!(config.stale_destination, StaleDestinationPolicy::Abandon);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = TacticsConfig::from_toml_str("tile_sise = 16.0");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let result = TacticsConfig::from_toml_str("tile_size = 0.0");
        assert!(matches!(result, Err(TacticsError::InvalidConfig { .. })));
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let result = TacticsConfig::from_toml_str("tick_hz = 0.0");
        assert!(matches!(result, Err(TacticsError::InvalidConfig { .. })));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        for source in [
            "movement_epsilon = 1.0",
            "movement_epsilon = -0.5",
            "debounce_window = -0.1",
            "hp_bar_duration = -1.0",
            "walk_speed = 0.0",
            "run_speed = -256.0",
            "tile_size = nan",
        ] {
            let result = TacticsConfig::from_toml_str(source);
            assert!(
                matches!(result, Err(TacticsError::InvalidConfig { .. })),
                "{} should be rejected",
                source
            );
        }
    }

    #[test]
    fn test_invalid_config_message_names_field() {
        let err = TacticsConfig::from_toml_str("range_display_delay = -2.0")
            .expect_err("negative delay");
        assert!(err.to_string().contains("range_display_delay"), "{}", err);
    }
}
