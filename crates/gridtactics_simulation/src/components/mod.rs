//! ECS Components для юнитов тактической карты
//!
//! Организация по доменам:
//! - unit: идентичность и бой (Unit, Health, Attacker, Player/Defeated markers)
//! - stats: характеристики, модификаторы, статус-эффекты
//! - movement: позиция на сетке, бюджет движения, facing
//! - appearance: sprite sheet и анимационные клипы

pub mod appearance;
pub mod movement;
pub mod stats;
pub mod unit;

// Re-exports для удобного импорта
pub use appearance::*;
pub use movement::*;
pub use stats::*;
pub use unit::*;
