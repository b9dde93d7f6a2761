//! Базовые компоненты юнита: Unit, Health, Attacker, маркеры

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Стабильный ID юнита (не Entity: переживает respawn, используется в avoid/ignore)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize,
)]
pub struct UnitId(pub u32);

/// Фракция (тег стороны конфликта)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Party,
    Enemy,
}

impl Faction {
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }

    pub fn tag(self) -> &'static str {
        match self {
            Faction::Party => "party",
            Faction::Enemy => "enemy",
        }
    }
}

/// Юнит на тактической карте
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub faction: Faction,
}

/// Здоровье юнита
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Возвращает реально снятое количество (clamp на 0)
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before - self.current
    }

    /// Для HP bar рендера (0.0..=1.0)
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

/// Сколько секунд прошло с последнего урона (для HP bar)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HealthBar {
    pub since_damage: f32,
}

impl Default for HealthBar {
    fn default() -> Self {
        Self {
            since_damage: f32::INFINITY,
        }
    }
}

impl HealthBar {
    pub fn restart(&mut self) {
        self.since_damage = 0.0;
    }

    pub fn tick(&mut self, delta: f32) {
        self.since_damage += delta;
    }

    pub fn is_visible(&self, health: &Health, duration: f32) -> bool {
        health.current < health.max && self.since_damage < duration
    }
}

/// Урон при столкновении (пока фиксированный, без формулы от статов)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    pub damage: u32,
}

impl Default for Attacker {
    fn default() -> Self {
        Self { damage: 2 }
    }
}

/// Marker: юнит управляется игроком (читает InputState)
///
/// Юниты без маркера получают destination от внешнего AI.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Marker: HP == 0, юнит будет удалён в конце Collision фазы
#[derive(Component, Debug)]
pub struct Defeated;
