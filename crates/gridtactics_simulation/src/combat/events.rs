//! Combat events

use bevy::prelude::*;

use crate::components::UnitId;

/// Два юнита пересеклись (одно событие на пару)
///
/// Генерируется detect_unit_overlaps или внешней физикой.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitCollision {
    pub first: Entity,
    pub second: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub remaining: u32,
}

/// HP юнита дошло до 0, entity удаляется в этом же тике
#[derive(Event, Debug, Clone)]
pub struct UnitDefeated {
    pub entity: Entity,
    pub unit: UnitId,
    pub killer: Entity,
}
