//! Turn events: для turn order authority и рендера

use bevy::prelude::*;

use crate::components::UnitId;

/// Юнит получил ход (ровно одно событие на назначение)
#[derive(Event, Debug, Clone)]
pub struct TurnStarted {
    pub entity: Entity,
    pub unit: UnitId,
    pub assignment: u64,
}

/// Ход юнита использован
///
/// Turn order authority слушает это событие, чтобы передать ход дальше.
#[derive(Event, Debug, Clone)]
pub struct TurnEnded {
    pub entity: Entity,
    pub unit: UnitId,
    pub reason: TurnEndReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEndReason {
    /// Потрачены все тайлы (или клик по своему тайлу)
    MovementExhausted,
    /// Атаковал при столкновении
    Attacked,
}
