//! TurnActor: общий контракт юнита в бою (остановка, урон, смерть)
//!
//! Вместо иерархии типов юнитов: один QueryData над компонентами,
//! архетипы отличаются только данными (см. archetype.rs).

use bevy::ecs::query::QueryData;
use bevy::prelude::*;

use crate::components::{Attacker, GridMover, Health, HealthBar, MovementBudget, Unit};
use crate::error::TacticsError;
use crate::turn::TurnController;

#[derive(QueryData)]
#[query_data(mutable)]
pub struct TurnActor {
    pub entity: Entity,
    pub unit: &'static Unit,
    pub mover: &'static mut GridMover,
    pub budget: &'static mut MovementBudget,
    pub turn: &'static mut TurnController,
    pub health: &'static mut Health,
    pub bar: Option<&'static mut HealthBar>,
    pub attacker: Option<&'static Attacker>,
}

/// Результат входящего урона
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Юнит уже без HP: урон не применяется
    Ignored,
    Damaged { dealt: u32, remaining: u32 },
    Defeated { dealt: u32 },
}

impl TurnActorItem<'_> {
    /// Столкновение: откат в сетку, сброс скорости и destination.
    /// Возвращает маркер пути для despawn.
    pub fn halt(&mut self, tile_size: f32) -> Option<Entity> {
        self.mover.arrest(tile_size);
        self.turn.clear_destination()
    }

    /// Ход использован (атака или бюджет)
    pub fn end_turn(&mut self) -> Option<Entity> {
        self.mover.stop();
        let position = self.mover.position;
        self.turn.finish_turn(position)
    }

    pub fn damage(&self) -> u32 {
        self.attacker.map(|attacker| attacker.damage).unwrap_or(0)
    }

    pub fn receive_damage(&mut self, amount: u32) -> HitOutcome {
        if !self.health.is_alive() {
            TacticsError::invalid_state(format!(
                "{} received damage with no health left",
                self.unit.name
            ))
            .absorb();
            return HitOutcome::Ignored;
        }

        let dealt = self.health.take_damage(amount);
        if let Some(bar) = self.bar.as_mut() {
            bar.restart();
        }

        if self.health.is_alive() {
            HitOutcome::Damaged {
                dealt,
                remaining: self.health.current,
            }
        } else {
            HitOutcome::Defeated { dealt }
        }
    }

    /// HP == 0: ход помечается использованным, чтобы удалённый юнит
    /// никогда не оказался посреди хода
    pub fn kill(&mut self) -> Option<Entity> {
        self.budget.exhaust();
        self.end_turn()
    }
}
