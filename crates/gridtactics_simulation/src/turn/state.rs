//! Per-unit turn FSM
//!
//! EXPLORATION (вне боя) → WAITING / AWAITING_INPUT → MOVING → DONE.
//! DONE терминальный до следующего назначения хода.

use std::collections::VecDeque;

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum TurnPhase {
    /// Вне боя: свободное движение по клавишам
    #[default]
    Exploration,
    /// В бою, не наш ход
    Waiting,
    /// Наш ход, destination пуст
    AwaitingInput,
    /// Наш ход, идём по маршруту
    Moving,
    /// Ход использован
    Done,
}

/// Состояние хода юнита
///
/// `origin`: точка начала хода (якорь range overlay), обновляется пока
/// ни одного тайла не потрачено и в момент завершения хода.
#[derive(Component, Debug, Clone, Default)]
pub struct TurnController {
    pub phase: TurnPhase,
    pub turn_used: bool,
    /// Секунды с начала хода (debounce input, задержка overlay)
    pub idle_timer: f32,
    pub origin: Vec2,
    pub destination: Option<Vec2>,
    /// Оставшиеся waypoints (grid-aligned, соседние)
    pub route: VecDeque<Vec2>,
    /// Тиков подряд без движения при живом destination
    pub stalled_ticks: u32,
    /// Визуальный маркер пути (владеет им юнит)
    pub marker: Option<Entity>,
    seen_assignment: Option<u64>,
}

impl TurnController {
    /// Новый юнит вне боя, стоящий в `position`
    pub fn at(position: Vec2) -> Self {
        Self {
            origin: position,
            ..Default::default()
        }
    }

    pub fn is_new_assignment(&self, assignment: u64) -> bool {
        self.seen_assignment != Some(assignment)
    }

    /// Ход назначен (ровно один раз на назначение)
    pub fn begin_turn(&mut self, position: Vec2, assignment: u64) -> Option<Entity> {
        let marker = self.clear_route();
        self.phase = TurnPhase::AwaitingInput;
        self.turn_used = false;
        self.idle_timer = 0.0;
        self.origin = position;
        self.seen_assignment = Some(assignment);
        marker
    }

    /// Ход у другого юнита
    pub fn hold(&mut self) {
        self.idle_timer = 0.0;
        self.phase = if self.turn_used {
            TurnPhase::Done
        } else {
            TurnPhase::Waiting
        };
    }

    /// Бой закончился
    pub fn enter_exploration(&mut self) -> Option<Entity> {
        let marker = self.clear_route();
        self.phase = TurnPhase::Exploration;
        self.turn_used = false;
        self.idle_timer = 0.0;
        self.seen_assignment = None;
        marker
    }

    pub fn debounce_elapsed(&self, window: f32) -> bool {
        self.idle_timer > window
    }

    /// Пустой маршрут (unreachable, ждём stale policy): юнит стоит, фаза не MOVING
    pub fn commit_route(&mut self, destination: Vec2, route: VecDeque<Vec2>) {
        self.phase = if route.is_empty() {
            TurnPhase::AwaitingInput
        } else {
            TurnPhase::Moving
        };
        self.destination = Some(destination);
        self.route = route;
        self.stalled_ticks = 0;
    }

    pub fn next_waypoint(&self) -> Option<Vec2> {
        self.route.front().copied()
    }

    /// Сбросить destination и маршрут; возвращает маркер для despawn
    pub fn clear_destination(&mut self) -> Option<Entity> {
        let marker = self.clear_route();
        if !self.turn_used && self.phase == TurnPhase::Moving {
            self.phase = TurnPhase::AwaitingInput;
        }
        marker
    }

    /// Ход завершён (бюджет исчерпан, атака, поражение)
    pub fn finish_turn(&mut self, position: Vec2) -> Option<Entity> {
        let marker = self.clear_route();
        self.origin = position;
        self.turn_used = true;
        self.phase = TurnPhase::Done;
        marker
    }

    fn clear_route(&mut self) -> Option<Entity> {
        self.destination = None;
        self.route.clear();
        self.stalled_ticks = 0;
        self.marker.take()
    }
}
