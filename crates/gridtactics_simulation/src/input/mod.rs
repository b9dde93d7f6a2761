//! Input snapshot для тактического слоя
//!
//! Хост (или scripted driver) пишет InputState до FixedUpdate,
//! симуляция только читает. Клик: edge-событие, гасится в Cleanup.

use bevy::prelude::*;

use crate::grid::Direction;

pub mod scripted;

pub use scripted::RandomInputPlugin;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    /// Мировые координаты курсора (пиксели)
    pub position: Vec2,
    /// Кнопка нажата на этом тике
    pub just_clicked: bool,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Модификатор бега (только exploration)
    pub run: bool,
    pub pointer: Pointer,
}

impl InputState {
    /// Зажатое направление в порядке приоритета up, down, left, right
    pub fn held_direction(&self) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.is_held(*direction))
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn set_held(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    pub fn release_all(&mut self) {
        self.up = false;
        self.down = false;
        self.left = false;
        self.right = false;
        self.run = false;
    }

    pub fn click(&mut self, position: Vec2) {
        self.pointer = Pointer {
            position,
            just_clicked: true,
        };
    }

    /// Клик на этом тике
    pub fn clicked_at(&self) -> Option<Vec2> {
        self.pointer
            .just_clicked
            .then_some(self.pointer.position)
    }
}

/// Клик обработан всеми системами тика
pub fn consume_pointer_click(mut input: ResMut<InputState>) {
    if input.pointer.just_clicked {
        input.pointer.just_clicked = false;
    }
}
