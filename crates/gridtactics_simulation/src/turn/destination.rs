//! Destination resolver: input → намерение (шаг, маршрут по клику, конец движения)
//!
//! Чистая функция. Спавн маркера и запрос маршрута делает turn system.

use bevy::prelude::*;

use crate::grid::{align_to_grid, manhattan, tile_center, Direction};
use crate::input::InputState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DestinationIntent {
    /// Ничего не нажато
    Idle,
    /// Клавиша направления: соседний тайл
    Step { direction: Direction, destination: Vec2 },
    /// Клик в пределах cap: нужен маршрут
    Travel { destination: Vec2 },
    /// Клик по своему тайлу: движение на этот ход закончено
    EndMovement,
    /// Клик выровнялся в текущую позицию
    Clear,
    /// Клик дальше cap
    OutOfRange { distance: f32, max: f32 },
}

impl DestinationIntent {
    /// Grid-aligned destination, если намерение его задаёт
    pub fn destination(&self) -> Option<Vec2> {
        match self {
            Self::Step { destination, .. } | Self::Travel { destination } => Some(*destination),
            _ => None,
        }
    }
}

/// Разобрать input юнита, стоящего в `position`
///
/// Клавиши проверяются первыми (up, down, left, right), клик только если
/// ни одна не зажата. Дистанция клика считается от центра тайла юнита.
pub fn resolve_destination(
    position: Vec2,
    input: &InputState,
    cap_pixels: f32,
    tile_size: f32,
) -> DestinationIntent {
    if let Some(direction) = input.held_direction() {
        return DestinationIntent::Step {
            direction,
            destination: position + direction.offset().as_vec2() * tile_size,
        };
    }

    let Some(click) = input.clicked_at() else {
        return DestinationIntent::Idle;
    };

    let distance = manhattan(tile_center(position, tile_size), click);
    let max = cap_pixels.round();

    if distance <= tile_size / 2.0 {
        return DestinationIntent::EndMovement;
    }

    if distance > max {
        return DestinationIntent::OutOfRange { distance, max };
    }

    let aligned = align_to_grid(click, tile_size);
    if aligned == position {
        DestinationIntent::Clear
    } else {
        DestinationIntent::Travel {
            destination: aligned,
        }
    }
}
