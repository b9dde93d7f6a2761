//! Tile grid math: выравнивание, манхэттенская дистанция, направления
//!
//! Позиция юнита: левый верхний угол его тайла в пикселях (continuous).
//! В покое позиция всегда кратна tile_size.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Направление шага (четыре стороны)
///
/// Порядок `ALL` совпадает с приоритетом опроса клавиш: up, down, left, right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Смещение в тайлах (y растёт вниз, как на экране)
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// Выровнять точку по сетке вниз (тайл, в который попадает точка)
pub fn align_to_grid(point: Vec2, tile_size: f32) -> Vec2 {
    (point / tile_size).floor() * tile_size
}

/// Ближайшая точка сетки (для остановки юнита после коллизии)
pub fn snap_to_grid(point: Vec2, tile_size: f32) -> Vec2 {
    (point / tile_size).round() * tile_size
}

pub fn is_grid_aligned(point: Vec2, tile_size: f32) -> bool {
    snap_to_grid(point, tile_size) == point
}

/// Пиксели → координаты тайла
pub fn to_tile(point: Vec2, tile_size: f32) -> IVec2 {
    (point / tile_size).floor().as_ivec2()
}

/// Координаты тайла → пиксели (левый верхний угол)
pub fn tile_to_world(tile: IVec2, tile_size: f32) -> Vec2 {
    tile.as_vec2() * tile_size
}

/// Центр тайла, на котором стоит юнит
pub fn tile_center(position: Vec2, tile_size: f32) -> Vec2 {
    position + Vec2::splat(tile_size / 2.0)
}

pub fn manhattan(a: Vec2, b: Vec2) -> f32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

pub fn manhattan_tiles(a: IVec2, b: IVec2) -> u32 {
    (a.x - b.x).unsigned_abs() + (a.y - b.y).unsigned_abs()
}

/// Пересёк ли юнит destination за последний тик
///
/// Шаг движения фиксированный и почти никогда не попадает точно в координату
/// сетки, поэтому сравниваем previous → current по каждой оси: позиция
/// перешла через destination (или встала ровно на неё) с той стороны, где была.
pub fn has_crossed(current: Vec2, previous: Vec2, destination: Vec2) -> bool {
    crossed_axis(current.x, previous.x, destination.x)
        || crossed_axis(current.y, previous.y, destination.y)
}

fn crossed_axis(current: f32, previous: f32, destination: f32) -> bool {
    (current <= destination && previous > destination)
        || (current >= destination && previous < destination)
}
