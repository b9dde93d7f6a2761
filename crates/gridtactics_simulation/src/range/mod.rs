//! Movement range: ромб (Manhattan ball радиуса cap) в тайловых смещениях
//!
//! Перечисление по четырём квадрантам без дублей:
//! - левая половина (dx ≤ 0): слой i = 0..=cap, граница (-(cap-i), ∓i), заливка внутри слоя;
//! - правая половина (dx > 0): слой i = 1..=cap, граница (cap+1-i, ∓(i-1)), заливка внутри.
//! Нижнее зеркало не добавляется там, где совпадает с верхним (dy = 0).
//! Собственный тайл в заливку не попадает, при cap > 0 добавляется отдельно как Origin.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    UpperLeft,
    LowerLeft,
    UpperRight,
    LowerRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeTileKind {
    /// Ровно cap шагов от origin
    Border,
    /// Строго внутри ромба
    Fill,
    /// Тайл самого юнита
    Origin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeTile {
    pub offset: IVec2,
    pub kind: RangeTileKind,
    /// None только у Origin
    pub quadrant: Option<Quadrant>,
}

impl RangeTile {
    fn new(dx: i32, dy: i32, kind: RangeTileKind, quadrant: Quadrant) -> Self {
        Self {
            offset: IVec2::new(dx, dy),
            kind,
            quadrant: Some(quadrant),
        }
    }
}

/// Все тайлы на Manhattan-дистанции ≤ cap, ровно 2·cap² + 2·cap + 1 штук
pub fn compute_reachable_offsets(cap: u32) -> Vec<RangeTile> {
    use Quadrant::*;
    use RangeTileKind::*;

    let cap = cap as i32;
    let mut tiles = Vec::with_capacity((2 * cap * cap + 2 * cap + 1) as usize);

    // Левая половина, включая вертикальную ось
    for i in 0..=cap {
        tiles.push(RangeTile::new(-(cap - i), -i, Border, UpperLeft));
        if i != 0 {
            tiles.push(RangeTile::new(-(cap - i), i, Border, LowerLeft));
        }

        for j in 1..=i {
            // (i=1, j=1): это origin
            if !(i == 1 && j == 1) {
                tiles.push(RangeTile::new(-(i - j), -(j - 1), Fill, UpperLeft));
            }
            if j != 1 {
                tiles.push(RangeTile::new(-(i - j), j - 1, Fill, LowerLeft));
            }
        }
    }

    // Правая половина
    for i in 1..=cap {
        tiles.push(RangeTile::new(cap + 1 - i, -(i - 1), Border, UpperRight));
        if i != 1 {
            tiles.push(RangeTile::new(cap + 1 - i, i - 1, Border, LowerRight));
        }

        for j in 1..i {
            tiles.push(RangeTile::new(i - j, -(j - 1), Fill, UpperRight));
            if j != 1 {
                tiles.push(RangeTile::new(i - j, j - 1, Fill, LowerRight));
            }
        }
    }

    if cap > 0 {
        tiles.push(RangeTile {
            offset: IVec2::ZERO,
            kind: Origin,
            quadrant: None,
        });
    }

    tiles
}

/// Ожидаемое количество тайлов для cap
pub fn reachable_count(cap: u32) -> usize {
    let cap = cap as usize;
    2 * cap * cap + 2 * cap + 1
}

// Tests (separate file with _tests suffix)
#[cfg(test)]
mod range_tests;
