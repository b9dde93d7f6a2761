//! Movement components: GridMover (позиция + шаг к цели), MovementBudget, Facing

use bevy::prelude::*;

use crate::grid::{snap_to_grid, Direction};

/// Непрерывная позиция юнита + текущая цель шага
///
/// Движение только по одной оси за раз (сначала X, потом Y).
/// `previous`: позиция на прошлом тике, по ней детектим пересечение waypoint.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct GridMover {
    pub position: Vec2,
    pub previous: Vec2,
    pub velocity: Vec2,
    pub target: Option<Vec2>,
    pub direction: Option<Direction>,
    /// Скорость, с которой идём к текущей цели
    pub speed: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
}

impl Default for GridMover {
    fn default() -> Self {
        Self::at(Vec2::ZERO, 128.0, 256.0)
    }
}

impl GridMover {
    pub fn at(position: Vec2, walk_speed: f32, run_speed: f32) -> Self {
        Self {
            position,
            previous: position,
            velocity: Vec2::ZERO,
            target: None,
            direction: None,
            speed: walk_speed,
            walk_speed,
            run_speed,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.target.is_some()
    }

    /// Начать шаг к `target` (Manhattan: ось X приоритетнее)
    pub fn set_target(&mut self, target: Vec2, speed: f32) {
        self.target = Some(target);
        self.speed = speed;
        self.direction = axis_direction(target - self.position);
    }

    /// Один тик интеграции: previous ← position, position += velocity * dt
    pub fn advance(&mut self, delta: f32) {
        self.previous = self.position;

        let Some(target) = self.target else {
            self.velocity = Vec2::ZERO;
            return;
        };

        let offset = target - self.position;
        self.velocity = match axis_direction(offset) {
            Some(direction) => direction.offset().as_vec2() * self.speed,
            None => Vec2::ZERO,
        };
        self.position += self.velocity * delta;
    }

    /// Цель достигнута на этом тике (стоим ровно на ней или перелетели)
    pub fn reached_target(&self) -> bool {
        match self.target {
            Some(target) => {
                self.position == target
                    || crate::grid::has_crossed(self.position, self.previous, target)
            }
            None => false,
        }
    }

    /// Встать ровно в точку сетки и сбросить шаг
    pub fn arrive_at(&mut self, point: Vec2) {
        self.position = point;
        self.velocity = Vec2::ZERO;
        self.target = None;
    }

    /// Дошагать текущий шаг мгновенно (при смене режима exploration → battle)
    pub fn settle(&mut self) {
        if let Some(target) = self.target {
            self.arrive_at(target);
        }
        self.direction = None;
    }

    /// Остановка без цели (конец хода)
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
        self.target = None;
        self.direction = None;
    }

    /// Остановка после столкновения: откат в ближайшую точку сетки
    pub fn arrest(&mut self, tile_size: f32) {
        self.position = snap_to_grid(self.position, tile_size);
        self.previous = self.position;
        self.stop();
    }
}

fn axis_direction(offset: Vec2) -> Option<Direction> {
    if offset.x > 0.0 {
        Some(Direction::Right)
    } else if offset.x < 0.0 {
        Some(Direction::Left)
    } else if offset.y > 0.0 {
        Some(Direction::Down)
    } else if offset.y < 0.0 {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Сколько тайлов юнит может пройти за ход
///
/// Инвариант: 0 ≤ consumed ≤ cap. Сброс только в начале нового хода.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct MovementBudget {
    pub cap: u32,
    pub consumed: u32,
}

impl Default for MovementBudget {
    fn default() -> Self {
        Self::new(4)
    }
}

impl MovementBudget {
    pub fn new(cap: u32) -> Self {
        Self { cap, consumed: 0 }
    }

    pub fn remaining(&self) -> u32 {
        self.cap.saturating_sub(self.consumed)
    }

    /// Списать один тайл (clamp на cap)
    pub fn consume_one(&mut self) {
        self.consumed = (self.consumed + 1).min(self.cap);
    }

    /// Игрок завершил движение досрочно
    pub fn exhaust(&mut self) {
        self.consumed = self.cap;
    }

    pub fn is_exhausted(&self) -> bool {
        self.consumed >= self.cap
    }

    pub fn reset(&mut self) {
        self.consumed = 0;
    }

    /// Полный cap в пикселях (минус epsilon, чтобы граница не совпадала с тайлом)
    pub fn cap_pixels(&self, tile_size: f32, epsilon: f32) -> f32 {
        self.cap as f32 * tile_size - epsilon
    }
}

/// Куда смотрит юнит (ключ анимации для рендера)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum Facing {
    #[default]
    Idle,
    Up,
    Down,
    Left,
    Right,
}

impl From<Direction> for Facing {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Facing::Up,
            Direction::Down => Facing::Down,
            Direction::Left => Facing::Left,
            Direction::Right => Facing::Right,
        }
    }
}

impl From<Option<Direction>> for Facing {
    fn from(direction: Option<Direction>) -> Self {
        direction.map(Facing::from).unwrap_or(Facing::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_mover_walks_one_axis_at_a_time() {
        let mut mover = GridMover::at(Vec2::ZERO, 128.0, 256.0);
        mover.set_target(Vec2::new(32.0, 32.0), 128.0);
        assert_eq!(mover.direction, Some(Direction::Right));

        mover.advance(DT);
        assert!(mover.position.x > 0.0);
        assert_eq!(mover.position.y, 0.0);
        assert_eq!(mover.previous, Vec2::ZERO);
    }

    #[test]
    fn test_mover_reaches_target_by_overshoot() {
        let mut mover = GridMover::at(Vec2::ZERO, 100.0, 200.0);
        mover.set_target(Vec2::new(32.0, 0.0), 100.0);

        let mut ticks = 0;
        while !mover.reached_target() {
            mover.advance(DT);
            ticks += 1;
            assert!(ticks < 100, "mover never reached target");
        }
        // 32px / (100/60 px за тик) ≈ 19.2 → перелёт на 20-м тике
        assert_eq!(ticks, 20);
        assert!(mover.position.x > 32.0);

        mover.arrive_at(Vec2::new(32.0, 0.0));
        assert_eq!(mover.position, Vec2::new(32.0, 0.0));
        assert!(!mover.is_moving());
    }

    #[test]
    fn test_mover_without_target_stays() {
        let mut mover = GridMover::at(Vec2::new(64.0, 0.0), 128.0, 256.0);
        mover.advance(DT);
        assert_eq!(mover.position, Vec2::new(64.0, 0.0));
        assert_eq!(mover.velocity, Vec2::ZERO);
        assert!(!mover.reached_target());
    }

    #[test]
    fn test_arrest_snaps_back() {
        let mut mover = GridMover::at(Vec2::new(64.0, 64.0), 128.0, 256.0);
        mover.set_target(Vec2::new(96.0, 64.0), 128.0);
        mover.advance(DT);
        mover.arrest(32.0);
        assert_eq!(mover.position, Vec2::new(64.0, 64.0));
        assert_eq!(mover.velocity, Vec2::ZERO);
        assert!(mover.target.is_none());
    }

    #[test]
    fn test_settle_finishes_step() {
        let mut mover = GridMover::at(Vec2::ZERO, 128.0, 256.0);
        mover.set_target(Vec2::new(0.0, 32.0), 128.0);
        mover.advance(DT);
        mover.settle();
        assert_eq!(mover.position, Vec2::new(0.0, 32.0));
        assert!(!mover.is_moving());
    }

    #[test]
    fn test_budget_consume_clamped() {
        let mut budget = MovementBudget::new(2);
        budget.consume_one();
        assert_eq!(budget.remaining(), 1);
        budget.consume_one();
        budget.consume_one();
        assert_eq!(budget.consumed, 2);
        assert!(budget.is_exhausted());

        budget.reset();
        assert_eq!(budget.remaining(), 2);
    }

    #[test]
    fn test_budget_exhaust_and_zero_cap() {
        let mut budget = MovementBudget::new(4);
        budget.exhaust();
        assert_eq!(budget.consumed, 4);

        let empty = MovementBudget::new(0);
        assert!(empty.is_exhausted());
        assert_eq!(empty.remaining(), 0);
    }

    #[test]
    fn test_cap_pixels() {
        let budget = MovementBudget::new(4);
        let pixels = budget.cap_pixels(32.0, 0.0001);
        assert!(pixels < 128.0);
        assert_eq!(pixels.round(), 128.0);
    }

    #[test]
    fn test_facing_from_direction() {
        assert_eq!(Facing::from(Direction::Left), Facing::Left);
        assert_eq!(Facing::from(None), Facing::Idle);
    }
}
