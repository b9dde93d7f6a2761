//! Headless детектор пересечений юнитов
//!
//! Каждый юнит: квадрат tile_size × tile_size от своей позиции.
//! Касание краями не считается (строгое неравенство).

use bevy::prelude::*;

use crate::combat::UnitCollision;
use crate::components::{Defeated, GridMover, Unit};
use crate::config::TacticsConfig;

pub fn tiles_overlap(a: Vec2, b: Vec2, tile_size: f32) -> bool {
    (a.x - b.x).abs() < tile_size && (a.y - b.y).abs() < tile_size
}

pub fn detect_unit_overlaps(
    config: Res<TacticsConfig>,
    units: Query<(Entity, &GridMover), (With<Unit>, Without<Defeated>)>,
    mut collisions: EventWriter<UnitCollision>,
) {
    let mut snapshot: Vec<(Entity, Vec2)> = units
        .iter()
        .map(|(entity, mover)| (entity, mover.position))
        .collect();
    snapshot.sort_by_key(|(entity, _)| entity.index());

    for (i, (first, a)) in snapshot.iter().enumerate() {
        for (second, b) in snapshot.iter().skip(i + 1) {
            if tiles_overlap(*a, *b, config.tile_size) {
                collisions.write(UnitCollision {
                    first: *first,
                    second: *second,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_tiles_do_not_overlap() {
        assert!(!tiles_overlap(Vec2::new(64.0, 64.0), Vec2::new(96.0, 64.0), 32.0));
        assert!(!tiles_overlap(Vec2::new(64.0, 64.0), Vec2::new(96.0, 96.0), 32.0));
    }

    #[test]
    fn test_step_into_neighbour_overlaps() {
        assert!(tiles_overlap(Vec2::new(66.1, 64.0), Vec2::new(96.0, 64.0), 32.0));
        assert!(tiles_overlap(Vec2::new(96.0, 64.0), Vec2::new(96.0, 64.0), 32.0));
    }
}
