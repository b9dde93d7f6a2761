//! Combat module: столкновения юнитов и их последствия
//!
//! Ответственность:
//! - Детект пересечений (headless AABB; внешняя физика может писать UnitCollision сама)
//! - Остановка при любом столкновении
//! - Урон от turn holder враждебной фракции, конец его хода
//! - Удаление юнитов с HP == 0

use bevy::prelude::*;

pub mod collision;
pub mod events;
pub mod resolver;

pub use collision::{detect_unit_overlaps, tiles_overlap};
pub use events::{DamageDealt, UnitCollision, UnitDefeated};
pub use resolver::{despawn_defeated, resolve_collisions};

use crate::TacticsSet;

/// Combat Plugin
///
/// Порядок выполнения (TacticsSet::Collision):
/// 1. detect_unit_overlaps: позиции после движения этого тика
/// 2. resolve_collisions: остановка, урон, Defeated marker
/// 3. despawn_defeated: удаление entity
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<UnitCollision>()
            .add_event::<DamageDealt>()
            .add_event::<UnitDefeated>();

        app.add_systems(
            FixedUpdate,
            (detect_unit_overlaps, resolve_collisions, despawn_defeated)
                .chain()
                .in_set(TacticsSet::Collision),
        );
    }
}
