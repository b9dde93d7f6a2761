//! Pathfinding capability
//!
//! Сам поиск: внешний collaborator за трейтом `PathFinder`. В crate есть
//! headless реализация `GridPathfinder` (BFS по тайлам).
//! Маршрут от любого pathfinder проверяется `plan_route` перед использованием.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::components::UnitId;
use crate::error::{Result, TacticsError};
use crate::grid::manhattan_tiles;

pub mod grid_search;
pub mod registry;

pub use grid_search::GridPathfinder;
pub use registry::{register_units, UnitRegistry};

/// Запрос маршрута (все координаты в тайлах)
#[derive(Debug, Clone, PartialEq)]
pub struct PathRequest {
    pub origin: IVec2,
    pub destination: IVec2,
    /// Занятые юнитами тайлы, которые нужно обойти
    pub avoid: Vec<IVec2>,
    /// Тайлы юнитов, сквозь которые можно идти
    pub ignore: Vec<IVec2>,
    /// Маркер на destination (помогает внешнему pathfinder)
    pub marker: Option<Entity>,
}

pub trait PathFinder: Send + Sync {
    /// Последовательность соседних тайлов от origin до destination.
    /// Пустой результат = unreachable. Origin в начале допустим.
    fn find_path(&self, request: &PathRequest) -> Vec<IVec2>;
}

/// Активный pathfinder (по умолчанию BFS)
#[derive(Resource)]
pub struct Pathfinder(Box<dyn PathFinder>);

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(GridPathfinder::default())
    }
}

impl Pathfinder {
    pub fn new(finder: impl PathFinder + 'static) -> Self {
        Self(Box::new(finder))
    }

    pub fn find_path(&self, request: &PathRequest) -> Vec<IVec2> {
        self.0.find_path(request)
    }
}

/// Кого обходить и сквозь кого идти (по стабильным ID)
#[derive(Component, Debug, Clone, Default)]
pub struct PathingFilters {
    pub avoid: HashSet<UnitId>,
    pub ignore: HashSet<UnitId>,
}

impl PathingFilters {
    pub fn avoiding(ids: impl IntoIterator<Item = UnitId>) -> Self {
        Self {
            avoid: ids.into_iter().collect(),
            ignore: HashSet::new(),
        }
    }
}

/// Маркер пути на destination тайле (живёт пока жив маршрут)
#[derive(Component, Debug, Clone, Copy)]
pub struct PathMarker {
    pub owner: Entity,
    pub tile: IVec2,
}

/// Маркер пути больше не нужен (маршрут пройден, сброшен или юнит остановлен)
pub fn despawn_marker(commands: &mut Commands, marker: Option<Entity>) {
    let Some(marker) = marker else {
        return;
    };
    if let Ok(mut entity) = commands.get_entity(marker) {
        entity.despawn();
    }
}

/// Pathfinder + реестр юнитов
pub struct PathfindingPlugin;

impl Plugin for PathfindingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Pathfinder>()
            .init_resource::<UnitRegistry>()
            .add_systems(
                FixedUpdate,
                register_units.in_set(crate::TacticsSet::Assignment),
            );
    }
}

/// Проверить маршрут и обрезать по оставшемуся бюджету
///
/// Возвращает waypoints без origin. Каждый следующий тайл: сосед предыдущего.
pub fn plan_route(
    origin: IVec2,
    destination: IVec2,
    mut path: Vec<IVec2>,
    remaining: u32,
) -> Result<Vec<IVec2>> {
    if path.first() == Some(&origin) {
        path.remove(0);
    }

    if path.is_empty() {
        return Err(TacticsError::UnreachableDestination {
            from: origin,
            to: destination,
        });
    }

    let mut previous = origin;
    for (index, tile) in path.iter().enumerate() {
        if manhattan_tiles(previous, *tile) != 1 {
            return Err(TacticsError::invalid_route(format!(
                "waypoint #{} {} is not adjacent to {}",
                index, tile, previous
            )));
        }
        previous = *tile;
    }

    path.truncate(remaining as usize);
    if path.is_empty() {
        return Err(TacticsError::invalid_state("no movement points left"));
    }

    Ok(path)
}
