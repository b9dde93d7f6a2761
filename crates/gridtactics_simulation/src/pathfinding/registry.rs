//! UnitId → Entity реестр
//!
//! avoid/ignore хранятся как стабильные UnitId, в тайлы резолвятся
//! только в момент запроса маршрута.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use crate::components::{Unit, UnitId};

#[derive(Resource, Debug, Default)]
pub struct UnitRegistry {
    entities: HashMap<UnitId, Entity>,
}

impl UnitRegistry {
    pub fn register(&mut self, id: UnitId, entity: Entity) {
        if let Some(previous) = self.entities.insert(id, entity) {
            if previous != entity {
                crate::logger::log_warning(&format!(
                    "UnitId {:?} re-registered: {:?} → {:?}",
                    id, previous, entity
                ));
            }
        }
    }

    pub fn unregister(&mut self, id: UnitId) {
        self.entities.remove(&id);
    }

    pub fn get(&self, id: UnitId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// ID → тайлы живых юнитов (неизвестные ID пропускаются)
    pub fn resolve_tiles(
        &self,
        ids: &HashSet<UnitId>,
        tiles: &HashMap<Entity, IVec2>,
    ) -> Vec<IVec2> {
        let mut resolved: Vec<IVec2> = ids
            .iter()
            .filter_map(|id| self.get(*id))
            .filter_map(|entity| tiles.get(&entity).copied())
            .collect();
        resolved.sort_by_key(|tile| (tile.x, tile.y));
        resolved
    }
}

/// Регистрируем новых юнитов
pub fn register_units(
    mut registry: ResMut<UnitRegistry>,
    added: Query<(Entity, &Unit), Added<Unit>>,
) {
    for (entity, unit) in added.iter() {
        registry.register(unit.id, entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn test_resolve_skips_unknown_and_dead() {
        let mut registry = UnitRegistry::default();
        let alive = Entity::from_raw(1);
        let despawned = Entity::from_raw(2);
        registry.register(UnitId(10), alive);
        registry.register(UnitId(20), despawned);

        let tiles = HashMap::from([(alive, IVec2::new(3, 4))]);
        let ids = HashSet::from([UnitId(10), UnitId(20), UnitId(30)]);

        assert_eq!(registry.resolve_tiles(&ids, &tiles), vec![IVec2::new(3, 4)]);
    }

    #[test]
    fn test_unregister() {
        let mut registry = UnitRegistry::default();
        registry.register(UnitId(1), Entity::from_raw(5));
        assert_eq!(registry.len(), 1);
        registry.unregister(UnitId(1));
        assert!(registry.get(UnitId(1)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_units_system() {
        let mut world = World::new();
        world.init_resource::<UnitRegistry>();
        let entity = world
            .spawn(Unit {
                id: UnitId(7),
                name: "grunt".to_string(),
                faction: crate::components::Faction::Enemy,
            })
            .id();

        world.run_system_once(register_units).expect("system runs");
        assert_eq!(world.resource::<UnitRegistry>().get(UnitId(7)), Some(entity));
    }
}
