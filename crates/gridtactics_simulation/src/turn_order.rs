//! Round-robin turn order (headless authority)
//!
//! Единственный writer TurnContext в бою: передаёт ход следующему, когда
//! holder закончил, убирает побеждённых, завершает бой когда осталась одна фракция.
//! Юнитов без Player пропускает (их ходы: дело внешнего AI).
//! Хост может заменить плагин своим authority.

use bevy::prelude::*;

use crate::combat::UnitDefeated;
use crate::components::{Defeated, Player, Unit};
use crate::turn::{TurnContext, TurnEnded};
use crate::TacticsSet;

pub struct RoundRobinTurnOrderPlugin;

impl Plugin for RoundRobinTurnOrderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            advance_round_robin.in_set(TacticsSet::TurnOrder),
        );
    }
}

pub fn advance_round_robin(
    mut ctx: ResMut<TurnContext>,
    mut ended: EventReader<TurnEnded>,
    mut defeated: EventReader<UnitDefeated>,
    units: Query<(&Unit, Has<Player>), Without<Defeated>>,
) {
    if !ctx.is_battle_active() {
        ended.clear();
        defeated.clear();
        return;
    }

    for event in defeated.read() {
        ctx.remove(event.entity);
    }

    let missing: Vec<Entity> = ctx
        .order()
        .iter()
        .copied()
        .filter(|entity| units.get(*entity).is_err())
        .collect();
    for entity in missing {
        ctx.remove(entity);
    }

    let factions: Vec<_> = ctx
        .order()
        .iter()
        .filter_map(|entity| units.get(*entity).ok())
        .map(|(unit, _)| unit.faction)
        .collect();
    if factions.windows(2).all(|pair| pair[0] == pair[1]) {
        crate::logger::log_info(&format!(
            "Battle over: {} unit(s) left, winner {:?}",
            factions.len(),
            factions.first()
        ));
        ctx.end_battle();
        ended.clear();
        return;
    }

    let holder = ctx.turn_holder();
    let holder_finished = ended
        .read()
        .filter(|event| Some(event.entity) == holder)
        .count()
        > 0;

    let is_player = |entity: Entity| units.get(entity).is_ok_and(|(_, player)| player);
    let mut needs_advance = holder_finished || !holder.is_some_and(is_player);
    let mut attempts = ctx.order().len();
    while needs_advance && attempts > 0 {
        attempts -= 1;
        needs_advance = !ctx.advance().is_some_and(is_player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Faction, UnitId};
    use crate::turn::TurnEndReason;
    use bevy::ecs::system::RunSystemOnce;

    fn spawn_unit(world: &mut World, id: u32, faction: Faction) -> Entity {
        world
            .spawn((
                Unit {
                    id: UnitId(id),
                    name: format!("unit{}", id),
                    faction,
                },
                Player,
            ))
            .id()
    }

    fn setup() -> (World, Vec<Entity>) {
        let mut world = World::new();
        world.init_resource::<TurnContext>();
        world.init_resource::<Events<TurnEnded>>();
        world.init_resource::<Events<UnitDefeated>>();
        let units = vec![
            spawn_unit(&mut world, 1, Faction::Party),
            spawn_unit(&mut world, 2, Faction::Enemy),
            spawn_unit(&mut world, 3, Faction::Enemy),
        ];
        world
            .resource_mut::<TurnContext>()
            .start_battle(units.clone());
        (world, units)
    }

    #[test]
    fn test_advances_when_holder_ends_turn() {
        let (mut world, units) = setup();
        world.send_event(TurnEnded {
            entity: units[0],
            unit: UnitId(1),
            reason: TurnEndReason::MovementExhausted,
        });

        world.run_system_once(advance_round_robin).expect("system runs");
        assert_eq!(world.resource::<TurnContext>().turn_holder(), Some(units[1]));
    }

    #[test]
    fn test_ignores_turn_end_of_non_holder() {
        let (mut world, units) = setup();
        world.send_event(TurnEnded {
            entity: units[2],
            unit: UnitId(3),
            reason: TurnEndReason::Attacked,
        });

        world.run_system_once(advance_round_robin).expect("system runs");
        assert_eq!(world.resource::<TurnContext>().turn_holder(), Some(units[0]));
    }

    #[test]
    fn test_battle_ends_with_one_faction_left() {
        let (mut world, units) = setup();
        world.despawn(units[1]);
        world.despawn(units[2]);

        world.run_system_once(advance_round_robin).expect("system runs");
        let ctx = world.resource::<TurnContext>();
        assert!(!ctx.is_battle_active());
        assert!(ctx.turn_holder().is_none());
    }

    #[test]
    fn test_skips_units_without_player_marker() {
        let (mut world, units) = setup();
        world.entity_mut(units[1]).remove::<Player>();
        world.send_event(TurnEnded {
            entity: units[0],
            unit: UnitId(1),
            reason: TurnEndReason::MovementExhausted,
        });

        world.run_system_once(advance_round_robin).expect("system runs");
        assert_eq!(world.resource::<TurnContext>().turn_holder(), Some(units[2]));
    }
}
