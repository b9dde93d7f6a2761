//! Combat resolver: столкновение → остановка → (атака, если holder) → поражение
//!
//! Любое столкновение останавливает обоих: откат в сетку, velocity = 0, destination = None.
//! Урон только если сторона: turn holder с неиспользованным ходом и фракции враждебны.
//! Атакующий всегда заканчивает ход, даже если цель уже без HP.

use bevy::prelude::*;

use crate::combat::{DamageDealt, UnitCollision, UnitDefeated};
use crate::components::{Defeated, Unit};
use crate::config::TacticsConfig;
use crate::pathfinding::{despawn_marker, UnitRegistry};
use crate::turn::{HitOutcome, TurnActor, TurnContext, TurnEndReason, TurnEnded};

#[allow(clippy::too_many_arguments)]
pub fn resolve_collisions(
    mut commands: Commands,
    config: Res<TacticsConfig>,
    ctx: Res<TurnContext>,
    mut collisions: EventReader<UnitCollision>,
    mut actors: Query<TurnActor, Without<Defeated>>,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut defeated: EventWriter<UnitDefeated>,
    mut turn_ended: EventWriter<TurnEnded>,
) {
    for collision in collisions.read() {
        for (entity, other) in [
            (collision.first, collision.second),
            (collision.second, collision.first),
        ] {
            let Ok(other_faction) = actors.get(other).map(|actor| actor.unit.faction) else {
                continue;
            };
            let Ok(mut actor) = actors.get_mut(entity) else {
                continue;
            };

            despawn_marker(&mut commands, actor.halt(config.tile_size));

            let attacks = ctx.is_turn_holder(entity)
                && !actor.turn.turn_used
                && actor.unit.faction.is_hostile_to(other_faction);
            if !attacks {
                continue;
            }

            let damage = actor.damage();
            let attacker_id = actor.unit.id;
            let attacker_name = actor.unit.name.clone();
            despawn_marker(&mut commands, actor.end_turn());
            turn_ended.write(TurnEnded {
                entity,
                unit: attacker_id,
                reason: TurnEndReason::Attacked,
            });

            let Ok(mut target) = actors.get_mut(other) else {
                continue;
            };

            match target.receive_damage(damage) {
                HitOutcome::Ignored => {}
                HitOutcome::Damaged { dealt, remaining } => {
                    crate::logger::log_info(&format!(
                        "{} hits {} for {} (HP {}/{})",
                        attacker_name, target.unit.name, dealt, remaining, target.health.max
                    ));
                    damage_dealt.write(DamageDealt {
                        attacker: entity,
                        target: other,
                        damage: dealt,
                        remaining,
                    });
                }
                HitOutcome::Defeated { dealt } => {
                    crate::logger::log_info(&format!(
                        "{} defeats {} ({} damage)",
                        attacker_name, target.unit.name, dealt
                    ));
                    damage_dealt.write(DamageDealt {
                        attacker: entity,
                        target: other,
                        damage: dealt,
                        remaining: 0,
                    });

                    despawn_marker(&mut commands, target.kill());
                    if let Ok(mut defeated_entity) = commands.get_entity(other) {
                        defeated_entity.try_insert(Defeated);
                    }
                    defeated.write(UnitDefeated {
                        entity: other,
                        unit: target.unit.id,
                        killer: entity,
                    });
                }
            }
        }
    }
}

/// Удаляем побеждённых в конце Collision фазы (и из реестра avoid/ignore)
pub fn despawn_defeated(
    mut commands: Commands,
    mut registry: ResMut<UnitRegistry>,
    defeated: Query<(Entity, &Unit), With<Defeated>>,
) {
    for (entity, unit) in defeated.iter() {
        registry.unregister(unit.id);
        crate::logger::log(&format!("Despawning defeated {} ({:?})", unit.name, entity));
        commands.entity(entity).despawn();
    }
}
