//! Turn systems: назначение хода и FSM юнита, у которого ход
//!
//! Порядок в тике (см. TacticsSet):
//! 1. begin_turns (Assignment): реакция на TurnContext
//! 2. turn_state_machine (Movement, после интеграции позиции): input → destination → arrival

use std::collections::{HashMap, VecDeque};

use bevy::prelude::*;

use crate::components::{Defeated, Facing, GridMover, MovementBudget, Player, Unit};
use crate::config::{StaleDestinationPolicy, TacticsConfig};
use crate::error::TacticsError;
use crate::grid::{has_crossed, tile_to_world, to_tile};
use crate::input::InputState;
use crate::pathfinding::{
    despawn_marker, plan_route, PathMarker, PathRequest, Pathfinder, PathingFilters, UnitRegistry,
};
use crate::turn::destination::{resolve_destination, DestinationIntent};
use crate::turn::{TurnContext, TurnController, TurnEndReason, TurnEnded, TurnPhase, TurnStarted};

/// Синхронизация фаз с TurnContext
///
/// Бюджет сбрасывается ровно один раз на назначение хода.
/// Не-holder: idle timer в 0, facing idle, незавершённый шаг дошагивается.
pub fn begin_turns(
    mut commands: Commands,
    ctx: Res<TurnContext>,
    mut started: EventWriter<TurnStarted>,
    mut units: Query<
        (
            Entity,
            &Unit,
            &mut GridMover,
            &mut MovementBudget,
            &mut TurnController,
            &mut Facing,
        ),
        Without<Defeated>,
    >,
) {
    for (entity, unit, mut mover, mut budget, mut turn, mut facing) in units.iter_mut() {
        if !ctx.is_battle_active() {
            if turn.phase != TurnPhase::Exploration {
                mover.settle();
                despawn_marker(&mut commands, turn.enter_exploration());
                facing.set_if_neq(Facing::Idle);
            }
            continue;
        }

        if ctx.is_turn_holder(entity) {
            if turn.is_new_assignment(ctx.assignment()) {
                mover.settle();
                budget.reset();
                let position = mover.position;
                despawn_marker(&mut commands, turn.begin_turn(position, ctx.assignment()));
                facing.set_if_neq(Facing::Idle);

                crate::logger::log_info(&format!(
                    "{} ({:?}) starts turn #{} at {}",
                    unit.name,
                    entity,
                    ctx.assignment(),
                    position
                ));
                started.write(TurnStarted {
                    entity,
                    unit: unit.id,
                    assignment: ctx.assignment(),
                });
            }
            continue;
        }

        if mover.is_moving() {
            mover.settle();
        }
        if turn.destination.is_some() {
            despawn_marker(&mut commands, turn.clear_destination());
        }
        turn.hold();
        facing.set_if_neq(Facing::Idle);
    }
}

/// FSM юнита, у которого ход
///
/// AWAITING_INPUT: debounce → resolve_destination → шаг / маршрут / конец движения
/// (только Player; маршрут остальных задаёт внешний AI через commit_route).
/// MOVING: arrival по пересечению waypoint → +1 consumed → следующий waypoint.
/// consumed == cap → DONE, TurnEnded.
#[allow(clippy::too_many_arguments)]
pub fn turn_state_machine(
    mut commands: Commands,
    config: Res<TacticsConfig>,
    input: Res<InputState>,
    ctx: Res<TurnContext>,
    pathfinder: Res<Pathfinder>,
    registry: Res<UnitRegistry>,
    time: Res<Time<Fixed>>,
    mut turn_ended: EventWriter<TurnEnded>,
    mut units: Query<
        (
            Entity,
            &Unit,
            &mut GridMover,
            &mut MovementBudget,
            &mut TurnController,
            &mut Facing,
            Option<&PathingFilters>,
            Has<Player>,
        ),
        Without<Defeated>,
    >,
) {
    let Some(holder) = ctx.turn_holder() else {
        return;
    };

    // Тайлы всех юнитов (для avoid/ignore) до того, как берём holder мутабельно
    let tiles: HashMap<Entity, IVec2> = units
        .iter()
        .map(|(entity, _, mover, ..)| (entity, to_tile(mover.position, config.tile_size)))
        .collect();

    let Ok((entity, unit, mut mover, mut budget, mut turn, mut facing, filters, is_player)) =
        units.get_mut(holder)
    else {
        return;
    };

    if turn.turn_used {
        return;
    }

    turn.idle_timer += time.delta_secs();
    // Маршрут не-Player holder'у коммитит внешний AI, input читает только Player
    let accepts_input = is_player && turn.debounce_elapsed(config.debounce_window);

    if turn.destination.is_none() && accepts_input {
        let cap_pixels = budget.cap_pixels(config.tile_size, config.movement_epsilon);
        match resolve_destination(mover.position, &input, cap_pixels, config.tile_size) {
            DestinationIntent::Idle => {}
            DestinationIntent::Step {
                direction,
                destination,
            } => {
                turn.commit_route(destination, VecDeque::from([destination]));
                let speed = mover.walk_speed;
                mover.set_target(destination, speed);
                facing.set_if_neq(direction.into());
            }
            DestinationIntent::Travel { destination } => {
                let origin = to_tile(mover.position, config.tile_size);
                let target = to_tile(destination, config.tile_size);
                let marker = commands
                    .spawn(PathMarker {
                        owner: entity,
                        tile: target,
                    })
                    .id();

                let request = PathRequest {
                    origin,
                    destination: target,
                    avoid: filters
                        .map(|f| registry.resolve_tiles(&f.avoid, &tiles))
                        .unwrap_or_default(),
                    ignore: filters
                        .map(|f| registry.resolve_tiles(&f.ignore, &tiles))
                        .unwrap_or_default(),
                    marker: Some(marker),
                };
                let path = pathfinder.find_path(&request);

                match plan_route(origin, target, path, budget.remaining()) {
                    Ok(route) => {
                        let route: VecDeque<Vec2> = route
                            .into_iter()
                            .map(|tile| tile_to_world(tile, config.tile_size))
                            .collect();
                        crate::logger::log(&format!(
                            "{} travels to {} ({} tiles)",
                            unit.name,
                            destination,
                            route.len()
                        ));
                        let first = route.front().copied();
                        turn.commit_route(destination, route);
                        turn.marker = Some(marker);
                        if let Some(first) = first {
                            let speed = mover.walk_speed;
                            mover.set_target(first, speed);
                            facing.set_if_neq(mover.direction.into());
                        }
                    }
                    Err(err) => {
                        err.absorb();
                        match config.stale_destination {
                            StaleDestinationPolicy::Abandon => {
                                despawn_marker(&mut commands, Some(marker));
                            }
                            StaleDestinationPolicy::ClearAfterTicks(_) => {
                                // destination висит, пока не истечёт лимит
                                turn.commit_route(destination, VecDeque::new());
                                turn.marker = Some(marker);
                            }
                        }
                    }
                }
            }
            DestinationIntent::EndMovement => {
                crate::logger::log(&format!("{} ends movement on own tile", unit.name));
                budget.exhaust();
            }
            DestinationIntent::Clear => {
                despawn_marker(&mut commands, turn.clear_destination());
            }
            DestinationIntent::OutOfRange { distance, max } => {
                TacticsError::OutOfRangeClick { distance, max }.absorb();
            }
        }
    } else if turn.destination.is_some() {
        match turn.next_waypoint() {
            Some(waypoint) if has_crossed(mover.position, mover.previous, waypoint)
                || mover.position == waypoint =>
            {
                mover.arrive_at(waypoint);
                turn.route.pop_front();
                turn.stalled_ticks = 0;
                budget.consume_one();

                match turn.next_waypoint() {
                    Some(next) if !budget.is_exhausted() => {
                        let speed = mover.walk_speed;
                        mover.set_target(next, speed);
                        facing.set_if_neq(mover.direction.into());
                    }
                    _ => {
                        mover.stop();
                        despawn_marker(&mut commands, turn.clear_destination());
                        facing.set_if_neq(Facing::Idle);
                    }
                }
            }
            _ => {
                if mover.position == mover.previous {
                    turn.stalled_ticks += 1;
                } else {
                    turn.stalled_ticks = 0;
                }

                if let StaleDestinationPolicy::ClearAfterTicks(limit) = config.stale_destination {
                    if turn.stalled_ticks >= limit {
                        crate::logger::log_warning(&format!(
                            "{}: destination {:?} stale for {} ticks, cleared",
                            unit.name, turn.destination, turn.stalled_ticks
                        ));
                        mover.stop();
                        despawn_marker(&mut commands, turn.clear_destination());
                    }
                }
            }
        }
    }

    // Пока ни одного тайла не потрачено, origin следует за юнитом
    if budget.consumed == 0 {
        turn.origin = mover.position;
    }

    if budget.is_exhausted() {
        mover.stop();
        let position = mover.position;
        despawn_marker(&mut commands, turn.finish_turn(position));
        facing.set_if_neq(Facing::Idle);

        crate::logger::log_info(&format!(
            "{} finished movement at {} ({}/{} tiles)",
            unit.name, position, budget.consumed, budget.cap
        ));
        turn_ended.write(TurnEnded {
            entity,
            unit: unit.id,
            reason: TurnEndReason::MovementExhausted,
        });
    }
}
