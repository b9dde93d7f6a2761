//! Movement domain: движение по сетке
//!
//! Содержит:
//! - integrate_movement: шаг позиции по velocity (все юниты)
//! - exploration_movement: свободное движение по клавишам вне боя
//!
//! В бою цели шагов ставит turn_state_machine.

use bevy::prelude::*;

use crate::components::{Defeated, Facing, GridMover, Player};
use crate::config::TacticsConfig;
use crate::input::InputState;
use crate::turn::TurnContext;
use crate::TacticsSet;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (integrate_movement, exploration_movement)
                .chain()
                .in_set(TacticsSet::Movement),
        );
    }
}

/// previous ← position, position += velocity * dt
pub fn integrate_movement(
    time: Res<Time<Fixed>>,
    mut movers: Query<&mut GridMover, Without<Defeated>>,
) {
    let delta = time.delta_secs();
    for mut mover in movers.iter_mut() {
        mover.advance(delta);
    }
}

/// Вне боя: клавиша направления → шаг на соседний тайл (run = быстрее)
///
/// Следующий шаг берётся только после прихода в точку сетки,
/// поэтому в покое юнит всегда выровнен.
pub fn exploration_movement(
    ctx: Res<TurnContext>,
    input: Res<InputState>,
    config: Res<TacticsConfig>,
    mut players: Query<(&mut GridMover, &mut Facing), (With<Player>, Without<Defeated>)>,
) {
    if ctx.is_battle_active() {
        return;
    }

    for (mut mover, mut facing) in players.iter_mut() {
        if mover.reached_target() {
            if let Some(target) = mover.target {
                mover.arrive_at(target);
            }
        }

        if mover.is_moving() {
            continue;
        }

        match input.held_direction() {
            Some(direction) => {
                let speed = if input.run {
                    mover.run_speed
                } else {
                    mover.walk_speed
                };
                let target = mover.position + direction.offset().as_vec2() * config.tile_size;
                mover.set_target(target, speed);
                facing.set_if_neq(direction.into());
            }
            None => {
                mover.direction = None;
                facing.set_if_neq(Facing::Idle);
            }
        }
    }
}
