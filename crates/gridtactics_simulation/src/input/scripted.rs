//! Seeded random input (headless soak runs, determinism tests)
//!
//! Каждый тик: все клавиши отпущены, затем с малой вероятностью
//! зажимается одно направление или кликается тайл рядом с holder'ом.

use bevy::prelude::*;
use rand::Rng;

use crate::components::GridMover;
use crate::config::TacticsConfig;
use crate::grid::{tile_center, Direction};
use crate::input::InputState;
use crate::turn::TurnContext;
use crate::{DeterministicRng, TacticsSet};

/// Шанс (из 100) нажать направление / кликнуть за тик
const KEY_CHANCE: u32 = 10;
const CLICK_CHANCE: u32 = 4;
/// Радиус случайного клика (тайлы)
const CLICK_SPREAD: i32 = 5;

pub struct RandomInputPlugin;

impl Plugin for RandomInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, drive_random_input.in_set(TacticsSet::Input));
    }
}

pub fn drive_random_input(
    mut rng: ResMut<DeterministicRng>,
    mut input: ResMut<InputState>,
    config: Res<TacticsConfig>,
    ctx: Res<TurnContext>,
    movers: Query<&GridMover>,
) {
    input.release_all();

    let roll = rng.rng.gen_range(0..100);
    if roll < KEY_CHANCE {
        let direction = Direction::ALL[rng.rng.gen_range(0..Direction::ALL.len())];
        input.set_held(direction, true);
        input.run = rng.rng.gen_bool(0.3);
    } else if roll < KEY_CHANCE + CLICK_CHANCE {
        let Some(mover) = ctx.turn_holder().and_then(|holder| movers.get(holder).ok()) else {
            return;
        };
        let offset = IVec2::new(
            rng.rng.gen_range(-CLICK_SPREAD..=CLICK_SPREAD),
            rng.rng.gen_range(-CLICK_SPREAD..=CLICK_SPREAD),
        );
        let tile = mover.position + offset.as_vec2() * config.tile_size;
        input.click(tile_center(tile, config.tile_size));
    }
}
