//! Turn module: пошаговый бой: кто ходит, куда идёт, когда ход закончен
//!
//! TurnContext пишет внешний authority (см. turn_order.rs), юниты только читают.
//! Per-unit FSM: TurnController + turn_state_machine.

use bevy::prelude::*;

pub mod actor;
pub mod context;
pub mod destination;
pub mod events;
pub mod state;
pub mod systems;


pub use actor::{HitOutcome, TurnActor, TurnActorItem};
pub use context::TurnContext;
pub use destination::{resolve_destination, DestinationIntent};
pub use events::{TurnEndReason, TurnEnded, TurnStarted};
pub use state::{TurnController, TurnPhase};
pub use systems::{begin_turns, turn_state_machine};

use crate::movement::{exploration_movement, integrate_movement};
use crate::TacticsSet;

/// Turn Plugin
///
/// Порядок выполнения:
/// 1. begin_turns (Assignment): сброс бюджета/таймеров по TurnContext
/// 2. turn_state_machine (Movement): после интеграции позиции в этом тике
pub struct TurnPlugin;

impl Plugin for TurnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TurnContext>()
            .add_event::<TurnStarted>()
            .add_event::<TurnEnded>();

        app.add_systems(FixedUpdate, begin_turns.in_set(TacticsSet::Assignment))
            .add_systems(
                FixedUpdate,
                turn_state_machine
                    .in_set(TacticsSet::Movement)
                    .after(integrate_movement)
                    .after(exploration_movement),
            );
    }
}
