//! GRIDTACTICS Simulation Core
//!
//! Пошаговое тактическое ядро на Bevy 0.16: движение по сетке с бюджетом тайлов,
//! FSM хода юнита, столкновения → урон, range overlay.
//!
//! Рендер, ввод, загрузка уровней: снаружи. Симуляция читает InputState и
//! TurnContext, отдаёт компоненты/события для отрисовки.
//!
//! Порядок тика (FixedUpdate, TacticsSet):
//! Input → TurnOrder → Assignment → Movement → Collision → Presentation → Cleanup

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod archetype;
pub mod combat;
pub mod components;
pub mod config;
pub mod error;
pub mod grid;
pub mod input;
pub mod logger;
pub mod movement;
pub mod pathfinding;
pub mod presentation;
pub mod range;
pub mod turn;
pub mod turn_order;

// Re-export базовых типов для удобства
pub use archetype::{TurnActorBundle, UnitArchetype};
pub use combat::{CombatPlugin, DamageDealt, UnitCollision, UnitDefeated};
pub use components::*;
pub use config::{StaleDestinationPolicy, TacticsConfig};
pub use error::{Result, TacticsError};
pub use input::{InputState, Pointer, RandomInputPlugin};
pub use logger::*;
pub use movement::MovementPlugin;
pub use pathfinding::{
    PathFinder, PathMarker, PathRequest, Pathfinder, PathfindingPlugin, PathingFilters,
    UnitRegistry,
};
pub use presentation::{draw_info, PresentationPlugin, RangeOverlay, UnitDrawInfo};
pub use range::{compute_reachable_offsets, RangeTile, RangeTileKind};
pub use turn::{
    TurnContext, TurnController, TurnEndReason, TurnEnded, TurnPhase, TurnPlugin, TurnStarted,
};
pub use turn_order::RoundRobinTurnOrderPlugin;

/// Фазы тика симуляции (строго последовательно)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TacticsSet {
    /// Внешний/scripted ввод пишет InputState
    Input,
    /// Authority двигает TurnContext
    TurnOrder,
    /// Юниты реагируют на назначение хода
    Assignment,
    /// Интеграция позиции, exploration, FSM holder'а
    Movement,
    /// Пересечения → остановка/урон/удаление
    Collision,
    /// Данные для рендера (overlay, HP bar)
    Presentation,
    /// Гасим edge-события ввода
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Turn order authority и источник ввода не входят: хост добавляет свои
/// (или RoundRobinTurnOrderPlugin / RandomInputPlugin для headless).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TacticsConfig>()
            .init_resource::<InputState>();

        // Seed задаёт create_headless_app или хост; иначе дефолтный
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        let tick_hz = app.world().resource::<TacticsConfig>().tick_hz;
        app.insert_resource(Time::<Fixed>::from_hz(tick_hz));

        app.configure_sets(
            FixedUpdate,
            (
                TacticsSet::Input,
                TacticsSet::TurnOrder,
                TacticsSet::Assignment,
                TacticsSet::Movement,
                TacticsSet::Collision,
                TacticsSet::Presentation,
                TacticsSet::Cleanup,
            )
                .chain(),
        );

        app.add_plugins((
            PathfindingPlugin,
            TurnPlugin,
            MovementPlugin,
            CombatPlugin,
            PresentationPlugin,
        ))
        .add_systems(
            FixedUpdate,
            input::consume_pointer_click.in_set(TacticsSet::Cleanup),
        );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время шагает вручную: каждый `app.update()` = ровно один fixed тик
/// (кроме самого первого update, у него delta = 0).
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_config(seed, TacticsConfig::default())
}

/// Невалидный config логируется и заменяется дефолтным
pub fn create_headless_app_with_config(seed: u64, mut config: TacticsConfig) -> App {
    let mut app = App::new();
    init_logger();
    if let Err(err) = config.validate() {
        err.absorb();
        config = TacticsConfig::default();
    }
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(config.tick_duration()))
        .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(config);

    app
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия: Debug-представление компонентов по порядку Entity)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
