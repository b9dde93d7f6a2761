//! Presentation data: то, что читает внешний рендер
//!
//! Сам рендер вне симуляции. Здесь: range overlay в мировых координатах,
//! таймер HP bar и снимок флагов юнита для отрисовки.

use bevy::prelude::*;

use crate::components::{Defeated, Facing, GridMover, Health, HealthBar, MovementBudget};
use crate::config::TacticsConfig;
use crate::grid::tile_to_world;
use crate::range::{compute_reachable_offsets, RangeTileKind};
use crate::turn::{TurnContext, TurnController};
use crate::TacticsSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayTile {
    /// Левый верхний угол тайла (пиксели)
    pub position: Vec2,
    pub kind: RangeTileKind,
}

/// Тайлы движения, видимые прямо сейчас (пусто = overlay скрыт)
#[derive(Component, Debug, Clone, Default)]
pub struct RangeOverlay {
    pub tiles: Vec<OverlayTile>,
    anchor: Option<(Vec2, u32)>,
}

impl RangeOverlay {
    pub fn is_visible(&self) -> bool {
        !self.tiles.is_empty()
    }

    /// Пересчитываем только при смене origin или cap
    pub fn show(&mut self, origin: Vec2, cap: u32, tile_size: f32) {
        if self.anchor == Some((origin, cap)) {
            return;
        }
        self.anchor = Some((origin, cap));
        self.tiles = compute_reachable_offsets(cap)
            .into_iter()
            .map(|tile| OverlayTile {
                position: origin + tile_to_world(tile.offset, tile_size),
                kind: tile.kind,
            })
            .collect();
    }

    pub fn hide(&mut self) {
        if self.anchor.is_some() {
            self.anchor = None;
            self.tiles.clear();
        }
    }
}

/// Снимок для отрисовки одного юнита
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDrawInfo {
    pub position: Vec2,
    pub facing: Facing,
    pub health_fraction: f32,
    pub show_health_bar: bool,
    pub is_turn_holder: bool,
    pub is_selected: bool,
    pub turn_used: bool,
}

pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (tick_health_bars, update_range_overlays).in_set(TacticsSet::Presentation),
        );
    }
}

pub fn tick_health_bars(time: Res<Time<Fixed>>, mut bars: Query<&mut HealthBar>) {
    let delta = time.delta_secs();
    for mut bar in bars.iter_mut() {
        bar.tick(delta);
    }
}

/// Overlay виден только у holder'а, выбранного игроком, пока ход не использован
/// и прошло range_display_delay с начала хода
pub fn update_range_overlays(
    config: Res<TacticsConfig>,
    ctx: Res<TurnContext>,
    mut units: Query<
        (Entity, &MovementBudget, &TurnController, &mut RangeOverlay),
        Without<Defeated>,
    >,
) {
    for (entity, budget, turn, mut overlay) in units.iter_mut() {
        let visible = ctx.is_turn_holder(entity)
            && ctx.selected() == Some(entity)
            && !turn.turn_used
            && !budget.is_exhausted()
            && turn.idle_timer > config.range_display_delay;

        if visible {
            overlay.show(turn.origin, budget.cap, config.tile_size);
        } else {
            overlay.hide();
        }
    }
}

/// Флаги для рендера (health fraction, ход, выбор)
pub fn draw_info(world: &World, entity: Entity) -> Option<UnitDrawInfo> {
    let ctx = world.get_resource::<TurnContext>()?;
    let duration = world
        .get_resource::<TacticsConfig>()
        .map(|config| config.hp_bar_duration)
        .unwrap_or_default();

    let mover = world.get::<GridMover>(entity)?;
    let health = world.get::<Health>(entity)?;
    let turn = world.get::<TurnController>(entity)?;
    let facing = world.get::<Facing>(entity).copied().unwrap_or_default();
    let show_health_bar = world
        .get::<HealthBar>(entity)
        .is_some_and(|bar| bar.is_visible(health, duration));

    Some(UnitDrawInfo {
        position: mover.position,
        facing,
        health_fraction: health.fraction(),
        show_health_bar,
        is_turn_holder: ctx.is_turn_holder(entity),
        is_selected: ctx.selected() == Some(entity),
        turn_used: turn.turn_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_anchored_at_origin() {
        let mut overlay = RangeOverlay::default();
        overlay.show(Vec2::new(64.0, 64.0), 1, 32.0);
        assert!(overlay.is_visible());
        assert_eq!(overlay.tiles.len(), 5);

        let positions: Vec<Vec2> = overlay.tiles.iter().map(|tile| tile.position).collect();
        assert!(positions.contains(&Vec2::new(32.0, 64.0)));
        assert!(positions.contains(&Vec2::new(64.0, 96.0)));
        assert!(positions.contains(&Vec2::new(64.0, 64.0)));

        overlay.hide();
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_overlay_recomputed_on_new_origin() {
        let mut overlay = RangeOverlay::default();
        overlay.show(Vec2::ZERO, 2, 32.0);
        overlay.show(Vec2::new(32.0, 0.0), 2, 32.0);
        assert!(overlay
            .tiles
            .iter()
            .any(|tile| tile.kind == RangeTileKind::Origin && tile.position == Vec2::new(32.0, 0.0)));
    }
}
