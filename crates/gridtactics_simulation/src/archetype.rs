//! Data-driven архетипы юнитов + bundle для спавна
//!
//! Разница между героем, союзником и врагом только в данных
//! (статы, имя, анимации). Поведение общее: TurnActor + turn systems.

use bevy::prelude::*;

use crate::components::{
    AnimationClip, Appearance, Attacker, BaseStats, CharacterSheet, Facing, Faction, GridMover,
    Health, HealthBar, MovementBudget, Resistances, StatModifiers, StatusEffects, Unit, UnitId,
};
use crate::config::TacticsConfig;
use crate::grid::tile_to_world;
use crate::pathfinding::PathingFilters;
use crate::presentation::RangeOverlay;
use crate::turn::TurnController;

const FRAME_TIME: f32 = 0.28;

#[derive(Debug, Clone)]
pub struct UnitArchetype {
    pub key: &'static str,
    pub display_name: String,
    pub level: u32,
    pub health_max: u32,
    pub damage: u32,
    /// Тайлов за ход
    pub move_cap: u32,
    pub base: BaseStats,
    pub resist: Resistances,
    pub appearance: Appearance,
}

impl Default for UnitArchetype {
    fn default() -> Self {
        Self {
            key: "base",
            display_name: "unit".to_string(),
            level: 1,
            health_max: 10,
            damage: 2,
            move_cap: 4,
            base: BaseStats::default(),
            resist: Resistances::default(),
            appearance: Appearance::default(),
        }
    }
}

impl UnitArchetype {
    /// Главный герой (своего клипа "right" нет: рендер зеркалит "left")
    pub fn hero() -> Self {
        Self {
            key: "hero",
            display_name: "player".to_string(),
            appearance: Appearance {
                sprite_sheet: "media/tilesets/players/assassin.png".to_string(),
                frame_size: UVec2::splat(32),
                clips: vec![
                    AnimationClip::new("idle", vec![0, 1, 2], FRAME_TIME),
                    AnimationClip::new("left", vec![15, 16, 17], FRAME_TIME),
                    AnimationClip::new("down", vec![5, 6, 7, 8], FRAME_TIME),
                    AnimationClip::new("up", vec![10, 11, 12, 13], FRAME_TIME),
                ],
            },
            ..Default::default()
        }
    }

    /// Союзник Nergal
    pub fn wyvern_lord() -> Self {
        Self {
            key: "wyvern_lord",
            display_name: "Nergal".to_string(),
            appearance: Appearance {
                sprite_sheet: "media/tilesets/players/wyvernLord.png".to_string(),
                frame_size: UVec2::splat(32),
                clips: vec![
                    AnimationClip::new("idle", vec![0, 6, 12], FRAME_TIME),
                    AnimationClip::new("left", vec![1, 7, 13, 19], FRAME_TIME),
                    AnimationClip::new("right", vec![2, 8, 14, 20], FRAME_TIME),
                    AnimationClip::new("down", vec![3, 9, 15, 21], FRAME_TIME),
                    AnimationClip::new("up", vec![4, 10, 16, 22], FRAME_TIME),
                    AnimationClip::new("attack", vec![5, 11, 17], FRAME_TIME).once(),
                ],
            },
            ..Default::default()
        }
    }

    /// Рядовой враг
    pub fn grunt() -> Self {
        Self {
            key: "grunt",
            display_name: "grunt".to_string(),
            move_cap: 3,
            ..Default::default()
        }
    }

    pub fn by_key(key: &str) -> Option<Self> {
        match key {
            "hero" => Some(Self::hero()),
            "wyvern_lord" => Some(Self::wyvern_lord()),
            "grunt" => Some(Self::grunt()),
            _ => None,
        }
    }

    pub fn sheet(&self) -> CharacterSheet {
        CharacterSheet {
            level: self.level,
            health_max: self.health_max,
            base: self.base,
            resist: self.resist,
            modifiers: StatModifiers::default(),
            status: StatusEffects::empty(),
        }
    }
}

/// Всё, что нужно юниту для участия в бою
#[derive(Bundle)]
pub struct TurnActorBundle {
    pub unit: Unit,
    pub sheet: CharacterSheet,
    pub health: Health,
    pub health_bar: HealthBar,
    pub attacker: Attacker,
    pub mover: GridMover,
    pub budget: MovementBudget,
    pub turn: TurnController,
    pub facing: Facing,
    pub filters: PathingFilters,
    pub overlay: RangeOverlay,
    pub appearance: Appearance,
}

impl TurnActorBundle {
    pub fn new(
        id: UnitId,
        faction: Faction,
        archetype: &UnitArchetype,
        tile: IVec2,
        config: &TacticsConfig,
    ) -> Self {
        let sheet = archetype.sheet();
        let health = Health::new(sheet.derived().health_max);
        let position = tile_to_world(tile, config.tile_size);

        Self {
            unit: Unit {
                id,
                name: archetype.display_name.clone(),
                faction,
            },
            sheet,
            health,
            health_bar: HealthBar::default(),
            attacker: Attacker {
                damage: archetype.damage,
            },
            mover: GridMover::at(position, config.walk_speed, config.run_speed),
            budget: MovementBudget::new(archetype.move_cap),
            turn: TurnController::at(position),
            facing: Facing::Idle,
            filters: PathingFilters::default(),
            overlay: RangeOverlay::default(),
            appearance: archetype.appearance.clone(),
        }
    }

    pub fn with_filters(mut self, filters: PathingFilters) -> Self {
        self.filters = filters;
        self
    }
}
