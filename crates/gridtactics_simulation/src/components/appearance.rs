//! Внешний вид юнита: sprite sheet + анимационные клипы по Facing
//!
//! Рендер живёт снаружи, здесь только данные: какой клип играть и зеркалить ли его.

use bevy::prelude::*;

use super::movement::Facing;

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub frames: Vec<u32>,
    /// Секунд на кадр
    pub frame_time: f32,
    pub looping: bool,
}

impl AnimationClip {
    pub fn new(name: &str, frames: Vec<u32>, frame_time: f32) -> Self {
        Self {
            name: name.to_string(),
            frames,
            frame_time,
            looping: true,
        }
    }

    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }
}

/// Выбранный для рендера клип
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSelection<'a> {
    pub clip: &'a AnimationClip,
    /// Отзеркалить по X (нет отдельного клипа "right")
    pub flip_x: bool,
}

#[derive(Component, Debug, Clone, Default)]
pub struct Appearance {
    pub sprite_sheet: String,
    pub frame_size: UVec2,
    pub clips: Vec<AnimationClip>,
}

impl Appearance {
    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|clip| clip.name == name)
    }

    /// Клип для направления; "right" без своего клипа = зеркальный "left"
    pub fn clip_for(&self, facing: Facing) -> Option<ClipSelection<'_>> {
        let name = match facing {
            Facing::Idle => "idle",
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        };

        if let Some(clip) = self.clip(name) {
            return Some(ClipSelection {
                clip,
                flip_x: false,
            });
        }

        if facing == Facing::Right {
            return self.clip("left").map(|clip| ClipSelection { clip, flip_x: true });
        }

        None
    }
}
