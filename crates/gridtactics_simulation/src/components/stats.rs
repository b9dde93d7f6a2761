//! Характеристики юнита: базовые статы, модификаторы, статус-эффекты, резисты
//!
//! Формула derived статов: final = base + modifier.
//! Статы не уходят ниже 0, резисты держатся в 0..=100, max HP ≥ 1.

use bevy::prelude::*;
use bitflags::bitflags;

pub const RESISTANCE_MAX: i32 = 100;

bitflags! {
    /// Активные статус-эффекты
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StatusEffects: u8 {
        const POISONED  = 1 << 0;
        const BLINDED   = 1 << 1;
        const PARALYZED = 1 << 2;
        const DAZED     = 1 << 3;
        const ASLEEP    = 1 << 4;
        const CONFUSED  = 1 << 5;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub attack: i32,
    pub magic: i32,
    pub defense: i32,
    pub resistance: i32,
    pub speed: i32,
    pub luck: i32,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            attack: 5,
            magic: 5,
            defense: 5,
            resistance: 5,
            speed: 5,
            luck: 5,
        }
    }
}

/// Резисты к статус-эффектам (шкала 0..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resistances {
    pub poison: i32,
    pub blind: i32,
    pub paralyze: i32,
    pub daze: i32,
    pub sleep: i32,
    pub confuse: i32,
}

impl Resistances {
    fn combined(&self, other: &Resistances) -> Resistances {
        let clamp = |value: i32| value.clamp(0, RESISTANCE_MAX);
        Resistances {
            poison: clamp(self.poison + other.poison),
            blind: clamp(self.blind + other.blind),
            paralyze: clamp(self.paralyze + other.paralyze),
            daze: clamp(self.daze + other.daze),
            sleep: clamp(self.sleep + other.sleep),
            confuse: clamp(self.confuse + other.confuse),
        }
    }
}

/// Аддитивные модификаторы (экипировка, баффы, класс)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatModifiers {
    pub health_max: i32,
    pub attack: i32,
    pub magic: i32,
    pub defense: i32,
    pub resistance: i32,
    pub speed: i32,
    pub luck: i32,
    pub action_points: i32,
    pub weapon_attack: i32,
    pub weapon_magic: i32,
    pub weapon_accuracy: i32,
    pub weapon_evasion: i32,
    pub crit: i32,
    pub resist: Resistances,
}

/// Итоговые статы после применения модификаторов
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedStats {
    pub health_max: u32,
    pub attack: i32,
    pub magic: i32,
    pub defense: i32,
    pub resistance: i32,
    pub speed: i32,
    pub luck: i32,
    pub action_points: i32,
    pub weapon_attack: i32,
    pub weapon_magic: i32,
    pub weapon_accuracy: i32,
    pub weapon_evasion: i32,
    pub crit: i32,
    pub resist: Resistances,
}

/// Лист персонажа: уровень, база, модификаторы, статусы
#[derive(Component, Debug, Clone)]
pub struct CharacterSheet {
    pub level: u32,
    pub health_max: u32,
    pub base: BaseStats,
    pub resist: Resistances,
    pub modifiers: StatModifiers,
    pub status: StatusEffects,
}

impl Default for CharacterSheet {
    fn default() -> Self {
        Self {
            level: 1,
            health_max: 10,
            base: BaseStats::default(),
            resist: Resistances::default(),
            modifiers: StatModifiers::default(),
            status: StatusEffects::empty(),
        }
    }
}

impl CharacterSheet {
    pub fn derived(&self) -> DerivedStats {
        let m = &self.modifiers;
        let stat = |base: i32, modifier: i32| (base + modifier).max(0);

        DerivedStats {
            health_max: (self.health_max as i64 + m.health_max as i64).max(1) as u32,
            attack: stat(self.base.attack, m.attack),
            magic: stat(self.base.magic, m.magic),
            defense: stat(self.base.defense, m.defense),
            resistance: stat(self.base.resistance, m.resistance),
            speed: stat(self.base.speed, m.speed),
            luck: stat(self.base.luck, m.luck),
            action_points: m.action_points.max(0),
            weapon_attack: m.weapon_attack.max(0),
            weapon_magic: m.weapon_magic.max(0),
            weapon_accuracy: m.weapon_accuracy.max(0),
            weapon_evasion: m.weapon_evasion.max(0),
            crit: m.crit.max(0),
            resist: self.resist.combined(&m.resist),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_is_base_plus_modifier() {
        let sheet = CharacterSheet {
            modifiers: StatModifiers {
                attack: 3,
                defense: -2,
                health_max: 5,
                ..Default::default()
            },
            ..Default::default()
        };

        let derived = sheet.derived();
        assert_eq!(derived.attack, 8);
        assert_eq!(derived.defense, 3);
        assert_eq!(derived.magic, 5);
        assert_eq!(derived.health_max, 15);
    }

    #[test]
    fn test_derived_clamps() {
        let sheet = CharacterSheet {
            resist: Resistances {
                poison: 90,
                ..Default::default()
            },
            modifiers: StatModifiers {
                speed: -50,
                health_max: -100,
                resist: Resistances {
                    poison: 30,
                    blind: -10,
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };

        let derived = sheet.derived();
        assert_eq!(derived.speed, 0);
        assert_eq!(derived.health_max, 1);
        assert_eq!(derived.resist.poison, RESISTANCE_MAX);
        assert_eq!(derived.resist.blind, 0);
    }
}
