//! TurnContext: кто сейчас ходит
//!
//! Пишет ровно один внешний authority (turn order plugin / host),
//! симуляция только читает.

use bevy::prelude::*;

#[derive(Resource, Debug, Default)]
pub struct TurnContext {
    order: Vec<Entity>,
    active_index: Option<usize>,
    selected: Option<Entity>,
    /// Счётчик назначений хода (каждое назначение: новый ход, даже тому же юниту)
    assignment: u64,
    in_battle: bool,
}

impl TurnContext {
    /// Начать бой: ход у первого в порядке
    pub fn start_battle(&mut self, order: Vec<Entity>) {
        self.in_battle = true;
        self.order = order;
        self.active_index = None;
        if !self.order.is_empty() {
            self.set_active(0);
        }
    }

    pub fn end_battle(&mut self) {
        self.in_battle = false;
        self.order.clear();
        self.active_index = None;
        self.selected = None;
    }

    /// Передать ход юниту по индексу в порядке
    pub fn set_active(&mut self, index: usize) -> Option<Entity> {
        let entity = self.order.get(index).copied()?;
        self.active_index = Some(index);
        self.assignment += 1;
        crate::logger::log(&format!(
            "Turn assigned: {:?} (index {}, assignment {})",
            entity, index, self.assignment
        ));
        Some(entity)
    }

    /// Следующий по кругу
    pub fn advance(&mut self) -> Option<Entity> {
        if self.order.is_empty() {
            self.active_index = None;
            return None;
        }
        let next = match self.active_index {
            Some(index) => (index + 1) % self.order.len(),
            None => 0,
        };
        self.set_active(next)
    }

    /// Убрать юнита из порядка (поражение). Если он ходил: ход ни у кого.
    pub fn remove(&mut self, entity: Entity) {
        let Some(position) = self.order.iter().position(|e| *e == entity) else {
            return;
        };
        self.order.remove(position);

        self.active_index = match self.active_index {
            Some(index) if index == position => None,
            Some(index) if index > position => Some(index - 1),
            other => other,
        };

        if self.selected == Some(entity) {
            self.selected = None;
        }
    }

    pub fn is_battle_active(&self) -> bool {
        self.in_battle
    }

    pub fn turn_holder(&self) -> Option<Entity> {
        if !self.in_battle {
            return None;
        }
        self.active_index
            .and_then(|index| self.order.get(index).copied())
    }

    pub fn is_turn_holder(&self, entity: Entity) -> bool {
        self.turn_holder() == Some(entity)
    }

    /// Выбор юнита игроком (для range overlay)
    pub fn select(&mut self, entity: Option<Entity>) {
        self.selected = entity;
    }

    pub fn selected(&self) -> Option<Entity> {
        self.selected
    }

    pub fn assignment(&self) -> u64 {
        self.assignment
    }

    pub fn order(&self) -> &[Entity] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(n: u32) -> Vec<Entity> {
        (0..n).map(Entity::from_raw).collect()
    }

    #[test]
    fn test_start_battle_assigns_first() {
        let mut ctx = TurnContext::default();
        assert!(ctx.turn_holder().is_none());

        let order = entities(3);
        ctx.start_battle(order.clone());
        assert!(ctx.is_battle_active());
        assert_eq!(ctx.turn_holder(), Some(order[0]));
        assert_eq!(ctx.assignment(), 1);
    }

    #[test]
    fn test_advance_wraps() {
        let mut ctx = TurnContext::default();
        let order = entities(2);
        ctx.start_battle(order.clone());

        assert_eq!(ctx.advance(), Some(order[1]));
        assert_eq!(ctx.advance(), Some(order[0]));
        assert_eq!(ctx.assignment(), 3);
    }

    #[test]
    fn test_reassign_same_unit_is_new_assignment() {
        let mut ctx = TurnContext::default();
        ctx.start_battle(entities(1));
        let before = ctx.assignment();
        ctx.set_active(0);
        assert_eq!(ctx.assignment(), before + 1);
    }

    #[test]
    fn test_remove_holder_and_others() {
        let mut ctx = TurnContext::default();
        let order = entities(3);
        ctx.start_battle(order.clone());
        ctx.advance(); // ход у order[1]

        ctx.remove(order[0]);
        assert_eq!(ctx.turn_holder(), Some(order[1]));

        ctx.remove(order[1]);
        assert!(ctx.turn_holder().is_none());
        assert_eq!(ctx.order(), &[order[2]]);
    }

    #[test]
    fn test_end_battle_clears_holder() {
        let mut ctx = TurnContext::default();
        let order = entities(2);
        ctx.start_battle(order.clone());
        ctx.select(Some(order[0]));

        ctx.end_battle();
        assert!(!ctx.is_battle_active());
        assert!(ctx.turn_holder().is_none());
        assert!(ctx.selected().is_none());
    }
}
