//! BFS по тайлам (headless pathfinder)
//!
//! Все шаги стоят 1, поэтому достаточно BFS вместо Dijkstra.
//! Соседи перебираются в порядке up, down, left, right: результат детерминирован.

use std::collections::{HashMap, HashSet, VecDeque};

use bevy::prelude::*;

use super::{PathFinder, PathRequest};
use crate::grid::{manhattan_tiles, Direction};

#[derive(Debug, Clone)]
pub struct GridPathfinder {
    /// Дальше этого радиуса от origin не ищем (карта без границ)
    pub search_radius: u32,
}

impl Default for GridPathfinder {
    fn default() -> Self {
        Self { search_radius: 32 }
    }
}

impl PathFinder for GridPathfinder {
    fn find_path(&self, request: &PathRequest) -> Vec<IVec2> {
        let ignored: HashSet<IVec2> = request.ignore.iter().copied().collect();
        let blocked: HashSet<IVec2> = request
            .avoid
            .iter()
            .copied()
            .filter(|tile| !ignored.contains(tile))
            .collect();

        if blocked.contains(&request.destination)
            || manhattan_tiles(request.origin, request.destination) > self.search_radius
        {
            return Vec::new();
        }

        let mut prev: HashMap<IVec2, IVec2> = HashMap::new();
        let mut visited: HashSet<IVec2> = HashSet::from([request.origin]);
        let mut queue = VecDeque::from([request.origin]);

        while let Some(tile) = queue.pop_front() {
            if tile == request.destination {
                return reconstruct(&prev, request.origin, tile);
            }

            for direction in Direction::ALL {
                let next = tile + direction.offset();
                if visited.contains(&next)
                    || blocked.contains(&next)
                    || manhattan_tiles(request.origin, next) > self.search_radius
                {
                    continue;
                }
                visited.insert(next);
                prev.insert(next, tile);
                queue.push_back(next);
            }
        }

        Vec::new()
    }
}

fn reconstruct(prev: &HashMap<IVec2, IVec2>, origin: IVec2, destination: IVec2) -> Vec<IVec2> {
    let mut path = vec![destination];
    let mut current = destination;
    while let Some(&step) = prev.get(&current) {
        if step == origin {
            break;
        }
        path.push(step);
        current = step;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::plan_route;

    fn request(origin: IVec2, destination: IVec2, avoid: Vec<IVec2>) -> PathRequest {
        PathRequest {
            origin,
            destination,
            avoid,
            ignore: Vec::new(),
            marker: None,
        }
    }

    #[test]
    fn test_straight_line() {
        let path = GridPathfinder::default().find_path(&request(
            IVec2::ZERO,
            IVec2::new(3, 0),
            Vec::new(),
        ));
        assert_eq!(path, vec![IVec2::new(1, 0), IVec2::new(2, 0), IVec2::new(3, 0)]);
    }

    #[test]
    fn test_detours_around_blocked_tile() {
        let path = GridPathfinder::default().find_path(&request(
            IVec2::ZERO,
            IVec2::new(2, 0),
            vec![IVec2::new(1, 0)],
        ));
        // Обход занимает 4 шага и не проходит через занятый тайл
        assert_eq!(path.len(), 4);
        assert!(!path.contains(&IVec2::new(1, 0)));
        assert_eq!(path.last(), Some(&IVec2::new(2, 0)));

        // Маршрут BFS всегда проходит валидацию
        assert!(plan_route(IVec2::ZERO, IVec2::new(2, 0), path, 4).is_ok());
    }

    #[test]
    fn test_blocked_destination_unreachable() {
        let path = GridPathfinder::default().find_path(&request(
            IVec2::ZERO,
            IVec2::new(2, 0),
            vec![IVec2::new(2, 0)],
        ));
        assert!(path.is_empty());
    }

    #[test]
    fn test_ignore_overrides_avoid() {
        let mut req = request(IVec2::ZERO, IVec2::new(2, 0), vec![IVec2::new(2, 0)]);
        req.ignore = vec![IVec2::new(2, 0)];
        let path = GridPathfinder::default().find_path(&req);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_enclosed_origin_unreachable() {
        let walls = vec![
            IVec2::new(0, -1),
            IVec2::new(0, 1),
            IVec2::new(-1, 0),
            IVec2::new(1, 0),
        ];
        let finder = GridPathfinder { search_radius: 8 };
        let path = finder.find_path(&request(IVec2::ZERO, IVec2::new(3, 3), walls));
        assert!(path.is_empty());
    }

    #[test]
    fn test_outside_search_radius() {
        let finder = GridPathfinder { search_radius: 4 };
        let path = finder.find_path(&request(IVec2::ZERO, IVec2::new(5, 0), Vec::new()));
        assert!(path.is_empty());
    }
}
