//! Tests for movement range enumeration.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use bevy::prelude::*;

    use crate::range::{compute_reachable_offsets, reachable_count, Quadrant, RangeTileKind};

    fn distance(offset: IVec2) -> u32 {
        offset.x.unsigned_abs() + offset.y.unsigned_abs()
    }

    #[test]
    fn test_count_matches_manhattan_ball() {
        for cap in 0..=12 {
            let tiles = compute_reachable_offsets(cap);
            assert_eq!(tiles.len(), reachable_count(cap), "cap = {}", cap);
        }
        assert_eq!(reachable_count(4), 41);
    }

    #[test]
    fn test_no_duplicates() {
        for cap in 0..=12 {
            let tiles = compute_reachable_offsets(cap);
            let unique: HashSet<IVec2> = tiles.iter().map(|tile| tile.offset).collect();
            assert_eq!(unique.len(), tiles.len(), "cap = {}", cap);
        }
    }

    #[test]
    fn test_exactly_the_ball() {
        for cap in 0..=8 {
            let tiles: HashSet<IVec2> = compute_reachable_offsets(cap)
                .iter()
                .map(|tile| tile.offset)
                .collect();
            let c = cap as i32;
            for dx in -c - 1..=c + 1 {
                for dy in -c - 1..=c + 1 {
                    let offset = IVec2::new(dx, dy);
                    assert_eq!(
                        tiles.contains(&offset),
                        distance(offset) <= cap,
                        "cap = {}, offset = {}",
                        cap,
                        offset
                    );
                }
            }
        }
    }

    #[test]
    fn test_border_and_fill_kinds() {
        for cap in 1..=8 {
            for tile in compute_reachable_offsets(cap) {
                match tile.kind {
                    RangeTileKind::Border => assert_eq!(distance(tile.offset), cap),
                    RangeTileKind::Fill => {
                        let d = distance(tile.offset);
                        assert!(d > 0 && d < cap, "fill {} at cap {}", tile.offset, cap);
                    }
                    RangeTileKind::Origin => assert_eq!(tile.offset, IVec2::ZERO),
                }
            }
        }
    }

    #[test]
    fn test_zero_cap_is_single_border_tile() {
        let tiles = compute_reachable_offsets(0);
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].offset, IVec2::ZERO);
        assert_eq!(tiles[0].kind, RangeTileKind::Border);
    }

    #[test]
    fn test_origin_emitted_once_outside_fill() {
        let tiles = compute_reachable_offsets(3);
        let origins: Vec<_> = tiles
            .iter()
            .filter(|tile| tile.offset == IVec2::ZERO)
            .collect();
        assert_eq!(origins.len(), 1);
        assert_eq!(origins[0].kind, RangeTileKind::Origin);
        assert_eq!(origins[0].quadrant, None);
    }

    #[test]
    fn test_quadrant_signs() {
        for tile in compute_reachable_offsets(5) {
            let IVec2 { x, y } = tile.offset;
            match tile.quadrant {
                Some(Quadrant::UpperLeft) => assert!(x <= 0 && y <= 0),
                Some(Quadrant::LowerLeft) => assert!(x <= 0 && y > 0),
                Some(Quadrant::UpperRight) => assert!(x > 0 && y <= 0),
                Some(Quadrant::LowerRight) => assert!(x > 0 && y > 0),
                None => assert_eq!(tile.offset, IVec2::ZERO),
            }
        }
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(compute_reachable_offsets(6), compute_reachable_offsets(6));
    }
}
