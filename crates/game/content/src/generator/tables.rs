//! Per-floor spawn tables.
//!
//! Each table is keyed by the first floor an entry applies to; later entries
//! override earlier ones once their floor is reached.

use game_core::{EnemyKind, ItemKind};
use rand::Rng;

const MAX_ENEMIES_BY_FLOOR: [(u32, u32); 3] = [(1, 2), (4, 3), (6, 5)];

const MAX_ITEMS_BY_FLOOR: [(u32, u32); 2] = [(1, 1), (4, 2)];

const ENEMY_CHANCES: [(u32, EnemyKind, u32); 4] = [
    (0, EnemyKind::Ghost, 80),
    (3, EnemyKind::RedGhost, 15),
    (5, EnemyKind::RedGhost, 30),
    (7, EnemyKind::RedGhost, 60),
];

const ITEM_CHANCES: [(u32, ItemKind, u32); 1] = [(0, ItemKind::HealthPotion, 35)];

fn value_for_floor(table: &[(u32, u32)], floor: u32) -> u32 {
    table
        .iter()
        .take_while(|(minimum, _)| *minimum <= floor)
        .last()
        .map_or(0, |(_, value)| *value)
}

pub(crate) fn max_enemies_per_room(floor: u32) -> u32 {
    value_for_floor(&MAX_ENEMIES_BY_FLOOR, floor)
}

pub(crate) fn max_items_per_room(floor: u32) -> u32 {
    value_for_floor(&MAX_ITEMS_BY_FLOOR, floor)
}

/// Weights in effect on `floor`, one entry per kind.
fn weights_for_floor<K: Copy + PartialEq>(table: &[(u32, K, u32)], floor: u32) -> Vec<(K, u32)> {
    let mut weights: Vec<(K, u32)> = Vec::new();
    for (_, kind, weight) in table.iter().take_while(|(minimum, _, _)| *minimum <= floor) {
        match weights.iter_mut().find(|(existing, _)| existing == kind) {
            Some(entry) => entry.1 = *weight,
            None => weights.push((*kind, *weight)),
        }
    }
    weights
}

fn pick<K: Copy, R: Rng>(rng: &mut R, weights: &[(K, u32)]) -> Option<K> {
    let total: u32 = weights.iter().map(|(_, weight)| weight).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.gen_range(0..total);
    for (kind, weight) in weights {
        if roll < *weight {
            return Some(*kind);
        }
        roll -= weight;
    }
    None
}

pub(crate) fn enemy_weights(floor: u32) -> Vec<(EnemyKind, u32)> {
    weights_for_floor(&ENEMY_CHANCES, floor)
}

pub(crate) fn pick_enemy<R: Rng>(rng: &mut R, floor: u32) -> Option<EnemyKind> {
    pick(rng, &enemy_weights(floor))
}

pub(crate) fn pick_item<R: Rng>(rng: &mut R, floor: u32) -> Option<ItemKind> {
    pick(rng, &weights_for_floor(&ITEM_CHANCES, floor))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn room_caps_grow_with_depth() {
        let enemies: Vec<u32> = (1..=7).map(max_enemies_per_room).collect();
        assert_eq!(enemies, vec![2, 2, 2, 3, 3, 5, 5]);
        let items: Vec<u32> = (1..=5).map(max_items_per_room).collect();
        assert_eq!(items, vec![1, 1, 1, 2, 2]);
    }

    #[test]
    fn red_ghosts_appear_from_floor_three() {
        assert_eq!(enemy_weights(1), vec![(EnemyKind::Ghost, 80)]);
        assert_eq!(enemy_weights(2), vec![(EnemyKind::Ghost, 80)]);
        assert_eq!(
            enemy_weights(4),
            vec![(EnemyKind::Ghost, 80), (EnemyKind::RedGhost, 15)]
        );
        assert_eq!(
            enemy_weights(6),
            vec![(EnemyKind::Ghost, 80), (EnemyKind::RedGhost, 30)]
        );
        assert_eq!(
            enemy_weights(9),
            vec![(EnemyKind::Ghost, 80), (EnemyKind::RedGhost, 60)]
        );
    }

    #[test]
    fn shallow_floors_only_pick_ghosts() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            assert_eq!(pick_enemy(&mut rng, 1), Some(EnemyKind::Ghost));
        }
        assert_eq!(pick_item(&mut rng, 1), Some(ItemKind::HealthPotion));
    }
}
