/// Keeping collections of rectangles minimal
///
/// The same algorithm runs on grid blocks (cell coordinates) and on screen
/// rectangles (pixels), so both implement [`Mergeable`].
use crate::block::Block;
use log::trace;

/// A rectangle that can be compared and combined with its peers
pub trait Mergeable: Copy + PartialEq + std::fmt::Debug {
    /// True if `other` lies entirely within `self`
    fn covers(&self, other: &Self) -> bool;

    /// The union of the two shapes, if that union is a single rectangle
    fn try_union(&self, other: &Self) -> Option<Self>;
}

impl Mergeable for Block {
    fn covers(&self, other: &Self) -> bool {
        self.contains(other)
    }

    fn try_union(&self, other: &Self) -> Option<Self> {
        Block::try_union(self, other)
    }
}

/// Make `new` part of `items`.
///
/// Returns `false` without touching `items` if an existing element already
/// covers `new`. Otherwise every element covered by `new` is dropped and
/// `new` is appended, becoming the last element.
///
/// Coverage by the union of several elements is not detected, so redundant
/// overlapping elements can survive until a later merge removes them.
pub fn merge_or_add<T: Mergeable>(items: &mut Vec<T>, new: T) -> bool {
    if items.iter().any(|item| item.covers(&new)) {
        trace!("{:?} already covered, not added", new);
        return false;
    }

    items.retain(|item| !new.covers(item));
    items.push(new);
    true
}

/// Replace mergeable pairs with their union until no pair is left.
///
/// Elements covered by another element are dropped along the way. The
/// survivor of each merge takes the later of the two positions, so the last
/// element keeps its role as the most recent one.
pub fn merge_adjacent<T: Mergeable>(items: &mut Vec<T>) {
    'scan: loop {
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                if let Some(union) = items[i].try_union(&items[j]) {
                    trace!("merging {:?} and {:?} into {:?}", items[i], items[j], union);
                    items[j] = union;
                    items.remove(i);
                    continue 'scan;
                }
            }
        }
        break;
    }
}

/// Check that no element covers or can be merged with another
pub fn is_minimal<T: Mergeable>(items: &[T]) -> bool {
    items.iter().enumerate().all(|(i, a)| {
        items[i + 1..].iter().all(|b| a.try_union(b).is_none())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_merge_or_add_appends_disjoint_block() {
        let mut blocks = vec![Block::new(0, 0, 1, 1)];
        assert!(merge_or_add(&mut blocks, Block::new(5, 5, 6, 6)));
        assert_eq!(blocks, vec![Block::new(0, 0, 1, 1), Block::new(5, 5, 6, 6)]);
    }

    #[test]
    fn test_merge_or_add_skips_covered_block() {
        let mut blocks = vec![Block::new(0, 0, 10, 10), Block::new(20, 20, 21, 21)];
        assert!(!merge_or_add(&mut blocks, Block::new(3, 3, 5, 5)));
        assert_eq!(blocks, vec![Block::new(0, 0, 10, 10), Block::new(20, 20, 21, 21)]);
    }

    #[test]
    fn test_merge_or_add_same_block_twice() {
        let mut blocks = Vec::new();
        assert!(merge_or_add(&mut blocks, Block::new(1, 1, 2, 2)));
        assert!(!merge_or_add(&mut blocks, Block::new(1, 1, 2, 2)));
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_merge_or_add_absorbs_contained_blocks() {
        let mut blocks = vec![
            Block::new(1, 1, 1, 1),
            Block::new(30, 30, 31, 31),
            Block::new(2, 2, 3, 3),
        ];
        assert!(merge_or_add(&mut blocks, Block::new(0, 0, 5, 5)));
        assert_eq!(blocks, vec![Block::new(30, 30, 31, 31), Block::new(0, 0, 5, 5)]);
    }

    #[test]
    fn test_merge_or_add_ignores_union_coverage() {
        // Two halves together cover the new block but neither does alone
        let mut blocks = vec![Block::new(0, 0, 1, 4), Block::new(2, 0, 3, 4)];
        assert!(merge_or_add(&mut blocks, Block::new(1, 1, 2, 2)));
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn test_merge_adjacent_chain() {
        let mut blocks = vec![
            Block::new(0, 0, 0, 0),
            Block::new(0, 2, 0, 2),
            Block::new(0, 1, 0, 1),
        ];
        merge_adjacent(&mut blocks);
        assert_eq!(blocks, vec![Block::new(0, 0, 0, 2)]);
    }

    #[test]
    fn test_merge_adjacent_keeps_last_element_last() {
        let mut blocks = vec![
            Block::new(0, 0, 3, 0),
            Block::new(10, 10, 10, 10),
            Block::new(0, 1, 3, 1),
        ];
        merge_adjacent(&mut blocks);
        assert_eq!(blocks, vec![Block::new(10, 10, 10, 10), Block::new(0, 0, 3, 1)]);
    }

    #[test]
    fn test_merge_adjacent_result_is_order_independent() {
        let blocks = [
            Block::new(0, 0, 1, 1),
            Block::new(0, 2, 1, 3),
            Block::new(2, 0, 3, 3),
            Block::new(7, 7, 8, 8),
        ];
        let mut forward = blocks.to_vec();
        let mut backward: Vec<_> = blocks.iter().rev().copied().collect();
        merge_adjacent(&mut forward);
        merge_adjacent(&mut backward);

        let forward: HashSet<_> = forward.into_iter().collect();
        let backward: HashSet<_> = backward.into_iter().collect();
        assert_eq!(forward, backward);
        assert!(forward.contains(&Block::new(0, 0, 3, 3)));
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn test_is_minimal() {
        assert!(is_minimal(&[Block::new(0, 0, 0, 0), Block::new(2, 2, 2, 2)]));
        assert!(!is_minimal(&[Block::new(0, 0, 0, 0), Block::new(0, 1, 0, 1)]));
        assert!(!is_minimal(&[Block::new(0, 0, 5, 5), Block::new(1, 1, 1, 1)]));
    }
}
