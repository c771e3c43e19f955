//! Copy engine: deep copies with no shared map storage.

use std::hash::Hash;

use crate::map::RecordMap;
use crate::record::Record;

/// Copy a map and every record in it into fresh storage.
pub fn copy_map<K, V>(map: &RecordMap<K, V>) -> RecordMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Record,
{
    let mut copy = RecordMap::with_capacity(map.len());
    for (key, value) in map.iter() {
        copy.insert(key.clone(), value.copy());
    }
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{item, Node, Player};

    #[test]
    fn copy_is_equal() {
        let player = Player::sample();
        assert_eq!(player.copy(), player);
    }

    #[test]
    fn copy_shares_no_map_storage() {
        let player = Player::sample();
        let copy = player.copy();
        assert!(!copy.items.ptr_eq(&player.items));
        assert!(!copy.friends.ptr_eq(&player.friends));
        for key in player.items.keys() {
            assert!(!copy.items.entry_ptr_eq(&player.items, key));
        }
    }

    #[test]
    fn mutating_copy_leaves_original() {
        let player = Player::sample();
        let mut copy = player.copy();
        copy.items.insert(1, item("broken sword", 0));
        copy.items.remove(&2);
        copy.stats.wins = 0;

        assert_eq!(player, Player::sample());
        assert_eq!(player.items.get(&1), Some(&item("sword", 1)));
    }

    #[test]
    fn copy_recurses_into_map_values() {
        let mut leaf = Node::named("leaf");
        leaf.children.insert(1, Node::named("grandchild"));
        let mut root = Node::named("root");
        root.children.insert(1, leaf);

        let copy = root.copy();
        let original_child = root.children.get(&1).unwrap();
        let copied_child = copy.children.get(&1).unwrap();
        assert_eq!(original_child, copied_child);
        assert!(!copied_child.children.ptr_eq(&original_child.children));
    }

    #[test]
    fn empty_map_copy() {
        let map: RecordMap<u32, Player> = RecordMap::new();
        assert!(copy_map(&map).is_empty());
    }
}
