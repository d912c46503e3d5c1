//! Hash collections used across Tessera.
//!
//! All maps and sets are backed by AHash, which is considerably faster than
//! SipHash for the short string and integer keys the toolkit hashes.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("text-color", 1);
        assert_eq!(map.get("text-color"), Some(&1));
        assert_eq!(map.get("font"), None);
    }

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        assert!(set.insert(7u64));
        assert!(!set.insert(7u64));
    }
}
