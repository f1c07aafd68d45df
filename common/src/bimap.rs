use std::collections::HashMap;
use std::hash::Hash;

/// A one-to-one map kept consistent in both directions.
///
/// Used to track active order/worker pairings: inserting a pair evicts any
/// previous pairing of either side, so neither an order nor a worker can end
/// up bound twice.
#[derive(Debug, Clone, Default)]
pub struct BiMap<K, V> {
    forward: HashMap<K, V>,
    backward: HashMap<V, K>,
}

impl<K, V> BiMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        BiMap {
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }

    pub fn insert(&mut self, k: K, v: V) {
        if let Some(old_v) = self.forward.remove(&k) {
            self.backward.remove(&old_v);
        }
        if let Some(old_k) = self.backward.remove(&v) {
            self.forward.remove(&old_k);
        }
        self.forward.insert(k.clone(), v.clone());
        self.backward.insert(v, k);
    }

    pub fn get_by_key(&self, k: &K) -> Option<&V> {
        self.forward.get(k)
    }

    pub fn get_by_value(&self, v: &V) -> Option<&K> {
        self.backward.get(v)
    }

    pub fn remove_by_key(&mut self, k: &K) -> Option<V> {
        let v = self.forward.remove(k)?;
        self.backward.remove(&v);
        Some(v)
    }

    pub fn remove_by_value(&mut self, v: &V) -> Option<K> {
        let k = self.backward.remove(v)?;
        self.forward.remove(&k);
        Some(k)
    }

    pub fn contains_key(&self, k: &K) -> bool {
        self.forward.contains_key(k)
    }

    pub fn contains_value(&self, v: &V) -> bool {
        self.backward.contains_key(v)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.forward.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.forward.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup_both_directions() {
        let mut map: BiMap<u64, String> = BiMap::new();
        map.insert(1, "a".to_string());
        assert_eq!(map.get_by_key(&1), Some(&"a".to_string()));
        assert_eq!(map.get_by_value(&"a".to_string()), Some(&1));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn inserting_evicts_previous_pairings() {
        let mut map: BiMap<u64, String> = BiMap::new();
        map.insert(1, "a".to_string());
        map.insert(1, "b".to_string());
        assert!(!map.contains_value(&"a".to_string()));
        assert_eq!(map.get_by_key(&1), Some(&"b".to_string()));

        map.insert(2, "b".to_string());
        assert!(!map.contains_key(&1));
        assert_eq!(map.get_by_value(&"b".to_string()), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn remove_clears_both_directions() {
        let mut map: BiMap<u64, String> = BiMap::new();
        map.insert(7, "w".to_string());
        assert_eq!(map.remove_by_key(&7), Some("w".to_string()));
        assert!(!map.contains_value(&"w".to_string()));
        assert!(map.is_empty());
        assert_eq!(map.remove_by_key(&7), None);
    }
}
