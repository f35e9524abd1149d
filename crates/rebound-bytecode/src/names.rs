//! Capture group name table.
//!
//! Names map to one or more group indices (duplicate names are allowed).
//! Compiled backreferences and conditions refer to a name by its hash, so
//! the table also keeps `(hash, index)` pairs sorted for range lookup.

use indexmap::IndexMap;

/// Hash stored in nodes that refer to a group by name.
pub fn hash_name(name: &str) -> u32 {
    crc32fast::hash(name.as_bytes())
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameTable {
    by_name: IndexMap<String, Vec<u32>>,
    by_hash: Vec<(u32, u32)>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` for group `index`. Indices per name stay ascending
    /// as long as groups are registered in pattern order.
    pub fn insert(&mut self, name: &str, index: u32) {
        let indices = self.by_name.entry(name.to_owned()).or_default();
        if !indices.contains(&index) {
            indices.push(index);
        }
        let key = (hash_name(name), index);
        if let Err(pos) = self.by_hash.binary_search(&key) {
            self.by_hash.insert(pos, key);
        }
    }

    /// Group indices declared with `name`, leftmost first.
    pub fn lookup(&self, name: &str) -> &[u32] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Group indices whose name hashes to `hash`, ascending.
    pub fn equal_range(&self, hash: u32) -> impl Iterator<Item = u32> + '_ {
        let lo = self.by_hash.partition_point(|&(h, _)| h < hash);
        let hi = self.by_hash.partition_point(|&(h, _)| h <= hash);
        self.by_hash[lo..hi].iter().map(|&(_, index)| index)
    }

    pub fn contains_hash(&self, hash: u32) -> bool {
        self.equal_range(hash).next().is_some()
    }

    /// First declared name of group `index`.
    pub fn name_of(&self, index: u32) -> Option<&str> {
        self.by_name
            .iter()
            .find(|(_, indices)| indices.contains(&index))
            .map(|(name, _)| name.as_str())
    }

    /// Names in declaration order with their group indices.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.by_name
            .iter()
            .map(|(name, indices)| (name.as_str(), indices.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
