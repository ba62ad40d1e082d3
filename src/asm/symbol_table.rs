//! # Label Table
//!
//! A label resolves to the instruction index it labels. Assembly listings
//! produced by this crate's compiler rarely carry more than a few dozen
//! labels, so — following this workspace's usual tradeoff for small,
//! append-only tables — a linear-scan `Vec` beats a hash map here: no
//! hashing overhead, insertion order preserved for debugging dumps, and the
//! scan cost never materializes at these sizes.

#[derive(Debug, Default)]
pub struct LabelTable {
    entries: Vec<(String, usize)>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `name` was already present (a redefinition).
    pub fn insert(&mut self, name: String, loc: usize) -> bool {
        if self.entries.iter().any(|(n, _)| n == &name) {
            return true;
        }
        self.entries.push((name, loc));
        false
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, loc)| *loc)
    }
}
