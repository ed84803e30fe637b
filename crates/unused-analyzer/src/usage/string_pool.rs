use std::collections::HashMap;
use std::sync::Arc;

/// Dense handle to an interned string. Handles are issued in insertion
/// order and stay valid for the pool's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrId(u32);

impl StrId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Content-addressed intern pool.
///
/// Locations are compared and set-tested far more often than they are read
/// back, so they collapse to integer handles: equal bytes always map to the
/// same handle. There is no eviction.
#[derive(Debug, Default)]
pub struct StringPool {
    index: HashMap<Arc<str>, StrId>,
    items: Vec<Arc<str>>,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, returning the existing handle when the exact bytes are
    /// already present.
    pub fn intern(&mut self, s: &str) -> StrId {
        if let Some(&id) = self.index.get(s) {
            return id;
        }
        let id = StrId(self.items.len() as u32);
        let stored: Arc<str> = Arc::from(s);
        self.items.push(Arc::clone(&stored));
        self.index.insert(stored, id);
        id
    }

    pub fn get(&self, id: StrId) -> &str {
        &self.items[id.index()]
    }

    pub fn contains(&self, s: &str) -> bool {
        self.index.contains_key(s)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Enumerate every distinct handle with its content, in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (StrId, &str)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, s)| (StrId(i as u32), &**s))
    }
}

#[cfg(test)]
#[path = "../../tests/src/usage/string_pool_tests.rs"]
mod tests;
