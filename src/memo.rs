//! A bounded cache of function results

use indexmap::IndexMap;

use crate::{Function, Value};

/// The arguments of one memoized call
pub type MemoKey = (Function, Option<Value>, Value);

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: usize,
    pub misses: usize,
    pub len: usize,
}

/// A least-recently-used cache of call results
///
/// Entries are kept in use order, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Memo {
    capacity: usize,
    entries: IndexMap<MemoKey, Value>,
    hits: usize,
    misses: usize,
}

impl Memo {
    pub fn new(capacity: usize) -> Self {
        Memo {
            capacity,
            ..Default::default()
        }
    }
    /// Look up a result, marking it as most recently used
    pub fn get(&mut self, key: &MemoKey) -> Option<Value> {
        match self.entries.shift_remove(key) {
            Some(value) => {
                self.hits += 1;
                self.entries.insert(key.clone(), value.clone());
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }
    /// Store a result, evicting the least recently used one if full
    pub fn insert(&mut self, key: MemoKey, value: Value) {
        if self.capacity == 0 {
            return;
        }
        self.entries.shift_remove(&key);
        self.entries.insert(key, value);
        while self.entries.len() > self.capacity {
            self.entries.shift_remove_index(0);
        }
    }
    pub fn clear(&mut self) {
        self.entries.clear();
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits,
            misses: self.misses,
            len: self.entries.len(),
        }
    }
}
