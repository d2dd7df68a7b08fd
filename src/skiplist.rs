//! A sorted map over a multi-level linked structure.
//!
//! Every node carries one forward link per level it participates in; level 0
//! links every node, higher levels skip ahead. Search, insert, and remove all
//! share one top-down descent, so they agree on the position a key occupies.
//! Nodes are stored in an [`Arena`](crate::arena::Arena) and linked by
//! [`Handle`](crate::arena::Handle) rather than by pointer; the sentinel head
//! is not a node at all but a tower of `max_level` entry links owned by the
//! list, so "before everything" never needs a runtime flag.

use std::borrow::Borrow;
use std::fmt;
use std::mem;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::arena::{Arena, Handle};

/// Default ceiling on node height.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Default probability that a node grows by one more level.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Rejected construction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// `max_level` must be at least 1.
    MaxLevel(usize),
    /// `probability` must lie strictly between 0 and 1.
    Probability(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MaxLevel(max_level) => {
                write!(f, "max_level must be at least 1, got {max_level}")
            }
            ConfigError::Probability(p) => {
                write!(f, "probability must lie in (0, 1), got {p}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// A position during a descent: a node, or `None` for the sentinel head,
/// which orders before every key by construction.
type Link = Option<Handle>;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    /// One link per level this node participates in; `forward.len()` is the
    /// node's height, so a node present at level L is present at every level
    /// below it simply because those slots exist.
    forward: Vec<Link>,
}

/// An ordered map implemented as a skip list.
#[derive(Debug)]
pub struct SkipList<K, V> {
    /// The sentinel tower: `max_level` slots, each the first node of its level.
    head: Vec<Link>,
    nodes: Arena<Node<K, V>>,
    max_level: usize,
    probability: f64,
    /// Highest level currently in use. At least 1, even when empty.
    level: usize,
    rng: StdRng,
}

impl<K, V> SkipList<K, V> {
    /// Instantiates a new, empty [SkipList](SkipList) with the default
    /// height ceiling and growth probability.
    pub fn new() -> Self {
        Self::build(DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY)
    }

    /// Instantiates a new, empty [SkipList](SkipList) with an explicit
    /// height ceiling and growth probability.
    ///
    /// `max_level` bounds every node's height and so bounds per-operation
    /// work to `O(max_level)` level descents. `probability` is the chance a
    /// node's tower grows by one more level.
    pub fn with_config(max_level: usize, probability: f64) -> Result<Self, ConfigError> {
        if max_level < 1 {
            return Err(ConfigError::MaxLevel(max_level));
        }
        // NaN fails both comparisons and lands here as well.
        if !(probability > 0.0 && probability < 1.0) {
            return Err(ConfigError::Probability(probability));
        }
        Ok(Self::build(max_level, probability))
    }

    fn build(max_level: usize, probability: f64) -> Self {
        SkipList {
            head: vec![None; max_level],
            nodes: Arena::new(),
            max_level,
            probability,
            level: 1,
            rng: StdRng::from_entropy(),
        }
    }

    /// Number of entries in the list.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Highest level currently in use. Grows as inserts draw taller nodes
    /// and shrinks as removals empty the top levels; 1 on an empty list.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The configured ceiling on node height.
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    fn next(&self, at: Link, level: usize) -> Link {
        match at {
            None => self.head[level],
            Some(id) => self.nodes[id].forward[level],
        }
    }

    fn entry(&self, id: Handle) -> Entry<'_, K, V> {
        let node = &self.nodes[id];
        Entry {
            key: &node.key,
            value: &node.value,
        }
    }

    /// The entry with the smallest key.
    pub fn first(&self) -> Option<Entry<'_, K, V>> {
        self.head[0].map(|id| self.entry(id))
    }

    /// The entry with the largest key, found by riding each level as far
    /// right as it goes before dropping down.
    pub fn last(&self) -> Option<Entry<'_, K, V>> {
        let mut at: Link = None;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next(at, level) {
                at = Some(next);
            }
        }
        at.map(|id| self.entry(id))
    }

    /// The keys reachable along one level's forward chain, in order.
    ///
    /// Diagnostic view of the internal topology; level 0 lists every entry.
    /// Levels at or above [`level`](Self::level) are empty.
    pub fn level_keys(&self, level: usize) -> Vec<&K> {
        let mut keys = Vec::new();
        if level >= self.max_level {
            return keys;
        }

        let mut at = self.head[level];
        while let Some(id) = at {
            let node = &self.nodes[id];
            keys.push(&node.key);
            at = node.forward[level];
        }
        keys
    }

    /// Draws a node height on 1..=max_level, geometrically distributed:
    /// each extra level is reached with chance `probability`.
    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen::<f64>() < self.probability {
            level += 1;
        }
        level
    }
}

impl<K, V> SkipList<K, V>
where
    K: Ord,
{
    /// The shared descent behind every operation. Walks from the top
    /// occupied level down to 0, moving forward while the next node's key is
    /// strictly below the target, and records the last position held before
    /// each drop. Slot `l` of the result is the strict predecessor of `key`
    /// at level `l` (`None` for the head); slots at or above the current
    /// level stay at the head.
    fn find_predecessors(&self, key: &K) -> Vec<Link> {
        let mut preds: Vec<Link> = vec![None; self.max_level];
        let mut at: Link = None;

        for level in (0..self.level).rev() {
            while let Some(next) = self.next(at, level) {
                if self.nodes[next].key < *key {
                    at = Some(next);
                } else {
                    break;
                }
            }
            preds[level] = at;
        }
        preds
    }

    /// Looks up a key. Absence is an ordinary outcome, not an error.
    ///
    /// The returned [Entry](Entry) borrows the list, so it cannot outlive
    /// the next mutation.
    pub fn get(&self, key: &K) -> Option<Entry<'_, K, V>> {
        let preds = self.find_predecessors(key);
        let id = self.next(preds[0], 0)?;

        if self.nodes[id].key == *key {
            Some(self.entry(id))
        } else {
            None
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts a key-value pair, or replaces the value in place if the key
    /// is already present. Returns the displaced value, `None` for a fresh
    /// insert. A replacement changes no links and no heights, so a key
    /// never has more than one entry.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let preds = self.find_predecessors(&key);

        if let Some(id) = self.next(preds[0], 0) {
            let node = &mut self.nodes[id];
            if node.key == key {
                return Some(mem::replace(&mut node.value, value));
            }
        }

        let height = self.random_level();
        if height > self.level {
            // preds above the old level already name the head, which is the
            // only tower reaching the freshly exposed levels
            self.level = height;
        }

        // the node is allocated before any link changes, so a failed
        // allocation leaves the list exactly as it was
        let id = self.nodes.insert(Node {
            key,
            value,
            forward: vec![None; height],
        });

        for level in 0..height {
            let succ = self.next(preds[level], level);
            self.nodes[id].forward[level] = succ;
            match preds[level] {
                Some(pred) => self.nodes[pred].forward[level] = Some(id),
                None => self.head[level] = Some(id),
            }
        }

        None
    }

    /// Removes a key's entry, returning the key and value if one existed.
    /// Removing an absent key mutates nothing.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let preds = self.find_predecessors(key);
        let id = self.next(preds[0], 0)?;
        if self.nodes[id].key != *key {
            return None;
        }

        // relink only the levels the node occupies; its absence above its
        // own height never disturbed those chains
        let height = self.nodes[id].forward.len();
        for level in 0..height {
            let succ = self.nodes[id].forward[level];
            match preds[level] {
                Some(pred) => self.nodes[pred].forward[level] = succ,
                None => self.head[level] = succ,
            }
        }

        // drop empty top levels so later descents start where data is;
        // levels above the old top were already empty, no need to scan from
        // max_level
        while self.level > 1 && self.head[self.level - 1].is_none() {
            self.level -= 1;
        }

        let node = self.nodes.remove(id)?;
        Some((node.key, node.value))
    }
}

impl<K, V> Default for SkipList<K, V> {
    fn default() -> Self {
        SkipList::new()
    }
}

/// Per-level dump of the whole structure, one line per occupied level from
/// the top down, each chain closed by an explicit `nil`.
impl<K, V> fmt::Display for SkipList<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in (0..self.level).rev() {
            write!(f, "[{level}] head")?;

            let mut at = self.head[level];
            while let Some(id) = at {
                let node = &self.nodes[id];
                write!(f, " -> {:?}:{:?}", node.key, node.value)?;
                at = node.forward[level];
            }

            writeln!(f, " -> nil")?;
        }
        Ok(())
    }
}

/// A borrowed view of one entry, valid until the next mutation of the list.
pub struct Entry<'a, K, V> {
    key: &'a K,
    value: &'a V,
}

impl<'a, K, V> Entry<'a, K, V> {
    pub fn key(&self) -> &K {
        self.key
    }

    pub fn value(&self) -> &V {
        self.value
    }
}

impl<'a, K, V> Borrow<K> for Entry<'a, K, V> {
    fn borrow(&self) -> &K {
        self.key
    }
}

impl<'a, K, V> AsRef<V> for Entry<'a, K, V> {
    fn as_ref(&self) -> &V {
        self.value
    }
}

impl<'a, K, V> fmt::Debug for Entry<'a, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry {{ key: {:?}, value: {:?} }}", self.key, self.value)
    }
}
