//! An ordered map implemented as an arena-backed skip list.
//!
//! The purpose of this crate is to provide a sorted associative container with
//! average O(log n) lookup, insertion, and removal, balanced probabilistically
//! rather than by rotation. Nodes live in an index-addressed arena, so the
//! multi-level pointer graph is plain data and teardown is a single drop.
#![warn(rust_2018_idioms, unreachable_pub)]
pub mod arena;
pub mod skiplist;

pub use skiplist::{ConfigError, Entry, SkipList};
