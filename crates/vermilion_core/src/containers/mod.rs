//! # Containers
//!
//! Pre-allocated container types for engine systems that must not grow
//! behind the caller's back.
//!
//! ## Design Philosophy
//!
//! Capacity is requested up front and accounted for exactly. A container
//! reports how many more entries it can *guarantee* (worst case) and how
//! many it could hold if every future entry is cheap (best case), so
//! callers can reserve once at startup and insert with confidence.

mod node_arena;
mod prefix_tree;

pub use prefix_tree::{PrefixTree, PrefixTreeError, PrefixTreeResult};
