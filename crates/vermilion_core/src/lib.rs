//! # VERMILION Core
//!
//! Containers and memory primitives for the VERMILION 2D engine:
//! - Compressed prefix tree over an arena-backed node block, used by the
//!   debug console for command storage and autocomplete
//! - Exact word-capacity accounting (pessimistic and optimistic budgets)
//!
//! ## Architecture Rules
//!
//! 1. **One block, many nodes** - tree nodes live in a single pre-allocated
//!    slot block threaded by a free list, never in individual heap cells
//! 2. **Stable indices, not pointers** - node relationships are integer slot
//!    indices, so growing the block is a rebuild with index fixup rather
//!    than a dangling-pointer hazard
//! 3. **Single-threaded by contract** - callers serialize access externally
//!
//! ## Example
//!
//! ```rust
//! use vermilion_core::PrefixTree;
//!
//! let mut commands: PrefixTree<u32> = PrefixTree::with_reserve(8);
//! commands.insert("render.wireframe", 0);
//! commands.insert("render.stats", 1);
//!
//! assert!(commands.contains("render.stats"));
//! let matches: Vec<&str> = commands.words_with_prefix("render.").collect();
//! assert_eq!(matches, ["render.stats", "render.wireframe"]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod containers;

pub use containers::{PrefixTree, PrefixTreeError, PrefixTreeResult};
