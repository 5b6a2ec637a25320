//! # Prefix Tree
//!
//! Compressed prefix tree (radix tree) mapping string keys to values, built
//! for the debug console's command registry: insertion with node splitting,
//! exact lookup, and prefix autocomplete served from per-node caches.
//!
//! Storage is a [`NodeArena`] slot block. Because every insertion costs at
//! most two nodes (a split intermediate plus a fresh leaf) and at least one,
//! the tree can answer *exactly* how many more words it can guarantee in the
//! worst case and how many it could fit in the best case - the budgets the
//! console checks before registering command sets.

use thiserror::Error;

use super::node_arena::{NodeArena, NodeIndex, SlotLink};

/// Worst-case node cost of inserting one word: a split intermediate plus
/// the new leaf.
const MAX_NODES_PER_WORD: usize = 2;

/// Errors that can occur while mutating a prefix tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefixTreeError {
    /// Keys must contain at least one character.
    #[error("key must not be empty")]
    EmptyKey,

    /// The node block cannot cover the insertion and growing was not allowed.
    #[error("node arena exhausted: insertion needs {required} free slots, {available} available")]
    ArenaExhausted {
        /// Slots the insertion needs.
        required: usize,
        /// Slots currently free.
        available: usize,
    },
}

/// Result type for prefix-tree operations.
pub type PrefixTreeResult<T> = Result<T, PrefixTreeError>;

/// What a given insertion will do to the tree, determined by a read-only
/// walk before anything is mutated. Failed insertions therefore never leave
/// a partially built path behind.
#[derive(Clone, Copy, Debug)]
enum InsertPlan {
    /// The key's node already exists; set or overwrite its value in place.
    SetValue { node: NodeIndex },
    /// Attach a fresh leaf under `parent` holding `key[suffix_start..]`.
    AttachLeaf {
        parent: NodeIndex,
        suffix_start: usize,
    },
    /// Split `child`'s edge after `prefix_len` bytes; the key ends exactly
    /// at the new intermediate node.
    SplitAsPrefix { child: NodeIndex, prefix_len: usize },
    /// Split `child`'s edge after `prefix_len` bytes and attach the key's
    /// unmatched remainder as a second child of the intermediate.
    SplitWithLeaf {
        child: NodeIndex,
        prefix_len: usize,
        suffix_start: usize,
    },
}

impl InsertPlan {
    /// Exact number of arena slots the plan consumes.
    fn node_cost(self) -> usize {
        match self {
            Self::SetValue { .. } => 0,
            Self::AttachLeaf { .. } | Self::SplitAsPrefix { .. } => 1,
            Self::SplitWithLeaf { .. } => 2,
        }
    }
}

/// A map from string keys to values that can list every stored key sharing
/// a given prefix without walking the tree.
///
/// Nodes live in a single arena block sized for an exact word budget:
/// reserving space for `n` words allocates `2 * n + 1` slots (every word
/// may split an edge in the worst case, plus the root). [`Self::insert`]
/// grows the block when the worst case for one more word no longer fits;
/// [`Self::insert_rigid`] refuses instead, for callers that pre-reserved at
/// startup and want the allocation to stay put.
///
/// ```rust
/// use vermilion_core::PrefixTree;
///
/// let mut tree: PrefixTree<i32> = PrefixTree::with_reserve(5);
/// assert_eq!(tree.min_capacity(), 5);
/// assert_eq!(tree.max_capacity(), 10);
///
/// assert!(tree.insert("spawn", 1));
/// assert_eq!(tree.find("spawn"), Some(&1));
/// ```
pub struct PrefixTree<V> {
    arena: NodeArena<V>,
    num_words: usize,
}

impl<V> PrefixTree<V> {
    /// Creates an empty tree without allocating the node block.
    ///
    /// The block is allocated lazily on the first [`Self::reserve`] or
    /// [`Self::insert`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            num_words: 0,
        }
    }

    /// Creates a tree that can hold `words` words even if every insertion
    /// splits an edge.
    ///
    /// Equivalent to [`Self::new`] followed by [`Self::reserve`].
    #[must_use]
    pub fn with_reserve(words: usize) -> Self {
        let mut tree = Self::new();
        tree.ensure_slots_for(words);
        tree
    }

    /// Ensures `words` words are guaranteed insertable in the worst case.
    ///
    /// Grows the node block to `2 * words + 1` slots if the current block
    /// is smaller; never shrinks and never disturbs stored words. Growing
    /// invalidates nothing observable - only internal node indices, which
    /// are not exposed.
    ///
    /// Returns true if `min_capacity() >= words` afterwards.
    pub fn reserve(&mut self, words: usize) -> bool {
        self.ensure_slots_for(words);
        self.min_capacity() >= words
    }

    /// Number of complete words currently stored.
    #[inline]
    #[must_use]
    pub fn num_words(&self) -> usize {
        self.num_words
    }

    /// Returns true if no words are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_words == 0
    }

    /// Words guaranteed insertable even if every one of them splits an
    /// edge: `num_words + remaining_free / 2`, exactly.
    #[inline]
    #[must_use]
    pub fn min_capacity(&self) -> usize {
        self.num_words + self.remaining_free() / 2
    }

    /// Words storable if no future insertion splits an edge:
    /// `num_words + remaining_free`, exactly.
    #[inline]
    #[must_use]
    pub fn max_capacity(&self) -> usize {
        self.num_words + self.remaining_free()
    }

    /// Inserts a key-value pair, growing the node block if the worst case
    /// for one more word no longer fits.
    ///
    /// Inserting a key that is already stored overwrites its value and
    /// changes no count.
    ///
    /// # Errors
    ///
    /// [`PrefixTreeError::EmptyKey`] for an empty key; the tree is
    /// unchanged on any error.
    pub fn try_insert(&mut self, key: &str, value: V) -> PrefixTreeResult<()> {
        if key.is_empty() {
            return Err(PrefixTreeError::EmptyKey);
        }
        if self.remaining_free() < MAX_NODES_PER_WORD {
            self.ensure_slots_for(self.num_words + 1);
        }
        let plan = self.plan_insert(key);
        self.execute_plan(plan, key, value)
    }

    /// Inserts a key-value pair without ever growing the node block.
    ///
    /// The insertion is priced by a read-only walk first and refused
    /// outright if the free-slot budget cannot cover it, so a failed call
    /// leaves the tree untouched.
    ///
    /// # Errors
    ///
    /// [`PrefixTreeError::EmptyKey`] for an empty key;
    /// [`PrefixTreeError::ArenaExhausted`] when the free budget is short.
    pub fn try_insert_rigid(&mut self, key: &str, value: V) -> PrefixTreeResult<()> {
        if key.is_empty() {
            return Err(PrefixTreeError::EmptyKey);
        }
        if !self.arena.has_block() {
            return Err(PrefixTreeError::ArenaExhausted {
                required: 1,
                available: 0,
            });
        }
        let plan = self.plan_insert(key);
        let required = plan.node_cost();
        let available = self.remaining_free();
        if required > available {
            return Err(PrefixTreeError::ArenaExhausted {
                required,
                available,
            });
        }
        self.execute_plan(plan, key, value)
    }

    /// Boolean form of [`Self::try_insert`] for the console call sites.
    pub fn insert(&mut self, key: &str, value: V) -> bool {
        self.try_insert(key, value).is_ok()
    }

    /// Boolean form of [`Self::try_insert_rigid`].
    pub fn insert_rigid(&mut self, key: &str, value: V) -> bool {
        self.try_insert_rigid(key, value).is_ok()
    }

    /// Returns true if a word is stored at exactly this key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Returns the value stored at the key, or `None` if the key is not a
    /// stored word (a partial edge match counts as absent).
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&V> {
        self.find_node(key)
            .and_then(|node| self.arena.node(node).word_value.as_ref())
    }

    /// Returns the value stored at the key.
    ///
    /// Reaching for a missing key is a programming error; call
    /// [`Self::contains`] or [`Self::find`] first when absence is expected.
    ///
    /// # Panics
    ///
    /// Panics if no word is stored at the key.
    #[must_use]
    pub fn at(&self, key: &str) -> &V {
        match self.find(key) {
            Some(value) => value,
            None => panic!("no word stored at key {key:?}"),
        }
    }

    /// Lists the full key of every stored word starting with `prefix`, in
    /// lexicographic order.
    ///
    /// Served from the descendant-word cache of the node covering the
    /// prefix - no subtree walk, which is what makes per-keystroke console
    /// autocomplete cheap. The empty prefix lists every word.
    pub fn words_with_prefix(&self, prefix: &str) -> impl Iterator<Item = &str> + '_ {
        self.prefix_node(prefix)
            .into_iter()
            .flat_map(|node| {
                self.arena
                    .node(node)
                    .descendant_words
                    .iter()
                    .map(String::as_str)
            })
    }

    /// Free slots available to future insertions (root excluded).
    fn remaining_free(&self) -> usize {
        self.arena
            .capacity()
            .saturating_sub(1 + self.used_nodes())
    }

    /// Live non-root nodes.
    fn used_nodes(&self) -> usize {
        self.arena.active_count().saturating_sub(1)
    }

    /// Grows the block to the exact worst-case slot count for `words`.
    fn ensure_slots_for(&mut self, words: usize) {
        let required = words * MAX_NODES_PER_WORD + 1;
        if required > self.arena.capacity() {
            self.arena.grow(required);
        }
    }

    /// Read-only walk classifying what inserting `key` would do.
    ///
    /// Requires a non-empty key and an allocated block.
    fn plan_insert(&self, key: &str) -> InsertPlan {
        let mut current = NodeIndex::ROOT;
        let mut offset = 0;
        while offset < key.len() {
            let suffix = &key[offset..];
            let first = leading_char(suffix);
            let Some(&child) = self.arena.node(current).children.get(&first) else {
                return InsertPlan::AttachLeaf {
                    parent: current,
                    suffix_start: offset,
                };
            };
            let edge = &self.arena.node(child).diverging_key;
            let prefix_len = common_prefix_len(suffix, edge);
            if prefix_len == edge.len() {
                if prefix_len == suffix.len() {
                    return InsertPlan::SetValue { node: child };
                }
                // Edge fully matched with key left over: keep descending.
                current = child;
                offset += prefix_len;
            } else if prefix_len == suffix.len() {
                return InsertPlan::SplitAsPrefix { child, prefix_len };
            } else {
                return InsertPlan::SplitWithLeaf {
                    child,
                    prefix_len,
                    suffix_start: offset,
                };
            }
        }
        InsertPlan::SetValue { node: current }
    }

    /// Applies a plan. The caller has already secured the slot budget, so
    /// exhaustion mid-plan is unreachable; it is still unwound without a
    /// trace if it ever happens.
    fn execute_plan(&mut self, plan: InsertPlan, key: &str, value: V) -> PrefixTreeResult<()> {
        match plan {
            InsertPlan::SetValue { node } => {
                let was_word = self.arena.node(node).is_word();
                self.arena.node_mut(node).word_value = Some(value);
                if !was_word {
                    self.num_words += 1;
                    self.cache_word(node, key);
                }
                Ok(())
            }
            InsertPlan::AttachLeaf {
                parent,
                suffix_start,
            } => {
                let available = self.remaining_free();
                let Some(leaf) = self.arena.allocate() else {
                    return Err(PrefixTreeError::ArenaExhausted {
                        required: 1,
                        available,
                    });
                };
                let suffix = &key[suffix_start..];
                let first = leading_char(suffix);
                {
                    let node = self.arena.node_mut(leaf);
                    node.diverging_key = suffix.to_owned();
                    node.full_key = key.to_owned();
                    node.word_value = Some(value);
                    node.link = SlotLink::Parent(parent);
                }
                self.arena.node_mut(parent).children.insert(first, leaf);
                self.num_words += 1;
                self.cache_word(leaf, key);
                Ok(())
            }
            InsertPlan::SplitAsPrefix { child, prefix_len } => {
                let available = self.remaining_free();
                let Some(mid) = self.arena.allocate() else {
                    return Err(PrefixTreeError::ArenaExhausted {
                        required: 1,
                        available,
                    });
                };
                self.splice_intermediate(mid, child, prefix_len);
                self.arena.node_mut(mid).word_value = Some(value);
                self.num_words += 1;
                self.cache_word(mid, key);
                Ok(())
            }
            InsertPlan::SplitWithLeaf {
                child,
                prefix_len,
                suffix_start,
            } => {
                let available = self.remaining_free();
                let Some(mid) = self.arena.allocate() else {
                    return Err(PrefixTreeError::ArenaExhausted {
                        required: 2,
                        available,
                    });
                };
                let Some(leaf) = self.arena.allocate() else {
                    self.arena.release(mid);
                    return Err(PrefixTreeError::ArenaExhausted {
                        required: 2,
                        available,
                    });
                };
                self.splice_intermediate(mid, child, prefix_len);
                let leaf_suffix = &key[suffix_start + prefix_len..];
                let leaf_first = leading_char(leaf_suffix);
                {
                    let node = self.arena.node_mut(leaf);
                    node.diverging_key = leaf_suffix.to_owned();
                    node.full_key = key.to_owned();
                    node.word_value = Some(value);
                    node.link = SlotLink::Parent(mid);
                }
                self.arena.node_mut(mid).children.insert(leaf_first, leaf);
                self.num_words += 1;
                self.cache_word(leaf, key);
                Ok(())
            }
        }
    }

    /// Splices the freshly allocated `mid` node into `child`'s edge:
    /// `mid` takes the first `prefix_len` bytes of the edge and `child`'s
    /// old place under its parent, `child` keeps the remainder and is
    /// re-parented under `mid` with its cached full key recomputed.
    fn splice_intermediate(&mut self, mid: NodeIndex, child: NodeIndex, prefix_len: usize) {
        let parent = self.arena.node(child).parent();
        let edge = self.arena.node(child).diverging_key.clone();
        let prefix = edge[..prefix_len].to_owned();
        let rest = edge[prefix_len..].to_owned();
        let parent_full = self.arena.node(parent).full_key.clone();
        let mid_full = format!("{parent_full}{prefix}");
        let child_full = format!("{mid_full}{rest}");
        let subtree_words = self.arena.node(child).descendant_words.clone();
        let rest_first = leading_char(&rest);
        let prefix_first = leading_char(&prefix);

        {
            let node = self.arena.node_mut(mid);
            node.diverging_key = prefix;
            node.full_key = mid_full;
            node.descendant_words = subtree_words;
            node.children.insert(rest_first, child);
            node.link = SlotLink::Parent(parent);
        }
        {
            let node = self.arena.node_mut(child);
            node.diverging_key = rest;
            node.full_key = child_full;
            node.link = SlotLink::Parent(mid);
        }
        // Same leading character, so this replaces the old child entry.
        self.arena.node_mut(parent).children.insert(prefix_first, mid);
    }

    /// Records `key` in the descendant-word cache of `node` and every
    /// ancestor up to and including the root.
    fn cache_word(&mut self, node: NodeIndex, key: &str) {
        let mut current = node;
        loop {
            let entry = self.arena.node_mut(current);
            entry.descendant_words.insert(key.to_owned());
            let parent = entry.parent();
            if parent.is_null() {
                break;
            }
            current = parent;
        }
    }

    /// Exact-match descent: the node whose full key equals `key`, whether
    /// or not it stores a word.
    fn find_node(&self, key: &str) -> Option<NodeIndex> {
        if !self.arena.has_block() || key.is_empty() {
            return None;
        }
        let mut current = NodeIndex::ROOT;
        let mut offset = 0;
        while offset < key.len() {
            let suffix = &key[offset..];
            let first = leading_char(suffix);
            let &child = self.arena.node(current).children.get(&first)?;
            let edge = &self.arena.node(child).diverging_key;
            if !suffix.starts_with(edge.as_str()) {
                return None;
            }
            offset += edge.len();
            current = child;
        }
        Some(current)
    }

    /// Prefix descent: the shallowest node whose subtree holds every word
    /// starting with `prefix`. The prefix may end partway along an edge.
    fn prefix_node(&self, prefix: &str) -> Option<NodeIndex> {
        if !self.arena.has_block() {
            return None;
        }
        let mut current = NodeIndex::ROOT;
        let mut offset = 0;
        while offset < prefix.len() {
            let suffix = &prefix[offset..];
            let first = leading_char(suffix);
            let &child = self.arena.node(current).children.get(&first)?;
            let edge = &self.arena.node(child).diverging_key;
            if suffix.len() <= edge.len() {
                return edge.starts_with(suffix).then_some(child);
            }
            if !suffix.starts_with(edge.as_str()) {
                return None;
            }
            offset += edge.len();
            current = child;
        }
        Some(current)
    }
}

impl<V> Default for PrefixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// First character of a non-empty edge label or key suffix.
fn leading_char(s: &str) -> char {
    debug_assert!(!s.is_empty(), "edge labels and key suffixes are never empty");
    s.chars().next().unwrap_or('\0')
}

/// Length in bytes of the longest common prefix of two strings, always on
/// a character boundary of both.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|&((_, left), right)| left != right)
        .map_or_else(|| a.len().min(b.len()), |((offset, _), _)| offset)
}
