//! # Prefix Tree Model Tests
//!
//! Random command workloads checked against a `BTreeMap` reference model:
//! lookup parity, autocomplete parity, and the exact budget identity after
//! every mutation. The narrow alphabet keeps shared prefixes (and
//! therefore edge splits) frequent.

use std::collections::BTreeMap;

use proptest::prelude::*;
use vermilion_core::PrefixTree;

proptest! {
    #[test]
    fn random_workload_matches_model(keys in prop::collection::vec("[a-d]{1,6}", 1..40)) {
        let mut tree = PrefixTree::new();
        let mut model: BTreeMap<String, usize> = BTreeMap::new();

        for (value, key) in keys.iter().enumerate() {
            prop_assert!(tree.insert(key, value));
            model.insert(key.clone(), value);

            prop_assert_eq!(tree.num_words(), model.len());
            let words = tree.num_words();
            let free = tree.max_capacity() - words;
            prop_assert_eq!(tree.min_capacity(), words + free / 2);
        }

        for key in &keys {
            prop_assert!(tree.contains(key));
            prop_assert_eq!(tree.find(key), model.get(key));
        }

        // Strict prefixes that were never inserted must read as absent.
        for key in &keys {
            let prefix = &key[..key.len() - 1];
            if !prefix.is_empty() && !model.contains_key(prefix) {
                prop_assert!(!tree.contains(prefix));
                prop_assert_eq!(tree.find(prefix), None);
            }
        }

        // Keys outside the generated alphabet are never present.
        prop_assert!(!tree.contains("z"));
        prop_assert_eq!(tree.find("zz"), None);

        // Autocomplete parity for every single-character prefix and the
        // list-everything case.
        for prefix in ["a", "b", "c", "d", ""] {
            let listed: Vec<&str> = tree.words_with_prefix(prefix).collect();
            let expected: Vec<&str> = model
                .keys()
                .filter(|key| key.starts_with(prefix))
                .map(String::as_str)
                .collect();
            prop_assert_eq!(listed, expected);
        }
    }

    #[test]
    fn rigid_insertion_never_grows(keys in prop::collection::vec("[a-b]{1,4}", 1..30)) {
        let mut tree = PrefixTree::with_reserve(4);
        let ceiling = tree.max_capacity();

        for (value, key) in keys.iter().enumerate() {
            let words_before = tree.num_words();
            let admitted = tree.insert_rigid(key, value);

            let words = tree.num_words();
            let free = tree.max_capacity() - words;
            prop_assert_eq!(tree.min_capacity(), words + free / 2);

            if admitted {
                prop_assert!(tree.contains(key));
            } else {
                prop_assert_eq!(tree.num_words(), words_before);
            }
        }

        // The block never grew: stored words plus free slots stay within
        // the original optimistic budget.
        prop_assert!(tree.max_capacity() <= ceiling);
    }
}
