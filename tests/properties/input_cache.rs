//! Property tests for the input path cache.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use blueprint::application::InputPathCache;
use blueprint::domain::ports::ResourceTree;
use blueprint::domain::value_objects::{Glob, ResourcePath};
use blueprint::infrastructure::MemoryTree;

#[derive(Debug, Clone)]
enum Op {
    Create(String),
    Delete(String),
}

fn resource() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("a"), Just("a/b"), Just("c")],
        "[a-d]{1,2}",
        prop_oneof![Just("x"), Just("y")],
    )
        .prop_map(|(dir, stem, ext)| format!("/{dir}/{stem}.{ext}"))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => resource().prop_map(Op::Create),
        1 => resource().prop_map(Op::Delete),
        1 => prop_oneof![Just("/a"), Just("/a/b"), Just("/c")]
            .prop_map(|dir| Op::Delete(dir.to_string())),
    ]
}

fn globs() -> Vec<Glob> {
    vec![Glob::new("a", "**/*.x"), Glob::anywhere("**/*.y")]
}

fn walked(tree: &MemoryTree, glob: &Glob) -> Vec<ResourcePath> {
    let files: BTreeSet<ResourcePath> = tree
        .walk(&ResourcePath::root())
        .unwrap()
        .into_iter()
        .filter(|p| !p.is_under(&ResourcePath::parse("/.internal")))
        .filter(|p| glob.matches(p))
        .collect();
    files.into_iter().collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: after any sequence of creates and deletes applied incrementally,
    /// every glob's cached paths equal what a full walk finds.
    #[test]
    fn property_incremental_cache_matches_full_walk(ops in proptest::collection::vec(op(), 0..24)) {
        let tree = Arc::new(MemoryTree::new());
        let cache = InputPathCache::new(tree.clone(), &ResourcePath::parse("/.internal"), globs());
        cache.rebuild().unwrap();

        for op in ops {
            match op {
                Op::Create(raw) => {
                    let path = ResourcePath::parse(&raw);
                    tree.write(&path, b"").unwrap();
                    cache.add(&path).unwrap();
                }
                Op::Delete(raw) => {
                    let path = ResourcePath::parse(&raw);
                    if tree.exists(&path) {
                        tree.delete(&path).unwrap();
                    }
                    cache.remove(&path).unwrap();
                }
            }
        }

        for glob in globs() {
            prop_assert_eq!(cache.load(&glob), walked(&tree, &glob));
        }
    }
}
