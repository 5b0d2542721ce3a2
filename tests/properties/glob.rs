//! Property tests for glob matching.

use proptest::prelude::*;

use blueprint::domain::value_objects::{Glob, ResourcePath};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-c]{1,3}(\\.(x|y))?").unwrap()
}

fn relative_path() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 1..=4)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: building and matching globs never panics, whatever the pattern.
    #[test]
    fn property_glob_never_panics(
        root in "(?s).{0,32}",
        pattern in "(?s).{0,64}",
        path in "(?s).{0,64}",
    ) {
        let glob = Glob::new(&root, &pattern);
        let _ = glob.matches(&ResourcePath::parse(&path));
        let _ = glob.extension();
    }

    /// PROPERTY: `**/*.ext` matches exactly the paths below the root whose name ends in `.ext`.
    #[test]
    fn property_recursive_extension_glob(
        root in proptest::collection::vec(segment(), 0..=2),
        rest in relative_path(),
    ) {
        let glob = Glob::new(&root.join("/"), "**/*.x");
        let path = ResourcePath::parse(&format!("{}/{}", root.join("/"), rest.join("/")));

        let expected = rest.last().is_some_and(|name| name.ends_with(".x"));
        prop_assert_eq!(glob.matches(&path), expected);
    }

    /// PROPERTY: a single `*` never crosses a directory boundary.
    #[test]
    fn property_star_stays_in_one_segment(rest in relative_path()) {
        let glob = Glob::anywhere("*");
        let path = ResourcePath::parse(&rest.join("/"));

        prop_assert_eq!(glob.matches(&path), rest.len() == 1);
    }

    /// PROPERTY: nothing outside the glob root ever matches.
    #[test]
    fn property_paths_outside_root_never_match(rest in relative_path()) {
        let glob = Glob::new("inside", "**");
        let path = ResourcePath::parse(&format!("outside/{}", rest.join("/")));

        prop_assert!(!glob.matches(&path));
        prop_assert!(!glob.matches(&ResourcePath::parse("inside")));
    }
}
