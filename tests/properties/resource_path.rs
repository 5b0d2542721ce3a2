//! Property tests for resource path navigation.

use proptest::prelude::*;

use blueprint::domain::value_objects::ResourcePath;

fn navigation() -> impl Strategy<Value = String> {
    let step = prop_oneof![
        Just("..".to_string()),
        Just(".".to_string()),
        Just(String::new()),
        proptest::string::string_regex("[a-z]{1,4}").unwrap(),
    ];
    (any::<bool>(), proptest::collection::vec(step, 0..=6)).prop_map(|(absolute, steps)| {
        let joined = steps.join("/");
        if absolute {
            format!("/{joined}")
        } else {
            joined
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: parsing never panics and always yields a normalized absolute path.
    #[test]
    fn property_parse_is_normalized(raw in "(?s).{0,128}") {
        let path = ResourcePath::parse(&raw);
        let text = path.as_str();

        prop_assert!(text.starts_with('/'));
        prop_assert!(path.is_root() || !text.ends_with('/'));
        prop_assert!(!text.contains("//"));
        prop_assert!(path.segments().all(|s| s != "." && s != ".."));
        prop_assert_eq!(ResourcePath::parse(text), path.clone());
    }

    /// PROPERTY: `select` either refuses or lands on a normalized path in the tree.
    #[test]
    fn property_select_never_escapes(base in "[a-z/]{0,16}", relative in navigation()) {
        let base = ResourcePath::parse(&base);
        if let Some(selected) = base.select(&relative) {
            prop_assert!(selected.as_str().starts_with('/'));
            prop_assert!(selected.segments().all(|s| s != ".." && s != "."));
            prop_assert_eq!(ResourcePath::parse(selected.as_str()), selected);
        }
    }

    /// PROPERTY: a child selected by name lies under its parent.
    #[test]
    fn property_selected_child_is_under_parent(
        base in "[a-z/]{0,16}",
        name in "[a-z]{1,8}",
    ) {
        let base = ResourcePath::parse(&base);
        let child = base.select(&name).unwrap();

        prop_assert!(child.is_under(&base));
        prop_assert_eq!(child.parent(), Some(base.clone()));
        prop_assert_eq!(child.strip_prefix(&base), Some(name.as_str()));
    }
}
