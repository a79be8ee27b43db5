use dirtree::PathSpec;
use proptest::prelude::*;

/// Strings from the legal alphabet, with an optional drive-letter volume.
fn legal_spec() -> impl Strategy<Value = String> {
    (
        prop::option::of("[a-zA-Z]:"),
        "[a-zA-Z0-9\\\\.*? _-]{0,24}",
    )
        .prop_map(|(volume, body)| format!("{}{body}", volume.unwrap_or_default()))
}

proptest! {
    #[test]
    fn split_then_compose_is_identity(text in legal_spec()) {
        // Test invariant: the four components reassemble into the input
        let spec = PathSpec::new(text.as_str()).unwrap();
        prop_assert_eq!(spec.components().compose(), text.clone());

        let (v, d, f) = spec.split3();
        prop_assert_eq!(format!("{v}{d}{f}"), text.clone());

        let rebuilt = PathSpec::from_parts(v, d, f).unwrap();
        prop_assert_eq!(rebuilt, spec);
    }

    #[test]
    fn components_keep_their_shape(text in legal_spec()) {
        // Test invariant: each span obeys the grammar's landmarks
        let spec = PathSpec::new(text.as_str()).unwrap();
        let c = spec.components();

        prop_assert!(c.volume.is_empty() || (c.volume.len() == 2 && c.volume.ends_with(':')));
        prop_assert!(c.directory.is_empty() || c.directory.ends_with('\\'));
        prop_assert!(!c.stem.contains('\\'));
        prop_assert!(!c.extension.contains('\\'));
        prop_assert!(!c.extension.contains('.'));
    }

    #[test]
    fn classification_follows_components(text in legal_spec()) {
        // Test invariant: file/folder classification is a pure projection
        let spec = PathSpec::new(text.as_str()).unwrap();
        let c = spec.components();

        prop_assert_eq!(spec.is_file(), !c.stem.is_empty());
        prop_assert_eq!(
            spec.is_folder(),
            c.stem.is_empty()
                && c.extension.is_empty()
                && (!c.volume.is_empty() || !c.directory.is_empty())
        );
        prop_assert!(!(spec.is_file() && spec.is_folder()));
    }
}
