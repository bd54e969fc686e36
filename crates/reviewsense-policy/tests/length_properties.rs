//! Property tests for the length policy

use proptest::prelude::*;
use reviewsense_policy::{word_count, ItemRef, LengthPolicy, DEFAULT_MAX_WORDS};

fn text_of(words: &[String]) -> String {
    words.join(" ")
}

proptest! {
    #[test]
    fn short_text_is_untouched(words in prop::collection::vec("[a-z]{1,8}", 0..=DEFAULT_MAX_WORDS), truncate in any::<bool>()) {
        let policy = LengthPolicy::default();
        let text = text_of(&words);

        prop_assert!(!policy.precheck(&text, truncate, ItemRef::Single).unwrap());
        let bounded = policy.enforce(text.clone(), truncate, ItemRef::Single).unwrap();
        prop_assert!(!bounded.truncated);
        prop_assert_eq!(word_count(&bounded.text), words.len());
        prop_assert_eq!(bounded.text, text);
    }

    #[test]
    fn long_text_with_truncation_is_bounded(extra in 1usize..400) {
        let policy = LengthPolicy::default();
        let words: Vec<String> = (0..DEFAULT_MAX_WORDS + extra).map(|i| format!("w{i}")).collect();
        let text = text_of(&words);

        prop_assert!(policy.precheck(&text, true, ItemRef::Single).unwrap());
        let bounded = policy.enforce(text, true, ItemRef::Single).unwrap();
        prop_assert!(bounded.truncated);
        prop_assert!(word_count(&bounded.text) <= DEFAULT_MAX_WORDS);
        // the kept words are a prefix
        prop_assert!(bounded.text.starts_with("w0 w1 "));
    }

    #[test]
    fn long_text_without_truncation_fails(extra in 1usize..400, index in 0usize..100) {
        let policy = LengthPolicy::default();
        let text = vec!["x"; DEFAULT_MAX_WORDS + extra].join(" ");

        prop_assert!(policy.precheck(&text, false, ItemRef::Single).is_err());
        let item = ItemRef::Batch { index, review_id: None };
        prop_assert!(policy.precheck(&text, false, item).is_err());
    }
}
