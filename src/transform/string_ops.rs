//! Case transforms and name normalization for text cells.

use std::borrow::Cow;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Case transform requested for a text-bearing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextCase {
    Uppercase,
    Lowercase,
    TitleCase,
    SentenceCase,
}

pub fn apply_case(input: &str, case: TextCase) -> Cow<'_, str> {
    match case {
        TextCase::Uppercase => uppercase(input),
        TextCase::Lowercase => lowercase(input),
        TextCase::TitleCase => title_case(input),
        TextCase::SentenceCase => sentence_case(input),
    }
}

/// Returns a lowercase representation, reusing the original string if already lowercase.
pub fn lowercase(input: &str) -> Cow<'_, str> {
    if input.chars().all(|ch| !ch.is_uppercase()) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.to_lowercase())
    }
}

/// Returns an uppercase representation, avoiding allocation when unnecessary.
pub fn uppercase(input: &str) -> Cow<'_, str> {
    if input.chars().all(|ch| !ch.is_lowercase()) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.to_uppercase())
    }
}

/// Capitalizes the first letter of each whitespace-delimited word and
/// lowers the rest.
pub fn title_case(input: &str) -> Cow<'_, str> {
    let mut result = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            result.push(ch);
        } else if at_word_start {
            at_word_start = false;
            result.extend(ch.to_uppercase());
        } else {
            result.extend(ch.to_lowercase());
        }
    }
    if result == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(result)
    }
}

/// Lowers the whole string, then capitalizes only its first character.
pub fn sentence_case(input: &str) -> Cow<'_, str> {
    let lowered = input.to_lowercase();
    let mut chars = lowered.chars();
    let result = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => lowered,
    };
    if result == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(result)
    }
}

/// Normalizes a name cell ahead of a case transform: underscores become
/// spaces, leading/trailing whitespace is trimmed, and internal whitespace
/// runs collapse to a single space.
pub fn normalize_name(input: &str) -> Cow<'_, str> {
    let collapsed = input.replace('_', " ").split_whitespace().join(" ");
    if collapsed == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(
            title_case("john RONALD reuel").as_ref(),
            "John Ronald Reuel"
        );
        assert_eq!(title_case("  two  spaces").as_ref(), "  Two  Spaces");
    }

    #[test]
    fn sentence_case_capitalizes_only_the_first_character() {
        assert_eq!(sentence_case("HELLO World").as_ref(), "Hello world");
        assert_eq!(sentence_case("").as_ref(), "");
    }

    #[test]
    fn normalize_name_handles_underscores_and_whitespace() {
        assert_eq!(
            normalize_name("mary_jane  watson ").as_ref(),
            "mary jane watson"
        );
        let untouched = normalize_name("plain name");
        assert!(matches!(untouched, Cow::Borrowed(_)));
    }

    #[test]
    fn case_helpers_borrow_when_unchanged() {
        assert!(matches!(lowercase("already"), Cow::Borrowed(_)));
        assert!(matches!(uppercase("DONE"), Cow::Borrowed(_)));
        assert!(matches!(title_case("Already Title"), Cow::Borrowed(_)));
    }
}
