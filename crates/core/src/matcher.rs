//! Typed-answer comparison.
//!
//! Only the first character may differ in case; every later character must
//! match exactly. Lengths are counted in `char`s.

fn first_char_eq(user: char, expected: char) -> bool {
    user == expected
        || user.to_uppercase().eq(expected.to_uppercase())
        || user.to_lowercase().eq(expected.to_lowercase())
}

fn char_matches(index: usize, user: char, expected: char) -> bool {
    if index == 0 {
        first_char_eq(user, expected)
    } else {
        user == expected
    }
}

/// Returns true when `user_answer` is accepted for `correct_answer`.
#[must_use]
pub fn is_match(user_answer: &str, correct_answer: &str) -> bool {
    match (user_answer.is_empty(), correct_answer.is_empty()) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        (false, false) => {}
    }

    if user_answer.chars().count() != correct_answer.chars().count() {
        return false;
    }

    user_answer
        .chars()
        .zip(correct_answer.chars())
        .enumerate()
        .all(|(i, (u, c))| char_matches(i, u, c))
}

/// One flag per character of `user_answer`: true where it agrees with `correct_answer`.
///
/// Characters past the end of `correct_answer` are always marked wrong.
#[must_use]
pub fn per_character_correctness(user_answer: &str, correct_answer: &str) -> Vec<bool> {
    let mut expected = correct_answer.chars();
    user_answer
        .chars()
        .enumerate()
        .map(|(i, u)| expected.next().is_some_and(|c| char_matches(i, u, c)))
        .collect()
}
