//! Supported nationalities for artist searches
//!
//! This module contains the static list of nationalities the nationality
//! search accepts, matching the values the collection API reports in its
//! `artistNationality` field.

/// Static array of supported nationalities
///
/// Compiled in rather than loaded from a file; lookups are validated
/// case-insensitively against this list.
pub static NATIONALITIES: [&str; 24] = [
    "American",
    "Austrian",
    "Belgian",
    "British",
    "Chinese",
    "Danish",
    "Dutch",
    "Egyptian",
    "Flemish",
    "French",
    "German",
    "Greek",
    "Indian",
    "Irish",
    "Italian",
    "Japanese",
    "Korean",
    "Mexican",
    "Norwegian",
    "Persian",
    "Roman",
    "Russian",
    "Spanish",
    "Swiss",
];

/// Returns the full list of supported nationalities
pub fn all_nationalities() -> &'static [&'static str] {
    &NATIONALITIES
}

/// Resolves a user-supplied nationality to its canonical spelling
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Arguments
/// * `input` - The nationality as typed by the user (e.g. "dutch")
///
/// # Returns
/// Returns `Some("Dutch")` for a supported nationality, `None` otherwise
pub fn canonical_nationality(input: &str) -> Option<&'static str> {
    let needle = input.trim();
    NATIONALITIES
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(needle))
        .copied()
}
