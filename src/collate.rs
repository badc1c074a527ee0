//! Locale-aware ordering of country names.
//!
//! Approximates the root-locale collation browsers use for `localeCompare`: letters compare
//! by base letter first (accents and case are secondary), so "Åland Islands" sorts next to
//! "Albania" rather than after "Zimbabwe", and "Curaçao" sits between "Cuba" and "Cyprus".

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compare two names the way a sorted country list expects.
///
/// Primary: base letters, case-insensitive, diacritics removed.
/// Secondary: unaccented before accented. Tertiary: lowercase before uppercase.
pub fn compare(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| accent_key(a).cmp(accent_key(b)))
        .then_with(|| case_key(a).cmp(case_key(b)))
        .then_with(|| a.cmp(b))
}

/// Sort a slice in place by a name extracted from each element.
pub fn sort_by_name<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by(|x, y| compare(name(x), name(y)));
}

/// Canonical decomposition with the combining marks dropped, lowercased.
fn primary_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(fold_letter)
        .flat_map(char::to_lowercase)
}

// Letters with a stroke or ligature have no canonical decomposition.
fn fold_letter(c: char) -> impl Iterator<Item = char> {
    let folded: Option<&'static str> = match c {
        'Æ' | 'æ' => Some("ae"),
        'Œ' | 'œ' => Some("oe"),
        'ß' => Some("ss"),
        'Þ' | 'þ' => Some("th"),
        'Ø' | 'ø' => Some("o"),
        'Ł' | 'ł' => Some("l"),
        'Đ' | 'đ' | 'Ð' | 'ð' => Some("d"),
        'Ħ' | 'ħ' => Some("h"),
        'ı' => Some("i"),
        _ => None,
    };
    let single = folded.is_none().then_some(c);
    folded.unwrap_or_default().chars().chain(single)
}

/// Per composed letter: whether it is anything other than a plain ASCII letter.
fn accent_key(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfc().map(|c| !c.is_ascii() && c.is_alphabetic())
}

fn case_key(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().map(char::is_uppercase)
}
