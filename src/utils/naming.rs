//! Identifier naming utilities
//!
//! Turns raw snake-case identifiers ("arc_alloy", "combat_mk3_aggressive")
//! into display labels and canonical wiki page keys.
//!
//! The wiki key follows the wiki's page-naming quirks:
//! - Gun variants (`osprey_ii`) share one page, so the numeral is dropped
//! - Augments (`combat_mk3_aggressive`) become `Combat_Mk._3_(Aggressive)`
//! - `ARC` and Roman numerals stay uppercase

/// Base URL the canonical key is appended to.
pub const WIKI_BASE_URL: &str = "https://arcraiders.wiki/wiki/";

/// Human-readable label: each `_` segment title-cased, joined by spaces.
///
/// `"basic_material"` -> `"Basic Material"`
pub fn display_label(id: &str) -> String {
    id.split('_').map(capitalize_word).collect::<Vec<_>>().join(" ")
}

/// Canonical wiki page key for an identifier, `None` for an empty one.
///
/// # Examples
/// ```
/// use recycle_tools_rust::utils::naming::canonical_key;
///
/// assert_eq!(canonical_key("osprey_ii").as_deref(), Some("Osprey"));
/// assert_eq!(canonical_key("combat_mk3_aggressive").as_deref(), Some("Combat_Mk._3_(Aggressive)"));
/// assert_eq!(canonical_key("arc_alloy").as_deref(), Some("ARC_Alloy"));
/// assert_eq!(canonical_key(""), None);
/// ```
pub fn canonical_key(id: &str) -> Option<String> {
    if id.is_empty() {
        return None;
    }

    let words: Vec<&str> = id.split('_').collect();

    // ONEWORD_NUMERAL is a gun variant; longer names keep their numeral
    let is_gun_variant = words.len() == 2 && is_roman_numeral(words[1]);
    let words = if is_gun_variant { &words[..1] } else { &words[..] };

    let last = words.len() - 1;
    let augment = words
        .iter()
        .position(|w| mk_number(w).is_some())
        .map_or(false, |mk_index| mk_index < last);

    let rendered: Vec<String> = words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            if let Some(digits) = mk_number(word) {
                format!("Mk._{}", digits)
            } else if word.eq_ignore_ascii_case("arc") {
                "ARC".to_string()
            } else if is_roman_numeral(word) {
                word.to_ascii_uppercase()
            } else if augment && index == last {
                format!("({})", capitalize_word(word))
            } else {
                capitalize_word(word)
            }
        })
        .collect();

    Some(rendered.join("_"))
}

/// Outbound wiki link for an identifier.
pub fn wiki_url(id: &str) -> Option<String> {
    canonical_key(id).map(|key| format!("{}{}", WIKI_BASE_URL, key))
}

/// First character uppercased, remainder lowercased.
fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `^[IVX]+$`, case-insensitive
fn is_roman_numeral(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| matches!(c, 'I' | 'V' | 'X' | 'i' | 'v' | 'x'))
}

/// Digits of an `mk<N>` segment (`^mk\d+$`, case-insensitive).
fn mk_number(word: &str) -> Option<&str> {
    let prefix = word.get(..2)?;
    if !prefix.eq_ignore_ascii_case("mk") {
        return None;
    }
    let digits = &word[2..];
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}
