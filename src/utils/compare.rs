//! Case-insensitive string ordering for table sort keys
//!
//! ASCII strings (the common case) compare on their lowercase bytes.
//! Anything else falls back to a Unicode lowercase comparison with
//! common Latin diacritics folded, which approximates a base-sensitivity
//! locale collation without pulling in ICU.

use std::cmp::Ordering;

/// Compare two strings ignoring case (and, for non-ASCII, accents).
pub fn compare_strings(a: &str, b: &str) -> Ordering {
    if a.is_ascii() && b.is_ascii() {
        let a = a.bytes().map(|c| c.to_ascii_lowercase());
        let b = b.bytes().map(|c| c.to_ascii_lowercase());
        return a.cmp(b);
    }

    let a = a.chars().flat_map(char::to_lowercase).map(fold_diacritic);
    let b = b.chars().flat_map(char::to_lowercase).map(fold_diacritic);
    a.cmp(b)
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ę' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ś' | 'š' => 's',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}
