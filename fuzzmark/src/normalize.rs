//! Default word normalization: lowercase plus accent folding.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Lowercase accented letter to its folded form. Latin-1 Supplement, Latin
/// Extended-A/B, Vietnamese vowels, Hanyu Pinyin vowels and Greek tonos.
const ACCENT_FOLDS: &[(char, char)] = &[
    ('ª', 'a'), ('º', 'o'), ('ß', 's'), ('à', 'a'), ('á', 'a'), ('â', 'a'), ('ã', 'a'), ('ä', 'a'),
    ('å', 'a'), ('ç', 'c'), ('è', 'e'), ('é', 'e'), ('ê', 'e'), ('ë', 'e'), ('ì', 'i'), ('í', 'i'),
    ('î', 'i'), ('ï', 'i'), ('ð', 'd'), ('ñ', 'n'), ('ò', 'o'), ('ó', 'o'), ('ô', 'o'), ('õ', 'o'),
    ('ö', 'o'), ('ø', 'o'), ('ù', 'u'), ('ú', 'u'), ('û', 'u'), ('ü', 'u'), ('ý', 'y'), ('ÿ', 'y'),
    ('ā', 'a'), ('ă', 'a'), ('ą', 'a'), ('ć', 'c'), ('ĉ', 'c'), ('ċ', 'c'), ('č', 'c'), ('ď', 'd'),
    ('đ', 'd'), ('ē', 'e'), ('ĕ', 'e'), ('ė', 'e'), ('ę', 'e'), ('ě', 'e'), ('ĝ', 'g'), ('ğ', 'g'),
    ('ġ', 'g'), ('ģ', 'g'), ('ĥ', 'h'), ('ħ', 'h'), ('ĩ', 'i'), ('ī', 'i'), ('ĭ', 'i'), ('į', 'i'),
    ('ı', 'i'), ('ĵ', 'j'), ('ķ', 'k'), ('ĸ', 'k'), ('ĺ', 'l'), ('ļ', 'l'), ('ľ', 'l'), ('ŀ', 'l'),
    ('ł', 'l'), ('ń', 'n'), ('ņ', 'n'), ('ň', 'n'), ('ŉ', 'n'), ('ŋ', 'n'), ('ō', 'o'), ('ŏ', 'o'),
    ('ő', 'o'), ('ŕ', 'r'), ('ŗ', 'r'), ('ř', 'r'), ('ś', 's'), ('ŝ', 's'), ('ş', 's'), ('š', 's'),
    ('ţ', 't'), ('ť', 't'), ('ŧ', 't'), ('ũ', 'u'), ('ū', 'u'), ('ŭ', 'u'), ('ů', 'u'), ('ű', 'u'),
    ('ų', 'u'), ('ŵ', 'w'), ('ŷ', 'y'), ('ź', 'z'), ('ż', 'z'), ('ž', 'z'), ('ſ', 's'), ('ș', 's'),
    ('ț', 't'), ('ơ', 'o'), ('ư', 'u'), ('ầ', 'a'), ('ằ', 'a'), ('ề', 'e'), ('ồ', 'o'), ('ờ', 'o'),
    ('ừ', 'u'), ('ỳ', 'y'), ('ả', 'a'), ('ẩ', 'a'), ('ẳ', 'a'), ('ẻ', 'e'), ('ể', 'e'), ('ỉ', 'i'),
    ('ỏ', 'o'), ('ổ', 'o'), ('ở', 'o'), ('ủ', 'u'), ('ử', 'u'), ('ỷ', 'y'), ('ẫ', 'a'), ('ẵ', 'a'),
    ('ẽ', 'e'), ('ễ', 'e'), ('ỗ', 'o'), ('ỡ', 'o'), ('ữ', 'u'), ('ỹ', 'y'), ('ấ', 'a'), ('ắ', 'a'),
    ('ế', 'e'), ('ố', 'o'), ('ớ', 'o'), ('ứ', 'u'), ('ạ', 'a'), ('ậ', 'a'), ('ặ', 'a'), ('ẹ', 'e'),
    ('ệ', 'e'), ('ị', 'i'), ('ọ', 'o'), ('ộ', 'o'), ('ợ', 'o'), ('ụ', 'u'), ('ự', 'u'), ('ỵ', 'y'),
    ('ɑ', 'a'), ('ǖ', 'u'), ('ǘ', 'u'), ('ǎ', 'a'), ('ǐ', 'i'), ('ǒ', 'o'), ('ǔ', 'u'), ('ǚ', 'u'),
    ('ǜ', 'u'), ('ά', 'α'), ('έ', 'ε'), ('ή', 'η'), ('ί', 'ι'), ('ϊ', 'ι'), ('ΐ', 'ι'), ('ό', 'ο'),
    ('ύ', 'υ'), ('ϋ', 'υ'), ('ΰ', 'υ'), ('ώ', 'ω'), ('ς', 'σ'),
];

static ACCENT_MAP: Lazy<HashMap<char, char>> = Lazy::new(|| ACCENT_FOLDS.iter().copied().collect());

/// Locale for which the `l·l` digraph folds to `ll`.
const CATALAN: &str = "ca";

/// Lowercase `word` and fold accents. Printable ASCII is returned lowercased
/// without consulting the table.
pub fn normalize(word: &str, locale: Option<&str>) -> String {
    let mut lower = String::with_capacity(word.len());
    for c in word.chars() {
        if c == 'İ' {
            // char::to_lowercase would append a combining dot above
            lower.push('i');
        } else {
            lower.extend(c.to_lowercase());
        }
    }
    if is_printable_ascii(&lower) {
        return lower;
    }
    fold_accents(&lower, locale)
}

/// Fold accented lowercase letters through the table, leaving others untouched.
pub fn fold_accents(word: &str, locale: Option<&str>) -> String {
    let folded: String = word
        .chars()
        .map(|c| ACCENT_MAP.get(&c).copied().unwrap_or(c))
        .collect();
    if locale == Some(CATALAN) {
        folded.replace("l·l", "ll")
    } else {
        folded
    }
}

fn is_printable_ascii(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| (b' '..=b'~').contains(&b))
}
