//! Unicode block-range classification for segmentation.
//!
//! Classification is an explicit code-point range lookup rather than an
//! encoding heuristic, so it behaves identically for every input encoding
//! Rust can represent. Characters outside every known range classify as
//! non-CJK and never abort a pass.

/// True for characters treated as wide, self-spacing CJK units.
///
/// Covers the Han ideograph blocks plus kana, hangul, and the CJK
/// symbol/fullwidth blocks whose glyphs occupy a full cell and are placed
/// without injected spacing.
pub fn is_cjk_char(ch: char) -> bool {
    matches!(
        ch as u32,
        0x1100..=0x11FF       // Hangul Jamo
        | 0x2E80..=0x2EFF     // CJK Radicals Supplement
        | 0x3000..=0x303F     // CJK Symbols and Punctuation
        | 0x3040..=0x309F     // Hiragana
        | 0x30A0..=0x30FF     // Katakana
        | 0x3130..=0x318F     // Hangul Compatibility Jamo
        | 0x31C0..=0x31EF     // CJK Strokes
        | 0x31F0..=0x31FF     // Katakana Phonetic Extensions
        | 0x3400..=0x4DBF     // CJK Unified Ideographs Extension A
        | 0x4E00..=0x9FFF     // CJK Unified Ideographs
        | 0xA960..=0xA97F     // Hangul Jamo Extended-A
        | 0xAC00..=0xD7AF     // Hangul Syllables
        | 0xD7B0..=0xD7FF     // Hangul Jamo Extended-B
        | 0xF900..=0xFAFF     // CJK Compatibility Ideographs
        | 0xFE30..=0xFE4F     // CJK Compatibility Forms
        | 0xFF00..=0xFF60     // Fullwidth Forms
        | 0xFFE0..=0xFFE6     // Fullwidth signs
        | 0x20000..=0x2A6DF   // CJK Unified Ideographs Extension B
        | 0x2A700..=0x2EBEF   // CJK Extensions C-F
        | 0x30000..=0x3134F   // CJK Extension G
    )
}

/// True when `text` contains at least one CJK-classified character.
///
/// A token carrying any wide glyph is placed as a self-spacing unit, so a
/// single ideograph with an attached fullwidth mark still counts.
pub fn is_cjk_text(text: &str) -> bool {
    text.chars().any(is_cjk_char)
}

/// Unicode punctuation predicate used by the tokenizer.
///
/// ASCII is matched against the `\p{P}` set (so `$ + < = > ^` and friends
/// stay word characters); non-ASCII punctuation is a block-range lookup.
pub fn is_punctuation_char(ch: char) -> bool {
    if ch.is_ascii() {
        return matches!(
            ch,
            '!' | '"'
                | '#'
                | '%'
                | '&'
                | '\''
                | '('
                | ')'
                | '*'
                | ','
                | '-'
                | '.'
                | '/'
                | ':'
                | ';'
                | '?'
                | '@'
                | '['
                | '\\'
                | ']'
                | '_'
                | '{'
                | '}'
        );
    }
    matches!(
        ch as u32,
        0x2010..=0x2027       // General Punctuation: dashes, quotes, daggers
        | 0x2030..=0x205E     // General Punctuation: per mille .. vertical forms
        | 0x3001..=0x3003     // Ideographic comma, full stop, ditto mark
        | 0x3008..=0x3011     // CJK angle/corner/lenticular brackets
        | 0x3014..=0x301F     // CJK tortoise shell brackets and quotes
        | 0x30FB              // Katakana middle dot
        | 0xFE10..=0xFE19     // Vertical forms
        | 0xFE30..=0xFE4F     // CJK Compatibility Forms
        | 0xFE50..=0xFE6B     // Small Form Variants
        | 0xFF01..=0xFF03     // Fullwidth ! " #
        | 0xFF05..=0xFF0A     // Fullwidth % & ' ( ) *
        | 0xFF0C..=0xFF0F     // Fullwidth , - . /
        | 0xFF1A..=0xFF1B     // Fullwidth : ;
        | 0xFF1F..=0xFF20     // Fullwidth ? @
        | 0xFF3B..=0xFF3D     // Fullwidth [ \ ]
        | 0xFF3F              // Fullwidth _
        | 0xFF5B | 0xFF5D     // Fullwidth { }
        | 0xFF5F..=0xFF65     // Fullwidth/halfwidth brackets and CJK punctuation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn han_kana_hangul_classify_as_cjk() {
        assert!(is_cjk_char('中'));
        assert!(is_cjk_char('你'));
        assert!(is_cjk_char('\u{4E00}'));
        assert!(is_cjk_char('\u{9FFF}'));
        assert!(is_cjk_char('あ'));
        assert!(is_cjk_char('ア'));
        assert!(is_cjk_char('한'));
    }

    #[test]
    fn latin_digits_and_accents_are_not_cjk() {
        assert!(!is_cjk_char('a'));
        assert!(!is_cjk_char('Z'));
        assert!(!is_cjk_char('7'));
        assert!(!is_cjk_char(' '));
        assert!(!is_cjk_char('é'));
        assert!(!is_cjk_char('ß'));
    }

    #[test]
    fn fullwidth_forms_are_cjk() {
        assert!(is_cjk_char('Ａ'));
        assert!(is_cjk_char('，'));
        assert!(is_cjk_char('。'));
    }

    #[test]
    fn cjk_text_needs_only_one_wide_char() {
        assert!(is_cjk_text("好，"));
        assert!(is_cjk_text("abc你"));
        assert!(!is_cjk_text("abc"));
        assert!(!is_cjk_text(""));
    }

    #[test]
    fn ascii_punctuation_follows_unicode_p() {
        assert!(is_punctuation_char(','));
        assert!(is_punctuation_char('.'));
        assert!(is_punctuation_char('!'));
        assert!(is_punctuation_char('('));
        // Symbols are not punctuation.
        assert!(!is_punctuation_char('$'));
        assert!(!is_punctuation_char('+'));
        assert!(!is_punctuation_char('='));
        assert!(!is_punctuation_char('~'));
    }

    #[test]
    fn cjk_punctuation_is_both_punctuation_and_wide() {
        for ch in ['、', '。', '「', '」', '，', '？'] {
            assert!(is_punctuation_char(ch), "{ch} should be punctuation");
            assert!(is_cjk_char(ch), "{ch} should be wide");
        }
    }
}
