//! Tokenization of a paragraph into atomic display units.

use crate::script::{is_cjk_text, is_punctuation_char};

/// Kind of an atomic display token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Wide self-spacing unit: a single ideograph, possibly carrying one
    /// attached trailing mark.
    Cjk,
    /// Narrow unit: a Latin-script word run or standalone narrow
    /// punctuation, separated from its non-CJK neighbors by one space.
    Word,
}

/// Atomic display token owned by the paragraph it was tokenized from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    text: String,
    kind: TokenKind,
}

impl Token {
    /// Build a token, classifying its kind from the text.
    pub fn new(text: String) -> Self {
        let kind = if is_cjk_text(&text) {
            TokenKind::Cjk
        } else {
            TokenKind::Word
        };
        Self { text, kind }
    }

    /// Token text as it will be drawn.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Classified kind.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// True for wide self-spacing units.
    pub fn is_cjk(&self) -> bool {
        self.kind == TokenKind::Cjk
    }
}

/// Split one normalized paragraph into tokens.
///
/// Single scan with an accumulation buffer:
/// - a space flushes the buffer and is never emitted itself;
/// - punctuation attaches to the buffered token and flushes it (or stands
///   alone when nothing is buffered);
/// - any other character first flushes a buffered wide unit, then
///   accumulates.
///
/// Concatenating the returned tokens reproduces `paragraph` minus its
/// spaces.
pub fn tokenize(paragraph: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    for ch in paragraph.chars() {
        if ch == ' ' {
            flush(&mut tokens, &mut buf);
        } else if is_punctuation_char(ch) {
            buf.push(ch);
            flush(&mut tokens, &mut buf);
        } else {
            if is_cjk_text(&buf) {
                flush(&mut tokens, &mut buf);
            }
            buf.push(ch);
        }
    }
    flush(&mut tokens, &mut buf);
    tokens
}

fn flush(tokens: &mut Vec<Token>, buf: &mut String) {
    if !buf.is_empty() {
        tokens.push(Token::new(core::mem::take(buf)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::text).collect()
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn splits_latin_words_on_spaces() {
        let tokens = tokenize("hello world");
        assert_eq!(texts(&tokens), ["hello", "world"]);
        assert!(tokens.iter().all(|t| t.kind() == TokenKind::Word));
    }

    #[test]
    fn cjk_chars_become_single_tokens() {
        let tokens = tokenize("中文排版");
        assert_eq!(texts(&tokens), ["中", "文", "排", "版"]);
        assert!(tokens.iter().all(Token::is_cjk));
    }

    #[test]
    fn mixed_cjk_latin_keeps_word_runs_whole() {
        let tokens = tokenize("你好world");
        assert_eq!(texts(&tokens), ["你", "好", "world"]);
        assert_eq!(tokens[0].kind(), TokenKind::Cjk);
        assert_eq!(tokens[2].kind(), TokenKind::Word);
    }

    #[test]
    fn punctuation_attaches_to_preceding_token() {
        assert_eq!(texts(&tokenize("hello, world.")), ["hello,", "world."]);
        assert_eq!(texts(&tokenize("你好，世界。")), ["你", "好，", "世", "界。"]);
    }

    #[test]
    fn attached_fullwidth_mark_keeps_the_unit_wide() {
        let tokens = tokenize("好，");
        assert_eq!(texts(&tokens), ["好，"]);
        assert!(tokens[0].is_cjk());
    }

    #[test]
    fn leading_punctuation_stands_alone() {
        assert_eq!(texts(&tokenize("(hello world)")), ["(", "hello", "world)"]);
    }

    #[test]
    fn concatenation_reproduces_spaceless_text() {
        let paragraph = "the 中文 layout, engine works。";
        let joined: String = tokenize(paragraph).iter().map(Token::text).collect();
        let expected: String = paragraph.chars().filter(|ch| *ch != ' ').collect();
        assert_eq!(joined, expected);
    }

    #[test]
    fn unclassifiable_scripts_fall_back_to_word_tokens() {
        let tokens = tokenize("mañana Ω≈ç");
        assert_eq!(texts(&tokens), ["mañana", "Ω≈ç"]);
        assert!(tokens.iter().all(|t| t.kind() == TokenKind::Word));
    }
}
