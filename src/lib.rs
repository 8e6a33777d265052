//! Text model for stretch-justified mixed CJK/Latin layout.
//!
//! This crate owns segmentation only: paragraph normalization, Unicode
//! script classification, and tokenization into atomic display units.
//! Line breaking, measurement, and placement live in `cjk-justify-render`.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

mod paragraph;
mod script;
mod token;

pub use paragraph::{normalize_text, split_paragraphs};
pub use script::{is_cjk_char, is_cjk_text, is_punctuation_char};
pub use token::{tokenize, Token, TokenKind};
