//! Layout IR, stretch-justification engine, and cache helpers for `cjk-justify`.

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

mod layout_cache;
mod layout_engine;
mod layout_ir;

pub use cjk_justify::{Token, TokenKind};
pub use layout_cache::{FileLayoutCacheStore, LayoutCacheStore, LayoutProfileId};
pub use layout_engine::{split_word, total_height_px, LayoutConfig, LayoutEngine, TextMeasurer};
pub use layout_ir::{
    resolve_horizontal_align, Gravity, HorizontalAlign, HyphenationConfig, JustifyMode,
    LayoutDirection, LayoutResult, LineLayout, ParagraphLayout, PlacedToken, SplitResult,
    TextAlignment, TextStyle,
};
