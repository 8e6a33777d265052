//! embedded-graphics renderer for `cjk-justify-render` layouts.

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

use std::sync::Arc;

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};

use cjk_justify::is_cjk_char;
use cjk_justify_render::{LayoutConfig, LayoutResult, TextMeasurer, TextStyle};

/// Cell metrics derived from a mono font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellMetrics {
    /// Advance of one narrow glyph cell, spacing included.
    pub cell_width: i32,
    /// Advance of one wide (CJK) glyph, two cells.
    pub wide_cell_width: i32,
}

/// `TextMeasurer` over a fixed-cell mono font.
///
/// Wide CJK glyphs take two cells, the terminal wide-cell convention, so
/// measured widths line up with what the mono renderer below produces.
/// Fully deterministic: the font's advance is fixed and `size_px` is
/// ignored.
#[derive(Clone, Copy)]
pub struct MonoTextMeasurer {
    font: &'static MonoFont<'static>,
}

impl MonoTextMeasurer {
    /// Measurer over an explicit font.
    pub fn new(font: &'static MonoFont<'static>) -> Self {
        Self { font }
    }

    /// Shared measurer over the default 10x20 face.
    pub fn shared() -> Arc<dyn TextMeasurer> {
        Arc::new(Self::new(&FONT_10X20))
    }

    /// Cell metrics for the wrapped font.
    pub fn cell_metrics(&self) -> CellMetrics {
        let cell_width = (self.font.character_size.width + self.font.character_spacing) as i32;
        CellMetrics {
            cell_width,
            wide_cell_width: cell_width * 2,
        }
    }
}

impl core::fmt::Debug for MonoTextMeasurer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MonoTextMeasurer")
            .field("cell_metrics", &self.cell_metrics())
            .finish()
    }
}

impl TextMeasurer for MonoTextMeasurer {
    fn measure_width(&self, text: &str, style: &TextStyle) -> f32 {
        let metrics = self.cell_metrics();
        let mut width = 0.0f32;
        let mut chars = 0usize;
        for ch in text.chars() {
            chars += 1;
            width += if is_cjk_char(ch) {
                metrics.wide_cell_width as f32
            } else {
                metrics.cell_width as f32
            };
        }
        if chars > 1 {
            width += (chars as f32 - 1.0) * style.letter_spacing;
        }
        width
    }
}

/// Draw a layout result onto a binary draw target.
///
/// Baselines replay the measurement pass geometry: the first baseline sits
/// one line height under the top padding, each line advances by line height
/// plus line spacing, and the paragraph gap is added between paragraphs.
/// Wide glyphs outside the font's repertoire render as its fallback glyph;
/// placement stays correct because x offsets come from the layout.
pub fn render_layout<D>(
    display: &mut D,
    layout: &LayoutResult,
    cfg: &LayoutConfig,
    font: &'static MonoFont<'static>,
    color: BinaryColor,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let text_style = MonoTextStyle::new(font, color);
    let mut baseline_y = cfg.padding_top_px + cfg.line_height_px;
    for (index, paragraph) in layout.paragraphs.iter().enumerate() {
        if index > 0 {
            baseline_y += cfg.paragraph_spacing_px;
        }
        for line in &paragraph.lines {
            for placed in &line.placements {
                Text::with_baseline(
                    &placed.text,
                    Point::new(placed.x_px.round() as i32, baseline_y),
                    text_style,
                    Baseline::Alphabetic,
                )
                .draw(display)?;
            }
            baseline_y += cfg.line_height_px + cfg.line_spacing_px;
        }
    }
    log::debug!(
        "rendered {} lines, final baseline {}px",
        layout.total_line_count,
        baseline_y
    );
    Ok(())
}
