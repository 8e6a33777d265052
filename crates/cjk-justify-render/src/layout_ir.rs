//! Layout IR shared between the engine and renderers.

use std::sync::Arc;

/// Resolved text style passed to the measurement port.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Chosen family.
    pub family: Arc<str>,
    /// Numeric weight.
    pub weight: u16,
    /// Italic flag.
    pub italic: bool,
    /// Size in pixels.
    pub size_px: f32,
    /// Line height multiplier.
    pub line_height: f32,
    /// Letter spacing in px.
    pub letter_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: Arc::from("serif"),
            weight: 400,
            italic: false,
            size_px: 16.0,
            line_height: 1.2,
            letter_spacing: 0.0,
        }
    }
}

/// Host layout direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Host horizontal gravity attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gravity {
    /// No gravity set by the host.
    #[default]
    None,
    /// Leading edge in the layout direction.
    Start,
    /// Trailing edge in the layout direction.
    End,
    /// Absolute left.
    Left,
    /// Absolute right.
    Right,
    /// Horizontally centered.
    CenterHorizontal,
}

/// Host text-alignment attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlignment {
    /// Defer to the gravity attribute.
    #[default]
    Gravity,
    TextStart,
    TextEnd,
    ViewStart,
    ViewEnd,
    Center,
}

/// Resolved horizontal placement applied to a paragraph's final line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalAlign {
    Start,
    End,
    Center,
}

/// Resolve the effective horizontal alignment from host attributes.
///
/// Precedence: explicit text alignment, then gravity (made absolute via the
/// layout direction), then the Center default.
pub fn resolve_horizontal_align(
    direction: LayoutDirection,
    gravity: Gravity,
    text_alignment: TextAlignment,
) -> HorizontalAlign {
    match text_alignment {
        TextAlignment::TextStart | TextAlignment::ViewStart => return HorizontalAlign::Start,
        TextAlignment::TextEnd | TextAlignment::ViewEnd => return HorizontalAlign::End,
        TextAlignment::Center => return HorizontalAlign::Center,
        TextAlignment::Gravity => {}
    }
    let absolute = match gravity {
        Gravity::Start => match direction {
            LayoutDirection::Ltr => Gravity::Left,
            LayoutDirection::Rtl => Gravity::Right,
        },
        Gravity::End => match direction {
            LayoutDirection::Ltr => Gravity::Right,
            LayoutDirection::Rtl => Gravity::Left,
        },
        other => other,
    };
    match absolute {
        Gravity::Left => HorizontalAlign::Start,
        Gravity::Right => HorizontalAlign::End,
        _ => HorizontalAlign::Center,
    }
}

/// Word-splitting guard bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HyphenationConfig {
    /// Words at or below this many characters are never split.
    pub min_word_chars: usize,
    /// Minimum characters retained before a cut position.
    pub min_head_chars: usize,
    /// Minimum characters carried to the next line after a cut.
    pub min_tail_chars: usize,
}

impl Default for HyphenationConfig {
    fn default() -> Self {
        Self {
            min_word_chars: 3,
            min_head_chars: 3,
            min_tail_chars: 2,
        }
    }
}

/// Outcome of the oversized-word splitter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SplitResult {
    /// Carry the word whole to the next line.
    KeepWhole,
    /// The hyphen-terminated head closes the current line; the tail seeds
    /// the next one.
    Cut { head: String, tail: String },
}

/// Placement decision recorded for a committed line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JustifyMode {
    /// Inter-token stretch: `gap_px` is inserted after every token but the
    /// last so the line's visible span exactly fills the content box.
    Stretch { gap_px: f32 },
    /// Final-line start alignment at the given x offset.
    AlignStart { offset_px: f32 },
    /// Final-line end alignment at the given x offset.
    AlignEnd { offset_px: f32 },
    /// Final-line center alignment at the given x offset.
    AlignCenter { offset_px: f32 },
}

/// One placed token: the (token-text, x-offset) pair consumed by renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedToken {
    /// Token text as drawn; splitter heads keep their trailing hyphen.
    pub text: String,
    /// Left x offset from the box's left edge.
    pub x_px: f32,
    /// Measured width of `text`.
    pub width_px: f32,
}

/// One committed line of a paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct LineLayout {
    /// Ordered placements; never empty.
    pub placements: Vec<PlacedToken>,
    /// Width the placer distributed slack against: the flat concatenation
    /// for stretched lines, the separator-inclusive width for aligned ones.
    pub natural_width_px: f32,
    /// Placement decision applied to this line.
    pub justify: JustifyMode,
}

/// Ordered lines of one paragraph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphLayout {
    pub lines: Vec<LineLayout>,
}

impl ParagraphLayout {
    /// Committed line count.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Output of one full layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutResult {
    /// Per-paragraph line layouts in source order.
    pub paragraphs: Vec<ParagraphLayout>,
    /// Line count across all paragraphs.
    pub total_line_count: usize,
    /// Required height for size negotiation, paddings included.
    pub total_height_px: i32,
    /// Content width the pass laid out against.
    pub content_width_px: i32,
}
