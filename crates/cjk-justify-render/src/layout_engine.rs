//! Greedy line breaking, vowel-cut word splitting, and stretch placement.

use std::borrow::Cow;
use std::sync::Arc;

use cjk_justify::{is_cjk_char, split_paragraphs, tokenize, Token};

use crate::layout_ir::{
    resolve_horizontal_align, Gravity, HorizontalAlign, HyphenationConfig, JustifyMode,
    LayoutDirection, LayoutResult, LineLayout, ParagraphLayout, PlacedToken, SplitResult,
    TextAlignment, TextStyle,
};

/// Text measurement hook for glyph-accurate line fitting.
///
/// Must be deterministic for a fixed style and return widths in the same
/// unit as the configured box width.
pub trait TextMeasurer: Send + Sync {
    /// Measure rendered text width for the provided style.
    fn measure_width(&self, text: &str, style: &TextStyle) -> f32;
}

/// Geometry and host attributes for one layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Measured box width, paddings included.
    pub box_width_px: i32,
    /// Leading padding.
    pub padding_start_px: i32,
    /// Trailing padding.
    pub padding_end_px: i32,
    /// Top padding.
    pub padding_top_px: i32,
    /// Bottom padding.
    pub padding_bottom_px: i32,
    /// Line box height.
    pub line_height_px: i32,
    /// Extra gap between lines.
    pub line_spacing_px: i32,
    /// Gap between paragraphs.
    pub paragraph_spacing_px: i32,
    /// Style applied to all measured text.
    pub style: TextStyle,
    /// Host layout direction.
    pub layout_direction: LayoutDirection,
    /// Host gravity attribute.
    pub gravity: Gravity,
    /// Host text-alignment attribute.
    pub text_alignment: TextAlignment,
    /// Word-splitting guard bands.
    pub hyphenation: HyphenationConfig,
}

impl LayoutConfig {
    /// Convenience for a box width with default attributes.
    pub fn for_box_width(width: i32) -> Self {
        Self {
            box_width_px: width,
            ..Self::default()
        }
    }

    /// Horizontal space available for text after start/end padding.
    pub fn content_width_px(&self) -> i32 {
        self.box_width_px - self.padding_start_px - self.padding_end_px
    }

    /// Resolved final-line alignment for the configured host attributes.
    pub fn horizontal_align(&self) -> HorizontalAlign {
        resolve_horizontal_align(self.layout_direction, self.gravity, self.text_alignment)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            box_width_px: 480,
            padding_start_px: 16,
            padding_end_px: 16,
            padding_top_px: 12,
            padding_bottom_px: 12,
            line_height_px: 20,
            line_spacing_px: 2,
            paragraph_spacing_px: 15,
            style: TextStyle::default(),
            layout_direction: LayoutDirection::Ltr,
            gravity: Gravity::None,
            text_alignment: TextAlignment::Gravity,
            hyphenation: HyphenationConfig::default(),
        }
    }
}

/// Deterministic stretch-justification engine.
///
/// [`layout`](Self::layout) is a pure function of `(text, config, measurer)`;
/// the engine holds no per-pass state, so callers own caching and
/// invalidation.
#[derive(Clone)]
pub struct LayoutEngine {
    cfg: LayoutConfig,
    text_measurer: Option<Arc<dyn TextMeasurer>>,
}

impl core::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("cfg", &self.cfg)
            .field("has_text_measurer", &self.text_measurer.is_some())
            .finish()
    }
}

/// Working token borrowed from the paragraph, or owned when produced by the
/// splitter.
#[derive(Clone, Debug)]
struct LineTok<'a> {
    text: Cow<'a, str>,
    cjk: bool,
}

impl LayoutEngine {
    /// Create an engine for the given configuration.
    pub fn new(cfg: LayoutConfig) -> Self {
        Self {
            cfg,
            text_measurer: None,
        }
    }

    /// Install a shared text measurer for glyph-accurate width fitting.
    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.text_measurer = Some(measurer);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.cfg
    }

    /// Run one full pass: normalize, tokenize, break, place, accumulate.
    pub fn layout(&self, text: &str) -> LayoutResult {
        let content_width_px = self.cfg.content_width_px();
        if content_width_px <= 0 {
            log::warn!(
                "degenerate content width {}px; every token will overflow",
                content_width_px
            );
        }
        let content_width = content_width_px as f32;
        let align = self.cfg.horizontal_align();

        let paragraphs = split_paragraphs(text);
        let mut out = Vec::with_capacity(paragraphs.len());
        let mut total_line_count = 0usize;
        for paragraph in &paragraphs {
            let tokens = tokenize(paragraph);
            let lines = self.break_paragraph(&tokens, content_width);
            total_line_count += lines.len();
            let line_count = lines.len();
            let placed = lines
                .iter()
                .enumerate()
                .map(|(index, line)| {
                    self.place_line(line, index + 1 == line_count, align, content_width)
                })
                .collect();
            out.push(ParagraphLayout { lines: placed });
        }

        let total_height_px = total_height_px(out.len(), total_line_count, &self.cfg);
        log::debug!(
            "layout pass: {} paragraphs, {} lines, {}px",
            out.len(),
            total_line_count,
            total_height_px
        );
        LayoutResult {
            paragraphs: out,
            total_line_count,
            total_height_px,
            content_width_px,
        }
    }

    fn measure(&self, text: &str) -> f32 {
        match &self.text_measurer {
            Some(measurer) => measurer.measure_width(text, &self.cfg.style),
            None => heuristic_measure_width(text, &self.cfg.style),
        }
    }

    /// Greedy single-pass fill of one paragraph's tokens into lines.
    ///
    /// Candidate line extensions are built as fresh strings and measured
    /// whole; the committed line is never mutated back out of.
    fn break_paragraph<'a>(
        &self,
        tokens: &'a [Token],
        content_width: f32,
    ) -> Vec<Vec<LineTok<'a>>> {
        let mut lines: Vec<Vec<LineTok<'a>>> = Vec::new();
        let mut line: Vec<LineTok<'a>> = Vec::new();
        let mut line_text = String::new();
        let mut carry: Option<LineTok<'a>> = None;
        let mut index = 0usize;

        loop {
            let tok = match carry.take() {
                Some(tok) => tok,
                None => match tokens.get(index) {
                    Some(token) => {
                        index += 1;
                        LineTok {
                            text: Cow::Borrowed(token.text()),
                            cjk: token.is_cjk(),
                        }
                    }
                    None => break,
                },
            };

            // A space separates two adjacent narrow tokens; wide units are
            // self-spacing on both sides.
            let sep = if line.is_empty() || tok.cjk || line.last().is_some_and(|prev| prev.cjk) {
                ""
            } else {
                " "
            };
            let mut candidate =
                String::with_capacity(line_text.len() + sep.len() + tok.text.len());
            candidate.push_str(&line_text);
            candidate.push_str(sep);
            candidate.push_str(&tok.text);
            if self.measure(&candidate) <= content_width {
                line_text = candidate;
                line.push(tok);
                continue;
            }

            if tok.cjk {
                if line.is_empty() {
                    log::warn!(
                        "wide token {:?} exceeds content width {}px; placing alone",
                        tok.text,
                        content_width
                    );
                    lines.push(vec![tok]);
                    continue;
                }
                lines.push(core::mem::take(&mut line));
                line_text.clear();
                carry = Some(tok);
                continue;
            }

            let mut prefix = line_text.clone();
            prefix.push_str(sep);
            match split_word(
                &tok.text,
                &prefix,
                content_width,
                self.cfg.hyphenation,
                |text| self.measure(text),
            ) {
                SplitResult::Cut { head, tail } => {
                    line.push(LineTok {
                        text: Cow::Owned(head),
                        cjk: false,
                    });
                    lines.push(core::mem::take(&mut line));
                    line_text.clear();
                    carry = Some(LineTok {
                        text: Cow::Owned(tail),
                        cjk: false,
                    });
                }
                SplitResult::KeepWhole => {
                    if line.is_empty() {
                        log::warn!(
                            "unsplittable token {:?} exceeds content width {}px; placing alone",
                            tok.text,
                            content_width
                        );
                        lines.push(vec![tok]);
                    } else {
                        lines.push(core::mem::take(&mut line));
                        line_text.clear();
                        carry = Some(tok);
                    }
                }
            }
        }

        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }

    /// Compute per-token x offsets for one committed line.
    fn place_line(
        &self,
        line: &[LineTok<'_>],
        is_final: bool,
        align: HorizontalAlign,
        content_width: f32,
    ) -> LineLayout {
        let padding_start = self.cfg.padding_start_px as f32;

        if !is_final && line.len() > 1 {
            // Stretch: slack over the flat concatenation is spread evenly
            // across the inter-token gaps.
            let flat: String = line.iter().map(|tok| tok.text.as_ref()).collect();
            let natural_width_px = self.measure(&flat);
            let gap_px = (content_width - natural_width_px) / (line.len() - 1) as f32;
            let mut x = padding_start;
            let placements = line
                .iter()
                .map(|tok| {
                    let width_px = self.measure(&tok.text);
                    let placed = PlacedToken {
                        text: tok.text.clone().into_owned(),
                        x_px: x,
                        width_px,
                    };
                    x += width_px + gap_px;
                    placed
                })
                .collect();
            return LineLayout {
                placements,
                natural_width_px,
                justify: JustifyMode::Stretch { gap_px },
            };
        }

        // Final line, and single-token lines: no stretching. Narrow tokens
        // keep one trailing space in the rendered width, wide units none.
        let space_width = self.measure(" ");
        let advances: Vec<(f32, f32)> = line
            .iter()
            .map(|tok| {
                let width_px = self.measure(&tok.text);
                let advance = if tok.cjk {
                    width_px
                } else {
                    width_px + space_width
                };
                (width_px, advance)
            })
            .collect();
        let line_width: f32 = advances.iter().map(|(_, advance)| advance).sum();

        let (start_x, justify) = match align {
            HorizontalAlign::Start => (
                padding_start,
                JustifyMode::AlignStart {
                    offset_px: padding_start,
                },
            ),
            HorizontalAlign::End => {
                let offset_px = self.cfg.box_width_px as f32 - line_width - padding_start;
                (offset_px, JustifyMode::AlignEnd { offset_px })
            }
            HorizontalAlign::Center => {
                let offset_px = (content_width - line_width) / 2.0;
                (offset_px, JustifyMode::AlignCenter { offset_px })
            }
        };

        let mut x = start_x;
        let placements = line
            .iter()
            .zip(&advances)
            .map(|(tok, (width_px, advance))| {
                let placed = PlacedToken {
                    text: tok.text.clone().into_owned(),
                    x_px: x,
                    width_px: *width_px,
                };
                x += advance;
                placed
            })
            .collect();
        LineLayout {
            placements,
            natural_width_px: line_width,
            justify,
        }
    }
}

/// Decide whether an overflowing word is cut near its first vowel or
/// carried whole to the next line.
///
/// Candidate prefixes are measured together with `line_prefix`, the
/// already-committed line text plus its separator. At a lowercase-vowel
/// position the lookahead candidate includes one extra character and a cut
/// keeps both; elsewhere the cut falls before the overflowing character.
/// Guard bands reject cuts that would leave a head shorter than
/// `min_head_chars` positions in or a tail shorter than `min_tail_chars`.
pub fn split_word(
    word: &str,
    line_prefix: &str,
    content_width: f32,
    guard: HyphenationConfig,
    measure: impl Fn(&str) -> f32,
) -> SplitResult {
    let chars: Vec<char> = word.chars().collect();
    let len = chars.len();
    if len <= guard.min_word_chars {
        return SplitResult::KeepWhole;
    }

    let measure_prefix = |upto: usize| {
        let mut candidate = String::with_capacity(line_prefix.len() + upto * 4);
        candidate.push_str(line_prefix);
        candidate.extend(&chars[..upto]);
        measure(&candidate)
    };

    for (j, ch) in chars.iter().enumerate() {
        let is_vowel = matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u');
        let cut_at = if is_vowel {
            if j + 1 >= len {
                // Vowel in the final position: nothing left to look ahead at.
                return SplitResult::KeepWhole;
            }
            j + 2
        } else {
            j + 1
        };
        if measure_prefix(cut_at) > content_width {
            // Vowel cuts keep the lookahead pair; plain cuts fall before the
            // overflowing character.
            let head_end = if is_vowel { cut_at } else { j };
            let tail_len = len - head_end;
            if j >= guard.min_head_chars && tail_len >= guard.min_tail_chars {
                let mut head: String = chars[..head_end].iter().collect();
                head.push('-');
                let tail: String = chars[head_end..].iter().collect();
                return SplitResult::Cut { head, tail };
            }
            return SplitResult::KeepWhole;
        }
    }
    SplitResult::KeepWhole
}

/// Total required height for size negotiation.
///
/// `(paragraphs − 1) · paragraphSpacing + lines · (lineHeight + lineSpacing)
/// + vertical padding`, saturating for empty input.
pub fn total_height_px(
    paragraph_count: usize,
    total_line_count: usize,
    cfg: &LayoutConfig,
) -> i32 {
    let paragraph_gaps = paragraph_count.saturating_sub(1) as i32 * cfg.paragraph_spacing_px;
    let line_boxes = total_line_count as i32 * (cfg.line_height_px + cfg.line_spacing_px);
    paragraph_gaps + line_boxes + cfg.padding_top_px + cfg.padding_bottom_px
}

/// Width estimate used when no measurer is installed.
///
/// Per-glyph class widths in em, scaled by size and family modifiers. Wide
/// CJK glyphs take a full em; the narrow classes follow common proportional
/// metrics. Stable across families, not glyph-accurate.
fn heuristic_measure_width(text: &str, style: &TextStyle) -> f32 {
    let chars = text.chars().count();
    if chars == 0 {
        return 0.0;
    }
    let family = style.family.to_ascii_lowercase();
    let proportional = !(family.contains("mono") || family.contains("fixed"));
    let mut em_sum = 0.0f32;
    for ch in text.chars() {
        em_sum += if is_cjk_char(ch) {
            1.0
        } else if proportional {
            proportional_glyph_em_width(ch)
        } else if ch == ' ' {
            0.52
        } else {
            0.58
        };
    }

    let mut family_scale = if family.contains("serif") {
        1.03
    } else if family.contains("sans") {
        0.99
    } else {
        1.00
    };
    if style.weight >= 700 {
        family_scale += 0.03;
    }
    if style.italic {
        family_scale += 0.01;
    }

    let mut width = em_sum * style.size_px * family_scale;
    if chars > 1 {
        width += (chars as f32 - 1.0) * style.letter_spacing;
    }
    width
}

fn proportional_glyph_em_width(ch: char) -> f32 {
    match ch {
        ' ' | '\u{00A0}' => 0.32,
        '\t' => 1.28,
        'i' | 'l' | 'I' | '|' | '!' => 0.24,
        '.' | ',' | ':' | ';' | '\'' | '"' | '`' => 0.23,
        '-' | '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' => 0.34,
        '(' | ')' | '[' | ']' | '{' | '}' => 0.30,
        'f' | 't' | 'j' | 'r' => 0.34,
        'm' | 'w' | 'M' | 'W' | '@' | '%' | '&' | '#' => 0.74,
        c if c.is_ascii_digit() => 0.52,
        c if c.is_ascii_uppercase() => 0.64,
        c if c.is_ascii_lowercase() => 0.52,
        c if c.is_whitespace() => 0.32,
        c if c.is_ascii_punctuation() => 0.42,
        _ => 0.56,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_measure(text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    #[test]
    fn split_keeps_short_words_whole() {
        for word in ["a", "an", "the"] {
            let result = split_word(word, "", 10.0, HyphenationConfig::default(), fixed_measure);
            assert_eq!(result, SplitResult::KeepWhole, "{word} must not split");
        }
    }

    #[test]
    fn split_cuts_after_the_overflowing_vowel_pair() {
        // Overflow is first hit at the vowel lookahead for 'o' (j = 9):
        // the head keeps the pair and the hyphen.
        let result = split_word(
            "internationalization",
            "",
            100.0,
            HyphenationConfig::default(),
            fixed_measure,
        );
        assert_eq!(
            result,
            SplitResult::Cut {
                head: "internation-".to_string(),
                tail: "alization".to_string(),
            }
        );
    }

    #[test]
    fn split_falls_back_to_plain_cut_without_vowels() {
        let result = split_word(
            "rhythms",
            "",
            40.0,
            HyphenationConfig::default(),
            fixed_measure,
        );
        assert_eq!(
            result,
            SplitResult::Cut {
                head: "rhyt-".to_string(),
                tail: "hms".to_string(),
            }
        );
    }

    #[test]
    fn split_respects_the_tail_guard() {
        // Cutting "wrapping" at width 60 would leave a one-char tail.
        let result = split_word(
            "wrapping",
            "",
            60.0,
            HyphenationConfig::default(),
            fixed_measure,
        );
        assert_eq!(result, SplitResult::KeepWhole);
    }

    #[test]
    fn split_respects_the_head_guard() {
        // First overflow happens before three characters are retained.
        let result = split_word(
            "overlong",
            "",
            20.0,
            HyphenationConfig::default(),
            fixed_measure,
        );
        assert_eq!(result, SplitResult::KeepWhole);
    }

    #[test]
    fn split_counts_the_committed_prefix() {
        // The prefix eats most of the width, so the cut lands early enough
        // to fail the head guard.
        let result = split_word(
            "justification",
            "a test of ",
            120.0,
            HyphenationConfig::default(),
            fixed_measure,
        );
        assert_eq!(result, SplitResult::KeepWhole);
    }

    #[test]
    fn fitting_word_is_kept_whole() {
        let result = split_word(
            "behavior",
            "",
            200.0,
            HyphenationConfig::default(),
            fixed_measure,
        );
        assert_eq!(result, SplitResult::KeepWhole);
    }

    #[test]
    fn heuristic_width_is_monotone_over_extension() {
        let style = TextStyle::default();
        let mut prev = 0.0;
        let text = "layout 排版 engine";
        for end in 1..=text.chars().count() {
            let prefix: String = text.chars().take(end).collect();
            let width = heuristic_measure_width(&prefix, &style);
            assert!(width >= prev, "width shrank at {end}");
            prev = width;
        }
    }

    #[test]
    fn heuristic_width_counts_cjk_as_full_em() {
        let style = TextStyle {
            family: std::sync::Arc::from("mono"),
            ..TextStyle::default()
        };
        let wide = heuristic_measure_width("中", &style);
        let narrow = heuristic_measure_width("x", &style);
        assert!(wide > narrow);
        assert!((wide - style.size_px).abs() < f32::EPSILON);
    }

    #[test]
    fn total_height_follows_the_accumulator_formula() {
        let cfg = LayoutConfig {
            line_height_px: 20,
            line_spacing_px: 2,
            paragraph_spacing_px: 15,
            padding_top_px: 10,
            padding_bottom_px: 6,
            ..LayoutConfig::default()
        };
        assert_eq!(total_height_px(2, 5, &cfg), 15 + 5 * 22 + 16);
        assert_eq!(total_height_px(0, 0, &cfg), 16);
    }
}
