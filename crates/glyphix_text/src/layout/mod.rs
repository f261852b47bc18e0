//! Text layout
//!
//! Turns a string into [`PlacedGlyph`]s: one positioned cell per glyph with
//! the glyph name that identifies it across layouts. Providers implement
//! [`GlyphLayoutProvider`]; the bundled ones shape text with a
//! [`GlyphShaper`] and share [`typeset`] for line breaking, truncation and
//! placement.
//!
//! # Coordinates
//!
//! Layout rects are in the container's space, y pointing down. Glyph
//! bounding rects are relative to the glyph origin on the baseline, y
//! pointing up, as fonts define them.

mod lines;
mod monospace;
mod shaped;

pub use monospace::MonospaceLayout;
pub use shaped::ShapedLayout;

use crate::font::Font;
use glyphix_core::{Point, Rect, Size};

/// Horizontal alignment of each line within the container
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlignment {
    #[default]
    Leading,
    Center,
    Trailing,
}

/// How text that doesn't fit is wrapped or cut
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineBreakMode {
    /// Wrap at word boundaries
    WordWrap,
    /// Wrap at any character
    CharWrap,
    /// Wrap words; the last line runs past the container and is clipped
    Clip,
    /// Wrap words; the last line is cut at the start with an ellipsis
    TruncateHead,
    /// Wrap words; the last line is cut at the end with an ellipsis
    #[default]
    TruncateTail,
    /// Wrap words; the last line is cut in the middle with an ellipsis
    TruncateMiddle,
}

impl LineBreakMode {
    /// Whether the last visible line is rebuilt when text is cut off
    pub fn truncates_last_line(&self) -> bool {
        matches!(
            self,
            LineBreakMode::Clip
                | LineBreakMode::TruncateHead
                | LineBreakMode::TruncateTail
                | LineBreakMode::TruncateMiddle
        )
    }
}

/// Everything a provider needs to lay out one string
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutRequest {
    pub text: String,
    pub font: Font,
    pub container: Size,
    pub alignment: TextAlignment,
    pub line_break_mode: LineBreakMode,
    /// 0 means no limit
    pub max_lines: usize,
}

impl LayoutRequest {
    pub fn new(text: impl Into<String>, font: Font, container: Size) -> Self {
        Self {
            text: text.into(),
            font,
            container,
            alignment: TextAlignment::default(),
            line_break_mode: LineBreakMode::default(),
            max_lines: 1,
        }
    }

    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_line_break_mode(mut self, mode: LineBreakMode) -> Self {
        self.line_break_mode = mode;
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }
}

/// A glyph positioned by layout
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedGlyph {
    /// Face actually used, which may be a fallback for the requested font
    pub font: Font,
    pub glyph_id: u16,
    /// Stable identity across layouts; `None` is never reused
    pub glyph_name: Option<String>,
    /// Ink bounds relative to the glyph origin (y up)
    pub bounding_rect: Rect,
    /// Cell rect in container space (y down)
    pub layout_rect: Rect,
    pub ascent: f32,
    pub descent: f32,
}

impl PlacedGlyph {
    /// Key used to match this glyph against live cells
    pub fn identity_key(&self) -> &str {
        self.glyph_name.as_deref().unwrap_or("")
    }
}

/// Result of laying out a string
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayout {
    /// Glyphs in layout order: lines top to bottom, glyphs left to right
    pub glyphs: Vec<PlacedGlyph>,
    /// Size of the box containing every line
    pub size: Size,
}

/// Produces glyph layouts for a label
pub trait GlyphLayoutProvider {
    fn layout(&self, request: &LayoutRequest) -> TextLayout;

    /// Size the text would need within `constrained`
    fn size_fitting(&self, request: &LayoutRequest, constrained: Size) -> Size {
        let mut request = request.clone();
        request.container = constrained;
        self.layout(&request).size
    }
}

/// A shaped glyph in logical order, before line breaking
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalGlyph {
    /// Byte offset of the source character in the text
    pub cluster: usize,
    pub glyph_id: u16,
    pub glyph_name: Option<String>,
    pub font: Font,
    pub advance: f32,
    /// Offset from the pen position (y up)
    pub offset: Point,
    /// Ink bounds relative to the glyph origin (y up)
    pub bounds: Rect,
    pub ascent: f32,
    pub descent: f32,
}

/// Shapes text into logical glyphs for [`typeset`]
pub trait GlyphShaper {
    /// Shape all of `text`, including line separators
    fn shape_glyphs(&self, text: &str, font: &Font) -> Vec<LogicalGlyph>;

    /// (ascent, descent) of an empty line
    fn line_metrics(&self, font: &Font) -> (f32, f32);
}

/// Slack when deciding whether a line fits the container height
const HEIGHT_TOLERANCE: f32 = 0.5;

/// Break, truncate and place shaped text within the request's container
pub fn typeset<S: GlyphShaper + ?Sized>(shaper: &S, request: &LayoutRequest) -> TextLayout {
    let text = request.text.as_str();
    if text.is_empty() {
        return TextLayout::default();
    }

    let glyphs = shaper.shape_glyphs(text, &request.font);
    if glyphs.is_empty() {
        tracing::debug!("typeset: no glyphs for {:?}", text);
        return TextLayout::default();
    }

    let container = request.container;
    let mode = request.line_break_mode;
    let fallback = shaper.line_metrics(&request.font);
    let spans = lines::wrap(text, &glyphs, container.width, mode);

    let mut kept = 0;
    let mut height = 0.0;
    for span in &spans {
        let (ascent, descent) = line_metrics(&glyphs[span.clone()], fallback);
        if height + ascent + descent > container.height + HEIGHT_TOLERANCE {
            break;
        }
        height += ascent + descent;
        kept += 1;
        if request.max_lines > 0 && kept == request.max_lines {
            break;
        }
    }

    let mut visible: Vec<Vec<LogicalGlyph>> = spans[..kept]
        .iter()
        .map(|span| glyphs[span.clone()].to_vec())
        .collect();

    let truncated = kept < spans.len();
    if truncated && mode.truncates_last_line() {
        if let Some(last) = visible.last_mut() {
            let rest = || lines::remaining(text, &glyphs, spans[kept - 1].start);
            let mut ellipsis = shaper.shape_glyphs(lines::ELLIPSIS, &request.font);
            for glyph in &mut ellipsis {
                glyph.cluster = text.len();
            }
            let width = container.width;
            *last = match mode {
                LineBreakMode::TruncateTail => {
                    lines::truncate_tail(text, std::mem::take(last), &ellipsis, width)
                }
                LineBreakMode::TruncateHead => lines::truncate_head(rest(), &ellipsis, width),
                LineBreakMode::TruncateMiddle => lines::truncate_middle(rest(), &ellipsis, width),
                _ => rest(),
            };
        }
    }

    place_lines(text, visible, request, fallback)
}

fn line_metrics(glyphs: &[LogicalGlyph], fallback: (f32, f32)) -> (f32, f32) {
    if glyphs.is_empty() {
        return fallback;
    }
    glyphs.iter().fold((0.0_f32, 0.0_f32), |(ascent, descent), glyph| {
        (ascent.max(glyph.ascent), descent.max(glyph.descent))
    })
}

struct LineBox {
    glyphs: Vec<LogicalGlyph>,
    ascent: f32,
    descent: f32,
    width: f32,
}

fn place_lines(
    text: &str,
    lines: Vec<Vec<LogicalGlyph>>,
    request: &LayoutRequest,
    fallback: (f32, f32),
) -> TextLayout {
    let container = request.container;
    let boxes: Vec<LineBox> = lines
        .into_iter()
        .map(|glyphs| {
            let (ascent, descent) = line_metrics(&glyphs, fallback);
            let width = lines::visible_width(text, &glyphs).min(container.width);
            LineBox {
                glyphs,
                ascent,
                descent,
                width,
            }
        })
        .collect();

    let text_size = Size::new(
        boxes.iter().map(|line| line.width).fold(0.0, f32::max),
        boxes.iter().map(|line| line.ascent + line.descent).sum(),
    );
    let vertical_offset = (container.height - text_size.height) / 2.0;

    let mut placed = Vec::new();
    let mut line_top = 0.0;
    for line in boxes {
        let line_height = line.ascent + line.descent;
        let horizontal_offset = match request.alignment {
            TextAlignment::Leading => 0.0,
            TextAlignment::Center => (container.width - line.width) / 2.0,
            TextAlignment::Trailing => container.width - line.width,
        };
        let origin = Point::new(horizontal_offset, line_top + vertical_offset);

        let mut pen = 0.0;
        for glyph in line.glyphs {
            let bounds = glyph.bounds;
            // Ink may hang left of the pen or outside the line box.
            let x_compensation = bounds.min_x().min(0.0);
            let bottom_extends = (bounds.min_y() + line.descent).min(0.0);
            let top_extends = (bounds.max_y() + line.descent - line_height).max(0.0);

            let mut rect = Rect::new(
                origin.x + pen + glyph.offset.x + x_compensation,
                origin.y - glyph.offset.y - top_extends,
                glyph.advance.max(bounds.max_x()).ceil(),
                line_height - bottom_extends + top_extends,
            );
            pen += glyph.advance;

            if rect.min_x() > container.width {
                break;
            }
            if rect.max_x() > container.width {
                rect.size.width = container.width - rect.min_x();
            }

            placed.push(PlacedGlyph {
                font: glyph.font,
                glyph_id: glyph.glyph_id,
                glyph_name: glyph.glyph_name,
                bounding_rect: bounds,
                layout_rect: rect,
                ascent: line.ascent,
                descent: line.descent,
            });
        }
        line_top += line_height;
    }

    TextLayout {
        glyphs: placed,
        size: text_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str, width: f32, height: f32) -> LayoutRequest {
        LayoutRequest::new(text, Font::system(20.0), Size::new(width, height))
    }

    fn names(layout: &TextLayout) -> Vec<&str> {
        layout.glyphs.iter().map(|g| g.identity_key()).collect()
    }

    #[test]
    fn test_single_line_geometry() {
        let layout = MonospaceLayout::new().layout(&request("AB", 200.0, 40.0));
        assert_eq!(names(&layout), ["A", "B"]);
        assert_eq!(layout.size, Size::new(24.0, 20.0));
        assert_eq!(layout.glyphs[0].layout_rect, Rect::new(0.0, 10.0, 12.0, 20.0));
        assert_eq!(layout.glyphs[1].layout_rect, Rect::new(12.0, 10.0, 12.0, 20.0));
        assert_eq!(layout.glyphs[0].ascent, 16.0);
        assert_eq!(layout.glyphs[0].descent, 4.0);
    }

    #[test]
    fn test_alignment_offsets() {
        let provider = MonospaceLayout::new();
        let center = provider.layout(&request("AB", 100.0, 20.0).with_alignment(TextAlignment::Center));
        assert_eq!(center.glyphs[0].layout_rect.x(), 38.0);

        let trailing =
            provider.layout(&request("AB", 100.0, 20.0).with_alignment(TextAlignment::Trailing));
        assert_eq!(trailing.glyphs[1].layout_rect.max_x(), 100.0);
    }

    #[test]
    fn test_word_wrap_across_lines() {
        let layout = MonospaceLayout::new().layout(
            &request("ab cd", 40.0, 100.0)
                .with_line_break_mode(LineBreakMode::WordWrap)
                .with_max_lines(0),
        );
        // "ab " on the first line (trailing space hangs), "cd" on the second.
        assert_eq!(names(&layout), ["a", "b", "space", "c", "d"]);
        assert_eq!(layout.glyphs[3].layout_rect.x(), 0.0);
        assert_eq!(layout.glyphs[3].layout_rect.y(), layout.glyphs[0].layout_rect.y() + 20.0);
        assert_eq!(layout.size, Size::new(24.0, 40.0));
    }

    #[test]
    fn test_char_wrap() {
        let layout = MonospaceLayout::new().layout(
            &request("abcd", 30.0, 100.0)
                .with_line_break_mode(LineBreakMode::CharWrap)
                .with_max_lines(0),
        );
        assert_eq!(layout.glyphs.len(), 4);
        assert_eq!(layout.glyphs[2].layout_rect.x(), 0.0);
        assert_eq!(layout.size.height, 40.0);
    }

    #[test]
    fn test_newline_starts_paragraph() {
        let layout = MonospaceLayout::new().layout(
            &request("a\nb", 200.0, 100.0)
                .with_line_break_mode(LineBreakMode::WordWrap)
                .with_max_lines(0),
        );
        assert_eq!(names(&layout), ["a", "b"]);
        assert_eq!(layout.size.height, 40.0);
    }

    #[test]
    fn test_truncate_tail() {
        let layout = MonospaceLayout::new().layout(&request("abcdefgh", 60.0, 20.0));
        // 60pt fits five cells: four letters and the ellipsis.
        assert_eq!(names(&layout), ["a", "b", "c", "d", "ellipsis"]);
    }

    #[test]
    fn test_truncate_head_and_middle() {
        let provider = MonospaceLayout::new();
        let head = provider.layout(
            &request("abcdefgh", 60.0, 20.0).with_line_break_mode(LineBreakMode::TruncateHead),
        );
        assert_eq!(names(&head), ["ellipsis", "e", "f", "g", "h"]);

        let middle = provider.layout(
            &request("abcdefgh", 60.0, 20.0).with_line_break_mode(LineBreakMode::TruncateMiddle),
        );
        assert_eq!(names(&middle), ["a", "b", "ellipsis", "g", "h"]);
    }

    #[test]
    fn test_clip_stops_at_container_edge() {
        let layout = MonospaceLayout::new().layout(
            &request("abcdefgh", 30.0, 20.0).with_line_break_mode(LineBreakMode::Clip),
        );
        // The third cell straddles the edge and is narrowed.
        assert_eq!(names(&layout), ["a", "b", "c"]);
        assert_eq!(layout.glyphs[2].layout_rect.width(), 6.0);
    }

    #[test]
    fn test_container_height_limits_lines() {
        let layout = MonospaceLayout::new().layout(
            &request("ab cd", 40.0, 25.0)
                .with_line_break_mode(LineBreakMode::WordWrap)
                .with_max_lines(0),
        );
        assert_eq!(names(&layout), ["a", "b", "space"]);
    }

    #[test]
    fn test_empty_text() {
        let layout = MonospaceLayout::new().layout(&request("", 100.0, 20.0));
        assert!(layout.glyphs.is_empty());
        assert_eq!(layout.size, Size::ZERO);
    }

    #[test]
    fn test_size_fitting() {
        let provider = MonospaceLayout::new();
        let base = request("ab cd", 0.0, 0.0)
            .with_line_break_mode(LineBreakMode::WordWrap)
            .with_max_lines(0);
        assert_eq!(provider.size_fitting(&base, Size::UNBOUNDED), Size::new(60.0, 20.0));
        assert_eq!(
            provider.size_fitting(&base, Size::new(40.0, f32::MAX)),
            Size::new(24.0, 40.0)
        );
    }
}
