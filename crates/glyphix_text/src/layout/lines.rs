//! Line breaking and truncation over shaped glyphs

use super::{LineBreakMode, LogicalGlyph};
use rustc_hash::FxHashSet;
use std::ops::Range;

pub(crate) const ELLIPSIS: &str = "\u{2026}";

fn char_at(text: &str, cluster: usize) -> Option<char> {
    text.get(cluster..).and_then(|rest| rest.chars().next())
}

fn is_separator(text: &str, glyph: &LogicalGlyph) -> bool {
    matches!(
        char_at(text, glyph.cluster),
        Some('\n' | '\u{2028}' | '\u{2029}')
    )
}

fn is_whitespace(text: &str, glyph: &LogicalGlyph) -> bool {
    char_at(text, glyph.cluster).is_some_and(char::is_whitespace)
}

fn advance(glyphs: &[LogicalGlyph]) -> f32 {
    glyphs.iter().map(|g| g.advance).sum()
}

/// Width without trailing whitespace, which hangs past the line end
pub(crate) fn visible_width(text: &str, glyphs: &[LogicalGlyph]) -> f32 {
    let end = glyphs
        .iter()
        .rposition(|g| !is_whitespace(text, g))
        .map_or(0, |i| i + 1);
    advance(&glyphs[..end])
}

/// Consecutive glyph ranges sharing a cluster; never split across lines
fn cluster_units(glyphs: &[LogicalGlyph], range: Range<usize>) -> Vec<Range<usize>> {
    let mut units = Vec::new();
    let mut start = range.start;
    for i in range.start + 1..range.end {
        if glyphs[i].cluster != glyphs[i - 1].cluster {
            units.push(start..i);
            start = i;
        }
    }
    if start < range.end {
        units.push(start..range.end);
    }
    units
}

/// Break glyphs into lines as ranges into `glyphs`.
///
/// Paragraph separators end a line and are left out of every range. Word
/// modes break at Unicode line break opportunities and fall back to
/// character breaks for words wider than the container.
pub(crate) fn wrap(
    text: &str,
    glyphs: &[LogicalGlyph],
    width: f32,
    mode: LineBreakMode,
) -> Vec<Range<usize>> {
    let breaks: FxHashSet<usize> = unicode_linebreak::linebreaks(text)
        .map(|(offset, _)| offset)
        .collect();

    let mut lines = Vec::new();
    let mut paragraph_start = 0;
    for (i, glyph) in glyphs.iter().enumerate() {
        if is_separator(text, glyph) {
            wrap_paragraph(text, glyphs, paragraph_start..i, width, mode, &breaks, &mut lines);
            paragraph_start = i + 1;
        }
    }
    // A trailing separator doesn't open another line.
    if paragraph_start < glyphs.len() || paragraph_start == 0 {
        wrap_paragraph(
            text,
            glyphs,
            paragraph_start..glyphs.len(),
            width,
            mode,
            &breaks,
            &mut lines,
        );
    }
    lines
}

fn wrap_paragraph(
    text: &str,
    glyphs: &[LogicalGlyph],
    paragraph: Range<usize>,
    width: f32,
    mode: LineBreakMode,
    breaks: &FxHashSet<usize>,
    lines: &mut Vec<Range<usize>>,
) {
    if paragraph.is_empty() {
        lines.push(paragraph);
        return;
    }

    let mut segments = Vec::new();
    let mut segment_start = paragraph.start;
    for i in paragraph.start + 1..paragraph.end {
        let cluster = glyphs[i].cluster;
        let boundary = cluster != glyphs[i - 1].cluster
            && (mode == LineBreakMode::CharWrap || breaks.contains(&cluster));
        if boundary {
            segments.push(segment_start..i);
            segment_start = i;
        }
    }
    segments.push(segment_start..paragraph.end);

    let mut line_start = paragraph.start;
    let mut line_width = 0.0;
    for segment in segments {
        let segment_glyphs = &glyphs[segment.clone()];
        let segment_visible = visible_width(text, segment_glyphs);

        if line_start < segment.start && line_width + segment_visible > width {
            lines.push(line_start..segment.start);
            line_start = segment.start;
            line_width = 0.0;
        }

        if line_start == segment.start && segment_visible > width {
            let mut piece_start = segment.start;
            let mut piece_width = 0.0;
            for unit in cluster_units(glyphs, segment.clone()) {
                let unit_glyphs = &glyphs[unit.clone()];
                let unit_width = advance(unit_glyphs);
                let hangs = unit_glyphs.iter().all(|g| is_whitespace(text, g));
                if piece_start < unit.start && !hangs && piece_width + unit_width > width {
                    lines.push(piece_start..unit.start);
                    piece_start = unit.start;
                    piece_width = 0.0;
                }
                piece_width += unit_width;
            }
            line_start = piece_start;
            line_width = piece_width;
            continue;
        }

        line_width += advance(segment_glyphs);
    }
    lines.push(line_start..paragraph.end);
}

/// Glyphs from `start` to the end of the text, paragraphs joined
pub(crate) fn remaining(text: &str, glyphs: &[LogicalGlyph], start: usize) -> Vec<LogicalGlyph> {
    glyphs[start..]
        .iter()
        .filter(|g| !is_separator(text, g))
        .cloned()
        .collect()
}

/// Longest prefix of whole clusters within `budget`
fn prefix_within(glyphs: &[LogicalGlyph], budget: f32) -> (usize, f32) {
    let mut end = 0;
    let mut used = 0.0;
    for unit in cluster_units(glyphs, 0..glyphs.len()) {
        let unit_width = advance(&glyphs[unit.clone()]);
        if used + unit_width > budget {
            break;
        }
        used += unit_width;
        end = unit.end;
    }
    (end, used)
}

/// Start of the longest suffix of whole clusters within `budget`
fn suffix_within(glyphs: &[LogicalGlyph], budget: f32) -> usize {
    let mut start = glyphs.len();
    let mut used = 0.0;
    for unit in cluster_units(glyphs, 0..glyphs.len()).into_iter().rev() {
        let unit_width = advance(&glyphs[unit.clone()]);
        if used + unit_width > budget {
            break;
        }
        used += unit_width;
        start = unit.start;
    }
    start
}

/// Last line with an ellipsis appended, cut at the end to fit
pub(crate) fn truncate_tail(
    text: &str,
    mut line: Vec<LogicalGlyph>,
    ellipsis: &[LogicalGlyph],
    width: f32,
) -> Vec<LogicalGlyph> {
    while line.last().is_some_and(|g| is_whitespace(text, g)) {
        line.pop();
    }
    let ellipsis_width = advance(ellipsis);
    if advance(&line) + ellipsis_width > width {
        let (end, _) = prefix_within(&line, width - ellipsis_width);
        line.truncate(end);
    }
    line.extend_from_slice(ellipsis);
    line
}

/// Remaining text cut at the start to fit behind an ellipsis
pub(crate) fn truncate_head(
    line: Vec<LogicalGlyph>,
    ellipsis: &[LogicalGlyph],
    width: f32,
) -> Vec<LogicalGlyph> {
    if advance(&line) <= width {
        return line;
    }
    let start = suffix_within(&line, width - advance(ellipsis));
    let mut truncated = ellipsis.to_vec();
    truncated.extend_from_slice(&line[start..]);
    truncated
}

/// Remaining text with its middle replaced by an ellipsis
pub(crate) fn truncate_middle(
    line: Vec<LogicalGlyph>,
    ellipsis: &[LogicalGlyph],
    width: f32,
) -> Vec<LogicalGlyph> {
    if advance(&line) <= width {
        return line;
    }
    let budget = width - advance(ellipsis);
    let (prefix_end, prefix_width) = prefix_within(&line, budget / 2.0);
    let suffix_start =
        prefix_end + suffix_within(&line[prefix_end..], budget - prefix_width);

    let mut truncated = line[..prefix_end].to_vec();
    truncated.extend_from_slice(ellipsis);
    truncated.extend_from_slice(&line[suffix_start..]);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Font;
    use glyphix_core::{Point, Rect};

    fn glyphs(text: &str) -> Vec<LogicalGlyph> {
        text.char_indices()
            .map(|(cluster, c)| LogicalGlyph {
                cluster,
                glyph_id: c as u16,
                glyph_name: Some(c.to_string()),
                font: Font::system(10.0),
                advance: if c == '\n' { 0.0 } else { 10.0 },
                offset: Point::ZERO,
                bounds: Rect::ZERO,
                ascent: 8.0,
                descent: 2.0,
            })
            .collect()
    }

    fn text_of(glyphs: &[LogicalGlyph]) -> String {
        glyphs
            .iter()
            .filter_map(|g| g.glyph_name.clone())
            .collect()
    }

    #[test]
    fn test_wrap_hangs_trailing_space() {
        let text = "ab cd";
        let lines = wrap(text, &glyphs(text), 20.0, LineBreakMode::WordWrap);
        assert_eq!(lines, vec![0..3, 3..5]);
    }

    #[test]
    fn test_wrap_keeps_words_together() {
        let text = "ab cd ef";
        let lines = wrap(text, &glyphs(text), 55.0, LineBreakMode::WordWrap);
        assert_eq!(lines, vec![0..6, 6..8]);
    }

    #[test]
    fn test_wrap_empty_paragraphs() {
        let text = "a\n\nb\n";
        let lines = wrap(text, &glyphs(text), 100.0, LineBreakMode::WordWrap);
        assert_eq!(lines, vec![0..1, 2..2, 3..4]);
    }

    #[test]
    fn test_visible_width_ignores_trailing_space() {
        let text = "ab  ";
        assert_eq!(visible_width(text, &glyphs(text)), 20.0);
        assert_eq!(visible_width("  ", &glyphs("  ")), 0.0);
    }

    #[test]
    fn test_truncate_tail_trims_whitespace() {
        let text = "ab ";
        let ellipsis = glyphs(".");
        let line = truncate_tail(text, glyphs(text), &ellipsis, 100.0);
        assert_eq!(text_of(&line), "ab.");
    }

    #[test]
    fn test_truncate_middle_splits_budget() {
        let text = "abcdefghij";
        let ellipsis = glyphs(".");
        let line = truncate_middle(glyphs(text), &ellipsis, 70.0);
        assert_eq!(text_of(&line), "abc.hij");
    }

    #[test]
    fn test_remaining_joins_paragraphs() {
        let text = "ab\ncd";
        assert_eq!(text_of(&remaining(text, &glyphs(text), 1)), "bcd");
    }
}
