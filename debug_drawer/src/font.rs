//! Minimal stroke font for debug text.
//!
//! Glyphs are polylines on a 4x6 grid with the origin at the bottom-left
//! corner. Lower-case letters use the upper-case glyphs.

type Stroke = &'static [(i8, i8)];

/// Grid units from one glyph origin to the next.
const ADVANCE: f32 = 6.0;
/// Grid units between baselines.
const LINE_HEIGHT: f32 = 8.0;
const GLYPH_WIDTH: f32 = 4.0;
const GLYPH_HEIGHT: f32 = 6.0;

/// Strokes of `c`, or `None` if the font has no glyph for it.
fn glyph(c: char) -> Option<&'static [Stroke]> {
    let strokes: &'static [Stroke] = match c.to_ascii_uppercase() {
        ' ' => &[],
        'A' => &[&[(0, 0), (0, 4), (2, 6), (4, 4), (4, 0)], &[(0, 3), (4, 3)]],
        'B' => &[
            &[(0, 0), (0, 6), (3, 6), (4, 5), (4, 4), (3, 3), (0, 3)],
            &[(3, 3), (4, 2), (4, 1), (3, 0), (0, 0)],
        ],
        'C' => &[&[(4, 6), (0, 6), (0, 0), (4, 0)]],
        'D' => &[&[(0, 0), (0, 6), (2, 6), (4, 4), (4, 2), (2, 0), (0, 0)]],
        'E' => &[&[(4, 6), (0, 6), (0, 0), (4, 0)], &[(0, 3), (3, 3)]],
        'F' => &[&[(4, 6), (0, 6), (0, 0)], &[(0, 3), (3, 3)]],
        'G' => &[&[(4, 6), (0, 6), (0, 0), (4, 0), (4, 3), (2, 3)]],
        'H' => &[&[(0, 0), (0, 6)], &[(4, 0), (4, 6)], &[(0, 3), (4, 3)]],
        'I' => &[&[(1, 6), (3, 6)], &[(2, 6), (2, 0)], &[(1, 0), (3, 0)]],
        'J' => &[&[(4, 6), (4, 0), (0, 0), (0, 2)]],
        'K' => &[&[(0, 0), (0, 6)], &[(4, 6), (0, 3), (4, 0)]],
        'L' => &[&[(0, 6), (0, 0), (4, 0)]],
        'M' => &[&[(0, 0), (0, 6), (2, 3), (4, 6), (4, 0)]],
        'N' => &[&[(0, 0), (0, 6), (4, 0), (4, 6)]],
        'O' => &[&[(0, 0), (0, 6), (4, 6), (4, 0), (0, 0)]],
        'P' => &[&[(0, 0), (0, 6), (4, 6), (4, 3), (0, 3)]],
        'Q' => &[&[(0, 0), (0, 6), (4, 6), (4, 0), (0, 0)], &[(2, 2), (4, 0)]],
        'R' => &[&[(0, 0), (0, 6), (4, 6), (4, 3), (0, 3), (4, 0)]],
        'S' => &[&[(4, 6), (0, 6), (0, 3), (4, 3), (4, 0), (0, 0)]],
        'T' => &[&[(0, 6), (4, 6)], &[(2, 6), (2, 0)]],
        'U' => &[&[(0, 6), (0, 0), (4, 0), (4, 6)]],
        'V' => &[&[(0, 6), (2, 0), (4, 6)]],
        'W' => &[&[(0, 6), (1, 0), (2, 3), (3, 0), (4, 6)]],
        'X' => &[&[(0, 0), (4, 6)], &[(0, 6), (4, 0)]],
        'Y' => &[&[(0, 6), (2, 3), (4, 6)], &[(2, 3), (2, 0)]],
        'Z' => &[&[(0, 6), (4, 6), (0, 0), (4, 0)]],
        '0' => &[&[(0, 0), (0, 6), (4, 6), (4, 0), (0, 0), (4, 6)]],
        '1' => &[&[(1, 5), (2, 6), (2, 0)], &[(1, 0), (3, 0)]],
        '2' => &[&[(0, 6), (4, 6), (4, 3), (0, 3), (0, 0), (4, 0)]],
        '3' => &[&[(0, 6), (4, 6), (4, 0), (0, 0)], &[(1, 3), (4, 3)]],
        '4' => &[&[(0, 6), (0, 3), (4, 3)], &[(4, 6), (4, 0)]],
        '5' => &[&[(4, 6), (0, 6), (0, 3), (3, 3), (4, 2), (4, 0), (0, 0)]],
        '6' => &[&[(4, 6), (0, 6), (0, 0), (4, 0), (4, 3), (0, 3)]],
        '7' => &[&[(0, 6), (4, 6), (2, 0)]],
        '8' => &[&[(0, 0), (0, 6), (4, 6), (4, 0), (0, 0)], &[(0, 3), (4, 3)]],
        '9' => &[&[(4, 3), (0, 3), (0, 6), (4, 6), (4, 0), (0, 0)]],
        '.' => &[&[(2, 0), (2, 1)]],
        ',' => &[&[(2, 1), (1, -1)]],
        ':' => &[&[(2, 1), (2, 2)], &[(2, 4), (2, 5)]],
        ';' => &[&[(2, 4), (2, 5)], &[(2, 2), (1, 0)]],
        '!' => &[&[(2, 6), (2, 2)], &[(2, 1), (2, 0)]],
        '?' => &[
            &[(0, 5), (1, 6), (3, 6), (4, 5), (4, 4), (2, 3), (2, 2)],
            &[(2, 1), (2, 0)],
        ],
        '-' => &[&[(0, 3), (4, 3)]],
        '+' => &[&[(0, 3), (4, 3)], &[(2, 1), (2, 5)]],
        '_' => &[&[(0, 0), (4, 0)]],
        '/' => &[&[(0, 0), (4, 6)]],
        '(' => &[&[(3, 6), (1, 4), (1, 2), (3, 0)]],
        ')' => &[&[(1, 6), (3, 4), (3, 2), (1, 0)]],
        '\'' => &[&[(2, 6), (2, 4)]],
        '"' => &[&[(1, 6), (1, 4)], &[(3, 6), (3, 4)]],
        '=' => &[&[(0, 2), (4, 2)], &[(0, 4), (4, 4)]],
        '*' => &[&[(0, 1), (4, 5)], &[(0, 5), (4, 1)], &[(2, 0), (2, 6)]],
        '<' => &[&[(4, 6), (0, 3), (4, 0)]],
        '>' => &[&[(0, 6), (4, 3), (0, 0)]],
        _ => return None,
    };
    Some(strokes)
}

/// Lay out `text` as 2D line segments.
///
/// `height` is the glyph height. The first line sits on `y = 0` and further
/// lines go down. With `centered` the whole block is centered on the origin.
pub(crate) fn layout_text(text: &str, height: f32, centered: bool) -> Vec<[[f32; 2]; 2]> {
    let unit = height / GLYPH_HEIGHT;
    let mut segments = Vec::new();
    let mut line = 0usize;
    let mut column = 0usize;
    let mut max_columns = 0usize;

    for c in text.chars() {
        if c == '\n' {
            line += 1;
            column = 0;
            continue;
        }
        match glyph(c) {
            Some(strokes) => {
                let x0 = column as f32 * ADVANCE;
                let y0 = -(line as f32) * LINE_HEIGHT;
                for stroke in strokes {
                    for pair in stroke.windows(2) {
                        let (ax, ay) = pair[0];
                        let (bx, by) = pair[1];
                        segments.push([
                            [x0 + f32::from(ax), y0 + f32::from(ay)],
                            [x0 + f32::from(bx), y0 + f32::from(by)],
                        ]);
                    }
                }
            }
            None => log::trace!("No debug glyph for {:?}", c),
        }
        column += 1;
        max_columns = max_columns.max(column);
    }

    let (dx, dy) = if centered && max_columns > 0 {
        let width = (max_columns - 1) as f32 * ADVANCE + GLYPH_WIDTH;
        let top = GLYPH_HEIGHT;
        let bottom = -(line as f32) * LINE_HEIGHT;
        (width * 0.5, (top + bottom) * 0.5)
    } else {
        (0.0, 0.0)
    };

    for segment in &mut segments {
        for point in segment.iter_mut() {
            point[0] = (point[0] - dx) * unit;
            point[1] = (point[1] - dy) * unit;
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("-", 1)]
    #[case(" ", 0)]
    #[case("#", 0)]
    #[case("AH", 8)]
    #[case("a", 5)]
    #[case("x\ny", 5)]
    fn test_segment_counts(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(layout_text(text, 6.0, false).len(), expected);
    }

    #[test]
    fn test_lower_case_uses_upper_case_glyphs() {
        assert_eq!(layout_text("hello", 1.0, false), layout_text("HELLO", 1.0, false));
    }

    #[test]
    fn test_unsupported_characters_advance() {
        let segments = layout_text("#-", 6.0, false);
        assert_eq!(segments, vec![[[6.0, 3.0], [10.0, 3.0]]]);
    }

    #[test]
    fn test_newline_moves_down() {
        let segments = layout_text("\n_", 6.0, false);
        assert_eq!(segments, vec![[[0.0, -8.0], [4.0, -8.0]]]);
    }

    #[test]
    fn test_scale() {
        let segments = layout_text("-", 0.6, false);
        let [a, b] = segments[0];
        assert!((a[1] - 0.3).abs() < 1e-6);
        assert!((b[0] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_centered() {
        let segments = layout_text("-", 6.0, true);
        assert_eq!(segments, vec![[[-2.0, 0.0], [2.0, 0.0]]]);
    }
}
