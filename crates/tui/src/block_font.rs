use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const FONT_HEIGHT: usize = 5;
const FONT_WIDTH: usize = 3;
const SPACING: usize = 1;
const FILL_CHAR: char = '█';

type Glyph = [&'static str; FONT_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('0', ["111", "1 1", "1 1", "1 1", "111"]),
        ('1', [" 1 ", "11 ", " 1 ", " 1 ", "111"]),
        ('2', ["111", "  1", "111", "1  ", "111"]),
        ('3', ["111", "  1", " 11", "  1", "111"]),
        ('4', ["1 1", "1 1", "111", "  1", "  1"]),
        ('5', ["111", "1  ", "111", "  1", "111"]),
        ('6', ["111", "1  ", "111", "1 1", "111"]),
        ('7', ["111", "  1", "  1", " 1 ", " 1 "]),
        ('8', ["111", "1 1", "111", "1 1", "111"]),
        ('9', ["111", "1 1", "111", "  1", "111"]),
        ('?', ["111", "  1", " 11", "   ", " 1 "]),
        ('+', ["   ", " 1 ", "111", " 1 ", "   "]),
        ('=', ["   ", "111", "   ", "111", "   "]),
        (' ', ["   ", "   ", "   ", "   ", "   "]),
    ])
});

/// Render `text` as block numerals, two cells per glyph pixel.
/// Unknown characters fall back to `?`.
pub fn render(text: &str) -> Vec<String> {
    let content: Vec<&Glyph> = text
        .chars()
        .filter_map(|ch| GLYPHS.get(&ch).or_else(|| GLYPHS.get(&'?')))
        .collect();
    if content.is_empty() {
        return vec![String::new(); FONT_HEIGHT];
    }

    let glyph_width = FONT_WIDTH * 2;
    let total_width = width_for(content.len());
    let mut canvas = vec![vec![' '; total_width]; FONT_HEIGHT];

    for (index, glyph) in content.iter().enumerate() {
        paint_glyph(&mut canvas, glyph, index * (glyph_width + SPACING));
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}

/// Columns needed for `glyphs` characters.
pub fn width_for(glyphs: usize) -> usize {
    glyphs * FONT_WIDTH * 2 + glyphs.saturating_sub(1) * SPACING
}

fn paint_glyph(canvas: &mut [Vec<char>], glyph: &Glyph, x_offset: usize) {
    for (row_idx, row) in glyph.iter().enumerate() {
        for (col_idx, symbol) in row.chars().enumerate() {
            if symbol != '1' {
                continue;
            }
            let x = x_offset + col_idx * 2;
            place(canvas, row_idx, x, FILL_CHAR);
            place(canvas, row_idx, x + 1, FILL_CHAR);
        }
    }
}

fn place(canvas: &mut [Vec<char>], y: usize, x: usize, ch: char) {
    if y >= canvas.len() || x >= canvas[y].len() {
        return;
    }
    canvas[y][x] = ch;
}
