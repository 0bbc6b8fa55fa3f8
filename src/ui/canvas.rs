//! Character-grid canvas

/// Cell coordinates as `(x, y)`
pub type Position = (usize, usize);

/// Drawing surface used by widgets
pub trait Canvas {
    /// Blank the whole surface
    fn clear(&mut self);

    /// Draw text starting at `pos`, clipped to the surface bounds
    fn text(&mut self, pos: Position, text: &str);
}

/// Fixed-size grid of characters, rendered to a multi-line string
#[derive(Debug, Clone)]
pub struct TextCanvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl TextCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Render the grid, one line per row, trailing blanks trimmed
    pub fn render(&self) -> String {
        if self.width == 0 {
            return String::new();
        }
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Canvas for TextCanvas {
    fn clear(&mut self) {
        self.cells.fill(' ');
    }

    fn text(&mut self, (x, y): Position, text: &str) {
        if y >= self.height {
            return;
        }
        let row = y * self.width;
        for (offset, ch) in text.chars().enumerate() {
            let col = x + offset;
            if col >= self.width {
                break;
            }
            self.cells[row + col] = ch;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_render() {
        let mut canvas = TextCanvas::new(10, 3);
        canvas.text((0, 0), "CH 6");
        canvas.text((2, 2), "(◕‿‿◕)");

        assert_eq!(canvas.render(), "CH 6\n\n  (◕‿‿◕)");
    }

    #[test]
    fn test_clipping() {
        let mut canvas = TextCanvas::new(5, 1);
        canvas.text((3, 0), "abcdef");
        canvas.text((0, 4), "ignored");

        assert_eq!(canvas.render(), "   ab");
    }

    #[test]
    fn test_clear() {
        let mut canvas = TextCanvas::new(4, 2);
        canvas.text((0, 1), "xx");
        canvas.clear();
        assert_eq!(canvas.render(), "\n");
    }
}
