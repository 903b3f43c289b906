use textwrap::wrap;

use super::colors::{theme, Rgb};
use super::geometry::{Bounds2D, Idx, Rectangle};
use super::surface::Surface;
use super::tuxel::Tuxel;
use crate::engine::board::Token;

/// A 2d grid of `Tuxel`s that remembers which of them changed since the last render.
pub(crate) struct Canvas {
    grid: Vec<Vec<Tuxel>>,
    rectangle: Rectangle,
    dirty: Vec<Vec<bool>>,
    queue: Vec<Idx>,
}

impl Canvas {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        let rectangle = Rectangle(Idx(0, 0), Bounds2D(width, height));
        let grid = (0..height)
            .map(|y| (0..width).map(|x| Tuxel::new(Idx(x, y))).collect())
            .collect();
        Self {
            grid,
            rectangle,
            dirty: vec![vec![false; width]; height],
            queue: Vec::new(),
        }
    }

    pub(crate) fn dimensions(&self) -> (usize, usize) {
        (self.rectangle.width(), self.rectangle.height())
    }

    pub(crate) fn rectangle(&self) -> &Rectangle {
        &self.rectangle
    }

    pub(crate) fn get(&self, idx: &Idx) -> Option<&Tuxel> {
        self.grid.get(idx.y()).and_then(|row| row.get(idx.x()))
    }

    /// Every tuxel, row by row.
    pub(crate) fn tuxels(&self) -> impl Iterator<Item = &Tuxel> {
        self.grid.iter().flatten()
    }

    /// Takes the indices of every tuxel changed since the last call, in the order they first
    /// changed.
    pub(crate) fn drain_dirty(&mut self) -> Vec<Idx> {
        for idx in self.queue.iter() {
            self.dirty[idx.y()][idx.x()] = false;
        }
        std::mem::take(&mut self.queue)
    }

    /// Paints a single tuxel; writes outside the canvas are dropped.
    pub(crate) fn paint(&mut self, idx: &Idx, content: Option<char>, fg: Option<&Rgb>, bg: Option<&Rgb>) {
        let tuxel = match self.grid.get_mut(idx.y()).and_then(|row| row.get_mut(idx.x())) {
            Some(t) => t,
            None => return,
        };
        if tuxel.paint(content, fg, bg) && !self.dirty[idx.y()][idx.x()] {
            self.dirty[idx.y()][idx.x()] = true;
            self.queue.push(idx.clone());
        }
    }

    pub(crate) fn fill(&mut self, rect: &Rectangle, c: char, fg: Option<&Rgb>, bg: Option<&Rgb>) {
        for idx in rect.indices() {
            self.paint(&idx, Some(c), fg, bg);
        }
    }

    /// Writes `s` on a single line starting at `at`, keeping the background.
    pub(crate) fn write_left(&mut self, at: &Idx, s: &str, fg: Option<&Rgb>) {
        for (offset, c) in s.chars().enumerate() {
            self.paint(&Idx(at.x() + offset, at.y()), Some(c), fg, None);
        }
    }

    /// Wraps `s` to the width of `rect` and writes it centered both ways.
    pub(crate) fn write_center(&mut self, rect: &Rectangle, s: &str, fg: Option<&Rgb>) {
        if rect.width() == 0 {
            return;
        }
        let lines = wrap(s, rect.width());
        let y_offset = rect.height().saturating_sub(lines.len()) / 2;
        for (row, line) in lines.iter().take(rect.height()).enumerate() {
            let len = line.chars().count();
            let x_offset = rect.width().saturating_sub(len) / 2;
            self.write_left(&Idx(rect.x() + x_offset, rect.y() + y_offset + row), line, fg);
        }
    }

    /// Draws a doubled box along the edges of `rect`. Rectangles a single row tall get brackets
    /// on either end instead.
    pub(crate) fn draw_border(&mut self, rect: &Rectangle, fg: Option<&Rgb>) {
        if rect.width() < 2 || rect.height() == 0 {
            return;
        }
        let (right, bottom) = (rect.x() + rect.width() - 1, rect.y() + rect.height() - 1);
        if rect.height() < 2 {
            self.paint(&Idx(rect.x(), rect.y()), Some('['), fg, None);
            self.paint(&Idx(right, rect.y()), Some(']'), fg, None);
            return;
        }

        let box_corner = boxy::Char::upper_left(boxy::Weight::Doubled);
        let box_horizontal = boxy::Char::horizontal(boxy::Weight::Doubled);
        let box_vertical = boxy::Char::vertical(boxy::Weight::Doubled);

        for x in (rect.x() + 1)..right {
            self.paint(&Idx(x, rect.y()), Some(box_horizontal.clone().into()), fg, None);
            self.paint(&Idx(x, bottom), Some(box_horizontal.clone().into()), fg, None);
        }
        for y in (rect.y() + 1)..bottom {
            self.paint(&Idx(rect.x(), y), Some(box_vertical.clone().into()), fg, None);
            self.paint(&Idx(right, y), Some(box_vertical.clone().into()), fg, None);
        }

        self.paint(&Idx(rect.x(), rect.y()), Some(box_corner.clone().into()), fg, None);
        self.paint(&Idx(right, rect.y()), Some(box_corner.clone().rotate_cw(1).into()), fg, None);
        self.paint(&Idx(right, bottom), Some(box_corner.clone().rotate_cw(2).into()), fg, None);
        self.paint(&Idx(rect.x(), bottom), Some(box_corner.clone().rotate_ccw(1).into()), fg, None);
    }
}

impl Surface for Canvas {
    fn clear_region(&mut self, rect: &Rectangle) {
        self.fill(rect, ' ', None, Some(&theme().board));
    }

    fn draw_token(&mut self, cell: &Rectangle, token: Token, scale: f64) {
        let scale = scale.clamp(0.0, 1.0);
        let width = (cell.width() as f64 * scale).round() as usize;
        let height = (cell.height() as f64 * scale).round() as usize;
        if width == 0 || height == 0 {
            return;
        }
        let theme = theme();
        let color = theme.token(token);
        let rect = cell.center(Bounds2D(width, height));
        self.fill(&rect, ' ', None, Some(color));

        let glyph_at = Idx(rect.x() + (width - 1) / 2, rect.y() + (height - 1) / 2);
        self.paint(&glyph_at, Some(theme.glyph(token)), Some(&color.lighten(-0.5)), None);
    }
}
