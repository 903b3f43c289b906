use crate::engine::board::{Idx as BoardIdx, HEIGHT, WIDTH};

/// Idx encapsulates the x and y coordinates of a terminal cell.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Idx(pub usize, pub usize);

impl Idx {
    #[inline(always)]
    pub(crate) fn x(&self) -> usize {
        self.0
    }

    #[inline(always)]
    pub(crate) fn y(&self) -> usize {
        self.1
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Bounds2D(pub usize, pub usize);

impl Bounds2D {
    #[inline(always)]
    pub(crate) fn width(&self) -> usize {
        self.0
    }

    #[inline(always)]
    pub(crate) fn height(&self) -> usize {
        self.1
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Rectangle(pub Idx, pub Bounds2D);

impl Rectangle {
    #[inline(always)]
    pub(crate) fn width(&self) -> usize {
        self.1 .0
    }

    #[inline(always)]
    pub(crate) fn height(&self) -> usize {
        self.1 .1
    }

    #[inline(always)]
    pub(crate) fn x(&self) -> usize {
        self.0 .0
    }

    #[inline(always)]
    pub(crate) fn y(&self) -> usize {
        self.0 .1
    }

    #[inline(always)]
    pub(crate) fn extents(&self) -> (usize, usize) {
        (self.0 .0 + self.1 .0, self.0 .1 + self.1 .1)
    }

    #[inline(always)]
    pub(crate) fn contains(&self, idx: &Idx) -> bool {
        let (x_extent, y_extent) = self.extents();
        idx.x() >= self.x() && idx.x() < x_extent && idx.y() >= self.y() && idx.y() < y_extent
    }

    /// A rectangle of `bounds` centered inside this one.
    pub(crate) fn center(&self, bounds: Bounds2D) -> Rectangle {
        let x = self.x() + self.width().saturating_sub(bounds.width()) / 2;
        let y = self.y() + self.height().saturating_sub(bounds.height()) / 2;
        Rectangle(Idx(x, y), bounds)
    }

    pub(crate) fn indices(&self) -> Indices {
        Indices::from(self.clone())
    }
}

/// Indices iterates row by row over every terminal cell covered by a rectangle.
pub(crate) struct Indices {
    from_x: usize,
    current_x: usize,
    to_x: usize,

    current_y: usize,
    to_y: usize,
}

impl From<Rectangle> for Indices {
    fn from(r: Rectangle) -> Indices {
        let (to_x, to_y) = r.extents();
        Indices {
            from_x: r.x(),
            current_x: r.x(),
            current_y: r.y(),
            to_x,
            to_y,
        }
    }
}

impl Iterator for Indices {
    type Item = Idx;
    fn next(&mut self) -> Option<Self::Item> {
        if self.from_x == self.to_x || self.current_y >= self.to_y {
            return None;
        }
        let idx = Idx(self.current_x, self.current_y);
        self.current_x += 1;
        if self.current_x == self.to_x {
            self.current_x = self.from_x;
            self.current_y += 1;
        }
        Some(idx)
    }
}

/// Direction represents the direction indicated by the player.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum Direction {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        };
        write!(f, "{}", s)
    }
}

/// GridGeometry maps board cells to terminal cells. Every board cell is drawn as a `cell`-sized
/// block, the top-left one starting at `origin`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GridGeometry {
    origin: Idx,
    cell: Bounds2D,
}

impl GridGeometry {
    pub(crate) fn new(origin: Idx, cell: Bounds2D) -> Self {
        Self { origin, cell }
    }

    /// The largest board that fits inside `area`, centered. Terminal cells are roughly twice as
    /// tall as they are wide so each board cell is twice as wide as it is tall.
    pub(crate) fn fit(area: &Rectangle) -> Option<Self> {
        let cell_height = std::cmp::min(area.height() / HEIGHT, area.width() / (2 * WIDTH));
        if cell_height == 0 {
            return None;
        }
        let cell = Bounds2D(2 * cell_height, cell_height);
        let board = area.center(Bounds2D(cell.width() * WIDTH, cell.height() * HEIGHT));
        Some(Self::new(board.0, cell))
    }

    pub(crate) fn cell(&self) -> &Bounds2D {
        &self.cell
    }

    pub(crate) fn cell_x(&self, x: usize) -> usize {
        self.origin.x() + x * self.cell.width()
    }

    pub(crate) fn cell_y(&self, y: usize) -> usize {
        self.origin.y() + y * self.cell.height()
    }

    pub(crate) fn cell_rect(&self, idx: &BoardIdx) -> Rectangle {
        Rectangle(Idx(self.cell_x(idx.x()), self.cell_y(idx.y())), self.cell.clone())
    }

    /// The smallest rectangle covering both cells and everything between them.
    pub(crate) fn span(&self, a: &BoardIdx, b: &BoardIdx) -> Rectangle {
        let (x, y) = (a.x().min(b.x()), a.y().min(b.y()));
        let columns = a.x().abs_diff(b.x()) + 1;
        let rows = a.y().abs_diff(b.y()) + 1;
        Rectangle(
            Idx(self.cell_x(x), self.cell_y(y)),
            Bounds2D(columns * self.cell.width(), rows * self.cell.height()),
        )
    }

    /// The area covered by the whole board.
    pub(crate) fn rect(&self) -> Rectangle {
        self.span(&BoardIdx(0, 0), &BoardIdx(WIDTH - 1, HEIGHT - 1))
    }

    /// Maps a terminal cell to the board cell drawn there, or `None` if it is outside the board.
    pub(crate) fn cell_from_point(&self, point: &Idx) -> Option<BoardIdx> {
        if !self.rect().contains(point) {
            return None;
        }
        Some(BoardIdx(
            (point.x() - self.origin.x()) / self.cell.width(),
            (point.y() - self.origin.y()) / self.cell.height(),
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    fn rectangle(x: usize, y: usize, width: usize, height: usize) -> Rectangle {
        Rectangle(Idx(x, y), Bounds2D(width, height))
    }

    fn geometry() -> GridGeometry {
        GridGeometry::new(Idx(5, 3), Bounds2D(6, 3))
    }

    #[rstest]
    #[case::origin(Idx(5, 3), Some(BoardIdx(0, 0)))]
    #[case::inside_first_cell(Idx(10, 5), Some(BoardIdx(0, 0)))]
    #[case::second_column(Idx(11, 3), Some(BoardIdx(1, 0)))]
    #[case::last_cell(Idx(52, 26), Some(BoardIdx(7, 7)))]
    #[case::left_of_board(Idx(4, 3), None)]
    #[case::above_board(Idx(5, 2), None)]
    #[case::right_of_board(Idx(53, 3), None)]
    #[case::below_board(Idx(5, 27), None)]
    fn cell_from_point(#[case] point: Idx, #[case] expected: Option<BoardIdx>) {
        assert_eq!(geometry().cell_from_point(&point), expected);
    }

    #[rstest]
    #[case::single(BoardIdx(2, 2), BoardIdx(2, 2), rectangle(17, 9, 6, 3))]
    #[case::horizontal(BoardIdx(3, 1), BoardIdx(2, 1), rectangle(17, 6, 12, 3))]
    #[case::vertical(BoardIdx(0, 0), BoardIdx(0, 1), rectangle(5, 3, 6, 6))]
    #[case::board(BoardIdx(7, 7), BoardIdx(0, 0), rectangle(5, 3, 48, 24))]
    fn span(#[case] a: BoardIdx, #[case] b: BoardIdx, #[case] expected: Rectangle) {
        assert_eq!(geometry().span(&a, &b), expected);
    }

    #[rstest]
    #[case::exact(rectangle(0, 0, 16, 8), Some(GridGeometry::new(Idx(0, 0), Bounds2D(2, 1))))]
    #[case::wide(rectangle(0, 0, 100, 16), Some(GridGeometry::new(Idx(34, 0), Bounds2D(4, 2))))]
    #[case::tall(rectangle(0, 2, 32, 40), Some(GridGeometry::new(Idx(0, 14), Bounds2D(4, 2))))]
    #[case::too_small(rectangle(0, 0, 15, 40), None)]
    fn fit(#[case] area: Rectangle, #[case] expected: Option<GridGeometry>) {
        assert_eq!(GridGeometry::fit(&area), expected);
    }

    #[test]
    fn indices_cover_rectangle() {
        let idxs: Vec<Idx> = rectangle(2, 3, 2, 2).indices().collect();
        assert_eq!(idxs, vec![Idx(2, 3), Idx(3, 3), Idx(2, 4), Idx(3, 4)]);
        assert_eq!(rectangle(2, 3, 0, 2).indices().count(), 0);
    }

    #[rstest]
    #[case::inside(Idx(2, 3), true)]
    #[case::last(Idx(3, 4), true)]
    #[case::x_extent(Idx(4, 3), false)]
    #[case::y_extent(Idx(2, 5), false)]
    fn contains(#[case] idx: Idx, #[case] expected: bool) {
        assert_eq!(rectangle(2, 3, 2, 2).contains(&idx), expected);
    }
}
