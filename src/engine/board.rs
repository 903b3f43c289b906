/// Number of columns on the board.
pub(crate) const WIDTH: usize = 8;

/// Number of rows on the board.
pub(crate) const HEIGHT: usize = 8;

/// Number of distinct token kinds.
pub(crate) const KINDS: u8 = 5;

/// Shortest run of identical tokens that gets removed.
pub(crate) const MIN_RUN: usize = 3;

/// Idx addresses a single board cell; column first, row 0 is the top row.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct Idx(pub(crate) usize, pub(crate) usize);

impl std::fmt::Display for Idx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bidx({0},{1})", self.0, self.1)
    }
}

impl Idx {
    #[inline(always)]
    pub(crate) fn x(&self) -> usize {
        self.0
    }

    #[inline(always)]
    pub(crate) fn y(&self) -> usize {
        self.1
    }

    /// Manhattan distance between two cells.
    pub(crate) fn distance(&self, other: &Idx) -> usize {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }

    pub(crate) fn in_bounds(&self) -> bool {
        self.0 < WIDTH && self.1 < HEIGHT
    }
}

/// Token is one of the `KINDS` coloured gems that can occupy a cell.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Token(u8);

impl Token {
    pub(crate) fn new(kind: u8) -> Self {
        debug_assert!(kind < KINDS, "token kind {} out of range", kind);
        Self(kind)
    }

    pub(crate) fn kind(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cell either holds a token or is empty and waiting to be refilled.
pub(crate) type Slot = Option<Token>;

pub(crate) type Column = [Slot; HEIGHT];

/// Board is the fixed-size matrix of slots, stored column-major.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Board {
    columns: [Column; WIDTH],
}

impl Default for Board {
    fn default() -> Self {
        Self {
            columns: [[None; HEIGHT]; WIDTH],
        }
    }
}

impl Board {
    pub(crate) fn get(&self, idx: &Idx) -> Slot {
        self.columns[idx.x()][idx.y()]
    }

    pub(crate) fn set(&mut self, idx: &Idx, slot: Slot) {
        self.columns[idx.x()][idx.y()] = slot;
    }

    pub(crate) fn swap(&mut self, a: &Idx, b: &Idx) {
        let tmp = self.get(a);
        self.set(a, self.get(b));
        self.set(b, tmp);
    }

    pub(crate) fn column(&self, x: usize) -> &Column {
        &self.columns[x]
    }

    /// Empties every cell.
    pub(crate) fn clear(&mut self) {
        self.columns = [[None; HEIGHT]; WIDTH];
    }

    pub(crate) fn is_full(&self) -> bool {
        self.columns.iter().flatten().all(Option::is_some)
    }

    /// Removes rows `start..=end` of column `x`. Everything above the removed rows drops down by
    /// the length of the removed run and the vacated top cells become empty.
    pub(crate) fn collapse(&mut self, x: usize, start: usize, end: usize) {
        let len = end - start + 1;
        let column = &mut self.columns[x];
        column.copy_within(0..start, len);
        column[..len].fill(None);
    }

    /// Every cell index in column-major order.
    pub(crate) fn indices() -> impl Iterator<Item = Idx> {
        (0..WIDTH).flat_map(|x| (0..HEIGHT).map(move |y| Idx(x, y)))
    }

    /// Builds a board from rows as they appear on screen; values outside the token range become
    /// empty cells.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: [[u8; WIDTH]; HEIGHT]) -> Self {
        let mut board = Board::default();
        for (y, row) in rows.iter().enumerate() {
            for (x, value) in row.iter().enumerate() {
                let slot = if *value < KINDS {
                    Some(Token::new(*value))
                } else {
                    None
                };
                board.set(&Idx(x, y), slot);
            }
        }
        board
    }

    /// A full board in which no two horizontal or vertical neighbours share a token and the last
    /// token kind is never used, so tests can paint runs of it without accidental extensions.
    #[cfg(test)]
    pub(crate) fn without_runs() -> Self {
        let mut board = Board::default();
        for idx in Board::indices() {
            let kind = (idx.x() + 2 * idx.y()) % (KINDS as usize - 1);
            board.set(&idx, Some(Token::new(kind as u8)));
        }
        board
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                match self.get(&Idx(x, y)) {
                    Some(token) => write!(f, "{}", token)?,
                    None => write!(f, ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case::same_cell(Idx(3, 3), Idx(3, 3), 0)]
    #[case::left(Idx(3, 3), Idx(2, 3), 1)]
    #[case::below(Idx(3, 3), Idx(3, 4), 1)]
    #[case::diagonal(Idx(3, 3), Idx(4, 4), 2)]
    #[case::far(Idx(0, 0), Idx(7, 7), 14)]
    fn distance(#[case] a: Idx, #[case] b: Idx, #[case] expected: usize) {
        assert_eq!(a.distance(&b), expected);
        assert_eq!(b.distance(&a), expected);
    }

    #[test]
    fn indices_are_column_major() {
        let idxs: Vec<Idx> = Board::indices().take(HEIGHT + 1).collect();
        assert_eq!(idxs[0], Idx(0, 0));
        assert_eq!(idxs[1], Idx(0, 1));
        assert_eq!(idxs[HEIGHT], Idx(1, 0));
        assert_eq!(Board::indices().count(), WIDTH * HEIGHT);
    }

    #[test]
    fn collapse_shifts_survivors_down() {
        let mut board = Board::default();
        for y in 0..HEIGHT {
            board.set(&Idx(2, y), Some(Token::new((y % 5) as u8)));
        }
        // remove rows 3..=5; rows 0..=2 should land on rows 3..=5
        board.collapse(2, 3, 5);
        let column = board.column(2);
        assert_eq!(column[..3], [None, None, None]);
        assert_eq!(column[3], Some(Token::new(0)));
        assert_eq!(column[4], Some(Token::new(1)));
        assert_eq!(column[5], Some(Token::new(2)));
        assert_eq!(column[6], Some(Token::new(1)));
        assert_eq!(column[7], Some(Token::new(2)));
    }

    #[test]
    fn collapse_at_top_only_empties() {
        let mut board = Board::from_rows([[1; WIDTH]; HEIGHT]);
        board.collapse(0, 0, 2);
        assert_eq!(board.column(0)[..3], [None, None, None]);
        assert!(board.column(0)[3..].iter().all(|s| *s == Some(Token::new(1))));
    }

    #[test]
    fn swap_exchanges_slots() {
        let mut board = Board::default();
        board.set(&Idx(0, 0), Some(Token::new(1)));
        board.set(&Idx(1, 0), Some(Token::new(2)));
        board.swap(&Idx(0, 0), &Idx(1, 0));
        assert_eq!(board.get(&Idx(0, 0)), Some(Token::new(2)));
        assert_eq!(board.get(&Idx(1, 0)), Some(Token::new(1)));
    }

    #[test]
    fn display_rows() {
        let mut board = Board::default();
        board.set(&Idx(1, 0), Some(Token::new(4)));
        let rendered = format!("{}", board);
        let first = rendered.lines().next().expect("board has rows");
        assert_eq!(first, ".4......");
        assert!(!board.is_full());
    }
}
