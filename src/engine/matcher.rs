use super::board::{Board, Idx, Slot, Token, HEIGHT, MIN_RUN, WIDTH};

/// Axis along which a run of identical tokens was found.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Axis {
    Horizontal,
    Vertical,
}

/// Run is a maximal line of at least `MIN_RUN` identical tokens, as found on the board. Each run
/// becomes a single removal effect.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Run {
    pub(crate) origin: Idx,
    pub(crate) len: usize,
    pub(crate) axis: Axis,
    pub(crate) token: Token,
}

/// Range is an inclusive span of rows `start..=end` in column `x` that must be removed.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) struct Range {
    pub(crate) x: usize,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl Range {
    pub(crate) fn new(x: usize, start: usize, end: usize) -> Self {
        Self { x, start, end }
    }

    pub(crate) fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "range(x={0}, {1}..={2})", self.x, self.start, self.end)
    }
}

/// Matches holds the outcome of one scan: column-scoped ranges to collapse, sorted by column and
/// start row, plus the runs they were derived from.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Matches {
    pub(crate) ranges: Vec<Range>,
    pub(crate) runs: Vec<Run>,
}

impl Matches {
    pub(crate) fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Finds every run of `MIN_RUN` or more identical tokens. Horizontal runs are expanded into one
/// single-row range per covered column, then ranges sharing a column are merged wherever they
/// overlap.
pub(crate) fn find(board: &Board) -> Matches {
    let mut ranges = Vec::new();
    let mut runs = Vec::new();

    for x in 0..WIDTH {
        for (start, len, token) in scan(board.column(x)) {
            ranges.push(Range::new(x, start, start + len - 1));
            runs.push(Run {
                origin: Idx(x, start),
                len,
                axis: Axis::Vertical,
                token,
            });
        }
    }

    for y in 0..HEIGHT {
        let row: Vec<Slot> = (0..WIDTH).map(|x| board.get(&Idx(x, y))).collect();
        for (start, len, token) in scan(&row) {
            ranges.extend((start..start + len).map(|x| Range::new(x, y, y)));
            runs.push(Run {
                origin: Idx(start, y),
                len,
                axis: Axis::Horizontal,
                token,
            });
        }
    }

    Matches {
        ranges: merge(ranges),
        runs,
    }
}

/// Returns `(start, len, token)` for every qualifying run in a line of slots. Empty slots never
/// form a run.
fn scan(line: &[Slot]) -> Vec<(usize, usize, Token)> {
    let mut found = Vec::new();
    let mut start = 0;
    for i in 1..=line.len() {
        if i < line.len() && line[i] == line[start] {
            continue;
        }
        if let Some(token) = line[start] {
            if i - start >= MIN_RUN {
                found.push((start, i - start, token));
            }
        }
        start = i;
    }
    found
}

fn merge(mut ranges: Vec<Range>) -> Vec<Range> {
    ranges.sort();
    let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
    for next in ranges {
        match merged.last_mut() {
            Some(cur) if cur.x == next.x && cur.end >= next.start => {
                cur.end = cur.end.max(next.end);
            }
            _ => merged.push(next),
        }
    }
    merged
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    fn paint(board: &mut Board, cells: &[(usize, usize)], kind: u8) {
        for (x, y) in cells {
            board.set(&Idx(*x, *y), Some(Token::new(kind)));
        }
    }

    #[test]
    fn no_runs() {
        let matches = find(&Board::without_runs());
        assert!(matches.is_empty());
        assert!(matches.runs.is_empty());
    }

    #[test]
    fn empty_board_has_no_runs() {
        assert!(find(&Board::default()).is_empty());
    }

    #[test]
    fn adjacent_vertical_runs_stay_disjoint() {
        let mut board = Board::without_runs();
        paint(&mut board, &[(0, 0), (0, 1), (0, 2)], 1);
        paint(&mut board, &[(0, 3), (0, 4), (0, 5)], 2);
        let matches = find(&board);
        assert_eq!(matches.ranges, vec![Range::new(0, 0, 2), Range::new(0, 3, 5)]);
        assert_eq!(matches.runs.len(), 2);
        assert!(matches.runs.iter().all(|r| r.axis == Axis::Vertical));
    }

    #[test]
    fn horizontal_run_expands_per_column() {
        let mut board = Board::without_runs();
        paint(&mut board, &[(1, 2), (2, 2), (3, 2)], 4);
        let matches = find(&board);
        assert_eq!(
            matches.ranges,
            vec![Range::new(1, 2, 2), Range::new(2, 2, 2), Range::new(3, 2, 2)]
        );
        assert_eq!(
            matches.runs,
            vec![Run {
                origin: Idx(1, 2),
                len: 3,
                axis: Axis::Horizontal,
                token: Token::new(4),
            }]
        );
    }

    #[rstest]
    #[case::corner(
        &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)],
        vec![Range::new(0, 0, 2), Range::new(1, 2, 2), Range::new(2, 2, 2)],
        2,
    )]
    #[case::cross(
        &[(3, 1), (3, 2), (3, 3), (2, 2), (4, 2)],
        vec![Range::new(2, 2, 2), Range::new(3, 1, 3), Range::new(4, 2, 2)],
        2,
    )]
    #[case::vertical_five(
        &[(5, 3), (5, 4), (5, 5), (5, 6), (5, 7)],
        vec![Range::new(5, 3, 7)],
        1,
    )]
    #[case::horizontal_row_end(
        &[(5, 7), (6, 7), (7, 7)],
        vec![Range::new(5, 7, 7), Range::new(6, 7, 7), Range::new(7, 7, 7)],
        1,
    )]
    #[case::stacked_horizontals(
        &[(0, 6), (1, 6), (2, 6), (0, 7), (1, 7), (2, 7)],
        vec![
            Range::new(0, 6, 6),
            Range::new(0, 7, 7),
            Range::new(1, 6, 6),
            Range::new(1, 7, 7),
            Range::new(2, 6, 6),
            Range::new(2, 7, 7),
        ],
        2,
    )]
    fn merged_ranges(
        #[case] cells: &[(usize, usize)],
        #[case] expected: Vec<Range>,
        #[case] runs: usize,
    ) {
        let mut board = Board::without_runs();
        paint(&mut board, cells, 4);
        let matches = find(&board);
        assert_eq!(matches.ranges, expected);
        assert_eq!(matches.runs.len(), runs);
    }

    #[test]
    fn merge_keeps_touching_ranges_apart() {
        let merged = merge(vec![
            Range::new(1, 3, 5),
            Range::new(1, 0, 2),
            Range::new(0, 4, 4),
            Range::new(1, 5, 6),
        ]);
        assert_eq!(
            merged,
            vec![Range::new(0, 4, 4), Range::new(1, 0, 2), Range::new(1, 3, 6)]
        );
    }

    #[test]
    fn empty_slots_never_match() {
        let mut board = Board::without_runs();
        for y in 0..4 {
            board.set(&Idx(6, y), None);
        }
        assert!(find(&board).is_empty());
    }
}
