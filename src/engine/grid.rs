use std::time::Duration;

use rand::{Rng, RngCore};

use super::board::{Board, Idx, Token};
use super::matcher::{self, Matches, Range, Run};
use super::randomizer::{self, FILL_REWARD};
use crate::animation::effect::{Effect, SCALE_DURATION, SLIDE_STEP_DURATION, SWAP_DURATION};

pub(crate) type Score = u32;

/// SwapOutcome tells the caller what a swap attempt did. Only `Accepted` changes the board.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SwapOutcome {
    Accepted,
    NoSelection,
    NotAdjacent,
    SameToken,
    NoMatch,
}

impl std::fmt::Display for SwapOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Accepted => "accepted",
            Self::NoSelection => "rejected, nothing selected",
            Self::NotAdjacent => "rejected, not adjacent",
            Self::SameToken => "rejected, no effect",
            Self::NoMatch => "rejected, no match produced",
        };
        write!(f, "{}", s)
    }
}

/// Resolution carries everything a swap produced: the outcome, the effects that visualise it in
/// causal order, and the delay after which the last of those effects has finished.
#[derive(Debug)]
pub(crate) struct Resolution {
    pub(crate) outcome: SwapOutcome,
    pub(crate) effects: Vec<Effect>,
    pub(crate) settled: Duration,
}

impl Resolution {
    fn rejected(outcome: SwapOutcome, effects: Vec<Effect>) -> Self {
        let settled = effects
            .iter()
            .map(|e| e.delay() + e.duration())
            .max()
            .unwrap_or_default();
        Self {
            outcome,
            effects,
            settled,
        }
    }
}

/// GridEngine owns the board, the selection and the score, and turns player actions into board
/// mutations plus the effects that make them visible.
pub(crate) struct GridEngine {
    rng: Box<dyn RngCore>,
    board: Board,
    previous: Board,
    selection: Option<Idx>,
    score: Score,
}

impl GridEngine {
    /// Creates an engine with an empty board; call `new_game` to deal the first board. The random
    /// number generator is kept for the lifetime of the engine.
    pub(crate) fn new(rng: impl RngCore + 'static) -> Self {
        Self::with_board(rng, Board::default())
    }

    pub(crate) fn with_board(rng: impl RngCore + 'static, board: Board) -> Self {
        Self {
            rng: Box::new(rng),
            board,
            previous: Board::default(),
            selection: None,
            score: 0,
        }
    }

    pub(crate) fn score(&self) -> Score {
        self.score
    }

    pub(crate) fn board(&self) -> &Board {
        &self.board
    }

    /// The board as it was right before the last resolved swap.
    pub(crate) fn previous(&self) -> &Board {
        &self.previous
    }

    pub(crate) fn selection(&self) -> Option<&Idx> {
        self.selection.as_ref()
    }

    /// Deals a fresh board and returns the grow-in effects for every cell.
    pub(crate) fn new_game(&mut self) -> Vec<Effect> {
        self.score = 0;
        self.selection = None;
        self.board.clear();
        self.previous = Board::default();

        let mut effects = Vec::new();
        let refill = randomizer::fill(&mut self.board, &mut *self.rng, Duration::ZERO, &mut effects);
        self.reward(refill.filled);
        log::info!("new game dealt, score {}", self.score);
        log::trace!("board:\n{}", self.board);
        effects
    }

    /// Selects `idx`, replacing any previous selection. `idx` must be on the board.
    pub(crate) fn select(&mut self, idx: Idx) {
        debug_assert!(idx.in_bounds(), "selection {} outside the board", idx);
        log::debug!("selected {}", idx);
        self.selection = Some(idx);
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Attempts to swap the selected cell with `idx`, which must be on the board. The selection is
    /// always cleared. A swap that produces at least one run is kept and resolved into a full
    /// cascade; any other swap leaves the board untouched.
    pub(crate) fn swap(&mut self, idx: Idx) -> Resolution {
        debug_assert!(idx.in_bounds(), "swap target {} outside the board", idx);
        let from = match self.selection.take() {
            Some(s) => s,
            None => return Resolution::rejected(SwapOutcome::NoSelection, Vec::new()),
        };

        if from.distance(&idx) > 1 {
            log::debug!("swap {0} -> {1}: {2}", from, idx, SwapOutcome::NotAdjacent);
            return Resolution::rejected(SwapOutcome::NotAdjacent, Vec::new());
        }

        self.previous = self.board.clone();

        let (a, b) = match (self.board.get(&from), self.board.get(&idx)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                log::warn!("swap {0} -> {1} touches an empty cell", from, idx);
                return Resolution::rejected(SwapOutcome::NoMatch, Vec::new());
            }
        };

        if a == b {
            log::debug!("swap {0} -> {1}: {2}", from, idx, SwapOutcome::SameToken);
            let wrong = Effect::swap((from, a), (idx, b), true, Duration::ZERO);
            return Resolution::rejected(SwapOutcome::SameToken, vec![wrong]);
        }

        self.board.swap(&from, &idx);
        let matches = matcher::find(&self.board);

        if matches.is_empty() {
            self.board.swap(&from, &idx);
            log::debug!("swap {0} -> {1}: {2}", from, idx, SwapOutcome::NoMatch);
            let wrong = Effect::swap((from, a), (idx, b), true, Duration::ZERO);
            return Resolution::rejected(SwapOutcome::NoMatch, vec![wrong]);
        }

        let mut effects = vec![Effect::swap((from.clone(), a), (idx.clone(), b), false, Duration::ZERO)];
        let budget = schedule_removals(&matches.runs, SWAP_DURATION, &mut effects);
        let (filled, settled) = cascade(&mut self.board, &mut *self.rng, matches, budget, &mut effects);
        self.reward(filled);

        log::debug!(
            "swap {0} -> {1}: {2}, {3} cells refilled, settles after {4}ms, score {5}",
            from,
            idx,
            SwapOutcome::Accepted,
            filled,
            settled.as_millis(),
            self.score
        );
        Resolution {
            outcome: SwapOutcome::Accepted,
            effects,
            settled,
        }
    }

    fn reward(&mut self, filled: usize) {
        self.score += FILL_REWARD * filled as Score;
    }
}

/// Repeatedly removes the matched ranges, refills the board and looks for new runs until the
/// board is stable. Removal effects for `matches` must already be scheduled. Returns the number
/// of refilled cells and the final delay budget.
fn cascade<R: Rng + ?Sized>(
    board: &mut Board,
    rng: &mut R,
    mut matches: Matches,
    mut budget: Duration,
    effects: &mut Vec<Effect>,
) -> (usize, Duration) {
    let mut filled = 0;
    for pass in 1.. {
        log::debug!("cascade pass {0}: {1} ranges", pass, matches.ranges.len());
        budget = remove_ranges(board, &matches.ranges, budget, effects);
        let refill = randomizer::fill(board, rng, budget, effects);
        filled += refill.filled;
        budget = refill.budget;

        matches = matcher::find(board);
        if matches.is_empty() {
            break;
        }
        budget = schedule_removals(&matches.runs, budget, effects);
    }
    (filled, budget)
}

/// Appends a shrink effect for every run at `budget`; the budget advances once by the scale
/// duration since all removals of a pass play together.
fn schedule_removals(runs: &[Run], budget: Duration, effects: &mut Vec<Effect>) -> Duration {
    for run in runs {
        effects.push(Effect::removal(
            run.origin.clone(),
            run.len,
            run.axis,
            run.token,
            budget,
        ));
    }
    if runs.is_empty() {
        budget
    } else {
        budget + SCALE_DURATION
    }
}

/// Collapses every range and schedules the slides that bring the survivors above each range
/// down. Ranges must be sorted by column and start row. A slide waits for the previous slide in
/// the same column; the returned budget covers the longest slide of the pass.
fn remove_ranges(
    board: &mut Board,
    ranges: &[Range],
    mut budget: Duration,
    effects: &mut Vec<Effect>,
) -> Duration {
    let mut longest = Duration::ZERO;
    let mut previous: Option<(usize, Duration)> = None;

    for range in ranges {
        let len = range.len();
        board.collapse(range.x, range.start, range.end);
        if range.start == 0 {
            continue;
        }

        let tokens: Vec<Token> = board.column(range.x)[len..=range.end]
            .iter()
            .flatten()
            .copied()
            .collect();
        if tokens.is_empty() {
            continue;
        }

        if let Some((x, slide)) = previous {
            if x == range.x {
                budget += slide;
            }
        }
        let slide = SLIDE_STEP_DURATION * len as u32;
        effects.push(Effect::slide(range.x, range.start, range.end, tokens, budget));
        longest = longest.max(slide);
        previous = Some((range.x, slide));
    }

    budget + longest
}
