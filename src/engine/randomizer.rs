use std::time::Duration;

use rand::Rng;

use super::board::{Board, Idx, Token, HEIGHT, KINDS, MIN_RUN, WIDTH};
use crate::animation::effect::{Effect, SCALE_DURATION};

/// Points awarded for every cell that gets filled.
pub(crate) const FILL_REWARD: u32 = 10;

/// Refill reports the outcome of a single randomizer pass.
#[derive(Debug, PartialEq)]
pub(crate) struct Refill {
    pub(crate) filled: usize,
    /// Delay budget once this pass' grow-in effects have played.
    pub(crate) budget: Duration,
}

/// Fills every empty slot, in column-major order, with a random token that does not complete a
/// run of `MIN_RUN` through that slot. Each placement appends a grow-in effect gated by `budget`;
/// all of a pass' grow-ins play together, so the budget advances once by the scale duration if
/// anything was filled.
pub(crate) fn fill<R: Rng + ?Sized>(
    board: &mut Board,
    rng: &mut R,
    budget: Duration,
    effects: &mut Vec<Effect>,
) -> Refill {
    let mut filled = 0;
    for idx in Board::indices() {
        if board.get(&idx).is_some() {
            continue;
        }
        // at most two kinds are ruled out per axis, so with five kinds this always terminates
        let token = loop {
            let candidate = Token::new(rng.gen_range(0..KINDS));
            board.set(&idx, Some(candidate));
            if !completes_run(board, &idx) {
                break candidate;
            }
        };
        effects.push(Effect::addition(idx, token, budget));
        filled += 1;
    }

    let budget = if filled > 0 {
        budget + SCALE_DURATION
    } else {
        budget
    };
    log::trace!("filled {0} cells, budget now {1}ms", filled, budget.as_millis());
    Refill { filled, budget }
}

/// Whether the token at `idx` is part of a run of at least `MIN_RUN` along either axis, looking at
/// most `MIN_RUN - 1` cells away in each direction.
pub(crate) fn completes_run(board: &Board, idx: &Idx) -> bool {
    let token = match board.get(idx) {
        Some(t) => t,
        None => return false,
    };
    let reach = |dx: isize, dy: isize| -> usize {
        (1..MIN_RUN as isize)
            .map(|step| (idx.x() as isize + dx * step, idx.y() as isize + dy * step))
            .take_while(|(x, y)| {
                *x >= 0
                    && *y >= 0
                    && (*x as usize) < WIDTH
                    && (*y as usize) < HEIGHT
                    && board.get(&Idx(*x as usize, *y as usize)) == Some(token)
            })
            .count()
    };
    1 + reach(-1, 0) + reach(1, 0) >= MIN_RUN || 1 + reach(0, -1) + reach(0, 1) >= MIN_RUN
}
