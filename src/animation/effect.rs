use std::time::Duration;

use crate::engine::board::{Idx as BoardIdx, Token};
use crate::engine::matcher::Axis;
use crate::tui::geometry::{GridGeometry, Idx, Rectangle};
use crate::tui::surface::Surface;

/// Time taken by two tokens to trade places. A wrong swap plays forward and back, taking twice
/// as long.
pub(crate) const SWAP_DURATION: Duration = Duration::from_millis(500);

/// Time taken by a token to grow in or shrink away.
pub(crate) const SCALE_DURATION: Duration = Duration::from_millis(500);

/// Time taken by a column segment to fall by a single row.
pub(crate) const SLIDE_STEP_DURATION: Duration = Duration::from_millis(150);

/// Progress reports where an effect is in its lifecycle after an update.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Progress {
    /// The activation delay has not elapsed yet; nothing is drawn.
    Waiting,
    Running,
    Complete,
}

/// Effect is a single time-driven visual transition. It knows nothing about the board beyond the
/// payload it was created with; `update` moves it along from the time elapsed since it was
/// scheduled and `draw` paints its current frame.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Effect {
    delay: Duration,
    kind: EffectKind,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum EffectKind {
    Swap(Swap),
    Scale(Scale),
    Slide(Slide),
}

impl Effect {
    /// Two tokens trading places. `wrong` plays the swap forward and back again.
    pub(crate) fn swap(
        a: (BoardIdx, Token),
        b: (BoardIdx, Token),
        wrong: bool,
        delay: Duration,
    ) -> Self {
        Self {
            delay,
            kind: EffectKind::Swap(Swap::new(a, b, wrong)),
        }
    }

    /// A line of `count` identical tokens starting at `origin` shrinking away.
    pub(crate) fn removal(
        origin: BoardIdx,
        count: usize,
        axis: Axis,
        token: Token,
        delay: Duration,
    ) -> Self {
        Self {
            delay,
            kind: EffectKind::Scale(Scale::new(origin, count, axis, token, false)),
        }
    }

    /// A single freshly placed token growing in.
    pub(crate) fn addition(at: BoardIdx, token: Token, delay: Duration) -> Self {
        Self {
            delay,
            kind: EffectKind::Scale(Scale::new(at, 1, Axis::Horizontal, token, true)),
        }
    }

    /// The tokens that used to sit directly above the removed rows `start..=end` of column `x`
    /// falling into place.
    pub(crate) fn slide(
        x: usize,
        start: usize,
        end: usize,
        tokens: Vec<Token>,
        delay: Duration,
    ) -> Self {
        Self {
            delay,
            kind: EffectKind::Slide(Slide::new(x, start, end, tokens)),
        }
    }

    pub(crate) fn delay(&self) -> Duration {
        self.delay
    }

    /// Time the effect is visibly in motion, excluding its delay.
    pub(crate) fn duration(&self) -> Duration {
        match &self.kind {
            EffectKind::Swap(s) => s.duration(),
            EffectKind::Scale(_) => SCALE_DURATION,
            EffectKind::Slide(s) => s.duration(),
        }
    }

    pub(crate) fn kind(&self) -> &EffectKind {
        &self.kind
    }

    pub(crate) fn update(&mut self, elapsed: Duration) -> Progress {
        if elapsed < self.delay {
            return Progress::Waiting;
        }
        let running = elapsed - self.delay;
        let complete = match &mut self.kind {
            EffectKind::Swap(s) => s.update(running),
            EffectKind::Scale(s) => s.update(running),
            EffectKind::Slide(s) => s.update(running),
        };
        if complete {
            Progress::Complete
        } else {
            Progress::Running
        }
    }

    pub(crate) fn draw<S: Surface>(&self, geometry: &GridGeometry, surface: &mut S) {
        match &self.kind {
            EffectKind::Swap(s) => s.draw(geometry, surface),
            EffectKind::Scale(s) => s.draw(geometry, surface),
            EffectKind::Slide(s) => s.draw(geometry, surface),
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let delay = self.delay.as_millis();
        match &self.kind {
            EffectKind::Swap(s) => write!(
                f,
                "Swap({0} <-> {1}, wrong={2}, delay={3}ms)",
                s.low, s.high, s.wrong, delay
            ),
            EffectKind::Scale(s) => write!(
                f,
                "Scale({0} x{1} {2:?}, grow={3}, delay={4}ms)",
                s.origin, s.count, s.axis, s.grow, delay
            ),
            EffectKind::Slide(s) => write!(
                f,
                "Slide(x={0}, {1}..={2}, len={3}, delay={4}ms)",
                s.x,
                s.start,
                s.end,
                s.tokens.len(),
                delay
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Swap {
    // `low` is the upper-left of the two cells, `tokens[0]` starts there.
    low: BoardIdx,
    high: BoardIdx,
    tokens: [Token; 2],
    wrong: bool,
    offset: Option<f64>,
    flipped: bool,
}

impl Swap {
    fn new(a: (BoardIdx, Token), b: (BoardIdx, Token), wrong: bool) -> Self {
        let (first, second) = if a.0.x() > b.0.x() || a.0.y() > b.0.y() {
            (b, a)
        } else {
            (a, b)
        };
        Self {
            low: first.0,
            high: second.0,
            tokens: [first.1, second.1],
            wrong,
            offset: None,
            flipped: false,
        }
    }

    pub(crate) fn is_wrong(&self) -> bool {
        self.wrong
    }

    fn legs(&self) -> f64 {
        if self.wrong {
            2.0
        } else {
            1.0
        }
    }

    fn duration(&self) -> Duration {
        SWAP_DURATION.mul_f64(self.legs())
    }

    fn update(&mut self, running: Duration) -> bool {
        let legs = self.legs();
        let mut pos = running.as_secs_f64() / SWAP_DURATION.as_secs_f64();
        let complete = pos >= legs;
        if complete {
            pos = legs;
        }
        // the way back starts over from the source cells with the colours traded
        if self.wrong && pos > 1.0 {
            pos -= 1.0;
            self.flipped = true;
        }
        self.offset = Some(pos);
        complete
    }

    fn draw<S: Surface>(&self, geometry: &GridGeometry, surface: &mut S) {
        let pos = match self.offset {
            Some(p) => p,
            None => return,
        };
        let rect = geometry.span(&self.low, &self.high);
        surface.clear_region(&rect);

        let cell = geometry.cell();
        let x_travel = rect.width() - cell.width();
        let y_travel = rect.height() - cell.height();
        let dx = (pos * x_travel as f64).round() as usize;
        let dy = (pos * y_travel as f64).round() as usize;

        let (first, second) = if self.flipped {
            (self.tokens[1], self.tokens[0])
        } else {
            (self.tokens[0], self.tokens[1])
        };
        let from = Rectangle(Idx(rect.x() + dx, rect.y() + dy), cell.clone());
        let to = Rectangle(
            Idx(rect.x() + x_travel - dx, rect.y() + y_travel - dy),
            cell.clone(),
        );
        surface.draw_token(&from, first, 1.0);
        surface.draw_token(&to, second, 1.0);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Scale {
    origin: BoardIdx,
    count: usize,
    axis: Axis,
    token: Token,
    grow: bool,
    scale: Option<f64>,
}

impl Scale {
    fn new(origin: BoardIdx, count: usize, axis: Axis, token: Token, grow: bool) -> Self {
        Self {
            origin,
            count,
            axis,
            token,
            grow,
            scale: None,
        }
    }

    pub(crate) fn is_growing(&self) -> bool {
        self.grow
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    fn multipliers(&self) -> (usize, usize) {
        match self.axis {
            Axis::Horizontal => (1, 0),
            Axis::Vertical => (0, 1),
        }
    }

    fn update(&mut self, running: Duration) -> bool {
        let fraction = running.as_secs_f64() / SCALE_DURATION.as_secs_f64();
        let complete = fraction >= 1.0;
        let fraction = fraction.min(1.0);
        self.scale = Some(if self.grow { fraction } else { 1.0 - fraction });
        complete
    }

    fn draw<S: Surface>(&self, geometry: &GridGeometry, surface: &mut S) {
        let scale = match self.scale {
            Some(s) => s,
            None => return,
        };
        let (x_mult, y_mult) = self.multipliers();
        let last = BoardIdx(
            self.origin.x() + x_mult * (self.count - 1),
            self.origin.y() + y_mult * (self.count - 1),
        );
        surface.clear_region(&geometry.span(&self.origin, &last));
        for i in 0..self.count {
            let cell = BoardIdx(self.origin.x() + x_mult * i, self.origin.y() + y_mult * i);
            surface.draw_token(&geometry.cell_rect(&cell), self.token, scale);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Slide {
    x: usize,
    start: usize,
    end: usize,
    tokens: Vec<Token>,
    fraction: Option<f64>,
}

impl Slide {
    fn new(x: usize, start: usize, end: usize, tokens: Vec<Token>) -> Self {
        debug_assert!(tokens.len() <= start, "slide segment taller than the cells above it");
        Self {
            x,
            start,
            end,
            tokens,
            fraction: None,
        }
    }

    /// Number of rows the segment falls.
    pub(crate) fn distance(&self) -> usize {
        self.end - self.start + 1
    }

    pub(crate) fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn duration(&self) -> Duration {
        SLIDE_STEP_DURATION * self.distance() as u32
    }

    fn update(&mut self, running: Duration) -> bool {
        let fraction = running.as_secs_f64() / self.duration().as_secs_f64();
        let complete = fraction >= 1.0;
        self.fraction = Some(fraction.min(1.0));
        complete
    }

    fn draw<S: Surface>(&self, geometry: &GridGeometry, surface: &mut S) {
        let fraction = match self.fraction {
            Some(f) => f,
            None => return,
        };
        let top = BoardIdx(self.x, self.start - self.tokens.len());
        surface.clear_region(&geometry.span(&top, &BoardIdx(self.x, self.end)));

        let cell = geometry.cell();
        let shift = (fraction * (self.distance() * cell.height()) as f64) as usize;
        let origin = geometry.cell_rect(&top).0;
        for (i, token) in self.tokens.iter().enumerate() {
            let at = Idx(origin.x(), origin.y() + shift + i * cell.height());
            surface.draw_token(&Rectangle(at, cell.clone()), *token, 1.0);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tui::geometry::Bounds2D;
    use crate::tui::surface::test::{Call, Recorder};
    use rstest::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn token(kind: u8) -> Token {
        Token::new(kind)
    }

    // origin (10, 2), cells 4 wide and 2 tall
    fn geometry() -> GridGeometry {
        GridGeometry::new(Idx(10, 2), Bounds2D(4, 2))
    }

    fn rect(x: usize, y: usize, w: usize, h: usize) -> Rectangle {
        Rectangle(Idx(x, y), Bounds2D(w, h))
    }

    #[rstest]
    #[case::before_delay(ms(100), ms(99), Progress::Waiting)]
    #[case::at_delay(ms(100), ms(100), Progress::Running)]
    #[case::midway(ms(100), ms(350), Progress::Running)]
    #[case::done(ms(100), ms(600), Progress::Complete)]
    #[case::long_done(ms(0), ms(10_000), Progress::Complete)]
    fn scale_progress(#[case] delay: Duration, #[case] elapsed: Duration, #[case] expected: Progress) {
        let mut effect = Effect::addition(BoardIdx(0, 0), token(1), delay);
        assert_eq!(effect.update(elapsed), expected);
    }

    #[test]
    fn waiting_effect_draws_nothing() {
        let mut effect = Effect::removal(BoardIdx(1, 1), 3, Axis::Vertical, token(2), ms(500));
        effect.update(ms(20));
        let mut recorder = Recorder::default();
        effect.draw(&geometry(), &mut recorder);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn removal_shrinks_linearly() {
        let mut effect = Effect::removal(BoardIdx(1, 1), 3, Axis::Vertical, token(2), ms(0));
        assert_eq!(effect.update(ms(250)), Progress::Running);
        let mut recorder = Recorder::default();
        effect.draw(&geometry(), &mut recorder);
        assert_eq!(
            recorder.calls,
            vec![
                Call::Clear(rect(14, 4, 4, 6)),
                Call::Token(rect(14, 4, 4, 2), token(2), 0.5),
                Call::Token(rect(14, 6, 4, 2), token(2), 0.5),
                Call::Token(rect(14, 8, 4, 2), token(2), 0.5),
            ]
        );
    }

    #[test]
    fn horizontal_removal_spans_columns() {
        let mut effect = Effect::removal(BoardIdx(1, 2), 3, Axis::Horizontal, token(4), ms(0));
        effect.update(ms(500));
        let mut recorder = Recorder::default();
        effect.draw(&geometry(), &mut recorder);
        assert_eq!(recorder.calls[0], Call::Clear(rect(14, 6, 12, 2)));
        assert_eq!(recorder.calls[3], Call::Token(rect(22, 6, 4, 2), token(4), 0.0));
    }

    #[test]
    fn addition_grows() {
        let mut effect = Effect::addition(BoardIdx(0, 0), token(3), ms(100));
        assert_eq!(effect.update(ms(200)), Progress::Running);
        let mut recorder = Recorder::default();
        effect.draw(&geometry(), &mut recorder);
        assert_eq!(recorder.calls[1], Call::Token(rect(10, 2, 4, 2), token(3), 0.2));
        assert_eq!(effect.update(ms(600)), Progress::Complete);
    }

    #[test]
    fn swap_moves_tokens_across() {
        // selected cell is to the right, so its token starts on the right
        let mut effect = Effect::swap(
            (BoardIdx(1, 0), token(1)),
            (BoardIdx(0, 0), token(2)),
            false,
            ms(0),
        );
        assert_eq!(effect.duration(), SWAP_DURATION);
        assert_eq!(effect.update(ms(0)), Progress::Running);
        let mut recorder = Recorder::default();
        effect.draw(&geometry(), &mut recorder);
        assert_eq!(
            recorder.calls,
            vec![
                Call::Clear(rect(10, 2, 8, 2)),
                Call::Token(rect(10, 2, 4, 2), token(2), 1.0),
                Call::Token(rect(14, 2, 4, 2), token(1), 1.0),
            ]
        );

        assert_eq!(effect.update(ms(500)), Progress::Complete);
        let mut recorder = Recorder::default();
        effect.draw(&geometry(), &mut recorder);
        assert_eq!(recorder.calls[1], Call::Token(rect(14, 2, 4, 2), token(2), 1.0));
        assert_eq!(recorder.calls[2], Call::Token(rect(10, 2, 4, 2), token(1), 1.0));
    }

    #[rstest]
    #[case::first_leg(ms(250), Progress::Running, 3, 1)]
    #[case::swapped(ms(500), Progress::Running, 4, 1)]
    #[case::coming_back(ms(750), Progress::Running, 3, 2)]
    #[case::home(ms(1000), Progress::Complete, 4, 2)]
    fn wrong_swap_plays_back(
        #[case] elapsed: Duration,
        #[case] expected: Progress,
        #[case] lead_y: usize,
        #[case] lead_token: u8,
    ) {
        // token 1 sits above token 2
        let mut effect = Effect::swap(
            (BoardIdx(0, 0), token(1)),
            (BoardIdx(0, 1), token(2)),
            true,
            ms(0),
        );
        assert_eq!(effect.duration(), ms(1000));
        assert_eq!(effect.update(elapsed), expected);
        let mut recorder = Recorder::default();
        effect.draw(&geometry(), &mut recorder);
        assert_eq!(
            recorder.calls[1],
            Call::Token(rect(10, lead_y, 4, 2), token(lead_token), 1.0)
        );
    }

    #[test]
    fn slide_translates_column_segment() {
        // rows 3..=4 removed in column 2, two survivors above them (rows 0 and 1 were empty)
        let mut effect = Effect::slide(2, 3, 4, vec![token(0), token(1)], ms(1000));
        assert_eq!(effect.duration(), ms(300));
        assert_eq!(effect.update(ms(999)), Progress::Waiting);
        assert_eq!(effect.update(ms(1150)), Progress::Running);
        let mut recorder = Recorder::default();
        effect.draw(&geometry(), &mut recorder);
        assert_eq!(
            recorder.calls,
            vec![
                Call::Clear(rect(18, 4, 4, 8)),
                Call::Token(rect(18, 6, 4, 2), token(0), 1.0),
                Call::Token(rect(18, 8, 4, 2), token(1), 1.0),
            ]
        );
        assert_eq!(effect.update(ms(1300)), Progress::Complete);
    }
}
