use std::time::{Duration, Instant};

use crate::animation::Animations;
use crate::engine::board::{Board, Idx as BoardIdx, HEIGHT, WIDTH};
use crate::engine::grid::{GridEngine, Score, SwapOutcome};
use crate::error::Result;
use crate::tui::canvas::Canvas;
use crate::tui::colors::theme;
use crate::tui::error::{InnerError, Result as TuiResult};
use crate::tui::events::{Event, EventSource, UserInput};
use crate::tui::geometry::{Bounds2D, Direction, GridGeometry, Idx, Rectangle};
use crate::tui::renderer::Renderer;
use crate::tui::surface::Surface;

/// How long to wait for input before drawing the next frame.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Clock tells the game loop what time it is.
pub(crate) trait Clock {
    fn now(&mut self) -> Instant;
}

#[derive(Default)]
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> Instant {
        Instant::now()
    }
}

/// Paints every token on `board` at full size.
pub(crate) fn draw_board<S: Surface>(geometry: &GridGeometry, board: &Board, surface: &mut S) {
    for idx in Board::indices() {
        if let Some(token) = board.get(&idx) {
            surface.draw_token(&geometry.cell_rect(&idx), token, 1.0);
        }
    }
}

/// Where everything goes on the terminal.
///
///  Score:    640  Time: 42s
///  ╔════════════════╗
///  ║                ║
///  ║     board      ║
///  ║                ║
///  ╚════════════════╝
#[derive(Clone, Debug, PartialEq)]
struct Layout {
    geometry: GridGeometry,
    frame: Rectangle,
    status: Idx,
}

impl Layout {
    fn fit(width: usize, height: usize) -> TuiResult<Self> {
        // one column of border on either side, a status row and a border row on top, a border
        // row at the bottom
        let area = Rectangle(
            Idx(1, 2),
            Bounds2D(width.saturating_sub(2), height.saturating_sub(3)),
        );
        let geometry = match GridGeometry::fit(&area) {
            Some(g) => g,
            None => return Err(InnerError::TerminalTooSmall(width, height).into()),
        };
        let board = geometry.rect();
        let frame = Rectangle(
            Idx(board.x() - 1, board.y() - 1),
            Bounds2D(board.width() + 2, board.height() + 2),
        );
        let status = Idx(frame.x(), frame.y() - 1);
        Ok(Self {
            geometry,
            frame,
            status,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Playing { deadline: Option<Instant> },
    Over { score: Score },
}

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub(crate) struct TuiGems<R: Renderer, E: EventSource, C: Clock> {
    renderer: R,
    event_source: E,
    clock: C,
    canvas: Canvas,
    layout: Option<Layout>,
    engine: GridEngine,
    animations: Animations,
    cursor: BoardIdx,
    game_length: Option<Duration>,
    phase: Phase,
}

impl<R: Renderer, E: EventSource, C: Clock> TuiGems<R, E, C> {
    /// `game_length` of `None` plays without a time limit.
    pub(crate) fn new(
        engine: GridEngine,
        renderer: R,
        event_source: E,
        clock: C,
        game_length: Option<Duration>,
    ) -> Result<Self> {
        let (width, height) = renderer.size_hint()?;
        Ok(Self {
            renderer,
            event_source,
            clock,
            canvas: Canvas::new(width as usize, height as usize),
            layout: None,
            engine,
            animations: Animations::default(),
            cursor: BoardIdx(0, 0),
            game_length,
            phase: Phase::Playing { deadline: None },
        })
    }

    pub(crate) fn run(mut self) -> Result<()> {
        match self.inner_run() {
            Err(e) => {
                self.renderer.recover();
                Err(e)
            }
            Ok(_) => Ok(()),
        }
    }

    /// Takes control of the terminal and plays until the player quits.
    fn inner_run(&mut self) -> Result<()> {
        self.resize()?;
        let now = self.clock.now();
        self.start_game(now);

        loop {
            let now = self.clock.now();
            self.frame(now);
            self.renderer.render(&mut self.canvas)?;

            match self.event_source.poll(FRAME_INTERVAL)? {
                None => (),
                Some(Event::Resize) => self.resize()?,
                Some(Event::UserInput(input)) => {
                    let now = self.clock.now();
                    if self.handle_input(input, now) == Flow::Quit {
                        break;
                    }
                }
            }
        }
        log::info!("quitting, final score {}", self.engine.score());
        Ok(())
    }
}

impl<R: Renderer, E: EventSource, C: Clock> TuiGems<R, E, C> {
    fn start_game(&mut self, now: Instant) {
        self.animations.cancel();
        let effects = self.engine.new_game();
        self.animations.schedule(now, effects);
        self.cursor = BoardIdx(0, 0);
        self.phase = Phase::Playing {
            deadline: self.game_length.map(|length| now + length),
        };
        self.redraw_all();
    }

    fn game_over(&mut self) {
        let score = self.engine.score();
        log::info!("time is up, score {}", score);
        self.engine.clear_selection();
        self.phase = Phase::Over { score };
        self.redraw_all();
    }

    /// Advances the clock-driven state and paints the frame for `now`.
    fn frame(&mut self, now: Instant) {
        if self.animations.active() {
            let settled = match &self.layout {
                Some(layout) => {
                    self.canvas.clear_region(&layout.geometry.rect());
                    draw_board(&layout.geometry, self.engine.previous(), &mut self.canvas);
                    !self.animations.advance(now, &layout.geometry, &mut self.canvas)
                }
                None => {
                    self.animations.cancel();
                    true
                }
            };
            if settled {
                self.draw_settled();
            }
        }

        if let Phase::Playing {
            deadline: Some(deadline),
        } = self.phase
        {
            if now >= deadline && !self.animations.active() {
                self.game_over();
            }
        }
        self.draw_status(now);
    }

    fn handle_input(&mut self, input: UserInput, now: Instant) -> Flow {
        if input == UserInput::Quit {
            return Flow::Quit;
        }
        if self.animations.active() {
            log::trace!("ignoring {:?} while animating", input);
            return Flow::Continue;
        }
        if let Phase::Over { .. } = self.phase {
            self.start_game(now);
            return Flow::Continue;
        }

        match input {
            UserInput::Direction(d) => self.move_cursor(d),
            UserInput::Select => self.pick(self.cursor.clone(), now),
            UserInput::Click(point) => {
                let cell = self
                    .layout
                    .as_ref()
                    .and_then(|l| l.geometry.cell_from_point(&point));
                if let Some(cell) = cell {
                    self.cursor = cell.clone();
                    self.pick(cell, now);
                }
            }
            UserInput::NewGame => self.start_game(now),
            UserInput::Quit | UserInput::Other => (),
        }
        Flow::Continue
    }

    fn move_cursor(&mut self, direction: Direction) {
        let (x, y) = (self.cursor.x(), self.cursor.y());
        self.cursor = match direction {
            Direction::Left => BoardIdx(x.saturating_sub(1), y),
            Direction::Right => BoardIdx((x + 1).min(WIDTH - 1), y),
            Direction::Up => BoardIdx(x, y.saturating_sub(1)),
            Direction::Down => BoardIdx(x, (y + 1).min(HEIGHT - 1)),
        };
        self.draw_settled();
    }

    /// Selects `idx`, or swaps it with the current selection.
    fn pick(&mut self, idx: BoardIdx, now: Instant) {
        match self.engine.selection().cloned() {
            None => self.engine.select(idx),
            Some(_) => {
                let resolution = self.engine.swap(idx.clone());
                if resolution.outcome == SwapOutcome::NotAdjacent {
                    self.engine.select(idx);
                }
                self.animations.schedule(now, resolution.effects);
            }
        }
        if !self.animations.active() {
            self.draw_settled();
        }
    }

    fn resize(&mut self) -> Result<()> {
        self.animations.cancel();
        self.engine.clear_selection();
        let (width, height) = self.renderer.size_hint()?;
        let (width, height) = (width as usize, height as usize);
        self.canvas = Canvas::new(width, height);
        self.layout = match Layout::fit(width, height) {
            Ok(layout) => Some(layout),
            Err(e) if matches!(e.inner, InnerError::TerminalTooSmall(_, _)) => {
                log::debug!("{}x{} is too small for the board", width, height);
                None
            }
            Err(e) => return Err(e.into()),
        };
        self.redraw_all();
        self.renderer.clear(&mut self.canvas)?;
        Ok(())
    }

    fn redraw_all(&mut self) {
        let theme = theme();
        let layout = match &self.layout {
            Some(layout) => layout.clone(),
            None => {
                let rect = self.canvas.rectangle().clone();
                self.canvas.fill(&rect, ' ', None, None);
                self.canvas.write_center(
                    &rect,
                    "The terminal is too small, please make it bigger.",
                    Some(&theme.text),
                );
                return;
            }
        };
        self.canvas
            .fill(&layout.frame, ' ', Some(&theme.border), Some(&theme.board));
        self.canvas.draw_border(&layout.frame, Some(&theme.border));
        self.draw_settled();
    }

    /// Paints the board as it is now along with the cursor and the selection, or the game over
    /// message once time is up.
    fn draw_settled(&mut self) {
        let layout = match &self.layout {
            Some(layout) => layout,
            None => return,
        };
        let theme = theme();
        let geometry = &layout.geometry;
        self.canvas.clear_region(&geometry.rect());
        draw_board(geometry, self.engine.board(), &mut self.canvas);

        match &self.phase {
            Phase::Playing { .. } => {
                self.canvas
                    .draw_border(&geometry.cell_rect(&self.cursor), Some(&theme.cursor));
                if let Some(selected) = self.engine.selection() {
                    self.canvas
                        .draw_border(&geometry.cell_rect(selected), Some(&theme.selection));
                }
            }
            Phase::Over { score } => {
                let board = geometry.rect();
                let rect = board.center(Bounds2D(board.width().min(30), board.height().min(5)));
                self.canvas
                    .fill(&rect, ' ', Some(&theme.text), Some(&theme.board));
                self.canvas.draw_border(&rect, Some(&theme.border));
                let inner = Rectangle(
                    Idx(rect.x() + 1, rect.y() + 1),
                    Bounds2D(rect.width().saturating_sub(2), rect.height().saturating_sub(2)),
                );
                let message = format!("Time is up. You got: {}", score);
                self.canvas.write_center(&inner, &message, Some(&theme.text));
            }
        }
    }

    fn draw_status(&mut self, now: Instant) {
        let layout = match &self.layout {
            Some(layout) => layout,
            None => return,
        };
        let remaining = match &self.phase {
            Phase::Playing {
                deadline: Some(deadline),
            } => format!("  Time: {}s", deadline.saturating_duration_since(now).as_secs()),
            Phase::Playing { deadline: None } => String::new(),
            Phase::Over { .. } => String::from("  Time: 0s"),
        };
        let status = format!("Score: {:>6}{}", self.engine.score(), remaining);
        let row = Rectangle(layout.status.clone(), Bounds2D(layout.frame.width(), 1));
        self.canvas.fill(&row, ' ', None, None);
        self.canvas
            .write_left(&layout.status, &status, Some(&theme().text));
    }
}
