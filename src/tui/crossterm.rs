use std::io::Write;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    style, terminal, ExecutableCommand, QueueableCommand,
};

use super::canvas::Canvas;
use super::error::Result;
use super::events::{Event, EventSource, UserInput};
use super::geometry::{Direction, Idx};
use super::renderer::Renderer;
use super::tuxel::Tuxel;

/// Crossterm draws canvases on a terminal in raw mode, on the alternate screen, with mouse
/// capture enabled. The terminal is restored when the renderer is dropped.
pub(crate) struct Crossterm<T: Write> {
    w: Box<T>,
    restored: bool,
}

impl<T: Write> Crossterm<T> {
    pub(crate) fn new(mut w: Box<T>) -> Result<Self> {
        terminal::enable_raw_mode()?;
        w.execute(terminal::EnterAlternateScreen)?;
        w.execute(EnableMouseCapture)?;
        w.execute(cursor::Hide)?;
        Ok(Self { w, restored: false })
    }

    fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        self.w.execute(cursor::Show)?;
        self.w.execute(DisableMouseCapture)?;
        self.w.execute(terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn queue_tuxel(&mut self, tuxel: &Tuxel) -> Result<()> {
        let (x, y) = tuxel.coordinates();
        self.w.queue(cursor::MoveTo(x as u16, y as u16))?;
        self.w.queue(style::ResetColor)?;
        let (fg, bg) = tuxel.colors();
        if let Some(fg) = fg {
            self.w.queue(style::SetForegroundColor(fg.into()))?;
        }
        if let Some(bg) = bg {
            self.w.queue(style::SetBackgroundColor(bg.into()))?;
        }
        self.w.queue(style::Print(tuxel.content()))?;
        Ok(())
    }
}

impl<T: Write> Drop for Crossterm<T> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("failed to restore terminal: {}", e);
        }
    }
}

impl<T: Write> Renderer for Crossterm<T> {
    fn size_hint(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    fn render(&mut self, c: &mut Canvas) -> Result<()> {
        let dirty = c.drain_dirty();
        if dirty.is_empty() {
            return Ok(());
        }
        self.w.queue(terminal::BeginSynchronizedUpdate)?;
        for idx in dirty.iter() {
            if let Some(tuxel) = c.get(idx) {
                self.queue_tuxel(tuxel)?;
            }
        }
        self.w.queue(style::ResetColor)?;
        self.w.queue(terminal::EndSynchronizedUpdate)?;
        self.w.flush()?;
        Ok(())
    }

    fn clear(&mut self, c: &mut Canvas) -> Result<()> {
        let _ = c.drain_dirty();
        self.w.queue(terminal::BeginSynchronizedUpdate)?;
        self.w.queue(style::ResetColor)?;
        self.w.queue(terminal::Clear(terminal::ClearType::All))?;
        for tuxel in c.tuxels() {
            self.queue_tuxel(tuxel)?;
        }
        self.w.queue(style::ResetColor)?;
        self.w.queue(terminal::EndSynchronizedUpdate)?;
        self.w.flush()?;
        Ok(())
    }

    fn recover(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("failed to restore terminal: {}", e);
        }
    }
}

/// CrosstermEvents reads terminal input and maps it to game events.
#[derive(Default)]
pub(crate) struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(match event::read()? {
            CrosstermEvent::Key(ke) => handle_key_event(ke).map(Event::UserInput),
            CrosstermEvent::Mouse(me) => handle_mouse_event(me).map(Event::UserInput),
            CrosstermEvent::Resize(_, _) | CrosstermEvent::FocusGained => Some(Event::Resize),
            _ => None,
        })
    }
}

fn handle_key_event(ke: KeyEvent) -> Option<UserInput> {
    if ke.kind == KeyEventKind::Release {
        return None;
    }
    let input = match ke.code {
        KeyCode::Char('c') if ke.modifiers.contains(KeyModifiers::CONTROL) => UserInput::Quit,
        KeyCode::Left | KeyCode::Char('h') => UserInput::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => UserInput::Direction(Direction::Right),
        KeyCode::Up | KeyCode::Char('k') => UserInput::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => UserInput::Direction(Direction::Down),
        KeyCode::Char(' ') | KeyCode::Enter => UserInput::Select,
        KeyCode::Char('n') => UserInput::NewGame,
        KeyCode::Char('q') | KeyCode::Esc => UserInput::Quit,
        _ => UserInput::Other,
    };
    Some(input)
}

fn handle_mouse_event(me: MouseEvent) -> Option<UserInput> {
    match me.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            Some(UserInput::Click(Idx(me.column as usize, me.row as usize)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case::arrow(KeyCode::Left, KeyModifiers::NONE, Some(UserInput::Direction(Direction::Left)))]
    #[case::vim(KeyCode::Char('j'), KeyModifiers::NONE, Some(UserInput::Direction(Direction::Down)))]
    #[case::space(KeyCode::Char(' '), KeyModifiers::NONE, Some(UserInput::Select))]
    #[case::enter(KeyCode::Enter, KeyModifiers::NONE, Some(UserInput::Select))]
    #[case::new_game(KeyCode::Char('n'), KeyModifiers::NONE, Some(UserInput::NewGame))]
    #[case::quit(KeyCode::Char('q'), KeyModifiers::NONE, Some(UserInput::Quit))]
    #[case::escape(KeyCode::Esc, KeyModifiers::NONE, Some(UserInput::Quit))]
    #[case::interrupt(KeyCode::Char('c'), KeyModifiers::CONTROL, Some(UserInput::Quit))]
    #[case::other(KeyCode::Char('x'), KeyModifiers::NONE, Some(UserInput::Other))]
    fn key_mapping(
        #[case] code: KeyCode,
        #[case] modifiers: KeyModifiers,
        #[case] expected: Option<UserInput>,
    ) {
        assert_eq!(handle_key_event(KeyEvent::new(code, modifiers)), expected);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut ke = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        ke.kind = KeyEventKind::Release;
        assert_eq!(handle_key_event(ke), None);
    }

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 12,
            row: 7,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[rstest]
    #[case::left_click(MouseEventKind::Down(MouseButton::Left), Some(UserInput::Click(Idx(12, 7))))]
    #[case::right_click(MouseEventKind::Down(MouseButton::Right), None)]
    #[case::release(MouseEventKind::Up(MouseButton::Left), None)]
    #[case::moved(MouseEventKind::Moved, None)]
    fn mouse_mapping(#[case] kind: MouseEventKind, #[case] expected: Option<UserInput>) {
        assert_eq!(handle_mouse_event(mouse(kind)), expected);
    }
}
