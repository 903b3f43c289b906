use std::time::Duration;

use super::error::Result;
use super::geometry::{Direction, Idx};

pub(crate) trait EventSource {
    /// Waits up to `timeout` for the next event.
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Event {
    UserInput(UserInput),
    Resize,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum UserInput {
    /// Move the keyboard cursor.
    Direction(Direction),
    /// Select, or swap with the selection, at the keyboard cursor.
    Select,
    /// Primary mouse button pressed at a terminal cell.
    Click(Idx),
    NewGame,
    Quit,
    /// Any other key.
    Other,
}
