use super::canvas::Canvas;
use super::error::Result;

/// Renderer presents a `Canvas` on some output device.
pub(crate) trait Renderer {
    /// Current size of the output, in terminal cells.
    fn size_hint(&self) -> Result<(u16, u16)>;

    /// Draws every tuxel changed since the last call.
    fn render(&mut self, c: &mut Canvas) -> Result<()>;

    /// Wipes the output and draws the whole canvas.
    fn clear(&mut self, c: &mut Canvas) -> Result<()>;

    /// Puts the output device back the way it was found; called before an error is reported.
    fn recover(&mut self);
}
