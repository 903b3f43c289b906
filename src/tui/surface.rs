use crate::engine::board::Token;

use super::geometry::Rectangle;

/// Surface is the drawing capability effects and board redraws are played back on. Coordinates
/// are terminal cells; `cell` arguments are always exactly one board cell in size.
pub(crate) trait Surface {
    /// Paint the region with the board background.
    fn clear_region(&mut self, rect: &Rectangle);

    /// Draw a token centered in `cell`, scaled by `scale` in `0.0..=1.0`.
    fn draw_token(&mut self, cell: &Rectangle, token: Token, scale: f64);
}
