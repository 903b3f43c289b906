use std::sync::OnceLock;

use palette::{FromColor, Lch, Srgb};

use crate::engine::board::{Token, KINDS};

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Rgb {
    color: Srgb,
}

impl Rgb {
    pub(crate) fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            color: Srgb::new(r, g, b).into_format(),
        }
    }

    fn from_lch(lch: Lch) -> Self {
        Self {
            color: Srgb::from_color(lch),
        }
    }

    #[inline(always)]
    pub(crate) fn r(&self) -> u8 {
        self.components().0
    }

    #[inline(always)]
    pub(crate) fn g(&self) -> u8 {
        self.components().1
    }

    #[inline(always)]
    pub(crate) fn b(&self) -> u8 {
        self.components().2
    }

    fn components(&self) -> (u8, u8, u8) {
        self.color.into_format::<u8>().into_components()
    }

    /// Shifts perceptual lightness by `amount`, in `-1.0..=1.0`.
    pub(crate) fn lighten(&self, amount: f32) -> Rgb {
        let mut lch = Lch::from_color(self.color);
        lch.l = (lch.l + amount * 100.0).clamp(0.0, 100.0);
        Self::from_lch(lch)
    }
}

impl From<&Rgb> for crossterm::style::Color {
    fn from(f: &Rgb) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: f.r(),
            g: f.g(),
            b: f.b(),
        }
    }
}

const GLYPHS: [char; KINDS as usize] = ['◆', '●', '▲', '■', '★'];

/// Theme holds every colour the game is drawn with.
pub(crate) struct Theme {
    tokens: Vec<Rgb>,
    pub(crate) board: Rgb,
    pub(crate) border: Rgb,
    pub(crate) text: Rgb,
    pub(crate) cursor: Rgb,
    pub(crate) selection: Rgb,
}

static THEME: OnceLock<Theme> = OnceLock::new();

pub(crate) fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::new)
}

impl Theme {
    fn new() -> Self {
        let base_hue = 28.0;
        let tokens = (0..KINDS)
            .map(|i| Lch::new(72.0, 85.0, base_hue + i as f32 * 360.0 / KINDS as f32))
            .map(Rgb::from_lch)
            .collect();
        Self {
            tokens,
            board: Rgb::from_lch(Lch::new(12.0, 8.0, base_hue + 180.0)),
            border: Rgb::from_lch(Lch::new(60.0, 30.0, base_hue + 180.0)),
            text: Rgb::from_lch(Lch::new(92.0, 5.0, base_hue)),
            cursor: Rgb::new(255, 255, 255),
            selection: Rgb::from_lch(Lch::new(90.0, 90.0, 95.0)),
        }
    }

    pub(crate) fn token(&self, token: Token) -> &Rgb {
        &self.tokens[token.kind()]
    }

    /// Glyph drawn on top of a token so kinds stay distinguishable without colour.
    pub(crate) fn glyph(&self, token: Token) -> char {
        GLYPHS[token.kind()]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn brightness(c: &Rgb) -> u32 {
        c.r() as u32 + c.g() as u32 + c.b() as u32
    }

    #[test]
    fn token_colors_are_distinct() {
        let theme = theme();
        for a in 0..KINDS {
            for b in (a + 1)..KINDS {
                assert_ne!(theme.token(Token::new(a)), theme.token(Token::new(b)));
                assert_ne!(theme.glyph(Token::new(a)), theme.glyph(Token::new(b)));
            }
        }
    }

    #[test]
    fn lighten_and_darken() {
        let base = Rgb::new(90, 90, 100);
        assert!(brightness(&base.lighten(0.2)) > brightness(&base));
        assert!(brightness(&base.lighten(-0.2)) < brightness(&base));
    }

    #[test]
    fn round_trips_bytes() {
        let c = Rgb::new(12, 200, 99);
        assert_eq!((c.r(), c.g(), c.b()), (12, 200, 99));
        assert_eq!(
            crossterm::style::Color::from(&c),
            crossterm::style::Color::Rgb { r: 12, g: 200, b: 99 }
        );
    }
}
