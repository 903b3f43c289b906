use super::colors::Rgb;
use super::geometry::Idx;

/// Tuxel is a single terminal cell: one character and its colours.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Tuxel {
    content: char,
    idx: Idx,
    fgcolor: Option<Rgb>,
    bgcolor: Option<Rgb>,
}

impl Tuxel {
    pub(crate) fn new(idx: Idx) -> Self {
        Tuxel {
            content: ' ',
            idx,
            fgcolor: None,
            bgcolor: None,
        }
    }

    pub(crate) fn content(&self) -> char {
        self.content
    }

    pub(crate) fn coordinates(&self) -> (usize, usize) {
        (self.idx.0, self.idx.1)
    }

    pub(crate) fn colors(&self) -> (Option<&Rgb>, Option<&Rgb>) {
        (self.fgcolor.as_ref(), self.bgcolor.as_ref())
    }

    /// Applies whichever of the given attributes are set. Returns whether the tuxel changed.
    pub(crate) fn paint(&mut self, content: Option<char>, fg: Option<&Rgb>, bg: Option<&Rgb>) -> bool {
        let before = (self.content, self.fgcolor.clone(), self.bgcolor.clone());
        if let Some(c) = content {
            self.content = c;
        }
        if let Some(fg) = fg {
            self.fgcolor = Some(fg.clone());
        }
        if let Some(bg) = bg {
            self.bgcolor = Some(bg.clone());
        }
        before != (self.content, self.fgcolor.clone(), self.bgcolor.clone())
    }
}

impl std::fmt::Display for Tuxel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn paint_reports_changes() {
        let mut tuxel = Tuxel::new(Idx(3, 4));
        let red = Rgb::new(255, 0, 0);
        assert!(tuxel.paint(Some('x'), None, Some(&red)));
        assert!(!tuxel.paint(Some('x'), None, Some(&red)));
        assert!(!tuxel.paint(None, None, None));
        assert_eq!(tuxel.colors(), (None, Some(&red)));
        assert_eq!(format!("{}", tuxel), "x");
        assert_eq!(tuxel.coordinates(), (3, 4));
    }
}
