//! Cursor helpers over the searched text.

/// The text being searched, with the window the current search may see.
#[derive(Clone, Copy, Debug)]
pub struct Input<'t> {
    pub text: &'t str,
    /// Lowest position anchors and lookbehind may look at.
    pub floor: usize,
    /// Where the current search started.
    pub base: usize,
}

impl<'t> Input<'t> {
    pub fn new(text: &'t str) -> Self {
        Self {
            text,
            floor: 0,
            base: 0,
        }
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.text[pos..].chars().next()
    }

    /// Character before `pos`, if it lies inside the visible window.
    #[inline]
    pub fn char_before(&self, pos: usize) -> Option<char> {
        if pos <= self.floor {
            return None;
        }
        self.text[..pos].chars().next_back()
    }

    /// Position `n` characters before `pos`, if the window allows it.
    pub fn back(&self, pos: usize, n: u32) -> Option<usize> {
        let mut at = pos;
        for _ in 0..n {
            at -= self.char_before(at)?.len_utf8();
        }
        Some(at)
    }

    /// Position just past the character at `pos`.
    pub fn advance(&self, pos: usize) -> Option<usize> {
        self.char_at(pos).map(|c| pos + c.len_utf8())
    }

    /// Rounds `pos` up to a character boundary inside the text.
    pub fn clamp(&self, pos: usize) -> usize {
        let mut at = pos.min(self.text.len());
        while !self.text.is_char_boundary(at) {
            at += 1;
        }
        at
    }
}
