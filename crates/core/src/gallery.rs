//! Index bookkeeping for report image galleries and the lightbox.

/// Position within a list of report images. Navigation wraps around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gallery {
    len: usize,
    index: usize,
}

impl Gallery {
    /// Open a gallery of `len` images at `index`, clamped into range.
    pub fn open(len: usize, index: usize) -> Self {
        Self {
            len,
            index: index.min(len.saturating_sub(1)),
        }
    }

    /// Reset to an empty gallery.
    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        self.len > 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Advance one image, wrapping from the last back to the first.
    pub fn next_image(&mut self) -> usize {
        if self.len > 0 {
            self.index = if self.index + 1 >= self.len { 0 } else { self.index + 1 };
        }
        self.index
    }

    /// Step back one image, wrapping from the first to the last.
    pub fn prev_image(&mut self) -> usize {
        if self.len > 0 {
            self.index = if self.index == 0 { self.len - 1 } else { self.index - 1 };
        }
        self.index
    }

    /// Adjust after removing the image at `removed` so the same picture
    /// stays selected where possible.
    pub fn remove(&mut self, removed: usize) {
        if removed >= self.len {
            return;
        }
        self.len -= 1;
        if self.len == 0 {
            self.index = 0;
        } else if removed < self.index || self.index >= self.len {
            self.index -= 1;
        }
    }

    /// "3 / 7" style counter; empty when closed.
    pub fn counter(&self) -> String {
        if self.len == 0 {
            String::new()
        } else {
            format!("{} / {}", self.index + 1, self.len)
        }
    }
}
