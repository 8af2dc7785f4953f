//! Highlighted row tracking

/// Index of the highlighted row, if any.
///
/// Always `None` or a valid index into the rows it was moved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection(Option<usize>);

impl Selection {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn index(&self) -> Option<usize> {
        self.0
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// ArrowDown: first press lands on row 0, then stops at the last row.
    pub fn next(&mut self, row_count: usize) {
        if row_count == 0 {
            self.0 = None;
            return;
        }
        let last = row_count - 1;
        self.0 = Some(match self.0 {
            None => 0,
            Some(i) => (i + 1).min(last),
        });
    }

    /// ArrowUp: steps back and can return to no selection.
    pub fn previous(&mut self) {
        self.0 = match self.0 {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Pointer hover. Ignored when `index` is out of range.
    pub fn hover(&mut self, index: usize, row_count: usize) {
        if index < row_count {
            self.0 = Some(index);
        }
    }
}
