/// A dense row in a component column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Row(usize);

impl From<usize> for Row {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl Row {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the index used in the column vecs.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}
