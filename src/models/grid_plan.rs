use super::MediaItem;

/// Number of rows every grid plan is laid out in.
pub const DEFAULT_ROWS: usize = 2;

/// The subset of the catalog shown for the current tier.
///
/// `items` is always a prefix of the source catalog and never longer than
/// `columns * rows`. A short catalog yields a partial final row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPlan {
    pub columns: usize,
    pub rows: usize,
    pub items: Vec<MediaItem>,
}

impl GridPlan {
    pub fn new(columns: usize, rows: usize, items: Vec<MediaItem>) -> Self {
        Self {
            columns,
            rows,
            items,
        }
    }

    /// Number of cells in a full plan.
    pub fn capacity(&self) -> usize {
        self.columns.saturating_mul(self.rows)
    }

    /// Whether the last row has fewer items than columns.
    pub fn has_partial_row(&self) -> bool {
        self.items.len() % self.columns.max(1) != 0
    }

    /// Items grouped row by row.
    pub fn row_items(&self) -> impl Iterator<Item = &[MediaItem]> {
        self.items.chunks(self.columns.max(1))
    }
}
