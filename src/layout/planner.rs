use crate::layout::ViewportTier;
use crate::models::{GridPlan, MediaItem, DEFAULT_ROWS};

/// Upper bound on rows per plan.
pub const MAX_ROWS: usize = 64;

/// Configuration for the fixed-row grid planner.
///
/// The grid shows exactly `rows` rows worth of items, taken from the front
/// of the catalog in order.
#[derive(Debug, Clone)]
pub struct GridPlanner {
    /// Rows per plan (default: 2)
    pub rows: usize,
}

impl Default for GridPlanner {
    fn default() -> Self {
        Self { rows: DEFAULT_ROWS }
    }
}

impl GridPlanner {
    pub fn new(rows: usize) -> Self {
        Self {
            rows: rows.clamp(1, MAX_ROWS),
        }
    }

    /// Computes the grid plan for a catalog at the given tier.
    ///
    /// Takes the first `columns * rows` items. A shorter catalog is shown in
    /// full with a partial last row; nothing is padded or repeated.
    pub fn plan(&self, catalog: &[MediaItem], tier: ViewportTier) -> GridPlan {
        let columns = tier.columns();
        let take = columns.saturating_mul(self.rows).min(catalog.len());
        GridPlan::new(columns, self.rows, catalog[..take].to_vec())
    }
}
