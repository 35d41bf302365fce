use once_cell::sync::Lazy;
use xxhash_rust::xxh3::xxh3_64;

use super::MediaItem;

const TEASERS: [&str; 10] = [
    "QGsa5QB5gK4",
    "5fR4MErzYeI",
    "2qFnRXpSFn8",
    "7bZ5MKY6pfU",
    "QstSPHan4oE",
    "HMJyD-kPWek",
    "zd5De3LAMQc",
    "YM1TZnbcbOs",
    "pRya97qUJMs",
    "AqqGxOrwv_g",
];

const HIGHLIGHTS: [&str; 10] = [
    "2qFnRXpSFn8",
    "dRjCKw7YonM",
    "L9PMwOelcRk",
    "qeMFqkcPYcg",
    "SQoA_wjmE9w",
    "ZbZSe6N_BXs",
    "HEXWRTEbj1I",
    "U9t-slLl69E",
    "iik25wqIuFo",
    "C0DPdy98e4c",
];

/// Teasers shown ahead of highlights in the built-in catalog.
const TEASER_COUNT: usize = 5;
const HIGHLIGHT_COUNT: usize = 7;

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    TEASERS
        .iter()
        .take(TEASER_COUNT)
        .chain(HIGHLIGHTS.iter().take(HIGHLIGHT_COUNT))
        .copied()
        .collect()
});

/// Ordered, immutable list of media items available to the grid.
///
/// Ids are not required to be unique; the same video may be listed as both a
/// teaser and a highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<MediaItem>,
}

impl Catalog {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self { items }
    }

    /// The portfolio catalog: the first five teasers followed by the first
    /// seven highlights, enough for a full 3x2 desktop grid.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Order-sensitive hash of the ids, used to detect catalog changes.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher_input = Vec::with_capacity(self.items.len() * 12);
        for item in &self.items {
            hasher_input.extend_from_slice(item.id.as_bytes());
            // Separator keeps ["ab", "c"] distinct from ["a", "bc"].
            hasher_input.push(0);
        }
        xxh3_64(&hasher_input)
    }
}

impl<S: Into<String>> FromIterator<S> for Catalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(MediaItem::new).collect())
    }
}
