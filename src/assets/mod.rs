//! Asset loading for grid cards.
//!
//! This module provides:
//! - `AssetFetcher` - Pluggable fetch backend
//! - `AssetQueue` - Worker queue delivering load outcomes asynchronously
//! - `ScriptedFetcher` - Deterministic fetcher for simulation and tests

use std::fmt;

use crate::interaction::CardKey;
use crate::models::MediaItem;

pub mod error;
pub mod fetcher;
pub mod queue;

pub use error::AssetError;
pub use fetcher::{AssetFetcher, ScriptedFetcher};
pub use queue::{AssetQueue, AssetQueueBuilder};

/// Which of a card's two assets a request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Thumbnail,
    Preview,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Thumbnail => f.write_str("thumbnail"),
            Self::Preview => f.write_str("preview"),
        }
    }
}

/// A request to load one asset for one mounted card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub key: CardKey,
    pub kind: AssetKind,
    pub url: String,
}

impl AssetRequest {
    pub fn new(key: CardKey, kind: AssetKind, item: &MediaItem) -> Self {
        let url = match kind {
            AssetKind::Thumbnail => item.thumbnail_url(),
            AssetKind::Preview => item.embed_url(false),
        };
        Self { key, kind, url }
    }

    pub fn id(&self) -> &str {
        &self.key.id
    }
}

/// Completion notification for an `AssetRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEvent {
    pub key: CardKey,
    pub kind: AssetKind,
    pub outcome: Result<(), AssetError>,
}

impl AssetEvent {
    pub fn loaded(key: CardKey, kind: AssetKind) -> Self {
        Self {
            key,
            kind,
            outcome: Ok(()),
        }
    }

    pub fn failed(key: CardKey, kind: AssetKind, error: AssetError) -> Self {
        Self {
            key,
            kind,
            outcome: Err(error),
        }
    }
}
