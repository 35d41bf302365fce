use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::assets::AssetKind;
use crate::layout::InteractionMode;
use crate::models::MediaItem;

/// Identity of a mounted card: the video id plus its grid index.
///
/// The index is part of the key because a catalog may list the same video
/// more than once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKey {
    pub id: String,
    pub index: usize,
}

impl CardKey {
    pub fn new(id: impl Into<String>, index: usize) -> Self {
        Self {
            id: id.into(),
            index,
        }
    }
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.id, self.index)
    }
}

/// Loading and pointer flags for one card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardState {
    pub hovered: bool,
    pub preview_loaded: bool,
    pub thumbnail_loaded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardPhase {
    /// Created but not yet mounted into the grid.
    Idle,
    ThumbnailShown,
    PreviewPlaying,
}

/// Inputs delivered to a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEvent {
    PointerEnter,
    PointerLeave,
    Tap,
    AssetLoaded(AssetKind),
    AssetFailed(AssetKind),
}

/// Side effects a card asks its owner to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEffect {
    RequestThumbnail,
    LoadPreview,
    PlayPreview,
    StopPreview,
    /// Open the given URL outside the grid.
    Navigate(String),
}

/// Per-card interaction state machine.
///
/// The card performs no I/O. Every transition returns at most one
/// `CardEffect` for the owning section to execute.
#[derive(Debug, Clone)]
pub struct CardController {
    key: CardKey,
    item: MediaItem,
    state: CardState,
    mounted: bool,
    /// Whether the owner currently allows the preview embed to exist.
    preview_mountable: bool,
    preview_requested: bool,
    preview_failed: bool,
    thumbnail_failed: bool,
}

impl CardController {
    pub fn new(key: CardKey, item: MediaItem) -> Self {
        Self {
            key,
            item,
            state: CardState::default(),
            mounted: false,
            preview_mountable: false,
            preview_requested: false,
            preview_failed: false,
            thumbnail_failed: false,
        }
    }

    pub fn key(&self) -> &CardKey {
        &self.key
    }

    pub fn item(&self) -> &MediaItem {
        &self.item
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn thumbnail_failed(&self) -> bool {
        self.thumbnail_failed
    }

    pub fn preview_failed(&self) -> bool {
        self.preview_failed
    }

    pub fn phase(&self) -> CardPhase {
        if !self.mounted {
            CardPhase::Idle
        } else if self.preview_visible() && self.state.preview_loaded {
            CardPhase::PreviewPlaying
        } else {
            CardPhase::ThumbnailShown
        }
    }

    /// The preview only shows once the thumbnail has resolved, so a quick
    /// hover never flashes a preview over the placeholder. A failed preview
    /// leaves the thumbnail in place.
    pub fn preview_visible(&self) -> bool {
        self.state.thumbnail_loaded && self.state.hovered && !self.preview_failed
    }

    /// Mount into the grid. Resets all flags and asks for the thumbnail.
    pub fn mount(&mut self) -> CardEffect {
        self.state = CardState::default();
        self.mounted = true;
        self.preview_requested = false;
        self.preview_failed = false;
        self.thumbnail_failed = false;
        trace!(key = %self.key, "Card mounted");
        CardEffect::RequestThumbnail
    }

    /// Allow or forbid the preview embed.
    ///
    /// Forbidding it drops any loaded or in-flight preview, stopping one
    /// that is playing. Allowing it starts the preview if the card is
    /// already hovered over a loaded thumbnail.
    pub fn set_preview_mountable(&mut self, mountable: bool) -> Option<CardEffect> {
        if self.preview_mountable == mountable {
            return None;
        }
        self.preview_mountable = mountable;
        if !self.mounted {
            return None;
        }

        if mountable {
            if self.state.hovered && self.state.thumbnail_loaded {
                self.start_preview()
            } else {
                None
            }
        } else {
            let was_active = self.state.hovered && self.preview_requested && !self.preview_failed;
            self.preview_requested = false;
            self.state.preview_loaded = false;
            trace!(key = %self.key, was_active, "Preview unmounted");
            was_active.then_some(CardEffect::StopPreview)
        }
    }

    pub fn handle(&mut self, event: CardEvent, mode: InteractionMode) -> Option<CardEffect> {
        if !self.mounted {
            trace!(key = %self.key, ?event, "Event for unmounted card ignored");
            return None;
        }

        match event {
            CardEvent::PointerEnter => self.on_enter(mode),
            CardEvent::PointerLeave => self.on_leave(),
            CardEvent::Tap => self.on_tap(mode),
            CardEvent::AssetLoaded(kind) => self.on_loaded(kind),
            CardEvent::AssetFailed(kind) => {
                self.on_failed(kind);
                None
            }
        }
    }

    fn on_enter(&mut self, mode: InteractionMode) -> Option<CardEffect> {
        if mode != InteractionMode::HoverCapable {
            return None;
        }
        self.state.hovered = true;
        if self.state.thumbnail_loaded {
            self.start_preview()
        } else {
            None
        }
    }

    // Leave is honoured in every mode so a hover that started before a
    // switch to touch cannot get stuck.
    fn on_leave(&mut self) -> Option<CardEffect> {
        if !self.state.hovered {
            return None;
        }
        self.state.hovered = false;
        if self.preview_requested && !self.preview_failed {
            Some(CardEffect::StopPreview)
        } else {
            None
        }
    }

    fn on_tap(&self, mode: InteractionMode) -> Option<CardEffect> {
        match mode {
            InteractionMode::Touch => Some(CardEffect::Navigate(self.item.watch_url())),
            InteractionMode::HoverCapable => None,
        }
    }

    fn on_loaded(&mut self, kind: AssetKind) -> Option<CardEffect> {
        match kind {
            AssetKind::Thumbnail => {
                self.state.thumbnail_loaded = true;
                if self.state.hovered {
                    self.start_preview()
                } else {
                    None
                }
            }
            AssetKind::Preview => {
                if !self.preview_requested || self.preview_failed {
                    trace!(key = %self.key, "Unrequested preview load ignored");
                    return None;
                }
                self.state.preview_loaded = true;
                self.state.hovered.then_some(CardEffect::PlayPreview)
            }
        }
    }

    fn on_failed(&mut self, kind: AssetKind) {
        match kind {
            AssetKind::Thumbnail => self.thumbnail_failed = true,
            AssetKind::Preview => {
                if !self.preview_requested {
                    trace!(key = %self.key, "Unrequested preview failure ignored");
                    return;
                }
                self.preview_failed = true;
                self.state.preview_loaded = false;
            }
        }
    }

    fn start_preview(&mut self) -> Option<CardEffect> {
        if !self.preview_mountable || self.preview_failed {
            None
        } else if self.state.preview_loaded {
            Some(CardEffect::PlayPreview)
        } else if self.preview_requested {
            None
        } else {
            self.preview_requested = true;
            Some(CardEffect::LoadPreview)
        }
    }
}
