use serde::Serialize;

use super::{CardController, CardPhase};
use crate::layout::InteractionMode;

/// What a card should currently render, derived from its state.
///
/// Styling and animation are left to the renderer; this only says which
/// layers are present and which one is on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub key: String,
    pub phase: CardPhase,
    /// Still shown under any preview: the thumbnail once loaded, else the
    /// low-resolution placeholder.
    pub image_url: String,
    pub thumbnail_failed: bool,
    pub preview_failed: bool,
    /// Loading shimmer over the card.
    pub shimmer: bool,
    /// Blurred low-resolution still.
    pub placeholder_visible: bool,
    pub thumbnail_blurred: bool,
    /// Thumbnail faded out in favour of a playing preview.
    pub thumbnail_faded: bool,
    /// Whether the preview embed exists at all.
    pub preview_mounted: bool,
    pub preview_visible: bool,
    pub autoplay: bool,
    pub play_button_visible: bool,
    pub embed_url: Option<String>,
}

impl CardView {
    pub fn derive(card: &CardController, mode: InteractionMode, in_view: bool) -> Self {
        let state = card.state();
        let hover_mode = mode == InteractionMode::HoverCapable;
        let hovering = state.hovered && hover_mode;
        let preview_mounted = in_view && hover_mode;

        Self {
            key: card.key().to_string(),
            phase: card.phase(),
            image_url: if state.thumbnail_loaded {
                card.item().thumbnail_url()
            } else {
                card.item().placeholder_url()
            },
            thumbnail_failed: card.thumbnail_failed(),
            preview_failed: card.preview_failed(),
            shimmer: !state.thumbnail_loaded,
            placeholder_visible: !state.thumbnail_loaded,
            thumbnail_blurred: !state.thumbnail_loaded,
            thumbnail_faded: preview_mounted && hovering && state.preview_loaded,
            preview_mounted,
            preview_visible: preview_mounted && card.preview_visible(),
            autoplay: hovering,
            play_button_visible: !hovering,
            embed_url: preview_mounted.then(|| card.item().embed_url(hovering)),
        }
    }
}
