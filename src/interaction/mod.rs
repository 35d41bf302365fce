//! Per-card interaction handling for the video grid.
//!
//! - `CardController` - hover/tap state machine owned by one card
//! - `CardView` - render flags derived from a card's state

pub mod card;
pub mod view;

pub use card::*;
pub use view::CardView;
