const THUMBNAIL_HOST: &str = "https://img.youtube.com/vi";
const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";
const EMBED_BASE: &str = "https://www.youtube.com/embed";

/// One playable video in the portfolio catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaItem {
    pub id: String,
}

impl MediaItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Full-resolution still shown on the card.
    pub fn thumbnail_url(&self) -> String {
        format!("{}/{}/maxresdefault.jpg", THUMBNAIL_HOST, self.id)
    }

    /// Low-resolution still shown blurred until the thumbnail resolves.
    pub fn placeholder_url(&self) -> String {
        format!("{}/{}/mqdefault.jpg", THUMBNAIL_HOST, self.id)
    }

    /// Canonical viewing location, opened on tap in touch mode.
    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_BASE, self.id)
    }

    /// Muted looping embed used as the hover preview.
    pub fn embed_url(&self, autoplay: bool) -> String {
        format!(
            "{}/{id}?autoplay={}&mute=1&loop=1&playlist={id}&controls=1&modestbranding=1&rel=0&showinfo=0",
            EMBED_BASE,
            u8::from(autoplay),
            id = self.id
        )
    }
}
